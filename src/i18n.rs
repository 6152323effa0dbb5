use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_MANUAL: &str = "main_menu.manual";
    pub const MAIN_MENU_COMPARE: &str = "main_menu.compare";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const MANUAL_HEADING: &str = "manual.heading";
    pub const MANUAL_DEFAULT_HINT: &str = "manual.default_hint";
    pub const PROMPT_NAME: &str = "prompt.name";
    pub const PROMPT_INITIAL_COST: &str = "prompt.initial_cost";
    pub const PROMPT_MAINTENANCE_COST: &str = "prompt.maintenance_cost";
    pub const PROMPT_MAINTENANCE_INTERVAL: &str = "prompt.maintenance_interval";
    pub const PROMPT_REPLACEMENT_COST: &str = "prompt.replacement_cost";
    pub const PROMPT_REPLACEMENT_INTERVAL: &str = "prompt.replacement_interval";
    pub const PROMPT_REUSE_RATE: &str = "prompt.reuse_rate";
    pub const PROMPT_OPERATING_LIFE: &str = "prompt.operating_life";
    pub const PROMPT_DOWNTIME_COST: &str = "prompt.downtime_cost";
    pub const PROMPT_DISCOUNT_RATE: &str = "prompt.discount_rate";
    pub const VALIDATION_FAILED: &str = "manual.validation_failed";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_TOTAL: &str = "result.total";
    pub const RESULT_OCCURRENCES: &str = "result.occurrences";
    pub const RESULT_BREAKDOWN: &str = "result.breakdown";
    pub const PROMPT_EXPORT: &str = "prompt.export";
    pub const EXPORT_SAVED: &str = "export.saved";

    pub const COMPARE_HEADING: &str = "compare.heading";
    pub const PROMPT_CSV_PATH: &str = "prompt.csv_path";
    pub const COMPARE_TABLE_HEADING: &str = "compare.table_heading";
    pub const COMPARE_CHART_HEADING: &str = "compare.chart_heading";
    pub const COMPARE_FAILURES: &str = "compare.failures";
    pub const PROMPT_SAVE_COMPARISON: &str = "prompt.save_comparison";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_CURRENT_CURRENCY: &str = "settings.current_currency";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_PROMPT_CURRENCY: &str = "settings.prompt_currency";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 영어 번역이 없으면 한국어 문자열을 폴백한다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let s = match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        };
        s.to_string()
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" | "ko-kr" => Some("ko-kr".into()),
        "en" | "en-us" | "en-uk" | "en-gb" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko-kr".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko-kr".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 [section] 아래 key.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., en-us)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., en)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== 설비 수명주기 비용(LCC) 계산기 ===",
        MAIN_MENU_MANUAL => "1) 수동 입력 계산",
        MAIN_MENU_COMPARE => "2) CSV 설비 비교",
        MAIN_MENU_SETTINGS => "3) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        MANUAL_HEADING => "\n-- 수명주기 비용 수동 계산 --",
        MANUAL_DEFAULT_HINT => "(엔터 = 대괄호 안 기본값)",
        PROMPT_NAME => "설비 이름",
        PROMPT_INITIAL_COST => "초기 투자비",
        PROMPT_MAINTENANCE_COST => "1회 유지보수비",
        PROMPT_MAINTENANCE_INTERVAL => "유지보수 주기 [개월]",
        PROMPT_REPLACEMENT_COST => "교체비",
        PROMPT_REPLACEMENT_INTERVAL => "교체 주기 [년]",
        PROMPT_REUSE_RATE => "재사용률 [%]",
        PROMPT_OPERATING_LIFE => "운전 수명 [년]",
        PROMPT_DOWNTIME_COST => "연간 정지손실 (선택)",
        PROMPT_DISCOUNT_RATE => "할인율 [%/년]",
        VALIDATION_FAILED => "입력값 오류:",
        RESULT_HEADING => "NPV 기준 수명주기 비용:",
        RESULT_TOTAL => "순현재가치 합계:",
        RESULT_OCCURRENCES => "발생 횟수 (유지보수/교체/정지손실 연수):",
        RESULT_BREAKDOWN => "비용 내역",
        PROMPT_EXPORT => "CSV/PDF로 내보낼까요? (y/N): ",
        EXPORT_SAVED => "저장됨:",
        COMPARE_HEADING => "\n-- CSV 설비 비교 --",
        PROMPT_CSV_PATH => "CSV 파일 경로: ",
        COMPARE_TABLE_HEADING => "NPV 수명주기 비용 비교",
        COMPARE_CHART_HEADING => "비용 순위",
        COMPARE_FAILURES => "처리하지 못한 행:",
        PROMPT_SAVE_COMPARISON => "비교 결과 저장 경로 (건너뛰려면 엔터): ",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_LANGUAGE => "현재 언어:",
        SETTINGS_CURRENT_CURRENCY => "현재 통화 표기:",
        SETTINGS_PROMPT_LANGUAGE => "언어 (auto/ko-kr/en-us, 유지하려면 엔터): ",
        SETTINGS_PROMPT_CURRENCY => "통화 표기 (유지하려면 엔터): ",
        SETTINGS_INVALID => "지원하지 않는 언어이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "설정을 저장했습니다.",
        _ => "(missing text)",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Lifecycle Cost Estimator ===",
        MAIN_MENU_MANUAL => "1) Calculate manually",
        MAIN_MENU_COMPARE => "2) Compare equipment from CSV",
        MAIN_MENU_SETTINGS => "3) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        MANUAL_HEADING => "\n-- Calculate Lifecycle Cost Manually --",
        MANUAL_DEFAULT_HINT => "(press enter to keep the value in brackets)",
        PROMPT_NAME => "Equipment name",
        PROMPT_INITIAL_COST => "Initial cost",
        PROMPT_MAINTENANCE_COST => "Maintenance cost per cycle",
        PROMPT_MAINTENANCE_INTERVAL => "Maintenance interval [months]",
        PROMPT_REPLACEMENT_COST => "Replacement cost",
        PROMPT_REPLACEMENT_INTERVAL => "Replacement interval [years]",
        PROMPT_REUSE_RATE => "Reuse rate [%]",
        PROMPT_OPERATING_LIFE => "Operating life [years]",
        PROMPT_DOWNTIME_COST => "Downtime cost per year (optional)",
        PROMPT_DISCOUNT_RATE => "Discount rate [% per year]",
        VALIDATION_FAILED => "Invalid input:",
        RESULT_HEADING => "NPV-Adjusted Lifecycle Cost for",
        RESULT_TOTAL => "Net Present Value:",
        RESULT_OCCURRENCES => "Occurrences (maintenance/replacement/downtime years):",
        RESULT_BREAKDOWN => "Cost Breakdown",
        PROMPT_EXPORT => "Export breakdown as CSV/PDF? (y/N): ",
        EXPORT_SAVED => "Saved:",
        COMPARE_HEADING => "\n-- Compare Equipment from CSV --",
        PROMPT_CSV_PATH => "CSV file path: ",
        COMPARE_TABLE_HEADING => "Comparison of NPV Lifecycle Costs",
        COMPARE_CHART_HEADING => "Ranking by cost",
        COMPARE_FAILURES => "Rows that could not be evaluated:",
        PROMPT_SAVE_COMPARISON => "Save comparison to (enter to skip): ",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language:",
        SETTINGS_CURRENT_CURRENCY => "Current currency symbol:",
        SETTINGS_PROMPT_LANGUAGE => "Language (auto/ko-kr/en-us, enter to keep): ",
        SETTINGS_PROMPT_CURRENCY => "Currency symbol (enter to keep): ",
        SETTINGS_INVALID => "Unsupported language; unchanged.",
        SETTINGS_SAVED => "Settings saved.",
        _ => return None,
    })
}
