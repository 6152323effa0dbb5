#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::path::PathBuf;
use std::{env, fs, path::Path};
use lifecycle_cost_estimator::{
    app::{self, Evaluation},
    batch::{self, BatchReport},
    config, export,
    export::{export_file_name, format_currency, ExportKind},
    i18n, logging,
    lifecycle::{occurrence_counts, EquipmentParameters},
};

fn main() -> Result<(), eframe::Error> {
    logging::init();
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko-kr)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if a == "--lang" || a == "-L" {
            if i + 1 < args.len() {
                cli_lang = Some(args[i + 1].clone());
                i += 1;
            }
        }
        i += 1;
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(1100.0, 760.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        tracing::warn!("config unavailable, using defaults: {e}");
        config::Config::default()
    });
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Lifecycle Cost Estimator",
        native,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::info!("using default fonts: {e}");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 바이너리 폰트 바이트를 egui에 등록한다.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글 언어팩을 위해 프로젝트 폰트 → Windows 시스템 폰트 순으로 찾는다.
/// 못 찾으면 기본 폰트를 유지한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    for cand in ["assets/fonts/NanumGothic.ttf", "assets/fonts/malgun.ttf"] {
        let p = Path::new(cand);
        if p.exists() {
            let bytes = fs::read(p).map_err(|e| format!("Failed to read font file: {e}"))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for cand in ["malgun.ttf", "gulim.ttc"] {
            let p = fonts.join(cand);
            if p.exists() {
                let bytes = fs::read(&p)
                    .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
                apply_font_bytes(ctx, bytes, "korean_font");
                return Ok(());
            }
        }
    }
    Err("Korean font not found".into())
}

fn label_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.label(text).on_hover_text(tip)
}

fn heading_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.heading(text).on_hover_text(tip)
}

/// 막대 색상 (설비별로 순환).
const BAR_COLORS: [egui::Color32; 6] = [
    egui::Color32::from_rgb(76, 120, 168),
    egui::Color32::from_rgb(245, 133, 24),
    egui::Color32::from_rgb(228, 87, 86),
    egui::Color32::from_rgb(114, 183, 178),
    egui::Color32::from_rgb(84, 162, 75),
    egui::Color32::from_rgb(238, 202, 59),
];

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    lang_input: String,
    currency_input: String,
    settings_status: Option<String>,
    show_settings_modal: bool,
    show_formula_modal: bool,
    tab: Tab,
    window_alpha: f32,
    // 수동 입력
    form: EquipmentParameters,
    export_status: Option<String>,
    // 비교
    compare_path: Option<PathBuf>,
    compare_report: Option<BatchReport>,
    compare_error: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Manual,
    Compare,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        tracing::info!(language = %lang_code, "GUI language resolved");
        Self {
            tr,
            lang_input: config.language.clone(),
            currency_input: config.currency_symbol.clone(),
            settings_status: None,
            show_settings_modal: false,
            show_formula_modal: false,
            tab: Tab::Manual,
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            form: config.defaults.to_parameters(),
            export_status: None,
            compare_path: None,
            compare_report: None,
            compare_error: None,
            config,
        }
    }

    /// 현재 폼 값으로 계산한다. 검증 실패는 메시지로 돌려준다.
    fn evaluation(&self) -> Result<Evaluation, String> {
        app::evaluate(self.form.clone()).map_err(|e| e.to_string())
    }

    fn export(&mut self, kind: ExportKind) {
        let eval = match self.evaluation() {
            Ok(eval) => eval,
            Err(e) => {
                self.export_status = Some(e);
                return;
            }
        };
        let file_name = export_file_name(&eval.params.name, kind);
        let picked = FileDialog::new()
            .set_directory(&self.config.export_dir)
            .set_file_name(file_name.as_str())
            .add_filter(kind.extension(), &[kind.extension()])
            .save_file();
        let Some(path) = picked else {
            return;
        };
        self.export_status = Some(match self.write_export(&eval, kind, &path) {
            Ok(()) => format!("Saved: {}", path.display()),
            Err(e) => format!("Export error: {e}"),
        });
    }

    fn write_export(
        &self,
        eval: &Evaluation,
        kind: ExportKind,
        path: &Path,
    ) -> Result<(), export::ExportError> {
        match kind {
            ExportKind::Csv => export::save_breakdown_csv(path, &eval.breakdown),
            ExportKind::Pdf => export::save_report_pdf(
                path,
                &eval.params,
                &eval.breakdown,
                &self.config.currency_symbol,
            ),
        }
    }

    fn load_comparison(&mut self, path: PathBuf) {
        match app::compare_file(&path, &self.config) {
            Ok(report) => {
                self.compare_report = Some(report);
                self.compare_error = None;
            }
            Err(e) => {
                self.compare_report = None;
                self.compare_error = Some(e.to_string());
            }
        }
        self.compare_path = Some(path);
    }

    /// 사이드 메뉴를 제공한다.
    fn ui_nav(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        ui.vertical_centered(|ui| {
            ui.heading(txt("gui.nav.heading", "Menu"));
            ui.add_space(8.0);
        });
        for (tab, label) in [
            (Tab::Manual, txt("gui.tab.manual", "Calculate")),
            (Tab::Compare, txt("gui.tab.compare", "Compare (CSV)")),
        ] {
            let selected = self.tab == tab;
            let button = egui::Button::new(label)
                .fill(if selected {
                    ui.visuals().selection.bg_fill
                } else {
                    ui.visuals().extreme_bg_color
                })
                .min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).clicked() {
                self.tab = tab;
            }
            ui.add_space(4.0);
        }
    }

    fn ui_manual(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let txt = move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        heading_with_tip(
            ui,
            &txt("gui.manual.heading", "Calculate Lifecycle Cost Manually"),
            &txt(
                "gui.manual.tip",
                "NPV of maintenance, replacement and downtime, minus the reuse credit.",
            ),
        );
        ui.add_space(8.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("manual_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    let form = &mut self.form;
                    ui.label(txt("gui.manual.name", "Equipment name"));
                    ui.text_edit_singleline(&mut form.name);
                    ui.end_row();
                    money_row(ui, &txt("gui.manual.initial_cost", "Initial cost"), &mut form.initial_cost);
                    money_row(
                        ui,
                        &txt("gui.manual.maintenance_cost", "Maintenance cost per cycle"),
                        &mut form.maintenance_cost_per_cycle,
                    );
                    interval_row(
                        ui,
                        &txt("gui.manual.maintenance_interval", "Maintenance interval [months]"),
                        &mut form.maintenance_interval_months,
                    );
                    money_row(
                        ui,
                        &txt("gui.manual.replacement_cost", "Replacement cost"),
                        &mut form.replacement_cost,
                    );
                    interval_row(
                        ui,
                        &txt("gui.manual.replacement_interval", "Replacement interval [years]"),
                        &mut form.replacement_interval_years,
                    );
                    ui.label(txt("gui.manual.reuse_rate", "Reuse rate [%]"));
                    ui.add(egui::Slider::new(&mut form.reuse_rate_percent, 0.0..=100.0).step_by(1.0));
                    ui.end_row();
                    interval_row(
                        ui,
                        &txt("gui.manual.operating_life", "Operating life [years]"),
                        &mut form.operating_life_years,
                    );
                    money_row(
                        ui,
                        &txt("gui.manual.downtime_cost", "Downtime cost per year (optional)"),
                        &mut form.downtime_cost_per_year,
                    );
                    ui.label(txt("gui.manual.discount_rate", "Discount rate [% per year]"));
                    ui.add(egui::Slider::new(&mut form.discount_rate_percent, 0.0..=15.0).step_by(0.1));
                    ui.end_row();
                });
        });
        ui.add_space(12.0);

        let currency = self.config.currency_symbol.clone();
        match self.evaluation() {
            Ok(eval) => {
                ui.heading(format!(
                    "{} {}",
                    txt("gui.result.heading", "NPV-Adjusted Lifecycle Cost for"),
                    eval.params.name
                ));
                ui.label(
                    egui::RichText::new(format_currency(&currency, eval.breakdown.total()))
                        .size(26.0)
                        .strong(),
                );
                let counts = occurrence_counts(&eval.params);
                ui.label(format!(
                    "{}: {} / {} / {}",
                    txt("gui.result.occurrences", "Occurrences (maintenance / replacement / downtime years)"),
                    counts.maintenance,
                    counts.replacement,
                    counts.downtime_years
                ));
                ui.add_space(8.0);
                ui.label(txt("gui.result.breakdown", "Cost Breakdown"));
                egui::Grid::new("breakdown_grid")
                    .num_columns(2)
                    .striped(true)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong("Cost Component");
                        ui.strong("Amount");
                        ui.end_row();
                        for line in eval.breakdown.lines() {
                            ui.label(line.label());
                            ui.label(format_currency(&currency, line.amount));
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .button(txt("gui.export.csv", "Download Breakdown as CSV"))
                        .clicked()
                    {
                        self.export(ExportKind::Csv);
                    }
                    if ui
                        .button(txt("gui.export.pdf", "Download Report as PDF"))
                        .clicked()
                    {
                        self.export(ExportKind::Pdf);
                    }
                });
            }
            Err(msg) => {
                ui.colored_label(ui.visuals().error_fg_color, msg);
            }
        }
        if let Some(status) = &self.export_status {
            ui.label(status.as_str());
        }
    }

    fn ui_compare(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let txt = move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        heading_with_tip(
            ui,
            &txt("gui.compare.heading", "Upload CSV to Compare Equipment"),
            &txt(
                "gui.compare.tip",
                "Columns: Equipment, Initial Cost, Maintenance Cost, Maintenance Interval, Replacement Cost, Replacement Interval, Reuse Rate, Operating Life, Downtime Cost, Discount Rate",
            ),
        );
        ui.horizontal(|ui| {
            if ui.button(txt("gui.compare.open", "Open CSV…")).clicked() {
                if let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
                    self.load_comparison(path);
                }
            }
            if let Some(p) = &self.compare_path {
                ui.label(p.display().to_string());
            }
        });
        if let Some(err) = &self.compare_error {
            ui.colored_label(ui.visuals().error_fg_color, err.as_str());
        }
        let Some(report) = self.compare_report.clone() else {
            return;
        };
        let currency = self.config.currency_symbol.clone();

        ui.add_space(8.0);
        label_with_tip(
            ui,
            &txt("gui.compare.table", "Comparison of NPV Lifecycle Costs"),
            &txt("gui.compare.table_tip", "Rows in input order"),
        );
        egui::Grid::new("compare_grid")
            .num_columns(2)
            .striped(true)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                ui.strong(batch::columns::EQUIPMENT);
                ui.strong(batch::TOTAL_COLUMN);
                ui.end_row();
                for entry in report.comparison.entries() {
                    ui.label(entry.equipment.as_str());
                    ui.label(format_currency(&currency, entry.total_cost));
                    ui.end_row();
                }
            });
        ui.add_space(12.0);
        bar_chart(ui, &report);

        if report.has_failures() {
            ui.add_space(8.0);
            ui.label(txt("gui.compare.failures", "Rows that could not be evaluated:"));
            for failure in &report.failures {
                ui.colored_label(ui.visuals().warn_fg_color, failure.to_string());
            }
        }
        ui.add_space(8.0);
        if ui
            .button(txt("gui.compare.save", "Save comparison as CSV"))
            .clicked()
        {
            if let Some(path) = FileDialog::new()
                .set_file_name("lifecycle_cost_comparison.csv")
                .add_filter("CSV", &["csv"])
                .save_file()
            {
                let result = fs::File::create(&path)
                    .map_err(batch::BatchError::from)
                    .and_then(|f| batch::write_comparison_csv(f, &report.comparison));
                self.compare_error = result.err().map(|e| e.to_string());
            }
        }
    }
}

fn money_row(ui: &mut egui::Ui, label: &str, value: &mut f64) {
    ui.label(label);
    ui.add(
        egui::DragValue::new(value)
            .clamp_range(0.0..=f64::MAX)
            .speed(100.0),
    );
    ui.end_row();
}

fn interval_row(ui: &mut egui::Ui, label: &str, value: &mut f64) {
    ui.label(label);
    ui.add(
        egui::DragValue::new(value)
            .clamp_range(1.0..=1200.0)
            .speed(1.0),
    );
    ui.end_row();
}

/// 합계 내림차순 막대 그래프. 음수 합계는 0 높이로 그린다.
fn bar_chart(ui: &mut egui::Ui, report: &BatchReport) {
    let ranked = report.comparison.ranked();
    if ranked.is_empty() {
        return;
    }
    let max = report.comparison.max_total().unwrap_or(0.0).max(f64::EPSILON);
    let height = 240.0;
    let width = ui.available_width().min(600.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height + 40.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let slot = width / ranked.len() as f32;
    let text_color = ui.visuals().text_color();
    for (idx, entry) in ranked.iter().enumerate() {
        let ratio = (entry.total_cost.max(0.0) / max) as f32;
        let x0 = rect.left() + slot * idx as f32 + slot * 0.15;
        let x1 = rect.left() + slot * (idx + 1) as f32 - slot * 0.15;
        let bottom = rect.top() + height;
        let bar = egui::Rect::from_min_max(
            egui::pos2(x0, bottom - height * ratio),
            egui::pos2(x1, bottom),
        );
        painter.rect_filled(bar, 2.0, BAR_COLORS[idx % BAR_COLORS.len()]);
        painter.text(
            egui::pos2((x0 + x1) / 2.0, bottom + 4.0),
            egui::Align2::CENTER_TOP,
            &entry.equipment,
            egui::FontId::proportional(12.0),
            text_color,
        );
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut style = (*ctx.style()).clone();
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        let tr = self.tr.clone();
        let txt = move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(txt("gui.nav.app_title", "Lifecycle Cost Estimator"));
                ui.separator();
                if ui.button(txt("gui.formula.button", "Formula reference")).clicked() {
                    self.show_formula_modal = true;
                }
                if ui.button(txt("gui.settings.title", "Settings")).clicked() {
                    self.show_settings_modal = true;
                }
            });
        });

        if self.show_settings_modal {
            egui::Window::new(txt("gui.settings.title", "Settings"))
                .collapsible(false)
                .resizable(true)
                .open(&mut self.show_settings_modal)
                .show(ctx, |ui| {
                    ui.label(txt("gui.settings.lang", "Language"));
                    egui::ComboBox::from_id_source("lang_choice")
                        .selected_text(self.lang_input.as_str())
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.lang_input, "auto".into(), txt("gui.settings.lang.auto", "System"));
                            ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                            ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                        });
                    ui.separator();
                    ui.label(txt("gui.settings.currency", "Currency symbol"));
                    ui.text_edit_singleline(&mut self.currency_input);
                    ui.separator();
                    ui.label(txt("gui.settings.alpha", "Window transparency"));
                    ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                    if ui.button(txt("gui.settings.save", "Save settings")).clicked() {
                        self.config.language = self.lang_input.clone();
                        self.config.currency_symbol = self.currency_input.trim().to_string();
                        self.config.window_alpha = self.window_alpha;
                        let resolved = i18n::resolve_language(&self.config.language, None);
                        self.tr = i18n::Translator::new_with_pack(
                            &resolved,
                            self.config.language_pack_dir.as_deref(),
                        );
                        self.settings_status = Some(match self.config.save() {
                            Ok(()) => txt("gui.settings.saved", "Saved."),
                            Err(e) => format!("Save error: {e}"),
                        });
                    }
                    if let Some(msg) = &self.settings_status {
                        ui.label(msg.as_str());
                    }
                });
        }

        if self.show_formula_modal {
            egui::Window::new(txt("gui.formula.title", "Formula reference"))
                .collapsible(true)
                .resizable(true)
                .open(&mut self.show_formula_modal)
                .show(ctx, |ui| {
                    ui.label(txt("gui.formula.npv", "NPV = Σ cost / (1 + r)^(interval × i), i = 1..n"));
                    ui.label(txt("gui.formula.counts", "n = floor(life / interval); partial cycles are dropped."));
                    ui.label(txt("gui.formula.downtime", "Downtime: yearly, floor(life) occurrences."));
                    ui.label(txt("gui.formula.total", "Total = Initial + Maintenance + Replacement + Downtime − Reuse rate × Initial"));
                });
        }

        egui::SidePanel::left("nav")
            .resizable(true)
            .min_width(140.0)
            .default_width(180.0)
            .show(ctx, |ui| {
                self.ui_nav(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.tab {
                    Tab::Manual => self.ui_manual(ui),
                    Tab::Compare => self.ui_compare(ui),
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_starts_from_config_defaults() {
        let app = GuiApp::new(config::Config::default());
        assert_eq!(app.form.name, "Diesel Generator");
        assert_eq!(app.form.maintenance_interval_months, 6.0);
        assert!(app.evaluation().is_ok());
    }

    #[test]
    fn invalid_form_reports_message() {
        let mut app = GuiApp::new(config::Config::default());
        app.form.name.clear();
        assert!(app.evaluation().is_err());
    }

    #[test]
    fn missing_comparison_file_sets_error() {
        let mut app = GuiApp::new(config::Config::default());
        app.load_comparison(PathBuf::from("does/not/exist.csv"));
        assert!(app.compare_report.is_none());
        assert!(app.compare_error.is_some());
    }
}
