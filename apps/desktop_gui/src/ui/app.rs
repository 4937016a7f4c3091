use std::{collections::HashMap, thread};

use chrono::Local;
use client_core::{
    run_submission, DismissTrigger, HttpPredictionClient, Severity, SubmissionController,
    SymbolCollector,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{domain::Symbol, protocol::ResultPayload};

use crate::backend_bridge::commands::BackendCommand;
use crate::config::{self, Settings};
use crate::controller::events::{
    classify_service_failure, err_label, UiError, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::theme::{
    apply_theme, ThemePreset, ThemeSettings, ERROR_COLOR, INFO_COLOR, SUCCESS_COLOR, WARNING_COLOR,
};

pub const SETTINGS_STORAGE_KEY: &str = "predictor_desktop_settings";

/// Chart artifacts the prediction run publishes on the results endpoint.
const ANALYSIS_ARTIFACTS: [(&str, &str); 4] = [
    ("Closing Prices", "closing_prices.png"),
    ("Volume Analysis", "volume.png"),
    ("Moving Averages", "moving_averages.png"),
    ("Daily Returns", "daily_returns.png"),
];

#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

enum ArtifactPreviewState {
    NotRequested,
    Loading,
    Ready {
        image: PreviewImage,
        texture: Option<TextureHandle>,
    },
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

fn service_environment_label(api_url: &str) -> &'static str {
    let api = api_url.to_ascii_lowercase();
    if api.contains("127.0.0.1") || api.contains("localhost") {
        "Local"
    } else if api.contains("staging") {
        "Staging"
    } else if api.contains("dev") {
        "Development"
    } else {
        "Production"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum PersistedThemePreset {
    MidnightMarket,
    EguiLight,
}

impl From<ThemePreset> for PersistedThemePreset {
    fn from(value: ThemePreset) -> Self {
        match value {
            ThemePreset::MidnightMarket => Self::MidnightMarket,
            ThemePreset::EguiLight => Self::EguiLight,
        }
    }
}

impl From<PersistedThemePreset> for ThemePreset {
    fn from(value: PersistedThemePreset) -> Self {
        match value {
            PersistedThemePreset::MidnightMarket => Self::MidnightMarket,
            PersistedThemePreset::EguiLight => Self::EguiLight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedAppSettings {
    theme_preset: PersistedThemePreset,
    accent_color: [u8; 4],
    text_scale: f32,
}

impl Default for PersistedAppSettings {
    fn default() -> Self {
        let theme = ThemeSettings::midnight_default();
        Self {
            theme_preset: theme.preset.into(),
            accent_color: [
                theme.accent_color.r(),
                theme.accent_color.g(),
                theme.accent_color.b(),
                theme.accent_color.a(),
            ],
            text_scale: theme.text_scale,
        }
    }
}

impl PersistedAppSettings {
    fn into_runtime(self) -> ThemeSettings {
        ThemeSettings {
            preset: self.theme_preset.into(),
            accent_color: egui::Color32::from_rgba_unmultiplied(
                self.accent_color[0],
                self.accent_color[1],
                self.accent_color[2],
                self.accent_color[3],
            ),
            text_scale: self.text_scale.clamp(0.8, 1.4),
        }
    }

    fn from_runtime(theme: ThemeSettings) -> Self {
        Self {
            theme_preset: theme.preset.into(),
            accent_color: [
                theme.accent_color.r(),
                theme.accent_color.g(),
                theme.accent_color.b(),
                theme.accent_color.a(),
            ],
            text_scale: theme.text_scale,
        }
    }
}

pub struct PredictorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    settings: Settings,

    collector: SymbolCollector,
    submission: SubmissionController,

    artifact_previews: HashMap<String, ArtifactPreviewState>,
    expanded_artifact: Option<String>,

    status: String,
    status_banner: Option<StatusBanner>,
    last_completed_at: Option<String>,

    theme: ThemeSettings,
    applied_theme: Option<ThemeSettings>,
    settings_open: bool,
}

impl PredictorApp {
    pub fn new(
        settings: Settings,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedAppSettings>,
    ) -> Self {
        let theme = persisted_settings.unwrap_or_default().into_runtime();
        Self {
            cmd_tx,
            ui_rx,
            settings,
            collector: SymbolCollector::new(),
            submission: SubmissionController::new(),
            artifact_previews: HashMap::new(),
            expanded_artifact: None,
            status: "Backend worker not ready".to_string(),
            status_banner: None,
            last_completed_at: None,
            theme,
            applied_theme: None,
            settings_open: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::PredictionSettled { outcome } => {
                    match &outcome {
                        Ok(_) => {
                            self.status = "Analysis completed successfully".to_string();
                            self.last_completed_at =
                                Some(Local::now().format("%H:%M:%S").to_string());
                            // Fresh results publish fresh artifacts.
                            self.artifact_previews.clear();
                            self.expanded_artifact = None;
                        }
                        Err(err) => {
                            self.status = classify_service_failure(&err.to_string());
                        }
                    }
                    self.submission.settle(outcome);
                }
                UiEvent::ArtifactPreviewLoaded { filename, image } => {
                    self.artifact_previews.insert(
                        filename,
                        ArtifactPreviewState::Ready {
                            image,
                            texture: None,
                        },
                    );
                }
                UiEvent::ArtifactPreviewFailed { filename, reason } => {
                    self.artifact_previews
                        .insert(filename, ArtifactPreviewState::Error(reason));
                }
                UiEvent::ArtifactSaved { filename, path } => {
                    self.status = format!("Saved {filename} to {}", path.display());
                }
                UiEvent::Error(err) => {
                    if err.is_startup_failure() {
                        self.status = err.message().to_string();
                        self.status_banner = Some(StatusBanner {
                            severity: StatusBannerSeverity::Error,
                            message: classify_service_failure(err.message()),
                        });
                    } else {
                        self.status =
                            format!("{} error: {}", err_label(err.category()), err.message());
                    }
                }
            }
        }
    }

    fn try_add_symbol(&mut self) {
        if let Ok(symbol) = self.collector.add_from_input() {
            tracing::debug!(symbol = symbol.as_str(), "symbol added");
        }
    }

    fn try_submit(&mut self) {
        if self.submission.is_loading() {
            return;
        }

        let symbols = match self.collector.submit() {
            Ok(symbols) => symbols,
            Err(_) => return, // inline error is already set
        };

        if !self.submission.begin(symbols.len()) {
            return;
        }

        let dispatched = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Predict { symbols },
            &mut self.status,
        );
        if !dispatched {
            self.submission
                .abort("prediction request could not be queued");
        }
    }

    fn request_artifact_preview(&mut self, filename: &str) {
        let dispatched = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchArtifactPreview {
                filename: filename.to_string(),
            },
            &mut self.status,
        );
        if dispatched {
            self.artifact_previews
                .insert(filename.to_string(), ArtifactPreviewState::Loading);
        }
    }

    fn request_artifact_download(&mut self, filename: &str) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::DownloadArtifact {
                filename: filename.to_string(),
            },
            &mut self.status,
        );
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.theme) {
            return;
        }
        apply_theme(ctx, self.theme);
        self.applied_theme = Some(self.theme);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::none()
                .fill(fill)
                .stroke(stroke)
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("📈").size(22.0));
                ui.vertical(|ui| {
                    ui.heading("Stock Price Predictor");
                    ui.weak("Enter ticker symbols to analyze and predict their prices.");
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.settings_open = true;
                    }
                    ui.small(format!(
                        "{} ({})",
                        self.settings.api_base_url,
                        service_environment_label(&self.settings.api_base_url)
                    ));
                });
            });
            ui.add_space(6.0);
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(at) = &self.last_completed_at {
                        ui.small(format!("Last analysis at {at}"));
                    }
                });
            });
        });
    }

    fn show_symbol_entry(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style())
            .rounding(10.0)
            .inner_margin(egui::Margin::symmetric(14, 12))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Enter Stock Symbols").strong().size(17.0));
                    ui.label(egui::RichText::new("ℹ").weak())
                        .on_hover_text(
                            "Enter stock symbols (e.g., AAPL for Apple Inc.) to analyze and \
                             predict their prices. Add up to 5 symbols.",
                        );
                });
                ui.add_space(4.0);

                let mut draft = self.collector.input().to_string();
                ui.horizontal(|ui| {
                    let edit = egui::TextEdit::singleline(&mut draft)
                        .id_source("symbol_entry_input")
                        .hint_text("Enter stock symbol (e.g., AAPL)")
                        .desired_width(ui.available_width() - 80.0);
                    let response = ui.add(edit);

                    if response.changed() {
                        draft = draft.to_ascii_uppercase();
                        self.collector.clear_error();
                    }
                    *self.collector.input_mut() = draft.clone();

                    let submitted_with_enter = response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        && !draft.trim().is_empty();

                    let add_clicked = ui
                        .add_enabled(!draft.trim().is_empty(), egui::Button::new("➕ Add"))
                        .clicked();

                    if submitted_with_enter || add_clicked {
                        self.try_add_symbol();
                        response.request_focus();
                    }
                });

                if let Some(err) = self.collector.error() {
                    ui.label(egui::RichText::new(err.to_string()).color(ERROR_COLOR).small());
                }

                ui.add_space(4.0);
                self.show_symbol_chips(ui);
                ui.add_space(6.0);

                let can_submit =
                    self.collector.can_submit() && !self.submission.is_loading();
                let submit_label = if self.submission.is_loading() {
                    "Analyzing..."
                } else {
                    "🔍 Analyze Stocks"
                };
                let submit = egui::Button::new(
                    egui::RichText::new(submit_label).strong().size(15.0),
                )
                .fill(self.theme.accent_color.gamma_multiply(0.85))
                .min_size(egui::vec2(ui.available_width(), 38.0));

                ui.horizontal(|ui| {
                    if self.submission.is_loading() {
                        ui.add(egui::Spinner::new().size(18.0));
                    }
                    if ui.add_enabled(can_submit, submit).clicked() {
                        self.try_submit();
                    }
                });

                if self.collector.at_capacity() {
                    ui.add_space(6.0);
                    egui::Frame::none()
                        .fill(INFO_COLOR.gamma_multiply(0.15))
                        .stroke(egui::Stroke::new(1.0, INFO_COLOR))
                        .rounding(8.0)
                        .inner_margin(egui::Margin::symmetric(10, 6))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new("Maximum number of symbols (5) reached")
                                    .color(INFO_COLOR),
                            );
                        });
                }
            });
    }

    fn show_symbol_chips(&mut self, ui: &mut egui::Ui) {
        let symbols: Vec<Symbol> = self.collector.symbols().iter().cloned().collect();
        let mut removal: Option<Symbol> = None;

        ui.horizontal_wrapped(|ui| {
            for symbol in &symbols {
                egui::Frame::none()
                    .fill(self.theme.accent_color.gamma_multiply(0.25))
                    .stroke(egui::Stroke::new(1.0, self.theme.accent_color))
                    .rounding(12.0)
                    .inner_margin(egui::Margin::symmetric(8, 3))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(symbol.as_str()).strong());
                            if ui.small_button("✕").clicked() {
                                removal = Some(symbol.clone());
                            }
                        });
                    });
            }
        });

        if let Some(symbol) = removal {
            self.collector.remove_symbol(&symbol);
        }
    }

    fn show_results(&mut self, ui: &mut egui::Ui) {
        if self.submission.is_loading() {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.add(egui::Spinner::new().size(32.0));
                ui.weak("Waiting for the prediction service...");
            });
            return;
        }

        if self.submission.result().is_some() {
            self.show_result_payload(ui);
            return;
        }

        if let Some(error) = self.submission.error() {
            let error = error.to_string();
            egui::Frame::none()
                .fill(ERROR_COLOR.gamma_multiply(0.12))
                .stroke(egui::Stroke::new(1.0, ERROR_COLOR))
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(error).color(ERROR_COLOR));
                });
        }
    }

    fn show_result_payload(&mut self, ui: &mut egui::Ui) {
        let Some(result) = self.submission.result().cloned() else {
            return;
        };

        if result.has_symbol_errors() {
            egui::Frame::none()
                .fill(WARNING_COLOR.gamma_multiply(0.12))
                .stroke(egui::Stroke::new(1.0, WARNING_COLOR))
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("Some symbols encountered errors during analysis:")
                            .color(WARNING_COLOR)
                            .strong(),
                    );
                    for (symbol, message) in &result.errors {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(symbol).strong());
                            ui.weak(message);
                        });
                    }
                });
            ui.add_space(8.0);
        }

        self.show_prediction_table(ui, &result);
        self.show_metrics(ui, &result);
        self.show_technical_analysis(ui, &result);
        self.show_artifacts(ui);
    }

    fn show_prediction_table(&self, ui: &mut egui::Ui, result: &ResultPayload) {
        let rows: Vec<(&String, &Value)> = result
            .predictions
            .iter()
            .filter_map(|(symbol, entry)| entry.as_ref().map(|value| (symbol, value)))
            .filter(|(_, value)| !value.is_null())
            .collect();
        if rows.is_empty() {
            return;
        }

        ui.label(egui::RichText::new("Predictions").strong().size(16.0));
        egui::Grid::new("prediction_grid")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Symbol").strong());
                ui.label(egui::RichText::new("Latest predicted close").strong());
                ui.end_row();

                for (symbol, value) in rows {
                    ui.label(egui::RichText::new(symbol).color(SUCCESS_COLOR).strong());
                    ui.label(summarize_prediction(value));
                    ui.end_row();
                }
            });
        ui.add_space(8.0);
    }

    fn show_metrics(&self, ui: &mut egui::Ui, result: &ResultPayload) {
        let entries: Vec<(&String, &Value)> = result
            .metrics
            .iter()
            .filter_map(|(symbol, entry)| entry.as_ref().map(|value| (symbol, value)))
            .filter(|(_, value)| !value.is_null())
            .collect();
        if entries.is_empty() {
            return;
        }

        ui.label(egui::RichText::new("Model Metrics").strong().size(16.0));
        for (symbol, value) in entries {
            egui::CollapsingHeader::new(symbol)
                .id_source(format!("metrics_{symbol}"))
                .show(ui, |ui| match value.as_object() {
                    Some(map) => {
                        egui::Grid::new(format!("metrics_grid_{symbol}"))
                            .num_columns(2)
                            .show(ui, |ui| {
                                for (name, metric) in map {
                                    ui.weak(name);
                                    ui.label(format_metric_value(metric));
                                    ui.end_row();
                                }
                            });
                    }
                    None => {
                        ui.weak(value.to_string());
                    }
                });
        }
        ui.add_space(8.0);
    }

    fn show_technical_analysis(&self, ui: &mut egui::Ui, result: &ResultPayload) {
        if result.technical_analysis.is_empty() {
            return;
        }

        ui.label(
            egui::RichText::new("Technical Analysis")
                .strong()
                .size(16.0),
        );
        for (symbol, value) in &result.technical_analysis {
            egui::CollapsingHeader::new(symbol)
                .id_source(format!("ta_{symbol}"))
                .show(ui, |ui| match value.as_object() {
                    Some(map) => {
                        for (name, entry) in map {
                            ui.horizontal(|ui| {
                                ui.weak(name);
                                ui.label(format_metric_value(entry));
                            });
                        }
                    }
                    None => {
                        ui.weak(value.to_string());
                    }
                });
        }
        ui.add_space(8.0);
    }

    fn show_artifacts(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Analysis Charts").strong().size(16.0));
        ui.weak("Generated chart files published by the prediction run.");

        for (title, filename) in ANALYSIS_ARTIFACTS {
            egui::Frame::group(ui.style())
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(title).strong());
                        ui.weak(filename);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("⬇ Download").clicked() {
                                self.request_artifact_download(filename);
                            }
                            let previewing = matches!(
                                self.artifact_previews.get(filename),
                                Some(ArtifactPreviewState::Loading)
                            );
                            if ui
                                .add_enabled(!previewing, egui::Button::new("👁 Preview"))
                                .clicked()
                            {
                                self.request_artifact_preview(filename);
                                self.expanded_artifact = Some(filename.to_string());
                            }
                        });
                    });

                    if self.expanded_artifact.as_deref() == Some(filename) {
                        self.show_artifact_preview(ui, filename);
                    }
                });
        }
    }

    fn show_artifact_preview(&mut self, ui: &mut egui::Ui, filename: &str) {
        let state = self
            .artifact_previews
            .entry(filename.to_string())
            .or_insert(ArtifactPreviewState::NotRequested);

        match state {
            ArtifactPreviewState::NotRequested => {}
            ArtifactPreviewState::Loading => {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new().size(16.0));
                    ui.weak("Fetching chart...");
                });
            }
            ArtifactPreviewState::Ready { image, texture } => {
                if texture.is_none() {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    *texture = Some(ui.ctx().load_texture(
                        format!("artifact-preview:{filename}"),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                if let Some(texture) = texture {
                    let size = egui::vec2(image.width as f32, image.height as f32);
                    ui.image((texture.id(), size));
                }
            }
            ArtifactPreviewState::Error(reason) => {
                ui.label(egui::RichText::new(reason.as_str()).color(ERROR_COLOR).small());
            }
        }
    }

    fn show_snackbar(&mut self, ctx: &egui::Context) {
        let Some(notification) = self.submission.notification().cloned() else {
            return;
        };
        if !notification.is_visible() {
            return;
        }

        let (fill, stroke) = match notification.severity() {
            Severity::Info => (INFO_COLOR.gamma_multiply(0.25), INFO_COLOR),
            Severity::Success => (SUCCESS_COLOR.gamma_multiply(0.25), SUCCESS_COLOR),
            Severity::Error => (ERROR_COLOR.gamma_multiply(0.25), ERROR_COLOR),
        };

        let response = egui::Area::new(egui::Id::new("notification_snackbar"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -36.0))
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(fill)
                    .stroke(egui::Stroke::new(1.0, stroke))
                    .rounding(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(notification.message()).strong());
                            if ui.button("Close").clicked() {
                                self.submission
                                    .dismiss_notification(DismissTrigger::Explicit);
                            }
                        });
                    });
            });

        // A click anywhere else is a click-away, which the notification
        // ignores; only the explicit close above hides it.
        let snackbar_rect = response.response.rect;
        let clicked_away = ctx.input(|i| {
            i.pointer.any_click()
                && i.pointer
                    .interact_pos()
                    .map(|pos| !snackbar_rect.contains(pos))
                    .unwrap_or(false)
        });
        if clicked_away {
            self.submission
                .dismiss_notification(DismissTrigger::ClickAway);
        }
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }

        egui::Window::new("Settings")
            .open(&mut self.settings_open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Theme preset");
                egui::ComboBox::from_id_source("theme_preset")
                    .selected_text(self.theme.preset.label())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.theme.preset,
                            ThemePreset::MidnightMarket,
                            ThemePreset::MidnightMarket.label(),
                        );
                        ui.selectable_value(
                            &mut self.theme.preset,
                            ThemePreset::EguiLight,
                            ThemePreset::EguiLight.label(),
                        );
                    });

                ui.separator();
                ui.label("Accent color");
                ui.color_edit_button_srgba(&mut self.theme.accent_color);
                ui.add(
                    egui::Slider::new(&mut self.theme.text_scale, 0.8..=1.4)
                        .text("Text scale")
                        .step_by(0.05),
                );

                if ui.button("Reset to defaults").clicked() {
                    self.theme = ThemeSettings::midnight_default();
                }
            });
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        self.show_header(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_status_banner(ui);
                self.show_symbol_entry(ui);
                ui.add_space(10.0);
                self.show_results(ui);
            });
        });

        self.show_snackbar(ctx);
        self.show_settings_window(ctx);

        if self.submission.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedAppSettings::from_runtime(self.theme);
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

/// Most prediction series arrive as an array of closes; surface the last one.
fn summarize_prediction(value: &Value) -> String {
    match value {
        Value::Array(series) => series
            .iter()
            .rev()
            .find_map(Value::as_f64)
            .map(|close| format!("{close:.2}"))
            .unwrap_or_else(|| "—".to_string()),
        Value::Number(number) => number
            .as_f64()
            .map(|close| format!("{close:.2}"))
            .unwrap_or_else(|| number.to_string()),
        Value::Object(map) => map
            .get("predicted_close")
            .or_else(|| map.get("close"))
            .map(summarize_prediction)
            .unwrap_or_else(|| "—".to_string()),
        _ => "—".to_string(),
    }
}

fn format_metric_value(value: &Value) -> String {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(|n| format!("{n:.4}"))
            .unwrap_or_else(|| number.to_string()),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => "—".to_string(),
        other => other.to_string(),
    }
}

pub fn start_backend_bridge(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match HttpPredictionClient::new(&settings.api_base_url) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!(
                            "backend worker startup failure: invalid prediction service URL: {err:#}"
                        ),
                    )));
                    tracing::error!("invalid prediction service URL: {err:#}");
                    return;
                }
            };
            let download_dir = config::resolve_download_dir(&settings);
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Predict { symbols } => {
                        tracing::info!(count = symbols.len(), "backend: predict");
                        let outcome = run_submission(&client, &symbols).await;
                        if let Err(err) = &outcome {
                            tracing::error!("backend: predict failed: {err}");
                        }
                        // Every started submission is settled, success or not;
                        // this is what releases the loading indicator.
                        let _ = ui_tx.try_send(UiEvent::PredictionSettled { outcome });
                    }
                    BackendCommand::FetchArtifactPreview { filename } => {
                        tracing::info!(%filename, "backend: fetch_artifact_preview");
                        match client.fetch_artifact(&filename).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => {
                                    let _ = ui_tx.try_send(UiEvent::ArtifactPreviewLoaded {
                                        filename,
                                        image,
                                    });
                                }
                                Err(reason) => {
                                    let _ = ui_tx.try_send(UiEvent::ArtifactPreviewFailed {
                                        filename,
                                        reason,
                                    });
                                }
                            },
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::ArtifactPreviewFailed {
                                    filename,
                                    reason: format!("Failed to download preview: {err}"),
                                });
                            }
                        }
                    }
                    BackendCommand::DownloadArtifact { filename } => {
                        tracing::info!(%filename, "backend: download_artifact");
                        match client.fetch_artifact(&filename).await {
                            Ok(bytes) => {
                                let save_path = rfd::FileDialog::new()
                                    .set_directory(&download_dir)
                                    .set_file_name(&filename)
                                    .save_file();
                                if let Some(path) = save_path {
                                    match tokio::fs::write(&path, bytes).await {
                                        Ok(()) => {
                                            let _ = ui_tx.try_send(UiEvent::ArtifactSaved {
                                                filename,
                                                path,
                                            });
                                        }
                                        Err(err) => {
                                            let _ = ui_tx.try_send(UiEvent::Error(
                                                UiError::from_message(
                                                    UiErrorContext::General,
                                                    format!("Failed to save artifact: {err}"),
                                                ),
                                            ));
                                        }
                                    }
                                }
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::ArtifactFetch,
                                    format!("Failed to download artifact: {err}"),
                                )));
                            }
                        }
                    }
                }
            }
        });
    });
}

fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| format!("could not decode chart image: {err}"))?;

    let max_dimension = 640.0_f32;
    let (orig_w, orig_h) = decoded.dimensions();
    let scale = (max_dimension / (orig_w.max(orig_h) as f32)).min(1.0);
    let resized = if scale < 1.0 {
        decoded.resize(
            (orig_w as f32 * scale).max(1.0) as u32,
            (orig_h as f32 * scale).max(1.0) as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    Ok(PreviewImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{format_metric_value, service_environment_label, summarize_prediction};

    #[test]
    fn prediction_series_surfaces_last_numeric_close() {
        assert_eq!(summarize_prediction(&json!([148.1, 149.9, 151.25])), "151.25");
        assert_eq!(summarize_prediction(&json!(150.0)), "150.00");
        assert_eq!(summarize_prediction(&json!([])), "—");
    }

    #[test]
    fn prediction_objects_use_predicted_close_field() {
        assert_eq!(
            summarize_prediction(&json!({ "predicted_close": 101.5, "horizon": 7 })),
            "101.50"
        );
        assert_eq!(summarize_prediction(&json!({ "horizon": 7 })), "—");
    }

    #[test]
    fn metric_values_format_compactly() {
        assert_eq!(format_metric_value(&json!(0.98765432)), "0.9877");
        assert_eq!(format_metric_value(&json!("rmse")), "rmse");
        assert_eq!(format_metric_value(&json!(null)), "—");
    }

    #[test]
    fn local_service_urls_are_labeled_local() {
        assert_eq!(service_environment_label("http://127.0.0.1:5000"), "Local");
        assert_eq!(
            service_environment_label("https://predict.example.com"),
            "Production"
        );
    }
}
