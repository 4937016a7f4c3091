//! Theme presets and egui style application.

use std::collections::BTreeMap;

use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreset {
    MidnightMarket,
    EguiLight,
}

impl ThemePreset {
    pub fn label(self) -> &'static str {
        match self {
            ThemePreset::MidnightMarket => "Midnight Market",
            ThemePreset::EguiLight => "Egui Light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSettings {
    pub preset: ThemePreset,
    pub accent_color: egui::Color32,
    pub text_scale: f32,
}

impl ThemeSettings {
    pub fn midnight_default() -> Self {
        Self {
            preset: ThemePreset::MidnightMarket,
            accent_color: egui::Color32::from_rgb(144, 202, 249),
            text_scale: 1.0,
        }
    }
}

pub const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(102, 187, 106);
pub const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(244, 67, 54);
pub const INFO_COLOR: egui::Color32 = egui::Color32::from_rgb(144, 202, 249);
pub const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 167, 38);

pub fn visuals_for_theme(theme: ThemeSettings) -> egui::Visuals {
    match theme.preset {
        ThemePreset::MidnightMarket => {
            let mut visuals = egui::Visuals::dark();
            visuals.panel_fill = egui::Color32::from_rgb(10, 25, 41);
            visuals.window_fill = egui::Color32::from_rgb(30, 42, 58);
            visuals.extreme_bg_color = egui::Color32::from_rgb(16, 32, 50);
            visuals.faint_bg_color = egui::Color32::from_rgb(30, 42, 58);
            visuals.selection.bg_fill = theme.accent_color.gamma_multiply(0.4);
            visuals.hyperlink_color = theme.accent_color;
            visuals
        }
        ThemePreset::EguiLight => egui::Visuals::light(),
    }
}

fn scaled_text_styles(scale: f32) -> BTreeMap<egui::TextStyle, egui::FontId> {
    let mut styles = egui::Style::default().text_styles;
    for font_id in styles.values_mut() {
        font_id.size = (font_id.size * scale).max(8.0);
    }
    styles
}

pub fn apply_theme(ctx: &egui::Context, theme: ThemeSettings) {
    let mut style = (*ctx.style()).clone();
    style.visuals = visuals_for_theme(theme);
    style.text_styles = scaled_text_styles(theme.text_scale.clamp(0.8, 1.4));
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    ctx.set_style(style);
}
