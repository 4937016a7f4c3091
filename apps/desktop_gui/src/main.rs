use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::{PersistedAppSettings, PredictorApp, SETTINGS_STORAGE_KEY};

/// Desktop front end for the stock price prediction service.
#[derive(Debug, Parser)]
#[command(name = "stock-predictor", version)]
struct Args {
    /// Prediction service base URL (overrides config file and environment).
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let settings = config::load_settings(args.api_url);
    tracing::info!(api_base_url = %settings.api_base_url, "starting desktop predictor");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Stock Price Predictor")
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([860.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Stock Price Predictor",
        options,
        Box::new(move |cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedAppSettings>(&text).ok())
            });
            Ok(Box::new(PredictorApp::new(
                settings,
                cmd_tx,
                ui_rx,
                persisted_settings,
            )))
        }),
    )
}
