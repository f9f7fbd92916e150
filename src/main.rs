use anyhow::Context;
use eframe::egui;
use log::info;
use poll_desktop::config::AppConfig;
use poll_desktop::gui::state::AppState;
use poll_desktop::gui::PollApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!("Using poll API at {}", config.api_base);

    // Network tasks run here; the UI thread only drains their results.
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let state = AppState::new(&config, runtime.handle().clone())
        .context("failed to build HTTP client")?;

    let builder = egui::ViewportBuilder::default()
        .with_title(config.window_title.clone())
        .with_inner_size(egui::vec2(720.0, 640.0));

    let options = eframe::NativeOptions {
        viewport: builder,
        ..Default::default()
    };

    let app_name = config.window_title.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(move |cc| Ok(Box::new(PollApp::new(cc, &config, state)))),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {}", e))?;

    info!("Shutting down");
    Ok(())
}
