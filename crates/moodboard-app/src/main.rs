//! Main application entry point (native).

use moodboard_app::{AppConfig, MoodboardApp, ShortcutRegistry};

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("Starting Moodboard");

    let config = AppConfig::load();
    ShortcutRegistry::log_all();

    let title = config.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([640.0, 480.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(MoodboardApp::new(cc, config)))),
    )
}
