//! Voice Chat - desktop client for a hosted voice agent

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_chat::config::VoiceConfig;
use voice_chat::session::VoiceSession;
use voice_chat::ui::VoiceChatApp;

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voice_chat=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Voice Chat");
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        // A missing .env is normal; the environment may already be set
        Err(e) => debug!("No .env loaded: {}", e),
    }

    let config = VoiceConfig::from_env();
    if let Err(e) = config.validate() {
        // Keep the UI up; starting a session will report it on the banner
        warn!("Configuration incomplete: {}", e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("voice-chat-net")
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let session = VoiceSession::connect(config, runtime.handle().clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([400.0, 320.0])
            .with_title("Voice Chat"),
        ..Default::default()
    };

    eframe::run_native(
        "Voice Chat",
        options,
        Box::new(move |cc| Ok(Box::new(VoiceChatApp::new(cc, session)))),
    )
    .map_err(|e| anyhow!("UI error: {}", e))?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}
