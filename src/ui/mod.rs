//! egui/eframe user interface for the voice chat client

mod app;
pub mod components;
mod state;
mod theme;

pub use app::VoiceChatApp;
pub use components::{DebugPanel, InputBar, MessageList, StatusBar};
pub use state::AppState;
pub use theme::Theme;
