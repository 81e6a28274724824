//! Application state management
//!
//! Wraps the voice session together with purely presentational state.

use crate::session::VoiceSession;
use std::collections::VecDeque;
use tracing::{info, warn};

/// Central application state
pub struct AppState {
    /// The voice session driving the transcript
    pub session: VoiceSession,

    /// Current text input
    pub input_text: String,

    /// Whether to show the debug panel
    pub show_debug_panel: bool,

    /// Current frame rate
    pub fps: f32,

    /// Frame time tracking for FPS
    frame_times: VecDeque<f64>,
}

impl AppState {
    pub fn new(session: VoiceSession) -> Self {
        Self {
            session,
            input_text: String::new(),
            show_debug_panel: false,
            fps: 0.0,
            frame_times: VecDeque::with_capacity(60),
        }
    }

    /// Update FPS calculation
    pub fn update_fps(&mut self, delta_time: f64) {
        self.frame_times.push_back(delta_time);
        if self.frame_times.len() > 60 {
            self.frame_times.pop_front();
        }

        if !self.frame_times.is_empty() {
            let avg_time: f64 =
                self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64;
            self.fps = if avg_time > 0.0 { 1.0 / avg_time as f32 } else { 0.0 };
        }
    }

    /// Echo the typed text into the transcript and clear the input
    pub fn send_message(&mut self) {
        if self.session.submit_text(&self.input_text) {
            self.input_text.clear();
        }
    }

    /// Start or stop the voice session
    pub fn toggle_session(&mut self) {
        // Failures are already on the banner
        match self.session.toggle() {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => info!("[UI] Session not started: {}", e),
            Err(e) => warn!("[UI] Session toggle failed: {}", e),
        }
    }

    pub fn can_send(&self) -> bool {
        !self.input_text.trim().is_empty()
    }
}
