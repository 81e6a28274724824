//! Event bridge: maps vendor client events onto the session model
//!
//! Each event is one transition on `SessionModel`. The bridge never retries
//! or reconnects; a dropped connection needs a user-initiated restart.

use crate::messages::Message;
use crate::session::client::{ClientEvent, NORMAL_CLOSE_CODE};
use crate::session::state::{ConnectionPhase, SessionModel};
use crate::VoiceChatError;
use tracing::{debug, info, warn};

/// Stateless mapper from `ClientEvent` to model transitions
#[derive(Debug, Default, Clone, Copy)]
pub struct EventBridge;

impl EventBridge {
    pub fn new() -> Self {
        Self
    }

    /// Apply one event to the model
    pub fn apply(&self, model: &mut SessionModel, event: ClientEvent) {
        match event {
            ClientEvent::Open => {
                info!("[BRIDGE] Connection open");
                model.phase = ConnectionPhase::Open;
                model.clear_error();
                model.log.push("connection open");
            }
            ClientEvent::Ready => {
                info!("[BRIDGE] Service ready");
                model.phase = ConnectionPhase::Ready;
                model.log.push("service ready");
            }
            ClientEvent::Audio(bytes) => {
                model.audio_chunks += 1;
                debug!(
                    "[BRIDGE] Audio payload: {} bytes (#{})",
                    bytes.len(),
                    model.audio_chunks
                );
            }
            ClientEvent::UserAudioReady => {
                debug!("[BRIDGE] User audio ready");
                model.log.push("user audio ready");
            }
            ClientEvent::Transcript { text, is_final } => {
                if !is_final {
                    model.partial_transcript = text;
                } else if !text.trim().is_empty() {
                    debug!("[BRIDGE] Final transcript: {}", text);
                    model.append(Message::user(text));
                    model.partial_transcript.clear();
                }
            }
            ClientEvent::ResponseText { text, is_final } => {
                if is_final {
                    debug!("[BRIDGE] Final response: {}", text);
                    model.append(Message::agent(text));
                }
            }
            ClientEvent::SessionEnded => {
                info!("[BRIDGE] Session ended by service");
                model.end_session();
                model.log.push("session ended");
            }
            ClientEvent::Close { code, reason } => {
                model.end_session();
                model.phase = ConnectionPhase::Closed;
                if code == NORMAL_CLOSE_CODE {
                    info!("[BRIDGE] Connection closed normally");
                    model.log.push("connection closed");
                } else {
                    warn!("[BRIDGE] Connection closed: code={} reason={}", code, reason);
                    model.set_error(VoiceChatError::ConnectionClosed { code, reason }.user_message());
                }
            }
            ClientEvent::Error(detail) => {
                warn!("[BRIDGE] Connection error: {}", detail);
                model.end_session();
                model.phase = ConnectionPhase::Errored;
                model.log.push(format!("transport error: {}", detail));
                model.set_error(VoiceChatError::ConnectionErrored(detail).user_message());
            }
        }
    }
}
