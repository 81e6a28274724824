pub mod config;
pub mod messages;
pub mod session;
pub mod ui;
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceChatError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Voice client not initialized: {0}")]
    ClientUninitialized(String),

    #[error("Connection closed (code {code}): {reason}")]
    ConnectionClosed { code: u16, reason: String },

    #[error("Connection error: {0}")]
    ConnectionErrored(String),

    #[error("Failed to start session: {0}")]
    StartFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),
}

/// Banner text shown when the microphone probe fails.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Microphone access denied. Please allow microphone access and try again.";

/// Banner text shown for any transport error reported by the client.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Connection error. Please check your network and try again.";

impl VoiceChatError {
    /// Check if this error is recoverable without restarting the app
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user can grant access and press start again
            VoiceChatError::PermissionDenied => true,
            // The client is built again on the next start
            VoiceChatError::ClientUninitialized(_) => true,
            VoiceChatError::ConnectionClosed { .. } => true,
            VoiceChatError::ConnectionErrored(_) => true,
            VoiceChatError::StartFailed(_) => true,
            VoiceChatError::ConfigError(_) => false,
            VoiceChatError::AudioDeviceError(_) => false,
        }
    }

    /// Get the banner string for this error
    pub fn user_message(&self) -> String {
        match self {
            VoiceChatError::PermissionDenied => PERMISSION_DENIED_MESSAGE.to_string(),
            VoiceChatError::ClientUninitialized(_) => {
                "Voice client is not ready. Please check the configuration and try again.".to_string()
            }
            VoiceChatError::ConnectionClosed { code, reason } => {
                if reason.is_empty() {
                    format!("Connection closed unexpectedly (code {}).", code)
                } else {
                    format!("Connection closed unexpectedly (code {}): {}", code, reason)
                }
            }
            VoiceChatError::ConnectionErrored(_) => CONNECTION_ERROR_MESSAGE.to_string(),
            VoiceChatError::StartFailed(detail) => {
                format!("Could not start the voice session: {}", detail)
            }
            VoiceChatError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            VoiceChatError::AudioDeviceError(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VoiceChatError>;
