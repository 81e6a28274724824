//! Configuration for the voice client
//!
//! Endpoint, keys and agent selection come from the process environment
//! (optionally seeded from a `.env` file by the binary).

use crate::session::client::StartConfig;
use crate::{Result, VoiceChatError};

pub const ENV_PUBLIC_KEY: &str = "VOICE_CHAT_PUBLIC_KEY";
pub const ENV_ENDPOINT: &str = "VOICE_CHAT_ENDPOINT";
pub const ENV_API_KEY: &str = "VOICE_CHAT_API_KEY";
pub const ENV_AGENT_ID: &str = "VOICE_CHAT_AGENT_ID";
pub const ENV_USE_OPENAI_PROXY: &str = "VOICE_CHAT_USE_OPENAI_PROXY";

/// Connection and agent configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoiceConfig {
    /// Public key presented to the hosted service when connecting
    pub public_key: String,

    /// WebSocket endpoint of the hosted service
    pub endpoint: String,

    /// Credential forwarded in the start metadata
    pub api_key: String,

    /// Agent to talk to
    pub agent_id: String,

    /// Ask the service to route through its OpenAI proxy
    pub use_openai_proxy: bool,
}

impl VoiceConfig {
    /// Read the configuration from the environment.
    ///
    /// Missing variables become empty strings; `validate` reports them.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        Self {
            public_key: get(ENV_PUBLIC_KEY),
            endpoint: get(ENV_ENDPOINT),
            api_key: get(ENV_API_KEY),
            agent_id: get(ENV_AGENT_ID),
            use_openai_proxy: parse_flag(&get(ENV_USE_OPENAI_PROXY)),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = key.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn with_openai_proxy(mut self, enabled: bool) -> Self {
        self.use_openai_proxy = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(VoiceChatError::ConfigError(format!(
                "{} is not set",
                ENV_ENDPOINT
            )));
        }
        if !(self.endpoint.starts_with("ws://") || self.endpoint.starts_with("wss://")) {
            return Err(VoiceChatError::ConfigError(format!(
                "endpoint must be a ws:// or wss:// URL, got {}",
                self.endpoint
            )));
        }
        if self.public_key.is_empty() {
            return Err(VoiceChatError::ConfigError(format!(
                "{} is not set",
                ENV_PUBLIC_KEY
            )));
        }
        if self.agent_id.is_empty() {
            return Err(VoiceChatError::ConfigError(format!(
                "{} is not set",
                ENV_AGENT_ID
            )));
        }
        Ok(())
    }

    /// Build the start payload sent when a session begins
    pub fn start_config(&self) -> StartConfig {
        StartConfig::new(&self.agent_id, &self.api_key, self.use_openai_proxy)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
