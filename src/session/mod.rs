//! Voice session: permission guard, client handle and event bridge
//!
//! `VoiceSession` is owned by the UI and driven from its frame loop:
//! controls call `start`/`stop`/`submit_text`, and `poll_events` drains
//! whatever the client reported since the last frame.

pub mod bridge;
pub mod client;
pub mod permission;
pub mod state;
pub mod websocket;

pub use bridge::EventBridge;
pub use client::{
    ClientEvent, ClientFactory, SessionClientHandle, StartConfig, VoiceClient, NORMAL_CLOSE_CODE,
};
pub use permission::{MicrophoneProbe, PermissionGuard, PermissionState};
pub use state::{ConnectionPhase, EventLog, SessionModel, SessionState};
pub use websocket::WebSocketClient;

use crate::config::VoiceConfig;
use crate::messages::Message;
use crate::utils::channels::EventChannel;
use crate::Result;
use tracing::{info, warn};

pub struct VoiceSession {
    model: SessionModel,
    bridge: EventBridge,
    permission: PermissionGuard,
    handle: SessionClientHandle,
    channel: EventChannel,
    start_config: StartConfig,
}

impl VoiceSession {
    pub fn new(
        start_config: StartConfig,
        permission: PermissionGuard,
        factory: ClientFactory,
    ) -> Self {
        Self {
            model: SessionModel::new(),
            bridge: EventBridge::new(),
            permission,
            handle: SessionClientHandle::new(factory),
            channel: EventChannel::new(),
            start_config,
        }
    }

    /// Session talking to the hosted service over WebSocket
    pub fn connect(config: VoiceConfig, runtime: tokio::runtime::Handle) -> Self {
        let start_config = config.start_config();
        let factory: ClientFactory = Box::new(move |events| {
            let client = WebSocketClient::new(&config, runtime.clone(), events)?;
            Ok(Box::new(client) as Box<dyn VoiceClient>)
        });
        Self::new(start_config, PermissionGuard::default(), factory)
    }

    pub fn model(&self) -> &SessionModel {
        &self.model
    }

    pub fn is_listening(&self) -> bool {
        self.model.is_listening()
    }

    pub fn permission(&self) -> PermissionState {
        self.permission.state()
    }

    /// Begin a session.
    ///
    /// Every failure is also written to the model's error banner.
    pub fn start(&mut self) -> Result<()> {
        if self.model.is_listening() {
            return Ok(());
        }

        if let Err(e) = self.permission.check() {
            self.model.set_error(e.user_message());
            return Err(e);
        }

        if let Err(e) = self.handle.initialize(self.channel.sender()) {
            self.model.set_error(e.user_message());
            return Err(e);
        }

        if let Err(e) = self.handle.start(&self.start_config) {
            warn!("[SESSION] Start failed: {}", e);
            self.model.set_error(e.user_message());
            return Err(e);
        }

        info!(
            "[SESSION] Session started for agent {}",
            self.start_config.agent.agent_id
        );
        self.model.begin_session();
        self.model.log.push("session started");
        Ok(())
    }

    /// End the current session. Safe to call at any time.
    pub fn stop(&mut self) {
        self.handle.stop();
        if self.model.is_listening() {
            info!("[SESSION] Session stopped");
            self.model.log.push("session stopped");
        }
        self.model.end_session();
    }

    /// Start when idle, stop when listening
    pub fn toggle(&mut self) -> Result<()> {
        if self.model.is_listening() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Append typed text as a user message. It is not sent to the agent.
    pub fn submit_text(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.model.append(Message::user(text));
        true
    }

    /// Apply every event the client reported since the last call.
    ///
    /// An event that ends the session also stops the client, and whatever
    /// that session queued after it is discarded. Returns the number of
    /// events applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        for event in self.channel.drain() {
            let was_listening = self.model.is_listening();
            self.bridge.apply(&mut self.model, event);
            applied += 1;

            if was_listening && !self.model.is_listening() {
                self.handle.stop();
                break;
            }
        }
        applied
    }

    /// Stop any active session before teardown
    pub fn shutdown(&mut self) {
        if self.handle.is_active() {
            info!("[SESSION] Shutting down with an active session");
        }
        self.stop();
    }
}
