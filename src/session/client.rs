//! Handle to the vendor voice client
//!
//! The vendor client is abstracted behind `VoiceClient`. A
//! `SessionClientHandle` builds it lazily (at most once) from a factory and
//! owns it until the handle is dropped.

use crate::{Result, VoiceChatError};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Close code for a normal, client- or server-initiated shutdown
pub const NORMAL_CLOSE_CODE: u16 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub agent_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartMetadata {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(rename = "useOpenAIProxy")]
    pub use_openai_proxy: bool,
}

/// Payload sent to the service when a session starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConfig {
    pub agent: AgentRef,
    pub metadata: StartMetadata,
    pub include_metadata_in_prompt: bool,
}

impl StartConfig {
    pub fn new(agent_id: &str, api_key: &str, use_openai_proxy: bool) -> Self {
        Self {
            agent: AgentRef {
                agent_id: agent_id.to_string(),
            },
            metadata: StartMetadata {
                api_key: api_key.to_string(),
                use_openai_proxy,
            },
            include_metadata_in_prompt: true,
        }
    }
}

/// Events fired by the vendor client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Transport opened
    Open,
    /// Service is ready to receive audio
    Ready,
    /// Agent speech audio
    Audio(Vec<u8>),
    /// Agent response text
    ResponseText { text: String, is_final: bool },
    /// User speech recognition result
    Transcript { text: String, is_final: bool },
    /// Service has started consuming user audio
    UserAudioReady,
    /// Service ended the session
    SessionEnded,
    /// Transport closed
    Close { code: u16, reason: String },
    /// Transport failure
    Error(String),
}

impl ClientEvent {
    /// Event name as the vendor reports it
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Open => "open",
            ClientEvent::Ready => "ready",
            ClientEvent::Audio(_) => "audio",
            ClientEvent::ResponseText { .. } => "responsetext",
            ClientEvent::Transcript { .. } => "transcript",
            ClientEvent::UserAudioReady => "useraudioready",
            ClientEvent::SessionEnded => "sessionended",
            ClientEvent::Close { .. } => "close",
            ClientEvent::Error(_) => "error",
        }
    }
}

/// A vendor client able to run one session at a time.
///
/// Events are delivered through the sender handed to the factory that built
/// the client.
pub trait VoiceClient: Send {
    /// Begin a session
    fn start(&mut self, config: &StartConfig) -> Result<()>;

    /// End the active session. Must be a no-op when none is active.
    fn stop(&mut self);

    /// Whether a session is currently running
    fn is_active(&self) -> bool;
}

/// Builds the vendor client, wiring its events into the given sender
pub type ClientFactory =
    Box<dyn FnMut(Sender<ClientEvent>) -> Result<Box<dyn VoiceClient>> + Send>;

/// Lazily-built, exclusively-owned vendor client
pub struct SessionClientHandle {
    factory: ClientFactory,
    client: Option<Box<dyn VoiceClient>>,
}

impl SessionClientHandle {
    pub fn new(factory: ClientFactory) -> Self {
        Self {
            factory,
            client: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.client.as_ref().is_some_and(|c| c.is_active())
    }

    /// Build the client if it does not exist yet.
    ///
    /// A failed build leaves the handle uninitialized so a later call can
    /// try again.
    pub fn initialize(&mut self, events: Sender<ClientEvent>) -> Result<()> {
        if self.client.is_some() {
            return Ok(());
        }

        match (self.factory)(events) {
            Ok(client) => {
                info!("[SESSION] Voice client initialized");
                self.client = Some(client);
                Ok(())
            }
            Err(e) => {
                warn!("[SESSION] Voice client initialization failed: {}", e);
                Err(VoiceChatError::ClientUninitialized(e.to_string()))
            }
        }
    }

    /// Start a session on the initialized client
    pub fn start(&mut self, config: &StartConfig) -> Result<()> {
        let client = self.client.as_mut().ok_or_else(|| {
            VoiceChatError::ClientUninitialized("start called before initialization".into())
        })?;

        client.start(config).map_err(|e| match e {
            VoiceChatError::StartFailed(_) => e,
            other => VoiceChatError::StartFailed(other.to_string()),
        })
    }

    /// Stop the active session, if any
    pub fn stop(&mut self) {
        match self.client.as_mut() {
            Some(client) if client.is_active() => {
                debug!("[SESSION] Stopping active client session");
                client.stop();
            }
            _ => debug!("[SESSION] Stop requested with no active session"),
        }
    }
}

impl Drop for SessionClientHandle {
    fn drop(&mut self) {
        if self.is_active() {
            info!("[SESSION] Disposing handle with an active session");
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls {
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    struct FakeClient {
        calls: Arc<Calls>,
        active: bool,
        fail_start: bool,
    }

    impl VoiceClient for FakeClient {
        fn start(&mut self, _config: &StartConfig) -> Result<()> {
            if self.fail_start {
                return Err(VoiceChatError::ConnectionErrored("refused".into()));
            }
            self.calls.starts.fetch_add(1, Ordering::SeqCst);
            self.active = true;
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.stops.fetch_add(1, Ordering::SeqCst);
            self.active = false;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn handle_with(calls: Arc<Calls>, fail_start: bool, builds: Arc<Mutex<usize>>) -> SessionClientHandle {
        SessionClientHandle::new(Box::new(move |_events| {
            *builds.lock() += 1;
            Ok(Box::new(FakeClient {
                calls: Arc::clone(&calls),
                active: false,
                fail_start,
            }) as Box<dyn VoiceClient>)
        }))
    }

    fn config() -> StartConfig {
        StartConfig::new("agent", "key", false)
    }

    #[test]
    fn test_start_before_initialize_fails() {
        let calls = Arc::new(Calls::default());
        let mut handle = handle_with(Arc::clone(&calls), false, Arc::new(Mutex::new(0)));

        let result = handle.start(&config());
        assert!(matches!(result, Err(VoiceChatError::ClientUninitialized(_))));
        assert_eq!(calls.starts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_initialize_builds_once() {
        let builds = Arc::new(Mutex::new(0));
        let mut handle = handle_with(Arc::new(Calls::default()), false, Arc::clone(&builds));
        let (tx, _rx) = unbounded();

        handle.initialize(tx.clone()).unwrap();
        handle.initialize(tx).unwrap();
        assert_eq!(*builds.lock(), 1);
        assert!(handle.is_initialized());
    }

    #[test]
    fn test_failed_factory_leaves_uninitialized() {
        let mut handle = SessionClientHandle::new(Box::new(|_events| {
            Err(VoiceChatError::ConfigError("missing key".into()))
        }));
        let (tx, _rx) = unbounded();

        let result = handle.initialize(tx);
        assert!(matches!(result, Err(VoiceChatError::ClientUninitialized(_))));
        assert!(!handle.is_initialized());
    }

    #[test]
    fn test_start_failure_is_wrapped() {
        let mut handle = handle_with(Arc::new(Calls::default()), true, Arc::new(Mutex::new(0)));
        let (tx, _rx) = unbounded();
        handle.initialize(tx).unwrap();

        assert!(matches!(
            handle.start(&config()),
            Err(VoiceChatError::StartFailed(_))
        ));
    }

    #[test]
    fn test_stop_without_session_is_noop() {
        let calls = Arc::new(Calls::default());
        let mut handle = handle_with(Arc::clone(&calls), false, Arc::new(Mutex::new(0)));
        handle.stop();

        let (tx, _rx) = unbounded();
        handle.initialize(tx).unwrap();
        handle.stop();
        assert_eq!(calls.stops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_stops_active_session() {
        let calls = Arc::new(Calls::default());
        {
            let mut handle = handle_with(Arc::clone(&calls), false, Arc::new(Mutex::new(0)));
            let (tx, _rx) = unbounded();
            handle.initialize(tx).unwrap();
            handle.start(&config()).unwrap();
            assert!(handle.is_active());
        }
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_start_config_wire_shape() {
        let value = serde_json::to_value(StartConfig::new("a1", "k1", true)).unwrap();
        assert_eq!(value["agent"]["agent_id"], "a1");
        assert_eq!(value["metadata"]["apiKey"], "k1");
        assert_eq!(value["metadata"]["useOpenAIProxy"], true);
        assert_eq!(value["include_metadata_in_prompt"], true);
    }
}
