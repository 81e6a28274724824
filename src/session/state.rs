//! Session state mirrored into the UI
//!
//! `SessionModel` is the single source of truth the presentation layer reads.
//! It is only mutated on the UI thread, by `VoiceSession` and `EventBridge`.

use crate::messages::{Message, MessageStorage};
use std::collections::VecDeque;

const LOG_CAPACITY: usize = 100;

/// Whether a voice session is running
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No active session
    #[default]
    Idle,
    /// A session is active and the agent is listening
    Listening,
}

impl SessionState {
    pub fn is_listening(&self) -> bool {
        matches!(self, SessionState::Listening)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Listening => write!(f, "Listening"),
        }
    }
}

/// Lifecycle of the connection to the hosted service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    /// Start requested, socket not open yet
    Connecting,
    Open,
    /// Service reported it is ready for audio
    Ready,
    Closed,
    Errored,
}

impl ConnectionPhase {
    /// Open or ready
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionPhase::Open | ConnectionPhase::Ready)
    }
}

impl std::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionPhase::Disconnected => write!(f, "Disconnected"),
            ConnectionPhase::Connecting => write!(f, "Connecting"),
            ConnectionPhase::Open => write!(f, "Open"),
            ConnectionPhase::Ready => write!(f, "Ready"),
            ConnectionPhase::Closed => write!(f, "Closed"),
            ConnectionPhase::Errored => write!(f, "Errored"),
        }
    }
}

/// Bounded log of recent session events for the debug panel
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: VecDeque<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        if self.entries.len() >= LOG_CAPACITY {
            self.entries.pop_front();
        }
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.entries.push_back(format!("{} {}", stamp, entry.into()));
    }

    pub fn entries(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the presentation layer renders
#[derive(Clone, Debug, Default)]
pub struct SessionModel {
    /// Finalized utterances
    pub messages: MessageStorage,
    /// In-progress recognition result
    pub partial_transcript: String,
    pub session: SessionState,
    pub phase: ConnectionPhase,
    /// Banner text, if any
    pub error: Option<String>,
    /// Number of audio payloads received this process
    pub audio_chunks: u64,
    pub log: EventLog,
}

impl SessionModel {
    pub fn new() -> Self {
        Self {
            log: EventLog::new(),
            ..Default::default()
        }
    }

    pub fn is_listening(&self) -> bool {
        self.session.is_listening()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        let error = error.into();
        self.log.push(format!("error: {}", error));
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn append(&mut self, message: Message) {
        self.messages.add(message);
    }

    // === State transitions ===

    /// A start request was accepted by the client
    pub fn begin_session(&mut self) {
        self.session = SessionState::Listening;
        self.phase = ConnectionPhase::Connecting;
        self.partial_transcript.clear();
    }

    /// The session is over, for whatever reason
    pub fn end_session(&mut self) {
        self.session = SessionState::Idle;
        self.partial_transcript.clear();
    }
}
