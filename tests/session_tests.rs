//! Session lifecycle tests
//!
//! These drive a `VoiceSession` against a scripted client so that event
//! sequences can be replayed deterministically.

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use voice_chat::messages::Role;
use voice_chat::session::{
    ClientEvent, ClientFactory, ConnectionPhase, MicrophoneProbe, PermissionGuard, SessionState,
    StartConfig, VoiceClient, VoiceSession,
};
use voice_chat::{VoiceChatError, CONNECTION_ERROR_MESSAGE, PERMISSION_DENIED_MESSAGE};

/// Shared record of what the client was asked to do
#[derive(Default)]
struct Recorder {
    builds: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
    configs: Mutex<Vec<StartConfig>>,
    events: Mutex<Option<Sender<ClientEvent>>>,
}

impl Recorder {
    fn emit(&self, event: ClientEvent) {
        self.events
            .lock()
            .as_ref()
            .expect("client was never built")
            .send(event)
            .unwrap();
    }
}

/// Like the WebSocket client, it stays active until told to stop, whatever
/// events the service sends, and refuses to start twice.
struct ScriptedClient {
    recorder: Arc<Recorder>,
    active: bool,
}

impl VoiceClient for ScriptedClient {
    fn start(&mut self, config: &StartConfig) -> voice_chat::Result<()> {
        if self.active {
            return Err(VoiceChatError::StartFailed(
                "a session is already running".into(),
            ));
        }
        self.recorder.starts.fetch_add(1, Ordering::SeqCst);
        self.recorder.configs.lock().push(config.clone());
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.active {
            self.recorder.stops.fetch_add(1, Ordering::SeqCst);
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

struct FixedProbe(bool);

impl MicrophoneProbe for FixedProbe {
    fn probe(&mut self) -> voice_chat::Result<()> {
        if self.0 {
            Ok(())
        } else {
            Err(VoiceChatError::AudioDeviceError("NotAllowedError".into()))
        }
    }
}

fn start_config() -> StartConfig {
    StartConfig::new("agent-7", "sk_live", true)
}

fn scripted_factory(recorder: Arc<Recorder>) -> ClientFactory {
    Box::new(move |events| {
        recorder.builds.fetch_add(1, Ordering::SeqCst);
        *recorder.events.lock() = Some(events);
        Ok(Box::new(ScriptedClient {
            recorder: Arc::clone(&recorder),
            active: false,
        }) as Box<dyn VoiceClient>)
    })
}

fn session_with_mic(granted: bool) -> (VoiceSession, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let session = VoiceSession::new(
        start_config(),
        PermissionGuard::new(Box::new(FixedProbe(granted))),
        scripted_factory(Arc::clone(&recorder)),
    );
    (session, recorder)
}

fn started_session() -> (VoiceSession, Arc<Recorder>) {
    let (mut session, recorder) = session_with_mic(true);
    session.start().expect("start should succeed");
    recorder.emit(ClientEvent::Open);
    recorder.emit(ClientEvent::Ready);
    session.poll_events();
    (session, recorder)
}

fn transcript(text: &str, is_final: bool) -> ClientEvent {
    ClientEvent::Transcript {
        text: text.to_string(),
        is_final,
    }
}

fn response(text: &str, is_final: bool) -> ClientEvent {
    ClientEvent::ResponseText {
        text: text.to_string(),
        is_final,
    }
}

#[test]
fn test_start_passes_config_and_enters_listening() {
    let (session, recorder) = started_session();

    assert_eq!(session.model().session, SessionState::Listening);
    assert_eq!(session.model().phase, ConnectionPhase::Ready);
    assert_eq!(recorder.starts.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.configs.lock()[0], start_config());
    assert!(session.permission().granted);
}

#[test]
fn test_each_final_transcript_adds_one_user_message() {
    let (mut session, recorder) = started_session();
    let utterances = ["turn on the lights", "and the radio", "thanks"];

    for text in utterances {
        recorder.emit(transcript(&text[..text.len() / 2], false));
        recorder.emit(transcript(text, true));
    }
    session.poll_events();

    let messages = session.model().messages.get_all();
    assert_eq!(messages.len(), utterances.len());
    for (message, expected) in messages.iter().zip(utterances) {
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text, expected);
    }
}

#[test]
fn test_partial_transcripts_only_update_partial() {
    let (mut session, recorder) = started_session();

    recorder.emit(transcript("what is", false));
    recorder.emit(transcript("what is the weather", false));
    session.poll_events();

    assert!(session.model().messages.is_empty());
    assert_eq!(session.model().partial_transcript, "what is the weather");
}

#[test]
fn test_only_final_responses_add_agent_messages() {
    let (mut session, recorder) = started_session();

    recorder.emit(response("It is", false));
    recorder.emit(response("It is sunny", false));
    session.poll_events();
    assert!(session.model().messages.is_empty());

    recorder.emit(response("It is sunny today.", true));
    session.poll_events();

    let messages = session.model().messages.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::Agent);
    assert_eq!(messages[0].text, "It is sunny today.");
}

#[test]
fn test_conversation_keeps_arrival_order() {
    let (mut session, recorder) = started_session();

    recorder.emit(transcript("hello", true));
    recorder.emit(response("Hi! How can I help?", true));
    recorder.emit(transcript("tell me a joke", true));
    session.poll_events();

    let roles: Vec<_> = session
        .model()
        .messages
        .get_all()
        .iter()
        .map(|m| m.role)
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Agent, Role::User]);
}

#[test]
fn test_stop_twice_is_safe() {
    let (mut session, recorder) = started_session();

    session.stop();
    assert_eq!(session.model().session, SessionState::Idle);

    session.stop();
    assert_eq!(session.model().session, SessionState::Idle);
    assert_eq!(recorder.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stop_before_start_is_noop() {
    let (mut session, recorder) = session_with_mic(true);
    session.stop();

    assert_eq!(session.model().session, SessionState::Idle);
    assert_eq!(recorder.builds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_normal_close_leaves_error_unset() {
    let (mut session, recorder) = started_session();

    recorder.emit(ClientEvent::Close {
        code: 1000,
        reason: "goodbye".into(),
    });
    session.poll_events();

    assert_eq!(session.model().session, SessionState::Idle);
    assert!(session.model().error.is_none());
}

#[test]
fn test_abnormal_close_reports_code() {
    let (mut session, recorder) = started_session();

    recorder.emit(ClientEvent::Close {
        code: 4003,
        reason: "agent not found".into(),
    });
    session.poll_events();

    assert_eq!(session.model().session, SessionState::Idle);
    let error = session.model().error.clone().unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("4003"));
}

#[test]
fn test_denied_permission_never_reaches_client() {
    let (mut session, recorder) = session_with_mic(false);

    let result = session.start();
    assert_eq!(result, Err(VoiceChatError::PermissionDenied));
    assert_eq!(recorder.builds.load(Ordering::SeqCst), 0);
    assert_eq!(recorder.starts.load(Ordering::SeqCst), 0);
    assert_eq!(
        session.model().error.as_deref(),
        Some(PERMISSION_DENIED_MESSAGE)
    );
    assert_eq!(session.model().session, SessionState::Idle);
    assert!(!session.permission().granted);
}

#[test]
fn test_uninitialized_client_blocks_start() {
    let mut session = VoiceSession::new(
        start_config(),
        PermissionGuard::new(Box::new(FixedProbe(true))),
        Box::new(|_events| Err(VoiceChatError::ConfigError("missing public key".into()))),
    );

    let result = session.start();
    assert!(matches!(result, Err(VoiceChatError::ClientUninitialized(_))));
    assert!(session.model().error.is_some());
    assert_eq!(session.model().session, SessionState::Idle);
}

#[test]
fn test_error_event_then_restart() {
    let (mut session, recorder) = started_session();

    recorder.emit(ClientEvent::Error("connection reset".into()));
    session.poll_events();
    assert_eq!(session.model().session, SessionState::Idle);
    assert_eq!(
        session.model().error.as_deref(),
        Some(CONNECTION_ERROR_MESSAGE)
    );

    // Error persists until the next successful open
    session.start().unwrap();
    assert!(session.model().error.is_some());
    recorder.emit(ClientEvent::Open);
    session.poll_events();
    assert!(session.model().error.is_none());
    assert!(session.is_listening());

    // Client is built once and reused
    assert_eq!(recorder.builds.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.starts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_start_while_listening_is_noop() {
    let (mut session, recorder) = started_session();
    session.start().unwrap();
    assert_eq!(recorder.starts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_typed_text_is_local_echo() {
    let (mut session, recorder) = session_with_mic(true);

    assert!(session.submit_text("  typed hello  "));
    assert!(!session.submit_text("   "));

    let messages = session.model().messages.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "typed hello");
    assert_eq!(recorder.builds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_partial_hidden_after_session_end() {
    let (mut session, recorder) = started_session();
    recorder.emit(transcript("half a thou", false));
    recorder.emit(ClientEvent::SessionEnded);
    session.poll_events();

    assert_eq!(session.model().session, SessionState::Idle);
    assert!(session.model().partial_transcript.is_empty());
}

#[test]
fn test_drop_stops_active_client() {
    let (session, recorder) = started_session();
    drop(session);
    assert_eq!(recorder.stops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_toggle() {
    let (mut session, _recorder) = session_with_mic(true);
    session.toggle().unwrap();
    assert!(session.is_listening());
    session.toggle().unwrap();
    assert!(!session.is_listening());
}

#[test]
fn test_service_ending_session_allows_restart() {
    let (mut session, recorder) = started_session();

    recorder.emit(ClientEvent::SessionEnded);
    session.poll_events();
    assert!(!session.is_listening());
    assert_eq!(recorder.stops.load(Ordering::SeqCst), 1);

    session.start().expect("restart after session end");
    assert!(session.is_listening());
    assert!(session.model().error.is_none());
    assert_eq!(recorder.starts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_service_error_allows_restart_and_keeps_banner() {
    let (mut session, recorder) = started_session();

    recorder.emit(ClientEvent::Error("quota exceeded".into()));
    session.poll_events();
    assert_eq!(recorder.stops.load(Ordering::SeqCst), 1);

    session.start().expect("restart after service error");
    assert_eq!(
        session.model().error.as_deref(),
        Some(CONNECTION_ERROR_MESSAGE)
    );
}

#[test]
fn test_events_after_session_end_are_discarded() {
    let (mut session, recorder) = started_session();

    recorder.emit(transcript("before the end", true));
    recorder.emit(ClientEvent::SessionEnded);
    recorder.emit(transcript("late", true));
    recorder.emit(response("late reply", true));

    assert_eq!(session.poll_events(), 2);
    let messages = session.model().messages.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "before the end");
}

#[test]
fn test_client_build_is_retried_on_next_start() {
    let recorder = Arc::new(Recorder::default());
    let mut inner = scripted_factory(Arc::clone(&recorder));
    let mut attempts = 0;
    let mut session = VoiceSession::new(
        start_config(),
        PermissionGuard::new(Box::new(FixedProbe(true))),
        Box::new(move |events| {
            attempts += 1;
            if attempts == 1 {
                Err(VoiceChatError::ConfigError("endpoint unreachable".into()))
            } else {
                inner(events)
            }
        }),
    );

    let first = session.start().unwrap_err();
    assert!(first.is_recoverable());
    assert!(session.model().error.is_some());

    session.start().expect("second build succeeds");
    assert!(session.is_listening());
    assert_eq!(recorder.builds.load(Ordering::SeqCst), 1);
}
