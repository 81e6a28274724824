//! WebSocket adapter for the hosted voice-agent service
//!
//! Each session runs as one task on the tokio runtime passed in at
//! construction. Inbound frames are decoded into `ClientEvent`s and sent over
//! the crossbeam channel the session drains on the UI thread.

use crate::config::VoiceConfig;
use crate::session::client::{ClientEvent, StartConfig, VoiceClient};
use crate::{Result, VoiceChatError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use crossbeam_channel::Sender;
use futures::{Sink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{header, HeaderValue};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Close code reported when the peer closes without a close frame payload
const NO_STATUS_CODE: u16 = 1005;
/// Close code reported when the stream ends without a close frame
const ABNORMAL_CLOSE_CODE: u16 = 1006;

/// Frames sent by the service
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    Ready,
    Transcript {
        text: String,
        #[serde(default)]
        is_final: bool,
    },
    ResponseText {
        text: String,
        #[serde(default)]
        is_final: bool,
    },
    Audio {
        data: String,
    },
    UserAudioReady,
    SessionEnded,
    Error {
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Unknown,
}

/// Frames sent to the service
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame<'a> {
    Start(&'a StartConfig),
    Stop,
}

/// Decode one text frame into an event. Returns `None` for frames that carry
/// nothing the session cares about.
fn decode_text(text: &str) -> Option<ClientEvent> {
    let frame: ServerFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("[WS] Undecodable frame: {}", e);
            return None;
        }
    };

    match frame {
        ServerFrame::Ready => Some(ClientEvent::Ready),
        ServerFrame::Transcript { text, is_final } => {
            Some(ClientEvent::Transcript { text, is_final })
        }
        ServerFrame::ResponseText { text, is_final } => {
            Some(ClientEvent::ResponseText { text, is_final })
        }
        ServerFrame::Audio { data } => match BASE64.decode(data.as_bytes()) {
            Ok(bytes) => Some(ClientEvent::Audio(bytes)),
            Err(e) => {
                warn!("[WS] Invalid base64 audio payload: {}", e);
                None
            }
        },
        ServerFrame::UserAudioReady => Some(ClientEvent::UserAudioReady),
        ServerFrame::SessionEnded => Some(ClientEvent::SessionEnded),
        ServerFrame::Error { message } => Some(ClientEvent::Error(message)),
        ServerFrame::Unknown => {
            debug!("[WS] Skipping unknown frame type");
            None
        }
    }
}

fn encode(frame: &ClientFrame<'_>) -> Result<String> {
    serde_json::to_string(frame)
        .map_err(|e| VoiceChatError::StartFailed(format!("Failed to encode frame: {}", e)))
}

fn build_request(endpoint: &str, public_key: &str) -> Result<Request> {
    let mut request = endpoint
        .into_client_request()
        .map_err(|e| VoiceChatError::ConfigError(format!("Invalid endpoint: {}", e)))?;

    let auth = HeaderValue::from_str(&format!("Bearer {}", public_key))
        .map_err(|e| VoiceChatError::ConfigError(format!("Invalid public key: {}", e)))?;
    request.headers_mut().insert(header::AUTHORIZATION, auth);

    Ok(request)
}

/// Event sender that goes quiet once its session was stopped locally
#[derive(Clone)]
struct EventLink {
    events: Sender<ClientEvent>,
    stopped: Arc<AtomicBool>,
}

impl EventLink {
    fn emit(&self, event: ClientEvent) {
        if self.stopped.load(Ordering::SeqCst) {
            debug!("[WS] Dropping '{}' event from a stopped session", event.name());
            return;
        }
        if self.events.send(event).is_err() {
            debug!("[WS] Event receiver gone");
        }
    }
}

struct SessionControl {
    stop_tx: Option<oneshot::Sender<()>>,
    stopped: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

/// `VoiceClient` speaking the service's JSON-over-WebSocket protocol
pub struct WebSocketClient {
    endpoint: String,
    public_key: String,
    runtime: Handle,
    events: Sender<ClientEvent>,
    session: Option<SessionControl>,
}

impl WebSocketClient {
    pub fn new(config: &VoiceConfig, runtime: Handle, events: Sender<ClientEvent>) -> Result<Self> {
        config.validate()?;
        // Fail at construction rather than on first start
        build_request(&config.endpoint, &config.public_key)?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            public_key: config.public_key.clone(),
            runtime,
            events,
            session: None,
        })
    }
}

impl VoiceClient for WebSocketClient {
    fn start(&mut self, config: &StartConfig) -> Result<()> {
        if self.is_active() {
            return Err(VoiceChatError::StartFailed(
                "a session is already running".into(),
            ));
        }

        let request = build_request(&self.endpoint, &self.public_key)?;
        let start_frame = encode(&ClientFrame::Start(config))?;

        let (stop_tx, stop_rx) = oneshot::channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));

        let link = EventLink {
            events: self.events.clone(),
            stopped: Arc::clone(&stopped),
        };
        let task_finished = Arc::clone(&finished);

        info!("[WS] Connecting to {}", self.endpoint);
        self.runtime.spawn(async move {
            run_connection(request, start_frame, link, stop_rx).await;
            task_finished.store(true, Ordering::SeqCst);
        });

        self.session = Some(SessionControl {
            stop_tx: Some(stop_tx),
            stopped,
            finished,
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.stopped.store(true, Ordering::SeqCst);
            if let Some(tx) = session.stop_tx.take() {
                info!("[WS] Stop requested");
                let _ = tx.send(());
            }
        }
    }

    fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            !s.stopped.load(Ordering::SeqCst) && !s.finished.load(Ordering::SeqCst)
        })
    }
}

async fn run_connection(
    request: Request,
    start_frame: String,
    link: EventLink,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let connected = tokio::select! {
        result = connect_async(request) => result,
        _ = &mut stop_rx => {
            debug!("[WS] Stopped before the connection opened");
            return;
        }
    };

    let ws_stream = match connected {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!("[WS] Connect failed: {}", e);
            link.emit(ClientEvent::Error(e.to_string()));
            return;
        }
    };

    info!("[WS] Connection open");
    link.emit(ClientEvent::Open);

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    if let Err(e) = ws_tx.send(Message::Text(start_frame.into())).await {
        warn!("[WS] Failed to send start frame: {}", e);
        link.emit(ClientEvent::Error(e.to_string()));
        return;
    }

    loop {
        tokio::select! {
            _ = &mut stop_rx => {
                close_normally(&mut ws_tx).await;
                info!("[WS] Session stopped by client");
                break;
            }
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let Some(event) = decode_text(text.as_str()) else {
                        continue;
                    };
                    let session_over = ends_session(&event);
                    link.emit(event);
                    if session_over {
                        close_normally(&mut ws_tx).await;
                        info!("[WS] Session ended by service");
                        break;
                    }
                }
                Some(Ok(Message::Binary(data))) => {
                    link.emit(ClientEvent::Audio(data.to_vec()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.as_str().to_string()))
                        .unwrap_or((NO_STATUS_CODE, String::new()));
                    info!("[WS] Closed by peer: code={} reason={}", code, reason);
                    link.emit(ClientEvent::Close { code, reason });
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("[WS] Stream error: {}", e);
                    link.emit(ClientEvent::Error(e.to_string()));
                    break;
                }
                None => {
                    link.emit(ClientEvent::Close {
                        code: ABNORMAL_CLOSE_CODE,
                        reason: "connection dropped".into(),
                    });
                    break;
                }
            }
        }
    }
}

/// Frames after which the service considers the session over
fn ends_session(event: &ClientEvent) -> bool {
    matches!(event, ClientEvent::SessionEnded | ClientEvent::Error(_))
}

/// Send the stop frame and a normal close, ignoring a peer that already left
async fn close_normally<S>(ws_tx: &mut S)
where
    S: Sink<Message> + Unpin,
{
    if let Ok(stop) = encode(&ClientFrame::Stop) {
        let _ = ws_tx.send(Message::Text(stop.into())).await;
    }
    let close = CloseFrame {
        code: CloseCode::Normal,
        reason: "client stop".into(),
    };
    let _ = ws_tx.send(Message::Close(Some(close))).await;
    let _ = ws_tx.close().await;
}
