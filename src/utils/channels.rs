use crate::session::client::ClientEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Client-to-UI event queue.
///
/// Unbounded so that a network task never blocks on a slow frame.
pub struct EventChannel {
    tx: Sender<ClientEvent>,
    rx: Receiver<ClientEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<ClientEvent> {
        self.tx.clone()
    }

    /// Take every queued event in arrival order
    pub fn drain(&self) -> Vec<ClientEvent> {
        self.rx.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let channel = EventChannel::new();
        let tx = channel.sender();
        tx.send(ClientEvent::Open).unwrap();
        tx.send(ClientEvent::Ready).unwrap();

        assert_eq!(channel.drain(), vec![ClientEvent::Open, ClientEvent::Ready]);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_sender_outlives_drain() {
        let channel = EventChannel::new();
        let tx = channel.sender();
        assert!(channel.drain().is_empty());

        tx.send(ClientEvent::SessionEnded).unwrap();
        assert_eq!(channel.drain().len(), 1);
    }
}
