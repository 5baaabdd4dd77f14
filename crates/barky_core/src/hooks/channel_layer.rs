//! In-process channel layer implementing `Publisher`.

use super::broadcast::{validate_topic, BroadcastMessage, PublishError, Publisher};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Receiving end of one topic subscription.
pub struct Subscription {
    topic: String,
    receiver: Receiver<BroadcastMessage>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the next pending message without blocking.
    pub fn try_recv(&self) -> Option<BroadcastMessage> {
        self.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<BroadcastMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Takes every message currently buffered.
    pub fn drain(&self) -> Vec<BroadcastMessage> {
        self.receiver.try_iter().collect()
    }
}

/// Topic-keyed fan-out over bounded crossbeam channels.
///
/// Subscribers whose receiver was dropped are pruned on the next publish.
/// A subscriber with a full buffer misses the message.
#[derive(Default)]
pub struct ChannelLayer {
    topics: RwLock<HashMap<String, Vec<Sender<BroadcastMessage>>>>,
    closed: AtomicBool,
}

impl ChannelLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `topic` with a buffer of `capacity` messages (min 1).
    pub fn subscribe(&self, topic: &str, capacity: usize) -> Result<Subscription, PublishError> {
        validate_topic(topic)?;
        if self.is_closed() {
            return Err(PublishError::Unavailable("channel layer closed".to_string()));
        }

        let (sender, receiver) = bounded(capacity.max(1));
        self.topics
            .write()
            .entry(topic.to_string())
            .or_default()
            .push(sender);

        Ok(Subscription {
            topic: topic.to_string(),
            receiver,
        })
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.read().get(topic).map_or(0, Vec::len)
    }

    /// Makes the layer unavailable and disconnects every subscriber.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.topics.write().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Publisher for ChannelLayer {
    fn publish(&self, message: BroadcastMessage) -> Result<usize, PublishError> {
        validate_topic(&message.topic)?;
        if self.is_closed() {
            return Err(PublishError::Unavailable("channel layer closed".to_string()));
        }

        let mut topics = self.topics.write();
        let Some(senders) = topics.get_mut(message.topic.as_str()) else {
            return Ok(0);
        };

        let mut delivered = 0;
        senders.retain(|sender| match sender.try_send(message.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                debug!(
                    "event=broadcast_publish module=hooks status=skipped topic={} reason=subscriber_full",
                    message.topic
                );
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });

        Ok(delivered)
    }
}
