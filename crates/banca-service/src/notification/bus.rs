//! Broadcast notification bus.

use crate::notification::NotificationEvent;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default per-subscriber buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// Single-writer, multi-subscriber event bus.
///
/// Fan-out is non-blocking and buffered per subscriber. Overflow policy:
/// when a subscriber's buffer fills, the OLDEST buffered events are dropped
/// for that subscriber (never for others); the subscriber observes the skip
/// count through [`NotificationStream::skipped`]. Each subscriber sees
/// events in publish order; there is no ordering guarantee across
/// subscribers. Nothing is persisted: subscribing after a publish never
/// yields that event.
pub struct NotificationBus {
    sender: Mutex<Option<broadcast::Sender<NotificationEvent>>>,
    buffer_size: usize,
}

impl NotificationBus {
    /// Creates a bus with the given per-subscriber buffer size.
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size.max(1));
        Self {
            sender: Mutex::new(Some(tx)),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Returns the number of subscribers the event was delivered to. Zero
    /// subscribers is not an error, and a closed bus silently drops the
    /// event.
    pub fn publish(&self, event: NotificationEvent) -> usize {
        let guard = self.sender.lock();
        match guard.as_ref() {
            Some(tx) => {
                debug!("Publishing notification: {}", event);
                tx.send(event).unwrap_or(0)
            }
            None => {
                warn!("Notification published after bus close; dropping");
                0
            }
        }
    }

    /// Registers a new subscriber and returns its event stream.
    ///
    /// On a closed bus the returned stream ends immediately.
    pub fn subscribe(&self) -> NotificationStream {
        let guard = self.sender.lock();
        let rx = match guard.as_ref() {
            Some(tx) => tx.subscribe(),
            None => {
                // closed: a receiver whose sender is already gone
                let (tx, rx) = broadcast::channel(1);
                drop(tx);
                rx
            }
        };
        NotificationStream { rx, skipped: 0 }
    }

    /// Spawns a task that feeds every subsequent event to `handler`.
    ///
    /// The task ends when the bus is closed.
    pub fn subscribe_with<F>(&self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(NotificationEvent) + Send + 'static,
    {
        let mut stream = self.subscribe();
        tokio::spawn(async move {
            while let Some(event) = stream.recv().await {
                handler(event);
            }
        })
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender
            .lock()
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Completes the bus. Active streams end after draining their buffers;
    /// later publishes are dropped.
    pub fn close(&self) {
        debug!("Closing notification bus");
        *self.sender.lock() = None;
    }

    /// Whether the bus has been closed.
    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("buffer_size", &self.buffer_size)
            .field("subscribers", &self.subscriber_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Pull-style stream of events for one subscriber.
///
/// Potentially infinite; ends only when the bus is closed.
pub struct NotificationStream {
    rx: broadcast::Receiver<NotificationEvent>,
    skipped: u64,
}

impl NotificationStream {
    /// Waits for the next event. Returns `None` once the bus is closed and
    /// the buffer is drained.
    ///
    /// Lag (events dropped by the overflow policy) is absorbed here: the
    /// stream skips to the oldest retained event and records the count.
    pub async fn recv(&mut self) -> Option<NotificationEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Notification subscriber lagged; dropped {} events", n);
                    self.skipped += n;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv). Returns `None` when no
    /// event is currently buffered.
    pub fn try_recv(&mut self) -> Option<NotificationEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    self.skipped += n;
                }
                Err(_) => return None,
            }
        }
    }

    /// Number of events this subscriber lost to the overflow policy.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
