//! Simulated delivery lifecycle for locally composed messages.
//!
//! Each sent message gets one chain that walks `sending -> sent -> delivered -> seen` on
//! fixed delays. Stages run sequentially inside the chain, so a late timer only delays the
//! rest of its own chain and never reorders it.

mod transition;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use parley_storage::{ChatId, DeliveryStatus, MessageId, MessageRecord};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::composer::ComposeEvent;
use crate::config::DeliveryConfig;
use crate::conversation::ConversationStore;

pub use transition::{DeliveryTransition, TransitionRejection};

pub const DEFAULT_SENT_AFTER: Duration = Duration::from_millis(500);
pub const DEFAULT_DELIVERED_AFTER: Duration = Duration::from_millis(1_000);
pub const DEFAULT_SEEN_AFTER: Duration = Duration::from_millis(2_000);

/// Delay before each stage, measured from the previous stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryTimings {
    pub sent_after: Duration,
    pub delivered_after: Duration,
    pub seen_after: Duration,
}

impl Default for DeliveryTimings {
    fn default() -> Self {
        Self {
            sent_after: DEFAULT_SENT_AFTER,
            delivered_after: DEFAULT_DELIVERED_AFTER,
            seen_after: DEFAULT_SEEN_AFTER,
        }
    }
}

impl DeliveryTimings {
    pub fn delay_before(&self, status: DeliveryStatus) -> Duration {
        match status {
            DeliveryStatus::Sending => Duration::ZERO,
            DeliveryStatus::Sent => self.sent_after,
            DeliveryStatus::Delivered => self.delivered_after,
            DeliveryStatus::Seen => self.seen_after,
        }
    }

    /// Time from submit until the message is seen.
    pub fn total(&self) -> Duration {
        self.sent_after + self.delivered_after + self.seen_after
    }
}

impl From<&DeliveryConfig> for DeliveryTimings {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            sent_after: Duration::from_millis(config.sent_after_ms),
            delivered_after: Duration::from_millis(config.delivered_after_ms),
            seen_after: Duration::from_millis(config.seen_after_ms),
        }
    }
}

struct ChainHandle {
    chat_id: ChatId,
    cancel_tx: oneshot::Sender<()>,
}

type ChainMap = Arc<Mutex<HashMap<MessageId, ChainHandle>>>;

fn lock_chains(chains: &ChainMap) -> MutexGuard<'_, HashMap<MessageId, ChainHandle>> {
    chains.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turns composer submissions into messages with a staged delivery lifecycle.
pub struct DeliverySimulator {
    store: Arc<ConversationStore>,
    timings: DeliveryTimings,
    runtime: Handle,
    chains: ChainMap,
}

impl DeliverySimulator {
    pub fn new(store: Arc<ConversationStore>, timings: DeliveryTimings, runtime: Handle) -> Self {
        Self {
            store,
            timings,
            runtime,
            chains: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn timings(&self) -> DeliveryTimings {
        self.timings
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Appends a `sending` message and schedules its status chain.
    pub fn send(&self, chat_id: &ChatId, event: ComposeEvent) -> MessageRecord {
        let record = MessageRecord::outgoing(event.text);
        let message_id = record.id.clone();
        self.store.append(chat_id, record.clone());

        let (cancel_tx, cancel_rx) = oneshot::channel();
        // Register before spawning so a cancel issued right after `send` always finds the chain.
        lock_chains(&self.chains).insert(
            message_id.clone(),
            ChainHandle {
                chat_id: chat_id.clone(),
                cancel_tx,
            },
        );

        tracing::debug!(chat_id = %chat_id, message_id = %message_id, "scheduled delivery chain");
        self.runtime.spawn(run_delivery_chain(
            self.store.clone(),
            self.chains.clone(),
            self.timings,
            chat_id.clone(),
            message_id,
            cancel_rx,
        ));

        record
    }

    /// Number of chains that have not reached `seen` or been cancelled.
    pub fn in_flight(&self) -> usize {
        lock_chains(&self.chains).len()
    }

    /// Cancels every pending chain of one conversation and returns how many were stopped.
    pub fn cancel_chat(&self, chat_id: &ChatId) -> usize {
        let cancelled = {
            let mut chains = lock_chains(&self.chains);
            let ids = chains
                .iter()
                .filter(|(_, chain)| &chain.chat_id == chat_id)
                .map(|(id, _)| id.clone())
                .collect::<Vec<_>>();
            ids.into_iter()
                .filter_map(|id| chains.remove(&id))
                .collect::<Vec<_>>()
        };

        let count = cancelled.len();
        for chain in cancelled {
            let _ = chain.cancel_tx.send(());
        }
        if count > 0 {
            tracing::debug!(chat_id = %chat_id, count, "cancelled delivery chains");
        }
        count
    }

    /// Cancels every pending chain.
    pub fn shutdown(&self) -> usize {
        let cancelled = lock_chains(&self.chains).drain().collect::<Vec<_>>();
        let count = cancelled.len();
        for (_, chain) in cancelled {
            let _ = chain.cancel_tx.send(());
        }
        count
    }
}

impl Drop for DeliverySimulator {
    fn drop(&mut self) {
        let cancelled = self.shutdown();
        if cancelled > 0 {
            tracing::debug!(cancelled, "delivery simulator dropped with pending chains");
        }
    }
}

async fn run_delivery_chain(
    store: Arc<ConversationStore>,
    chains: ChainMap,
    timings: DeliveryTimings,
    chat_id: ChatId,
    message_id: MessageId,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut status = DeliveryStatus::Sending;

    while let Some(next) = status.next() {
        tokio::select! {
            // Fires on explicit cancel and when the handle is dropped.
            _ = &mut cancel_rx => {
                tracing::debug!(
                    chat_id = %chat_id,
                    message_id = %message_id,
                    status = status.as_str(),
                    "delivery chain cancelled"
                );
                return;
            }
            _ = tokio::time::sleep(timings.delay_before(next)) => {}
        }

        match store.set_status(&chat_id, &message_id, next) {
            Ok(_) => status = next,
            Err(error) => {
                tracing::warn!(
                    chat_id = %chat_id,
                    message_id = %message_id,
                    error = %error,
                    "delivery chain stopped"
                );
                break;
            }
        }
    }

    lock_chains(&chains).remove(&message_id);
}

#[cfg(test)]
mod tests {
    use parley_storage::MemoryMessageSource;
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::conversation::ConversationEvent;

    fn simulator() -> DeliverySimulator {
        let store = Arc::new(ConversationStore::new(Arc::new(
            MemoryMessageSource::with_fixtures(),
        )));
        DeliverySimulator::new(store, DeliveryTimings::default(), Handle::current())
    }

    fn status_of(simulator: &DeliverySimulator, chat_id: &ChatId, id: &MessageId) -> Option<DeliveryStatus> {
        simulator.store().message(chat_id, id).and_then(|message| message.status)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn status_walks_every_stage_on_schedule() {
        let simulator = simulator();
        let chat_id = ChatId::new("2");

        let record = simulator.send(&chat_id, ComposeEvent::new("hello"));
        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Sending));
        assert_eq!(simulator.in_flight(), 1);

        advance(400).await;
        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Sending));
        advance(200).await;
        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Sent));
        advance(1_000).await;
        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Delivered));
        advance(2_000).await;
        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Seen));
        assert_eq!(simulator.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_sends_advance_independently() {
        let simulator = simulator();
        let chat_id = ChatId::new("1");
        let mut events = simulator.store().subscribe();

        let first = simulator.send(&chat_id, ComposeEvent::new("first"));
        advance(250).await;
        let second = simulator.send(&chat_id, ComposeEvent::new("second"));

        advance(300).await;
        assert_eq!(status_of(&simulator, &chat_id, &first.id), Some(DeliveryStatus::Sent));
        assert_eq!(status_of(&simulator, &chat_id, &second.id), Some(DeliveryStatus::Sending));

        advance(4_000).await;

        let mut observed: HashMap<MessageId, Vec<DeliveryStatus>> = HashMap::new();
        loop {
            match events.try_recv() {
                Ok(ConversationEvent::StatusChanged { message_id, status, .. }) => {
                    observed.entry(message_id).or_default().push(status);
                }
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(error) => panic!("unexpected receive error: {error:?}"),
            }
        }

        let expected = vec![
            DeliveryStatus::Sent,
            DeliveryStatus::Delivered,
            DeliveryStatus::Seen,
        ];
        assert_eq!(observed.get(&first.id), Some(&expected));
        assert_eq!(observed.get(&second.id), Some(&expected));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_chat_stops_pending_transitions() {
        let simulator = simulator();
        let chat_id = ChatId::new("3");
        let other_chat = ChatId::new("4");

        let record = simulator.send(&chat_id, ComposeEvent::new("bye"));
        let other = simulator.send(&other_chat, ComposeEvent::new("still going"));
        advance(600).await;
        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Sent));

        assert_eq!(simulator.cancel_chat(&chat_id), 1);
        advance(5_000).await;

        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Sent));
        assert_eq!(status_of(&simulator, &other_chat, &other.id), Some(DeliveryStatus::Seen));
        assert_eq!(simulator.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_everything() {
        let simulator = simulator();
        let chat_id = ChatId::new("5");
        let record = simulator.send(&chat_id, ComposeEvent::new("one"));
        simulator.send(&chat_id, ComposeEvent::new("two"));

        assert_eq!(simulator.shutdown(), 2);
        advance(5_000).await;
        assert_eq!(status_of(&simulator, &chat_id, &record.id), Some(DeliveryStatus::Sending));
    }

    #[test]
    fn timings_come_from_config() {
        let timings = DeliveryTimings::from(&DeliveryConfig {
            sent_after_ms: 10,
            delivered_after_ms: 20,
            seen_after_ms: 30,
        });
        assert_eq!(timings.delay_before(DeliveryStatus::Delivered), Duration::from_millis(20));
        assert_eq!(timings.total(), Duration::from_millis(60));
        assert_eq!(DeliveryTimings::default().total(), Duration::from_millis(3_500));
    }
}
