//! The event channel carrying user actions back towards the agent.
//!
//! Every dispatched event owns a [`Completion`] that resolves exactly once
//! with the response messages. Completion is guaranteed on every path: the
//! channel completes after running its subscribers even when they fail or
//! panic, and dropping the last handle of an uncompleted `Completion`
//! completes it with an empty response.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use a2ui_core::types::{ClientMessage, EventId, Message, UserAction};
use futures::FutureExt;
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use tokio::sync::oneshot;

use crate::error::SubscriberError;
use crate::subscriber::EventSubscriber;

/// Handle returned by [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One-shot completion callback of a dispatched event.
///
/// Clones share the same underlying callback.
#[derive(Debug, Clone)]
pub struct Completion {
    inner: Arc<CompletionInner>,
}

#[derive(Debug)]
struct CompletionInner {
    sender: Mutex<Option<oneshot::Sender<Vec<Message>>>>,
}

impl Drop for CompletionInner {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.get_mut().take() {
            debug!("Completion dropped without a response, completing empty");
            let _ = sender.send(Vec::new());
        }
    }
}

impl Completion {
    fn new(sender: oneshot::Sender<Vec<Message>>) -> Self {
        Self {
            inner: Arc::new(CompletionInner {
                sender: Mutex::new(Some(sender)),
            }),
        }
    }

    /// Completes the event with `messages`.
    ///
    /// Returns `false` if the event was already completed; the messages are
    /// discarded in that case.
    pub fn complete(&self, messages: Vec<Message>) -> bool {
        let Some(sender) = self.inner.sender.lock().take() else {
            return false;
        };
        // A receiver that went away still counts as completed.
        let _ = sender.send(messages);
        true
    }

    pub fn is_completed(&self) -> bool {
        self.inner.sender.lock().is_none()
    }
}

/// Receiving side of a [`Completion`].
#[derive(Debug)]
pub struct CompletionReceiver {
    receiver: oneshot::Receiver<Vec<Message>>,
}

impl CompletionReceiver {
    /// Waits for the response messages.
    pub async fn wait(self) -> Vec<Message> {
        self.receiver.await.unwrap_or_default()
    }
}

/// A user action in flight, paired with its completion callback.
#[derive(Debug)]
pub struct DispatchedEvent {
    pub id: EventId,
    pub action: UserAction,
    pub completion: Completion,
}

impl DispatchedEvent {
    pub fn new(action: UserAction) -> (Self, CompletionReceiver) {
        let (sender, receiver) = oneshot::channel();
        let event = Self {
            id: EventId::random(),
            action,
            completion: Completion::new(sender),
        };
        (event, CompletionReceiver { receiver })
    }

    /// The action as the client-to-agent wire message.
    pub fn message(&self) -> ClientMessage {
        ClientMessage::UserAction(self.action.clone())
    }
}

type SubscriberList = Vec<(SubscriptionId, Arc<dyn EventSubscriber>)>;

/// Publish/subscribe channel for user actions.
///
/// Cloning yields another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct EventChannel {
    subscribers: Arc<RwLock<SubscriberList>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<S>(&self, subscriber: S) -> SubscriptionId
    where
        S: EventSubscriber + 'static,
    {
        self.subscribe_arc(Arc::new(subscriber))
    }

    pub fn subscribe_arc(&self, subscriber: Arc<dyn EventSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push((id, subscriber));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Publishes `action` and waits for its response messages.
    pub async fn publish(&self, action: UserAction) -> Vec<Message> {
        let (event, receiver) = DispatchedEvent::new(action);
        self.dispatch(event).await;
        receiver.wait().await
    }

    /// Runs every subscriber on `event`, then completes it.
    ///
    /// Subscribers run in subscription order. Unless one of them completed
    /// the event explicitly, it is completed with the messages returned by
    /// the successful handlers, concatenated in that order. Failed and
    /// panicking handlers contribute nothing.
    pub async fn dispatch(&self, event: DispatchedEvent) {
        let subscribers: Vec<Arc<dyn EventSubscriber>> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();
        debug!(
            "Dispatching '{}' from '{}' on surface '{}' to {} subscriber(s)",
            event.action.name,
            event.action.source_component_id,
            event.action.surface_id,
            subscribers.len()
        );

        let mut responses = Vec::new();
        for subscriber in subscribers {
            let outcome = AssertUnwindSafe(subscriber.on_user_action(&event))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(SubscriberError::Panicked {
                        message: panic_message(payload.as_ref()),
                    })
                });
            match outcome {
                Ok(messages) => responses.extend(messages),
                Err(err) => warn!("Subscriber failed on event {}: {err}", event.id),
            }
        }

        if !event.completion.complete(responses) {
            debug!("Event {} was completed by a subscriber", event.id);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::subscriber_fn;
    use std::sync::atomic::AtomicUsize;

    fn action() -> UserAction {
        UserAction::new("form_submit", "main", "submit")
    }

    struct Failing;

    #[async_trait::async_trait]
    impl EventSubscriber for Failing {
        async fn on_user_action(
            &self,
            _event: &DispatchedEvent,
        ) -> Result<Vec<Message>, SubscriberError> {
            Err(SubscriberError::failed("agent unreachable"))
        }
    }

    struct Panicking;

    #[async_trait::async_trait]
    impl EventSubscriber for Panicking {
        async fn on_user_action(
            &self,
            _event: &DispatchedEvent,
        ) -> Result<Vec<Message>, SubscriberError> {
            panic!("handler bug");
        }
    }

    struct CompletesExplicitly;

    #[async_trait::async_trait]
    impl EventSubscriber for CompletesExplicitly {
        async fn on_user_action(
            &self,
            event: &DispatchedEvent,
        ) -> Result<Vec<Message>, SubscriberError> {
            event
                .completion
                .complete(vec![Message::delete_surface("explicit")]);
            Ok(vec![Message::delete_surface("returned")])
        }
    }

    #[tokio::test]
    async fn test_complete_only_once() {
        let (event, receiver) = DispatchedEvent::new(action());
        assert!(event.completion.complete(vec![Message::delete_surface("a")]));
        assert!(!event.completion.complete(vec![Message::delete_surface("b")]));
        assert!(event.completion.is_completed());
        assert_eq!(receiver.wait().await, vec![Message::delete_surface("a")]);
    }

    #[tokio::test]
    async fn test_drop_completes_empty() {
        let (event, receiver) = DispatchedEvent::new(action());
        let clone = event.completion.clone();
        drop(event);
        assert!(!clone.is_completed());
        drop(clone);
        assert!(receiver.wait().await.is_empty());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_empty() {
        let channel = EventChannel::new();
        assert!(channel.publish(action()).await.is_empty());
    }

    #[tokio::test]
    async fn test_failing_and_panicking_subscribers_still_complete() {
        let channel = EventChannel::new();
        channel.subscribe(Failing);
        channel.subscribe(Panicking);
        channel.subscribe(subscriber_fn(|action: UserAction| async move {
            Ok::<_, SubscriberError>(vec![Message::delete_surface(action.surface_id)])
        }));

        let responses = channel.publish(action()).await;
        assert_eq!(responses, vec![Message::delete_surface("main")]);
    }

    #[tokio::test]
    async fn test_explicit_completion_wins() {
        let channel = EventChannel::new();
        channel.subscribe(CompletesExplicitly);
        let responses = channel.publish(action()).await;
        assert_eq!(responses, vec![Message::delete_surface("explicit")]);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let calls = Arc::new(AtomicUsize::new(0));
        let channel = EventChannel::new();
        let counter = Arc::clone(&calls);
        let id = channel.subscribe(subscriber_fn(move |_action: UserAction| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, SubscriberError>(Vec::new())
            }
        }));

        channel.publish(action()).await;
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.publish(action()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_dispatched_event_wire_message() {
        let (event, _receiver) = DispatchedEvent::new(action());
        let json = serde_json::to_value(event.message()).unwrap();
        assert_eq!(json["userAction"]["sourceComponentId"], "submit");
    }
}
