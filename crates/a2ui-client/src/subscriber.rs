use std::future::Future;

use a2ui_core::types::{Message, UserAction};

use crate::error::SubscriberError;
use crate::events::DispatchedEvent;

/// Receives user actions published on an [`EventChannel`](crate::events::EventChannel).
///
/// A handler may await arbitrary work (typically a round trip to the agent)
/// and returns the messages to feed back into the processor. It can also
/// complete the event itself through `event.completion`; the first
/// completion wins.
#[async_trait::async_trait]
pub trait EventSubscriber: Send + Sync {
    async fn on_user_action(
        &self,
        event: &DispatchedEvent,
    ) -> Result<Vec<Message>, SubscriberError>;
}

/// Adapts an async closure taking the [`UserAction`] into a subscriber.
pub struct FnSubscriber<F> {
    handler: F,
}

/// Wraps `handler` as an [`EventSubscriber`].
///
/// ```rust
/// use a2ui_client::error::SubscriberError;
/// use a2ui_client::subscriber::subscriber_fn;
///
/// let subscriber = subscriber_fn(|action| async move {
///     log::info!("user triggered {}", action.name);
///     Ok::<_, SubscriberError>(Vec::new())
/// });
/// # let _ = subscriber;
/// ```
pub fn subscriber_fn<F, Fut>(handler: F) -> FnSubscriber<F>
where
    F: Fn(UserAction) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Message>, SubscriberError>> + Send,
{
    FnSubscriber { handler }
}

#[async_trait::async_trait]
impl<F, Fut> EventSubscriber for FnSubscriber<F>
where
    F: Fn(UserAction) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Message>, SubscriberError>> + Send,
{
    async fn on_user_action(
        &self,
        event: &DispatchedEvent,
    ) -> Result<Vec<Message>, SubscriberError> {
        (self.handler)(event.action.clone()).await
    }
}
