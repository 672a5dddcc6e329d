use std::sync::Arc;

use a2ui_core::types::{Message, UserAction};
use chrono::{SecondsFormat, Utc};
use log::debug;

use crate::error::{A2uiClientError, Result};
use crate::events::EventChannel;
use crate::processor::{
    MessageProcessor, ProcessReport, ProcessorConfig, SharedProcessor, Snapshot,
};
use crate::subscriber::EventSubscriber;

/// One client session: a message processor plus the event channel that
/// carries user actions back to the agent.
///
/// Responses to an action are fed back into the same processor, closing the
/// loop between renderer and agent. The processor is shared, so agent
/// messages keep flowing while an action waits for its response.
#[derive(Debug, Clone, Default)]
pub struct A2uiSession {
    processor: SharedProcessor,
    channel: EventChannel,
}

impl A2uiSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            processor: SharedProcessor::new(MessageProcessor::with_config(config)),
            channel: EventChannel::new(),
        }
    }

    pub fn processor(&self) -> &SharedProcessor {
        &self.processor
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    pub fn subscribe<S>(&self, subscriber: S) -> crate::events::SubscriptionId
    where
        S: EventSubscriber + 'static,
    {
        self.channel.subscribe(subscriber)
    }

    pub fn process_messages<I>(&self, messages: I) -> ProcessReport
    where
        I: IntoIterator<Item = Message>,
    {
        self.processor.process_messages(messages)
    }

    pub fn process_json(&self, json: &str) -> ProcessReport {
        self.processor.process_json(json)
    }

    pub fn refresh(&self) -> Arc<Snapshot> {
        self.processor.refresh()
    }

    /// Builds the action `component_id` raises, stamped with the current time.
    pub fn build_action(&self, surface_id: &str, component_id: &str) -> Result<UserAction> {
        let action = self.processor.read(|processor| {
            let surface =
                processor
                    .surface(surface_id)
                    .ok_or_else(|| A2uiClientError::UnknownSurface {
                        surface_id: surface_id.into(),
                    })?;
            surface.user_action(component_id)
        })?;
        Ok(action.with_timestamp(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)))
    }

    /// Triggers the action of a component and applies the agent's response.
    ///
    /// No lock is held while the subscribers run; other messages may be
    /// applied to the session in the meantime.
    pub async fn trigger(&self, surface_id: &str, component_id: &str) -> Result<ProcessReport> {
        let action = self.build_action(surface_id, component_id)?;
        debug!("Triggering '{}' on surface '{surface_id}'", action.name);
        let responses = self.channel.publish(action).await;
        Ok(self.processor.process_messages(responses))
    }
}
