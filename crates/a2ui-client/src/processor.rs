//! The message processor: owner of the surface table.
//!
//! Messages are applied strictly in the order given, each atomically. The
//! processor is pull-based: after applying a batch the caller takes a
//! [`Snapshot`] with [`MessageProcessor::refresh`] and hands it to the
//! renderer.
//!
//! # Example
//!
//! ```rust
//! use a2ui_client::processor::MessageProcessor;
//!
//! let mut processor = MessageProcessor::new();
//! let report = processor.process_json(r#"[
//!     {"surfaceUpdate": {"surfaceId": "main", "components": [
//!         {"id": "root", "component": {"Text": {"text": {"literalString": "Hi"}}}}
//!     ]}},
//!     {"beginRendering": {"surfaceId": "main", "root": "root"}}
//! ]"#);
//! assert_eq!(report.applied, 2);
//!
//! let snapshot = processor.refresh();
//! assert!(snapshot.get("main").unwrap().is_rendering());
//! ```

use crate::surface::Surface;
use a2ui_core::types::{
    BeginRendering, ComponentId, DataModelUpdate, DeleteSurface, Message, SurfaceId,
    SurfaceUpdate,
};
use a2ui_core::{DecodeError, JsonValue};
use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Runtime options for a [`MessageProcessor`].
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Log dangling child references when a surface starts rendering.
    pub warn_on_dangling_references: bool,
    /// Log the full payload of every applied message.
    pub debug: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            warn_on_dangling_references: true,
            debug: false,
        }
    }
}

impl ProcessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dangling_reference_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_dangling_references = enabled;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// What applying a message changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorEvent {
    SurfaceCreated(SurfaceId),
    ComponentsUpdated {
        surface_id: SurfaceId,
        component_ids: Vec<ComponentId>,
    },
    DataModelUpdated {
        surface_id: SurfaceId,
        scopes: Vec<String>,
    },
    RenderingStarted {
        surface_id: SurfaceId,
        root: ComponentId,
    },
    /// `beginRendering` named a root that is not defined yet.
    RenderingDeferred {
        surface_id: SurfaceId,
        root: ComponentId,
    },
    SurfaceDeleted(SurfaceId),
}

impl ProcessorEvent {
    pub fn surface_id(&self) -> &SurfaceId {
        match self {
            ProcessorEvent::SurfaceCreated(id) | ProcessorEvent::SurfaceDeleted(id) => id,
            ProcessorEvent::ComponentsUpdated { surface_id, .. }
            | ProcessorEvent::DataModelUpdated { surface_id, .. }
            | ProcessorEvent::RenderingStarted { surface_id, .. }
            | ProcessorEvent::RenderingDeferred { surface_id, .. } => surface_id,
        }
    }
}

/// An input that could not be decoded and was skipped.
#[derive(Debug)]
pub struct SkippedInput {
    /// Position of the input within the batch.
    pub index: usize,
    pub error: DecodeError,
}

/// Outcome of applying a batch of messages.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub events: Vec<ProcessorEvent>,
    /// Number of messages applied.
    pub applied: usize,
    pub skipped: Vec<SkippedInput>,
}

impl ProcessReport {
    /// `true` if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Ids of surfaces touched by this batch, in first-touch order.
    pub fn touched_surfaces(&self) -> Vec<&SurfaceId> {
        let mut ids: Vec<&SurfaceId> = Vec::new();
        for event in &self.events {
            let id = event.surface_id();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn merge(&mut self, other: ProcessReport) {
        let offset = self.applied + self.skipped.len();
        self.events.extend(other.events);
        self.applied += other.applied;
        self.skipped
            .extend(other.skipped.into_iter().map(|mut skipped| {
                skipped.index += offset;
                skipped
            }));
    }
}

/// Immutable view of the surface set at the time of a refresh.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    surfaces: Vec<Arc<Surface>>,
}

impl Snapshot {
    pub fn get(&self, id: &str) -> Option<&Surface> {
        self.surfaces
            .iter()
            .find(|surface| surface.id() == id)
            .map(Arc::as_ref)
    }

    /// Surfaces in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter().map(Arc::as_ref)
    }

    pub fn surface_ids(&self) -> Vec<&SurfaceId> {
        self.surfaces.iter().map(|surface| surface.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Applies A2UI messages to a table of surfaces.
///
/// Surfaces are stored behind `Arc` and copied on write, so a snapshot taken
/// by [`refresh`](Self::refresh) is never affected by later messages.
#[derive(Debug, Default)]
pub struct MessageProcessor {
    surfaces: HashMap<SurfaceId, Arc<Surface>>,
    order: Vec<SurfaceId>,
    config: ProcessorConfig,
}

impl MessageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProcessorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn surface(&self, id: &str) -> Option<&Surface> {
        self.surfaces.get(id).map(Arc::as_ref)
    }

    pub fn surface_count(&self) -> usize {
        self.order.len()
    }

    /// Takes a snapshot of the current surface set.
    pub fn refresh(&self) -> Arc<Snapshot> {
        let surfaces = self
            .order
            .iter()
            .filter_map(|id| self.surfaces.get(id).cloned())
            .collect();
        Arc::new(Snapshot { surfaces })
    }

    /// Applies one message and returns what it changed.
    pub fn process_message(&mut self, message: Message) -> Vec<ProcessorEvent> {
        if self.config.debug {
            debug!("Applying {message:?}");
        } else {
            debug!("Applying {} for surface '{}'", message.kind(), message.surface_id());
        }

        let mut events = Vec::new();
        match message {
            Message::SurfaceUpdate(SurfaceUpdate {
                surface_id,
                components,
            }) => {
                let component_ids = self
                    .ensure_surface(&surface_id, &mut events)
                    .upsert_components(components);
                events.push(ProcessorEvent::ComponentsUpdated {
                    surface_id,
                    component_ids,
                });
            }
            Message::DataModelUpdate(DataModelUpdate {
                surface_id,
                contents,
            }) => {
                let scopes = self
                    .ensure_surface(&surface_id, &mut events)
                    .apply_data(contents);
                events.push(ProcessorEvent::DataModelUpdated { surface_id, scopes });
            }
            Message::BeginRendering(BeginRendering { surface_id, root }) => {
                let warn_dangling = self.config.warn_on_dangling_references;
                let surface = self.ensure_surface(&surface_id, &mut events);
                if surface.begin_rendering(root.clone()) {
                    if warn_dangling {
                        for dangling in surface.dangling_references() {
                            match &dangling.from {
                                Some(from) => warn!(
                                    "Surface '{surface_id}': component '{from}' references undefined component '{}'",
                                    dangling.missing
                                ),
                                None => warn!(
                                    "Surface '{surface_id}': root '{}' is undefined",
                                    dangling.missing
                                ),
                            }
                        }
                    }
                    events.push(ProcessorEvent::RenderingStarted { surface_id, root });
                } else {
                    warn!(
                        "Surface '{surface_id}': beginRendering names undefined root '{root}', ignoring"
                    );
                    events.push(ProcessorEvent::RenderingDeferred { surface_id, root });
                }
            }
            Message::DeleteSurface(DeleteSurface { surface_id }) => {
                if self.surfaces.remove(&surface_id).is_some() {
                    self.order.retain(|id| id != &surface_id);
                    events.push(ProcessorEvent::SurfaceDeleted(surface_id));
                } else {
                    debug!("Surface '{surface_id}' already absent, nothing to delete");
                }
            }
        }
        events
    }

    /// Applies messages in order.
    pub fn process_messages<I>(&mut self, messages: I) -> ProcessReport
    where
        I: IntoIterator<Item = Message>,
    {
        let mut report = ProcessReport::default();
        for message in messages {
            report.events.extend(self.process_message(message));
            report.applied += 1;
        }
        report
    }

    /// Decodes and applies JSON values in order, skipping malformed ones.
    pub fn process_values<I>(&mut self, values: I) -> ProcessReport
    where
        I: IntoIterator<Item = JsonValue>,
    {
        self.process_results(values.into_iter().map(Message::from_value))
    }

    /// Applies already-decoded results, reporting the failures as skipped.
    pub fn process_results<I>(&mut self, results: I) -> ProcessReport
    where
        I: IntoIterator<Item = Result<Message, DecodeError>>,
    {
        let mut report = ProcessReport::default();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(message) => {
                    report.events.extend(self.process_message(message));
                    report.applied += 1;
                }
                Err(error) => {
                    warn!("Skipping malformed message #{index}: {error}");
                    report.skipped.push(SkippedInput { index, error });
                }
            }
        }
        report
    }

    /// Applies JSON text holding either one message object or an array of
    /// them.
    pub fn process_json(&mut self, json: &str) -> ProcessReport {
        match serde_json::from_str::<JsonValue>(json) {
            Ok(JsonValue::Array(values)) => self.process_values(values),
            Ok(value) => self.process_values([value]),
            Err(err) => {
                warn!("Skipping unparseable message batch: {err}");
                ProcessReport {
                    skipped: vec![SkippedInput {
                        index: 0,
                        error: err.into(),
                    }],
                    ..ProcessReport::default()
                }
            }
        }
    }

    fn ensure_surface(
        &mut self,
        surface_id: &SurfaceId,
        events: &mut Vec<ProcessorEvent>,
    ) -> &mut Surface {
        let surface = self.surfaces.entry(surface_id.clone()).or_insert_with(|| {
            debug!("Creating surface '{surface_id}'");
            self.order.push(surface_id.clone());
            events.push(ProcessorEvent::SurfaceCreated(surface_id.clone()));
            Arc::new(Surface::new(surface_id.clone()))
        });
        Arc::make_mut(surface)
    }
}

/// A [`MessageProcessor`] shared between producers and renderers.
///
/// Writers serialize through one lock; readers take snapshots.
#[derive(Debug, Clone, Default)]
pub struct SharedProcessor {
    inner: Arc<RwLock<MessageProcessor>>,
}

impl SharedProcessor {
    pub fn new(processor: MessageProcessor) -> Self {
        Self {
            inner: Arc::new(RwLock::new(processor)),
        }
    }

    /// Read the processor without modification.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&MessageProcessor) -> R,
    {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Run `f` with exclusive access to the processor.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut MessageProcessor) -> R,
    {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    pub fn process_messages<I>(&self, messages: I) -> ProcessReport
    where
        I: IntoIterator<Item = Message>,
    {
        self.update(|processor| processor.process_messages(messages))
    }

    pub fn process_json(&self, json: &str) -> ProcessReport {
        self.update(|processor| processor.process_json(json))
    }

    #[must_use]
    pub fn refresh(&self) -> Arc<Snapshot> {
        self.inner.read().refresh()
    }
}
