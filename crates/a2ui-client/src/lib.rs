#![doc = include_str!("../README.md")]

pub mod data_model;
pub mod error;
pub mod events;
pub mod processor;
pub mod resolve;
pub mod session;
pub mod stream;
pub mod subscriber;
pub mod surface;
pub mod validation;

pub use data_model::DataModel;
pub use error::{A2uiClientError, SubscriberError};
pub use events::{Completion, DispatchedEvent, EventChannel, SubscriptionId};
pub use processor::{
    MessageProcessor, ProcessReport, ProcessorConfig, ProcessorEvent, SharedProcessor, Snapshot,
};
pub use session::A2uiSession;
pub use stream::{MessageDecoder, MessageStream, MessageTarget, decode_chunks, drive_stream};
pub use subscriber::{EventSubscriber, subscriber_fn};
pub use surface::{MAX_RENDER_DEPTH, ResolvedKind, ResolvedNode, Surface, SurfaceState};
pub use validation::{CountdownStatus, FieldValidation, TimeoutStatus};

pub use a2ui_core as core;
