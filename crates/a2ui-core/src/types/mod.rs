pub mod action;
pub mod client;
pub mod component;
pub mod data;
pub mod ids;
pub mod message;
pub mod value;

pub use action::*;
pub use client::*;
pub use component::*;
pub use data::*;
pub use ids::*;
pub use message::*;
pub use value::*;
