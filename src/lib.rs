//! Adapter between an editor assistant's structured conversation items and
//! Google's Gemini `generateContent` API.
//!
//! The registry describes the invocable model variants, the `ai::gemini`
//! module translates context to Gemini payloads and replies back, and
//! [`ai::dispatch`] offers a callback-style entry point for hosts.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod registry;

pub use ai::{dispatch, ModelBackend};
pub use error::{Error, Result};
pub use models::{Config, ItemKind, StructuredItem};
pub use registry::{list_models, make_model, ModelDescriptor, ModelOptions};
