//! Shared types and models for the Hydroponic Greenhouse Management dashboard
//!
//! This crate contains the harvest domain model and the stage timeline
//! projection shared by the browser bindings (via WASM) and the API client.

pub mod lenient;
pub mod models;
pub mod payload;
pub mod timeline;
pub mod types;
pub mod validation;

pub use models::*;
pub use payload::*;
pub use timeline::*;
pub use types::*;
pub use validation::*;
