//! Hydroponic Greenhouse Management - API client
//!
//! Talks to the greenhouse REST API (harvests, stage catalog, growing units),
//! keeps the bearer session and projects harvest stage timelines.

pub mod config;
pub mod error;
pub mod external;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use external::GreenhouseClient;
