//! External service integrations

pub mod greenhouse;

pub use greenhouse::GreenhouseClient;
