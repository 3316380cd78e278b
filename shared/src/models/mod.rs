//! Domain models for the Hydroponic Greenhouse Management dashboard

mod harvest;
mod stage;
mod unit;

pub use harvest::*;
pub use stage::*;
pub use unit::*;
