//! Business logic services for the greenhouse dashboard client

pub mod harvest;
pub mod timeline;

pub use harvest::HarvestService;
pub use timeline::{build_views, HarvestTimelineView, TimelineService};
