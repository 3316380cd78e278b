//! Harvest lifecycle service: creation and status changes
//!
//! Inputs are validated locally before anything is sent, so the dashboard can
//! show a precise message without a round trip.

use shared::{validate_status_transition, Harvest, HarvestStatus, NewHarvest};
use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::external::GreenhouseClient;

/// Harvest service for managing harvest records through the API
#[derive(Clone)]
pub struct HarvestService {
    client: GreenhouseClient,
}

impl HarvestService {
    /// Create a new HarvestService instance
    pub fn new(client: GreenhouseClient) -> Self {
        Self { client }
    }

    pub async fn list_harvests(&self) -> ClientResult<Vec<Harvest>> {
        self.client.list_harvests().await
    }

    /// Record a new harvest from the creation form
    pub async fn create_harvest(&self, input: NewHarvest) -> ClientResult<Harvest> {
        let input = prepare_new_harvest(input)?;
        let harvest = self.client.create_harvest(&input).await?;
        tracing::info!(harvest_id = %harvest.id, unit_id = %input.unit_id, "Harvest created");
        Ok(harvest)
    }

    pub async fn pause_harvest(&self, harvest: &Harvest) -> ClientResult<Harvest> {
        self.change_status(harvest, HarvestStatus::Paused).await
    }

    pub async fn resume_harvest(&self, harvest: &Harvest) -> ClientResult<Harvest> {
        self.change_status(harvest, HarvestStatus::Active).await
    }

    /// Manually finalize a harvest; its progress then reads 100%
    pub async fn finalize_harvest(&self, harvest: &Harvest) -> ClientResult<Harvest> {
        self.change_status(harvest, HarvestStatus::Finished).await
    }

    async fn change_status(&self, harvest: &Harvest, to: HarvestStatus) -> ClientResult<Harvest> {
        check_transition(harvest.status, to)?;

        let updated = self.client.update_harvest_status(&harvest.id, to).await?;
        tracing::info!(
            harvest_id = %harvest.id,
            from = %harvest.status,
            to = %to,
            "Harvest status changed"
        );
        Ok(updated)
    }
}

/// Trim and validate a creation form
pub fn prepare_new_harvest(mut input: NewHarvest) -> ClientResult<NewHarvest> {
    input.unit_id = input.unit_id.trim().to_string();
    input.name = input.name.trim().to_string();
    input.observations = input
        .observations
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());

    input.validate()?;
    Ok(input)
}

pub fn check_transition(from: HarvestStatus, to: HarvestStatus) -> ClientResult<()> {
    validate_status_transition(from, to)
        .map_err(|e| ClientError::InvalidStateTransition(format!("{} -> {}: {}", from, to, e)))
}
