//! Harvest timeline service
//!
//! Fetches harvests, the stage catalog and growing units once, then projects
//! every harvest at the same instant so a whole listing is consistent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    project_localized, validate_stage_catalog, GrowingUnit, Harvest, HarvestTimeline, Language,
    StageDefinition,
};

use crate::error::{ClientError, ClientResult};
use crate::external::GreenhouseClient;

/// Timeline service combining API data with the stage projection
#[derive(Clone)]
pub struct TimelineService {
    client: GreenhouseClient,
    language: Language,
}

/// A harvest with its projected timeline, ready for display
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarvestTimelineView {
    pub harvest: Harvest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    pub timeline: HarvestTimeline,
}

impl TimelineService {
    pub fn new(client: GreenhouseClient, language: Language) -> Self {
        Self { client, language }
    }

    /// Timeline of a single harvest at `now`
    pub async fn harvest_timeline(
        &self,
        harvest_id: &str,
        now: DateTime<Utc>,
    ) -> ClientResult<HarvestTimelineView> {
        let harvest = self.client.get_harvest(harvest_id).await?;
        let stages = self.stage_catalog().await?;
        let units = self.units().await;

        build_views(vec![harvest], &stages, &units, now, self.language)
            .pop()
            .ok_or_else(|| ClientError::NotFound(format!("Harvest {}", harvest_id)))
    }

    /// Timelines of every harvest at `now`
    pub async fn all_timelines(&self, now: DateTime<Utc>) -> ClientResult<Vec<HarvestTimelineView>> {
        let harvests = self.client.list_harvests().await?;
        let stages = self.stage_catalog().await?;
        let units = self.units().await;

        tracing::info!(
            harvests = harvests.len(),
            stages = stages.len(),
            "Projecting harvest timelines"
        );
        Ok(build_views(harvests, &stages, &units, now, self.language))
    }

    async fn stage_catalog(&self) -> ClientResult<Vec<StageDefinition>> {
        let stages = self.client.list_stage_definitions().await?;
        if let Err(problem) = validate_stage_catalog(&stages) {
            tracing::warn!(problem, "Stage catalog is ambiguous; keeping fetch order for ties");
        }
        Ok(stages)
    }

    /// Unit names are decoration; a failing units endpoint does not block timelines
    async fn units(&self) -> Vec<GrowingUnit> {
        match self.client.list_units().await {
            Ok(units) => units,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load growing units");
                Vec::new()
            }
        }
    }
}

/// Project each harvest against the shared catalog at a single instant
pub fn build_views(
    harvests: Vec<Harvest>,
    stages: &[StageDefinition],
    units: &[GrowingUnit],
    now: DateTime<Utc>,
    language: Language,
) -> Vec<HarvestTimelineView> {
    let unit_names: HashMap<&str, String> = units
        .iter()
        .map(|unit| (unit.id.as_str(), unit.display_name()))
        .collect();

    harvests
        .into_iter()
        .map(|harvest| {
            let timeline = project_localized(&harvest, stages, now, language);
            let unit_name = harvest
                .unit_id
                .as_deref()
                .and_then(|id| unit_names.get(id).cloned());

            HarvestTimelineView {
                harvest,
                unit_name,
                timeline,
            }
        })
        .collect()
}
