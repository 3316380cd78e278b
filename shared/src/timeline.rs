//! Stage timeline projection for harvests
//!
//! Places a harvest's growth stages on the calendar: starting at the harvest's
//! start date, each stage occupies `duration_hours` of wall-clock time, in
//! ascending catalog order. Every interval is evaluated against an explicit
//! instant `now`, which makes the projection a pure function of its inputs.
//!
//! Malformed data never produces an error: a missing start date is read as
//! `now` and bad durations have already been coerced to zero when decoding.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Harvest, ProjectedStage, StageDefinition, StageStatus};
use crate::types::{add_hours, hours_between, saturating_add, Language};

/// Timeline of a harvest evaluated at a given instant
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HarvestTimeline {
    pub harvest_id: String,
    pub harvest_start: DateTime<Utc>,
    /// End of the last stage (the harvest start when there are no stages)
    pub projected_end: DateTime<Utc>,
    pub stages: Vec<ProjectedStage>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_planned_hours: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub elapsed_hours: Decimal,
    /// 0-100, forced to 100 for finished harvests
    pub overall_percent: u8,
    pub current_stage: CurrentStage,
    pub current_stage_label: String,
}

impl HarvestTimeline {
    pub fn active_stage(&self) -> Option<&ProjectedStage> {
        match self.current_stage {
            CurrentStage::Active { index, .. } => self.stages.get(index),
            _ => None,
        }
    }
}

/// Where a harvest currently stands within its stages
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentStage {
    /// Index into the projected (sorted) stages
    Active { index: usize, name: String },
    AllFinished,
    NotStarted,
    NoStages,
}

impl CurrentStage {
    fn resolve(stages: &[ProjectedStage]) -> Self {
        if let Some((index, stage)) = stages
            .iter()
            .enumerate()
            .find(|(_, s)| s.status == StageStatus::Active)
        {
            return CurrentStage::Active {
                index,
                name: stage.name.clone(),
            };
        }

        match stages.last() {
            None => CurrentStage::NoStages,
            Some(last) if last.status == StageStatus::Finished => CurrentStage::AllFinished,
            Some(_) => CurrentStage::NotStarted,
        }
    }

    pub fn label(&self, language: Language) -> String {
        match (self, language) {
            (CurrentStage::Active { name, .. }, _) => name.clone(),
            (CurrentStage::AllFinished, Language::Spanish) => {
                "Todas las etapas finalizadas".to_string()
            }
            (CurrentStage::AllFinished, Language::English) => "All stages finished".to_string(),
            (CurrentStage::NotStarted, Language::Spanish) => "Sin iniciar".to_string(),
            (CurrentStage::NotStarted, Language::English) => "Not started".to_string(),
            (CurrentStage::NoStages, Language::Spanish) => "Sin etapas definidas".to_string(),
            (CurrentStage::NoStages, Language::English) => "No stages defined".to_string(),
        }
    }
}

/// Project a harvest's stages at `now`, labelled in the default language
pub fn project(
    harvest: &Harvest,
    stages: &[StageDefinition],
    now: DateTime<Utc>,
) -> HarvestTimeline {
    project_localized(harvest, stages, now, Language::default())
}

/// Project a harvest's stages against the system clock
pub fn project_now(harvest: &Harvest, stages: &[StageDefinition]) -> HarvestTimeline {
    project(harvest, stages, Utc::now())
}

pub fn project_localized(
    harvest: &Harvest,
    stages: &[StageDefinition],
    now: DateTime<Utc>,
    language: Language,
) -> HarvestTimeline {
    let harvest_start = harvest.start_date.unwrap_or(now);

    let mut cursor = harvest_start;
    let mut total_planned = Decimal::ZERO;
    let mut elapsed = Decimal::ZERO;
    let mut projected = Vec::with_capacity(stages.len());

    for stage in ordered_stages(stages) {
        let duration = stage.planned_hours();
        let start = cursor;
        let end = add_hours(start, duration);

        total_planned = saturating_add(total_planned, duration);
        elapsed = saturating_add(elapsed, elapsed_within(start, end, duration, now));

        projected.push(ProjectedStage {
            stage_id: stage.id.clone(),
            name: stage.name.clone(),
            order_index: stage.order_index,
            duration_hours: duration,
            start,
            end,
            status: StageStatus::evaluate(start, end, now),
            notes: stage.notes.clone(),
        });

        cursor = end;
    }

    let overall_percent = if harvest.is_finished() {
        100
    } else {
        completion_percent(elapsed, total_planned)
    };

    let current_stage = CurrentStage::resolve(&projected);
    let current_stage_label = current_stage.label(language);

    HarvestTimeline {
        harvest_id: harvest.id.clone(),
        harvest_start,
        projected_end: cursor,
        stages: projected,
        total_planned_hours: total_planned,
        elapsed_hours: elapsed.round_dp(3),
        overall_percent,
        current_stage,
        current_stage_label,
    }
}

/// Stages in ascending order; the sort is stable so equal or missing orders
/// (treated as 0) keep the order they were fetched in.
pub fn ordered_stages(stages: &[StageDefinition]) -> Vec<&StageDefinition> {
    let mut ordered: Vec<&StageDefinition> = stages.iter().collect();
    ordered.sort_by_key(|stage| stage.order_index.unwrap_or(0));
    ordered
}

/// Hours of a stage already behind `now`, within `[0, duration]`
fn elapsed_within(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration: Decimal,
    now: DateTime<Utc>,
) -> Decimal {
    if now >= end {
        duration
    } else if now <= start {
        Decimal::ZERO
    } else {
        hours_between(start, now).clamp(Decimal::ZERO, duration)
    }
}

/// `round(100 * elapsed / total)`, half away from zero; 0 without planned hours
pub fn completion_percent(elapsed: Decimal, total: Decimal) -> u8 {
    if total <= Decimal::ZERO {
        return 0;
    }

    let ratio = elapsed
        .checked_div(total)
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, Decimal::ONE);

    (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(0)
}
