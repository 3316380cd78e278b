//! WebAssembly module for the Hydroponic Greenhouse Management dashboard
//!
//! Provides client-side computation for:
//! - Harvest stage timelines and overall progress
//! - Current stage labels
//! - Harvest status transition checks
//!
//! Inputs are the raw JSON documents the UI fetched from the greenhouse API,
//! enveloped or not. They are decoded by `shared::payload`, the same code the
//! native API client uses.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::payload::*;
pub use shared::timeline::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Project a harvest's stage timeline.
///
/// `now_ms` is epoch milliseconds (`Date.now()`); pass `NaN` to use the
/// browser clock. Returns the timeline as a JSON string.
#[wasm_bindgen]
pub fn project_harvest_timeline(
    harvest_json: &str,
    stages_json: &str,
    now_ms: f64,
) -> Result<String, JsValue> {
    timeline_json(harvest_json, stages_json, now_ms).map_err(report)
}

/// Overall completion percentage (0-100) of a harvest
#[wasm_bindgen]
pub fn harvest_overall_percent(
    harvest_json: &str,
    stages_json: &str,
    now_ms: f64,
) -> Result<u8, JsValue> {
    timeline_from_json(harvest_json, stages_json, now_ms, Language::default())
        .map(|timeline| timeline.overall_percent)
        .map_err(report)
}

/// Label of the current stage in the given language (`es` or `en`)
#[wasm_bindgen]
pub fn current_stage_label(
    harvest_json: &str,
    stages_json: &str,
    now_ms: f64,
    lang: &str,
) -> Result<String, JsValue> {
    timeline_from_json(harvest_json, stages_json, now_ms, Language::from_code(lang))
        .map(|timeline| timeline.current_stage_label)
        .map_err(report)
}

/// Check whether a harvest may move from one status to another
#[wasm_bindgen]
pub fn can_transition_harvest(from: &str, to: &str) -> bool {
    match (from.parse::<HarvestStatus>(), to.parse::<HarvestStatus>()) {
        (Ok(from), Ok(to)) => can_transition(from, to),
        _ => false,
    }
}

fn timeline_json(harvest_json: &str, stages_json: &str, now_ms: f64) -> Result<String, String> {
    let timeline = timeline_from_json(harvest_json, stages_json, now_ms, Language::default())?;
    serde_json::to_string(&timeline).map_err(|e| format!("Failed to encode timeline: {}", e))
}

/// Decode the API documents and project them.
///
/// Invalid JSON, a harvest that is not a record and a stage payload that is
/// not a list are errors. Stage entries that are not records are skipped and
/// bad field values are coerced.
fn timeline_from_json(
    harvest_json: &str,
    stages_json: &str,
    now_ms: f64,
    language: Language,
) -> Result<HarvestTimeline, String> {
    let harvest: Value = serde_json::from_str(harvest_json)
        .map_err(|e| format!("Invalid harvest JSON: {}", e))?;
    let stages: Value = serde_json::from_str(stages_json)
        .map_err(|e| format!("Invalid stages JSON: {}", e))?;

    let harvest: Harvest = decode_record(harvest).map_err(|e| format!("Invalid harvest: {}", e))?;
    let stages = decode_list::<StageDefinition>(stages)
        .map_err(|e| format!("Invalid stages: {}", e))?;
    for reason in &stages.skipped {
        warn(&format!("Skipping malformed stage: {}", reason));
    }

    let now = resolve_now(now_ms);
    Ok(project_localized(&harvest, &stages.records, now, language))
}

/// Log to the browser console and hand the message back to JavaScript
fn report(message: String) -> JsValue {
    let value = JsValue::from_str(&message);
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&value);
    value
}

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}

fn resolve_now(now_ms: f64) -> DateTime<Utc> {
    let millis = if now_ms.is_finite() {
        now_ms
    } else {
        browser_now()
    };

    Utc.timestamp_millis_opt(millis as i64)
        .single()
        .unwrap_or_else(Utc::now)
}

#[cfg(target_arch = "wasm32")]
fn browser_now() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_now() -> f64 {
    Utc::now().timestamp_millis() as f64
}
