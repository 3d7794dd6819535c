//! JavaScript bindings for the planning adapters.
//!
//! Arguments and results cross the boundary as plain JS objects through
//! `serde-wasm-bindgen`. Field names are the Rust ones (`snake_case`).
//! Errors are thrown as strings carrying the error's display text.

use crate::aco::{AcoConfig, Point};
use crate::planning::{
    Activity, BudgetAllocator, BudgetCategory, ItineraryConstraints, ItineraryOptimizer,
    RouteOptimizer,
};
use crate::pso::PsoConfig;
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {what}: {e}")))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: crate::OptimizeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Picks activities for each day of a trip.
///
/// `activities`: `[{ name, rating, price, fatigue_impact }]`;
/// `constraints`: `{ days, max_activities_per_day, budget, prioritize_low_fatigue }`.
#[wasm_bindgen(js_name = optimizeItinerary)]
pub fn optimize_itinerary(
    activities: JsValue,
    constraints: JsValue,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let activities: Vec<Activity> = from_js(activities, "activities")?;
    let constraints: ItineraryConstraints = from_js(constraints, "constraints")?;

    let mut pso = PsoConfig::fast();
    pso.seed = seed;
    let result = ItineraryOptimizer::default()
        .with_pso(pso)
        .optimize(&activities, &constraints)
        .map_err(js_error)?;
    to_js(&result)
}

/// Orders `[{ x, y }]` points into a short closed route.
#[wasm_bindgen(js_name = optimizeRoute)]
pub fn optimize_route(
    locations: JsValue,
    start: Option<usize>,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let locations: Vec<Point> = from_js(locations, "locations")?;

    let mut aco = AcoConfig::fast();
    aco.seed = seed;
    let result = RouteOptimizer::default()
        .with_aco(aco)
        .optimize(&locations, start)
        .map_err(js_error)?;
    to_js(&result)
}

/// Splits `total_budget` over `[{ name, min_percent, max_percent, importance }]`.
#[wasm_bindgen(js_name = optimizeBudgetAllocation)]
pub fn optimize_budget_allocation(
    total_budget: f64,
    categories: JsValue,
    seed: Option<u64>,
) -> Result<JsValue, JsValue> {
    let categories: Vec<BudgetCategory> = from_js(categories, "categories")?;

    let mut pso = BudgetAllocator::default_pso();
    pso.seed = seed;
    let result = BudgetAllocator::default()
        .with_pso(pso)
        .optimize(total_budget, &categories)
        .map_err(js_error)?;
    to_js(&result)
}

/// Crate version, for diagnostics on the JS side.
#[wasm_bindgen(js_name = swarmPlannerVersion)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
