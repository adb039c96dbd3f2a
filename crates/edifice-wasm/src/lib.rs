use std::collections::BTreeMap;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use edifice_core::{
    analyze_volume as run_volume_analysis, AnalysisReport, ElevationGrid, FieldStats,
    TerrainParams, TerrainSuite, VolumeAnalysis, VolumeParams,
};

#[derive(Debug, Serialize)]
struct VolumeOutput {
    report: AnalysisReport,
    analysis: VolumeAnalysis,
    elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
struct TerrainOutput {
    /// Keyed by catalog title.
    catalog: BTreeMap<&'static str, FieldStats>,
    curvature: BTreeMap<&'static str, FieldStats>,
    elapsed_ms: f64,
}

fn parse_grid(grid_json: &str) -> Result<ElevationGrid, String> {
    let grid: ElevationGrid =
        serde_json::from_str(grid_json).map_err(|e| format!("Invalid grid: {e}"))?;
    grid.validate().map_err(|e| e.to_string())?;
    Ok(grid)
}

/// Empty input means "all defaults".
fn parse_params<T: serde::de::DeserializeOwned + Default>(json: &str) -> Result<T, String> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(json).map_err(|e| format!("Invalid params: {e}"))
}

fn volume_output(grid_json: &str, params_json: &str) -> Result<VolumeOutput, String> {
    let grid = parse_grid(grid_json)?;
    let params: VolumeParams = parse_params(params_json)?;
    let analysis = run_volume_analysis(&grid, &params).map_err(|e| e.to_string())?;
    Ok(VolumeOutput { report: analysis.report(), analysis, elapsed_ms: 0.0 })
}

fn terrain_output(grid_json: &str, params_json: &str) -> Result<TerrainOutput, String> {
    let grid = parse_grid(grid_json)?;
    let params: TerrainParams = parse_params(params_json)?;
    let suite = TerrainSuite::compute(&grid, &params).map_err(|e| e.to_string())?;
    Ok(TerrainOutput {
        catalog: suite.catalog_statistics(),
        curvature: suite.curvature_statistics(),
        elapsed_ms: 0.0,
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Run the volume workflow on a serialised `ElevationGrid`.
/// Returns `{ report, analysis, elapsed_ms }`.
#[wasm_bindgen]
pub fn analyze_volume(grid_json: &str, params_json: &str) -> Result<JsValue, JsValue> {
    let t0 = js_sys::Date::now();
    let mut out = volume_output(grid_json, params_json).map_err(|e| JsValue::from_str(&e))?;
    out.elapsed_ms = js_sys::Date::now() - t0;
    to_js(&out)
}

/// Compute the terrain battery and return its statistics,
/// `{ catalog, curvature, elapsed_ms }`.
#[wasm_bindgen]
pub fn terrain_statistics(grid_json: &str, params_json: &str) -> Result<JsValue, JsValue> {
    let t0 = js_sys::Date::now();
    let mut out = terrain_output(grid_json, params_json).map_err(|e| JsValue::from_str(&e))?;
    out.elapsed_ms = js_sys::Date::now() - t0;
    to_js(&out)
}
