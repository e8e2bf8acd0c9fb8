//! Request and response schemas for the HTTP API.

use bidforge_core::{Fixture, LineItem, Material, Measurement, Opening, Room, ScaleInfo, Trade};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /analyze-blueprint`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeBlueprintRequest {
    /// Unique identifier for the blueprint.
    pub blueprint_id: String,
    /// S3 key where the blueprint is stored.
    pub s3_key: String,
    #[serde(default)]
    pub project_name: Option<String>,
    /// Optional analysis options, passed through as model context
    /// (may carry a `trade_type` override).
    #[serde(default)]
    pub options: Option<Value>,
}

/// Body of `POST /generate-bid`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateBidRequest {
    pub project_id: String,
    pub blueprint_id: String,
    /// Material takeoff data from a prior analysis.
    pub takeoff_data: Value,
    #[serde(default)]
    pub pricing_rules: Option<Value>,
    #[serde(default)]
    pub company_info: Option<Value>,
    /// Markup percentage in [0, 100].
    #[serde(default = "default_markup")]
    pub markup_percentage: f64,
}

fn default_markup() -> f64 {
    20.0
}

/// Response of `POST /analyze-blueprint`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeBlueprintResponse {
    pub blueprint_id: String,
    pub status: String,
    pub rooms: Vec<Room>,
    pub openings: Vec<Opening>,
    pub fixtures: Vec<Fixture>,
    pub measurements: Vec<Measurement>,
    pub materials: Vec<Material>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_info: Option<ScaleInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<Trade>,
    pub confidence_score: f64,
    pub processing_time_ms: u64,
}

/// Response of `POST /generate-bid`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBidResponse {
    pub bid_id: String,
    pub project_id: String,
    pub status: String,
    pub scope_of_work: String,
    pub line_items: Vec<LineItem>,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub subtotal: f64,
    pub markup_amount: f64,
    pub total_price: f64,
    pub exclusions: Vec<String>,
    pub inclusions: Vec<String>,
    pub schedule: Map<String, Value>,
    pub payment_terms: String,
    pub warranty_terms: String,
    pub closing_statement: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn markup_defaults_to_twenty_percent() {
        let request: GenerateBidRequest = serde_json::from_value(json!({
            "project_id": "p-1",
            "blueprint_id": "b-1",
            "takeoff_data": {}
        }))
        .unwrap();
        assert_eq!(request.markup_percentage, 20.0);
    }

    #[test]
    fn analyze_request_requires_blueprint_id_and_key() {
        let missing_key = serde_json::from_value::<AnalyzeBlueprintRequest>(json!({
            "blueprint_id": "b-1"
        }));
        assert!(missing_key.is_err());

        let ok: AnalyzeBlueprintRequest = serde_json::from_value(json!({
            "blueprint_id": "b-1",
            "s3_key": "plans/site.pdf"
        }))
        .unwrap();
        assert!(ok.options.is_none());
    }
}
