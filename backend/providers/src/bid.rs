//! Bid package generation via a text model.
//!
//! The generative reasoning is delegated to the model; local
//! responsibility is confined to request shaping, structural validation
//! of the returned JSON, and numeric consistency enforcement. Missing
//! credentials or unparseable output fall back to a deterministic bid
//! derived from the takeoff data.

use bidforge_core::{BidForgeError, BidPackage, LineItem};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use bidforge_analysis::prompts::{bid_response_schema, BID_GENERATION_PROMPT, BID_SYSTEM_PROMPT};

use crate::response::extract_json_payload;
use crate::retry::{with_retry, RetryPolicy};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default unit costs used for the deterministic fallback bid, keyed by
/// a lowercase substring of the material name.
const DEFAULT_UNIT_COSTS: &[(&str, f64)] = &[
    ("drywall", 2.5),
    ("flooring", 6.0),
    ("concrete", 150.0),
    ("lumber", 3.5),
    ("paint", 1.5),
    ("insulation", 1.8),
    ("roofing", 4.5),
];
const FALLBACK_UNIT_COST: f64 = 10.0;

/// Labor in the fallback bid is estimated as half the material subtotal.
const FALLBACK_LABOR_RATIO: f64 = 0.5;

/// Tolerance for accepting model-reported rollups before recomputing.
const ROLLUP_TOLERANCE: f64 = 0.01;

/// Model payload shape for a generated bid, before local ids and
/// consistency enforcement are applied.
#[derive(Debug, Default, Deserialize)]
struct BidDraft {
    #[serde(default)]
    scope_of_work: String,
    #[serde(default)]
    line_items: Vec<LineItem>,
    #[serde(default)]
    labor_cost: f64,
    #[serde(default)]
    material_cost: f64,
    #[serde(default)]
    subtotal: f64,
    #[serde(default)]
    markup_amount: f64,
    #[serde(default)]
    total_price: f64,
    #[serde(default)]
    exclusions: Vec<String>,
    #[serde(default)]
    inclusions: Vec<String>,
    #[serde(default)]
    schedule: Map<String, Value>,
    #[serde(default)]
    payment_terms: String,
    #[serde(default)]
    warranty_terms: String,
    #[serde(default)]
    closing_statement: String,
}

/// Text-model client for bid package generation.
#[derive(Debug, Clone)]
pub struct BidClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    retry: RetryPolicy,
}

impl BidClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            model: model.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate a bid package from takeoff data and pricing inputs.
    pub async fn generate_bid(
        &self,
        takeoff_data: &Value,
        pricing_rules: Option<&Value>,
        company_info: Option<&Value>,
        project_info: &Value,
        markup_percentage: f64,
    ) -> Result<BidPackage, BidForgeError> {
        let draft = match &self.api_key {
            None => {
                warn!("no OpenAI API key, using deterministic fallback bid");
                fallback_bid_draft(takeoff_data)
            }
            Some(api_key) => {
                let prompt = build_bid_prompt(
                    takeoff_data,
                    pricing_rules,
                    company_info,
                    project_info,
                    markup_percentage,
                );
                let content = with_retry(&self.retry, "openai.bid", || {
                    self.call_bid_model(api_key, &prompt)
                })
                .await?;

                match extract_json_payload(&content) {
                    Ok(value) => serde_json::from_value(value).map_err(|e| {
                        BidForgeError::InvalidResponse(format!("bid payload: {e}"))
                    })?,
                    Err(e) => {
                        warn!(error = %e, "bid response was not valid JSON, using fallback bid");
                        fallback_bid_draft(takeoff_data)
                    }
                }
            }
        };

        let mut package = BidPackage {
            bid_id: Uuid::new_v4().to_string(),
            scope_of_work: draft.scope_of_work,
            line_items: draft.line_items,
            labor_cost: draft.labor_cost,
            material_cost: draft.material_cost,
            subtotal: draft.subtotal,
            markup_amount: draft.markup_amount,
            total_price: draft.total_price,
            exclusions: draft.exclusions,
            inclusions: draft.inclusions,
            schedule: draft.schedule,
            payment_terms: draft.payment_terms,
            warranty_terms: draft.warranty_terms,
            closing_statement: draft.closing_statement,
        };
        enforce_consistency(&mut package, markup_percentage);

        info!(
            bid_id = %package.bid_id,
            line_items = package.line_items.len(),
            total_price = package.total_price,
            "bid package generated"
        );
        Ok(package)
    }

    async fn call_bid_model(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, BidForgeError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": BID_SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": 4096,
            "temperature": 0.2
        });

        let response = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BidForgeError::Bid(format!("bid model call failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(BidForgeError::Bid(format!(
                "bid model returned {status}: {detail}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BidForgeError::Bid(format!("bid response decode failed: {e}")))?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                BidForgeError::InvalidResponse("bid response missing content".to_string())
            })
    }
}

fn build_bid_prompt(
    takeoff_data: &Value,
    pricing_rules: Option<&Value>,
    company_info: Option<&Value>,
    project_info: &Value,
    markup_percentage: f64,
) -> String {
    let pretty = |v: &Value| serde_json::to_string_pretty(v).unwrap_or_else(|_| "{}".to_string());
    let schema = pretty(&bid_response_schema());
    let none = json!({});

    BID_GENERATION_PROMPT
        .replace("{project_info}", &pretty(project_info))
        .replace("{takeoff_summary}", &pretty(takeoff_data))
        .replace("{pricing_rules}", &pretty(pricing_rules.unwrap_or(&none)))
        .replace("{company_info}", &pretty(company_info.unwrap_or(&none)))
        .replace("{markup_percentage}", &format!("{markup_percentage}"))
        .replace("{json_schema}", &schema)
}

/// Enforce the bid's numeric invariants:
/// per-item totals, `subtotal = Σ line totals`,
/// `markup_amount = subtotal × markup / 100`, and
/// `total_price = subtotal + markup_amount`.
pub fn enforce_consistency(package: &mut BidPackage, markup_percentage: f64) {
    for item in &mut package.line_items {
        let expected = item.quantity * item.unit_cost;
        if (item.total - expected).abs() > ROLLUP_TOLERANCE {
            item.total = expected;
        }
    }

    let item_sum: f64 = package.line_items.iter().map(|i| i.total).sum();
    if (package.subtotal - item_sum).abs() > ROLLUP_TOLERANCE {
        package.subtotal = item_sum;
    }
    package.markup_amount = package.subtotal * markup_percentage / 100.0;
    package.total_price = package.subtotal + package.markup_amount;
}

/// Deterministic bid derived from the takeoff when no model is available.
///
/// Materials in the takeoff become line items priced from the default
/// unit-cost table; labor is added as a single line item.
fn fallback_bid_draft(takeoff_data: &Value) -> BidDraft {
    let mut line_items = Vec::new();

    for material in takeoff_data["materials"].as_array().into_iter().flatten() {
        let name = material["material_name"].as_str().unwrap_or("Material");
        let quantity = material["quantity"].as_f64().unwrap_or(1.0);
        let unit = material["unit"].as_str().unwrap_or("ea");
        line_items.push(LineItem::new(name, quantity, unit, default_unit_cost(name)));
    }

    if line_items.is_empty() {
        line_items.push(LineItem::new("General construction allowance", 1.0, "ls", 5000.0));
    }

    let material_cost: f64 = line_items.iter().map(|i| i.total).sum();
    let labor_cost = material_cost * FALLBACK_LABOR_RATIO;
    line_items.push(LineItem::new("Labor", 1.0, "ls", labor_cost));

    let mut schedule = Map::new();
    schedule.insert("mobilization".to_string(), json!("Week 1"));
    schedule.insert("rough_in".to_string(), json!("Weeks 2-4"));
    schedule.insert("finish_work".to_string(), json!("Weeks 5-6"));

    BidDraft {
        scope_of_work: "Furnish and install all materials per the attached takeoff, \
                        including preparation, installation, and cleanup."
            .to_string(),
        line_items,
        labor_cost,
        material_cost,
        exclusions: vec![
            "Permits and inspection fees".to_string(),
            "Hazardous material abatement".to_string(),
            "Work outside the documented scope".to_string(),
        ],
        inclusions: vec![
            "All materials listed in the takeoff".to_string(),
            "Labor and standard equipment".to_string(),
            "Site cleanup and debris removal".to_string(),
        ],
        schedule,
        payment_terms: "50% deposit on contract signing, balance due on completion.".to_string(),
        warranty_terms: "One year workmanship warranty from date of substantial completion."
            .to_string(),
        closing_statement: "We appreciate the opportunity to bid this project and look \
                            forward to working with you."
            .to_string(),
        ..Default::default()
    }
}

fn default_unit_cost(material_name: &str) -> f64 {
    let lowered = material_name.to_lowercase();
    DEFAULT_UNIT_COSTS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, cost)| *cost)
        .unwrap_or(FALLBACK_UNIT_COST)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_with_items(items: Vec<LineItem>) -> BidPackage {
        BidPackage {
            bid_id: "test".to_string(),
            line_items: items,
            ..Default::default()
        }
    }

    #[test]
    fn markup_math_holds_for_single_item() {
        let mut package = package_with_items(vec![LineItem::new("Framing", 1.0, "ls", 100.0)]);
        enforce_consistency(&mut package, 20.0);
        assert_eq!(package.subtotal, 100.0);
        assert_eq!(package.markup_amount, 20.0);
        assert_eq!(package.total_price, 120.0);
    }

    #[test]
    fn zero_markup_means_total_equals_subtotal() {
        let mut package = package_with_items(vec![LineItem::new("Framing", 2.0, "ea", 50.0)]);
        enforce_consistency(&mut package, 0.0);
        assert_eq!(package.markup_amount, 0.0);
        assert_eq!(package.total_price, package.subtotal);
    }

    #[test]
    fn full_markup_doubles_the_subtotal() {
        let mut package = package_with_items(vec![LineItem::new("Framing", 1.0, "ls", 250.0)]);
        enforce_consistency(&mut package, 100.0);
        assert_eq!(package.total_price, 500.0);
    }

    #[test]
    fn inconsistent_rollups_are_recomputed() {
        let mut package = package_with_items(vec![
            LineItem {
                description: "Drywall".to_string(),
                quantity: 10.0,
                unit: "sheet".to_string(),
                unit_cost: 12.0,
                total: 999.0, // wrong on purpose
            },
        ]);
        package.subtotal = 1.0;
        package.total_price = 2.0;
        enforce_consistency(&mut package, 10.0);
        assert_eq!(package.line_items[0].total, 120.0);
        assert_eq!(package.subtotal, 120.0);
        assert_eq!(package.markup_amount, 12.0);
        assert_eq!(package.total_price, 132.0);
    }

    #[test]
    fn fallback_bid_prices_materials_from_table() {
        let takeoff = json!({
            "materials": [
                { "material_name": "Drywall", "quantity": 100.0, "unit": "sq ft" },
                { "material_name": "Mystery widget", "quantity": 2.0, "unit": "ea" }
            ]
        });
        let draft = fallback_bid_draft(&takeoff);
        // Two material items plus labor.
        assert_eq!(draft.line_items.len(), 3);
        assert_eq!(draft.line_items[0].unit_cost, 2.5);
        assert_eq!(draft.line_items[1].unit_cost, FALLBACK_UNIT_COST);
        assert_eq!(draft.material_cost, 270.0);
        assert_eq!(draft.labor_cost, 135.0);
    }

    #[test]
    fn fallback_bid_without_materials_uses_allowance() {
        let draft = fallback_bid_draft(&json!({}));
        assert!(draft
            .line_items
            .iter()
            .any(|i| i.description.contains("allowance")));
    }

    #[tokio::test]
    async fn generate_bid_without_key_satisfies_invariants() {
        let client = BidClient::new(reqwest::Client::new(), None, "gpt-4o");
        let takeoff = json!({
            "materials": [
                { "material_name": "Flooring", "quantity": 200.0, "unit": "sq ft" }
            ]
        });
        let project = json!({ "project_id": "p-1", "blueprint_id": "b-1" });
        let package = client
            .generate_bid(&takeoff, None, None, &project, 20.0)
            .await
            .unwrap();

        let item_sum: f64 = package.line_items.iter().map(|i| i.total).sum();
        assert!((package.subtotal - item_sum).abs() < 1e-9);
        assert!((package.markup_amount - package.subtotal * 0.2).abs() < 1e-9);
        assert!(
            (package.total_price - (package.subtotal + package.markup_amount)).abs() < 1e-9
        );
        assert!(!package.bid_id.is_empty());
        assert!(!package.scope_of_work.is_empty());
    }

    #[test]
    fn bid_prompt_substitutes_all_placeholders() {
        let prompt = build_bid_prompt(
            &json!({"materials": []}),
            None,
            None,
            &json!({"project_id": "p-1"}),
            15.0,
        );
        assert!(prompt.contains("15%"));
        assert!(prompt.contains("p-1"));
        assert!(!prompt.contains("{takeoff_summary}"));
        assert!(!prompt.contains("{json_schema}"));
    }
}
