//! Blueprint analysis via an OpenAI vision model.
//!
//! Per page: classify the trade (context override or keyword counting),
//! detect the drawing scale, build the trade-specific prompt, and send
//! the page image to the chat completions API. Missing credentials or a
//! JSON parse failure fall back to a fixed trade-specific mock analysis;
//! the parse-failure substitution trades correctness for availability
//! and is logged at WARN.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bidforge_core::{
    BidForgeError, BlueprintAnalysis, Fixture, Material, Measurement, Opening, Room, ScaleInfo,
    Trade,
};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use bidforge_analysis::prompts::{build_analysis_prompt, prompt_for};
use bidforge_analysis::{classify_trade, default_keyword_table, detect_scale, merge_page_results};

use crate::response::extract_json_payload;
use crate::retry::{with_retry, RetryPolicy};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const MOCK_CONFIDENCE: f64 = 0.85;

/// Vision-model client for blueprint analysis.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    retry: RetryPolicy,
}

impl VisionClient {
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

    /// Analyze a single blueprint page.
    pub async fn analyze(
        &self,
        image_bytes: &[u8],
        ocr_text: &str,
        context: Option<&Value>,
    ) -> Result<BlueprintAnalysis, BidForgeError> {
        let empty = json!({});
        let context = context.unwrap_or(&empty);
        let override_value = context.get("trade_type").and_then(Value::as_str);
        let trade = classify_trade(ocr_text, override_value, default_keyword_table());
        let scale = detect_scale(ocr_text);

        info!(trade = %trade, scale_detected = scale.is_some(), "analyzing blueprint page");

        let payload = match &self.api_key {
            None => {
                warn!("no OpenAI API key, using mock vision response");
                mock_vision_payload(trade)
            }
            Some(api_key) => {
                let prompt = build_analysis_prompt(trade, ocr_text, context);
                let (_, system) = prompt_for(trade);
                let content = with_retry(&self.retry, "openai.vision", || {
                    self.call_vision_model(api_key, &prompt, system, image_bytes)
                })
                .await?;

                match extract_json_payload(&content) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(error = %e, "vision response was not valid JSON, using mock response");
                        mock_vision_payload(trade)
                    }
                }
            }
        };

        let mut analysis: BlueprintAnalysis = serde_json::from_value(payload)
            .map_err(|e| BidForgeError::InvalidResponse(format!("vision payload: {e}")))?;
        if !(0.0..=1.0).contains(&analysis.confidence_score) {
            return Err(BidForgeError::InvalidResponse(format!(
                "confidence score {} outside [0, 1]",
                analysis.confidence_score
            )));
        }

        analysis.trade = Some(trade);
        if scale.is_some() {
            analysis.scale_info = scale;
        }

        info!(
            rooms = analysis.rooms.len(),
            fixtures = analysis.fixtures.len(),
            confidence = analysis.confidence_score,
            "blueprint page analysis complete"
        );
        Ok(analysis)
    }

    /// Analyze a multi-page document strictly sequentially.
    ///
    /// Page number and total page count are injected into each page's
    /// context; the first page failure aborts the whole aggregation.
    pub async fn analyze_multi_page(
        &self,
        pages: &[(Vec<u8>, String)],
        context: Option<&Value>,
    ) -> Result<BlueprintAnalysis, BidForgeError> {
        let total_pages = pages.len();
        let mut results = Vec::with_capacity(total_pages);

        for (index, (image_bytes, ocr_text)) in pages.iter().enumerate() {
            let mut page_context = match context {
                Some(Value::Object(map)) => map.clone(),
                _ => Map::new(),
            };
            page_context.insert("page_number".to_string(), json!(index + 1));
            page_context.insert("total_pages".to_string(), json!(total_pages));

            let page_result = self
                .analyze(image_bytes, ocr_text, Some(&Value::Object(page_context)))
                .await?;
            results.push(page_result);
        }

        Ok(merge_page_results(results))
    }

    async fn call_vision_model(
        &self,
        api_key: &str,
        prompt: &str,
        system: &str,
        image_bytes: &[u8],
    ) -> Result<String, BidForgeError> {
        let b64 = STANDARD.encode(image_bytes);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": {
                        "url": format!("data:image/png;base64,{b64}"),
                        "detail": "high"
                    }}
                ]}
            ],
            "max_tokens": 4096,
            "temperature": 0.1
        });

        let response = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BidForgeError::Vision(format!("vision call failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(BidForgeError::Vision(format!(
                "vision model returned {status}: {detail}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BidForgeError::Vision(format!("vision response decode failed: {e}")))?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                BidForgeError::InvalidResponse("vision response missing content".to_string())
            })
    }
}

/// Fixed trade-specific analysis payload used when no API key is
/// configured or the model returns unparseable JSON.
fn mock_vision_payload(trade: Trade) -> Value {
    let analysis = mock_vision_analysis(trade);
    serde_json::to_value(analysis).unwrap_or_else(|_| json!({ "confidence_score": 0.0 }))
}

fn mock_vision_analysis(trade: Trade) -> BlueprintAnalysis {
    let rooms = vec![
        Room {
            name: "Living Room".to_string(),
            dimensions: "15' x 20'".to_string(),
            area: 300.0,
            room_type: Some("Living".to_string()),
        },
        Room {
            name: "Bedroom".to_string(),
            dimensions: "12' x 14'".to_string(),
            area: 168.0,
            room_type: Some("Bedroom".to_string()),
        },
        Room {
            name: "Kitchen".to_string(),
            dimensions: "10' x 12'".to_string(),
            area: 120.0,
            room_type: Some("Kitchen".to_string()),
        },
    ];
    let openings = vec![
        Opening {
            opening_type: "Door".to_string(),
            count: 3,
            size: "36\" x 80\"".to_string(),
            details: Some("Standard interior doors".to_string()),
        },
        Opening {
            opening_type: "Window".to_string(),
            count: 5,
            size: "48\" x 60\"".to_string(),
            details: Some("Double-hung windows".to_string()),
        },
    ];
    let mut measurements = vec![
        Measurement {
            measurement_type: "Wall Length".to_string(),
            value: 120.0,
            unit: "feet".to_string(),
            location: Some("Perimeter".to_string()),
        },
        Measurement {
            measurement_type: "Ceiling Height".to_string(),
            value: 9.0,
            unit: "feet".to_string(),
            location: Some("All rooms".to_string()),
        },
    ];
    let materials = vec![
        Material {
            material_name: "Drywall".to_string(),
            quantity: 588.0,
            unit: "sq ft".to_string(),
            specifications: Some("1/2 inch standard drywall".to_string()),
        },
        Material {
            material_name: "Flooring".to_string(),
            quantity: 588.0,
            unit: "sq ft".to_string(),
            specifications: Some("Hardwood or equivalent".to_string()),
        },
    ];

    let fixtures = match trade {
        Trade::Plumbing => vec![
            fixture("Water Closet", "plumbing", 2),
            fixture("Lavatory", "plumbing", 3),
            fixture("Kitchen Sink", "plumbing", 1),
        ],
        Trade::Hvac => vec![
            fixture("Supply Diffuser", "hvac", 8),
            fixture("Return Grille", "hvac", 4),
            fixture("Furnace", "hvac", 1),
        ],
        Trade::Structural => Vec::new(),
        Trade::Electrical | Trade::General => vec![
            fixture("Ceiling Light", "electrical", 6),
            fixture("Outlet", "electrical", 15),
        ],
    };

    if trade == Trade::Structural {
        measurements.extend([
            Measurement {
                measurement_type: "Beam Span".to_string(),
                value: 18.0,
                unit: "feet".to_string(),
                location: Some("Main floor".to_string()),
            },
            Measurement {
                measurement_type: "Column Spacing".to_string(),
                value: 12.0,
                unit: "feet".to_string(),
                location: Some("Grid lines".to_string()),
            },
            Measurement {
                measurement_type: "Footing Depth".to_string(),
                value: 24.0,
                unit: "inches".to_string(),
                location: Some("Perimeter".to_string()),
            },
        ]);
    }

    BlueprintAnalysis {
        rooms,
        openings,
        fixtures,
        measurements,
        materials,
        confidence_score: MOCK_CONFIDENCE,
        scale_info: Some(ScaleInfo {
            scale_string: "1/4\" = 1'-0\"".to_string(),
            pattern: "fractional_inch".to_string(),
            confidence: 0.9,
        }),
        trade: Some(trade),
    }
}

fn fixture(fixture_type: &str, category: &str, count: u32) -> Fixture {
    Fixture {
        fixture_type: fixture_type.to_string(),
        category: category.to_string(),
        count,
        details: None,
    }
}
