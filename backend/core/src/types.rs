//! Blueprint analysis and bid data model.
//!
//! These types mirror the wire format of the estimation API: snake_case
//! field names, optional detail fields, and confidence scores normalized
//! to the `[0, 1]` range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A room identified on a blueprint page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// Dimension annotation as written on the drawing, e.g. `15' x 20'`.
    pub dimensions: String,
    /// Area in square feet.
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
}

/// A door or window opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub opening_type: String,
    pub count: u32,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A plumbing, electrical, or HVAC fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_type: String,
    /// Trade category: plumbing, electrical, hvac.
    pub category: String,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A dimensional measurement taken from the drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub measurement_type: String,
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A material called out in annotations or legends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub material_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
}

/// Architectural scale notation found in extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    /// The matched notation as it appeared, e.g. `1/4" = 1'-0"`.
    pub scale_string: String,
    /// Name of the pattern that matched.
    pub pattern: String,
    /// Fixed at 0.9 for any regex match.
    pub confidence: f64,
}

/// Construction trade specialization. Closed set; anything else is rejected
/// at parse time and classification falls back to keyword counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trade {
    Electrical,
    Plumbing,
    Hvac,
    Structural,
    General,
}

impl Trade {
    /// All trades in classification tie-break order. `General` is last and
    /// never wins a keyword count.
    pub const ALL: [Trade; 5] = [
        Trade::Electrical,
        Trade::Plumbing,
        Trade::Hvac,
        Trade::Structural,
        Trade::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trade::Electrical => "electrical",
            Trade::Plumbing => "plumbing",
            Trade::Hvac => "hvac",
            Trade::Structural => "structural",
            Trade::General => "general",
        }
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trade {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electrical" => Ok(Trade::Electrical),
            "plumbing" => Ok(Trade::Plumbing),
            "hvac" => Ok(Trade::Hvac),
            "structural" => Ok(Trade::Structural),
            "general" => Ok(Trade::General),
            _ => Err(()),
        }
    }
}

/// Result of analyzing one blueprint page (or the merged result of a
/// multi-page document). Constructed once, never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintAnalysis {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub openings: Vec<Opening>,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Overall confidence in `[0, 1]`.
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_info: Option<ScaleInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<Trade>,
}

/// Normalized bounding box for an OCR text block (fractions of page size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// One line of OCR output with its position and provider confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    /// Normalized to `[0, 1]` (Textract reports percent).
    pub confidence: f64,
    pub bounding_box: BoundingBox,
    pub block_type: String,
}

/// Aggregate OCR output for a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    pub raw_text: String,
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
    pub page_count: u32,
}

/// One costed item in a bid package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub total: f64,
}

/// A complete bid package: scope, costed line items, rollups, and terms.
/// Constructed once per bid-generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BidPackage {
    pub bid_id: String,
    pub scope_of_work: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub labor_cost: f64,
    pub material_cost: f64,
    pub subtotal: f64,
    pub markup_amount: f64,
    pub total_price: f64,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    /// Milestone name → date or duration description.
    #[serde(default)]
    pub schedule: serde_json::Map<String, serde_json::Value>,
    pub payment_terms: String,
    pub warranty_terms: String,
    pub closing_statement: String,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        unit_cost: f64,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_cost,
            total: quantity * unit_cost,
        }
    }
}
