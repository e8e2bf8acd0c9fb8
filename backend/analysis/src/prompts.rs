//! Trade-specific prompt templates, system messages, and symbol
//! vocabularies for the vision model.
//!
//! Selection is a pure lookup on the trade label; unknown labels fall
//! back to the general template. Templates carry `{ocr_text}`,
//! `{context}`, `{json_schema}`, and `{symbol_guide}` placeholders that
//! [`build_analysis_prompt`] substitutes at call time.

use std::collections::BTreeMap;

use bidforge_core::Trade;
use serde_json::{json, Value};

pub const GENERAL_SYSTEM_PROMPT: &str = "\
You are an expert construction estimator with deep knowledge of architectural blueprints, \
building codes, and material takeoff. Analyze blueprints with precision and attention to detail.";

const ELECTRICAL_SYSTEM_PROMPT: &str = "\
You are a master electrician and electrical estimator. You read electrical plans, panel \
schedules, and circuit layouts with precision, and you know NEC conventions for symbols \
and annotations.";

const PLUMBING_SYSTEM_PROMPT: &str = "\
You are a master plumber and mechanical estimator. You read plumbing plans, riser diagrams, \
and fixture schedules with precision, including supply, waste, and vent layouts.";

const HVAC_SYSTEM_PROMPT: &str = "\
You are an HVAC engineer and mechanical estimator. You read mechanical plans, ductwork \
layouts, and equipment schedules with precision, including airflow and ventilation design.";

const STRUCTURAL_SYSTEM_PROMPT: &str = "\
You are a structural engineer and estimator. You read structural plans, foundation details, \
and framing layouts with precision, including beam, column, and footing schedules.";

pub const GENERAL_ANALYSIS_PROMPT: &str = "\
You are analyzing an architectural blueprint to produce a material takeoff.

Identify from the image and the extracted OCR text below:
1. All rooms with their dimensions and calculated areas
2. All openings (doors, windows) with counts and sizes
3. All fixtures (plumbing, electrical, HVAC symbols)
4. Key measurements (wall lengths, ceiling heights)
5. Materials specified in annotations or legends

OCR Text from Blueprint:
{ocr_text}

Additional Context:
{context}

Respond with valid JSON in this exact structure:
{json_schema}

Ensure all numerical values are accurate and all identifications are confident.
Include a confidence score (0-1) for the overall analysis.";

const ELECTRICAL_ANALYSIS_PROMPT: &str = "\
You are analyzing an electrical plan to produce an electrical takeoff.

Identify from the image and the extracted OCR text below:
1. All outlets and receptacles (standard, GFCI, dedicated) with counts
2. All switches (single-pole, three-way, dimmers) with counts
3. All lighting fixtures (ceiling, recessed, exterior) with counts
4. Panel and circuit information from panel schedules
5. Conduit runs, wire gauges, and any noted materials

Recognized symbols by category:
{symbol_guide}

OCR Text from Blueprint:
{ocr_text}

Additional Context:
{context}

Respond with valid JSON in this exact structure:
{json_schema}

Categorize every fixture as \"electrical\" and include a confidence score (0-1).";

const PLUMBING_ANALYSIS_PROMPT: &str = "\
You are analyzing a plumbing plan to produce a plumbing takeoff.

Identify from the image and the extracted OCR text below:
1. All fixtures (toilets, lavatories, sinks, tubs, showers) with counts
2. Supply lines with sizes and materials
3. Drainage and waste lines with sizes and slopes
4. Vent stacks and cleanouts
5. Water heaters and other equipment

Recognized symbols by category:
{symbol_guide}

OCR Text from Blueprint:
{ocr_text}

Additional Context:
{context}

Respond with valid JSON in this exact structure:
{json_schema}

Categorize every fixture as \"plumbing\" and include a confidence score (0-1).";

const HVAC_ANALYSIS_PROMPT: &str = "\
You are analyzing a mechanical plan to produce an HVAC takeoff.

Identify from the image and the extracted OCR text below:
1. All equipment (furnaces, air handlers, condensers) with counts
2. Ductwork runs with sizes and materials
3. Diffusers, registers, and grilles with counts
4. Ventilation and exhaust fans
5. Thermostat locations and control zones

Recognized symbols by category:
{symbol_guide}

OCR Text from Blueprint:
{ocr_text}

Additional Context:
{context}

Respond with valid JSON in this exact structure:
{json_schema}

Categorize every fixture as \"hvac\" and include a confidence score (0-1).";

const STRUCTURAL_ANALYSIS_PROMPT: &str = "\
You are analyzing a structural plan to produce a structural takeoff.

Identify from the image and the extracted OCR text below:
1. Foundation elements (footings, stem walls, slabs) with dimensions
2. Beam and header schedules with sizes and spans
3. Column and post locations with sizes
4. Framing members (joists, rafters, trusses) with spacing
5. Reinforcement and connection details

Recognized symbols by category:
{symbol_guide}

OCR Text from Blueprint:
{ocr_text}

Additional Context:
{context}

Respond with valid JSON in this exact structure:
{json_schema}

Record sizes and spans as measurements and include a confidence score (0-1).";

pub const BID_SYSTEM_PROMPT: &str = "\
You are an expert construction bid writer with years of experience creating professional, \
competitive bid packages. You understand construction costs, labor rates, and how to present \
bids that win projects while maintaining profitability.";

pub const BID_GENERATION_PROMPT: &str = "\
You are creating a professional construction bid package.

Project Information:
{project_info}

Material Takeoff:
{takeoff_summary}

Pricing Data:
- Pricing rules: {pricing_rules}
- Markup: {markup_percentage}%

Company Information:
{company_info}

Generate a complete, professional bid package with:
1. Detailed Scope of Work
2. Itemized line items (description, quantity, unit, unit_cost, total)
3. Exclusions (items NOT included in this bid)
4. Inclusions (items specifically included)
5. Project schedule with milestones
6. Payment terms
7. Warranty terms
8. Professional closing statement

Respond with valid JSON matching this schema:
{json_schema}

Make sure all calculations are accurate and the bid is comprehensive and professional.";

/// Look up the (analysis prompt template, system message) pair for a trade.
pub fn prompt_for(trade: Trade) -> (&'static str, &'static str) {
    match trade {
        Trade::Electrical => (ELECTRICAL_ANALYSIS_PROMPT, ELECTRICAL_SYSTEM_PROMPT),
        Trade::Plumbing => (PLUMBING_ANALYSIS_PROMPT, PLUMBING_SYSTEM_PROMPT),
        Trade::Hvac => (HVAC_ANALYSIS_PROMPT, HVAC_SYSTEM_PROMPT),
        Trade::Structural => (STRUCTURAL_ANALYSIS_PROMPT, STRUCTURAL_SYSTEM_PROMPT),
        Trade::General => (GENERAL_ANALYSIS_PROMPT, GENERAL_SYSTEM_PROMPT),
    }
}

/// Symbol vocabulary for a trade, keyed by category. Used only to enrich
/// prompt context; the general trade has no specialized vocabulary.
pub fn symbol_vocabulary(trade: Trade) -> BTreeMap<&'static str, Vec<&'static str>> {
    let entries: &[(&str, &[&str])] = match trade {
        Trade::Electrical => &[
            ("outlets", &["duplex outlet", "gfci outlet", "220v outlet", "floor outlet"]),
            ("switches", &["single-pole switch", "three-way switch", "dimmer switch"]),
            ("lighting", &["ceiling fixture", "recessed light", "wall sconce", "exterior light"]),
            ("panels", &["panel board", "subpanel", "disconnect"]),
        ],
        Trade::Plumbing => &[
            ("fixtures", &["water closet", "lavatory", "kitchen sink", "bathtub", "shower"]),
            ("supply", &["cold water line", "hot water line", "shutoff valve"]),
            ("drainage", &["waste line", "vent stack", "cleanout", "floor drain"]),
        ],
        Trade::Hvac => &[
            ("equipment", &["furnace", "air handler", "condenser unit", "heat pump"]),
            ("ductwork", &["supply duct", "return duct", "flex duct"]),
            ("ventilation", &["supply diffuser", "return grille", "exhaust fan"]),
        ],
        Trade::Structural => &[
            ("foundation", &["continuous footing", "spread footing", "stem wall", "slab on grade"]),
            ("framing", &["floor joist", "rafter", "truss", "header"]),
            ("vertical", &["steel column", "wood post", "bearing wall"]),
        ],
        Trade::General => &[],
    };
    entries.iter().map(|(k, v)| (*k, v.to_vec())).collect()
}

/// JSON structure the vision model must return.
pub fn analysis_response_schema() -> Value {
    json!({
        "rooms": [{
            "name": "string",
            "dimensions": "string",
            "area": "number",
            "room_type": "string or null"
        }],
        "openings": [{
            "opening_type": "string",
            "count": "number",
            "size": "string",
            "details": "string or null"
        }],
        "fixtures": [{
            "fixture_type": "string",
            "category": "string",
            "count": "number",
            "details": "string or null"
        }],
        "measurements": [{
            "measurement_type": "string",
            "value": "number",
            "unit": "string",
            "location": "string or null"
        }],
        "materials": [{
            "material_name": "string",
            "quantity": "number",
            "unit": "string",
            "specifications": "string or null"
        }],
        "confidence_score": "number (0-1)"
    })
}

/// JSON structure the bid model must return.
pub fn bid_response_schema() -> Value {
    json!({
        "scope_of_work": "string",
        "line_items": [{
            "description": "string",
            "quantity": "number",
            "unit": "string",
            "unit_cost": "number",
            "total": "number"
        }],
        "labor_cost": "number",
        "material_cost": "number",
        "subtotal": "number",
        "markup_amount": "number",
        "total_price": "number",
        "exclusions": ["string"],
        "inclusions": ["string"],
        "schedule": {"milestone": "string"},
        "payment_terms": "string",
        "warranty_terms": "string",
        "closing_statement": "string"
    })
}

/// Assemble the final analysis prompt for one page.
pub fn build_analysis_prompt(trade: Trade, ocr_text: &str, context: &Value) -> String {
    let (template, _) = prompt_for(trade);
    let ocr_text = if ocr_text.is_empty() {
        "No OCR text available"
    } else {
        ocr_text
    };
    let schema = serde_json::to_string_pretty(&analysis_response_schema())
        .unwrap_or_else(|_| "{}".to_string());
    let context = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    let symbol_guide = format_symbol_guide(trade);

    template
        .replace("{ocr_text}", ocr_text)
        .replace("{context}", &context)
        .replace("{json_schema}", &schema)
        .replace("{symbol_guide}", &symbol_guide)
}

fn format_symbol_guide(trade: Trade) -> String {
    let vocabulary = symbol_vocabulary(trade);
    if vocabulary.is_empty() {
        return "(none)".to_string();
    }
    vocabulary
        .iter()
        .map(|(category, symbols)| format!("- {}: {}", category, symbols.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
