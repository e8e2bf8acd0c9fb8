//! Trade classification from extracted blueprint text.
//!
//! An explicit, valid override always wins. Otherwise each trade's keyword
//! list is matched by substring containment against the lower-cased text
//! and the trade with the highest hit count wins, provided it clears a
//! minimum threshold. Ties resolve in `Trade::ALL` order.

use bidforge_core::Trade;

/// Minimum keyword hits before a trade classification is trusted.
/// Below this the sheet is treated as a general floor plan.
const MIN_KEYWORD_HITS: usize = 2;

/// Per-trade keyword lists, injectable so the scoring heuristic can be
/// tuned without touching control flow.
pub type KeywordTable = [(Trade, &'static [&'static str])];

/// Default keyword table derived from common sheet vocabulary.
pub fn default_keyword_table() -> &'static KeywordTable {
    const ELECTRICAL: &[&str] = &[
        "electrical", "outlet", "switch", "lighting", "circuit", "panel", "breaker",
        "receptacle", "conduit", "voltage", "120v", "240v",
    ];
    const PLUMBING: &[&str] = &[
        "plumbing", "water", "drain", "sewer", "pipe", "fixture", "valve", "supply",
        "waste", "vent stack", "lavatory", "toilet",
    ];
    const HVAC: &[&str] = &[
        "hvac", "duct", "furnace", "air conditioning", "ventilation", "thermostat",
        "diffuser", "mechanical", "heating", "cooling", "return air",
    ];
    const STRUCTURAL: &[&str] = &[
        "structural", "beam", "column", "foundation", "footing", "joist", "truss",
        "rebar", "load bearing", "shear wall", "steel", "concrete",
    ];

    &[
        (Trade::Electrical, ELECTRICAL),
        (Trade::Plumbing, PLUMBING),
        (Trade::Hvac, HVAC),
        (Trade::Structural, STRUCTURAL),
    ]
}

/// Classify the trade for one sheet of extracted text.
///
/// `override_value` typically comes from the request context's
/// `trade_type` field; values outside the closed enum are ignored and
/// classification falls through to keyword counting.
pub fn classify_trade(
    text: &str,
    override_value: Option<&str>,
    table: &KeywordTable,
) -> Trade {
    if let Some(value) = override_value {
        if let Ok(trade) = value.parse::<Trade>() {
            return trade;
        }
    }

    let lowered = text.to_lowercase();
    let mut best = Trade::General;
    let mut best_hits = 0usize;

    for (trade, keywords) in table {
        let hits = keywords.iter().filter(|kw| lowered.contains(*kw)).count();
        // Strictly greater keeps earlier trades on ties.
        if hits > best_hits {
            best = *trade;
            best_hits = hits;
        }
    }

    if best_hits >= MIN_KEYWORD_HITS {
        best
    } else {
        Trade::General
    }
}

/// Classify with the default keyword table.
pub fn classify_trade_default(text: &str, override_value: Option<&str>) -> Trade {
    classify_trade(text, override_value, default_keyword_table())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_electrical_sheet() {
        let text = "Electrical Plan\nPanel Schedule\n120V outlets\nLighting fixtures\nCircuit breakers";
        assert_eq!(classify_trade_default(text, None), Trade::Electrical);
    }

    #[test]
    fn detects_plumbing_sheet() {
        let text = "Plumbing Plan\nWater supply lines\nDrainage system\nFixture schedule";
        assert_eq!(classify_trade_default(text, None), Trade::Plumbing);
    }

    #[test]
    fn detects_hvac_sheet() {
        let text = "Mechanical Plan\nHVAC Layout\nDuctwork\nFurnace location\nAir conditioning";
        assert_eq!(classify_trade_default(text, None), Trade::Hvac);
    }

    #[test]
    fn detects_structural_sheet() {
        let text = "Structural Plan\nFoundation details\nBeam schedule\nColumn layout\nFooting";
        assert_eq!(classify_trade_default(text, None), Trade::Structural);
    }

    #[test]
    fn sparse_text_defaults_to_general() {
        let text = "Floor Plan\nLiving Room\nBedroom\nKitchen";
        assert_eq!(classify_trade_default(text, None), Trade::General);
    }

    #[test]
    fn single_hit_is_below_threshold() {
        assert_eq!(classify_trade_default("one outlet noted", None), Trade::General);
    }

    #[test]
    fn valid_override_wins_over_keywords() {
        let text = "Plumbing Plan\nWater supply\nDrain lines";
        assert_eq!(
            classify_trade_default(text, Some("electrical")),
            Trade::Electrical
        );
    }

    #[test]
    fn override_is_case_insensitive() {
        assert_eq!(
            classify_trade_default("some random text", Some("ELECTRICAL")),
            Trade::Electrical
        );
    }

    #[test]
    fn invalid_override_falls_through_to_keywords() {
        let text = "Electrical plan with outlets and circuit panel";
        assert_eq!(
            classify_trade_default(text, Some("invalid_trade")),
            Trade::Electrical
        );
    }

    #[test]
    fn ties_resolve_in_enumeration_order() {
        // Two electrical hits and two plumbing hits; electrical enumerates first.
        let text = "outlet switch water drain";
        assert_eq!(classify_trade_default(text, None), Trade::Electrical);
    }
}
