//! Multi-page result aggregation.
//!
//! Pages are analyzed sequentially by the caller; this module owns the
//! pure merge: lists concatenate in page order, confidence is the
//! arithmetic mean, and scale/trade metadata is taken from the first page
//! only. Taking first-page metadata is a known simplification; later
//! pages with conflicting scale or trade signals are not cross-validated.

use bidforge_core::BlueprintAnalysis;

/// Merge per-page analyses into a single document-level result.
///
/// Zero pages yields an empty result with confidence 0.0.
pub fn merge_page_results(pages: Vec<BlueprintAnalysis>) -> BlueprintAnalysis {
    let page_count = pages.len();
    let mut merged = BlueprintAnalysis::default();

    for (index, page) in pages.into_iter().enumerate() {
        if index == 0 {
            merged.scale_info = page.scale_info;
            merged.trade = page.trade;
        }
        merged.rooms.extend(page.rooms);
        merged.openings.extend(page.openings);
        merged.fixtures.extend(page.fixtures);
        merged.measurements.extend(page.measurements);
        merged.materials.extend(page.materials);
        merged.confidence_score += page.confidence_score;
    }

    if page_count > 0 {
        merged.confidence_score /= page_count as f64;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidforge_core::{Room, ScaleInfo, Trade};

    fn page(confidence: f64, room_name: &str) -> BlueprintAnalysis {
        BlueprintAnalysis {
            rooms: vec![Room {
                name: room_name.to_string(),
                dimensions: "10' x 10'".to_string(),
                area: 100.0,
                room_type: None,
            }],
            confidence_score: confidence,
            ..Default::default()
        }
    }

    #[test]
    fn confidence_is_arithmetic_mean() {
        let merged = merge_page_results(vec![page(0.6, "a"), page(0.8, "b"), page(1.0, "c")]);
        assert!((merged.confidence_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn lists_concatenate_in_page_order() {
        let merged = merge_page_results(vec![page(0.5, "first"), page(0.5, "second")]);
        let names: Vec<_> = merged.rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn zero_pages_yields_zero_confidence() {
        let merged = merge_page_results(vec![]);
        assert_eq!(merged.confidence_score, 0.0);
        assert!(merged.rooms.is_empty());
    }

    #[test]
    fn scale_and_trade_come_from_first_page_only() {
        let mut first = page(0.9, "a");
        first.scale_info = Some(ScaleInfo {
            scale_string: "1/4\" = 1'-0\"".to_string(),
            pattern: "fractional_inch".to_string(),
            confidence: 0.9,
        });
        first.trade = Some(Trade::Electrical);

        let mut second = page(0.7, "b");
        second.trade = Some(Trade::Plumbing);

        let merged = merge_page_results(vec![first, second]);
        assert_eq!(merged.trade, Some(Trade::Electrical));
        assert!(merged.scale_info.is_some());
    }

    #[test]
    fn first_page_without_metadata_stays_empty() {
        let mut second = page(0.7, "b");
        second.trade = Some(Trade::Hvac);
        let merged = merge_page_results(vec![page(0.9, "a"), second]);
        assert_eq!(merged.trade, None);
    }
}
