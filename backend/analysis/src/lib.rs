//! Blueprint analysis logic: scale detection, trade classification,
//! trade-specific prompt selection, and multi-page result aggregation.
//!
//! Everything in this crate is pure (no I/O, no clients) so the
//! heuristics can be tested and tuned in isolation. The provider crate
//! drives these functions around its external model calls.

pub mod aggregate;
pub mod prompts;
pub mod scale;
pub mod trade;

pub use aggregate::merge_page_results;
pub use scale::detect_scale;
pub use trade::{classify_trade, default_keyword_table, KeywordTable};
