//! Core domain types for the BidForge estimation service.
//!
//! Everything that crosses a crate boundary lives here: the blueprint
//! analysis data model, the bid package model, the trade enumeration, and
//! the service-wide error taxonomy.

pub mod error;
pub mod types;

pub use error::BidForgeError;
pub use types::{
    BidPackage, BlueprintAnalysis, BoundingBox, Fixture, LineItem, Material, Measurement,
    OcrResult, Opening, Room, ScaleInfo, TextBlock, Trade,
};
