//! Header-to-field mapping for the CSV import engine.
//!
//! - [`FieldMatcher`] scores an uploaded header against catalog fields.
//! - [`MappingState`] holds header bindings, transformations and defaults.
//! - [`TemplateStore`] snapshots and re-applies mappings by name.
//! - [`TemplateRepository`] persists templates as JSON files.

#![deny(unsafe_code)]

mod error;
mod matcher;
mod patterns;
mod repository;
mod state;
mod template;
mod utils;

pub use error::MappingError;
pub use matcher::{
    ConfidenceLevel, ConfidenceThresholds, DEFAULT_MIN_CONFIDENCE, FieldMatcher, MatchResult,
    MatchSignal,
};
pub use patterns::build_synonym_map;
pub use repository::{StoredTemplate, TemplateMetadata, TemplateRepository};
pub use state::{MappingState, MappingSummary};
pub use template::TemplateStore;
pub use utils::{normalize_key, suggest_field};
