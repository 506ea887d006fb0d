//! Data model for the CSV import engine.
//!
//! These types are shared by the matcher, the mapping manager, the validator
//! and the import session. They carry no behavior beyond small lookups.

#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod mapping;
pub mod row;
pub mod template;
pub mod validation;

pub use catalog::{FieldCatalog, FieldDef, FieldFormat};
pub use error::{ModelError, Result};
pub use mapping::{ColumnMapping, TransformKind};
pub use row::{ProjectedRecord, Row};
pub use template::{MappingTemplate, TemplateId};
pub use validation::{DuplicateSet, ValidationError};
