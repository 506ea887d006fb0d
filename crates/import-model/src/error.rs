use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("field name must not be empty")]
    EmptyFieldName,
    #[error("duplicate field in catalog: {0}")]
    DuplicateField(String),
    #[error("catalog must contain at least one field")]
    EmptyCatalog,
    #[error("invalid template id: {0:?}")]
    InvalidTemplateId(String),
    #[error("unknown transformation kind: {0}")]
    UnknownTransform(String),
    #[error("unknown field format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
