pub mod duplicate;
pub mod format;
pub mod required;
