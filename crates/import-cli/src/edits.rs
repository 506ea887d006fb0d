//! Mapping edits given on the command line.

use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::debug;

use import_core::ImportSession;
use import_model::TransformKind;

use crate::logging::redact_value;

/// A `KEY=VALUE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(format!("expected KEY=VALUE, got '{s}'"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing key in '{s}'"));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Manual changes applied after auto-mapping or a template load.
#[derive(Debug, Clone, Default)]
pub struct MappingEdits {
    /// Headers to unbind.
    pub unmap: Vec<String>,
    /// `HEADER=FIELD` bindings.
    pub map: Vec<Assignment>,
    /// `FIELD=VALUE` defaults.
    pub defaults: Vec<Assignment>,
    /// `FIELD=KIND` transformations.
    pub transforms: Vec<Assignment>,
}

impl MappingEdits {
    pub fn is_empty(&self) -> bool {
        self.unmap.is_empty()
            && self.map.is_empty()
            && self.defaults.is_empty()
            && self.transforms.is_empty()
    }

    /// Applies unbindings, bindings, defaults and transformations in that order.
    ///
    /// Stops at the first edit naming an unknown header or field.
    pub fn apply(&self, session: &mut ImportSession) -> Result<()> {
        for header in &self.unmap {
            if !session.clear_mapping(header) {
                debug!(header = %header, "header was not mapped");
            }
        }
        for Assignment { key, value } in &self.map {
            let field = value.trim();
            session
                .set_mapping(key, Some(field))
                .with_context(|| format!("--map {key}={field}"))?;
        }
        for Assignment { key, value } in &self.defaults {
            session
                .set_default_value(key, value.as_str())
                .with_context(|| format!("--default {key}={}", redact_value(value)))?;
        }
        for Assignment { key, value } in &self.transforms {
            let kind: TransformKind = value
                .parse()
                .with_context(|| format!("--transform {key}={value}"))?;
            session
                .set_transformation(key, kind)
                .with_context(|| format!("--transform {key}={value}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        let parsed: Assignment = "Notes=a=b".parse().expect("parse");
        assert_eq!(parsed.key, "Notes");
        assert_eq!(parsed.value, "a=b");
    }

    #[test]
    fn assignment_requires_key() {
        assert!("=value".parse::<Assignment>().is_err());
        assert!("no-separator".parse::<Assignment>().is_err());
    }
}
