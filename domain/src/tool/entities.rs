//! Tool domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-tool configuration values, keyed by field name
pub type ToolConfiguration = BTreeMap<String, String>;

/// How a configuration field is entered and displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    /// Masked when displayed
    Password,
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Password => "password",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, FieldKind::Password)
    }
}

/// A configuration input declared by a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: String,
}

impl ConfigurationField {
    pub fn text(name: &str, label: &str, placeholder: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text,
            placeholder: placeholder.to_string(),
        }
    }

    pub fn password(name: &str, label: &str, placeholder: &str) -> Self {
        Self {
            kind: FieldKind::Password,
            ..Self::text(name, label, placeholder)
        }
    }
}

/// A named external capability that plan steps invoke
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Unique key
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub configuration_fields: Vec<ConfigurationField>,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            enabled: true,
            configuration_fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: ConfigurationField) -> Self {
        self.configuration_fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&ConfigurationField> {
        self.configuration_fields.iter().find(|f| f.name == name)
    }

    /// Keeps only the values for fields this tool declares.
    ///
    /// Fails on the first undeclared key so typos do not silently vanish.
    pub fn validate_configuration(
        &self,
        values: ToolConfiguration,
    ) -> Result<ToolConfiguration, DomainError> {
        for key in values.keys() {
            if self.field(key).is_none() {
                return Err(DomainError::UnknownConfigurationField {
                    tool: self.name.clone(),
                    field: key.clone(),
                });
            }
        }
        Ok(values)
    }
}
