//! Configuration templates and per-server configuration entries.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::{check_text, ValidationError};

const NAME_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 1000;
const FILE_PATH_MAX: usize = 500;
const KEY_MAX: usize = 255;
const VALUE_MAX: usize = 1000;

/// Declared type of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    String,
    Integer,
    Float,
    Boolean,
    Enum,
}

impl ConfigType {
    /// Wire name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigType::String => "string",
            ConfigType::Integer => "integer",
            ConfigType::Float => "float",
            ConfigType::Boolean => "boolean",
            ConfigType::Enum => "enum",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control used to edit a configuration value in a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiControl {
    Input,
    Slider,
    Toggle,
    Dropdown,
    Textarea,
}

/// A configuration value converted to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// A reusable set of server settings for one modpack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationTemplate {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub modpack_id: i64,
    /// Settings payload. Must be a JSON object.
    pub config_data: serde_json::Value,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: Timestamp,
}

impl ConfigurationTemplate {
    pub fn new(name: impl Into<String>, modpack_id: i64, config_data: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            modpack_id,
            config_data,
            is_default: false,
            created_at: Timestamp::now(),
        }
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_text(&mut errors, "Template name", &self.name, NAME_MAX);
        if self.modpack_id <= 0 {
            errors.push(ValidationError::NotPositive { field: "Modpack ID" });
        }
        if !self.config_data.is_object() {
            errors.push(ValidationError::Invalid(
                "Configuration data must be a valid JSON object".to_string(),
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX {
                errors.push(ValidationError::TooLong {
                    field: "Description",
                    max: DESCRIPTION_MAX,
                });
            }
        }

        errors
    }
}

/// One setting in one configuration file of a server.
///
/// Values are stored as strings and interpreted according to
/// [`ConfigType`]; use [`typed_value`](Self::typed_value) to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    pub id: Uuid,
    pub server_id: Uuid,
    /// Path of the config file, relative to the server root.
    pub file_path: String,
    pub key: String,
    pub value: String,
    pub value_type: ConfigType,
    pub ui_control: UiControl,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    /// Choices for dropdown controls.
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ConfigurationEntry {
    pub fn new(
        server_id: Uuid,
        file_path: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        value_type: ConfigType,
        ui_control: UiControl,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            server_id,
            file_path: file_path.into(),
            key: key.into(),
            value: value.into(),
            value_type,
            ui_control,
            min_value: None,
            max_value: None,
            options: None,
            description: None,
            category: None,
        }
    }

    /// Interprets the stored string according to the declared type.
    pub fn typed_value(&self) -> Result<ConfigValue, ValidationError> {
        let invalid = |reason: String| {
            ValidationError::Invalid(format!(
                "Value '{}' is not valid for type {}: {reason}",
                self.value, self.value_type
            ))
        };

        match self.value_type {
            ConfigType::Boolean => Ok(ConfigValue::Boolean(matches!(
                self.value.to_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ))),
            ConfigType::Integer => self
                .value
                .trim()
                .parse()
                .map(ConfigValue::Integer)
                .map_err(|e| invalid(e.to_string())),
            ConfigType::Float => self
                .value
                .trim()
                .parse()
                .map(ConfigValue::Float)
                .map_err(|e| invalid(e.to_string())),
            ConfigType::String | ConfigType::Enum => Ok(ConfigValue::Text(self.value.clone())),
        }
    }

    /// Stores `value` in its string form.
    pub fn set_typed_value(&mut self, value: &ConfigValue) {
        self.value = match value {
            ConfigValue::Boolean(b) => b.to_string(),
            ConfigValue::Integer(i) => i.to_string(),
            ConfigValue::Float(f) => f.to_string(),
            ConfigValue::Text(s) => s.clone(),
        };
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_text(&mut errors, "File path", &self.file_path, FILE_PATH_MAX);
        check_text(&mut errors, "Configuration key", &self.key, KEY_MAX);

        if self.value.is_empty() {
            errors.push(ValidationError::Empty {
                field: "Configuration value",
            });
        } else if self.value.chars().count() > VALUE_MAX {
            errors.push(ValidationError::TooLong {
                field: "Configuration value",
                max: VALUE_MAX,
            });
        }

        if let Err(e) = self.typed_value() {
            errors.push(e);
        }

        if matches!(self.value_type, ConfigType::Integer | ConfigType::Float) {
            if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
                if min >= max {
                    errors.push(ValidationError::Invalid(
                        "Minimum value must be less than maximum value".to_string(),
                    ));
                }
            }
        }

        if self.ui_control == UiControl::Dropdown {
            match &self.options {
                Some(options) if !options.is_empty() => {
                    if !options.contains(&self.value) {
                        errors.push(ValidationError::Invalid(format!(
                            "Value '{}' is not in the list of valid options",
                            self.value
                        )));
                    }
                }
                _ => errors.push(ValidationError::Invalid(
                    "Dropdown control must have at least one option".to_string(),
                )),
            }
        }

        errors
    }
}
