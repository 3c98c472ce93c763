//! Field records and their type-specific settings.
//!
//! A [`Field`] carries the settings shared by every input type, while the
//! settings only one type understands live in the [`FieldKind`] variant for
//! that type. The kind doubles as the field's type tag, so a field can never
//! change type after creation.

use fake::Dummy;
use log::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];
pub const DEFAULT_MAX_STARS: u32 = 5;
pub const DEFAULT_SLIDER_MIN: f64 = 0.0;
pub const DEFAULT_SLIDER_MAX: f64 = 100.0;
pub const DEFAULT_SLIDER_STEP: f64 = 1.0;

/// Closed set of input types a form can contain.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Number,
    Textarea,
    Select,
    Multiselect,
    Radio,
    Checkbox,
    Date,
    File,
    Rating,
    Slider,
    Decision,
    Address,
}

impl FieldType {
    /// Every field type in palette order.
    ///
    pub const ALL: [FieldType; 15] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::File,
        FieldType::Rating,
        FieldType::Slider,
        FieldType::Decision,
        FieldType::Address,
    ];

    /// Returns the lowercase name used in documents and on the command line.
    ///
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::File => "file",
            FieldType::Rating => "rating",
            FieldType::Slider => "slider",
            FieldType::Decision => "decision",
            FieldType::Address => "address",
        }
    }

    /// Whether fields of this type carry a list of options.
    ///
    pub fn requires_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Multiselect | FieldType::Radio | FieldType::Checkbox
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string names no known field type.
///
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field type: {0}")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|field_type| field_type.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// Type-specific settings, tagged by the field type.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Number,
    Textarea,
    Select {
        options: Vec<String>,
    },
    Multiselect {
        options: Vec<String>,
    },
    Radio {
        options: Vec<String>,
    },
    Checkbox {
        options: Vec<String>,
    },
    Date,
    File,
    Rating {
        #[serde(rename = "maxStars", default = "default_max_stars")]
        max_stars: u32,
    },
    Slider {
        #[serde(rename = "minValue", default = "default_slider_min")]
        min_value: f64,
        #[serde(rename = "maxValue", default = "default_slider_max")]
        max_value: f64,
        #[serde(default = "default_slider_step")]
        step: f64,
    },
    Decision,
    Address,
}

fn default_max_stars() -> u32 {
    DEFAULT_MAX_STARS
}

fn default_slider_min() -> f64 {
    DEFAULT_SLIDER_MIN
}

fn default_slider_max() -> f64 {
    DEFAULT_SLIDER_MAX
}

fn default_slider_step() -> f64 {
    DEFAULT_SLIDER_STEP
}

impl FieldKind {
    /// Returns the kind a freshly created field of the given type starts with.
    ///
    pub fn initial(field_type: FieldType) -> FieldKind {
        let options = || DEFAULT_OPTIONS.iter().map(|o| o.to_string()).collect();
        match field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Email => FieldKind::Email,
            FieldType::Phone => FieldKind::Phone,
            FieldType::Number => FieldKind::Number,
            FieldType::Textarea => FieldKind::Textarea,
            FieldType::Select => FieldKind::Select { options: options() },
            FieldType::Multiselect => FieldKind::Multiselect { options: options() },
            FieldType::Radio => FieldKind::Radio { options: options() },
            FieldType::Checkbox => FieldKind::Checkbox { options: options() },
            FieldType::Date => FieldKind::Date,
            FieldType::File => FieldKind::File,
            FieldType::Rating => FieldKind::Rating {
                max_stars: DEFAULT_MAX_STARS,
            },
            FieldType::Slider => FieldKind::Slider {
                min_value: DEFAULT_SLIDER_MIN,
                max_value: DEFAULT_SLIDER_MAX,
                step: DEFAULT_SLIDER_STEP,
            },
            FieldType::Decision => FieldKind::Decision,
            FieldType::Address => FieldKind::Address,
        }
    }

    /// Returns the type tag of this kind.
    ///
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Email => FieldType::Email,
            FieldKind::Phone => FieldType::Phone,
            FieldKind::Number => FieldType::Number,
            FieldKind::Textarea => FieldType::Textarea,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Multiselect { .. } => FieldType::Multiselect,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
            FieldKind::Date => FieldType::Date,
            FieldKind::File => FieldType::File,
            FieldKind::Rating { .. } => FieldType::Rating,
            FieldKind::Slider { .. } => FieldType::Slider,
            FieldKind::Decision => FieldType::Decision,
            FieldKind::Address => FieldType::Address,
        }
    }

    /// Returns the option list for choice kinds.
    ///
    pub fn options(&self) -> Option<&[String]> {
        match self {
            FieldKind::Select { options }
            | FieldKind::Multiselect { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox { options } => Some(options),
            _ => None,
        }
    }

    fn options_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            FieldKind::Select { options }
            | FieldKind::Multiselect { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox { options } => Some(options),
            _ => None,
        }
    }
}

/// Validation parameters. Stored only; nothing here enforces them.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl FieldValidation {
    pub fn is_empty(&self) -> bool {
        *self == FieldValidation::default()
    }
}

/// Default value shown before the user enters anything.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl DefaultValue {
    /// Parse command-line input, preferring booleans, then numbers, then text.
    ///
    pub fn parse(input: &str) -> DefaultValue {
        if let Ok(b) = input.parse::<bool>() {
            DefaultValue::Bool(b)
        } else if let Some(n) = input.parse::<f64>().ok().filter(|n| n.is_finite()) {
            DefaultValue::Number(n)
        } else {
            DefaultValue::Text(input.to_string())
        }
    }
}

/// One configurable input unit within a form.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "FieldValidation::is_empty")]
    pub validation: FieldValidation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

impl Field {
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn options(&self) -> Option<&[String]> {
        self.kind.options()
    }

    /// Shallow-merge the present members of `update` onto this field.
    ///
    /// Type-specific members that do not apply to this field's kind are
    /// ignored.
    ///
    pub fn apply(&mut self, update: FieldUpdate) -> &mut Self {
        let FieldUpdate {
            label,
            placeholder,
            required,
            description,
            default_value,
            options,
            validation,
            max_stars,
            min_value,
            max_value,
            step,
        } = update;
        let field_type = self.kind.field_type();

        if let Some(label) = label {
            self.label = label;
        }
        if let Some(placeholder) = placeholder {
            self.placeholder = Some(placeholder);
        }
        if let Some(required) = required {
            self.required = required;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        if let Some(default_value) = default_value {
            self.default_value = Some(default_value);
        }
        if let Some(validation) = validation {
            self.validation = FieldValidation {
                min: validation.min.filter(|n| n.is_finite()),
                max: validation.max.filter(|n| n.is_finite()),
                ..validation
            };
        }
        if let Some(options) = options {
            match self.kind.options_mut() {
                Some(current) => *current = options,
                None => debug!("Ignoring options for {} field {}", field_type, self.id),
            }
        }

        match &mut self.kind {
            FieldKind::Rating { max_stars: current } => {
                if let Some(max_stars) = max_stars {
                    *current = max_stars;
                }
            }
            FieldKind::Slider {
                min_value: current_min,
                max_value: current_max,
                step: current_step,
            } => {
                if let Some(min_value) = min_value.filter(|n| n.is_finite()) {
                    *current_min = min_value;
                }
                if let Some(max_value) = max_value.filter(|n| n.is_finite()) {
                    *current_max = max_value;
                }
                if let Some(step) = step.filter(|n| n.is_finite()) {
                    *current_step = step;
                }
            }
            _ => {
                if max_stars.is_some() || min_value.is_some() || max_value.is_some() || step.is_some() {
                    debug!(
                        "Ignoring rating/slider settings for {} field {}",
                        field_type, self.id
                    );
                }
            }
        }
        self
    }
}

/// Partial update for a field. There is deliberately no member for the type.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stars: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl FieldUpdate {
    pub fn is_empty(&self) -> bool {
        *self == FieldUpdate::default()
    }
}
