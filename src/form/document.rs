//! Form documents and submissions.

use super::field::Field;
use chrono::{DateTime, Utc};
use fake::Dummy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled Form";
pub const DEFAULT_SUBMIT_BUTTON_TEXT: &str = "Submit";
pub const COPY_SUFFIX: &str = " (Copy)";

/// Form-wide behaviour settings.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    pub submit_button_text: String,
    pub allow_multiple_submissions: bool,
    pub show_progress_bar: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        FormSettings {
            submit_button_text: DEFAULT_SUBMIT_BUTTON_TEXT.to_string(),
            allow_multiple_submissions: true,
            show_progress_bar: false,
        }
    }
}

/// A complete form definition.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfiguration {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub settings: FormSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormConfiguration {
    /// Returns an empty form with a fresh id and the given settings.
    ///
    pub fn new(settings: FormSettings) -> Self {
        let now = Utc::now();
        FormConfiguration {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: Some(String::new()),
            fields: vec![],
            settings,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy under a fresh id and fresh timestamps, with the title
    /// marked as a copy. Fields are copied as they are.
    ///
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        FormConfiguration {
            id: Uuid::new_v4().to_string(),
            title: format!("{}{}", self.title, COPY_SUFFIX),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == field_id)
    }

    pub fn field_mut(&mut self, field_id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == field_id)
    }

    /// Refresh the modification timestamp.
    ///
    pub fn touch(&mut self) -> &mut Self {
        self.updated_at = Utc::now();
        self
    }
}

/// A single end-user entry against a form.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub id: String,
    pub form_id: String,
    pub data: serde_json::Map<String, serde_json::Value>,
    pub submitted_at: DateTime<Utc>,
}

impl FormSubmission {
    pub fn new(form_id: String, data: serde_json::Map<String, serde_json::Value>) -> Self {
        FormSubmission {
            id: Uuid::new_v4().to_string(),
            form_id,
            data,
            submitted_at: Utc::now(),
        }
    }
}
