use crate::form::{Field, FieldUpdate, FormConfiguration, FormSettings, FormSubmission};
use log::*;
use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};

/// Houses the form being edited, the saved forms and collected submissions.
///
/// Every operation that changes the current form refreshes its `updated_at`.
/// Operations that fail return an error and leave the store untouched.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(default)]
    current_form: Option<FormConfiguration>,
    #[serde(default)]
    selected_field_id: Option<String>,
    #[serde(default)]
    saved_forms: Vec<FormConfiguration>,
    #[serde(default)]
    submissions: Vec<FormSubmission>,
    #[serde(skip)]
    form_settings: FormSettings, // Template for create_new_form
}

impl Store {
    /// Returns an empty store whose new forms start with the given settings.
    ///
    pub fn new(form_settings: FormSettings) -> Self {
        Store {
            form_settings,
            ..Store::default()
        }
    }

    /// Replace the settings template used by `create_new_form`.
    ///
    pub fn set_form_settings(&mut self, form_settings: FormSettings) -> &mut Self {
        self.form_settings = form_settings;
        self
    }

    /// Returns the form currently open for editing.
    ///
    pub fn current_form(&self) -> Option<&FormConfiguration> {
        self.current_form.as_ref()
    }

    /// Returns the selected field id, which may not name an existing field.
    ///
    pub fn selected_field_id(&self) -> Option<&str> {
        self.selected_field_id.as_deref()
    }

    /// Returns the selected field, or None if nothing resolvable is selected.
    ///
    pub fn selected_field(&self) -> Option<&Field> {
        let field_id = self.selected_field_id.as_deref()?;
        self.current_form.as_ref()?.field(field_id)
    }

    pub fn saved_forms(&self) -> &[FormConfiguration] {
        &self.saved_forms
    }

    pub fn saved_form(&self, form_id: &str) -> Option<&FormConfiguration> {
        self.saved_forms.iter().find(|form| form.id == form_id)
    }

    pub fn submissions(&self) -> &[FormSubmission] {
        &self.submissions
    }

    /// Returns submissions recorded against a form, oldest first.
    ///
    pub fn submissions_for(&self, form_id: &str) -> Vec<&FormSubmission> {
        self.submissions
            .iter()
            .filter(|submission| submission.form_id == form_id)
            .collect()
    }

    fn current_mut(&mut self) -> StoreResult<&mut FormConfiguration> {
        self.current_form.as_mut().ok_or(StoreError::NoCurrentForm)
    }

    /// Open a fresh form for editing, replacing the current one.
    ///
    pub fn create_new_form(&mut self) -> &FormConfiguration {
        let form = FormConfiguration::new(self.form_settings.clone());
        debug!("Created new form {}", form.id);
        self.selected_field_id = None;
        self.current_form.insert(form)
    }

    /// Set the current form's title verbatim.
    ///
    pub fn update_form_title(&mut self, title: impl Into<String>) -> StoreResult<()> {
        let form = self.current_mut()?;
        form.title = title.into();
        form.touch();
        Ok(())
    }

    /// Set the current form's description verbatim.
    ///
    pub fn update_form_description(&mut self, description: impl Into<String>) -> StoreResult<()> {
        let form = self.current_mut()?;
        form.description = Some(description.into());
        form.touch();
        Ok(())
    }

    /// Replace the current form's settings.
    ///
    pub fn update_form_settings(&mut self, settings: FormSettings) -> StoreResult<()> {
        let form = self.current_mut()?;
        form.settings = settings;
        form.touch();
        Ok(())
    }

    /// Append a field to the end of the current form.
    ///
    pub fn add_field(&mut self, field: Field) -> StoreResult<()> {
        let form = self.current_mut()?;
        if form.field(&field.id).is_some() {
            return Err(StoreError::DuplicateFieldId { id: field.id });
        }
        debug!("Adding {} field {} to form {}", field.field_type(), field.id, form.id);
        form.fields.push(field);
        form.touch();
        Ok(())
    }

    /// Merge a partial update onto the field with the given id.
    ///
    pub fn update_field(&mut self, field_id: &str, update: FieldUpdate) -> StoreResult<()> {
        let form = self.current_mut()?;
        let field = form
            .field_mut(field_id)
            .ok_or_else(|| StoreError::FieldNotFound {
                id: field_id.to_string(),
            })?;
        field.apply(update);
        form.touch();
        Ok(())
    }

    /// Remove the field with the given id, returning it if it existed.
    ///
    /// The selection is cleared whether or not the removed field was the
    /// selected one.
    ///
    pub fn remove_field(&mut self, field_id: &str) -> StoreResult<Option<Field>> {
        let form = self.current_mut()?;
        let removed = form
            .fields
            .iter()
            .position(|field| field.id == field_id)
            .map(|index| form.fields.remove(index));
        form.touch();
        self.selected_field_id = None;
        Ok(removed)
    }

    /// Move the field at `start_index` so that it ends up at `end_index`.
    ///
    pub fn reorder_fields(&mut self, start_index: usize, end_index: usize) -> StoreResult<()> {
        let form = self.current_mut()?;
        let len = form.fields.len();
        for index in [start_index, end_index] {
            if index >= len {
                return Err(StoreError::FieldIndexOutOfRange { index, len });
            }
        }
        let field = form.fields.remove(start_index);
        form.fields.insert(end_index, field);
        form.touch();
        Ok(())
    }

    /// Set the selected field id without checking that it exists.
    ///
    pub fn select_field(&mut self, field_id: Option<String>) -> &mut Self {
        self.selected_field_id = field_id;
        self
    }

    /// Store a copy of the current form among the saved forms, replacing
    /// any earlier copy in place.
    ///
    pub fn save_form(&mut self) -> StoreResult<()> {
        let form = self.current_mut()?;
        form.touch();
        let snapshot = form.clone();
        match self.saved_forms.iter_mut().find(|saved| saved.id == snapshot.id) {
            Some(saved) => {
                debug!("Replacing saved form {}", snapshot.id);
                *saved = snapshot;
            }
            None => {
                debug!("Saving new form {}", snapshot.id);
                self.saved_forms.push(snapshot);
            }
        }
        Ok(())
    }

    /// Open a copy of a saved form for editing.
    ///
    pub fn load_form(&mut self, form_id: &str) -> StoreResult<()> {
        let form = self
            .saved_form(form_id)
            .cloned()
            .ok_or_else(|| StoreError::FormNotFound {
                id: form_id.to_string(),
            })?;
        self.current_form = Some(form);
        self.selected_field_id = None;
        Ok(())
    }

    /// Remove a saved form. The current form is left alone even when it is
    /// an open copy of the deleted one.
    ///
    pub fn delete_form(&mut self, form_id: &str) -> StoreResult<FormConfiguration> {
        let index = self
            .saved_forms
            .iter()
            .position(|form| form.id == form_id)
            .ok_or_else(|| StoreError::FormNotFound {
                id: form_id.to_string(),
            })?;
        Ok(self.saved_forms.remove(index))
    }

    /// Append a copy of a saved form under a new id, returning the copy.
    ///
    pub fn duplicate_form(&mut self, form_id: &str) -> StoreResult<&FormConfiguration> {
        let copy = self
            .saved_form(form_id)
            .map(FormConfiguration::duplicate)
            .ok_or_else(|| StoreError::FormNotFound {
                id: form_id.to_string(),
            })?;
        debug!("Duplicated form {} as {}", form_id, copy.id);
        self.saved_forms.push(copy);
        Ok(&self.saved_forms[self.saved_forms.len() - 1])
    }

    /// Record a submission against a form. The data is not checked against
    /// the form's fields.
    ///
    pub fn add_submission(
        &mut self,
        form_id: impl Into<String>,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> &FormSubmission {
        let submission = FormSubmission::new(form_id.into(), data);
        debug!(
            "Recorded submission {} for form {}",
            submission.id, submission.form_id
        );
        self.submissions.push(submission);
        &self.submissions[self.submissions.len() - 1]
    }

    /// Place an externally supplied form among the saved forms, replacing
    /// a saved form with the same id in place.
    ///
    pub fn import_form(&mut self, form: FormConfiguration) -> &mut Self {
        match self.saved_forms.iter_mut().find(|saved| saved.id == form.id) {
            Some(saved) => *saved = form,
            None => self.saved_forms.push(form),
        }
        self
    }
}
