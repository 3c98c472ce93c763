use crate::form::{Field, FieldUpdate, FormConfiguration, FormSettings};
use crate::store::{Store, StoreResult};
use log::*;
use serde::{Deserialize, Serialize};

/// Specify the editing operations a store accepts.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    CreateNewForm,
    UpdateFormTitle {
        title: String,
    },
    UpdateFormDescription {
        description: String,
    },
    UpdateFormSettings {
        settings: FormSettings,
    },
    AddField {
        field: Field,
    },
    UpdateField {
        field_id: String,
        update: FieldUpdate,
    },
    RemoveField {
        field_id: String,
    },
    ReorderFields {
        start_index: usize,
        end_index: usize,
    },
    SelectField {
        field_id: Option<String>,
    },
    SaveForm,
    LoadForm {
        form_id: String,
    },
    DeleteForm {
        form_id: String,
    },
    DuplicateForm {
        form_id: String,
    },
    AddSubmission {
        form_id: String,
        data: serde_json::Map<String, serde_json::Value>,
    },
    ImportForm {
        form: FormConfiguration,
    },
}

/// Specify struct for applying editor events to a store.
///
pub struct Handler<'a> {
    store: &'a mut Store,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to the store.
    ///
    pub fn new(store: &'a mut Store) -> Self {
        Handler { store }
    }

    /// Handle editor events by type.
    ///
    pub fn handle(&mut self, event: Event) -> StoreResult<()> {
        debug!("Processing editor event '{:?}'...", event);
        match event {
            Event::CreateNewForm => {
                let form = self.store.create_new_form();
                info!("Opened new form {}", form.id);
            }
            Event::UpdateFormTitle { title } => self.store.update_form_title(title)?,
            Event::UpdateFormDescription { description } => {
                self.store.update_form_description(description)?
            }
            Event::UpdateFormSettings { settings } => self.store.update_form_settings(settings)?,
            Event::AddField { field } => self.store.add_field(field)?,
            Event::UpdateField { field_id, update } => self.store.update_field(&field_id, update)?,
            Event::RemoveField { field_id } => {
                if self.store.remove_field(&field_id)?.is_none() {
                    debug!("No field {} to remove", field_id);
                }
            }
            Event::ReorderFields {
                start_index,
                end_index,
            } => self.store.reorder_fields(start_index, end_index)?,
            Event::SelectField { field_id } => {
                self.store.select_field(field_id);
            }
            Event::SaveForm => self.store.save_form()?,
            Event::LoadForm { form_id } => self.store.load_form(&form_id)?,
            Event::DeleteForm { form_id } => {
                let form = self.store.delete_form(&form_id)?;
                info!("Deleted saved form '{}'", form.title);
            }
            Event::DuplicateForm { form_id } => {
                let copy = self.store.duplicate_form(&form_id)?;
                info!("Duplicated form {} as {}", form_id, copy.id);
            }
            Event::AddSubmission { form_id, data } => {
                let submission = self.store.add_submission(form_id, data);
                info!("Recorded submission {}", submission.id);
            }
            Event::ImportForm { form } => {
                info!("Imported form {}", form.id);
                self.store.import_form(form);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{create_field, FieldType};
    use crate::store::StoreError;

    fn handle(store: &mut Store, event: Event) -> StoreResult<()> {
        Handler::new(store).handle(event)
    }

    #[test]
    fn events_drive_the_same_operations() {
        let mut by_event = Store::default();
        handle(&mut by_event, Event::CreateNewForm).unwrap();
        let field = create_field(FieldType::Select);
        handle(
            &mut by_event,
            Event::AddField {
                field: field.clone(),
            },
        )
        .unwrap();
        handle(
            &mut by_event,
            Event::UpdateFormTitle {
                title: "Order".to_string(),
            },
        )
        .unwrap();
        handle(&mut by_event, Event::SaveForm).unwrap();

        let form = by_event.current_form().unwrap();
        assert_eq!(form.title, "Order");
        assert_eq!(form.fields, vec![field]);
        assert_eq!(by_event.saved_forms().len(), 1);
    }

    #[test]
    fn errors_propagate_without_changes() {
        let mut store = Store::default();
        assert_eq!(
            handle(
                &mut store,
                Event::UpdateFormTitle {
                    title: "x".to_string()
                }
            ),
            Err(StoreError::NoCurrentForm)
        );
        assert_eq!(
            handle(
                &mut store,
                Event::LoadForm {
                    form_id: "missing".to_string()
                }
            ),
            Err(StoreError::FormNotFound {
                id: "missing".to_string()
            })
        );
        assert_eq!(store, Store::default());
    }

    #[test]
    fn remove_and_select_events() {
        let mut store = Store::default();
        handle(&mut store, Event::CreateNewForm).unwrap();
        let field = create_field(FieldType::Text);
        let field_id = field.id.clone();
        handle(&mut store, Event::AddField { field }).unwrap();
        handle(
            &mut store,
            Event::SelectField {
                field_id: Some(field_id.clone()),
            },
        )
        .unwrap();
        assert_eq!(store.selected_field_id(), Some(field_id.as_str()));

        handle(
            &mut store,
            Event::RemoveField {
                field_id: "other".to_string(),
            },
        )
        .unwrap();
        assert!(store.selected_field_id().is_none());
        assert_eq!(store.current_form().unwrap().fields.len(), 1);
    }

    #[test]
    fn submission_event_needs_no_form() {
        let mut store = Store::default();
        handle(
            &mut store,
            Event::AddSubmission {
                form_id: "f".to_string(),
                data: serde_json::Map::new(),
            },
        )
        .unwrap();
        assert_eq!(store.submissions_for("f").len(), 1);
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = Event::ReorderFields {
            start_index: 0,
            end_index: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "reorder_fields");
        assert_eq!(serde_json::from_value::<Event>(json).unwrap(), event);
    }
}
