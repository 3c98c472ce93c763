//! Session persistence module.
//!
//! The whole store (current form, selection, saved forms and submissions) is
//! written as one JSON document and replaced atomically, never piecemeal.
//! Single forms can also be exported to and imported from standalone JSON
//! documents, which pass through the validation schema.

mod error;

pub use error::SessionError;

use crate::error::AppError;
use crate::form::{schema, FormConfiguration};
use crate::store::Store;
use log::*;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const TEMP_EXTENSION: &str = "tmp";

/// Oversees the session file backing a store between invocations.
///
#[derive(Clone, Debug)]
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Session { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store from disk. A missing file yields an empty store.
    ///
    pub fn load(&self) -> Result<Store, SessionError> {
        if !self.path.exists() {
            debug!("No session file at {}, starting empty", self.path.display());
            return Ok(Store::default());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| SessionError::ReadFailed {
            path: self.path.clone(),
            source: e,
        })?;
        let store: Store = serde_json::from_str(&contents).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debug!(
            "Loaded session with {} saved forms and {} submissions",
            store.saved_forms().len(),
            store.submissions().len()
        );
        Ok(store)
    }

    /// Write the store to disk, replacing the previous session whole.
    ///
    pub fn save(&self, store: &Store) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(store)
            .map_err(|e| SessionError::SerializationFailed(e.to_string()))?;
        write_atomically(&self.path, &content)?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }
}

/// Write `content` to a sibling temp file, then rename it over `path`.
///
fn write_atomically(path: &Path, content: &str) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SessionError::CreateDirectoryFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let temp_path = path.with_extension(TEMP_EXTENSION);
    let write_failed = |e: std::io::Error| SessionError::WriteFailed {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_failed)?;
    write!(file, "{}", content).map_err(write_failed)?;
    file.sync_all().map_err(write_failed)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| SessionError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write one form as a standalone JSON document.
///
pub fn export_form(form: &FormConfiguration, path: &Path) -> Result<(), AppError> {
    schema::validate_form(form)?;
    let content = serde_json::to_string_pretty(form)
        .map_err(|e| SessionError::SerializationFailed(e.to_string()))?;
    write_atomically(path, &content)?;
    info!("Exported form '{}' to {}", form.title, path.display());
    Ok(())
}

/// Read and validate a standalone form document.
///
pub fn import_form(path: &Path) -> Result<FormConfiguration, AppError> {
    let contents = fs::read_to_string(path).map_err(|e| SessionError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let form = schema::parse_form_document(&contents)?;
    info!("Read form '{}' from {}", form.title, path.display());
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{create_field, FieldKind, FieldType, FieldUpdate, FormSettings};
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("formcraft-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn missing_session_file_loads_empty_store() {
        let session = Session::new(temp_dir().join("session.json"));
        assert_eq!(session.load().unwrap(), Store::default());
    }

    #[test]
    fn save_then_load_restores_store() {
        let dir = temp_dir();
        let session = Session::new(dir.join("nested").join("session.json"));
        let mut store = Store::default();
        store.create_new_form();
        store.add_field(create_field(FieldType::Rating)).unwrap();
        store.save_form().unwrap();
        store.select_field(Some("dangling".to_string()));
        store.add_submission("form", serde_json::Map::new());

        session.save(&store).unwrap();
        assert!(!session.path().with_extension(TEMP_EXTENSION).exists());
        assert_eq!(session.load().unwrap(), store);

        store.create_new_form();
        session.save(&store).unwrap();
        assert_eq!(session.load().unwrap(), store);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn non_finite_slider_update_keeps_session_loadable() {
        let dir = temp_dir();
        let session = Session::new(dir.join("session.json"));
        let mut store = Store::default();
        store.create_new_form();
        let field = create_field(FieldType::Slider);
        let field_id = field.id.clone();
        store.add_field(field).unwrap();
        store
            .update_field(
                &field_id,
                FieldUpdate {
                    min_value: "inf".parse().ok(),
                    max_value: "NaN".parse().ok(),
                    ..FieldUpdate::default()
                },
            )
            .unwrap();
        store.save_form().unwrap();

        session.save(&store).unwrap();
        let loaded = session.load().unwrap();
        assert_eq!(loaded, store);
        let slider = loaded.current_form().unwrap().field(&field_id).unwrap();
        assert_eq!(slider.kind, FieldKind::initial(FieldType::Slider));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn corrupt_session_file_is_an_error() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.json");
        fs::write(&path, "{ not json").unwrap();
        let result = Session::new(&path).load();
        assert!(matches!(result, Err(SessionError::Corrupt { .. })));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn export_then_import_form() {
        let dir = temp_dir();
        let path = dir.join("form.json");
        let mut form = FormConfiguration::new(FormSettings::default());
        form.fields.push(create_field(FieldType::Address));

        export_form(&form, &path).unwrap();
        assert_eq!(import_form(&path).unwrap(), form);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn export_rejects_invalid_form() {
        let path = temp_dir().join("form.json");
        let mut form = FormConfiguration::new(FormSettings::default());
        form.title = String::new();
        assert!(matches!(export_form(&form, &path), Err(AppError::Schema(_))));
        assert!(!path.exists());
    }

    #[test]
    fn import_reports_schema_errors() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("form.json");
        fs::write(
            &path,
            r#"{"id": "x", "title": "", "fields": [], "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(matches!(import_form(&path), Err(AppError::Schema(_))));
        assert!(matches!(
            import_form(&dir.join("missing.json")),
            Err(AppError::Session(SessionError::ReadFailed { .. }))
        ));
        fs::remove_dir_all(dir).unwrap();
    }
}
