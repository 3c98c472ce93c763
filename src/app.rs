use crate::cli::Command;
use crate::config::Config;
use crate::events::{Event, Handler};
use crate::form::{catalog, create_field, schema, FieldUpdate, FormConfiguration};
use crate::session::{self, Session};
use crate::store::{Store, StoreError, StoreResult};
use anyhow::Result;
use log::*;

/// Oversees session loading, event dispatch and command output.
///
pub struct App {
    config: Config,
    session: Session,
    store: Store,
}

impl App {
    /// Start a new application according to the given configuration, run a
    /// single command and return the result of its execution.
    ///
    pub fn start(config: Config, command: Command) -> Result<()> {
        info!("Starting application...");
        let mut app = App::new(config)?;
        app.run(command)?;
        info!("Exiting application...");
        Ok(())
    }

    /// Load the session named by the configuration.
    ///
    pub fn new(config: Config) -> Result<App> {
        let session = Session::new(config.session_path()?);
        debug!("Loading session from {}...", session.path().display());
        let mut store = session.load()?;
        store.set_form_settings(config.form_settings.clone());
        Ok(App {
            config,
            session,
            store,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run one command. Store rejections are reported as warnings and leave
    /// the session untouched; anything else is returned to the caller.
    ///
    pub fn run(&mut self, command: Command) -> Result<()> {
        debug!("Running command '{:?}'...", command);
        match command {
            Command::Init => self.init()?,
            Command::Catalog => print_catalog(),
            Command::Show => self.show()?,
            Command::List => self.list(),
            Command::Validate => self.validate()?,
            Command::Submissions { form_id } => self.submissions(&form_id)?,
            Command::Export { form_id, path } => match self.exportable(&form_id) {
                Some(form) => session::export_form(form, &path)?,
                None => warn!("{}", StoreError::FormNotFound { id: form_id }),
            },
            Command::Import { path } => {
                let form = session::import_form(&path)?;
                let form_id = form.id.clone();
                if self.dispatch(Event::ImportForm { form })? {
                    println!("{}", form_id);
                }
            }
            Command::AddField { field_type } => {
                let field = create_field(field_type);
                let field_id = field.id.clone();
                if self.dispatch(Event::AddField { field })? {
                    println!("{}", field_id);
                }
            }
            Command::UpdateField {
                field_id,
                update,
                validation,
            } => {
                let update = if validation.is_empty() {
                    update
                } else {
                    let current = self
                        .store
                        .current_form()
                        .and_then(|form| form.field(&field_id))
                        .map(|field| field.validation.clone())
                        .unwrap_or_default();
                    FieldUpdate {
                        validation: Some(validation.merge(&current)),
                        ..update
                    }
                };
                self.dispatch(Event::UpdateField { field_id, update })?;
            }
            Command::Settings(patch) => {
                let current = self
                    .store
                    .current_form()
                    .map(|form| form.settings.clone())
                    .unwrap_or_else(|| self.config.form_settings.clone());
                self.dispatch(Event::UpdateFormSettings {
                    settings: patch.merge(&current),
                })?;
            }
            Command::Edit(event) => {
                let announce = matches!(
                    event,
                    Event::CreateNewForm | Event::DuplicateForm { .. } | Event::AddSubmission { .. }
                );
                if self.dispatch(event.clone())? && announce {
                    self.announce(&event);
                }
            }
        }
        Ok(())
    }

    /// Apply an event and persist the session when it succeeds. Returns
    /// whether the store accepted the event.
    ///
    fn dispatch(&mut self, event: Event) -> Result<bool> {
        let outcome: StoreResult<()> = Handler::new(&mut self.store).handle(event);
        match outcome {
            Ok(()) => {
                self.session.save(&self.store)?;
                Ok(true)
            }
            Err(e) => {
                warn!("{}", e);
                Ok(false)
            }
        }
    }

    /// Print the id of whatever the event just created.
    ///
    fn announce(&self, event: &Event) {
        let created = match event {
            Event::CreateNewForm => self.store.current_form().map(|form| form.id.as_str()),
            Event::DuplicateForm { .. } => self.store.saved_forms().last().map(|form| form.id.as_str()),
            Event::AddSubmission { .. } => self
                .store
                .submissions()
                .last()
                .map(|submission| submission.id.as_str()),
            _ => None,
        };
        if let Some(id) = created {
            println!("{}", id);
        }
    }

    fn init(&self) -> Result<()> {
        match self.config.file_path() {
            Some(path) if path.exists() => {
                info!("Configuration already present at {}", path.display());
            }
            Some(path) => {
                self.config.save()?;
                println!("{}", path.display());
            }
            None => warn!("No configuration path to write"),
        }
        Ok(())
    }

    fn show(&self) -> Result<()> {
        match self.store.current_form() {
            Some(form) => {
                print!("{}", serde_yaml::to_string(form)?);
                if let Some(field) = self.store.selected_field() {
                    println!("# selected: {} ({})", field.label, field.id);
                }
            }
            None => warn!("{}", StoreError::NoCurrentForm),
        }
        Ok(())
    }

    fn list(&self) {
        let current_id = self.store.current_form().map(|form| form.id.as_str());
        for form in self.store.saved_forms() {
            let marker = if Some(form.id.as_str()) == current_id {
                "*"
            } else {
                " "
            };
            println!(
                "{} {}  {}  {} field(s)  {}",
                marker,
                form.id,
                form.title,
                form.fields.len(),
                form.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    fn validate(&self) -> Result<()> {
        match self.store.current_form() {
            Some(form) => {
                schema::validate_form(form)?;
                println!("'{}' is valid", form.title);
            }
            None => warn!("{}", StoreError::NoCurrentForm),
        }
        Ok(())
    }

    fn submissions(&self, form_id: &str) -> Result<()> {
        for submission in self.store.submissions_for(form_id) {
            println!("{}", serde_json::to_string(submission)?);
        }
        Ok(())
    }

    /// Saved forms take precedence; the form being edited can be exported
    /// before it is saved.
    ///
    fn exportable(&self, form_id: &str) -> Option<&FormConfiguration> {
        self.store.saved_form(form_id).or_else(|| {
            self.store
                .current_form()
                .filter(|form| form.id == form_id)
        })
    }
}

fn print_catalog() {
    for info in catalog::CATALOG.iter() {
        let suffix = if info.requires_options() {
            " (options)"
        } else {
            ""
        };
        println!(
            "{:<12} {:<14} {}{}",
            info.field_type, info.label, info.description, suffix
        );
    }
}
