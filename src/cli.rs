//! Command-line parsing.
//!
//! Each invocation performs one command against the session store. Editing
//! commands map straight onto editor events; the rest are queries or file
//! transfers handled by the app.

use crate::error::{AppError, AppResult};
use crate::events::Event;
use crate::form::{DefaultValue, FieldType, FieldUpdate, FieldValidation, FormSettings};
use clap::{App as ClapApp, AppSettings, Arg, ArgMatches, SubCommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Parsed invocation.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config_dir: Option<String>,
    pub verbose: bool,
    pub command: Command,
}

/// Specify the commands the binary understands.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Init,
    Catalog,
    Show,
    List,
    Validate,
    Submissions {
        form_id: String,
    },
    Export {
        form_id: String,
        path: PathBuf,
    },
    Import {
        path: PathBuf,
    },
    AddField {
        field_type: FieldType,
    },
    UpdateField {
        field_id: String,
        update: FieldUpdate,
        validation: ValidationPatch,
    },
    Settings(SettingsPatch),
    Edit(Event),
}

/// Validation members given on the command line, merged onto the field's
/// current validation record.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationPatch {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<String>,
}

impl ValidationPatch {
    pub fn is_empty(&self) -> bool {
        *self == ValidationPatch::default()
    }

    pub fn merge(&self, current: &FieldValidation) -> FieldValidation {
        FieldValidation {
            min: self.min.or(current.min),
            max: self.max.or(current.max),
            min_length: self.min_length.or(current.min_length),
            max_length: self.max_length.or(current.max_length),
            pattern: self.pattern.clone().or_else(|| current.pattern.clone()),
        }
    }
}

/// Settings members given on the command line, merged onto the form's
/// current settings.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub submit_button_text: Option<String>,
    pub allow_multiple_submissions: Option<bool>,
    pub show_progress_bar: Option<bool>,
}

impl SettingsPatch {
    pub fn merge(&self, current: &FormSettings) -> FormSettings {
        FormSettings {
            submit_button_text: self
                .submit_button_text
                .clone()
                .unwrap_or_else(|| current.submit_button_text.clone()),
            allow_multiple_submissions: self
                .allow_multiple_submissions
                .unwrap_or(current.allow_multiple_submissions),
            show_progress_bar: self.show_progress_bar.unwrap_or(current.show_progress_bar),
        }
    }
}

fn value_arg(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name).long(name).takes_value(true).help(help)
}

fn bool_arg(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    value_arg(name, help).possible_values(&["true", "false"])
}

fn positional(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name).required(true).help(help)
}

/// Build the clap definition of the command line.
///
pub fn build_app() -> ClapApp<'static, 'static> {
    let field_types: Vec<&'static str> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
    ClapApp::new("formcraft")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .takes_value(true)
                .global(true)
                .help("Configuration directory (default ~/.config/formcraft)"),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .global(true)
                .help("Log at debug level"),
        )
        .subcommand(SubCommand::with_name("init").about("Write a default configuration file"))
        .subcommand(SubCommand::with_name("catalog").about("List available field types"))
        .subcommand(SubCommand::with_name("show").about("Print the form being edited"))
        .subcommand(SubCommand::with_name("list").about("List saved forms"))
        .subcommand(SubCommand::with_name("validate").about("Check the form being edited"))
        .subcommand(SubCommand::with_name("new").about("Start a new form"))
        .subcommand(
            SubCommand::with_name("title")
                .about("Set the form title")
                .arg(positional("text", "New title")),
        )
        .subcommand(
            SubCommand::with_name("description")
                .about("Set the form description")
                .arg(positional("text", "New description")),
        )
        .subcommand(
            SubCommand::with_name("settings")
                .about("Change form settings")
                .arg(value_arg("submit-text", "Submit button text"))
                .arg(bool_arg("multiple", "Allow multiple submissions"))
                .arg(bool_arg("progress-bar", "Show a progress bar")),
        )
        .subcommand(
            SubCommand::with_name("add-field")
                .about("Append a field of the given type")
                .arg(positional("type", "Field type").possible_values(&field_types)),
        )
        .subcommand(
            SubCommand::with_name("update-field")
                .about("Change a field's configuration")
                .arg(positional("id", "Field id"))
                .arg(value_arg("label", "Field label"))
                .arg(value_arg("placeholder", "Placeholder text"))
                .arg(bool_arg("required", "Whether an answer is required"))
                .arg(value_arg("description", "Help text shown with the field"))
                .arg(value_arg("default", "Default value (bool, number or text)"))
                .arg(
                    value_arg("option", "Choice option, repeat for each option")
                        .multiple(true)
                        .number_of_values(1),
                )
                .arg(value_arg("min", "Minimum value"))
                .arg(value_arg("max", "Maximum value"))
                .arg(value_arg("min-length", "Minimum length"))
                .arg(value_arg("max-length", "Maximum length"))
                .arg(value_arg("pattern", "Pattern the answer should match"))
                .arg(value_arg("max-stars", "Number of stars (rating)"))
                .arg(value_arg("min-value", "Lower bound (slider)"))
                .arg(value_arg("max-value", "Upper bound (slider)"))
                .arg(value_arg("step", "Step size (slider)")),
        )
        .subcommand(
            SubCommand::with_name("remove-field")
                .about("Remove a field")
                .arg(positional("id", "Field id")),
        )
        .subcommand(
            SubCommand::with_name("reorder")
                .about("Move the field at one position to another")
                .arg(positional("from", "Current position"))
                .arg(positional("to", "Target position")),
        )
        .subcommand(
            SubCommand::with_name("select")
                .about("Select a field, or clear the selection")
                .arg(Arg::with_name("id").help("Field id")),
        )
        .subcommand(SubCommand::with_name("save").about("Save the form being edited"))
        .subcommand(
            SubCommand::with_name("load")
                .about("Open a saved form for editing")
                .arg(positional("id", "Form id")),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .about("Delete a saved form")
                .arg(positional("id", "Form id")),
        )
        .subcommand(
            SubCommand::with_name("duplicate")
                .about("Copy a saved form")
                .arg(positional("id", "Form id")),
        )
        .subcommand(
            SubCommand::with_name("submit")
                .about("Record a submission against a form")
                .arg(positional("form-id", "Form id"))
                .arg(
                    Arg::with_name("entries")
                        .multiple(true)
                        .help("key=value pairs; values are read as JSON when possible"),
                ),
        )
        .subcommand(
            SubCommand::with_name("submissions")
                .about("List submissions for a form")
                .arg(positional("form-id", "Form id")),
        )
        .subcommand(
            SubCommand::with_name("export")
                .about("Write a saved form to a JSON document")
                .arg(positional("form-id", "Form id"))
                .arg(positional("path", "Output file")),
        )
        .subcommand(
            SubCommand::with_name("import")
                .about("Read a form document into the saved forms")
                .arg(positional("path", "Input file")),
        )
}

/// Turn clap matches into a parsed invocation.
///
pub fn parse_matches(matches: &ArgMatches) -> AppResult<Cli> {
    let command = match matches.subcommand() {
        (name, Some(sub)) => parse_command(name, sub)?,
        _ => return Err(AppError::Usage("No command given".to_string())),
    };
    Ok(Cli {
        config_dir: matches.value_of("config").map(str::to_string),
        verbose: matches.is_present("verbose"),
        command,
    })
}

fn parse_command(name: &str, matches: &ArgMatches) -> AppResult<Command> {
    let command = match name {
        "init" => Command::Init,
        "catalog" => Command::Catalog,
        "show" => Command::Show,
        "list" => Command::List,
        "validate" => Command::Validate,
        "new" => Command::Edit(Event::CreateNewForm),
        "title" => Command::Edit(Event::UpdateFormTitle {
            title: required(matches, "text")?,
        }),
        "description" => Command::Edit(Event::UpdateFormDescription {
            description: required(matches, "text")?,
        }),
        "settings" => Command::Settings(SettingsPatch {
            submit_button_text: matches.value_of("submit-text").map(str::to_string),
            allow_multiple_submissions: parse_opt(matches, "multiple")?,
            show_progress_bar: parse_opt(matches, "progress-bar")?,
        }),
        "add-field" => Command::AddField {
            field_type: parse_required(matches, "type")?,
        },
        "update-field" => Command::UpdateField {
            field_id: required(matches, "id")?,
            update: FieldUpdate {
                label: matches.value_of("label").map(str::to_string),
                placeholder: matches.value_of("placeholder").map(str::to_string),
                required: parse_opt(matches, "required")?,
                description: matches.value_of("description").map(str::to_string),
                default_value: matches.value_of("default").map(DefaultValue::parse),
                options: matches
                    .values_of("option")
                    .map(|values| values.map(str::to_string).collect()),
                validation: None,
                max_stars: parse_opt(matches, "max-stars")?,
                min_value: parse_number(matches, "min-value")?,
                max_value: parse_number(matches, "max-value")?,
                step: parse_number(matches, "step")?,
            },
            validation: ValidationPatch {
                min: parse_number(matches, "min")?,
                max: parse_number(matches, "max")?,
                min_length: parse_opt(matches, "min-length")?,
                max_length: parse_opt(matches, "max-length")?,
                pattern: matches.value_of("pattern").map(str::to_string),
            },
        },
        "remove-field" => Command::Edit(Event::RemoveField {
            field_id: required(matches, "id")?,
        }),
        "reorder" => Command::Edit(Event::ReorderFields {
            start_index: parse_required(matches, "from")?,
            end_index: parse_required(matches, "to")?,
        }),
        "select" => Command::Edit(Event::SelectField {
            field_id: matches.value_of("id").map(str::to_string),
        }),
        "save" => Command::Edit(Event::SaveForm),
        "load" => Command::Edit(Event::LoadForm {
            form_id: required(matches, "id")?,
        }),
        "delete" => Command::Edit(Event::DeleteForm {
            form_id: required(matches, "id")?,
        }),
        "duplicate" => Command::Edit(Event::DuplicateForm {
            form_id: required(matches, "id")?,
        }),
        "submit" => Command::Edit(Event::AddSubmission {
            form_id: required(matches, "form-id")?,
            data: parse_entries(matches.values_of("entries").into_iter().flatten())?,
        }),
        "submissions" => Command::Submissions {
            form_id: required(matches, "form-id")?,
        },
        "export" => Command::Export {
            form_id: required(matches, "form-id")?,
            path: PathBuf::from(required(matches, "path")?),
        },
        "import" => Command::Import {
            path: PathBuf::from(required(matches, "path")?),
        },
        other => return Err(AppError::Usage(format!("Unknown command: {}", other))),
    };
    Ok(command)
}

fn required(matches: &ArgMatches, name: &str) -> AppResult<String> {
    matches
        .value_of(name)
        .map(str::to_string)
        .ok_or_else(|| AppError::Usage(format!("Missing argument: {}", name)))
}

fn parse_required<T: FromStr>(matches: &ArgMatches, name: &str) -> AppResult<T> {
    parse_opt(matches, name)?.ok_or_else(|| AppError::Usage(format!("Missing argument: {}", name)))
}

fn parse_opt<T: FromStr>(matches: &ArgMatches, name: &str) -> AppResult<Option<T>> {
    matches
        .value_of(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| AppError::Usage(format!("Invalid value for {}: {}", name, raw)))
        })
        .transpose()
}

/// Like `parse_opt`, but only finite numbers are accepted.
///
fn parse_number(matches: &ArgMatches, name: &str) -> AppResult<Option<f64>> {
    match parse_opt::<f64>(matches, name)? {
        Some(value) if !value.is_finite() => Err(AppError::Usage(format!(
            "Invalid value for {}: {} is not a finite number",
            name, value
        ))),
        value => Ok(value),
    }
}

/// Parse `key=value` submission entries. Values that are valid JSON keep
/// their JSON type; anything else is stored as a string.
///
pub fn parse_entries<'a>(
    entries: impl IntoIterator<Item = &'a str>,
) -> AppResult<serde_json::Map<String, serde_json::Value>> {
    let mut data = serde_json::Map::new();
    for entry in entries {
        let (key, raw) = entry
            .split_once('=')
            .ok_or_else(|| AppError::Usage(format!("Expected key=value, got: {}", entry)))?;
        let value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        data.insert(key.to_string(), value);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["formcraft"];
        argv.extend_from_slice(args);
        let matches = build_app().get_matches_from_safe(argv).unwrap();
        parse_matches(&matches).unwrap()
    }

    #[test]
    fn global_flags() {
        let cli = parse(&["--config", "/tmp/fc", "-v", "show"]);
        assert_eq!(cli.config_dir.as_deref(), Some("/tmp/fc"));
        assert!(cli.verbose);
        assert_eq!(cli.command, Command::Show);
    }

    #[test]
    fn editing_commands_map_to_events() {
        assert_eq!(parse(&["new"]).command, Command::Edit(Event::CreateNewForm));
        assert_eq!(
            parse(&["title", "Customer survey"]).command,
            Command::Edit(Event::UpdateFormTitle {
                title: "Customer survey".to_string()
            })
        );
        assert_eq!(
            parse(&["reorder", "0", "2"]).command,
            Command::Edit(Event::ReorderFields {
                start_index: 0,
                end_index: 2
            })
        );
        assert_eq!(
            parse(&["select"]).command,
            Command::Edit(Event::SelectField { field_id: None })
        );
        assert_eq!(
            parse(&["select", "abc"]).command,
            Command::Edit(Event::SelectField {
                field_id: Some("abc".to_string())
            })
        );
    }

    #[test]
    fn add_field_parses_type() {
        assert_eq!(
            parse(&["add-field", "multiselect"]).command,
            Command::AddField {
                field_type: FieldType::Multiselect
            }
        );
        let result = build_app().get_matches_from_safe(vec!["formcraft", "add-field", "signature"]);
        assert!(result.is_err());
    }

    #[test]
    fn update_field_collects_members() {
        let cli = parse(&[
            "update-field",
            "f1",
            "--label",
            "Colour",
            "--required",
            "true",
            "--option",
            "Red",
            "--option",
            "Blue",
            "--min-length",
            "2",
            "--max-stars",
            "7",
        ]);
        match cli.command {
            Command::UpdateField {
                field_id,
                update,
                validation,
            } => {
                assert_eq!(field_id, "f1");
                assert_eq!(update.label.as_deref(), Some("Colour"));
                assert_eq!(update.required, Some(true));
                assert_eq!(update.options, Some(vec!["Red".to_string(), "Blue".to_string()]));
                assert_eq!(update.max_stars, Some(7));
                assert!(update.validation.is_none());
                assert_eq!(validation.min_length, Some(2));
                assert!(validation.max.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn invalid_number_is_usage_error() {
        let matches = build_app()
            .get_matches_from_safe(vec!["formcraft", "reorder", "first", "2"])
            .unwrap();
        assert!(matches!(parse_matches(&matches), Err(AppError::Usage(_))));
    }

    #[test]
    fn non_finite_numbers_are_usage_errors() {
        for (flag, raw) in [
            ("--min-value", "inf"),
            ("--max-value", "NaN"),
            ("--step", "Infinity"),
            ("--min", "nan"),
            ("--max", "infinity"),
        ] {
            let matches = build_app()
                .get_matches_from_safe(vec!["formcraft", "update-field", "f1", flag, raw])
                .unwrap();
            assert!(
                matches!(parse_matches(&matches), Err(AppError::Usage(_))),
                "{} {} should be rejected",
                flag,
                raw
            );
        }
        let cli = parse(&["update-field", "f1", "--min-value", "5", "--step", "0.5"]);
        match cli.command {
            Command::UpdateField { update, .. } => {
                assert_eq!(update.min_value, Some(5.0));
                assert_eq!(update.step, Some(0.5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn submit_parses_entries() {
        let cli = parse(&["submit", "form-1", "name=Ada", "age=36", "tags=[\"a\"]"]);
        match cli.command {
            Command::Edit(Event::AddSubmission { form_id, data }) => {
                assert_eq!(form_id, "form-1");
                assert_eq!(data["name"], serde_json::json!("Ada"));
                assert_eq!(data["age"], serde_json::json!(36));
                assert_eq!(data["tags"], serde_json::json!(["a"]));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(parse_entries(vec!["no-equals"]).is_err());
        assert!(parse_entries(Vec::<&str>::new()).unwrap().is_empty());
    }

    #[test]
    fn validation_patch_merge_keeps_unset_members() {
        let current = FieldValidation {
            min: Some(1.0),
            pattern: Some("^a".to_string()),
            ..FieldValidation::default()
        };
        let patch = ValidationPatch {
            max: Some(9.0),
            ..ValidationPatch::default()
        };
        let merged = patch.merge(&current);
        assert_eq!(merged.min, Some(1.0));
        assert_eq!(merged.max, Some(9.0));
        assert_eq!(merged.pattern.as_deref(), Some("^a"));
        assert!(!patch.is_empty());
        assert!(ValidationPatch::default().is_empty());
    }

    #[test]
    fn settings_patch_merge() {
        let cli = parse(&["settings", "--submit-text", "Send", "--progress-bar", "true"]);
        match cli.command {
            Command::Settings(patch) => {
                let merged = patch.merge(&FormSettings::default());
                assert_eq!(merged.submit_button_text, "Send");
                assert!(merged.allow_multiple_submissions);
                assert!(merged.show_progress_bar);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn transfer_commands() {
        assert_eq!(
            parse(&["export", "f", "out.json"]).command,
            Command::Export {
                form_id: "f".to_string(),
                path: PathBuf::from("out.json")
            }
        );
        assert_eq!(
            parse(&["import", "in.json"]).command,
            Command::Import {
                path: PathBuf::from("in.json")
            }
        );
    }
}
