//! Validity rules for form documents crossing a persistence boundary.
//!
//! A form is valid when its title is non-empty and every field has a
//! non-empty label and a known type. Bounds in a field's validation record
//! are not checked against each other. The store never calls into this
//! module; importers and exporters do.

use super::document::FormConfiguration;
use super::field::FieldType;

/// One rule violation found in a form document.
///
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaIssue {
    /// Form title is empty
    #[error("Form title is required")]
    EmptyTitle,

    /// Field label is empty
    #[error("Label is required (field {index} '{field_id}')")]
    EmptyLabel { index: usize, field_id: String },

    /// Field type outside the known set
    #[error("Unknown field type '{value}' (field {index})")]
    UnknownFieldType { index: usize, value: String },
}

/// Errors produced by document validation.
///
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Document parsed but breaks one or more rules
    #[error("Invalid form document: {}", join_issues(.issues))]
    Invalid { issues: Vec<SchemaIssue> },

    /// Document is not a readable form
    #[error("Malformed form document: {0}")]
    Malformed(String),
}

fn join_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collect every rule violation in a typed form.
///
pub fn issues(form: &FormConfiguration) -> Vec<SchemaIssue> {
    let mut issues = vec![];
    if form.title.is_empty() {
        issues.push(SchemaIssue::EmptyTitle);
    }
    for (index, field) in form.fields.iter().enumerate() {
        if field.label.is_empty() {
            issues.push(SchemaIssue::EmptyLabel {
                index,
                field_id: field.id.clone(),
            });
        }
    }
    issues
}

/// Check a typed form, failing with every violation found.
///
pub fn validate_form(form: &FormConfiguration) -> Result<(), SchemaError> {
    let issues = issues(form);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid { issues })
    }
}

/// Parse and check a JSON form document.
///
/// Unknown field types are reported alongside the other rule violations
/// instead of surfacing as a bare deserialization failure.
///
pub fn parse_form_document(json: &str) -> Result<FormConfiguration, SchemaError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| SchemaError::Malformed(e.to_string()))?;

    let mut issues = vec![];
    if let Some(fields) = value.get("fields").and_then(|fields| fields.as_array()) {
        for (index, field) in fields.iter().enumerate() {
            let raw_type = field.get("type").and_then(|t| t.as_str()).unwrap_or_default();
            if raw_type.parse::<FieldType>().is_err() {
                issues.push(SchemaIssue::UnknownFieldType {
                    index,
                    value: raw_type.to_string(),
                });
            }
        }
    }
    if !issues.is_empty() {
        // Report title and label problems too, read straight from the raw value.
        if value.get("title").and_then(|t| t.as_str()).unwrap_or_default().is_empty() {
            issues.insert(0, SchemaIssue::EmptyTitle);
        }
        if let Some(fields) = value.get("fields").and_then(|fields| fields.as_array()) {
            for (index, field) in fields.iter().enumerate() {
                if field.get("label").and_then(|l| l.as_str()).unwrap_or_default().is_empty() {
                    issues.push(SchemaIssue::EmptyLabel {
                        index,
                        field_id: field
                            .get("id")
                            .and_then(|id| id.as_str())
                            .unwrap_or_default()
                            .to_string(),
                    });
                }
            }
        }
        return Err(SchemaError::Invalid { issues });
    }

    let form: FormConfiguration =
        serde_json::from_value(value).map_err(|e| SchemaError::Malformed(e.to_string()))?;
    validate_form(&form)?;
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::catalog::create_field;
    use crate::form::document::FormSettings;

    fn form_with_fields(count: usize) -> FormConfiguration {
        let mut form = FormConfiguration::new(FormSettings::default());
        for _ in 0..count {
            form.fields.push(create_field(FieldType::Text));
        }
        form
    }

    #[test]
    fn new_form_is_valid() {
        assert!(validate_form(&form_with_fields(3)).is_ok());
    }

    #[test]
    fn collects_every_issue() {
        let mut form = form_with_fields(3);
        form.title = String::new();
        form.fields[0].label = String::new();
        form.fields[2].label = String::new();
        let field_id = form.fields[2].id.clone();

        match validate_form(&form) {
            Err(SchemaError::Invalid { issues }) => {
                assert_eq!(issues.len(), 3);
                assert_eq!(issues[0], SchemaIssue::EmptyTitle);
                assert_eq!(issues[2], SchemaIssue::EmptyLabel { index: 2, field_id });
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn whitespace_title_is_not_empty() {
        let mut form = form_with_fields(0);
        form.title = " ".to_string();
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn bounds_are_not_cross_checked() {
        let mut form = form_with_fields(1);
        form.fields[0].validation.min_length = Some(10);
        form.fields[0].validation.max_length = Some(1);
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn parse_accepts_serialized_form() {
        let form = form_with_fields(2);
        let json = serde_json::to_string(&form).unwrap();
        assert_eq!(parse_form_document(&json).unwrap(), form);
    }

    #[test]
    fn parse_reports_unknown_types_with_other_issues() {
        let mut value = serde_json::to_value(form_with_fields(2)).unwrap();
        value["title"] = serde_json::json!("");
        value["fields"][1]["type"] = serde_json::json!("signature");
        value["fields"][0]["label"] = serde_json::json!("");

        let error = parse_form_document(&value.to_string()).unwrap_err();
        match &error {
            SchemaError::Invalid { issues } => {
                assert!(issues.contains(&SchemaIssue::EmptyTitle));
                assert!(issues.contains(&SchemaIssue::UnknownFieldType {
                    index: 1,
                    value: "signature".to_string()
                }));
                assert!(issues
                    .iter()
                    .any(|issue| matches!(issue, SchemaIssue::EmptyLabel { index: 0, .. })));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(error.to_string().contains("signature"));
    }

    #[test]
    fn parse_rejects_malformed_documents() {
        assert!(matches!(
            parse_form_document("{not json"),
            Err(SchemaError::Malformed(_))
        ));
        assert!(matches!(
            parse_form_document(r#"{"title": "No id"}"#),
            Err(SchemaError::Malformed(_))
        ));
    }

    #[test]
    fn parse_runs_label_rules_on_typed_form() {
        let mut form = form_with_fields(1);
        form.fields[0].label = String::new();
        let json = serde_json::to_string(&form).unwrap();
        assert!(matches!(
            parse_form_document(&json),
            Err(SchemaError::Invalid { .. })
        ));
    }

    #[test]
    fn schema_error_display() {
        let error = SchemaError::Invalid {
            issues: vec![SchemaIssue::EmptyTitle],
        };
        assert!(error.to_string().contains("Form title is required"));
        let issue = SchemaIssue::EmptyLabel {
            index: 3,
            field_id: "f-9".to_string(),
        };
        assert_eq!(issue.to_string(), "Label is required (field 3 'f-9')");
        let issue = SchemaIssue::UnknownFieldType {
            index: 1,
            value: "signature".to_string(),
        };
        assert_eq!(issue.to_string(), "Unknown field type 'signature' (field 1)");
        let error = SchemaError::Malformed("eof".to_string());
        assert!(error.to_string().contains("eof"));
    }
}
