//! Static catalog of field types offered by the editor palette.

use super::field::{Field, FieldKind, FieldType, FieldValidation};
use uuid::Uuid;

/// Catalog entry describing one field type.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTypeInfo {
    pub field_type: FieldType,
    pub label: &'static str,
    pub description: &'static str,
}

impl FieldTypeInfo {
    pub fn requires_options(&self) -> bool {
        self.field_type.requires_options()
    }
}

const fn entry(
    field_type: FieldType,
    label: &'static str,
    description: &'static str,
) -> FieldTypeInfo {
    FieldTypeInfo {
        field_type,
        label,
        description,
    }
}

/// Palette entries, in the order they are offered.
///
pub static CATALOG: [FieldTypeInfo; 15] = [
    entry(FieldType::Text, "Text Input", "Single line text field"),
    entry(FieldType::Email, "Email", "Email input with validation"),
    entry(FieldType::Phone, "Phone", "Phone number input"),
    entry(FieldType::Number, "Number", "Numeric input field"),
    entry(FieldType::Textarea, "Text Area", "Multi-line text input"),
    entry(FieldType::Select, "Dropdown", "Single selection dropdown"),
    entry(FieldType::Multiselect, "Multi Select", "Multiple selection dropdown"),
    entry(FieldType::Radio, "Radio Buttons", "Single choice from options"),
    entry(FieldType::Checkbox, "Checkboxes", "Multiple choice selection"),
    entry(FieldType::Date, "Date Picker", "Date selection input"),
    entry(FieldType::File, "File Upload", "File upload component"),
    entry(FieldType::Rating, "Rating", "Star rating input"),
    entry(FieldType::Slider, "Slider", "Range slider input"),
    entry(FieldType::Decision, "Decision Box", "Yes/No decision input"),
    entry(FieldType::Address, "Address", "Complete address input"),
];

/// Returns the catalog entry for a field type.
///
pub fn info(field_type: FieldType) -> &'static FieldTypeInfo {
    // CATALOG is laid out in declaration order of FieldType.
    &CATALOG[field_type as usize]
}

/// Build a new field of the given type with a fresh id and palette defaults.
///
pub fn create_field(field_type: FieldType) -> Field {
    Field {
        id: Uuid::new_v4().to_string(),
        kind: FieldKind::initial(field_type),
        label: format!("New {}", info(field_type).label),
        placeholder: Some(String::new()),
        required: false,
        validation: FieldValidation::default(),
        description: None,
        default_value: None,
    }
}
