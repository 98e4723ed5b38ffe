use serde::{Deserialize, Serialize};

use sentinelle_common::models::report::{Severity, WasteNature, WasteStatus};

/// One field of a structured-response schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseField {
    /// Name of the field
    pub name: String,

    /// Description of the field's purpose
    pub description: String,

    /// Provider type name (STRING, NUMBER, ARRAY, OBJECT)
    pub field_type: String,

    /// Whether this field is required
    pub required: bool,

    /// For enum-valued strings, the permitted values
    pub enum_values: Option<Vec<String>>,

    /// For arrays, the item schema
    pub items: Option<serde_json::Value>,
}

impl ResponseField {
    pub fn string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            field_type: "STRING".to_string(),
            required: true,
            enum_values: None,
            items: None,
        }
    }

    pub fn number(name: &str, description: &str) -> Self {
        Self {
            field_type: "NUMBER".to_string(),
            ..Self::string(name, description)
        }
    }

    pub fn string_enum(name: &str, description: &str, values: Vec<String>) -> Self {
        Self {
            enum_values: Some(values),
            ..Self::string(name, description)
        }
    }

    pub fn array(name: &str, description: &str, items: serde_json::Value) -> Self {
        Self {
            field_type: "ARRAY".to_string(),
            items: Some(items),
            ..Self::string(name, description)
        }
    }
}

/// Build an OBJECT response schema in the provider's structured-output
/// format from a list of fields.
pub fn build_object_schema(fields: &[ResponseField]) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for field in fields {
        let mut field_schema = serde_json::Map::new();
        field_schema.insert(
            "type".to_string(),
            serde_json::Value::String(field.field_type.clone()),
        );
        field_schema.insert(
            "description".to_string(),
            serde_json::Value::String(field.description.clone()),
        );

        if let Some(enum_values) = &field.enum_values {
            let enum_array = serde_json::Value::Array(
                enum_values
                    .iter()
                    .map(|v| serde_json::Value::String(v.clone()))
                    .collect(),
            );
            field_schema.insert("enum".to_string(), enum_array);
        }

        if let Some(items) = &field.items {
            field_schema.insert("items".to_string(), items.clone());
        }

        properties.insert(
            field.name.clone(),
            serde_json::Value::Object(field_schema),
        );

        if field.required {
            required.push(serde_json::Value::String(field.name.clone()));
        }
    }

    let mut schema = serde_json::Map::new();
    schema.insert(
        "type".to_string(),
        serde_json::Value::String("OBJECT".to_string()),
    );
    schema.insert("properties".to_string(), serde_json::Value::Object(properties));

    if !required.is_empty() {
        schema.insert("required".to_string(), serde_json::Value::Array(required));
    }

    serde_json::Value::Object(schema)
}

fn nature_labels() -> Vec<String> {
    [
        WasteNature::Household,
        WasteNature::Bulky,
        WasteNature::Construction,
        WasteNature::Green,
        WasteNature::Hazardous,
    ]
    .iter()
    .map(|n| n.label().to_string())
    .collect()
}

fn status_labels() -> Vec<String> {
    [
        WasteStatus::InitialDeposit,
        WasteStatus::CriticalDeposit,
        WasteStatus::CleanupUnderway,
        WasteStatus::Cleaned,
        WasteStatus::Recurrence,
    ]
    .iter()
    .map(|s| s.label().to_string())
    .collect()
}

fn severity_labels() -> Vec<String> {
    [Severity::Low, Severity::Medium, Severity::High]
        .iter()
        .map(|s| s.label().to_string())
        .collect()
}

fn classification_item_schema() -> serde_json::Value {
    build_object_schema(&[
        ResponseField::string("label", "Material category"),
        ResponseField::number("percentage", "Approximate share of the deposit"),
    ])
}

/// Schema for the full first-capture classification response.
pub fn analysis_schema() -> serde_json::Value {
    build_object_schema(&[
        ResponseField::string_enum("nature", "Waste nature category", nature_labels()),
        ResponseField::string_enum("status", "Deposit status", status_labels()),
        ResponseField::number("confidence", "Classification confidence between 0 and 1"),
        ResponseField::string("description", "Detailed description of the deposit"),
        ResponseField::string_enum("severity", "Severity tier", severity_labels()),
        ResponseField::string("insight", "Expert narrative for the citizen"),
        ResponseField::array(
            "actionPlan",
            "Three concrete resolution steps",
            serde_json::json!({ "type": "STRING" }),
        ),
        ResponseField::array(
            "classification",
            "Contributing material categories",
            classification_item_schema(),
        ),
        ResponseField::string("city", "Identified or assumed city"),
        ResponseField::string("sector", "Commune or neighborhood"),
    ])
}

/// Schema for the before/after comparison response.
pub fn evolution_schema() -> serde_json::Value {
    build_object_schema(&[
        ResponseField::string_enum("status", "Re-assessed deposit status", status_labels()),
        ResponseField::string("insight", "Short comparative analysis"),
    ])
}

/// Schema for the disposal-center lookup response.
pub fn center_schema() -> serde_json::Value {
    build_object_schema(&[
        ResponseField::string("name", "Name of the collection point"),
        ResponseField::string("url", "Reference link for the collection point"),
    ])
}
