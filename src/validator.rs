//! The schema validator capability the router depends on.
//!
//! The core never hard-binds to a particular schema engine — `Validator` is
//! the narrow interface `route` calls through, matching spec.md §9's
//! `Validator<T>` design note. [`ObjectSchema`] is the concrete, hand-rolled
//! validator this crate ships so the router is usable standalone; a JSON
//! Schema engine or a derive-generated validator can be swapped in by
//! implementing the trait.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One structured validation failure, in the shape `route`'s `InvalidInput`
/// error carries under `details.issues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaIssue {
    /// JSON path to the offending field, e.g. `["data", "aNumber"]`.
    pub path: Vec<String>,
    /// Machine-readable failure code, e.g. `"invalid_type"`.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
    /// What was expected, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// What was actually received, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

/// Outcome of validating a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The value conforms; carries the (possibly coerced) value forward.
    Valid(Value),
    /// The value does not conform.
    Invalid(Vec<SchemaIssue>),
}

/// A schema capable of validating a JSON value and reporting issues in the
/// shape the router needs. Implementations must operate in non-strict mode:
/// fields the schema doesn't know about are preserved, not rejected.
pub trait Validator: Send + Sync {
    /// Validates `value`, returning it unchanged on success.
    fn validate(&self, value: &Value) -> ValidationOutcome;
}

/// Field-level type constraint used by [`ObjectSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON `string`.
    String,
    /// JSON `number`.
    Number,
    /// JSON `boolean`.
    Boolean,
    /// JSON `object`.
    Object,
    /// JSON `array`.
    Array,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

fn received_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A minimal, non-strict object-shape validator: a set of required fields
/// under a fixed root path (typically `["data"]`), each with an expected
/// JSON type. Unknown fields and fields outside the declared set are left
/// untouched, matching CloudEvents' passthrough validation requirement.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    root_path: Vec<String>,
    fields: Vec<(String, FieldType)>,
}

impl ObjectSchema {
    /// Starts a schema whose issues are reported relative to `root_path`
    /// (e.g. `["data"]`, so a failing field `aNumber` reports path
    /// `["data", "aNumber"]`).
    #[must_use]
    pub fn new(root_path: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            root_path: root_path.into_iter().map(Into::into).collect(),
            fields: Vec::new(),
        }
    }

    /// Declares a required field and its expected JSON type.
    #[must_use]
    pub fn require_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push((name.into(), field_type));
        self
    }

    fn root(&self, value: &Value) -> Option<&Value> {
        let mut current = value;
        for segment in &self.root_path {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

impl Validator for ObjectSchema {
    fn validate(&self, value: &Value) -> ValidationOutcome {
        let mut issues = Vec::new();
        let Some(root) = self.root(value) else {
            let mut path = self.root_path.clone();
            issues.push(SchemaIssue {
                code: "missing_field".to_string(),
                message: format!("Expected object at {}", path.join(".")),
                path: {
                    path.push(String::new());
                    path.pop();
                    self.root_path.clone()
                },
                expected: Some("object".to_string()),
                received: Some("undefined".to_string()),
            });
            return ValidationOutcome::Invalid(issues);
        };

        for (field_name, field_type) in &self.fields {
            let mut path = self.root_path.clone();
            path.push(field_name.clone());

            match root.get(field_name) {
                None => issues.push(SchemaIssue {
                    path,
                    code: "missing_field".to_string(),
                    message: format!("Expected {}, received undefined", field_type.name()),
                    expected: Some(field_type.name().to_string()),
                    received: Some("undefined".to_string()),
                }),
                Some(field_value) if !field_type.matches(field_value) => {
                    let received = received_type_name(field_value);
                    issues.push(SchemaIssue {
                        path,
                        code: "invalid_type".to_string(),
                        message: format!(
                            "Expected {}, received {}",
                            field_type.name(),
                            received
                        ),
                        expected: Some(field_type.name().to_string()),
                        received: Some(received.to_string()),
                    });
                }
                Some(_) => {}
            }
        }

        if issues.is_empty() {
            ValidationOutcome::Valid(value.clone())
        } else {
            ValidationOutcome::Invalid(issues)
        }
    }
}
