//! Classification of the subjects webhook payload.
//!
//! The backend answers either `{"subjects": [...]}` or
//! `[{"subjects": [...]}, ...]` depending on how the workflow was last
//! edited. Both are accepted; anything else is reported as
//! [`SubjectsPayload::Unrecognized`] and yields no subjects.

use serde_json::Value;

/// The accepted shapes of a subjects response.
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectsPayload {
    /// `{"subjects": [...]}`
    Object(Vec<Value>),
    /// `[{"subjects": [...]}, ...]`; only the first element is read.
    Wrapped(Vec<Value>),
    Unrecognized,
}

fn subjects_field(value: &Value) -> Option<&Vec<Value>> {
    value.get("subjects").and_then(Value::as_array)
}

impl SubjectsPayload {
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Object(_) => match subjects_field(value) {
                Some(list) => Self::Object(list.clone()),
                None => Self::Unrecognized,
            },
            Value::Array(items) => match items.first().and_then(subjects_field) {
                Some(list) => Self::Wrapped(list.clone()),
                None => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }

    /// Subject names in server order.
    ///
    /// Non-string and blank entries are dropped, as are repeats of a name
    /// already listed.
    pub fn into_subjects(self) -> Vec<String> {
        let entries = match self {
            Self::Object(list) | Self::Wrapped(list) => list,
            Self::Unrecognized => return Vec::new(),
        };

        let mut subjects: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            let Value::String(name) = entry else {
                continue;
            };
            if name.trim().is_empty() || subjects.contains(&name) {
                continue;
            }
            subjects.push(name);
        }
        subjects
    }
}

/// Shorthand for `classify` followed by `into_subjects`.
pub fn extract_subjects(value: &Value) -> Vec<String> {
    SubjectsPayload::classify(value).into_subjects()
}
