// ERP Field Types
//
// Odoo reports an unset relational or text field as `false`, not `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Relational field value: `[id, "label"]` or absent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Many2One(Option<(i64, String)>);

impl Many2One {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self(Some((id, label.into())))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|(id, _)| *id)
    }

    pub fn label(&self) -> Option<&str> {
        self.0.as_ref().map(|(_, label)| label.as_str())
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

impl<'de> Deserialize<'de> for Many2One {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Pair(i64, String),
            Flag(bool),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Pair(id, label)) => Many2One::new(id, label),
            Some(Raw::Flag(_)) | None => Many2One::absent(),
        })
    }
}

/// Deserialize a text field that may be `false`, `null` or missing
pub fn text_or_false<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Flag(bool),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Flag(_)) | None => None,
    })
}

/// Deserialize free-form input text, accepting numbers and other scalars
///
/// `"phone": 5551234` becomes `"5551234"`; `null` and `false` are absent.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}
