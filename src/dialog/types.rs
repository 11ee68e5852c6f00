//! Core dialog types
//!
//! Keys, the type-erased props object stored by the registry, and the
//! error type used by the fallible conversions around it.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Reserved props field carrying the open/closed flag.
///
/// Every hosted dialog receives it; it is the only field the registry
/// itself writes into a dialog's props.
pub const IS_OPEN_FIELD: &str = "is_open";

/// Type-erased dialog parameters as stored in the registry.
pub type Props = serde_json::Map<String, Value>;

/// Unique key under which a dialog is registered
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DialogKey(pub String);

impl DialogKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for DialogKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for DialogKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&DialogKey> for DialogKey {
    fn from(key: &DialogKey) -> Self {
        key.clone()
    }
}

impl std::borrow::Borrow<str> for DialogKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DialogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog '{key}' received props that could not be converted: {source}")]
    InvalidProps {
        key: DialogKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dialog '{key}' props must be an object, got {kind}")]
    NotAnObject { key: DialogKey, kind: &'static str },
}

/// Serialize a (possibly partial) props value into the stored object shape.
///
/// `null` (a `None` or unit value) is accepted as an empty partial.
pub fn to_props<T>(key: &DialogKey, value: &T) -> DialogResult<Props>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| DialogError::InvalidProps {
        key: key.clone(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Props::new()),
        other => Err(DialogError::NotAnObject {
            key: key.clone(),
            kind: value_kind(&other),
        }),
    }
}

/// Decode stored props back into the shape a call site expects.
pub fn from_props<T>(key: &DialogKey, props: &Props) -> DialogResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(props.clone())).map_err(|source| {
        DialogError::InvalidProps {
            key: key.clone(),
            source,
        }
    })
}

/// Shallow merge, last write wins.
pub fn merge_props(base: &mut Props, partial: Props) {
    for (field, value) in partial {
        base.insert(field, value);
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Well-known dialog keys used by the bundled demo screen
pub mod dialog_keys {
    pub const CREATE_TOKEN: &str = "create-token";
    pub const REMOVE_TOKEN: &str = "remove-token";
    pub const CONFIRM_DELETE: &str = "confirm-delete";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Partial {
        item_name: &'static str,
    }

    #[test]
    fn test_to_props_accepts_structs_and_null() {
        let key = DialogKey::from("k");
        let props = to_props(&key, &Partial { item_name: "router1" }).unwrap();
        assert_eq!(props.get("item_name"), Some(&json!("router1")));

        let empty = to_props(&key, &Option::<Partial>::None).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_to_props_rejects_scalars() {
        let key = DialogKey::from("k");
        let err = to_props(&key, &42).unwrap_err();
        assert!(matches!(err, DialogError::NotAnObject { kind: "a number", .. }));
        assert!(err.to_string().contains("'k'"));
    }

    #[test]
    fn test_merge_props_last_write_wins() {
        let mut base = to_props(&DialogKey::from("k"), &json!({"a": 1, "b": 2})).unwrap();
        let partial = to_props(&DialogKey::from("k"), &json!({"b": 3, "c": 4})).unwrap();
        merge_props(&mut base, partial);

        assert_eq!(Value::Object(base), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_from_props_reports_key() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            count: u32,
        }

        let key = DialogKey::from("needs");
        let err = from_props::<Needs>(&key, &Props::new()).unwrap_err();
        assert!(matches!(err, DialogError::InvalidProps { .. }));
        assert!(err.to_string().contains("'needs'"));
    }
}
