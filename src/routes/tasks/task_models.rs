use serde::{Deserialize, Deserializer};
use serde_json::Value;

// Raw shapes as they arrive on the wire. Enum fields stay strings here so a
// bad value reaches validation instead of failing deserialization.

// List query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub created_at: Option<String>,
}

// Create and update request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequestBody {
    // `None` when the key is absent, `Some(None)` when sent as `null`.
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Option<String>>,
    /// A number or a numeric string.
    pub user_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub deadline: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_absent_and_null_deadline() {
        let absent: TaskRequestBody = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.deadline, None);

        let null: TaskRequestBody = serde_json::from_str(r#"{"deadline":null}"#).unwrap();
        assert_eq!(null.deadline, Some(None));

        let set: TaskRequestBody = serde_json::from_str(r#"{"deadline":"2024-01-01"}"#).unwrap();
        assert_eq!(set.deadline, Some(Some("2024-01-01".into())));
    }

    #[test]
    fn null_title_and_enums_are_kept_apart_from_absent() {
        let absent: TaskRequestBody = serde_json::from_str("{}").unwrap();
        assert_eq!((absent.title, absent.status, absent.priority), (None, None, None));

        let null: TaskRequestBody =
            serde_json::from_str(r#"{"title":null,"status":null,"priority":null}"#).unwrap();
        assert_eq!(null.title, Some(None));
        assert_eq!(null.status, Some(None));
        assert_eq!(null.priority, Some(None));
    }
}
