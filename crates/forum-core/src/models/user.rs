use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the signed-in user as returned by the server.
///
/// The fields are defined by the server, so the record is kept as an opaque
/// JSON object. The accessors below only read well-known fields when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    /// Name to show for the user, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.username()
            .or_else(|| self.email())
            .unwrap_or("unknown user")
    }
}

impl From<Map<String, Value>> for UserProfile {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Payload of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    #[serde(default)]
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// User summary plus authored-article count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserSummary,
    #[serde(default)]
    pub article_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_accessors() {
        let profile: UserProfile =
            serde_json::from_value(json!({"id": 7, "username": "ada", "email": "ada@example.com"}))
                .unwrap();
        assert_eq!(profile.id(), Some(7));
        assert_eq!(profile.username(), Some("ada"));
        assert_eq!(profile.email(), Some("ada@example.com"));
        assert_eq!(profile.display_name(), "ada");
    }

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: UserProfile =
            serde_json::from_value(json!({"email": "x@example.com", "avatar": "a.png"})).unwrap();
        assert_eq!(profile.display_name(), "x@example.com");
        assert_eq!(profile.get("avatar"), Some(&json!("a.png")));
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"email": "x@example.com", "avatar": "a.png"})
        );
    }

    #[test]
    fn test_parse_user_detail() {
        let json = r#"{"id": 3, "username": "bob", "email": "bob@example.com", "article_count": 12}"#;
        let detail: UserDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.user.username, "bob");
        assert_eq!(detail.article_count, 12);
    }

    #[test]
    fn test_parse_auth_payload() {
        let json = r#"{"token": "jwt", "user": {"id": 1, "username": "ada", "email": "a@b.c"}}"#;
        let payload: AuthPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.token, "jwt");
        assert_eq!(payload.user.id(), Some(1));
    }
}
