//! Command requests: what the caller sends across the boundary.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::InvocationId;

/// Name of a command; the key into the host's registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandName(String);

impl CommandName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CommandName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommandName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CommandName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&CommandName> for CommandName {
    fn from(name: &CommandName) -> Self {
        name.clone()
    }
}

/// One named request issued by the caller.
///
/// Immutable once issued: the fields are only readable.
/// `arguments` is `None` when the command is invoked without a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    id: InvocationId,
    name: CommandName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arguments: Option<serde_json::Value>,
    issued_at: DateTime<Utc>,
}

impl CommandRequest {
    pub fn new(
        id: InvocationId,
        name: impl Into<CommandName>,
        arguments: Option<serde_json::Value>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            arguments,
            issued_at,
        }
    }

    pub fn id(&self) -> InvocationId {
        self.id
    }

    pub fn name(&self) -> &CommandName {
        &self.name
    }

    pub fn arguments(&self) -> Option<&serde_json::Value> {
        self.arguments.as_ref()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use ulid::Ulid;

    #[test]
    fn command_name_is_transparent_string() {
        let name = CommandName::from("test_bail");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"test_bail\"");
        assert_eq!(name.to_string(), "test_bail");
    }

    #[test]
    fn command_name_can_be_looked_up_by_str() {
        let mut map = HashMap::new();
        map.insert(CommandName::from("test"), 1);
        assert_eq!(map.get("test"), Some(&1));
    }

    #[test]
    fn request_without_arguments_omits_the_field() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let request = CommandRequest::new(InvocationId::from(Ulid::new()), "test", None, at);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "test");
        assert!(json.get("arguments").is_none());
        assert_eq!(request.issued_at(), at);
    }
}
