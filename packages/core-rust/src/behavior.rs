//! Behavior identity: the `(version, kind, action)` triple that addresses a
//! dispatchable command.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Known API surface
// ---------------------------------------------------------------------------

/// Wire version tag for the v2 command API.
pub const API_VERSION_2: &str = "v2";

/// Kind tag for the ping use case.
pub const KIND_PING: &str = "ping";
/// Kind tag for the version-retrieval use case.
pub const KIND_VERSION: &str = "version";
/// Kind tag for the runtime-metrics use case.
pub const KIND_METRICS: &str = "metrics";
/// Kind tag for the configuration-retrieval use case.
pub const KIND_CONFIG: &str = "config";
/// Kind tag for the acceptance-test echo use case.
pub const KIND_ECHO: &str = "echo";

/// Action tag for command execution.
pub const ACTION_COMMAND: &str = "command";

// ---------------------------------------------------------------------------
// BehaviorKey
// ---------------------------------------------------------------------------

/// Identity of a dispatchable operation.
///
/// Equality is exact triple match. Keys are created during startup when
/// features register their supported behaviors and are immutable for the
/// process lifetime; the registry is the sole owner of the key-to-executable
/// mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorKey {
    pub version: String,
    pub kind: String,
    pub action: String,
}

impl BehaviorKey {
    /// Creates a key from the triple.
    #[must_use]
    pub fn new(version: &str, kind: &str, action: &str) -> Self {
        Self {
            version: version.to_string(),
            kind: kind.to_string(),
            action: action.to_string(),
        }
    }

    /// Creates a v2 command key for the given kind.
    #[must_use]
    pub fn v2_command(kind: &str) -> Self {
        Self::new(API_VERSION_2, kind, ACTION_COMMAND)
    }
}

impl fmt::Display for BehaviorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.version, self.kind, self.action)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn equality_is_exact_triple_match() {
        let a = BehaviorKey::new("v2", "ping", "command");
        let b = BehaviorKey::v2_command("ping");
        assert_eq!(a, b);

        assert_ne!(a, BehaviorKey::new("v1", "ping", "command"));
        assert_ne!(a, BehaviorKey::new("v2", "pong", "command"));
        assert_ne!(a, BehaviorKey::new("v2", "ping", "query"));
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(BehaviorKey::v2_command(KIND_PING), 1);
        map.insert(BehaviorKey::v2_command(KIND_METRICS), 2);

        assert_eq!(map.get(&BehaviorKey::v2_command(KIND_PING)), Some(&1));
        assert_eq!(map.get(&BehaviorKey::v2_command(KIND_ECHO)), None);
    }

    #[test]
    fn display_joins_triple() {
        let key = BehaviorKey::v2_command(KIND_VERSION);
        assert_eq!(key.to_string(), "v2/version/command");
    }

    #[test]
    fn serializes_with_plain_field_names() {
        let key = BehaviorKey::v2_command(KIND_CONFIG);
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["version"], "v2");
        assert_eq!(json["kind"], "config");
        assert_eq!(json["action"], "command");
    }
}
