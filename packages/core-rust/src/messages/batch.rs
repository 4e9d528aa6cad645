//! Batch item schema: an envelope tagged with routing metadata and an
//! execution strategy, used in array-form requests to the batch endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::behavior::BehaviorKey;

/// The only defined execution strategy: items run strictly one after another
/// in array order. Other values are a reserved extension point; they are
/// preserved end-to-end but never dispatched on.
pub const STRATEGY_SYNCHRONOUS: &str = "synchronous";

/// One element of an array-form batch request or response.
///
/// Requests carry the use-case payload in `content`; responses reuse the same
/// shape with `content` replaced by the use-case response or an error
/// descriptor. Missing metadata fields decode as empty strings, which then
/// fail to resolve against the registry rather than failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<Value>,
}

impl BatchItem {
    /// Creates a synchronous item addressed at the given behavior.
    #[must_use]
    pub fn synchronous(behavior: &BehaviorKey, content: Value) -> Self {
        Self {
            version: behavior.version.clone(),
            kind: behavior.kind.clone(),
            action: behavior.action.clone(),
            strategy: STRATEGY_SYNCHRONOUS.to_string(),
            content: Some(content),
        }
    }

    /// The behavior key addressed by this item's routing metadata.
    #[must_use]
    pub fn behavior(&self) -> BehaviorKey {
        BehaviorKey::new(&self.version, &self.kind, &self.action)
    }

    /// A response item preserving this item's routing metadata and strategy.
    #[must_use]
    pub fn reply_with(&self, content: Value) -> Self {
        Self {
            version: self.version.clone(),
            kind: self.kind.clone(),
            action: self.action.clone(),
            strategy: self.strategy.clone(),
            content: Some(content),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::behavior::KIND_PING;

    #[test]
    fn item_roundtrip() {
        let item = BatchItem::synchronous(
            &BehaviorKey::v2_command(KIND_PING),
            json!({"requestId": "abc"}),
        );
        let bytes = serde_json::to_vec(&item).unwrap();
        let decoded: BatchItem = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let item = BatchItem::synchronous(&BehaviorKey::v2_command(KIND_PING), json!({}));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            json!({
                "version": "v2",
                "kind": "ping",
                "action": "command",
                "strategy": "synchronous",
                "content": {},
            })
        );
    }

    #[test]
    fn unknown_strategy_is_preserved() {
        let raw = json!({
            "version": "v9",
            "kind": "mystery",
            "action": "command",
            "strategy": "parallel-someday",
            "content": null,
        });
        let item: BatchItem = serde_json::from_value(raw).unwrap();
        assert_eq!(item.strategy, "parallel-someday");

        let reply = item.reply_with(json!({"ok": true}));
        assert_eq!(reply.strategy, "parallel-someday");
        assert_eq!(reply.version, "v9");
    }

    #[test]
    fn missing_metadata_decodes_to_empty_strings() {
        let item: BatchItem = serde_json::from_value(json!({})).unwrap();
        assert_eq!(item.behavior(), BehaviorKey::new("", "", ""));
        assert_eq!(item.strategy, "");
        assert!(item.content.is_none());
    }

    #[test]
    fn behavior_accessor_matches_metadata() {
        let item = BatchItem::synchronous(&BehaviorKey::v2_command(KIND_PING), json!({}));
        assert_eq!(item.behavior(), BehaviorKey::v2_command(KIND_PING));
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_metadata_roundtrips(
            version in "[a-z0-9]{0,8}",
            kind in "[a-z0-9]{0,8}",
            action in "[a-z0-9]{0,8}",
            strategy in "[a-z-]{0,16}",
        ) {
            let item = BatchItem {
                version,
                kind,
                action,
                strategy,
                content: Some(json!({"requestId": "x"})),
            };
            let bytes = serde_json::to_vec(&item).unwrap();
            let decoded: BatchItem = serde_json::from_slice(&bytes).unwrap();
            proptest::prop_assert_eq!(decoded, item);
        }
    }

    #[test]
    fn reply_preserves_metadata_and_replaces_content() {
        let item = BatchItem::synchronous(
            &BehaviorKey::v2_command(KIND_PING),
            json!({"requestId": "abc"}),
        );
        let reply = item.reply_with(json!({"requestId": "abc", "statusCode": 0}));
        assert_eq!(reply.behavior(), item.behavior());
        assert_eq!(reply.strategy, item.strategy);
        assert_eq!(reply.content, Some(json!({"requestId": "abc", "statusCode": 0})));
    }
}
