//! Item domain model
//!
//! The single record type managed by the handler: five first-class typed
//! fields layered over an open attribute map for caller-supplied extras.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute keys owned by the system. A request body can never write these
/// directly: `itemId` and `createdAt` are assigned at creation, `updatedAt`
/// on every mutation.
pub const RESERVED_KEYS: [&str; 3] = ["itemId", "createdAt", "updatedAt"];

/// A stored item record.
///
/// Serializes to the flat JSON shape callers see on retrieval: the typed
/// fields in camelCase plus every extra attribute at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Primary key. Generated once, immutable afterward.
    pub item_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Epoch seconds, set once at creation.
    pub created_at: i64,
    /// Epoch seconds, refreshed on every update.
    pub updated_at: i64,
    /// Caller-supplied fields outside the typed set, preserved verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Item {
    /// Build a new item from a create request body.
    ///
    /// The caller has already verified that `name` is present. Body keys
    /// other than `name`/`description` are copied into the attribute map,
    /// except the reserved keys, which stay system-owned.
    pub fn from_body(item_id: String, now: i64, body: &Map<String, Value>) -> Self {
        let name = body.get("name").map(coerce_string).unwrap_or_default();
        let description = body.get("description").map(coerce_string).unwrap_or_default();

        let mut attributes = Map::new();
        for (key, value) in body {
            if key == "name" || key == "description" || RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            attributes.insert(key.clone(), value.clone());
        }

        Self {
            item_id,
            name,
            description,
            created_at: now,
            updated_at: now,
            attributes,
        }
    }

    /// Apply a partial merge: refresh `updatedAt`, set/overwrite every
    /// merged attribute. Fields not mentioned in the merge stay unchanged.
    ///
    /// Reserved keys are dropped here even if a caller-built merge carries
    /// them, so `itemId` and `createdAt` can never be rewritten.
    pub fn apply(&mut self, merge: &AttributeMerge) {
        self.updated_at = merge.updated_at;

        for (key, value) in &merge.attributes {
            match key.as_str() {
                "itemId" | "createdAt" | "updatedAt" => {}
                "name" => self.name = coerce_string(value),
                "description" => self.description = coerce_string(value),
                other => {
                    self.attributes.insert(other.to_string(), value.clone());
                }
            }
        }
    }
}

/// The value handed to a store's `update`: the refreshed `updatedAt` plus
/// the caller attributes to set.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMerge {
    pub updated_at: i64,
    pub attributes: Map<String, Value>,
}

impl AttributeMerge {
    /// Build a merge from an update request body. Reserved keys in the body
    /// are silently ignored.
    pub fn from_body(updated_at: i64, body: &Map<String, Value>) -> Self {
        let attributes = body
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            updated_at,
            attributes,
        }
    }
}

/// Render a JSON value as a string: strings pass through, everything else
/// falls back to its JSON text.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
