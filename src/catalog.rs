//! Named-record catalogs and the overlay merge.
//!
//! Presets and image entries share one shape: a name, an ownership scope,
//! and a payload. Catalogs from the two scopes are combined with a single
//! deterministic rule: the user's record wins per name, whole-record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Reserved catalog key for the user's private uploads.
pub const USER_LIBRARY: &str = "user";

/// Ownership partition of a named record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Official,
    User,
}

/// A record addressable by name within its scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRecord<P> {
    pub name: String,
    pub scope: Scope,
    pub payload: P,
}

impl<P> NamedRecord<P> {
    pub fn new(name: impl Into<String>, scope: Scope, payload: P) -> Self {
        NamedRecord {
            name: name.into(),
            scope,
            payload,
        }
    }
}

/// A reusable stamp design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub symbol: String,
    pub color: String,
    pub secondary_color: String,
}

/// A stored image: where it lives in blob storage and where to load it from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub path: String,
    pub url: String,
}

/// Index a list of named records by name. Later entries win on duplicate
/// names, matching the backend's per-scope uniqueness.
pub fn by_name<P>(records: Vec<NamedRecord<P>>) -> HashMap<String, NamedRecord<P>> {
    records.into_iter().map(|r| (r.name.clone(), r)).collect()
}

/// Merge two name-keyed catalogs: for every name in either input, the user
/// entry is taken if present, else the official one. Replacement is always
/// whole-record; fields are never merged.
pub fn overlay_merge<V>(
    official: HashMap<String, V>,
    user: HashMap<String, V>,
) -> HashMap<String, V> {
    let mut merged = official;
    for (name, record) in user {
        merged.insert(name, record);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(name: &str, scope: Scope, symbol: &str) -> NamedRecord<Preset> {
        NamedRecord::new(
            name,
            scope,
            Preset {
                symbol: symbol.into(),
                color: "red".into(),
                secondary_color: "blue".into(),
            },
        )
    }

    #[test]
    fn test_user_record_replaces_official_whole_record() {
        let official = by_name(vec![
            preset("A", Scope::Official, "⭐"),
            preset("B", Scope::Official, "🌙"),
        ]);
        let user = by_name(vec![preset("A", Scope::User, "🔥")]);

        let merged = overlay_merge(official, user);

        assert_eq!(merged.len(), 2);
        // "A" is the user's record in full, not a field-merge of the two
        assert_eq!(merged["A"].scope, Scope::User);
        assert_eq!(merged["A"].payload.symbol, "🔥");
        assert_eq!(merged["B"].scope, Scope::Official);
    }

    #[test]
    fn test_merge_keeps_names_unique_to_either_side() {
        let official = by_name(vec![preset("base", Scope::Official, "⭐")]);
        let user = by_name(vec![preset("mine", Scope::User, "🔥")]);

        let merged = overlay_merge(official, user);
        assert_eq!(merged.len(), 2);
        assert!(merged.contains_key("base"));
        assert!(merged.contains_key("mine"));
    }

    #[test]
    fn test_merge_of_empty_inputs() {
        let empty: HashMap<String, NamedRecord<Preset>> = HashMap::new();
        assert!(overlay_merge(empty.clone(), empty.clone()).is_empty());

        let official = by_name(vec![preset("A", Scope::Official, "⭐")]);
        let merged = overlay_merge(official.clone(), empty);
        assert_eq!(merged, official);
    }

    #[test]
    fn test_by_name_keys_by_record_name() {
        let map = by_name(vec![preset("walk", Scope::User, "🚶")]);
        assert_eq!(map["walk"].name, "walk");
    }
}
