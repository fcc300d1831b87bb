//! Tag registry: resolves tag identifiers to their definitions
//!
//! The registry is a fixed mapping from canonical id string to
//! [`TagDefinition`], built once over the closed kind set and read-only
//! afterwards. Lookups try the composite `id + sub-id` key first and fall
//! back to the bare primary id, so a sub-id-specific definition wins
//! whenever both exist (`60F` resolves to the `60F` entry if registered,
//! else to `60`). The reverse fallback is deliberately not implemented.

use std::collections::HashMap;

use super::fields::ParsedTag;
use super::grammar::{TagDefinition, TagKind};
use super::TagError;

/// Maps composite tag identifiers to tag definitions.
///
/// Build once, then share freely: the registry is never mutated after
/// construction, so concurrent callers need no coordination.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    definitions: HashMap<String, TagDefinition>,
}

impl TagRegistry {
    /// Build the registry over the full closed kind set.
    pub fn new() -> Self {
        let definitions = TagKind::ALL
            .iter()
            .map(|&kind| (kind.id().to_string(), TagDefinition::new(kind)))
            .collect();
        TagRegistry { definitions }
    }

    #[cfg(test)]
    fn register(&mut self, key: &str, definition: TagDefinition) {
        self.definitions.insert(key.to_string(), definition);
    }

    /// Canonical form of a primary id: numeric-looking ids lose padding and
    /// whitespace, so `"020"`, `" 20"` and `"20"` all hit the `20` entry.
    /// Non-numeric ids (`NS`, `MB`) pass through unchanged.
    fn canonical_id(primary_id: &str) -> String {
        match primary_id.trim().parse::<u32>() {
            Ok(numeric) => numeric.to_string(),
            Err(_) => primary_id.to_string(),
        }
    }

    /// Resolve a (primary id, sub-id) pair to a tag definition.
    ///
    /// Composite key first, bare primary id second. `None` means the kind is
    /// unknown - that is not an error by itself; the caller decides whether
    /// an unknown tag is fatal.
    pub fn resolve(&self, primary_id: &str, sub_id: Option<&str>) -> Option<&TagDefinition> {
        let id = Self::canonical_id(primary_id);

        if let Some(sub) = sub_id.filter(|sub| !sub.is_empty()) {
            let composite = format!("{}{}", id, sub);
            if let Some(definition) = self.definitions.get(&composite) {
                return Some(definition);
            }
        }

        self.definitions.get(&id)
    }

    /// Resolve and parse in one step.
    ///
    /// `Ok(None)` for an unknown kind; parse failures from a recognized kind
    /// propagate unchanged.
    pub fn create_tag(
        &self,
        primary_id: &str,
        sub_id: Option<&str>,
        content: &str,
    ) -> Result<Option<ParsedTag>, TagError> {
        match self.resolve(primary_id, sub_id) {
            Some(definition) => definition.parse(content).map(Some),
            None => Ok(None),
        }
    }

    /// Canonical ids of all registered definitions, sorted.
    pub fn known_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_every_known_kind() {
        let registry = TagRegistry::new();
        assert_eq!(registry.known_ids().len(), TagKind::ALL.len());
        for kind in TagKind::ALL {
            let definition = registry.resolve(kind.id(), None);
            assert_eq!(definition.map(TagDefinition::kind), Some(kind));
        }
    }

    #[test]
    fn test_unknown_id_resolves_to_none() {
        let registry = TagRegistry::new();
        assert!(registry.resolve("99", None).is_none());
        assert!(registry.resolve("XX", Some("F")).is_none());
    }

    #[test]
    fn test_sub_id_falls_back_to_bare_id() {
        let registry = TagRegistry::new();
        // No 60F entry exists, so 60F lands on the bare 60 definition
        let definition = registry.resolve("60", Some("F")).unwrap();
        assert_eq!(definition.kind(), TagKind::OpeningBalance);
    }

    #[test]
    fn test_composite_key_wins_over_bare_id() {
        let mut registry = TagRegistry::new();
        registry.register("60F", TagDefinition::new(TagKind::ClosingBalance));

        let composite = registry.resolve("60", Some("F")).unwrap();
        assert_eq!(composite.kind(), TagKind::ClosingBalance);

        let bare = registry.resolve("60", None).unwrap();
        assert_eq!(bare.kind(), TagKind::OpeningBalance);
    }

    #[test]
    fn test_numeric_ids_are_normalized() {
        let registry = TagRegistry::new();
        assert!(registry.resolve("020", None).is_some());
        assert!(registry.resolve(" 20", None).is_some());
        // Alphabetic ids are not touched by normalization
        assert!(registry.resolve("NS", None).is_some());
        assert!(registry.resolve("ns", None).is_none());
    }

    #[test]
    fn test_create_tag_unknown_kind_is_ok_none() {
        let registry = TagRegistry::new();
        assert_eq!(registry.create_tag("99", None, "anything"), Ok(None));
    }

    #[test]
    fn test_create_tag_parse_failure_propagates() {
        let registry = TagRegistry::new();
        let result = registry.create_tag("28", None, "not-a-number");
        assert!(matches!(result, Err(TagError::Unparsable { .. })));
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TagRegistry>();
    }
}
