//! Property alias resolution.
//!
//! Maps every acceptable spelling of a property name to its canonical id:
//! the id verbatim, the lowercased id, and the lowercased human label with
//! internal whitespace collapsed to underscores. The table is built once
//! at startup and read-only afterwards.

use std::collections::HashMap;

use crate::catalog::{verify_catalog, PropertyDescriptor};
use crate::error::{AdmetError, Result};

/// O(1) alias-to-canonical-id lookup over the property catalog.
pub struct PropertyResolver {
    aliases: HashMap<String, &'static str>,
    ids: Vec<&'static str>,
}

impl PropertyResolver {
    /// Build the alias table from a catalog.
    ///
    /// Fails when the catalog carries duplicate ids or when two distinct
    /// ids collide on the same alias — both are startup-fatal conditions.
    pub fn from_catalog(catalog: &'static [PropertyDescriptor]) -> Result<Self> {
        verify_catalog(catalog)?;
        let mut aliases: HashMap<String, &'static str> = HashMap::new();
        for prop in catalog {
            insert_alias(&mut aliases, prop.id.to_string(), prop.id)?;
            insert_alias(&mut aliases, prop.id.to_ascii_lowercase(), prop.id)?;
            insert_alias(&mut aliases, normalize(prop.label), prop.id)?;
        }
        Ok(Self {
            aliases,
            ids: catalog.iter().map(|p| p.id).collect(),
        })
    }

    /// Resolve one alias to its canonical id.
    ///
    /// Tries the alias verbatim first, then normalized (trimmed,
    /// lowercased, whitespace collapsed to underscores).
    pub fn resolve(&self, alias: &str) -> Option<&'static str> {
        self.aliases
            .get(alias)
            .or_else(|| self.aliases.get(&normalize(alias)))
            .copied()
    }

    /// Resolve a batch of aliases, all-or-nothing.
    ///
    /// An absent or empty list selects the whole catalog in catalog order.
    /// Any unknown alias fails the batch with an error naming it together
    /// with the full recognized alias set. Partial property lists are only
    /// ever user error, so there is no resolve-then-filter fallback.
    pub fn resolve_many(&self, aliases: Option<&[String]>) -> Result<Vec<&'static str>> {
        let requested = match aliases {
            None => return Ok(self.ids.clone()),
            Some(list) if list.is_empty() => return Ok(self.ids.clone()),
            Some(list) => list,
        };
        let mut resolved = Vec::with_capacity(requested.len());
        for alias in requested {
            match self.resolve(alias) {
                Some(id) => resolved.push(id),
                None => {
                    return Err(AdmetError::UnknownProperty {
                        alias: alias.clone(),
                        recognized: self.recognized().join(", "),
                    })
                }
            }
        }
        Ok(resolved)
    }

    /// Every recognized alias spelling, sorted.
    pub fn recognized(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Canonical ids in catalog order.
    pub fn ids(&self) -> &[&'static str] {
        &self.ids
    }
}

fn normalize(alias: &str) -> String {
    alias
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn insert_alias(
    table: &mut HashMap<String, &'static str>,
    key: String,
    id: &'static str,
) -> Result<()> {
    if let Some(existing) = table.get(key.as_str()) {
        if *existing != id {
            return Err(AdmetError::AliasCollision {
                alias: key,
                first: existing.to_string(),
                second: id.to_string(),
            });
        }
        return Ok(());
    }
    table.insert(key, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    fn resolver() -> PropertyResolver {
        PropertyResolver::from_catalog(CATALOG).expect("catalog must build")
    }

    #[test]
    fn test_every_id_resolves_to_itself() {
        let r = resolver();
        for prop in CATALOG {
            assert_eq!(r.resolve(prop.id), Some(prop.id));
            assert_eq!(r.resolve(&prop.id.to_ascii_lowercase()), Some(prop.id));
        }
    }

    #[test]
    fn test_labels_resolve_to_their_id() {
        let r = resolver();
        for prop in CATALOG {
            assert_eq!(r.resolve(prop.label), Some(prop.id), "label {}", prop.label);
        }
    }

    #[test]
    fn test_alias_table_is_injective() {
        // Building succeeds only when no alias maps to two ids; double-check
        // by resolving every raw key back to a single canonical id.
        let r = resolver();
        for key in r.recognized() {
            assert!(r.resolve(key).is_some(), "key {key} must resolve");
        }
    }

    #[test]
    fn test_friendly_spellings() {
        let r = resolver();
        assert_eq!(r.resolve("Molecular Weight"), Some("molecular_weight"));
        assert_eq!(r.resolve("logp"), Some("logP"));
        assert_eq!(r.resolve("hERG Blocking"), Some("hERG"));
        assert_eq!(
            r.resolve("Blood-Brain Barrier Penetration"),
            Some("BBB_Martins")
        );
        assert_eq!(r.resolve("no_such_property"), None);
    }

    #[test]
    fn test_resolve_many_defaults_to_full_catalog() {
        let r = resolver();
        let all = r.resolve_many(None).unwrap();
        assert_eq!(all, catalog_order());

        let empty: Vec<String> = Vec::new();
        let all = r.resolve_many(Some(&empty)).unwrap();
        assert_eq!(all, catalog_order());
    }

    #[test]
    fn test_resolve_many_is_all_or_nothing() {
        let r = resolver();
        let request = vec![
            "logP".to_string(),
            "bogus".to_string(),
            "QED".to_string(),
        ];
        let err = r.resolve_many(Some(&request)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("molecular_weight"), "lists recognized aliases");
    }

    #[test]
    fn test_resolve_many_preserves_request_order() {
        let r = resolver();
        let request = vec!["QED".to_string(), "Molecular Weight".to_string()];
        let ids = r.resolve_many(Some(&request)).unwrap();
        assert_eq!(ids, vec!["QED", "molecular_weight"]);
    }

    fn catalog_order() -> Vec<&'static str> {
        CATALOG.iter().map(|p| p.id).collect()
    }
}
