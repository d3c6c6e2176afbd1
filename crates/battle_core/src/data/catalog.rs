//! Fish catalog loading and lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::FishProfile;
use crate::error::{BattleError, Result};

const BUILTIN_CATALOG: &str = include_str!("../../data/fish_catalog.ron");

/// Anything that can resolve a fish type id to its profile.
///
/// The deployment gate only needs lookups, so callers may back it with a
/// player inventory, a remote collection snapshot, or the built-in catalog.
pub trait ProfileSource {
    /// Look up a fish type.
    fn profile(&self, type_id: &str) -> Option<&FishProfile>;
}

/// A set of fish profiles indexed by type id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CatalogFile", into = "CatalogFile")]
pub struct FishCatalog {
    fish: BTreeMap<String, FishProfile>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "FishCatalog")]
struct CatalogFile {
    fish: Vec<FishProfile>,
}

impl From<CatalogFile> for FishCatalog {
    fn from(file: CatalogFile) -> Self {
        Self::from_profiles(file.fish)
    }
}

impl From<FishCatalog> for CatalogFile {
    fn from(catalog: FishCatalog) -> Self {
        Self {
            fish: catalog.fish.into_values().collect(),
        }
    }
}

impl FishCatalog {
    /// Build a catalog from profiles. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_profiles(profiles: impl IntoIterator<Item = FishProfile>) -> Self {
        Self {
            fish: profiles
                .into_iter()
                .map(|profile| (profile.id.clone(), profile))
                .collect(),
        }
    }

    /// Parse a catalog from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParseError`] on malformed RON.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| BattleError::DataParseError {
            what: "fish catalog".to_string(),
            message: e.to_string(),
        })
    }

    /// The catalog of fish shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded catalog is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_ron_str(BUILTIN_CATALOG)
    }

    /// Number of fish types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    /// Check if a fish type exists.
    #[must_use]
    pub fn contains(&self, type_id: &str) -> bool {
        self.fish.contains_key(type_id)
    }

    /// Iterate profiles in type id order.
    pub fn iter(&self) -> impl Iterator<Item = &FishProfile> {
        self.fish.values()
    }
}

impl ProfileSource for FishCatalog {
    fn profile(&self, type_id: &str) -> Option<&FishProfile> {
        self.fish.get(type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Role;

    #[test]
    fn test_builtin_catalog_has_nine_fish() {
        let catalog = FishCatalog::builtin().expect("builtin catalog parses");
        assert_eq!(catalog.len(), 9);
        assert!(catalog.contains("fish_001"));
        assert!(catalog.contains("fish_009"));
    }

    #[test]
    fn test_builtin_roles() {
        let catalog = FishCatalog::builtin().expect("builtin catalog parses");
        let role = |id: &str| catalog.profile(id).map(|p| p.battle_stats().role);

        assert_eq!(role("fish_001"), Some(Role::Defender));
        assert_eq!(role("fish_002"), Some(Role::Attacker));
        assert_eq!(role("fish_005"), Some(Role::Neutral));
        assert_eq!(role("fish_008"), Some(Role::Attacker));
        assert_eq!(role("nope"), None);
    }

    #[test]
    fn test_neutral_uses_base_health() {
        let catalog = FishCatalog::builtin().expect("builtin catalog parses");
        let jack = catalog.profile("fish_005").expect("Shiny Jack exists");
        let stats = jack.battle_stats();
        assert_eq!(stats.hp, 50);
        assert_eq!(stats.damage, 10);
    }

    #[test]
    fn test_malformed_catalog() {
        let err = FishCatalog::from_ron_str("FishCatalog(fish: [(id: 3)])").unwrap_err();
        assert!(matches!(err, BattleError::DataParseError { .. }));
    }
}
