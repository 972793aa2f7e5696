//! Hierarchy settings.
//!
//! Maps structured field names onto the three relation roles. A page
//! containing `up:: [[Topic]]` declares Topic as its parent because `up`
//! is listed under `parents`.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Field-name groups used for DEFINED relations.
///
/// # Examples
///
/// ```
/// use neuro_core::HierarchyConfig;
///
/// let config = HierarchyConfig::from_toml_str(r#"
///     parents = ["parent", "north"]
///     friends = ["see-also"]
/// "#).unwrap();
///
/// assert_eq!(config.parents, vec!["parent", "north"]);
/// // Groups that are left out keep their defaults.
/// assert_eq!(config.children, HierarchyConfig::default().children);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Fields whose targets are parents of the page.
    pub parents: Vec<String>,

    /// Fields whose targets are children of the page.
    pub children: Vec<String>,

    /// Fields whose targets are friends of the page.
    pub friends: Vec<String>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            parents: vec!["parent".into(), "parents".into(), "up".into()],
            children: vec!["child".into(), "children".into(), "down".into()],
            friends: vec![
                "friend".into(),
                "friends".into(),
                "related".into(),
                "jump".into(),
            ],
        }
    }
}

impl HierarchyConfig {
    /// Parses and validates settings from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates settings from JSON.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects blank field names and names claimed by more than one group.
    ///
    /// Comparison is case-insensitive, matching how field links are looked up.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in self.all_fields() {
            let key = field.trim().to_lowercase();
            if key.is_empty() {
                return Err(CoreError::InvalidConfig("blank field name".into()));
            }
            if !seen.insert(key) {
                return Err(CoreError::InvalidConfig(format!(
                    "field '{}' is listed more than once",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Iterates over every configured field name, parents first.
    pub fn all_fields(&self) -> impl Iterator<Item = &String> {
        self.parents
            .iter()
            .chain(self.children.iter())
            .chain(self.friends.iter())
    }
}
