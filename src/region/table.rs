use std::collections::{HashMap, HashSet};

use crate::geo::atlas::RegionIdentity;

/// Canonical, upper-cased region identifier (usually ISO alpha-3).
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    /// Normalize `raw` (trimmed, upper-cased).
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RegionCode {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for RegionCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<RegionCode> for String {
    fn from(c: RegionCode) -> Self {
        c.0
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Lookup from any accepted source-field value (code, numeric id, full name) to the
/// canonical region code, plus the set of regions excluded from rendering.
#[derive(Clone, Debug, Default)]
pub struct RegionTable {
    aliases: HashMap<String, RegionCode>,
    held_out: HashSet<RegionCode>,
}

impl RegionTable {
    /// Empty table; only direct `id` / `iso_a3` matches resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aliases for the widget's regions and the polar region. Nothing is held out.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table
            .insert("IND", &["356", "INDIA"])
            .insert("ARE", &["784", "UNITED ARAB EMIRATES"])
            .insert("USA", &["840", "UNITED STATES OF AMERICA", "UNITED STATES"])
            .insert("ATA", &["010", "10", "ANTARCTICA"]);
        table
    }

    /// Register `code` and the source-field values that identify it.
    pub fn insert(&mut self, code: impl Into<RegionCode>, aliases: &[&str]) -> &mut Self {
        let code = code.into();
        self.aliases.insert(code.as_str().to_string(), code.clone());
        for alias in aliases {
            self.aliases.insert(normalize(alias), code.clone());
        }
        self
    }

    /// Exclude `code` from rendering.
    pub fn hold_out(&mut self, code: impl Into<RegionCode>) -> &mut Self {
        self.held_out.insert(code.into());
        self
    }

    /// Canonical code for one source-field value, case-insensitive.
    pub fn lookup(&self, value: &str) -> Option<&RegionCode> {
        self.aliases.get(&normalize(value))
    }

    /// Every canonical code a region answers to, sorted and de-duplicated.
    ///
    /// `id` and `iso_a3` always count as codes in their own right; `name` only counts
    /// through the alias table.
    pub fn resolve(&self, identity: &RegionIdentity) -> Vec<RegionCode> {
        let mut codes = Vec::with_capacity(4);
        for direct in [&identity.id, &identity.iso_a3].into_iter().flatten() {
            if !direct.trim().is_empty() {
                codes.push(RegionCode::new(direct));
            }
        }
        for field in [&identity.id, &identity.iso_a3, &identity.name]
            .into_iter()
            .flatten()
        {
            if let Some(code) = self.lookup(field) {
                codes.push(code.clone());
            }
        }
        codes.sort();
        codes.dedup();
        codes
    }

    /// Whether any of `codes` is held out.
    pub fn is_held_out(&self, codes: &[RegionCode]) -> bool {
        codes.iter().any(|c| self.held_out.contains(c))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/table.rs"]
mod tests;
