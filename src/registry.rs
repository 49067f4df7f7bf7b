//! Denomination registry.
//!
//! Fixed mapping from image-target name to the monetary value printed on
//! the note. Built once at startup and read-only afterwards.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::ScannerError;

/// Target names and values used when no `[denominations]` table is configured.
pub const DEFAULT_DENOMINATIONS: &[(&str, Decimal)] = &[
    ("Carte_5dt", dec!(5)),
    ("Carte_10DT", dec!(10)),
    ("Carte_10DT_V2", dec!(10)),
    ("Carte_20dt", dec!(20)),
    ("Carte_50dt", dec!(50)),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationRegistry {
    entries: BTreeMap<String, Decimal>,
}

impl Default for DenominationRegistry {
    fn default() -> Self {
        Self {
            entries: DEFAULT_DENOMINATIONS
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }
}

impl DenominationRegistry {
    /// Build a registry, rejecting any value that is not strictly positive.
    /// A later duplicate key replaces the earlier one.
    pub fn new<I, S>(entries: I) -> Result<Self, ScannerError>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, value) in entries {
            let name = name.into();
            if value <= Decimal::ZERO {
                return Err(ScannerError::InvalidDenomination {
                    target_id: name,
                    value: value.to_string(),
                });
            }
            map.insert(name, value.normalize());
        }
        debug!(count = map.len(), "Denomination registry built");
        Ok(Self { entries: map })
    }

    /// Build a registry from float values as they come out of TOML.
    pub fn from_floats<'a, I>(entries: I) -> Result<Self, ScannerError>
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let mut converted = Vec::new();
        for (name, raw) in entries {
            let value = Decimal::try_from(*raw).map_err(|_| ScannerError::InvalidDenomination {
                target_id: name.clone(),
                value: raw.to_string(),
            })?;
            converted.push((name.clone(), value));
        }
        Self::new(converted)
    }

    /// Look up the value for a target name (exact, case-sensitive match).
    pub fn lookup(&self, target_id: &str) -> Option<Decimal> {
        self.entries.get(target_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
