//! Key name to HID usage translation for profile documents.
//!
//! Profiles name keys by string (`"A"`, `"F1"`, `"LeftCtrl"`, `"G3"`); the
//! firmware only understands one-byte usage codes. [`KeyUsageTable`] is the
//! single place that translation happens.
//!
//! The table is an explicit value rather than ambient global state: the
//! builder takes a `&KeyUsageTable`, so callers normally pass
//! [`KeyUsageTable::standard()`] while tests can hand in a reduced table built
//! with [`KeyUsageTable::from_entries`].

pub mod usage;

use std::collections::HashMap;
use std::sync::OnceLock;

pub use usage::KEY_USAGES;

static STANDARD: OnceLock<KeyUsageTable> = OnceLock::new();

/// Immutable mapping from key names to one-byte HID usage codes.
///
/// # Examples
///
/// ```rust
/// use k90_core::keymap::KeyUsageTable;
///
/// let table = KeyUsageTable::standard();
/// assert_eq!(table.lookup("A"), Some(0x04));
/// assert_eq!(table.lookup("LeftCtrl"), Some(0xE0));
/// assert_eq!(table.lookup("NoSuchKey"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyUsageTable {
    /// Entries in insertion order; drives iteration and reverse lookups.
    entries: Vec<(String, u8)>,
    by_name: HashMap<String, u8>,
}

impl KeyUsageTable {
    /// Returns the process-wide table built from [`KEY_USAGES`].
    ///
    /// The table is constructed on first use and shared read-only afterwards.
    pub fn standard() -> &'static KeyUsageTable {
        STANDARD.get_or_init(|| KeyUsageTable::from_entries(KEY_USAGES.iter().copied()))
    }

    /// Builds a table from `(name, usage)` pairs.
    ///
    /// If a name appears more than once, the first occurrence is kept.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let mut table = KeyUsageTable::default();
        for (name, usage) in entries {
            let name = name.into();
            if table.by_name.contains_key(&name) {
                continue;
            }
            table.by_name.insert(name.clone(), usage);
            table.entries.push((name, usage));
        }
        table
    }

    /// Resolves a key name to its usage code.
    ///
    /// Returns `None` for any name the table does not list; unknown names are
    /// never mapped to a fallback code.
    pub fn lookup(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    /// Returns the canonical (first listed) name for `usage`, if any.
    pub fn name_of(&self, usage: u8) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, code)| *code == usage)
            .map(|(name, _)| name.as_str())
    }

    /// Number of names in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no names.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, usage)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.entries.iter().map(|(name, usage)| (name.as_str(), *usage))
    }
}
