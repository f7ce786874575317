//! Validation of untrusted profile documents into a [`Profile`].
//!
//! The input is a generic JSON tree (as produced by `serde_json`) shaped like:
//!
//! ```json
//! [
//!   { "key": "G1", "type": "key", "new_key": "F13" },
//!   { "key": "G2", "repeat_mode": "hold", "repeat_count": 2, "macro": [
//!       { "key": "LeftCtrl", "pressed": true },
//!       { "key": "C", "pressed": true },
//!       { "delay": 20 },
//!       { "key": "C", "pressed": false },
//!       { "key": "LeftCtrl", "pressed": false }
//!   ] },
//!   { "key": "G3", "type": "none" }
//! ]
//! ```
//!
//! Binding-level problems abort the whole build on the first failure: the
//! firmware has no representation for a partially valid profile. Macro items
//! with neither `"key"` nor `"delay"` are the single exception; they are
//! logged and dropped.
//!
//! Two defaults are deliberately asymmetric: a missing `"repeat_mode"` means
//! `fixed`, but a missing `"type"` means `macro` rather than `none`. Existing
//! profile files rely on the latter.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::keymap::KeyUsageTable;
use crate::profile::model::{
    BindAction, BindType, Binding, MacroItem, Profile, RepeatMode, MAX_BINDINGS,
};

/// Reasons a profile document is rejected.
///
/// Every variant that concerns a single binding carries its zero-based
/// `index` in the document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The document root is not an array.
    #[error("root is not a sequence")]
    RootNotSequence,

    /// More bindings than the one-byte count can express.
    #[error("profile has {count} bindings, at most {max} are supported")]
    TooManyBindings { count: usize, max: usize },

    /// A binding entry is not an object.
    #[error("binding {index}: entry is not a mapping")]
    NotAMapping { index: usize },

    /// A required field is absent.
    #[error("binding {index}: missing \"{field}\" field")]
    MissingField { index: usize, field: String },

    /// A field holds a value of the wrong JSON type.
    #[error("binding {index}: \"{field}\" must be {expected}")]
    WrongType {
        index: usize,
        field: String,
        expected: &'static str,
    },

    /// A key name is not in the key usage table.
    #[error("binding {index}: unknown key \"{name}\" in \"{field}\"")]
    UnknownKey {
        index: usize,
        field: String,
        name: String,
    },

    /// A string field holds a value outside its fixed vocabulary.
    #[error("binding {index}: invalid {field} \"{value}\" (expected one of {expected})")]
    InvalidEnum {
        index: usize,
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A number does not fit the unsigned 16-bit wire field.
    #[error("binding {index}: \"{field}\" value {value} is outside 0..=65535")]
    OutOfRange {
        index: usize,
        field: String,
        value: String,
    },

    /// The encoded macro data would not be addressable by 16-bit offsets.
    #[error("encoded profile data is {size} bytes, at most {max} are supported")]
    DataTooLarge { size: usize, max: usize },
}

/// Validates a profile document against a key usage table.
///
/// Shorthand for `ProfileBuilder::new(table).build(document)`.
///
/// # Errors
///
/// Returns the first [`BuildError`] encountered; no partial profile is
/// produced.
///
/// # Examples
///
/// ```rust
/// use k90_core::keymap::KeyUsageTable;
/// use k90_core::profile::build;
/// use serde_json::json;
///
/// let doc = json!([{ "key": "G1", "type": "key", "new_key": "A" }]);
/// let profile = build(&doc, KeyUsageTable::standard()).unwrap();
/// assert_eq!(profile.len(), 1);
/// ```
pub fn build(document: &Value, table: &KeyUsageTable) -> Result<Profile, BuildError> {
    ProfileBuilder::new(table).build(document)
}

/// Turns profile documents into [`Profile`]s using a fixed key table.
#[derive(Debug, Clone, Copy)]
pub struct ProfileBuilder<'t> {
    table: &'t KeyUsageTable,
}

impl<'t> ProfileBuilder<'t> {
    pub fn new(table: &'t KeyUsageTable) -> Self {
        Self { table }
    }

    /// Validates `document` and returns the resulting profile.
    ///
    /// # Errors
    ///
    /// See [`BuildError`] for the rejection reasons.
    pub fn build(&self, document: &Value) -> Result<Profile, BuildError> {
        let entries = document.as_array().ok_or(BuildError::RootNotSequence)?;
        if entries.len() > MAX_BINDINGS {
            return Err(BuildError::TooManyBindings {
                count: entries.len(),
                max: MAX_BINDINGS,
            });
        }

        let bindings = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.build_binding(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let profile = Profile::new(bindings)?;
        debug!(
            bindings = profile.len(),
            data_len = profile.data_len(),
            "profile validated"
        );
        Ok(profile)
    }

    fn build_binding(&self, index: usize, entry: &Value) -> Result<Binding, BuildError> {
        let fields = entry
            .as_object()
            .ok_or(BuildError::NotAMapping { index })?;

        let key = fields.get("key").ok_or_else(|| BuildError::MissingField {
            index,
            field: "key".to_string(),
        })?;
        let source_usage = self.resolve_key(index, "key", key)?;

        let repeat_mode = match fields.get("repeat_mode") {
            Some(value) => {
                let name = expect_str(index, "repeat_mode", value)?;
                RepeatMode::from_name(name).ok_or_else(|| BuildError::InvalidEnum {
                    index,
                    field: "repeat_mode",
                    value: name.to_string(),
                    expected: "\"fixed\", \"hold\", \"toggle\"",
                })?
            }
            None => RepeatMode::Fixed,
        };

        let bind_type = match fields.get("type") {
            Some(value) => {
                let name = expect_str(index, "type", value)?;
                BindType::from_name(name).ok_or_else(|| BuildError::InvalidEnum {
                    index,
                    field: "type",
                    value: name.to_string(),
                    expected: "\"none\", \"key\", \"macro\"",
                })?
            }
            None => BindType::Macro,
        };

        let action = match bind_type {
            BindType::None => BindAction::None,
            BindType::Remap => {
                let new_key = fields.get("new_key").ok_or_else(|| BuildError::MissingField {
                    index,
                    field: "new_key".to_string(),
                })?;
                BindAction::Remap {
                    target_usage: self.resolve_key(index, "new_key", new_key)?,
                }
            }
            BindType::Macro => self.build_macro(index, fields)?,
        };

        debug!(index, source_usage, ?repeat_mode, ?bind_type, "binding validated");
        Ok(Binding {
            source_usage,
            repeat_mode,
            action,
        })
    }

    fn build_macro(&self, index: usize, fields: &Map<String, Value>) -> Result<BindAction, BuildError> {
        let repeat_count = match fields.get("repeat_count") {
            Some(value) => expect_u16(index, "repeat_count", value)?,
            None => 1,
        };

        let entries = fields
            .get("macro")
            .ok_or_else(|| BuildError::MissingField {
                index,
                field: "macro".to_string(),
            })?
            .as_array()
            .ok_or_else(|| BuildError::WrongType {
                index,
                field: "macro".to_string(),
                expected: "an array",
            })?;

        let mut items = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            match self.build_macro_item(index, position, entry)? {
                Some(item) => items.push(item),
                None => warn!(
                    index,
                    item = position,
                    "macro item has neither \"key\" nor \"delay\"; skipping it"
                ),
            }
        }

        Ok(BindAction::Macro {
            repeat_count,
            items,
        })
    }

    /// Returns `Ok(None)` for an item that matches neither recognised shape.
    fn build_macro_item(
        &self,
        index: usize,
        position: usize,
        entry: &Value,
    ) -> Result<Option<MacroItem>, BuildError> {
        let Some(fields) = entry.as_object() else {
            return Ok(None);
        };

        if let Some(key) = fields.get("key") {
            let usage = self.resolve_key(index, &format!("macro[{position}].key"), key)?;
            let pressed_field = format!("macro[{position}].pressed");
            let pressed = fields
                .get("pressed")
                .ok_or_else(|| BuildError::MissingField {
                    index,
                    field: pressed_field.clone(),
                })?
                .as_bool()
                .ok_or(BuildError::WrongType {
                    index,
                    field: pressed_field,
                    expected: "a boolean",
                })?;
            return Ok(Some(MacroItem::KeyEvent { usage, pressed }));
        }

        if let Some(delay) = fields.get("delay") {
            let milliseconds = expect_u16(index, &format!("macro[{position}].delay"), delay)?;
            return Ok(Some(MacroItem::Delay { milliseconds }));
        }

        Ok(None)
    }

    fn resolve_key(&self, index: usize, field: &str, value: &Value) -> Result<u8, BuildError> {
        let name = expect_str(index, field, value)?;
        self.table
            .lookup(name)
            .ok_or_else(|| BuildError::UnknownKey {
                index,
                field: field.to_string(),
                name: name.to_string(),
            })
    }
}

// ── Field readers ─────────────────────────────────────────────────────────────

fn expect_str<'v>(index: usize, field: &str, value: &'v Value) -> Result<&'v str, BuildError> {
    value.as_str().ok_or_else(|| BuildError::WrongType {
        index,
        field: field.to_string(),
        expected: "a string",
    })
}

/// Reads a non-negative integer that must fit the 16-bit wire fields.
fn expect_u16(index: usize, field: &str, value: &Value) -> Result<u16, BuildError> {
    let out_of_range = |value: String| BuildError::OutOfRange {
        index,
        field: field.to_string(),
        value,
    };

    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u16::try_from(v).map_err(|_| out_of_range(v.to_string()))
            } else if let Some(v) = n.as_i64() {
                Err(out_of_range(v.to_string()))
            } else {
                Err(BuildError::WrongType {
                    index,
                    field: field.to_string(),
                    expected: "an unsigned integer",
                })
            }
        }
        _ => Err(BuildError::WrongType {
            index,
            field: field.to_string(),
            expected: "an unsigned integer",
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn small_table() -> KeyUsageTable {
        KeyUsageTable::from_entries([("A", 0x04), ("B", 0x05), ("G1", 0xD0), ("G2", 0xD1)])
    }

    fn build_one(entry: Value) -> Result<Binding, BuildError> {
        let table = small_table();
        let profile = build(&json!([entry]), &table)?;
        Ok(profile.bindings()[0].clone())
    }

    // ── Structure ─────────────────────────────────────────────────────────────

    #[test]
    fn test_root_must_be_an_array() {
        let table = small_table();
        for doc in [json!({}), json!("A"), json!(null), json!(3)] {
            assert_eq!(build(&doc, &table), Err(BuildError::RootNotSequence));
        }
    }

    #[test]
    fn test_empty_document_builds_empty_profile() {
        let profile = build(&json!([]), &small_table()).expect("empty is valid");
        assert!(profile.is_empty());
    }

    #[test]
    fn test_entry_must_be_a_mapping() {
        let doc = json!([{ "key": "A", "type": "none" }, ["A"]]);
        assert_eq!(
            build(&doc, &small_table()),
            Err(BuildError::NotAMapping { index: 1 })
        );
    }

    #[test]
    fn test_missing_key_field_reports_index() {
        let doc = json!([{ "key": "A", "type": "none" }, { "type": "none" }]);
        assert_eq!(
            build(&doc, &small_table()),
            Err(BuildError::MissingField {
                index: 1,
                field: "key".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_key_is_named_in_error() {
        let doc = json!([{ "key": "Q", "type": "none" }]);
        assert_eq!(
            build(&doc, &small_table()),
            Err(BuildError::UnknownKey {
                index: 0,
                field: "key".to_string(),
                name: "Q".to_string()
            })
        );
    }

    #[test]
    fn test_non_string_key_is_wrong_type() {
        let err = build_one(json!({ "key": 4, "type": "none" })).unwrap_err();
        assert!(matches!(err, BuildError::WrongType { index: 0, ref field, .. } if field == "key"));
    }

    #[test]
    fn test_first_failure_stops_processing() {
        // Entry 1 is broken in two ways; entry 2 is also broken. Only the
        // first problem of entry 1 is reported.
        let doc = json!([
            { "key": "A", "type": "none" },
            { "key": "Nope", "type": "bogus" },
            { "type": "none" },
        ]);
        assert_eq!(
            build(&doc, &small_table()),
            Err(BuildError::UnknownKey {
                index: 1,
                field: "key".to_string(),
                name: "Nope".to_string()
            })
        );
    }

    // ── Enumerations and defaults ─────────────────────────────────────────────

    #[test]
    fn test_repeat_mode_defaults_to_fixed() {
        let binding = build_one(json!({ "key": "A", "type": "none" })).unwrap();
        assert_eq!(binding.repeat_mode, RepeatMode::Fixed);
    }

    #[test]
    fn test_repeat_mode_accepts_all_spellings() {
        for (name, mode) in [
            ("fixed", RepeatMode::Fixed),
            ("hold", RepeatMode::Hold),
            ("toggle", RepeatMode::Toggle),
        ] {
            let binding =
                build_one(json!({ "key": "A", "type": "none", "repeat_mode": name })).unwrap();
            assert_eq!(binding.repeat_mode, mode);
        }
    }

    #[test]
    fn test_repeat_mode_is_case_sensitive() {
        let err = build_one(json!({ "key": "A", "type": "none", "repeat_mode": "Hold" }))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidEnum { index: 0, field: "repeat_mode", ref value, .. } if value == "Hold"
        ));
    }

    #[test]
    fn test_unknown_type_is_invalid_enum() {
        let err = build_one(json!({ "key": "A", "type": "remap" })).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidEnum { field: "type", ref value, .. } if value == "remap"
        ));
    }

    #[test]
    fn test_missing_type_defaults_to_macro() {
        let binding = build_one(json!({ "key": "A", "macro": [] })).unwrap();
        assert_eq!(
            binding.action,
            BindAction::Macro {
                repeat_count: 1,
                items: vec![]
            }
        );
    }

    // ── None and Remap ────────────────────────────────────────────────────────

    #[test]
    fn test_none_ignores_other_fields() {
        let binding = build_one(json!({
            "key": "G1",
            "type": "none",
            "new_key": "Unknown",
            "macro": "not an array",
        }))
        .unwrap();
        assert_eq!(binding.source_usage, 0xD0);
        assert_eq!(binding.action, BindAction::None);
    }

    #[test]
    fn test_remap_resolves_new_key() {
        let binding = build_one(json!({ "key": "G1", "type": "key", "new_key": "B" })).unwrap();
        assert_eq!(binding.action, BindAction::Remap { target_usage: 0x05 });
    }

    #[test]
    fn test_remap_requires_new_key() {
        assert_eq!(
            build_one(json!({ "key": "G1", "type": "key" })),
            Err(BuildError::MissingField {
                index: 0,
                field: "new_key".to_string()
            })
        );
    }

    #[test]
    fn test_remap_rejects_unknown_new_key() {
        assert_eq!(
            build_one(json!({ "key": "G1", "type": "key", "new_key": "Z" })),
            Err(BuildError::UnknownKey {
                index: 0,
                field: "new_key".to_string(),
                name: "Z".to_string()
            })
        );
    }

    // ── Macro ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_macro_requires_macro_array() {
        assert_eq!(
            build_one(json!({ "key": "G1", "type": "macro" })),
            Err(BuildError::MissingField {
                index: 0,
                field: "macro".to_string()
            })
        );
        assert!(matches!(
            build_one(json!({ "key": "G1", "macro": { "key": "A" } })),
            Err(BuildError::WrongType { ref field, expected: "an array", .. }) if field == "macro"
        ));
    }

    #[test]
    fn test_macro_items_in_order() {
        let binding = build_one(json!({
            "key": "G2",
            "repeat_count": 3,
            "macro": [
                { "key": "A", "pressed": true },
                { "delay": 50 },
                { "key": "A", "pressed": false },
            ],
        }))
        .unwrap();
        assert_eq!(
            binding.action,
            BindAction::Macro {
                repeat_count: 3,
                items: vec![
                    MacroItem::KeyEvent {
                        usage: 0x04,
                        pressed: true
                    },
                    MacroItem::Delay { milliseconds: 50 },
                    MacroItem::KeyEvent {
                        usage: 0x04,
                        pressed: false
                    },
                ],
            }
        );
    }

    #[test]
    fn test_macro_key_item_requires_pressed() {
        assert_eq!(
            build_one(json!({ "key": "G1", "macro": [{ "key": "A" }] })),
            Err(BuildError::MissingField {
                index: 0,
                field: "macro[0].pressed".to_string()
            })
        );
    }

    #[test]
    fn test_macro_pressed_must_be_boolean() {
        let err = build_one(json!({ "key": "G1", "macro": [{ "key": "A", "pressed": 1 }] }))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::WrongType { expected: "a boolean", ref field, .. } if field == "macro[0].pressed"
        ));
    }

    #[test]
    fn test_macro_key_item_rejects_unknown_key() {
        assert_eq!(
            build_one(json!({ "key": "G1", "macro": [{ "delay": 1 }, { "key": "Nope", "pressed": true }] })),
            Err(BuildError::UnknownKey {
                index: 0,
                field: "macro[1].key".to_string(),
                name: "Nope".to_string()
            })
        );
    }

    #[test]
    fn test_macro_item_with_key_and_delay_is_a_key_event() {
        let binding = build_one(json!({
            "key": "G1",
            "macro": [{ "key": "B", "pressed": true, "delay": 10 }],
        }))
        .unwrap();
        let BindAction::Macro { items, .. } = binding.action else {
            panic!("expected macro");
        };
        assert_eq!(
            items,
            vec![MacroItem::KeyEvent {
                usage: 0x05,
                pressed: true
            }]
        );
    }

    #[test]
    fn test_malformed_macro_items_are_skipped() {
        let binding = build_one(json!({
            "key": "G1",
            "macro": [
                { "key": "A", "pressed": true },
                { "sleep": 10 },
                "garbage",
                { "delay": 5 },
            ],
        }))
        .unwrap();
        let BindAction::Macro { items, .. } = binding.action else {
            panic!("expected macro");
        };
        assert_eq!(
            items,
            vec![
                MacroItem::KeyEvent {
                    usage: 0x04,
                    pressed: true
                },
                MacroItem::Delay { milliseconds: 5 },
            ]
        );
    }

    #[test]
    fn test_repeat_count_bounds() {
        let max = build_one(json!({ "key": "G1", "repeat_count": 65535, "macro": [] })).unwrap();
        assert!(matches!(max.action, BindAction::Macro { repeat_count: 65535, .. }));

        let zero = build_one(json!({ "key": "G1", "repeat_count": 0, "macro": [] })).unwrap();
        assert!(matches!(zero.action, BindAction::Macro { repeat_count: 0, .. }));

        assert_eq!(
            build_one(json!({ "key": "G1", "repeat_count": 65536, "macro": [] })),
            Err(BuildError::OutOfRange {
                index: 0,
                field: "repeat_count".to_string(),
                value: "65536".to_string()
            })
        );
        assert_eq!(
            build_one(json!({ "key": "G1", "repeat_count": -1, "macro": [] })),
            Err(BuildError::OutOfRange {
                index: 0,
                field: "repeat_count".to_string(),
                value: "-1".to_string()
            })
        );
    }

    #[test]
    fn test_repeat_count_must_be_integer() {
        for bad in [json!(1.5), json!("2"), json!(true)] {
            let err = build_one(json!({ "key": "G1", "repeat_count": bad, "macro": [] }))
                .unwrap_err();
            assert!(matches!(err, BuildError::WrongType { expected: "an unsigned integer", .. }));
        }
    }

    #[test]
    fn test_delay_bounds() {
        assert_eq!(
            build_one(json!({ "key": "G1", "macro": [{ "delay": 70000 }] })),
            Err(BuildError::OutOfRange {
                index: 0,
                field: "macro[0].delay".to_string(),
                value: "70000".to_string()
            })
        );
        assert!(matches!(
            build_one(json!({ "key": "G1", "macro": [{ "delay": -5 }] })),
            Err(BuildError::OutOfRange { .. })
        ));
    }

    // ── Capacity ──────────────────────────────────────────────────────────────

    #[test]
    fn test_255_bindings_are_accepted() {
        let doc = Value::Array(vec![json!({ "key": "A", "type": "none" }); 255]);
        let profile = build(&doc, &small_table()).expect("255 fits in one byte");
        assert_eq!(profile.len(), 255);
    }

    #[test]
    fn test_256_bindings_are_rejected() {
        let doc = Value::Array(vec![json!({ "key": "A", "type": "none" }); 256]);
        assert_eq!(
            build(&doc, &small_table()),
            Err(BuildError::TooManyBindings {
                count: 256,
                max: 255
            })
        );
    }

    #[test]
    fn test_oversized_macro_data_is_rejected() {
        let items = vec![json!({ "delay": 1 }); 22_000];
        let doc = json!([{ "key": "G1", "macro": items }]);
        assert!(matches!(
            build(&doc, &small_table()),
            Err(BuildError::DataTooLarge { size: 66_003, .. })
        ));
    }

    #[test]
    fn test_error_messages_are_actionable() {
        let err = build_one(json!({ "key": "G1", "macro": [{ "key": "A" }] })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "binding 0: missing \"macro[0].pressed\" field"
        );
        assert_eq!(
            BuildError::RootNotSequence.to_string(),
            "root is not a sequence"
        );
    }
}
