//! Binary encoder for validated profiles.
//!
//! A profile is written as three independent buffers, each sent with its own
//! vendor request:
//!
//! ```text
//! keys:      [count:1] { [source_usage:1][repeat_mode:1] } * count
//! bindings:  [count:1][header_len:2][data_len:2]
//!            { [bind_type:1][offset:2][length:2] } * count
//! data:      concatenated binding bodies
//! ```
//!
//! `header_len` is the size of the `bindings` buffer itself (`5 + 5 * count`).
//! Body layouts inside `data`:
//!
//! ```text
//! none:   (empty)
//! remap:  [target_usage:1]
//! macro:  { [0x84][usage:1][pressed:1] | [0x87][delay_ms:2] } * n [0x86][repeat_count:2]
//! ```
//!
//! All multi-byte integers are big-endian. Encoding never fails: [`Profile`]
//! guarantees every count, offset and length fits its field.

use crate::profile::model::{BindAction, Binding, MacroItem, Profile, ITEM_END, MAX_DATA_LEN};

/// Size of the fixed part of the `bindings` buffer.
pub const BINDINGS_HEADER_LEN: usize = 5;

/// Size of one per-binding entry in the `bindings` buffer.
pub const BINDINGS_ENTRY_LEN: usize = 5;

/// The three encoded buffers of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileData {
    /// Physical key identities and repeat modes.
    pub keys: Vec<u8>,
    /// Offset table into `data`.
    pub bindings: Vec<u8>,
    /// Remap targets and macro bodies.
    pub data: Vec<u8>,
}

impl Profile {
    /// Encodes this profile into its wire buffers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use k90_core::keymap::KeyUsageTable;
    /// use k90_core::profile::build;
    /// use serde_json::json;
    ///
    /// let doc = json!([{ "key": "G1", "type": "key", "new_key": "A" }]);
    /// let data = build(&doc, KeyUsageTable::standard()).unwrap().encode();
    /// assert_eq!(data.keys, vec![1, 0xD0, 1]);
    /// assert_eq!(data.bindings, vec![1, 0, 10, 0, 1, 0x10, 0, 0, 0, 1]);
    /// assert_eq!(data.data, vec![0x04]);
    /// ```
    pub fn encode(&self) -> ProfileData {
        encode_profile(self)
    }
}

/// Encodes `profile` into its `keys`, `bindings` and `data` buffers.
pub fn encode_profile(profile: &Profile) -> ProfileData {
    let bindings = profile.bindings();
    let (data, offsets) = encode_data(bindings);
    ProfileData {
        keys: encode_keys(bindings),
        bindings: encode_offset_table(bindings, &offsets, data.len()),
        data,
    }
}

/// Writes every binding body into one buffer.
///
/// Returns the buffer and `N + 1` offsets: the start of each body followed by
/// the final buffer length, so body `i` spans `offsets[i]..offsets[i + 1]`.
pub fn encode_data(bindings: &[Binding]) -> (Vec<u8>, Vec<usize>) {
    let mut data = Vec::new();
    let mut offsets = Vec::with_capacity(bindings.len() + 1);
    for binding in bindings {
        offsets.push(data.len());
        encode_body(&mut data, &binding.action);
    }
    offsets.push(data.len());
    (data, offsets)
}

fn encode_body(buf: &mut Vec<u8>, action: &BindAction) {
    match action {
        BindAction::None => {}
        BindAction::Remap { target_usage } => buf.push(*target_usage),
        BindAction::Macro {
            repeat_count,
            items,
        } => {
            for item in items {
                buf.push(item.tag());
                match item {
                    MacroItem::KeyEvent { usage, pressed } => {
                        buf.push(*usage);
                        buf.push(if *pressed { 0x01 } else { 0x00 });
                    }
                    MacroItem::Delay { milliseconds } => {
                        buf.extend_from_slice(&milliseconds.to_be_bytes());
                    }
                }
            }
            buf.push(ITEM_END);
            buf.extend_from_slice(&repeat_count.to_be_bytes());
        }
    }
}

fn encode_keys(bindings: &[Binding]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 2 * bindings.len());
    buf.push(count_byte(bindings.len()));
    for binding in bindings {
        buf.push(binding.source_usage);
        buf.push(binding.repeat_mode.tag());
    }
    buf
}

fn encode_offset_table(bindings: &[Binding], offsets: &[usize], data_len: usize) -> Vec<u8> {
    debug_assert_eq!(offsets.len(), bindings.len() + 1);
    debug_assert_eq!(offsets.last().copied(), Some(data_len));

    let header_len = BINDINGS_HEADER_LEN + BINDINGS_ENTRY_LEN * bindings.len();
    let mut buf = Vec::with_capacity(header_len);
    buf.push(count_byte(bindings.len()));
    push_u16(&mut buf, header_len);
    push_u16(&mut buf, data_len);

    for (i, binding) in bindings.iter().enumerate() {
        let bind_type = binding.bind_type();
        buf.push(bind_type.tag());
        match binding.action {
            // A zero-length body has no address of its own.
            BindAction::None => push_u16(&mut buf, 0),
            _ => push_u16(&mut buf, offsets[i]),
        }
        push_u16(&mut buf, offsets[i + 1] - offsets[i]);
    }
    buf
}

fn count_byte(count: usize) -> u8 {
    u8::try_from(count).expect("Profile holds at most 255 bindings")
}

fn push_u16(buf: &mut Vec<u8>, value: usize) {
    assert!(
        value <= MAX_DATA_LEN,
        "wire field overflow: {value} does not fit in 16 bits"
    );
    buf.extend_from_slice(&(value as u16).to_be_bytes());
}

// ── Tests ─────────────────────────────────────────────────────────────────────
