//! Validated in-memory profile model and the wire tags that identify it.
//!
//! A [`Profile`] is an ordered list of [`Binding`]s. The position of a binding
//! in that list is the physical key slot it configures; there is no separate
//! key id field on the wire or in the model.

use serde::Serialize;

use crate::profile::builder::BuildError;

// ── Format limits ─────────────────────────────────────────────────────────────

/// Largest number of bindings a profile can hold; the count is a single byte.
pub const MAX_BINDINGS: usize = u8::MAX as usize;

/// Largest data blob the 16-bit offset and length fields can address.
pub const MAX_DATA_LEN: usize = u16::MAX as usize;

// ── Macro item tags ───────────────────────────────────────────────────────────

/// Tag preceding a key press/release item inside a macro body.
pub const ITEM_KEY_EVENT: u8 = 0x84;

/// Tag closing a macro body; followed by the 2-byte repeat count.
pub const ITEM_END: u8 = 0x86;

/// Tag preceding a delay item inside a macro body.
pub const ITEM_DELAY: u8 = 0x87;

// ── Repeat mode ───────────────────────────────────────────────────────────────

/// How the firmware repeats a binding while its key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RepeatMode {
    /// Play the binding `repeat_count` times per press.
    #[default]
    Fixed = 1,
    /// Repeat while the key is held down.
    Hold = 2,
    /// Start on one press, stop on the next.
    Toggle = 3,
}

impl RepeatMode {
    /// Parses the document spelling (`"fixed"`, `"hold"`, `"toggle"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fixed" => Some(RepeatMode::Fixed),
            "hold" => Some(RepeatMode::Hold),
            "toggle" => Some(RepeatMode::Toggle),
            _ => None,
        }
    }

    /// Wire tag written to the `keys` buffer.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RepeatMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(RepeatMode::Fixed),
            2 => Ok(RepeatMode::Hold),
            3 => Ok(RepeatMode::Toggle),
            _ => Err(()),
        }
    }
}

// ── Bind type ─────────────────────────────────────────────────────────────────

/// Kind of action attached to a key slot, as tagged in the offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BindType {
    /// The key does nothing.
    None = 0x00,
    /// The key sends a different usage.
    Remap = 0x10,
    /// The key plays a macro.
    Macro = 0x20,
}

impl BindType {
    /// Parses the document spelling (`"none"`, `"key"`, `"macro"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(BindType::None),
            "key" => Some(BindType::Remap),
            "macro" => Some(BindType::Macro),
            _ => None,
        }
    }

    /// Wire tag written to the `bindings` buffer.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BindType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x00 => Ok(BindType::None),
            0x10 => Ok(BindType::Remap),
            0x20 => Ok(BindType::Macro),
            _ => Err(()),
        }
    }
}

// ── Macro items ───────────────────────────────────────────────────────────────

/// One step of a macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MacroItem {
    /// Simulated key press (`pressed = true`) or release.
    KeyEvent { usage: u8, pressed: bool },
    /// Pause before the next item.
    Delay { milliseconds: u16 },
}

impl MacroItem {
    /// Tag byte that precedes this item's payload.
    pub fn tag(&self) -> u8 {
        match self {
            MacroItem::KeyEvent { .. } => ITEM_KEY_EVENT,
            MacroItem::Delay { .. } => ITEM_DELAY,
        }
    }

    /// Encoded size in bytes, tag included.
    pub fn encoded_len(&self) -> usize {
        // tag + (usage, pressed) or tag + u16 delay
        3
    }
}

// ── Bindings ──────────────────────────────────────────────────────────────────

/// What a key slot does when pressed.
///
/// Each variant carries exactly the fields that exist for its bind type, so a
/// remap target or macro body can never be read for the wrong kind of binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BindAction {
    None,
    Remap {
        target_usage: u8,
    },
    Macro {
        repeat_count: u16,
        items: Vec<MacroItem>,
    },
}

impl BindAction {
    /// Offset-table tag for this action.
    pub fn bind_type(&self) -> BindType {
        match self {
            BindAction::None => BindType::None,
            BindAction::Remap { .. } => BindType::Remap,
            BindAction::Macro { .. } => BindType::Macro,
        }
    }

    /// Size of this action's body in the data blob.
    pub fn body_len(&self) -> usize {
        match self {
            BindAction::None => 0,
            BindAction::Remap { .. } => 1,
            BindAction::Macro { items, .. } => {
                // items, end tag, 2-byte repeat count
                items.iter().map(MacroItem::encoded_len).sum::<usize>() + 3
            }
        }
    }
}

/// Configuration of one physical key slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    /// Usage the physical key normally produces; identifies the slot to the firmware.
    pub source_usage: u8,
    pub repeat_mode: RepeatMode,
    #[serde(flatten)]
    pub action: BindAction,
}

impl Binding {
    pub fn bind_type(&self) -> BindType {
        self.action.bind_type()
    }
}

// ── Profile ───────────────────────────────────────────────────────────────────

/// A validated, immutable list of bindings ready for encoding.
///
/// Every `Profile` satisfies the format limits: at most [`MAX_BINDINGS`]
/// bindings and a data blob of at most [`MAX_DATA_LEN`] bytes. Encoding a
/// `Profile` therefore cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Profile {
    bindings: Vec<Binding>,
}

impl Profile {
    /// Wraps already-resolved bindings after checking the format limits.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::TooManyBindings`] or [`BuildError::DataTooLarge`]
    /// when the bindings cannot be represented on the wire.
    pub fn new(bindings: Vec<Binding>) -> Result<Self, BuildError> {
        if bindings.len() > MAX_BINDINGS {
            return Err(BuildError::TooManyBindings {
                count: bindings.len(),
                max: MAX_BINDINGS,
            });
        }
        let data_len = data_len(&bindings);
        if data_len > MAX_DATA_LEN {
            return Err(BuildError::DataTooLarge {
                size: data_len,
                max: MAX_DATA_LEN,
            });
        }
        Ok(Self { bindings })
    }

    /// Bindings in slot order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Total size of the data blob this profile encodes to.
    pub fn data_len(&self) -> usize {
        data_len(&self.bindings)
    }
}

fn data_len(bindings: &[Binding]) -> usize {
    bindings.iter().map(|b| b.action.body_len()).sum()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
