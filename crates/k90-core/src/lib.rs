//! # k90-core
//!
//! Profile compiler for Corsair K90 macro keyboards.
//!
//! A profile is written by hand as JSON: which G-key does what, as a remap to
//! another key, a macro of presses, releases and delays, or nothing. The
//! firmware does not read JSON; it takes three packed binary buffers. This
//! crate turns one into the other and defines how those buffers are handed to
//! a device transport. It performs no I/O of its own.
//!
//! - **`keymap`**: key names (`"A"`, `"F1"`, `"LeftCtrl"`, `"G1"`) to HID usage
//!   codes.
//! - **`profile`**: validation of the JSON document into a [`Profile`] and
//!   encoding of that profile into [`ProfileData`].
//! - **`transfer`**: vendor request codes, profile slots, upload order and the
//!   [`ProfileTransport`] trait implemented by whatever talks to the device.
//!
//! ```rust
//! use k90_core::{compile_profile, KeyUsageTable};
//! use serde_json::json;
//!
//! let doc = json!([
//!     { "key": "G1", "type": "key", "new_key": "F13" },
//!     { "key": "G2", "macro": [{ "key": "A", "pressed": true }, { "delay": 50 }] },
//! ]);
//! let data = compile_profile(&doc, KeyUsageTable::standard()).unwrap();
//! assert_eq!(data.keys[0], 2);
//! ```

pub mod keymap;
pub mod profile;
pub mod transfer;

pub use keymap::KeyUsageTable;
pub use profile::{build, BuildError, Profile, ProfileData};
pub use transfer::{upload_profile, ProfileSlot, ProfileTransport, Request, TransferError};

/// Validates `document` and encodes it in one step.
///
/// # Errors
///
/// Returns the [`BuildError`] that rejected the document; nothing is encoded
/// in that case.
pub fn compile_profile(
    document: &serde_json::Value,
    table: &KeyUsageTable,
) -> Result<ProfileData, BuildError> {
    Ok(build(document, table)?.encode())
}
