//! Profile compiler: document validation, the binding model, and the encoder.
//!
//! The pipeline runs strictly forward:
//!
//! ```text
//! serde_json::Value ──builder──▶ Profile ──codec──▶ ProfileData { keys, bindings, data }
//! ```
//!
//! [`builder`] makes every decision (key resolution, defaults, range checks);
//! [`codec`] only lays bytes out and cannot fail.

pub mod builder;
pub mod codec;
pub mod model;

pub use builder::{build, BuildError, ProfileBuilder};
pub use codec::{encode_profile, ProfileData};
pub use model::{BindAction, BindType, Binding, MacroItem, Profile, RepeatMode};
