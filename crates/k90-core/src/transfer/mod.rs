//! Upload interface between compiled profiles and a device transport.
//!
//! The core never opens a device. It defines what a transport must be able to
//! do ([`ProfileTransport`]), which vendor requests carry which buffer
//! ([`Request`]), and the order they go out in ([`ProfileData::upload_plan`]).
//! Any USB stack (or a dry-run printer) can then drive the upload through
//! [`upload_profile`].
//!
//! Upload order is fixed:
//!
//! | Step | Request              | Payload    | Notes               |
//! |------|----------------------|------------|---------------------|
//! | 1    | [`Request::Bindings`] | `bindings` |                     |
//! | 2    | [`Request::Data`]     | `data`     | skipped when empty  |
//! | 3    | [`Request::Keys`]     | `keys`     |                     |
//!
//! Each transfer is a vendor, device-recipient OUT control request with
//! `wValue = 0` and `wIndex` set to the hardware profile slot.

use thiserror::Error;
use tracing::{debug, info};

use crate::profile::ProfileData;

/// USB vendor id of the K90.
pub const VENDOR_ID: u16 = 0x1b1c;

/// USB product id of the K90.
pub const PRODUCT_ID: u16 = 0x1b02;

/// Vendor request codes understood by the K90 firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Request {
    /// Switches between hardware and software playback mode.
    SetMode = 0x02,
    /// Reads the current mode and the status of the last transfer.
    GetMode = 0x05,
    /// Carries the `bindings` offset table.
    Bindings = 0x10,
    /// Carries the `data` blob.
    Data = 0x12,
    /// Carries the `keys` table.
    Keys = 0x16,
}

impl Request {
    /// Raw `bRequest` value.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Request {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x02 => Ok(Request::SetMode),
            0x05 => Ok(Request::GetMode),
            0x10 => Ok(Request::Bindings),
            0x12 => Ok(Request::Data),
            0x16 => Ok(Request::Keys),
            _ => Err(()),
        }
    }
}

/// One of the keyboard's on-board profile slots (1 to 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileSlot(u8);

impl ProfileSlot {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    /// Slot number as shown on the keyboard (M1..M3).
    pub fn number(self) -> u8 {
        self.0
    }

    /// `wIndex` value addressing this slot.
    pub fn index(self) -> u16 {
        u16::from(self.0)
    }
}

impl TryFrom<u8> for ProfileSlot {
    type Error = TransferError;

    fn try_from(value: u8) -> Result<Self, TransferError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(ProfileSlot(value))
        } else {
            Err(TransferError::InvalidSlot(value))
        }
    }
}

impl std::fmt::Display for ProfileSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Errors raised while handing a profile to a transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The requested profile slot does not exist.
    #[error("invalid profile slot {0} (expected 1-3)")]
    InvalidSlot(u8),

    /// The transport failed to perform the request.
    #[error("{request:?} request failed: {message}")]
    Transport { request: Request, message: String },

    /// The device accepted fewer bytes than were sent.
    #[error("incomplete {request:?} transfer: {sent} of {expected} bytes accepted")]
    Incomplete {
        request: Request,
        sent: usize,
        expected: usize,
    },
}

/// A channel able to deliver vendor control requests to the keyboard.
///
/// Implementations own device access, kernel driver handling, pacing between
/// requests and any retry policy. The payloads handed to them are static
/// bytes and may be resent unchanged.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileTransport {
    /// Sends `payload` as an OUT control request and returns how many bytes
    /// the device accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Transport`] when the request cannot be
    /// completed.
    fn control_out(
        &mut self,
        request: Request,
        index: u16,
        payload: &[u8],
    ) -> Result<usize, TransferError>;
}

impl ProfileData {
    /// Requests and payloads in the order they must be sent.
    ///
    /// The `Data` request is left out when the data blob is empty.
    pub fn upload_plan(&self) -> Vec<(Request, &[u8])> {
        let mut plan = Vec::with_capacity(3);
        plan.push((Request::Bindings, self.bindings.as_slice()));
        if !self.data.is_empty() {
            plan.push((Request::Data, self.data.as_slice()));
        }
        plan.push((Request::Keys, self.keys.as_slice()));
        plan
    }
}

/// Sends a compiled profile to `slot` through `transport`.
///
/// Stops at the first failed or short transfer.
///
/// # Errors
///
/// Propagates transport errors and reports [`TransferError::Incomplete`] when
/// the device accepts fewer bytes than a payload holds.
pub fn upload_profile<T>(
    transport: &mut T,
    slot: ProfileSlot,
    data: &ProfileData,
) -> Result<(), TransferError>
where
    T: ProfileTransport + ?Sized,
{
    for (request, payload) in data.upload_plan() {
        debug!(?request, slot = %slot, len = payload.len(), "sending profile buffer");
        let sent = transport.control_out(request, slot.index(), payload)?;
        if sent != payload.len() {
            return Err(TransferError::Incomplete {
                request,
                sent,
                expected: payload.len(),
            });
        }
    }
    info!(slot = %slot, "profile uploaded");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
