//! Dry-run output for compiled profiles.
//!
//! [`HexDumpTransport`] stands in for a USB handle: it accepts every vendor
//! request and prints it, so the upload sequence can be inspected (or piped
//! into another tool) without a keyboard attached.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use k90_core::profile::{BindAction, MacroItem, Profile};
use k90_core::{KeyUsageTable, ProfileData, ProfileTransport, Request, TransferError};
use tracing::debug;

/// Bytes printed per hex line.
const HEX_LINE_WIDTH: usize = 16;

/// File names used by [`write_buffers`], in upload order.
pub const BUFFER_FILES: [&str; 3] = ["bindings.bin", "data.bin", "keys.bin"];

/// Prints each request instead of sending it.
///
/// Output for one request:
///
/// ```text
/// Bindings (0x10) wIndex=1 len=10
///   01 00 0a 00 01 10 00 00 00 01
/// ```
#[derive(Debug)]
pub struct HexDumpTransport<W> {
    out: W,
}

impl<W: Write> HexDumpTransport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_request(&mut self, request: Request, index: u16, payload: &[u8]) -> io::Result<()> {
        writeln!(
            self.out,
            "{request:?} (0x{:02x}) wIndex={index} len={}",
            request.code(),
            payload.len()
        )?;
        for line in payload.chunks(HEX_LINE_WIDTH) {
            writeln!(self.out, "  {}", hex_line(line))?;
        }
        self.out.flush()
    }
}

impl<W: Write> ProfileTransport for HexDumpTransport<W> {
    fn control_out(
        &mut self,
        request: Request,
        index: u16,
        payload: &[u8],
    ) -> Result<usize, TransferError> {
        self.write_request(request, index, payload)
            .map_err(|e| TransferError::Transport {
                request,
                message: e.to_string(),
            })?;
        Ok(payload.len())
    }
}

fn hex_line(bytes: &[u8]) -> String {
    let mut line = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let _ = write!(line, "{byte:02x}");
    }
    line
}

/// Writes the three buffers of `data` as raw files into `dir`.
///
/// `data.bin` is written even when empty so a directory always holds a
/// complete set.
///
/// # Errors
///
/// Returns the first I/O error hit while creating `dir` or writing a file.
pub fn write_buffers(data: &ProfileData, dir: &Path) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let buffers = [&data.bindings, &data.data, &data.keys];
    let mut written = Vec::with_capacity(buffers.len());
    for (name, bytes) in BUFFER_FILES.iter().zip(buffers) {
        let path = dir.join(name);
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), len = bytes.len(), "buffer written");
        written.push(path);
    }
    Ok(written)
}

/// Renders a human-readable summary of `profile`, one line per binding.
///
/// Usage codes are shown by name where `table` knows them.
pub fn describe(profile: &Profile, table: &KeyUsageTable) -> String {
    let mut out = format!(
        "{} binding(s), {} byte(s) of binding data\n",
        profile.len(),
        profile.data_len()
    );
    for (i, binding) in profile.bindings().iter().enumerate() {
        let source = key_name(table, binding.source_usage);
        let mode = format!("{:?}", binding.repeat_mode).to_lowercase();
        let _ = write!(out, "{i:>3}  {source:<12} {mode:<6} ");
        let _ = match &binding.action {
            BindAction::None => writeln!(out, "none"),
            BindAction::Remap { target_usage } => {
                writeln!(out, "-> {}", key_name(table, *target_usage))
            }
            BindAction::Macro {
                repeat_count,
                items,
            } => {
                let steps: Vec<String> = items
                    .iter()
                    .map(|item| match item {
                        MacroItem::KeyEvent { usage, pressed } => {
                            let sign = if *pressed { '+' } else { '-' };
                            format!("{sign}{}", key_name(table, *usage))
                        }
                        MacroItem::Delay { milliseconds } => format!("{milliseconds}ms"),
                    })
                    .collect();
                writeln!(out, "macro x{repeat_count} [{}]", steps.join(" "))
            }
        };
    }
    out
}

fn key_name(table: &KeyUsageTable, usage: u8) -> String {
    table
        .name_of(usage)
        .map(str::to_string)
        .unwrap_or_else(|| format!("0x{usage:02x}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use k90_core::{build, upload_profile, ProfileSlot};
    use serde_json::json;

    fn sample_profile() -> Profile {
        let doc = json!([
            { "key": "G1", "type": "key", "new_key": "F13" },
            { "key": "G2", "repeat_mode": "hold", "macro": [
                { "key": "LeftCtrl", "pressed": true },
                { "delay": 20 },
                { "key": "LeftCtrl", "pressed": false }
            ] },
            { "key": "G3", "type": "none" }
        ]);
        build(&doc, KeyUsageTable::standard()).expect("valid profile")
    }

    #[test]
    fn test_hex_line_formatting() {
        assert_eq!(hex_line(&[]), "");
        assert_eq!(hex_line(&[0x00, 0x0a, 0xff]), "00 0a ff");
    }

    #[test]
    fn test_hex_dump_transport_prints_request_header_and_payload() {
        // Arrange
        let mut transport = HexDumpTransport::new(Vec::new());

        // Act
        let sent = transport
            .control_out(Request::Keys, 2, &[1, 0xd0, 1])
            .expect("write to Vec cannot fail");

        // Assert
        assert_eq!(sent, 3);
        let text = String::from_utf8(transport.into_inner()).unwrap();
        assert_eq!(text, "Keys (0x16) wIndex=2 len=3\n  01 d0 01\n");
    }

    #[test]
    fn test_hex_dump_wraps_long_payloads() {
        let mut transport = HexDumpTransport::new(Vec::new());
        transport.control_out(Request::Data, 1, &[0u8; 20]).unwrap();

        let text = String::from_utf8(transport.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].split(' ').filter(|s| !s.is_empty()).count(), 16);
        assert_eq!(lines[2].split(' ').filter(|s| !s.is_empty()).count(), 4);
    }

    #[test]
    fn test_upload_through_hex_dump_lists_requests_in_order() {
        // Arrange
        let data = sample_profile().encode();
        let mut transport = HexDumpTransport::new(Vec::new());

        // Act
        upload_profile(&mut transport, ProfileSlot::try_from(3u8).unwrap(), &data).unwrap();

        // Assert
        let text = String::from_utf8(transport.into_inner()).unwrap();
        let headers: Vec<&str> = text.lines().filter(|l| !l.starts_with("  ")).collect();
        assert_eq!(
            headers,
            vec![
                "Bindings (0x10) wIndex=3 len=20",
                "Data (0x12) wIndex=3 len=13",
                "Keys (0x16) wIndex=3 len=7",
            ]
        );
    }

    #[test]
    fn test_write_buffers_creates_three_files() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("k90_dump_{}", std::process::id()));
        let data = sample_profile().encode();

        // Act
        let written = write_buffers(&data, &dir).expect("write buffers");

        // Assert
        assert_eq!(written.len(), 3);
        assert_eq!(std::fs::read(dir.join("bindings.bin")).unwrap(), data.bindings);
        assert_eq!(std::fs::read(dir.join("data.bin")).unwrap(), data.data);
        assert_eq!(std::fs::read(dir.join("keys.bin")).unwrap(), data.keys);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_describe_names_keys_and_steps() {
        let text = describe(&sample_profile(), KeyUsageTable::standard());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "3 binding(s), 13 byte(s) of binding data");
        assert!(lines[1].contains("G1") && lines[1].ends_with("-> F13"));
        assert!(lines[2].contains("hold"));
        assert!(lines[2].ends_with("macro x1 [+LeftCtrl 20ms -LeftCtrl]"));
        assert!(lines[3].ends_with("none"));
    }

    #[test]
    fn test_key_name_falls_back_to_hex() {
        let table = KeyUsageTable::from_entries([("A", 0x04)]);
        assert_eq!(key_name(&table, 0x04), "A");
        assert_eq!(key_name(&table, 0x99), "0x99");
    }
}
