//! Internal utility functions.

use std::fmt::Write;

/// Render the first `limit` bytes of `data` as space-separated hex.
pub fn hex_preview(data: &[u8], limit: usize) -> String {
    let mut preview = String::with_capacity(limit.min(data.len()) * 3);
    for (index, byte) in data.iter().take(limit).enumerate() {
        if index > 0 {
            preview.push(' ');
        }
        let _ = write!(preview, "{byte:02x}");
    }
    preview
}
