// Sitepost - A content publishing API for Hugo sites
// Copyright (C) 2025 Sitepost Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Number of leading bytes inspected to decide an upload's type
pub const SNIFF_LEN: usize = 512;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect the MIME type of an upload from its first bytes
///
/// Magic numbers win; otherwise readable UTF-8 is plain text and anything
/// else is an opaque byte stream.
pub fn sniff(prefix: &[u8]) -> String {
    let prefix = &prefix[..prefix.len().min(SNIFF_LEN)];

    if let Some(kind) = infer::get(prefix) {
        return kind.mime_type().to_string();
    }

    if looks_like_text(prefix) {
        TEXT_PLAIN.to_string()
    } else {
        OCTET_STREAM.to_string()
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    let valid_utf8 = match std::str::from_utf8(data) {
        Ok(_) => true,
        // A multi-byte character cut off at the sniff boundary is still text
        Err(e) => e.error_len().is_none(),
    };

    valid_utf8
        && !data
            .iter()
            .any(|&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c)) || b == 0x7f)
}

/// Media type without parameters, lowercased: `Text/Plain; charset=x` -> `text/plain`
pub fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether `mime` matches an entry of the allow-list, ignoring parameters
pub fn is_allowed(mime: &str, allowed: &[String]) -> bool {
    let wanted = essence(mime);
    allowed.iter().any(|entry| essence(entry) == wanted)
}
