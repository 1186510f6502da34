//! BIFF8 Unicode string encoding.
//!
//! BIFF8 strings have a small header followed by character data:
//! - Header: char_count (1 or 2 bytes) + flags (1 byte)
//! - Flags bit 0 (`fHighByte`): 0 = compressed Latin-1, 1 = uncompressed UTF-16LE
//!
//! Only plain strings are written; rich text runs and phonetic data are not.
//!
//! In SST records a string may span CONTINUE records. Each continuation
//! starts with a fresh flags byte, and a string header is never split.

use xlbook_core::SharedStrings;

use super::records::MAX_RECORD_DATA;

const FLAG_UNCOMPRESSED: u8 = 0x01;

/// Whether every UTF-16 unit fits in one byte
fn is_compressible(units: &[u16]) -> bool {
    units.iter().all(|&u| u <= 0x00FF)
}

fn push_chars(out: &mut Vec<u8>, units: &[u16], compressed: bool) {
    if compressed {
        out.extend(units.iter().map(|&u| u as u8));
    } else {
        for u in units {
            out.extend_from_slice(&u.to_le_bytes());
        }
    }
}

/// Append an `XLUnicodeString` (u16 length prefix)
///
/// Callers keep `s` within 65535 UTF-16 units.
pub fn write_unicode_string(out: &mut Vec<u8>, s: &str) {
    let units: Vec<u16> = s.encode_utf16().collect();
    let compressed = is_compressible(&units);
    out.extend_from_slice(&(units.len() as u16).to_le_bytes());
    out.push(if compressed { 0 } else { FLAG_UNCOMPRESSED });
    push_chars(out, &units, compressed);
}

/// Append a `ShortXLUnicodeString` (u8 length prefix), as used by
/// BOUNDSHEET and FONT
///
/// Returns `false` without writing when `s` is longer than 255 units.
pub fn write_short_string(out: &mut Vec<u8>, s: &str) -> bool {
    let units: Vec<u16> = s.encode_utf16().collect();
    if units.len() > u8::MAX as usize {
        return false;
    }
    let compressed = is_compressible(&units);
    out.push(units.len() as u8);
    out.push(if compressed { 0 } else { FLAG_UNCOMPRESSED });
    push_chars(out, &units, compressed);
    true
}

/// Encoded SST: the SST body, its CONTINUE bodies and the matching EXTSST body
#[derive(Debug)]
pub struct EncodedSst {
    /// First entry is the SST record body, the rest are CONTINUE bodies
    pub bodies: Vec<Vec<u8>>,
    /// EXTSST record body
    pub extsst: Vec<u8>,
}

/// Lays out the shared string table across SST and CONTINUE records
///
/// Built for a known stream offset so the EXTSST entries can point at
/// absolute positions.
pub struct SstBuilder {
    bodies: Vec<Vec<u8>>,
    current: Vec<u8>,
    /// Absolute offset of the current record's header
    record_start: usize,
    /// (stream position, offset within record) of each bucket's first string
    buckets: Vec<(u32, u16)>,
}

impl SstBuilder {
    /// Strings per EXTSST bucket for a table of `unique` strings
    pub fn bucket_size(unique: usize) -> usize {
        ((unique + 127) / 128).max(8)
    }

    /// Encode `strings` as if the SST record header sits at `stream_offset`
    pub fn build(strings: &SharedStrings, stream_offset: usize) -> EncodedSst {
        let mut current = Vec::with_capacity(MAX_RECORD_DATA);
        current.extend_from_slice(&strings.total_count().to_le_bytes());
        current.extend_from_slice(&(strings.len() as u32).to_le_bytes());

        let mut builder = Self {
            bodies: Vec::new(),
            current,
            record_start: stream_offset,
            buckets: Vec::new(),
        };

        let dsst = Self::bucket_size(strings.len());
        for (i, s) in strings.iter().enumerate() {
            builder.push_string(s, i % dsst == 0);
        }
        builder.finish(dsst)
    }

    fn push_string(&mut self, s: &str, starts_bucket: bool) {
        let units: Vec<u16> = s.encode_utf16().collect();
        let compressed = is_compressible(&units);
        let char_size = if compressed { 1 } else { 2 };
        let flags = if compressed { 0 } else { FLAG_UNCOMPRESSED };

        // Header plus the first character must land in the same record
        let first_chunk = 3 + if units.is_empty() { 0 } else { char_size };
        if self.current.len() + first_chunk > MAX_RECORD_DATA {
            self.flush();
        }

        if starts_bucket {
            let in_record = 4 + self.current.len();
            self.buckets
                .push(((self.record_start + in_record) as u32, in_record as u16));
        }

        self.current
            .extend_from_slice(&(units.len() as u16).to_le_bytes());
        self.current.push(flags);

        let mut rest = &units[..];
        loop {
            let space = (MAX_RECORD_DATA - self.current.len()) / char_size;
            let n = space.min(rest.len());
            push_chars(&mut self.current, &rest[..n], compressed);
            rest = &rest[n..];
            if rest.is_empty() {
                break;
            }
            self.flush();
            self.current.push(flags);
        }
    }

    fn flush(&mut self) {
        let body = std::mem::replace(&mut self.current, Vec::with_capacity(MAX_RECORD_DATA));
        self.record_start += 4 + body.len();
        self.bodies.push(body);
    }

    fn finish(mut self, dsst: usize) -> EncodedSst {
        if !self.current.is_empty() {
            self.flush();
        }

        let mut extsst = Vec::with_capacity(2 + self.buckets.len() * 8);
        extsst.extend_from_slice(&(dsst as u16).to_le_bytes());
        for (ib, cb_offset) in &self.buckets {
            extsst.extend_from_slice(&ib.to_le_bytes());
            extsst.extend_from_slice(&cb_offset.to_le_bytes());
            extsst.extend_from_slice(&0u16.to_le_bytes());
        }

        EncodedSst {
            bodies: self.bodies,
            extsst,
        }
    }
}
