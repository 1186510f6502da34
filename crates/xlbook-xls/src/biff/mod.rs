//! BIFF8 (Binary Interchange File Format) record writing.
//!
//! A BIFF8 stream is a sequence of records, each with a 4-byte header
//! (2 bytes record type + 2 bytes body length) followed by the body.
//!
//! CONTINUE records (type 0x003C) extend the body of the preceding record
//! beyond the 8224-byte per-record limit.

pub mod records;
pub mod strings;

/// Growable BIFF8 stream
///
/// Records are appended in order. Fields whose value is only known later
/// (sheet stream offsets) are reserved and patched in place.
#[derive(Debug, Default)]
pub struct BiffStream {
    data: Vec<u8>,
}

impl BiffStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length, i.e. the offset the next record will start at
    pub fn position(&self) -> usize {
        self.data.len()
    }

    /// Append one record
    ///
    /// Callers keep `body` within [`records::MAX_RECORD_DATA`]; longer bodies
    /// go through [`strings::SstBuilder`] which splits them.
    pub fn record(&mut self, record_type: u16, body: &[u8]) {
        debug_assert!(body.len() <= records::MAX_RECORD_DATA);
        self.data.extend_from_slice(&record_type.to_le_bytes());
        self.data
            .extend_from_slice(&(body.len() as u16).to_le_bytes());
        self.data.extend_from_slice(body);
    }

    /// Overwrite a `u32` at an absolute offset
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Append another stream's bytes
    pub fn append(&mut self, other: &BiffStream) {
        self.data.extend_from_slice(&other.data);
    }

    /// Zero-pad the stream to at least `len` bytes
    pub fn pad_to(&mut self, len: usize) {
        if self.data.len() < len {
            self.data.resize(len, 0);
        }
    }

    /// Stream contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// BOF record body (BIFF8, 16 bytes)
pub fn bof(dt: u16) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..2].copy_from_slice(&records::BIFF8_VERSION.to_le_bytes());
    out[2..4].copy_from_slice(&dt.to_le_bytes());
    out[4..6].copy_from_slice(&0x0DBBu16.to_le_bytes()); // build
    out[6..8].copy_from_slice(&0x07CCu16.to_le_bytes()); // year (1996)
    out
}

/// Cell record header shared by LABELSST, NUMBER, BOOLERR and BLANK
pub fn cell_header(row: u32, col: u16, xf: u16) -> [u8; 6] {
    let mut out = [0u8; 6];
    out[0..2].copy_from_slice(&(row as u16).to_le_bytes());
    out[2..4].copy_from_slice(&col.to_le_bytes());
    out[4..6].copy_from_slice(&xf.to_le_bytes());
    out
}
