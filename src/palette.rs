//! 256-entry color table for the indexed color space
//!
//! On disk a palette is 256 little-endian 32-bit words holding 0xRRGGBB.
//! Short files leave the remaining entries black.

use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub const PALETTE_LEN: usize = 256;

/// Bytes per entry in the raw file format
const ENTRY_BYTES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [u32; PALETTE_LEN],
}

impl Palette {
    /// All black
    pub fn new() -> Self {
        Self {
            entries: [0; PALETTE_LEN],
        }
    }

    /// Build from raw file contents; extra bytes past 256 entries are ignored
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut palette = Self::new();
        for (entry, chunk) in palette
            .entries
            .iter_mut()
            .zip(bytes.chunks_exact(ENTRY_BYTES))
        {
            *entry = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        palette
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::NoInput {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.len() < PALETTE_LEN * ENTRY_BYTES {
            log::warn!(
                "{}: only {} of {} palette entries, rest left black",
                path.display(),
                bytes.len() / ENTRY_BYTES,
                PALETTE_LEN
            );
        }
        Ok(Self::from_bytes(&bytes))
    }

    /// Entry for a sample value; only the low 8 bits select
    #[inline]
    pub fn get(&self, index: u64) -> u32 {
        self.entries[(index & 0xFF) as usize]
    }

    pub fn entries(&self) -> &[u32; PALETTE_LEN] {
        &self.entries
    }

    /// Replace every entry, e.g. with a 256x1 render of the data
    pub fn set_entries(&mut self, entries: &[u32]) {
        for (entry, &color) in self.entries.iter_mut().zip(entries) {
            *entry = color & 0x00FF_FFFF;
        }
    }

    /// Write the raw 1024-byte form, no header
    pub fn write_raw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut raw = Vec::with_capacity(PALETTE_LEN * ENTRY_BYTES);
        for entry in &self.entries {
            raw.extend_from_slice(&entry.to_le_bytes());
        }
        writer.write_all(&raw)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
