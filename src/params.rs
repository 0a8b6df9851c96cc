//! The parameter set every render reads
//!
//! One value of [`ParameterSet`] describes how to read pixels out of the
//! source bytes: bit layout, byte and bit order, color interpretation and
//! scan geometry. It is mutated in place by commands and read whole by
//! each render.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Index of each field in [`ParameterSet::bits`]
pub const PAD: usize = 0;
pub const R: usize = 1;
pub const G: usize = 2;
pub const B: usize = 3;

/// Common packed-pixel layouts as `[pad, r, g, b]`, cycled with `{` and `}`
pub const PRESETS: [[u8; 4]; 9] = [
    [0, 0, 1, 0],
    [0, 1, 1, 0],
    [1, 1, 1, 1],
    [2, 2, 2, 2],
    [0, 3, 3, 2],
    [1, 5, 5, 5],
    [0, 5, 6, 5],
    [0, 8, 8, 8],
    [8, 8, 8, 8],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    Indexed,
    Grayscale,
    Rgb,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 3] = [Self::Indexed, Self::Grayscale, Self::Rgb];

    pub fn name(self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::Grayscale => "grayscale",
            Self::Rgb => "rgb",
        }
    }

    /// Single letter used in output file names
    pub fn letter(self) -> char {
        match self {
            Self::Indexed => 'i',
            Self::Grayscale => 'g',
            Self::Rgb => 'r',
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Indexed => 0,
            Self::Grayscale => 1,
            Self::Rgb => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Only the first character matters, so `i`, `idx` and `indexed` all work
    pub fn parse(arg: &str) -> Result<Self> {
        match arg.chars().next() {
            Some('i') => Ok(Self::Indexed),
            Some('g') => Ok(Self::Grayscale),
            Some('r') => Ok(Self::Rgb),
            _ => Err(Error::Usage(format!("unknown color space '{}'", arg))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn letter(self) -> char {
        match self {
            Self::Little => 'l',
            Self::Big => 'b',
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }

    pub fn parse(arg: &str) -> Result<Self> {
        match arg.chars().next() {
            Some('l') => Ok(Self::Little),
            Some('b') => Ok(Self::Big),
            _ => Err(Error::Usage(format!("unknown endianness '{}'", arg))),
        }
    }
}

/// Everything a render depends on besides the bytes and the palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub color_space: ColorSpace,
    pub byte_order: Endian,
    pub bit_order: Endian,
    /// Bit widths as `[pad, r, g, b]`, each 0-9
    pub bits: [u8; 4],
    /// Byte offset where decoding starts
    pub offset: usize,
    /// Samples per logical row
    pub width: usize,
    pub flip: bool,
    pub mirror: bool,
    pub scale: usize,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self {
            color_space: ColorSpace::Rgb,
            byte_order: Endian::Little,
            bit_order: Endian::Little,
            bits: PRESETS[PRESETS.len() - 1],
            offset: 0,
            width: 16,
            flip: false,
            mirror: false,
            scale: 1,
        }
    }

    /// Combined width of the three color fields
    #[inline]
    pub fn color_bits(&self) -> u32 {
        self.bits[R] as u32 + self.bits[G] as u32 + self.bits[B] as u32
    }

    /// Width of one whole sample, pad included
    #[inline]
    pub fn total_bits(&self) -> u32 {
        self.bits[PAD] as u32 + self.color_bits()
    }

    /// Bytes spanned by one sample, rounded up
    #[inline]
    pub fn sample_bytes(&self) -> usize {
        (self.total_bits() as usize + 7) / 8
    }

    /// Bytes spanned by one logical row
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width.saturating_mul(self.sample_bytes())
    }

    /// Reject states no render can work with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::Usage("width must be at least 1".into()));
        }
        if self.scale == 0 {
            return Err(Error::Usage("scale must be at least 1".into()));
        }
        if let Some(bits) = self.bits.iter().find(|&&b| b > 9) {
            return Err(Error::Usage(format!("bit width {} out of range 0-9", bits)));
        }
        if self.total_bits() == 0 {
            return Err(Error::Usage("sample must be at least one bit wide".into()));
        }
        Ok(())
    }

    /// Parse a `PRGB` digit string such as `0565`; extra characters are ignored
    pub fn parse_bits(arg: &str) -> Result<[u8; 4]> {
        let digits = arg.as_bytes();
        if digits.len() < 4 {
            return Err(Error::Usage(format!(
                "bit layout '{}' needs four digits (pad, red, green, blue)",
                arg
            )));
        }
        let mut bits = [0; 4];
        for (slot, &ch) in bits.iter_mut().zip(digits) {
            if !ch.is_ascii_digit() {
                return Err(Error::Usage(format!("bit layout '{}' is not numeric", arg)));
            }
            *slot = ch - b'0';
        }
        Ok(bits)
    }

    /// Command line that reproduces this parameter set
    pub fn status(&self) -> String {
        self.to_string()
    }

    /// File name encoding every parameter, e.g. `rll8888-00000000-xx16-1.png`
    pub fn file_name(&self, ext: &str) -> String {
        format!(
            "{}{}{}{}-{:08x}-{}{}{:02}-{}.{}",
            self.color_space.letter(),
            self.byte_order.letter(),
            self.bit_order.letter(),
            self.bits_string(),
            self.offset,
            if self.flip { 'f' } else { 'x' },
            if self.mirror { 'm' } else { 'x' },
            self.width,
            self.scale,
            ext
        )
    }

    fn bits_string(&self) -> String {
        self.bits.iter().map(|&b| char::from(b'0'.wrapping_add(b))).collect()
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::Session(e.to_string()))?;
        fs::write(path, json).map_err(|e| Error::io(path, e))
    }

    /// Load from a JSON file; the loaded set must pass [`Self::validate`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::NoInput {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&json).map_err(|e| Error::Session(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches printf's "%#zx": zero gets no prefix
        let offset = if self.offset == 0 {
            "0".to_string()
        } else {
            format!("{:#x}", self.offset)
        };
        write!(
            f,
            "gfxx -c {} -e{} -E{} -b {} -n {} {}{}-w {} -z {}",
            self.color_space.name(),
            self.byte_order.letter(),
            self.bit_order.letter(),
            self.bits_string(),
            offset,
            if self.flip { "-f " } else { "" },
            if self.mirror { "-m " } else { "" },
            self.width,
            self.scale
        )
    }
}

/// Parse an unsigned number the way `strtoul(s, NULL, 0)` does:
/// `0x` prefix for hex, a leading `0` for octal, decimal otherwise
pub fn parse_number(arg: &str) -> Result<usize> {
    let s = arg.trim();
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    usize::from_str_radix(digits, radix)
        .map_err(|_| Error::Usage(format!("'{}' is not a number", arg)))
}
