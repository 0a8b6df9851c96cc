//! Sample decoding
//!
//! [`Samples`] walks the source bytes and yields one packed integer per
//! sample; [`ColorDecoder`] turns such an integer into a 0xRRGGBB color.
//!
//! Samples of 8 bits or more are assembled from `ceil(bits / 8)` whole
//! bytes. Narrower samples are packed several to a byte and extracted
//! from the high end (big byte order) or the low end (little) of it.

use crate::palette::Palette;
use crate::params::{ColorSpace, Endian, ParameterSet, B, G, R};

/// Pack 8-bit channels into 0xRRGGBB
#[inline]
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[inline]
pub fn gray(n: u8) -> u32 {
    rgb(n, n, n)
}

/// Low `bits` bits set
#[inline]
pub fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Rescale an `bits`-wide channel value to 0-255
///
/// 8-bit values pass through, 0-bit channels are black, everything else is
/// `value * 255 / (2^bits - 1)` truncated.
#[inline]
pub fn interp(bits: u32, value: u64) -> u8 {
    match bits {
        8 => value as u8,
        0 => 0,
        _ => (value * 255 / mask(bits)) as u8,
    }
}

/// Iterator over packed sample values starting at the configured offset
///
/// Stops at the first sample that would need bytes past the end of the
/// data. A layout with zero total bits yields nothing.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    data: &'a [u8],
    index: usize,
    /// Bit position inside `data[index]` for sub-byte layouts
    bit: u32,
    bits: u32,
    byte_order: Endian,
}

impl<'a> Samples<'a> {
    pub fn new(data: &'a [u8], params: &ParameterSet) -> Self {
        Self {
            data,
            index: params.offset,
            bit: 0,
            bits: params.total_bits(),
            byte_order: params.byte_order,
        }
    }

    fn next_bytes(&mut self) -> Option<u64> {
        let count = (self.bits as usize + 7) / 8;
        let end = self.index.checked_add(count)?;
        let bytes = self.data.get(self.index..end)?;
        self.index = end;

        let value = match self.byte_order {
            Endian::Big => bytes.iter().fold(0u64, |n, &b| n << 8 | b as u64),
            Endian::Little => bytes.iter().rev().fold(0u64, |n, &b| n << 8 | b as u64),
        };
        Some(value)
    }

    fn next_bits(&mut self) -> Option<u64> {
        let byte = *self.data.get(self.index)? as u32;
        let value = match self.byte_order {
            Endian::Big => {
                // Fields that overhang the low end keep their bits at the top
                let shift = 8 - self.bits as i32 - self.bit as i32;
                if shift >= 0 {
                    byte >> shift
                } else {
                    byte << -shift
                }
            },
            Endian::Little => byte >> self.bit,
        };

        self.bit += self.bits;
        if self.bit >= 8 {
            self.bit = 0;
            self.index += 1;
        }
        Some(value as u64 & mask(self.bits))
    }
}

impl Iterator for Samples<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        match self.bits {
            0 => None,
            1..=7 => self.next_bits(),
            _ => self.next_bytes(),
        }
    }
}

/// Converts sample values to colors under one parameter set
#[derive(Debug, Clone, Copy)]
pub struct ColorDecoder<'a> {
    space: ColorSpace,
    bit_order: Endian,
    bits: [u8; 4],
    palette: &'a Palette,
}

impl<'a> ColorDecoder<'a> {
    pub fn new(params: &ParameterSet, palette: &'a Palette) -> Self {
        Self {
            space: params.color_space,
            bit_order: params.bit_order,
            bits: params.bits,
            palette,
        }
    }

    fn color_bits(&self) -> u32 {
        self.bits[R] as u32 + self.bits[G] as u32 + self.bits[B] as u32
    }

    pub fn color(&self, sample: u64) -> u32 {
        match self.space {
            ColorSpace::Indexed => self.palette.get(sample),
            ColorSpace::Grayscale => {
                let bits = self.color_bits();
                gray(interp(bits, sample & mask(bits)))
            },
            ColorSpace::Rgb => self.split(sample),
        }
    }

    /// Split into channels; pad bits sit above all three and fall away
    fn split(&self, sample: u64) -> u32 {
        let [_, r_bits, g_bits, b_bits] = self.bits.map(u32::from);
        let (r, g, b);
        let mut n = sample;
        match self.bit_order {
            Endian::Little => {
                b = n & mask(b_bits);
                n >>= b_bits;
                g = n & mask(g_bits);
                n >>= g_bits;
                r = n & mask(r_bits);
            },
            Endian::Big => {
                r = n & mask(r_bits);
                n >>= r_bits;
                g = n & mask(g_bits);
                n >>= g_bits;
                b = n & mask(b_bits);
            },
        }
        rgb(interp(r_bits, r), interp(g_bits, g), interp(b_bits, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(bits: [u8; 4], byte_order: Endian) -> ParameterSet {
        ParameterSet {
            bits,
            byte_order,
            ..ParameterSet::new()
        }
    }

    #[test]
    fn test_interp_known_values() {
        assert_eq!(interp(1, 1), 255);
        assert_eq!(interp(5, 16), 131);
        assert_eq!(interp(6, 32), 129);
        assert_eq!(interp(8, 0xAB), 0xAB);
        assert_eq!(interp(0, 12345), 0);
        assert_eq!(interp(9, 511), 255);
        assert_eq!(interp(9, 256), 127);
    }

    #[test]
    fn test_bytes_little_and_big() {
        let data = [0x12, 0x34, 0x56, 0x78];
        let le: Vec<u64> = Samples::new(&data, &params([0, 8, 8, 0], Endian::Little)).collect();
        assert_eq!(le, vec![0x3412, 0x7856]);
        let be: Vec<u64> = Samples::new(&data, &params([0, 8, 8, 0], Endian::Big)).collect();
        assert_eq!(be, vec![0x1234, 0x5678]);
    }

    #[test]
    fn test_trailing_partial_sample_is_dropped() {
        let data = [1, 2, 3, 4, 5];
        let samples: Vec<u64> = Samples::new(&data, &params([0, 8, 8, 8], Endian::Big)).collect();
        assert_eq!(samples, vec![0x010203]);
    }

    #[test]
    fn test_offset_past_end_yields_nothing() {
        let data = [1, 2, 3];
        let mut p = params([0, 0, 8, 0], Endian::Little);
        p.offset = 10;
        assert_eq!(Samples::new(&data, &p).count(), 0);
        p.offset = usize::MAX;
        p.bits = [8, 8, 8, 8];
        assert_eq!(Samples::new(&data, &p).count(), 0);
    }

    #[test]
    fn test_sub_byte_order() {
        let data = [0b1011_0001];
        let be: Vec<u64> = Samples::new(&data, &params([0, 1, 1, 0], Endian::Big)).collect();
        assert_eq!(be, vec![0b10, 0b11, 0b00, 0b01]);
        let le: Vec<u64> = Samples::new(&data, &params([0, 1, 1, 0], Endian::Little)).collect();
        assert_eq!(le, vec![0b01, 0b00, 0b11, 0b10]);
    }

    #[test]
    fn test_sub_byte_uneven_width() {
        // Three 3-bit fields per byte; the last one overhangs
        let data = [0b101_010_11, 0];
        let be: Vec<u64> = Samples::new(&data, &params([0, 1, 1, 1], Endian::Big)).collect();
        assert_eq!(&be[..3], &[0b101, 0b010, 0b110]);
        let le: Vec<u64> = Samples::new(&data, &params([0, 1, 1, 1], Endian::Little)).collect();
        assert_eq!(&le[..3], &[0b011, 0b101, 0b010]);
        assert_eq!(be.len(), 6);
    }

    #[test]
    fn test_zero_bits_is_empty() {
        let data = [0xFF; 8];
        assert_eq!(Samples::new(&data, &params([0, 0, 0, 0], Endian::Big)).count(), 0);
    }

    #[test]
    fn test_rgb565_split() {
        let palette = Palette::new();
        let p = params([0, 5, 6, 5], Endian::Little);
        let decoder = ColorDecoder::new(&p, &palette);
        assert_eq!(decoder.color(0xF800), 0xFF0000);
        assert_eq!(decoder.color(0x07E0), 0x00FF00);
        assert_eq!(decoder.color(0x001F), 0x0000FF);
        assert_eq!(decoder.color(0xFFFF), 0xFFFFFF);
    }

    #[test]
    fn test_big_bit_order_puts_red_low() {
        let palette = Palette::new();
        let mut p = params([0, 5, 6, 5], Endian::Little);
        p.bit_order = Endian::Big;
        let decoder = ColorDecoder::new(&p, &palette);
        assert_eq!(decoder.color(0x001F), 0xFF0000);
        assert_eq!(decoder.color(0xF800), 0x0000FF);
    }

    #[test]
    fn test_pad_bits_are_ignored() {
        let palette = Palette::new();
        let p = params([8, 8, 8, 8], Endian::Little);
        let decoder = ColorDecoder::new(&p, &palette);
        assert_eq!(decoder.color(0xAA11_2233), 0x112233);
    }

    #[test]
    fn test_grayscale_uses_all_color_bits() {
        let palette = Palette::new();
        let mut p = params([0, 0, 0, 8], Endian::Little);
        p.color_space = ColorSpace::Grayscale;
        let decoder = ColorDecoder::new(&p, &palette);
        assert_eq!(decoder.color(0xFF), 0xFFFFFF);
        assert_eq!(decoder.color(0x80), 0x808080);

        p.bits = [1, 1, 1, 1];
        let decoder = ColorDecoder::new(&p, &palette);
        assert_eq!(decoder.color(0b1111), 0xFFFFFF);
        assert_eq!(decoder.color(0b0111), 0xFFFFFF);
        assert_eq!(decoder.color(0b1000), 0);
    }

    #[test]
    fn test_indexed_lookup() {
        let mut palette = Palette::new();
        let entries: Vec<u32> = (0..256).map(|k| gray(k as u8)).collect();
        palette.set_entries(&entries);
        let mut p = params([0, 0, 8, 0], Endian::Little);
        p.color_space = ColorSpace::Indexed;
        let decoder = ColorDecoder::new(&p, &palette);
        for k in 0..256u64 {
            assert_eq!(decoder.color(k), gray(k as u8));
        }
    }

    proptest! {
        #[test]
        fn interp_endpoints(bits in 1u32..=9) {
            prop_assert_eq!(interp(bits, mask(bits)), 255);
            prop_assert_eq!(interp(bits, 0), 0);
        }

        #[test]
        fn byte_order_is_symmetric(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), pad in 0u8..=3) {
            let big = params([pad, 7, 7, 7], Endian::Big);
            let little = params([pad, 7, 7, 7], Endian::Little);
            let forward = Samples::new(&[a, b, c], &big).next();
            let reverse = Samples::new(&[c, b, a], &little).next();
            prop_assert_eq!(forward, reverse);
        }
    }
}
