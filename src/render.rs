//! Renderer: source bytes + parameters -> pixels
//!
//! Pure with respect to its inputs. The target buffer is zeroed and
//! repainted on every call, so it is safe to call again after any
//! parameter change.

use crate::decode::{ColorDecoder, Samples};
use crate::display::PixelBuffer;
use crate::palette::{Palette, PALETTE_LEN};
use crate::params::ParameterSet;
use crate::scan::Scan;

/// Paint `data` into `buffer` under `params`
///
/// Stops at whichever runs out first: source bytes or buffer space.
/// Returns the number of samples placed.
pub fn render(
    data: &[u8],
    params: &ParameterSet,
    palette: &Palette,
    buffer: &mut PixelBuffer,
) -> usize {
    buffer.clear(0);

    let scale = params.scale.max(1);
    let decoder = ColorDecoder::new(params, palette);
    let scan = Scan::new(params, buffer.width() as usize, buffer.height() as usize);

    let mut placed = 0;
    for (sample, (x, y)) in Samples::new(data, params).zip(scan) {
        let color = decoder.color(sample);
        // Overhanging columns can sit near usize::MAX; fill_rect clips them
        buffer.fill_rect(x.saturating_mul(scale), y.saturating_mul(scale), scale, scale, color);
        placed += 1;
    }
    placed
}

/// Replace the palette with the first 256 samples at the current offset
///
/// Lookups during the render still see the old palette. In indexed mode
/// this differs from drawing straight into the table, where entries are
/// cleared first and later samples read the ones already rewritten.
pub fn sample_palette(data: &[u8], params: &ParameterSet, palette: &mut Palette) {
    let params = ParameterSet {
        scale: 1,
        ..params.clone()
    };
    let mut strip = PixelBuffer::with_size(PALETTE_LEN as u32, 1);
    let placed = render(data, &params, palette, &mut strip);
    log::debug!("sampled {} palette entries at {:#x}", placed, params.offset);
    palette.set_entries(strip.pixels());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::gray;
    use crate::params::{ColorSpace, Endian};

    const WHITE: u32 = 0xFFFFFF;

    fn gray8() -> ParameterSet {
        ParameterSet {
            color_space: ColorSpace::Grayscale,
            bits: [0, 0, 0, 8],
            ..ParameterSet::new()
        }
    }

    #[test]
    fn test_two_gray_pixels() {
        let params = ParameterSet { width: 2, ..gray8() };
        let mut buffer = PixelBuffer::with_size(2, 1);
        let placed = render(&[0xFF, 0x00], &params, &Palette::new(), &mut buffer);
        assert_eq!(placed, 2);
        assert_eq!(buffer.pixels(), &[WHITE, 0]);
    }

    #[test]
    fn test_short_input_leaves_black() {
        let params = ParameterSet { width: 4, ..gray8() };
        let mut buffer = PixelBuffer::with_size(4, 2);
        buffer.clear(0x123456);
        render(&[0x10, 0x20, 0x30], &params, &Palette::new(), &mut buffer);
        assert_eq!(
            buffer.pixels(),
            &[gray(0x10), gray(0x20), gray(0x30), 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_excess_input_is_not_placed() {
        let params = ParameterSet { width: 2, ..gray8() };
        let mut buffer = PixelBuffer::with_size(2, 2);
        let placed = render(&[0xFF; 100], &params, &Palette::new(), &mut buffer);
        assert_eq!(placed, 4);
        assert!(buffer.pixels().iter().all(|&p| p == WHITE));
    }

    #[test]
    fn test_scale_paints_blocks_and_clips() {
        let params = ParameterSet {
            width: 2,
            scale: 2,
            ..gray8()
        };
        let mut buffer = PixelBuffer::with_size(5, 3);
        render(&[0xFF, 0x80, 0x40, 0x20], &params, &Palette::new(), &mut buffer);
        // Logical raster is 2x1; the last buffer row and column stay black
        assert_eq!(buffer.get_pixel(0, 0), Some(WHITE));
        assert_eq!(buffer.get_pixel(1, 1), Some(WHITE));
        assert_eq!(buffer.get_pixel(2, 0), Some(gray(0x80)));
        assert_eq!(buffer.get_pixel(3, 1), Some(gray(0x80)));
        assert_eq!(buffer.get_pixel(4, 0), Some(0));
        assert_eq!(buffer.get_pixel(0, 2), Some(0));
    }

    #[test]
    fn test_offset_skips_bytes() {
        let params = ParameterSet {
            width: 1,
            offset: 2,
            ..gray8()
        };
        let mut buffer = PixelBuffer::with_size(1, 2);
        render(&[0xFF, 0xFF, 0x11, 0x22], &params, &Palette::new(), &mut buffer);
        assert_eq!(buffer.pixels(), &[gray(0x11), gray(0x22)]);
    }

    #[test]
    fn test_huge_mirrored_width_renders_off_screen() {
        let params = ParameterSet {
            width: usize::MAX,
            mirror: true,
            scale: 2,
            ..gray8()
        };
        let mut buffer = PixelBuffer::with_size(8, 8);
        let placed = render(&[0xFF; 64], &params, &Palette::new(), &mut buffer);
        assert_eq!(placed, 64);
        assert!(buffer.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_width_doubled_to_saturation_still_renders() {
        let mut params = ParameterSet { width: 4, ..gray8() };
        let mut editor = crate::command::Editor::new();
        for key in ">".repeat(70).chars().chain("m+".chars()) {
            editor.input(key, &mut params);
        }
        assert_eq!(params.width, usize::MAX);
        assert_eq!(params.scale, 2);
        let mut buffer = PixelBuffer::with_size(16, 16);
        render(&[0x80; 64], &params, &Palette::new(), &mut buffer);
    }

    #[test]
    fn test_rerender_is_deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        let mut params = ParameterSet {
            width: 8,
            bits: [0, 3, 3, 2],
            ..ParameterSet::new()
        };
        let mut first = PixelBuffer::with_size(16, 16);
        let mut second = PixelBuffer::with_size(16, 16);
        render(&data, &params, &Palette::new(), &mut first);
        params.mirror = true;
        render(&data, &params, &Palette::new(), &mut second);
        params.mirror = false;
        render(&data, &params, &Palette::new(), &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_palette_reads_data() {
        let data: Vec<u8> = (0..=255).rev().collect();
        let params = ParameterSet {
            bits: [0, 0, 0, 8],
            color_space: ColorSpace::Grayscale,
            byte_order: Endian::Big,
            width: 16,
            scale: 4,
            ..ParameterSet::new()
        };
        let mut palette = Palette::new();
        sample_palette(&data, &params, &mut palette);
        assert_eq!(palette.get(0), gray(255));
        assert_eq!(palette.get(255), gray(0));
    }
}
