//! Files written from the viewer and the one-shot driver
//!
//! Output names come from [`ParameterSet::file_name`], so every export
//! records the settings that produced it.

use crate::display::PixelBuffer;
use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::params::ParameterSet;
use crate::png_encoder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed name for the saved session
pub const SESSION_FILE: &str = "gfxx.json";

/// Keeps palette exports apart from frames rendered with the same parameters
pub const PALETTE_PREFIX: &str = "pal-";

fn palette_path(dir: &Path, params: &ParameterSet, ext: &str) -> PathBuf {
    dir.join(format!("{}{}", PALETTE_PREFIX, params.file_name(ext)))
}

/// Create `path` and write `bytes` to it
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|source| Error::CantCreate {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(path, e))
}

/// Raw 1024-byte palette dump (`.dat`)
pub fn palette_dat(dir: &Path, params: &ParameterSet, palette: &Palette) -> Result<PathBuf> {
    let path = palette_path(dir, params, "dat");
    let mut raw = Vec::new();
    palette.write_raw(&mut raw).map_err(|e| Error::io(&path, e))?;
    write_file(&path, &raw)?;
    log::info!("wrote palette to {}", path.display());
    Ok(path)
}

/// Palette as a 16x16 PNG, entry 0 top left
pub fn palette_png(dir: &Path, params: &ParameterSet, palette: &Palette) -> Result<PathBuf> {
    let path = palette_path(dir, params, "png");
    let png = png_encoder::encode(palette.entries(), 16, 16)?;
    write_file(&path, &png)?;
    log::info!("wrote palette preview to {}", path.display());
    Ok(path)
}

/// The rendered frame as a PNG
pub fn frame_png(dir: &Path, params: &ParameterSet, buffer: &PixelBuffer) -> Result<PathBuf> {
    let path = dir.join(params.file_name("png"));
    write_png(&path, buffer)?;
    Ok(path)
}

/// Encode `buffer` to an explicit path
pub fn write_png(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    let png = png_encoder::encode_buffer(buffer)?;
    write_file(path, &png)?;
    log::info!(
        "wrote {}x{} frame to {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}

/// Session JSON in `dir`
pub fn session_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_FILE)
}
