//! Live editing state shared by the window and the remote control
//!
//! Owns the parameter set, the palette and the editor cursor, and carries
//! out the side effects commands ask for. Each key is applied to
//! completion before the next render reads the parameters.

use crate::command::{Editor, Outcome};
use crate::display::PixelBuffer;
use crate::error::Result;
use crate::export;
use crate::palette::Palette;
use crate::params::ParameterSet;
use crate::render;
use std::path::PathBuf;
use std::time::Instant;

pub struct Session<'a> {
    data: &'a [u8],
    params: ParameterSet,
    palette: Palette,
    editor: Editor,
    out_dir: PathBuf,
    dirty: bool,
}

impl<'a> Session<'a> {
    pub fn new(data: &'a [u8], params: ParameterSet, palette: Palette, out_dir: PathBuf) -> Self {
        Self {
            data,
            params,
            palette,
            editor: Editor::new(),
            out_dir,
            dirty: true,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    #[cfg(test)]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// True when the last render no longer matches the parameters
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Repaint `buffer` from the current parameters
    pub fn render(&mut self, buffer: &mut PixelBuffer) -> usize {
        let start = Instant::now();
        let placed = render::render(self.data, &self.params, &self.palette, buffer);
        self.dirty = false;
        log::debug!(
            "rendered {} samples in {:.2}ms: {}",
            placed,
            start.elapsed().as_secs_f64() * 1000.0,
            self.params
        );
        placed
    }

    /// Apply one key; false once the user asked to quit
    ///
    /// `buffer` is the frame on screen, used by frame export.
    pub fn handle_key(&mut self, key: char, buffer: &mut PixelBuffer) -> Result<bool> {
        let outcome = self.editor.input(key, &mut self.params);
        log::trace!(
            "key {:?} -> {:?} (digit slot {}, preset {})",
            key,
            outcome,
            self.editor.cursor(),
            self.editor.preset()
        );

        match outcome {
            Outcome::Quit | Outcome::Ignored => {},
            Outcome::Redraw => self.dirty = true,
            Outcome::PrintStatus => println!("{}", self.params),
            Outcome::SamplePalette => {
                render::sample_palette(self.data, &self.params, &mut self.palette);
                self.dirty = true;
            },
            Outcome::DumpPalette => {
                export::palette_dat(&self.out_dir, &self.params, &self.palette)?;
            },
            Outcome::ExportPalette => {
                export::palette_png(&self.out_dir, &self.params, &self.palette)?;
            },
            Outcome::ExportFrame => {
                if self.dirty {
                    self.render(buffer);
                }
                export::frame_png(&self.out_dir, &self.params, buffer)?;
            },
            Outcome::SaveSession => {
                let path = export::session_path(&self.out_dir);
                match self.params.save(&path) {
                    Ok(()) => log::info!("session saved to {}", path.display()),
                    Err(e) => log::warn!("failed to save session: {}", e),
                }
            },
            Outcome::LoadSession => {
                let path = export::session_path(&self.out_dir);
                match ParameterSet::load(&path) {
                    Ok(params) => {
                        self.params = params;
                        self.dirty = true;
                        log::info!("session loaded from {}", path.display());
                    },
                    Err(e) => log::warn!("failed to load session: {}", e),
                }
            },
        }
        Ok(outcome.keep_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ColorSpace;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gfxx-session-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_keys_mark_dirty_until_render() {
        let data = [0u8; 64];
        let mut buffer = PixelBuffer::with_size(8, 8);
        let mut session = Session::new(&data, ParameterSet::new(), Palette::new(), ".".into());
        session.render(&mut buffer);
        assert!(!session.is_dirty());

        assert!(session.handle_key('#', &mut buffer).unwrap());
        assert!(!session.is_dirty());
        assert!(session.handle_key('>', &mut buffer).unwrap());
        assert!(session.is_dirty());
        assert_eq!(session.params().width, 32);
        assert!(!session.handle_key('q', &mut buffer).unwrap());
    }

    #[test]
    fn test_sample_palette_key() {
        let data: Vec<u8> = (0..=255).collect();
        let params = ParameterSet {
            color_space: ColorSpace::Grayscale,
            bits: [0, 0, 0, 8],
            ..ParameterSet::new()
        };
        let mut buffer = PixelBuffer::with_size(4, 4);
        let mut session = Session::new(&data, params, Palette::new(), ".".into());
        session.handle_key('s', &mut buffer).unwrap();
        assert_eq!(session.palette().get(200), 0xC8C8C8);
    }

    #[test]
    fn test_frame_export_renders_pending_changes() {
        let dir = scratch_dir("frame");
        let data = [0xFFu8; 16];
        let params = ParameterSet {
            color_space: ColorSpace::Grayscale,
            bits: [0, 0, 0, 8],
            width: 4,
            ..ParameterSet::new()
        };
        let mut buffer = PixelBuffer::with_size(4, 4);
        let mut session = Session::new(&data, params, Palette::new(), dir.clone());
        session.handle_key('x', &mut buffer).unwrap();
        assert!(buffer.pixels().iter().all(|&p| p == 0xFFFFFF));
        assert!(dir.join("gll0008-00000000-xx04-1.png").exists());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_palette_then_frame_export_keeps_both() {
        let dir = scratch_dir("both");
        let data = [0x40u8; 16];
        let params = ParameterSet {
            color_space: ColorSpace::Grayscale,
            bits: [0, 0, 0, 8],
            width: 4,
            ..ParameterSet::new()
        };
        let mut buffer = PixelBuffer::with_size(4, 4);
        let mut session = Session::new(&data, params, Palette::new(), dir.clone());
        for key in "Px".chars() {
            assert!(session.handle_key(key, &mut buffer).unwrap());
        }
        let palette = fs::read(dir.join("pal-gll0008-00000000-xx04-1.png")).unwrap();
        assert_eq!(&palette[16..24], &[0, 0, 0, 16, 0, 0, 0, 16]);
        let frame = fs::read(dir.join("gll0008-00000000-xx04-1.png")).unwrap();
        assert_eq!(&frame[16..24], &[0, 0, 0, 4, 0, 0, 0, 4]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_session_save_and_load() {
        let dir = scratch_dir("json");
        let data = [0u8; 4];
        let mut buffer = PixelBuffer::with_size(2, 2);
        let mut session = Session::new(&data, ParameterSet::new(), Palette::new(), dir.clone());

        for key in "fm++0565S".chars() {
            session.handle_key(key, &mut buffer).unwrap();
        }
        let saved = session.params().clone();
        for key in "fm--}}".chars() {
            session.handle_key(key, &mut buffer).unwrap();
        }
        assert_ne!(session.params(), &saved);
        session.handle_key('O', &mut buffer).unwrap();
        assert_eq!(session.params(), &saved);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_session_is_not_fatal() {
        let dir = scratch_dir("missing");
        let data = [0u8; 4];
        let mut buffer = PixelBuffer::with_size(2, 2);
        let mut session = Session::new(&data, ParameterSet::new(), Palette::new(), dir.clone());
        assert!(session.handle_key('O', &mut buffer).unwrap());
        assert_eq!(session.params(), &ParameterSet::new());
        fs::remove_dir_all(dir).unwrap();
    }
}
