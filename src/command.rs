//! Single-key editing commands
//!
//! [`Editor::input`] maps one key to one complete change of the parameter
//! set. Anything that needs I/O (printing, writing files, touching the
//! palette) comes back as an [`Outcome`] for the caller to carry out, so
//! the mapping itself never fails.

use crate::params::{ParameterSet, PRESETS};

/// Every key the viewer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    PrintStatus,
    PrevColorSpace,
    NextColorSpace,
    SamplePalette,
    DumpPalette,
    ExportPalette,
    PrevPreset,
    NextPreset,
    ToggleByteOrder,
    ToggleBitOrder,
    /// Offset by one byte
    ByteBack,
    ByteForward,
    /// Offset by one sample
    SampleBack,
    SampleForward,
    /// Offset by one row
    RowBack,
    RowForward,
    /// Offset by one screen (`width` rows)
    ScreenBack,
    ScreenForward,
    WidthDown,
    WidthUp,
    WidthHalve,
    WidthDouble,
    ToggleFlip,
    ToggleMirror,
    ScaleDown,
    ScaleUp,
    /// Bit width typed into the next `[pad, r, g, b]` slot
    Digit(u8),
    ExportFrame,
    SaveSession,
    LoadSession,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        let command = match key {
            'q' => Self::Quit,
            'o' => Self::PrintStatus,
            '[' => Self::PrevColorSpace,
            ']' => Self::NextColorSpace,
            's' => Self::SamplePalette,
            'p' => Self::DumpPalette,
            'P' => Self::ExportPalette,
            '{' => Self::PrevPreset,
            '}' => Self::NextPreset,
            'e' => Self::ToggleByteOrder,
            'E' => Self::ToggleBitOrder,
            'h' => Self::ByteBack,
            'l' => Self::ByteForward,
            'k' => Self::SampleBack,
            'j' => Self::SampleForward,
            'H' => Self::RowBack,
            'L' => Self::RowForward,
            'K' => Self::ScreenBack,
            'J' => Self::ScreenForward,
            ',' => Self::WidthDown,
            '.' => Self::WidthUp,
            '<' => Self::WidthHalve,
            '>' => Self::WidthDouble,
            'f' => Self::ToggleFlip,
            'm' => Self::ToggleMirror,
            '-' => Self::ScaleDown,
            '+' => Self::ScaleUp,
            'x' => Self::ExportFrame,
            'S' => Self::SaveSession,
            'O' => Self::LoadSession,
            '0'..='9' => Self::Digit(key as u8 - b'0'),
            _ => return None,
        };
        Some(command)
    }
}

/// What the caller has to do after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Parameters changed (or might have); render again
    Redraw,
    /// Key not bound to anything
    Ignored,
    Quit,
    PrintStatus,
    SamplePalette,
    DumpPalette,
    ExportPalette,
    ExportFrame,
    SaveSession,
    LoadSession,
}

impl Outcome {
    /// False only for quit
    pub fn keep_running(self) -> bool {
        self != Self::Quit
    }
}

/// Editing state that lives next to the parameter set
#[derive(Debug, Clone)]
pub struct Editor {
    /// Slot of `bits` the next digit writes
    cursor: usize,
    preset: usize,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            preset: PRESETS.len() - 1,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn preset(&self) -> usize {
        self.preset
    }

    /// Apply the command bound to `key`
    pub fn input(&mut self, key: char, params: &mut ParameterSet) -> Outcome {
        Command::from_key(key).map_or(Outcome::Ignored, |command| self.apply(command, params))
    }

    pub fn apply(&mut self, command: Command, params: &mut ParameterSet) -> Outcome {
        let sample = params.sample_bytes();
        let row = params.row_bytes();
        let screen = params.width.saturating_mul(row);

        match command {
            Command::Quit => return Outcome::Quit,
            Command::PrintStatus => return Outcome::PrintStatus,
            Command::SamplePalette => return Outcome::SamplePalette,
            Command::DumpPalette => return Outcome::DumpPalette,
            Command::ExportPalette => return Outcome::ExportPalette,
            Command::ExportFrame => return Outcome::ExportFrame,
            Command::SaveSession => return Outcome::SaveSession,
            Command::LoadSession => return Outcome::LoadSession,

            Command::PrevColorSpace => params.color_space = params.color_space.prev(),
            Command::NextColorSpace => params.color_space = params.color_space.next(),
            Command::PrevPreset => {
                self.preset = (self.preset + PRESETS.len() - 1) % PRESETS.len();
                self.load_preset(params);
            },
            Command::NextPreset => {
                self.preset = (self.preset + 1) % PRESETS.len();
                self.load_preset(params);
            },
            Command::ToggleByteOrder => params.byte_order = params.byte_order.toggled(),
            Command::ToggleBitOrder => params.bit_order = params.bit_order.toggled(),

            Command::ByteBack => params.offset = params.offset.saturating_sub(1),
            Command::ByteForward => params.offset = params.offset.saturating_add(1),
            Command::SampleBack => step_back(&mut params.offset, sample),
            Command::SampleForward => params.offset = params.offset.saturating_add(sample),
            Command::RowBack => step_back(&mut params.offset, row),
            Command::RowForward => params.offset = params.offset.saturating_add(row),
            Command::ScreenBack => step_back(&mut params.offset, screen),
            Command::ScreenForward => params.offset = params.offset.saturating_add(screen),

            Command::WidthDown => params.width = params.width.saturating_sub(1).max(1),
            Command::WidthUp => params.width = params.width.saturating_add(1),
            Command::WidthHalve => params.width = (params.width / 2).max(1),
            Command::WidthDouble => params.width = params.width.saturating_mul(2),
            Command::ToggleFlip => params.flip = !params.flip,
            Command::ToggleMirror => params.mirror = !params.mirror,
            Command::ScaleDown => params.scale = params.scale.saturating_sub(1).max(1),
            Command::ScaleUp => params.scale = params.scale.saturating_add(1),

            Command::Digit(bits) => {
                params.bits[self.cursor] = bits;
                self.cursor = (self.cursor + 1) % params.bits.len();
            },
        }
        Outcome::Redraw
    }

    fn load_preset(&mut self, params: &mut ParameterSet) {
        params.bits = PRESETS[self.preset];
        self.cursor = 0;
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// Move back by `step` only if the whole step fits
fn step_back(offset: &mut usize, step: usize) {
    if *offset >= step {
        *offset -= step;
    }
}
