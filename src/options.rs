//! Command line
//!
//! The short flags mirror the status line printed by `o`, so a status
//! line pasted back into a shell reopens the same view.

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::params::{parse_number, ColorSpace, Endian, ParameterSet};
use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

/// Socket used by `--control` without a path
pub const DEFAULT_CONTROL_SOCKET: &str = "/tmp/gfxx.sock";

/// Everything the driver needs to start
#[derive(Debug, Clone)]
pub struct Options {
    pub params: ParameterSet,
    pub palette: Option<PathBuf>,
    /// Input file; standard input when absent
    pub input: Option<PathBuf>,
    /// Render once to this PNG instead of opening a window
    pub output: Option<PathBuf>,
    pub size: (u32, u32),
    pub out_dir: PathBuf,
    pub vsync: bool,
    pub control: Option<PathBuf>,
    pub log_level: Option<log::LevelFilter>,
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("gfxx")
        .about("Explore arbitrary binary data as raw pixels")
        .arg(Arg::new("color")
            .short('c')
            .value_name("SPACE")
            .help("Color space: indexed, grayscale or rgb"))
        .arg(Arg::new("palette")
            .short('p')
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Palette of 256 little-endian 0xRRGGBB words"))
        .arg(Arg::new("bits")
            .short('b')
            .value_name("PRGB")
            .help("Bit widths of pad, red, green and blue, e.g. 0565"))
        .arg(Arg::new("byte-order")
            .short('e')
            .value_name("l|b")
            .help("Byte order"))
        .arg(Arg::new("bit-order")
            .short('E')
            .value_name("l|b")
            .help("Bit order of the color fields"))
        .arg(Arg::new("offset")
            .short('n')
            .value_name("OFFSET")
            .help("Byte offset to start at (0x.. hex, 0.. octal)"))
        .arg(Arg::new("flip")
            .short('f')
            .action(ArgAction::Count)
            .help("Toggle bottom-to-top rows"))
        .arg(Arg::new("mirror")
            .short('m')
            .action(ArgAction::Count)
            .help("Toggle right-to-left rows"))
        .arg(Arg::new("width")
            .short('w')
            .value_name("SAMPLES")
            .help("Samples per row"))
        .arg(Arg::new("scale")
            .short('z')
            .value_name("FACTOR")
            .help("Pixel replication factor"))
        .arg(Arg::new("session")
            .long("session")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Start from a saved parameter set; flags still override it"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("PNG")
            .value_parser(value_parser!(PathBuf))
            .help("Render once to a PNG file and exit"))
        .arg(Arg::new("size")
            .long("size")
            .value_name("WxH")
            .help("Window or output size in pixels (default 640x480)"))
        .arg(Arg::new("out-dir")
            .long("out-dir")
            .value_name("DIR")
            .value_parser(value_parser!(PathBuf))
            .help("Directory for palette, frame and session exports"))
        .arg(Arg::new("no-vsync")
            .long("no-vsync")
            .action(ArgAction::SetTrue)
            .help("Present frames without waiting for vertical sync"))
        .arg(Arg::new("control")
            .long("control")
            .value_name("SOCKET")
            .value_parser(value_parser!(PathBuf))
            .num_args(0..=1)
            .default_missing_value(DEFAULT_CONTROL_SOCKET)
            .help("Accept keys on a Unix socket"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("file")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Input file; standard input if omitted"))
}

impl Options {
    pub fn from_env() -> Result<Self> {
        Self::parse_from(std::env::args_os())
    }

    pub fn parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match create_cmd_args().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            },
            Err(e) => return Err(Error::Usage(e.to_string().trim_end().to_string())),
        };
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut params = match matches.get_one::<PathBuf>("session") {
            Some(path) => ParameterSet::load(path)?,
            None => ParameterSet::new(),
        };
        apply_flags(matches, &mut params)?;
        params.validate()?;

        let size = match matches.get_one::<String>("size") {
            Some(arg) => parse_size(arg)?,
            None => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        };

        let log_level = if matches.get_flag("trace") {
            Some(log::LevelFilter::Trace)
        } else if matches.get_flag("debug") {
            Some(log::LevelFilter::Debug)
        } else {
            None
        };

        Ok(Self {
            params,
            palette: matches.get_one::<PathBuf>("palette").cloned(),
            input: matches.get_one::<PathBuf>("file").cloned(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            size,
            out_dir: matches
                .get_one::<PathBuf>("out-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            vsync: !matches.get_flag("no-vsync"),
            control: matches.get_one::<PathBuf>("control").cloned(),
            log_level,
        })
    }
}

/// Flags given on the command line override the session or defaults
fn apply_flags(matches: &ArgMatches, params: &mut ParameterSet) -> Result<()> {
    if let Some(arg) = matches.get_one::<String>("color") {
        params.color_space = ColorSpace::parse(arg)?;
    }
    if let Some(arg) = matches.get_one::<String>("byte-order") {
        params.byte_order = Endian::parse(arg)?;
    }
    if let Some(arg) = matches.get_one::<String>("bit-order") {
        params.bit_order = Endian::parse(arg)?;
    }
    if let Some(arg) = matches.get_one::<String>("bits") {
        params.bits = ParameterSet::parse_bits(arg)?;
    }
    if let Some(arg) = matches.get_one::<String>("offset") {
        params.offset = parse_number(arg)?;
    }
    if let Some(arg) = matches.get_one::<String>("width") {
        params.width = parse_number(arg)?;
    }
    if let Some(arg) = matches.get_one::<String>("scale") {
        params.scale = parse_number(arg)?;
    }
    // Each occurrence toggles
    if matches.get_count("flip") % 2 == 1 {
        params.flip = !params.flip;
    }
    if matches.get_count("mirror") % 2 == 1 {
        params.mirror = !params.mirror;
    }
    Ok(())
}

/// Parse WxH format (e.g., 1920x1080)
fn parse_size(arg: &str) -> Result<(u32, u32)> {
    let bad = || Error::Usage(format!("size '{}' is not WxH", arg));
    let (w, h) = arg.split_once(['x', 'X']).ok_or_else(bad)?;
    let width = w.trim().parse::<u32>().map_err(|_| bad())?;
    let height = h.trim().parse::<u32>().map_err(|_| bad())?;
    if width == 0 || height == 0 {
        return Err(bad());
    }
    Ok((width, height))
}
