mod command;
#[cfg(all(unix, feature = "viewer"))]
mod control;
mod decode;
mod display;
mod error;
mod export;
mod options;
mod palette;
mod params;
mod png_encoder;
mod render;
mod scan;
mod session;
#[cfg(feature = "viewer")]
mod viewer;

use display::PixelBuffer;
use error::{Error, Result};
use options::Options;
use palette::Palette;
use session::Session;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gfxx: {}", e);
            ExitCode::from(e.exit_status())
        },
    }
}

fn run() -> Result<()> {
    let options = Options::from_env()?;
    init_logging(options.log_level);

    let palette = match &options.palette {
        Some(path) => Palette::load(path)?,
        None => Palette::new(),
    };
    let data = read_input(options.input.as_deref())?;
    log::debug!("{} bytes of input, {}", data.len(), options.params);

    if let Some(output) = &options.output {
        let (width, height) = options.size;
        let mut buffer = PixelBuffer::with_size(width, height);
        let mut session = Session::new(&data, options.params.clone(), palette, options.out_dir.clone());
        session.render(&mut buffer);
        return export::write_png(output, &buffer);
    }

    run_viewer(&data, palette, &options)
}

/// `warn` unless `--debug`/`--trace` ask for more; `RUST_LOG` still wins
/// when neither flag is given
fn init_logging(level: Option<log::LevelFilter>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    match path {
        Some(path) => {
            let mut file = std::fs::File::open(path).map_err(|source| Error::NoInput {
                path: path.to_path_buf(),
                source,
            })?;
            file.read_to_end(&mut data).map_err(|e| Error::io(path, e))?;
        },
        None => {
            std::io::stdin()
                .lock()
                .read_to_end(&mut data)
                .map_err(|e| Error::io("<stdin>", e))?;
        },
    }
    Ok(data)
}

#[cfg(feature = "viewer")]
fn run_viewer(data: &[u8], palette: Palette, options: &Options) -> Result<()> {
    let mut session = Session::new(data, options.params.clone(), palette, options.out_dir.clone());
    viewer::run(
        &mut session,
        &viewer::ViewerOptions {
            size: options.size,
            vsync: options.vsync,
            control: options.control.clone(),
        },
    )
}

#[cfg(not(feature = "viewer"))]
fn run_viewer(_data: &[u8], _palette: Palette, _options: &Options) -> Result<()> {
    Err(Error::Usage(
        "built without the viewer feature; use -o FILE to render a PNG".to_string(),
    ))
}
