//! Interactive window
//!
//! Waits for keys from the window (and the control socket, if any), applies
//! them to the session one at a time, re-renders only when something
//! changed and shows the status line in the title bar.

use crate::display::{Display, InputEvent, PixelBuffer, RenderTarget};
use crate::error::Result;
use crate::session::Session;
use std::path::PathBuf;

#[cfg(unix)]
use crate::control::Controller;

/// How long to block on window events while also polling the socket
const CONTROL_POLL_MS: u32 = 50;

pub struct ViewerOptions {
    pub size: (u32, u32),
    pub vsync: bool,
    pub control: Option<PathBuf>,
}

pub fn run(session: &mut Session, options: &ViewerOptions) -> Result<()> {
    let (width, height) = options.size;
    let (mut display, texture_creator) = Display::with_options("gfxx", width, height, options.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    #[cfg(unix)]
    let controller = options.control.as_ref().map(Controller::new).transpose()?;
    #[cfg(not(unix))]
    if options.control.is_some() {
        log::warn!("--control needs Unix sockets; ignoring");
    }

    println!("=== gfxx ===");
    println!("{}x{} window, {}", display.width(), display.height(), session.params());
    #[cfg(unix)]
    if let Some(controller) = &controller {
        println!("Remote keys: echo '>>x' | nc -U {}", controller.path().display());
    }
    println!("Press o to print the current options, q or Escape to quit.");
    log::debug!("streaming texture {}x{}", target.width(), target.height());

    'main: loop {
        if session.is_dirty() {
            session.render(&mut buffer);
            display.set_title(&session.params().status())?;
        }
        display.present(&mut target, &buffer)?;

        let mut keys = Vec::new();

        #[cfg(unix)]
        let events = if controller.is_some() {
            display.wait_events_timeout(CONTROL_POLL_MS)
        } else {
            display.wait_events()
        };
        #[cfg(not(unix))]
        let events = display.wait_events();

        for event in events {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::Key(key) => keys.push(key),
            }
        }

        #[cfg(unix)]
        if let Some(controller) = &controller {
            keys.extend(controller.poll());
        }

        for key in keys {
            if !session.handle_key(key, &mut buffer)? {
                break 'main;
            }
        }
    }

    Ok(())
}
