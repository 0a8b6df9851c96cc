mod pixel_buffer;

pub use pixel_buffer::PixelBuffer;

#[cfg(feature = "viewer")]
pub use window::{Display, InputEvent, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

#[cfg(feature = "viewer")]
mod window {
    use super::PixelBuffer;
    use sdl2::event::Event;
    use sdl2::keyboard::Keycode;
    use sdl2::pixels::PixelFormatEnum;
    use sdl2::render::{Canvas, Texture, TextureCreator};
    use sdl2::video::{Window, WindowContext};
    use sdl2::EventPump;

    pub struct Display {
        canvas: Canvas<Window>,
        event_pump: EventPump,
        width: u32,
        height: u32,
    }

    pub struct RenderTarget<'a> {
        texture: Texture<'a>,
        width: u32,
        height: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum InputEvent {
        Quit,
        /// One typed character, shift already applied
        Key(char),
    }

    impl Display {
        /// Create display with custom resolution and VSync settings
        /// vsync=true: locked to monitor refresh
        /// vsync=false: present as soon as a frame is rendered
        pub fn with_options(
            title: &str,
            width: u32,
            height: u32,
            vsync: bool,
        ) -> Result<(Self, TextureCreator<WindowContext>), String> {
            let sdl_context = sdl2::init()?;
            let video_subsystem = sdl_context.video()?;

            let window = video_subsystem
                .window(title, width, height)
                .position_centered()
                .build()
                .map_err(|e| e.to_string())?;

            // Keys arrive as text so '{', 'J' and '+' need no keymap of our own
            video_subsystem.text_input().start();

            let mut canvas_builder = window.into_canvas().accelerated();
            if vsync {
                canvas_builder = canvas_builder.present_vsync();
            }
            let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

            let texture_creator = canvas.texture_creator();
            let event_pump = sdl_context.event_pump()?;

            Ok((
                Self {
                    canvas,
                    event_pump,
                    width,
                    height,
                },
                texture_creator,
            ))
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        pub fn set_title(&mut self, title: &str) -> Result<(), String> {
            self.canvas
                .window_mut()
                .set_title(title)
                .map_err(|e| e.to_string())
        }

        pub fn present(
            &mut self,
            target: &mut RenderTarget,
            buffer: &PixelBuffer,
        ) -> Result<(), String> {
            target
                .texture
                .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
                .map_err(|e| e.to_string())?;

            self.canvas.copy(&target.texture, None, None)?;
            self.canvas.present();
            Ok(())
        }

        /// Drain pending events without blocking
        pub fn poll_events(&mut self) -> Vec<InputEvent> {
            self.event_pump.poll_iter().filter_map(map_event).collect()
        }

        /// Block until at least one event is pending, then drain
        pub fn wait_events(&mut self) -> Vec<InputEvent> {
            let first = self.event_pump.wait_event();
            let mut events: Vec<InputEvent> = map_event(first).into_iter().collect();
            events.extend(self.poll_events());
            events
        }

        /// Like [`Self::wait_events`] but gives up after `timeout_ms`
        pub fn wait_events_timeout(&mut self, timeout_ms: u32) -> Vec<InputEvent> {
            let mut events: Vec<InputEvent> = self
                .event_pump
                .wait_event_timeout(timeout_ms)
                .and_then(map_event)
                .into_iter()
                .collect();
            events.extend(self.poll_events());
            events
        }
    }

    impl<'a> RenderTarget<'a> {
        /// Create a streaming texture matching a buffer of `width` x `height`
        pub fn with_size(
            texture_creator: &'a TextureCreator<WindowContext>,
            width: u32,
            height: u32,
        ) -> Result<Self, String> {
            // RGB888 is 0x00RRGGBB per native-endian word, the buffer's own layout
            let texture = texture_creator
                .create_texture_streaming(PixelFormatEnum::RGB888, width, height)
                .map_err(|e| e.to_string())?;
            Ok(Self {
                texture,
                width,
                height,
            })
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }
    }

    fn map_event(event: Event) -> Option<InputEvent> {
        match event {
            Event::Quit { .. } => Some(InputEvent::Quit),
            Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => Some(InputEvent::Quit),
            Event::TextInput { text, .. } => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(key), None) => Some(InputEvent::Key(key)),
                    _ => None,
                }
            },
            _ => None,
        }
    }
}
