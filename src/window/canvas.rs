//! The native window and its event pump.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use log::debug;
use web_time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent as WinitWindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes};

use crate::error::Result;
use crate::event::{Action, AppEvent, Key, MouseButton, WindowEvent};
use crate::viewport::Viewport;
use crate::window::FramePacer;

/// Pixels scrolled per wheel line.
const PIXELS_PER_LINE: f64 = 10.0;

/// A window whose OS events are translated into [`AppEvent`]s.
///
/// A redraw delivered by the window becomes an [`AppEvent::Tick`], at most
/// once per refresh interval of the monitor.
pub struct Canvas {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    scale_factor: f64,
    pacer: FramePacer,
    redraw_pending: bool,
    events: Sender<AppEvent>,
}

impl Canvas {
    /// Opens a window of `width`x`height` logical pixels.
    ///
    /// Translated events are sent to `events` by [`Canvas::poll_events`].
    pub fn open(title: &str, width: u32, height: u32, events: Sender<AppEvent>) -> Result<Canvas> {
        let event_loop = EventLoop::new()?;

        let window_attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width as f64, height as f64));

        // `create_window` is only deprecated in favor of creating windows from `resumed`,
        // which the pump-based loop never needs.
        #[allow(deprecated)]
        let window = event_loop.create_window(window_attrs)?;
        let scale_factor = window.scale_factor();
        let refresh_rate = window
            .current_monitor()
            .and_then(|monitor| monitor.refresh_rate_millihertz());
        let pacer = FramePacer::from_refresh_rate(refresh_rate, Instant::now());
        debug!("Pacing frames every {:?}", pacer.interval());

        window.request_redraw();

        Ok(Canvas {
            event_loop,
            window: Arc::new(window),
            scale_factor,
            pacer,
            redraw_pending: false,
            events,
        })
    }

    /// The underlying window.
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// The current viewport state, computed from the physical window size.
    pub fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::from_physical(size.width, size.height, self.scale_factor)
    }

    /// Requests the next frame. It is ticked once the window delivers the
    /// redraw and the frame interval has passed.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Processes the pending OS events.
    ///
    /// Waits for events until the next frame is due, or for one frame
    /// interval while no redraw is pending (e.g. the window is minimized).
    pub fn poll_events(&mut self) {
        let mut collector = EventCollector {
            scale_factor: self.scale_factor,
            redraw_requested: false,
            events: Vec::new(),
        };

        let timeout = if self.redraw_pending {
            self.pacer.timeout(Instant::now())
        } else {
            self.pacer.interval()
        };

        let status = self
            .event_loop
            .pump_app_events(Some(timeout), &mut collector);

        self.scale_factor = collector.scale_factor;
        self.redraw_pending |= collector.redraw_requested;

        if self.redraw_pending && self.pacer.try_start_frame(Instant::now()) {
            self.redraw_pending = false;
            collector.events.push(AppEvent::Tick);
        }

        if let PumpStatus::Exit(code) = status {
            debug!("Event loop exited with code {code}");
            collector.events.push(AppEvent::Close);
        }

        for event in collector.events {
            // The receiver only goes away when the app is shutting down.
            let _ = self.events.send(event);
        }
    }
}

struct EventCollector {
    scale_factor: f64,
    redraw_requested: bool,
    events: Vec<AppEvent>,
}

impl EventCollector {
    fn input(&mut self, event: WindowEvent) {
        self.events.push(AppEvent::Input(event));
    }
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WinitWindowEvent,
    ) {
        match event {
            WinitWindowEvent::CloseRequested => self.events.push(AppEvent::Close),
            WinitWindowEvent::RedrawRequested => self.redraw_requested = true,
            WinitWindowEvent::Resized(physical_size) => {
                self.events.push(AppEvent::Resize(Viewport::from_physical(
                    physical_size.width,
                    physical_size.height,
                    self.scale_factor,
                )));
            }
            WinitWindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // The matching `Resized` event follows with the new physical size.
                self.scale_factor = scale_factor;
            }
            WinitWindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(self.scale_factor);
                self.input(WindowEvent::CursorPos(logical.x, logical.y));
            }
            WinitWindowEvent::MouseInput { state, button, .. } => {
                self.input(WindowEvent::MouseButton(
                    translate_mouse_button(button),
                    translate_action(state),
                ));
            }
            WinitWindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = translate_scroll(delta, self.scale_factor);
                self.input(WindowEvent::Scroll(x, y));
            }
            WinitWindowEvent::KeyboardInput { event, .. } => {
                let action = translate_action(event.state);
                self.input(WindowEvent::Key(translate_key(event.physical_key), action));

                if action == Action::Press {
                    if let winit::keyboard::Key::Character(ref c) = event.logical_key {
                        for ch in c.chars() {
                            self.input(WindowEvent::Char(ch));
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn translate_action(action: ElementState) -> Action {
    match action {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}

fn translate_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Button1,
        winit::event::MouseButton::Right => MouseButton::Button2,
        winit::event::MouseButton::Middle => MouseButton::Button3,
        _ => MouseButton::Other,
    }
}

fn translate_key(physical_key: PhysicalKey) -> Key {
    match physical_key {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        _ => Key::Unknown,
    }
}

fn translate_scroll(delta: MouseScrollDelta, scale_factor: f64) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(dx, dy) => {
            (dx as f64 * PIXELS_PER_LINE, dy as f64 * PIXELS_PER_LINE)
        }
        MouseScrollDelta::PixelDelta(delta) => {
            let logical = delta.to_logical::<f64>(scale_factor);
            (logical.x, logical.y)
        }
    }
}
