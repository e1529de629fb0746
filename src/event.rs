//! Window and application events.
//!
//! The OS events the demo cares about are translated into [`WindowEvent`]s by
//! the [`Canvas`](crate::window::Canvas). Together with the ticks, resizes,
//! asset completions and panel edits they form the single queue of
//! [`AppEvent`]s consumed, one at a time, by the [`App`](crate::app::App).

use crate::loader::ModelData;
use crate::panel::PanelEdit;
use crate::viewport::Viewport;

/// Key and button actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    /// The key or button was released.
    Release,
    /// The key or button was pressed.
    Press,
}

/// Mouse buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MouseButton {
    /// Left button.
    Button1,
    /// Right button.
    Button2,
    /// Middle button.
    Button3,
    /// Any other button.
    Other,
}

/// The few keys the demo reacts to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    /// Escape closes the window.
    Escape,
    /// Any other key.
    Unknown,
}

/// Input events relevant to the camera controls and the debug panel.
///
/// Positions are in logical pixels, with the origin at the top-left corner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum WindowEvent {
    /// The cursor moved.
    CursorPos(f64, f64),
    /// A mouse button changed state.
    MouseButton(MouseButton, Action),
    /// The wheel scrolled, in pixels.
    Scroll(f64, f64),
    /// A key changed state.
    Key(Key, Action),
    /// A character was typed.
    Char(char),
}

impl WindowEvent {
    /// Whether this event originates from the mouse.
    pub fn is_mouse_event(&self) -> bool {
        matches!(
            self,
            WindowEvent::CursorPos(..) | WindowEvent::MouseButton(..) | WindowEvent::Scroll(..)
        )
    }

    /// Whether this event originates from the keyboard.
    pub fn is_keyboard_event(&self) -> bool {
        matches!(self, WindowEvent::Key(..) | WindowEvent::Char(..))
    }
}

/// One unit of work for the application driver.
///
/// Events are processed in arrival order, each running to completion before
/// the next one starts.
#[derive(Debug)]
pub enum AppEvent {
    /// One display refresh: update and redraw the scene.
    Tick,
    /// The window was resized or moved to a display with another pixel ratio.
    Resize(Viewport),
    /// The model asset finished loading.
    AssetReady(ModelData),
    /// A tunable was edited.
    PanelEdit(PanelEdit),
    /// User input.
    Input(WindowEvent),
    /// The window was asked to close.
    Close,
}
