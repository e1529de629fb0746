//! The debug panel.
//!
//! An egui window with one control per tunable parameter. The panel keeps no
//! copy of the parameters: each frame it displays the current values and
//! reports the user's changes as [`PanelEdit`]s, which the application applies
//! to the configuration, the material uniforms, and the renderer.

use std::collections::HashMap;

use egui::RawInput;
use web_time::Instant;

use crate::color::Srgb8;
use crate::config::{HalftoneConfig, RendererParameters};
use crate::event::{Action, Key, MouseButton, WindowEvent};
use crate::viewport::Viewport;

/// A parameter exposed by the debug panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tunable {
    /// Base surface color.
    Colour,
    /// Shadow-dot repetitions.
    GridSize,
    /// Shadow-dot color.
    ShadowColour,
    /// Light-dot repetitions.
    LightRepetitions,
    /// Light-dot color.
    LightColour,
    /// Renderer clear color.
    ClearColor,
}

/// The widget used to edit a tunable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlKind {
    /// An sRGB color picker.
    Color,
    /// A numeric slider.
    Slider {
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
        /// Increment between accepted values.
        step: f32,
    },
}

/// Description of one panel control.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlSpec {
    /// The edited parameter.
    pub tunable: Tunable,
    /// Text shown next to the widget.
    pub label: &'static str,
    /// The widget.
    pub kind: ControlKind,
}

const REPETITIONS: ControlKind = ControlKind::Slider {
    min: 1.0,
    max: 200.0,
    step: 1.0,
};

/// The panel controls, in display order.
pub const CONTROLS: [ControlSpec; 6] = [
    ControlSpec {
        tunable: Tunable::Colour,
        label: "colour",
        kind: ControlKind::Color,
    },
    ControlSpec {
        tunable: Tunable::GridSize,
        label: "Shadow Repetitions",
        kind: REPETITIONS,
    },
    ControlSpec {
        tunable: Tunable::ShadowColour,
        label: "shadowColour",
        kind: ControlKind::Color,
    },
    ControlSpec {
        tunable: Tunable::LightRepetitions,
        label: "Light Repetitions",
        kind: REPETITIONS,
    },
    ControlSpec {
        tunable: Tunable::LightColour,
        label: "lightColour",
        kind: ControlKind::Color,
    },
    ControlSpec {
        tunable: Tunable::ClearColor,
        label: "clearColor",
        kind: ControlKind::Color,
    },
];

/// A change of one tunable parameter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PanelEdit {
    /// New base color.
    Colour(Srgb8),
    /// New shadow-dot repetitions.
    GridSize(f32),
    /// New shadow-dot color.
    ShadowColour(Srgb8),
    /// New light-dot repetitions.
    LightRepetitions(f32),
    /// New light-dot color.
    LightColour(Srgb8),
    /// New renderer clear color.
    ClearColor(Srgb8),
}

impl PanelEdit {
    /// The parameter changed by this edit.
    pub fn tunable(&self) -> Tunable {
        match self {
            PanelEdit::Colour(_) => Tunable::Colour,
            PanelEdit::GridSize(_) => Tunable::GridSize,
            PanelEdit::ShadowColour(_) => Tunable::ShadowColour,
            PanelEdit::LightRepetitions(_) => Tunable::LightRepetitions,
            PanelEdit::LightColour(_) => Tunable::LightColour,
            PanelEdit::ClearColor(_) => Tunable::ClearColor,
        }
    }

    /// This edit with its value brought within the bounds of its control.
    pub fn clamped(self) -> PanelEdit {
        let clamp = |tunable, v: f32| match control(tunable).kind {
            ControlKind::Slider { min, max, .. } => v.clamp(min, max),
            ControlKind::Color => v,
        };

        match self {
            PanelEdit::GridSize(v) => PanelEdit::GridSize(clamp(Tunable::GridSize, v)),
            PanelEdit::LightRepetitions(v) => {
                PanelEdit::LightRepetitions(clamp(Tunable::LightRepetitions, v))
            }
            other => other,
        }
    }
}

/// The control editing `tunable`.
pub fn control(tunable: Tunable) -> &'static ControlSpec {
    // Every tunable has exactly one control.
    let i = match tunable {
        Tunable::Colour => 0,
        Tunable::GridSize => 1,
        Tunable::ShadowColour => 2,
        Tunable::LightRepetitions => 3,
        Tunable::LightColour => 4,
        Tunable::ClearColor => 5,
    };
    &CONTROLS[i]
}

/// Tessellated UI, ready to be drawn over the scene.
pub struct UiFrame {
    /// The UI triangles.
    pub primitives: Vec<egui::ClippedPrimitive>,
    /// Font and image texture updates.
    pub textures_delta: egui::TexturesDelta,
    /// UI scale.
    pub pixels_per_point: f32,
}

/// The debug panel state: the egui context and the input accumulated since the last frame.
pub struct DebugPanel {
    ctx: egui::Context,
    raw_input: RawInput,
    cursor_pos: Option<egui::Pos2>,
    control_rects: HashMap<Tunable, egui::Rect>,
    start_time: Instant,
}

impl Default for DebugPanel {
    fn default() -> Self {
        DebugPanel::new()
    }
}

impl DebugPanel {
    /// Creates the panel.
    pub fn new() -> DebugPanel {
        DebugPanel {
            ctx: egui::Context::default(),
            raw_input: RawInput::default(),
            cursor_pos: None,
            control_rects: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// The egui context of the panel.
    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Screen area of the control editing `tunable` in the last frame, in
    /// logical pixels.
    pub fn control_rect(&self, tunable: Tunable) -> Option<egui::Rect> {
        self.control_rects.get(&tunable).copied()
    }

    /// Returns true if egui wants to capture the mouse (e.g., hovering over a widget).
    pub fn wants_pointer_input(&self) -> bool {
        self.ctx.wants_pointer_input()
    }

    /// Returns true if egui wants to capture keyboard input (e.g., text input focused).
    pub fn wants_keyboard_input(&self) -> bool {
        self.ctx.wants_keyboard_input()
    }

    /// Whether `event` should be consumed by the panel rather than the camera controls.
    pub fn captures(&self, event: &WindowEvent) -> bool {
        (event.is_mouse_event() && self.wants_pointer_input())
            || (event.is_keyboard_event() && self.wants_keyboard_input())
    }

    /// Feeds a window event to egui for processing.
    pub fn feed_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y) => {
                let pos = egui::Pos2::new(x as f32, y as f32);
                self.cursor_pos = Some(pos);
                self.raw_input.events.push(egui::Event::PointerMoved(pos));
            }
            WindowEvent::MouseButton(button, action) => {
                let button = match button {
                    MouseButton::Button1 => egui::PointerButton::Primary,
                    MouseButton::Button2 => egui::PointerButton::Secondary,
                    MouseButton::Button3 => egui::PointerButton::Middle,
                    MouseButton::Other => return,
                };

                if let Some(pos) = self.cursor_pos {
                    self.raw_input.events.push(egui::Event::PointerButton {
                        pos,
                        button,
                        pressed: action == Action::Press,
                        modifiers: egui::Modifiers::default(),
                    });
                }
            }
            WindowEvent::Scroll(x, y) => {
                self.raw_input.events.push(egui::Event::MouseWheel {
                    unit: egui::MouseWheelUnit::Point,
                    delta: egui::Vec2::new(x as f32, y as f32),
                    modifiers: egui::Modifiers::default(),
                });
            }
            WindowEvent::Char(ch) => {
                if !ch.is_control() {
                    self.raw_input.events.push(egui::Event::Text(ch.to_string()));
                }
            }
            WindowEvent::Key(Key::Escape, action) => {
                self.raw_input.events.push(egui::Event::Key {
                    key: egui::Key::Escape,
                    physical_key: None,
                    pressed: action == Action::Press,
                    repeat: false,
                    modifiers: egui::Modifiers::default(),
                });
            }
            WindowEvent::Key(Key::Unknown, _) => {}
        }
    }

    /// Runs one UI frame showing the current parameter values.
    ///
    /// Returns the edits made by the user during this frame, in control order,
    /// and the tessellated UI.
    pub fn run(
        &mut self,
        viewport: &Viewport,
        config: &HalftoneConfig,
        params: &RendererParameters,
    ) -> (Vec<PanelEdit>, UiFrame) {
        let pixels_per_point = viewport.device_pixel_ratio();
        self.ctx.set_pixels_per_point(pixels_per_point);

        let mut raw_input = std::mem::take(&mut self.raw_input);
        raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(viewport.width() as f32, viewport.height() as f32),
        ));
        raw_input.time = Some(self.start_time.elapsed().as_secs_f64());
        raw_input.predicted_dt = 1.0 / 60.0;

        let mut edits = Vec::new();

        self.ctx.begin_pass(raw_input);
        egui::Window::new("Debug")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
            .resizable(false)
            .show(&self.ctx, |ui| {
                for spec in &CONTROLS {
                    let control = show_control(ui, spec, config, params);
                    self.control_rects.insert(spec.tunable, control.response.rect);
                    edits.extend(control.inner);
                }
            });
        let output = self.ctx.end_pass();

        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);

        let frame = UiFrame {
            primitives,
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        };

        (edits, frame)
    }
}

fn show_control(
    ui: &mut egui::Ui,
    spec: &ControlSpec,
    config: &HalftoneConfig,
    params: &RendererParameters,
) -> egui::InnerResponse<Option<PanelEdit>> {
    ui.horizontal(|ui| match spec.kind {
        ControlKind::Slider { min, max, step } => {
            let mut value = match spec.tunable {
                Tunable::GridSize => config.grid_size,
                Tunable::LightRepetitions => config.light_repetitions,
                _ => return None,
            };

            let changed = ui
                .add(
                    egui::Slider::new(&mut value, min..=max)
                        .step_by(step as f64)
                        .text(spec.label),
                )
                .changed();

            match spec.tunable {
                Tunable::GridSize if changed => Some(PanelEdit::GridSize(value)),
                Tunable::LightRepetitions if changed => Some(PanelEdit::LightRepetitions(value)),
                _ => None,
            }
        }
        ControlKind::Color => {
            let mut rgb = match spec.tunable {
                Tunable::Colour => config.colour,
                Tunable::ShadowColour => config.shadow_colour,
                Tunable::LightColour => config.light_colour,
                Tunable::ClearColor => params.clear_color,
                _ => return None,
            };

            let changed = ui.color_edit_button_srgb(&mut rgb).changed();
            ui.label(spec.label);

            if !changed {
                return None;
            }

            match spec.tunable {
                Tunable::Colour => Some(PanelEdit::Colour(rgb)),
                Tunable::ShadowColour => Some(PanelEdit::ShadowColour(rgb)),
                Tunable::LightColour => Some(PanelEdit::LightColour(rgb)),
                Tunable::ClearColor => Some(PanelEdit::ClearColor(rgb)),
                _ => None,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_are_listed_in_display_order() {
        let order: Vec<_> = CONTROLS.iter().map(|c| c.tunable).collect();
        assert_eq!(
            order,
            [
                Tunable::Colour,
                Tunable::GridSize,
                Tunable::ShadowColour,
                Tunable::LightRepetitions,
                Tunable::LightColour,
                Tunable::ClearColor,
            ]
        );
        assert_eq!(control(Tunable::GridSize).label, "Shadow Repetitions");
        assert_eq!(control(Tunable::LightRepetitions).label, "Light Repetitions");
    }

    #[test]
    fn control_lookup_matches_tunable() {
        for spec in &CONTROLS {
            assert_eq!(control(spec.tunable), spec);
        }
    }

    #[test]
    fn repetitions_are_clamped_to_slider_bounds() {
        assert_eq!(PanelEdit::GridSize(0.0).clamped(), PanelEdit::GridSize(1.0));
        assert_eq!(
            PanelEdit::LightRepetitions(500.0).clamped(),
            PanelEdit::LightRepetitions(200.0)
        );
        assert_eq!(PanelEdit::GridSize(50.0).clamped(), PanelEdit::GridSize(50.0));
        assert_eq!(
            PanelEdit::Colour([1, 2, 3]).clamped(),
            PanelEdit::Colour([1, 2, 3])
        );
    }

    #[test]
    fn idle_frame_produces_no_edit() {
        let mut panel = DebugPanel::new();
        let viewport = Viewport::new(800, 600, 1.0);
        let config = HalftoneConfig::default();
        let params = RendererParameters::default();

        let mut last = None;
        for _ in 0..3 {
            let (edits, frame) = panel.run(&viewport, &config, &params);
            assert!(edits.is_empty());
            assert_eq!(frame.pixels_per_point, 1.0);
            last = Some(frame);
        }

        // The window is laid out invisibly on its first frame.
        assert!(last.is_some_and(|frame| !frame.primitives.is_empty()));
    }

    #[test]
    fn pressing_a_slider_edits_its_tunable() {
        let mut panel = DebugPanel::new();
        let viewport = Viewport::new(800, 600, 1.0);
        let config = HalftoneConfig::default();
        let params = RendererParameters::default();
        for _ in 0..3 {
            let _ = panel.run(&viewport, &config, &params);
        }

        // The rail comes first in the row; its right end is the maximum.
        let rect = panel
            .control_rect(Tunable::LightRepetitions)
            .expect("slider laid out");
        let rail_width = panel.context().style().spacing.slider_width;
        let cursor = WindowEvent::CursorPos(
            (rect.left() + rail_width - 1.0) as f64,
            rect.center().y as f64,
        );

        panel.feed_event(&cursor);
        let (edits, _) = panel.run(&viewport, &config, &params);
        assert!(edits.is_empty());

        let press = WindowEvent::MouseButton(MouseButton::Button1, Action::Press);
        assert!(panel.captures(&press));
        panel.feed_event(&press);
        let (edits, _) = panel.run(&viewport, &config, &params);

        assert_eq!(edits, vec![PanelEdit::LightRepetitions(200.0)]);
    }

    #[test]
    fn every_control_is_laid_out_inside_the_screen() {
        let mut panel = DebugPanel::new();
        let viewport = Viewport::new(800, 600, 1.0);
        let screen = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0));
        for _ in 0..3 {
            let _ = panel.run(&viewport, &HalftoneConfig::default(), &RendererParameters::default());
        }

        for spec in &CONTROLS {
            let rect = panel.control_rect(spec.tunable).expect("control laid out");
            assert!(screen.contains_rect(rect), "{:?} at {rect:?}", spec.tunable);
        }
    }

    #[test]
    fn pointer_far_from_the_panel_is_not_captured() {
        let mut panel = DebugPanel::new();
        let viewport = Viewport::new(800, 600, 1.0);
        let config = HalftoneConfig::default();
        let params = RendererParameters::default();
        let _ = panel.run(&viewport, &config, &params);

        panel.feed_event(&WindowEvent::CursorPos(10.0, 590.0));
        let _ = panel.run(&viewport, &config, &params);

        assert!(!panel.captures(&WindowEvent::CursorPos(10.0, 590.0)));
    }
}
