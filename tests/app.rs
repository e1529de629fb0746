use std::rc::Rc;

use halftone3d::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetSize(u32, u32),
    SetPixelRatio(f32),
    SetClearColor(Srgb8),
    Render { objects: usize, with_ui: bool },
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
    /// `uGridSize` as seen by each render.
    grid_sizes: Vec<f32>,
}

impl RecordingRenderer {
    fn renders(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Render { .. }))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn set_size(&mut self, width: u32, height: u32) {
        self.calls.push(Call::SetSize(width, height));
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.calls.push(Call::SetPixelRatio(pixel_ratio));
    }

    fn set_clear_color(&mut self, color: Srgb8) {
        self.calls.push(Call::SetClearColor(color));
    }

    fn render(&mut self, scene: &SceneNode3d, _camera: &dyn Camera3d, ui: Option<UiFrame>) {
        let draws = scene.draw_list();
        if let Some(item) = draws.first() {
            self.grid_sizes.push(item.material.borrow().uniforms.grid_size());
        }

        self.calls.push(Call::Render {
            objects: draws.len(),
            with_ui: ui.is_some(),
        });
    }
}

fn new_app() -> App {
    App::new(
        HalftoneConfig::default(),
        RendererParameters::default(),
        Viewport::new(1280, 800, 1.0),
    )
}

fn triangle_model() -> ModelData {
    let triangle = RenderMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, Some(vec![[0, 1, 2]]));

    ModelData {
        roots: vec![ModelNode {
            name: Some("logo".to_string()),
            transform: Transform::default(),
            meshes: vec![triangle.clone()],
            children: vec![ModelNode {
                meshes: vec![triangle],
                ..ModelNode::default()
            }],
        }],
    }
}

#[test]
fn initial_renderer_state() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.init_renderer(&mut renderer);

    assert_eq!(
        renderer.calls,
        vec![
            Call::SetSize(1280, 800),
            Call::SetPixelRatio(1.0),
            Call::SetClearColor(DEFAULT_CLEAR_COLOR),
        ]
    );
    assert_eq!(app.camera().eye(), CAMERA_POSITION);
    assert_eq!(app.camera().target(), Vec3::ZERO);
    assert_eq!(app.camera().fov(), CAMERA_FOV);
    assert!(app.controls().damping_enabled());
}

#[test]
fn resize_updates_uniform_camera_and_renderer_together() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.handle(
        AppEvent::Resize(Viewport::new(800, 600, 2.0)),
        &mut renderer,
    );

    assert_eq!(
        app.material().borrow().uniforms.resolution(),
        Vec2::new(1600.0, 1200.0)
    );
    assert!((app.camera().aspect() - 800.0 / 600.0).abs() < 1.0e-6);

    let expected = Mat4::perspective_rh(
        CAMERA_FOV.to_radians(),
        800.0 / 600.0,
        CAMERA_NEAR,
        CAMERA_FAR,
    );
    assert!(app.camera().projection().abs_diff_eq(expected, 1.0e-6));

    assert_eq!(
        renderer.calls,
        vec![Call::SetSize(800, 600), Call::SetPixelRatio(2.0)]
    );
}

#[test]
fn resize_clamps_high_density_displays() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.resize(Viewport::new(1024, 768, 3.0), &mut renderer);

    assert_eq!(
        app.material().borrow().uniforms.resolution(),
        Vec2::new(2048.0, 1536.0)
    );
    assert_eq!(renderer.calls[1], Call::SetPixelRatio(2.0));
}

#[test]
fn grid_size_edit_reaches_the_uniform() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.handle(AppEvent::PanelEdit(PanelEdit::GridSize(50.0)), &mut renderer);

    assert_eq!(app.material().borrow().uniforms.grid_size(), 50.0);
    assert_eq!(app.config().grid_size, 50.0);
    assert!(renderer.calls.is_empty());
}

#[test]
fn slider_edits_are_kept_within_bounds() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.apply_edit(PanelEdit::LightRepetitions(500.0), &mut renderer);
    app.apply_edit(PanelEdit::GridSize(0.0), &mut renderer);

    let material = app.material().borrow();
    assert_eq!(material.uniforms.light_repetitions(), 200.0);
    assert_eq!(material.uniforms.grid_size(), 1.0);
}

#[test]
fn colour_edits_are_converted_to_linear() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.apply_edit(PanelEdit::Colour([0x80, 0xff, 0x00]), &mut renderer);
    app.apply_edit(PanelEdit::ShadowColour([0xff, 0xff, 0xff]), &mut renderer);

    let material = app.material().borrow();
    let color = material.uniforms.color();
    assert!((color.r - 0.2158605).abs() < 1.0e-4);
    assert!((color.g - 1.0).abs() < 1.0e-6);
    assert_eq!(color.b, 0.0);
    assert_eq!(material.uniforms.shadow_colour(), from_srgb8([0xff, 0xff, 0xff]));
    assert_eq!(app.config().colour, [0x80, 0xff, 0x00]);
}

#[test]
fn clear_color_edit_goes_to_the_renderer() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();
    let before = app.material().borrow().uniforms;

    app.apply_edit(PanelEdit::ClearColor([1, 2, 3]), &mut renderer);

    assert_eq!(renderer.calls, vec![Call::SetClearColor([1, 2, 3])]);
    assert_eq!(app.renderer_parameters().clear_color, [1, 2, 3]);
    assert_eq!(app.material().borrow().uniforms, before);
}

#[test]
fn frame_without_model_spins_and_renders_once() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.frame(10.0, &mut renderer);

    assert!(app.model().is_none());
    assert_eq!(
        renderer.calls,
        vec![Call::Render {
            objects: 2,
            with_ui: true
        }]
    );

    for node in [app.sphere(), app.torus_knot()] {
        let rotation = node.rotation();
        assert!((rotation.x + 1.0).abs() < 1.0e-6);
        assert!((rotation.y - 2.0).abs() < 1.0e-6);
        assert_eq!(rotation.z, 0.0);
    }

    assert_eq!(app.torus_knot().position(), TORUS_KNOT_POSITION);
    assert_eq!(app.sphere().position(), SPHERE_POSITION);
}

#[test]
fn rotation_depends_only_on_elapsed_time() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.frame(3.0, &mut renderer);
    app.frame(1.0, &mut renderer);
    app.frame(5.0, &mut renderer);

    let rotation = app.sphere().rotation();
    assert!((rotation.x + 0.5).abs() < 1.0e-6);
    assert!((rotation.y - 1.0).abs() < 1.0e-6);
    assert_eq!(renderer.renders(), 3);
}

#[test]
fn loaded_model_shares_the_material() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.handle(AppEvent::AssetReady(triangle_model()), &mut renderer);

    let model = app.model().expect("model inserted").clone();
    assert_eq!(model.scale(), Vec3::splat(MODEL_SCALE));

    let draws = app.scene().draw_list();
    assert_eq!(draws.len(), 4);
    for item in &draws {
        assert!(Rc::ptr_eq(&item.material, app.material()));
    }

    app.frame(10.0, &mut renderer);

    let rotation = app.model().expect("model inserted").rotation();
    assert!((rotation.z + 1.0).abs() < 1.0e-6);
    assert!((rotation.x - 0.1).abs() < 1.0e-6);
    assert_eq!(rotation.y, 0.0);
    assert_eq!(
        renderer.calls,
        vec![Call::Render {
            objects: 4,
            with_ui: true
        }]
    );
}

#[test]
fn material_edits_affect_every_object() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();

    app.insert_model(triangle_model());
    app.apply_edit(PanelEdit::LightColour([0, 0, 0]), &mut renderer);

    for item in app.scene().draw_list() {
        assert_eq!(item.material.borrow().uniforms.light_colour(), from_srgb8([0, 0, 0]));
    }
}

#[test]
fn close_and_escape_stop_the_app() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();
    assert!(!app.should_close());

    app.handle(AppEvent::Close, &mut renderer);
    assert!(app.should_close());

    let mut app = new_app();
    app.handle(
        AppEvent::Input(WindowEvent::Key(Key::Escape, Action::Press)),
        &mut renderer,
    );
    assert!(app.should_close());
}

#[test]
fn scroll_moves_the_camera_closer() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();
    let distance = app.camera().eye().length();

    app.handle(
        AppEvent::Input(WindowEvent::CursorPos(200.0, 600.0)),
        &mut renderer,
    );
    app.handle(
        AppEvent::Input(WindowEvent::Scroll(0.0, 10.0)),
        &mut renderer,
    );

    for _ in 0..50 {
        app.frame(0.0, &mut renderer);
    }

    assert!(app.camera().eye().length() < distance);
}

#[test]
fn pressing_the_shadow_slider_updates_the_uniform_before_rendering() {
    let mut app = new_app();
    let mut renderer = RecordingRenderer::default();
    for _ in 0..3 {
        app.frame(0.0, &mut renderer);
    }

    // The left end of the rail is the minimum.
    let rect = app
        .panel()
        .control_rect(Tunable::GridSize)
        .expect("slider laid out");
    let (x, y) = (rect.left() + 1.0, rect.center().y);

    app.handle(
        AppEvent::Input(WindowEvent::CursorPos(x as f64, y as f64)),
        &mut renderer,
    );
    app.frame(0.0, &mut renderer);
    app.handle(
        AppEvent::Input(WindowEvent::MouseButton(MouseButton::Button1, Action::Press)),
        &mut renderer,
    );
    app.frame(0.0, &mut renderer);

    assert_eq!(renderer.grid_sizes, vec![120.0, 120.0, 120.0, 120.0, 1.0]);
    assert_eq!(app.config().grid_size, 1.0);
    assert_eq!(app.material().borrow().uniforms.grid_size(), 1.0);
    assert!((app.camera().eye() - CAMERA_POSITION).length() < 1.0e-4);
}
