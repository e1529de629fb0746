//! The application state and its event-queue driver.
//!
//! Everything the demo does happens on one thread, one [`AppEvent`] at a time:
//! a tick animates and draws the scene, a resize updates the resolution
//! uniform, camera and renderer together, a finished asset load inserts the
//! model, and panel edits write uniforms. Only the model loader runs
//! elsewhere, and it communicates through the same queue.

use std::sync::mpsc;

use glamx::Vec3;
use log::{debug, info};

use crate::animation::{Clock, MODEL_SPIN, SPHERE_SPIN, TORUS_KNOT_SPIN};
use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::config::{Args, HalftoneConfig, RendererParameters};
use crate::error::Result;
use crate::event::{Action, AppEvent, Key, WindowEvent};
use crate::loader::{self, ModelData};
use crate::panel::{DebugPanel, PanelEdit};
use crate::procedural;
use crate::renderer::{Renderer, RendererSetup, WgpuRenderer};
use crate::resource::{self, HalftoneUniforms, MaterialHandle, ShaderMaterial, UniformName};
use crate::scene::SceneNode3d;
use crate::viewport::Viewport;
use crate::window::Canvas;

/// Vertical field of view of the camera, in degrees.
pub const CAMERA_FOV: f32 = 25.0;
/// Near clipping plane distance.
pub const CAMERA_NEAR: f32 = 0.1;
/// Far clipping plane distance.
pub const CAMERA_FAR: f32 = 100.0;
/// Initial camera position. The camera looks at the origin.
pub const CAMERA_POSITION: Vec3 = Vec3::new(7.0, 7.0, 7.0);
/// Position of the torus knot.
pub const TORUS_KNOT_POSITION: Vec3 = Vec3::new(3.0, 0.0, 0.0);
/// Position of the sphere.
pub const SPHERE_POSITION: Vec3 = Vec3::new(-3.0, 0.0, 0.0);
/// Uniform scale of the loaded model.
pub const MODEL_SCALE: f32 = 0.35;

/// The demo: scene, camera, tunables and debug panel.
pub struct App {
    config: HalftoneConfig,
    renderer_params: RendererParameters,
    material: MaterialHandle,
    scene: SceneNode3d,
    sphere: SceneNode3d,
    torus_knot: SceneNode3d,
    model: Option<SceneNode3d>,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    panel: DebugPanel,
    clock: Clock,
    should_close: bool,
}

impl App {
    /// Builds the scene: the torus knot and the sphere sharing one halftone
    /// material, and the orbiting camera. The model is inserted later, once loaded.
    pub fn new(config: HalftoneConfig, renderer_params: RendererParameters, viewport: Viewport) -> App {
        let uniforms = HalftoneUniforms::from_config(&config, &viewport);
        for name in UniformName::ALL {
            debug!("Uniform {name} = {:?}", uniforms.get(name));
        }

        let material = resource::shared(ShaderMaterial::halftone(uniforms));

        let mut scene = SceneNode3d::empty();

        let mut torus_knot = scene.add_render_mesh(
            procedural::torus_knot(0.6, 0.25, 128, 32, 2, 3),
            material.clone(),
        );
        torus_knot.set_position(TORUS_KNOT_POSITION);

        let mut sphere = scene.add_render_mesh(procedural::unit_sphere(), material.clone());
        sphere.set_position(SPHERE_POSITION);

        let mut camera = PerspectiveCamera::new(CAMERA_FOV, viewport.aspect(), CAMERA_NEAR, CAMERA_FAR);
        camera.set_position(CAMERA_POSITION);
        camera.look_at(Vec3::ZERO);

        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.set_damping_enabled(true);

        App {
            config,
            renderer_params,
            material,
            scene,
            sphere,
            torus_knot,
            model: None,
            camera,
            controls,
            viewport,
            panel: DebugPanel::new(),
            clock: Clock::new(),
            should_close: false,
        }
    }

    /// Brings a freshly created renderer in sync with the app state.
    pub fn init_renderer(&mut self, renderer: &mut dyn Renderer) {
        self.resize(self.viewport, renderer);
        renderer.set_clear_color(self.renderer_params.clear_color);
    }

    /// Processes one event to completion.
    pub fn handle(&mut self, event: AppEvent, renderer: &mut dyn Renderer) {
        match event {
            AppEvent::Tick => {
                let elapsed = self.clock.elapsed_time();
                self.frame(elapsed, renderer);
            }
            AppEvent::Resize(viewport) => self.resize(viewport, renderer),
            AppEvent::AssetReady(model) => self.insert_model(model),
            AppEvent::PanelEdit(edit) => self.apply_edit(edit, renderer),
            AppEvent::Input(event) => self.input(event),
            AppEvent::Close => self.should_close = true,
        }
    }

    /// Runs one frame at `elapsed` seconds since startup: the debug panel,
    /// the spin laws, the orbit controls, then a single draw.
    pub fn frame(&mut self, elapsed: f32, renderer: &mut dyn Renderer) {
        let (edits, ui) = self
            .panel
            .run(&self.viewport, &self.config, &self.renderer_params);

        for edit in edits {
            self.apply_edit(edit, renderer);
        }

        SPHERE_SPIN.apply(&mut self.sphere, elapsed);
        TORUS_KNOT_SPIN.apply(&mut self.torus_knot, elapsed);

        if let Some(model) = &mut self.model {
            MODEL_SPIN.apply(model, elapsed);
        }

        self.controls.update(&mut self.camera);

        renderer.render(&self.scene, &self.camera, Some(ui));
    }

    /// Propagates a new viewport to the resolution uniform, the camera and the renderer.
    pub fn resize(&mut self, viewport: Viewport, renderer: &mut dyn Renderer) {
        debug!(
            "Resizing to {}x{} (pixel ratio {})",
            viewport.width(),
            viewport.height(),
            viewport.pixel_ratio()
        );

        self.viewport = viewport;

        self.material
            .borrow_mut()
            .uniforms
            .set_resolution(viewport.resolution());

        self.camera.set_aspect(viewport.aspect());
        self.camera.update_projection_matrix();

        renderer.set_size(viewport.width(), viewport.height());
        renderer.set_pixel_ratio(viewport.pixel_ratio());
    }

    /// Applies a tunable edit to the config and to its uniform slot or the renderer.
    pub fn apply_edit(&mut self, edit: PanelEdit, renderer: &mut dyn Renderer) {
        let edit = edit.clamped();
        debug!("Panel edit: {edit:?}");

        let mut material = self.material.borrow_mut();
        let uniforms = &mut material.uniforms;

        match edit {
            PanelEdit::Colour(rgb) => {
                self.config.colour = rgb;
                uniforms.set_color(rgb);
            }
            PanelEdit::GridSize(value) => {
                self.config.grid_size = value;
                uniforms.set_grid_size(value);
            }
            PanelEdit::ShadowColour(rgb) => {
                self.config.shadow_colour = rgb;
                uniforms.set_shadow_colour(rgb);
            }
            PanelEdit::LightRepetitions(value) => {
                self.config.light_repetitions = value;
                uniforms.set_light_repetitions(value);
            }
            PanelEdit::LightColour(rgb) => {
                self.config.light_colour = rgb;
                uniforms.set_light_colour(rgb);
            }
            PanelEdit::ClearColor(rgb) => {
                self.renderer_params.clear_color = rgb;
                renderer.set_clear_color(rgb);
            }
        }
    }

    /// Inserts the loaded model into the scene, drawn with the shared material.
    pub fn insert_model(&mut self, model: ModelData) {
        if let Some(mut previous) = self.model.take() {
            previous.remove();
        }

        let mut node = model.to_scene_node();
        node.set_material(self.material.clone());
        node.set_local_scale(MODEL_SCALE, MODEL_SCALE, MODEL_SCALE);
        self.scene.add_child(node.clone());

        info!("Model inserted ({} meshes)", model.num_meshes());
        self.model = Some(node);
    }

    fn input(&mut self, event: WindowEvent) {
        let captured = self.panel.captures(&event);
        self.panel.feed_event(&event);

        // A drag that ends over the panel must still end for the controls.
        let is_release = matches!(event, WindowEvent::MouseButton(_, Action::Release));
        if !captured || is_release {
            self.controls
                .handle_event(&self.camera, &self.viewport, &event);
        }

        if !captured && event == WindowEvent::Key(Key::Escape, Action::Press) {
            self.should_close = true;
        }
    }

    /// Whether a close was requested.
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// The current tunables.
    pub fn config(&self) -> &HalftoneConfig {
        &self.config
    }

    /// The current renderer parameters.
    pub fn renderer_parameters(&self) -> &RendererParameters {
        &self.renderer_params
    }

    /// The material shared by every object of the scene.
    pub fn material(&self) -> &MaterialHandle {
        &self.material
    }

    /// The scene root.
    pub fn scene(&self) -> &SceneNode3d {
        &self.scene
    }

    /// The sphere node.
    pub fn sphere(&self) -> &SceneNode3d {
        &self.sphere
    }

    /// The torus knot node.
    pub fn torus_knot(&self) -> &SceneNode3d {
        &self.torus_knot
    }

    /// The model node, once loaded.
    pub fn model(&self) -> Option<&SceneNode3d> {
        self.model.as_ref()
    }

    /// The camera.
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// The orbit controls.
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// The current viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The debug panel.
    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }
}

/// Opens the window and runs the demo until it is closed.
pub fn run(args: Args) -> Result<()> {
    let (sender, receiver) = mpsc::channel();

    let mut canvas = Canvas::open(&args.title, args.width, args.height, sender.clone())?;
    let mut app = App::new(
        args.halftone_config(),
        args.renderer_parameters(),
        canvas.viewport(),
    );

    let setup = RendererSetup {
        vsync: !args.no_vsync,
        samples: args.samples,
    };
    let mut renderer = pollster::block_on(WgpuRenderer::new(
        canvas.window().clone(),
        &app.material().borrow(),
        setup,
    ))?;
    app.init_renderer(&mut renderer);

    let _loader = loader::spawn_model_load(args.model.clone(), sender);

    while !app.should_close() {
        canvas.poll_events();

        for event in receiver.try_iter() {
            let is_tick = matches!(event, AppEvent::Tick);
            app.handle(event, &mut renderer);

            if app.should_close() {
                break;
            }

            if is_tick {
                canvas.request_redraw();
            }
        }
    }

    info!("Closing");
    Ok(())
}
