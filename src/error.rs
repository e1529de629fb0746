//! Errors raised while setting up the scene.
//!
//! Once the render loop runs, nothing on the per-frame path returns an error:
//! uniform writes and resizes are infallible, and a model that fails to load
//! simply never shows up.

use std::path::PathBuf;

/// Errors produced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model asset could not be read or parsed.
    #[error("failed to load model {path:?}: {source}")]
    ModelLoad {
        /// Path of the asset.
        path: PathBuf,
        /// Underlying glTF error.
        #[source]
        source: gltf::Error,
    },
    /// A mesh primitive of the model has no vertex positions.
    #[error("mesh {mesh} primitive {primitive} has no POSITION attribute")]
    MissingPositions {
        /// Mesh index in the glTF document.
        mesh: usize,
        /// Primitive index within the mesh.
        primitive: usize,
    },
    /// The OS event loop could not be created.
    #[error("failed to create the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// The window could not be created.
    #[error("failed to create the window: {0}")]
    Window(#[from] winit::error::OsError),
    /// The drawing surface could not be created.
    #[error("failed to create the drawing surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    /// No suitable GPU adapter was found.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    /// The GPU device could not be created.
    #[error("failed to create the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
