//! Asynchronous model loading.
//!
//! The glTF/GLB asset is decoded on a worker thread into plain CPU data,
//! [`ModelData`], which is sent to the driver thread through the application
//! event queue. The scene nodes themselves are only built on the driver thread.

pub use self::model::{ModelData, ModelNode};

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::event::AppEvent;

mod model;

/// Loads the model at `path`, blocking the calling thread.
pub fn load_model(path: &Path) -> Result<ModelData> {
    let (document, buffers, _images) = gltf::import(path).map_err(|source| Error::ModelLoad {
        path: path.to_path_buf(),
        source,
    })?;

    ModelData::from_document(&document, &buffers)
}

/// Starts loading the model at `path` on a worker thread.
///
/// This is single-shot: on success one [`AppEvent::AssetReady`] is sent, on
/// failure a warning is logged and nothing is sent, leaving the model absent
/// from the scene. Returns `None` if the worker thread could not be started.
pub fn spawn_model_load(path: PathBuf, events: Sender<AppEvent>) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("model-loader".to_owned())
        .spawn(move || match load_model(&path) {
            Ok(model) => {
                info!(
                    "Loaded model {:?}: {} mesh primitive(s)",
                    path,
                    model.num_meshes()
                );

                if events.send(AppEvent::AssetReady(model)).is_err() {
                    warn!("The application exited before the model {path:?} was ready");
                }
            }
            Err(e) => warn!("{e}"),
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to start the model loader thread: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    /// A single triangle, referenced by a translated parent node and a scaled child node.
    pub(crate) const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "mesh": 0, "translation": [0.0, 2.0, 0.0], "children": [1] },
            { "mesh": 0, "scale": [2.0, 2.0, 2.0] }
        ],
        "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] } ],
        "buffers": [ {
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn model_file_is_loaded() {
        let path = write_temp("triangle.gltf", TRIANGLE_GLTF);
        let model = load_model(&path).unwrap();
        assert_eq!(model.num_meshes(), 2);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = load_model(Path::new("/nonexistent/model.glb")).unwrap_err();
        assert!(matches!(err, Error::ModelLoad { .. }));
    }

    #[test]
    fn successful_load_sends_one_asset_event() {
        let path = write_temp("spawned.gltf", TRIANGLE_GLTF);
        let (tx, rx) = mpsc::channel();

        spawn_model_load(path.clone(), tx).unwrap().join().unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AppEvent::AssetReady(_)));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn failed_load_sends_nothing() {
        let (tx, rx) = mpsc::channel();

        spawn_model_load(PathBuf::from("/nonexistent/model.glb"), tx)
            .unwrap()
            .join()
            .unwrap();

        assert!(rx.try_recv().is_err());
    }
}
