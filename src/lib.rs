/*!
# halftone3d

A small interactive 3D scene drawn with a stylized halftone shader.

A torus knot and a sphere spin slowly in front of an orbiting camera, joined
by a glTF model once it finishes loading in the background. Every object
shares one material whose parameters can be tuned live from a debug panel:

* the base colour of the surfaces,
* the number of shadow dots and their colour,
* the number of light dots and their colour,
* the colour the frame is cleared to.

Shading goes through the halftone program: a lit base colour over which two
screen-space dot grids are blended, one growing in the shadows and one on the
highlights.

```no_run
use halftone3d::prelude::*;

fn main() -> Result<()> {
    let args = Args::parse_from(["halftone3d", "--grid-size", "80"]);
    run(args)
}
```

Some controls are handled by default:

* `left click + drag`: orbit around the origin.
* `right click + drag`: pan.
* `scroll`: zoom in / zoom out.
* `escape`: close the window.

Input over the debug panel goes to the panel only.

The scene logic lives in [`App`](app::App), which consumes [`AppEvent`](event::AppEvent)s
one at a time and draws through the [`Renderer`](renderer::Renderer) trait, so it can be
driven without a GPU.
*/
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

pub use glamx;

pub mod animation;
pub mod app;
pub mod builtin;
pub mod camera;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod loader;
pub mod panel;
pub mod procedural;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod viewport;
pub mod window;

pub mod prelude {
    pub use crate::animation::*;
    pub use crate::app::*;
    pub use crate::camera::*;
    pub use crate::color::*;
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::loader::*;
    pub use crate::panel::*;
    pub use crate::procedural::*;
    pub use crate::renderer::*;
    pub use crate::resource::*;
    pub use crate::scene::*;
    pub use crate::viewport::*;
    pub use clap::Parser;
    pub use glamx::{Mat3, Mat4, Quat, Vec2, Vec3};
    pub use std::cell::RefCell;
    pub use std::rc::Rc;
}
