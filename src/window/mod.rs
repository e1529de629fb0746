//! The window abstraction.

pub use self::canvas::Canvas;
pub use self::pacer::{FramePacer, DEFAULT_REFRESH_RATE_HZ};

mod canvas;
mod pacer;
