//! Per-frame terrain visibility: camera matrices, frustum extraction and
//! the cell classification loop that feeds the draw submission.

pub mod camera;
pub mod driver;
pub mod frustum;

pub use camera::Camera;
pub use driver::{FramePhase, FrameStats, TerrainRenderDriver, VisibleCell};
pub use frustum::Frustum;
