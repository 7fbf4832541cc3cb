//! Backend-agnostic rendering
//!
//! The simulation is consumed read-only and turned into one flat list of
//! colored triangles, ready for upload to any 2D pipeline.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::build_frame;
pub use vertex::Vertex;
