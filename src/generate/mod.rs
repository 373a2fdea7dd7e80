//! Procedural creature generation.
//!
//! - [`head`]: the parametric head surface and its evaluation grid
//! - [`tentacle`]: the curve walk and tube mesh of a single tentacle
//! - [`assembler`]: placement of tentacles on the head and the combined
//!   [`MeshBuffers`]
//!
//! Most callers only need [`build`]:
//!
//! ```
//! use medusa::config::MedusaConfig;
//! use medusa::generate::build;
//!
//! let buffers = build(&MedusaConfig::default()).unwrap();
//! println!("{} vertices, {} triangles", buffers.num_vertices(), buffers.num_triangles());
//! ```

pub mod assembler;
pub mod head;
pub mod tentacle;

pub use assembler::{build, build_with_progress, MeshBuffers, TentacleAttachment};
pub use head::{eval_head_grid, eval_head_vertex, HeadGrid};
pub use tentacle::{build_tentacle, segment_radius, walk_segment, TentacleSegment};
