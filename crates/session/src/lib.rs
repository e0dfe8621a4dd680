//! Client-side state for the Facewatch console.
//!
//! Holds the shared subjects cache and one session object per view
//! (dashboard, archive, new analysis, training). Sessions call the
//! [`FaceGateway`](facewatch_gateway::FaceGateway), feed the answers through
//! the pure logic in `facewatch_core`, and expose snapshots for rendering.

pub mod analysis;
pub mod archive;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod subjects;
pub mod training;

pub use context::FacewatchContext;
pub use error::FlowError;
