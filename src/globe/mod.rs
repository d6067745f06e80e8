//! The globe scene node and everything that mutates it: highlights,
//! orientation and the facade that sequences them.

mod facade;
mod highlight;
mod orientation;
mod scene;

pub use facade::{FrameEvent, Globe, SURFACE_ELEVATION};
pub use highlight::{HighlightSet, RegionHighlighter};
pub use orientation::{rotation_between, CompletionHook, OrientationController, OrientationState, Tick};
pub use scene::{GlobeNode, GlobeScene, NodeId};
