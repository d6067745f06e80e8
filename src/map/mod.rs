mod geometry;
mod globe;
mod renderer;

pub use globe::GlobeView;
pub use renderer::{DisplaySettings, GlobeLayers, GlobeRenderer};
