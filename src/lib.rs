//! Interactive globe: projects country boundaries onto a sphere, highlights
//! them as meshes, outlines or pins, and turns the globe to face them.

pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod globe;
pub mod hash;
pub mod logging;
pub mod map;
pub mod mesh;
pub mod quiz;
pub mod sphere;
