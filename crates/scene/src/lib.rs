pub mod components;
pub mod entity;
pub mod markers;
pub mod prefabs;
pub mod registry;
pub mod world;

pub use markers::*;
pub use registry::*;
pub use world::*;
