pub mod event_bus;
pub mod frame;
pub mod resources;
pub mod tracking;

pub use event_bus::*;
pub use frame::*;
pub use resources::*;
pub use tracking::*;
