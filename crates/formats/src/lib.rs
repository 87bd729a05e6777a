pub mod city_batch;
pub mod typeface;

pub use city_batch::*;
pub use typeface::*;
