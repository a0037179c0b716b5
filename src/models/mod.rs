pub mod availability;
pub mod common;
pub mod image;

pub use availability::*;
pub use common::*;
pub use image::*;
