pub mod common;
pub mod design;
pub mod image;

pub use common::*;
pub use design::*;
pub use image::*;
