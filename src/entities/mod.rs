mod place;

pub use place::{Image, Place};
