//! Basic numerical concepts used throughout the crate

#![allow(missing_docs)]

// Floating-point precision is configured here
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f32")]
pub use std::f32 as floats;
#[cfg(not(feature = "f32"))]
pub type Float = f64;
#[cfg(not(feature = "f32"))]
pub use std::f64 as floats;

/// Mathematical functions
pub mod functions {
    use super::Float;

    /// Square of a real number
    pub fn sqr(x: Float) -> Float {
        x * x
    }

    /// Sign of a real number, computed as x/|x| so that zero gives NaN
    pub fn unit_sign(x: Float) -> Float {
        x / x.abs()
    }
}
