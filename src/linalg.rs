//! Some shared linear algebra concepts

pub mod momentum;

use crate::numeric::Float;
use nalgebra::SVector;

/// Number of spatial dimensions
pub const SPACE_DIM: usize = 3;

/// Euclidean 3-vector (spatial momenta, boost velocities, plane normals)
pub type ThreeVector = SVector<Float, SPACE_DIM>;

/// Unit vector along the beam (z) axis
pub fn beam_axis() -> ThreeVector {
    ThreeVector::new(0., 0., 1.)
}
