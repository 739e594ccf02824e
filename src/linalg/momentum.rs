//! This module implements some domain-specific 4-momentum handling logic.

use crate::{
    linalg::ThreeVector,
    numeric::{functions::sqr, Float},
};
use nalgebra::SVector;
use num_traits::Zero;
use prefix_num_ops::real::{cos, ln, sin, sinh, sqrt};
use std::{
    fmt::{self, Display},
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
};

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Raw storage of a 4-momentum
pub type MomentumVector = SVector<Float, MOMENTUM_DIM>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Pseudorapidity reported for momenta lying on the beam axis
const BEAM_AXIS_ETA: Float = 10e10;

/// Relativistic 4-momentum (px, py, pz, E)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourMomentum(MomentumVector);
//
impl FourMomentum {
    // ### CONSTRUCTION ###

    /// Build a 4-momentum from its cartesian coordinates
    pub fn new(px: Float, py: Float, pz: Float, e: Float) -> Self {
        Self(MomentumVector::new(px, py, pz, e))
    }

    /// Build a 4-momentum from a spatial momentum and an energy
    pub fn from_vect(p: &ThreeVector, e: Float) -> Self {
        Self::new(p[X], p[Y], p[Z], e)
    }

    /// Build a 4-momentum from collider coordinates (pt, eta, phi, mass)
    ///
    /// A negative mass is interpreted as a space-like vector, and the energy
    /// is then clamped at zero.
    ///
    pub fn from_pt_eta_phi_m(pt: Float, eta: Float, phi: Float, mass: Float) -> Self {
        let px = pt * cos(phi);
        let py = pt * sin(phi);
        let pz = pt * sinh(eta);
        let p2 = sqr(px) + sqr(py) + sqr(pz);
        let e = if mass >= 0. {
            sqrt(p2 + sqr(mass))
        } else {
            sqrt((p2 - sqr(mass)).max(0.))
        };
        Self::new(px, py, pz, e)
    }

    // ### COORDINATES ###

    /// Access the raw coordinate vector
    pub fn as_vector(&self) -> &MomentumVector {
        &self.0
    }

    /// X component of the momentum
    pub fn px(&self) -> Float {
        self.0[X]
    }

    /// Y component of the momentum
    pub fn py(&self) -> Float {
        self.0[Y]
    }

    /// Z (beam axis) component of the momentum
    pub fn pz(&self) -> Float {
        self.0[Z]
    }

    /// Energy
    pub fn e(&self) -> Float {
        self.0[E]
    }

    /// Spatial part of the 4-momentum
    pub fn vect(&self) -> ThreeVector {
        self.0.fixed_rows::<3>(X).into_owned()
    }

    // ### DERIVED QUANTITIES ###

    /// Norm of the spatial momentum
    pub fn p(&self) -> Float {
        self.vect().norm()
    }

    /// Transverse momentum
    pub fn pt(&self) -> Float {
        sqrt(sqr(self.px()) + sqr(self.py()))
    }

    /// Azimuthal angle, in ]-π, π], zero for a vector along the beam axis
    pub fn phi(&self) -> Float {
        if self.px() == 0. && self.py() == 0. {
            0.
        } else {
            self.py().atan2(self.px())
        }
    }

    /// Pseudorapidity
    pub fn eta(&self) -> Float {
        let p = self.p();
        let cos_theta = if p == 0. { 1. } else { self.pz() / p };
        if sqr(cos_theta) < 1. {
            -0.5 * ln((1. - cos_theta) / (1. + cos_theta))
        } else if self.pz() == 0. {
            0.
        } else if self.pz() > 0. {
            BEAM_AXIS_ETA
        } else {
            -BEAM_AXIS_ETA
        }
    }

    /// Squared invariant mass E² - |p|²
    pub fn mass2(&self) -> Float {
        sqr(self.e()) - self.vect().norm_squared()
    }

    /// Invariant mass √(E² - |p|²), negative for space-like vectors
    pub fn mass(&self) -> Float {
        let m2 = self.mass2();
        if m2 < 0. {
            -sqrt(-m2)
        } else {
            sqrt(m2)
        }
    }

    /// Velocity (in units of c) of the frame in which this momentum is at rest
    pub fn boost_vector(&self) -> ThreeVector {
        self.vect() / self.e()
    }

    // ### LORENTZ TRANSFORMATIONS ###

    /// Apply a Lorentz boost of velocity `beta` (in units of c)
    pub fn boost(&self, beta: &ThreeVector) -> Self {
        let b2 = beta.norm_squared();
        let gamma = 1. / sqrt(1. - b2);
        let bp = beta.dot(&self.vect());
        let gamma2 = if b2 > 0. { (gamma - 1.) / b2 } else { 0. };
        let p = self.vect() + (gamma2 * bp + gamma * self.e()) * beta;
        Self::from_vect(&p, gamma * (self.e() + bp))
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for FourMomentum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for FourMomentum {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Zero for FourMomentum {
    fn zero() -> Self {
        Self(MomentumVector::zeros())
    }

    fn is_zero(&self) -> bool {
        self.0.iter().all(|&coord| coord == 0.)
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Display for FourMomentum {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "(px={}, py={}, pz={}, E={})",
            self.px(),
            self.py(),
            self.pz(),
            self.e()
        )
    }
}
