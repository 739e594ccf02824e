//! Production and decay angles of the H → ZZ → 4ℓ topology
//!
//! Angle definitions follow [Phys. Rev. D 86, 095031 (2012)]. The geometric
//! primitives expect vectors which were already boosted into the right rest
//! frame, and `DecayAngles::new` performs that sequence of boosts.
//!
//! Degenerate geometry (parallel vectors in a cross product, null vectors)
//! is not guarded against. The resulting NaNs propagate to the caller.
//!
//! [Phys. Rev. D 86, 095031 (2012)]: https://doi.org/10.1103/PhysRevD.86.095031

use crate::{
    linalg::{beam_axis, momentum::FourMomentum, ThreeVector},
    numeric::{functions::unit_sign, Float},
};
use prefix_num_ops::real::acos;

// ### GEOMETRIC PRIMITIVES ###

/// Express a 4-momentum in the frame which moves at velocity `boost` (in
/// units of c) with respect to the current frame
pub fn boost_fourvec(momentum: &FourMomentum, boost: &ThreeVector) -> FourMomentum {
    momentum.boost(&-boost)
}

/// Unit vector along vec1 × vec2
///
/// Parallel inputs yield a vector of NaNs.
///
pub fn cross_norm(vec1: &ThreeVector, vec2: &ThreeVector) -> ThreeVector {
    let cross = vec1.cross(vec2);
    cross / cross.norm()
}

/// Signed angle between two unit vectors, oriented by a momentum
///
/// The sign is that of momentum·(vec1 × vec2), the magnitude is
/// acos(vec1·vec2). `vec1` and `vec2` are not normalized here.
///
pub fn def_phi(momentum: &ThreeVector, vec1: &ThreeVector, vec2: &ThreeVector) -> Float {
    unit_sign(momentum.dot(&vec1.cross(vec2))) * acos(vec1.dot(vec2))
}

/// Polar decay angle: acos(-vec1·vec2 / (|vec1| |vec2|))
pub fn def_theta(vec1: &ThreeVector, vec2: &ThreeVector) -> Float {
    acos(def_cos_theta(vec1, vec2))
}

/// Cosine of the polar decay angle: -vec1·vec2 / (|vec1| |vec2|)
pub fn def_cos_theta(vec1: &ThreeVector, vec2: &ThreeVector) -> Float {
    -vec1.dot(vec2) / (vec1.norm() * vec2.norm())
}

// ### FULL ANGULAR ANALYSIS ###

/// Reconstructed H → Z1 Z2 → 4ℓ decay chain, in the laboratory frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayChain {
    /// Higgs candidate (Z1 + Z2)
    pub higgs: FourMomentum,

    /// Heavier Z candidate
    pub z1: FourMomentum,

    /// Lighter Z candidate
    pub z2: FourMomentum,

    /// Lepton (charge -1) from Z1
    pub lep11: FourMomentum,

    /// Antilepton (charge +1) from Z1
    pub lep12: FourMomentum,

    /// Lepton (charge -1) from Z2
    pub lep21: FourMomentum,

    /// Antilepton (charge +1) from Z2
    pub lep22: FourMomentum,
}

/// The five angles which discriminate between spin-parity hypotheses, along
/// with the cosines of the polar ones
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayAngles {
    /// Polar angle of Z1 with respect to the beam axis, in the Higgs frame
    pub theta_star: Float,

    /// Cosine of theta_star
    pub cos_theta_star: Float,

    /// Angle between the Z1 and Z2 decay planes, in the Higgs frame
    pub phi: Float,

    /// Angle between the Z1 decay plane and the production plane
    pub phi1: Float,

    /// Decay angle of the Z1 lepton, in the Z1 frame
    pub theta1: Float,

    /// Cosine of theta1
    pub cos_theta1: Float,

    /// Decay angle of the Z2 lepton, in the Z2 frame
    pub theta2: Float,

    /// Cosine of theta2
    pub cos_theta2: Float,
}
//
impl DecayAngles {
    /// Compute the angles of a reconstructed decay chain
    pub fn new(chain: &DecayChain) -> Self {
        // Higgs rest frame
        let h_boost = chain.higgs.boost_vector();
        let z1_h = boost_fourvec(&chain.z1, &h_boost).vect();
        let lep11_h = boost_fourvec(&chain.lep11, &h_boost).vect();
        let lep12_h = boost_fourvec(&chain.lep12, &h_boost).vect();
        let lep21_h = boost_fourvec(&chain.lep21, &h_boost).vect();
        let lep22_h = boost_fourvec(&chain.lep22, &h_boost).vect();

        // Z1 rest frame
        let z1_boost = chain.z1.boost_vector();
        let z2_z1 = boost_fourvec(&chain.z2, &z1_boost).vect();
        let lep11_z1 = boost_fourvec(&chain.lep11, &z1_boost).vect();

        // Z2 rest frame
        let z2_boost = chain.z2.boost_vector();
        let z1_z2 = boost_fourvec(&chain.z1, &z2_boost).vect();
        let lep21_z2 = boost_fourvec(&chain.lep21, &z2_boost).vect();

        // Normals to the decay planes and to the production plane
        let n1 = cross_norm(&lep11_h, &lep12_h);
        let n2 = cross_norm(&lep21_h, &lep22_h);
        let n_coll = cross_norm(&beam_axis(), &z1_h);

        let cos_theta_star = z1_h.z / z1_h.norm();
        let cos_theta1 = def_cos_theta(&z2_z1, &lep11_z1);
        let cos_theta2 = def_cos_theta(&z1_z2, &lep21_z2);
        Self {
            theta_star: acos(cos_theta_star),
            cos_theta_star,
            phi: def_phi(&z1_h, &n2, &-n1),
            phi1: def_phi(&z1_h, &n1, &n_coll),
            theta1: acos(cos_theta1),
            cos_theta1,
            theta2: acos(cos_theta2),
            cos_theta2,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::numeric::{
        floats::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI},
        functions::sqr,
    };
    use approx::assert_relative_eq;

    const EL_MASS: Float = 0.511e-3;

    /// Absolute tolerance on angles computed through a chain of boosts
    fn angle_tolerance() -> Float {
        Float::EPSILON.sqrt()
    }

    fn el0() -> FourMomentum {
        FourMomentum::new(10., 0., 0., (sqr(EL_MASS) + 100.).sqrt())
    }

    #[test]
    fn longitudinal_boost() {
        let beta: Float = 0.5;
        let gamma = 1. / (1. - sqr(beta)).sqrt();
        let p = el0();
        let boosted = boost_fourvec(&p, &ThreeVector::new(beta, 0., 0.));
        let expected = FourMomentum::new(
            gamma * (p.px() - beta * p.e()),
            0.,
            0.,
            gamma * (p.e() - beta * p.px()),
        );
        assert_relative_eq!(
            (boosted - expected).as_vector().norm(),
            0.,
            epsilon = 100. * Float::EPSILON * p.e()
        );
    }

    #[test]
    fn transverse_boost() {
        let beta: Float = 0.5;
        let gamma = 1. / (1. - sqr(beta)).sqrt();
        let p = el0();
        let boosted = boost_fourvec(&p, &ThreeVector::new(0., beta, 0.));
        let expected = FourMomentum::new(p.px(), -gamma * beta * p.e(), 0., gamma * p.e());
        assert_relative_eq!(
            (boosted - expected).as_vector().norm(),
            0.,
            epsilon = 100. * Float::EPSILON * p.e()
        );
    }

    #[test]
    fn boost_round_trip() {
        let p = FourMomentum::new(12., -7., 30., 40.);
        let beta = ThreeVector::new(0.3, -0.2, 0.6);
        let back = boost_fourvec(&boost_fourvec(&p, &beta), &-beta);
        assert_relative_eq!(
            (back - p).as_vector().norm(),
            0.,
            epsilon = 1e3 * Float::EPSILON * p.e()
        );
    }

    #[test]
    fn cross_product_normalization() {
        let n = cross_norm(&ThreeVector::new(0.5, 0., 0.), &ThreeVector::new(0., 0.5, 0.));
        assert_relative_eq!(n, ThreeVector::new(0., 0., 1.));
        let parallel = cross_norm(&ThreeVector::new(1., 0., 0.), &ThreeVector::new(2., 0., 0.));
        assert!(parallel.iter().all(|c| c.is_nan()));
    }

    #[test]
    fn signed_phi() {
        let v1 = ThreeVector::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.);
        let v2 = ThreeVector::new(1., 0., 0.);
        let p = ThreeVector::new(0., 0., FRAC_1_SQRT_2);
        assert_relative_eq!(def_phi(&p, &v1, &v2), -FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(def_phi(&-p, &v1, &v2), FRAC_PI_4, epsilon = 1e-12);
        // Momentum within the (v1, v2) plane: undefined sign
        assert!(def_phi(&v2, &v1, &v2).is_nan());
    }

    #[test]
    fn polar_angles() {
        let v4 = ThreeVector::new(0., 1., 1.);
        let v5 = ThreeVector::new(1., 1., 0.);
        assert_relative_eq!(def_theta(&v4, &v5), 2. / 3. * PI, epsilon = 1e-12);
        assert_relative_eq!(def_cos_theta(&v4, &v5), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn cos_theta_of_aligned_vectors() {
        let v = ThreeVector::new(0.36, 0.48, 0.8);
        assert_relative_eq!(def_cos_theta(&v, &v), -1., epsilon = 1e-12);
        assert_relative_eq!(def_cos_theta(&v, &-v), 1., epsilon = 1e-12);
        assert!(def_cos_theta(&v, &ThreeVector::zeros()).is_nan());
    }

    /// Two-body decay momentum of a particle of mass m into masses m1 and m2
    fn two_body_momentum(m: Float, m1: Float, m2: Float) -> Float {
        ((sqr(m) - sqr(m1 + m2)) * (sqr(m) - sqr(m1 - m2))).sqrt() / (2. * m)
    }

    /// Massless back-to-back leptons in the rest frame of a Z, brought back to
    /// the frame where the Z has 4-momentum `z`
    fn z_decay(z: &FourMomentum, lepton_dir: &ThreeVector) -> (FourMomentum, FourMomentum) {
        let half_mass = z.mass() / 2.;
        let lepton = FourMomentum::from_vect(&(half_mass * lepton_dir), half_mass);
        let antilepton = FourMomentum::from_vect(&(-half_mass * lepton_dir), half_mass);
        let z_boost = z.boost_vector();
        (lepton.boost(&z_boost), antilepton.boost(&z_boost))
    }

    /// Higgs decaying at rest with Z1 flying along `d`
    ///
    /// The Z1 lepton is emitted at angle theta1 from d in the (d, u) plane,
    /// and the Z2 lepton at angle theta2 from -d, in a plane rotated by psi
    /// around d.
    ///
    pub fn decay_chain(theta1: Float, theta2: Float, psi: Float) -> DecayChain {
        let (m_h, m_1, m_2) = (125., 90., 30.);
        let q = two_body_momentum(m_h, m_1, m_2);
        let d = ThreeVector::new(0.6, 0., 0.8);
        let u = ThreeVector::new(0., 1., 0.);
        let w = d.cross(&u);
        let v = psi.cos() * u + psi.sin() * w;
        let z1 = FourMomentum::from_vect(&(q * d), (sqr(q) + sqr(m_1)).sqrt());
        let z2 = FourMomentum::from_vect(&(-q * d), (sqr(q) + sqr(m_2)).sqrt());
        let dir11 = theta1.cos() * d + theta1.sin() * u;
        let dir21 = -theta2.cos() * d + theta2.sin() * v;
        let (lep11, lep12) = z_decay(&z1, &dir11);
        let (lep21, lep22) = z_decay(&z2, &dir21);
        DecayChain {
            higgs: z1 + z2,
            z1,
            z2,
            lep11,
            lep12,
            lep21,
            lep22,
        }
    }

    #[test]
    fn angles_of_a_known_decay() {
        let angles = DecayAngles::new(&decay_chain(1.0, 0.4, 0.7));
        let tolerance = angle_tolerance();
        assert_relative_eq!(angles.cos_theta_star, 0.8, epsilon = tolerance);
        assert_relative_eq!(angles.theta_star, (0.8 as Float).acos(), epsilon = tolerance);
        assert_relative_eq!(angles.theta1, 1.0, epsilon = tolerance);
        assert_relative_eq!(angles.cos_theta1, (1.0 as Float).cos(), epsilon = tolerance);
        assert_relative_eq!(angles.theta2, 0.4, epsilon = tolerance);
        assert_relative_eq!(angles.cos_theta2, (0.4 as Float).cos(), epsilon = tolerance);
        assert_relative_eq!(angles.phi, -0.7, epsilon = tolerance);
        assert_relative_eq!(angles.phi1, FRAC_PI_2, epsilon = tolerance);
    }

    #[test]
    fn phi_follows_decay_plane_rotation() {
        for &psi in &[0.3, 1.2, 2.5] {
            let angles = DecayAngles::new(&decay_chain(0.8, 1.9, psi));
            assert_relative_eq!(angles.phi, -psi, epsilon = angle_tolerance());
        }
    }

    #[test]
    fn degenerate_production_plane() {
        // Z1 flying along the beam: the production plane is undefined
        let base = decay_chain(1.0, 0.4, 0.7);
        let z1 = FourMomentum::new(0., 0., 20., 100.);
        let z2 = FourMomentum::new(0., 0., -20., 60.);
        let (lep11, lep12) = z_decay(&z1, &ThreeVector::new(1., 0., 0.));
        let chain = DecayChain {
            higgs: z1 + z2,
            z1,
            z2,
            lep11,
            lep12,
            ..base
        };
        let angles = DecayAngles::new(&chain);
        assert_relative_eq!(angles.cos_theta_star, 1., epsilon = 1e-12);
        assert!(angles.phi1.is_nan());
    }
}
