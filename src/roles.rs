//! Identification of the lepton and antilepton inside each Z candidate
//!
//! The functions below return the lepton (charge -1) of a pair. Calling them
//! with negated charges returns the antilepton instead.

use crate::{
    error::{checked_get, ensure_count, Result},
    lepton::PARTICLE_CHARGE,
    linalg::momentum::FourMomentum,
    pairing::{flavor_pair_momentum, Pairing, LEPTONS_PER_Z},
};

/// Lepton of a same-flavor pair
///
/// The charge of the first member decides: if it is not -1, the second
/// member is returned.
///
pub fn split_lep_same_kind(
    pair: Pairing,
    momenta: &[FourMomentum],
    charges: &[i32],
) -> Result<FourMomentum> {
    let chosen = if checked_get(charges, pair.first)? == PARTICLE_CHARGE {
        pair.first
    } else {
        pair.second
    };
    checked_get(momenta, chosen)
}

/// Lepton belonging to the heavier Z candidate (Z1) of a 2μ2e event
///
/// The muon pair is only picked if its invariant mass is strictly larger.
///
pub fn lep1(
    mu_momenta: &[FourMomentum],
    el_momenta: &[FourMomentum],
    mu_charges: &[i32],
    el_charges: &[i32],
) -> Result<FourMomentum> {
    ensure_count(mu_charges, LEPTONS_PER_Z)?;
    ensure_count(el_charges, LEPTONS_PER_Z)?;
    let mu_mass = flavor_pair_momentum(mu_momenta)?.mass();
    let el_mass = flavor_pair_momentum(el_momenta)?.mass();
    if mu_mass > el_mass {
        flavor_pair_lepton(mu_momenta, mu_charges)
    } else {
        flavor_pair_lepton(el_momenta, el_charges)
    }
}

/// Lepton belonging to the lighter Z candidate (Z2) of a 2μ2e event
///
/// The muon pair is only picked if its invariant mass is strictly smaller.
///
pub fn lep2(
    mu_momenta: &[FourMomentum],
    el_momenta: &[FourMomentum],
    mu_charges: &[i32],
    el_charges: &[i32],
) -> Result<FourMomentum> {
    ensure_count(mu_charges, LEPTONS_PER_Z)?;
    ensure_count(el_charges, LEPTONS_PER_Z)?;
    let mu_mass = flavor_pair_momentum(mu_momenta)?.mass();
    let el_mass = flavor_pair_momentum(el_momenta)?.mass();
    if mu_mass < el_mass {
        flavor_pair_lepton(mu_momenta, mu_charges)
    } else {
        flavor_pair_lepton(el_momenta, el_charges)
    }
}

/// Lepton of the pair formed by the only two leptons of a flavor
fn flavor_pair_lepton(momenta: &[FourMomentum], charges: &[i32]) -> Result<FourMomentum> {
    split_lep_same_kind(Pairing::new(0, 1), momenta, charges)
}

/// Flip the sign of all charges, turning lepton selection into antilepton
/// selection
pub fn negated(charges: &[i32]) -> Vec<i32> {
    charges.iter().map(|&q| -q).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        pairing::tests::{along_x, four_electrons, MU_MASS},
    };

    #[test]
    fn same_kind_split() {
        let (momenta, charges) = four_electrons();
        let anti = negated(&charges);
        let z_close = Pairing::new(2, 3);
        let z_far = Pairing::new(0, 1);
        assert_eq!(split_lep_same_kind(z_close, &momenta, &charges), Ok(momenta[3]));
        assert_eq!(split_lep_same_kind(z_close, &momenta, &anti), Ok(momenta[2]));
        assert_eq!(split_lep_same_kind(z_far, &momenta, &charges), Ok(momenta[1]));
        assert_eq!(split_lep_same_kind(z_far, &momenta, &anti), Ok(momenta[0]));
    }

    #[test]
    fn same_kind_split_checks_bounds() {
        let (momenta, charges) = four_electrons();
        assert_eq!(
            split_lep_same_kind(Pairing::new(5, 1), &momenta, &charges),
            Err(Error::IndexOutOfRange { index: 5, len: 4 })
        );
    }

    /// Light muon pair and heavy electron pair
    fn two_muons_two_electrons() -> (Vec<FourMomentum>, Vec<FourMomentum>) {
        let (electrons, _) = four_electrons();
        let muons = vec![along_x(10., MU_MASS), along_x(-15., MU_MASS)];
        (muons, electrons[2..].to_vec())
    }

    #[test]
    fn heavy_pair_lepton() {
        let (muons, electrons) = two_muons_two_electrons();
        let mu_q = [-1, 1];
        let el_q = [1, -1];
        assert_eq!(lep1(&muons, &electrons, &mu_q, &el_q), Ok(electrons[1]));
        assert_eq!(
            lep1(&muons, &electrons, &negated(&mu_q), &negated(&el_q)),
            Ok(electrons[0])
        );
    }

    #[test]
    fn light_pair_lepton() {
        let (muons, electrons) = two_muons_two_electrons();
        let mu_q = [-1, 1];
        let el_q = [1, -1];
        assert_eq!(lep2(&muons, &electrons, &mu_q, &el_q), Ok(muons[0]));
        assert_eq!(
            lep2(&muons, &electrons, &negated(&mu_q), &negated(&el_q)),
            Ok(muons[1])
        );
    }

    #[test]
    fn equal_pair_masses_favor_electrons() {
        let muons = vec![along_x(20., 0.), along_x(-20., 0.)];
        let electrons = vec![along_x(-20., 0.), along_x(20., 0.)];
        let q = [-1, 1];
        assert_eq!(lep1(&muons, &electrons, &q, &q), Ok(electrons[0]));
        assert_eq!(lep2(&muons, &electrons, &q, &q), Ok(electrons[0]));
    }

    #[test]
    fn wrong_multiplicity() {
        let (muons, electrons) = two_muons_two_electrons();
        assert_eq!(
            lep1(&muons[..1], &electrons, &[-1], &[1, -1]),
            Err(Error::LeptonCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            lep2(&muons, &electrons, &[-1, 1], &[1]),
            Err(Error::LeptonCount {
                expected: 2,
                found: 1
            })
        );
    }
}
