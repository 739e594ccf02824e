//! Reconstruction of the two Z boson candidates from four leptons
//!
//! Two orderings of the Z candidates coexist in the analysis and must not be
//! confused:
//!
//! - The *closeness* ordering puts first the candidate whose invariant mass is
//!   closest to the nominal Z mass. Pairing selection produces it.
//! - The *heavy-first* ordering puts first the candidate of larger invariant
//!   mass (Z1, as opposed to Z2). Angle definitions rely on it.

use crate::{
    error::{checked_get, ensure_count, Error, Result},
    lepton::PARTICLE_CHARGE,
    linalg::momentum::FourMomentum,
    numeric::Float,
};
use prefix_num_ops::real::abs;
use tracing::trace;

/// Reference Z⁰ boson mass (GeV), only used for distance comparisons
pub const Z_MASS: Float = 91.2;

/// Number of leptons building the ZZ system
pub const NUM_LEPTONS: usize = 4;

/// Number of leptons building one Z candidate
pub const LEPTONS_PER_Z: usize = 2;

/// All ways to pick 2 leptons out of 4, in enumeration order
///
/// The pair at index `k` and the pair at index `5 - k` are complementary.
///
const LEPTON_PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Distance of a candidate's invariant mass to the nominal Z mass
pub fn z_distance(candidate: &FourMomentum) -> Float {
    abs(candidate.mass() - Z_MASS)
}

// ### INDEX-LEVEL TOPOLOGY ###

/// Two lepton indices building one Z candidate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pairing {
    /// Index of the first lepton
    pub first: usize,

    /// Index of the second lepton
    pub second: usize,
}
//
impl Pairing {
    /// Pair up two distinct leptons
    pub fn new(first: usize, second: usize) -> Self {
        debug_assert_ne!(first, second, "A lepton cannot be paired with itself");
        Self { first, second }
    }

    /// Truth that a lepton belongs to this pair
    pub fn contains(&self, index: usize) -> bool {
        self.first == index || self.second == index
    }

    /// 4-momentum of the di-lepton system
    pub fn momentum(&self, momenta: &[FourMomentum]) -> Result<FourMomentum> {
        Ok(checked_get(momenta, self.first)? + checked_get(momenta, self.second)?)
    }
}

/// Lepton indices of both Z candidates of an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventTopology {
    /// Pair building the first Z candidate
    pub z1: Pairing,

    /// Pair building the second Z candidate
    pub z2: Pairing,
}
//
impl EventTopology {
    /// Assemble a topology from two pairs
    pub fn new(z1: Pairing, z2: Pairing) -> Self {
        Self { z1, z2 }
    }

    /// Both pairs, in order
    pub fn pairs(&self) -> [Pairing; 2] {
        [self.z1, self.z2]
    }

    /// Same pairs, in the opposite order
    pub fn reversed(self) -> Self {
        Self::new(self.z2, self.z1)
    }
}

// ### PAIRING SELECTION ###

/// Count the +1 and -1 charges of a set of leptons
fn charge_split(charges: &[i32]) -> (usize, usize) {
    let negative = charges.iter().filter(|&&q| q == PARTICLE_CHARGE).count();
    let positive = charges.iter().filter(|&&q| q == -PARTICLE_CHARGE).count();
    (positive, negative)
}

/// Find the pair of same-flavor leptons whose invariant mass is closest to
/// the Z mass, and build the second Z candidate from the remaining leptons.
///
/// Only opposite-charge pairs are considered. On an exact tie in distance,
/// the pair enumerated first in (0,1), (0,2), (0,3), (1,2), (1,3), (2,3)
/// order wins.
///
pub fn z_idx_same_kind(momenta: &[FourMomentum], charges: &[i32]) -> Result<EventTopology> {
    ensure_count(momenta, NUM_LEPTONS)?;
    ensure_count(charges, NUM_LEPTONS)?;
    let (positive, negative) = charge_split(charges);
    if positive != 2 || negative != 2 {
        return Err(Error::ChargeSplit { positive, negative });
    }

    let mut best: Option<(usize, Float)> = None;
    for (pair_idx, &(i1, i2)) in LEPTON_PAIRS.iter().enumerate() {
        if charges[i1] == charges[i2] {
            continue;
        }
        let distance = z_distance(&(momenta[i1] + momenta[i2]));
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((pair_idx, distance));
        }
    }
    let (best_idx, _) = best.ok_or(Error::NoOppositeChargePair)?;

    let (z1_first, z1_second) = LEPTON_PAIRS[best_idx];
    let (z2_first, z2_second) = LEPTON_PAIRS[LEPTON_PAIRS.len() - 1 - best_idx];
    let topology = EventTopology::new(
        Pairing::new(z1_first, z1_second),
        Pairing::new(z2_first, z2_second),
    );
    trace!(?topology, "Selected same-flavor pairing");
    Ok(topology)
}

// ### Z CANDIDATE 4-MOMENTA ###

/// Order two Z candidates by increasing distance to the Z mass
///
/// The candidates are only swapped when the second one is strictly closer, so
/// an exact tie preserves the input order.
///
pub fn order_by_z_distance(candidates: [FourMomentum; 2]) -> [FourMomentum; 2] {
    let [first, second] = candidates;
    if z_distance(&second) < z_distance(&first) {
        [second, first]
    } else {
        candidates
    }
}

/// Reconstruct the two Z 4-momenta of a same-flavor event, closeness-ordered
pub fn z_momenta_same_kind(
    topology: &EventTopology,
    momenta: &[FourMomentum],
) -> Result<[FourMomentum; 2]> {
    Ok(order_by_z_distance([
        topology.z1.momentum(momenta)?,
        topology.z2.momentum(momenta)?,
    ]))
}

/// Reconstruct the two Z 4-momenta of a 2μ2e event, closeness-ordered
///
/// With exactly two leptons of each flavor, each Z is built from the two
/// leptons of one flavor and no combinatorics is needed.
///
pub fn z_momenta_mixed(
    mu_momenta: &[FourMomentum],
    el_momenta: &[FourMomentum],
) -> Result<[FourMomentum; 2]> {
    Ok(order_by_z_distance([
        flavor_pair_momentum(mu_momenta)?,
        flavor_pair_momentum(el_momenta)?,
    ]))
}

/// 4-momentum of the only pair that two same-flavor leptons can build
pub(crate) fn flavor_pair_momentum(momenta: &[FourMomentum]) -> Result<FourMomentum> {
    ensure_count(momenta, LEPTONS_PER_Z)?;
    Ok(momenta[0] + momenta[1])
}

// ### HEAVY-FIRST ORDERING ###

/// Order a topology so that its first pair builds the heavier Z candidate
///
/// `candidates` must hold the 4-momenta of `topology`'s pairs, in the same
/// order. The topology is kept as-is only if the first candidate is strictly
/// heavier.
///
pub fn order_idx_z(topology: EventTopology, candidates: &[FourMomentum; 2]) -> EventTopology {
    if candidates[0].mass() > candidates[1].mass() {
        topology
    } else {
        topology.reversed()
    }
}

/// Heavier of two Z candidates (Z1)
///
/// The first candidate is only picked if it is strictly heavier, so on an
/// exact mass tie the second candidate is returned.
///
pub fn z_heavy(candidates: &[FourMomentum; 2]) -> FourMomentum {
    if candidates[0].mass() > candidates[1].mass() {
        candidates[0]
    } else {
        candidates[1]
    }
}

/// Lighter of two Z candidates (Z2)
///
/// The first candidate is only picked if it is strictly lighter, so on an
/// exact mass tie the second candidate is returned.
///
pub fn z_light(candidates: &[FourMomentum; 2]) -> FourMomentum {
    if candidates[0].mass() < candidates[1].mass() {
        candidates[0]
    } else {
        candidates[1]
    }
}
