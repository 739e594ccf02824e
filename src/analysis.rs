//! Reconstruction of the H → ZZ → 4ℓ decay chain of one event
//!
//! This ties together the preselection, Z candidate pairing, mass windows,
//! lepton role assignment and angle computation. Every cut which an event
//! goes through is recorded in the caller's cut flow.

use crate::{
    angles::{DecayAngles, DecayChain},
    cutflow::CutFlow,
    error::Result,
    evcut::EventCut,
    event::{FinalState, FourLeptonEvent},
    lepton::Flavor,
    linalg::momentum::FourMomentum,
    numeric::Float,
    pairing::{
        order_idx_z, z_heavy, z_idx_same_kind, z_light, z_momenta_mixed, z_momenta_same_kind,
        EventTopology,
    },
    roles::{lep1, lep2, negated, split_lep_same_kind},
};
use tracing::trace;

/// Fully reconstructed event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reconstruction {
    /// Final state which the event was reconstructed as
    pub final_state: FinalState,

    /// Lepton indices of the Z candidates, heavier candidate first
    ///
    /// Only same-flavor final states have a combinatorial pairing.
    ///
    pub topology: Option<EventTopology>,

    /// Z candidates, ordered by increasing distance to the nominal Z mass
    pub z_closest: [FourMomentum; 2],

    /// Higgs candidate, Z candidates and leptons in heavy-first order
    pub chain: DecayChain,

    /// Production and decay angles
    pub angles: DecayAngles,
}
//
impl Reconstruction {
    /// Mass, pT, η and φ of the Higgs and Z candidates
    pub fn summary(&self) -> Kinematics {
        Kinematics {
            higgs: (&self.chain.higgs).into(),
            z1: (&self.chain.z1).into(),
            z2: (&self.chain.z2).into(),
            z_close: (&self.z_closest[0]).into(),
            z_far: (&self.z_closest[1]).into(),
        }
    }
}

/// Basic kinematic quantities of a reconstructed candidate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateKinematics {
    /// Invariant mass (GeV)
    pub mass: Float,

    /// Transverse momentum (GeV)
    pub pt: Float,

    /// Pseudorapidity
    pub eta: Float,

    /// Azimuthal angle (rad)
    pub phi: Float,
}
//
impl From<&FourMomentum> for CandidateKinematics {
    fn from(p: &FourMomentum) -> Self {
        Self {
            mass: p.mass(),
            pt: p.pt(),
            eta: p.eta(),
            phi: p.phi(),
        }
    }
}

/// Kinematic summary of the Higgs and Z candidates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    /// Higgs candidate
    pub higgs: CandidateKinematics,

    /// Heavier Z candidate
    pub z1: CandidateKinematics,

    /// Lighter Z candidate
    pub z2: CandidateKinematics,

    /// Z candidate closest to the nominal Z mass
    pub z_close: CandidateKinematics,

    /// Other Z candidate
    pub z_far: CandidateKinematics,
}

/// Leptons of the decay chain, as (lep11, lep12, lep21, lep22)
type ChainLeptons = [FourMomentum; 4];

/// Reconstruct one event as the requested final state
///
/// Returns `Ok(None)` if the event was rejected by a cut, and an error if the
/// event data violates the input contract (e.g. ragged lepton arrays).
///
pub fn reconstruct(
    event: &FourLeptonEvent,
    final_state: FinalState,
    cut: &EventCut,
    flow: &mut CutFlow,
) -> Result<Option<Reconstruction>> {
    if !cut.preselect(event, final_state, flow)? {
        return Ok(None);
    }

    let pairing = match final_state.same_flavor() {
        Some(flavor) => pair_same_kind(event, flavor, cut, flow)?,
        None => pair_mixed(event, cut, flow)?,
    };
    let Some((topology, z_closest, leptons)) = pairing else {
        return Ok(None);
    };

    let [lep11, lep12, lep21, lep22] = leptons;
    let chain = DecayChain {
        higgs: z_closest[0] + z_closest[1],
        z1: z_heavy(&z_closest),
        z2: z_light(&z_closest),
        lep11,
        lep12,
        lep21,
        lep22,
    };
    let angles = DecayAngles::new(&chain);
    trace!(%final_state, ?angles, "Reconstructed event");
    Ok(Some(Reconstruction {
        final_state,
        topology,
        z_closest,
        chain,
        angles,
    }))
}

/// Outcome of Z candidate reconstruction, if the event survived it
type PairedEvent = Option<(Option<EventTopology>, [FourMomentum; 2], ChainLeptons)>;

/// Z candidates and lepton roles of a 4μ or 4e event
fn pair_same_kind(
    event: &FourLeptonEvent,
    flavor: Flavor,
    cut: &EventCut,
    flow: &mut CutFlow,
) -> Result<PairedEvent> {
    let leptons = event.collection(flavor);
    let momenta = leptons.momenta()?;
    let topology = z_idx_same_kind(&momenta, &leptons.charge)?;
    if !cut.keep_topology(&topology, leptons, flow)? {
        return Ok(None);
    }
    let z_closest = z_momenta_same_kind(&topology, &momenta)?;
    if !cut.mass_windows(&z_closest, flow) {
        return Ok(None);
    }

    // The selected pair is never farther from the Z mass than its complement,
    // so z_closest follows the topology's pair order
    let ordered = order_idx_z(topology, &z_closest);
    let charges = &leptons.charge;
    let anti_charges = negated(charges);
    let chain_leptons = [
        split_lep_same_kind(ordered.z1, &momenta, charges)?,
        split_lep_same_kind(ordered.z1, &momenta, &anti_charges)?,
        split_lep_same_kind(ordered.z2, &momenta, charges)?,
        split_lep_same_kind(ordered.z2, &momenta, &anti_charges)?,
    ];
    Ok(Some((Some(ordered), z_closest, chain_leptons)))
}

/// Z candidates and lepton roles of a 2μ2e event
fn pair_mixed(event: &FourLeptonEvent, cut: &EventCut, flow: &mut CutFlow) -> Result<PairedEvent> {
    let mu = event.muons.momenta()?;
    let el = event.electrons.momenta()?;
    let z_closest = z_momenta_mixed(&mu, &el)?;
    if !cut.mass_windows(&z_closest, flow) {
        return Ok(None);
    }

    let (mu_q, el_q) = (&event.muons.charge, &event.electrons.charge);
    let (mu_anti, el_anti) = (negated(mu_q), negated(el_q));
    let chain_leptons = [
        lep1(&mu, &el, mu_q, el_q)?,
        lep1(&mu, &el, &mu_anti, &el_anti)?,
        lep2(&mu, &el, mu_q, el_q)?,
        lep2(&mu, &el, &mu_anti, &el_anti)?,
    ];
    Ok(Some((None, z_closest, chain_leptons)))
}
