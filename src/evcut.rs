//! Mechanism to select four-lepton events and their Z candidates

use crate::{
    cutflow::CutFlow,
    error::{checked_get, ensure_len, Result},
    event::{FinalState, FourLeptonEvent, LeptonCollection},
    lepton::{Flavor, PARTICLE_CHARGE},
    linalg::momentum::FourMomentum,
    numeric::{functions::sqr, Float},
    pairing::{EventTopology, LEPTONS_PER_Z, NUM_LEPTONS},
};
use prefix_num_ops::real::*;

/// Minimal angular separation of the leptons building a Z candidate
pub const DELTA_R_MIN: Float = 0.02;

/// Angular distance in (η, φ) space
///
/// The azimuthal difference is used as-is, without wrapping it into [-π, π].
///
pub fn delta_r(eta1: Float, eta2: Float, phi1: Float, phi2: Float) -> Float {
    sqrt(sqr(eta1 - eta2) + sqr(phi1 - phi2))
}

/// Check that the leptons of both pairs are at least `min_delta_r` apart
pub fn separated(
    topology: &EventTopology,
    eta: &[Float],
    phi: &[Float],
    min_delta_r: Float,
) -> Result<bool> {
    for pair in topology.pairs() {
        let dr = delta_r(
            checked_get(eta, pair.first)?,
            checked_get(eta, pair.second)?,
            checked_get(phi, pair.first)?,
            checked_get(phi, pair.second)?,
        );
        if dr < min_delta_r {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Reject topologies where the leptons of a Z candidate are closer than
/// `DELTA_R_MIN` in (η, φ) space
pub fn filter_delta_r(topology: &EventTopology, eta: &[Float], phi: &[Float]) -> Result<bool> {
    separated(topology, eta, phi, DELTA_R_MIN)
}

/// Significance of the 3D impact parameter of each lepton
///
/// The impact parameter and its uncertainty are both the quadratic sum of
/// their transverse and longitudinal parts. Correlations between dxy and dz
/// are neglected.
///
pub fn sip(
    dxy: &[Float],
    dz: &[Float],
    sigma_dxy: &[Float],
    sigma_dz: &[Float],
) -> Result<Vec<Float>> {
    ensure_len("dz", dz, dxy.len())?;
    ensure_len("sigma_dxy", sigma_dxy, dxy.len())?;
    ensure_len("sigma_dz", sigma_dz, dxy.len())?;
    Ok(dxy
        .iter()
        .zip(dz)
        .zip(sigma_dxy.iter().zip(sigma_dz))
        .map(|((&dxy, &dz), (&s_dxy, &s_dz))| {
            let ip = sqrt(sqr(dxy) + sqr(dz));
            let sigma_ip = sqrt(sqr(s_dxy) + sqr(s_dz));
            ip / sigma_ip
        })
        .collect())
}

/// Transverse momentum thresholds of the leading and subleading leptons
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PtCut {
    /// Minimal pT of the hardest lepton (GeV)
    pub leading: Float,

    /// Minimal pT of the softest lepton (GeV)
    pub subleading: Float,
}
//
impl PtCut {
    /// Decide whether a set of same-flavor leptons passes the thresholds
    ///
    /// An empty set never passes.
    ///
    pub fn keep(&self, pt: &[Float]) -> bool {
        if pt.is_empty() {
            return false;
        }
        let max = pt.iter().fold(Float::NEG_INFINITY, |acc, &x| acc.max(x));
        let min = pt.iter().fold(Float::INFINITY, |acc, &x| acc.min(x));
        max > self.leading && min > self.subleading
    }

    /// Check that the muons or the electrons pass the thresholds
    pub fn keep_either(&self, mu_pt: &[Float], el_pt: &[Float]) -> bool {
        self.keep(mu_pt) || self.keep(el_pt)
    }
}
//
impl Default for PtCut {
    fn default() -> Self {
        Self {
            leading: 20.,
            subleading: 10.,
        }
    }
}

/// Transverse momentum cut of 2μ2e events with the default thresholds
pub fn pt_cuts(mu_pt: &[Float], el_pt: &[Float]) -> bool {
    PtCut::default().keep_either(mu_pt, el_pt)
}

/// Per-lepton quality cuts of one flavor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeptonCut {
    /// Maximal relative isolation
    pub max_iso: Float,

    /// Minimal transverse momentum (GeV)
    pub min_pt: Float,

    /// Maximal absolute pseudorapidity
    pub max_abs_eta: Float,
}
//
impl LeptonCut {
    /// Default muon cuts
    pub fn muon() -> Self {
        Self {
            max_iso: 0.40,
            min_pt: 5.,
            max_abs_eta: 2.4,
        }
    }

    /// Default electron cuts
    pub fn electron() -> Self {
        Self {
            max_iso: 0.40,
            min_pt: 7.,
            max_abs_eta: 2.5,
        }
    }

    fn isolated(&self, leptons: &LeptonCollection) -> bool {
        leptons.pf_rel_iso.iter().all(|&iso| abs(iso) < self.max_iso)
    }

    fn in_acceptance(&self, leptons: &LeptonCollection) -> bool {
        leptons.eta.iter().all(|&eta| abs(eta) < self.max_abs_eta)
    }

    fn hard_enough(&self, leptons: &LeptonCollection) -> bool {
        leptons.pt.iter().all(|&pt| pt > self.min_pt)
    }
}

/// Open interval of accepted Z candidate masses (GeV)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassWindow {
    /// Lower bound, excluded
    pub min: Float,

    /// Upper bound, excluded
    pub max: Float,
}
//
impl MassWindow {
    /// Truth that a candidate's invariant mass falls inside the window
    pub fn contains(&self, candidate: &FourMomentum) -> bool {
        let mass = candidate.mass();
        mass > self.min && mass < self.max
    }
}

/// Cuts on four-lepton events
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventCut {
    /// Quality cuts on muons
    pub muon: LeptonCut,

    /// Quality cuts on electrons
    pub electron: LeptonCut,

    /// Maximal 3D impact parameter significance
    pub max_sip: Float,

    /// Maximal absolute transverse impact parameter (cm)
    pub max_abs_dxy: Float,

    /// Maximal absolute longitudinal impact parameter (cm)
    pub max_abs_dz: Float,

    /// Leading/subleading pT thresholds of 2μ2e events
    pub pt: PtCut,

    /// Minimal (η, φ) separation of the leptons building a Z candidate
    pub min_delta_r: Float,

    /// Mass window of the Z candidate closest to the nominal Z mass
    pub z_close_mass: MassWindow,

    /// Mass window of the other Z candidate
    pub z_far_mass: MassWindow,
}
//
impl Default for EventCut {
    fn default() -> Self {
        Self {
            muon: LeptonCut::muon(),
            electron: LeptonCut::electron(),
            max_sip: 4.,
            max_abs_dxy: 0.5,
            max_abs_dz: 1.0,
            pt: PtCut::default(),
            min_delta_r: DELTA_R_MIN,
            z_close_mass: MassWindow {
                min: 40.,
                max: 120.,
            },
            z_far_mass: MassWindow {
                min: 12.,
                max: 120.,
            },
        }
    }
}
//
impl EventCut {
    /// Quality cuts of a given lepton flavor
    pub fn lepton_cut(&self, flavor: Flavor) -> &LeptonCut {
        match flavor {
            Flavor::Muon => &self.muon,
            Flavor::Electron => &self.electron,
        }
    }

    /// Decide whether an event has a clean final state of the requested kind
    ///
    /// Every cut is recorded in the cut flow under its name, up to the first
    /// failing one. Collections with ragged per-lepton arrays are an error.
    ///
    pub fn preselect(
        &self,
        event: &FourLeptonEvent,
        final_state: FinalState,
        flow: &mut CutFlow,
    ) -> Result<bool> {
        event.muons.validate()?;
        event.electrons.validate()?;
        match final_state.same_flavor() {
            Some(flavor) => self.preselect_same_kind(event.collection(flavor), flow),
            None => self.preselect_mixed(event, flow),
        }
    }

    /// Preselection of 4μ and 4e events
    fn preselect_same_kind(&self, leptons: &LeptonCollection, flow: &mut CutFlow) -> Result<bool> {
        let cut = self.lepton_cut(leptons.flavor);
        let (count_name, charge_name, iso_name, kin_name, vertex_name) = match leptons.flavor {
            Flavor::Muon => (
                "Four muons",
                "Two positive and two negative muons",
                "Good isolation of the muons",
                "Good muon kinematics",
                "Muons originate from the same primary vertex",
            ),
            Flavor::Electron => (
                "Four electrons",
                "Two positive and two negative electrons",
                "Good isolation of the electrons",
                "Good electron kinematics",
                "Electrons originate from the same primary vertex",
            ),
        };
        let passed = flow.check(count_name, leptons.len() == NUM_LEPTONS)
            && flow.check(charge_name, balanced_charges(&leptons.charge))
            && flow.check(iso_name, cut.isolated(leptons))
            && flow.check(
                kin_name,
                cut.hard_enough(leptons) && cut.in_acceptance(leptons),
            )
            && flow.check(vertex_name, self.from_primary_vertex(leptons)?);
        Ok(passed)
    }

    /// Preselection of 2μ2e events
    fn preselect_mixed(&self, event: &FourLeptonEvent, flow: &mut CutFlow) -> Result<bool> {
        let (muons, electrons) = (&event.muons, &event.electrons);
        let passed = flow.check(
            "Two muons and two electrons",
            muons.len() == LEPTONS_PER_Z && electrons.len() == LEPTONS_PER_Z,
        ) && flow.check(
            "Two opposite charged electron and muon pairs",
            muons.total_charge() == 0 && electrons.total_charge() == 0,
        ) && flow.check(
            "Eta cuts",
            self.electron.in_acceptance(electrons) && self.muon.in_acceptance(muons),
        ) && flow.check(
            "Require good isolation",
            self.muon.isolated(muons) && self.electron.isolated(electrons),
        ) && flow.check("Pt cuts", self.pt.keep_either(&muons.pt, &electrons.pt))
            && flow.check(
                "Delta R cuts",
                self.pair_separation(muons)? > self.min_delta_r
                    && self.pair_separation(electrons)? > self.min_delta_r,
            )
            && flow.check(
                "Muons originate from the same primary vertex",
                self.from_primary_vertex(muons)?,
            )
            && flow.check(
                "Electrons originate from the same primary vertex",
                self.from_primary_vertex(electrons)?,
            );
        Ok(passed)
    }

    /// ΔR between the two leptons of a flavor in a 2μ2e event
    fn pair_separation(&self, leptons: &LeptonCollection) -> Result<Float> {
        Ok(delta_r(
            checked_get(&leptons.eta, 0)?,
            checked_get(&leptons.eta, 1)?,
            checked_get(&leptons.phi, 0)?,
            checked_get(&leptons.phi, 1)?,
        ))
    }

    /// Check that all leptons are compatible with the primary vertex
    fn from_primary_vertex(&self, leptons: &LeptonCollection) -> Result<bool> {
        let sip = leptons.sip()?;
        Ok(sip.iter().all(|&s| s < self.max_sip)
            && leptons.dxy.iter().all(|&dxy| abs(dxy) < self.max_abs_dxy)
            && leptons.dz.iter().all(|&dz| abs(dz) < self.max_abs_dz))
    }

    /// Check the ΔR separation of a same-flavor pairing
    pub fn keep_topology(
        &self,
        topology: &EventTopology,
        leptons: &LeptonCollection,
        flow: &mut CutFlow,
    ) -> Result<bool> {
        let passed = separated(topology, &leptons.eta, &leptons.phi, self.min_delta_r)?;
        Ok(flow.check(
            "Delta R separation of particles building the Z systems",
            passed,
        ))
    }

    /// Apply the mass windows to closeness-ordered Z candidates
    pub fn mass_windows(&self, z_closest: &[FourMomentum; 2], flow: &mut CutFlow) -> bool {
        let close = &self.z_close_mass;
        let far = &self.z_far_mass;
        flow.check(
            &format!("Mass of first Z candidate in [{}, {}]", close.min, close.max),
            close.contains(&z_closest[0]),
        ) && flow.check(
            &format!("Mass of second Z candidate in [{}, {}]", far.min, far.max),
            far.contains(&z_closest[1]),
        )
    }
}

/// Truth that four same-flavor leptons are two positive and two negative
fn balanced_charges(charges: &[i32]) -> bool {
    let negative = charges.iter().filter(|&&q| q == PARTICLE_CHARGE).count();
    let positive = charges.iter().filter(|&&q| q == -PARTICLE_CHARGE).count();
    positive == LEPTONS_PER_Z && negative == LEPTONS_PER_Z
}
