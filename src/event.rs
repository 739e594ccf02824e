//! This module defines the per-event input data of the reconstruction

use crate::{
    error::{ensure_len, Result},
    evcut,
    lepton::{self, Flavor, Lepton},
    linalg::momentum::FourMomentum,
    numeric::Float,
};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Per-lepton arrays of one flavor, as extracted from an event
///
/// All arrays are index-aligned and must have the same length.
///
#[derive(Clone, Debug, PartialEq)]
pub struct LeptonCollection {
    /// Flavor of all the leptons in this collection
    pub flavor: Flavor,

    /// Transverse momenta (GeV)
    pub pt: Vec<Float>,

    /// Pseudorapidities
    pub eta: Vec<Float>,

    /// Azimuthal angles (rad)
    pub phi: Vec<Float>,

    /// Rest masses (GeV)
    pub mass: Vec<Float>,

    /// Electric charges (+1 or -1)
    pub charge: Vec<i32>,

    /// Transverse impact parameters with respect to the primary vertex (cm)
    pub dxy: Vec<Float>,

    /// Longitudinal impact parameters with respect to the primary vertex (cm)
    pub dz: Vec<Float>,

    /// Uncertainties on dxy (cm)
    pub dxy_err: Vec<Float>,

    /// Uncertainties on dz (cm)
    pub dz_err: Vec<Float>,

    /// Relative isolation (particle-flow, all charged and neutral particles)
    pub pf_rel_iso: Vec<Float>,
}
//
impl LeptonCollection {
    /// Set up an empty collection
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            pt: Vec::new(),
            eta: Vec::new(),
            phi: Vec::new(),
            mass: Vec::new(),
            charge: Vec::new(),
            dxy: Vec::new(),
            dz: Vec::new(),
            dxy_err: Vec::new(),
            dz_err: Vec::new(),
            pf_rel_iso: Vec::new(),
        }
    }

    /// Append a lepton, along with its vertex and isolation information
    pub fn push(&mut self, lepton: &Lepton, vertex: VertexInfo, pf_rel_iso: Float) {
        debug_assert_eq!(lepton.flavor, self.flavor, "Lepton flavor mismatch");
        self.pt.push(lepton.pt);
        self.eta.push(lepton.eta);
        self.phi.push(lepton.phi);
        self.mass.push(lepton.mass);
        self.charge.push(lepton.charge);
        self.dxy.push(vertex.dxy);
        self.dz.push(vertex.dz);
        self.dxy_err.push(vertex.dxy_err);
        self.dz_err.push(vertex.dz_err);
        self.pf_rel_iso.push(pf_rel_iso);
    }

    /// Number of leptons in the collection
    pub fn len(&self) -> usize {
        self.pt.len()
    }

    /// Truth that the collection holds no lepton
    pub fn is_empty(&self) -> bool {
        self.pt.is_empty()
    }

    /// Check that all per-lepton arrays have the same length
    pub fn validate(&self) -> Result<()> {
        let len = self.len();
        ensure_len("eta", &self.eta, len)?;
        ensure_len("phi", &self.phi, len)?;
        ensure_len("mass", &self.mass, len)?;
        ensure_len("charge", &self.charge, len)?;
        ensure_len("dxy", &self.dxy, len)?;
        ensure_len("dz", &self.dz, len)?;
        ensure_len("dxy_err", &self.dxy_err, len)?;
        ensure_len("dz_err", &self.dz_err, len)?;
        ensure_len("pf_rel_iso", &self.pf_rel_iso, len)
    }

    /// Iterate over the kinematic description of the leptons
    pub fn leptons(&self) -> impl Iterator<Item = Lepton> + '_ {
        (0..self.len()).map(move |i| Lepton {
            flavor: self.flavor,
            pt: self.pt[i],
            eta: self.eta[i],
            phi: self.phi[i],
            mass: self.mass[i],
            charge: self.charge[i],
        })
    }

    /// 4-momenta of the leptons, index-aligned with the collection
    pub fn momenta(&self) -> Result<Vec<FourMomentum>> {
        lepton::four_momenta(&self.pt, &self.eta, &self.phi, &self.mass)
    }

    /// 3D impact parameter significance of the leptons
    pub fn sip(&self) -> Result<Vec<Float>> {
        evcut::sip(&self.dxy, &self.dz, &self.dxy_err, &self.dz_err)
    }

    /// Sum of the lepton charges
    pub fn total_charge(&self) -> i32 {
        self.charge.iter().sum()
    }
}

/// Impact parameters of a lepton track with respect to the primary vertex
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexInfo {
    /// Transverse impact parameter (cm)
    pub dxy: Float,

    /// Longitudinal impact parameter (cm)
    pub dz: Float,

    /// Uncertainty on dxy (cm)
    pub dxy_err: Float,

    /// Uncertainty on dz (cm)
    pub dz_err: Float,
}

/// Leptons of one collision event
#[derive(Clone, Debug, PartialEq)]
pub struct FourLeptonEvent {
    /// Reconstructed muons
    pub muons: LeptonCollection,

    /// Reconstructed electrons
    pub electrons: LeptonCollection,
}
//
impl FourLeptonEvent {
    /// Build an event from its muon and electron collections
    pub fn new(muons: LeptonCollection, electrons: LeptonCollection) -> Self {
        debug_assert_eq!(muons.flavor, Flavor::Muon);
        debug_assert_eq!(electrons.flavor, Flavor::Electron);
        Self { muons, electrons }
    }

    /// Access the collection of a given flavor
    pub fn collection(&self, flavor: Flavor) -> &LeptonCollection {
        match flavor {
            Flavor::Muon => &self.muons,
            Flavor::Electron => &self.electrons,
        }
    }
}

/// Four-lepton final states, which the caller picks before reconstruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FinalState {
    /// 4μ: combinatorial pairing of the muons
    FourMuons,
    /// 4e: combinatorial pairing of the electrons
    FourElectrons,
    /// 2μ2e: each Z is built from the two leptons of one flavor
    TwoMuonsTwoElectrons,
}
//
impl FinalState {
    /// All supported final states
    pub const ALL: [FinalState; 3] = [
        FinalState::FourMuons,
        FinalState::FourElectrons,
        FinalState::TwoMuonsTwoElectrons,
    ];

    /// Flavor of the leptons, if all four have the same
    pub fn same_flavor(self) -> Option<Flavor> {
        match self {
            FinalState::FourMuons => Some(Flavor::Muon),
            FinalState::FourElectrons => Some(Flavor::Electron),
            FinalState::TwoMuonsTwoElectrons => None,
        }
    }

    /// Name of the final state, as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            FinalState::FourMuons => "FourMuons",
            FinalState::FourElectrons => "FourElectrons",
            FinalState::TwoMuonsTwoElectrons => "TwoMuonsTwoElectrons",
        }
    }
}

impl Display for FinalState {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

/// Error returned when parsing an unknown final state name
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown final state --> {0}")]
pub struct UnknownFinalState(pub String);

impl FromStr for FinalState {
    type Err = UnknownFinalState;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.name() == s)
            .ok_or_else(|| UnknownFinalState(s.to_owned()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        error::Error,
        pairing::tests::{EL_MASS, MU_MASS},
    };

    /// Well-measured track pointing at the primary vertex
    pub fn good_vertex() -> VertexInfo {
        VertexInfo {
            dxy: 0.001,
            dz: 0.002,
            dxy_err: 0.001,
            dz_err: 0.002,
        }
    }

    /// Collection of isolated leptons pointing at the primary vertex
    pub fn collection(
        flavor: Flavor,
        kinematics: &[(Float, Float, Float, i32)],
    ) -> LeptonCollection {
        let mass = match flavor {
            Flavor::Muon => MU_MASS,
            Flavor::Electron => EL_MASS,
        };
        let mut leptons = LeptonCollection::new(flavor);
        for &(pt, eta, phi, charge) in kinematics {
            let lepton = Lepton {
                flavor,
                pt,
                eta,
                phi,
                mass,
                charge,
            };
            leptons.push(&lepton, good_vertex(), 0.05);
        }
        leptons
    }

    #[test]
    fn collection_round_trip() {
        let muons = collection(Flavor::Muon, &[(30., 0.5, 1., -1), (20., -0.3, -2., 1)]);
        assert_eq!(muons.len(), 2);
        assert!(!muons.is_empty());
        assert_eq!(muons.validate(), Ok(()));
        assert_eq!(muons.total_charge(), 0);
        let leptons: Vec<_> = muons.leptons().collect();
        assert_eq!(leptons[1].pt, 20.);
        assert_eq!(leptons[1].charge, 1);
        let momenta = muons.momenta().unwrap();
        assert_eq!(momenta[0], leptons[0].momentum());
        let sip = muons.sip().unwrap();
        assert_eq!(sip.len(), 2);
    }

    #[test]
    fn ragged_collection() {
        let mut muons = collection(Flavor::Muon, &[(30., 0.5, 1., -1)]);
        muons.dz_err.clear();
        assert_eq!(
            muons.validate(),
            Err(Error::LengthMismatch {
                what: "dz_err",
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn final_state_names() {
        for state in FinalState::ALL {
            assert_eq!(state.name().parse::<FinalState>(), Ok(state));
        }
        assert_eq!(
            "TwoTaus".parse::<FinalState>(),
            Err(UnknownFinalState("TwoTaus".to_owned()))
        );
        assert_eq!(FinalState::FourElectrons.same_flavor(), Some(Flavor::Electron));
        assert_eq!(FinalState::TwoMuonsTwoElectrons.same_flavor(), None);
    }
}
