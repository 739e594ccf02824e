//! Reconstructed leptons and their 4-momenta

use crate::{
    error::{ensure_len, Error, Result},
    linalg::momentum::FourMomentum,
    numeric::Float,
};
use std::fmt::{self, Display};

/// Charge of a lepton (as opposed to an antilepton)
pub const PARTICLE_CHARGE: i32 = -1;

/// Lepton flavors that can build a Z candidate in this analysis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Electron (e⁻) or positron (e⁺)
    Electron,
    /// Muon (μ⁻) or antimuon (μ⁺)
    Muon,
}
//
impl Flavor {
    /// Lower-case name
    pub fn singular(self) -> &'static str {
        match self {
            Flavor::Electron => "electron",
            Flavor::Muon => "muon",
        }
    }
}

impl Display for Flavor {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.singular())
    }
}

/// A single reconstructed lepton
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lepton {
    /// Electron or muon
    pub flavor: Flavor,

    /// Transverse momentum (GeV)
    pub pt: Float,

    /// Pseudorapidity
    pub eta: Float,

    /// Azimuthal angle (rad)
    pub phi: Float,

    /// Rest mass (GeV)
    pub mass: Float,

    /// Electric charge, +1 or -1
    pub charge: i32,
}
//
impl Lepton {
    /// 4-momentum of this lepton in the laboratory frame
    pub fn momentum(&self) -> FourMomentum {
        FourMomentum::from_pt_eta_phi_m(self.pt, self.eta, self.phi, self.mass)
    }

    /// Truth that this is a lepton rather than an antilepton
    pub fn is_particle(&self) -> bool {
        self.charge == PARTICLE_CHARGE
    }
}

/// Build the 4-momenta of a set of leptons from their collider coordinates
///
/// The output is index-aligned with the input arrays, which must all have the
/// same, nonzero length.
///
pub fn four_momenta(
    pt: &[Float],
    eta: &[Float],
    phi: &[Float],
    mass: &[Float],
) -> Result<Vec<FourMomentum>> {
    if pt.is_empty() {
        return Err(Error::LeptonCount {
            expected: 1,
            found: 0,
        });
    }
    ensure_len("eta", eta, pt.len())?;
    ensure_len("phi", phi, pt.len())?;
    ensure_len("mass", mass, pt.len())?;
    Ok(pt
        .iter()
        .zip(eta)
        .zip(phi)
        .zip(mass)
        .map(|(((&pt, &eta), &phi), &mass)| FourMomentum::from_pt_eta_phi_m(pt, eta, phi, mass))
        .collect())
}
