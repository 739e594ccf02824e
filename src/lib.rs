//! 4 leptons: Z candidate pairing and angular analysis of H → ZZ → 4ℓ
//!
//!
//! # Introduction (for the physicist)
//!
//! This library reconstructs the two Z boson candidates of a collision event
//! with four charged leptons (electrons and muons) in the final state, and
//! computes the production and decay angles of the H → ZZ → 4ℓ topology as
//! defined in Phys. Rev. D 86, 095031: Φ, Φ1, θ*, θ1 and θ2.
//!
//! Three final states are supported: 4μ, 4e and 2μ2e. With four leptons of
//! the same flavor, the opposite-charge pair whose invariant mass is closest
//! to the Z mass builds the first candidate, and the remaining two leptons the
//! second one. With two muons and two electrons, each Z is built from the two
//! leptons of one flavor.
//!
//!
//! # Introduction (for the numerical guy)
//!
//! Everything is a pure function of one event's lepton kinematics. Nothing is
//! integrated or fitted here, so the only numerical concerns are Lorentz
//! boosts and angles between nearly (anti)parallel vectors. Degenerate
//! geometries are not guarded against: they show up as NaN in the output
//! angles, and it is the caller's job to filter those out.
//!
//!
//! # Introduction (for the computer guy)
//!
//! The processing of an event is a pipeline where each stage feeds the next:
//!
//! * preselect the event for the requested final state,
//! * build the lepton 4-momenta from (pT, η, φ, m),
//! * pair the leptons into two Z candidates, ordered by closeness to the Z
//!   mass, and apply the mass windows,
//! * reorder the candidates by mass and identify the lepton and antilepton of
//!   each of them,
//! * boost into the Higgs and Z rest frames and compute the angles.
//!
//! Each stage is exposed as a standalone function, and `analysis::reconstruct`
//! chains them for one event. Rejections are counted in a `CutFlow`, which can
//! be merged across workers processing disjoint sets of events.

#![warn(missing_docs)]

pub mod analysis;
pub mod angles;
pub mod config;
pub mod cutflow;
pub mod error;
pub mod evcut;
pub mod event;
pub mod lepton;
pub mod linalg;
pub mod numeric;
pub mod pairing;
pub mod roles;

pub use crate::{
    analysis::{reconstruct, Reconstruction},
    config::Configuration,
    cutflow::CutFlow,
    error::{Error, Result},
    event::{FinalState, FourLeptonEvent, LeptonCollection},
    linalg::momentum::FourMomentum,
    numeric::Float,
};
