//! # Orrery Core
//! Numerical engine behind the orrery scientific visualization components.
//!
//! This crate is a stand alone library, completely independent of the
//! rendering layer. It covers conversion between Keplerian orbital elements
//! and Cartesian state, orbit propagation and path sampling, impulsive
//! transfer planning, libration point solving, and the view and projection
//! matrix math used at the rendering boundary.
//!
//! All functions are pure and allocation fresh, inputs are never mutated,
//! so they are safe to call concurrently once per animation frame. Units
//! are km, kg, and seconds throughout, with burn magnitudes in m/s.
//!

pub mod constants;
pub mod elements;
pub mod errors;
pub mod fitting;
pub mod lagrange;
pub mod state;
pub mod trajectory;
pub mod transfer;
pub mod view;

/// Common useful imports
pub mod prelude {
    pub use crate::elements::{OrbitPath, OrbitalElements, PathWarning};
    pub use crate::errors::{Error, OrreryResult};
    pub use crate::lagrange::{LagrangeKind, LagrangePoint, TwoBodySystem};
    pub use crate::state::CartesianState;
    pub use crate::trajectory::{BurnKind, BurnMarker, Trajectory, Waypoint};
    pub use crate::transfer::{
        Burn, TransferComparison, TransferKind, TransferPlan, bi_elliptic, hohmann, recommend,
    };
}
