//! Libration points of a two body system.
//!
//! The five Lagrange points are computed in the rotating frame of the two
//! bodies. Collinear points come from low order closed form seeds, with an
//! optional Newton-Raphson refinement of the equilibrium equation for high
//! precision work. The triangular points are placed analytically.
//
// BSD 3-Clause License
//
// Copyright (c) 2026, Orrery Contributors
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::ROUTH_CRITICAL_MASS_RATIO;
use crate::errors::{Error, OrreryResult};
use crate::fitting::newton_raphson;

/// Absolute tolerance of the collinear point refinement, in nondimensional
/// separation units.
const REFINE_ATOL: f64 = 1e-12;

/// The five libration points, in the conventional ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LagrangeKind {
    /// Between the two bodies.
    L1,
    /// Beyond the secondary body.
    L2,
    /// Opposite the secondary, beyond the primary.
    L3,
    /// Leading triangular point, 60 degrees ahead of the secondary.
    L4,
    /// Trailing triangular point, 60 degrees behind the secondary.
    L5,
}

/// A single computed libration point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct LagrangePoint {
    /// Which of the five points this is.
    pub kind: LagrangeKind,

    /// Position in the system frame, in km.
    pub position: Vector3<f64>,

    /// Type based stability tag, true for the triangular points only.
    ///
    /// This is the classification the visualization layer keys on. The mass
    /// ratio dependent Routh criterion is available separately through
    /// [`TwoBodySystem::triangular_points_stable`].
    pub stable: bool,

    /// Euclidean distance to the primary body in km.
    pub distance_to_primary: f64,

    /// Euclidean distance to the secondary body in km.
    pub distance_to_secondary: f64,
}

/// Two gravitating bodies in mutual circular orbit.
///
/// By default the primary sits at the origin and the secondary on the +X
/// axis at the separation distance, with the orbital plane spanning X and Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct TwoBodySystem {
    /// Mass of the primary body in kg.
    pub primary_mass: f64,

    /// Mass of the secondary body in kg.
    pub secondary_mass: f64,

    /// Distance between the two bodies in km.
    pub separation: f64,

    /// Position of the primary body in km.
    pub primary_position: Vector3<f64>,

    /// Position of the secondary body in km.
    pub secondary_position: Vector3<f64>,
}

impl TwoBodySystem {
    /// Construct a system with the default geometry, primary at the origin
    /// and secondary at `(separation, 0, 0)`.
    ///
    /// ```
    ///     use orrery_core::lagrange::TwoBodySystem;
    ///     let earth_moon = TwoBodySystem::new(5.972e24, 7.342e22, 384400.0).unwrap();
    ///     let points = earth_moon.libration_points(true);
    ///     assert_eq!(points.len(), 5);
    /// ```
    ///
    /// # Arguments
    ///
    /// * `primary_mass` - Mass of the primary body in kg.
    /// * `secondary_mass` - Mass of the secondary body in kg.
    /// * `separation` - Distance between the bodies in km.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] when either mass or the separation is not
    /// positive and finite.
    pub fn new(primary_mass: f64, secondary_mass: f64, separation: f64) -> OrreryResult<Self> {
        if !primary_mass.is_finite() || primary_mass <= 0.0 {
            return Err(Error::ValueError(
                "Primary mass must be positive and finite.".into(),
            ));
        }
        if !secondary_mass.is_finite() || secondary_mass <= 0.0 {
            return Err(Error::ValueError(
                "Secondary mass must be positive and finite.".into(),
            ));
        }
        if !separation.is_finite() || separation <= 0.0 {
            return Err(Error::ValueError(
                "Separation must be positive and finite.".into(),
            ));
        }
        Ok(Self {
            primary_mass,
            secondary_mass,
            separation,
            primary_position: Vector3::zeros(),
            secondary_position: Vector3::new(separation, 0.0, 0.0),
        })
    }

    /// Place the bodies at explicit positions, recomputing the separation
    /// from their distance.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] when the two positions coincide.
    pub fn with_positions(
        mut self,
        primary: Vector3<f64>,
        secondary: Vector3<f64>,
    ) -> OrreryResult<Self> {
        let separation = (secondary - primary).norm();
        if !separation.is_finite() || separation <= 0.0 {
            return Err(Error::ValueError(
                "Body positions must be distinct and finite.".into(),
            ));
        }
        self.primary_position = primary;
        self.secondary_position = secondary;
        self.separation = separation;
        Ok(self)
    }

    /// Mass ratio `m2 / (m1 + m2)` of the restricted three body problem.
    #[inline(always)]
    #[must_use]
    pub fn mass_ratio(&self) -> f64 {
        self.secondary_mass / (self.primary_mass + self.secondary_mass)
    }

    /// Whether the triangular points are linearly stable for this system,
    /// per the Routh criterion on the mass ratio.
    #[must_use]
    pub fn triangular_points_stable(&self) -> bool {
        self.mass_ratio() < ROUTH_CRITICAL_MASS_RATIO
    }

    /// Compute the five libration points, ordered L1 through L5.
    ///
    /// Collinear points use the classical low order approximations. With
    /// `high_precision` they are refined by a bounded Newton-Raphson solve
    /// of the collinear equilibrium equation; if the refinement fails to
    /// converge the closed form seed is kept as the best available
    /// estimate, so this function always returns five finite points.
    pub fn libration_points(&self, high_precision: bool) -> [LagrangePoint; 5] {
        let mass_ratio = self.mass_ratio();

        // primary-relative positions along the axis, in units of the
        // separation distance
        let hill = (mass_ratio / 3.0).cbrt();
        let mut l1 = 1.0 - hill;
        let mut l2 = 1.0 + hill;
        let mut l3 = -(1.0 + 5.0 * mass_ratio / 12.0);

        if high_precision {
            for seed in [&mut l1, &mut l2, &mut l3] {
                *seed = refine_collinear(*seed, mass_ratio);
            }
        }

        let axis = (self.secondary_position - self.primary_position) / self.separation;
        let in_plane = plane_perpendicular(&axis);

        // equilateral offsets for the triangular points
        let (sin_60, cos_60) = (60.0_f64.to_radians()).sin_cos();
        let l4 = cos_60 * axis + sin_60 * in_plane;
        let l5 = cos_60 * axis - sin_60 * in_plane;

        [
            self.point(LagrangeKind::L1, l1 * axis),
            self.point(LagrangeKind::L2, l2 * axis),
            self.point(LagrangeKind::L3, l3 * axis),
            self.point(LagrangeKind::L4, l4),
            self.point(LagrangeKind::L5, l5),
        ]
    }

    /// Build a point record from its primary-relative offset in separation
    /// units.
    fn point(&self, kind: LagrangeKind, offset: Vector3<f64>) -> LagrangePoint {
        let position = self.primary_position + offset * self.separation;
        LagrangePoint {
            kind,
            position,
            stable: matches!(kind, LagrangeKind::L4 | LagrangeKind::L5),
            distance_to_primary: (position - self.primary_position).norm(),
            distance_to_secondary: (position - self.secondary_position).norm(),
        }
    }
}

/// A unit vector perpendicular to `axis` in the orbital plane.
///
/// The orbital plane is taken as the XY plane unless the axis is parallel
/// to Z, in which case any perpendicular direction serves.
fn plane_perpendicular(axis: &Vector3<f64>) -> Vector3<f64> {
    let candidate = Vector3::z().cross(axis);
    if candidate.norm() > f64::EPSILON {
        candidate.normalize()
    } else {
        axis.cross(&Vector3::x()).normalize()
    }
}

/// Refine a collinear libration point by Newton-Raphson on the equilibrium
/// equation of the circular restricted three body problem.
///
/// Positions are primary-relative in separation units. The equation is
/// written in barycentric coordinates, where the primary sits at `-mu` and
/// the secondary at `1 - mu`:
///
/// `x - (1 - mu)(x + mu)/|x + mu|^3 - mu (x - 1 + mu)/|x - 1 + mu|^3 = 0`
///
/// Non-convergence keeps the seed, the refinement never makes the estimate
/// unavailable.
fn refine_collinear(seed: f64, mass_ratio: f64) -> f64 {
    let bary_seed = seed - mass_ratio;

    let f = |x: f64| {
        let r1 = x + mass_ratio;
        let r2 = x - 1.0 + mass_ratio;
        x - (1.0 - mass_ratio) * r1 / r1.abs().powi(3) - mass_ratio * r2 / r2.abs().powi(3)
    };
    // d/dx of (x - c)/|x - c|^3 is -2/|x - c|^3
    let df = |x: f64| {
        let r1 = x + mass_ratio;
        let r2 = x - 1.0 + mass_ratio;
        1.0 + 2.0 * (1.0 - mass_ratio) / r1.abs().powi(3) + 2.0 * mass_ratio / r2.abs().powi(3)
    };

    match newton_raphson(f, df, bary_seed, REFINE_ATOL) {
        Ok(root) => root + mass_ratio,
        Err(_) => seed,
    }
}
