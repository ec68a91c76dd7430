//! Impulsive transfer planning between circular coplanar orbits.
//!
//! Radii and gravitational parameters are in km and km^3 / s^2, times in
//! seconds. Burn magnitudes and delta-V totals are reported in m/s, the unit
//! mission budgets are quoted in.
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

use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::elements::OrbitalElements;
use crate::errors::{Error, OrreryResult};

/// Conversion from the km/s speeds of the vis-viva arithmetic to the m/s
/// burn magnitudes reported to callers.
const KM_S_TO_M_S: f64 = 1000.0;

/// A single impulsive burn of a transfer plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Burn {
    /// Where the burn is executed, in km.
    pub position: Vector3<f64>,

    /// Magnitude of the velocity change in m/s, always non-negative.
    pub delta_v: f64,

    /// Human readable description of the burn's purpose.
    pub label: String,
}

/// A fully computed impulsive transfer between two circular orbits.
///
/// Paths are polylines in the orbital plane, the initial orbit centered on
/// the origin with the departure point on the +X axis. The plan is wholly
/// derived from its inputs and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct TransferPlan {
    /// Closed polyline of the initial circular orbit, in km.
    pub initial_orbit: Vec<Vector3<f64>>,

    /// Closed polyline of the final circular orbit, in km.
    pub final_orbit: Vec<Vector3<f64>>,

    /// Transfer ellipse arcs in flight order, one for a Hohmann transfer
    /// and two for a bi-elliptic transfer.
    pub transfer_arcs: Vec<Vec<Vector3<f64>>>,

    /// Burns in execution order.
    pub burns: Vec<Burn>,

    /// Sum of all burn magnitudes in m/s.
    pub total_delta_v: f64,

    /// Total time of flight in seconds.
    pub transfer_time: f64,
}

/// The two impulsive transfer strategies this planner knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// Two burn transfer along a single half ellipse.
    Hohmann,

    /// Three burn transfer through an intermediate apoapsis.
    BiElliptic,
}

/// Side by side delta-V comparison of the two transfer strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct TransferComparison {
    /// Total delta-V of the Hohmann transfer in m/s.
    pub hohmann_delta_v: f64,

    /// Total delta-V of the bi-elliptic transfer in m/s.
    pub bi_elliptic_delta_v: f64,

    /// The cheaper of the two strategies.
    pub recommended: TransferKind,
}

/// Circular orbit speed in km/s at the given radius.
#[inline(always)]
fn circular_speed(radius: f64, grav_param: f64) -> f64 {
    (grav_param / radius).sqrt()
}

/// Speed in km/s at radius `r` on an orbit of semi-major axis `a`, from the
/// vis-viva equation.
#[inline(always)]
fn vis_viva_speed(radius: f64, semi_major_axis: f64, grav_param: f64) -> f64 {
    (grav_param * (2.0 / radius - 1.0 / semi_major_axis)).sqrt()
}

/// Half period in seconds of an ellipse with the given semi-major axis.
#[inline(always)]
fn half_period(semi_major_axis: f64, grav_param: f64) -> f64 {
    PI * (semi_major_axis.powi(3) / grav_param).sqrt()
}

/// Burn magnitudes in m/s and time of flight of a Hohmann transfer,
/// without building the path polylines.
fn hohmann_burns(r1: f64, r2: f64, grav_param: f64) -> (f64, f64, f64) {
    let a_t = 0.5 * (r1 + r2);
    let dv1 = (vis_viva_speed(r1, a_t, grav_param) - circular_speed(r1, grav_param)).abs();
    let dv2 = (circular_speed(r2, grav_param) - vis_viva_speed(r2, a_t, grav_param)).abs();
    (
        dv1 * KM_S_TO_M_S,
        dv2 * KM_S_TO_M_S,
        half_period(a_t, grav_param),
    )
}

/// Burn magnitudes in m/s and time of flight of a bi-elliptic transfer.
fn bi_elliptic_burns(r1: f64, r2: f64, rb: f64, grav_param: f64) -> (f64, f64, f64, f64) {
    let a1 = 0.5 * (r1 + rb);
    let a2 = 0.5 * (rb + r2);

    let dv1 = (vis_viva_speed(r1, a1, grav_param) - circular_speed(r1, grav_param)).abs();
    // the middle burn matches the two ellipse speeds at the shared apoapsis
    let dv2 = (vis_viva_speed(rb, a2, grav_param) - vis_viva_speed(rb, a1, grav_param)).abs();
    let dv3 = (circular_speed(r2, grav_param) - vis_viva_speed(r2, a2, grav_param)).abs();

    (
        dv1 * KM_S_TO_M_S,
        dv2 * KM_S_TO_M_S,
        dv3 * KM_S_TO_M_S,
        half_period(a1, grav_param) + half_period(a2, grav_param),
    )
}

/// Half ellipse polyline departing at `(r_depart, 0, 0)` and arriving at
/// `(-r_arrive, 0, 0)`, swept in flight order.
///
/// Works for inward as well as outward legs, the ellipse is oriented so the
/// periapsis sits at whichever end has the smaller radius.
fn half_ellipse(r_depart: f64, r_arrive: f64, segments: usize) -> OrreryResult<Vec<Vector3<f64>>> {
    if r_arrive >= r_depart {
        // departure at periapsis on +X
        let ellipse = OrbitalElements::from_apsides(r_depart, r_arrive);
        ellipse.arc(0.0, 180.0, segments)
    } else {
        // departure at apoapsis on +X, periapsis rotated onto -X
        let mut ellipse = OrbitalElements::from_apsides(r_arrive, r_depart);
        ellipse.arg_periapsis = 180.0;
        ellipse.arc(180.0, 360.0, segments)
    }
}

fn validate_positive(value: f64, what: &str) -> OrreryResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::ValueError(format!(
            "{what} must be positive and finite."
        )));
    }
    Ok(())
}

fn validate_segments(segments: usize) -> OrreryResult<()> {
    if segments == 0 {
        return Err(Error::ValueError(
            "At least one path segment is required.".into(),
        ));
    }
    Ok(())
}

/// Plan a Hohmann transfer between two circular coplanar orbits.
///
/// The departure point is on the +X axis and the transfer half ellipse ends
/// at `(-r2, 0, 0)`, reflecting the 180 degree phasing of the maneuver. Two
/// burns are produced, at departure and at arrival circularization, with the
/// time of flight equal to half the transfer ellipse period.
///
/// ```
///     use orrery_core::transfer::hohmann;
///     let plan = hohmann(6778.0, 42164.0, 398600.4418, 64).unwrap();
///     assert_eq!(plan.burns.len(), 2);
///     assert!((plan.total_delta_v - 3854.0).abs() < 1.0);
/// ```
///
/// # Arguments
///
/// * `r1` - Radius of the initial circular orbit in km.
/// * `r2` - Radius of the final circular orbit in km.
/// * `grav_param` - Gravitational parameter of the central body in
///   km^3 / s^2.
/// * `segments` - Number of segments per path polyline.
///
/// # Errors
///
/// [`Error::ValueError`] when a radius or the gravitational parameter is not
/// positive and finite, or `segments` is zero.
pub fn hohmann(r1: f64, r2: f64, grav_param: f64, segments: usize) -> OrreryResult<TransferPlan> {
    validate_positive(r1, "Initial orbit radius")?;
    validate_positive(r2, "Final orbit radius")?;
    validate_positive(grav_param, "Gravitational parameter")?;
    validate_segments(segments)?;

    let (dv1, dv2, transfer_time) = hohmann_burns(r1, r2, grav_param);

    let burns = vec![
        Burn {
            position: Vector3::new(r1, 0.0, 0.0),
            delta_v: dv1,
            label: "Departure burn".into(),
        },
        Burn {
            position: Vector3::new(-r2, 0.0, 0.0),
            delta_v: dv2,
            label: "Arrival circularization".into(),
        },
    ];

    Ok(TransferPlan {
        initial_orbit: OrbitalElements::circular(r1).orbit_path(segments)?.points,
        final_orbit: OrbitalElements::circular(r2).orbit_path(segments)?.points,
        transfer_arcs: vec![half_ellipse(r1, r2, segments)?],
        total_delta_v: dv1 + dv2,
        transfer_time,
        burns,
    })
}

/// Plan a bi-elliptic transfer through an intermediate apoapsis radius `rb`.
///
/// Three burns across two half ellipses, `r1` out to `rb` and `rb` back down
/// to `r2`, with the time of flight equal to the sum of the two half
/// periods. The geometry is only a physically sensible bi-elliptic maneuver
/// when `rb` exceeds both orbit radii; the planner does not enforce that,
/// callers wanting the cheaper of the sensible strategies should use
/// [`recommend`].
///
/// # Arguments
///
/// * `r1` - Radius of the initial circular orbit in km.
/// * `r2` - Radius of the final circular orbit in km.
/// * `rb` - Intermediate apoapsis radius in km.
/// * `grav_param` - Gravitational parameter of the central body in
///   km^3 / s^2.
/// * `segments` - Number of segments per path polyline.
///
/// # Errors
///
/// [`Error::ValueError`] when a radius or the gravitational parameter is not
/// positive and finite, or `segments` is zero.
pub fn bi_elliptic(
    r1: f64,
    r2: f64,
    rb: f64,
    grav_param: f64,
    segments: usize,
) -> OrreryResult<TransferPlan> {
    validate_positive(r1, "Initial orbit radius")?;
    validate_positive(r2, "Final orbit radius")?;
    validate_positive(rb, "Intermediate apoapsis radius")?;
    validate_positive(grav_param, "Gravitational parameter")?;
    validate_segments(segments)?;

    let (dv1, dv2, dv3, transfer_time) = bi_elliptic_burns(r1, r2, rb, grav_param);

    let burns = vec![
        Burn {
            position: Vector3::new(r1, 0.0, 0.0),
            delta_v: dv1,
            label: "Departure burn".into(),
        },
        Burn {
            position: Vector3::new(-rb, 0.0, 0.0),
            delta_v: dv2,
            label: "Intermediate apoapsis burn".into(),
        },
        Burn {
            position: Vector3::new(r2, 0.0, 0.0),
            delta_v: dv3,
            label: "Arrival circularization".into(),
        },
    ];

    // second leg departs on -X and arrives on +X, mirror of the helper frame
    let second_leg = half_ellipse(rb, r2, segments)?
        .into_iter()
        .map(|point| Vector3::new(-point.x, -point.y, point.z))
        .collect();

    Ok(TransferPlan {
        initial_orbit: OrbitalElements::circular(r1).orbit_path(segments)?.points,
        final_orbit: OrbitalElements::circular(r2).orbit_path(segments)?.points,
        transfer_arcs: vec![half_ellipse(r1, rb, segments)?, second_leg],
        total_delta_v: dv1 + dv2 + dv3,
        transfer_time,
        burns,
    })
}

/// Compare the two transfer strategies for the same pair of orbits and
/// recommend the cheaper one.
///
/// A pure decision function over the burn arithmetic, no path polylines are
/// built. Ties go to the Hohmann transfer, which is always faster.
///
/// # Arguments
///
/// * `r1` - Radius of the initial circular orbit in km.
/// * `r2` - Radius of the final circular orbit in km.
/// * `rb` - Intermediate apoapsis radius of the bi-elliptic candidate in km.
/// * `grav_param` - Gravitational parameter of the central body in
///   km^3 / s^2.
///
/// # Errors
///
/// [`Error::ValueError`] when any radius or the gravitational parameter is
/// not positive and finite.
pub fn recommend(r1: f64, r2: f64, rb: f64, grav_param: f64) -> OrreryResult<TransferComparison> {
    validate_positive(r1, "Initial orbit radius")?;
    validate_positive(r2, "Final orbit radius")?;
    validate_positive(rb, "Intermediate apoapsis radius")?;
    validate_positive(grav_param, "Gravitational parameter")?;

    let (h1, h2, _) = hohmann_burns(r1, r2, grav_param);
    let (b1, b2, b3, _) = bi_elliptic_burns(r1, r2, rb, grav_param);

    let hohmann_delta_v = h1 + h2;
    let bi_elliptic_delta_v = b1 + b2 + b3;

    Ok(TransferComparison {
        hohmann_delta_v,
        bi_elliptic_delta_v,
        recommended: if bi_elliptic_delta_v < hohmann_delta_v {
            TransferKind::BiElliptic
        } else {
            TransferKind::Hohmann
        },
    })
}
