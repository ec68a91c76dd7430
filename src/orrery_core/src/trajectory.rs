//! Trajectory primitives, caller supplied waypoints and burn markers.
//!
//! The core does not compute these, it only measures and interpolates over
//! them. Every query is total over non-empty trajectories so the rendering
//! layer always has a usable value per frame.

use itertools::Itertools;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Category of an impulsive burn, named by its thrust direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnKind {
    /// Along the velocity vector.
    Prograde,
    /// Against the velocity vector.
    Retrograde,
    /// Along the orbit normal.
    Normal,
    /// Along the radial direction.
    Radial,
    /// Any other direction, described by the marker's direction field.
    Custom,
}

/// A named point along a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Waypoint {
    /// Position in km.
    pub position: Vector3<f64>,

    /// Optional display name.
    pub name: Option<String>,

    /// Optional timestamp in seconds since the trajectory epoch.
    pub time: Option<f64>,

    /// Optional velocity at this point in km / s.
    pub velocity: Option<Vector3<f64>>,
}

impl Waypoint {
    /// A bare waypoint at a position, with no name, time, or velocity.
    pub fn at(position: Vector3<f64>) -> Self {
        Self {
            position,
            name: None,
            time: None,
            velocity: None,
        }
    }
}

/// A maneuver annotation attached to a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct BurnMarker {
    /// Where the burn happens, in km.
    pub position: Vector3<f64>,

    /// Magnitude of the velocity change in m/s.
    pub delta_v: f64,

    /// Optional thrust direction, meaningful for [`BurnKind::Custom`].
    pub direction: Option<Vector3<f64>>,

    /// Optional burn duration in seconds.
    pub duration: Option<f64>,

    /// Thrust direction category.
    pub kind: BurnKind,
}

/// An ordered sequence of waypoints with attached burn markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Trajectory {
    /// Waypoints in flight order.
    pub waypoints: Vec<Waypoint>,

    /// Burn annotations, in execution order.
    pub burns: Vec<BurnMarker>,
}

impl Trajectory {
    /// Build a trajectory from waypoints and burn markers.
    pub fn new(waypoints: Vec<Waypoint>, burns: Vec<BurnMarker>) -> Self {
        Self { waypoints, burns }
    }

    /// Polyline arc length in km, zero for fewer than two waypoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.waypoints
            .iter()
            .tuple_windows()
            .map(|(a, b)| (b.position - a.position).norm())
            .sum()
    }

    /// Elapsed time in seconds between the first and last waypoint, when
    /// both carry timestamps.
    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        let first = self.waypoints.first()?.time?;
        let last = self.waypoints.last()?.time?;
        Some(last - first)
    }

    /// Sum of all burn marker magnitudes in m/s.
    #[must_use]
    pub fn total_delta_v(&self) -> f64 {
        self.burns.iter().map(|burn| burn.delta_v).sum()
    }

    /// Position at the normalized arc length parameter `u`, linearly
    /// interpolated between waypoints.
    ///
    /// `u` is clamped to `[0, 1]`, so out of range parameters return the
    /// endpoints rather than extrapolating. `None` only when the trajectory
    /// has no waypoints at all.
    #[must_use]
    pub fn position_at(&self, u: f64) -> Option<Vector3<f64>> {
        let first = self.waypoints.first()?;

        let total = self.length();
        if total < f64::EPSILON {
            // single waypoint, or all waypoints coincide
            return Some(first.position);
        }

        let mut remaining = u.clamp(0.0, 1.0) * total;
        for (a, b) in self.waypoints.iter().tuple_windows() {
            let segment = (b.position - a.position).norm();
            if remaining <= segment {
                if segment < f64::EPSILON {
                    return Some(a.position);
                }
                return Some(a.position.lerp(&b.position, remaining / segment));
            }
            remaining -= segment;
        }

        // float accumulation can leave a sliver past the last segment
        self.waypoints.last().map(|waypoint| waypoint.position)
    }
}
