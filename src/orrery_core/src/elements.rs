//! Keplerian orbital elements and their conversions to Cartesian state.
//!
//! Element angles are in degrees at this interface, matching the mission
//! parameter conventions of the upstream data sources. All internal math is
//! done in radians, and the anomaly conversion functions at the bottom of
//! this module work in radians directly.
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

use std::f64::consts::{PI, TAU};

use itertools::Itertools;
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, OrreryResult};
use crate::fitting::newton_raphson;
use crate::state::CartesianState;

/// Margin in radians kept between a sampled open-orbit path and its
/// asymptotic true anomaly limit, bounding the sampled radii to a small
/// multiple of the semi-major axis.
const OPEN_ORBIT_MARGIN: f64 = 0.1;

/// Eccentricities below this are treated as circular when recovering
/// elements from a Cartesian state.
const CIRCULAR_EPS: f64 = 1e-11;

/// Ratio of node line length to angular momentum below which an orbit is
/// treated as equatorial when recovering elements from a Cartesian state.
const PLANE_EPS: f64 = 1e-12;

/// Residual tolerance for the Kepler equation solve.
const KEPLER_ATOL: f64 = 1e-12;

/// Classical Keplerian orbital elements.
///
/// Angles are in degrees. Lengths are in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct OrbitalElements {
    /// Semi-major axis in km, positive.
    pub semi_major_axis: f64,

    /// Eccentricity, `0` circular, below `1` elliptical, `1` parabolic,
    /// above `1` hyperbolic.
    pub eccentricity: f64,

    /// Inclination in degrees.
    pub inclination: f64,

    /// Right ascension of the ascending node in degrees.
    pub ascending_node: f64,

    /// Argument of periapsis in degrees.
    pub arg_periapsis: f64,

    /// True anomaly in degrees, measured from periapsis.
    pub true_anomaly: f64,
}

impl OrbitalElements {
    /// Construct elements from the six classical values.
    ///
    /// # Arguments
    ///
    /// * `semi_major_axis` - Semi-major axis in km.
    /// * `eccentricity` - Eccentricity, at least 0.
    /// * `inclination` - Inclination in degrees.
    /// * `ascending_node` - Right ascension of the ascending node in degrees.
    /// * `arg_periapsis` - Argument of periapsis in degrees.
    /// * `true_anomaly` - True anomaly in degrees.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        ascending_node: f64,
        arg_periapsis: f64,
        true_anomaly: f64,
    ) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node,
            arg_periapsis,
            true_anomaly,
        }
    }

    /// Circular orbit of the given radius in the reference plane.
    pub fn circular(radius: f64) -> Self {
        Self::new(radius, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Elliptical orbit in the reference plane defined by its apsis radii.
    ///
    /// `periapsis` must not exceed `apoapsis`, both in km.
    pub fn from_apsides(periapsis: f64, apoapsis: f64) -> Self {
        let semi_major_axis = 0.5 * (periapsis + apoapsis);
        let eccentricity = (apoapsis - periapsis) / (apoapsis + periapsis);
        Self::new(semi_major_axis, eccentricity, 0.0, 0.0, 0.0, 0.0)
    }

    /// Check that the elements describe a geometrically meaningful orbit.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] when the semi-major axis is not positive and
    /// finite, or the eccentricity is negative or not finite.
    pub fn validate(&self) -> OrreryResult<()> {
        if !self.semi_major_axis.is_finite() || self.semi_major_axis <= 0.0 {
            return Err(Error::ValueError(
                "Semi-major axis must be positive and finite.".into(),
            ));
        }
        if !self.eccentricity.is_finite() || self.eccentricity < 0.0 {
            return Err(Error::ValueError(
                "Eccentricity must be non-negative and finite.".into(),
            ));
        }
        Ok(())
    }

    /// Semi-latus rectum `a * |1 - e^2|` in km.
    ///
    /// The absolute value keeps the value positive for hyperbolic elements,
    /// so open orbits sample the physically reachable branch.
    #[inline(always)]
    #[must_use]
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).abs()
    }

    /// Periapsis radius `a (1 - e)` in km.
    #[must_use]
    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Apoapsis radius `a (1 + e)` in km, only meaningful for closed orbits.
    #[must_use]
    pub fn apoapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Orbital radius in km at the given true anomaly in degrees.
    ///
    /// For open orbits the result is only meaningful while the true anomaly
    /// stays inside the asymptotic limit, beyond it the returned value is
    /// negative.
    #[inline(always)]
    #[must_use]
    pub fn radius_at(&self, true_anomaly: f64) -> f64 {
        let nu = true_anomaly.to_radians();
        self.semi_latus_rectum() / (1.0 + self.eccentricity * nu.cos())
    }

    /// Position in the orbital plane at the given true anomaly in degrees.
    ///
    /// The orbital plane has periapsis along +X and the motion counter
    /// clockwise toward +Y.
    #[must_use]
    pub fn position_in_plane(&self, true_anomaly: f64) -> Vector3<f64> {
        let nu = true_anomaly.to_radians();
        let radius = self.radius_at(true_anomaly);
        Vector3::new(radius * nu.cos(), radius * nu.sin(), 0.0)
    }

    /// Rotation taking orbital plane coordinates into the reference frame.
    ///
    /// Composed right to left, the argument of periapsis is applied first
    /// about Z, then the inclination about X, then the ascending node about
    /// Z again.
    #[must_use]
    pub fn plane_rotation(&self) -> Rotation3<f64> {
        let z_axis = Vector3::z_axis();
        Rotation3::from_axis_angle(&z_axis, self.ascending_node.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination.to_radians())
            * Rotation3::from_axis_angle(&z_axis, self.arg_periapsis.to_radians())
    }

    /// Position in the reference frame at the given true anomaly in degrees.
    #[must_use]
    pub fn position_at(&self, true_anomaly: f64) -> Vector3<f64> {
        self.plane_rotation() * self.position_in_plane(true_anomaly)
    }

    /// Recover the true anomaly in degrees, in `[0, 360)`, from a reference
    /// frame position on the orbit.
    #[must_use]
    pub fn true_anomaly_from_position(&self, position: &Vector3<f64>) -> f64 {
        let in_plane = self.plane_rotation().inverse_transform_vector(position);
        wrap_degrees(in_plane.y.atan2(in_plane.x).to_degrees())
    }

    /// Cartesian position and velocity for these elements.
    ///
    /// The velocity follows from the perifocal frame derivation, its
    /// magnitude satisfies the vis-viva equation.
    ///
    /// ```
    ///     use orrery_core::elements::OrbitalElements;
    ///     let state = OrbitalElements::circular(7000.0).state(398600.4418).unwrap();
    ///     let circular_speed = (398600.4418_f64 / 7000.0).sqrt();
    ///     assert!((state.speed() - circular_speed).abs() < 1e-9);
    /// ```
    ///
    /// # Arguments
    ///
    /// * `grav_param` - Gravitational parameter of the central body in
    ///   km^3 / s^2.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] for invalid elements, a non-positive
    /// gravitational parameter, exactly parabolic eccentricity, or a true
    /// anomaly beyond the asymptotic limit of an open orbit.
    pub fn state(&self, grav_param: f64) -> OrreryResult<CartesianState> {
        self.validate()?;
        if grav_param <= 0.0 {
            return Err(Error::ValueError(
                "Gravitational parameter must be positive.".into(),
            ));
        }
        if (self.eccentricity - 1.0).abs() < f64::EPSILON {
            return Err(Error::ValueError(
                "Parabolic elements have a vanishing semi-latus rectum and no finite shape."
                    .into(),
            ));
        }
        let ecc = self.eccentricity;
        let nu = self.true_anomaly.to_radians();
        let denom = 1.0 + ecc * nu.cos();
        if denom <= 0.0 {
            return Err(Error::ValueError(
                "True anomaly lies beyond the asymptotic limit of the open orbit.".into(),
            ));
        }

        let semi_latus = self.semi_latus_rectum();
        let radius = semi_latus / denom;
        let speed_scale = (grav_param / semi_latus).sqrt();

        let pos = Vector3::new(radius * nu.cos(), radius * nu.sin(), 0.0);
        let vel = Vector3::new(-speed_scale * nu.sin(), speed_scale * (ecc + nu.cos()), 0.0);

        let rotation = self.plane_rotation();
        Ok(CartesianState::new(rotation * pos, rotation * vel))
    }

    /// Recover orbital elements from a Cartesian state.
    ///
    /// Only closed orbits are supported. Degenerate geometries use the usual
    /// conventions, a circular orbit reports a zero argument of periapsis
    /// and an equatorial orbit a zero ascending node, with the remaining
    /// angles measured from the +X axis.
    ///
    /// # Arguments
    ///
    /// * `state` - Position and velocity relative to the central body.
    /// * `grav_param` - Gravitational parameter of the central body in
    ///   km^3 / s^2.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] when the gravitational parameter is not
    /// positive, the position sits at the origin, the trajectory is radial,
    /// or the state does not describe a closed orbit.
    pub fn from_state(state: &CartesianState, grav_param: f64) -> OrreryResult<Self> {
        if grav_param <= 0.0 {
            return Err(Error::ValueError(
                "Gravitational parameter must be positive.".into(),
            ));
        }
        let radius = state.radius();
        if radius < f64::EPSILON {
            return Err(Error::ValueError(
                "Position coincides with the central body.".into(),
            ));
        }
        let h_vec = state.specific_angular_momentum();
        let h = h_vec.norm();
        if h < f64::EPSILON {
            return Err(Error::ValueError(
                "Radial trajectories have no orbital plane.".into(),
            ));
        }
        let energy = state.specific_energy(grav_param);
        if energy >= 0.0 {
            return Err(Error::ValueError(
                "State describes an open trajectory, only closed orbits can be recovered."
                    .into(),
            ));
        }

        let semi_major_axis = -grav_param / (2.0 * energy);
        let e_vec = state.vel.cross(&h_vec) / grav_param - state.pos / radius;
        let ecc = e_vec.norm();
        let inclination = (h_vec.z / h).clamp(-1.0, 1.0).acos();

        let node_vec = Vector3::z().cross(&h_vec);
        let node = node_vec.norm();
        let equatorial = node <= PLANE_EPS * h;

        let ascending_node = if equatorial {
            0.0
        } else {
            wrap_radians(node_vec.y.atan2(node_vec.x))
        };

        let arg_periapsis = if ecc < CIRCULAR_EPS {
            0.0
        } else if equatorial {
            wrap_radians(e_vec.y.atan2(e_vec.x))
        } else {
            let cos_w = (node_vec.dot(&e_vec) / (node * ecc)).clamp(-1.0, 1.0);
            if e_vec.z < 0.0 {
                TAU - cos_w.acos()
            } else {
                cos_w.acos()
            }
        };

        let true_anomaly = if ecc < CIRCULAR_EPS {
            if equatorial {
                wrap_radians(state.pos.y.atan2(state.pos.x))
            } else {
                let cos_nu = (node_vec.dot(&state.pos) / (node * radius)).clamp(-1.0, 1.0);
                if state.pos.z < 0.0 {
                    TAU - cos_nu.acos()
                } else {
                    cos_nu.acos()
                }
            }
        } else {
            let cos_nu = (e_vec.dot(&state.pos) / (ecc * radius)).clamp(-1.0, 1.0);
            if state.pos.dot(&state.vel) < 0.0 {
                TAU - cos_nu.acos()
            } else {
                cos_nu.acos()
            }
        };

        Ok(Self {
            semi_major_axis,
            eccentricity: ecc,
            inclination: inclination.to_degrees(),
            ascending_node: ascending_node.to_degrees(),
            arg_periapsis: arg_periapsis.to_degrees(),
            true_anomaly: true_anomaly.to_degrees(),
        })
    }

    /// Orbital period in seconds for a closed orbit.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] for invalid elements, a non-positive
    /// gravitational parameter, or an open orbit.
    pub fn period(&self, grav_param: f64) -> OrreryResult<f64> {
        self.validate()?;
        if grav_param <= 0.0 {
            return Err(Error::ValueError(
                "Gravitational parameter must be positive.".into(),
            ));
        }
        if self.eccentricity >= 1.0 {
            return Err(Error::ValueError("Open orbits have no period.".into()));
        }
        Ok(TAU * (self.semi_major_axis.powi(3) / grav_param).sqrt())
    }

    /// Advance the orbit by `dt` seconds, returning elements at the new
    /// position along the same orbit.
    ///
    /// The mean anomaly is advanced at the mean motion and Kepler's equation
    /// is solved for the new eccentric anomaly with a bounded
    /// Newton-Raphson iteration.
    ///
    /// # Arguments
    ///
    /// * `grav_param` - Gravitational parameter of the central body in
    ///   km^3 / s^2.
    /// * `dt` - Elapsed time in seconds, may be negative.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] for invalid elements, a non-positive
    /// gravitational parameter, or an open orbit.
    /// [`Error::Convergence`] if the Kepler solve fails to converge.
    pub fn propagate(&self, grav_param: f64, dt: f64) -> OrreryResult<Self> {
        self.validate()?;
        if grav_param <= 0.0 {
            return Err(Error::ValueError(
                "Gravitational parameter must be positive.".into(),
            ));
        }
        if self.eccentricity >= 1.0 {
            return Err(Error::ValueError(
                "Only closed orbits can be propagated.".into(),
            ));
        }

        let ecc = self.eccentricity;
        let ecc_anomaly = eccentric_anomaly_from_true(self.true_anomaly.to_radians(), ecc);
        let mean_anomaly = mean_anomaly_from_eccentric(ecc_anomaly, ecc);

        let mean_motion = (grav_param / self.semi_major_axis.powi(3)).sqrt();
        let advanced = wrap_radians(mean_anomaly + mean_motion * dt);

        let ecc_anomaly = eccentric_anomaly_from_mean(advanced, ecc)?;
        let true_anomaly = wrap_degrees(true_anomaly_from_eccentric(ecc_anomaly, ecc).to_degrees());

        Ok(Self {
            true_anomaly,
            ..*self
        })
    }

    /// Sample the full orbit as an ordered polyline in the reference frame.
    ///
    /// Closed orbits sweep the true anomaly through a full revolution in
    /// `segments` equal steps, producing `segments + 1` points whose first
    /// and last entries coincide. Open orbits cannot be swept in full, the
    /// sweep is truncated inside the asymptotic true anomaly limit and the
    /// returned path carries a [`PathWarning::OpenOrbit`] diagnostic.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] for invalid elements or zero `segments`.
    pub fn orbit_path(&self, segments: usize) -> OrreryResult<OrbitPath> {
        self.validate()?;
        if segments == 0 {
            return Err(Error::ValueError(
                "At least one path segment is required.".into(),
            ));
        }

        if self.eccentricity < 1.0 {
            return Ok(OrbitPath {
                points: self.sweep(0.0, TAU, segments),
                warning: None,
            });
        }

        let limit = (-1.0 / self.eccentricity).acos() - OPEN_ORBIT_MARGIN;
        Ok(OrbitPath {
            points: self.sweep(-limit, limit, segments),
            warning: Some(PathWarning::OpenOrbit {
                true_anomaly_limit: limit.to_degrees(),
            }),
        })
    }

    /// Sample a partial orbit between two true anomalies in degrees.
    ///
    /// Produces `segments + 1` points from `start_true_anomaly` to
    /// `end_true_anomaly` inclusive.
    ///
    /// # Errors
    ///
    /// [`Error::ValueError`] for invalid elements, zero `segments`, or an
    /// open orbit, which can only be sampled through [`Self::orbit_path`].
    pub fn arc(
        &self,
        start_true_anomaly: f64,
        end_true_anomaly: f64,
        segments: usize,
    ) -> OrreryResult<Vec<Vector3<f64>>> {
        self.validate()?;
        if segments == 0 {
            return Err(Error::ValueError(
                "At least one path segment is required.".into(),
            ));
        }
        if self.eccentricity >= 1.0 {
            return Err(Error::ValueError(
                "Open orbits are sampled through orbit_path, which truncates at the asymptote."
                    .into(),
            ));
        }
        Ok(self.sweep(
            start_true_anomaly.to_radians(),
            end_true_anomaly.to_radians(),
            segments,
        ))
    }

    fn sweep(&self, start: f64, end: f64, segments: usize) -> Vec<Vector3<f64>> {
        let rotation = self.plane_rotation();
        let semi_latus = self.semi_latus_rectum();
        let step = (end - start) / segments as f64;
        (0..=segments)
            .map(|i| {
                let nu = start + step * i as f64;
                let radius = semi_latus / (1.0 + self.eccentricity * nu.cos());
                rotation * Vector3::new(radius * nu.cos(), radius * nu.sin(), 0.0)
            })
            .collect_vec()
    }
}

/// Orbit polyline in the reference frame, with an optional non-fatal
/// diagnostic attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitPath {
    /// Sampled points in km, ordered by increasing true anomaly.
    pub points: Vec<Vector3<f64>>,

    /// Present when the path is a best-effort rendition rather than a full
    /// orbit.
    pub warning: Option<PathWarning>,
}

/// Non-fatal diagnostics attached to a sampled orbit path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathWarning {
    /// The orbit is parabolic or hyperbolic, the sampled path covers only
    /// the reachable arc.
    OpenOrbit {
        /// True anomaly bound of the sampled arc, in degrees.
        true_anomaly_limit: f64,
    },
}

/// Eccentric anomaly in radians from a true anomaly in radians, `e < 1`.
#[must_use]
pub fn eccentric_anomaly_from_true(true_anomaly: f64, eccentricity: f64) -> f64 {
    let beta = (1.0 - eccentricity * eccentricity).sqrt();
    (beta * true_anomaly.sin()).atan2(eccentricity + true_anomaly.cos())
}

/// True anomaly in radians from an eccentric anomaly in radians, `e < 1`.
#[must_use]
pub fn true_anomaly_from_eccentric(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let beta = (1.0 - eccentricity * eccentricity).sqrt();
    (beta * eccentric_anomaly.sin()).atan2(eccentric_anomaly.cos() - eccentricity)
}

/// Mean anomaly in radians from an eccentric anomaly in radians, via
/// Kepler's equation `M = E - e sin E`.
#[must_use]
pub fn mean_anomaly_from_eccentric(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// Eccentric anomaly in radians from a mean anomaly in radians, by solving
/// Kepler's equation with a bounded Newton-Raphson iteration.
///
/// # Errors
///
/// [`Error::ValueError`] when the eccentricity is outside `[0, 1)`.
/// [`Error::Convergence`] if the iteration fails to converge.
pub fn eccentric_anomaly_from_mean(mean_anomaly: f64, eccentricity: f64) -> OrreryResult<f64> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(Error::ValueError(
            "Kepler's equation in this form only covers closed orbits.".into(),
        ));
    }
    let mean_anomaly = wrap_radians(mean_anomaly);

    // near periapsis of a highly eccentric orbit the derivative is small,
    // pi is the textbook safe start there
    let start = if eccentricity > 0.8 { PI } else { mean_anomaly };
    let root = newton_raphson(
        |x| x - eccentricity * x.sin() - mean_anomaly,
        |x| 1.0 - eccentricity * x.cos(),
        start,
        KEPLER_ATOL,
    )?;
    Ok(wrap_radians(root))
}

fn wrap_radians(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

fn wrap_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GM_EARTH;

    fn sample_elements() -> OrbitalElements {
        OrbitalElements::new(15000.0, 0.35, 35.0, 80.0, 120.0, 210.0)
    }

    #[test]
    fn test_validation() {
        assert!(sample_elements().validate().is_ok());

        let mut bad = sample_elements();
        bad.semi_major_axis = -1.0;
        assert!(bad.validate().is_err());

        bad = sample_elements();
        bad.semi_major_axis = f64::NAN;
        assert!(bad.validate().is_err());

        bad = sample_elements();
        bad.eccentricity = -0.1;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_radius_at_apsides() {
        let elements = OrbitalElements::new(12000.0, 0.2, 0.0, 0.0, 0.0, 0.0);
        assert!((elements.radius_at(0.0) - 9600.0).abs() < 1e-9);
        assert!((elements.radius_at(180.0) - 14400.0).abs() < 1e-9);
        assert!((elements.periapsis() - 9600.0).abs() < 1e-9);
        assert!((elements.apoapsis() - 14400.0).abs() < 1e-9);
    }

    #[test]
    fn test_plane_rotation_inclination() {
        // a polar orbit lifts the +Y in-plane direction onto +Z
        let elements = OrbitalElements::new(10000.0, 0.0, 90.0, 0.0, 0.0, 0.0);
        let position = elements.position_at(90.0);
        assert!(position.x.abs() < 1e-9);
        assert!(position.y.abs() < 1e-9);
        assert!((position.z - 10000.0).abs() < 1e-9);
    }

    #[test]
    fn test_true_anomaly_roundtrip() {
        let elements = sample_elements();
        for nu in [0.0, 45.0, 133.7, 250.0, 359.0] {
            let position = elements.position_at(nu);
            let recovered = elements.true_anomaly_from_position(&position);
            let diff = (recovered - nu).rem_euclid(360.0);
            assert!(
                diff < 1e-9 || diff > 360.0 - 1e-9,
                "true anomaly {nu} recovered as {recovered}"
            );
        }
    }

    #[test]
    fn test_state_satisfies_vis_viva() {
        let elements = sample_elements();
        let state = elements.state(GM_EARTH).unwrap();

        let radius = state.radius();
        let expected =
            (GM_EARTH * (2.0 / radius - 1.0 / elements.semi_major_axis)).sqrt();
        assert!((state.speed() - expected).abs() < 1e-9);

        // angular momentum is normal to the orbital plane
        let h = state.specific_angular_momentum();
        let normal = elements.plane_rotation() * Vector3::z();
        assert!((h.normalize() - normal).norm() < 1e-9);
        let expected_h = (GM_EARTH * elements.semi_latus_rectum()).sqrt();
        assert!((h.norm() - expected_h).abs() < 1e-6);
    }

    #[test]
    fn test_state_rejects_bad_inputs() {
        assert!(sample_elements().state(0.0).is_err());
        assert!(sample_elements().state(-5.0).is_err());

        let mut parabolic = sample_elements();
        parabolic.eccentricity = 1.0;
        assert!(parabolic.state(GM_EARTH).is_err());

        // hyperbolic state works inside the asymptote and fails beyond it
        let mut hyperbolic = sample_elements();
        hyperbolic.eccentricity = 1.5;
        hyperbolic.true_anomaly = 30.0;
        assert!(hyperbolic.state(GM_EARTH).is_ok());
        hyperbolic.true_anomaly = 170.0;
        assert!(hyperbolic.state(GM_EARTH).is_err());
    }

    #[test]
    fn test_elements_state_roundtrip() {
        let elements = sample_elements();
        let state = elements.state(GM_EARTH).unwrap();
        let recovered = OrbitalElements::from_state(&state, GM_EARTH).unwrap();

        assert!((recovered.semi_major_axis - elements.semi_major_axis).abs() < 1e-6);
        assert!((recovered.eccentricity - elements.eccentricity).abs() < 1e-9);
        assert!((recovered.inclination - elements.inclination).abs() < 1e-6);
        assert!((recovered.ascending_node - elements.ascending_node).abs() < 1e-6);
        assert!((recovered.arg_periapsis - elements.arg_periapsis).abs() < 1e-6);
        assert!((recovered.true_anomaly - elements.true_anomaly).abs() < 1e-6);
    }

    #[test]
    fn test_from_state_circular_equatorial() {
        // position angle folds entirely into the true anomaly
        let elements = OrbitalElements::new(7000.0, 0.0, 0.0, 0.0, 0.0, 123.0);
        let state = elements.state(GM_EARTH).unwrap();
        let recovered = OrbitalElements::from_state(&state, GM_EARTH).unwrap();

        assert!((recovered.semi_major_axis - 7000.0).abs() < 1e-6);
        assert!(recovered.eccentricity < 1e-9);
        assert!(recovered.inclination.abs() < 1e-9);
        assert!((recovered.true_anomaly - 123.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_state_rejects_degenerate() {
        let radial = CartesianState::new([7000.0, 0.0, 0.0].into(), [1.0, 0.0, 0.0].into());
        assert!(OrbitalElements::from_state(&radial, GM_EARTH).is_err());

        let escaping = CartesianState::new([7000.0, 0.0, 0.0].into(), [0.0, 12.0, 0.0].into());
        assert!(OrbitalElements::from_state(&escaping, GM_EARTH).is_err());

        let at_origin = CartesianState::new([0.0; 3].into(), [0.0, 7.5, 0.0].into());
        assert!(OrbitalElements::from_state(&at_origin, GM_EARTH).is_err());
    }

    #[test]
    fn test_period() {
        let elements = OrbitalElements::new(12000.0, 0.2, 0.0, 0.0, 0.0, 40.0);
        let period = elements.period(GM_EARTH).unwrap();
        assert!((period - 13082.32).abs() < 0.5);

        let mut open = elements;
        open.eccentricity = 1.2;
        assert!(open.period(GM_EARTH).is_err());
    }

    #[test]
    fn test_propagate_full_period_returns_home() {
        let elements = OrbitalElements::new(12000.0, 0.2, 20.0, 30.0, 40.0, 40.0);
        let period = elements.period(GM_EARTH).unwrap();

        let advanced = elements.propagate(GM_EARTH, period).unwrap();
        let diff = (advanced.true_anomaly - elements.true_anomaly).rem_euclid(360.0);
        assert!(diff < 1e-6 || diff > 360.0 - 1e-6, "drifted to {diff}");

        // shape and orientation are untouched by propagation
        assert!((advanced.semi_major_axis - elements.semi_major_axis).abs() < f64::EPSILON);
        assert!((advanced.inclination - elements.inclination).abs() < f64::EPSILON);
    }

    #[test]
    fn test_propagate_quarter_period() {
        let elements = OrbitalElements::new(12000.0, 0.2, 0.0, 0.0, 0.0, 40.0);
        let period = elements.period(GM_EARTH).unwrap();

        let advanced = elements.propagate(GM_EARTH, 0.25 * period).unwrap();
        assert!((advanced.true_anomaly - 134.9125).abs() < 1e-3);

        // negative dt walks backwards to the start
        let back = advanced.propagate(GM_EARTH, -0.25 * period).unwrap();
        assert!((back.true_anomaly - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_propagate_rejects_open_orbits() {
        let mut open = sample_elements();
        open.eccentricity = 1.1;
        assert!(open.propagate(GM_EARTH, 100.0).is_err());
    }

    #[test]
    fn test_anomaly_conversion_roundtrip() {
        for ecc in [0.0, 0.3, 0.85] {
            for nu in [0.0, 0.7, 2.5, 4.0, 6.0] {
                let ecc_anomaly = eccentric_anomaly_from_true(nu, ecc);
                let mean = mean_anomaly_from_eccentric(ecc_anomaly, ecc);
                let back = eccentric_anomaly_from_mean(mean, ecc).unwrap();
                let recovered = wrap_radians(true_anomaly_from_eccentric(back, ecc));
                let diff = (recovered - wrap_radians(nu)).abs();
                assert!(
                    diff < 1e-9 || (TAU - diff) < 1e-9,
                    "ecc {ecc} nu {nu} recovered {recovered}"
                );
            }
        }
    }

    #[test]
    fn test_orbit_path_closed() {
        let elements = sample_elements();
        let path = elements.orbit_path(128).unwrap();

        assert_eq!(path.points.len(), 129);
        assert!(path.warning.is_none());
        let gap = (path.points[0] - path.points[128]).norm();
        assert!(gap < 1e-6, "closed orbit path should wrap, gap {gap}");

        // all sampled points sit on the ellipse
        for point in &path.points {
            let nu = elements.true_anomaly_from_position(point);
            assert!((point.norm() - elements.radius_at(nu)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_orbit_path_open_truncates() {
        let mut open = sample_elements();
        open.eccentricity = 1.5;
        let path = open.orbit_path(64).unwrap();

        assert_eq!(path.points.len(), 65);
        let Some(PathWarning::OpenOrbit { true_anomaly_limit }) = path.warning else {
            panic!("open orbit must carry a warning");
        };
        assert!(true_anomaly_limit < 131.9);

        for point in &path.points {
            assert!(point.norm().is_finite());
            // truncation keeps the radii bounded
            assert!(point.norm() < 20.0 * open.semi_major_axis);
        }
    }

    #[test]
    fn test_orbit_path_rejects_bad_inputs() {
        assert!(sample_elements().orbit_path(0).is_err());

        let mut bad = sample_elements();
        bad.eccentricity = -0.5;
        assert!(bad.orbit_path(64).is_err());
    }

    #[test]
    fn test_arc_endpoints() {
        let elements = OrbitalElements::new(12000.0, 0.2, 0.0, 0.0, 0.0, 0.0);
        let points = elements.arc(0.0, 180.0, 32).unwrap();

        assert_eq!(points.len(), 33);
        assert!((points[0] - Vector3::new(9600.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((points[32] - Vector3::new(-14400.0, 0.0, 0.0)).norm() < 1e-9);

        let mut open = elements;
        open.eccentricity = 2.0;
        assert!(open.arc(0.0, 90.0, 8).is_err());
    }
}
