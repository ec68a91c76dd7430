//! Cartesian state, the position and velocity of an object at an instant.
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

/// Position and velocity of an object at a single instant, relative to the
/// central body.
///
/// Positions are in km and velocities in km / s. The state carries no epoch,
/// the caller tracks time externally when propagating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct CartesianState {
    /// Position in km.
    pub pos: Vector3<f64>,

    /// Velocity in km / s.
    pub vel: Vector3<f64>,
}

impl CartesianState {
    /// Construct a new state from position and velocity vectors.
    pub fn new(pos: Vector3<f64>, vel: Vector3<f64>) -> Self {
        Self { pos, vel }
    }

    /// Distance from the coordinate origin in km.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    /// Magnitude of the velocity in km / s.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Specific angular momentum vector in km^2 / s.
    ///
    /// This is normal to the orbital plane and conserved along a two body
    /// orbit.
    #[must_use]
    pub fn specific_angular_momentum(&self) -> Vector3<f64> {
        self.pos.cross(&self.vel)
    }

    /// Specific orbital energy in km^2 / s^2 for the given gravitational
    /// parameter in km^3 / s^2.
    ///
    /// Negative for closed orbits, positive for hyperbolic ones.
    #[must_use]
    pub fn specific_energy(&self, grav_param: f64) -> f64 {
        0.5 * self.vel.norm_squared() - grav_param / self.radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_scalars() {
        let state = CartesianState::new([3.0, 4.0, 0.0].into(), [0.0, 0.0, 2.0].into());
        assert!((state.radius() - 5.0).abs() < f64::EPSILON);
        assert!((state.speed() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_angular_momentum_direction() {
        // circular motion in the xy plane has angular momentum along +z
        let state = CartesianState::new([7000.0, 0.0, 0.0].into(), [0.0, 7.5, 0.0].into());
        let h = state.specific_angular_momentum();
        assert!(h.x.abs() < f64::EPSILON);
        assert!(h.y.abs() < f64::EPSILON);
        assert!((h.z - 7000.0 * 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_specific_energy_sign() {
        // slower than escape speed on a circular radius, energy is negative
        let bound = CartesianState::new([7000.0, 0.0, 0.0].into(), [0.0, 7.5, 0.0].into());
        assert!(bound.specific_energy(398600.4418) < 0.0);

        let unbound = CartesianState::new([7000.0, 0.0, 0.0].into(), [0.0, 12.0, 0.0].into());
        assert!(unbound.specific_energy(398600.4418) > 0.0);
    }
}
