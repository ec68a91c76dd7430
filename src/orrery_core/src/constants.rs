//! Physical constants and reference values.
//!
//! Units follow the crate conventions, km for lengths, kg for masses, and
//! seconds for time. Gravitational parameters are km^3 / s^2.

/// Newtonian constant of gravitation in km^3 / (kg s^2).
pub const G: f64 = 6.6743e-20;

/// Gravitational parameter of the Sun in km^3 / s^2.
pub const GM_SUN: f64 = 1.32712440018e11;

/// Gravitational parameter of the Earth in km^3 / s^2.
pub const GM_EARTH: f64 = 398600.4418;

/// Gravitational parameter of the Moon in km^3 / s^2.
pub const GM_MOON: f64 = 4902.800066;

/// Mass of the Sun in kg.
pub const SUN_MASS: f64 = 1.989e30;

/// Mass of the Earth in kg.
pub const EARTH_MASS: f64 = 5.972e24;

/// Mass of the Moon in kg.
pub const MOON_MASS: f64 = 7.342e22;

/// Mean distance from the Earth to the Moon in km.
pub const EARTH_MOON_DISTANCE: f64 = 384400.0;

/// Geocentric radius of a low Earth orbit at 400 km altitude, in km.
pub const LEO_RADIUS: f64 = 6778.0;

/// Geocentric radius of a geostationary orbit, in km.
pub const GEO_RADIUS: f64 = 42164.0;

/// Routh critical mass ratio, `(1 - sqrt(23 / 27)) / 2`.
///
/// Triangular libration points of a two body system are linearly stable only
/// when the system mass ratio `m2 / (m1 + m2)` is below this value.
pub const ROUTH_CRITICAL_MASS_RATIO: f64 = 0.03852089650455137;
