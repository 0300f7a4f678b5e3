use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec3f;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecError {
    #[error("{name} must be finite and greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative (got {value})")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} is not finite")]
    NonFinite { name: &'static str },
    #[error("inertia tensor is singular or non-finite: {0:?}")]
    SingularInertia(Vec3f),
    #[error("rotor speed bounds are inverted: omega_min={min} > omega_max={max}")]
    InvertedRotorBounds { min: f32, max: f32 },
    #[error("hover speed {hover} rad/s lies outside [{min}, {max}]")]
    HoverOutsideBounds { hover: f32, min: f32, max: f32 },
    #[error("home position {home:?} lies outside the ±{half_extent} envelope")]
    HomeOutsideEnvelope { home: Vec3f, half_extent: f32 },
}

pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, SpecError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SpecError::NotPositive { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<f32, SpecError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SpecError::Negative { name, value })
    }
}

pub(crate) fn finite_vec(name: &'static str, v: Vec3f) -> Result<Vec3f, SpecError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SpecError::NonFinite { name })
    }
}

/// Physical constants of one quadrotor airframe. Mass-normalized units (SI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirframeSpec {
    /// Thrust coefficient: `F = k_f · ω²` (N per (rad/s)²).
    pub k_f: f32,
    /// Reaction-torque coefficient: `M = k_m · ω²` (N·m per (rad/s)²).
    pub k_m: f32,
    /// Rotor-to-rotor diagonal span `L` (m). Each arm sits at `L/√2` along
    /// both body X and Z.
    pub arm_length: f32,
    /// Principal moments of inertia (body X, Y, Z), kg·m².
    pub inertia: Vec3f,
    pub mass: f32,
    /// Gravitational acceleration (m/s²), applied along world -Y.
    pub gravity: f32,
    pub omega_min: f32,
    pub omega_max: f32,
}

impl Default for AirframeSpec {
    fn default() -> Self {
        airframes::reference_quad_spec()
    }
}

impl AirframeSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        positive("k_f", self.k_f)?;
        positive("k_m", self.k_m)?;
        positive("arm_length", self.arm_length)?;
        positive("mass", self.mass)?;
        non_negative("gravity", self.gravity)?;
        if !self.inertia.is_finite() || self.inertia.min_element() <= 0.0 {
            return Err(SpecError::SingularInertia(self.inertia));
        }
        non_negative("omega_min", self.omega_min)?;
        positive("omega_max", self.omega_max)?;
        if self.omega_min > self.omega_max {
            return Err(SpecError::InvertedRotorBounds {
                min: self.omega_min,
                max: self.omega_max,
            });
        }
        let hover = self.hover_omega();
        if !(self.omega_min..=self.omega_max).contains(&hover) {
            return Err(SpecError::HoverOutsideBounds {
                hover,
                min: self.omega_min,
                max: self.omega_max,
            });
        }
        Ok(())
    }

    /// Rotor speed at which four equal rotors exactly carry the weight.
    pub fn hover_omega(&self) -> f32 {
        (self.mass * self.gravity / (4.0 * self.k_f)).sqrt()
    }

    /// Offset of each rotor along body X and Z: `L / √2`.
    pub fn arm_offset(&self) -> f32 {
        self.arm_length / std::f32::consts::SQRT_2
    }
}

/// Box the body must stay inside, and where it returns when it leaves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Largest allowed |coordinate| on any world axis (m).
    pub half_extent: f32,
    /// Hover initial condition position (m).
    pub home: Vec3f,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            half_extent: 1.0,
            home: Vec3f::new(0.0, 0.2, 0.0),
        }
    }
}

impl Envelope {
    pub fn validate(&self) -> Result<(), SpecError> {
        positive("envelope.half_extent", self.half_extent)?;
        finite_vec("envelope.home", self.home)?;
        if !self.contains(self.home) {
            return Err(SpecError::HomeOutsideEnvelope {
                home: self.home,
                half_extent: self.half_extent,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, p: Vec3f) -> bool {
        p.abs().max_element() <= self.half_extent
    }
}

pub mod airframes {
    use super::*;

    /// ~1 kg quadrotor with a 23 cm rotor span, scaled to the 1 m
    /// visualization box.
    pub fn reference_quad_spec() -> AirframeSpec {
        AirframeSpec {
            k_f: 0.001_414_465,
            k_m: 0.000_421_564,
            arm_length: 0.23,
            inertia: Vec3f::new(0.0121, 0.0223, 0.0119),
            mass: 1.0,
            gravity: 9.81,
            omega_min: 20.0,
            omega_max: 66.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_spec_is_valid_and_hovers_near_41_6() {
        let spec = airframes::reference_quad_spec();
        spec.validate().expect("reference spec validates");
        let hover = spec.hover_omega();
        assert!((hover - 41.64).abs() < 0.01, "hover={hover}");
    }

    #[test]
    fn rejects_bad_mass_and_inertia() {
        let mut spec = airframes::reference_quad_spec();
        spec.mass = 0.0;
        assert!(matches!(
            spec.validate(),
            Err(SpecError::NotPositive { name: "mass", .. })
        ));

        let mut spec = airframes::reference_quad_spec();
        spec.inertia = Vec3f::new(0.01, 0.0, 0.01);
        assert!(matches!(spec.validate(), Err(SpecError::SingularInertia(_))));

        let mut spec = airframes::reference_quad_spec();
        spec.inertia.z = f32::INFINITY;
        assert!(matches!(spec.validate(), Err(SpecError::SingularInertia(_))));
    }

    #[test]
    fn rejects_bounds_that_exclude_hover() {
        let mut spec = airframes::reference_quad_spec();
        spec.omega_max = 30.0;
        assert!(matches!(
            spec.validate(),
            Err(SpecError::HoverOutsideBounds { .. })
        ));
        spec.omega_min = 40.0;
        assert!(matches!(
            spec.validate(),
            Err(SpecError::InvertedRotorBounds { .. })
        ));
    }

    #[test]
    fn envelope_requires_home_inside() {
        let env = Envelope::default();
        env.validate().expect("default envelope validates");
        assert!(env.contains(Vec3f::new(1.0, -1.0, 0.5)));
        assert!(!env.contains(Vec3f::new(0.0, 1.0001, 0.0)));

        let bad = Envelope {
            half_extent: 0.1,
            ..Envelope::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(SpecError::HomeOutsideEnvelope { .. })
        ));
    }
}
