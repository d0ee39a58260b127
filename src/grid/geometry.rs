use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// Physical extent of the spherical shell covered by the Yin and Yang grids
///
/// Both shell grids span `[r_min, r_max]` radially, latitude
/// `[pi/4 - pad, 3pi/4 + pad]` and longitude `[-3pi/4 - pad, 3pi/4 + pad]` in
/// their own local frame. The Zhong cube reaches one radial step past `r_min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellGeometry {
    pub r_min: f32,
    pub r_max: f32,
    /// extra angular overlap added to each end of the latitude and longitude spans
    pub pad: f32,
}

impl Default for ShellGeometry {
    fn default() -> Self {
        Self {
            r_min: 0.35,
            r_max: 1.0,
            pad: 0.0,
        }
    }
}

impl ShellGeometry {
    pub fn theta_range(&self) -> (f32, f32) {
        (FRAC_PI_4 - self.pad, 3.0 * FRAC_PI_4 + self.pad)
    }

    pub fn phi_range(&self) -> (f32, f32) {
        (-3.0 * FRAC_PI_4 - self.pad, 3.0 * FRAC_PI_4 + self.pad)
    }

    /// radial node spacing of a shell with `rad` radial nodes
    pub fn radial_step(&self, rad: usize) -> f32 {
        (self.r_max - self.r_min) / (rad - 1) as f32
    }

    /// half-edge of the Zhong cube, `r_min + dr`
    ///
    /// The face centers of the cube then sit on the second radial layer of
    /// the shells, so the core and the innermost shell cells overlap.
    pub fn zhong_half_edge(&self, rad: usize) -> f32 {
        self.r_min + self.radial_step(rad)
    }

    /// true if the local angles fall strictly inside the latitude / longitude spans
    pub fn covers(&self, theta: f32, phi: f32) -> bool {
        let (theta_from, theta_to) = self.theta_range();
        let (phi_from, phi_to) = self.phi_range();
        theta_from < theta && theta < theta_to && phi_from < phi && phi < phi_to
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.r_min > 0.0) {
            return Err(ConfigError::Geometry("inner radius must be positive"));
        }
        if !self.r_max.is_finite() {
            return Err(ConfigError::Geometry("outer radius must be finite"));
        }
        if !(self.r_min < self.r_max) {
            return Err(ConfigError::Geometry(
                "inner radius must be smaller than outer radius",
            ));
        }
        // keep the latitude span away from the local poles, rejects NaN and inf
        if !(self.pad >= 0.0 && self.pad < FRAC_PI_4) {
            return Err(ConfigError::Geometry("padding must lie in [0, pi/4)"));
        }
        Ok(())
    }
}

/// local spherical angles `(r, theta, phi)` of a point, theta measured from +z
pub fn spherical(point: super::Point) -> (f32, f32, f32) {
    let [x, y, z] = point;
    let r = (x * x + y * y + z * z).sqrt();
    if r == 0.0 {
        return (0.0, FRAC_PI_2, 0.0);
    }
    let theta = (z / r).clamp(-1.0, 1.0).acos();
    let phi = y.atan2(x);
    (r, theta, phi)
}
