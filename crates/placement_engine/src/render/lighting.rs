//! Light rig descriptions and the dynamic light animation

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Lighting mode selected by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LightingMode {
    /// Coloured point lights orbit the scene and the camera sways
    #[default]
    Dynamic,
    /// Static ambient + key light
    Simple,
}

/// Light type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Uniform ambient term
    Ambient,
    /// Directional light shining from `position` towards the origin
    Directional,
    /// Point light at `position`
    Point,
}

/// One light of the rig
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light type
    pub kind: LightKind,
    /// RGB colour as 0xRRGGBB
    pub color: u32,
    /// Intensity multiplier
    pub intensity: f32,
    /// Position (ignored for ambient lights)
    pub position: Vec3,
}

impl Light {
    fn new(kind: LightKind, color: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            kind,
            color,
            intensity,
            position,
        }
    }
}

/// Radius of the point-light orbit in dynamic mode
const POINT_ORBIT_RADIUS: f32 = 8.0;

/// The set of lights handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    mode: LightingMode,
    lights: Vec<Light>,
}

impl LightRig {
    /// Build the rig for a lighting mode
    pub fn for_mode(mode: LightingMode) -> Self {
        let lights = match mode {
            LightingMode::Dynamic => vec![
                Light::new(LightKind::Ambient, 0x40_40_40, 0.4, Vec3::zeros()),
                Light::new(LightKind::Directional, 0xFF_FF_FF, 1.0, Vec3::new(10.0, 10.0, 5.0)),
                Light::new(LightKind::Point, 0xFF_6B_6B, 0.8, Vec3::new(-5.0, 5.0, 3.0)),
                Light::new(LightKind::Point, 0x6B_6B_FF, 0.6, Vec3::new(5.0, -3.0, 3.0)),
                Light::new(LightKind::Directional, 0x00_FF_FF, 0.5, Vec3::new(-10.0, -10.0, -5.0)),
            ],
            LightingMode::Simple => vec![
                Light::new(LightKind::Ambient, 0xFF_FF_FF, 0.8, Vec3::zeros()),
                Light::new(LightKind::Directional, 0xFF_FF_FF, 0.6, Vec3::new(5.0, 5.0, 5.0)),
            ],
        };
        Self { mode, lights }
    }

    /// Mode this rig was built for
    pub fn mode(&self) -> LightingMode {
        self.mode
    }

    /// All lights
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Point lights only
    pub fn point_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(|l| l.kind == LightKind::Point)
    }

    /// Move point light `i` around the Y axis: `(sin(t + 2i)·8, y, cos(t + 2i)·8)`
    ///
    /// Only dynamic rigs animate; heights are kept.
    pub fn animate(&mut self, time: f32) {
        if self.mode != LightingMode::Dynamic {
            return;
        }
        for (index, light) in self
            .lights
            .iter_mut()
            .filter(|l| l.kind == LightKind::Point)
            .enumerate()
        {
            let phase = time + index as f32 * 2.0;
            light.position.x = phase.sin() * POINT_ORBIT_RADIUS;
            light.position.z = phase.cos() * POINT_ORBIT_RADIUS;
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::for_mode(LightingMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dynamic_point_lights_orbit() {
        let mut rig = LightRig::for_mode(LightingMode::Dynamic);
        rig.animate(0.5);

        let points: Vec<_> = rig.point_lights().collect();
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].position.x, 0.5f32.sin() * 8.0, epsilon = 1e-5);
        assert_relative_eq!(points[1].position.z, 2.5f32.cos() * 8.0, epsilon = 1e-5);
        assert_eq!(points[0].position.y, 5.0);
    }

    #[test]
    fn test_simple_rig_is_static() {
        let mut rig = LightRig::for_mode(LightingMode::Simple);
        let before = rig.clone();
        rig.animate(3.0);
        assert_eq!(rig, before);
        assert_eq!(rig.point_lights().count(), 0);
    }
}
