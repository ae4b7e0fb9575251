//! Object kind catalog
//!
//! Each kind owns its default physics profile and a factory that builds its
//! [`Renderable`]. External models resolve through the [`ModelCache`] and
//! fall back to a procedural shape while loading or after a failure.

use std::fmt;
use std::str::FromStr;

use crate::assets::ModelCache;
use crate::error::EngineError;
use crate::foundation::math::Vec3;
use crate::render::{Geometry, MaterialDesc, PrimitiveShape, RenderPart, Renderable};
use crate::scene::PhysicsProfile;

/// Catalog of placeable kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ObjectKind {
    /// Unit cube
    #[default]
    Cube,
    /// Sphere
    Sphere,
    /// Eight-sided cone
    Pyramid,
    /// Cylinder
    Cylinder,
    /// Torus
    Torus,
    /// Glass octahedron
    Diamond,
    /// Procedural chair (seat, back and four legs)
    Chair,
    /// External model by identifier
    Model(String),
}

impl ObjectKind {
    /// Built-in kinds, in selector order
    pub const BUILTIN: [ObjectKind; 7] = [
        ObjectKind::Cube,
        ObjectKind::Sphere,
        ObjectKind::Pyramid,
        ObjectKind::Cylinder,
        ObjectKind::Torus,
        ObjectKind::Diamond,
        ObjectKind::Chair,
    ];

    /// Catalog name
    pub fn name(&self) -> &str {
        match self {
            Self::Cube => "cube",
            Self::Sphere => "sphere",
            Self::Pyramid => "pyramid",
            Self::Cylinder => "cylinder",
            Self::Torus => "torus",
            Self::Diamond => "diamond",
            Self::Chair => "chair",
            Self::Model(name) => name,
        }
    }

    /// Parse a catalog name, defaulting to a cube for unknown entries
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|error: EngineError| {
            log::warn!("{error}; using cube");
            Self::Cube
        })
    }

    /// Base colour as 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            Self::Cube => 0x4C_AF_50,
            Self::Sphere => 0xF4_43_36,
            Self::Pyramid => 0xFF_C1_07,
            Self::Cylinder => 0x21_96_F3,
            Self::Torus => 0x9C_27_B0,
            Self::Diamond => 0x00_BC_D4,
            Self::Chair | Self::Model(_) => 0x8B_45_13,
        }
    }

    /// Default mass and bounce of the kind, with the given friction
    pub fn physics_profile(&self, friction: f32) -> PhysicsProfile {
        let (mass, bounce) = match self {
            Self::Cube => (1.0, 0.8),
            Self::Sphere => (0.8, 0.9),
            Self::Pyramid => (1.2, 0.6),
            Self::Cylinder => (1.1, 0.7),
            Self::Torus => (0.9, 0.8),
            Self::Diamond => (2.0, 1.0),
            Self::Chair | Self::Model(_) => (1.5, 0.4),
        };
        PhysicsProfile::clamped(mass, bounce, friction)
    }

    /// Build the renderable for this kind
    ///
    /// `Model` kinds use the cached mesh when it is ready; otherwise the
    /// chair composite stands in for "chair" and a cube for anything else.
    pub fn renderable(&self, models: &ModelCache) -> Renderable {
        match self {
            Self::Cube => cube(),
            Self::Sphere => sphere(),
            Self::Pyramid => pyramid(),
            Self::Cylinder => cylinder(),
            Self::Torus => torus(),
            Self::Diamond => diamond(),
            Self::Chair => chair(),
            Self::Model(name) => match models.get(name) {
                Some(mesh) => Renderable::mesh(
                    name.clone(),
                    mesh,
                    MaterialDesc::standard(self.color(), 0.1, 0.7),
                ),
                None => {
                    log::debug!("Model '{}' not ready, placing fallback geometry", name);
                    if name == "chair" {
                        chair()
                    } else {
                        cube()
                    }
                }
            },
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(name) => write!(f, "model:{name}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for ObjectKind {
    type Err = EngineError;

    /// Accepts built-in names (case-insensitive) and `model:<id>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(model) = trimmed.strip_prefix("model:") {
            return if model.is_empty() {
                Err(EngineError::InvalidKind(s.to_string()))
            } else {
                Ok(Self::Model(model.to_string()))
            };
        }
        Self::BUILTIN
            .iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .cloned()
            .ok_or_else(|| EngineError::InvalidKind(s.to_string()))
    }
}

fn cube() -> Renderable {
    Renderable::primitive(
        "cube",
        PrimitiveShape::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        },
        MaterialDesc::phong(ObjectKind::Cube.color()),
    )
}

fn sphere() -> Renderable {
    Renderable::primitive(
        "sphere",
        PrimitiveShape::Sphere {
            radius: 0.6,
            segments: 32,
        },
        MaterialDesc::standard(ObjectKind::Sphere.color(), 0.3, 0.4),
    )
}

fn pyramid() -> Renderable {
    Renderable::primitive(
        "pyramid",
        PrimitiveShape::Cone {
            radius: 0.6,
            height: 1.2,
            segments: 8,
        },
        MaterialDesc::phong(ObjectKind::Pyramid.color()),
    )
}

fn cylinder() -> Renderable {
    Renderable::primitive(
        "cylinder",
        PrimitiveShape::Cylinder {
            radius_top: 0.5,
            radius_bottom: 0.5,
            height: 1.0,
            segments: 16,
        },
        MaterialDesc::phong(ObjectKind::Cylinder.color()),
    )
}

fn torus() -> Renderable {
    Renderable::primitive(
        "torus",
        PrimitiveShape::Torus {
            radius: 0.6,
            tube: 0.3,
        },
        MaterialDesc::phong(ObjectKind::Torus.color()),
    )
}

fn diamond() -> Renderable {
    Renderable::primitive(
        "diamond",
        PrimitiveShape::Octahedron { radius: 0.8 },
        MaterialDesc::glass(ObjectKind::Diamond.color()),
    )
}

/// Seat, back and four legs; the origin sits between the feet
fn chair() -> Renderable {
    let wood = MaterialDesc::phong(0x8B_45_13);
    let legs = MaterialDesc::phong(0x65_43_21);
    let slab = |width, height, depth, offset: Vec3, material: &MaterialDesc| RenderPart {
        geometry: Geometry::Primitive(PrimitiveShape::Box { width, height, depth }),
        offset,
        material: material.clone(),
    };

    let mut parts = vec![
        slab(1.0, 0.1, 1.0, Vec3::new(0.0, 0.5, 0.0), &wood),
        slab(1.0, 1.0, 0.1, Vec3::new(0.0, 1.0, -0.45), &wood),
    ];
    for (x, z) in [(-0.4, -0.4), (0.4, -0.4), (-0.4, 0.4), (0.4, 0.4)] {
        parts.push(RenderPart {
            geometry: Geometry::Primitive(PrimitiveShape::Cylinder {
                radius_top: 0.05,
                radius_bottom: 0.05,
                height: 0.5,
                segments: 8,
            }),
            offset: Vec3::new(x, 0.25, z),
            material: legs.clone(),
        });
    }
    Renderable::composite("chair", parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{InMemoryLoader, MeshData};

    #[test]
    fn test_parse_builtin_and_model_names() {
        assert_eq!("Sphere".parse::<ObjectKind>().unwrap(), ObjectKind::Sphere);
        assert_eq!(
            "model:lamp".parse::<ObjectKind>().unwrap(),
            ObjectKind::Model("lamp".to_string())
        );
        assert!(matches!("rocket".parse::<ObjectKind>(), Err(EngineError::InvalidKind(_))));
        assert!("model:".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn test_unknown_kind_resolves_to_cube() {
        assert_eq!(ObjectKind::resolve("rocket"), ObjectKind::Cube);
        assert_eq!(ObjectKind::resolve("torus"), ObjectKind::Torus);
    }

    #[test]
    fn test_display_round_trips() {
        for kind in ObjectKind::BUILTIN {
            assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
        }
        let model = ObjectKind::Model("lamp".to_string());
        assert_eq!(model.to_string().parse::<ObjectKind>().unwrap(), model);
    }

    #[test]
    fn test_profiles_are_in_range() {
        for kind in ObjectKind::BUILTIN {
            let profile = kind.physics_profile(0.95);
            assert!((0.0..=1.0).contains(&profile.bounce()));
            assert_eq!(profile.friction(), 0.95);
            assert!(profile.mass() > 0.0);
        }
    }

    #[test]
    fn test_chair_is_composite() {
        let cache = ModelCache::new(1.2);
        let chair = ObjectKind::Chair.renderable(&cache);
        assert!(chair.is_composite());
        assert_eq!(chair.parts().len(), 6);
        assert!(chair.local_bounds().min.y.abs() < 1e-6);
    }

    #[test]
    fn test_model_falls_back_until_loaded() {
        let mut cache = ModelCache::new(1.2);
        let kind = ObjectKind::Model("chair".to_string());
        assert_eq!(kind.renderable(&cache).label(), "chair");
        assert!(!kind.renderable(&cache).uses_mesh());

        let other = ObjectKind::Model("lamp".to_string());
        assert_eq!(other.renderable(&cache).label(), "cube");

        let mesh = MeshData::new(
            vec![Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![0, 1, 2],
        );
        let mut loader = InMemoryLoader::new().with_mesh("lamp", mesh);
        cache.request("lamp", &mut loader);
        cache.poll(&mut loader);
        let loaded = other.renderable(&cache);
        assert!(loaded.uses_mesh());
        assert_eq!(loaded.label(), "lamp");
    }
}
