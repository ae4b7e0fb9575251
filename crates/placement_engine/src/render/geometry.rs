//! Renderable geometry descriptions
//!
//! Every placed object carries a [`Renderable`]: an ordered list of parts,
//! each with its own geometry, local offset and material. A primitive shape
//! is a single part at the origin; a composite (for example the procedural
//! chair) is several parts. Parts only hold offsets relative to the object
//! origin, so rotating the object rotates the whole group as one rigid unit.

use std::sync::Arc;

use crate::assets::{Bounds, MeshData};
use crate::foundation::math::{Mat4, Vec3};

/// Procedural primitive shapes, dimensions in world units
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveShape {
    /// Axis-aligned box
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// UV sphere
    Sphere {
        /// Radius
        radius: f32,
        /// Longitude/latitude segment count
        segments: u32,
    },
    /// Cone with its axis on Y
    Cone {
        /// Base radius
        radius: f32,
        /// Height
        height: f32,
        /// Radial segments
        segments: u32,
    },
    /// Cylinder with its axis on Y
    Cylinder {
        /// Top radius
        radius_top: f32,
        /// Bottom radius
        radius_bottom: f32,
        /// Height
        height: f32,
        /// Radial segments
        segments: u32,
    },
    /// Torus in the XY plane
    Torus {
        /// Distance from the centre to the tube centre
        radius: f32,
        /// Tube radius
        tube: f32,
    },
    /// Regular octahedron
    Octahedron {
        /// Circumradius
        radius: f32,
    },
}

impl PrimitiveShape {
    /// Local-space bounds centred on the origin
    pub fn bounds(&self) -> Bounds {
        let half = match *self {
            Self::Box { width, height, depth } => Vec3::new(width, height, depth) * 0.5,
            Self::Sphere { radius, .. } | Self::Octahedron { radius } => Vec3::repeat(radius),
            Self::Cone { radius, height, .. } => Vec3::new(radius, height * 0.5, radius),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                ..
            } => {
                let r = radius_top.max(radius_bottom);
                Vec3::new(r, height * 0.5, r)
            }
            Self::Torus { radius, tube } => Vec3::new(radius + tube, radius + tube, tube),
        };
        Bounds::new(-half, half)
    }
}

/// Shading model hint for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Blinn-Phong with specular highlight
    Phong,
    /// Metal/roughness PBR
    Standard,
    /// PBR with transmission (glass-like)
    Physical,
    /// Flat colour, no lighting
    Unlit,
}

/// Material description; the renderer turns it into a material handle
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    /// RGB colour as 0xRRGGBB
    pub color: u32,
    /// Base opacity, multiplied by the object's lifecycle opacity
    pub opacity: f32,
    /// PBR metalness
    pub metalness: f32,
    /// PBR roughness
    pub roughness: f32,
    /// Transmission for glass-like materials
    pub transmission: f32,
    /// Shading model
    pub shading: Shading,
}

impl MaterialDesc {
    /// Opaque-ish Phong material of the given colour
    pub fn phong(color: u32) -> Self {
        Self {
            color,
            opacity: 0.9,
            metalness: 0.0,
            roughness: 0.5,
            transmission: 0.0,
            shading: Shading::Phong,
        }
    }

    /// Standard PBR material
    pub fn standard(color: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            opacity: 0.9,
            metalness,
            roughness,
            transmission: 0.0,
            shading: Shading::Standard,
        }
    }

    /// Flat, transparent colour (particles)
    pub fn unlit(color: u32, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            metalness: 0.0,
            roughness: 1.0,
            transmission: 0.0,
            shading: Shading::Unlit,
        }
    }

    /// Glass-like physical material
    pub fn glass(color: u32) -> Self {
        Self {
            color,
            opacity: 0.8,
            metalness: 0.1,
            roughness: 0.1,
            transmission: 0.9,
            shading: Shading::Physical,
        }
    }
}

/// Geometry source of one part
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Procedural shape
    Primitive(PrimitiveShape),
    /// Normalised external mesh, shared between all placements of the model
    Mesh(Arc<MeshData>),
}

impl Geometry {
    /// Local-space bounds of the geometry
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Primitive(shape) => shape.bounds(),
            Self::Mesh(mesh) => mesh.bounds().unwrap_or_default(),
        }
    }
}

/// One part of a renderable
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPart {
    /// Geometry of the part
    pub geometry: Geometry,
    /// Offset from the object origin, in object space
    pub offset: Vec3,
    /// Material of the part
    pub material: MaterialDesc,
}

/// Uniform renderable abstraction shared by primitives, composites and meshes
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    label: String,
    parts: Vec<RenderPart>,
}

impl Renderable {
    /// Single primitive at the object origin
    pub fn primitive(label: impl Into<String>, shape: PrimitiveShape, material: MaterialDesc) -> Self {
        Self {
            label: label.into(),
            parts: vec![RenderPart {
                geometry: Geometry::Primitive(shape),
                offset: Vec3::zeros(),
                material,
            }],
        }
    }

    /// Group of parts moving as one rigid unit
    pub fn composite(label: impl Into<String>, parts: Vec<RenderPart>) -> Self {
        Self {
            label: label.into(),
            parts,
        }
    }

    /// Loaded mesh at the object origin
    pub fn mesh(label: impl Into<String>, mesh: Arc<MeshData>, material: MaterialDesc) -> Self {
        Self {
            label: label.into(),
            parts: vec![RenderPart {
                geometry: Geometry::Mesh(mesh),
                offset: Vec3::zeros(),
                material,
            }],
        }
    }

    /// Human-readable label (kind name, model name)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parts in draw order
    pub fn parts(&self) -> &[RenderPart] {
        &self.parts
    }

    /// Whether this renderable has more than one part
    pub fn is_composite(&self) -> bool {
        self.parts.len() > 1
    }

    /// Whether any part uses an external mesh
    pub fn uses_mesh(&self) -> bool {
        self.parts.iter().any(|p| matches!(p.geometry, Geometry::Mesh(_)))
    }

    /// World matrix of every part given the object's world matrix
    pub fn part_matrices(&self, object_matrix: &Mat4) -> Vec<Mat4> {
        self.parts
            .iter()
            .map(|part| object_matrix * Mat4::new_translation(&part.offset))
            .collect()
    }

    /// Object-space bounds of all parts
    pub fn local_bounds(&self) -> Bounds {
        self.parts
            .iter()
            .map(|part| part.geometry.bounds().translated(part.offset))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default()
    }
}
