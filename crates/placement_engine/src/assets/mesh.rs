//! Mesh data and axis-aligned bounds

use crate::foundation::math::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Centre point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Largest extent
    pub fn max_dimension(&self) -> f32 {
        self.size().max()
    }

    /// Bounds shifted by `offset`
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }
}

/// Triangle mesh in model space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Triangle indices into `positions`
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a mesh from positions and indices
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Bounds of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold(Bounds::new(first, first), |b, p| Bounds::new(b.min.inf(p), b.max.sup(p))),
        )
    }

    /// Whether every vertex is finite and every index in range
    pub fn is_well_formed(&self) -> bool {
        let count = self.positions.len();
        self.positions.iter().all(|p| p.iter().all(|c| c.is_finite()))
            && self.indices.iter().all(|&i| (i as usize) < count)
    }

    /// Scale and move the mesh so it stands on the ground
    ///
    /// The largest dimension becomes `target_size` (a flat or point mesh is
    /// treated as having size 1), the mesh is centred on X and Z, and its
    /// lowest vertex rests on `y = 0`.
    pub fn normalized(&self, target_size: f32) -> Option<Self> {
        let bounds = self.bounds()?;
        let max_dim = bounds.max_dimension();
        let max_dim = if max_dim > f32::EPSILON { max_dim } else { 1.0 };
        let scale = target_size / max_dim;

        let scaled_center = bounds.center() * scale;
        let shift = Vec3::new(-scaled_center.x, -bounds.min.y * scale, -scaled_center.z);

        Some(Self {
            positions: self.positions.iter().map(|p| p * scale + shift).collect(),
            indices: self.indices.clone(),
        })
    }
}
