use cgmath::{Vector3, Zero};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Vector3<f32>,
    max: Vector3<f32>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vector3::zero(),
            max: Vector3::zero(),
        }
    }
}

impl Aabb {
    /// Box spanned by two opposite corners, in any order.
    pub fn new(a: Vector3<f32>, b: Vector3<f32>) -> Self {
        Self {
            min: component_min(a, b),
            max: component_max(a, b),
        }
    }

    /// Degenerate box containing only `point`.
    pub fn from_point(point: Vector3<f32>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vector3<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |mut aabb, point| {
            aabb.extend(point);
            aabb
        }))
    }

    /// Grows the box to contain `point`.
    pub fn extend(&mut self, point: Vector3<f32>) {
        self.min = component_min(self.min, point);
        self.max = component_max(self.max, point);
    }

    pub fn min(&self) -> Vector3<f32> {
        self.min
    }

    pub fn max(&self) -> Vector3<f32> {
        self.max
    }

    /// Extent of the box along each axis (`max - min`).
    pub fn diagonal(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3<f32> {
        self.min + self.diagonal() / 2.0
    }

    /// Largest component of the diagonal.
    pub fn longest_extent(&self) -> f32 {
        let diagonal = self.diagonal();
        diagonal.x.max(diagonal.y).max(diagonal.z)
    }
}

fn component_min(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

fn component_max(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}
