//! partforge — parametric 3D-printable mechanical parts in Rust
//!
//! Generates threaded capsules, screw-cap containers, electronics enclosures
//! and container adapters by composing CSG operations from an external solid
//! kernel, plus the small set of geometric algorithms shared across part
//! families: a dome/dent profile fitter, a crossed-helix knurl tool generator
//! and a ventilation mesh tiler.
//!
//! # Example
//!
//! ```rust,no_run
//! use partforge::Part;
//!
//! let plate = Part::cuboid("plate", 40.0, 30.0, 3.0);
//! let hole = Part::cylinder("hole", 2.0, 5.0, 32).translate(10.0, 0.0, -1.0);
//! let result = plate.difference(&hole);
//! result.write_stl("plate_with_hole.stl").unwrap();
//! ```

use csgrs::csg::CSG;
use nalgebra::Vector3;
use thiserror::Error;

pub mod dome;
pub mod knurl;
pub mod parts;
pub mod sketch;
pub mod sweep;
pub mod thread;
pub mod vent;

/// Triangle-mesh CSG solid from the external kernel.
type Solid = CSG<()>;

/// Errors returned by geometry construction and export.
#[derive(Error, Debug)]
pub enum GeomError {
    /// A parameter combination cannot produce a valid solid.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A zero or negative dimension where a positive value is required.
    #[error("degenerate input: {name} must be positive, got {value}")]
    DegenerateInput {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An I/O error occurred during export.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The kernel failed to serialize the mesh.
    #[error("STL export failed: {0}")]
    StlExport(String),
}

/// Reject a non-positive dimension.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), GeomError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(GeomError::DegenerateInput { name, value })
    }
}

/// A named part with geometry.
///
/// Parts are the primary building block. Create primitives with
/// [`Part::cuboid`], [`Part::cylinder`], [`Part::sphere`], combine them with
/// CSG operations ([`Part::union`], [`Part::difference`],
/// [`Part::intersection`]) or the operator shorthands (`+`, `-`, `&`), then
/// export with [`Part::write_stl`].
pub struct Part {
    /// Human-readable name for this part (used in export metadata).
    pub name: String,
    solid: Solid,
}

impl Part {
    fn new(name: impl Into<String>, solid: Solid) -> Self {
        Self {
            name: name.into(),
            solid,
        }
    }

    /// Create an empty part.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Solid::from_polygons(&[]))
    }

    /// Create a box centered in XY, spanning `0..height` along Z.
    pub fn cuboid(name: impl Into<String>, x: f64, y: f64, height: f64) -> Self {
        let half_x = x / 2.0;
        let half_y = y / 2.0;
        let footprint = [
            [-half_x, -half_y],
            [half_x, -half_y],
            [half_x, half_y],
            [-half_x, half_y],
        ];
        Self::new(name, Solid::polygon(&footprint, None).extrude(height))
    }

    /// Create a cylinder along the Z axis, spanning `0..height`.
    pub fn cylinder(name: impl Into<String>, radius: f64, height: f64, segments: usize) -> Self {
        Self::new(name, Solid::cylinder(radius, height, segments, None))
    }

    /// Create a sphere centered at origin.
    pub fn sphere(name: impl Into<String>, radius: f64, segments: usize) -> Self {
        let stacks = (segments / 2).max(3);
        Self::new(name, Solid::sphere(radius, segments, stacks, None))
    }

    /// Create a straight prism from a closed 2D outline, spanning `0..height`.
    ///
    /// The outline is forced counter-clockwise before extrusion.
    pub fn prism(
        name: impl Into<String>,
        outline: &[[f64; 2]],
        height: f64,
    ) -> Result<Self, GeomError> {
        if outline.len() < 3 {
            return Err(GeomError::InvalidGeometry(format!(
                "prism outline needs at least 3 points, got {}",
                outline.len()
            )));
        }
        require_positive("height", height)?;
        let points = sketch::ensure_ccw(outline);
        Ok(Self::new(name, Solid::polygon(&points, None).extrude(height)))
    }

    /// Create a solid from raw triangle data.
    ///
    /// `faces` must describe a closed, outward-wound triangle mesh.
    pub fn polyhedron(
        name: impl Into<String>,
        points: &[[f64; 3]],
        faces: &[[usize; 3]],
    ) -> Result<Self, GeomError> {
        let face_vecs: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
        let solid = Solid::polyhedron(points, &face_vecs, None);
        Ok(Self::new(name, solid))
    }

    /// Boolean union (self + other).
    pub fn union(&self, other: &Part) -> Self {
        Self::new(
            format!("{}-union", self.name),
            self.solid.union(&other.solid),
        )
    }

    /// Boolean difference (self - other).
    pub fn difference(&self, other: &Part) -> Self {
        Self::new(
            format!("{}-diff", self.name),
            self.solid.difference(&other.solid),
        )
    }

    /// Boolean intersection.
    pub fn intersection(&self, other: &Part) -> Self {
        Self::new(
            format!("{}-intersect", self.name),
            self.solid.intersection(&other.solid),
        )
    }

    /// Translate the part.
    pub fn translate(&self, x: f64, y: f64, z: f64) -> Self {
        Self::new(self.name.clone(), self.solid.translate(x, y, z))
    }

    /// Translate by vector.
    pub fn translate_vec(&self, v: Vector3<f64>) -> Self {
        self.translate(v.x, v.y, v.z)
    }

    /// Rotate the part about the origin (angles in degrees, applied X, Y, Z).
    pub fn rotate(&self, x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        Self::new(self.name.clone(), self.solid.rotate(x_deg, y_deg, z_deg))
    }

    /// Scale the part.
    pub fn scale(&self, x: f64, y: f64, z: f64) -> Self {
        Self::new(self.name.clone(), self.solid.scale(x, y, z))
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    pub fn bounding_box(&self) -> ([f64; 3], [f64; 3]) {
        let aabb = self.solid.bounding_box();
        (
            [aabb.mins.x, aabb.mins.y, aabb.mins.z],
            [aabb.maxs.x, aabb.maxs.y, aabb.maxs.z],
        )
    }

    /// Check if geometry is empty.
    pub fn is_empty(&self) -> bool {
        let (min, max) = self.bounding_box();
        // An empty kernel mesh yields an inverted box.
        min[0] > max[0] || min[1] > max[1] || min[2] > max[2]
    }

    /// Split at the plane `z = at` into `(below, above)` halves.
    pub fn split_at_z(&self, at: f64) -> (Part, Part) {
        let (min, max) = self.bounding_box();
        let pad = 1.0;
        let size_x = (max[0] - min[0]).abs() + 2.0 * pad;
        let size_y = (max[1] - min[1]).abs() + 2.0 * pad;
        let below_h = (at - min[2]).abs() + pad;
        let above_h = (max[2] - at).abs() + pad;
        let cx = (min[0] + max[0]) / 2.0;
        let cy = (min[1] + max[1]) / 2.0;

        let lower_slab =
            Part::cuboid("lower", size_x, size_y, below_h).translate(cx, cy, at - below_h);
        let upper_slab = Part::cuboid("upper", size_x, size_y, above_h).translate(cx, cy, at);

        let below = Part::new(format!("{}-below", self.name), self.solid.clone())
            .intersection(&lower_slab);
        let above = Part::new(format!("{}-above", self.name), self.solid.clone())
            .intersection(&upper_slab);
        (below, above)
    }

    /// Export to binary STL bytes.
    pub fn to_stl(&self) -> Result<Vec<u8>, GeomError> {
        self.solid
            .to_stl_binary(&self.name)
            .map_err(|e| GeomError::StlExport(format!("{e:?}")))
    }

    /// Write binary STL to file.
    pub fn write_stl(&self, path: impl AsRef<std::path::Path>) -> Result<(), GeomError> {
        let bytes = self.to_stl()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Clone for Part {
    fn clone(&self) -> Self {
        Self::new(self.name.clone(), self.solid.clone())
    }
}

/// Helper to create a cylinder centered on the origin along Z.
pub fn centered_cylinder(
    name: impl Into<String>,
    radius: f64,
    height: f64,
    segments: usize,
) -> Part {
    Part::cylinder(name, radius, height, segments).translate(0.0, 0.0, -height / 2.0)
}

/// Create a counterbore hole tool (through hole + larger shallow bore on top).
pub fn counterbore_hole(
    through_diameter: f64,
    counterbore_diameter: f64,
    counterbore_depth: f64,
    total_depth: f64,
    segments: usize,
) -> Part {
    let through = Part::cylinder("through", through_diameter / 2.0, total_depth, segments);
    let counterbore = Part::cylinder(
        "counterbore",
        counterbore_diameter / 2.0,
        counterbore_depth,
        segments,
    )
    .translate(0.0, 0.0, total_depth - counterbore_depth);
    through.union(&counterbore)
}

// Operator overloads: `a + b` union, `a - b` difference, `a & b` intersection.

impl std::ops::Add for Part {
    type Output = Part;
    fn add(self, rhs: Part) -> Part {
        self.union(&rhs)
    }
}

impl std::ops::Sub for Part {
    type Output = Part;
    fn sub(self, rhs: Part) -> Part {
        self.difference(&rhs)
    }
}

impl std::ops::BitAnd for Part {
    type Output = Part;
    fn bitand(self, rhs: Part) -> Part {
        self.intersection(&rhs)
    }
}

impl std::ops::Add for &Part {
    type Output = Part;
    fn add(self, rhs: &Part) -> Part {
        self.union(rhs)
    }
}

impl std::ops::Sub for &Part {
    type Output = Part;
    fn sub(self, rhs: &Part) -> Part {
        self.difference(rhs)
    }
}

impl std::ops::BitAnd for &Part {
    type Output = Part;
    fn bitand(self, rhs: &Part) -> Part {
        self.intersection(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_creation() {
        let b = Part::cuboid("test", 10.0, 20.0, 30.0);
        assert!(!b.is_empty());
        let (min, max) = b.bounding_box();
        assert!((max[0] - min[0] - 10.0).abs() < 0.01);
        assert!((max[1] - min[1] - 20.0).abs() < 0.01);
        assert!((max[2] - min[2] - 30.0).abs() < 0.01);
        // Centered in XY, base at z=0.
        assert!(min[2].abs() < 0.01);
        assert!((min[0] + 5.0).abs() < 0.01);
    }

    #[test]
    fn test_cylinder_creation() {
        let cyl = Part::cylinder("test", 5.0, 10.0, 32);
        assert!(!cyl.is_empty());
        let (min, max) = cyl.bounding_box();
        assert!(min[2].abs() < 0.01);
        assert!((max[2] - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_part() {
        let e = Part::empty("nothing");
        assert!(e.is_empty());
    }

    #[test]
    fn test_difference() {
        let plate = Part::cuboid("plate", 10.0, 10.0, 10.0);
        let hole = Part::cylinder("hole", 3.0, 15.0, 32).translate(0.0, 0.0, -1.0);
        let result = plate.difference(&hole);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_operator_overloads() {
        let a = Part::cuboid("a", 10.0, 10.0, 10.0);
        let b = Part::cuboid("b", 10.0, 10.0, 10.0).translate(5.0, 0.0, 0.0);

        let union = Part::cuboid("a", 10.0, 10.0, 10.0) + Part::cuboid("b", 10.0, 10.0, 10.0);
        assert!(!union.is_empty());

        let diff = Part::cuboid("a", 10.0, 10.0, 10.0)
            - Part::cuboid("b", 5.0, 5.0, 5.0).translate(0.0, 0.0, 2.5);
        assert!(!diff.is_empty());

        let isect = Part::cuboid("a", 10.0, 10.0, 10.0)
            & Part::cuboid("b", 10.0, 10.0, 10.0).translate(5.0, 5.0, 5.0);
        assert!(!isect.is_empty());

        let union_ref = &a + &b;
        assert!(!union_ref.is_empty());
        let diff_ref = &a - &b;
        assert!(!diff_ref.is_empty());
        let isect_ref = &a & &b;
        assert!(!isect_ref.is_empty());
    }

    #[test]
    fn test_prism_rejects_degenerate_outline() {
        let err = Part::prism("bad", &[[0.0, 0.0], [1.0, 0.0]], 5.0);
        assert!(err.is_err());
    }

    #[test]
    fn test_split_at_z() {
        let cyl = Part::cylinder("rod", 3.0, 20.0, 32);
        let (below, above) = cyl.split_at_z(12.0);
        let (_, below_max) = below.bounding_box();
        let (above_min, _) = above.bounding_box();
        assert!((below_max[2] - 12.0).abs() < 0.01);
        assert!((above_min[2] - 12.0).abs() < 0.01);
    }

    #[test]
    fn test_counterbore_hole_tool() {
        let tool = counterbore_hole(2.5, 5.0, 2.0, 10.0, 24);
        let (min, max) = tool.bounding_box();
        assert!((max[2] - min[2] - 10.0).abs() < 0.01);
        assert!((max[0] - min[0] - 5.0).abs() < 0.1);
    }

    #[test]
    fn test_stl_bytes_nonempty() {
        let b = Part::cuboid("stl", 5.0, 5.0, 5.0);
        let bytes = b.to_stl().expect("stl export");
        // Binary STL: 80-byte header + 4-byte count + 50 bytes/triangle.
        assert!(bytes.len() > 84);
    }
}
