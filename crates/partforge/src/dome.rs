//! Dome/dent profile fitting.
//!
//! A dome is the spherical cap whose sag (sagitta) over a given base
//! diameter matches a requested dent depth. The sphere is found by a
//! two-point circle-center solve with the center pinned to the symmetry
//! axis, then bounded by a cylinder of the base diameter.

use crate::{require_positive, GeomError, Part};

/// Segment count for fitted spheres and their bounding cylinders.
const SEGMENTS: usize = 64;

/// Dome fit request: a sag of `dent_depth` over `base_diameter`, optionally
/// hollowed into a shell of axial thickness `shell_height`.
#[derive(Debug, Clone, Copy)]
pub struct DomeSpec {
    /// Sag height of the dome apex above its base plane.
    pub dent_depth: f64,
    /// Diameter of the circular base.
    pub base_diameter: f64,
    /// Shell thickness; `0.0` produces a solid cap.
    pub shell_height: f64,
}

/// Y-intercept of the perpendicular bisector of `p1p2`, i.e. the center
/// height of the circle through both points whose center lies on `x = 0`.
fn circle_center_y(p1: (f64, f64), p2: (f64, f64)) -> Result<f64, GeomError> {
    let dy = p1.1 - p2.1;
    if dy.abs() < 1e-12 {
        return Err(GeomError::InvalidGeometry(format!(
            "points ({}, {}) and ({}, {}) have equal height; no sag to fit",
            p1.0, p1.1, p2.0, p2.1
        )));
    }
    let mx = (p1.0 + p2.0) / 2.0;
    let my = (p1.1 + p2.1) / 2.0;
    let a = -(p1.0 - p2.0) / dy;
    Ok(my - a * mx)
}

/// Radius of the sphere through `(0, dent)` and `(diameter/2, rim_height)`
/// with its center on the symmetry axis.
pub fn fitted_radius(
    dent_depth: f64,
    base_diameter: f64,
    rim_height: f64,
) -> Result<f64, GeomError> {
    let center_y = circle_center_y((0.0, dent_depth), (base_diameter / 2.0, rim_height))?;
    Ok(-center_y + dent_depth)
}

/// Solid dome: the fitted sphere bounded by a cylinder of `base_diameter`,
/// sitting on the plane `z = 0` with its apex at `z = dent_depth`.
///
/// `rim_height` is the height of the spherical surface at the base rim
/// (`0.0` for a cap that meets the base plane at the rim).
pub fn dome_cap(dent_depth: f64, base_diameter: f64, rim_height: f64) -> Result<Part, GeomError> {
    require_positive("dent_depth", dent_depth)?;
    require_positive("base_diameter", base_diameter)?;
    if rim_height < 0.0 {
        return Err(GeomError::DegenerateInput {
            name: "rim_height",
            value: rim_height,
        });
    }
    if rim_height >= dent_depth {
        return Err(GeomError::InvalidGeometry(format!(
            "rim height {rim_height} must stay below the apex {dent_depth}"
        )));
    }
    if dent_depth - rim_height > base_diameter / 2.0 {
        return Err(GeomError::InvalidGeometry(format!(
            "dent {dent_depth} exceeds half the base diameter {base_diameter}; \
             the fitted sphere cannot close within the disk"
        )));
    }

    let r = fitted_radius(dent_depth, base_diameter, rim_height)?;
    let sphere = Part::sphere("dome-sphere", r, SEGMENTS).translate(0.0, 0.0, dent_depth - r);
    let bound = Part::cylinder("dome-bound", base_diameter / 2.0, 2.0 * dent_depth, SEGMENTS);
    Ok(sphere.intersection(&bound))
}

/// Fit a dome from a [`DomeSpec`]: solid cap when `shell_height == 0`, otherwise a
/// hollow shell (outer surface fitted to `dent_depth`, inner cavity fitted
/// to `dent_depth - shell_height` over the same base).
pub fn fit_dome(spec: DomeSpec) -> Result<Part, GeomError> {
    if spec.shell_height < 0.0 {
        return Err(GeomError::DegenerateInput {
            name: "shell_height",
            value: spec.shell_height,
        });
    }
    if spec.shell_height == 0.0 {
        return dome_cap(spec.dent_depth, spec.base_diameter, 0.0);
    }
    let outer = dome_cap(spec.dent_depth, spec.base_diameter, spec.shell_height)?;
    let inner = dome_cap(
        spec.dent_depth - spec.shell_height,
        spec.base_diameter,
        0.0,
    )?;
    Ok(outer.difference(&inner))
}
