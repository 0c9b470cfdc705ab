//! 2D profile point generation.
//!
//! All outlines are closed polygons given as ordered `[x, y]` vertex lists,
//! counter-clockwise. Curved segments (slot caps, rounded corners, the knurl
//! apex fillet) are sampled into line segments here; the kernel only ever
//! sees polygons.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::{require_positive, GeomError};

/// Signed area of a closed polygon (shoelace). Positive for CCW.
pub fn signed_area(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    sum / 2.0
}

/// Return the outline in counter-clockwise order, reversing if needed.
pub fn ensure_ccw(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    if signed_area(points) < 0.0 {
        points.iter().rev().copied().collect()
    } else {
        points.to_vec()
    }
}

/// Rotate an outline about the origin and then translate it.
pub fn placed(points: &[[f64; 2]], angle_deg: f64, offset: [f64; 2]) -> Vec<[f64; 2]> {
    let rot = Rotation2::new(angle_deg.to_radians());
    let shift = Vector2::new(offset[0], offset[1]);
    points
        .iter()
        .map(|&[x, y]| {
            let p = rot * Point2::new(x, y) + shift;
            [p.x, p.y]
        })
        .collect()
}

/// Regular hexagon of the given circumradius, rotated so a vertex sits on
/// the +Y axis (the `regularPolygon(r, 6, angle=90)` orientation).
pub fn hexagon(center: [f64; 2], radius: f64) -> Vec<[f64; 2]> {
    (0..6)
        .map(|k| {
            let a = (90.0 + 60.0 * k as f64).to_radians();
            [center[0] + radius * a.cos(), center[1] + radius * a.sin()]
        })
        .collect()
}

/// Stadium (slot) outline centered at the origin with its long axis along X.
///
/// `length` is the overall tip-to-tip length, `width` the slot width; each
/// semicircular cap is sampled with `cap_segments` segments.
pub fn stadium(length: f64, width: f64, cap_segments: usize) -> Result<Vec<[f64; 2]>, GeomError> {
    require_positive("length", length)?;
    require_positive("width", width)?;
    if length < width {
        return Err(GeomError::InvalidGeometry(format!(
            "slot length {length} shorter than its width {width}"
        )));
    }
    let r = width / 2.0;
    let half_straight = (length - width) / 2.0;
    let n = cap_segments.max(2);
    let mut points = Vec::with_capacity(2 * (n + 1));
    // Right cap: -90° to +90°.
    for k in 0..=n {
        let a = (-90.0 + 180.0 * k as f64 / n as f64).to_radians();
        points.push([half_straight + r * a.cos(), r * a.sin()]);
    }
    // Left cap: +90° to +270°.
    for k in 0..=n {
        let a = (90.0 + 180.0 * k as f64 / n as f64).to_radians();
        points.push([-half_straight + r * a.cos(), r * a.sin()]);
    }
    Ok(points)
}

/// Axis-aligned rectangle centered at the origin with rounded corners.
pub fn rounded_rect(
    width: f64,
    height: f64,
    corner_radius: f64,
    corner_segments: usize,
) -> Result<Vec<[f64; 2]>, GeomError> {
    require_positive("width", width)?;
    require_positive("height", height)?;
    if corner_radius < 0.0 || 2.0 * corner_radius > width.min(height) {
        return Err(GeomError::InvalidGeometry(format!(
            "corner radius {corner_radius} does not fit a {width}x{height} rectangle"
        )));
    }
    let hx = width / 2.0 - corner_radius;
    let hy = height / 2.0 - corner_radius;
    if corner_radius == 0.0 {
        return Ok(vec![
            [width / 2.0, -height / 2.0],
            [width / 2.0, height / 2.0],
            [-width / 2.0, height / 2.0],
            [-width / 2.0, -height / 2.0],
        ]);
    }
    let n = corner_segments.max(1);
    let corners = [
        ([hx, hy], 0.0),
        ([-hx, hy], 90.0),
        ([-hx, -hy], 180.0),
        ([hx, -hy], 270.0),
    ];
    let mut points = Vec::with_capacity(4 * (n + 1));
    for (center, start_deg) in corners {
        for k in 0..=n {
            let a = (start_deg + 90.0 * k as f64 / n as f64).to_radians();
            points.push([
                center[0] + corner_radius * a.cos(),
                center[1] + corner_radius * a.sin(),
            ]);
        }
    }
    Ok(points)
}

/// Convex hull of a 2D point set (Andrew monotone chain), returned CCW.
pub fn convex_hull(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    sorted.dedup_by(|a, b| (a[0] - b[0]).abs() < 1e-12 && (a[1] - b[1]).abs() < 1e-12);

    let cross = |o: [f64; 2], a: [f64; 2], b: [f64; 2]| {
        (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
    };
    let chain = |iter: &mut dyn Iterator<Item = [f64; 2]>| {
        let mut out: Vec<[f64; 2]> = Vec::new();
        for p in iter {
            while out.len() >= 2 && cross(out[out.len() - 2], out[out.len() - 1], p) <= 0.0 {
                out.pop();
            }
            out.push(p);
        }
        out.pop();
        out
    };
    let mut hull = chain(&mut sorted.iter().copied());
    hull.extend(chain(&mut sorted.iter().rev().copied()));
    hull
}

/// Knurl wedge cut profile in local coordinates.
///
/// The +X axis points radially outward and the origin lies on the cylinder
/// surface: the apex sits at `(-cut_depth, 0)` (set back into the material),
/// the base at `2*cut_depth*cos(angle/2) - cut_depth` with lateral half-width
/// `2*cut_depth*sin(angle/2)`. The apex full angle equals `cut_angle_deg`.
///
/// A positive `point_radius` replaces the apex with a sampled fillet arc,
/// softening the knurl peak left in the part.
pub fn wedge(
    cut_depth: f64,
    cut_angle_deg: f64,
    point_radius: f64,
) -> Result<Vec<[f64; 2]>, GeomError> {
    require_positive("cut_depth", cut_depth)?;
    if cut_angle_deg <= 0.0 || cut_angle_deg >= 180.0 {
        return Err(GeomError::InvalidGeometry(format!(
            "cut angle must lie in (0, 180) degrees, got {cut_angle_deg}"
        )));
    }
    if point_radius < 0.0 {
        return Err(GeomError::DegenerateInput {
            name: "point_radius",
            value: point_radius,
        });
    }

    let half = (cut_angle_deg / 2.0).to_radians();
    let length = 2.0 * cut_depth;
    let x1 = length * half.cos();
    let y1 = length * half.sin();

    let apex = [-cut_depth, 0.0];
    let base_lo = [x1 - cut_depth, -y1];
    let base_hi = [x1 - cut_depth, y1];

    if point_radius == 0.0 {
        return Ok(vec![apex, base_lo, base_hi]);
    }

    // Tangent offset along each edge and arc center on the bisector (+X).
    let tangent = point_radius * half.cos() / half.sin();
    if tangent >= length {
        return Err(GeomError::InvalidGeometry(format!(
            "point radius {point_radius} swallows the whole wedge flank"
        )));
    }
    let center = [apex[0] + point_radius / half.sin(), 0.0];
    let t_lo = [
        apex[0] + tangent * half.cos(),
        apex[1] - tangent * half.sin(),
    ];
    let t_hi = [apex[0] + tangent * half.cos(), apex[1] + tangent * half.sin()];

    // CCW: lower tangent, base corners, upper tangent, then the arc back
    // through the leftmost point.
    let theta_start = std::f64::consts::FRAC_PI_2 + half;
    let theta_end = 1.5 * std::f64::consts::PI - half;
    let arc_segments = 8;
    let mut points = vec![t_lo, base_lo, base_hi, t_hi];
    for k in 1..arc_segments {
        let theta = theta_start + (theta_end - theta_start) * k as f64 / arc_segments as f64;
        points.push([
            center[0] + point_radius * theta.cos(),
            center[1] + point_radius * theta.sin(),
        ]);
    }
    Ok(points)
}
