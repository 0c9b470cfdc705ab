//! Ventilation mesh tiling.
//!
//! Produces a [`MeshPattern`] — positioned 2D cut shapes — from one of two
//! interchangeable strategies: a hexagonal honeycomb or slanted slots. The
//! pattern is then extruded and subtracted from a face, optionally clipped
//! to a frame so a solid rim survives at the region border.

use crate::{require_positive, sketch, sweep, GeomError, Part};

/// Sampled segments per rounded corner / slot cap.
const ARC_SEGMENTS: usize = 8;

/// Planar region bounding a tiling: an axis-aligned rectangle with optional
/// rounded corners.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
    /// Center of the region in the XY plane.
    pub center: [f64; 2],
    /// Corner rounding radius (0 for a sharp rectangle).
    pub corner_radius: f64,
}

impl Region {
    /// Rectangle centered at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            center: [0.0, 0.0],
            corner_radius: 0.0,
        }
    }

    /// Move the region center.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.center = [x, y];
        self
    }

    /// Round the region corners.
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Bounding region of an arbitrary closed outline.
    pub fn of_outline(outline: &[[f64; 2]]) -> Self {
        let mut min = [f64::MAX, f64::MAX];
        let mut max = [f64::MIN, f64::MIN];
        for p in outline {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        Self {
            width: max[0] - min[0],
            height: max[1] - min[1],
            center: [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0],
            corner_radius: 0.0,
        }
    }

    /// The XY outline of a part's top face, from its bounding box.
    pub fn of_top_face(part: &Part) -> Self {
        let (min, max) = part.bounding_box();
        Self {
            width: max[0] - min[0],
            height: max[1] - min[1],
            center: [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0],
            corner_radius: 0.0,
        }
    }

    /// Shrink the region by a uniform margin on all sides.
    pub fn inset(&self, margin: f64) -> Self {
        Self {
            width: self.width - 2.0 * margin,
            height: self.height - 2.0 * margin,
            center: self.center,
            corner_radius: (self.corner_radius - margin).max(0.0),
        }
    }

    fn outline(&self) -> Result<Vec<[f64; 2]>, GeomError> {
        let rect = if self.corner_radius > 0.0 {
            sketch::rounded_rect(self.width, self.height, self.corner_radius, ARC_SEGMENTS)?
        } else {
            sketch::rounded_rect(self.width, self.height, 0.0, 1)?
        };
        Ok(rect
            .iter()
            .map(|p| [p[0] + self.center[0], p[1] + self.center[1]])
            .collect())
    }
}

/// Hexagonal honeycomb parameters.
#[derive(Debug, Clone, Copy)]
pub struct HexGridSpec {
    /// Hexagons in a full (even) row.
    pub columns: usize,
    /// Row pairs; the grid gets `2*rows - 1` row lines, odd lines holding
    /// one cell fewer so the silhouette stays rectangular.
    pub rows: usize,
    /// Circumradius of each hexagon.
    pub hex_radius: f64,
    /// Wall left between adjacent cells.
    pub wall_thickness: f64,
}

/// Slanted slot parameters.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    /// Region extent along X.
    pub width: f64,
    /// Region extent along Y.
    pub height: f64,
    /// Number of slots along the diagonal.
    pub count: usize,
    /// Slot direction in degrees; `None` derives it from the aspect ratio
    /// (`atan(width/height)`), the corner-to-corner-ish variant.
    pub angle_deg: Option<f64>,
    /// Fraction of the nominal slot width actually cut, in (0, 1].
    pub fill_ratio: f64,
}

/// A set of positioned 2D cut shapes, optionally clipped to a frame region.
#[derive(Debug, Clone)]
pub struct MeshPattern {
    shapes: Vec<Vec<[f64; 2]>>,
    frame: Option<Region>,
}

impl MeshPattern {
    /// Number of cut shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True when the pattern holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The positioned cut outlines.
    pub fn shapes(&self) -> &[Vec<[f64; 2]>] {
        &self.shapes
    }

    /// XY bounding box over all shapes as `(min, max)`.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let mut min = [f64::MAX, f64::MAX];
        let mut max = [f64::MIN, f64::MIN];
        for shape in &self.shapes {
            for p in shape {
                min[0] = min[0].min(p[0]);
                min[1] = min[1].min(p[1]);
                max[0] = max[0].max(p[0]);
                max[1] = max[1].max(p[1]);
            }
        }
        (min, max)
    }

    /// Shift the whole pattern (and its frame, if any) in the XY plane.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            shapes: self
                .shapes
                .iter()
                .map(|shape| shape.iter().map(|p| [p[0] + dx, p[1] + dy]).collect())
                .collect(),
            frame: self.frame.map(|f| {
                let mut shifted = f;
                shifted.center = [f.center[0] + dx, f.center[1] + dy];
                shifted
            }),
        }
    }

    /// Extrude the pattern through `z_bottom..z_bottom+depth` and subtract
    /// it from `part`, clipping to the frame region when one is set.
    pub fn cut_through(&self, part: &Part, z_bottom: f64, depth: f64) -> Result<Part, GeomError> {
        require_positive("depth", depth)?;
        if self.is_empty() {
            return Ok(part.clone());
        }
        let mut tool = sweep::twist_extrude("mesh-cut", &self.shapes, depth, 0.0, 1)?
            .translate(0.0, 0.0, z_bottom);
        if let Some(frame) = &self.frame {
            let pad = 0.5;
            let clip = Part::prism("mesh-frame", &frame.outline()?, depth + 2.0 * pad)?
                .translate(0.0, 0.0, z_bottom - pad);
            tool = tool.intersection(&clip);
        }
        Ok(part.difference(&tool))
    }
}

/// Hex pitch values derived from the cell radius and wall thickness.
fn hex_pitch(hex_radius: f64, wall_thickness: f64) -> (f64, f64, f64) {
    let cos30 = (30.0f64).to_radians().cos();
    let apothem = hex_radius * cos30;
    let padded = apothem + wall_thickness / 2.0;
    let rb = padded * cos30;
    let dx = rb * 1.5;
    let dy = rb * cos30;
    (rb, dx, dy)
}

/// Brick-offset hexagon centers for `row_lines` rows of up to `columns`
/// cells, centered on the origin.
fn hex_centers(columns: usize, row_lines: usize, rb: f64, dx: f64, dy: f64) -> Vec<[f64; 2]> {
    let w = rb * (3.0 * columns as f64 - 1.0);
    let h = row_lines as f64 * dy;
    let mut centers = Vec::new();
    for row in 0..row_lines {
        let odd = row % 2 == 1;
        let cells = if odd { columns - 1 } else { columns };
        let shift = if odd { dx } else { 0.0 };
        for col in 0..cells {
            centers.push([
                col as f64 * 2.0 * dx + shift - w / 2.0 + rb,
                row as f64 * dy - h / 2.0 + dy / 2.0,
            ]);
        }
    }
    centers
}

/// Tile an explicit `columns x rows` honeycomb, centered on the origin.
pub fn hex_grid(spec: &HexGridSpec) -> Result<MeshPattern, GeomError> {
    require_positive("hex_radius", spec.hex_radius)?;
    require_positive("wall_thickness", spec.wall_thickness)?;
    if spec.columns == 0 || spec.rows == 0 {
        return Err(GeomError::InvalidGeometry(
            "hex grid needs at least one column and one row".into(),
        ));
    }
    let (rb, dx, dy) = hex_pitch(spec.hex_radius, spec.wall_thickness);
    let row_lines = 2 * spec.rows - 1;
    let shapes = hex_centers(spec.columns, row_lines, rb, dx, dy)
        .into_iter()
        .map(|c| sketch::hexagon(c, spec.hex_radius))
        .collect();
    Ok(MeshPattern {
        shapes,
        frame: None,
    })
}

/// Auto-fit a honeycomb over a region, anchored at the region's lower-left
/// inset corner: enough columns and rows to cover the inset box.
pub fn fit_hex_grid(
    region: &Region,
    hex_radius: f64,
    wall_thickness: f64,
    margin: f64,
) -> Result<MeshPattern, GeomError> {
    fit_hex(region, hex_radius, wall_thickness, margin, false)
}

/// Auto-fit a honeycomb over a region with the residual slack centered, so
/// the pattern is symmetric about the region center.
pub fn fit_hex_grid_centered(
    region: &Region,
    hex_radius: f64,
    wall_thickness: f64,
    margin: f64,
) -> Result<MeshPattern, GeomError> {
    fit_hex(region, hex_radius, wall_thickness, margin, true)
}

fn fit_hex(
    region: &Region,
    hex_radius: f64,
    wall_thickness: f64,
    margin: f64,
    centered: bool,
) -> Result<MeshPattern, GeomError> {
    require_positive("hex_radius", hex_radius)?;
    require_positive("wall_thickness", wall_thickness)?;
    if margin < 0.0 {
        return Err(GeomError::DegenerateInput {
            name: "margin",
            value: margin,
        });
    }
    let avail_w = region.width - 2.0 * margin;
    let avail_h = region.height - 2.0 * margin;
    if avail_w <= 0.0 || avail_h <= 0.0 {
        return Err(GeomError::InvalidGeometry(format!(
            "region {}x{} too small for a {margin} border",
            region.width, region.height
        )));
    }
    let (rb, dx, dy) = hex_pitch(hex_radius, wall_thickness);
    let columns = (avail_w / (2.0 * dx)).ceil() as usize;
    let row_lines = (avail_h / dy).ceil() as usize;
    if columns == 0 || row_lines == 0 {
        return Err(GeomError::InvalidGeometry(
            "region too small for even one hex cell".into(),
        ));
    }

    let pattern_w = rb * (3.0 * columns as f64 - 1.0);
    let pattern_h = row_lines as f64 * dy;
    let offset = if centered {
        region.center
    } else {
        // Anchor the pattern's lower-left cell at the inset corner.
        [
            region.center[0] - avail_w / 2.0 + pattern_w / 2.0,
            region.center[1] - avail_h / 2.0 + pattern_h / 2.0,
        ]
    };

    let shapes = hex_centers(columns, row_lines, rb, dx, dy)
        .into_iter()
        .map(|c| sketch::hexagon([c[0] + offset[0], c[1] + offset[1]], hex_radius))
        .collect();
    Ok(MeshPattern {
        shapes,
        frame: Some(region.inset(margin)),
    })
}

/// Closed-form chord of the `width x height` rectangle (centered at the
/// origin) along the line through `point` at `angle_deg`: both intersection
/// points with the rectangle boundary, ordered along the line direction.
pub fn rect_chord(
    width: f64,
    height: f64,
    point: [f64; 2],
    angle_deg: f64,
) -> Result<([f64; 2], [f64; 2]), GeomError> {
    let rad = angle_deg.to_radians();
    let (dy, dx) = rad.sin_cos();
    let hw = width / 2.0;
    let hh = height / 2.0;
    let eps = 1e-9;

    let mut hits: Vec<(f64, [f64; 2])> = Vec::new();
    // Vertical edges x = ±hw.
    if dx.abs() > eps {
        for x in [-hw, hw] {
            let t = (x - point[0]) / dx;
            let y = point[1] + t * dy;
            if y.abs() <= hh + eps {
                hits.push((t, [x, y]));
            }
        }
    }
    // Horizontal edges y = ±hh.
    if dy.abs() > eps {
        for y in [-hh, hh] {
            let t = (y - point[1]) / dy;
            let x = point[0] + t * dx;
            if x.abs() <= hw + eps {
                hits.push((t, [x, y]));
            }
        }
    }
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    // A corner hit satisfies two edge equations; collapse duplicates.
    hits.dedup_by(|a, b| (a.0 - b.0).abs() < eps);
    match (hits.first(), hits.last()) {
        (Some(first), Some(last)) if hits.len() >= 2 => Ok((first.1, last.1)),
        _ => Err(GeomError::InvalidGeometry(format!(
            "line through ({}, {}) at {angle_deg} degrees misses the region",
            point[0], point[1]
        ))),
    }
}

/// Tile slanted slots along the region diagonal.
pub fn slanted_slots(spec: &SlotSpec) -> Result<MeshPattern, GeomError> {
    require_positive("width", spec.width)?;
    require_positive("height", spec.height)?;
    if spec.count < 2 {
        return Err(GeomError::InvalidGeometry(format!(
            "slot tiling needs at least 2 slots, got {}",
            spec.count
        )));
    }
    if spec.fill_ratio <= 0.0 || spec.fill_ratio > 1.0 {
        return Err(GeomError::InvalidGeometry(format!(
            "fill ratio must lie in (0, 1], got {}",
            spec.fill_ratio
        )));
    }
    let angle = spec
        .angle_deg
        .unwrap_or_else(|| (spec.width / spec.height).atan().to_degrees());

    let n = spec.count;
    let dx = spec.width / (n + 1) as f64;
    let dy = spec.height / (n + 1) as f64;
    let slot_width = dx.hypot(dy) / 2.0 * spec.fill_ratio;

    let mut shapes = Vec::with_capacity(n);
    for i in 0..n {
        let p = [
            -spec.width / 2.0 + dx * (i + 1) as f64,
            spec.height / 2.0 - dy * (i + 1) as f64,
        ];
        let (a, b) = rect_chord(spec.width, spec.height, p, angle)?;
        let length = (b[0] - a[0]).hypot(b[1] - a[1]);
        if length <= slot_width {
            return Err(GeomError::InvalidGeometry(format!(
                "slot {i} degenerates: chord {length} not longer than width {slot_width}"
            )));
        }
        let mid = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
        let outline = sketch::stadium(length, slot_width, ARC_SEGMENTS)?;
        shapes.push(sketch::placed(&outline, angle, mid));
    }
    Ok(MeshPattern {
        shapes,
        frame: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hex_grid_cell_count() {
        // 2*rows-1 row lines, odd lines one cell short:
        // count = m*columns - floor(m/2).
        let pattern = hex_grid(&HexGridSpec {
            columns: 6,
            rows: 5,
            hex_radius: 1.5,
            wall_thickness: 2.0,
        })
        .unwrap();
        let m = 2 * 5 - 1;
        assert_eq!(pattern.len(), m * 6 - m / 2);
    }

    #[test]
    fn hex_grid_centers_stay_inside_silhouette() {
        let spec = HexGridSpec {
            columns: 6,
            rows: 5,
            hex_radius: 1.5,
            wall_thickness: 2.0,
        };
        let (rb, dx, dy) = hex_pitch(spec.hex_radius, spec.wall_thickness);
        let m = 2 * spec.rows - 1;
        let w = rb * (3.0 * spec.columns as f64 - 1.0);
        let h = m as f64 * dy;
        for c in hex_centers(spec.columns, m, rb, dx, dy) {
            assert!(c[0].abs() <= w / 2.0 + 1e-9);
            assert!(c[1].abs() <= h / 2.0 + 1e-9);
        }
    }

    #[test]
    fn hex_grid_scenario_keeps_border_frame() {
        // 6x9 grid with r=1.5, wall=2 on a 45x40 face: the pattern must fit
        // inside the face inset by at least 2.
        let pattern = hex_grid(&HexGridSpec {
            columns: 6,
            rows: 9,
            hex_radius: 1.5,
            wall_thickness: 2.0,
        })
        .unwrap();
        let (min, max) = pattern.bounds();
        assert!(min[0] >= -45.0 / 2.0 + 2.0);
        assert!(max[0] <= 45.0 / 2.0 - 2.0);
        assert!(min[1] >= -40.0 / 2.0 + 2.0);
        assert!(max[1] <= 40.0 / 2.0 - 2.0);
    }

    #[test]
    fn fit_hex_covers_region() {
        let region = Region::new(45.0, 40.0);
        let pattern = fit_hex_grid(&region, 1.5, 2.0, 3.0).unwrap();
        assert!(!pattern.is_empty());
        let (min, max) = pattern.bounds();
        // Cell counts are rounded up, so the tiling reaches within one
        // column/row pitch of the inset box on each axis (frame clipping
        // trims any overhang).
        let (_, dx, dy) = hex_pitch(1.5, 2.0);
        assert!(max[0] - min[0] >= 45.0 - 2.0 * 3.0 - 2.0 * dx);
        assert!(max[1] - min[1] >= 40.0 - 2.0 * 3.0 - dy);
    }

    #[test]
    fn fit_hex_centered_is_symmetric() {
        let region = Region::new(45.0, 40.0);
        let pattern = fit_hex_grid_centered(&region, 1.5, 2.0, 3.0).unwrap();
        let (min, max) = pattern.bounds();
        assert_relative_eq!(min[0] + max[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(min[1] + max[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn region_of_outline_takes_bounding_box() {
        let hex = sketch::hexagon([3.0, -2.0], 4.0);
        let region = Region::of_outline(&hex);
        let cos30 = (30.0f64).to_radians().cos();
        assert_relative_eq!(region.width, 2.0 * 4.0 * cos30, epsilon = 1e-9);
        assert_relative_eq!(region.height, 8.0, epsilon = 1e-9);
        assert_relative_eq!(region.center[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(region.center[1], -2.0, epsilon = 1e-9);
    }

    #[test]
    fn fit_hex_rejects_tiny_region() {
        let region = Region::new(4.0, 4.0);
        assert!(matches!(
            fit_hex_grid(&region, 1.5, 2.0, 2.5),
            Err(GeomError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn chord_endpoints_lie_on_rectangle_edges() {
        let (a, b) = rect_chord(40.0, 20.0, [5.0, 3.0], 30.0).unwrap();
        for p in [a, b] {
            let on_vertical = (p[0].abs() - 20.0).abs() < 1e-9 && p[1].abs() <= 10.0 + 1e-9;
            let on_horizontal = (p[1].abs() - 10.0).abs() < 1e-9 && p[0].abs() <= 20.0 + 1e-9;
            assert!(on_vertical || on_horizontal, "endpoint {p:?} off boundary");
        }
        // Chord passes through the sample point.
        let t = ((5.0 - a[0]) * (b[0] - a[0]) + (3.0 - a[1]) * (b[1] - a[1]))
            / ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2));
        let proj = [
            a[0] + t * (b[0] - a[0]),
            a[1] + t * (b[1] - a[1]),
        ];
        assert_relative_eq!(proj[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(proj[1], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn vertical_chord_spans_height() {
        let (a, b) = rect_chord(40.0, 20.0, [5.0, 0.0], 90.0).unwrap();
        assert_relative_eq!(a[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(b[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!((b[1] - a[1]).abs(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn slanted_slots_counts_and_angle_default() {
        let pattern = slanted_slots(&SlotSpec {
            width: 32.0,
            height: 12.0,
            count: 8,
            angle_deg: None,
            fill_ratio: 0.5,
        })
        .unwrap();
        assert_eq!(pattern.len(), 8);
        // Chord tips sit on the region boundary; the semicircular caps can
        // bulge past it by at most half the slot width.
        let slot_hw = (32.0f64 / 9.0).hypot(12.0 / 9.0) / 2.0 * 0.5 / 2.0;
        let (min, max) = pattern.bounds();
        assert!(max[0] <= 16.0 + slot_hw + 1e-6);
        assert!(min[0] >= -16.0 - slot_hw - 1e-6);
        assert!(max[1] <= 6.0 + slot_hw + 1e-6);
    }

    #[test]
    fn slanted_slots_validation() {
        let base = SlotSpec {
            width: 32.0,
            height: 12.0,
            count: 8,
            angle_deg: None,
            fill_ratio: 0.5,
        };
        assert!(slanted_slots(&SlotSpec { count: 1, ..base }).is_err());
        assert!(slanted_slots(&SlotSpec {
            fill_ratio: 0.0,
            ..base
        })
        .is_err());
        assert!(slanted_slots(&SlotSpec {
            width: -1.0,
            ..base
        })
        .is_err());
    }

    #[test]
    fn cut_through_leaves_plate_outline() {
        let plate = Part::cuboid("plate", 45.0, 40.0, 1.5);
        let pattern = hex_grid(&HexGridSpec {
            columns: 6,
            rows: 5,
            hex_radius: 1.5,
            wall_thickness: 2.0,
        })
        .unwrap();
        let vented = pattern.cut_through(&plate, -0.5, 2.5).unwrap();
        assert!(!vented.is_empty());
        let (min, max) = vented.bounding_box();
        assert_relative_eq!(max[0] - min[0], 45.0, epsilon = 0.01);
        assert_relative_eq!(max[1] - min[1], 40.0, epsilon = 0.01);
    }
}
