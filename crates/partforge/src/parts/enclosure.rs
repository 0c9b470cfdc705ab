//! Snap-lid electronics enclosure.
//!
//! Rounded-rectangle walls with latch slots, a bottom plate carrying PCB
//! standoffs, mounting ears and rubber-feet recesses, and a lid with an
//! inner lip, latch hooks and a ventilation mesh.

use crate::{
    sketch,
    vent::{self, HexGridSpec, SlotSpec},
    GeomError, Part,
};

const SEGMENTS: usize = 32;
/// Clearance added around the inner outline so the lid lip and PCB drop in.
const FIT_GAP: f64 = 0.5;
const CORNER_RADIUS: f64 = 2.0;

/// Which wall a connector opening is cut into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    XPos,
    XNeg,
    YPos,
    YNeg,
}

/// Connector opening outline, in the wall plane.
#[derive(Debug, Clone, Copy)]
pub enum ConnectorShape {
    Rect { width: f64, height: f64 },
    /// Stadium opening; `length` is overall tip-to-tip.
    Slot { length: f64, width: f64 },
}

/// A cutout in one of the side walls.
#[derive(Debug, Clone, Copy)]
pub struct Connector {
    pub face: Face,
    pub shape: ConnectorShape,
    /// Center offset along the face's horizontal axis.
    pub offset: f64,
    /// Center height above the cavity floor.
    pub height_above_floor: f64,
    /// Cut depth into the wall; `None` cuts the full wall thickness.
    pub depth: Option<f64>,
}

/// Ventilation pattern cut into the lid, as two patches mirrored about the
/// lid's long axis.
#[derive(Debug, Clone, Copy)]
pub enum VentStyle {
    HexGrid {
        columns: usize,
        rows: usize,
        hex_radius: f64,
        wall_thickness: f64,
    },
    SlantedSlots {
        count: usize,
        fill_ratio: f64,
    },
}

#[derive(Debug, Clone)]
pub struct EnclosureConfig {
    pub inner_width: f64,
    pub inner_depth: f64,
    pub inner_height: f64,
    pub wall_thickness: f64,
    /// Hole-to-hole spans of the PCB mounting pattern.
    pub pcb_holes_width: f64,
    pub pcb_holes_depth: f64,
    pub pcb_holes_diameter: f64,
    pub pcb_thickness: f64,
    pub pcb_offset: [f64; 2],
    pub pcb_standoffs_height: f64,
    /// `0.0` disables the recesses.
    pub rubber_feet_diameter: f64,
    pub latch_width: f64,
    pub num_latches: usize,
    pub mounting_ears: bool,
    pub connectors: Vec<Connector>,
    pub vent: Option<VentStyle>,
}

impl Default for EnclosureConfig {
    fn default() -> Self {
        Self {
            inner_width: 45.0,
            inner_depth: 39.99,
            inner_height: 18.0,
            wall_thickness: 1.5,
            pcb_holes_width: 40.0,
            pcb_holes_depth: 34.99,
            pcb_holes_diameter: 2.5,
            pcb_thickness: 1.5,
            pcb_offset: [0.0, 0.0],
            pcb_standoffs_height: 3.0,
            rubber_feet_diameter: 10.0,
            latch_width: 6.0,
            num_latches: 2,
            mounting_ears: true,
            connectors: Vec::new(),
            vent: Some(VentStyle::HexGrid {
                columns: 6,
                rows: 5,
                hex_radius: 1.5,
                wall_thickness: 2.0,
            }),
        }
    }
}

pub struct EnclosureParts {
    pub bottom: Part,
    pub top: Part,
}

impl EnclosureConfig {
    /// Outer footprint along X (the depth axis).
    pub fn box_x(&self) -> f64 {
        self.inner_depth + 2.0 * FIT_GAP + 2.0 * self.wall_thickness
    }

    /// Outer footprint along Y (the width axis).
    pub fn box_y(&self) -> f64 {
        self.inner_width + 2.0 * FIT_GAP + 2.0 * self.wall_thickness
    }

    fn inside_outline(&self) -> Result<Vec<[f64; 2]>, GeomError> {
        sketch::rounded_rect(
            self.inner_depth + 2.0 * FIT_GAP,
            self.inner_width + 2.0 * FIT_GAP,
            CORNER_RADIUS + FIT_GAP,
            8,
        )
    }

    fn outside_outline(&self) -> Result<Vec<[f64; 2]>, GeomError> {
        sketch::rounded_rect(
            self.box_x(),
            self.box_y(),
            CORNER_RADIUS + FIT_GAP + self.wall_thickness,
            8,
        )
    }

    pub fn validate(&self) -> Result<(), GeomError> {
        crate::require_positive("inner_width", self.inner_width)?;
        crate::require_positive("inner_depth", self.inner_depth)?;
        crate::require_positive("inner_height", self.inner_height)?;
        if self.wall_thickness < 1.0 {
            return Err(GeomError::InvalidGeometry(format!(
                "enclosure wall must be at least 1.0, got {}",
                self.wall_thickness
            )));
        }
        if self.inner_height <= self.pcb_standoffs_height + self.pcb_thickness {
            return Err(GeomError::InvalidGeometry(format!(
                "inner height {} leaves no room above {} standoffs and a {} PCB",
                self.inner_height, self.pcb_standoffs_height, self.pcb_thickness
            )));
        }
        if self.num_latches == 0 {
            return Err(GeomError::InvalidGeometry(
                "the lid needs at least one latch per side".into(),
            ));
        }
        if self.rubber_feet_diameter < 0.0 {
            return Err(GeomError::DegenerateInput {
                name: "rubber_feet_diameter",
                value: self.rubber_feet_diameter,
            });
        }
        Ok(())
    }

    pub fn build(&self) -> Result<EnclosureParts, GeomError> {
        self.validate()?;
        let w = self.wall_thickness;

        let walls = self.walls()?;
        let plate = Part::prism("plate", &self.outside_outline()?, w)?;

        let mut bottom = plate.clone();
        bottom.name = "enclosure-bottom".into();
        bottom = self.add_standoffs(bottom)?;
        if self.rubber_feet_diameter > 0.0 {
            bottom = self.cut_feet_recesses(bottom);
        }
        if self.mounting_ears {
            bottom = bottom.union(&self.mounting_ears()?);
        }
        bottom = bottom.union(&walls.translate(0.0, 0.0, w));

        let top = self.lid(&plate)?;
        Ok(EnclosureParts { bottom, top })
    }

    /// Side walls in their local frame (`0..inner_height`), with latch slots
    /// and connector openings cut.
    fn walls(&self) -> Result<Part, GeomError> {
        let w = self.wall_thickness;
        let mut walls = Part::prism("enclosure-walls", &self.outside_outline()?, self.inner_height)?
            .difference(
                &Part::prism("cavity", &self.inside_outline()?, self.inner_height + 0.4)?
                    .translate(0.0, 0.0, -0.2),
            );

        // Latch slots through both Y walls, 5 below the wall top.
        let pitch = self.box_x() / self.num_latches as f64;
        for i in 0..self.num_latches {
            let x = (self.box_x() - pitch) / 2.0 - pitch * i as f64;
            for side in [1.0, -1.0] {
                let slot = Part::cuboid("latch-slot", self.latch_width, w + 0.4, 2.0).translate(
                    x,
                    side * (self.box_y() - w) / 2.0,
                    self.inner_height - 6.0,
                );
                walls = walls.difference(&slot);
            }
        }

        for c in &self.connectors {
            walls = walls.difference(&self.connector_tool(c)?);
        }
        Ok(walls)
    }

    /// Cutting tool for one connector opening, positioned on its wall.
    fn connector_tool(&self, c: &Connector) -> Result<Part, GeomError> {
        let depth = c.depth.unwrap_or(self.wall_thickness);
        let outline = match c.shape {
            ConnectorShape::Rect { width, height } => {
                sketch::rounded_rect(width, height, 0.0, 1)?
            }
            ConnectorShape::Slot { length, width } => sketch::stadium(length, width, 8)?,
        };
        // Extrude along Z centered, then permute axes so the outline lands in
        // the wall plane with the extrusion along the wall normal.
        let tool = Part::prism("connector", &outline, depth + 0.4)?
            .translate(0.0, 0.0, -(depth + 0.4) / 2.0);
        let (tool, center) = match c.face {
            // (x, y, z) -> (z, x, y): outline u -> y, v -> z, cut along x.
            Face::XPos => (
                tool.rotate(90.0, 0.0, 0.0).rotate(0.0, 0.0, 90.0),
                [(self.box_x() - depth) / 2.0 + 0.2, c.offset],
            ),
            Face::XNeg => (
                tool.rotate(90.0, 0.0, 0.0).rotate(0.0, 0.0, 90.0),
                [-(self.box_x() - depth) / 2.0 - 0.2, c.offset],
            ),
            // (x, y, z) -> (x, -z, y): outline u -> x, v -> z, cut along y.
            Face::YPos => (
                tool.rotate(90.0, 0.0, 0.0),
                [c.offset, (self.box_y() - depth) / 2.0 + 0.2],
            ),
            Face::YNeg => (
                tool.rotate(90.0, 0.0, 0.0),
                [c.offset, -(self.box_y() - depth) / 2.0 - 0.2],
            ),
        };
        Ok(tool.translate(center[0], center[1], c.height_above_floor))
    }

    /// Four standoff posts with counterbored screw holes, on the plate.
    fn add_standoffs(&self, mut bottom: Part) -> Result<Part, GeomError> {
        let w = self.wall_thickness;
        let sh = self.pcb_standoffs_height;
        let post_r = (self.pcb_holes_diameter + 3.0) / 2.0;
        for [sx, sy] in self.standoff_positions() {
            let post = Part::cylinder("standoff", post_r, sh, SEGMENTS).translate(sx, sy, w);
            // Sized for heat-set threaded inserts.
            let bore = crate::counterbore_hole(
                self.pcb_holes_diameter + 0.7,
                self.pcb_holes_diameter + 1.0,
                1.0,
                3.0,
                SEGMENTS,
            )
            .translate(sx, sy, w + sh - 3.0);
            bottom = bottom.union(&post).difference(&bore);
        }
        Ok(bottom)
    }

    fn standoff_positions(&self) -> [[f64; 2]; 4] {
        let [oy, ox] = self.pcb_offset;
        let hx = self.pcb_holes_depth / 2.0;
        let hy = self.pcb_holes_width / 2.0;
        [
            [ox + hx, oy + hy],
            [ox + hx, oy - hy],
            [ox - hx, oy + hy],
            [ox - hx, oy - hy],
        ]
    }

    fn cut_feet_recesses(&self, mut bottom: Part) -> Part {
        let w = self.wall_thickness;
        let span_x = self.box_x() - self.rubber_feet_diameter - 2.0 * w - 2.0;
        let span_y = self.box_y() - self.rubber_feet_diameter - 2.0 * w - 2.0;
        for sx in [-0.5, 0.5] {
            for sy in [-0.5, 0.5] {
                let recess =
                    Part::cylinder("foot", self.rubber_feet_diameter / 2.0, 0.6, SEGMENTS)
                        .translate(sx * span_x, sy * span_y, -0.1);
                bottom = bottom.difference(&recess);
            }
        }
        bottom
    }

    /// Two screw ears on the long sides: a hulled circle-and-edge outline
    /// with a screw hole, flush with the plate.
    fn mounting_ears(&self) -> Result<Part, GeomError> {
        let (reach, edge, hole_d, r) = (6.0, 20.0, 3.0, 3.0);
        let r1 = r + hole_d / 2.0;
        let mut points: Vec<[f64; 2]> = (0..24)
            .map(|k| {
                let a = std::f64::consts::TAU * k as f64 / 24.0;
                [reach + r1 * a.cos(), r1 * a.sin()]
            })
            .collect();
        points.push([0.0, -edge / 2.0]);
        points.push([0.0, edge / 2.0]);
        let outline = sketch::convex_hull(&points);

        let ear = Part::prism("ear", &outline, 3.0)?
            .difference(
                &Part::cylinder("ear-hole", hole_d / 2.0, 3.4, SEGMENTS)
                    .translate(reach, 0.0, -0.2),
            )
            .rotate(0.0, 0.0, 90.0)
            .translate(0.0, self.inner_width / 2.0 + FIT_GAP, 0.0);
        Ok(ear.union(&ear.rotate(0.0, 0.0, 180.0)))
    }

    /// The lid: plate, inner lip, latch hooks, ventilation mesh. Positioned
    /// in place on top of the walls.
    fn lid(&self, plate: &Part) -> Result<Part, GeomError> {
        let w = self.wall_thickness;
        let lip_ring = Part::prism("lip", &self.inside_outline()?, 2.0)?.difference(
            &Part::prism(
                "lip-hollow",
                &sketch::rounded_rect(
                    self.inner_depth - 2.0,
                    self.inner_width - 2.0,
                    CORNER_RADIUS,
                    8,
                )?,
                2.4,
            )?
            .translate(0.0, 0.0, -0.2),
        );
        let mut top = plate.clone();
        top.name = "enclosure-top".into();
        top = top
            .union(&lip_ring.translate(0.0, 0.0, -2.0))
            .translate(0.0, 0.0, self.inner_height + w);

        let pitch = self.box_x() / self.num_latches as f64;
        for i in 0..self.num_latches {
            let x = (self.box_x() - pitch) / 2.0 - pitch * i as f64;
            let hook = self
                .latch_hook()?
                .translate(x, -self.inner_width / 2.0, w + self.inner_height - 4.0);
            top = top.union(&hook).union(&hook.rotate(0.0, 0.0, 180.0));
        }

        if let Some(style) = &self.vent {
            let pattern = match style {
                VentStyle::HexGrid {
                    columns,
                    rows,
                    hex_radius,
                    wall_thickness,
                } => vent::hex_grid(&HexGridSpec {
                    columns: *columns,
                    rows: *rows,
                    hex_radius: *hex_radius,
                    wall_thickness: *wall_thickness,
                })?,
                VentStyle::SlantedSlots { count, fill_ratio } => {
                    vent::slanted_slots(&SlotSpec {
                        width: self.inner_depth - 8.0,
                        height: self.inner_width / 2.0 - 8.0,
                        count: *count,
                        angle_deg: None,
                        fill_ratio: *fill_ratio,
                    })?
                }
            };
            let patch_y = (self.inner_width - 6.0) / 4.0;
            let z = self.inner_height + w - 0.1;
            top = pattern
                .translated(0.0, patch_y)
                .cut_through(&top, z, w + 0.2)?;
            top = pattern
                .translated(0.0, -patch_y)
                .cut_through(&top, z, w + 0.2)?;
        }
        Ok(top)
    }

    /// Snap hook cross-section: a tapering finger with an outward barb at
    /// the tip, extruded to the latch width and stood in the YZ plane.
    fn latch_hook(&self) -> Result<Part, GeomError> {
        let (t, h, l) = (1.0, 4.0, 2.0);
        let barb = self.wall_thickness / 2.0;
        let outline = [
            [-t / 2.0, h / 2.0],
            [t / 2.0, h / 2.0],
            [0.0, -h / 2.0],
            [-t / 2.0, -h / 2.0],
            [-t / 2.0 - barb, -h / 2.0 + l],
            [-t / 2.0, -h / 2.0 + l],
        ];
        Ok(Part::prism("latch-hook", &outline, self.latch_width)?
            .translate(0.0, 0.0, -self.latch_width / 2.0)
            .rotate(90.0, 0.0, 0.0)
            .rotate(0.0, 0.0, 90.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bare() -> EnclosureConfig {
        EnclosureConfig {
            mounting_ears: false,
            vent: None,
            ..EnclosureConfig::default()
        }
    }

    #[test]
    fn default_build_extents() {
        let c = EnclosureConfig::default();
        let parts = c.build().unwrap();
        assert!(!parts.bottom.is_empty());
        assert!(!parts.top.is_empty());

        let (bmin, bmax) = parts.bottom.bounding_box();
        assert_relative_eq!(bmax[0] - bmin[0], c.box_x(), epsilon = 0.05);
        // Ears reach past the walls on the Y sides.
        assert!(bmax[1] - bmin[1] > c.box_y());
        assert_relative_eq!(bmax[2], c.wall_thickness + c.inner_height, epsilon = 0.05);

        let (tmin, tmax) = parts.top.bounding_box();
        assert_relative_eq!(
            tmax[2],
            c.inner_height + 2.0 * c.wall_thickness,
            epsilon = 0.05
        );
        // Hooks hang below the lip.
        assert!(tmin[2] < c.inner_height + c.wall_thickness - 2.0);
    }

    #[test]
    fn standoffs_carry_insert_bores() {
        let c = bare();
        let parts = c.build().unwrap();
        let w = c.wall_thickness;
        let [sx, sy] = [c.pcb_holes_depth / 2.0, c.pcb_holes_width / 2.0];

        // Post material present beside the bore.
        let post_probe = Part::cylinder("probe", 0.4, c.pcb_standoffs_height, 16).translate(
            sx + c.pcb_holes_diameter / 2.0 + 0.8,
            sy,
            w,
        );
        assert!(!parts.bottom.intersection(&post_probe).is_empty());

        // Bore open at the post center.
        let bore_probe = Part::cylinder("probe", 0.3, 2.0, 16).translate(
            sx,
            sy,
            w + c.pcb_standoffs_height - 2.0,
        );
        assert!(parts.bottom.intersection(&bore_probe).is_empty());
    }

    #[test]
    fn latch_slots_pierce_walls() {
        let c = bare();
        let parts = c.build().unwrap();
        let pitch = c.box_x() / c.num_latches as f64;
        let x = (c.box_x() - pitch) / 2.0;
        let probe = Part::cuboid("probe", 2.0, c.wall_thickness - 0.2, 0.8).translate(
            x,
            (c.box_y() - c.wall_thickness) / 2.0,
            c.wall_thickness + c.inner_height - 5.4,
        );
        assert!(parts.bottom.intersection(&probe).is_empty());
    }

    #[test]
    fn connector_opening_cut() {
        let mut c = bare();
        c.connectors.push(Connector {
            face: Face::XNeg,
            shape: ConnectorShape::Rect {
                width: 7.0,
                height: 4.0,
            },
            offset: 0.0,
            height_above_floor: c.pcb_standoffs_height + c.pcb_thickness + 2.0,
            depth: None,
        });
        let parts = c.build().unwrap();
        let probe = Part::cuboid("probe", c.wall_thickness - 0.2, 2.0, 1.0).translate(
            -(c.box_x() - c.wall_thickness) / 2.0,
            0.0,
            c.wall_thickness + c.pcb_standoffs_height + c.pcb_thickness + 1.5,
        );
        assert!(parts.bottom.intersection(&probe).is_empty());
    }

    #[test]
    fn vent_opens_lid_patches() {
        let c = EnclosureConfig {
            mounting_ears: false,
            ..EnclosureConfig::default()
        };
        let parts = c.build().unwrap();
        // Probe a hex cell center in the upper patch; cell columns sit at
        // odd multiples of 1.5*rb around the patch center.
        let cos30 = (30.0f64).to_radians().cos();
        let rb = (1.5 * cos30 + 1.0) * cos30;
        let patch_y = (c.inner_width - 6.0) / 4.0;
        let probe = Part::cylinder("probe", 0.3, c.wall_thickness + 1.0, 16).translate(
            1.5 * rb,
            patch_y,
            c.inner_height + c.wall_thickness - 0.5,
        );
        assert!(parts.top.intersection(&probe).is_empty());

        let solid = bare().build().unwrap();
        assert!(!solid.top.intersection(&probe).is_empty());
    }

    #[test]
    fn invalid_configs_rejected() {
        let mut c = bare();
        c.wall_thickness = 0.8;
        assert!(c.build().is_err());

        let mut c = bare();
        c.inner_height = 4.0;
        assert!(matches!(c.build(), Err(GeomError::InvalidGeometry(_))));

        let mut c = bare();
        c.num_latches = 0;
        assert!(c.build().is_err());
    }
}
