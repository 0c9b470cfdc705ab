//! Screw-cap storage container.
//!
//! A cylindrical jar with a flat or domed bottom, an external thread at the
//! mouth and a knurled screw cap.

use crate::{dome, knurl::KnurlSpec, thread::ThreadSpec, GeomError, Part};

const SEGMENTS: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct ContainerConfig {
    pub inner_diameter: f64,
    pub wall_thickness: f64,
    pub inner_height: f64,
    pub cap_height: f64,
    /// Bottom dome sag; `0.0` gives a flat bottom.
    pub dent: f64,
    pub thread_clearance: f64,
    pub turns: u32,
    pub knurled_cap: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            inner_diameter: 40.0,
            wall_thickness: 2.0,
            inner_height: 50.0,
            cap_height: 10.0,
            dent: 5.0,
            thread_clearance: 0.6,
            turns: 3,
            knurled_cap: true,
        }
    }
}

pub struct ContainerParts {
    pub body: Part,
    pub cap: Part,
}

impl ContainerConfig {
    pub fn thread_pitch(&self) -> f64 {
        (self.cap_height - self.wall_thickness) / (self.turns + 1) as f64
    }

    /// Thread major diameter, chosen so the thread root lands exactly on the
    /// body's outer wall.
    pub fn thread_major_diameter(&self) -> f64 {
        let depth = 0.541 * self.thread_pitch();
        self.inner_diameter + 2.0 * self.wall_thickness + 2.0 * depth + self.thread_clearance / 2.0
    }

    /// Z where the cap's lower rim sits when screwed on.
    pub fn cap_offset(&self) -> f64 {
        self.inner_height + 2.0 * self.wall_thickness - self.cap_height
    }

    pub fn validate(&self) -> Result<(), GeomError> {
        crate::require_positive("inner_diameter", self.inner_diameter)?;
        crate::require_positive("wall_thickness", self.wall_thickness)?;
        crate::require_positive("inner_height", self.inner_height)?;
        crate::require_positive("cap_height", self.cap_height)?;
        if self.dent < 0.0 || self.dent > self.inner_diameter / 2.0 {
            return Err(GeomError::InvalidGeometry(format!(
                "bottom dent {} must lie within the bore radius {}",
                self.dent,
                self.inner_diameter / 2.0
            )));
        }
        if self.dent > 0.0 && self.dent <= self.wall_thickness {
            return Err(GeomError::InvalidGeometry(format!(
                "domed bottom needs dent {} deeper than the wall {}",
                self.dent, self.wall_thickness
            )));
        }
        if self.cap_height <= self.wall_thickness {
            return Err(GeomError::InvalidGeometry(format!(
                "cap height {} leaves no thread band above the {} wall",
                self.cap_height, self.wall_thickness
            )));
        }
        if self.cap_height - self.wall_thickness >= self.inner_height + self.wall_thickness {
            return Err(GeomError::InvalidGeometry(
                "cap thread band taller than the body".into(),
            ));
        }
        if self.turns == 0 {
            return Err(GeomError::InvalidGeometry("thread needs at least one turn".into()));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<ContainerParts, GeomError> {
        self.validate()?;
        let w = self.wall_thickness;
        let outer_r = self.inner_diameter / 2.0 + w;
        let body_h = self.inner_height + w;

        let mut body = if self.dent == 0.0 {
            // Flat bottom: solid cylinder shelled open at the top.
            Part::cylinder("container-body", outer_r, body_h, SEGMENTS).difference(
                &Part::cylinder("cavity", self.inner_diameter / 2.0, self.inner_height + 0.1, SEGMENTS)
                    .translate(0.0, 0.0, w),
            )
        } else {
            let tube = Part::cylinder("container-body", outer_r, body_h, SEGMENTS).difference(
                &Part::cylinder("bore", self.inner_diameter / 2.0, body_h + 0.2, SEGMENTS)
                    .translate(0.0, 0.0, -0.1),
            );
            let shell = dome::dome_cap(self.dent, self.inner_diameter, w)?
                .difference(&dome::dome_cap(self.dent - w, self.inner_diameter, 0.0)?);
            tube.union(&shell)
        };

        let pitch = self.thread_pitch();
        let major = self.thread_major_diameter();
        let clr = self.thread_clearance;

        let body_thread = ThreadSpec::new(major - clr / 2.0, pitch, self.cap_height - w, true);
        body = body.union(
            &crate::thread::make_thread(&body_thread)?.translate(0.0, 0.0, self.cap_offset()),
        );

        // Cap: cup shelled open at the bottom, threaded inside.
        let cup_r = major / 2.0 + w;
        let mut cap = Part::cylinder("container-cap", cup_r, self.cap_height, SEGMENTS).difference(
            &Part::cylinder("cap-cavity", major / 2.0, self.cap_height - w + 0.1, SEGMENTS)
                .translate(0.0, 0.0, -0.1),
        );
        let cap_thread = ThreadSpec::new(
            major + clr / 2.0,
            pitch,
            self.cap_height - w - pitch,
            false,
        );
        cap = cap.union(&crate::thread::make_thread(&cap_thread)?.translate(0.0, 0.0, pitch / 2.0));

        if self.knurled_cap {
            let spec = KnurlSpec {
                height: self.cap_height,
                radius: cup_r,
                cut_angle_deg: 120.0,
                cut_depth: w / 3.0,
                twist_angle_deg: 40.0,
                count: 12,
                point_radius: 0.0,
            };
            cap = crate::knurl::apply_knurl(&cap, &spec)?;
        }

        Ok(ContainerParts { body, cap })
    }
}
