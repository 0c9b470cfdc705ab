//! Threaded EDC capsule.
//!
//! A knurled tube with domed ends, split into a body and a screw cap joined
//! by a matched thread pair, with a carry loop seated on the top dome.

use crate::{dome, knurl::KnurlSpec, sweep, thread::ThreadSpec, GeomError, Part};

const SEGMENTS: usize = 64;

/// Capsule dimensions. The cap takes the top sixth of the height; the thread
/// band is 5 mm with the pitch set by the turn count.
#[derive(Debug, Clone, Copy)]
pub struct CapsuleConfig {
    pub inner_diameter: f64,
    pub wall_thickness: f64,
    pub height: f64,
    /// Sag of the domed ends.
    pub dent: f64,
    /// Thread turns over the 5 mm band.
    pub turns: u32,
    pub knurled: bool,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            inner_diameter: 15.0,
            wall_thickness: 1.5,
            height: 60.0,
            dent: 4.0,
            turns: 6,
            knurled: true,
        }
    }
}

/// The two printable solids of a capsule.
pub struct CapsuleParts {
    pub body: Part,
    pub cap: Part,
}

impl CapsuleConfig {
    pub fn outer_diameter(&self) -> f64 {
        self.inner_diameter + 2.0 * self.wall_thickness
    }

    pub fn cap_height(&self) -> f64 {
        self.height / 6.0
    }

    pub fn thread_height(&self) -> f64 {
        5.0
    }

    pub fn thread_pitch(&self) -> f64 {
        self.thread_height() / self.turns as f64
    }

    fn thread_clearance(&self) -> f64 {
        0.6
    }

    /// World z of the body/cap parting plane.
    fn split_z(&self) -> f64 {
        self.height - self.cap_height() - self.thread_height() - self.dent / 2.0
    }

    pub fn validate(&self) -> Result<(), GeomError> {
        crate::require_positive("inner_diameter", self.inner_diameter)?;
        crate::require_positive("height", self.height)?;
        crate::require_positive("dent", self.dent)?;
        if self.wall_thickness < 1.5 {
            return Err(GeomError::InvalidGeometry(format!(
                "capsule wall must be at least 1.5, got {}",
                self.wall_thickness
            )));
        }
        if self.height <= self.cap_height() + self.thread_height() + self.dent {
            return Err(GeomError::InvalidGeometry(format!(
                "height {} cannot fit the {} cap and the {} thread band above the dome",
                self.height,
                self.cap_height(),
                self.thread_height()
            )));
        }
        if self.turns == 0 {
            return Err(GeomError::InvalidGeometry("thread needs at least one turn".into()));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<CapsuleParts, GeomError> {
        self.validate()?;
        let w = self.wall_thickness;
        let outer_d = self.outer_diameter();
        let h = self.height;

        let tube = Part::cylinder("capsule-tube", outer_d / 2.0, h, SEGMENTS).difference(
            &Part::cylinder("capsule-bore", self.inner_diameter / 2.0, h + 0.2, SEGMENTS)
                .translate(0.0, 0.0, -0.1),
        );

        // Domed end shell: outer surface sagged dent+wall over the full
        // diameter with a wall-high rim, inner cavity sagged dent over the
        // bore.
        let cover = dome::dome_cap(self.dent + w, outer_d, w)?
            .difference(&dome::dome_cap(self.dent, self.inner_diameter, 0.0)?);

        let mut body = tube
            .union(&cover.rotate(180.0, 0.0, 0.0))
            .translate(0.0, 0.0, w)
            .union(&self.handle()?)
            .union(&cover.translate(0.0, 0.0, h));

        if self.knurled {
            let spec = KnurlSpec {
                height: h + 4.0 * w,
                radius: outer_d / 2.0,
                cut_angle_deg: 90.0,
                cut_depth: w / 8.0,
                twist_angle_deg: 180.0,
                count: 20,
                point_radius: 0.0,
            };
            body = crate::knurl::apply_knurl(&body.translate(0.0, 0.0, self.dent), &spec)?
                .translate(0.0, 0.0, -self.dent);
        }

        let (mut body, mut cap) = body.split_at_z(self.split_z());
        body.name = "capsule-body".into();
        cap.name = "capsule-cap".into();

        // Thread boss diameter leaves a third of the wall outside the cap
        // bore.
        let md = outer_d - 2.0 * (w / 3.0);
        let clr = self.thread_clearance();
        let thread_base = h - self.cap_height() - self.thread_height();

        let external = ThreadSpec::new(
            md - clr / 2.0,
            self.thread_pitch(),
            self.thread_height(),
            true,
        );
        let boss_h = self.thread_height() + self.dent / 2.0;
        let boss = Part::cylinder("boss", external.minor_diameter() / 2.0, boss_h, SEGMENTS)
            .difference(
                &Part::cylinder("boss-bore", self.inner_diameter / 2.0, boss_h + 0.2, SEGMENTS)
                    .translate(0.0, 0.0, -0.1),
            )
            .translate(0.0, 0.0, self.split_z());
        let body = body
            .union(&boss)
            .union(&crate::thread::make_thread(&external)?.translate(0.0, 0.0, thread_base));

        let bore = Part::cylinder("cap-bore", md / 2.0, 2.0 * self.thread_height(), SEGMENTS)
            .translate(0.0, 0.0, h - self.cap_height() - 2.0 * self.thread_height());
        let internal = ThreadSpec::new(
            md + clr / 2.0,
            self.thread_pitch(),
            self.thread_height() - self.thread_pitch(),
            false,
        );
        let cap = cap.difference(&bore).union(
            &crate::thread::make_thread(&internal)?.translate(
                0.0,
                0.0,
                thread_base + self.thread_pitch() / 2.0,
            ),
        );

        Ok(CapsuleParts { body, cap })
    }

    /// Carry loop: a torus stood upright on the top dome, trimmed to the
    /// dome's fitted sphere so the legs sit flush on the curved surface.
    fn handle(&self) -> Result<Part, GeomError> {
        let base = self.outer_diameter().min(15.0);
        let tube_r = base / 10.0;
        let loop_r = base / 2.0 - tube_r;

        let profile: Vec<[f64; 2]> = (0..16)
            .map(|k| {
                let a = std::f64::consts::TAU * k as f64 / 16.0;
                [loop_r + tube_r * a.cos(), tube_r * a.sin()]
            })
            .collect();
        let ring = sweep::revolve("capsule-handle", &profile, 32)?
            .rotate(90.0, 0.0, 0.0)
            .translate(0.0, 0.0, self.height + self.wall_thickness);

        let fit = dome::fitted_radius(
            self.dent + self.wall_thickness,
            self.outer_diameter(),
            self.wall_thickness,
        )?;
        let ball = Part::sphere("handle-trim", fit, SEGMENTS).translate(
            0.0,
            0.0,
            self.height + self.wall_thickness + self.dent - fit,
        );
        Ok(ring.difference(&ball))
    }
}
