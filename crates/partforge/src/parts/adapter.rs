//! Stash-jar adapter.
//!
//! Converts a thin-wall domed container into a screw-top stash: an outer cap
//! threaded internally that slips over the container, and an internally
//! hollowed core cap threaded externally that follows the container's dome
//! from the inside.

use crate::{dome, knurl::KnurlSpec, sweep, thread::ThreadSpec, GeomError, Part};

const SEGMENTS: usize = 64;

/// Triangular-section retaining ring: an inward-pointing circumferential
/// barb with the given full tip angle, base sitting on `diameter`.
pub fn sharp_ring(diameter: f64, width: f64, angle_deg: f64) -> Result<Part, GeomError> {
    crate::require_positive("width", width)?;
    let r = diameter / 2.0;
    let x = (angle_deg / 2.0).to_radians().tan() * width;
    let profile = [[r - width, 0.0], [r, -x], [r, x]];
    sweep::revolve("sharp-ring", &profile, SEGMENTS)
}

#[derive(Debug, Clone, Copy)]
pub struct AdapterConfig {
    /// Container outer diameter; everything else nests inside or over it.
    pub outer_diameter: f64,
    pub wall_thickness: f64,
    /// Thread band height; the caps extend beyond it.
    pub height: f64,
    /// Container bottom dome sag.
    pub dent: f64,
    pub container_wall_thickness: f64,
    pub thread_clearance: f64,
    pub knurled: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            outer_diameter: 62.0,
            wall_thickness: 2.5,
            height: 25.0,
            dent: 11.0,
            container_wall_thickness: 0.2,
            thread_clearance: 0.8,
            knurled: true,
        }
    }
}

pub struct AdapterParts {
    pub container: Part,
    pub cap_external: Part,
    pub cap_internal: Part,
}

impl AdapterConfig {
    pub fn thread_pitch(&self) -> f64 {
        6.0
    }

    pub fn thread_diameter(&self) -> f64 {
        self.outer_diameter - 1.5 * self.wall_thickness
    }

    /// Radius of the circle through the container's dome rim and apex.
    pub fn dent_radius(&self) -> f64 {
        (self.outer_diameter.powi(2) + 4.0 * self.dent.powi(2)) / (8.0 * self.dent)
    }

    fn external_thread(&self) -> ThreadSpec {
        ThreadSpec::new(
            self.thread_diameter() - self.thread_clearance / 2.0,
            self.thread_pitch(),
            self.height,
            true,
        )
    }

    /// Sag of the dome recess in the core cap: where the container's dome
    /// circle crosses the core's thread-root cylinder.
    pub fn internal_dent(&self) -> f64 {
        let dr = self.dent_radius();
        let min_r = self.external_thread().minor_diameter() / 2.0;
        dr - (dr * dr - min_r * min_r).sqrt()
    }

    /// How far the outer cap's rim reaches below the thread base when
    /// assembled over the container dome.
    pub fn cap_lift(&self) -> f64 {
        self.dent - self.internal_dent()
            + self.thread_pitch() / 2.0
            + self.container_wall_thickness
    }

    pub fn validate(&self) -> Result<(), GeomError> {
        crate::require_positive("outer_diameter", self.outer_diameter)?;
        crate::require_positive("wall_thickness", self.wall_thickness)?;
        crate::require_positive("height", self.height)?;
        crate::require_positive("dent", self.dent)?;
        crate::require_positive("container_wall_thickness", self.container_wall_thickness)?;
        if self.dent > self.outer_diameter / 2.0 {
            return Err(GeomError::InvalidGeometry(format!(
                "dent {} exceeds the container radius {}",
                self.dent,
                self.outer_diameter / 2.0
            )));
        }
        let min_r = self.external_thread().minor_diameter() / 2.0;
        if min_r <= 0.0 || min_r >= self.dent_radius() {
            return Err(GeomError::InvalidGeometry(
                "thread root does not intersect the dome circle".into(),
            ));
        }
        // The core pocket sits 2 inside the thread root and its mouth carries
        // a 1-wide retaining ring.
        if min_r - 2.0 <= 1.0 {
            return Err(GeomError::InvalidGeometry(format!(
                "outer diameter {} with wall {} leaves no room for the core pocket",
                self.outer_diameter, self.wall_thickness
            )));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<AdapterParts, GeomError> {
        self.validate()?;
        let cw = self.container_wall_thickness;
        let outer_r = self.outer_diameter / 2.0;

        // Thin-wall container: the adapter caps are sized around it.
        let side = Part::cylinder("adapter-container", outer_r + cw, 2.0 * self.height, SEGMENTS)
            .difference(
                &Part::cylinder("side-bore", outer_r, 2.0 * self.height + 0.2, SEGMENTS)
                    .translate(0.0, 0.0, -0.1),
            );
        let bottom = dome::dome_cap(self.dent + cw, self.outer_diameter, cw)?;
        let bottom_shell =
            bottom.difference(&dome::dome_cap(self.dent, self.outer_diameter - cw, 0.0)?);
        let container = side.union(&bottom_shell);

        let ext = self.external_thread();
        let min_r = ext.minor_diameter() / 2.0;
        let internal_dent = self.internal_dent();

        // Core cap: threaded plug, pocketed from the top, dome recess
        // underneath so it rests on the container bottom.
        let core_h = self.height + 3.0;
        let pocket_r = min_r - 2.0;
        let pocket_h = core_h - internal_dent - 2.0;
        let core = Part::cylinder("adapter-core", min_r, core_h, SEGMENTS).difference(
            &Part::cylinder("pocket", pocket_r, pocket_h + 0.1, SEGMENTS)
                .translate(0.0, 0.0, core_h - pocket_h),
        );
        let ring = sharp_ring(2.0 * (pocket_r + 0.1), 1.0, 60.0)?
            .translate(0.0, 0.0, self.height + 1.0);
        let cap_internal = core
            .union(&crate::thread::make_thread(&ext)?)
            .union(&ring)
            .difference(&dome::dome_cap(internal_dent, 2.0 * min_r, 0.0)?);

        // Outer cap: sleeve reaching down over the dome, threaded inside.
        let lift = self.cap_lift();
        let sleeve_h = self.height + lift + 10.0;
        let int = ThreadSpec::new(
            self.thread_diameter() + self.thread_clearance / 2.0,
            self.thread_pitch(),
            self.height,
            false,
        );
        let mut cap_external = Part::cylinder("adapter-cap", outer_r, sleeve_h, SEGMENTS)
            .translate(0.0, 0.0, -lift)
            .difference(
                &Part::cylinder("cap-bore", self.thread_diameter() / 2.0, sleeve_h + 0.2, SEGMENTS)
                    .translate(0.0, 0.0, -lift - 0.1),
            )
            .difference(&bottom.translate(0.0, 0.0, -lift))
            .union(&crate::thread::make_thread(&int)?);

        if self.knurled {
            let spec = KnurlSpec {
                height: self.height,
                radius: outer_r,
                cut_angle_deg: 90.0,
                cut_depth: self.wall_thickness / 4.0,
                twist_angle_deg: 40.0,
                count: 36,
                point_radius: 0.0,
            };
            cap_external = crate::knurl::apply_knurl(&cap_external, &spec)?;
        }

        Ok(AdapterParts {
            container,
            cap_external,
            cap_internal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plain() -> AdapterConfig {
        AdapterConfig {
            knurled: false,
            ..AdapterConfig::default()
        }
    }

    #[test]
    fn derived_dimensions() {
        let c = AdapterConfig::default();
        assert_relative_eq!(c.thread_diameter(), 62.0 - 1.5 * 2.5, epsilon = 1e-12);
        let dr = c.dent_radius();
        assert_relative_eq!(dr, (62.0f64.powi(2) + 4.0 * 121.0) / 88.0, epsilon = 1e-12);
        // Recess sag is the dome circle sampled at the thread root radius.
        let min_r = c.external_thread().minor_diameter() / 2.0;
        assert_relative_eq!(
            c.internal_dent(),
            dr - (dr * dr - min_r * min_r).sqrt(),
            epsilon = 1e-12
        );
        assert!(c.internal_dent() < c.dent);
    }

    #[test]
    fn sharp_ring_section() {
        let ring = sharp_ring(20.0, 2.0, 60.0).unwrap();
        let (min, max) = ring.bounding_box();
        assert_relative_eq!(max[0] - min[0], 20.0, epsilon = 1e-6);
        let x = (30.0f64).to_radians().tan() * 2.0;
        assert_relative_eq!(max[2] - min[2], 2.0 * x, epsilon = 1e-9);
    }

    #[test]
    fn default_build() {
        let c = plain();
        let parts = c.build().unwrap();
        assert!(!parts.container.is_empty());
        assert!(!parts.cap_external.is_empty());
        assert!(!parts.cap_internal.is_empty());

        let (cmin, cmax) = parts.container.bounding_box();
        assert_relative_eq!(cmin[2], 0.0, epsilon = 0.05);
        assert_relative_eq!(cmax[2], 2.0 * c.height, epsilon = 0.05);
        assert_relative_eq!(
            cmax[0] - cmin[0],
            c.outer_diameter + 2.0 * c.container_wall_thickness,
            epsilon = 0.1
        );

        let (emin, emax) = parts.cap_external.bounding_box();
        // The dome cut trims the sleeve rim up to the dome's edge height.
        assert!(emin[2] >= -c.cap_lift() - 0.05);
        assert!(emin[2] <= -c.cap_lift() + 0.6);
        assert_relative_eq!(emax[2], c.height + 10.0, epsilon = 0.05);
        assert_relative_eq!(emax[0] - emin[0], c.outer_diameter, epsilon = 0.1);

        let (imin, imax) = parts.cap_internal.bounding_box();
        assert_relative_eq!(imax[2], c.height + 3.0, epsilon = 0.05);
        assert!(imin[2] > -0.05);
    }

    #[test]
    fn core_cap_dome_recess() {
        let c = plain();
        let parts = c.build().unwrap();
        // At the axis the recess removes material up to internal_dent.
        let probe = Part::cylinder("probe", 0.5, 10.0, 16).translate(0.0, 0.0, -1.0);
        let core = parts.cap_internal.intersection(&probe);
        let (min, _) = core.bounding_box();
        assert_relative_eq!(min[2], c.internal_dent(), epsilon = 0.1);
    }

    #[test]
    fn oversized_dent_rejected() {
        let c = AdapterConfig {
            dent: 40.0,
            ..plain()
        };
        assert!(c.build().is_err());
    }

    #[test]
    fn narrow_thread_root_rejected_before_build() {
        // Thread depth on the 6 pitch eats almost the whole core: the pocket
        // radius would go negative. Must fail in validation, not mid-build.
        let c = AdapterConfig {
            outer_diameter: 12.0,
            dent: 5.0,
            ..plain()
        };
        assert!(matches!(c.validate(), Err(GeomError::InvalidGeometry(_))));
        assert!(c.build().is_err());
    }
}
