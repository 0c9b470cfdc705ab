//! Diamond knurl tool generation.
//!
//! A knurl tool is the union of two twisted extrusions of the same radial
//! array of wedge cut profiles, one twisted left-hand and one right-hand.
//! Subtracting the tool from a cylinder crosses the two helical groove sets
//! into the classic diamond texture.

use crate::{require_positive, sketch, sweep, GeomError, Part};

/// Knurl parameters.
///
/// `twist_angle_deg` controls pattern steepness, `count` the pitch/density,
/// `cut_depth` and `cut_angle_deg` the groove depth and sharpness.
/// `point_radius` optionally rounds the groove bottom (the ridge peak left
/// on the part), which prints more reliably than a knife edge; zero means
/// no rounding.
#[derive(Debug, Clone, Copy)]
pub struct KnurlSpec {
    /// Axial length of the knurled band.
    pub height: f64,
    /// Radius of the cylindrical surface being knurled.
    pub radius: f64,
    /// Full apex angle of each groove, degrees in (0, 180).
    pub cut_angle_deg: f64,
    /// Radial depth of each groove; must stay below `radius`.
    pub cut_depth: f64,
    /// Twist over the full height, degrees (sign irrelevant; both hands are
    /// generated).
    pub twist_angle_deg: f64,
    /// Number of grooves around the circumference, at least 3.
    pub count: usize,
    /// Optional groove-bottom rounding radius; `0.0` disables it.
    pub point_radius: f64,
}

impl KnurlSpec {
    fn validate(&self) -> Result<(), GeomError> {
        require_positive("height", self.height)?;
        require_positive("radius", self.radius)?;
        require_positive("cut_depth", self.cut_depth)?;
        if self.cut_depth >= self.radius {
            return Err(GeomError::InvalidGeometry(format!(
                "cut depth {} would invert the cylinder of radius {}",
                self.cut_depth, self.radius
            )));
        }
        if self.count < 3 {
            return Err(GeomError::InvalidGeometry(format!(
                "knurl needs at least 3 grooves, got {}",
                self.count
            )));
        }
        Ok(())
    }

    /// Twist loft segment count: finer for steeper twists.
    fn twist_segments(&self) -> usize {
        ((self.twist_angle_deg.abs() / 6.0).ceil() as usize).max(8)
    }
}

/// The wedge profile array placed around the cylinder: `count` copies of the
/// cut profile, each rotated to its radial direction.
pub(crate) fn profile_array(spec: &KnurlSpec) -> Result<Vec<Vec<[f64; 2]>>, GeomError> {
    let wedge = sketch::wedge(spec.cut_depth, spec.cut_angle_deg, spec.point_radius)?;
    Ok((0..spec.count)
        .map(|i| {
            let angle = 360.0 * i as f64 / spec.count as f64;
            let rad = angle.to_radians();
            let offset = [spec.radius * rad.cos(), spec.radius * rad.sin()];
            sketch::placed(&wedge, angle, offset)
        })
        .collect())
}

/// Build the crossed-helix cutting tool, spanning `0..height` along Z.
pub fn make_knurl_tool(spec: &KnurlSpec) -> Result<Part, GeomError> {
    spec.validate()?;
    let profiles = profile_array(spec)?;
    let segments = spec.twist_segments();
    let right = sweep::twist_extrude(
        "knurl-right",
        &profiles,
        spec.height,
        spec.twist_angle_deg,
        segments,
    )?;
    let left = sweep::twist_extrude(
        "knurl-left",
        &profiles,
        spec.height,
        -spec.twist_angle_deg,
        segments,
    )?;
    Ok(right.union(&left))
}

/// Subtract a knurl tool from `target`. The tool spans `0..height`;
/// translate `target` (or knurl a pre-positioned band) accordingly.
pub fn apply_knurl(target: &Part, spec: &KnurlSpec) -> Result<Part, GeomError> {
    let tool = make_knurl_tool(spec)?;
    Ok(target.difference(&tool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spec() -> KnurlSpec {
        KnurlSpec {
            height: 60.0,
            radius: 9.0,
            cut_angle_deg: 90.0,
            cut_depth: 0.1875,
            twist_angle_deg: 180.0,
            count: 20,
            point_radius: 0.0,
        }
    }

    #[test]
    fn rejects_inverting_cut() {
        let mut s = spec();
        s.cut_depth = 9.0;
        assert!(matches!(
            make_knurl_tool(&s),
            Err(GeomError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn rejects_too_few_grooves() {
        let mut s = spec();
        s.count = 2;
        assert!(make_knurl_tool(&s).is_err());
    }

    #[test]
    fn profile_array_rotation_invariance() {
        // Rotating the array by 360/n maps profile i onto profile i+1.
        let s = spec();
        let profiles = profile_array(&s).unwrap();
        let step = 360.0 / s.count as f64;
        for i in 0..s.count {
            let rotated = sketch::placed(&profiles[i], step, [0.0, 0.0]);
            let next = &profiles[(i + 1) % s.count];
            for (a, b) in rotated.iter().zip(next.iter()) {
                assert_relative_eq!(a[0], b[0], epsilon = 1e-9);
                assert_relative_eq!(a[1], b[1], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn profile_apex_sits_cut_depth_under_surface() {
        let s = spec();
        let profiles = profile_array(&s).unwrap();
        for profile in &profiles {
            let min_r = profile
                .iter()
                .map(|p| (p[0] * p[0] + p[1] * p[1]).sqrt())
                .fold(f64::MAX, f64::min);
            assert_relative_eq!(min_r, s.radius - s.cut_depth, epsilon = 1e-9);
        }
    }

    #[test]
    fn tool_spans_height_and_straddles_surface() {
        let s = spec();
        let tool = make_knurl_tool(&s).unwrap();
        let (min, max) = tool.bounding_box();
        assert_relative_eq!(max[2] - min[2], s.height, epsilon = 1e-6);
        // Wedges poke outside the surface and bite cut_depth into it.
        let outer = (max[0]).max(max[1]);
        assert!(outer > s.radius);
        assert!(outer < s.radius + 2.0 * s.cut_depth);
    }

    #[test]
    fn knurled_cylinder_keeps_crest_radius() {
        // End-to-end scenario: tool subtracted from its matching cylinder
        // leaves crests at the original radius and grooves at radius -
        // cut_depth (the groove floor is set by the profile apex ring,
        // checked exactly in profile_apex_sits_cut_depth_under_surface).
        let s = spec();
        let rod = Part::cylinder("rod", s.radius, s.height, 64);
        let knurled = apply_knurl(&rod, &s).unwrap();
        assert!(!knurled.is_empty());
        let (min, max) = knurled.bounding_box();
        assert_relative_eq!(max[0], s.radius, epsilon = 0.05);
        assert_relative_eq!(min[0], -s.radius, epsilon = 0.05);
        assert_relative_eq!(max[2] - min[2], s.height, epsilon = 1e-6);
    }
}
