//! Twisted and helical sweeps.
//!
//! The kernel exposes straight extrusion and raw polyhedron construction, so
//! twist-extrusion, helical sweeps and revolves are built here as segmented
//! lofts: cross-section rings placed along the sweep, joined by triangle side
//! walls, capped at the ends. Cross-sections must be convex; caps are
//! fan-triangulated.

use crate::{require_positive, sketch, GeomError, Part};

/// Cross-section rings of a twisted extrusion: ring `j` of `segments + 1`
/// sits at `z = height*j/segments`, rotated by `twist_deg*j/segments`.
pub(crate) fn twist_rings(
    profile: &[[f64; 2]],
    height: f64,
    twist_deg: f64,
    segments: usize,
) -> Vec<Vec<[f64; 3]>> {
    (0..=segments)
        .map(|j| {
            let t = j as f64 / segments as f64;
            let angle = (twist_deg * t).to_radians();
            let (sin, cos) = angle.sin_cos();
            let z = height * t;
            profile
                .iter()
                .map(|&[x, y]| [x * cos - y * sin, x * sin + y * cos, z])
                .collect()
        })
        .collect()
}

/// Append one lofted tube (rings of equal arity) to a triangle soup.
///
/// `close_loop` welds the last ring to the first instead of capping.
fn emit_loft(
    points: &mut Vec<[f64; 3]>,
    faces: &mut Vec<[usize; 3]>,
    rings: &[Vec<[f64; 3]>],
    close_loop: bool,
    flip_sides: bool,
) {
    let n = rings[0].len();
    let ring_count = rings.len();
    let base = points.len();
    for ring in rings {
        points.extend_from_slice(ring);
    }
    let ring_index = |j: usize, k: usize| base + (j % ring_count) * n + (k % n);

    let spans = if close_loop {
        ring_count
    } else {
        ring_count - 1
    };
    for j in 0..spans {
        for k in 0..n {
            let a = ring_index(j, k);
            let a2 = ring_index(j, k + 1);
            let b = ring_index(j + 1, k);
            let b2 = ring_index(j + 1, k + 1);
            if flip_sides {
                faces.push([a2, a, b]);
                faces.push([a2, b, b2]);
            } else {
                faces.push([a, a2, b2]);
                faces.push([a, b2, b]);
            }
        }
    }

    if !close_loop {
        // Fan caps; requires a convex cross-section.
        for k in 1..n - 1 {
            if flip_sides {
                faces.push([ring_index(0, 0), ring_index(0, k), ring_index(0, k + 1)]);
                faces.push([
                    ring_index(ring_count - 1, 0),
                    ring_index(ring_count - 1, k + 1),
                    ring_index(ring_count - 1, k),
                ]);
            } else {
                faces.push([ring_index(0, 0), ring_index(0, k + 1), ring_index(0, k)]);
                faces.push([
                    ring_index(ring_count - 1, 0),
                    ring_index(ring_count - 1, k),
                    ring_index(ring_count - 1, k + 1),
                ]);
            }
        }
    }
}

/// Extrude a set of convex XY profiles along +Z with a continuous twist
/// about the Z axis, as one solid.
///
/// Each profile sweeps independently (the knurl tool passes the full radial
/// array in one call); the result is their disjoint union in a single mesh.
pub fn twist_extrude(
    name: impl Into<String>,
    profiles: &[Vec<[f64; 2]>],
    height: f64,
    twist_deg: f64,
    segments: usize,
) -> Result<Part, GeomError> {
    require_positive("height", height)?;
    if profiles.is_empty() {
        return Err(GeomError::InvalidGeometry(
            "twist extrusion needs at least one profile".into(),
        ));
    }
    let segments = segments.max(1);
    let mut points = Vec::new();
    let mut faces = Vec::new();
    for profile in profiles {
        if profile.len() < 3 {
            return Err(GeomError::InvalidGeometry(format!(
                "twist profile needs at least 3 points, got {}",
                profile.len()
            )));
        }
        let ccw = sketch::ensure_ccw(profile);
        let rings = twist_rings(&ccw, height, twist_deg, segments);
        emit_loft(&mut points, &mut faces, &rings, false, false);
    }
    Part::polyhedron(name, &points, &faces)
}

/// Ring arity check shared by the r-z sweeps.
fn checked_rz_profile(profile_rz: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, GeomError> {
    if profile_rz.len() < 3 {
        return Err(GeomError::InvalidGeometry(format!(
            "sweep profile needs at least 3 points, got {}",
            profile_rz.len()
        )));
    }
    if profile_rz.iter().any(|p| p[0] <= 0.0) {
        return Err(GeomError::InvalidGeometry(
            "sweep profile must stay strictly off the axis (r > 0)".into(),
        ));
    }
    Ok(sketch::ensure_ccw(profile_rz))
}

/// Sweep a convex profile in the r-z half-plane along a helix about the Z
/// axis.
///
/// The profile starts at angle 0 in the +X half-plane and advances `pitch`
/// in Z per full turn; `turns` may be fractional. The ends are capped flat
/// in their rotated planes — trim with a bounding cylinder for a flush
/// finish.
pub fn helix_sweep(
    name: impl Into<String>,
    profile_rz: &[[f64; 2]],
    turns: f64,
    pitch: f64,
    segments_per_turn: usize,
) -> Result<Part, GeomError> {
    require_positive("turns", turns)?;
    if pitch < 0.0 {
        return Err(GeomError::DegenerateInput {
            name: "pitch",
            value: pitch,
        });
    }
    let profile = checked_rz_profile(profile_rz)?;
    let segments = ((segments_per_turn.max(8) as f64) * turns).ceil() as usize;
    let rings: Vec<Vec<[f64; 3]>> = (0..=segments)
        .map(|j| {
            let t = j as f64 / segments as f64;
            let theta = std::f64::consts::TAU * turns * t;
            let (sin, cos) = theta.sin_cos();
            let lift = pitch * turns * t;
            profile
                .iter()
                .map(|&[r, z]| [r * cos, r * sin, z + lift])
                .collect()
        })
        .collect();
    let mut points = Vec::new();
    let mut faces = Vec::new();
    emit_loft(&mut points, &mut faces, &rings, false, true);
    Part::polyhedron(name, &points, &faces)
}

/// Revolve a convex profile in the r-z half-plane fully about the Z axis.
pub fn revolve(
    name: impl Into<String>,
    profile_rz: &[[f64; 2]],
    segments: usize,
) -> Result<Part, GeomError> {
    let profile = checked_rz_profile(profile_rz)?;
    let segments = segments.max(8);
    let rings: Vec<Vec<[f64; 3]>> = (0..segments)
        .map(|j| {
            let theta = std::f64::consts::TAU * j as f64 / segments as f64;
            let (sin, cos) = theta.sin_cos();
            profile.iter().map(|&[r, z]| [r * cos, r * sin, z]).collect()
        })
        .collect();
    let mut points = Vec::new();
    let mut faces = Vec::new();
    emit_loft(&mut points, &mut faces, &rings, true, true);
    Part::polyhedron(name, &points, &faces)
}
