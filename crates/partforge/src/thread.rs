//! Printable screw threads.
//!
//! Threads are built as a trapezoidal ridge profile swept along a helix,
//! over-swept by a turn at each end and then trimmed flat, so the thread
//! starts and ends flush with the `0..length` band. The profile is a
//! 60-degree form at 5/8 engagement, which prints cleanly and mates with
//! itself given a diametral clearance.

use crate::{require_positive, sweep, GeomError, Part};

/// Radial embed of the ridge root into its mating wall, so union and cut
/// booleans never leave a coincident-face sliver.
const EMBED: f64 = 0.1;

/// Engaged thread depth as a fraction of pitch (5/8 of the fundamental
/// triangle height `cos(30)`).
const DEPTH_RATIO: f64 = 0.541;

/// Thread parameters.
#[derive(Debug, Clone, Copy)]
pub struct ThreadSpec {
    /// Major (outer) thread diameter.
    pub major_diameter: f64,
    /// Axial advance per turn.
    pub pitch: f64,
    /// Axial length of the threaded band.
    pub length: f64,
    /// External (rod) or internal (bore) ridge orientation.
    pub external: bool,
    /// Helix tessellation density.
    pub segments_per_turn: usize,
}

impl ThreadSpec {
    pub fn new(major_diameter: f64, pitch: f64, length: f64, external: bool) -> Self {
        Self {
            major_diameter,
            pitch,
            length,
            external,
            segments_per_turn: 48,
        }
    }

    /// Radial thread depth.
    pub fn depth(&self) -> f64 {
        DEPTH_RATIO * self.pitch
    }

    /// Minor (root) thread diameter.
    pub fn minor_diameter(&self) -> f64 {
        self.major_diameter - 2.0 * self.depth()
    }

    fn validate(&self) -> Result<(), GeomError> {
        require_positive("major_diameter", self.major_diameter)?;
        require_positive("pitch", self.pitch)?;
        require_positive("length", self.length)?;
        if self.minor_diameter() - 2.0 * EMBED <= 0.0 {
            return Err(GeomError::InvalidGeometry(format!(
                "pitch {} too coarse for a {} diameter thread",
                self.pitch, self.major_diameter
            )));
        }
        Ok(())
    }
}

/// Ridge cross-section in the r-z half-plane, centered on z = 0.
///
/// The crest is `pitch/8` wide and the root widens by the flank slope
/// (`tan(30)` per side); the root edge is pushed `EMBED` into the mating
/// wall.
pub(crate) fn thread_profile(spec: &ThreadSpec) -> Vec<[f64; 2]> {
    let depth = spec.depth();
    let crest_hw = spec.pitch / 16.0;
    let root_hw = crest_hw + 0.577 * depth;
    let (r_root, r_crest) = if spec.external {
        (spec.major_diameter / 2.0 - depth - EMBED, spec.major_diameter / 2.0)
    } else {
        (spec.major_diameter / 2.0 + EMBED, spec.major_diameter / 2.0 - depth)
    };
    vec![
        [r_root, -root_hw],
        [r_crest, -crest_hw],
        [r_crest, crest_hw],
        [r_root, root_hw],
    ]
}

/// The thread ridge solid for the band `0..length` along Z.
///
/// For an external thread, union the result with a rod of the minor
/// diameter; for an internal thread, union it with the part carrying a bore
/// of the major diameter. Apply any fit clearance to `major_diameter`
/// before calling.
pub fn make_thread(spec: &ThreadSpec) -> Result<Part, GeomError> {
    spec.validate()?;
    let profile = thread_profile(spec);
    // One overshoot turn below and above the band, trimmed off flat.
    let turns = spec.length / spec.pitch + 2.0;
    let ridge = sweep::helix_sweep(
        "thread-ridge",
        &profile,
        turns,
        spec.pitch,
        spec.segments_per_turn,
    )?
    .translate(0.0, 0.0, -spec.pitch);
    let trim = Part::cylinder(
        "thread-trim",
        spec.major_diameter / 2.0 + spec.pitch,
        spec.length,
        16,
    );
    Ok(ridge.intersection(&trim))
}

/// A rod of `length` fully threaded over its whole height.
pub fn threaded_rod(name: impl Into<String>, spec: &ThreadSpec) -> Result<Part, GeomError> {
    if !spec.external {
        return Err(GeomError::InvalidGeometry(
            "a threaded rod needs an external thread".into(),
        ));
    }
    let core = Part::cylinder(name, spec.minor_diameter() / 2.0, spec.length, 64);
    Ok(core.union(&make_thread(spec)?))
}
