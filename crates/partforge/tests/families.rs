//! End-to-end checks: build part families through the public API and export
//! them.

use partforge::parts::{AdapterConfig, CapsuleConfig, ContainerConfig, EnclosureConfig};

fn stl_triangle_count(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes[80..84].try_into().unwrap())
}

#[test]
fn capsule_exports_both_components() {
    let config = CapsuleConfig {
        knurled: false,
        height: 68.0,
        ..CapsuleConfig::default()
    };
    let parts = config.build().unwrap();
    for part in [&parts.body, &parts.cap] {
        let bytes = part.to_stl().unwrap();
        let triangles = stl_triangle_count(&bytes);
        assert!(triangles > 0);
        assert_eq!(bytes.len(), 84 + triangles as usize * 50);
    }
}

#[test]
fn container_cap_fits_over_body_thread() {
    let config = ContainerConfig {
        knurled_cap: false,
        ..ContainerConfig::default()
    };
    let parts = config.build().unwrap();
    let (_, body_max) = parts.body.bounding_box();
    let (cap_min, cap_max) = parts.cap.bounding_box();
    // The cap's inner bore (major + clearance/2) clears the body's thread
    // crest (major - clearance/2); outer shells differ by two walls.
    let body_crest = body_max[0] * 2.0;
    let cap_outer = cap_max[0] - cap_min[0];
    assert!(cap_outer > body_crest);
    assert!((cap_outer - body_crest) < 3.0 * config.wall_thickness);
}

#[test]
fn enclosure_lid_matches_base_footprint() {
    let config = EnclosureConfig {
        mounting_ears: false,
        vent: None,
        ..EnclosureConfig::default()
    };
    let parts = config.build().unwrap();
    let (bmin, bmax) = parts.bottom.bounding_box();
    let (tmin, tmax) = parts.top.bounding_box();
    assert!((bmax[0] - bmin[0] - (tmax[0] - tmin[0])).abs() < 0.05);
    assert!((bmax[1] - bmin[1] - (tmax[1] - tmin[1])).abs() < 0.05);
    // Lid sits directly above the walls.
    assert!(tmax[2] > bmax[2]);
}

#[test]
fn adapter_caps_nest() {
    let config = AdapterConfig {
        knurled: false,
        ..AdapterConfig::default()
    };
    let parts = config.build().unwrap();
    let (omin, omax) = parts.cap_external.bounding_box();
    let (imin, imax) = parts.cap_internal.bounding_box();
    // The core cap's thread crest stays inside the outer cap's bore wall.
    assert!(imax[0] - imin[0] < omax[0] - omin[0]);
}
