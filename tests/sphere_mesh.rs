use std::collections::HashMap;

use orrery::{RawGeometry, SphereParams};

/// Collapses vertices that share a position, returning the remapped triangles
/// with degenerate ones removed.
fn weld(geometry: &RawGeometry) -> (usize, Vec<[usize; 3]>) {
    let mut ids: HashMap<[i32; 3], usize> = HashMap::new();
    let remap: Vec<usize> = geometry
        .vertices
        .iter()
        .map(|v| {
            let key = [
                (v.position[0] * 1e4).round() as i32,
                (v.position[1] * 1e4).round() as i32,
                (v.position[2] * 1e4).round() as i32,
            ];
            let next = ids.len();
            *ids.entry(key).or_insert(next)
        })
        .collect();

    let indices = geometry.indices.as_ref().expect("sphere is indexed");
    let triangles = indices
        .chunks_exact(3)
        .map(|t| [remap[t[0] as usize], remap[t[1] as usize], remap[t[2] as usize]])
        .filter(|[a, b, c]| a != b && b != c && a != c)
        .collect();

    (ids.len(), triangles)
}

#[test]
fn default_sphere_has_expected_size() {
    let sphere = SphereParams::default().build();

    assert_eq!(sphere.vertices.len(), 13 * 16);
    assert_eq!(sphere.triangle_count(), 16 + 2 * (12 * 16 - 2));
    assert!(sphere.validate().is_ok());

    let indices = sphere.indices.as_ref().unwrap();
    assert_eq!(indices.iter().copied().max(), Some(207));
}

#[test]
fn every_vertex_is_on_the_unit_sphere() {
    let sphere = SphereParams::default().build();
    for vertex in &sphere.vertices {
        assert_eq!(vertex.position[3], 1.0);
        assert!((vertex.length() - 1.0).abs() < 1e-5, "{vertex:?}");
    }
}

#[test]
fn radius_scales_every_vertex() {
    let sphere = SphereParams::default().radius(2.5).cap(-2.5, 2.5).build();
    for vertex in &sphere.vertices {
        assert!((vertex.length() - 2.5).abs() < 1e-4);
    }
}

/// Counts how often each undirected edge of the welded mesh is used.
fn edge_uses(triangles: &[[usize; 3]]) -> HashMap<(usize, usize), u32> {
    let mut edges: HashMap<(usize, usize), u32> = HashMap::new();
    for [a, b, c] in triangles {
        for (x, y) in [(*a, *b), (*b, *c), (*c, *a)] {
            *edges.entry((x.min(y), x.max(y))).or_default() += 1;
        }
    }
    edges
}

#[test]
fn welded_sphere_is_a_closed_surface() {
    let sphere = SphereParams::default().build();
    let (vertex_count, triangles) = weld(&sphere);
    let edges = edge_uses(&triangles);

    assert!(edges.values().all(|&n| n == 2), "open or non-manifold edge");

    // Euler characteristic of a sphere.
    let euler = vertex_count as i64 - edges.len() as i64 + triangles.len() as i64;
    assert_eq!(euler, 2);
}

#[test]
fn mesh_properties_hold_across_tessellations() {
    let radius = 1.5;
    for (segments, rings) in [(1, 1), (3, 2), (4, 3), (5, 7), (8, 6), (16, 12), (32, 24)] {
        let sphere = SphereParams::new()
            .radius(radius)
            .cap(-radius, radius)
            .segments(segments)
            .rings(rings)
            .build();
        let case = format!("{segments} segments x {rings} rings");

        assert_eq!(
            sphere.vertices.len(),
            ((rings + 1) * segments) as usize,
            "{case}"
        );
        for vertex in &sphere.vertices {
            assert_eq!(vertex.position[3], 1.0, "{case}");
            assert!((vertex.length() - radius).abs() < 1e-4, "{case}: {vertex:?}");
        }
        assert_eq!(sphere.validate(), Ok(()), "{case}");

        let (_, triangles) = weld(&sphere);
        let edges = edge_uses(&triangles);
        assert!(
            edges.values().all(|&n| n == 2),
            "{case}: open or non-manifold edge"
        );
    }
}

#[test]
fn capped_sphere_stays_inside_its_slab() {
    let sphere = SphereParams::default().cap(-0.5, 0.5).build();
    for vertex in &sphere.vertices {
        let z = vertex.position[2];
        assert!((-0.5 - 1e-5..=0.5 + 1e-5).contains(&z));
    }
    assert!(sphere.validate().is_ok());
}
