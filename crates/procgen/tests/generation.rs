//! End-to-end generation properties: determinism, cardinality, banding, validation.

use std::cell::Cell as Counter;

use approx::assert_relative_eq;
use procgen::{band_uvs, generate, height_band, HeightField, HeightMap, MeshTessellator, TerrainGrid};
use terrain_core::{ConfigIssue, GridAxis, SeamMode, TerrainError, TerrainSettings};

/// Height field that counts how often it is read.
struct SpyField {
    reads: Counter<usize>,
}

impl SpyField {
    fn new() -> Self {
        Self {
            reads: Counter::new(0),
        }
    }
}

impl HeightField for SpyField {
    fn width(&self) -> u32 {
        4
    }

    fn height(&self) -> u32 {
        4
    }

    fn intensity(&self, _x: u32, _y: u32) -> f32 {
        self.reads.set(self.reads.get() + 1);
        0.5
    }
}

fn settings(x_cells: u32, y_cells: u32) -> TerrainSettings {
    TerrainSettings {
        x_cells,
        y_cells,
        small_radius: 1.0,
        big_radius: 5.0,
        height: 0.5,
        ..Default::default()
    }
}

fn ripples() -> HeightMap {
    HeightMap::from_fn(32, 32, |x, y| {
        let (fx, fy) = (x as f32 / 31.0, y as f32 / 31.0);
        0.5 + 0.5 * (fx * 9.0).sin() * (fy * 5.0).cos()
    })
}

#[test]
fn generation_is_bit_identical_across_runs() {
    let s = settings(12, 20);
    let a = generate(&s, ripples()).unwrap();
    let b = generate(&s, ripples()).unwrap();

    assert_eq!(a.grid, b.grid);
    assert_eq!(a.mesh.indices, b.mesh.indices);
    for (pa, pb) in a.mesh.positions.iter().zip(&b.mesh.positions) {
        assert_eq!(pa.to_array().map(f32::to_bits), pb.to_array().map(f32::to_bits));
    }
    for (ua, ub) in a.mesh.uvs.iter().zip(&b.mesh.uvs) {
        assert_eq!(ua.to_array().map(f32::to_bits), ub.to_array().map(f32::to_bits));
    }
}

#[test]
fn six_unshared_vertices_per_cell() {
    for (x, y) in [(1, 1), (3, 7), (16, 4)] {
        let out = generate(&settings(x, y), ripples()).unwrap();
        let expected = 6 * (x * y) as usize;
        assert_eq!(out.mesh.vertex_count(), expected, "{x}x{y} vertices");
        assert_eq!(out.mesh.indices.len(), expected, "{x}x{y} indices");
        assert_eq!(out.mesh.uvs.len(), expected, "{x}x{y} uvs");
        assert_eq!(out.mesh.normals.len(), expected, "{x}x{y} normals");
        // Indices reference each emitted vertex once, in order.
        assert!(out.mesh.indices.iter().enumerate().all(|(n, &i)| n as u32 == i));
    }
}

#[test]
fn single_cell_grid_emits_two_triangles() {
    let out = generate(&settings(1, 1), ripples()).unwrap();
    assert_eq!(out.grid.len(), 1);
    assert_eq!(out.mesh.triangle_count(), 2);
    assert_eq!(out.mesh.vertex_count(), 6);
}

#[test]
fn cells_emit_in_row_major_order_with_fixed_corner_layout() {
    let s = settings(3, 4);
    let out = generate(&s, ripples()).unwrap();
    let tessellator = MeshTessellator::new(&s).unwrap();

    for (n, (i, j, cell)) in out.grid.iter().enumerate() {
        assert_eq!((i, j), (n as u32 / 4, n as u32 % 4));

        // Triangle A is v0, v1, v2; triangle B is v1, v3, v2.
        let [v0, v1, v2, v3] = cell.corners();
        for (t, corners) in [[v0, v1, v2], [v1, v3, v2]].iter().enumerate() {
            let base = 6 * n + 3 * t;
            let uvs = band_uvs(height_band(tessellator.average_height(corners)));
            for (k, (corner, uv)) in corners.iter().zip(uvs).enumerate() {
                assert_eq!(out.mesh.positions[base + k], corner.to_cartesian(), "cell ({i}, {j})");
                assert_eq!(out.mesh.uvs[base + k], uv, "cell ({i}, {j})");
            }
        }
    }
}

#[test]
fn first_vertex_sits_at_the_origin_angles() {
    let s = settings(2, 2);
    let out = generate(&s, HeightMap::constant(4, 4, 1.0)).unwrap();
    // Cell (0, 0), corner v0: both angles are zero.
    let tube = s.small_radius + s.height;
    assert_relative_eq!(out.mesh.positions[0].x, s.big_radius + tube, epsilon = 1e-6);
    assert_relative_eq!(out.mesh.positions[0].y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(out.mesh.positions[0].z, 0.0, epsilon = 1e-6);
    // Triangle B starts at v1 = (1, 0), half a turn around the tube.
    assert_relative_eq!(out.mesh.positions[3].x, s.big_radius - tube, epsilon = 1e-5);
}

#[test]
fn flat_height_field_lies_on_the_base_torus() {
    let s = settings(2, 2);
    let out = generate(&s, HeightMap::constant(8, 8, 0.0)).unwrap();

    assert_eq!(out.mesh.triangle_count(), 8);
    for p in &out.mesh.positions {
        // Distance from the tube's centre circle equals small_radius.
        let ring = (p.x * p.x + p.z * p.z).sqrt() - s.big_radius;
        let tube = (ring * ring + p.y * p.y).sqrt();
        assert_relative_eq!(tube, s.small_radius, epsilon = 1e-5);
    }
    for tri in out.mesh.uvs.chunks_exact(3) {
        assert_eq!(tri[0].y, 0.15);
        assert_eq!(tri[1].y, 0.15);
        assert_relative_eq!(tri[2].y, 0.10, epsilon = 1e-6);
    }
}

#[test]
fn full_height_field_uses_top_band() {
    let out = generate(&settings(4, 4), HeightMap::constant(8, 8, 1.0)).unwrap();
    assert!(out.mesh.uvs.chunks_exact(3).all(|tri| tri[0].y == 0.90));
}

#[test]
fn zero_cells_fail_before_sampling() {
    let spy = SpyField::new();
    let err = generate(&settings(0, 4), &spy).unwrap_err();
    assert_eq!(
        err,
        TerrainError::InvalidConfiguration(ConfigIssue::ZeroCells { axis: GridAxis::X })
    );
    assert_eq!(spy.reads.get(), 0);

    let err = TerrainGrid::build(&settings(4, 0), &spy).unwrap_err();
    assert!(matches!(err, TerrainError::InvalidConfiguration(_)));
    assert_eq!(spy.reads.get(), 0);
}

#[test]
fn spy_is_read_four_times_per_cell() {
    let spy = SpyField::new();
    generate(&settings(3, 5), &spy).unwrap();
    assert_eq!(spy.reads.get(), 4 * 3 * 5);
}

#[test]
fn wrapped_seam_is_watertight() {
    let s = TerrainSettings {
        seam: SeamMode::Wrap,
        ..settings(6, 10)
    };
    let out = generate(&s, ripples()).unwrap();
    // Every grid vertex appears at exactly one position.
    assert_eq!(out.mesh.welded(0.0).vertex_count(), 6 * 10);

    let recomputed = generate(&settings(6, 10), ripples()).unwrap();
    assert!(recomputed.mesh.welded(0.0).vertex_count() > 6 * 10);
}

#[test]
fn welded_normals_agree_across_cells() {
    let s = TerrainSettings {
        seam: SeamMode::Wrap,
        ..settings(8, 8)
    };
    let mut mesh = generate(&s, ripples()).unwrap().mesh;
    mesh.recalculate_normals_welded(1e-4);

    for (a, pa) in mesh.positions.iter().enumerate() {
        for (b, pb) in mesh.positions.iter().enumerate().skip(a + 1) {
            if pa.distance(*pb) <= 1e-4 {
                assert!(mesh.normals[a].abs_diff_eq(mesh.normals[b], 1e-6));
            }
        }
    }
}
