//! Mesh value object produced by tessellation, plus its post-processes.
//!
//! Generated meshes do not share vertices between triangles, so every triangle owns
//! its three UVs and can carry a flat colour band. Smooth normals computed over such a
//! mesh only blend triangles that literally share an index. Blending across
//! duplicate positions is an explicit, optional weld step ([`WeldMap`]).

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Vec2, Vec3};

/// Interleaved vertex layout for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangle mesh: parallel position/normal/uv streams and a stride-3 index buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::new(),
            uvs: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Index triples, one per triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unnormalised face normal of a triangle; its length is twice the triangle area.
    fn face_normal(&self, [a, b, c]: [u32; 3]) -> Vec3 {
        let pa = self.positions[a as usize];
        let pb = self.positions[b as usize];
        let pc = self.positions[c as usize];
        (pb - pa).cross(pc - pa)
    }

    /// Area-weighted smooth normals over the index buffer. Vertices are only blended
    /// where triangles share an index; duplicated positions stay independent.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.triangles() {
            let n = self.face_normal(tri);
            for i in tri {
                normals[i as usize] += n;
            }
        }
        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Area-weighted smooth normals where every position within `tolerance` of another
    /// counts as the same vertex. Positions, UVs and indices are left untouched.
    pub fn recalculate_normals_welded(&mut self, tolerance: f32) {
        let weld = WeldMap::build(&self.positions, tolerance);
        let mut accumulated = vec![Vec3::ZERO; weld.welded_count()];
        for tri in self.triangles() {
            let n = self.face_normal(tri);
            for i in tri {
                accumulated[weld.slot(i as usize)] += n;
            }
        }
        self.normals = (0..self.positions.len())
            .map(|i| accumulated[weld.slot(i)].normalize_or_zero())
            .collect();
    }

    /// Indexed copy with duplicate positions merged. The first vertex seen in each
    /// group donates its UV, so banded texturing is lost along merged edges.
    pub fn welded(&self, tolerance: f32) -> MeshData {
        let weld = WeldMap::build(&self.positions, tolerance);
        let positions = weld
            .representatives()
            .iter()
            .map(|&i| self.positions[i as usize])
            .collect();
        let uvs = weld
            .representatives()
            .iter()
            .map(|&i| self.uvs.get(i as usize).copied().unwrap_or(Vec2::ZERO))
            .collect();
        let indices = self
            .indices
            .iter()
            .map(|&i| weld.slot(i as usize) as u32)
            .collect();

        let mut mesh = MeshData {
            positions,
            normals: Vec::new(),
            uvs,
            indices,
        };
        mesh.recalculate_normals();
        mesh
    }

    /// Interleave the attribute streams. Missing normals or UVs read as zero.
    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| TerrainVertex {
                position: p.to_array(),
                normal: self.normals.get(i).copied().unwrap_or(Vec3::ZERO).to_array(),
                uv: self.uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
            })
            .collect()
    }

    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Groups vertices whose positions lie within a tolerance of each other.
///
/// Each vertex maps to a slot; each slot remembers the first vertex that opened it.
/// A non-positive tolerance only merges bit-identical positions.
#[derive(Debug, Clone)]
pub struct WeldMap {
    slots: Vec<u32>,
    representatives: Vec<u32>,
}

impl WeldMap {
    pub fn build(positions: &[Vec3], tolerance: f32) -> Self {
        let mut slots = Vec::with_capacity(positions.len());
        let mut representatives: Vec<u32> = Vec::new();

        if tolerance > 0.0 && tolerance.is_finite() {
            let tol2 = tolerance * tolerance;
            let mut buckets: HashMap<IVec3, Vec<u32>> = HashMap::new();
            for (i, &p) in positions.iter().enumerate() {
                let key = (p / tolerance).floor().as_ivec3();
                let mut found = None;
                'search: for dz in -1..=1 {
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            let Some(bucket) = buckets.get(&(key + IVec3::new(dx, dy, dz))) else {
                                continue;
                            };
                            for &slot in bucket {
                                let rep = positions[representatives[slot as usize] as usize];
                                if rep.distance_squared(p) <= tol2 {
                                    found = Some(slot);
                                    break 'search;
                                }
                            }
                        }
                    }
                }
                let slot = found.unwrap_or_else(|| {
                    let slot = representatives.len() as u32;
                    representatives.push(i as u32);
                    buckets.entry(key).or_default().push(slot);
                    slot
                });
                slots.push(slot);
            }
        } else {
            let mut exact: HashMap<[u32; 3], u32> = HashMap::new();
            for (i, p) in positions.iter().enumerate() {
                let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
                let slot = *exact.entry(key).or_insert_with(|| {
                    representatives.push(i as u32);
                    (representatives.len() - 1) as u32
                });
                slots.push(slot);
            }
        }

        Self {
            slots,
            representatives,
        }
    }

    /// Welded slot of vertex `i`.
    pub fn slot(&self, i: usize) -> usize {
        self.slots[i] as usize
    }

    pub fn welded_count(&self) -> usize {
        self.representatives.len()
    }

    /// First vertex index of every slot, in slot order.
    pub fn representatives(&self) -> &[u32] {
        &self.representatives
    }
}
