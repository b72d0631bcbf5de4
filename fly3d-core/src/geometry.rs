/// Indexed triangle meshes
use crate::vector::Vec3;

/// A triangle face defined by three positions, wound counter-clockwise when
/// seen from the front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Outward face normal from the counter-clockwise winding
    pub fn calculate_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(v2 - v0).normalise()
    }

    pub fn centroid(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v0 + v1 + v2) * (1.0 / 3.0)
    }
}

/// Vertex positions plus a `u16` index list, three indices per triangle.
///
/// The layout matches what an indexed draw call consumes: `vertex_data` goes
/// into the array buffer, `indices` into the element buffer.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate faces, skipping any trailing partial triangle.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |idx| {
            Triangle::new(
                self.positions[idx[0] as usize],
                self.positions[idx[1] as usize],
                self.positions[idx[2] as usize],
            )
        })
    }

    /// Positions flattened to `x, y, z` triples.
    pub fn vertex_data(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Axis-aligned cube of edge `size` centred on the origin.
    ///
    /// Vertex `i` sits at `(±h, ±h, ±h)` with bit 2 of `i` selecting +x,
    /// bit 1 +y and bit 0 +z.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let positions = (0..8u16)
            .map(|i| {
                let pick = |bit: u16| if i & bit != 0 { h } else { -h };
                Vec3::new(pick(4), pick(2), pick(1))
            })
            .collect();

        #[rustfmt::skip]
        let indices = vec![
            0, 6, 4,  0, 2, 6, // -z
            0, 3, 2,  0, 1, 3, // -x
            2, 7, 6,  2, 3, 7, // +y
            4, 6, 7,  4, 7, 5, // +x
            0, 4, 5,  0, 5, 1, // -y
            1, 5, 7,  1, 7, 3, // +z
        ];

        Self { positions, indices }
    }
}
