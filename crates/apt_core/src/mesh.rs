//! Indexed triangle geometry shared by every mesh loader.
//!
//! Faces with more than three corners are fan-triangulated on insertion.
//! Corners may omit their normal or texture coordinate; [`MeshGeometry::finish`]
//! fills the gaps with flat face normals and a shared `(0, 0)` coordinate.

use apt_math::{Aabb, Vec3};

use crate::error::{MeshError, Result};

/// One corner of a polygon: a node index plus optional normal and uv indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceVertex {
    pub node: usize,
    pub normal: Option<usize>,
    pub texture_coordinate: Option<usize>,
}

impl FaceVertex {
    pub fn node(node: usize) -> Self {
        Self {
            node,
            normal: None,
            texture_coordinate: None,
        }
    }

    pub fn with_normal(mut self, normal: usize) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_texture_coordinate(mut self, texture_coordinate: usize) -> Self {
        self.texture_coordinate = Some(texture_coordinate);
        self
    }
}

/// World-space data for a single triangle of a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshTriangle<'a> {
    pub points: [Vec3; 3],
    /// `None` unless all three corners carry a normal.
    pub normals: Option<[Vec3; 3]>,
    /// Packed as `[u0, v0, u1, v1, u2, v2]`; `None` unless all corners carry one.
    pub texture_coordinates: Option<[f64; 6]>,
    pub material: &'a str,
}

/// Triangle soup with shared attribute arrays.
#[derive(Clone, Debug, Default)]
pub struct MeshGeometry {
    pub nodes: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texture_coordinates: Vec<[f64; 2]>,

    /// Per-triangle material name.
    pub materials: Vec<String>,
    pub face_nodes: Vec<[usize; 3]>,
    pub face_normals: Vec<[Option<usize>; 3]>,
    pub face_texture_coordinates: Vec<[Option<usize>; 3]>,
}

impl MeshGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Vec3) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_normal(&mut self, normal: Vec3) -> usize {
        self.normals.push(normal);
        self.normals.len() - 1
    }

    pub fn add_texture_coordinate(&mut self, u: f64, v: f64) -> usize {
        self.texture_coordinates.push([u, v]);
        self.texture_coordinates.len() - 1
    }

    /// Add a polygon, splitting it into a triangle fan around its first corner.
    ///
    /// Every index is checked against the attributes added so far, so nodes,
    /// normals and texture coordinates must be added before the faces using them.
    /// Returns the number of triangles produced.
    pub fn add_face(&mut self, corners: &[FaceVertex], material: &str) -> Result<usize> {
        if corners.len() < 3 {
            return Err(MeshError::DegenerateFace(corners.len()));
        }
        for corner in corners {
            self.check_corner(corner)?;
        }

        let first = corners[0];
        for pair in corners[1..].windows(2) {
            let tri = [first, pair[0], pair[1]];
            self.face_nodes.push(tri.map(|c| c.node));
            self.face_normals.push(tri.map(|c| c.normal));
            self.face_texture_coordinates
                .push(tri.map(|c| c.texture_coordinate));
            self.materials.push(material.to_owned());
        }

        Ok(corners.len() - 2)
    }

    fn check_corner(&self, corner: &FaceVertex) -> Result<()> {
        if corner.node >= self.nodes.len() {
            return Err(MeshError::NodeOutOfRange {
                index: corner.node,
                len: self.nodes.len(),
            });
        }
        if let Some(index) = corner.normal {
            if index >= self.normals.len() {
                return Err(MeshError::NormalOutOfRange {
                    index,
                    len: self.normals.len(),
                });
            }
        }
        if let Some(index) = corner.texture_coordinate {
            if index >= self.texture_coordinates.len() {
                return Err(MeshError::TextureCoordinateOutOfRange {
                    index,
                    len: self.texture_coordinates.len(),
                });
            }
        }
        Ok(())
    }

    pub fn triangle_count(&self) -> usize {
        self.face_nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.face_nodes.is_empty()
    }

    /// Fill every missing normal and texture coordinate.
    pub fn finish(&mut self) {
        self.build_missing_normals();
        self.build_missing_texture_coordinates();
    }

    /// Give every triangle with a missing corner normal its flat face normal.
    ///
    /// One normal is appended per incomplete triangle. Corners that already
    /// have a normal keep it.
    pub fn build_missing_normals(&mut self) {
        let mut built = 0;
        for i in 0..self.face_nodes.len() {
            if self.face_normals[i].iter().all(Option::is_some) {
                continue;
            }

            let [a, b, c] = self.face_nodes[i].map(|n| self.nodes[n]);
            let normal = (b - a).cross(c - a).normalize();
            if !normal.is_finite() {
                log::warn!("Triangle {} has zero area, its face normal is undefined", i);
            }
            let index = self.add_normal(normal);
            for slot in self.face_normals[i].iter_mut().filter(|s| s.is_none()) {
                *slot = Some(index);
            }
            built += 1;
        }

        if built > 0 {
            log::debug!("Built {} flat face normals", built);
        }
    }

    /// Point every missing texture coordinate at a single shared `(0, 0)`.
    pub fn build_missing_texture_coordinates(&mut self) {
        let missing = self
            .face_texture_coordinates
            .iter()
            .flatten()
            .any(Option::is_none);
        if !missing {
            return;
        }

        let index = self.add_texture_coordinate(0.0, 0.0);
        for slot in self
            .face_texture_coordinates
            .iter_mut()
            .flatten()
            .filter(|s| s.is_none())
        {
            *slot = Some(index);
        }
    }

    /// Resolve triangle `index` into positions, normals and coordinates.
    pub fn triangle(&self, index: usize) -> Option<MeshTriangle<'_>> {
        let nodes = self.face_nodes.get(index)?;

        let normals = self.face_normals[index]
            .iter()
            .map(|n| n.map(|n| self.normals[n]))
            .collect::<Option<Vec<_>>>()
            .map(|n| [n[0], n[1], n[2]]);

        let texture_coordinates = self.face_texture_coordinates[index]
            .iter()
            .map(|t| t.map(|t| self.texture_coordinates[t]))
            .collect::<Option<Vec<_>>>()
            .map(|t| [t[0][0], t[0][1], t[1][0], t[1][1], t[2][0], t[2][1]]);

        Some(MeshTriangle {
            points: nodes.map(|n| self.nodes[n]),
            normals,
            texture_coordinates,
            material: &self.materials[index],
        })
    }

    /// Bounding box of all nodes.
    pub fn bounds(&self) -> Aabb {
        if self.nodes.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f64::INFINITY);
        let mut max = Vec3::splat(f64::NEG_INFINITY);
        for node in &self.nodes {
            min = min.min(*node);
            max = max.max(*node);
        }

        Aabb::from_points(min, max)
    }

    /// Distinct material names in first-use order.
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in &self.materials {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}
