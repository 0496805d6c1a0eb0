//! Wavefront OBJ loading.
//!
//! Contract:
//! - Produces the interleaved vertex buffer + u32 triangle index buffer the
//!   renderer consumes.
//! - Vertices that share a position index but differ in UV or normal index
//!   become distinct vertices (texture seams stay intact). The first
//!   attribute combination seen for a position keeps that position's index;
//!   later combinations are appended at the end of the buffer.
//! - Faces must be triangulated `v/vt/vn` triplets, 1-based.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;

use super::mesh::{CpuMesh, CpuVertex};
use crate::engine::{EngineError, EngineResult};

pub fn load_obj(path: impl AsRef<Path>) -> EngineResult<CpuMesh> {
    let path = path.as_ref();

    let is_obj = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("obj"))
        .unwrap_or(false);
    if !is_obj {
        return Err(EngineError::MeshLoad {
            path: path.display().to_string(),
            message: "not a .obj file".into(),
        });
    }

    let source = fs::read_to_string(path)?;
    let mesh = parse_obj(&source).map_err(|message| EngineError::MeshLoad {
        path: path.display().to_string(),
        message,
    })?;

    info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

pub fn parse_obj(source: &str) -> Result<CpuMesh, String> {
    let mut coords: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut faces: Vec<(usize, [&str; 3])> = Vec::new();

    for (line_index, line) in source.lines().enumerate() {
        let line_no = line_index + 1;
        let mut words = line.split_whitespace();

        match words.next() {
            Some("v") => coords.push(parse_floats(&mut words, line_no)?),
            Some("vt") => uvs.push(parse_floats(&mut words, line_no)?),
            Some("vn") => normals.push(parse_floats(&mut words, line_no)?),
            Some("f") => {
                let corners: Vec<&str> = words.collect();
                let corners: [&str; 3] = corners
                    .try_into()
                    .map_err(|_| format!("line {line_no}: faces must be triangulated"))?;
                faces.push((line_no, corners));
            }
            _ => {}
        }
    }

    // Slots 0..coords.len() are reserved for the first attribute combination
    // seen per position; seam duplicates go after them.
    let mut vertices: Vec<CpuVertex> = vec![CpuVertex::default(); coords.len()];
    let mut indices: Vec<u32> = Vec::with_capacity(faces.len() * 3);
    let mut parsed_verts: HashMap<u32, HashMap<(u32, u32), u32>> = HashMap::new();

    for (line_no, corners) in faces {
        for corner in corners {
            let (v, vt, vn) = parse_face_vertex(corner, line_no)?;

            if v as usize >= coords.len() {
                return Err(format!("line {line_no}: position index {} out of range", v + 1));
            }
            if vt as usize >= uvs.len() {
                return Err(format!("line {line_no}: uv index {} out of range", vt + 1));
            }
            if vn as usize >= normals.len() {
                return Err(format!("line {line_no}: normal index {} out of range", vn + 1));
            }

            let vertex = CpuVertex {
                pos: coords[v as usize],
                uv: uvs[vt as usize],
                normal: normals[vn as usize],
            };

            let combos = parsed_verts.entry(v).or_default();
            let index = match combos.get(&(vt, vn)) {
                Some(&index) => index,
                None => {
                    let index = if combos.is_empty() {
                        vertices[v as usize] = vertex;
                        v
                    } else {
                        vertices.push(vertex);
                        vertices.len() as u32 - 1
                    };
                    combos.insert((vt, vn), index);
                    index
                }
            };

            indices.push(index);
        }
    }

    Ok(CpuMesh::new(vertices, indices))
}

fn parse_floats<'a, const N: usize>(
    words: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<[f32; N], String> {
    let mut out = [0.0f32; N];
    for slot in &mut out {
        *slot = words
            .next()
            .ok_or_else(|| format!("line {line_no}: expected {N} components"))?
            .parse()
            .map_err(|_| format!("line {line_no}: malformed number"))?;
    }
    Ok(out)
}

fn parse_face_vertex(token: &str, line_no: usize) -> Result<(u32, u32, u32), String> {
    let mut parts = token.split('/');
    let mut next = || -> Result<u32, String> {
        let raw = parts
            .next()
            .filter(|part| !part.is_empty())
            .ok_or_else(|| format!("line {line_no}: face corner `{token}` must be v/vt/vn"))?;
        let index: u32 = raw
            .parse()
            .map_err(|_| format!("line {line_no}: malformed face index `{raw}`"))?;
        index
            .checked_sub(1)
            .ok_or_else(|| format!("line {line_no}: face indices are 1-based"))
    };

    Ok((next()?, next()?, next()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn parses_a_single_triangle() {
        let mesh = parse_obj(TRIANGLE).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);

        assert_eq!(mesh.vertices[1].pos, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn seam_vertices_are_duplicated_not_overwritten() {
        // The second face reuses position 1 with a different UV: that corner
        // must become a fourth vertex instead of clobbering vertex 0.
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vt 0.5 0.5
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
f 1/4/1 2/2/1 3/3/1
";
        let mesh = parse_obj(source).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 1, 2]);

        // First occurrence kept its position index and attributes.
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        // The seam duplicate shares the position, carries the new UV.
        assert_eq!(mesh.vertices[3].pos, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[3].uv, [0.5, 0.5]);
    }

    #[test]
    fn differing_normals_also_split_vertices() {
        let source = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 1.0 0.0
f 1/1/1 2/2/1 3/3/1
f 1/1/2 2/2/1 3/3/1
";
        let mesh = parse_obj(source).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.vertices[3].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn shared_corners_reuse_their_index() {
        let mesh = parse_obj(TRIANGLE).unwrap();
        assert_eq!(mesh.indices.len(), 3);

        let two_faces = format!("{TRIANGLE}f 1/1/1 2/2/1 3/3/1\n");
        let mesh = parse_obj(&two_faces).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn rejects_non_obj_paths() {
        let err = load_obj("scene.stl").unwrap_err();
        assert!(err.to_string().contains("not a .obj file"));
    }

    #[test]
    fn rejects_malformed_faces() {
        let missing_normal = "\
v 0.0 0.0 0.0
vt 0.0 0.0
f 1/1 1/1 1/1
";
        assert!(parse_obj(missing_normal).is_err());

        let quad = "\
v 0.0 0.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 1/1/1 1/1/1 1/1/1
";
        let err = parse_obj(quad).unwrap_err();
        assert!(err.contains("triangulated"));
    }

    #[test]
    fn reports_out_of_range_indices() {
        let source = "\
v 0.0 0.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 1/1/1
";
        let err = parse_obj(source).unwrap_err();
        assert!(err.contains("out of range"));
    }
}
