//! STL loading (ASCII and binary) through `stl_io`.
//!
//! `stl_io` returns an indexed mesh with shared vertices. It is expanded back
//! into plain triangles here. Stored facet normals are ignored because facets
//! derive their own from the vertex order.

use super::Triangle;
use crate::geometry::Point3;
use crate::{Error, Result};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Load the triangles of an STL file.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Vec<Triangle>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let triangles = read_stl(&mut reader)
        .map_err(|e| Error::Mesh(format!("{}: {}", path.display(), e)))?;
    debug!("Read {} triangles from {}", triangles.len(), path.display());
    Ok(triangles)
}

/// Read STL triangles from a seekable byte source.
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<Vec<Triangle>> {
    let stl = stl_io::read_stl(reader).map_err(|e| Error::Mesh(e.to_string()))?;
    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let vertex = |i: usize| -> Result<Point3> {
        let v = stl
            .vertices
            .get(i)
            .ok_or_else(|| Error::Mesh(format!("face references missing vertex {}", i)))?;
        Ok(Point3::new(v.0[0], v.0[1], v.0[2]))
    };

    stl.faces
        .iter()
        .map(|face| {
            let [a, b, c] = face.vertices;
            Ok([vertex(a)?, vertex(b)?, vertex(c)?])
        })
        .collect()
}
