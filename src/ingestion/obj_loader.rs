use std::io::BufReader;
use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::error::{IndexerError, Result};
use crate::types::{TriangleSoup, Vertex};

/// One OBJ object/group flattened into a soup.
#[derive(Debug, Clone)]
pub struct SoupModel {
    pub name: String,
    pub soup: TriangleSoup,
}

/// Keep the file's own per-attribute indices so every corner can be
/// checked for a full position/uv/normal triple.
fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file into one triangle soup per model.
///
/// Materials are not read; `mtllib` lines are accepted and ignored.
pub fn load_obj(path: &Path, flip_v: bool) -> Result<Vec<SoupModel>> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        IndexerError::Input(format!("Failed to load OBJ {}: {e}", path.display()))
    })?;

    let models = parse_obj(&source, flip_v)?;
    debug!(model_count = models.len(), path = %path.display(), "Loaded OBJ models");
    Ok(models)
}

/// Parse OBJ text held in memory.
pub fn parse_obj(source: &str, flip_v: bool) -> Result<Vec<SoupModel>> {
    check_face_corners(source)?;

    let mut reader = BufReader::new(source.as_bytes());
    let (models, _materials) =
        tobj::load_obj_buf(&mut reader, &load_options(), |_| Ok(Default::default()))
            .map_err(|e| IndexerError::Input(format!("Failed to parse OBJ: {e}")))?;

    models
        .into_iter()
        .map(|model| convert_model(model, flip_v))
        .collect()
}

/// Every corner of every `f` record must name a position, uv and normal.
///
/// tobj pads the uv and normal index lists of a model when only some of its
/// faces carry them, so a short corner is only visible in the raw text.
fn check_face_corners(source: &str) -> Result<()> {
    for (line_no, line) in source.lines().enumerate() {
        let record = line.split('#').next().unwrap_or_default();
        let mut tokens = record.split_whitespace();
        if tokens.next() != Some("f") {
            continue;
        }
        for corner in tokens {
            let mut fields = corner.split('/');
            let complete = fields.clone().count() == 3 && fields.all(|f| !f.is_empty());
            if !complete {
                return Err(IndexerError::Input(format!(
                    "Line {}: face corner '{corner}' is not a v/vt/vn triple",
                    line_no + 1
                )));
            }
        }
    }
    Ok(())
}

/// Expand a `tobj::Model` into per-corner tuples.
///
/// Any non-triangular face or corner lacking a uv or normal index fails the
/// whole model.
fn convert_model(model: tobj::Model, flip_v: bool) -> Result<SoupModel> {
    let mesh = &model.mesh;

    if let Some(arity) = mesh.face_arities.iter().find(|&&a| a != 3) {
        return Err(IndexerError::Input(format!(
            "Model '{}' has a {arity}-sided face; only triangles are supported",
            model.name
        )));
    }

    let corner_count = mesh.indices.len();
    if mesh.texcoord_indices.len() != corner_count || mesh.normal_indices.len() != corner_count {
        return Err(IndexerError::Input(format!(
            "Model '{}' has faces without position/uv/normal triples",
            model.name
        )));
    }

    let mut corners = Vec::with_capacity(corner_count);
    for i in 0..corner_count {
        let position: [f32; 3] =
            attribute(&mesh.positions, mesh.indices[i], "position", &model.name)?;
        let mut uv: [f32; 2] =
            attribute(&mesh.texcoords, mesh.texcoord_indices[i], "uv", &model.name)?;
        let normal: [f32; 3] =
            attribute(&mesh.normals, mesh.normal_indices[i], "normal", &model.name)?;

        if flip_v {
            uv[1] = -uv[1];
        }

        corners.push(Vertex::new(
            Vec3::from_array(position),
            Vec2::from_array(uv),
            Vec3::from_array(normal),
        ));
    }

    let soup = TriangleSoup::new(corners)?;
    debug!(model = %model.name, triangles = soup.triangle_count(), "Converted model to soup");

    Ok(SoupModel {
        name: model.name,
        soup,
    })
}

/// Fetch the `index`-th `N`-component attribute from a flat array.
fn attribute<const N: usize>(
    data: &[f32],
    index: u32,
    what: &str,
    model: &str,
) -> Result<[f32; N]> {
    let start = index as usize * N;
    data.get(start..start + N)
        .and_then(|s| <[f32; N]>::try_from(s).ok())
        .ok_or_else(|| {
            IndexerError::Input(format!(
                "Model '{model}' references {what} {} which is out of range",
                index as usize + 1
            ))
        })
}
