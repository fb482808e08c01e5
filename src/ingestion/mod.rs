pub mod bmp_loader;
pub mod obj_loader;

use std::path::Path;

use tracing::{debug, info};

use crate::config::IndexerConfig;
use crate::error::{IndexerError, Result};
use crate::types::TextureVariants;

pub use bmp_loader::{decode_bmp, load_bmp};
pub use obj_loader::{SoupModel, load_obj, parse_obj};

/// Result of the ingestion stage.
#[derive(Debug)]
pub struct IngestionResult {
    pub models: Vec<SoupModel>,
    pub diffuse: Option<TextureVariants>,
    pub sphere_map: Option<TextureVariants>,
    pub stats: IngestionStats,
}

/// Statistics about the ingested data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionStats {
    pub total_models: usize,
    pub total_corners: usize,
    pub total_triangles: usize,
    pub texture_count: usize,
}

/// Reject anything that is not an `.obj` file (case-insensitive).
pub fn check_model_path(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if ext != "obj" {
        return Err(IndexerError::Input(format!(
            "Unsupported model format: .{ext}"
        )));
    }
    Ok(())
}

/// Run the full ingestion stage: model soups plus optional textures.
pub fn ingest(config: &IndexerConfig) -> Result<IngestionResult> {
    if !config.input.exists() {
        return Err(IndexerError::Input(format!(
            "Input file not found: {}",
            config.input.display()
        )));
    }
    check_model_path(&config.input)?;

    info!(path = %config.input.display(), "Loading model");
    let models = load_obj(&config.input, config.flip_v)?;

    let diffuse = config
        .texture
        .diffuse
        .as_deref()
        .map(load_texture_variants)
        .transpose()?;
    let sphere_map = config
        .texture
        .sphere_map
        .as_deref()
        .map(load_texture_variants)
        .transpose()?;

    let stats = compute_stats(&models, [&diffuse, &sphere_map]);
    debug!(
        models = stats.total_models,
        corners = stats.total_corners,
        triangles = stats.total_triangles,
        textures = stats.texture_count,
        "Ingestion stats"
    );

    Ok(IngestionResult {
        models,
        diffuse,
        sphere_map,
        stats,
    })
}

/// Decode a BMP once and prepare its linear and sRGB uploads.
pub fn load_texture_variants(path: &Path) -> Result<TextureVariants> {
    let texture = load_bmp(path)?;
    debug!(
        path = %path.display(),
        width = texture.width,
        height = texture.height,
        "Prepared linear and sRGB texture variants"
    );
    Ok(TextureVariants::new(texture))
}

/// Compute summary statistics from the loaded soups and textures.
pub fn compute_stats(
    models: &[SoupModel],
    textures: [&Option<TextureVariants>; 2],
) -> IngestionStats {
    IngestionStats {
        total_models: models.len(),
        total_corners: models.iter().map(|m| m.soup.len()).sum(),
        total_triangles: models.iter().map(|m| m.soup.triangle_count()).sum(),
        texture_count: textures.iter().filter(|t| t.is_some()).count(),
    }
}
