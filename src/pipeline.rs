use std::path::Path;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{IndexerConfig, IndexingConfig};
use crate::error::{IndexerError, Result};
use crate::indexing::{Policy, TbnIndexer, VertexIndexer, compute_tangent_basis};
use crate::ingestion::{self, IngestionResult, SoupModel};
use crate::scene::SceneContext;
use crate::types::{IndexWidth, IndexedMesh, TbnVertex, TextureVariants};

/// Indexed output for one model, with or without tangent space.
#[derive(Debug, Clone)]
pub enum ModelMesh {
    Plain(IndexedMesh),
    Tangent(IndexedMesh<TbnVertex>),
}

impl ModelMesh {
    pub fn vertex_count(&self) -> usize {
        match self {
            ModelMesh::Plain(m) => m.vertex_count(),
            ModelMesh::Tangent(m) => m.vertex_count(),
        }
    }

    pub fn indices(&self) -> &[u32] {
        match self {
            ModelMesh::Plain(m) => &m.indices,
            ModelMesh::Tangent(m) => &m.indices,
        }
    }

    pub fn bounds(&self) -> Option<(glam::Vec3, glam::Vec3)> {
        match self {
            ModelMesh::Plain(m) => m.bounds(),
            ModelMesh::Tangent(m) => m.bounds(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexedModel {
    pub name: String,
    pub mesh: ModelMesh,
}

/// Everything the renderer host needs, plus run statistics.
#[derive(Debug)]
pub struct ProcessingResult {
    pub models: Vec<IndexedModel>,
    pub diffuse: Option<TextureVariants>,
    pub sphere_map: Option<TextureVariants>,
    pub scene: SceneContext,
    pub report: Report,
    pub duration: Duration,
}

/// Machine-readable run summary, written by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: String,
    /// Policy actually used for vertex identity.
    pub policy: Policy,
    pub tolerance: f32,
    pub index_width: IndexWidth,
    pub tangents: bool,
    pub models: Vec<ModelReport>,
    pub textures: Vec<TextureReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub name: String,
    pub corners: usize,
    pub unique_vertices: usize,
    pub triangles: usize,
    /// `unique_vertices / corners`, 0 for empty models.
    pub vertex_ratio: f64,
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextureReport {
    pub role: String,
    pub width: u32,
    pub height: u32,
}

/// Pipeline orchestrator: ingest, index, report.
pub struct Pipeline;

impl Pipeline {
    pub fn run(config: &IndexerConfig) -> Result<ProcessingResult> {
        let start = Instant::now();

        info!(input = %config.input.display(), "Starting pipeline");

        let policy = config.indexing.effective_policy();
        if policy != config.indexing.policy {
            warn!(
                requested = %config.indexing.policy,
                used = %policy,
                "Tangent indexing always uses near matching"
            );
        }

        info!("Stage 1/3: Ingestion");
        let ingestion_result = ingestion::ingest(config)?;

        if config.dry_run {
            info!("--dry-run: skipping indexing");
            print_dry_run_summary(&ingestion_result);
            let report = build_report(config, &ingestion_result, &[]);
            return Ok(ProcessingResult {
                models: Vec::new(),
                diffuse: ingestion_result.diffuse,
                sphere_map: ingestion_result.sphere_map,
                scene: SceneContext::new(&config.scene),
                report,
                duration: start.elapsed(),
            });
        }

        info!("Stage 2/3: Indexing");
        let models = index_models(&ingestion_result.models, &config.indexing)?;

        info!("Stage 3/3: Report");
        let report = build_report(config, &ingestion_result, &models);
        print_index_summary(&report);
        if let Some(path) = &config.report {
            write_report(&report, path)?;
        }

        let duration = start.elapsed();
        info!(models = models.len(), elapsed = ?duration, "Pipeline complete");

        Ok(ProcessingResult {
            models,
            diffuse: ingestion_result.diffuse,
            sphere_map: ingestion_result.sphere_map,
            scene: SceneContext::new(&config.scene),
            report,
            duration,
        })
    }
}

/// Index every model concurrently; results keep model order.
pub fn index_models(models: &[SoupModel], config: &IndexingConfig) -> Result<Vec<IndexedModel>> {
    models
        .par_iter()
        .map(|model| {
            let mesh = index_model(model, config)?;
            info!(
                model = %model.name,
                corners = model.soup.len(),
                vertices = mesh.vertex_count(),
                "Indexed model"
            );
            Ok(IndexedModel {
                name: model.name.clone(),
                mesh,
            })
        })
        .collect()
}

fn index_model(model: &SoupModel, config: &IndexingConfig) -> Result<ModelMesh> {
    if config.tangents {
        let tbn_soup = compute_tangent_basis(&model.soup)?;
        let mesh = TbnIndexer::from_config(config).index(&tbn_soup)?;
        Ok(ModelMesh::Tangent(mesh))
    } else {
        let mesh = VertexIndexer::from_config(config).index(&model.soup)?;
        Ok(ModelMesh::Plain(mesh))
    }
}

fn build_report(
    config: &IndexerConfig,
    ingestion: &IngestionResult,
    models: &[IndexedModel],
) -> Report {
    let model_reports = ingestion
        .models
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let indexed = models.get(i);
            let corners = source.soup.len();
            let unique_vertices = indexed.map(|m| m.mesh.vertex_count()).unwrap_or(0);
            let bounds = indexed.and_then(|m| m.mesh.bounds());
            ModelReport {
                name: source.name.clone(),
                corners,
                unique_vertices,
                triangles: source.soup.triangle_count(),
                vertex_ratio: if corners == 0 {
                    0.0
                } else {
                    unique_vertices as f64 / corners as f64
                },
                bounds_min: bounds.map(|(min, _)| min.to_array()),
                bounds_max: bounds.map(|(_, max)| max.to_array()),
            }
        })
        .collect();

    let textures = [
        ("diffuse", &ingestion.diffuse),
        ("sphere_map", &ingestion.sphere_map),
    ]
    .into_iter()
    .filter_map(|(role, tex)| {
        tex.as_ref().map(|t| TextureReport {
            role: role.to_string(),
            width: t.width(),
            height: t.height(),
        })
    })
    .collect();

    Report {
        input: config.input.display().to_string(),
        policy: config.indexing.effective_policy(),
        tolerance: config.indexing.tolerance,
        index_width: config.indexing.index_width,
        tangents: config.indexing.tangents,
        models: model_reports,
        textures,
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| IndexerError::Output(format!("Failed to serialize report: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        IndexerError::Output(format!("Failed to write report {}: {e}", path.display()))
    })?;
    info!(path = %path.display(), "Wrote report");
    Ok(())
}

fn print_dry_run_summary(ingestion: &IngestionResult) {
    let stats = &ingestion.stats;
    println!("=== Dry Run Summary ===");
    println!("  Models:    {}", stats.total_models);
    println!("  Corners:   {}", stats.total_corners);
    println!("  Triangles: {}", stats.total_triangles);
    println!("  Textures:  {}", stats.texture_count);
}

fn print_index_summary(report: &Report) {
    println!("=== Indexing ===");
    println!(
        "  Policy: {}  Width: {}  Tangents: {}",
        report.policy,
        report.index_width,
        if report.tangents { "yes" } else { "no" }
    );
    for model in &report.models {
        println!(
            "  {:<16} {:>8} corners -> {:>8} vertices ({:.1}%)",
            model.name,
            model.corners,
            model.unique_vertices,
            model.vertex_ratio * 100.0
        );
    }
    for tex in &report.textures {
        println!("  Texture {}: {}x{}", tex.role, tex.width, tex.height);
    }
}
