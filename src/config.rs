use std::path::PathBuf;

use clap::Parser;

use crate::indexing::{DEFAULT_TOLERANCE, Policy};
use crate::types::IndexWidth;

/// Vertex deduplication parameters.
#[derive(Debug, Clone)]
pub struct IndexingConfig {
    pub policy: Policy,
    /// Per-scalar tolerance for near matching.
    pub tolerance: f32,
    pub index_width: IndexWidth,
    /// Generate tangent space and use the accumulating indexer.
    pub tangents: bool,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Exact,
            tolerance: DEFAULT_TOLERANCE,
            index_width: IndexWidth::U16,
            tangents: false,
        }
    }
}

impl IndexingConfig {
    /// The policy indexing will actually apply; tangent mode is always near.
    pub fn effective_policy(&self) -> Policy {
        if self.tangents {
            Policy::Near
        } else {
            self.policy
        }
    }
}

/// Texture inputs for the demo's two samplers.
#[derive(Debug, Clone, Default)]
pub struct TextureConfig {
    pub diffuse: Option<PathBuf>,
    pub sphere_map: Option<PathBuf>,
}

/// Viewport used to derive the projection aspect ratio.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Fully resolved configuration (constructed from CLI args).
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub input: PathBuf,
    pub indexing: IndexingConfig,
    pub texture: TextureConfig,
    pub scene: SceneConfig,
    /// Negate the V texture coordinate while loading.
    pub flip_v: bool,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
    /// Emit log lines as JSON objects.
    pub log_json: bool,
    pub threads: Option<usize>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            indexing: IndexingConfig::default(),
            texture: TextureConfig::default(),
            scene: SceneConfig::default(),
            flip_v: true,
            report: None,
            dry_run: false,
            verbose: false,
            log_json: false,
            threads: None,
        }
    }
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "vbo-indexer",
    about = "Triangle soup to indexed vertex buffer converter",
    version
)]
pub struct CliArgs {
    /// Input OBJ model (triangles with v/vt/vn corners)
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Vertex equality policy
    #[arg(long, value_enum, default_value = "exact")]
    pub policy: Policy,

    /// Per-component tolerance for the near policy
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f32,

    /// Index buffer width
    #[arg(long, value_enum, default_value = "u16")]
    pub index_width: IndexWidth,

    /// Compute tangent space and accumulate it per vertex
    #[arg(long)]
    pub tangents: bool,

    /// Diffuse texture (24-bit BMP)
    #[arg(long)]
    pub diffuse: Option<PathBuf>,

    /// Sphere map texture (24-bit BMP)
    #[arg(long)]
    pub sphere_map: Option<PathBuf>,

    /// Keep V texture coordinates as written in the file
    #[arg(long)]
    pub keep_v: bool,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Write a JSON report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Load the model and report soup stats only
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log as JSON lines instead of human-readable text
    #[arg(long)]
    pub log_json: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for IndexerConfig {
    fn from(args: CliArgs) -> Self {
        IndexerConfig {
            input: args.input,
            indexing: IndexingConfig {
                policy: args.policy,
                tolerance: args.tolerance,
                index_width: args.index_width,
                tangents: args.tangents,
            },
            texture: TextureConfig {
                diffuse: args.diffuse,
                sphere_map: args.sphere_map,
            },
            scene: SceneConfig {
                width: args.width,
                height: args.height,
            },
            flip_v: !args.keep_v,
            report: args.report,
            dry_run: args.dry_run,
            verbose: args.verbose,
            log_json: args.log_json,
            threads: args.threads,
        }
    }
}
