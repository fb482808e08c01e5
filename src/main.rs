use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use vbo_indexer::config::{CliArgs, IndexerConfig};
use vbo_indexer::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing
    let filter = if args.verbose {
        EnvFilter::new("vbo_indexer=debug")
    } else {
        EnvFilter::new("vbo_indexer=info")
    };
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config: IndexerConfig = args.into();

    // Configure rayon thread pool
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    match Pipeline::run(&config) {
        Ok(result) => {
            let vertices: usize = result.models.iter().map(|m| m.mesh.vertex_count()).sum();
            println!(
                "Done: {} models, {} vertices in {:.2}s",
                result.models.len(),
                vertices,
                result.duration.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            error!(%e, "Pipeline failed");
            Err(anyhow::anyhow!(e)).context("vbo-indexer pipeline failed")
        }
    }
}
