//! Layout command implementation.

use crate::cli::LayoutArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::input::Snapshot;
use crate::output::Formatter;
use rapport_domain::traits::GraphSource;
use rapport_pipeline::{PipelineConfig, PipelineWorker};

/// Residual speed above which the layout is reported as unsettled.
const SETTLED_SPEED: f64 = 1.0;

/// Execute the layout command.
pub async fn execute_layout(args: LayoutArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline_config = resolve_pipeline_config(&args, config)?;
    let snapshot = Snapshot::load(&args.file)?;
    let input = snapshot.load_input()?;

    let worker = PipelineWorker::new(pipeline_config);
    let output = worker.compute(input).await?;

    println!("{}", formatter.format_graph(&output.graph, &snapshot.labels())?);

    if !formatter.is_plain() {
        let message = format!("Max residual speed: {:.4}", output.max_residual_speed);
        if output.max_residual_speed > SETTLED_SPEED {
            println!("{}", formatter.warning(&message));
        } else {
            println!("{}", formatter.info(&message));
        }
    }
    Ok(())
}

/// Configured pipeline settings with command-line overrides applied.
pub fn resolve_pipeline_config(args: &LayoutArgs, config: &Config) -> Result<PipelineConfig> {
    let mut resolved = config.pipeline.clone();

    if let Some(preset) = args.preset {
        let seed = resolved.forces.seed;
        resolved.forces = PipelineConfig::from(preset).forces;
        resolved.forces.seed = seed;
    }
    if let Some(iterations) = args.iterations {
        resolved.iterations = iterations;
    }
    if let Some(width) = args.width {
        resolved.canvas_width = width;
    }
    if let Some(height) = args.height {
        resolved.canvas_height = height;
    }
    if let Some(seed) = args.seed {
        resolved.forces.seed = seed;
    }
    if args.no_clusters {
        resolved.cluster_contexts = false;
    }

    resolved.validate().map_err(CliError::Config)?;
    tracing::debug!("Resolved layout settings: {:?}", resolved);
    Ok(resolved)
}
