//! Build command implementation.

use crate::cli::BuildArgs;
use crate::error::Result;
use crate::input::Snapshot;
use crate::output::Formatter;
use rapport_domain::traits::GraphSource;

/// Execute the build command.
pub fn execute_build(args: BuildArgs, formatter: &Formatter) -> Result<()> {
    let snapshot = Snapshot::load(&args.file)?;
    let graph = snapshot.load_input()?.build();
    tracing::info!(
        "Built {} nodes and {} edges from {}",
        graph.nodes.len(),
        graph.edges.len(),
        args.file.display()
    );

    println!("{}", formatter.format_graph(&graph, &snapshot.labels())?);
    Ok(())
}
