//! Summary command implementation.

use crate::cli::SummaryArgs;
use crate::error::Result;
use crate::input::Snapshot;
use crate::output::Formatter;
use rapport_domain::traits::GraphSource;

/// Execute the summary command.
pub fn execute_summary(args: SummaryArgs, formatter: &Formatter) -> Result<()> {
    let snapshot = Snapshot::load(&args.file)?;
    let summary = snapshot.load_input()?.build().summary();

    println!("{}", formatter.format_summary(&summary)?);
    Ok(())
}
