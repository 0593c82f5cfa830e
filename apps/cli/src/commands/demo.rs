//! Demo command implementation.

use colored::Colorize;
use netsec_core::{ambient, ErrorDetails, Reporter};
use tracing::{debug, info};

const DIVISION_FAILED: &str = "division by zero";

/// Execute the demo command.
///
/// Evaluates `1 / divisor` inside a guarded region. A failure is wrapped into
/// a contextual error pointing at the division and returned.
pub fn execute(reporter: &Reporter, divisor: i32, json: bool) -> anyhow::Result<()> {
    info!("Enter the try block");

    match ambient::guard_panic(|| 1 / divisor) {
        Ok(quotient) => {
            println!("{} 1 / {} = {}", "✓".green().bold(), divisor, quotient);
            Ok(())
        }
        Err(failure) => {
            debug!(panic = %failure.value, "Division failed");
            let err = reporter.wrap_current(DIVISION_FAILED, ErrorDetails::process());
            if json {
                println!("{}", serde_json::to_string_pretty(&err.report())?);
            }
            Err(err.into())
        }
    }
}
