//! Config command implementation.

use netsec_core::NetsecConfig;

/// Execute the config command.
pub fn execute(config: &NetsecConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
