//! Default-config command - print the bundled configuration

use anyhow::Result;

use crate::app_config::AppConfig;

pub fn execute() -> Result<()> {
    print!("{}", AppConfig::default_yaml());
    Ok(())
}
