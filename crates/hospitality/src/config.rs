use crate::prelude::*;
use hospitality_core::config::SiteConfig;
use std::path::Path;

/// Load the site configuration, or the defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<SiteConfig> {
    let Some(path) = path else {
        log::debug!("no configuration file given, using defaults");
        return Ok(SiteConfig::default());
    };

    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("Failed to read configuration file {}", path.display()))?;

    SiteConfig::from_toml_str(&source)
        .map_err(|e| Error::Config(f!("{}: {e}", path.display())).into())
}
