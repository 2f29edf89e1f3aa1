//! Server configuration
//!
//! Sources, lowest precedence first: built-in defaults, optional
//! `storefront.toml` in the working directory, process environment.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: i64 = 3001;
const CONFIG_FILE: &str = "storefront";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// ERP origin (`ODOO_URL`)
    pub odoo_url: String,
    /// ERP database name (`ODOO_DATABASE`)
    pub odoo_database: String,
    /// ERP API token (`ODOO_API_KEY`)
    pub odoo_api_key: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::build(Environment::default(), Some(CONFIG_FILE))
    }

    fn build(env: Environment, file: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT)?
            .set_default("odoo_database", "")?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        let settings: Settings = builder
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration (ODOO_URL and ODOO_API_KEY are required)")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.odoo_url.trim().is_empty() {
            bail!("ODOO_URL must not be empty");
        }
        if !self.odoo_url.starts_with("http://") && !self.odoo_url.starts_with("https://") {
            bail!("ODOO_URL must be an http(s) URL, got {}", self.odoo_url);
        }
        if self.odoo_api_key.trim().is_empty() {
            bail!("ODOO_API_KEY must not be empty");
        }
        Ok(())
    }
}
