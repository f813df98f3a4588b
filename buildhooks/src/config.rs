//! Configuration types for `buildhooks.toml`.
//!
//! Every table is optional; a missing file section falls back to the stock
//! tool names and failure policies.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Root configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub codegen: CodegenConfig,
    #[serde(default)]
    pub install: InstallConfig,
}

/// Programs invoked by the helpers. Bare names are looked up on `PATH`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_gdbus_codegen")]
    pub gdbus_codegen: String,
    #[serde(default = "default_glib_compile_schemas")]
    pub glib_compile_schemas: String,
    #[serde(default = "default_gio_querymodules")]
    pub gio_querymodules: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            gdbus_codegen: default_gdbus_codegen(),
            glib_compile_schemas: default_glib_compile_schemas(),
            gio_querymodules: default_gio_querymodules(),
        }
    }
}

fn default_gdbus_codegen() -> String {
    "gdbus-codegen".to_string()
}

fn default_glib_compile_schemas() -> String {
    "glib-compile-schemas".to_string()
}

fn default_gio_querymodules() -> String {
    "gio-querymodules".to_string()
}

/// What a helper does when an external tool fails or cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OnFailure {
    /// Log a warning and exit 0.
    Ignore,
    /// Log a warning, exit 0 and leave a `.codegen-failed` marker next to
    /// the expected outputs. Codegen only.
    Marker,
    /// Exit with the tool's status.
    Propagate,
}

/// `[codegen]` table.
#[derive(Debug, Deserialize)]
pub struct CodegenConfig {
    #[serde(default = "default_codegen_on_failure")]
    pub on_failure: OnFailure,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            on_failure: default_codegen_on_failure(),
        }
    }
}

fn default_codegen_on_failure() -> OnFailure {
    OnFailure::Marker
}

/// `[install]` table.
#[derive(Debug, Deserialize)]
pub struct InstallConfig {
    #[serde(default = "default_install_on_failure")]
    pub on_failure: OnFailure,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            on_failure: default_install_on_failure(),
        }
    }
}

fn default_install_on_failure() -> OnFailure {
    OnFailure::Ignore
}

impl Config {
    /// Reject an `[install]` policy the post-install hook cannot honour.
    ///
    /// The file is shared by both helpers, so only the hook checks this;
    /// call it after applying command-line overrides.
    pub fn validate_install(&self) -> Result<()> {
        if self.install.on_failure == OnFailure::Marker {
            bail!(
                "`marker` failure policy only applies to codegen; \
                 use `ignore` or `propagate` for install"
            );
        }
        Ok(())
    }
}

/// Load and parse a `buildhooks.toml` configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load `path` if given, otherwise return the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Config::default()),
    }
}
