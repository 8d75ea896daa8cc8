use std::path::PathBuf;

use clap::Parser;

use crate::app::AppConfig;
use crate::logging::LoggingConfig;

/// Command-line options shared by both demos.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about)]
pub struct Args {
    /// Directory holding the per-demo shader folders.
    #[arg(long = "shaders", value_name = "DIR", default_value = "shaders")]
    pub shader_root: PathBuf,

    /// Present without waiting for vertical sync.
    #[arg(long)]
    pub no_vsync: bool,

    /// Log filter (e.g. "debug" or "orrery=debug,wgpu_core=warn").
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Args {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            filter: self.log_level.clone(),
        }
    }

    /// Applies the options to a demo's default window configuration.
    pub fn apply(&self, config: AppConfig) -> AppConfig {
        config
            .shader_root(self.shader_root.clone())
            .vsync(!self.no_vsync)
    }
}
