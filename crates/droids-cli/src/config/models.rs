use droidspp::engine::config::AnalysisConfig;
use std::path::PathBuf;

pub struct AppConfig {
    /// Configuration file the run was built from, if any.
    pub source: Option<PathBuf>,
    pub core_config: AnalysisConfig,
}
