use fepath::engine::config as core_config;
use std::path::PathBuf;

pub struct IntegrateAppConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub core_config: core_config::IntegrationConfig,
}

pub struct InterpolateAppConfig {
    pub initial_path: PathBuf,
    pub final_path: PathBuf,
    pub output_dir: PathBuf,
    pub core_config: core_config::InterpolationConfig,
}
