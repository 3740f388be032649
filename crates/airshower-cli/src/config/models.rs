use airshower::engine::config::DistributionConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub csv_dir: Option<PathBuf>,
    pub distribution: DistributionConfig,
}
