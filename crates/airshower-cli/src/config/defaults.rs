use std::path::PathBuf;

/// File read when no input is given.
pub const DEFAULT_INPUT_FILE: &str = "DAT000002-32";

pub struct DefaultsConfig {
    pub side: f64,
    pub bins: usize,
    pub observation_level: u32,
    pub merge_antiparticles: bool,
    pub keep_muon_production: bool,
    pub use_weights: bool,
    pub output: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            side: 2000.0,
            bins: 100,
            observation_level: 1,
            merge_antiparticles: false,
            keep_muon_production: false,
            use_weights: false,
            output: PathBuf::from("ground_distribution.svg"),
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data")),
        }
    }
}
