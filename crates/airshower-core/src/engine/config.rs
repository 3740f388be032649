use crate::core::io::shower_file::ShowerFileOptions;
use thiserror::Error;

/// Largest accepted bin count per axis.
pub const MAX_BINS_PER_AXIS: usize = 2048;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramConfig {
    /// Full width of the square histogram window, in the scaled coordinates.
    pub side: f64,
    pub bins: usize,
    /// Particle positions (cm) are divided by this before filling.
    pub coordinate_divisor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Stop after this many particles have been accumulated over the whole file.
    pub max_particles: Option<u64>,
    /// Count positrons with electrons and anti-muons with muons.
    pub merge_antiparticles: bool,
    pub observation_level: u32,
    pub keep_muon_production: bool,
    /// Fill with the thinning weight instead of unit weight.
    pub use_weights: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionConfig {
    pub histogram: HistogramConfig,
    pub selection: SelectionConfig,
}

impl DistributionConfig {
    pub fn shower_file_options(&self) -> ShowerFileOptions {
        ShowerFileOptions::default()
            .with_observation_level(self.selection.observation_level)
            .with_muon_production(self.selection.keep_muon_production)
    }
}

#[derive(Default)]
pub struct DistributionConfigBuilder {
    side: Option<f64>,
    bins: Option<usize>,
    coordinate_divisor: Option<f64>,
    max_particles: Option<u64>,
    merge_antiparticles: bool,
    observation_level: Option<u32>,
    keep_muon_production: bool,
    use_weights: bool,
}

impl DistributionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(mut self, side: f64) -> Self {
        self.side = Some(side);
        self
    }
    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }
    /// Defaults to the bin count when not set.
    pub fn coordinate_divisor(mut self, divisor: f64) -> Self {
        self.coordinate_divisor = Some(divisor);
        self
    }
    pub fn max_particles(mut self, max: Option<u64>) -> Self {
        self.max_particles = max;
        self
    }
    pub fn merge_antiparticles(mut self, merge: bool) -> Self {
        self.merge_antiparticles = merge;
        self
    }
    pub fn observation_level(mut self, level: u32) -> Self {
        self.observation_level = Some(level);
        self
    }
    pub fn keep_muon_production(mut self, keep: bool) -> Self {
        self.keep_muon_production = keep;
        self
    }
    pub fn use_weights(mut self, use_weights: bool) -> Self {
        self.use_weights = use_weights;
        self
    }

    pub fn build(self) -> Result<DistributionConfig, ConfigError> {
        let side = self.side.ok_or(ConfigError::MissingParameter("side"))?;
        if !(side > 0.0) || !side.is_finite() {
            return Err(ConfigError::InvalidValue {
                name: "side",
                reason: format!("must be a positive finite number, got {}", side),
            });
        }

        let bins = self.bins.ok_or(ConfigError::MissingParameter("bins"))?;
        if bins == 0 || bins > MAX_BINS_PER_AXIS {
            return Err(ConfigError::InvalidValue {
                name: "bins",
                reason: format!("must be between 1 and {}, got {}", MAX_BINS_PER_AXIS, bins),
            });
        }

        let coordinate_divisor = self.coordinate_divisor.unwrap_or(bins as f64);
        if !(coordinate_divisor > 0.0) || !coordinate_divisor.is_finite() {
            return Err(ConfigError::InvalidValue {
                name: "coordinate_divisor",
                reason: format!("must be a positive finite number, got {}", coordinate_divisor),
            });
        }

        let observation_level = self.observation_level.unwrap_or(1);
        if observation_level == 0 {
            return Err(ConfigError::InvalidValue {
                name: "observation_level",
                reason: "levels are numbered from 1".to_string(),
            });
        }

        Ok(DistributionConfig {
            histogram: HistogramConfig {
                side,
                bins,
                coordinate_divisor,
            },
            selection: SelectionConfig {
                max_particles: self.max_particles,
                merge_antiparticles: self.merge_antiparticles,
                observation_level,
                keep_muon_production: self.keep_muon_production,
                use_weights: self.use_weights,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> DistributionConfigBuilder {
        DistributionConfigBuilder::new().side(2000.0).bins(100)
    }

    #[test]
    fn build_applies_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.histogram.side, 2000.0);
        assert_eq!(config.histogram.bins, 100);
        assert_eq!(config.histogram.coordinate_divisor, 100.0);
        assert_eq!(config.selection.max_particles, None);
        assert_eq!(config.selection.observation_level, 1);
        assert!(!config.selection.merge_antiparticles);
        assert!(!config.selection.keep_muon_production);
        assert!(!config.selection.use_weights);
    }

    #[test]
    fn build_keeps_explicit_values() {
        let config = minimal()
            .coordinate_divisor(1.0)
            .max_particles(Some(500))
            .merge_antiparticles(true)
            .observation_level(2)
            .keep_muon_production(true)
            .use_weights(true)
            .build()
            .unwrap();
        assert_eq!(config.histogram.coordinate_divisor, 1.0);
        assert_eq!(config.selection.max_particles, Some(500));
        assert!(config.selection.merge_antiparticles);
        assert_eq!(config.selection.observation_level, 2);
        assert!(config.selection.keep_muon_production);
        assert!(config.selection.use_weights);
    }

    #[test]
    fn build_requires_geometry() {
        assert_eq!(
            DistributionConfigBuilder::new().bins(10).build(),
            Err(ConfigError::MissingParameter("side"))
        );
        assert_eq!(
            DistributionConfigBuilder::new().side(10.0).build(),
            Err(ConfigError::MissingParameter("bins"))
        );
    }

    #[test]
    fn build_rejects_degenerate_values() {
        assert!(matches!(
            minimal().bins(0).build(),
            Err(ConfigError::InvalidValue { name: "bins", .. })
        ));
        assert!(matches!(
            minimal().side(-1.0).build(),
            Err(ConfigError::InvalidValue { name: "side", .. })
        ));
        assert!(matches!(
            minimal().side(f64::NAN).build(),
            Err(ConfigError::InvalidValue { name: "side", .. })
        ));
        assert!(matches!(
            minimal().coordinate_divisor(0.0).build(),
            Err(ConfigError::InvalidValue {
                name: "coordinate_divisor",
                ..
            })
        ));
        assert!(matches!(
            minimal().observation_level(0).build(),
            Err(ConfigError::InvalidValue {
                name: "observation_level",
                ..
            })
        ));
    }

    #[test]
    fn build_rejects_unallocatable_bin_counts() {
        for bins in [MAX_BINS_PER_AXIS + 1, 1_000_000, 1 << 32, usize::MAX] {
            assert!(
                matches!(
                    minimal().bins(bins).build(),
                    Err(ConfigError::InvalidValue { name: "bins", .. })
                ),
                "{} bins accepted",
                bins
            );
        }
        let largest = minimal().bins(MAX_BINS_PER_AXIS).build().unwrap();
        assert_eq!(largest.histogram.bins, MAX_BINS_PER_AXIS);
    }

    #[test]
    fn shower_file_options_follow_selection() {
        let config = minimal()
            .observation_level(3)
            .keep_muon_production(true)
            .build()
            .unwrap();
        let options = config.shower_file_options();
        assert_eq!(options.particle_filter.observation_level, 3);
        assert!(options.particle_filter.keep_muon_production);
    }
}
