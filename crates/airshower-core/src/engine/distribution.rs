use super::config::DistributionConfig;
use crate::core::histogram::{Histogram2D, HistogramError};
use crate::core::models::particle::CorsikaParticle;
use crate::core::models::pdg::{PDG_ELECTRON, PDG_MUON, PDG_PHOTON};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ParticleCategory {
    Electron,
    Muon,
    Photon,
    Other,
}

impl ParticleCategory {
    /// Panel order of the 2x2 canvas: electrons, muons, photons, everything else.
    pub const ALL: [ParticleCategory; 4] = [
        ParticleCategory::Electron,
        ParticleCategory::Muon,
        ParticleCategory::Photon,
        ParticleCategory::Other,
    ];

    /// Exact PDG code match; positrons and positive muons fall into `Other`.
    pub fn classify(pdg_code: i32) -> Self {
        match pdg_code {
            PDG_ELECTRON => ParticleCategory::Electron,
            PDG_MUON => ParticleCategory::Muon,
            PDG_PHOTON => ParticleCategory::Photon,
            _ => ParticleCategory::Other,
        }
    }

    /// Like [`Self::classify`] but charge-blind for electrons and muons.
    pub fn classify_merged(pdg_code: i32) -> Self {
        Self::classify(pdg_code.saturating_abs())
    }

    pub fn name(self) -> &'static str {
        match self {
            ParticleCategory::Electron => "electrons",
            ParticleCategory::Muon => "muons",
            ParticleCategory::Photon => "photons",
            ParticleCategory::Other => "other",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ParticleCategory::Electron => "Electrons",
            ParticleCategory::Muon => "Muons",
            ParticleCategory::Photon => "Photons",
            ParticleCategory::Other => "Other",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParticleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Ground positions of the particles of one or more showers, split by species.
#[derive(Debug, Clone, Serialize)]
pub struct GroundDistribution {
    histograms: [Histogram2D; 4],
    coordinate_divisor: f64,
    merge_antiparticles: bool,
    use_weights: bool,
    particles_seen: u64,
    showers_seen: u64,
}

impl GroundDistribution {
    pub fn new(config: &DistributionConfig) -> Result<Self, HistogramError> {
        let geometry = &config.histogram;
        let make = |category: ParticleCategory| {
            Histogram2D::square(
                category.name(),
                category.title(),
                geometry.bins,
                geometry.side,
            )
        };
        Ok(Self {
            histograms: [
                make(ParticleCategory::Electron)?,
                make(ParticleCategory::Muon)?,
                make(ParticleCategory::Photon)?,
                make(ParticleCategory::Other)?,
            ],
            coordinate_divisor: geometry.coordinate_divisor,
            merge_antiparticles: config.selection.merge_antiparticles,
            use_weights: config.selection.use_weights,
            particles_seen: 0,
            showers_seen: 0,
        })
    }

    pub fn classify(&self, particle: &CorsikaParticle) -> ParticleCategory {
        if self.merge_antiparticles {
            ParticleCategory::classify_merged(particle.pdg_code)
        } else {
            ParticleCategory::classify(particle.pdg_code)
        }
    }

    /// Counts `particle` in exactly one of the four histograms.
    pub fn accumulate(&mut self, particle: &CorsikaParticle) -> ParticleCategory {
        let category = self.classify(particle);
        let x = particle.x() / self.coordinate_divisor;
        let y = particle.y() / self.coordinate_divisor;
        let weight = if self.use_weights { particle.weight } else { 1.0 };
        self.histograms[category.slot()].fill_weighted(x, y, weight);
        self.particles_seen += 1;
        category
    }

    pub fn finish_shower(&mut self) {
        self.showers_seen += 1;
    }

    pub fn histogram(&self, category: ParticleCategory) -> &Histogram2D {
        &self.histograms[category.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleCategory, &Histogram2D)> {
        ParticleCategory::ALL
            .into_iter()
            .map(move |category| (category, self.histogram(category)))
    }

    pub fn particles_seen(&self) -> u64 {
        self.particles_seen
    }

    pub fn showers_seen(&self) -> u64 {
        self.showers_seen
    }

    pub fn count(&self, category: ParticleCategory) -> u64 {
        self.histogram(category).entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::block::RawParticle;
    use crate::engine::config::DistributionConfigBuilder;

    fn config(merge: bool) -> DistributionConfig {
        DistributionConfigBuilder::new()
            .side(2000.0)
            .bins(100)
            .merge_antiparticles(merge)
            .build()
            .unwrap()
    }

    fn particle(corsika_id: u32, x: f32, y: f32) -> CorsikaParticle {
        CorsikaParticle::from_raw(&RawParticle {
            description: (corsika_id * 1000 + 1) as f32,
            x,
            y,
            weight: 4.0,
            ..Default::default()
        })
    }

    #[test]
    fn classify_matches_exact_codes() {
        assert_eq!(ParticleCategory::classify(11), ParticleCategory::Electron);
        assert_eq!(ParticleCategory::classify(13), ParticleCategory::Muon);
        assert_eq!(ParticleCategory::classify(22), ParticleCategory::Photon);
        assert_eq!(ParticleCategory::classify(-11), ParticleCategory::Other);
        assert_eq!(ParticleCategory::classify(-13), ParticleCategory::Other);
        assert_eq!(ParticleCategory::classify(2212), ParticleCategory::Other);
        assert_eq!(ParticleCategory::classify(0), ParticleCategory::Other);
    }

    #[test]
    fn classify_merged_ignores_charge() {
        assert_eq!(ParticleCategory::classify_merged(-11), ParticleCategory::Electron);
        assert_eq!(ParticleCategory::classify_merged(-13), ParticleCategory::Muon);
        assert_eq!(ParticleCategory::classify_merged(-22), ParticleCategory::Photon);
        assert_eq!(ParticleCategory::classify_merged(i32::MIN), ParticleCategory::Other);
    }

    #[test]
    fn accumulate_scales_coordinates_by_divisor() {
        let mut dist = GroundDistribution::new(&config(false)).unwrap();
        let category = dist.accumulate(&particle(3, 5050.0, -5050.0));
        assert_eq!(category, ParticleCategory::Electron);

        let hist = dist.histogram(ParticleCategory::Electron);
        // 5050 cm / 100 = 50.5, which lands in bin 52 of [-1000, 1000) with width 20.
        assert_eq!(hist.bin_content(52, 47), Some(1.0));
    }

    #[test]
    fn every_particle_lands_in_exactly_one_histogram() {
        let mut dist = GroundDistribution::new(&config(false)).unwrap();
        for id in [1, 2, 3, 5, 6, 14, 402, 8, 3, 1] {
            dist.accumulate(&particle(id, 0.0, 0.0));
        }
        let total: u64 = ParticleCategory::ALL.iter().map(|&c| dist.count(c)).sum();
        assert_eq!(total, dist.particles_seen());
        assert_eq!(dist.count(ParticleCategory::Photon), 2);
        assert_eq!(dist.count(ParticleCategory::Electron), 2);
        assert_eq!(dist.count(ParticleCategory::Muon), 1);
        assert_eq!(dist.count(ParticleCategory::Other), 5);
    }

    #[test]
    fn merged_mode_moves_antiparticles() {
        let mut dist = GroundDistribution::new(&config(true)).unwrap();
        dist.accumulate(&particle(2, 0.0, 0.0));
        dist.accumulate(&particle(5, 0.0, 0.0));
        assert_eq!(dist.count(ParticleCategory::Electron), 1);
        assert_eq!(dist.count(ParticleCategory::Muon), 1);
        assert_eq!(dist.count(ParticleCategory::Other), 0);
    }

    #[test]
    fn weights_are_used_only_when_requested() {
        let mut unweighted = GroundDistribution::new(&config(false)).unwrap();
        unweighted.accumulate(&particle(1, 0.0, 0.0));
        assert_eq!(unweighted.histogram(ParticleCategory::Photon).integral(), 1.0);

        let weighted_config = DistributionConfigBuilder::new()
            .side(2000.0)
            .bins(100)
            .use_weights(true)
            .build()
            .unwrap();
        let mut weighted = GroundDistribution::new(&weighted_config).unwrap();
        weighted.accumulate(&particle(1, 0.0, 0.0));
        assert_eq!(weighted.histogram(ParticleCategory::Photon).integral(), 4.0);
    }

    #[test]
    fn iter_follows_panel_order() {
        let dist = GroundDistribution::new(&config(false)).unwrap();
        let names: Vec<_> = dist.iter().map(|(_, h)| h.name.as_str()).collect();
        assert_eq!(names, vec!["electrons", "muons", "photons", "other"]);
        assert_eq!(dist.histogram(ParticleCategory::Other).title, "Other");
    }

    #[test]
    fn finish_shower_counts_showers() {
        let mut dist = GroundDistribution::new(&config(false)).unwrap();
        dist.finish_shower();
        dist.finish_shower();
        assert_eq!(dist.showers_seen(), 2);
    }
}
