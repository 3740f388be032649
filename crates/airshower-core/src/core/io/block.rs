use super::format::{
    PARTICLES_PER_SUB_BLOCK, TAG_EVENT_HEADER, TAG_EVENT_TRAILER, TAG_LONGITUDINAL,
    TAG_RUN_HEADER, TAG_RUN_TRAILER, Thinning,
};
use crate::core::models::shower::{EventHeader, EventTrailer, RunHeader, RunTrailer};

const MAX_OBSERVATION_LEVELS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    RunHeader,
    EventHeader,
    Longitudinal,
    EventTrailer,
    RunTrailer,
    Particles,
}

impl BlockKind {
    /// Classifies a sub-block by the 4-character tag stored in its first word.
    pub fn of(words: &[f32]) -> Self {
        let Some(first) = words.first() else {
            return BlockKind::Particles;
        };
        match bytemuck::bytes_of(first) {
            tag if tag == TAG_RUN_HEADER => BlockKind::RunHeader,
            tag if tag == TAG_EVENT_HEADER => BlockKind::EventHeader,
            tag if tag == TAG_LONGITUDINAL => BlockKind::Longitudinal,
            tag if tag == TAG_EVENT_TRAILER => BlockKind::EventTrailer,
            tag if tag == TAG_RUN_TRAILER => BlockKind::RunTrailer,
            _ => BlockKind::Particles,
        }
    }
}

/// Reads CORSIKA word `n` using the 1-based numbering of the CORSIKA manual.
#[inline]
fn word(words: &[f32], n: usize) -> f32 {
    words.get(n - 1).copied().unwrap_or(0.0)
}

fn observation_levels(words: &[f32], count_word: usize) -> Vec<f64> {
    let count = (word(words, count_word).max(0.0) as usize).min(MAX_OBSERVATION_LEVELS);
    (0..count)
        .map(|i| word(words, count_word + 1 + i) as f64)
        .collect()
}

impl RunHeader {
    pub fn from_words(words: &[f32]) -> Self {
        Self {
            run_number: word(words, 2) as u32,
            date: word(words, 3) as u32,
            version: word(words, 4) as f64,
            observation_levels: observation_levels(words, 5),
            energy_slope: word(words, 16) as f64,
            energy_min_gev: word(words, 17) as f64,
            energy_max_gev: word(words, 18) as f64,
        }
    }
}

impl RunTrailer {
    pub fn from_words(words: &[f32]) -> Self {
        Self {
            run_number: word(words, 2) as u32,
            events_processed: word(words, 3) as u64,
        }
    }
}

impl EventHeader {
    pub fn from_words(words: &[f32]) -> Self {
        Self {
            event_number: word(words, 2) as u32,
            primary_id: word(words, 3) as u32,
            energy_gev: word(words, 4) as f64,
            starting_altitude: word(words, 5) as f64,
            first_interaction_height: word(words, 7) as f64,
            zenith: word(words, 11) as f64,
            azimuth: word(words, 12) as f64,
            run_number: word(words, 44) as u32,
            observation_levels: observation_levels(words, 47),
        }
    }
}

impl EventTrailer {
    pub fn from_words(words: &[f32]) -> Self {
        Self {
            event_number: word(words, 2) as u32,
            photons: word(words, 3) as f64,
            electrons: word(words, 4) as f64,
            hadrons: word(words, 5) as f64,
            muons: word(words, 6) as f64,
            particles_written: word(words, 7) as f64,
        }
    }
}

/// One particle record exactly as stored in a particle sub-block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawParticle {
    pub description: f32,
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub x: f32,
    pub y: f32,
    pub time_or_z: f32,
    pub weight: f32,
}

impl RawParticle {
    pub fn from_words(words: &[f32], thinning: Thinning) -> Self {
        Self {
            description: words[0],
            px: words[1],
            py: words[2],
            pz: words[3],
            x: words[4],
            y: words[5],
            time_or_z: words[6],
            weight: match thinning {
                Thinning::Thinned => words[7],
                Thinning::NotThinned => 1.0,
            },
        }
    }

    /// Empty slots at the end of the last particle sub-block are zero-filled.
    pub fn is_empty(&self) -> bool {
        self.description == 0.0
    }
}

/// Splits a particle sub-block into its 39 records.
pub fn particle_records(
    words: &[f32],
    thinning: Thinning,
) -> impl Iterator<Item = RawParticle> + '_ {
    words
        .chunks_exact(thinning.words_per_particle())
        .take(PARTICLES_PER_SUB_BLOCK)
        .map(move |chunk| RawParticle::from_words(chunk, thinning))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::fixtures::tag_word;

    fn sub_block(thinning: Thinning) -> Vec<f32> {
        vec![0.0; thinning.words_per_sub_block()]
    }

    #[test]
    fn classifies_tagged_sub_blocks() {
        let mut words = sub_block(Thinning::NotThinned);
        for (tag, kind) in [
            (b"RUNH", BlockKind::RunHeader),
            (b"EVTH", BlockKind::EventHeader),
            (b"LONG", BlockKind::Longitudinal),
            (b"EVTE", BlockKind::EventTrailer),
            (b"RUNE", BlockKind::RunTrailer),
        ] {
            words[0] = tag_word(tag);
            assert_eq!(BlockKind::of(&words), kind);
        }
    }

    #[test]
    fn untagged_sub_block_holds_particles() {
        let mut words = sub_block(Thinning::NotThinned);
        words[0] = 3001.0;
        assert_eq!(BlockKind::of(&words), BlockKind::Particles);
        assert_eq!(BlockKind::of(&[]), BlockKind::Particles);
    }

    #[test]
    fn event_header_reads_manual_word_offsets() {
        let mut words = sub_block(Thinning::NotThinned);
        words[0] = tag_word(b"EVTH");
        words[1] = 7.0;
        words[2] = 14.0;
        words[3] = 1.0e5;
        words[6] = 2.5e6;
        words[10] = 0.3;
        words[11] = 1.2;
        words[43] = 42.0;
        words[46] = 2.0;
        words[47] = 1.4e5;
        words[48] = 0.0;

        let header = EventHeader::from_words(&words);
        assert_eq!(header.event_number, 7);
        assert_eq!(header.primary_id, 14);
        assert_eq!(header.energy_gev, 1.0e5);
        assert_eq!(header.first_interaction_height, 2.5e6);
        assert!((header.zenith - 0.3).abs() < 1e-6);
        assert!((header.azimuth - 1.2).abs() < 1e-6);
        assert_eq!(header.run_number, 42);
        assert_eq!(header.observation_levels, vec![1.4e5, 0.0]);
    }

    #[test]
    fn observation_level_count_is_clamped() {
        let mut words = sub_block(Thinning::NotThinned);
        words[4] = 99.0;
        let header = RunHeader::from_words(&words);
        assert_eq!(header.observation_levels.len(), MAX_OBSERVATION_LEVELS);
    }

    #[test]
    fn event_trailer_reads_particle_counts() {
        let mut words = sub_block(Thinning::NotThinned);
        words[0] = tag_word(b"EVTE");
        words[1] = 3.0;
        words[2] = 100.0;
        words[3] = 50.0;
        words[4] = 2.0;
        words[5] = 10.0;
        words[6] = 162.0;

        let trailer = EventTrailer::from_words(&words);
        assert_eq!(trailer.event_number, 3);
        assert_eq!(trailer.photons, 100.0);
        assert_eq!(trailer.electrons, 50.0);
        assert_eq!(trailer.hadrons, 2.0);
        assert_eq!(trailer.muons, 10.0);
        assert_eq!(trailer.particles_written, 162.0);
    }

    #[test]
    fn run_trailer_reads_event_count() {
        let mut words = sub_block(Thinning::Thinned);
        words[0] = tag_word(b"RUNE");
        words[1] = 12.0;
        words[2] = 250.0;

        let trailer = RunTrailer::from_words(&words);
        assert_eq!(trailer.run_number, 12);
        assert_eq!(trailer.events_processed, 250);
    }

    #[test]
    fn particle_records_respect_thinning_layout() {
        let mut words = sub_block(Thinning::Thinned);
        words[0..8].copy_from_slice(&[1001.0, 0.1, 0.2, 0.3, 10.0, -20.0, 5.0, 3.5]);
        words[8] = 6001.0;

        let records: Vec<_> = particle_records(&words, Thinning::Thinned).collect();
        assert_eq!(records.len(), PARTICLES_PER_SUB_BLOCK);
        assert_eq!(records[0].weight, 3.5);
        assert_eq!(records[0].y, -20.0);
        assert_eq!(records[1].description, 6001.0);
        assert!(records[2].is_empty());
    }

    #[test]
    fn unthinned_records_have_unit_weight() {
        let mut words = sub_block(Thinning::NotThinned);
        words[0..7].copy_from_slice(&[5001.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0]);
        let first = particle_records(&words, Thinning::NotThinned).next().unwrap();
        assert_eq!(first.weight, 1.0);
        assert_eq!(first.time_or_z, 3.0);
    }
}
