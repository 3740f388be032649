use super::block::{BlockKind, RawParticle, particle_records};
use super::error::{CorsikaIoError, Result};
use super::raw_stream::RawStream;
use crate::core::models::particle::CorsikaParticle;
use crate::core::models::pdg;
use std::io::{Read, Seek};
use tracing::trace;

/// Which particle records of an event are handed out, and how they are adjusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFilter {
    /// 1-based observation level to keep.
    pub observation_level: u32,
    /// Keep the records CORSIKA writes for muons that decayed above the observation level.
    pub keep_muon_production: bool,
    /// Subtracted from every particle's time.
    pub time_offset: f64,
}

impl Default for ParticleFilter {
    fn default() -> Self {
        Self {
            observation_level: 1,
            keep_muon_production: false,
            time_offset: 0.0,
        }
    }
}

/// Streams the particles of one event, starting just after its `EVTH` sub-block and
/// stopping at its `EVTE`.
///
/// History records (negative descriptions) and muon additional-information records are not
/// yielded themselves; they are attached to the next accepted particle of any species.
pub struct ParticleIterator<'a, R> {
    stream: &'a mut RawStream<R>,
    filter: ParticleFilter,
    records: Vec<RawParticle>,
    cursor: usize,
    finished: bool,
}

impl<'a, R: Read + Seek> ParticleIterator<'a, R> {
    /// The stream must be positioned on the first sub-block after the event header.
    pub fn new(stream: &'a mut RawStream<R>, filter: ParticleFilter) -> Self {
        Self {
            stream,
            filter,
            records: Vec::new(),
            cursor: 0,
            finished: false,
        }
    }

    fn next_record(&mut self) -> Result<Option<RawParticle>> {
        loop {
            if let Some(record) = self.records.get(self.cursor) {
                self.cursor += 1;
                return Ok(Some(*record));
            }

            let position = self.stream.next_position();
            let thinning = self.stream.format().thinning;
            let Some(words) = self.stream.next_block()? else {
                return Err(CorsikaIoError::MissingRecord("EVTE"));
            };
            match BlockKind::of(words) {
                BlockKind::Particles => {
                    self.records.clear();
                    self.records.extend(particle_records(words, thinning));
                    self.cursor = 0;
                }
                BlockKind::Longitudinal => continue,
                BlockKind::EventTrailer => return Ok(None),
                other => {
                    return Err(CorsikaIoError::Inconsistent {
                        position,
                        message: format!("{:?} sub-block inside an event", other),
                    });
                }
            }
        }
    }

    fn advance(&mut self) -> Result<Option<CorsikaParticle>> {
        let mut parent: Option<CorsikaParticle> = None;
        let mut grandparent: Option<CorsikaParticle> = None;
        let mut muon_info: Option<CorsikaParticle> = None;

        while let Some(raw) = self.next_record()? {
            if raw.is_empty() {
                continue;
            }
            let mut particle = CorsikaParticle::from_raw(&raw);

            if particle.is_history_record() {
                if parent.is_none() {
                    parent = Some(particle);
                } else {
                    grandparent = Some(particle);
                }
                continue;
            }
            // A mu- record is only taken while no muon information is pending. Otherwise it
            // falls through and is rejected as undefined, clearing everything pending.
            if particle.corsika_id == pdg::CORSIKA_MU_PLUS_INFO
                || (particle.corsika_id == pdg::CORSIKA_MU_MINUS_INFO && muon_info.is_none())
            {
                muon_info = Some(particle);
                continue;
            }

            let rejected = !particle.is_defined()
                || (!self.filter.keep_muon_production && pdg::is_decayed_muon(particle.pdg_code))
                || particle.observation_level != self.filter.observation_level;
            if rejected {
                trace!(
                    "Skipping record with description {} at observation level {}",
                    particle.description, particle.observation_level
                );
                parent = None;
                grandparent = None;
                muon_info = None;
                continue;
            }

            if let (Some(p), Some(gp)) = (parent.take(), grandparent.take()) {
                particle.set_parent(p);
                particle.set_grandparent(gp);
            }
            if let Some(info) = muon_info.take() {
                particle.set_muon_info(info);
            }
            particle.time_or_z -= self.filter.time_offset;
            return Ok(Some(particle));
        }
        Ok(None)
    }
}

impl<R: Read + Seek> Iterator for ParticleIterator<'_, R> {
    type Item = Result<CorsikaParticle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.advance() {
            Ok(Some(particle)) => Some(Ok(particle)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
