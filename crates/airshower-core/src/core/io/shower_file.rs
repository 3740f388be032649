use super::block::BlockKind;
use super::compression::{Compression, FileSource};
use super::error::{CorsikaIoError, Result};
use super::format::FormatSpec;
use super::particles::{ParticleFilter, ParticleIterator};
use super::raw_stream::{FileIndex, RawStream};
use crate::core::models::shower::{EventHeader, EventTrailer, RunHeader, RunTrailer, Shower};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

/// Options applied while reading the particles of a shower file.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShowerFileOptions {
    pub particle_filter: ParticleFilter,
}

impl ShowerFileOptions {
    pub fn with_observation_level(mut self, level: u32) -> Self {
        self.particle_filter.observation_level = level;
        self
    }

    pub fn with_muon_production(mut self, keep: bool) -> Self {
        self.particle_filter.keep_muon_production = keep;
        self
    }

    pub fn with_time_offset(mut self, offset: f64) -> Self {
        self.particle_filter.time_offset = offset;
        self
    }
}

/// A CORSIKA ground particle file opened for reading.
///
/// Opening a file detects its format, reads the run header and indexes every event, so
/// [`Self::n_events`] and [`Self::event`] are available immediately. Files on disk may be
/// gzip or bzip2 compressed.
pub struct ShowerFile<R = FileSource> {
    stream: RawStream<R>,
    index: FileIndex,
    run_header: RunHeader,
    options: ShowerFileOptions,
}

impl ShowerFile<FileSource> {
    /// Opens a file with the default options (observation level 1).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, ShowerFileOptions::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, options: ShowerFileOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening CORSIKA file {}", path.display());
        let source = FileSource::open(path)?;
        Self::from_reader(source, options)
    }

    pub fn compression(&self) -> Compression {
        self.stream.reader().compression()
    }
}

impl<R: Read + Seek> ShowerFile<R> {
    pub fn from_reader(reader: R, options: ShowerFileOptions) -> Result<Self> {
        let mut stream = RawStream::open(reader)?;

        let run_header = match stream.next_block()? {
            Some(words) if BlockKind::of(words) == BlockKind::RunHeader => {
                RunHeader::from_words(words)
            }
            _ => return Err(CorsikaIoError::MissingRecord("RUNH")),
        };
        let index = stream.scan()?;

        let level = options.particle_filter.observation_level;
        let available = run_header.observation_levels.len();
        if level == 0 || (available > 0 && level as usize > available) {
            warn!(
                "Requested observation level {} but the run defines {} level(s); no particles will match",
                level, available
            );
        }
        debug!(
            "Run {} (CORSIKA {}), {} event(s), format: {}",
            run_header.run_number,
            run_header.version,
            index.event_count(),
            stream.format()
        );

        Ok(Self {
            stream,
            index,
            run_header,
            options,
        })
    }

    pub fn n_events(&self) -> usize {
        self.index.event_count()
    }

    pub fn run_header(&self) -> &RunHeader {
        &self.run_header
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// The `RUNE` record, if the file was closed properly.
    pub fn run_trailer(&self) -> Option<&RunTrailer> {
        self.index.run_trailer.as_ref()
    }

    pub fn format(&self) -> FormatSpec {
        self.stream.format()
    }

    pub fn options(&self) -> &ShowerFileOptions {
        &self.options
    }

    /// Reads the header and trailer of the shower at `index`.
    pub fn event(&mut self, index: usize) -> Result<Shower> {
        let count = self.n_events();
        let (Some(&header_pos), Some(&trailer_pos)) = (
            self.index.event_headers.get(index),
            self.index.event_trailers.get(index),
        ) else {
            return Err(CorsikaIoError::EventOutOfRange { index, count });
        };

        let header = self.read_record(header_pos, BlockKind::EventHeader, "EVTH")?;
        let header = EventHeader::from_words(&header);
        let trailer = self.read_record(trailer_pos, BlockKind::EventTrailer, "EVTE")?;
        let trailer = EventTrailer::from_words(&trailer);

        Ok(Shower {
            index,
            header,
            trailer,
            first_block: header_pos + 1,
        })
    }

    /// Looks a shower up by the event number stored in its `EVTH` record.
    pub fn event_by_number(&mut self, event_number: u32) -> Result<Shower> {
        let index = self
            .index
            .event_by_number(event_number)
            .ok_or(CorsikaIoError::EventNotFound(event_number))?;
        self.event(index)
    }

    /// Header and trailer of every shower, in file order.
    pub fn events(&mut self) -> Result<Vec<Shower>> {
        (0..self.n_events()).map(|i| self.event(i)).collect()
    }

    /// Streams the particles of `shower` that pass this file's particle filter.
    pub fn particles(&mut self, shower: &Shower) -> Result<ParticleIterator<'_, R>> {
        self.stream.seek_to(shower.first_block)?;
        Ok(ParticleIterator::new(
            &mut self.stream,
            self.options.particle_filter,
        ))
    }

    fn read_record(
        &mut self,
        position: u64,
        expected: BlockKind,
        tag: &'static str,
    ) -> Result<Vec<f32>> {
        self.stream.seek_to(position)?;
        match self.stream.next_block()? {
            Some(words) if BlockKind::of(words) == expected => Ok(words.to_vec()),
            Some(_) => Err(CorsikaIoError::Inconsistent {
                position,
                message: format!("expected {} record", tag),
            }),
            None => Err(CorsikaIoError::UnexpectedEof { position }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::fixtures::{FileBuilder, OBSERVATION_HEIGHT_CM, particle};
    use crate::core::io::format::Thinning;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn two_event_file() -> Vec<u8> {
        FileBuilder::new(Thinning::NotThinned, true)
            .run_number(12)
            .event(1, &[particle(1, 1, 0.0, 0.0), particle(3, 1, 1.0, 1.0)])
            .event(2, &[particle(6, 1, 2.0, 2.0)])
            .build()
    }

    #[test]
    fn open_reads_run_header_and_counts_events() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("DAT000012");
        std::fs::write(&path, two_event_file()).unwrap();

        let file = ShowerFile::open(&path).unwrap();
        assert_eq!(file.n_events(), 2);
        assert_eq!(file.run_header().run_number, 12);
        assert_eq!(
            file.run_header().observation_levels,
            vec![OBSERVATION_HEIGHT_CM as f64]
        );
        assert!(!file.format().is_thinned());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = ShowerFile::open(dir.path().join("missing"));
        assert!(matches!(result, Err(CorsikaIoError::Io(_))));
    }

    #[test]
    fn event_reads_header_and_trailer() {
        let mut file =
            ShowerFile::from_reader(Cursor::new(two_event_file()), Default::default()).unwrap();
        let shower = file.event(1).unwrap();
        assert_eq!(shower.index, 1);
        assert_eq!(shower.event_number(), 2);
        assert_eq!(shower.header.primary_id, 14);
        assert_eq!(shower.trailer.particles_written, 1.0);
    }

    #[test]
    fn event_by_number_finds_the_shower() {
        let bytes = FileBuilder::new(Thinning::NotThinned, true)
            .event(10, &[particle(1, 1, 0.0, 0.0)])
            .event(20, &[particle(1, 1, 0.0, 0.0), particle(3, 1, 0.0, 0.0)])
            .build();
        let mut file = ShowerFile::from_reader(Cursor::new(bytes), Default::default()).unwrap();

        let shower = file.event_by_number(20).unwrap();
        assert_eq!(shower.index, 1);
        assert_eq!(file.particles(&shower).unwrap().count(), 2);
        assert!(matches!(
            file.event_by_number(15),
            Err(CorsikaIoError::EventNotFound(15))
        ));
    }

    #[test]
    fn run_trailer_is_exposed() {
        let file =
            ShowerFile::from_reader(Cursor::new(two_event_file()), Default::default()).unwrap();
        let trailer = file.run_trailer().unwrap();
        assert_eq!(trailer.run_number, 12);
        assert_eq!(trailer.events_processed, 2);
    }

    #[test]
    fn opens_gzip_and_bzip2_files() {
        use std::io::Write;

        let raw = two_event_file();
        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        gz.write_all(&raw).unwrap();
        let mut bz = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
        bz.write_all(&raw).unwrap();

        let dir = tempdir().unwrap();
        for (name, bytes, compression) in [
            ("DAT000012.gz", gz.finish().unwrap(), Compression::Gzip),
            ("DAT000012.bz2", bz.finish().unwrap(), Compression::Bzip2),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, bytes).unwrap();

            let mut file = ShowerFile::open(&path).unwrap();
            assert_eq!(file.compression(), compression);
            assert_eq!(file.n_events(), 2);
            assert_eq!(file.run_header().run_number, 12);
            let second = file.event(1).unwrap();
            assert_eq!(file.particles(&second).unwrap().count(), 1, "{}", name);
        }
    }

    #[test]
    fn plain_file_reports_no_compression() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("DAT000012");
        std::fs::write(&path, two_event_file()).unwrap();
        assert_eq!(ShowerFile::open(&path).unwrap().compression(), Compression::None);
    }

    #[test]
    fn event_out_of_range_is_rejected() {
        let mut file =
            ShowerFile::from_reader(Cursor::new(two_event_file()), Default::default()).unwrap();
        assert!(matches!(
            file.event(2),
            Err(CorsikaIoError::EventOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn particles_are_streamed_per_shower() {
        let mut file =
            ShowerFile::from_reader(Cursor::new(two_event_file()), Default::default()).unwrap();
        let showers = file.events().unwrap();
        assert_eq!(showers.len(), 2);

        let mut counts = Vec::new();
        for shower in &showers {
            let particles: Vec<_> = file
                .particles(shower)
                .unwrap()
                .collect::<Result<_>>()
                .unwrap();
            counts.push(particles.len());
        }
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn showers_can_be_revisited_in_any_order() {
        let mut file =
            ShowerFile::from_reader(Cursor::new(two_event_file()), Default::default()).unwrap();
        let second = file.event(1).unwrap();
        let first = file.event(0).unwrap();
        assert_eq!(file.particles(&second).unwrap().count(), 1);
        assert_eq!(file.particles(&first).unwrap().count(), 2);
    }

    #[test]
    fn options_select_observation_level() {
        let bytes = FileBuilder::new(Thinning::NotThinned, true)
            .event(1, &[particle(1, 1, 0.0, 0.0), particle(1, 2, 0.0, 0.0)])
            .build();
        let options = ShowerFileOptions::default().with_observation_level(2);
        let mut file = ShowerFile::from_reader(Cursor::new(bytes), options).unwrap();
        let shower = file.event(0).unwrap();
        let levels: Vec<_> = file
            .particles(&shower)
            .unwrap()
            .map(|p| p.unwrap().observation_level)
            .collect();
        assert_eq!(levels, vec![2]);
    }

    #[test]
    fn file_without_events_is_valid() {
        let bytes = FileBuilder::new(Thinning::Thinned, false).build();
        let mut file = ShowerFile::from_reader(Cursor::new(bytes), Default::default()).unwrap();
        assert_eq!(file.n_events(), 0);
        assert!(file.events().unwrap().is_empty());
    }
}
