use super::block::BlockKind;
use super::error::{CorsikaIoError, Result};
use super::format::{FormatSpec, SUB_BLOCKS_PER_DISK_BLOCK};
use crate::core::models::shower::{EventHeader, RunHeader, RunTrailer};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use tracing::{debug, trace, warn};

/// Sub-block positions of the records that delimit each event in a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    pub run_number: u32,
    pub event_headers: Vec<u64>,
    pub event_trailers: Vec<u64>,
    /// First `LONG` sub-block of each event that has one.
    pub long_blocks: Vec<u64>,
    /// Event number from `EVTH` to the event's position in the file.
    pub event_numbers: BTreeMap<u32, usize>,
    /// `None` when the file ends without a `RUNE` record.
    pub run_trailer: Option<RunTrailer>,
}

impl FileIndex {
    pub fn event_count(&self) -> usize {
        self.event_headers.len()
    }

    /// Zero-based index of the event carrying `event_number`.
    pub fn event_by_number(&self, event_number: u32) -> Option<usize> {
        self.event_numbers.get(&event_number).copied()
    }
}

impl fmt::Display for FileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "file index (run {})", self.run_number)?;
        for (i, (header, trailer)) in self
            .event_headers
            .iter()
            .zip(&self.event_trailers)
            .enumerate()
        {
            write!(f, "{}, header {}, trailer {}", i, header, trailer)?;
            if self.long_blocks.len() == self.event_headers.len() {
                write!(f, ", long {}", self.long_blocks[i])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Block-wise read access to a CORSIKA particle file.
///
/// Groups the fixed-size disk blocks (with or without record padding) into a flat sequence
/// of sub-blocks addressed by position. Unpacking particles from a sub-block is left to
/// [`super::particles`].
pub struct RawStream<R> {
    reader: R,
    format: FormatSpec,
    disk_block: Vec<u8>,
    words: Vec<f32>,
    current_disk_block: u64,
    index_in_disk_block: usize,
    buffer_valid: bool,
}

impl<R: Read + Seek> RawStream<R> {
    pub fn new(reader: R, format: FormatSpec) -> Self {
        Self {
            reader,
            format,
            disk_block: vec![0u8; format.disk_block_bytes()],
            words: vec![0.0; format.thinning.words_per_disk_block()],
            current_disk_block: 0,
            index_in_disk_block: 0,
            buffer_valid: false,
        }
    }

    /// Detects the file flavour and positions the stream on the first sub-block.
    pub fn open(mut reader: R) -> Result<Self> {
        let format = FormatSpec::detect(&mut reader)?;
        debug!("Detected CORSIKA format: {}", format);
        Ok(Self::new(reader, format))
    }

    pub fn format(&self) -> FormatSpec {
        self.format
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Position of the sub-block returned by the next call to [`Self::next_block`].
    pub fn next_position(&self) -> u64 {
        self.current_disk_block * SUB_BLOCKS_PER_DISK_BLOCK as u64
            + self.index_in_disk_block as u64
    }

    /// Reads one sub-block and advances. Returns `None` at the end of the file.
    pub fn next_block(&mut self) -> Result<Option<&[f32]>> {
        if self.index_in_disk_block == SUB_BLOCKS_PER_DISK_BLOCK {
            self.current_disk_block += 1;
            self.index_in_disk_block = 0;
            self.buffer_valid = false;
        }
        if !self.buffer_valid && !self.read_disk_block()? {
            return Ok(None);
        }

        let len = self.format.thinning.words_per_sub_block();
        let start = self.index_in_disk_block * len;
        self.index_in_disk_block += 1;
        Ok(Some(&self.words[start..start + len]))
    }

    /// Moves the stream so that the next sub-block read is `position`.
    pub fn seek_to(&mut self, position: u64) -> Result<()> {
        let disk_block = position / SUB_BLOCKS_PER_DISK_BLOCK as u64;
        if disk_block != self.current_disk_block {
            self.buffer_valid = false;
        }
        self.current_disk_block = disk_block;
        self.index_in_disk_block = (position % SUB_BLOCKS_PER_DISK_BLOCK as u64) as usize;
        Ok(())
    }

    /// Walks the whole file once and records where every event starts and ends.
    ///
    /// The stream position is restored afterwards.
    pub fn scan(&mut self) -> Result<FileIndex> {
        let resume_at = self.next_position();
        self.seek_to(0)?;

        let mut index = FileIndex::default();
        let mut long_seen = false;
        loop {
            let position = self.next_position();
            let Some(words) = self.next_block()? else {
                break;
            };
            match BlockKind::of(words) {
                BlockKind::RunHeader => {
                    index.run_number = RunHeader::from_words(words).run_number;
                }
                BlockKind::EventHeader => {
                    if index.event_headers.len() != index.event_trailers.len() {
                        return Err(CorsikaIoError::Inconsistent {
                            position,
                            message: "EVTH found before the previous event was closed".into(),
                        });
                    }
                    let event_number = EventHeader::from_words(words).event_number;
                    let event_index = index.event_headers.len();
                    if let Some(first) = index.event_numbers.get(&event_number) {
                        warn!(
                            "Event number {} appears again at event {}; lookups use event {}",
                            event_number, event_index, first
                        );
                    } else {
                        index.event_numbers.insert(event_number, event_index);
                    }
                    index.event_headers.push(position);
                    long_seen = false;
                }
                BlockKind::Longitudinal => {
                    if !long_seen && index.event_headers.len() > index.long_blocks.len() {
                        index.long_blocks.push(position);
                        long_seen = true;
                    }
                }
                BlockKind::EventTrailer => {
                    if index.event_headers.len() != index.event_trailers.len() + 1 {
                        return Err(CorsikaIoError::Inconsistent {
                            position,
                            message: "EVTE found without a matching EVTH".into(),
                        });
                    }
                    index.event_trailers.push(position);
                }
                BlockKind::RunTrailer => {
                    index.run_trailer = Some(RunTrailer::from_words(words));
                    break;
                }
                BlockKind::Particles => {}
            }
        }

        if let Some(&unclosed) = index.event_headers.get(index.event_trailers.len()) {
            return Err(CorsikaIoError::Inconsistent {
                position: unclosed,
                message: "event has no EVTE record".into(),
            });
        }

        debug!(
            "Scanned run {}: {} event(s)",
            index.run_number,
            index.event_count()
        );
        self.seek_to(resume_at)?;
        Ok(index)
    }

    fn read_disk_block(&mut self) -> Result<bool> {
        let block_bytes = self.format.disk_block_bytes();
        let offset = self.current_disk_block * block_bytes as u64;
        self.reader.seek(SeekFrom::Start(offset))?;

        let read = read_fully(&mut self.reader, &mut self.disk_block)?;
        if read == 0 {
            trace!("End of file at disk block {}", self.current_disk_block);
            return Ok(false);
        }
        if read < block_bytes {
            return Err(CorsikaIoError::UnexpectedEof {
                position: self.next_position(),
            });
        }

        let padding = self.format.padding_bytes();
        let payload_len = self.format.thinning.disk_block_payload_bytes();
        if self.format.padded {
            let leading: u32 = bytemuck::pod_read_unaligned(&self.disk_block[..padding]);
            let trailing: u32 =
                bytemuck::pod_read_unaligned(&self.disk_block[padding + payload_len..]);
            if leading as usize != payload_len || trailing as usize != payload_len {
                return Err(CorsikaIoError::Inconsistent {
                    position: self.next_position(),
                    message: format!(
                        "record markers {}/{} do not match block length {}",
                        leading, trailing, payload_len
                    ),
                });
            }
        }

        bytemuck::cast_slice_mut::<f32, u8>(&mut self.words)
            .copy_from_slice(&self.disk_block[padding..padding + payload_len]);
        self.buffer_valid = true;
        trace!("Read disk block {}", self.current_disk_block);
        Ok(true)
    }
}

fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
