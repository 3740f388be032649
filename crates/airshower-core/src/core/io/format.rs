use super::error::{CorsikaIoError, Result};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

pub const SUB_BLOCKS_PER_DISK_BLOCK: usize = 21;
pub const PARTICLES_PER_SUB_BLOCK: usize = 39;
pub const WORD_BYTES: usize = 4;
/// Size of the Fortran record-length marker wrapping a padded disk block.
pub const PADDING_BYTES: usize = 4;

pub const TAG_RUN_HEADER: &[u8; 4] = b"RUNH";
pub const TAG_EVENT_HEADER: &[u8; 4] = b"EVTH";
pub const TAG_LONGITUDINAL: &[u8; 4] = b"LONG";
pub const TAG_EVENT_TRAILER: &[u8; 4] = b"EVTE";
pub const TAG_RUN_TRAILER: &[u8; 4] = b"RUNE";

const KNOWN_TAGS: [&[u8; 4]; 5] = [
    TAG_RUN_HEADER,
    TAG_EVENT_HEADER,
    TAG_LONGITUDINAL,
    TAG_EVENT_TRAILER,
    TAG_RUN_TRAILER,
];

/// Whether the file was written with thin sampling, which adds a weight word per particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Thinning {
    NotThinned,
    Thinned,
}

impl Thinning {
    pub const fn words_per_particle(self) -> usize {
        match self {
            Thinning::NotThinned => 7,
            Thinning::Thinned => 8,
        }
    }

    pub const fn words_per_sub_block(self) -> usize {
        self.words_per_particle() * PARTICLES_PER_SUB_BLOCK
    }

    pub const fn words_per_disk_block(self) -> usize {
        self.words_per_sub_block() * SUB_BLOCKS_PER_DISK_BLOCK
    }

    /// Payload size of one disk block, which is also the Fortran record length.
    pub const fn disk_block_payload_bytes(self) -> usize {
        self.words_per_disk_block() * WORD_BYTES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub thinning: Thinning,
    /// Disk blocks are wrapped in 4-byte record markers (Fortran unformatted output).
    pub padded: bool,
}

impl FormatSpec {
    pub fn is_thinned(&self) -> bool {
        self.thinning == Thinning::Thinned
    }

    pub fn padding_bytes(&self) -> usize {
        if self.padded { PADDING_BYTES } else { 0 }
    }

    /// Size on disk of one disk block including its record markers.
    pub fn disk_block_bytes(&self) -> usize {
        self.thinning.disk_block_payload_bytes() + 2 * self.padding_bytes()
    }

    /// Inspects the start of a stream and works out how it was written.
    ///
    /// The reader is rewound to the start before returning.
    pub fn detect<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let head_len = PADDING_BYTES + Thinning::Thinned.words_per_sub_block() * WORD_BYTES + 4;
        reader.seek(SeekFrom::Start(0))?;
        let mut head = Vec::with_capacity(head_len);
        reader.by_ref().take(head_len as u64).read_to_end(&mut head)?;
        reader.seek(SeekFrom::Start(0))?;

        if head.len() < 8 {
            return Err(CorsikaIoError::InvalidFormat(format!(
                "file is only {} bytes long",
                head.len()
            )));
        }

        if &head[4..8] == TAG_RUN_HEADER {
            let marker: u32 = bytemuck::pod_read_unaligned(&head[0..4]);
            let thinning = [Thinning::NotThinned, Thinning::Thinned]
                .into_iter()
                .find(|t| t.disk_block_payload_bytes() == marker as usize)
                .ok_or_else(|| {
                    CorsikaIoError::InvalidFormat(format!(
                        "unexpected record length {} (expected {} or {})",
                        marker,
                        Thinning::NotThinned.disk_block_payload_bytes(),
                        Thinning::Thinned.disk_block_payload_bytes()
                    ))
                })?;
            return Ok(Self {
                thinning,
                padded: true,
            });
        }

        if &head[0..4] == TAG_RUN_HEADER {
            // Without record markers the only hint is where the second sub-block starts.
            let thinning = [Thinning::NotThinned, Thinning::Thinned]
                .into_iter()
                .find(|t| {
                    let offset = t.words_per_sub_block() * WORD_BYTES;
                    head.get(offset..offset + 4)
                        .is_some_and(|tag| KNOWN_TAGS.iter().any(|known| tag == *known))
                })
                .ok_or_else(|| {
                    CorsikaIoError::InvalidFormat(
                        "could not locate the sub-block following RUNH".to_string(),
                    )
                })?;
            return Ok(Self {
                thinning,
                padded: false,
            });
        }

        Err(CorsikaIoError::InvalidFormat(
            "no RUNH record at the start of the file".to_string(),
        ))
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, 32 bit, {}",
            if self.is_thinned() {
                "thinned"
            } else {
                "not thinned"
            },
            if self.padded { "padded" } else { "unpadded" }
        )
    }
}
