use super::error::Result;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Container compression of a particle file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    /// Recognises a compressed stream from its leading magic bytes.
    pub fn from_magic(head: &[u8]) -> Self {
        if head.starts_with(GZIP_MAGIC) {
            Compression::Gzip
        } else if head.starts_with(BZIP2_MAGIC) {
            Compression::Bzip2
        } else {
            Compression::None
        }
    }

    /// Reads the first bytes of `reader` and rewinds it.
    pub fn detect<R: Read + Seek>(reader: &mut R) -> io::Result<Self> {
        let mut head = Vec::with_capacity(BZIP2_MAGIC.len());
        reader.seek(SeekFrom::Start(0))?;
        reader
            .by_ref()
            .take(BZIP2_MAGIC.len() as u64)
            .read_to_end(&mut head)?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self::from_magic(&head))
    }

    /// Decompresses the whole of `reader` into memory.
    pub fn decode_all<R: Read>(self, reader: R) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        match self {
            Compression::None => {
                let mut reader = reader;
                reader.read_to_end(&mut bytes)?;
            }
            Compression::Gzip => {
                flate2::read::MultiGzDecoder::new(reader).read_to_end(&mut bytes)?;
            }
            Compression::Bzip2 => {
                bzip2::read::MultiBzDecoder::new(reader).read_to_end(&mut bytes)?;
            }
        }
        Ok(bytes)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::None => "uncompressed",
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
        })
    }
}

/// Seekable bytes of a particle file on disk.
///
/// Plain files are read in place. Compressed files are inflated into memory when opened,
/// since sub-blocks are addressed by byte offset.
pub enum FileSource {
    Plain(BufReader<File>),
    Decompressed {
        compression: Compression,
        bytes: Cursor<Vec<u8>>,
    },
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = BufReader::new(File::open(path)?);
        let compression = Compression::detect(&mut file)?;
        if compression == Compression::None {
            return Ok(FileSource::Plain(file));
        }

        let bytes = compression.decode_all(file)?;
        debug!(
            "Inflated {} file {} to {} bytes",
            compression,
            path.display(),
            bytes.len()
        );
        Ok(FileSource::Decompressed {
            compression,
            bytes: Cursor::new(bytes),
        })
    }

    pub fn compression(&self) -> Compression {
        match self {
            FileSource::Plain(_) => Compression::None,
            FileSource::Decompressed { compression, .. } => *compression,
        }
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FileSource::Plain(file) => file.read(buf),
            FileSource::Decompressed { bytes, .. } => bytes.read(buf),
        }
    }
}

impl Seek for FileSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            FileSource::Plain(file) => file.seek(pos),
            FileSource::Decompressed { bytes, .. } => bytes.seek(pos),
        }
    }
}
