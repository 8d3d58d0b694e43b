//! Input/output helpers for tab-separated tables
//!
//! Opens mapping and query tables with transparent gzip/bzip2 support and
//! memory maps large plain-text files.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read};
use std::path::Path;

/// Default buffer size for BufReader/BufWriter (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compression format of an input table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension, then magic bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    // BZ2 magic: "BZh"
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// Memory-mapped file reader
pub struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: input tables are not modified while a run reads them
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt, self.mmap.len());
    }
}

/// Reader over a possibly-compressed table
pub enum TableReader {
    Plain(BufReader<File>),
    Mapped(MappedReader),
    Gzip(BufReader<flate2::read::GzDecoder<File>>),
    Bzip2(BufReader<bzip2::read::BzDecoder<File>>),
}

impl TableReader {
    /// Open a table, selecting decompression and memory mapping automatically
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let format = detect_compression(path)?;
        let file = File::open(path)?;

        let reader = match format {
            CompressionFormat::Gzip => TableReader::Gzip(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                flate2::read::GzDecoder::new(file),
            )),
            CompressionFormat::Bzip2 => TableReader::Bzip2(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                bzip2::read::BzDecoder::new(file),
            )),
            CompressionFormat::Plain => {
                if file.metadata()?.len() >= MMAP_THRESHOLD {
                    TableReader::Mapped(MappedReader::new(&file)?)
                } else {
                    TableReader::Plain(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
                }
            }
        };

        log::debug!("Opened {} as {:?}", path.display(), format);
        Ok(reader)
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, TableReader::Mapped(_))
    }
}

impl Read for TableReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            TableReader::Plain(r) => r.read(buf),
            TableReader::Mapped(r) => r.read(buf),
            TableReader::Gzip(r) => r.read(buf),
            TableReader::Bzip2(r) => r.read(buf),
        }
    }
}

impl BufRead for TableReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            TableReader::Plain(r) => r.fill_buf(),
            TableReader::Mapped(r) => r.fill_buf(),
            TableReader::Gzip(r) => r.fill_buf(),
            TableReader::Bzip2(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            TableReader::Plain(r) => r.consume(amt),
            TableReader::Mapped(r) => r.consume(amt),
            TableReader::Gzip(r) => r.consume(amt),
            TableReader::Bzip2(r) => r.consume(amt),
        }
    }
}

/// Create a buffered writer with the default buffer size
pub fn create_buf_writer<P: AsRef<Path>>(path: P) -> io::Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
}

/// Byte line iterator that reuses its buffer
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Read the next line as bytes, without the trailing `\n` or `\r\n`
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_plain() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "TR1\tCHR1\t3\t8M")?;
        temp.flush()?;
        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Plain);
        Ok(())
    }

    #[test]
    fn test_gzip_roundtrip_by_magic() -> io::Result<()> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::new()?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"TR1\t4\n")?;
        temp.write_all(&encoder.finish()?)?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Gzip);

        let mut text = String::new();
        TableReader::open(temp.path())?.read_to_string(&mut text)?;
        assert_eq!(text, "TR1\t4\n");
        Ok(())
    }

    #[test]
    fn test_bzip2_by_extension() -> io::Result<()> {
        use bzip2::write::BzEncoder;
        use bzip2::Compression;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("queries.tsv.bz2");
        let mut encoder = BzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"TR2\t0\n")?;
        encoder.finish()?;

        assert_eq!(detect_compression(&path)?, CompressionFormat::Bzip2);

        let mut text = String::new();
        TableReader::open(&path)?.read_to_string(&mut text)?;
        assert_eq!(text, "TR2\t0\n");
        Ok(())
    }

    #[test]
    fn test_small_plain_file_is_buffered() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "small")?;
        temp.flush()?;
        assert!(!TableReader::open(temp.path())?.is_mapped());
        Ok(())
    }

    #[test]
    fn test_byte_line_iterator_strips_crlf() -> io::Result<()> {
        let data: &[u8] = b"a\tb\r\nc\n\nd";
        let mut iter = ByteLineIterator::new(BufReader::new(data));

        assert_eq!(iter.next_line().unwrap()?, b"a\tb");
        assert_eq!(iter.next_line().unwrap()?, b"c");
        assert_eq!(iter.next_line().unwrap()?, b"");
        assert_eq!(iter.next_line().unwrap()?, b"d");
        assert!(iter.next_line().is_none());
        Ok(())
    }

    #[test]
    fn test_mapped_reader_reads_all() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"TR1\t0\n")?;
        temp.flush()?;

        let mut reader = MappedReader::new(&File::open(temp.path())?)?;
        assert_eq!(reader.len(), 6);
        assert!(!reader.is_empty());
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        assert_eq!(text, "TR1\t0\n");
        Ok(())
    }
}
