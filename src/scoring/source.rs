//! Sequential byte sources for the scorer.
//!
//! A source exposes the raw bytes of a song from a logical start, plus a
//! chunk size hint taken from the audio format.

use crate::error::{HitsError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, trace};

/// A rewindable, sequential byte stream with a known length.
pub trait ByteSource {
    /// Move back to the logical start of the stream.
    fn rewind(&mut self) -> io::Result<()>;

    /// Read up to `buf.len()` bytes. Returns 0 once the stream is exhausted.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Total length of the stream in bytes.
    fn len(&self) -> u64;

    /// Average bytes per second of the audio, or 0 if unknown.
    fn chunk_hint(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where the sample data of a RIFF/WAVE file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavLayout {
    /// Format tag from the `fmt ` chunk (1 = PCM, 7 = mu-law, 0xFFFE = extensible, ...).
    pub format_tag: u16,
    /// Average bytes per second declared in the `fmt ` chunk.
    pub bytes_per_second: u32,
    /// Absolute offset of the first byte of the `data` chunk.
    pub data_start: u64,
    /// Size of the `data` chunk, capped at the end of the file.
    pub data_len: u64,
}

fn invalid(message: &str) -> HitsError {
    HitsError::Io(io::Error::new(io::ErrorKind::InvalidData, message.to_string()))
}

/// Walk the RIFF chunks of a WAV file without decoding any samples.
///
/// Any format tag is accepted. Only the `fmt ` and `data` chunks are
/// located, every other chunk is skipped.
pub fn read_layout<R: Read + Seek>(reader: &mut R) -> Result<WavLayout> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut tag = [0u8; 4];
    reader.read_exact(&mut tag)?;
    if &tag != b"RIFF" {
        return Err(invalid("missing RIFF header"));
    }
    let _riff_size = reader.read_u32::<LittleEndian>()?;
    reader.read_exact(&mut tag)?;
    if &tag != b"WAVE" {
        return Err(invalid("not a WAVE file"));
    }

    let mut format: Option<(u16, u32)> = None;
    let mut data: Option<(u64, u64)> = None;

    while format.is_none() || data.is_none() {
        let mut id = [0u8; 4];
        match reader.read_exact(&mut id) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
        let size = u64::from(reader.read_u32::<LittleEndian>()?);
        let body_start = reader.stream_position()?;
        trace!("Chunk {:?} ({} bytes) at {}", String::from_utf8_lossy(&id), size, body_start);

        match &id {
            b"fmt " => {
                if size < 16 {
                    return Err(invalid("fmt chunk too short"));
                }
                let format_tag = reader.read_u16::<LittleEndian>()?;
                let _channels = reader.read_u16::<LittleEndian>()?;
                let _sample_rate = reader.read_u32::<LittleEndian>()?;
                let bytes_per_second = reader.read_u32::<LittleEndian>()?;
                format = Some((format_tag, bytes_per_second));
            }
            b"data" => {
                let available = file_len.saturating_sub(body_start);
                data = Some((body_start, size.min(available)));
            }
            _ => {}
        }

        // Chunk bodies are padded to an even length
        let next = body_start + size + (size & 1);
        if next >= file_len {
            break;
        }
        reader.seek(SeekFrom::Start(next))?;
    }

    let (format_tag, bytes_per_second) = format.ok_or_else(|| invalid("missing fmt chunk"))?;
    let (data_start, data_len) = data.ok_or_else(|| invalid("missing data chunk"))?;

    Ok(WavLayout {
        format_tag,
        bytes_per_second,
        data_start,
        data_len,
    })
}

/// Sample data of a `.wav` file.
///
/// The header is only read to find where the sample data starts and how
/// many bytes per second it holds. Samples are never decoded.
pub struct WavSource {
    reader: BufReader<File>,
    data_start: u64,
    data_len: u64,
    position: u64,
    bytes_per_second: u32,
}

impl WavSource {
    /// Open a WAV file and position it at the start of its sample data.
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let layout = read_layout(&mut reader)?;
        reader.seek(SeekFrom::Start(layout.data_start))?;

        debug!(
            "Opened {} (format {:#06x}): {} data bytes at offset {}, {} bytes/s",
            path.display(),
            layout.format_tag,
            layout.data_len,
            layout.data_start,
            layout.bytes_per_second
        );

        Ok(Self {
            reader,
            data_start: layout.data_start,
            data_len: layout.data_len,
            position: 0,
            bytes_per_second: layout.bytes_per_second,
        })
    }
}

impl ByteSource for WavSource {
    fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(self.data_start))?;
        self.position = 0;
        Ok(())
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.data_len.saturating_sub(self.position);
        if remaining == 0 {
            return Ok(0);
        }

        let want = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        let read = self.reader.read(&mut buf[..want])?;
        self.position += read as u64;
        Ok(read)
    }

    fn len(&self) -> u64 {
        self.data_len
    }

    fn chunk_hint(&self) -> u32 {
        self.bytes_per_second
    }
}

/// Bytes already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Vec<u8>,
    position: usize,
    bytes_per_second: u32,
}

impl MemorySource {
    pub fn new(data: Vec<u8>, bytes_per_second: u32) -> Self {
        Self {
            data,
            position: 0,
            bytes_per_second,
        }
    }
}

impl ByteSource for MemorySource {
    fn rewind(&mut self) -> io::Result<()> {
        self.position = 0;
        Ok(())
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = &self.data[self.position..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.position += n;
        Ok(n)
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn chunk_hint(&self) -> u32 {
        self.bytes_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    #[test]
    fn test_memory_source_short_final_read() {
        let mut source = MemorySource::new(vec![1, 2, 3, 4, 5], 0);
        let mut buf = [0u8; 4];

        assert_eq!(source.read_chunk(&mut buf).unwrap(), 4);
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 5);
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 0);

        source.rewind().unwrap();
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_wav_source_reads_sample_data_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for sample in [0x4142i16, 0x4344, 0x4546, 0x4748] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();

        let mut source = WavSource::open(&path).unwrap();
        assert_eq!(source.len(), 8);
        assert_eq!(source.chunk_hint(), 8000 * 4);

        let mut buf = [0u8; 64];
        source.rewind().unwrap();
        let n = source.read_chunk(&mut buf).unwrap();
        assert_eq!(n, 8);
        // Little-endian samples
        assert_eq!(&buf[..n], &[0x42, 0x41, 0x44, 0x43, 0x46, 0x45, 0x48, 0x47]);
        assert_eq!(source.read_chunk(&mut buf).unwrap(), 0);
    }

    /// Build a RIFF/WAVE file from a raw `fmt ` body, extra chunks and sample data.
    fn riff_file(fmt: &[u8], extra: &[(&[u8; 4], &[u8])], data: &[u8]) -> Vec<u8> {
        let mut chunks = Vec::new();
        let mut push_chunk = |id: &[u8; 4], body: &[u8]| {
            chunks.extend_from_slice(id);
            chunks.extend_from_slice(&(body.len() as u32).to_le_bytes());
            chunks.extend_from_slice(body);
            if body.len() % 2 == 1 {
                chunks.push(0);
            }
        };
        push_chunk(b"fmt ", fmt);
        for &(id, body) in extra {
            push_chunk(id, body);
        }
        push_chunk(b"data", data);

        let mut file = b"RIFF".to_vec();
        file.extend_from_slice(&(4 + chunks.len() as u32).to_le_bytes());
        file.extend_from_slice(b"WAVE");
        file.extend_from_slice(&chunks);
        file
    }

    fn fmt_body(
        format_tag: u16,
        channels: u16,
        rate: u32,
        bytes_per_second: u32,
        block_align: u16,
        bits: u16,
    ) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&format_tag.to_le_bytes());
        body.extend_from_slice(&channels.to_le_bytes());
        body.extend_from_slice(&rate.to_le_bytes());
        body.extend_from_slice(&bytes_per_second.to_le_bytes());
        body.extend_from_slice(&block_align.to_le_bytes());
        body.extend_from_slice(&bits.to_le_bytes());
        body
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_extensible_wav_uses_data_chunk_size() {
        // Mono 8 kHz, 24 valid bits stored in 32-bit containers
        let mut fmt = fmt_body(0xFFFE, 1, 8000, 32000, 4, 32);
        fmt.extend_from_slice(&22u16.to_le_bytes());
        fmt.extend_from_slice(&24u16.to_le_bytes());
        fmt.extend_from_slice(&4u32.to_le_bytes());
        fmt.extend_from_slice(&[
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38,
            0x9B, 0x71,
        ]);
        let data: Vec<u8> = (1..=16).collect();

        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "ext.wav", &riff_file(&fmt, &[], &data));

        let mut source = WavSource::open(&path).unwrap();
        assert_eq!(source.len(), 16);
        assert_eq!(source.chunk_hint(), 32000);

        let mut buf = [0u8; 64];
        source.rewind().unwrap();
        let n = source.read_chunk(&mut buf).unwrap();
        assert_eq!(&buf[..n], data.as_slice());
    }

    #[test]
    fn test_mulaw_wav_opens_without_decoding() {
        let fmt = fmt_body(7, 1, 8000, 8000, 1, 8);
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "mulaw.wav", &riff_file(&fmt, &[], b"Peru!!"));

        let mut source = WavSource::open(&path).unwrap();
        assert_eq!(source.len(), 6);
        assert_eq!(source.chunk_hint(), 8000);

        let mut buf = [0u8; 16];
        source.rewind().unwrap();
        let n = source.read_chunk(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"Peru!!");
    }

    #[test]
    fn test_layout_skips_unknown_and_odd_sized_chunks() {
        let fmt = fmt_body(1, 1, 11025, 11025, 1, 8);
        let bytes = riff_file(&fmt, &[(b"LIST", &b"abc"[..]), (b"fact", &[0u8; 4][..])], b"xyz");

        let layout = read_layout(&mut std::io::Cursor::new(&bytes)).unwrap();
        assert_eq!(layout.format_tag, 1);
        assert_eq!(layout.bytes_per_second, 11025);
        assert_eq!(layout.data_len, 3);
        assert_eq!(&bytes[layout.data_start as usize..][..3], b"xyz");
    }

    #[test]
    fn test_layout_caps_truncated_data_chunk() {
        let fmt = fmt_body(1, 1, 8000, 8000, 1, 8);
        let mut bytes = riff_file(&fmt, &[], b"abcdefgh");
        bytes.truncate(bytes.len() - 3);

        let layout = read_layout(&mut std::io::Cursor::new(&bytes)).unwrap();
        assert_eq!(layout.data_len, 5);
    }

    #[test]
    fn test_layout_requires_fmt_and_data() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        assert!(read_layout(&mut std::io::Cursor::new(&bytes)).is_err());
    }

    #[test]
    fn test_wav_source_rejects_non_wav() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"definitely not riff data").unwrap();

        assert!(WavSource::open(file.path()).is_err());
    }
}
