//! Mono WAV files in and out of flat sample slices.
//!
//! The slices line up with `FifoQueue::write` and `FifoQueue::read`, so a
//! queue can be filled from a decoded file or drained into an encoded one.
//!
//! Files are written with the canonical 44-byte header: a 16-byte `fmt `
//! chunk carrying the plain PCM or IEEE float tag, never the extensible
//! layout. Reading goes through hound.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::Path;

use hound::WavReader;

/// Length of the `fmt ` chunk body.
const FMT_CHUNK_LEN: u32 = 16;

/// Bytes in front of the sample data: RIFF header, `fmt ` chunk, `data`
/// chunk header.
pub const HEADER_LEN: usize = 44;

/// Sample encodings supported for writing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleFormat {
    /// 16-bit signed PCM.
    Pcm16,
    /// 32-bit signed PCM.
    Pcm32,
    /// 32-bit IEEE float.
    Float32,
}

impl SampleFormat {
    /// The `audioFormat` field of the `fmt ` chunk: 0x0001 for PCM, 0x0003 for
    /// IEEE float.
    pub fn format_tag(self) -> u16 {
        match self {
            SampleFormat::Pcm16 | SampleFormat::Pcm32 => 0x0001,
            SampleFormat::Float32 => 0x0003,
        }
    }

    /// Bits per sample.
    pub fn bits_per_sample(self) -> u16 {
        match self {
            SampleFormat::Pcm16 => 16,
            SampleFormat::Pcm32 | SampleFormat::Float32 => 32,
        }
    }

    /// Bytes per (mono) frame.
    #[inline]
    fn block_align(self) -> u16 {
        self.bits_per_sample() / 8
    }
}

/// A sample type that has a WAV encoding.
pub trait WavSample: Copy {
    /// Encoding used when writing slices of this type.
    const FORMAT: SampleFormat;

    /// Writes the sample in little-endian order.
    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()>;
}

impl WavSample for i16 {
    const FORMAT: SampleFormat = SampleFormat::Pcm16;

    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_le_bytes())
    }
}

impl WavSample for i32 {
    const FORMAT: SampleFormat = SampleFormat::Pcm32;

    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_le_bytes())
    }
}

impl WavSample for f32 {
    const FORMAT: SampleFormat = SampleFormat::Float32;

    fn write_le<W: Write>(self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_le_bytes())
    }
}

/// Writes `samples` as a mono WAV file at `path`, encoded per `S::FORMAT`.
pub fn write_wav<P, S>(path: P, samples: &[S], sample_rate: u32) -> hound::Result<()>
    where P: AsRef<Path>,
          S: WavSample
{
    let mut out = BufWriter::new(File::create(path)?);
    write_samples(&mut out, samples, sample_rate)?;
    out.flush()?;
    Ok(())
}

/// Encodes `samples` as an in-memory mono WAV file.
///
/// # Examples
///
/// ```
/// use mirrorbuf::wav;
///
/// let bytes = wav::encode_wav(&[0i16, 1, -1], 8000).unwrap();
/// assert_eq!(&bytes[..4], b"RIFF");
/// assert_eq!(&bytes[8..12], b"WAVE");
/// assert_eq!(bytes.len(), wav::HEADER_LEN + 6);
/// assert_eq!(wav::decode_wav16(&bytes).unwrap(), vec![0, 1, -1]);
/// ```
pub fn encode_wav<S: WavSample>(samples: &[S], sample_rate: u32) -> hound::Result<Vec<u8>> {
    let block_align = usize::from(S::FORMAT.block_align());
    let mut out = Vec::with_capacity(HEADER_LEN + samples.len() * block_align);
    write_samples(&mut out, samples, sample_rate)?;
    Ok(out)
}

fn write_samples<W, S>(out: &mut W, samples: &[S], sample_rate: u32) -> hound::Result<()>
    where W: Write,
          S: WavSample
{
    write_header(out, S::FORMAT, sample_rate, samples.len())?;
    for &sample in samples {
        sample.write_le(out)?;
    }
    Ok(())
}

fn write_header<W: Write>(out: &mut W,
                          format: SampleFormat,
                          sample_rate: u32,
                          sample_count: usize)
                          -> hound::Result<()> {
    let block_align = format.block_align();
    // RIFF length is 36 + data length and must fit in 32 bits.
    let data_len = (sample_count as u64)
        .checked_mul(u64::from(block_align))
        .filter(|&len| len <= u64::from(u32::MAX - 36))
        .ok_or_else(|| invalid_input("too many samples for a WAV data chunk"))?;
    let data_len = data_len as u32;
    let byte_rate = sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| invalid_input("sample rate too high for a WAV header"))?;

    out.write_all(b"RIFF")?;
    out.write_all(&(36 + data_len).to_le_bytes())?;
    out.write_all(b"WAVE")?;

    out.write_all(b"fmt ")?;
    out.write_all(&FMT_CHUNK_LEN.to_le_bytes())?;
    out.write_all(&format.format_tag().to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?;
    out.write_all(&sample_rate.to_le_bytes())?;
    out.write_all(&byte_rate.to_le_bytes())?;
    out.write_all(&block_align.to_le_bytes())?;
    out.write_all(&format.bits_per_sample().to_le_bytes())?;

    out.write_all(b"data")?;
    out.write_all(&data_len.to_le_bytes())?;
    Ok(())
}

fn invalid_input(reason: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, reason)
}

/// Reads a 16-bit mono PCM WAV file.
///
/// Other layouts fail: with `hound::Error::Unsupported` when hound can parse them, with
/// hound's own error otherwise.
pub fn read_wav16<P: AsRef<Path>>(path: P) -> hound::Result<Vec<i16>> {
    read_samples16(WavReader::open(path)?)
}

/// Decodes an in-memory 16-bit mono PCM WAV file.
pub fn decode_wav16(bytes: &[u8]) -> hound::Result<Vec<i16>> {
    read_samples16(WavReader::new(Cursor::new(bytes))?)
}

fn read_samples16<R: Read>(mut reader: WavReader<R>) -> hound::Result<Vec<i16>> {
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int {
        log::warn!("unhandled wav sample format: {:?}", spec.sample_format);
        return Err(hound::Error::Unsupported);
    }
    if spec.channels != 1 {
        log::warn!("unhandled wav channel count: {}", spec.channels);
        return Err(hound::Error::Unsupported);
    }
    if spec.bits_per_sample != 16 {
        log::warn!("unhandled wav bits per sample: {}", spec.bits_per_sample);
        return Err(hound::Error::Unsupported);
    }

    reader.samples::<i16>().collect()
}
