use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{DecodeError, WaveformError};

/// Mono PCM samples at a known, non-zero sample rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, WaveformError> {
        if sample_rate == 0 {
            return Err(WaveformError::ZeroSampleRate);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decodes the first audio track of `path`, averaging channels down to mono.
pub fn decode_file(path: &Path) -> Result<Waveform, DecodeError> {
    let mut reader = TrackReader::open(path)?;
    let mut mono = Vec::new();
    while reader.read_packet(&mut mono)? {}

    log::debug!(
        "Decoded {}: {} samples, {}Hz, {:.1}s",
        path.display(),
        mono.len(),
        reader.sample_rate,
        mono.len() as f32 / reader.sample_rate as f32
    );
    Ok(Waveform::new(mono, reader.sample_rate)?)
}

/// Packet-by-packet reader over one decodable track of a container.
struct TrackReader {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    interleaved: Option<SampleBuffer<f32>>,
}

impl TrackReader {
    fn open(path: &Path) -> Result<Self, DecodeError> {
        let file = File::open(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let format = symphonia::default::get_probe()
            .format(
                &hint,
                MediaSourceStream::new(Box::new(file), Default::default()),
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(DecodeError::Probe)?
            .format;

        let params = format
            .tracks()
            .iter()
            .map(|t| (t.id, &t.codec_params))
            .find(|(_, p)| p.codec != CODEC_TYPE_NULL);
        let (track_id, params) = params.ok_or(DecodeError::NoTrack)?;
        let sample_rate = params.sample_rate.ok_or(DecodeError::UnknownSampleRate)?;
        let decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(DecodeError::Codec)?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            interleaved: None,
        })
    }

    /// Decodes the next packet of the track onto `mono`. Returns `false` once
    /// the stream is exhausted. Corrupt packets are skipped.
    fn read_packet(&mut self, mono: &mut Vec<f32>) -> Result<bool, DecodeError> {
        let packet = match self.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                return Ok(false)
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != self.track_id {
            return Ok(true);
        }

        let decoded = match self.decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping corrupt packet {}: {}", packet.ts(), msg);
                return Ok(true);
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        let needed = decoded.frames() * channels;
        let mut buf = match self.interleaved.take() {
            Some(buf) if buf.capacity() >= needed => buf,
            _ => SampleBuffer::new(decoded.capacity() as u64, spec),
        };
        buf.copy_interleaved_ref(decoded);
        downmix_into(mono, buf.samples(), channels);
        self.interleaved = Some(buf);
        Ok(true)
    }
}

/// Appends the per-frame channel average of `interleaved` to `mono`.
fn downmix_into(mono: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    match channels {
        0 | 1 => mono.extend_from_slice(interleaved),
        n => mono.extend(
            interleaved
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32),
        ),
    }
}
