//! Decodes audio files into the samples the Whisper engine expects
//!
//! WAV files are read with `hound`; compressed formats (mp3, m4a, ogg,
//! flac) are decoded through `symphonia`. All inputs are downmixed to mono
//! and resampled to 16 kHz.

use std::path::Path;

use hound::WavReader;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info};

use crate::error::{AudioError, Result};

/// Sample rate expected by the Whisper engine (Hz)
pub const SAMPLE_RATE: u32 = 16_000;

/// Load an audio file as 16 kHz mono f32 samples
pub fn load_samples(path: &Path) -> Result<Vec<f32>> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    let (samples, sample_rate, channels) = if is_wav {
        load_wav(path)?
    } else {
        load_compressed(path)?
    };

    debug!(
        "Decoded {}: {} samples, {} Hz, {} channels",
        path.display(),
        samples.len(),
        sample_rate,
        channels
    );

    let mono = downmix(samples, channels);
    Ok(resample(&mono, sample_rate, SAMPLE_RATE))
}

/// Read a WAV file with hound
fn load_wav(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
    let mut reader = WavReader::open(path).map_err(|e| AudioError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let spec = reader.spec();
    debug!(
        "WAV format: {} channels, {} Hz, {} bits",
        spec.channels, spec.sample_rate, spec.bits_per_sample
    );

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().filter_map(|s| s.ok()).collect(),
        hound::SampleFormat::Int => {
            if spec.bits_per_sample > 32 {
                return Err(AudioError::UnsupportedBitDepth(spec.bits_per_sample).into());
            }
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| s as f32 / max_val)
                .collect()
        }
    };

    Ok((samples, spec.sample_rate, spec.channels as usize))
}

/// Decode a compressed audio file with symphonia
fn load_compressed(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
    let file = std::fs::File::open(path).map_err(|e| AudioError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();
    let decoder_opts = DecoderOptions::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| AudioError::Decode(format!("failed to probe format: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::NoAudioTrack(path.display().to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AudioError::Decode("could not determine sample rate".to_string()))?;
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let codec_params = track.codec_params.clone();

    info!(
        "Decoding {} ({} Hz, {} channels)",
        path.display(),
        sample_rate,
        channels
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &decoder_opts)
        .map_err(|e| AudioError::Decode(format!("failed to create decoder: {}", e)))?;

    let mut samples = Vec::new();
    let mut sample_buf = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(AudioError::Decode(format!("failed to read packet: {}", e)).into())
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| AudioError::Decode(format!("failed to decode: {}", e)))?;

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::<f32>::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    Ok((samples, sample_rate, channels))
}

/// Average interleaved channels down to mono
fn downmix(samples: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    samples
        .chunks(channels)
        .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
        .collect()
}

/// Simple nearest-sample resampling
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    debug!("Resampling from {} Hz to {} Hz", from_rate, to_rate);

    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut resampled = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_idx = (i as f64 * ratio) as usize;
        if src_idx < samples.len() {
            resampled.push(samples[src_idx]);
        }
    }

    resampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_wav(dir: &Path, name: &str, channels: u16, sample_rate: u32, frames: usize) -> PathBuf {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let path = dir.join(name);
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..frames {
            for _ in 0..channels {
                let t = i as f32 / sample_rate as f32;
                let sample = ((2.0 * std::f32::consts::PI * 440.0 * t).sin() * 8000.0) as i16;
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_load_mono_wav_at_target_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "mono.wav", 1, SAMPLE_RATE, 16000);

        let samples = load_samples(&path).unwrap();
        assert_eq!(samples.len(), 16000);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_load_stereo_wav_downmixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "stereo.wav", 2, SAMPLE_RATE, 8000);

        let samples = load_samples(&path).unwrap();
        assert_eq!(samples.len(), 8000);
    }

    #[test]
    fn test_load_wav_resamples() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "slow.wav", 1, 8000, 8000);

        let samples = load_samples(&path).unwrap();
        // 1 second of 8 kHz audio becomes ~1 second at 16 kHz
        assert!(samples.len() >= 15900 && samples.len() <= 16100,
            "expected ~16000 samples, got {}", samples.len());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_samples(Path::new("/nonexistent/missing.wav"));
        assert!(matches!(
            result,
            Err(crate::error::TranscribeError::Audio(AudioError::Open { .. }))
        ));
    }

    #[test]
    fn test_downmix_averages_channels() {
        let samples = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mono = downmix(samples, 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_resample_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }

    #[test]
    fn test_resample_downsamples_by_half() {
        let samples: Vec<f32> = (0..1000).map(|i| i as f32).collect();
        let out = resample(&samples, 32000, 16000);
        assert_eq!(out.len(), 500);
        assert_eq!(out[1], 2.0);
    }
}
