//! FLAC encoder for the recognition API
//!
//! FLAC provides lossless compression, giving the API the highest quality
//! audio input while still being compressed (~40% of WAV size).
//!
//! Settings:
//! - 16kHz sample rate (speech-optimized), resampled from the device rate
//! - Mono channel
//! - 16-bit samples

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use rubato::{FftFixedIn, Resampler};

/// Target sample rate for speech-optimized encoding
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: usize = 16;

/// Number of channels (mono)
const CHANNELS: usize = 1;

/// FLAC encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("FLAC config error: {0}")]
    Config(String),

    #[error("FLAC encoding failed: {0}")]
    Encode(String),

    #[error("FLAC write failed: {0}")]
    Write(String),

    #[error("Resampling failed: {0}")]
    Resample(String),
}

/// Resample mono i16 samples from `source_rate` to 16kHz
pub fn resample_to_16k(samples: &[i16], source_rate: u32) -> Result<Vec<i16>, EncodingError> {
    if source_rate == TARGET_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }

    // Convert i16 to f32 for resampling
    let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    // Calculate output length
    let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
    let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        TARGET_SAMPLE_RATE as usize,
        1024, // Chunk size
        2,    // Sub-chunks
        1,    // Mono
    )
    .map_err(|e| EncodingError::Resample(format!("Resampler init failed: {}", e)))?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < samples_f32.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples_f32.len());
        let chunk: Vec<Vec<f32>> = vec![samples_f32[input_pos..end_pos].to_vec()];

        // Pad if we don't have enough samples
        let chunk = if chunk[0].len() < frames_needed {
            let mut padded = chunk[0].clone();
            padded.resize(frames_needed, 0.0);
            vec![padded]
        } else {
            chunk
        };

        let resampled = resampler
            .process(&chunk, None)
            .map_err(|e| EncodingError::Resample(e.to_string()))?;

        output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
        input_pos = end_pos;
    }

    // Trim to expected output length
    output.truncate(output_len);

    Ok(output)
}

/// Encode mono PCM samples at `source_rate` to FLAC at 16kHz
pub fn encode_pcm_to_flac(samples: &[i16], source_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let resampled = resample_to_16k(samples, source_rate)?;
    encode_to_flac(&resampled)
}

/// Encode PCM samples to FLAC format
///
/// Input: mono i16 samples at 16kHz
/// Output: FLAC bytes
pub fn encode_to_flac(pcm_samples: &[i16]) -> Result<Vec<u8>, EncodingError> {
    // Convert i16 to i32 (flacenc uses i32 internally)
    let samples_i32: Vec<i32> = pcm_samples.iter().map(|&s| s as i32).collect();

    // Create encoder config
    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::Config(format!("{:?}", e)))?;

    // Create memory source from samples
    let source = MemSource::from_samples(
        &samples_i32,
        CHANNELS,
        BITS_PER_SAMPLE,
        TARGET_SAMPLE_RATE as usize,
    );

    // Encode
    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Encode(format!("{:?}", e)))?;

    // Write to bytes
    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Write(e.to_string()))?;

    Ok(sink.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_silence() {
        // 1 second of silence at 16kHz
        let silence = vec![0i16; TARGET_SAMPLE_RATE as usize];
        let result = encode_to_flac(&silence);
        assert!(result.is_ok());

        let flac_data = result.unwrap();
        // Should have valid FLAC data with header
        assert!(flac_data.len() > 50);
        // FLAC magic number: "fLaC"
        assert_eq!(&flac_data[0..4], b"fLaC");
    }

    #[test]
    fn encode_with_signal() {
        // Generate a simple sine wave (440Hz)
        let samples: Vec<i16> = (0..TARGET_SAMPLE_RATE as usize)
            .map(|i| {
                let t = i as f32 / TARGET_SAMPLE_RATE as f32;
                (f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 16000.0) as i16
            })
            .collect();

        let result = encode_to_flac(&samples);
        assert!(result.is_ok());

        let flac_data = result.unwrap();
        // FLAC should compress the data
        assert!(flac_data.len() < samples.len() * 2); // Less than raw PCM size
    }

    #[test]
    fn resample_passthrough_at_target_rate() {
        let samples = vec![100i16; 3200];
        let resampled = resample_to_16k(&samples, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(resampled, samples);
    }

    #[test]
    fn resample_halves_48k_input() {
        let samples = vec![0i16; 48000];
        let resampled = resample_to_16k(&samples, 48000).unwrap();
        assert_eq!(resampled.len(), 16000);
    }

    #[test]
    fn encode_from_device_rate() {
        let samples = vec![0i16; 44100];
        let flac = encode_pcm_to_flac(&samples, 44100).unwrap();
        assert_eq!(&flac[0..4], b"fLaC");
    }

    #[test]
    fn target_sample_rate_is_16khz() {
        assert_eq!(TARGET_SAMPLE_RATE, 16000);
    }
}
