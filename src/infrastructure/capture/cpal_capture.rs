//! Cross-platform microphone capture using cpal
//!
//! The capture callback runs on the audio host's real-time thread: it only
//! mono-mixes the block and hands it to the recognizer queue with a
//! non-blocking send, dropping the chunk if the queue is full.
//!
//! cpal::Stream is not Send, so the stream lives on a dedicated blocking
//! task for the whole session; `stop` joins that task, which guarantees the
//! input device is released before `stop` returns.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

use super::flac_encoder::TARGET_SAMPLE_RATE;
use crate::application::ports::{Capture, CaptureError};
use crate::domain::audio::AudioChunk;

/// Microphone capture adapter using cpal
pub struct CpalCapture {
    is_capturing: Arc<AtomicBool>,
    dropped_chunks: Arc<AtomicU64>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CpalCapture {
    /// Create a new cpal-based capture adapter
    pub fn new() -> Self {
        Self {
            is_capturing: Arc::new(AtomicBool::new(false)),
            dropped_chunks: Arc::new(AtomicU64::new(0)),
            worker: Mutex::new(None),
        }
    }

    /// Number of chunks dropped because the recognizer fell behind
    pub fn dropped_chunks(&self) -> u64 {
        self.dropped_chunks.load(Ordering::SeqCst)
    }

    /// Get the default input device
    fn input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Get a suitable input configuration
    fn input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Try to find a config that supports our target sample rate.
        // Prefer mono, but accept stereo (we'll mix down).
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            // Only consider i16 or f32 formats
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(CaptureError::StartFailed(
            "No suitable input config found".into(),
        ))?;

        // Use target sample rate if supported, otherwise use the minimum
        let sample_rate = if config_range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// Mix interleaved samples down to mono
fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Hand one device block to the recognizer queue without blocking
fn forward_block(
    samples: Vec<i16>,
    channels: u16,
    sample_rate: u32,
    sink: &mpsc::Sender<AudioChunk>,
    dropped: &AtomicU64,
) {
    let mono = mix_to_mono(&samples, channels);
    if sink.try_send(AudioChunk::new(mono, sample_rate)).is_err() {
        dropped.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl Capture for CpalCapture {
    async fn start(&self, sink: mpsc::Sender<AudioChunk>) -> Result<(), CaptureError> {
        if self
            .is_capturing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CaptureError::AlreadyCapturing);
        }
        self.dropped_chunks.store(0, Ordering::SeqCst);

        let is_capturing = Arc::clone(&self.is_capturing);
        let dropped = Arc::clone(&self.dropped_chunks);
        let (ready_tx, ready_rx) = oneshot::channel();

        let handle = tokio::task::spawn_blocking(move || {
            let built = (|| -> Result<cpal::Stream, CaptureError> {
                let device = CpalCapture::input_device()?;
                let (config, sample_format) = CpalCapture::input_config(&device)?;
                let sample_rate = config.sample_rate.0;
                let channels = config.channels;

                let err_fn = |e| eprintln!("Warning: audio input error: {}", e);

                let stream = match sample_format {
                    SampleFormat::I16 => {
                        let sink = sink.clone();
                        let dropped = Arc::clone(&dropped);
                        device.build_input_stream(
                            &config,
                            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                                forward_block(data.to_vec(), channels, sample_rate, &sink, &dropped);
                            },
                            err_fn,
                            None,
                        )
                    }
                    SampleFormat::F32 => {
                        let sink = sink.clone();
                        let dropped = Arc::clone(&dropped);
                        device.build_input_stream(
                            &config,
                            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                                let samples: Vec<i16> = data
                                    .iter()
                                    .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                                    .collect();
                                forward_block(samples, channels, sample_rate, &sink, &dropped);
                            },
                            err_fn,
                            None,
                        )
                    }
                    other => {
                        return Err(CaptureError::StartFailed(format!(
                            "Unsupported sample format: {:?}",
                            other
                        )))
                    }
                }
                .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

                stream
                    .play()
                    .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

                Ok(stream)
            })();

            match built {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    while is_capturing.load(Ordering::SeqCst) {
                        std::thread::sleep(std::time::Duration::from_millis(20));
                    }
                    // Dropping the stream releases the input device; dropping
                    // the sink closes the audio channel (end of input).
                    drop(stream);
                }
                Err(e) => {
                    is_capturing.store(false, Ordering::SeqCst);
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        *self.worker.lock().await = Some(handle);

        match ready_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.worker.lock().await.take();
                Err(e)
            }
            Err(_) => {
                self.is_capturing.store(false, Ordering::SeqCst);
                self.worker.lock().await.take();
                Err(CaptureError::StartFailed(
                    "capture worker exited unexpectedly".into(),
                ))
            }
        }
    }

    async fn stop(&self) -> Result<(), CaptureError> {
        self.is_capturing.store(false, Ordering::SeqCst);

        if let Some(handle) = self.worker.lock().await.take() {
            handle
                .await
                .map_err(|e| CaptureError::DeviceFailed(format!("capture worker panicked: {}", e)))?;
        }

        let dropped = self.dropped_chunks.load(Ordering::SeqCst);
        if dropped > 0 {
            eprintln!(
                "Warning: dropped {} audio chunks (recognizer fell behind)",
                dropped
            );
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }
}
