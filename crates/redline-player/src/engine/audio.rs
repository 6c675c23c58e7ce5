//! Engine audio: a continuously running tone whose pitch tracks the RPM
//!
//! The simulation pushes one RPM value per tick into `EngineFeed`, a pair
//! of atomics shared with the mixer thread. `EngineTone` is an infinite
//! rodio source that smooths the fed value per sample and renders a small
//! harmonic stack at the resulting firing frequency, so gear changes and
//! rev-ups glide instead of stepping once per tick.
//!
//! Opening the output device can fail anywhere (headless CI, missing
//! drivers); the demo treats that as a warning and drives on silently.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use rodio::{OutputStream, Sink, Source};

use redline_sim::{RpmSink, ShutdownToken};

const SAMPLE_RATE: u32 = 44_100;
/// Per-sample smoothing toward the fed RPM, roughly a 45 ms time constant
const RPM_SMOOTHING: f32 = 0.0005;
/// Output gain with and without the throttle hint
const GAIN_THROTTLE: f32 = 0.30;
const GAIN_COAST: f32 = 0.20;

// ---------------------------------------------------------------------------
// Feed: simulation side writes, mixer side reads
// ---------------------------------------------------------------------------

struct FeedInner {
    rpm_bits: AtomicU64,
    throttle: AtomicBool,
}

/// Shared RPM/throttle cell between the tick loop and the audio source.
/// One writer, one reader, staleness of a tick is fine, so plain relaxed
/// atomics carry the values.
#[derive(Clone)]
pub struct EngineFeed {
    inner: Arc<FeedInner>,
}

impl EngineFeed {
    pub fn new(idle_rpm: f64) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                rpm_bits: AtomicU64::new(idle_rpm.to_bits()),
                throttle: AtomicBool::new(false),
            }),
        }
    }

    /// Hint the synth that the throttle is held (swells the output)
    pub fn set_throttle(&self, held: bool) {
        self.inner.throttle.store(held, Ordering::Relaxed);
    }

    pub fn rpm(&self) -> f64 {
        f64::from_bits(self.inner.rpm_bits.load(Ordering::Relaxed))
    }

    pub fn throttle(&self) -> bool {
        self.inner.throttle.load(Ordering::Relaxed)
    }
}

impl RpmSink for EngineFeed {
    fn report_rpm(&self, rpm: f64) {
        self.inner.rpm_bits.store(rpm.to_bits(), Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Voice of the synthesized engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnginePreset {
    /// Screaming high-revver with a bright harmonic tail
    FormulaOne,
    /// Low firing rate, heavy fundamental
    V8,
    /// Modest commuter hum
    Inline4,
}

impl EnginePreset {
    /// Tone pulses per crankshaft revolution
    fn pulses_per_rev(&self) -> f32 {
        match self {
            EnginePreset::FormulaOne => 5.0,
            EnginePreset::V8 => 4.0,
            EnginePreset::Inline4 => 2.0,
        }
    }

    /// Relative weights of the first four harmonics, summing below 1
    fn harmonics(&self) -> [f32; 4] {
        match self {
            EnginePreset::FormulaOne => [0.42, 0.26, 0.18, 0.10],
            EnginePreset::V8 => [0.58, 0.24, 0.08, 0.04],
            EnginePreset::Inline4 => [0.50, 0.30, 0.10, 0.04],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnginePreset::FormulaOne => "formula-one",
            EnginePreset::V8 => "v8",
            EnginePreset::Inline4 => "inline4",
        }
    }
}

// ---------------------------------------------------------------------------
// Tone source
// ---------------------------------------------------------------------------

/// Infinite mono source following the feed. Renders silence once the
/// session's shutdown token is cancelled so teardown never pops.
pub struct EngineTone {
    feed: EngineFeed,
    token: ShutdownToken,
    pulses: f32,
    harmonics: [f32; 4],
    smoothed_rpm: f32,
    phase: f32,
}

impl EngineTone {
    pub fn new(feed: EngineFeed, preset: EnginePreset, token: ShutdownToken) -> Self {
        let smoothed_rpm = feed.rpm() as f32;
        Self {
            feed,
            token,
            pulses: preset.pulses_per_rev(),
            harmonics: preset.harmonics(),
            smoothed_rpm,
            phase: 0.0,
        }
    }
}

impl Iterator for EngineTone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.token.is_cancelled() {
            return Some(0.0);
        }

        let target = self.feed.rpm() as f32;
        self.smoothed_rpm += (target - self.smoothed_rpm) * RPM_SMOOTHING;

        let freq = self.smoothed_rpm / 60.0 * self.pulses;
        self.phase = (self.phase + freq / SAMPLE_RATE as f32).fract();

        let mut sample = 0.0;
        for (i, weight) in self.harmonics.iter().enumerate() {
            let k = (i + 1) as f32;
            sample += weight * (std::f32::consts::TAU * self.phase * k).sin();
        }

        let gain = if self.feed.throttle() {
            GAIN_THROTTLE
        } else {
            GAIN_COAST
        };
        Some(sample * gain)
    }
}

impl Source for EngineTone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

// ---------------------------------------------------------------------------
// Device wrapper
// ---------------------------------------------------------------------------

/// Output stream plus the sink playing the engine tone
pub struct EngineAudio {
    /// rodio output stream (must be kept alive)
    _stream: OutputStream,
    sink: Sink,
}

impl EngineAudio {
    /// Open the default output device and start the tone.
    /// Returns None if no audio device is available.
    pub fn new(feed: EngineFeed, preset: EnginePreset, token: ShutdownToken) -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => match Sink::try_new(&handle) {
                Ok(sink) => {
                    sink.append(EngineTone::new(feed, preset, token));
                    tracing::info!("Audio output initialized ({} voice)", preset.label());
                    Some(Self {
                        _stream: stream,
                        sink,
                    })
                }
                Err(e) => {
                    tracing::warn!("Failed to create audio sink: {}", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to initialize audio: {}", e);
                None
            }
        }
    }

    /// Master volume (0.0 - 1.0)
    pub fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_roundtrips_reported_rpm() {
        let feed = EngineFeed::new(750.0);
        assert_eq!(feed.rpm(), 750.0);
        feed.report_rpm(9321.5);
        assert_eq!(feed.rpm(), 9321.5);

        feed.set_throttle(true);
        assert!(feed.throttle());
        feed.set_throttle(false);
        assert!(!feed.throttle());
    }

    #[test]
    fn feed_clones_share_the_cell() {
        let feed = EngineFeed::new(750.0);
        let handle = feed.clone();
        handle.report_rpm(4000.0);
        assert_eq!(feed.rpm(), 4000.0);
    }

    #[test]
    fn tone_is_mono_at_fixed_rate() {
        let feed = EngineFeed::new(750.0);
        let tone = EngineTone::new(feed, EnginePreset::V8, ShutdownToken::new());
        assert_eq!(tone.channels(), 1);
        assert_eq!(tone.sample_rate(), SAMPLE_RATE);
        assert_eq!(tone.current_frame_len(), None);
        assert_eq!(tone.total_duration(), None);
    }

    #[test]
    fn samples_stay_bounded() {
        let feed = EngineFeed::new(750.0);
        feed.report_rpm(12_500.0);
        feed.set_throttle(true);
        let mut tone = EngineTone::new(feed, EnginePreset::FormulaOne, ShutdownToken::new());
        for _ in 0..44_100 {
            let s = tone.next().unwrap();
            assert!(s.is_finite());
            assert!(s.abs() <= 1.0, "sample {} clips", s);
        }
    }

    #[test]
    fn cancelled_token_silences_the_tone() {
        let feed = EngineFeed::new(750.0);
        feed.report_rpm(8000.0);
        let token = ShutdownToken::new();
        let mut tone = EngineTone::new(feed, EnginePreset::Inline4, token.clone());

        assert!(tone.by_ref().take(256).any(|s| s != 0.0));

        token.cancel();
        assert!(tone.take(256).all(|s| s == 0.0));
    }

    #[test]
    fn smoothing_chases_the_feed() {
        let feed = EngineFeed::new(750.0);
        let mut tone = EngineTone::new(feed.clone(), EnginePreset::V8, ShutdownToken::new());
        feed.report_rpm(6000.0);

        for _ in 0..20_000 {
            tone.next();
        }
        assert!(
            (tone.smoothed_rpm - 6000.0).abs() < 50.0,
            "smoothed rpm {} has not converged",
            tone.smoothed_rpm
        );
    }
}
