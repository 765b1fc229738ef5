//! Completion chime
//!
//! A short decaying sine tone played through rodio on a dedicated audio
//! thread. Playback is best-effort: a missing audio device is reported to the
//! caller, which logs and moves on.

use rodio::{OutputStream, Sink, Source};
use std::{
    f32::consts::PI,
    sync::{
        mpsc::{self, Sender},
        Mutex,
    },
    thread,
    time::Duration,
};
use tracing::debug;

/// How long `play` waits for the audio thread to accept the tone
const REPLY_TIMEOUT: Duration = Duration::from_millis(500);

/// Something that can make the phase-complete sound
pub trait Chime: Send + Sync {
    fn play(&self) -> Result<(), String>;
}

/// Mono sine tone whose gain falls exponentially over its duration
#[derive(Debug, Clone)]
pub struct DecayingTone {
    frequency_hz: f32,
    start_gain: f32,
    end_gain: f32,
    duration: Duration,
    sample_rate: u32,
    num_sample: usize,
}

impl DecayingTone {
    pub fn new(frequency_hz: f32, start_gain: f32, end_gain: f32, duration: Duration) -> Self {
        Self {
            frequency_hz,
            start_gain,
            end_gain,
            duration,
            sample_rate: 44100,
            num_sample: 0,
        }
    }

    /// 800 Hz, half a second, fading from 0.3 to 0.01
    pub fn completion() -> Self {
        Self::new(800.0, 0.3, 0.01, Duration::from_millis(500))
    }

    fn total_samples(&self) -> usize {
        (self.duration.as_secs_f32() * self.sample_rate as f32).round() as usize
    }
}

impl Iterator for DecayingTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples() {
            return None;
        }

        let t = self.num_sample as f32 / self.sample_rate as f32;
        self.num_sample += 1;

        let progress = t / self.duration.as_secs_f32();
        let gain = self.start_gain * (self.end_gain / self.start_gain).powf(progress);
        Some((2.0 * PI * self.frequency_hz * t).sin() * gain)
    }
}

impl Source for DecayingTone {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples().saturating_sub(self.num_sample))
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration)
    }
}

enum ChimeCommand {
    Play(Sender<Result<(), String>>),
}

/// Plays [`DecayingTone::completion`] on the default output device.
///
/// The output stream is not `Send`, so it lives on an `audio-chime` thread
/// spawned on first use; `play` only queues the tone and waits for the thread
/// to confirm the device accepted it.
#[derive(Default)]
pub struct ToneChime {
    tx: Mutex<Option<Sender<ChimeCommand>>>,
}

impl ToneChime {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_thread(&self) -> Result<Sender<ChimeCommand>, String> {
        let mut guard = self.tx.lock().map_err(|e| e.to_string())?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<ChimeCommand>();

        thread::Builder::new()
            .name("audio-chime".to_string())
            .spawn(move || {
                let mut stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        ChimeCommand::Play(reply) => {
                            let result = ensure_sink(&mut stream, &mut sink).map(|()| {
                                if let Some(ref s) = sink {
                                    s.append(DecayingTone::completion());
                                }
                            });
                            if result.is_err() {
                                // Retry the device on the next chime
                                sink = None;
                                stream = None;
                            }
                            let _ = reply.send(result);
                        }
                    }
                }
                debug!("Chime thread exiting");
            })
            .map_err(|e| format!("Failed to spawn chime thread: {}", e))?;

        *guard = Some(tx.clone());
        Ok(tx)
    }

    fn forget_thread(&self) {
        if let Ok(mut guard) = self.tx.lock() {
            *guard = None;
        }
    }
}

impl Chime for ToneChime {
    fn play(&self) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        let (reply_tx, reply_rx) = mpsc::channel();

        if tx.send(ChimeCommand::Play(reply_tx)).is_err() {
            self.forget_thread();
            return Err("chime thread is gone".to_string());
        }

        match reply_rx.recv_timeout(REPLY_TIMEOUT) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err("audio device did not respond in time".to_string())
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.forget_thread();
                Err("chime thread stopped while playing".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn completion_tone_is_half_a_second_of_mono() {
        let tone = DecayingTone::completion();
        assert_eq!(tone.channels(), 1);
        assert_eq!(tone.sample_rate(), 44100);
        assert_eq!(tone.total_duration(), Some(Duration::from_millis(500)));
        assert_eq!(tone.current_frame_len(), Some(22_050));
        assert_eq!(tone.count(), 22_050);
    }

    #[test]
    fn completion_tone_fades_from_point_three_to_point_zero_one() {
        let samples: Vec<f32> = DecayingTone::completion().collect();
        let head = peak(&samples[..1000]);
        let tail = peak(&samples[samples.len() - 1000..]);
        assert!(head > 0.29 && head <= 0.3, "head peak {head}");
        assert!(tail < 0.012, "tail peak {tail}");
    }

    #[test]
    fn frame_length_shrinks_as_samples_are_consumed() {
        let mut tone = DecayingTone::completion();
        tone.by_ref().take(50).for_each(drop);
        assert_eq!(tone.current_frame_len(), Some(22_000));
    }
}
