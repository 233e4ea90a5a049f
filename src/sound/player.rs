//! Sound player implementation using rodio.
//!
//! rodio's output stream must stay on the thread that created it, so
//! `RodioSoundPlayer` owns a dedicated audio thread and forwards play
//! requests to it over a channel. The player handle itself is `Send + Sync`
//! and can live inside the timer task.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{SoundSource, Tone};
use super::volume::Volume;

/// How long to wait for the audio output stream to open.
const INIT_TIMEOUT: Duration = Duration::from_secs(2);

/// How long `play` waits for the audio thread to accept a sound. `play` runs
/// inside the tick loop, so this stays within one tick interval.
const PLAY_REPLY_TIMEOUT: Duration = Duration::from_millis(250);

/// Gain applied to synthesized tones before the user volume.
const TONE_GAIN: f32 = 0.25;

struct PlayRequest {
    source: SoundSource,
    volume: Volume,
    reply: Sender<Result<(), SoundError>>,
}

/// A sound player that uses rodio for audio playback.
///
/// Sound playback is non-blocking; sounds continue playing in the background
/// after `play` returns.
pub struct RodioSoundPlayer {
    /// Requests to the audio thread. Dropping the player ends the thread.
    requests: Sender<PlayRequest>,
    /// Whether sound playback is disabled.
    disabled: AtomicBool,
}

impl RodioSoundPlayer {
    /// Creates a new sound player and its audio thread.
    ///
    /// # Arguments
    ///
    /// * `disabled` - If true, all sound playback will be silently skipped.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (requests, inbox) = unbounded::<PlayRequest>();
        let (ready_tx, ready_rx) = bounded::<Result<(), SoundError>>(1);

        thread::Builder::new()
            .name("repeat-timer-audio".to_string())
            .spawn(move || audio_thread(inbox, ready_tx))
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        ready_rx
            .recv_timeout(INIT_TIMEOUT)
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))??;

        debug!("Audio output stream initialized");

        Ok(Self {
            requests,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Plays a sound from the given source at the given volume.
    ///
    /// File sources that cannot be opened or decoded fall back to their
    /// synthesized tone.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio thread is gone or the output stream
    /// rejects the sound.
    pub fn play(&self, source: &SoundSource, volume: Volume) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }

        let (reply, response) = bounded(1);
        self.requests
            .send(PlayRequest {
                source: source.clone(),
                volume,
                reply,
            })
            .map_err(|_| SoundError::StreamError("audio thread has stopped".to_string()))?;

        response
            .recv_timeout(PLAY_REPLY_TIMEOUT)
            .map_err(|e| SoundError::PlaybackError(format!("audio thread did not answer: {}", e)))?
    }

    /// Returns true if sound playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables sound playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
        debug!("Sound playback enabled");
    }

    /// Disables sound playback.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
        debug!("Sound playback disabled");
    }

    /// Returns true if the audio system is available.
    ///
    /// Always true once the player exists: the output stream is opened
    /// during construction.
    #[must_use]
    pub fn is_available(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(disabled: bool) -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new(disabled) {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}

// ============================================================================
// Audio thread
// ============================================================================

fn audio_thread(inbox: Receiver<PlayRequest>, ready: Sender<Result<(), SoundError>>) {
    // The stream must outlive every detached sink, so it lives for the
    // whole thread.
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => {
            let _ = ready.send(Ok(()));
            pair
        }
        Err(e) => {
            let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };

    for request in inbox.iter() {
        let result = play_source(&handle, &request.source, request.volume);
        let _ = request.reply.send(result);
    }

    debug!("Audio output thread stopped");
}

fn play_source(
    handle: &OutputStreamHandle,
    source: &SoundSource,
    volume: Volume,
) -> Result<(), SoundError> {
    match source {
        SoundSource::File {
            name,
            path,
            fallback,
        } => {
            debug!("Playing sound file: {}", name);
            match play_file(handle, path, volume) {
                Ok(()) => Ok(()),
                Err(e) if e.should_fallback_to_tone() => {
                    warn!("Failed to play sound '{}': {}, falling back to tone", name, e);
                    play_tone(handle, *fallback, volume)
                }
                Err(e) => Err(e),
            }
        }
        SoundSource::Tone { name, tone } => {
            debug!("Playing tone: {}", name);
            play_tone(handle, *tone, volume)
        }
    }
}

fn play_file(handle: &OutputStreamHandle, path: &Path, volume: Volume) -> Result<(), SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    let decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))?;

    play_into_sink(handle, Box::new(decoder.convert_samples::<f32>()), volume)
}

fn play_tone(handle: &OutputStreamHandle, tone: Tone, volume: Volume) -> Result<(), SoundError> {
    let source = SineWave::new(tone.frequency_hz)
        .take_duration(Duration::from_millis(tone.duration_ms))
        .amplify(TONE_GAIN);

    play_into_sink(handle, Box::new(source), volume)
}

fn play_into_sink(
    handle: &OutputStreamHandle,
    source: Box<dyn Source<Item = f32> + Send>,
    volume: Volume,
) -> Result<(), SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    sink.set_volume(volume.get());
    sink.append(source);
    sink.detach(); // Non-blocking: sound continues after function returns

    debug!("Sound playback started (detached)");
    Ok(())
}
