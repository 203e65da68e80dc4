use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source, StreamError};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::SoundCue;

/// Sound file locations, relative to the assets directory unless absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConfig {
    pub hit_sound: PathBuf,
    pub background_music: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            hit_sound: PathBuf::from("audio/frog.wav"),
            background_music: PathBuf::from("audio/background.wav"),
        }
    }
}

impl AudioConfig {
    pub fn resolved(&self, assets_dir: &Path) -> Self {
        Self {
            hit_sound: assets_dir.join(&self.hit_sound),
            background_music: assets_dir.join(&self.background_music),
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open default audio output: {0}")]
    OpenStream(#[source] StreamError),
    #[error("failed to read sound file {path}: {source}")]
    ReadSound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode sound file {path}: {source}")]
    DecodeSound {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },
}

#[derive(Debug, Clone)]
struct SoundClip {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

impl SoundClip {
    fn decoder(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>, AudioError> {
        Decoder::new(Cursor::new(Arc::clone(&self.bytes))).map_err(|source| {
            AudioError::DecodeSound {
                path: self.path.clone(),
                source,
            }
        })
    }
}

fn load_clip(path: &Path) -> Result<SoundClip, AudioError> {
    let bytes = fs::read(path).map_err(|source| AudioError::ReadSound {
        path: path.to_path_buf(),
        source,
    })?;
    let clip = SoundClip {
        path: path.to_path_buf(),
        bytes: Arc::from(bytes),
    };
    clip.decoder()?;
    Ok(clip)
}

/// Fire-and-forget hit sounds plus one looping background track.
///
/// Both clips are read and decoded up front so a broken file is reported at
/// startup instead of on the first collision.
pub struct AudioManager {
    stream: OutputStream,
    background_sink: Sink,
    hit: SoundClip,
    background: SoundClip,
}

impl AudioManager {
    pub fn new(config: &AudioConfig) -> Result<Self, AudioError> {
        let hit = load_clip(&config.hit_sound)?;
        let background = load_clip(&config.background_music)?;
        let stream = OutputStreamBuilder::open_default_stream().map_err(AudioError::OpenStream)?;
        let background_sink = Sink::connect_new(stream.mixer());
        info!(
            hit = %hit.path.display(),
            background = %background.path.display(),
            "audio_ready"
        );
        Ok(Self {
            stream,
            background_sink,
            hit,
            background,
        })
    }

    pub fn play(&self, cue: SoundCue) {
        let clip = match cue {
            SoundCue::Hit => &self.hit,
        };
        match clip.decoder() {
            Ok(source) => {
                let sink = Sink::connect_new(self.stream.mixer());
                sink.append(source);
                sink.detach();
            }
            Err(error) => warn!(cue = ?cue, error = %error, "sound_cue_failed"),
        }
    }

    /// Starts the looping track if it is not already queued.
    pub fn ensure_background_playing(&self) {
        if !self.background_sink.empty() {
            return;
        }
        match self.background.decoder() {
            Ok(source) => {
                self.background_sink.append(source.repeat_infinite());
                debug!("background_music_started");
            }
            Err(error) => warn!(error = %error, "background_music_failed"),
        }
    }
}
