//! Looping background music on a rodio sink.
//!
//! rodio decodes on its own output thread; the game loop only calls
//! [`MusicPlayer::update`] once per frame to re-queue the track when the sink
//! runs dry, plus the pause/volume controls. When no output device exists or
//! the track cannot be opened the player stays silent and every call is a no-op.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::controls::MusicControls;

struct Output {
    // Dropping the stream stops playback; it must outlive the sink.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

pub struct MusicPlayer {
    path: PathBuf,
    output: Option<Output>,
    controls: MusicControls,
    /// Times the track has been queued, the first play included.
    plays: u32,
}

impl MusicPlayer {
    /// Open the default output device and start streaming `path`.
    pub fn start(path: &Path, initial_volume: f32) -> Self {
        let controls = MusicControls::new(initial_volume);
        let mut plays = 0;
        let output = match open_output(path) {
            Ok(output) => {
                plays = 1;
                output.sink.set_volume(controls.volume());
                log::info!("Music started: {}", path.display());
                Some(output)
            }
            Err(err) => {
                log::warn!("Music disabled: {err}");
                None
            }
        };

        Self {
            path: path.to_path_buf(),
            output,
            controls,
            plays,
        }
    }

    /// A player that never produces sound. Used when audio is turned off.
    pub fn silent(initial_volume: f32) -> Self {
        Self {
            path: PathBuf::new(),
            output: None,
            controls: MusicControls::new(initial_volume),
            plays: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.output.is_some()
    }

    pub fn controls(&self) -> MusicControls {
        self.controls
    }

    pub fn plays(&self) -> u32 {
        self.plays
    }

    /// Keep the stream fed. Call once per frame.
    pub fn update(&mut self) {
        let Some(output) = &self.output else {
            return;
        };
        if self.controls.is_paused() || !output.sink.empty() {
            return;
        }
        match decode(&self.path) {
            Ok(source) => {
                output.sink.append(source);
                self.plays += 1;
                log::trace!("Music looped ({} plays)", self.plays);
            }
            Err(err) => {
                log::warn!("Music stopped: {err}");
                self.output = None;
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        let paused = self.controls.toggle_pause();
        if let Some(output) = &self.output {
            if paused {
                output.sink.pause();
            } else {
                output.sink.play();
            }
        }
        log::info!("Music {}", if paused { "PAUSED" } else { "RESUMED" });
    }

    pub fn volume_up(&mut self) {
        let volume = self.controls.volume_up();
        self.apply_volume(volume);
    }

    pub fn volume_down(&mut self) {
        let volume = self.controls.volume_down();
        self.apply_volume(volume);
    }

    fn apply_volume(&self, volume: f32) {
        if let Some(output) = &self.output {
            output.sink.set_volume(volume);
        }
        log::info!("Music volume: {:.1}", volume);
    }
}

fn open_output(path: &Path) -> Result<Output, String> {
    let (stream, handle) = OutputStream::try_default()
        .map_err(|e| format!("Failed to open audio output: {e}"))?;
    let sink =
        Sink::try_new(&handle).map_err(|e| format!("Failed to create audio sink: {e}"))?;
    sink.append(decode(path)?);
    Ok(Output {
        _stream: stream,
        _handle: handle,
        sink,
    })
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, String> {
    let file =
        File::open(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| format!("Failed to decode {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_player_accepts_controls() {
        let mut player = MusicPlayer::silent(0.5);
        assert!(!player.is_active());
        player.update();
        player.volume_up();
        assert_eq!(player.controls().volume(), 0.6);
        player.toggle_pause();
        assert!(player.controls().is_paused());
        player.volume_down();
        player.volume_down();
        assert_eq!(player.controls().volume(), 0.4);
        assert_eq!(player.plays(), 0);
    }

    #[test]
    fn unreadable_track_counts_no_plays() {
        let player = MusicPlayer::start(Path::new("definitely/not/here.ogg"), 0.5);
        assert!(!player.is_active());
        assert_eq!(player.plays(), 0);
        assert_eq!(player.controls().volume(), 0.5);
    }

    #[test]
    fn decode_reports_missing_file() {
        let err = decode(Path::new("definitely/not/here.mp3")).err().expect("missing file");
        assert!(err.contains("Failed to read"));
    }
}
