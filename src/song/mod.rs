//! Sequencer state
//!
//! The renderer only reads this; whatever drives playback writes it. Both
//! sides hold a `SharedSong` on the main thread.

mod wave;

pub use wave::Waveform;

use std::cell::RefCell;
use std::rc::Rc;

/// Default number of channels (two banks of 16)
pub const DEFAULT_CHANNELS: usize = 32;

pub type SharedSong = Rc<RefCell<Song>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Paused,
    Playing,
    FastForward,
}

/// Transport buttons, as requested by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Play,
    FastForward,
    Stop,
    Pause,
    Export,
}

impl Transport {
    pub const ALL: [Transport; 5] = [
        Transport::Play,
        Transport::FastForward,
        Transport::Stop,
        Transport::Pause,
        Transport::Export,
    ];

    /// Region / draw-group name of the button
    pub fn name(self) -> &'static str {
        match self {
            Transport::Play => "play",
            Transport::FastForward => "fastforward",
            Transport::Stop => "stop",
            Transport::Pause => "pause",
            Transport::Export => "export",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub mute: bool,
    pub poly: u32,

    /// Meters, 0..=1
    pub volume: f64,
    pub expression: f64,
    pub envelope: f64,
    pub output: f64,

    /// -1..=1, `None` when the channel never set it
    pub pitchbend: Option<f64>,
    pub panpot: Option<f64>,

    pub percussion: u32,
    pub cc0: u32,
    pub freq: u32,

    /// Percussion channel (shows the drum button instead of a waveform)
    pub drum: bool,
    pub wave: Option<Waveform>,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            mute: false,
            poly: 0,
            volume: 0.0,
            expression: 0.0,
            envelope: 0.0,
            output: 0.0,
            pitchbend: None,
            panpot: None,
            percussion: 0,
            cc0: 0,
            freq: 0,
            drum: false,
            wave: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub channels: Vec<Channel>,
    pub play_state: PlayState,
    /// Playback position, 0..=1
    pub position: f64,
    /// Render-ahead buffer fill, 0..=1
    pub buffer: f64,
    pub repeat: bool,
    pub file_name: Option<String>,
}

impl Default for Song {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS)
    }
}

impl Song {
    pub fn new(channel_count: usize) -> Self {
        let channels = (0..channel_count)
            .map(|idx| Channel {
                drum: idx % 16 == 9,
                ..Channel::default()
            })
            .collect();

        Self {
            channels,
            play_state: PlayState::Stopped,
            position: 0.0,
            buffer: 1.0,
            repeat: true,
            file_name: None,
        }
    }

    pub fn shared(self) -> SharedSong {
        Rc::new(RefCell::new(self))
    }

    pub fn channel(&self, idx: usize) -> Option<&Channel> {
        self.channels.get(idx)
    }

    /// Playing or fast-forwarding
    pub fn is_playing(&self) -> bool {
        matches!(self.play_state, PlayState::Playing | PlayState::FastForward)
    }

    pub fn set_position(&mut self, position: f64) {
        self.position = position.clamp(0.0, 1.0);
    }

    /// Apply a transport request. Returns false for requests that need a
    /// real sequencer behind them (export).
    pub fn apply_transport(&mut self, transport: Transport) -> bool {
        match transport {
            Transport::Play => self.play_state = PlayState::Playing,
            Transport::FastForward => self.play_state = PlayState::FastForward,
            Transport::Stop => {
                self.play_state = PlayState::Stopped;
                self.position = 0.0;
            }
            Transport::Pause => {
                self.play_state = match self.play_state {
                    PlayState::Paused => PlayState::Playing,
                    PlayState::Playing | PlayState::FastForward => PlayState::Paused,
                    PlayState::Stopped => PlayState::Stopped,
                }
            }
            Transport::Export => return false,
        }
        true
    }

    /// Move the position forward by `delta` (fast-forward moves twice as
    /// far). Reaching the end wraps around with repeat on and stops
    /// otherwise.
    pub fn advance(&mut self, delta: f64) {
        let speed = match self.play_state {
            PlayState::Playing => 1.0,
            PlayState::FastForward => 2.0,
            PlayState::Stopped | PlayState::Paused => return,
        };
        self.position += delta * speed;
        if self.position >= 1.0 {
            if self.repeat {
                self.position = self.position.fract();
            } else {
                self.position = 1.0;
                self.play_state = PlayState::Stopped;
            }
        }
    }

    /// Idle animation for the meters while nothing real is driving them:
    /// every channel's volume/expression/envelope/output follows a sine,
    /// phase-shifted per channel.
    pub fn animate_meters(&mut self, seconds: f64) {
        for (i, chan) in self.channels.iter_mut().enumerate() {
            let level = (Waveform::Sine.sample(seconds + i as f64 / 10.0) + 1.0) * 0.505;
            chan.volume = level;
            chan.expression = level;
            chan.envelope = level;
            chan.output = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let song = Song::default();
        assert_eq!(song.channels.len(), 32);
        assert_eq!(song.position, 0.0);
        assert_eq!(song.buffer, 1.0);
        assert!(song.repeat);
        assert!(song.file_name.is_none());
        assert!(song.channels[0].pitchbend.is_none());
    }

    #[test]
    fn test_drum_channels() {
        let song = Song::new(32);
        let drums: Vec<usize> = song.channels.iter().enumerate().filter(|(_, c)| c.drum).map(|(i, _)| i).collect();
        assert_eq!(drums, vec![9, 25]);
    }

    #[test]
    fn test_transport() {
        let mut song = Song::default();
        song.position = 0.5;
        assert!(song.apply_transport(Transport::Play));
        assert!(song.is_playing());
        song.apply_transport(Transport::Pause);
        assert_eq!(song.play_state, PlayState::Paused);
        song.apply_transport(Transport::Pause);
        assert_eq!(song.play_state, PlayState::Playing);
        song.apply_transport(Transport::Stop);
        assert_eq!(song.play_state, PlayState::Stopped);
        assert_eq!(song.position, 0.0);
        assert!(!song.apply_transport(Transport::Export));
    }

    #[test]
    fn test_advance_wraps_or_stops() {
        let mut song = Song::default();
        song.advance(0.5);
        assert_eq!(song.position, 0.0);

        song.apply_transport(Transport::FastForward);
        song.advance(0.25);
        assert_eq!(song.position, 0.5);
        song.advance(0.3);
        assert!((song.position - 0.1).abs() < 1e-9);

        song.repeat = false;
        song.apply_transport(Transport::Play);
        song.advance(2.0);
        assert_eq!(song.position, 1.0);
        assert_eq!(song.play_state, PlayState::Stopped);
    }

    #[test]
    fn test_animate_meters_stays_in_range() {
        let mut song = Song::new(4);
        for t in 0..20 {
            song.animate_meters(t as f64 * 0.13);
            for chan in &song.channels {
                assert!((0.0..=1.01).contains(&chan.volume));
                assert_eq!(chan.volume, chan.output);
            }
        }
    }
}
