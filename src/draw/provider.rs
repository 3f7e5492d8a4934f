//! Live values readable from draw groups

use super::Value;
use crate::palette::Palette;
use crate::song::{Channel, Song};
use crate::ui::PressState;

/// Closed table of `$name` lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    // song
    Position,
    Buffer,
    Repeat,
    Playing,
    FileName,
    NoFile,
    // channel
    Volume,
    Expression,
    Envelope,
    Output,
    Pitchbend,
    Panpot,
    Mute,
    Poly,
    Percussion,
    Cc0,
    Freq,
    MuteIcon,
    Drum,
    HasWave,
    PolyColor,
    // hit regions
    Over(String),
    Pressed(String),
}

/// What a provider can see while a group is drawn
pub struct Scope<'a> {
    pub song: &'a Song,
    /// Set while drawing a channel group
    pub channel: Option<usize>,
    pub press: &'a dyn PressState,
    pub palette: &'a Palette,
}

impl<'a> Scope<'a> {
    pub fn new(song: &'a Song, press: &'a dyn PressState, palette: &'a Palette) -> Self {
        Self {
            song,
            channel: None,
            press,
            palette,
        }
    }

    pub fn with_channel(mut self, idx: usize) -> Self {
        self.channel = Some(idx);
        self
    }

    pub fn current_channel(&self) -> Option<&'a Channel> {
        self.channel.and_then(|idx| self.song.channel(idx))
    }
}

impl Provider {
    pub fn parse(expr: &str) -> Option<Self> {
        if let Some((name, param)) = expr.split_once(':') {
            return match name {
                "over" => Some(Provider::Over(param.to_string())),
                "pressed" => Some(Provider::Pressed(param.to_string())),
                _ => None,
            };
        }
        let provider = match expr {
            "position" => Provider::Position,
            "buffer" => Provider::Buffer,
            "repeat" => Provider::Repeat,
            "playing" => Provider::Playing,
            "fileName" => Provider::FileName,
            "noFile" => Provider::NoFile,
            "volume" => Provider::Volume,
            "expression" => Provider::Expression,
            "envelope" => Provider::Envelope,
            "output" => Provider::Output,
            "pitchbend" => Provider::Pitchbend,
            "panpot" => Provider::Panpot,
            "mute" => Provider::Mute,
            "poly" => Provider::Poly,
            "percussion" => Provider::Percussion,
            "cc0" => Provider::Cc0,
            "freq" => Provider::Freq,
            "muteIcon" => Provider::MuteIcon,
            "drum" => Provider::Drum,
            "hasWave" => Provider::HasWave,
            "polyColor" => Provider::PolyColor,
            _ => return None,
        };
        Some(provider)
    }

    /// Evaluate against live state. Channel providers outside a channel
    /// group are an error.
    pub fn eval(&self, scope: &Scope) -> Result<Value, String> {
        let song = scope.song;
        let value = match self {
            Provider::Position => Value::Num(song.position),
            Provider::Buffer => Value::Num(song.buffer),
            Provider::Repeat => Value::Bool(song.repeat),
            Provider::Playing => Value::Bool(song.is_playing()),
            Provider::FileName => song.file_name.clone().map(Value::Str).unwrap_or(Value::Null),
            Provider::NoFile => Value::Bool(song.file_name.is_none()),
            Provider::Over(region) => Value::Bool(scope.press.is_over(region)),
            Provider::Pressed(region) => Value::Bool(scope.press.is_down(region)),
            channel_level => {
                let chan = scope
                    .current_channel()
                    .ok_or_else(|| format!("'{:?}' needs a channel", channel_level))?;
                channel_value(channel_level, chan, scope.palette)
            }
        };
        Ok(value)
    }
}

fn channel_value(provider: &Provider, chan: &Channel, palette: &Palette) -> Value {
    let optional = |v: Option<f64>| v.map(Value::Num).unwrap_or(Value::Null);
    match provider {
        Provider::Volume => Value::Num(chan.volume),
        Provider::Expression => Value::Num(chan.expression),
        Provider::Envelope => Value::Num(chan.envelope),
        Provider::Output => Value::Num(chan.output),
        Provider::Pitchbend => optional(chan.pitchbend),
        Provider::Panpot => optional(chan.panpot),
        Provider::Mute => Value::Bool(chan.mute),
        Provider::Poly => Value::Num(chan.poly as f64),
        Provider::Percussion => Value::Str(format!("{:03}", chan.percussion)),
        Provider::Cc0 => Value::Str(format!("{:03}", chan.cc0)),
        Provider::Freq => Value::Str(format!("{:05}", chan.freq)),
        Provider::MuteIcon => Value::Str(if chan.mute { "muted" } else { "unmuted" }.to_string()),
        Provider::Drum => Value::Bool(chan.drum),
        Provider::HasWave => Value::Bool(chan.wave.is_some()),
        // one color for every polyphony level for now
        Provider::PolyColor => Value::Str(palette.get("foreground").unwrap_or_default().to_hex()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::HitDetector;

    #[test]
    fn test_parse_table() {
        assert_eq!(Provider::parse("volume"), Some(Provider::Volume));
        assert_eq!(Provider::parse("over:link"), Some(Provider::Over("link".into())));
        assert_eq!(Provider::parse("under:link"), None);
        assert_eq!(Provider::parse("this.chan.volume"), None);
    }

    #[test]
    fn test_eval_song_and_channel() {
        let mut song = Song::new(4);
        song.position = 0.25;
        song.channels[2].cc0 = 7;
        song.channels[2].freq = 440;
        song.channels[2].mute = true;
        let hits: HitDetector<()> = HitDetector::new();
        let palette = Palette::loading();

        let scope = Scope::new(&song, &hits, &palette);
        assert_eq!(Provider::Position.eval(&scope), Ok(Value::Num(0.25)));
        assert_eq!(Provider::NoFile.eval(&scope), Ok(Value::Bool(true)));
        assert_eq!(Provider::FileName.eval(&scope), Ok(Value::Null));
        assert!(Provider::Volume.eval(&scope).is_err());
        assert_eq!(Provider::Over("nowhere".into()).eval(&scope), Ok(Value::Bool(false)));

        let scope = scope.with_channel(2);
        assert_eq!(Provider::Cc0.eval(&scope), Ok(Value::Str("007".into())));
        assert_eq!(Provider::Freq.eval(&scope), Ok(Value::Str("00440".into())));
        assert_eq!(Provider::MuteIcon.eval(&scope), Ok(Value::Str("muted".into())));
        assert_eq!(Provider::Pitchbend.eval(&scope), Ok(Value::Null));
        assert_eq!(Provider::PolyColor.eval(&scope), Ok(Value::Str("#5c1f09".into())));
    }
}
