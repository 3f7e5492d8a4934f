//! Channel waveform shapes, sampled over one period `x ∈ [0, 1)`

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    /// 12.5% duty pulse
    Pulse125,
    /// 25% duty pulse
    Pulse25,
    Square,
    /// Square that rests at zero for the low half
    PulsedSquare,
    Triangle,
    /// Anything else the sequencer wants to show
    Custom(fn(f64) -> f64),
}

impl Waveform {
    /// Sample at `x` (periodic with period 1), result in -1..=1
    pub fn sample(&self, x: f64) -> f64 {
        let phase = x.rem_euclid(1.0);
        match self {
            Waveform::Sine => (x * 2.0 * PI).sin(),
            Waveform::Pulse125 => pulse(phase, 0.125),
            Waveform::Pulse25 => pulse(phase, 0.25),
            Waveform::Square => pulse(phase, 0.5),
            Waveform::PulsedSquare => {
                if phase > 0.5 {
                    0.0
                } else {
                    0.8
                }
            }
            Waveform::Triangle => {
                let shifted = (x + 0.25).rem_euclid(1.0);
                if shifted > 0.5 {
                    3.0 - shifted * 4.0
                } else {
                    (shifted - 0.25) * 4.0
                }
            }
            Waveform::Custom(f) => f(x),
        }
    }
}

fn pulse(phase: f64, duty: f64) -> f64 {
    if phase > duty {
        -0.8
    } else {
        0.8
    }
}
