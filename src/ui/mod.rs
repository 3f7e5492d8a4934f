//! Pointer handling: rectangles, hit regions, mouse polling

mod hit;
mod input;
mod rect;

pub use hit::{CursorHint, HitDetector, HitEvent, HitRegion, PressState, RegionSet};
pub use input::MouseState;
pub use rect::Rect;
