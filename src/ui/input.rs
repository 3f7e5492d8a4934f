//! Pointer input polled from macroquad each frame

use macroquad::prelude::{is_mouse_button_down, is_mouse_button_pressed, is_mouse_button_released, mouse_position, MouseButton};

/// Mouse button state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    /// Position relative to the canvas' top-left corner on screen
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
    pub moved: bool,
}

impl MouseState {
    /// Read the current frame's mouse, with `origin` the screen position the
    /// canvas is drawn at
    pub fn poll(prev: &MouseState, origin: (f32, f32)) -> Self {
        let (mx, my) = mouse_position();
        let (x, y) = (mx - origin.0, my - origin.1);
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            left_released: is_mouse_button_released(MouseButton::Left),
            moved: x != prev.x || y != prev.y,
        }
    }
}
