use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks key presses and the pointer position.
///
/// The pointer is reported normalized to `[0, 1]²` with `(0, 0)` at the
/// bottom-left corner and `(1, 1)` at the top-right.
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_position: Vec2,
    window_size: Vec2,
}

impl Input {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            mouse_position: Vec2::ZERO,
            window_size: Vec2::new(width as f32, height as f32),
        }
    }

    /// Call at the end of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if !self.keys_down.contains(&key) {
                                self.keys_pressed.insert(key);
                            }
                            self.keys_down.insert(key);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&key);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::Resized(size) => {
                self.window_size = Vec2::new(size.width as f32, size.height as f32);
            }
            _ => {}
        }
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Pointer position normalized to `[0, 1]²`, y pointing up.
    pub fn pointer(&self) -> Vec2 {
        normalize_pointer(self.mouse_position, self.window_size)
    }
}

/// Maps a top-left-origin pixel position into `[0, 1]²` with y flipped.
fn normalize_pointer(position: Vec2, size: Vec2) -> Vec2 {
    let size = size.max(Vec2::ONE);
    Vec2::new(position.x / size.x, (size.y - position.y) / size.y).clamp(Vec2::ZERO, Vec2::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_centre_maps_to_half() {
        let p = normalize_pointer(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0));
        assert_eq!(p, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn y_axis_points_up() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(normalize_pointer(Vec2::ZERO, size), Vec2::new(0.0, 1.0));
        assert_eq!(
            normalize_pointer(Vec2::new(800.0, 600.0), size),
            Vec2::new(1.0, 0.0)
        );
    }

    #[test]
    fn outside_window_is_clamped() {
        let p = normalize_pointer(Vec2::new(-50.0, 900.0), Vec2::new(800.0, 600.0));
        assert_eq!(p, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn zero_sized_window_does_not_divide_by_zero() {
        let p = normalize_pointer(Vec2::new(10.0, 10.0), Vec2::ZERO);
        assert!(p.is_finite());
    }

    #[test]
    #[allow(unused_unsafe)]
    fn cursor_events_track_the_resized_window() {
        let mut input = Input::new(800, 600);
        input.handle_event(&WindowEvent::Resized(winit::dpi::PhysicalSize::new(200, 100)));
        input.handle_event(&WindowEvent::CursorMoved {
            device_id: unsafe { winit::event::DeviceId::dummy() },
            position: winit::dpi::PhysicalPosition::new(50.0, 25.0),
        });
        assert_eq!(input.pointer(), Vec2::new(0.25, 0.75));
    }
}
