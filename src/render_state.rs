//! Mutable per-window render state and frame scheduling.
//!
//! [`RenderState`] owns everything that changes between frames: the latest
//! pointer position, the projection built for the viewport, and the
//! pending frame request. The frame's matrices are derived from it by the pure
//! [`derive_frame`](crate::derive_frame).

use glam::Vec2;

use crate::error::MathError;
use crate::matrix::Matrix4;
use crate::orbit_camera::OrbitCamera;
use crate::scene::{FrameMatrices, SphereImpostor, derive_frame};

/// Viewport size in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height. A zero height counts as one pixel.
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Handle for a requested frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameRequest {
    id: u64,
}

impl FrameRequest {
    pub fn id(self) -> u64 {
        self.id
    }
}

/// Holds at most one pending frame request.
///
/// Requesting a frame replaces whatever was pending, so a resize never leaves a
/// stale request queued behind the fresh one.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Option<FrameRequest>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame, replacing any pending request.
    pub fn request(&mut self) -> FrameRequest {
        let request = FrameRequest { id: self.next_id };
        self.next_id = self.next_id.wrapping_add(1);
        if let Some(stale) = self.pending.replace(request) {
            log::trace!("frame request {} replaced by {}", stale.id, request.id);
        }
        request
    }

    /// Cancel the pending request, returning it if there was one.
    pub fn cancel(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Consume the pending request when its frame is about to run.
    pub fn take(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }
}

/// Pointer, viewport, projection and scheduling state for one window.
#[derive(Debug)]
pub struct RenderState {
    orbit: OrbitCamera,
    sphere: SphereImpostor,
    pointer: Vec2,
    projection: Matrix4,
    frames: FrameScheduler,
}

impl RenderState {
    /// Build the state for a viewport and issue the first frame request.
    pub fn new(
        orbit: OrbitCamera,
        sphere: SphereImpostor,
        pointer: Vec2,
        viewport: Viewport,
    ) -> Self {
        let projection = orbit.camera(pointer).projection(viewport.aspect());
        let mut frames = FrameScheduler::new();
        frames.request();

        Self {
            orbit,
            sphere,
            pointer: pointer.clamp(Vec2::ZERO, Vec2::ONE),
            projection,
            frames,
        }
    }

    /// Record a pointer move. Coordinates are clamped to `[0, 1]²`.
    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer.clamp(Vec2::ZERO, Vec2::ONE);
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn projection(&self) -> &Matrix4 {
        &self.projection
    }

    /// Apply a viewport resize.
    ///
    /// Rebuilds the projection for the new aspect and replaces the pending frame
    /// request in one step. A zero-sized viewport (minimized window) keeps the
    /// previous projection and cancels the pending frame.
    pub fn resize(&mut self, viewport: Viewport) -> Option<FrameRequest> {
        if !viewport.is_valid() {
            self.frames.cancel();
            return None;
        }
        self.projection = self
            .orbit
            .camera(self.pointer)
            .projection(viewport.aspect());
        let request = self.frames.request();
        log::debug!(
            "resized to {}x{}, frame request {}",
            viewport.width,
            viewport.height,
            request.id()
        );
        Some(request)
    }

    /// Request the next frame, replacing any pending request.
    pub fn request_frame(&mut self) -> FrameRequest {
        self.frames.request()
    }

    /// Consume the pending frame request, if any.
    pub fn take_frame(&mut self) -> Option<FrameRequest> {
        self.frames.take()
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.frames.pending()
    }

    /// Derive this frame's matrices from the current pointer and projection.
    pub fn frame_matrices(&self) -> Result<FrameMatrices, MathError> {
        let camera = self.orbit.camera(self.pointer);
        derive_frame(&camera, &self.sphere, &self.projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;

    fn state() -> RenderState {
        RenderState::new(
            OrbitCamera::new(),
            SphereImpostor::default(),
            Vec2::new(0.5, 0.5),
            Viewport::new(800, 600),
        )
    }

    #[test]
    fn new_state_has_a_pending_frame() {
        let mut state = state();
        assert!(state.pending_frame().is_some());
        assert!(state.take_frame().is_some());
        assert!(state.take_frame().is_none());
    }

    #[test]
    fn requests_replace_instead_of_queueing() {
        let mut scheduler = FrameScheduler::new();
        let first = scheduler.request();
        let second = scheduler.request();
        assert_ne!(first, second);
        assert_eq!(scheduler.take(), Some(second));
        assert_eq!(scheduler.take(), None);
    }

    #[test]
    fn cancel_clears_pending_request() {
        let mut scheduler = FrameScheduler::new();
        let request = scheduler.request();
        assert_eq!(scheduler.cancel(), Some(request));
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn resize_replaces_pending_frame_and_projection() {
        let mut state = state();
        let before = state.pending_frame();
        let old_projection = *state.projection();

        let request = state.resize(Viewport::new(1920, 1080));

        assert!(request.is_some());
        assert_ne!(request, before);
        assert_eq!(state.pending_frame(), request);
        assert_ne!(*state.projection(), old_projection);
        assert_eq!(
            *state.projection(),
            Matrix4::perspective(1920.0 / 1080.0, 60.0, 0.1, 1000.0)
        );
    }

    #[test]
    fn resize_leaves_camera_derivation_alone() {
        let mut state = state();
        let before = state.frame_matrices().unwrap();
        state.resize(Viewport::new(300, 900));
        let after = state.frame_matrices().unwrap();

        assert_eq!(before.view, after.view);
        assert_eq!(before.model, after.model);
        assert_ne!(before.projection, after.projection);
    }

    #[test]
    fn minimized_viewport_cancels_the_frame() {
        let mut state = state();
        let projection = *state.projection();
        assert_eq!(state.resize(Viewport::new(0, 0)), None);
        assert_eq!(state.pending_frame(), None);
        assert_eq!(*state.projection(), projection);
    }

    #[test]
    fn pointer_is_clamped_to_unit_square() {
        let mut state = state();
        state.set_pointer(Vec2::new(1.5, -0.25));
        assert_eq!(state.pointer(), Vec2::new(1.0, 0.0));

        let frame = state.frame_matrices().unwrap();
        let eye = frame.view.inverse().unwrap().translation();
        assert!((eye - Vector3::new(10.0, -10.0, 5.0)).length() < 1e-4);
    }
}
