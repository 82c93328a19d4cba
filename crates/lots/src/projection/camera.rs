use bevy::prelude::*;

/// Read-only camera view the projector needs. Screen space is pixels with
/// the origin at the top-left of the viewport.
pub trait CameraView {
    fn world_to_screen(&self, point: Vec2) -> Vec2;
    fn zoom(&self) -> f32;
    /// Eye position in screen space.
    fn camera_position(&self) -> Vec2;
    /// Lean applied to roofs in orthographic mode, and the eye offset from
    /// the screen centre in perspective mode.
    fn camera_direction(&self) -> Vec2;
    fn orthographic(&self) -> bool;
}

pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 20.0;

/// Plain camera value: no hidden globals, copy it wherever a view is needed.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World point shown at the top-left of the screen.
    pub origin: Vec2,
    pub zoom: f32,
    pub screen_size: Vec2,
    pub direction: Vec2,
    pub orthographic: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            zoom: 1.0,
            screen_size: Vec2::new(1280.0, 720.0),
            direction: Vec2::ZERO,
            orthographic: false,
        }
    }
}

impl CameraState {
    pub fn screen_centre(&self) -> Vec2 {
        self.screen_size * 0.5
    }

    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        point / self.zoom + self.origin
    }

    /// Move the view by a screen-space offset.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.origin += screen_delta / self.zoom;
    }

    /// Multiply the zoom by `factor`, keeping the world point under
    /// `screen_anchor` fixed.
    pub fn zoom_about(&mut self, screen_anchor: Vec2, factor: f32) {
        let anchor_world = self.screen_to_world(screen_anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.origin = anchor_world - screen_anchor / self.zoom;
    }

    /// Resize the viewport, keeping the world point at the centre fixed.
    pub fn set_screen_size(&mut self, size: Vec2) {
        let centre_world = self.screen_to_world(self.screen_centre());
        self.screen_size = size;
        self.origin = centre_world - self.screen_centre() / self.zoom;
    }

    /// Centre the view on a world point.
    pub fn look_at(&mut self, world: Vec2) {
        self.origin = world - self.screen_centre() / self.zoom;
    }
}

impl CameraView for CameraState {
    fn world_to_screen(&self, point: Vec2) -> Vec2 {
        (point - self.origin) * self.zoom
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }

    fn camera_position(&self) -> Vec2 {
        let centre = self.screen_centre();
        centre + centre * self.direction
    }

    fn camera_direction(&self) -> Vec2 {
        self.direction
    }

    fn orthographic(&self) -> bool {
        self.orthographic
    }
}
