use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use lots::projection::CameraState;

const PAN_SPEED: f32 = 600.0;
const ZOOM_STEP: f32 = 1.1;
/// Pixel-unit wheel deltas (touchpads) per line-unit notch.
const PIXELS_PER_LINE: f32 = 50.0;
/// Roof lean used when switching to the orthographic view.
pub const ORTHOGRAPHIC_LEAN: Vec2 = Vec2::new(0.0, 0.35);

#[derive(Resource, Default)]
pub struct CameraDrag {
    pub dragging: bool,
    pub last_pos: Vec2,
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// True when egui owns the pointer, so world input should be skipped.
fn pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}

/// Keep the projection viewport in step with the window.
pub fn sync_screen_size(windows: Query<&Window>, mut camera: ResMut<CameraState>) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if size.x > 0.0 && size.y > 0.0 && camera.screen_size != size {
        camera.set_screen_size(size);
    }
}

/// Screen-space pan direction for the held WASD/arrow keys (y down).
pub fn keyboard_pan_direction(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        dir.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    dir.normalize_or_zero()
}

/// WASD/Arrow keys: pan at a constant on-screen speed.
pub fn camera_pan_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut camera: ResMut<CameraState>,
) {
    let dir = keyboard_pan_direction(&keys);
    if dir != Vec2::ZERO {
        camera.pan(dir * PAN_SPEED * time.delta_secs());
    }
}

/// Left or middle mouse drag: grab and move the map.
pub fn camera_pan_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut contexts: EguiContexts,
    mut drag: ResMut<CameraDrag>,
    mut camera: ResMut<CameraState>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    let pressed = buttons.just_pressed(MouseButton::Left) || buttons.just_pressed(MouseButton::Middle);
    if pressed && !pointer_over_ui(&mut contexts) {
        if let Some(pos) = window.cursor_position() {
            drag.dragging = true;
            drag.last_pos = pos;
        }
    }

    if !buttons.pressed(MouseButton::Left) && !buttons.pressed(MouseButton::Middle) {
        drag.dragging = false;
    }

    if drag.dragging {
        if let Some(pos) = window.cursor_position() {
            camera.pan(drag.last_pos - pos);
            drag.last_pos = pos;
        }
    }
}

/// Zoom factor for one wheel event.
pub fn wheel_zoom_factor(unit: MouseScrollUnit, y: f32) -> f32 {
    let notches = match unit {
        MouseScrollUnit::Line => y,
        MouseScrollUnit::Pixel => y / PIXELS_PER_LINE,
    };
    ZOOM_STEP.powf(notches)
}

/// Scroll wheel: zoom about the cursor.
pub fn camera_zoom(
    mut scroll: EventReader<MouseWheel>,
    windows: Query<&Window>,
    mut contexts: EguiContexts,
    mut camera: ResMut<CameraState>,
) {
    let Ok(window) = windows.get_single() else {
        scroll.clear();
        return;
    };
    if pointer_over_ui(&mut contexts) {
        scroll.clear();
        return;
    }
    let anchor = window
        .cursor_position()
        .unwrap_or_else(|| camera.screen_centre());
    for event in scroll.read() {
        camera.zoom_about(anchor, wheel_zoom_factor(event.unit, event.y));
    }
}

/// Flip between orthographic and perspective buildings.
pub fn toggle_projection(camera: &mut CameraState) {
    camera.orthographic = !camera.orthographic;
    camera.direction = if camera.orthographic {
        ORTHOGRAPHIC_LEAN
    } else {
        Vec2::ZERO
    };
}

/// O: toggle orthographic projection.
pub fn projection_keybind(keys: Res<ButtonInput<KeyCode>>, mut camera: ResMut<CameraState>) {
    if keys.just_pressed(KeyCode::KeyO) {
        toggle_projection(&mut camera);
        info!(
            "Projection: {}",
            if camera.orthographic {
                "orthographic"
            } else {
                "perspective"
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_pan_direction() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(keyboard_pan_direction(&keys), Vec2::ZERO);

        keys.press(KeyCode::KeyW);
        assert_eq!(keyboard_pan_direction(&keys), Vec2::new(0.0, -1.0));

        keys.press(KeyCode::ArrowRight);
        let dir = keyboard_pan_direction(&keys);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyA);
        keys.press(KeyCode::KeyD);
        assert_eq!(keyboard_pan_direction(&keys), Vec2::ZERO);
    }

    #[test]
    fn test_wheel_zoom_factor() {
        assert_eq!(wheel_zoom_factor(MouseScrollUnit::Line, 0.0), 1.0);
        assert!(wheel_zoom_factor(MouseScrollUnit::Line, 1.0) > 1.0);
        assert!(wheel_zoom_factor(MouseScrollUnit::Line, -1.0) < 1.0);
        let line = wheel_zoom_factor(MouseScrollUnit::Line, 1.0);
        let pixels = wheel_zoom_factor(MouseScrollUnit::Pixel, PIXELS_PER_LINE);
        assert!((line - pixels).abs() < 1e-5);
    }

    #[test]
    fn test_toggle_projection_sets_lean() {
        let mut camera = CameraState::default();
        toggle_projection(&mut camera);
        assert!(camera.orthographic);
        assert_eq!(camera.direction, ORTHOGRAPHIC_LEAN);
        toggle_projection(&mut camera);
        assert!(!camera.orthographic);
        assert_eq!(camera.direction, Vec2::ZERO);
    }
}
