//! Gestures on the indicators of the observer camera.

use std::f64::consts::FRAC_PI_4;

use crate::controller::state::{ControllerState, StateContext, Transition};
use crate::controller::StateId;
use crate::error::Result;
use crate::math::{normalize_angle, Point2};
use crate::plan::{Camera, ItemId};
use crate::view::CursorType;

use super::Captured;

/// Radians of yaw or pitch per pixel dragged.
const ANGLE_PER_PIXEL: f64 = std::f64::consts::PI / 180.0;
/// Lowest elevation of the camera eyes.
const MINIMUM_ELEVATION: f64 = 10.0;

/// Camera at the press and the copy restored on escape.
#[derive(Debug, Default)]
struct CameraGesture {
    original: Option<Camera>,
    captured: Captured,
}

impl CameraGesture {
    fn enter(&mut self, ctx: &mut StateContext<'_>, cursor: CursorType) {
        self.original = Some(ctx.plan.camera().clone());
        self.captured = Captured::new(ctx.plan, &[ItemId::Camera]);
        ctx.view.set_cursor(cursor);
    }
}

macro_rules! camera_gesture_state {
    ($state:ident, $id:ident, $cursor:expr, $edit:literal) => {
        impl ControllerState for $state {
            fn id(&self) -> StateId {
                StateId::$id
            }

            fn is_modification_state(&self) -> bool {
                true
            }

            fn enter(&mut self, ctx: &mut StateContext<'_>) -> Result<()> {
                self.gesture.enter(ctx, $cursor);
                Ok(())
            }

            fn move_mouse(&mut self, ctx: &mut StateContext<'_>, point: Point2) -> Result<Transition> {
                if let Some(original) = &self.gesture.original {
                    let pixels = (point - ctx.input.press) / ctx.view.pixel_length();
                    let camera = Self::transformed(original.clone(), pixels.x, pixels.y);
                    ctx.plan.update_camera(|c| *c = camera);
                }
                Ok(None)
            }

            fn release_mouse(&mut self, ctx: &mut StateContext<'_>, _point: Point2) -> Result<Transition> {
                self.gesture.captured.commit(ctx, $edit);
                Ok(Some(ctx.mode_state()))
            }

            fn escape(&mut self, ctx: &mut StateContext<'_>) -> Result<Transition> {
                self.gesture.captured.restore(ctx.plan)?;
                Ok(Some(ctx.mode_state()))
            }
        }
    };
}

/// Turns the camera around its vertical axis with horizontal moves.
#[derive(Debug, Default)]
pub struct CameraYawRotationState {
    gesture: CameraGesture,
}

impl CameraYawRotationState {
    fn transformed(mut camera: Camera, dx: f64, _dy: f64) -> Camera {
        camera.yaw = normalize_angle(camera.yaw + dx * ANGLE_PER_PIXEL);
        camera
    }
}

camera_gesture_state!(CameraYawRotationState, CameraYawRotation, CursorType::Rotation, "Rotate camera");

/// Tilts the camera up or down with vertical moves, up to 45 degrees.
#[derive(Debug, Default)]
pub struct CameraPitchRotationState {
    gesture: CameraGesture,
}

impl CameraPitchRotationState {
    fn transformed(mut camera: Camera, _dx: f64, dy: f64) -> Camera {
        camera.pitch = (camera.pitch + dy * ANGLE_PER_PIXEL).clamp(-FRAC_PI_4, FRAC_PI_4);
        camera
    }
}

camera_gesture_state!(CameraPitchRotationState, CameraPitchRotation, CursorType::Rotation, "Rotate camera");

/// Raises or lowers the camera eyes with vertical moves.
#[derive(Debug, Default)]
pub struct CameraElevationState {
    gesture: CameraGesture,
}

impl CameraElevationState {
    fn transformed(mut camera: Camera, _dx: f64, dy: f64) -> Camera {
        camera.z = (camera.z - dy).max(MINIMUM_ELEVATION);
        camera
    }
}

camera_gesture_state!(CameraElevationState, CameraElevation, CursorType::Elevation, "Modify camera elevation");
