//! Tool state machine turning pointer and keyboard input into plan edits.
//!
//! A [`PlanController`] owns the plan and holds exactly one active
//! [`ControllerState`]. Events are forwarded to that state, which answers
//! with the state to switch to, if any. Gestures modify the plan directly
//! to give immediate feedback and post a single undoable edit once
//! committed.

pub mod commands;
pub mod plan_controller;
pub mod snapshot;
pub mod state;
pub mod states;

pub use plan_controller::PlanController;
pub use snapshot::ItemSnapshot;
pub use state::{ControllerState, InputState, StateContext, Transition};

use crate::config::LengthUnit;
use crate::math::normalize_angle;

/// Tool selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Selection,
    Panning,
    WallCreation,
    RoomCreation,
    PolylineCreation,
    DimensionLineCreation,
    LabelCreation,
}

/// Value typed by the user while drawing or resizing with the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditableProperty {
    X,
    Y,
    Length,
    /// Angle in degrees, counterclockwise on screen.
    Angle,
    Thickness,
    Offset,
    /// Arc extent in degrees.
    ArcExtent,
}

impl EditableProperty {
    /// Brings a typed value back in the legal range of the property.
    ///
    /// Missing or unparsable values count as zero before being clamped,
    /// so a value is never rejected.
    #[must_use]
    pub fn clamp(self, value: Option<f64>, unit: LengthUnit) -> f64 {
        let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
        match self {
            Self::X | Self::Y => value.clamp(-unit.maximum_length(), unit.maximum_length()),
            Self::Length => unit.clamp_length(value),
            Self::Angle => normalize_angle(value.to_radians()).to_degrees(),
            Self::Thickness => value.clamp(unit.minimum_length(), unit.maximum_thickness()),
            Self::Offset => value.clamp(-unit.maximum_length(), unit.maximum_length()),
            Self::ArcExtent => value.clamp(-270.0, 270.0),
        }
    }
}

/// Notification raised by the controller for its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    ModeChanged(Mode),
    /// The active state started or stopped modifying the plan.
    ModificationStateChanged(bool),
    /// The active state started or stopped modifying the base plan.
    BasePlanModificationStateChanged(bool),
}

/// Identifier of every controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Selection,
    SelectionMove,
    RectangleSelection,
    Panning,
    DragAndDrop,
    WallCreation,
    WallDrawing,
    WallResize,
    WallArcExtent,
    RoomCreation,
    RoomDrawing,
    RoomResize,
    RoomNameOffset,
    RoomAreaOffset,
    PolylineCreation,
    PolylineDrawing,
    PolylineResize,
    DimensionLineCreation,
    DimensionLineDrawing,
    DimensionLineResize,
    DimensionLineOffset,
    LabelCreation,
    LabelRotation,
    LabelElevation,
    PieceRotation,
    PiecePitchRotation,
    PieceRollRotation,
    PieceElevation,
    PieceHeight,
    PieceResize,
    PieceNameOffset,
    CameraYawRotation,
    CameraPitchRotation,
    CameraElevation,
    CompassRotation,
    CompassResize,
}

impl StateId {
    /// Name used in logs and contract errors.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::SelectionMove => "selection move",
            Self::RectangleSelection => "rectangle selection",
            Self::Panning => "panning",
            Self::DragAndDrop => "drag and drop",
            Self::WallCreation => "wall creation",
            Self::WallDrawing => "wall drawing",
            Self::WallResize => "wall resize",
            Self::WallArcExtent => "wall arc extent",
            Self::RoomCreation => "room creation",
            Self::RoomDrawing => "room drawing",
            Self::RoomResize => "room resize",
            Self::RoomNameOffset => "room name offset",
            Self::RoomAreaOffset => "room area offset",
            Self::PolylineCreation => "polyline creation",
            Self::PolylineDrawing => "polyline drawing",
            Self::PolylineResize => "polyline resize",
            Self::DimensionLineCreation => "dimension line creation",
            Self::DimensionLineDrawing => "dimension line drawing",
            Self::DimensionLineResize => "dimension line resize",
            Self::DimensionLineOffset => "dimension line offset",
            Self::LabelCreation => "label creation",
            Self::LabelRotation => "label rotation",
            Self::LabelElevation => "label elevation",
            Self::PieceRotation => "piece rotation",
            Self::PiecePitchRotation => "piece pitch rotation",
            Self::PieceRollRotation => "piece roll rotation",
            Self::PieceElevation => "piece elevation",
            Self::PieceHeight => "piece height",
            Self::PieceResize => "piece resize",
            Self::PieceNameOffset => "piece name offset",
            Self::CameraYawRotation => "camera yaw rotation",
            Self::CameraPitchRotation => "camera pitch rotation",
            Self::CameraElevation => "camera elevation",
            Self::CompassRotation => "compass rotation",
            Self::CompassResize => "compass resize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn typed_values_are_clamped_never_rejected() {
        let unit = LengthUnit::Centimeter;
        assert_relative_eq!(EditableProperty::Length.clamp(None, unit), unit.minimum_length());
        assert_relative_eq!(EditableProperty::Length.clamp(Some(-3.0), unit), unit.minimum_length());
        assert_relative_eq!(EditableProperty::Length.clamp(Some(1e12), unit), unit.maximum_length());
        assert_relative_eq!(EditableProperty::Angle.clamp(Some(-90.0), unit), 270.0, epsilon = 1e-9);
        assert_relative_eq!(EditableProperty::Angle.clamp(Some(f64::NAN), unit), 0.0);
        assert_relative_eq!(
            EditableProperty::Thickness.clamp(Some(1e6), unit),
            unit.maximum_thickness()
        );
    }
}
