use crate::math::Point2;

use super::level::LevelId;

slotmap::new_key_type! {
    /// Unique identifier for a label in the plan.
    pub struct LabelId;
}

/// Horizontal alignment of a text around its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlignment {
    /// Alignment of the text once mirrored horizontally.
    #[must_use]
    pub fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Center => Self::Center,
            Self::Right => Self::Left,
        }
    }
}

/// Font description handed to the view to measure texts.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub alignment: TextAlignment,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            bold: false,
            italic: false,
            alignment: TextAlignment::Center,
        }
    }
}

/// A free text anchored at a point of the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub elevation: f64,
    /// Pitch of the text when displayed in 3D, `None` for a plan-only label.
    pub pitch: Option<f64>,
    pub style: TextStyle,
    pub level: Option<LevelId>,
}

impl Label {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            angle: 0.0,
            elevation: 0.0,
            pitch: None,
            style: TextStyle::default(),
            level: None,
        }
    }

    #[must_use]
    pub fn location(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}
