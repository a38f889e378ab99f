//! Contract between the controller and the component displaying the plan.
//!
//! The controller never draws anything: it asks its [`PlanView`] for the
//! current scale and text sizes, and pushes transient feedback to it. None
//! of these calls may change the plan.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::controller::EditableProperty;
use crate::math::polygon_2d::rectangle_points;
use crate::math::Point2;
use crate::plan::{DimensionLine, ItemId, TextAlignment, TextStyle};

/// Cursor shapes requested by the controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorType {
    #[default]
    Selection,
    Panning,
    Draw,
    Rotation,
    Elevation,
    Height,
    Power,
    Resize,
    Duplication,
    Move,
}

/// Item kind an alignment feedback is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Wall,
    Room,
    Polyline,
    DimensionLine,
}

/// Guide lines showing how a drawn point aligns with existing items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentFeedback {
    pub kind: FeedbackKind,
    /// Item being drawn or resized.
    pub item: Option<ItemId>,
    pub point: Point2,
    /// `true` to mark the point itself, when it was magnetized.
    pub show_point: bool,
}

/// Arc showing the angle between two directions around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleFeedback {
    pub center: Point2,
    pub first: Point2,
    pub second: Point2,
}

/// Component displaying the plan and the feedback of the current gesture.
pub trait PlanView {
    /// Pixels per centimeter.
    fn scale(&self) -> f64;

    fn set_scale(&mut self, scale: f64);

    /// Length in centimeters of one pixel at the current scale.
    fn pixel_length(&self) -> f64 {
        1.0 / self.scale()
    }

    /// Corners of the box enclosing `text` drawn at `location`, rotated by
    /// `angle`.
    fn text_bounds(&self, text: &str, style: &TextStyle, location: &Point2, angle: f64) -> [Point2; 4];

    fn set_cursor(&mut self, cursor: CursorType);

    fn set_alignment_feedback(&mut self, feedback: Option<AlignmentFeedback>);

    fn set_angle_feedback(&mut self, feedback: Option<AngleFeedback>);

    fn set_dimension_lines_feedback(&mut self, lines: Vec<DimensionLine>);

    /// Rubber band rectangle of a rectangle selection.
    fn set_rectangle_feedback(&mut self, corners: Option<(Point2, Point2)>);

    fn set_resize_indicator_visible(&mut self, visible: bool);

    /// Shows the values of the properties edited by the current gesture
    /// next to `location`.
    fn set_tool_tip_edited_properties(&mut self, properties: &[(EditableProperty, f64)], location: &Point2);

    fn delete_tool_tip_feedback(&mut self);

    /// Removes every transient feedback.
    fn delete_feedback(&mut self);

    /// Scrolls the view by the given distance in centimeters.
    fn move_view(&mut self, dx: f64, dy: f64);

    /// Asks the user the text of a new label. `None` cancels the creation.
    fn request_label_text(&mut self, default_text: &str) -> Option<String>;
}

/// Source of time for the double input detection.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary origin.
    fn now_ms(&self) -> u64;
}

/// Clock reading the monotonic system time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Clock advanced by hand, to replay recorded gestures.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Ratio between the average glyph width and the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// View without display keeping the last feedback it received.
///
/// Text bounds are estimated from the font size.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    pub scale: f64,
    pub cursor: CursorType,
    pub alignment_feedback: Option<AlignmentFeedback>,
    pub angle_feedback: Option<AngleFeedback>,
    pub dimension_lines_feedback: Vec<DimensionLine>,
    pub rectangle_feedback: Option<(Point2, Point2)>,
    pub resize_indicator_visible: bool,
    pub tool_tip: Vec<(EditableProperty, f64)>,
    /// Sum of the moves requested with [`PlanView::move_view`].
    pub view_offset: (f64, f64),
    /// Answer given to label text requests.
    pub label_text: Option<String>,
}

impl HeadlessView {
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            cursor: CursorType::default(),
            alignment_feedback: None,
            angle_feedback: None,
            dimension_lines_feedback: Vec::new(),
            rectangle_feedback: None,
            resize_indicator_visible: false,
            tool_tip: Vec::new(),
            view_offset: (0.0, 0.0),
            label_text: None,
        }
    }
}

impl Default for HeadlessView {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PlanView for HeadlessView {
    fn scale(&self) -> f64 {
        self.scale
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_bounds(&self, text: &str, style: &TextStyle, location: &Point2, angle: f64) -> [Point2; 4] {
        let width = text.chars().count() as f64 * style.font_size * GLYPH_WIDTH_RATIO;
        let height = style.font_size;
        // Text is drawn above its baseline, aligned on its location.
        let dx = match style.alignment {
            TextAlignment::Left => width / 2.0,
            TextAlignment::Center => 0.0,
            TextAlignment::Right => -width / 2.0,
        };
        let (sin, cos) = angle.sin_cos();
        let dy = -height / 2.0;
        let center = Point2::new(
            location.x + dx * cos - dy * sin,
            location.y + dx * sin + dy * cos,
        );
        rectangle_points(&center, width, height, angle)
    }

    fn set_cursor(&mut self, cursor: CursorType) {
        self.cursor = cursor;
    }

    fn set_alignment_feedback(&mut self, feedback: Option<AlignmentFeedback>) {
        self.alignment_feedback = feedback;
    }

    fn set_angle_feedback(&mut self, feedback: Option<AngleFeedback>) {
        self.angle_feedback = feedback;
    }

    fn set_dimension_lines_feedback(&mut self, lines: Vec<DimensionLine>) {
        self.dimension_lines_feedback = lines;
    }

    fn set_rectangle_feedback(&mut self, corners: Option<(Point2, Point2)>) {
        self.rectangle_feedback = corners;
    }

    fn set_resize_indicator_visible(&mut self, visible: bool) {
        self.resize_indicator_visible = visible;
    }

    fn set_tool_tip_edited_properties(&mut self, properties: &[(EditableProperty, f64)], _location: &Point2) {
        self.tool_tip = properties.to_vec();
    }

    fn delete_tool_tip_feedback(&mut self) {
        self.tool_tip.clear();
    }

    fn delete_feedback(&mut self) {
        self.alignment_feedback = None;
        self.angle_feedback = None;
        self.dimension_lines_feedback.clear();
        self.rectangle_feedback = None;
        self.tool_tip.clear();
    }

    fn move_view(&mut self, dx: f64, dy: f64) {
        self.view_offset.0 += dx;
        self.view_offset.1 += dy;
    }

    fn request_label_text(&mut self, _default_text: &str) -> Option<String> {
        self.label_text.clone()
    }
}
