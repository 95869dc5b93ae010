//! Handle hit-testing for the crop rectangle.
//!
//! Each corner owns a square hot zone of `hot_zone_size` centred on the
//! corner. Zones are pulled inward so they never reach past one third of the
//! rectangle measured from their own corner, which keeps opposite zones apart
//! on small rectangles.
//!
//! Small rectangles (width + height below `all_drag_min`, in source pixels)
//! can be moved by grabbing anywhere inside them, ahead of any corner.
//!
//! Press and hover check corners in different orders (TL, BR, TR, BL for
//! presses; BR, TR, BL, TL for the hover cursor). Clamped zones end and start
//! at the same one-third line, so they never overlap and the order cannot
//! change the result; both orders are kept for behavioural parity.

use serde::{Deserialize, Serialize};

use crate::geometry::{point_in_rect, Point, Rect};

/// A draggable part of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub fn is_corner(self) -> bool {
        !matches!(self, Handle::Center)
    }

    /// Whether dragging this handle moves the left edge.
    pub fn owns_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn owns_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight)
    }

    /// Whether dragging this handle moves the right edge.
    pub fn owns_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::BottomRight)
    }

    /// Whether dragging this handle moves the bottom edge.
    pub fn owns_bottom(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::BottomRight)
    }

    pub fn cursor(self) -> CursorHint {
        match self {
            Handle::Center => CursorHint::Move,
            Handle::TopLeft => CursorHint::TopLeftCorner,
            Handle::TopRight => CursorHint::TopRightCorner,
            Handle::BottomLeft => CursorHint::BottomLeftCorner,
            Handle::BottomRight => CursorHint::BottomRightCorner,
        }
    }
}

/// Pointer cursor the UI should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    TopLeftCorner,
    TopRightCorner,
    BottomLeftCorner,
    BottomRightCorner,
}

impl CursorHint {
    /// CSS cursor name.
    pub fn css_name(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Move => "move",
            CursorHint::TopLeftCorner => "nw-resize",
            CursorHint::TopRightCorner => "ne-resize",
            CursorHint::BottomLeftCorner => "sw-resize",
            CursorHint::BottomRightCorner => "se-resize",
        }
    }
}

const PRESS_ORDER: [Handle; 4] = [
    Handle::TopLeft,
    Handle::BottomRight,
    Handle::TopRight,
    Handle::BottomLeft,
];

const HOVER_ORDER: [Handle; 4] = [
    Handle::BottomRight,
    Handle::TopRight,
    Handle::BottomLeft,
    Handle::TopLeft,
];

/// Resolves which handle lies under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTester {
    /// Side of a corner's square hot zone, in display pixels.
    pub hot_zone_size: i32,
    /// Below this source-space width + height the whole body moves the rect.
    pub all_drag_min: i32,
}

impl Default for HitTester {
    fn default() -> Self {
        Self {
            hot_zone_size: 60,
            all_drag_min: 400,
        }
    }
}

/// Everything the tester needs to know about the current rectangle.
#[derive(Debug, Clone, Copy)]
pub struct HitTarget {
    /// Crop rectangle in display space.
    pub display_rect: Rect,
    /// Width + height of the rectangle in source space.
    pub source_half_perimeter: i32,
    /// Canvas position of the preview's origin.
    pub offset: Point,
}

impl HitTarget {
    fn local(&self, point: Point) -> Point {
        point - self.offset
    }

    fn is_small(&self, all_drag_min: i32) -> bool {
        self.source_half_perimeter < all_drag_min
    }
}

impl HitTester {
    pub fn new(hot_zone_size: i32, all_drag_min: i32) -> Self {
        Self {
            hot_zone_size,
            all_drag_min,
        }
    }

    /// Hot zone of a corner in display space.
    pub fn corner_zone(&self, rect: &Rect, corner: Handle) -> Rect {
        let size = self.hot_zone_size;
        let half = size / 2;
        let third_x = rect.x + rect.width / 3;
        let third_y = rect.y + rect.height / 3;

        let mut tx = if corner.owns_right() {
            rect.right()
        } else {
            rect.x
        } - half;
        let mut ty = if corner.owns_bottom() {
            rect.bottom()
        } else {
            rect.y
        } - half;

        if corner.owns_right() {
            tx = tx.max(third_x);
        } else if tx + size > third_x {
            tx = third_x - size;
        }
        if corner.owns_bottom() {
            ty = ty.max(third_y);
        } else if ty + size > third_y {
            ty = third_y - size;
        }

        Rect::new(tx, ty, size, size)
    }

    /// Whether `point` (canvas coordinates) lies in a corner's hot zone.
    pub fn hits_corner(&self, target: &HitTarget, corner: Handle, point: Point) -> bool {
        let zone = self.corner_zone(&target.display_rect, corner);
        point_in_rect(&zone, target.local(point))
    }

    /// Whether `point` (canvas coordinates) lies strictly inside the rectangle.
    pub fn hits_body(&self, target: &HitTarget, point: Point) -> bool {
        point_in_rect(&target.display_rect, target.local(point))
    }

    /// Handle grabbed by a press at `point`, if any.
    pub fn handle_at(&self, target: &HitTarget, point: Point) -> Option<Handle> {
        let in_body = self.hits_body(target, point);
        if in_body && target.is_small(self.all_drag_min) {
            return Some(Handle::Center);
        }
        if let Some(corner) = PRESS_ORDER
            .into_iter()
            .find(|&corner| self.hits_corner(target, corner, point))
        {
            return Some(corner);
        }
        in_body.then_some(Handle::Center)
    }

    /// Cursor to show while hovering at `point`.
    ///
    /// `dragging_center` keeps the move cursor while a center drag has left
    /// the rectangle.
    pub fn cursor_at(&self, target: &HitTarget, point: Point, dragging_center: bool) -> CursorHint {
        let in_body = self.hits_body(target, point);
        if in_body && target.is_small(self.all_drag_min) {
            return CursorHint::Move;
        }
        if let Some(corner) = HOVER_ORDER
            .into_iter()
            .find(|&corner| self.hits_corner(target, corner, point))
        {
            return corner.cursor();
        }
        if in_body || dragging_center {
            CursorHint::Move
        } else {
            CursorHint::Default
        }
    }
}
