//! Pointer-drag state machine for the crop rectangle.
//!
//! A [`DragSession`] is created on pointer-down with a resolved [`Handle`] and
//! dropped on pointer-up. While it is alive every pointer position is turned
//! into a *proposed* display-space rectangle; the caller maps it to source
//! space and confines it before committing.
//!
//! Proposals are always computed from the rectangle and pointer captured at
//! drag start, never from the previous proposal, so each move fully replaces
//! the last one.
//!
//! # Policies
//!
//! - **Center**: translate. In slow mode the pointer offset is floor-divided
//!   by the slow divisor.
//! - **Free corners**: the dragged corner follows the pointer and the opposite
//!   corner stays put. Overflow past an image edge shrinks the offending side.
//! - **Locked corners**: both sides grow by the same scalar derived from the
//!   pointer offset, anchored at the opposite corner. Overflow shrinks the
//!   limiting side and rescales the other to keep the aspect.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::handle::Handle;

/// Modifier keys held when a drag starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Slow, precise center drags.
    pub shift: bool,
    /// Drop the ratio lock.
    pub ctrl: bool,
}

/// An active pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: Handle,
    /// Pointer position at drag start, canvas coordinates.
    pub anchor: Point,
    /// Crop rectangle at drag start, display space.
    pub original: Rect,
    /// Fixed for the lifetime of the drag.
    pub slow_mode: bool,
}

/// Display-space limits a proposal is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragBounds {
    pub width: i32,
    pub height: i32,
}

impl DragSession {
    pub fn new(handle: Handle, anchor: Point, original: Rect, slow_mode: bool) -> Self {
        Self {
            handle,
            anchor,
            original,
            slow_mode,
        }
    }

    /// Rectangle proposed by the pointer being at `pointer`.
    ///
    /// `locked` selects the ratio-preserving corner policy. The result is
    /// never smaller than 1x1.
    pub fn propose(&self, pointer: Point, locked: bool, bounds: DragBounds, slow_divisor: i32) -> Rect {
        let offset = pointer - self.anchor;
        let proposed = match self.handle {
            Handle::Center => self.translate(offset, slow_divisor),
            _ if locked => self.resize_locked(offset, bounds),
            _ => self.resize_free(offset, bounds),
        };
        Rect::new(
            proposed.x,
            proposed.y,
            proposed.width.max(1),
            proposed.height.max(1),
        )
    }

    fn translate(&self, offset: Point, slow_divisor: i32) -> Rect {
        let (mut dx, mut dy) = (offset.x, offset.y);
        if self.slow_mode && slow_divisor > 1 {
            let divisor = f64::from(slow_divisor);
            dx = (dx / divisor).floor();
            dy = (dy / divisor).floor();
        }
        let o = self.original;
        Rect::new(
            round(f64::from(o.x) + dx),
            round(f64::from(o.y) + dy),
            o.width,
            o.height,
        )
    }

    fn resize_free(&self, offset: Point, bounds: DragBounds) -> Rect {
        let handle = self.handle;
        let o = self.original;
        let (ox, oy) = (f64::from(o.x), f64::from(o.y));
        let (ow, oh) = (f64::from(o.width), f64::from(o.height));
        let mut r = o;

        if handle.owns_left() {
            r.x = round(ox + offset.x);
            r.width = round(ow - offset.x);
        }
        if handle.owns_right() {
            r.width = round(ow + offset.x);
        }
        if handle.owns_top() {
            r.y = round(oy + offset.y);
            r.height = round(oh - offset.y);
        }
        if handle.owns_bottom() {
            r.height = round(oh + offset.y);
        }

        if r.y < 0 {
            r.height = r.height.saturating_add(r.y);
            r.y = 0;
        }
        if r.x < 0 {
            r.width = r.width.saturating_add(r.x);
            r.x = 0;
        }
        if r.right() > bounds.width {
            let overflow = r.right() - bounds.width;
            r.width = r.width.saturating_sub(overflow);
            if handle.owns_right() {
                r.x = r.x.saturating_add(overflow);
            }
        }
        if r.bottom() > bounds.height {
            let overflow = r.bottom() - bounds.height;
            r.height = r.height.saturating_sub(overflow);
            if handle.owns_bottom() {
                r.y = r.y.saturating_add(overflow);
            }
        }
        r
    }

    fn resize_locked(&self, offset: Point, bounds: DragBounds) -> Rect {
        let handle = self.handle;
        let o = self.original;
        let (dx, dy) = (offset.x, offset.y);

        let grow = match handle {
            Handle::TopRight => (dx - dy) / 2.0,
            Handle::BottomLeft => (dy - dx) / 2.0,
            Handle::TopLeft => -(dx + dy) / 2.0,
            Handle::BottomRight => (dx + dy) / 2.0,
            Handle::Center => 0.0,
        };

        let mut x = f64::from(o.x);
        let mut y = f64::from(o.y);
        if handle.owns_left() {
            x = (x - grow).round();
        }
        if handle.owns_top() {
            y = (y - grow).round();
        }
        let mut w = (f64::from(o.width) + grow).round().max(1.0);
        let mut h = (f64::from(o.height) + grow).round().max(1.0);

        let (bound_w, bound_h) = (f64::from(bounds.width), f64::from(bounds.height));

        if x + w > bound_w {
            let aspect = w / h;
            let new_w = (bound_w - x).max(1.0);
            let new_h = (new_w / aspect).max(1.0);
            if handle.owns_top() {
                y += h - new_h;
            }
            (w, h) = (new_w, new_h);
        }
        if y + h > bound_h {
            let aspect = w / h;
            let new_h = (bound_h - y).max(1.0);
            let new_w = (new_h * aspect).max(1.0);
            if handle.owns_left() {
                x += w - new_w;
            }
            (w, h) = (new_w, new_h);
        }
        if x < 0.0 {
            let aspect = w / h;
            let new_w = (w + x).max(1.0);
            let new_h = (new_w / aspect).max(1.0);
            x = 0.0;
            if handle.owns_top() {
                y += h - new_h;
            }
            (w, h) = (new_w, new_h);
        }
        if y < 0.0 {
            let aspect = w / h;
            let new_h = (h + y).max(1.0);
            let new_w = (new_h * aspect).max(1.0);
            y = 0.0;
            if handle.owns_left() {
                x += w - new_w;
            }
            (w, h) = (new_w, new_h);
        }

        Rect::new(round(x), round(y), round(w), round(h))
    }
}

#[inline]
fn round(value: f64) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIG: DragBounds = DragBounds {
        width: 10_000,
        height: 10_000,
    };

    fn session(handle: Handle, rect: Rect) -> DragSession {
        DragSession::new(handle, Point::new(500.0, 500.0), rect, false)
    }

    fn moved(dx: f64, dy: f64) -> Point {
        Point::new(500.0 + dx, 500.0 + dy)
    }

    #[test]
    fn test_center_translates() {
        let s = session(Handle::Center, Rect::new(100, 100, 50, 60));
        assert_eq!(
            s.propose(moved(12.4, -7.6), false, BIG, 10),
            Rect::new(112, 92, 50, 60)
        );
    }

    #[test]
    fn test_center_slow_mode_floor_divides() {
        let mut s = session(Handle::Center, Rect::new(100, 100, 50, 60));
        s.slow_mode = true;
        assert_eq!(
            s.propose(moved(25.0, 9.0), false, BIG, 10),
            Rect::new(102, 100, 50, 60)
        );
        // Floor division rounds negative offsets down.
        assert_eq!(
            s.propose(moved(-5.0, -25.0), false, BIG, 10),
            Rect::new(99, 97, 50, 60)
        );
    }

    #[test]
    fn test_slow_mode_ignored_for_corners() {
        let mut s = session(Handle::BottomRight, Rect::new(100, 100, 50, 60));
        s.slow_mode = true;
        assert_eq!(
            s.propose(moved(20.0, 10.0), false, BIG, 10),
            Rect::new(100, 100, 70, 70)
        );
    }

    #[test]
    fn test_free_corners_keep_opposite_corner() {
        let rect = Rect::new(100, 100, 200, 100);
        let (dx, dy) = (30.0, -20.0);

        let tl = session(Handle::TopLeft, rect).propose(moved(dx, dy), false, BIG, 10);
        assert_eq!(tl, Rect::new(130, 80, 170, 120));
        assert_eq!((tl.right(), tl.bottom()), (rect.right(), rect.bottom()));

        let tr = session(Handle::TopRight, rect).propose(moved(dx, dy), false, BIG, 10);
        assert_eq!(tr, Rect::new(100, 80, 230, 120));

        let bl = session(Handle::BottomLeft, rect).propose(moved(dx, dy), false, BIG, 10);
        assert_eq!(bl, Rect::new(130, 100, 170, 80));

        let br = session(Handle::BottomRight, rect).propose(moved(dx, dy), false, BIG, 10);
        assert_eq!(br, Rect::new(100, 100, 230, 80));
    }

    #[test]
    fn test_free_top_left_clamped_at_origin() {
        let s = session(Handle::TopLeft, Rect::new(50, 50, 100, 100));
        assert_eq!(
            s.propose(moved(-80.0, -70.0), false, BIG, 10),
            Rect::new(0, 0, 150, 150)
        );
    }

    #[test]
    fn test_free_bottom_right_overflow() {
        let bounds = DragBounds {
            width: 300,
            height: 250,
        };
        let s = session(Handle::BottomRight, Rect::new(100, 100, 100, 100));
        let r = s.propose(moved(500.0, 500.0), false, bounds, 10);
        assert_eq!((r.width, r.height), (200, 150));
    }

    #[test]
    fn test_free_collapse_floors_at_one() {
        let s = session(Handle::BottomRight, Rect::new(100, 100, 50, 50));
        let r = s.propose(moved(-200.0, -200.0), false, BIG, 10);
        assert_eq!((r.width, r.height), (1, 1));
    }

    #[test]
    fn test_locked_bottom_right_grows_symmetrically() {
        let s = session(Handle::BottomRight, Rect::new(100, 100, 200, 200));
        assert_eq!(
            s.propose(moved(50.0, 50.0), true, BIG, 10),
            Rect::new(100, 100, 250, 250)
        );
        // Averaged: (60 + 20) / 2 = 40
        assert_eq!(
            s.propose(moved(60.0, 20.0), true, BIG, 10),
            Rect::new(100, 100, 240, 240)
        );
    }

    #[test]
    fn test_locked_corner_offsets() {
        let rect = Rect::new(100, 100, 200, 200);
        // TR: (dx - dy) / 2 = (10 - -30) / 2 = 20
        let tr = session(Handle::TopRight, rect).propose(moved(10.0, -30.0), true, BIG, 10);
        assert_eq!(tr, Rect::new(100, 80, 220, 220));
        assert_eq!(tr.bottom(), rect.bottom());

        // BL: (dy - dx) / 2 = (30 - -10) / 2 = 20
        let bl = session(Handle::BottomLeft, rect).propose(moved(-10.0, 30.0), true, BIG, 10);
        assert_eq!(bl, Rect::new(80, 100, 220, 220));
        assert_eq!(bl.right(), rect.right());

        // TL: -(dx + dy) / 2 = 20
        let tl = session(Handle::TopLeft, rect).propose(moved(-20.0, -20.0), true, BIG, 10);
        assert_eq!(tl, Rect::new(80, 80, 220, 220));
        assert_eq!((tl.right(), tl.bottom()), (rect.right(), rect.bottom()));
    }

    #[test]
    fn test_locked_overflow_right_keeps_square() {
        let bounds = DragBounds {
            width: 300,
            height: 1000,
        };
        let s = session(Handle::BottomRight, Rect::new(100, 100, 200, 200));
        assert_eq!(
            s.propose(moved(50.0, 50.0), true, bounds, 10),
            Rect::new(100, 100, 200, 200)
        );
    }

    #[test]
    fn test_locked_top_right_overflow_keeps_bottom_anchor() {
        let bounds = DragBounds {
            width: 320,
            height: 1000,
        };
        let rect = Rect::new(100, 100, 200, 200);
        let r = session(Handle::TopRight, rect).propose(moved(60.0, -60.0), true, bounds, 10);
        assert_eq!(r, Rect::new(100, 80, 220, 220));
        assert_eq!(r.bottom(), rect.bottom());
    }

    #[test]
    fn test_locked_top_left_clamped_at_origin_keeps_anchor() {
        let rect = Rect::new(50, 80, 100, 100);
        let r = session(Handle::TopLeft, rect).propose(moved(-100.0, -100.0), true, BIG, 10);
        // Grow of 100 pushes x to -50; shrinking from the left keeps the
        // bottom-right corner fixed and lands y at 30.
        assert_eq!(r, Rect::new(0, 30, 150, 150));
        assert_eq!((r.right(), r.bottom()), (rect.right(), rect.bottom()));
    }

    #[test]
    fn test_locked_top_left_clamped_at_top_keeps_anchor() {
        let rect = Rect::new(80, 50, 100, 100);
        let r = session(Handle::TopLeft, rect).propose(moved(-100.0, -100.0), true, BIG, 10);
        // The left clamp leaves y at -30, so the top clamp shrinks again.
        assert_eq!(r, Rect::new(30, 0, 150, 150));
        assert_eq!((r.right(), r.bottom()), (rect.right(), rect.bottom()));
    }

    #[test]
    fn test_locked_center_handle_does_not_resize() {
        let rect = Rect::new(40, 40, 100, 100);
        let s = session(Handle::Center, rect);
        assert_eq!(s.resize_locked(Point::new(30.0, 30.0), BIG), rect);
    }

    #[test]
    fn test_locked_keeps_aspect_on_overflow() {
        let bounds = DragBounds {
            width: 1000,
            height: 300,
        };
        let s = session(Handle::BottomRight, Rect::new(0, 100, 320, 180));
        let r = s.propose(moved(100.0, 100.0), true, bounds, 10);
        assert_eq!(r.bottom(), 300);
        // 420x280 clipped to a height of 200 keeps 3:2
        assert_eq!((r.width, r.height), (300, 200));
    }

    #[test]
    fn test_locked_collapse_floors_at_one() {
        let s = session(Handle::BottomRight, Rect::new(10, 10, 20, 20));
        let r = s.propose(moved(-500.0, -500.0), true, BIG, 10);
        assert_eq!((r.width, r.height), (1, 1));
    }
}
