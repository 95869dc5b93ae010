//! The crop session: one loaded image, its crop rectangle and the pointer
//! state driving it.
//!
//! The committed rectangle is always kept in source space (the oriented image,
//! after flips and rotation). Pointer proposals are computed in display space,
//! mapped back and confined before they are committed, so `rect()` always
//! satisfies the bounds invariants.
//!
//! # Example
//!
//! ```ignore
//! use cropkit_core::{CropConfig, CropSession, Modifiers, Point};
//!
//! let mut session = CropSession::new(CropConfig::default())?;
//! session.set_image_bounds(4000, 3000)?;
//! session.on_pointer_down(Point::new(300.0, 300.0), Modifiers::default());
//! let update = session.on_pointer_move(Point::new(320.0, 310.0));
//! let committed = session.on_pointer_up();
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CropConfig;
use crate::confine::confine;
use crate::drag::{DragBounds, DragSession, Modifiers};
use crate::error::CropError;
use crate::geometry::{Point, Rect};
use crate::handle::{CursorHint, Handle, HitTarget, HitTester};
use crate::ratio::{CropRatio, RatioIndicator, RatioPreset};
use crate::transform::ImageTransform;
use crate::view::{CanvasSize, DisplayTransform};

/// Width from which the 21:9 preset jumps straight to 2560x1080.
const WIDE_PRESET_MIN_WIDTH: u32 = 2560;

/// Result of a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerUpdate {
    /// Committed rectangle, source space.
    pub rect: Rect,
    pub cursor: CursorHint,
}

/// Interactive crop state for a single image.
#[derive(Debug, Clone)]
pub struct CropSession {
    config: CropConfig,
    hit_tester: HitTester,
    ratio: CropRatio,
    rect: Rect,
    /// Decoded image size before flips and rotation.
    image_size: Option<(u32, u32)>,
    transform: ImageTransform,
    canvas: CanvasSize,
    display: DisplayTransform,
    drag: Option<DragSession>,
    crop_enabled: bool,
    revision: u64,
}

impl CropSession {
    /// Create an empty session. Fails if `config` is out of range.
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        let hit_tester = HitTester::new(config.hot_zone_size, config.all_drag_min);
        let (x, y) = config.default_origin;
        Ok(Self {
            hit_tester,
            ratio: RatioPreset::default().policy(),
            rect: Rect::new(x, y, 1, 1),
            image_size: None,
            transform: ImageTransform::default(),
            canvas: CanvasSize::default(),
            display: DisplayTransform::default(),
            drag: None,
            crop_enabled: true,
            revision: 0,
            config,
        })
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Committed crop rectangle in source space.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Committed crop rectangle in display space.
    pub fn display_rect(&self) -> Rect {
        self.display.to_display_rect(self.rect)
    }

    pub fn ratio(&self) -> CropRatio {
        self.ratio
    }

    pub fn transform(&self) -> ImageTransform {
        self.transform
    }

    pub fn display_transform(&self) -> &DisplayTransform {
        &self.display
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    pub fn crop_enabled(&self) -> bool {
        self.crop_enabled
    }

    pub fn has_image(&self) -> bool {
        self.image_size.is_some()
    }

    /// Handle of the drag in progress, if any.
    pub fn active_handle(&self) -> Option<Handle> {
        self.drag.map(|drag| drag.handle)
    }

    /// Monotonic counter bumped on every committed change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Size of the oriented image the rectangle lives in.
    pub fn source_size(&self) -> Option<(u32, u32)> {
        self.image_size
            .map(|(width, height)| self.transform.oriented_size(width, height))
    }

    /// Region to export: the crop rectangle, or `None` for the whole image.
    pub fn export_region(&self) -> Option<Rect> {
        self.crop_enabled.then_some(self.rect)
    }

    /// Load a new image of `width` x `height` and reset the rectangle.
    pub fn set_image_bounds(&mut self, width: u32, height: u32) -> Result<Rect, CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidImageBounds { width, height });
        }
        self.image_size = Some((width, height));
        self.drag = None;
        self.refit()?;

        let side = self.display.to_source(self.config.default_display_size).max(1);
        let (x, y) = self.config.default_origin;
        debug!(width, height, side, "crop.image_loaded");
        Ok(self.commit_forced(Rect::new(x, y, side, side)))
    }

    /// Resize the drawing area. The rectangle is kept in source space.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<Rect, CropError> {
        self.canvas = CanvasSize::new(width, height)?;
        if self.image_size.is_some() {
            self.refit()?;
        }
        Ok(self.reconfine())
    }

    /// Switch the ratio policy and reconfine.
    pub fn set_ratio_policy(&mut self, policy: CropRatio) -> Result<Rect, CropError> {
        policy.validate()?;
        debug!(?policy, "crop.ratio_changed");
        self.ratio = policy;
        Ok(self.reconfine())
    }

    /// Apply a ratio preset with its selection side effects.
    ///
    /// Square resets the width to the height. 21:9 jumps to 2560x1080 when the
    /// image is at least 2560 pixels wide.
    pub fn select_preset(&mut self, preset: RatioPreset) -> Rect {
        self.ratio = preset.policy();
        debug!(?preset, "crop.preset_selected");

        let mut rect = self.rect;
        match preset {
            RatioPreset::Square => rect.width = rect.height,
            RatioPreset::Ratio21x9 => {
                if let Some((width, _)) = self.source_size() {
                    if width >= WIDE_PRESET_MIN_WIDTH {
                        rect.width = 2560;
                        rect.height = 1080;
                    }
                }
            }
            _ => {}
        }
        self.commit_forced(rect)
    }

    /// Replace the rectangle, confining it first.
    pub fn set_rect(&mut self, rect: Rect) -> Rect {
        self.commit(rect)
    }

    /// Run the current rectangle through confinement again.
    pub fn reconfine(&mut self) -> Rect {
        self.commit(self.rect)
    }

    /// Move the rectangle by whole source pixels (arrow keys).
    pub fn nudge(&mut self, dx: i32, dy: i32) -> Rect {
        if !self.crop_enabled || self.drag.is_some() {
            return self.rect;
        }
        self.commit(self.rect.translated(dx, dy))
    }

    /// Change orientation or effects. The rectangle is kept, refitted to the
    /// new display transform and reconfined.
    pub fn set_transform(&mut self, mut transform: ImageTransform) -> Rect {
        if !transform.rotation.is_finite() {
            transform.rotation = 0.0;
        }
        if transform == self.transform {
            return self.rect;
        }
        debug!(
            rotation = transform.rotation,
            flip_h = transform.flip_horizontal,
            flip_v = transform.flip_vertical,
            "crop.transform_changed"
        );
        self.transform = transform;
        self.drag = None;
        if self.image_size.is_some() {
            if let Err(err) = self.refit() {
                debug!(%err, "crop.refit_failed");
            }
        }
        self.commit_forced(self.rect)
    }

    /// Enable or disable cropping. While disabled pointer input is ignored and
    /// the whole image is exported.
    pub fn set_crop_enabled(&mut self, enabled: bool) -> Rect {
        if enabled != self.crop_enabled {
            self.crop_enabled = enabled;
            self.drag = None;
            debug!(enabled, "crop.toggled");
            return self.commit_forced(self.rect);
        }
        self.rect
    }

    /// Start a drag if `point` (canvas coordinates) grabs a handle.
    ///
    /// Holding ctrl drops any ratio lock; holding shift makes a center drag
    /// slow for the whole gesture.
    pub fn on_pointer_down(&mut self, point: Point, modifiers: Modifiers) -> Option<Handle> {
        if !self.accepts_pointer() {
            return None;
        }
        if modifiers.ctrl && self.ratio.is_locked() {
            debug!("crop.ratio_unlocked");
            self.ratio = CropRatio::Unlocked;
        }

        let handle = self.hit_tester.handle_at(&self.hit_target(), point)?;
        self.drag = Some(DragSession::new(
            handle,
            point,
            self.display_rect(),
            modifiers.shift,
        ));
        debug!(?handle, slow = modifiers.shift, "crop.drag_start");
        Some(handle)
    }

    /// Feed a pointer position. Commits the proposed rectangle when dragging.
    pub fn on_pointer_move(&mut self, point: Point) -> PointerUpdate {
        if !self.accepts_pointer() {
            return PointerUpdate {
                rect: self.rect,
                cursor: CursorHint::Default,
            };
        }

        let Some(drag) = self.drag else {
            let cursor = self.hit_tester.cursor_at(&self.hit_target(), point, false);
            return PointerUpdate {
                rect: self.rect,
                cursor,
            };
        };

        let bounds = DragBounds {
            width: i32::try_from(self.display.display_width).unwrap_or(i32::MAX),
            height: i32::try_from(self.display.display_height).unwrap_or(i32::MAX),
        };
        let proposed = drag.propose(
            point,
            self.ratio.is_locked(),
            bounds,
            self.config.slow_drag_divisor,
        );
        let rect = self.commit(self.display.to_source_rect(proposed));
        PointerUpdate {
            rect,
            cursor: drag.handle.cursor(),
        }
    }

    /// End the drag in progress and return the committed rectangle.
    pub fn on_pointer_up(&mut self) -> Rect {
        if let Some(drag) = self.drag.take() {
            self.revision += 1;
            debug!(handle = ?drag.handle, rect = ?self.rect, "crop.drag_end");
        }
        self.rect
    }

    /// Map a display-space rectangle to source space.
    pub fn to_source_rect(&self, display: Rect) -> Rect {
        self.display.to_source_rect(display)
    }

    /// Map a source-space rectangle to display space.
    pub fn to_display_rect(&self, source: Rect) -> Rect {
        self.display.to_display_rect(source)
    }

    /// Highlight state of the size label.
    pub fn ratio_indicator(&self) -> RatioIndicator {
        RatioIndicator::classify(self.ratio, self.rect.width, self.rect.height)
    }

    fn accepts_pointer(&self) -> bool {
        self.image_size.is_some() && self.crop_enabled
    }

    fn hit_target(&self) -> HitTarget {
        HitTarget {
            display_rect: self.display_rect(),
            source_half_perimeter: self.rect.half_perimeter(),
            offset: self.display.origin(),
        }
    }

    fn refit(&mut self) -> Result<(), CropError> {
        let (width, height) = self.source_size().ok_or(CropError::NoImage)?;
        self.display = DisplayTransform::fit(width, height, self.canvas)?;
        Ok(())
    }

    fn confined(&self, rect: Rect) -> Rect {
        match self.source_size() {
            Some((width, height)) => confine(rect, self.ratio, width, height),
            None => rect,
        }
    }

    /// Confine and store `rect`, bumping the revision if it changed.
    fn commit(&mut self, rect: Rect) -> Rect {
        let confined = self.confined(rect);
        if confined != self.rect {
            self.rect = confined;
            self.revision += 1;
        }
        self.rect
    }

    /// Confine and store `rect`, always bumping the revision.
    fn commit_forced(&mut self, rect: Rect) -> Rect {
        self.rect = self.confined(rect);
        self.revision += 1;
        self.rect
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
