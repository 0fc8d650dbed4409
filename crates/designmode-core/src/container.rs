//! Positionable screen containers and their editable properties.
//!
//! A container is anything the editor can grab: window-like containers carry
//! the configurable text properties, image-like containers carry rotation,
//! scale and anchor for alpha-tested hit testing. Most editor behavior is
//! shared; the category split only shows up in hit testing and the property
//! set.

use crate::config::DesignConfig;
use crate::formula::{self, EvalContext};
use crate::platform::Platform;
use crate::store::LayoutRecord;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Built-in window defaults used when neither a custom value nor a config
/// override is set.
pub const STANDARD_PADDING: f64 = 18.0;
pub const STANDARD_FONT_SIZE: f64 = 28.0;
pub const STANDARD_LINE_HEIGHT: f64 = 36.0;
pub const STANDARD_BACK_OPACITY: f64 = 192.0;

/// Role a window plays for the outward command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerRole {
    Message,
    Choice,
    NumberInput,
}

impl ContainerRole {
    /// Windows the `ignore_message_windows` setting leaves alone.
    pub fn is_message_family(self) -> bool {
        matches!(
            self,
            ContainerRole::Message | ContainerRole::Choice | ContainerRole::NumberInput
        )
    }
}

/// Open/close animation state the host reports for window-like containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenState {
    #[default]
    Open,
    Opening,
    Closing,
    Closed,
}

/// Container category, used to restrict snapping and editing to siblings of
/// the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerCategory {
    Window,
    Image,
}

/// Window-only configurable property set.
///
/// The formula-valued fields hold the text the user entered; they are
/// re-evaluated (and clamped) every time the effective value is read, so a
/// formula like `width / 24` keeps tracking its inputs. `None` falls back to
/// the config override, then the built-in standard.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowProps {
    pub contents_opacity: u8,
    pub padding: Option<String>,
    pub font_size: Option<String>,
    pub line_height: Option<String>,
    pub back_opacity: Option<String>,
    /// Drives height recomputation; deliberately not persisted.
    pub line_count: u32,
    pub back_file: String,
    pub font_face: String,
}

impl Default for WindowProps {
    fn default() -> Self {
        Self {
            contents_opacity: 255,
            padding: None,
            font_size: None,
            line_height: None,
            back_opacity: None,
            line_count: 0,
            back_file: String::new(),
            font_face: String::new(),
        }
    }
}

impl WindowProps {
    pub fn padding(&self, config: &DesignConfig, ctx: &EvalContext) -> f64 {
        match &self.padding {
            Some(text) => formula::eval_clamped(text, 1.0, 100.0, ctx),
            None if config.default_padding > 0.0 => config.default_padding,
            None => STANDARD_PADDING,
        }
    }

    pub fn font_size(&self, config: &DesignConfig, ctx: &EvalContext) -> f64 {
        match &self.font_size {
            Some(text) => formula::eval_clamped(text, 1.0, 100.0, ctx),
            None if config.default_font_size > 0.0 => config.default_font_size,
            None => STANDARD_FONT_SIZE,
        }
    }

    pub fn line_height(&self, config: &DesignConfig, ctx: &EvalContext) -> f64 {
        match &self.line_height {
            Some(text) => formula::eval_clamped(text, 1.0, 2000.0, ctx),
            None if config.default_line_height > 0.0 => config.default_line_height,
            None => STANDARD_LINE_HEIGHT,
        }
    }

    pub fn back_opacity(&self, config: &DesignConfig, ctx: &EvalContext) -> f64 {
        match &self.back_opacity {
            Some(text) => formula::eval_clamped(text, 0.0, 255.0, ctx),
            None if config.default_back_opacity > 0.0 => config.default_back_opacity,
            None => STANDARD_BACK_OPACITY,
        }
    }
}

/// Image-only transform properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    /// Picture asset name; the host owns the actual bitmap.
    pub file: String,
    /// Rotation in radians.
    pub rotation: f64,
    pub scale: Vec2,
    /// Origin within the bitmap, (0,0) top-left to (1,1) bottom-right.
    pub anchor: Point,
}

impl Default for ImageProps {
    fn default() -> Self {
        Self {
            file: String::new(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            anchor: Point::ZERO,
        }
    }
}

/// Category-specific data of a container.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerKind {
    Window(WindowProps),
    Image(ImageProps),
}

/// One positionable, editable screen element.
#[derive(Debug, Clone)]
pub struct Container {
    class_name: String,
    /// Role for the outward command surface, if any.
    pub role: Option<ContainerRole>,
    /// Visibility switch id for configured extras, 0 = unconditional.
    pub switch_id: u32,
    position: Point,
    pub size: Size,
    pub visible: bool,
    pub opacity: u8,
    pub kind: ContainerKind,
    /// Containers the editor must never move (overlays, grid, cursors).
    pub move_disabled: bool,
    open_state: OpenState,
    locked: bool,
    holding: bool,
    drag_offset: Vec2,
    highlighted: bool,
    contents_dirty: bool,
    fallback_position: Option<Point>,
    pending_relock: bool,
}

impl Container {
    /// Create a window-like container covering `frame`.
    pub fn window(class_name: impl Into<String>, frame: Rect) -> Self {
        Self::new(
            class_name.into(),
            frame.origin(),
            frame.size(),
            ContainerKind::Window(WindowProps::default()),
        )
    }

    /// Create an image-like container.
    pub fn image(
        class_name: impl Into<String>,
        position: Point,
        size: Size,
        file: impl Into<String>,
    ) -> Self {
        Self::new(
            class_name.into(),
            position,
            size,
            ContainerKind::Image(ImageProps {
                file: file.into(),
                ..Default::default()
            }),
        )
    }

    fn new(class_name: String, position: Point, size: Size, kind: ContainerKind) -> Self {
        Self {
            class_name,
            role: None,
            switch_id: 0,
            position,
            size,
            visible: true,
            opacity: 255,
            kind,
            move_disabled: false,
            open_state: OpenState::default(),
            locked: false,
            holding: false,
            drag_offset: Vec2::ZERO,
            highlighted: false,
            contents_dirty: false,
            fallback_position: None,
            pending_relock: false,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn category(&self) -> ContainerCategory {
        match self.kind {
            ContainerKind::Window(_) => ContainerCategory::Window,
            ContainerKind::Image(_) => ContainerCategory::Image,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Raw bounding rectangle, position plus size.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Host-facing position write; a no-op while the editor owns the
    /// position.
    pub fn set_position(&mut self, position: Point) {
        if self.locked {
            return;
        }
        self.position = position;
    }

    /// Editor-internal position write, bypasses the lock.
    pub(crate) fn force_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub fn open_state(&self) -> OpenState {
        self.open_state
    }

    /// Host update of the open/close animation state. Completing a close
    /// animation applies a deferred lock request.
    pub fn set_open_state(&mut self, state: OpenState) {
        let finished_closing = self.open_state == OpenState::Closing && state != OpenState::Closing;
        self.open_state = state;
        if finished_closing && self.pending_relock {
            self.pending_relock = false;
            self.lock_position();
        }
    }

    /// Suspend editor-driven positioning: the next host position write wins,
    /// and the current position becomes the restore point for `lock`.
    pub fn unlock_position(&mut self) {
        self.locked = false;
        self.fallback_position = Some(self.position);
    }

    /// Resume editor-driven positioning, restoring the position captured by
    /// `unlock_position`. Deferred until the close animation finishes when
    /// the container is mid-close.
    pub fn lock_position(&mut self) {
        if self.open_state == OpenState::Closing {
            self.pending_relock = true;
            return;
        }
        self.locked = true;
        if let Some(p) = self.fallback_position {
            self.position = p;
        }
    }

    /// Start a drag: capture the pointer offset so the container does not
    /// jump to the cursor.
    pub(crate) fn begin_hold(&mut self, pointer: Point) {
        self.holding = true;
        self.drag_offset = pointer - self.position;
    }

    pub(crate) fn drag_offset(&self) -> Vec2 {
        self.drag_offset
    }

    /// Per-frame drag write; dragging takes ownership of the position.
    pub(crate) fn drag_to(&mut self, position: Point) {
        self.position = position;
        self.locked = true;
    }

    pub(crate) fn end_hold(&mut self) {
        self.holding = false;
    }

    /// Whether the origin is offset from the top-left corner; such
    /// containers skip sibling and edge snapping.
    pub fn anchored(&self) -> bool {
        match &self.kind {
            ContainerKind::Window(_) => false,
            ContainerKind::Image(img) => img.anchor != Point::ZERO,
        }
    }

    /// Whether the pointer can interact with this container at all.
    pub fn is_interactable(&self) -> bool {
        match &self.kind {
            ContainerKind::Window(w) => {
                (self.opacity > 0 || w.contents_opacity > 0)
                    && self.visible
                    && self.open_state == OpenState::Open
            }
            ContainerKind::Image(img) => {
                self.visible && !img.file.is_empty() && img.scale.x != 0.0 && img.scale.y != 0.0
            }
        }
    }

    /// Hit test the pointer against this container.
    ///
    /// Windows use their axis-aligned rectangle; images undo rotation and
    /// scale, then alpha-test the pixel under the pointer so transparent
    /// regions do not grab.
    pub fn hit_test(&self, pointer: Point, platform: &dyn Platform) -> bool {
        match &self.kind {
            ContainerKind::Window(_) => {
                let r = self.rect();
                pointer.x >= r.x0 && pointer.x <= r.x1 && pointer.y >= r.y0 && pointer.y <= r.y1
            }
            ContainerKind::Image(img) => self.image_hit(img, pointer, platform),
        }
    }

    fn image_hit(&self, img: &ImageProps, pointer: Point, platform: &dyn Platform) -> bool {
        let dx = pointer.x - self.position.x;
        let dy = pointer.y - self.position.y;
        let sin = (-img.rotation).sin();
        let cos = (-img.rotation).cos();
        let local_x = (dx * cos + dy * -sin).floor();
        let local_y = (dx * sin + dy * cos).floor();

        let bx = local_x / img.scale.x + img.anchor.x * self.size.width;
        let by = local_y / img.scale.y + img.anchor.y * self.size.height;
        if !platform.pixel_opaque(&img.file, bx, by) {
            return false;
        }

        let rx = self.position.x + local_x;
        let ry = self.position.y + local_y;
        let screen_w = self.size.width * img.scale.x;
        let screen_h = self.size.height * img.scale.y;
        let screen_x = self.position.x - img.anchor.x * screen_w;
        let screen_y = self.position.y - img.anchor.y * screen_h;
        let (min_x, max_x) = ordered(screen_x, screen_x + screen_w);
        let (min_y, max_y) = ordered(screen_y, screen_y + screen_h);
        rx >= min_x && rx <= max_x && ry >= min_y && ry <= max_y
    }

    /// Window height that fits `lines` text lines plus the frame padding.
    pub fn fitting_height(&self, lines: u32, config: &DesignConfig, ctx: &EvalContext) -> f64 {
        match &self.kind {
            ContainerKind::Window(w) => {
                f64::from(lines) * w.line_height(config, ctx) + w.padding(config, ctx) * 2.0
            }
            ContainerKind::Image(_) => self.size.height,
        }
    }

    /// Recompute the height from the line count, when one is set.
    pub(crate) fn apply_fitting_height(&mut self, config: &DesignConfig, ctx: &EvalContext) {
        let lines = match &self.kind {
            ContainerKind::Window(w) if w.line_count > 0 => w.line_count,
            _ => return,
        };
        self.size.height = self.fitting_height(lines, config, ctx);
    }

    /// Flag consumed by the host to re-render window contents after a
    /// property change or record load.
    pub fn take_contents_dirty(&mut self) -> bool {
        std::mem::take(&mut self.contents_dirty)
    }

    pub(crate) fn mark_contents_dirty(&mut self) {
        self.contents_dirty = true;
    }

    /// Capture the persisted attribute set for this container.
    pub fn capture_record(&self) -> LayoutRecord {
        let mut record = LayoutRecord {
            x: self.position.x,
            y: self.position.y,
            ..Default::default()
        };
        if let ContainerKind::Window(w) = &self.kind {
            record.width = Some(self.size.width);
            record.height = Some(self.size.height);
            record.opacity = Some(self.opacity);
            record.hidden = Some(!self.visible);
            record.padding = w.padding.clone();
            record.font_size = w.font_size.clone();
            record.line_height = w.line_height.clone();
            record.back_opacity = w.back_opacity.clone();
            record.back_file = Some(w.back_file.clone());
            record.font_face = Some(w.font_face.clone());
        }
        record
    }

    /// Overwrite this container's attributes from a record.
    ///
    /// Leaves the lock flag untouched: attach-time restoration locks, undo
    /// restoration does not. A `hidden` record can only take visibility
    /// away, never grant it back.
    pub fn apply_record(&mut self, record: &LayoutRecord) {
        self.position = Point::new(record.x, record.y);
        if let ContainerKind::Window(w) = &mut self.kind {
            if let Some(v) = record.width {
                self.size.width = v;
            }
            if let Some(v) = record.height {
                self.size.height = v;
            }
            if let Some(v) = record.opacity {
                self.opacity = v;
            }
            if let Some(hidden) = record.hidden {
                self.visible = self.visible && !hidden;
            }
            w.padding = record.padding.clone();
            w.font_size = record.font_size.clone();
            w.line_height = record.line_height.clone();
            w.back_opacity = record.back_opacity.clone();
            w.back_file = record.back_file.clone().unwrap_or_default();
            w.font_face = record.font_face.clone().unwrap_or_default();
            self.contents_dirty = true;
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
