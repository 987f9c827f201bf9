// overlay.rs - Overlay Window Model
//
// State behind one floating staff chart (or slider) window: the retained
// source image, the bitmap rendered for the current zoom, and pointer handling
// for move/resize. The iced window itself is opened and driven by `app.rs`;
// this module only decides what that window should do.
//
// Lifecycle: Hidden -> Shown -> Closed. Closed is terminal and closing twice
// is a no-op.

use iced::widget::image::Handle;
use iced::{mouse, window, Point, Size};
use image::RgbaImage;
use log::{debug, info};

use crate::constants::overlay as overlay_const;
use crate::render;

// ============================================================================
// Hit testing
// ============================================================================

/// Where the pointer is relative to the window's resize band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl HitZone {
    /// Classify a window-local point. Corners win over edges.
    pub fn classify(pos: Point, size: Size, margin: f32) -> Self {
        let left = pos.x < margin;
        let right = pos.x > size.width - margin;
        let top = pos.y < margin;
        let bottom = pos.y > size.height - margin;

        match (left, right, top, bottom) {
            (true, _, true, _) => Self::TopLeft,
            (_, true, true, _) => Self::TopRight,
            (true, _, _, true) => Self::BottomLeft,
            (_, true, _, true) => Self::BottomRight,
            (true, _, _, _) => Self::Left,
            (_, true, _, _) => Self::Right,
            (_, _, true, _) => Self::Top,
            (_, _, _, true) => Self::Bottom,
            _ => Self::Center,
        }
    }

    /// Center is the caption area; everything else resizes
    pub fn is_resize(self) -> bool {
        self != Self::Center
    }

    pub fn interaction(self) -> mouse::Interaction {
        match self {
            Self::Center => mouse::Interaction::Grab,
            Self::Left | Self::Right => mouse::Interaction::ResizingHorizontally,
            Self::Top | Self::Bottom => mouse::Interaction::ResizingVertically,
            Self::TopLeft | Self::BottomRight => mouse::Interaction::ResizingDiagonallyDown,
            Self::TopRight | Self::BottomLeft => mouse::Interaction::ResizingDiagonallyUp,
        }
    }

    fn moves_left_edge(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    fn moves_right_edge(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    fn moves_bottom_edge(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

// ============================================================================
// Edge resizing
// ============================================================================

/// An edge or corner drag in progress, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    zone: HitZone,
    start_pointer: Point,
    start_position: Point,
    start_size: Size,
}

impl ResizeSession {
    pub fn new(zone: HitZone, pointer: Point, position: Point, size: Size) -> Self {
        Self {
            zone,
            start_pointer: pointer,
            start_position: position,
            start_size: size,
        }
    }

    /// Window rectangle for the current pointer. The opposite edge stays put
    /// and neither side drops below one pixel.
    pub fn update(&self, pointer: Point) -> (Point, Size) {
        let dx = pointer.x - self.start_pointer.x;
        let dy = pointer.y - self.start_pointer.y;
        let Point { mut x, mut y } = self.start_position;
        let Size {
            mut width,
            mut height,
        } = self.start_size;

        if self.zone.moves_left_edge() {
            width = (self.start_size.width - dx).max(1.0);
            x = self.start_position.x + self.start_size.width - width;
        } else if self.zone.moves_right_edge() {
            width = (self.start_size.width + dx).max(1.0);
        }

        if self.zone.moves_top_edge() {
            height = (self.start_size.height - dy).max(1.0);
            y = self.start_position.y + self.start_size.height - height;
        } else if self.zone.moves_bottom_edge() {
            height = (self.start_size.height + dy).max(1.0);
        }

        (Point::new(x, y), Size::new(width, height))
    }
}

/// What the window should do in response to pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    None,
    /// Hand the move over to the window system
    DragMove,
    /// Move and resize the window to this rectangle
    Resize { position: Point, size: Size },
}

// ============================================================================
// Overlay window
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Hidden,
    Shown,
    Closed,
}

/// Per-window options
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub title: String,
    /// Pixels of exactly this color become transparent
    pub chroma_key: Option<[u8; 3]>,
    /// Carried along for callers; the window does not act on it
    pub overlay_enabled: bool,
    pub initial_percent: u8,
}

impl OverlayConfig {
    pub fn primary(chroma_key: Option<[u8; 3]>, overlay_enabled: bool, initial_percent: u8) -> Self {
        Self {
            title: overlay_const::PRIMARY_TITLE.to_string(),
            chroma_key,
            overlay_enabled,
            initial_percent,
        }
    }

    pub fn slider(initial_percent: u8) -> Self {
        Self {
            title: overlay_const::SLIDER_TITLE.to_string(),
            chroma_key: Some(overlay_const::SLIDER_KEY),
            overlay_enabled: false,
            initial_percent,
        }
    }
}

pub struct OverlayWindow {
    config: OverlayConfig,
    state: OverlayState,
    /// Never replaced; every zoom level is rendered from this
    source: RgbaImage,
    /// Bitmap for the current zoom, `None` at 0%
    scaled: Option<Handle>,
    scaled_size: Option<(u32, u32)>,
    percent: u8,
    /// Client size last requested or reported
    size: Size,
    /// Outer position, when the window system reports it
    position: Option<Point>,
    cursor: Option<Point>,
    resize: Option<ResizeSession>,
}

impl std::fmt::Debug for OverlayWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayWindow")
            .field("title", &self.config.title)
            .field("state", &self.state)
            .field("source", &self.source.dimensions())
            .field("scaled_size", &self.scaled_size)
            .field("percent", &self.percent)
            .finish()
    }
}

impl OverlayWindow {
    /// Take ownership of `image`, key out the transparency color and render
    /// at the configured zoom. The window starts hidden.
    pub fn new(mut image: RgbaImage, config: OverlayConfig) -> Self {
        if let Some(key) = config.chroma_key {
            render::apply_transparency_key(&mut image, key);
        }
        let mut overlay = Self {
            state: OverlayState::Hidden,
            source: image,
            scaled: None,
            scaled_size: None,
            percent: config.initial_percent,
            size: Size::new(overlay_const::EMPTY_SIZE, overlay_const::EMPTY_SIZE),
            position: None,
            cursor: None,
            resize: None,
            config,
        };
        overlay.set_scale_percent(overlay.percent);
        overlay
    }

    /// iced settings for opening this window
    pub fn window_settings(&self) -> window::Settings {
        window::Settings {
            size: self.size,
            position: window::Position::Centered,
            decorations: false,
            transparent: true,
            resizable: true,
            level: window::Level::AlwaysOnTop,
            ..Default::default()
        }
    }

    pub fn show(&mut self) {
        if self.state == OverlayState::Hidden {
            self.state = OverlayState::Shown;
            info!("{} window shown at {}%", self.config.title, self.percent);
        }
    }

    /// Release the rendered bitmap. Returns false if already closed.
    pub fn close(&mut self) -> bool {
        if self.state == OverlayState::Closed {
            return false;
        }
        self.state = OverlayState::Closed;
        self.scaled = None;
        self.scaled_size = None;
        self.resize = None;
        info!("{} window closed", self.config.title);
        true
    }

    /// Re-render for `percent` and return the client size the window must
    /// take. At 0% the bitmap is dropped and the window keeps its size.
    pub fn set_scale_percent(&mut self, percent: u8) -> Option<Size> {
        if self.state == OverlayState::Closed {
            return None;
        }
        self.percent = percent;

        // Assigning drops the previous bitmap; the source is untouched
        match render::render(&self.source, percent) {
            Some(scaled) => {
                let (w, h) = scaled.dimensions();
                self.scaled = Some(Handle::from_rgba(w, h, scaled.into_raw()));
                self.scaled_size = Some((w, h));
                self.size = Size::new(w as f32, h as f32);
                debug!("{} rendered at {}%: {}x{}", self.config.title, percent, w, h);
                Some(self.size)
            }
            None => {
                self.scaled = None;
                self.scaled_size = None;
                debug!("{} cleared at 0%", self.config.title);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Window system events
    // ------------------------------------------------------------------

    pub fn opened(&mut self, position: Option<Point>, size: Size) {
        self.position = position;
        self.size = size;
    }

    pub fn moved(&mut self, position: Point) {
        self.position = Some(position);
    }

    /// Edge resizing ends here; the bitmap is not re-rendered
    pub fn resized(&mut self, size: Size) {
        self.size = size;
    }

    // ------------------------------------------------------------------
    // Pointer input (window-local coordinates)
    // ------------------------------------------------------------------

    pub fn hovered_zone(&self) -> Option<HitZone> {
        self.cursor
            .map(|pos| HitZone::classify(pos, self.size, overlay_const::RESIZE_MARGIN))
    }

    /// Primary button pressed at the last known cursor position
    pub fn pointer_pressed(&mut self) -> PointerAction {
        let Some(cursor) = self.cursor else {
            return PointerAction::None;
        };
        let zone = HitZone::classify(cursor, self.size, overlay_const::RESIZE_MARGIN);
        if !zone.is_resize() {
            return PointerAction::DragMove;
        }

        let origin = self.position.unwrap_or(Point::ORIGIN);
        let pointer = Point::new(origin.x + cursor.x, origin.y + cursor.y);
        self.resize = Some(ResizeSession::new(zone, pointer, origin, self.size));
        PointerAction::None
    }

    pub fn pointer_moved(&mut self, local: Point) -> PointerAction {
        self.cursor = Some(local);
        let Some(session) = self.resize else {
            return PointerAction::None;
        };

        let origin = self.position.unwrap_or(Point::ORIGIN);
        let pointer = Point::new(origin.x + local.x, origin.y + local.y);
        let (position, size) = session.update(pointer);
        if self.position.is_some() {
            self.position = Some(position);
        }
        self.size = size;
        PointerAction::Resize { position, size }
    }

    pub fn pointer_released(&mut self) {
        self.resize = None;
    }

    pub fn pointer_left(&mut self) {
        if self.resize.is_none() {
            self.cursor = None;
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == OverlayState::Closed
    }

    pub fn overlay_enabled(&self) -> bool {
        self.config.overlay_enabled
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn handle(&self) -> Option<&Handle> {
        self.scaled.as_ref()
    }

    pub fn scaled_size(&self) -> Option<(u32, u32)> {
        self.scaled_size
    }

    pub fn client_size(&self) -> Size {
        self.size
    }

    /// Retained image with the transparency key already applied
    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    pub fn source_size(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// Whether the position is known, so left/top resizing can move the window
    pub fn position_known(&self) -> bool {
        self.position.is_some()
    }
}
