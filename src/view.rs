//! View-hierarchy data model used for capture and sanitization.
//!
//! Tests build a small tree of [`View`] nodes describing the already-measured,
//! already-laid-out surface they want captured. The closed set of node kinds
//! mirrors the widget classes that matter to render tests: containers,
//! text inputs (whose caret blinks), image displays (which may host a running
//! animation), and plain blocks for everything else.

/// One node of a view hierarchy.
///
/// Positions are relative to the parent, sizes are the final measured sizes;
/// layout is assumed complete before a view reaches the harness, and nothing
/// in this crate alters it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Horizontal offset within the parent.
    pub x: u32,
    /// Vertical offset within the parent.
    pub y: u32,
    /// Measured width.
    pub width: u32,
    /// Measured height.
    pub height: u32,
    /// RGBA background fill.
    pub background: [u8; 4],
    /// Kind-specific state.
    pub kind: ViewKind,
}

/// The closed set of node kinds a view tree is made of.
///
/// Adding support for a new widget class means adding a variant here and a
/// matching rule in [`crate::sanitize`]; the traversal itself stays unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
    /// Container node; children are kept in paint order.
    Group { children: Vec<View> },
    /// Text-input node with a caret that blinks while `cursor_visible` is set.
    TextInput { text: String, cursor_visible: bool },
    /// Image-display node, optionally hosting a frame animation.
    Image { animation: Option<FrameAnimation> },
    /// Any other leaf widget; renders as its background fill.
    Block,
}

/// A looping frame animation hosted by an image view.
///
/// Frames are flat RGBA colors; the harness only cares about which frame is
/// showing and whether the animation is still running when a capture happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAnimation {
    frames: Vec<[u8; 4]>,
    current_frame: usize,
    running: bool,
}

impl FrameAnimation {
    /// Creates a stopped animation showing its first frame.
    pub fn new(frames: Vec<[u8; 4]>) -> Self {
        Self {
            frames,
            current_frame: 0,
            running: false,
        }
    }

    /// Starts the animation from whatever frame is currently showing.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Advances to the next frame, wrapping around. No-op while stopped.
    pub fn advance(&mut self) {
        if self.running && !self.frames.is_empty() {
            self.current_frame = (self.current_frame + 1) % self.frames.len();
        }
    }

    /// Stops the animation and rewinds to the first frame, so a stopped
    /// animation always shows the same deterministic state.
    pub fn stop(&mut self) {
        self.running = false;
        self.current_frame = 0;
    }

    /// Whether the animation is currently running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Index of the frame currently showing.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Color of the frame currently showing, if any frames exist.
    pub fn current_color(&self) -> Option<[u8; 4]> {
        self.frames.get(self.current_frame).copied()
    }
}

impl View {
    /// Container node with the given children, painted in order.
    pub fn group(width: u32, height: u32, children: Vec<View>) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            background: [255, 255, 255, 255],
            kind: ViewKind::Group { children },
        }
    }

    /// Text-input node; the caret starts out visible, as it would on screen.
    pub fn text_input(width: u32, height: u32, text: impl Into<String>) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            background: [255, 255, 255, 255],
            kind: ViewKind::TextInput {
                text: text.into(),
                cursor_visible: true,
            },
        }
    }

    /// Image-display node, with or without a hosted animation.
    pub fn image(width: u32, height: u32, animation: Option<FrameAnimation>) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            background: [255, 255, 255, 255],
            kind: ViewKind::Image { animation },
        }
    }

    /// Plain leaf filled with `background`.
    pub fn block(width: u32, height: u32, background: [u8; 4]) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            background,
            kind: ViewKind::Block,
        }
    }

    /// Repositions the node within its parent.
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Replaces the background fill.
    pub fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self
    }
}
