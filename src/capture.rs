//! Screenshot-capture seam and the built-in software rasterizer.
//!
//! The session never rasterizes views itself; it hands the job to a
//! [`ViewCapture`] implementation. Production harnesses plug in whatever
//! backend owns the real surface (GPU readback, a windowing toolkit's
//! capture API); [`SoftwarePainter`] is the deterministic CPU reference
//! backend used headlessly and throughout this crate's tests.

use image::{Rgba, RgbaImage};

use crate::view::{View, ViewKind};

/// Rasterizes a measured view tree into an RGBA bitmap.
///
/// Implementations are invoked from the UI-owning execution context (the
/// session routes every capture through its [`crate::dispatch::UiDispatcher`])
/// and must be deterministic for a given tree: same input, same pixels.
pub trait ViewCapture: Send + Sync {
    /// Produces a `view.width` x `view.height` bitmap of `view`.
    fn capture_view(&self, view: &View) -> RgbaImage;
}

/// Deterministic CPU rasterizer over the [`View`] model.
///
/// Paint rules are intentionally simple but sensitive to exactly the state the
/// sanitizer manages: a visible caret and an animation's current frame both
/// change pixels, so sanitization is observable in captured output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwarePainter;

impl ViewCapture for SoftwarePainter {
    fn capture_view(&self, view: &View) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(view.width, view.height, Rgba(view.background));
        paint(&mut canvas, view, 0, 0);
        canvas
    }
}

fn paint(canvas: &mut RgbaImage, view: &View, origin_x: u32, origin_y: u32) {
    fill_rect(
        canvas,
        origin_x,
        origin_y,
        view.width,
        view.height,
        view.background,
    );

    match &view.kind {
        ViewKind::Block => {}
        ViewKind::Image { animation } => {
            if let Some(color) = animation.as_ref().and_then(|a| a.current_color()) {
                fill_rect(canvas, origin_x, origin_y, view.width, view.height, color);
            }
        }
        ViewKind::TextInput {
            text,
            cursor_visible,
        } => {
            paint_text_band(canvas, view, text, origin_x, origin_y);
            if *cursor_visible {
                paint_caret(canvas, view, text, origin_x, origin_y);
            }
        }
        ViewKind::Group { children } => {
            for child in children {
                paint(
                    canvas,
                    child,
                    origin_x.saturating_add(child.x),
                    origin_y.saturating_add(child.y),
                );
            }
        }
    }
}

/// A horizontal band whose color is derived from the text content, standing in
/// for glyph rendering while staying deterministic across platforms.
fn paint_text_band(canvas: &mut RgbaImage, view: &View, text: &str, origin_x: u32, origin_y: u32) {
    if view.height < 3 {
        return;
    }
    let tone = text
        .bytes()
        .fold(0x35u8, |acc, b| acc.wrapping_mul(31).wrapping_add(b));
    let color = [tone, tone.wrapping_add(85), tone.wrapping_add(170), 255];
    let band_top = origin_y + view.height / 3;
    fill_rect(canvas, origin_x, band_top, view.width, view.height / 3, color);
}

/// One caret column after the text band, black, full node height.
fn paint_caret(canvas: &mut RgbaImage, view: &View, text: &str, origin_x: u32, origin_y: u32) {
    if view.width == 0 {
        return;
    }
    let advance = (text.chars().count() as u32).saturating_mul(2);
    let column = origin_x + (1 + advance).min(view.width - 1);
    fill_rect(canvas, column, origin_y, 1, view.height, [0, 0, 0, 255]);
}

fn fill_rect(canvas: &mut RgbaImage, x0: u32, y0: u32, width: u32, height: u32, color: [u8; 4]) {
    let x_end = x0.saturating_add(width).min(canvas.width());
    let y_end = y0.saturating_add(height).min(canvas.height());
    for y in y0..y_end {
        for x in x0..x_end {
            canvas.put_pixel(x, y, Rgba(color));
        }
    }
}
