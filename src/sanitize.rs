//! Removes known sources of non-determinism from a view tree before capture.
//!
//! Rendering the same UI twice can still produce different pixels: text-input
//! carets blink, animations sit on whichever frame the clock landed on. This
//! pass freezes that volatile state in place so a capture is reproducible.
//! Layout is never touched; views are assumed measured and positioned before
//! they reach the harness.

use crate::view::{View, ViewKind};

/// Walks `view` depth-first, in child order, and neutralizes volatile visual
/// state in place:
///
/// - text inputs: the caret is hidden;
/// - image displays: a hosted animation is stopped and rewound to its first
///   frame;
/// - containers: every child is visited in order.
///
/// Running the pass twice has the same effect as running it once, and the
/// tree's structure and layout (`x`, `y`, `width`, `height`, backgrounds)
/// come out exactly as they went in.
pub fn sanitize(view: &mut View) {
    scrub_node(view);

    if let ViewKind::Group { children } = &mut view.kind {
        for child in children {
            sanitize(child);
        }
    }
}

/// Per-node rules, kept apart from the traversal so new node kinds get a new
/// match arm here without reshaping the walk.
fn scrub_node(view: &mut View) {
    match &mut view.kind {
        ViewKind::TextInput { cursor_visible, .. } => *cursor_visible = false,
        ViewKind::Image {
            animation: Some(animation),
        } => animation.stop(),
        ViewKind::Group { .. } | ViewKind::Image { animation: None } | ViewKind::Block => {}
    }
}
