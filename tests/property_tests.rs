use proptest::prelude::*;
use render_gold::naming;
use render_gold::view::{FrameAnimation, View, ViewKind};
use render_gold::{SoftwarePainter, ViewCapture, sanitize};

/// Arbitrary view hierarchies, including blinking carets and running
/// animations for the sanitizer to quiet.
fn arb_view() -> impl Strategy<Value = View> {
    let leaf = prop_oneof![
        (
            1u32..16,
            1u32..16,
            0u32..8,
            0u32..8,
            proptest::array::uniform4(any::<u8>()),
        )
            .prop_map(|(w, h, x, y, bg)| View::block(w, h, bg).at(x, y)),
        (1u32..16, 1u32..16, "[a-z]{0,12}").prop_map(|(w, h, text)| View::text_input(w, h, text)),
        (
            1u32..16,
            1u32..16,
            proptest::collection::vec(proptest::array::uniform4(any::<u8>()), 1..4),
            any::<bool>(),
        )
            .prop_map(|(w, h, frames, running)| {
                let mut animation = FrameAnimation::new(frames);
                if running {
                    animation.start();
                    animation.advance();
                }
                View::image(w, h, Some(animation))
            }),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        (1u32..32, 1u32..32, proptest::collection::vec(inner, 0..4))
            .prop_map(|(w, h, children)| View::group(w, h, children))
    })
}

fn assert_calm(view: &View) {
    match &view.kind {
        ViewKind::Group { children } => {
            for child in children {
                assert_calm(child);
            }
        }
        ViewKind::TextInput { cursor_visible, .. } => assert!(!*cursor_visible),
        ViewKind::Image {
            animation: Some(animation),
        } => {
            assert!(!animation.is_running());
            assert_eq!(animation.current_frame(), 0);
        }
        ViewKind::Image { animation: None } | ViewKind::Block => {}
    }
}

proptest! {
    #[test]
    fn base_name_is_deterministic_and_keeps_its_shape(
        class in "[A-Za-z][A-Za-z0-9_]{0,12}",
        variant in proptest::option::of("[A-Za-z0-9]{1,8}"),
        night in proptest::option::of("[A-Za-z0-9]{1,8}"),
        id in "[A-Za-z0-9_]{1,16}",
        revision in any::<u32>(),
    ) {
        let first = naming::base_name(&class, variant.as_deref(), night.as_deref(), &id, revision);
        let second = naming::base_name(&class, variant.as_deref(), night.as_deref(), &id, revision);
        prop_assert_eq!(&first, &second);
        let prefix = format!("{class}.");
        prop_assert!(first.starts_with(&prefix));
        let suffix = format!(".rev_{revision}");
        prop_assert!(first.ends_with(&suffix));
        prop_assert_eq!(first.matches('.').count(), 2);
    }

    #[test]
    fn base_name_never_panics(class in "\\PC*", id in "\\PC*", revision in any::<u32>()) {
        // Composition treats names as opaque strings; any input must come
        // back out embedded in the usual shape.
        let name = naming::base_name(&class, None, None, &id, revision);
        let suffix = format!(".rev_{revision}");
        prop_assert!(name.ends_with(&suffix));
    }

    #[test]
    fn sanitize_quiets_every_node_and_is_idempotent(view in arb_view()) {
        let mut once = view.clone();
        sanitize(&mut once);
        assert_calm(&once);

        let mut twice = once.clone();
        sanitize(&mut twice);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn capture_is_deterministic_and_sized_like_the_view(view in arb_view()) {
        let painter = SoftwarePainter;
        let first = painter.capture_view(&view);
        let second = painter.capture_view(&view);
        prop_assert_eq!(first.dimensions(), (view.width, view.height));
        prop_assert_eq!(first.as_raw(), second.as_raw());
    }
}
