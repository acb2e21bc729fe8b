//! The render-test session: test lifecycle, UI-thread capture, and golden
//! emission.
//!
//! A [`RenderTestSession`] lives for a whole test class. The surrounding
//! test framework calls [`start_test`](RenderTestSession::start_test) as each
//! test begins, which re-attributes the session to that test and resets its
//! per-test state; the test then calls [`render`](RenderTestSession::render)
//! once per UI state it wants compared. Rendering happens on the UI thread
//! via the session's dispatcher while the calling test blocks.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use image::RgbaImage;
use tracing::info;

use crate::artifact::{ArtifactPair, ArtifactWriter, GoldKeys};
use crate::capture::{SoftwarePainter, ViewCapture};
use crate::config::{TestConfig, resolve_output_root};
use crate::device::DeviceIdentity;
use crate::dispatch::{InlineDispatcher, UiDispatcher, run_blocking};
use crate::naming::{self, NIGHT_MODE_DISABLED_PREFIX, NIGHT_MODE_ENABLED_PREFIX};
use crate::view::View;

/// Feature tag a test must declare before it may render goldens. Keeping the
/// tag mandatory lets the external runner discover which tests produce
/// artifacts.
pub const RENDER_TEST_FEATURE: &str = "RenderTest";

/// What the test framework knows about a test that is about to run.
#[derive(Debug, Clone)]
pub struct TestDescription {
    class_name: String,
    method_name: String,
    features: Vec<String>,
}

impl TestDescription {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        features: &[&str],
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Possibly qualified class name, exactly as handed over by the
    /// framework.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Class name with any leading path stripped, for `pkg.Widget` and
    /// `crate::tests::Widget` alike. Golden file names use this form.
    pub fn simple_class_name(&self) -> &str {
        let tail = self
            .class_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.class_name);
        tail.rsplit("::").next().unwrap_or(tail)
    }

    /// `{class}#{method}` with the class fully qualified. The external
    /// runner uses this to split results when several tests run batched in
    /// one process.
    pub fn full_test_name(&self) -> String {
        format!("{}#{}", self.class_name, self.method_name)
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Identity snapshot taken when a test starts; everything golden naming and
/// metadata need later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    /// Simple class name used in golden file names.
    pub test_class_name: String,
    /// `{qualified class}#{method}` recorded in the gold keys.
    pub full_test_name: String,
    /// Whether the test declared [`RENDER_TEST_FEATURE`].
    pub has_render_feature: bool,
}

impl TestIdentity {
    pub fn from_description(description: &TestDescription) -> Self {
        Self {
            test_class_name: description.simple_class_name().to_string(),
            full_test_name: description.full_test_name(),
            has_render_feature: description.has_feature(RENDER_TEST_FEATURE),
        }
    }
}

/// Per-test naming state: the variant and night-mode prefixes woven into
/// golden names. Reset for every test so one test's prefixes never leak into
/// the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderVariant {
    variant_prefix: Option<String>,
    night_mode_prefix: Option<&'static str>,
}

impl RenderVariant {
    /// Sets the prefix parameterized tests insert at the front of the golden
    /// description. An empty prefix behaves like no prefix.
    pub fn set_variant_prefix(&mut self, prefix: impl Into<String>) {
        self.variant_prefix = Some(prefix.into());
    }

    /// Records whether night mode was on for the captures that follow. Either
    /// answer adds a prefix; only a test that never calls this omits one.
    pub fn set_night_mode_enabled(&mut self, enabled: bool) {
        self.night_mode_prefix = Some(if enabled {
            NIGHT_MODE_ENABLED_PREFIX
        } else {
            NIGHT_MODE_DISABLED_PREFIX
        });
    }

    pub fn variant_prefix(&self) -> Option<&str> {
        self.variant_prefix.as_deref()
    }

    pub fn night_mode_prefix(&self) -> Option<&str> {
        self.night_mode_prefix
    }
}

/// Whether a test is currently running.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Idle,
    Active(TestIdentity),
}

/// Drives render tests for one test class.
pub struct RenderTestSession {
    config: TestConfig,
    writer: ArtifactWriter,
    device: DeviceIdentity,
    capture: Arc<dyn ViewCapture>,
    dispatcher: Box<dyn UiDispatcher>,
    state: SessionState,
    variant: RenderVariant,
}

impl RenderTestSession {
    /// Creates a session with ambient defaults: the configured output root,
    /// the detected device identity, software capture, and inline dispatch.
    /// The `with_*` methods swap any of these out.
    pub fn new(config: TestConfig) -> Self {
        Self {
            config,
            writer: ArtifactWriter::new(resolve_output_root(None)),
            device: DeviceIdentity::detect(),
            capture: Arc::new(SoftwarePainter),
            dispatcher: Box::new(InlineDispatcher),
            state: SessionState::Idle,
            variant: RenderVariant::default(),
        }
    }

    /// Redirects artifacts below `root` instead of the configured output
    /// root.
    pub fn with_output_root(mut self, root: impl AsRef<Path>) -> Self {
        self.writer = ArtifactWriter::new(root.as_ref());
        self
    }

    /// Overrides the detected device identity, e.g. to pin goldens to a
    /// fixed model in hermetic tests.
    pub fn with_device_identity(mut self, device: DeviceIdentity) -> Self {
        self.device = device;
        self
    }

    /// Swaps the capture backend.
    pub fn with_capture(mut self, capture: Arc<dyn ViewCapture>) -> Self {
        self.capture = capture;
        self
    }

    /// Swaps the UI dispatcher, e.g. for a dedicated UI thread.
    pub fn with_dispatcher(mut self, dispatcher: Box<dyn UiDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Begins a test: snapshots its identity and resets the per-test naming
    /// state. There is no matching end-of-test call; the next `start_test`
    /// re-attributes the session.
    pub fn start_test(&mut self, description: &TestDescription) {
        self.variant = RenderVariant::default();
        self.state = SessionState::Active(TestIdentity::from_description(description));
        info!(test = %description.full_test_name(), "Render test starting");
    }

    /// Sets the variant prefix for the captures that follow in this test.
    pub fn set_variant_prefix(&mut self, prefix: impl Into<String>) {
        self.variant.set_variant_prefix(prefix);
    }

    /// Records whether night mode is on for the captures that follow in this
    /// test.
    pub fn set_night_mode_enabled(&mut self, enabled: bool) {
        self.variant.set_night_mode_enabled(enabled);
    }

    /// Current per-test naming state.
    pub fn variant(&self) -> &RenderVariant {
        &self.variant
    }

    /// Directory golden pairs are written into.
    pub fn gold_dir(&self) -> &Path {
        self.writer.gold_dir()
    }

    /// Captures `view` on the UI thread and writes the golden pair for `id`.
    ///
    /// The view is rendered exactly as given; callers wanting stable output
    /// should run [`crate::sanitize::sanitize`] over it first.
    ///
    /// # Panics
    ///
    /// Panics when no test is active, when the running test did not declare
    /// [`RENDER_TEST_FEATURE`], or when the view has a zero dimension. Those
    /// are bugs in the calling test, not I/O failures, and fail the test
    /// immediately.
    #[tracing::instrument(skip(self, view))]
    pub fn render(&self, view: &View, id: &str) -> Result<ArtifactPair> {
        let identity = self.active_identity();

        let subject = view.clone();
        let capture = Arc::clone(&self.capture);
        let captured = run_blocking(self.dispatcher.as_ref(), move || {
            if subject.width == 0 || subject.height == 0 {
                return Err((subject.width, subject.height));
            }
            Ok(capture.capture_view(&subject))
        });

        let bitmap = match captured {
            Ok(bitmap) => bitmap,
            Err((width, height)) => panic!("Invalid view dimensions: {width}x{height}"),
        };

        self.write_pair(identity, &bitmap, id)
    }

    /// Writes the golden pair for a bitmap captured elsewhere. Tests should
    /// prefer [`render`](Self::render) when they hold a view.
    ///
    /// # Panics
    ///
    /// Panics when no test is active or when the running test did not
    /// declare [`RENDER_TEST_FEATURE`].
    #[tracing::instrument(skip(self, bitmap))]
    pub fn compare_for_result(&self, bitmap: &RgbaImage, id: &str) -> Result<ArtifactPair> {
        let identity = self.active_identity();
        self.write_pair(identity, bitmap, id)
    }

    fn active_identity(&self) -> &TestIdentity {
        let SessionState::Active(identity) = &self.state else {
            panic!("no render test is active; call start_test first");
        };
        assert!(
            identity.has_render_feature,
            "Render Tests must have the RenderTest feature."
        );
        identity
    }

    fn write_pair(
        &self,
        identity: &TestIdentity,
        bitmap: &RgbaImage,
        id: &str,
    ) -> Result<ArtifactPair> {
        let variant = self.variant.variant_prefix();
        let night = self.variant.night_mode_prefix();
        let revision = self.config.revision();
        let class = identity.test_class_name.as_str();

        let image = self.writer.write_image(
            &naming::image_name(class, variant, night, id, revision),
            bitmap,
        )?;
        let keys = GoldKeys::new(&self.config, &self.device, &identity.full_test_name);
        let metadata = self.writer.write_metadata(
            &naming::metadata_name(class, variant, night, id, revision),
            &keys,
        )?;

        info!(
            golden = %naming::base_name(class, variant, night, id, revision),
            device = %self.device.model_sdk_identifier(),
            "Wrote golden pair"
        );
        Ok(ArtifactPair { image, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Corpus;

    fn render_description() -> TestDescription {
        TestDescription::new("pkg.WidgetTest", "testBig", &[RENDER_TEST_FEATURE])
    }

    fn session_in(dir: &Path) -> RenderTestSession {
        let config = TestConfig::builder().corpus(Corpus::Public).build();
        RenderTestSession::new(config).with_output_root(dir)
    }

    #[test]
    fn simple_class_name_strips_dotted_and_pathed_prefixes() {
        let dotted = TestDescription::new("org.example.WidgetTest", "testBig", &[]);
        assert_eq!(dotted.simple_class_name(), "WidgetTest");

        let pathed = TestDescription::new("ui::widgets::WidgetTest", "testBig", &[]);
        assert_eq!(pathed.simple_class_name(), "WidgetTest");

        let bare = TestDescription::new("WidgetTest", "testBig", &[]);
        assert_eq!(bare.simple_class_name(), "WidgetTest");
    }

    #[test]
    fn full_test_name_keeps_the_qualified_class() {
        let description = render_description();
        assert_eq!(description.full_test_name(), "pkg.WidgetTest#testBig");
    }

    #[test]
    fn identity_snapshot_records_the_feature_check() {
        let with = TestIdentity::from_description(&render_description());
        assert!(with.has_render_feature);
        assert_eq!(with.test_class_name, "WidgetTest");

        let without =
            TestIdentity::from_description(&TestDescription::new("pkg.Other", "t", &["UiCatalog"]));
        assert!(!without.has_render_feature);
    }

    #[test]
    fn start_test_resets_prefixes_from_the_previous_test() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        session.start_test(&render_description());
        session.set_variant_prefix("Tablet");
        session.set_night_mode_enabled(true);
        assert_eq!(session.variant().variant_prefix(), Some("Tablet"));

        session.start_test(&render_description());
        assert_eq!(session.variant().variant_prefix(), None);
        assert_eq!(session.variant().night_mode_prefix(), None);
    }

    #[test]
    #[should_panic(expected = "no render test is active")]
    fn render_outside_a_test_panics() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let _ = session.render(&View::block(4, 4, [0, 0, 0, 255]), "id");
    }

    #[test]
    #[should_panic(expected = "RenderTest feature")]
    fn render_without_the_feature_panics() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.start_test(&TestDescription::new("pkg.WidgetTest", "testBig", &[]));
        let _ = session.render(&View::block(4, 4, [0, 0, 0, 255]), "id");
    }

    #[test]
    #[should_panic(expected = "Invalid view dimensions: 0x20")]
    fn render_of_a_zero_width_view_panics() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.start_test(&render_description());
        let _ = session.render(&View::block(0, 20, [0, 0, 0, 255]), "id");
    }
}
