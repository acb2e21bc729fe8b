//! Harness core for render tests: pixel captures of UI views compared
//! against golden baselines by the Skia Gold diffing service.
//!
//! The crate does no comparison itself. It prepares deterministic artifacts
//! for an external uploader: a PNG capture of the view plus a JSON document
//! of gold keys, both written under `{output_root}/skia_gold/` with names
//! that are stable across runs and machines.
//!
//! General usage:
//!
//! ```no_run
//! use render_gold::{Corpus, RenderTestSession, TestConfig, TestDescription, View, sanitize};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Required: pick a corpus so result visibility is an explicit decision.
//! let config = TestConfig::builder()
//!     .corpus(Corpus::Public)
//!     // Only needed once output changes enough to invalidate old goldens.
//!     .revision(2)
//!     // Optional note shown in the Gold web UI.
//!     .description("Material design rework")
//!     .build();
//! let mut session = RenderTestSession::new(config);
//!
//! // The test framework reports each test as it starts. The "RenderTest"
//! // feature is required before the session accepts captures.
//! session.start_test(&TestDescription::new(
//!     "ui::widgets::WidgetTest",
//!     "test_big_widget",
//!     &["RenderTest"],
//! ));
//!
//! // Set up the UI, then strip the flaky parts before capturing.
//! let mut widget = View::block(64, 48, [240, 240, 240, 255]);
//! sanitize(&mut widget);
//!
//! // Writes WidgetTest.big_widget.rev_2.png and .json.
//! session.render(&widget, "big_widget")?;
//! # Ok(())
//! # }
//! ```
//!
//! Golden names carry the test class, optional variant and night-mode
//! prefixes, the capture id, and the revision, so the same UI state always
//! maps to the same baseline. See [`naming`] for the exact scheme.

pub mod artifact;
pub mod capture;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod naming;
pub mod sanitize;
pub mod session;
pub mod view;

pub use artifact::{ArtifactPair, ArtifactWriter, GOLD_DIR_NAME, GoldKeys};
pub use capture::{SoftwarePainter, ViewCapture};
pub use config::{Corpus, OUTPUT_DIR_ENV, TestConfig, TestConfigBuilder, resolve_output_root};
pub use device::{DeviceIdentity, MODEL_ENV, SDK_VERSION_ENV};
pub use dispatch::{InlineDispatcher, UiDispatcher, UiTask, UiThreadDispatcher, run_blocking};
pub use naming::{NIGHT_MODE_DISABLED_PREFIX, NIGHT_MODE_ENABLED_PREFIX};
pub use sanitize::sanitize;
pub use session::{
    RENDER_TEST_FEATURE, RenderTestSession, RenderVariant, TestDescription, TestIdentity,
};
pub use view::{FrameAnimation, View, ViewKind};
