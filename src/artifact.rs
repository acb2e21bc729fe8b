//! Persistence of golden artifacts: the captured PNG and its JSON key file.
//!
//! Every capture produces a pair of files under `{output_root}/skia_gold/`.
//! An external uploader scans that directory after the run, so the layout and
//! the key schema are a contract, not an implementation detail.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use serde::Serialize;
use tracing::debug;

use crate::config::TestConfig;
use crate::device::DeviceIdentity;

/// Directory under the output root that the uploader scans for artifacts.
pub const GOLD_DIR_NAME: &str = "skia_gold";

/// Key/value metadata uploaded alongside a golden image.
///
/// The diffing service groups baselines by these keys, so two devices with
/// different models or SDK versions never share a baseline. Field order here
/// is the order keys appear in the serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoldKeys {
    /// Corpus id the result is routed into.
    pub source_type: String,
    /// Device model, spaces and all.
    pub model: String,
    /// Platform SDK version the capture ran under.
    pub sdk_version: String,
    /// Why the current revision was minted; omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_description: Option<String>,
    /// Serialized as the strings "true"/"false"; the uploader treats every
    /// key value as text.
    pub fail_on_unsupported_configs: String,
    /// `Class#method` of the test that produced the image.
    pub full_test_name: String,
}

impl GoldKeys {
    /// Assembles the keys for one capture from the session configuration,
    /// the detected device, and the running test's full name.
    pub fn new(config: &TestConfig, device: &DeviceIdentity, full_test_name: &str) -> Self {
        let revision_description = match config.description() {
            "" => None,
            description => Some(description.to_string()),
        };
        Self {
            source_type: config.corpus().as_gold_id().to_string(),
            model: device.model.clone(),
            sdk_version: device.sdk_version.clone(),
            revision_description,
            fail_on_unsupported_configs: config.fail_on_unsupported_configs().to_string(),
            full_test_name: full_test_name.to_string(),
        }
    }
}

/// Filesystem paths of one written golden pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    pub image: PathBuf,
    pub metadata: PathBuf,
}

/// Writes golden images and their key files under a fixed gold directory.
///
/// Re-running a test overwrites its previous artifacts; the last capture of a
/// golden name within a run wins.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    gold_dir: PathBuf,
}

impl ArtifactWriter {
    /// Creates a writer rooted at `{output_root}/skia_gold`. Nothing is
    /// created on disk until the first write.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            gold_dir: output_root.into().join(GOLD_DIR_NAME),
        }
    }

    /// The directory both halves of every pair land in.
    pub fn gold_dir(&self) -> &Path {
        &self.gold_dir
    }

    /// Encodes `bitmap` as PNG under the gold directory and returns the path.
    pub fn write_image(&self, file_name: &str, bitmap: &RgbaImage) -> Result<PathBuf> {
        self.ensure_gold_dir()?;
        let path = self.gold_dir.join(file_name);
        bitmap
            .save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("Failed to write golden image {}", path.display()))?;
        debug!(path = %path.display(), "Wrote golden image");
        Ok(path)
    }

    /// Serializes `keys` as compact JSON with a trailing newline and returns
    /// the path.
    pub fn write_metadata(&self, file_name: &str, keys: &GoldKeys) -> Result<PathBuf> {
        self.ensure_gold_dir()?;
        let path = self.gold_dir.join(file_name);
        let mut content = serde_json::to_string(keys)
            .with_context(|| format!("Failed to serialize gold keys for {}", path.display()))?;
        content.push('\n');
        fs::write(&path, content)
            .with_context(|| format!("Failed to write gold keys {}", path.display()))?;
        debug!(path = %path.display(), "Wrote golden metadata");
        Ok(path)
    }

    fn ensure_gold_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.gold_dir).with_context(|| {
            format!("Failed to create gold directory {}", self.gold_dir.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use serde_json::Value;

    fn sample_keys(description: Option<&str>) -> GoldKeys {
        GoldKeys {
            source_type: "android-render-tests".to_string(),
            model: "Pixel_2".to_string(),
            sdk_version: "27".to_string(),
            revision_description: description.map(str::to_string),
            fail_on_unsupported_configs: "false".to_string(),
            full_test_name: "WidgetTest#testBig".to_string(),
        }
    }

    #[test]
    fn writer_roots_everything_under_skia_gold() {
        let writer = ArtifactWriter::new("/some/root");
        assert_eq!(writer.gold_dir(), Path::new("/some/root/skia_gold"));
    }

    #[test]
    fn write_image_produces_a_png_in_the_gold_dir() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let bitmap = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));

        let path = writer.write_image("Case.id.rev_0.png", &bitmap).unwrap();

        assert_eq!(path.parent().unwrap(), writer.gold_dir());
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn write_metadata_is_compact_json_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        let path = writer
            .write_metadata("Case.id.rev_0.json", &sample_keys(None))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with('\n'));
        assert!(!content.trim_end().contains('\n'));
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["source_type"], "android-render-tests");
        assert_eq!(value["fail_on_unsupported_configs"], "false");
    }

    #[test]
    fn empty_description_is_omitted_from_the_keys() {
        let json = serde_json::to_string(&sample_keys(None)).unwrap();
        assert!(!json.contains("revision_description"));

        let json = serde_json::to_string(&sample_keys(Some("new icons"))).unwrap();
        assert!(json.contains(r#""revision_description":"new icons""#));
    }

    #[test]
    fn repeated_writes_reuse_the_directory_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());

        writer
            .write_metadata("Case.id.rev_0.json", &sample_keys(None))
            .unwrap();
        let path = writer
            .write_metadata("Case.id.rev_0.json", &sample_keys(Some("second pass")))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("second pass"));
    }
}
