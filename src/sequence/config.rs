use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{ScrubError, ScrubResult};

/// Width of the zero-padded numeric part of a frame filename.
pub const INDEX_PAD_WIDTH: usize = 3;

/// Static descriptor of an on-disk (or remote) image sequence.
///
/// Frame `position` (zero-based, `0..frame_count`) lives at
/// `base_path + file_prefix + pad3(position + start_index) + "." + file_extension`.
///
/// Indices above 999 render at their natural width, so a sequence whose indices cross 999
/// produces mixed-width names. That layout is not supported.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawSequenceConfig")]
pub struct SequenceConfig {
    base_path: String,
    frame_count: u32,
    file_prefix: String,
    file_extension: String,
    start_index: u32,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSequenceConfig {
    base_path: String,
    frame_count: u32,
    #[serde(default)]
    file_prefix: String,
    file_extension: String,
    #[serde(default)]
    start_index: u32,
}

impl TryFrom<RawSequenceConfig> for SequenceConfig {
    type Error = ScrubError;

    fn try_from(raw: RawSequenceConfig) -> ScrubResult<Self> {
        Self::new(
            raw.base_path,
            raw.frame_count,
            raw.file_prefix,
            raw.file_extension,
        )
        .map(|c| c.with_start_index(raw.start_index))
    }
}

impl SequenceConfig {
    pub fn new(
        base_path: impl Into<String>,
        frame_count: u32,
        file_prefix: impl Into<String>,
        file_extension: impl Into<String>,
    ) -> ScrubResult<Self> {
        let file_extension = file_extension.into();
        let file_extension = file_extension
            .strip_prefix('.')
            .unwrap_or(&file_extension)
            .to_string();
        let out = Self {
            base_path: base_path.into(),
            frame_count,
            file_prefix: file_prefix.into(),
            file_extension,
            start_index: 0,
        };
        out.validate()?;
        Ok(out)
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn validate(&self) -> ScrubResult<()> {
        if self.frame_count == 0 {
            return Err(ScrubError::validation("sequence frame_count must be >= 1"));
        }
        if self.file_extension.is_empty() {
            return Err(ScrubError::validation(
                "sequence file_extension must be non-empty",
            ));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> ScrubResult<Self> {
        serde_json::from_str(s).map_err(|e| ScrubError::serde(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScrubResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read sequence config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    /// On-disk numeric index for `position`.
    pub fn file_index(&self, position: u32) -> u64 {
        u64::from(position) + u64::from(self.start_index)
    }

    /// Asset path for the frame at zero-based `position`.
    pub fn frame_path(&self, position: u32) -> String {
        format!(
            "{}{}{:0width$}.{}",
            self.base_path,
            self.file_prefix,
            self.file_index(position),
            self.file_extension,
            width = INDEX_PAD_WIDTH
        )
    }

    /// Asset paths for every frame, in position order.
    pub fn frame_paths(&self) -> Vec<String> {
        (0..self.frame_count).map(|p| self.frame_path(p)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/config.rs"]
mod tests;
