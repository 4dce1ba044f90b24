use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    assets::decode::ImageLoader,
    foundation::{
        core::Canvas,
        error::{GifweaveError, GifweaveResult},
    },
    timeline::{
        assemble::{DEFAULT_TRANSITION_STEPS, ExportOpts},
        store::{DEFAULT_HOLD_MS, Sequence, ensure_hold},
    },
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Read-only description of a GIF to build: the images in order plus export settings.
///
/// ```json
/// { "canvas": { "width": 800, "height": 600 }, "transition_steps": 15,
///   "items": [ { "path": "a.png", "hold_ms": 1000 }, { "path": "b.jpg" } ] }
/// ```
pub struct Manifest {
    /// Output canvas; defaults to 800x600.
    #[serde(default)]
    pub canvas: Canvas,
    /// Frames per fade and cross-fade.
    #[serde(default = "default_transition_steps")]
    pub transition_steps: u32,
    /// Images in display order.
    pub items: Vec<ManifestItem>,
}

/// One image entry of a [`Manifest`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestItem {
    /// Image path; relative paths resolve against the manifest's directory.
    pub path: PathBuf,
    /// Hold duration; defaults to 1000 ms.
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u32,
}

fn default_transition_steps() -> u32 {
    DEFAULT_TRANSITION_STEPS
}

fn default_hold_ms() -> u32 {
    DEFAULT_HOLD_MS
}

impl Manifest {
    /// Parse and validate a manifest file, resolving item paths against its directory.
    pub fn load(path: &Path) -> GifweaveResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open manifest '{}'", path.display()))?;
        let mut manifest: Manifest = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| {
                GifweaveError::configuration(format!(
                    "parse manifest '{}': {e}",
                    path.display()
                ))
            })?;
        manifest.validate()?;

        let root = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.resolve_paths(root);
        Ok(manifest)
    }

    /// Check export settings and every item without touching the filesystem.
    pub fn validate(&self) -> GifweaveResult<()> {
        self.export_opts().validate()?;
        for (i, item) in self.items.iter().enumerate() {
            if item.path.as_os_str().is_empty() {
                return Err(GifweaveError::configuration(format!(
                    "items[{i}].path must be non-empty"
                )));
            }
            ensure_hold(item.hold_ms).map_err(|e| {
                GifweaveError::configuration(format!("items[{i}].hold_ms: {e}"))
            })?;
        }
        Ok(())
    }

    /// Make relative item paths relative to `root` instead of the working directory.
    pub fn resolve_paths(&mut self, root: &Path) {
        for item in &mut self.items {
            if item.path.is_relative() {
                item.path = root.join(&item.path);
            }
        }
    }

    /// Canvas and transition settings of this manifest.
    pub fn export_opts(&self) -> ExportOpts {
        ExportOpts {
            canvas: self.canvas,
            transition_steps: self.transition_steps,
        }
    }

    /// Add every item to a new sequence the way an interactive caller would.
    ///
    /// Items that fail to decode are skipped; their errors are returned alongside the sequence.
    pub fn to_sequence(&self, loader: &dyn ImageLoader) -> (Sequence, Vec<GifweaveError>) {
        let mut seq = Sequence::new();
        let mut rejected = Vec::new();
        for item in &self.items {
            if let Err(err) = seq.add_with(loader, &item.path, item.hold_ms) {
                rejected.push(err);
            }
        }
        (seq, rejected)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/manifest.rs"]
mod tests;
