use std::path::{Path, PathBuf};

use crate::{
    assets::decode::{FsImageLoader, ImageLoader, display_name, verify_and_load},
    encode::gif::MAX_FRAME_MS,
    foundation::error::{GifweaveError, GifweaveResult},
};

/// Hold duration given to items added without an explicit one.
pub const DEFAULT_HOLD_MS: u32 = 1000;

/// Longest accepted hold; the hold frame is a single GIF frame and must fit its delay field.
pub const MAX_HOLD_MS: u32 = MAX_FRAME_MS;

/// One still image in the sequence.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceItem {
    /// Where the image is read from at export time.
    pub path: PathBuf,
    /// Final path component, for messages.
    pub display_name: String,
    /// Milliseconds the item's own frame is shown, excluding transition time.
    pub hold_ms: u32,
}

impl SourceItem {
    /// Create an item without decoding it; only the hold duration is checked.
    pub fn new(path: impl Into<PathBuf>, hold_ms: u32) -> GifweaveResult<Self> {
        ensure_hold(hold_ms)?;
        let path = path.into();
        Ok(Self {
            display_name: display_name(&path),
            path,
            hold_ms,
        })
    }
}

pub(crate) fn ensure_hold(hold_ms: u32) -> GifweaveResult<()> {
    if hold_ms == 0 {
        return Err(GifweaveError::configuration("hold duration must be > 0 ms"));
    }
    if hold_ms > MAX_HOLD_MS {
        return Err(GifweaveError::configuration(format!(
            "hold duration must be <= {MAX_HOLD_MS} ms (got {hold_ms})"
        )));
    }
    Ok(())
}

/// Ordered, densely indexed list of source items.
///
/// Insertion order is display order. Every mutation either fully applies or leaves the sequence
/// untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    items: Vec<SourceItem>,
}

impl Sequence {
    /// An empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the image at `path` from disk and append it.
    pub fn add(&mut self, path: impl AsRef<Path>, hold_ms: u32) -> GifweaveResult<&SourceItem> {
        self.add_with(&FsImageLoader, path, hold_ms)
    }

    /// Validate the image at `path` through `loader` and append it.
    ///
    /// The image is verified and fully decoded (including RGB normalization) before the item is
    /// created. On failure the sequence is unchanged.
    pub fn add_with(
        &mut self,
        loader: &dyn ImageLoader,
        path: impl AsRef<Path>,
        hold_ms: u32,
    ) -> GifweaveResult<&SourceItem> {
        let path = path.as_ref();
        let item = SourceItem::new(path, hold_ms)?;
        if let Err(err) = verify_and_load(loader, path) {
            tracing::warn!(path = %path.display(), error = %err, "rejected source image");
            return Err(err);
        }

        tracing::debug!(name = %item.display_name, hold_ms, index = self.items.len(), "added item");
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Append an already validated item.
    pub fn push(&mut self, item: SourceItem) -> GifweaveResult<()> {
        ensure_hold(item.hold_ms)?;
        self.items.push(item);
        Ok(())
    }

    /// Remove the item at `index`, shifting later items down.
    pub fn delete_at(&mut self, index: usize) -> GifweaveResult<SourceItem> {
        if index >= self.items.len() {
            return Err(GifweaveError::index(index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }

    /// Remove the item at `from` and reinsert it at `to`.
    ///
    /// `to` indexes the sequence after removal; `to == len` is accepted and places the item last.
    pub fn move_to(&mut self, from: usize, to: usize) -> GifweaveResult<()> {
        let len = self.items.len();
        if from >= len {
            return Err(GifweaveError::index(from, len));
        }
        if to > len {
            return Err(GifweaveError::index(to, len));
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
        Ok(())
    }

    /// Replace the hold duration of the item at `index`.
    pub fn update_duration(&mut self, index: usize, hold_ms: u32) -> GifweaveResult<()> {
        ensure_hold(hold_ms)?;
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(GifweaveError::index(index, len))?;
        item.hold_ms = hold_ms;
        Ok(())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&SourceItem> {
        self.items.get(index)
    }

    /// All items in display order.
    pub fn items(&self) -> &[SourceItem] {
        &self.items
    }

    /// Iterate items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceItem> {
        self.items.iter()
    }

    /// Owned copy of the items, as seen by an export started now.
    pub fn snapshot(&self) -> Vec<SourceItem> {
        self.items.clone()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a SourceItem;
    type IntoIter = std::slice::Iter<'a, SourceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/store.rs"]
mod tests;
