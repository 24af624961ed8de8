/*
[INPUT]:  Drawing files picked for each category
[OUTPUT]: Three positional photo slots and the upload batch
[POS]:    Domain layer - upload screen selection
[UPDATE]: When categories or file limits change
*/

use std::path::{Path, PathBuf};

use drawtest_adapter::{DrawingCategory, ImageFile};
use thiserror::Error;

/// Largest file the service accepts
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} has no file name")]
    NoFileName(PathBuf),
}

/// One slot per drawing category. Removing a photo leaves its slot empty;
/// other slots never shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoSlots {
    slots: [Option<ImageFile>; 3],
}

impl PhotoSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a photo in a slot, returning the one it replaced
    pub fn assign(&mut self, category: DrawingCategory, image: ImageFile) -> Option<ImageFile> {
        self.slots[category.index()].replace(image)
    }

    pub fn remove(&mut self, category: DrawingCategory) -> Option<ImageFile> {
        self.slots[category.index()].take()
    }

    pub fn get(&self, category: DrawingCategory) -> Option<&ImageFile> {
        self.slots[category.index()].as_ref()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Upload is only possible with every slot filled
    pub fn is_complete(&self) -> bool {
        self.filled_count() == self.slots.len()
    }

    /// The upload batch in category order, or `None` while a slot is empty
    pub fn images(&self) -> Option<Vec<ImageFile>> {
        self.slots.iter().cloned().collect()
    }
}

/// Read a drawing from disk.
///
/// Size and type limits are the service's to enforce; suspicious files only log a warning.
pub async fn load_image(path: &Path) -> Result<ImageFile, PhotoError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PhotoError::NoFileName(path.to_path_buf()))?
        .to_string();

    let data = tokio::fs::read(path)
        .await
        .map_err(|source| PhotoError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let image = ImageFile::new(file_name, data);
    if image.len() > MAX_UPLOAD_BYTES {
        tracing::warn!(
            file = %image.file_name,
            bytes = image.len(),
            "file exceeds the 5 MB upload limit"
        );
    }
    if !image.is_accepted_type() {
        tracing::warn!(
            file = %image.file_name,
            content_type = %image.content_type,
            "file is neither an image nor a PDF"
        );
    }
    Ok(image)
}
