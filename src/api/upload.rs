//! Profile picture checks that run before an upload is attempted.

use std::path::Path;
use thiserror::Error;

/// Largest accepted picture, in bytes.
pub const MAX_PICTURE_BYTES: u64 = 5 * 1024 * 1024;
/// Multipart field name expected by `/upload`.
pub const PICTURE_FIELD: &str = "profile_pic";

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Please select a valid image file")]
    NotAnImage,
    #[error("File size must be less than 5MB")]
    TooLarge,
}

/// Checks a file's declared type and size. The type is checked first.
///
/// # Errors
/// Returns the first rule the file breaks.
pub fn check_picture(content_type: &str, size: u64) -> Result<(), UploadRejection> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(UploadRejection::NotAnImage);
    }
    if size > MAX_PICTURE_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}

/// MIME type for a file, guessed from its extension.
#[must_use]
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// An image that passed [`check_picture`]. Only constructible through the
/// checks, so an upload can never carry an invalid file.
#[derive(Clone)]
pub struct ProfilePicture {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ProfilePicture {
    /// # Errors
    /// Returns an [`UploadRejection`] when the file is not an image or is too large.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadRejection> {
        let content_type = content_type.into();
        check_picture(&content_type, bytes.len() as u64)?;
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Builds a picture from file contents, taking name and type from the path.
    ///
    /// # Errors
    /// Returns an [`UploadRejection`] when the file is not an image or is too large.
    pub fn from_file(path: &Path, bytes: Vec<u8>) -> Result<Self, UploadRejection> {
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
        Self::new(file_name, guess_content_type(path), bytes)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for ProfilePicture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfilePicture")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
