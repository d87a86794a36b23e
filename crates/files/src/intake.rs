//! Content-addressed document intake.
//!
//! [`DocumentIntake`] is bound to one storage root. Each call to [`DocumentIntake::ingest`]
//! reads the upload fully, hashes it, stores it under `files/sha256/<s1>/<s2>/<hash>` and
//! returns the metadata plus any plain-text content.

use crate::{FilesError, FILES_FOLDER_NAME, HASH_ALGORITHM};
use chrono::{DateTime, Utc};
use clinic_types::NonEmptyText;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata for a stored document.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Hashing algorithm used (always "sha256")
    pub hash_algorithm: NonEmptyText,

    /// Hexadecimal SHA-256 digest of the content
    pub hash: NonEmptyText,

    /// Path relative to the storage root
    pub relative_path: NonEmptyText,

    pub size_bytes: u64,

    /// Detected media type (MIME type), if available
    ///
    /// Best-effort detection from magic bytes. Plain text has no magic bytes and is
    /// reported as `text/plain` when the content decodes as UTF-8.
    pub media_type: Option<NonEmptyText>,

    /// Original filename from the upload path
    pub original_filename: NonEmptyText,

    /// UTC timestamp of the intake
    pub stored_at: DateTime<Utc>,
}

/// An ingested document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub metadata: DocumentMetadata,

    /// Trimmed UTF-8 content, when the upload is non-blank text
    pub text: Option<String>,
}

impl Document {
    /// A one-line description used when the document carries no readable text.
    pub fn summary(&self) -> String {
        let media = self
            .metadata
            .media_type
            .as_ref()
            .map(NonEmptyText::as_str)
            .unwrap_or("unknown type");
        format!(
            "Attached document {} ({}, {} bytes, {} {})",
            self.metadata.original_filename,
            media,
            self.metadata.size_bytes,
            self.metadata.hash_algorithm,
            self.metadata.hash
        )
    }
}

/// Stores uploaded documents under a single storage root.
#[derive(Debug, Clone)]
pub struct DocumentIntake {
    storage_root: PathBuf,
}

impl DocumentIntake {
    /// Creates an intake bound to `storage_root`.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidStorageRoot` if the root does not exist, is not a
    /// directory, or cannot be canonicalised.
    pub fn new(storage_root: &Path) -> Result<Self, FilesError> {
        if !storage_root.is_dir() {
            return Err(FilesError::InvalidStorageRoot(format!(
                "Not an existing directory: {}",
                storage_root.display()
            )));
        }

        let storage_root = storage_root.canonicalize().map_err(|e| {
            FilesError::InvalidStorageRoot(format!(
                "Cannot canonicalize path {}: {}",
                storage_root.display(),
                e
            ))
        })?;

        Ok(Self { storage_root })
    }

    /// Reads `source_path`, stores its bytes and describes the result.
    ///
    /// # Errors
    ///
    /// - `FilesError::InvalidSource` if the path is not a regular file
    /// - `FilesError::EmptySource` for zero-length uploads
    /// - `FilesError::Io` if reading, directory creation or writing fails
    pub fn ingest(&self, source_path: &Path) -> Result<Document, FilesError> {
        if !source_path.is_file() {
            return Err(FilesError::InvalidSource(format!(
                "Not a regular file: {}",
                source_path.display()
            )));
        }

        let buffer = fs::read(source_path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to read source file {}: {}",
                    source_path.display(),
                    e
                ),
            ))
        })?;

        if buffer.is_empty() {
            return Err(FilesError::EmptySource(source_path.display().to_string()));
        }

        let hash = hex::encode(Sha256::digest(&buffer));
        let relative_path = Self::relative_path(&hash);
        let storage_path = self.storage_root.join(&relative_path);

        if storage_path.exists() {
            tracing::debug!("document {} already stored, reusing", hash);
        } else {
            if let Some(parent) = storage_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    FilesError::Io(std::io::Error::new(
                        e.kind(),
                        format!(
                            "Failed to create storage directory {}: {}",
                            parent.display(),
                            e
                        ),
                    ))
                })?;
            }
            fs::write(&storage_path, &buffer).map_err(|e| {
                FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write file to {}: {}", storage_path.display(), e),
                ))
            })?;
        }

        let original_filename = NonEmptyText::new(
            source_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown"),
        )?;

        let decoded = std::str::from_utf8(&buffer).ok();
        let media_type = match infer::get(&buffer) {
            Some(kind) => Some(NonEmptyText::new(kind.mime_type())?),
            None if decoded.is_some() => Some(NonEmptyText::new("text/plain")?),
            None => None,
        };
        let text = decoded
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        Ok(Document {
            metadata: DocumentMetadata {
                hash_algorithm: NonEmptyText::new(HASH_ALGORITHM)?,
                hash: NonEmptyText::new(&hash)?,
                relative_path: NonEmptyText::new(&relative_path)?,
                size_bytes: buffer.len() as u64,
                media_type,
                original_filename,
                stored_at: Utc::now(),
            },
            text,
        })
    }

    /// `files/sha256/<s1>/<s2>/<hash>`
    fn relative_path(hash_hex: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            FILES_FOLDER_NAME,
            HASH_ALGORITHM,
            &hash_hex[0..2],
            &hash_hex[2..4],
            hash_hex
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_upload(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).expect("write upload");
        path
    }

    #[test]
    fn new_rejects_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = DocumentIntake::new(&temp.path().join("missing"));
        assert!(matches!(result, Err(FilesError::InvalidStorageRoot(_))));
    }

    #[test]
    fn ingest_text_document_returns_trimmed_text() {
        let temp = TempDir::new().unwrap();
        let intake = DocumentIntake::new(temp.path()).unwrap();
        let upload = write_upload(temp.path(), "nota.txt", b"  Paciente estable.\n");

        let document = intake.ingest(&upload).unwrap();

        assert_eq!(document.text.as_deref(), Some("Paciente estable."));
        assert_eq!(
            document.metadata.media_type.as_ref().map(NonEmptyText::as_str),
            Some("text/plain")
        );
        assert_eq!(document.metadata.original_filename.as_str(), "nota.txt");
        assert_eq!(document.metadata.size_bytes, 20);
        assert_eq!(document.metadata.hash.as_str().len(), 64);
        assert!(document
            .metadata
            .relative_path
            .as_str()
            .starts_with("files/sha256/"));
    }

    #[test]
    fn ingest_stores_content_addressed_copy() {
        let temp = TempDir::new().unwrap();
        let intake = DocumentIntake::new(temp.path()).unwrap();
        let upload = write_upload(temp.path(), "scan.txt", b"resultado");

        let document = intake.ingest(&upload).unwrap();
        let stored = fs::read(temp.path().join(document.metadata.relative_path.as_str())).unwrap();
        assert_eq!(stored, b"resultado");
    }

    #[test]
    fn ingesting_same_bytes_twice_reuses_storage() {
        let temp = TempDir::new().unwrap();
        let intake = DocumentIntake::new(temp.path()).unwrap();
        let first = write_upload(temp.path(), "a.txt", b"same");
        let second = write_upload(temp.path(), "b.txt", b"same");

        let a = intake.ingest(&first).unwrap();
        let b = intake.ingest(&second).unwrap();
        assert_eq!(a.metadata.hash, b.metadata.hash);
        assert_eq!(b.metadata.original_filename.as_str(), "b.txt");
    }

    #[test]
    fn binary_document_has_no_text_and_detected_type() {
        let temp = TempDir::new().unwrap();
        let intake = DocumentIntake::new(temp.path()).unwrap();
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0xFF, 0xFE];
        let upload = write_upload(temp.path(), "eco.png", &png);

        let document = intake.ingest(&upload).unwrap();
        assert!(document.text.is_none());
        assert_eq!(
            document.metadata.media_type.as_ref().map(NonEmptyText::as_str),
            Some("image/png")
        );
        assert!(document.summary().starts_with("Attached document eco.png (image/png, 10 bytes"));
    }

    #[test]
    fn empty_and_missing_uploads_are_rejected() {
        let temp = TempDir::new().unwrap();
        let intake = DocumentIntake::new(temp.path()).unwrap();
        let empty = write_upload(temp.path(), "empty.txt", b"");

        assert!(matches!(intake.ingest(&empty), Err(FilesError::EmptySource(_))));
        assert!(matches!(
            intake.ingest(&temp.path().join("nope.txt")),
            Err(FilesError::InvalidSource(_))
        ));
    }
}
