//! Document conversion seam.
//!
//! Attending an appointment turns an uploaded file into a history entry. How the file is
//! read is up to the [`DocumentConverter`] the clinic was built with; the appointment only
//! decides which kind of entry the text becomes.

use crate::appointment::AppointmentKind;
use crate::{ClinicError, ClinicResult};
use clinic_files::DocumentIntake;
use std::path::Path;

/// Text extracted from an uploaded document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertedDocument {
    pub information: String,
}

/// Converts an uploaded file into the free-text part of a history entry.
pub trait DocumentConverter {
    /// # Errors
    ///
    /// Implementations return `ClinicError::ConversionFailed` when the file cannot be used.
    fn convert(&self, file: &Path, kind: &AppointmentKind) -> ClinicResult<ConvertedDocument>;
}

/// Converter backed by content-addressed document storage.
///
/// Plain-text uploads become the entry text as-is. Anything else is stored and described
/// by name, type, size and hash.
#[derive(Debug, Clone)]
pub struct FileDocumentConverter {
    intake: DocumentIntake,
}

impl FileDocumentConverter {
    /// # Errors
    ///
    /// Returns `ClinicError::ConversionFailed` if `storage_root` is not a usable directory.
    pub fn new(storage_root: &Path) -> ClinicResult<Self> {
        Ok(Self {
            intake: DocumentIntake::new(storage_root)?,
        })
    }
}

impl DocumentConverter for FileDocumentConverter {
    fn convert(&self, file: &Path, kind: &AppointmentKind) -> ClinicResult<ConvertedDocument> {
        let document = self.intake.ingest(file)?;
        tracing::debug!(
            "stored {} for {} appointment as {}",
            document.metadata.original_filename,
            kind.label(),
            document.metadata.relative_path
        );
        let information = match document.text {
            Some(ref text) => text.clone(),
            None => document.summary(),
        };
        Ok(ConvertedDocument { information })
    }
}

/// Converter for hosts that have no document storage configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocumentConverter;

impl DocumentConverter for NoDocumentConverter {
    fn convert(&self, file: &Path, _kind: &AppointmentKind) -> ClinicResult<ConvertedDocument> {
        Err(ClinicError::ConversionFailed(format!(
            "no document storage configured for {}",
            file.display()
        )))
    }
}
