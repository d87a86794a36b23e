//! Clinic document intake
//!
//! Uploaded visit documents (scan reports, typed notes, ultrasound printouts) are copied
//! into content-addressed storage under the clinic data directory and described by a
//! [`DocumentMetadata`] record. When the upload is plain UTF-8 text its content is also
//! returned, so callers can use it as the free-text part of a history entry.
//!
//! ## Storage layout
//!
//! ```text
//! <storage_root>/
//! └── files/
//!     └── sha256/
//!         └── ab/
//!             └── cd/
//!                 └── abcd3f9e…
//! ```
//!
//! Stored files are immutable. Uploading identical bytes twice yields the same hash and
//! reuses the stored copy.
//!
//! No clinical document format is parsed here.
//!
//! ## Example Usage
//!
//! ```no_run
//! use clinic_files::DocumentIntake;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let intake = DocumentIntake::new(Path::new("clinic_data"))?;
//! let document = intake.ingest(Path::new("uploads/ecografia.txt"))?;
//! println!("{}", document.metadata.hash);
//! # Ok(())
//! # }
//! ```

mod intake;

pub use intake::{Document, DocumentIntake, DocumentMetadata};

/// Name of the folder holding stored documents under the storage root.
pub const FILES_FOLDER_NAME: &str = "files";

/// Hash algorithm used for content addressing.
pub const HASH_ALGORITHM: &str = "sha256";

/// Errors that can occur during document intake
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Storage root does not exist or is not a directory
    #[error("Invalid storage root: {0}")]
    InvalidStorageRoot(String),

    /// The uploaded path is not a readable regular file
    #[error("Invalid source file: {0}")]
    InvalidSource(String),

    /// The uploaded file has no content
    #[error("Source file is empty: {0}")]
    EmptySource(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A derived value failed validation
    #[error("Invalid value: {0}")]
    Value(#[from] clinic_types::ValueError),
}
