//! Services module
//!
//! Contains the key registry and the helpers the UI layer calls into.

pub mod fetcher;
pub mod job_validator;
pub mod key_rotation;
pub mod voiceover;

pub use fetcher::{
    normalize_drive_url, normalize_sheet_url, DriveLink, FetchError, FetcherConfig, SheetFetcher,
    SheetTable,
};
pub use job_validator::{validate_job, validate_job_value};
pub use key_rotation::{KeyCategory, KeyPool, KeyPoolStats, KeyRotationRegistry, UnknownCategory};
pub use voiceover::{clean_outline, clean_outline_in_place, clean_voiceover};
