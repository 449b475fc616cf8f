//! Remove password protection from PDF documents.
//!
//! The document is opened with [`lopdf`] using the supplied password and
//! written back out without an encryption filter.

mod destination;
mod error;
mod overwrite;
mod unlock;

pub use destination::{resolve_destination, suggest_output_path};
pub use error::{Error, Result};
pub use overwrite::{Confirm, OverwritePolicy, check_overwrite};
pub use unlock::{Outcome, UnlockReport, unlock, unlock_to_suggested, unlock_with_policy, validate};
