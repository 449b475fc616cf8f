use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use lopdf::encryption::PasswordAlgorithm;
use lopdf::{Document, Object};
use tempfile::NamedTempFile;

use crate::destination::suggest_output_path;
use crate::error::{Error, Result};
use crate::overwrite::{Confirm, OverwritePolicy, check_overwrite};

/// Summary of a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockReport {
    pub destination: PathBuf,
    /// Page count of the written document.
    pub pages: usize,
    /// `false` when the source carried no encryption and was copied as is.
    pub was_encrypted: bool,
}

/// Result of [`unlock_with_policy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unlocked(UnlockReport),
    /// The destination exists and overwriting it was refused. Nothing was written.
    Declined(PathBuf),
}

/// Check the caller-side preconditions in order: source, password, destination.
pub fn validate<S, D>(source: S, password: &str, destination: D) -> Result<()>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
{
    let source = source.as_ref();
    if source.as_os_str().is_empty() || !source.is_file() {
        return Err(Error::InputNotFound(source.to_path_buf()));
    }
    if password.is_empty() {
        return Err(Error::MissingPassword);
    }
    if destination.as_ref().as_os_str().is_empty() {
        return Err(Error::MissingDestination);
    }
    Ok(())
}

/// Open `source` with `password` and write an unencrypted copy to `destination`,
/// replacing any file already there.
///
/// The copy is staged next to the destination and moved into place only once
/// fully written, so a failed run leaves the destination as it was. A replaced
/// destination keeps its permissions; a new one is created readable by the
/// owner only (mode 0600 on Unix).
///
/// Documents using security handler revision 4 or earlier only unlock with
/// their user password. Their owner password is refused with
/// [`Error::OperationFailed`] rather than producing an unreadable copy.
pub fn unlock<S, D>(source: S, password: &str, destination: D) -> Result<UnlockReport>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
{
    let source = source.as_ref();
    let destination = destination.as_ref();
    validate(source, password, destination)?;

    info!("Open {}", source.display());
    check_credential(source, password)?;
    let mut doc = Document::load_with_password(source, password)?;
    if doc.is_encrypted() {
        return Err(Error::IncorrectPassword);
    }

    let was_encrypted = doc.was_encrypted();
    if !was_encrypted {
        warn!("{} is not password protected, writing a plain copy", source.display());
    }
    doc.trailer.remove(b"Encrypt");
    let pages = doc.get_pages().len();
    debug!("Loaded {} pages, {} objects", pages, doc.objects.len());

    info!("Save to {}", destination.display());
    save_replacing(&mut doc, destination)?;

    Ok(UnlockReport {
        destination: destination.to_path_buf(),
        pages,
        was_encrypted,
    })
}

/// [`unlock`] into the suggested `<stem>_unlocked.pdf` next to the source.
pub fn unlock_to_suggested<S: AsRef<Path>>(source: S, password: &str) -> Result<UnlockReport> {
    let source = source.as_ref();
    let destination = suggest_output_path(source).unwrap_or_default();
    unlock(source, password, destination)
}

/// [`unlock`] guarded by an overwrite policy.
///
/// Preconditions are checked before the policy so bad input never prompts.
pub fn unlock_with_policy<S, D, C>(
    source: S, password: &str, destination: D, policy: OverwritePolicy, confirm: &mut C,
) -> Result<Outcome>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
    C: Confirm + ?Sized,
{
    let source = source.as_ref();
    let destination = destination.as_ref();
    validate(source, password, destination)?;

    if !check_overwrite(destination, policy, confirm)? {
        info!("Keeping existing {}", destination.display());
        return Ok(Outcome::Declined(destination.to_path_buf()));
    }
    unlock(source, password, destination).map(Outcome::Unlocked)
}

/// Reject an owner password for revision 2-4 security handlers, which lopdf
/// would accept but then decrypt with the wrong file key.
fn check_credential(source: &Path, password: &str) -> Result<()> {
    let raw = Document::load(source)?;
    let revision = match security_revision(&raw) {
        Some(revision) if revision <= 4 => revision,
        _ => return Ok(()),
    };
    let algorithm = PasswordAlgorithm::try_from(&raw)?;
    if algorithm.authenticate_user_password(&raw, password).is_ok() {
        return Ok(());
    }
    if algorithm.authenticate_owner_password(&raw, password).is_ok() {
        warn!("Owner password given for a revision {} security handler", revision);
        return Err(Error::OperationFailed(format!(
            "the owner password cannot decrypt this document (security handler revision {}); \
             use its user password instead",
            revision
        )));
    }
    // A wrong password is reported by the decrypting load.
    Ok(())
}

fn security_revision(doc: &Document) -> Option<i64> {
    let encrypt = match doc.trailer.get(b"Encrypt").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    encrypt.get(b"R").and_then(Object::as_i64).ok()
}

fn save_replacing(doc: &mut Document, destination: &Path) -> Result<()> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        doc.save_to(&mut writer)?;
        writer.flush()?;
    }
    staged.as_file().sync_all()?;
    if let Ok(existing) = fs::metadata(destination) {
        fs::set_permissions(staged.path(), existing.permissions())?;
    }
    staged.persist(destination)?;
    Ok(())
}
