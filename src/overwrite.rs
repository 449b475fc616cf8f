use std::io;
use std::path::Path;

use log::debug;

use crate::error::Result;

/// What to do when the destination already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Ask through a [`Confirm`] implementation.
    #[default]
    Ask,
    Always,
    Never,
}

/// Answers "'<path>' already exists. Overwrite?" on behalf of the operator.
pub trait Confirm {
    fn confirm_overwrite(&mut self, path: &Path) -> io::Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&Path) -> io::Result<bool>,
{
    fn confirm_overwrite(&mut self, path: &Path) -> io::Result<bool> {
        self(path)
    }
}

/// Returns `true` when writing to `path` may proceed.
///
/// A missing destination never consults the policy.
pub fn check_overwrite<C>(path: &Path, policy: OverwritePolicy, confirm: &mut C) -> Result<bool>
where
    C: Confirm + ?Sized,
{
    if !path.exists() {
        return Ok(true);
    }
    debug!("{} already exists, overwrite policy {:?}", path.display(), policy);
    match policy {
        OverwritePolicy::Always => Ok(true),
        OverwritePolicy::Never => Ok(false),
        OverwritePolicy::Ask => Ok(confirm.confirm_overwrite(path)?),
    }
}
