use std::path::{Path, PathBuf};

const UNLOCKED_SUFFIX: &str = "_unlocked";

/// Suggest `<dir>/<stem>_unlocked.pdf` for a source path.
///
/// Returns `None` unless the source ends in `.pdf` (any case).
pub fn suggest_output_path<P: AsRef<Path>>(source: P) -> Option<PathBuf> {
    let source = source.as_ref();
    let extension = source.extension()?.to_str()?;
    if !extension.eq_ignore_ascii_case("pdf") {
        return None;
    }
    let stem = source.file_stem()?.to_str()?;
    Some(source.with_file_name(format!("{}{}.pdf", stem, UNLOCKED_SUFFIX)))
}

/// Pick the destination for an unlock: an explicit non-blank path wins,
/// otherwise fall back to [`suggest_output_path`].
pub fn resolve_destination<P: AsRef<Path>>(source: P, explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) if !is_blank(path) => Some(path.to_path_buf()),
        _ => suggest_output_path(source),
    }
}

fn is_blank(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s.trim().is_empty())
}
