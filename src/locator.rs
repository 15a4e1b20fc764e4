use regex::Regex;
use tracing::debug;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use crate::error::{Error, Result};

/// A daily sales record file, named by an eight-digit sequence number.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionFile {
    pub number: u32,
    pub name: String,
    pub path: PathBuf,
}

fn file_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{8})\.rcd$").unwrap_or_else(|e| panic!("{e}")))
}

/// Returns the sales record files in `dir`, in sequence order.
///
/// Only regular files (following symlinks) whose name is eight digits plus
/// `.rcd` are considered; everything else in the directory is ignored. An
/// empty result is not an error.
///
/// # Errors
///
/// Returns [`Error::NonSequentialFiles`] if the numbers have a gap or a
/// repeat, and [`Error::Io`] if the directory cannot be listed.
pub fn locate(dir: impl AsRef<Path>) -> Result<Vec<TransactionFile>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let Some(number) = file_name_regex()
            .captures(&name)
            .and_then(|c| c[1].parse().ok())
        else {
            continue;
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        files.push(TransactionFile { number, name, path });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    check_sequence(&files)?;
    debug!(dir = %dir.display(), count = files.len(), "sales files located");
    Ok(files)
}

/// Checks that each file's number is exactly one more than the previous
/// file's. `files` must already be sorted.
///
/// # Errors
///
/// Returns [`Error::NonSequentialFiles`] naming the first offending pair.
pub fn check_sequence(files: &[TransactionFile]) -> Result<()> {
    for pair in files.windows(2) {
        let (previous, next) = (&pair[0], &pair[1]);
        if next.number.checked_sub(previous.number) != Some(1) {
            return Err(Error::NonSequentialFiles {
                previous: previous.name.clone(),
                next: next.name.clone(),
            });
        }
    }
    Ok(())
}
