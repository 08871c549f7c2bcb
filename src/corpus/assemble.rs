//! Corpus construction from labeled ham/spam directories.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{PrepError, Result};
use crate::model::corpus::{CorpusRow, Label};
use crate::model::email::{NormalizeMode, NormalizedEmail};
use crate::parser;

/// A file the assembler could not turn into a row.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Counts collected while assembling the corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssemblyReport {
    pub ham_files: usize,
    pub spam_files: usize,
    pub ham_rows: usize,
    pub spam_rows: usize,
    pub bytes_read: u64,
    pub skipped: Vec<SkippedFile>,
}

impl AssemblyReport {
    pub fn files(&self, label: Label) -> usize {
        match label {
            Label::Ham => self.ham_files,
            Label::Spam => self.spam_files,
        }
    }

    pub fn rows(&self, label: Label) -> usize {
        match label {
            Label::Ham => self.ham_rows,
            Label::Spam => self.spam_rows,
        }
    }
}

/// Assembled rows plus the report describing how they were obtained.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub rows: Vec<CorpusRow>,
    pub report: AssemblyReport,
}

/// List the regular files directly inside `dir`, sorted by path.
///
/// Subdirectories and other non-file entries are skipped.
pub fn list_message_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PrepError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| PrepError::io(dir, e))? {
        let entry = entry.map_err(|e| PrepError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            debug!(path = %path.display(), "Skipping non-file entry");
        }
    }
    files.sort();
    Ok(files)
}

/// Parse and normalize every file under `ham_dir` and `spam_dir`.
///
/// Ham rows come first, then spam rows. Files that fail to parse are
/// logged, recorded in the report and left out; they never fail the build.
/// The progress callback receives `(processed, total)` file counts.
pub fn assemble(
    ham_dir: &Path,
    spam_dir: &Path,
    mode: NormalizeMode,
    progress: Option<&dyn Fn(u64, u64)>,
) -> Result<Assembly> {
    let ham_files = list_message_files(ham_dir)?;
    let spam_files = list_message_files(spam_dir)?;

    info!(
        hams = ham_files.len(),
        spams = spam_files.len(),
        "Assembling corpus"
    );

    let total = (ham_files.len() + spam_files.len()) as u64;
    let mut processed: u64 = 0;
    let mut report = AssemblyReport {
        ham_files: ham_files.len(),
        spam_files: spam_files.len(),
        ..AssemblyReport::default()
    };
    let mut rows = Vec::with_capacity(total as usize);

    let labeled = ham_files
        .iter()
        .map(|p| (p, Label::Ham))
        .chain(spam_files.iter().map(|p| (p, Label::Spam)));

    for (path, label) in labeled {
        match parser::parse_message_sized(path) {
            Ok((raw, size)) => {
                report.bytes_read += size;
                let email = NormalizedEmail::from_raw(&raw, mode);
                rows.push(CorpusRow::new(email, label, path));
                match label {
                    Label::Ham => report.ham_rows += 1,
                    Label::Spam => report.spam_rows += 1,
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unparseable file");
                report.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        processed += 1;
        if let Some(cb) = progress {
            cb(processed, total);
        }
    }

    info!(
        rows = rows.len(),
        skipped = report.skipped.len(),
        "Corpus assembled"
    );

    Ok(Assembly { rows, report })
}
