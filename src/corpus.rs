//! Facilities for discovering input files and loading labelled training documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{NbcError, Result};

/// Layout of labelled training data on disk.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CorpusFormat {
    /// One document per line as `category<TAB>text`; blank lines and `#` comments are skipped.
    #[default]
    Tsv,
    /// One document per file, labelled with the name of the directory containing it.
    Directory,
}

/// Configuration controlling how labelled corpora are read from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestConfig {
    /// Layout of the inputs.
    pub format: CorpusFormat,
    /// Enables recursive directory traversal.
    pub recursive: bool,
    /// Follows symlinks encountered during traversal.
    pub follow_symlinks: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            format: CorpusFormat::Tsv,
            recursive: true,
            follow_symlinks: false,
        }
    }
}

/// A training document and its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledDocument {
    /// Category label.
    pub category: String,
    /// Document text.
    pub text: String,
}

/// Discovers files rooted at the provided input paths according to the ingest configuration.
///
/// Directories are traversed recursively by default; set [`IngestConfig::recursive`] to `false`
/// to limit discovery to the first level. Symlink traversal is controlled through
/// [`IngestConfig::follow_symlinks`]. Files are returned sorted so training order is stable.
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(NbcError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let metadata = path
            .symlink_metadata()
            .map_err(|err| NbcError::io(err, Some(path.to_path_buf())))?;
        if metadata.is_dir() {
            let depth = if cfg.recursive { usize::MAX } else { 1 };
            let mut found = Vec::new();
            let walker = WalkDir::new(path)
                .max_depth(depth)
                .follow_links(cfg.follow_symlinks);
            for entry in walker {
                let entry = entry.map_err(|err| NbcError::Internal(err.to_string()))?;
                if entry.file_type().is_file() {
                    found.push(entry.path().to_path_buf());
                }
            }
            found.sort();
            files.extend(found);
        } else if metadata.is_file() {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(NbcError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    Ok(files)
}

/// Loads labelled documents from the inputs in discovery order.
pub fn load_labelled_corpus<P: AsRef<Path>>(
    inputs: &[P],
    cfg: &IngestConfig,
) -> Result<Vec<LabelledDocument>> {
    let file_paths = collect_paths(inputs, cfg)?;
    let mut documents = Vec::new();
    for file_path in file_paths {
        let bytes =
            fs::read(&file_path).map_err(|err| NbcError::io(err, Some(file_path.clone())))?;
        let text = String::from_utf8_lossy(&bytes);
        match cfg.format {
            CorpusFormat::Tsv => documents.extend(parse_tsv(&text, &file_path)?),
            CorpusFormat::Directory => {
                let category = directory_label(&file_path)?;
                documents.push(LabelledDocument {
                    category,
                    text: text.into_owned(),
                });
            }
        }
    }
    if documents.is_empty() {
        return Err(NbcError::InvalidConfig(
            "no labelled documents could be loaded from inputs".into(),
        ));
    }
    Ok(documents)
}

/// Parses `category<TAB>text` lines. `origin` is only used in error messages.
pub fn parse_tsv(contents: &str, origin: &Path) -> Result<Vec<LabelledDocument>> {
    let mut documents = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let trimmed = line.trim_end_matches('\r');
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((category, text)) = trimmed.split_once('\t') else {
            return Err(NbcError::InvalidConfig(format!(
                "{}:{}: expected `category<TAB>text`",
                origin.display(),
                idx + 1
            )));
        };
        let category = category.trim();
        if category.is_empty() {
            return Err(NbcError::InvalidConfig(format!(
                "{}:{}: empty category label",
                origin.display(),
                idx + 1
            )));
        }
        documents.push(LabelledDocument {
            category: category.to_owned(),
            text: text.to_owned(),
        });
    }
    Ok(documents)
}

fn directory_label(path: &Path) -> Result<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            NbcError::InvalidConfig(format!(
                "cannot derive a category for {path:?}: file has no parent directory"
            ))
        })
}
