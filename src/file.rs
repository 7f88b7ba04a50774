//! File manipulation utilities.

use std::fs;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::to_writer_pretty;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("{} does not name a file", .path.display())]
    InvalidPath { path: PathBuf },

    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("cannot encode {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot replace {}: {source}", .path.display())]
    Persist { path: PathBuf, source: io::Error },
}

/// JSON-encodes the `value` in pretty-printed form and writes it to a given `path`, creating any missing
/// parent directories. The document is staged in a uniquely named temporary file beside `path` and moved
/// over it once complete, so `path` is either fully replaced or left as it was.
pub fn write_json(path: impl AsRef<Path>, value: &impl Serialize) -> Result<(), WriteError> {
    let path = path.as_ref();
    if path.file_name().is_none() {
        return Err(WriteError::InvalidPath {
            path: path.to_path_buf(),
        });
    }
    let dir = match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|source| WriteError::Create {
        path: dir.to_path_buf(),
        source,
    })?;
    let staging = staged.path().to_path_buf();
    debug!("staging {} in {}", path.display(), staging.display());
    write_staged(staged.as_file_mut(), &staging, value)?;
    staged.persist(path).map_err(|err| WriteError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

fn write_staged(file: &mut File, staging: &Path, value: &impl Serialize) -> Result<(), WriteError> {
    let create_err = |source| WriteError::Create {
        path: staging.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(&mut *file);
    to_writer_pretty(&mut writer, value).map_err(|source| WriteError::Serialize {
        path: staging.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(create_err)?;
    drop(writer);
    file.sync_all().map_err(create_err)
}

pub trait WriteJsonFile<S: Serialize> {
    fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), WriteError>;
}

impl<S: Serialize> WriteJsonFile<S> for S {
    fn write_json_file(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        write_json(path, self)
    }
}
