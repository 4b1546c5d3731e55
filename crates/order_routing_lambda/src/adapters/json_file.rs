use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum JsonFileError {
    #[error("simulation file '{}' not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("file '{}' is not valid JSON: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to access file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JsonFileError {
    fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, JsonFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|error| JsonFileError::from_io(path, error))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            JsonFileError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            JsonFileError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

pub fn load_json_value(path: impl AsRef<Path>) -> Result<Value, JsonFileError> {
    load_json(path)
}

/// Writes `value` as two-space indented JSON, replacing any existing file.
pub fn save_json(value: &impl Serialize, path: impl AsRef<Path>) -> Result<(), JsonFileError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|error| JsonFileError::from_io(path, error))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| JsonFileError::Io {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    writer
        .flush()
        .map_err(|error| JsonFileError::from_io(path, error))
}
