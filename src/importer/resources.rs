use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a named resource could not be turned into bytes.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource `{name}` not found")]
    NotFound { name: String },
    #[error("resource `{name}` could not be read: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Resolves a logical resource name (no extension) to raw bytes.
pub trait ResourceSource {
    fn load(&self, name: &str) -> Result<Vec<u8>, ResourceError>;
}

/// Reference files compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledResources;

const BUNDLED: &[(&str, &[u8])] = &[
    (
        "national_parks",
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/national_parks.json")),
    ),
    (
        "american_women",
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/american_women.json")),
    ),
];

impl ResourceSource for BundledResources {
    fn load(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .map(|(_, bytes)| bytes.to_vec())
            .ok_or_else(|| ResourceError::NotFound {
                name: name.to_string(),
            })
    }
}

/// Reads `<dir>/<name>.json` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    dir: PathBuf,
}

impl DirectoryResources {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ResourceSource for DirectoryResources {
    fn load(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        fs::read(self.path_for(name)).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ResourceError::NotFound {
                    name: name.to_string(),
                }
            } else {
                ResourceError::Unreadable {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }
}
