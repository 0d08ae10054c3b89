//! Resource-loading collaborators that supply map descriptions by name.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, Cursor, Read},
    path::PathBuf,
};

use thiserror::Error;

/// Extension appended when a resource is requested without one.
const DESCRIPTION_EXTENSION: &str = "txt";

/// Failures raised while opening or reading a resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No resource exists under the requested name.
    #[error("resource '{0}' was not found")]
    NotFound(String),
    /// The name would escape the resource root or is empty.
    #[error("resource name '{0}' is not a plain file name")]
    InvalidName(String),
    /// The resource exists but could not be read.
    #[error("could not read resource '{name}'")]
    Io {
        /// Logical name of the resource.
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Supplies readable text streams given a logical resource name.
pub trait ResourceLoader {
    /// Opens the named resource for reading.
    fn open(&self, name: &str) -> Result<Box<dyn Read + '_>, ResourceError>;

    /// Reads the named resource fully into a string.
    fn read_to_string(&self, name: &str) -> Result<String, ResourceError> {
        let mut reader = self.open(name)?;
        let mut text = String::new();
        let _ = reader
            .read_to_string(&mut text)
            .map_err(|source| ResourceError::Io {
                name: name.to_owned(),
                source,
            })?;
        Ok(text)
    }
}

/// Resources stored as files beneath a root directory.
///
/// A name may omit its extension, in which case `<name>.txt` is tried after
/// `<name>` itself.
#[derive(Clone, Debug)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    /// Creates a loader rooted at the provided directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, name: &str) -> [PathBuf; 2] {
        let exact = self.root.join(name);
        let with_extension = self.root.join(format!("{name}.{DESCRIPTION_EXTENSION}"));
        [exact, with_extension]
    }
}

impl ResourceLoader for DirectoryResources {
    fn open(&self, name: &str) -> Result<Box<dyn Read + '_>, ResourceError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ResourceError::InvalidName(name.to_owned()));
        }

        for path in self.candidates(name) {
            if !path.is_file() {
                continue;
            }
            let file = File::open(&path).map_err(|source| ResourceError::Io {
                name: name.to_owned(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "opened resource");
            return Ok(Box::new(file));
        }

        Err(ResourceError::NotFound(name.to_owned()))
    }
}

/// Resources held in memory, keyed by logical name.
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    entries: HashMap<String, String>,
}

impl MemoryResources {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a resource, returning the updated store.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        let _ = self.entries.insert(name.into(), text.into());
        self
    }
}

impl ResourceLoader for MemoryResources {
    fn open(&self, name: &str) -> Result<Box<dyn Read + '_>, ResourceError> {
        self.entries
            .get(name)
            .map(|text| Box::new(Cursor::new(text.as_bytes())) as Box<dyn Read + '_>)
            .ok_or_else(|| ResourceError::NotFound(name.to_owned()))
    }
}
