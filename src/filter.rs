//! Schema files, compiled once
//!
//! A [`Filter`] turns notation files into definitions and keeps them in two
//! places: an in-process memo keyed by canonical path and modification time,
//! and a directory of serialized definitions named after the SHA-256 of the
//! canonical path. A cached definition is reused while it is not older than
//! its source file.

#![cfg(feature = "cache")]

use crate::{
  ast::Definition,
  parser,
  validator::{JSONValidator, ValidationError, ValidatorOptions},
};

use std::{
  collections::HashMap,
  fs, io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex, PoisonError},
  time::SystemTime,
};

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Filter result
pub type Result<T> = std::result::Result<T, Error>;

/// Schema resolution or validation error
#[derive(Debug, displaydoc::Display)]
pub enum Error {
  /// error accessing {path}: {source}
  Io {
    /// File or directory being accessed
    path: PathBuf,
    /// Underlying error
    source: io::Error,
  },
  /// error parsing {path}: {source}
  Syntax {
    /// Schema file
    path: PathBuf,
    /// Syntax error, positioned in the comment-stripped source
    source: parser::Error,
  },
  /// error serializing cached definition: {0}
  Cache(serde_json::Error),
  /// {0}
  Validation(ValidationError),
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Error::Io { source, .. } => Some(source),
      Error::Syntax { source, .. } => Some(source),
      Error::Cache(error) => Some(error),
      Error::Validation(error) => Some(error),
    }
  }
}

impl From<ValidationError> for Error {
  fn from(e: ValidationError) -> Self {
    Error::Validation(e)
  }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
  move |source| Error::Io {
    path: path.to_path_buf(),
    source,
  }
}

#[derive(Debug)]
struct Compiled {
  modified: SystemTime,
  definition: Arc<Definition>,
}

/// Resolves schema files to definitions and validates values against them
#[derive(Debug)]
pub struct Filter {
  cache_dir: PathBuf,
  options: ValidatorOptions,
  compiled: Mutex<HashMap<PathBuf, Compiled>>,
}

impl Default for Filter {
  fn default() -> Self {
    Filter::new(None)
  }
}

impl Filter {
  /// Creates a filter caching into `cache_dir`. `None` or an empty path uses
  /// `pm1` under the system temporary directory
  pub fn new(cache_dir: Option<PathBuf>) -> Self {
    let cache_dir = match cache_dir {
      Some(dir) if !dir.as_os_str().is_empty() => dir,
      _ => std::env::temp_dir().join("pm1"),
    };

    Filter {
      cache_dir,
      options: ValidatorOptions::default(),
      compiled: Mutex::new(HashMap::new()),
    }
  }

  /// Sets the options used by [`Filter::filter`]
  pub fn with_options(mut self, options: ValidatorOptions) -> Self {
    self.options = options;
    self
  }

  /// Directory holding serialized definitions
  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  /// Cache file for a canonical schema path
  pub fn cache_path(&self, schema: &Path) -> PathBuf {
    let digest = Sha256::digest(schema.to_string_lossy().as_bytes());

    self
      .cache_dir
      .join(format!("{}.json", base16::encode_lower(&digest)))
  }

  /// Returns the definition compiled from the notation file at `path`
  ///
  /// Concurrent calls are serialized, so a schema is never compiled twice at
  /// the same time.
  pub fn resolve(&self, path: impl AsRef<Path>) -> Result<Arc<Definition>> {
    let path = path.as_ref();
    let schema = fs::canonicalize(path).map_err(io_error(path))?;
    let modified = modified(&schema)?;

    let mut compiled = self
      .compiled
      .lock()
      .unwrap_or_else(PoisonError::into_inner);

    if let Some(entry) = compiled.get(&schema) {
      if entry.modified == modified {
        log::trace!("memoized definition for {}", schema.display());
        return Ok(entry.definition.clone());
      }
    }

    let definition = Arc::new(self.load(&schema, modified)?);

    compiled.insert(
      schema,
      Compiled {
        modified,
        definition: definition.clone(),
      },
    );

    Ok(definition)
  }

  /// Resolves the schema at `path` and validates `value` against it. A
  /// failed validation is returned as [`Error::Validation`]
  pub fn filter(&self, path: impl AsRef<Path>, value: &Value) -> Result<()> {
    let definition = self.resolve(path)?;

    JSONValidator::with_options(&definition, self.options)
      .validate(value)
      .into_result()?;

    Ok(())
  }

  fn load(&self, schema: &Path, modified: SystemTime) -> Result<Definition> {
    let cache = self.cache_path(schema);

    if let Some(definition) = read_cache(&cache, modified) {
      log::debug!("cache hit for {} in {}", schema.display(), cache.display());
      return Ok(definition);
    }

    log::debug!("cache miss for {}", schema.display());

    let source = fs::read_to_string(schema).map_err(io_error(schema))?;
    let definition = parser::parse(&source).map_err(|source| Error::Syntax {
      path: schema.to_path_buf(),
      source,
    })?;

    fs::create_dir_all(&self.cache_dir).map_err(io_error(&self.cache_dir))?;
    let serialized = serde_json::to_string(&definition).map_err(Error::Cache)?;
    fs::write(&cache, serialized).map_err(io_error(&cache))?;

    log::info!("compiled {} into {}", schema.display(), cache.display());

    Ok(definition)
  }
}

fn modified(path: &Path) -> Result<SystemTime> {
  fs::metadata(path)
    .and_then(|m| m.modified())
    .map_err(io_error(path))
}

/// A missing, stale or unreadable cache file counts as a miss
fn read_cache(cache: &Path, source_modified: SystemTime) -> Option<Definition> {
  let cache_modified = fs::metadata(cache).and_then(|m| m.modified()).ok()?;
  if cache_modified < source_modified {
    log::debug!("stale cache file {}", cache.display());
    return None;
  }

  let text = fs::read_to_string(cache).ok()?;

  match serde_json::from_str(&text) {
    Ok(definition) => Some(definition),
    Err(e) => {
      log::warn!("discarding cache file {}: {}", cache.display(), e);
      None
    }
  }
}
