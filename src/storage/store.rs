//! A file-backed store of items
//!
//! The [`Store`] keeps every item in memory, in insertion order, and replaces
//! the whole file after each change.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    slice,
};

use tempfile::NamedTempFile;
use tracing::{debug, instrument, warn};

use crate::{
    domain::Item,
    storage::record::{LoadError, read_records, write_records},
};

/// An ordered collection of items saved to a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// The file items are persisted to.
    path: PathBuf,
    items: Vec<Item>,
}

impl Store {
    /// Loads the store from the file at the given path.
    ///
    /// A missing file is not an error; it yields an empty store which is
    /// created on disk by the first change.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or if it
    /// contains an incomplete record.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();

        let items = match File::open(&path) {
            Ok(file) => read_records(BufReader::new(file))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no item file found, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        debug!(count = items.len(), "loaded items");
        Ok(Self { path, items })
    }

    /// The path of the file backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The number of items in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends an item and persists the store.
    ///
    /// Duplicate names are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written. The item is not kept in
    /// that case.
    #[instrument(skip_all, fields(name = item.name()))]
    pub fn add(&mut self, item: Item) -> Result<&Item, SaveError> {
        let index = self.items.len();
        self.items.push(item);

        if let Err(e) = self.flush() {
            self.items.truncate(index);
            return Err(e);
        }

        Ok(&self.items[index])
    }

    /// Removes the first item with exactly the given name and persists the
    /// store.
    ///
    /// Returns the removed item, or `None` if no item has that name. Nothing
    /// is written when no item matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written. The item is put back in
    /// its original position in that case.
    #[instrument(skip(self))]
    pub fn delete(&mut self, name: &str) -> Result<Option<Item>, SaveError> {
        let Some(index) = self.position(name) else {
            debug!("no matching item");
            return Ok(None);
        };

        let item = self.items.remove(index);

        if let Err(e) = self.flush() {
            self.items.insert(index, item);
            return Err(e);
        }

        Ok(Some(item))
    }

    /// Lists every item in insertion order.
    #[must_use]
    pub fn list(&self) -> Listing<'_> {
        if self.items.is_empty() {
            Listing::Empty
        } else {
            Listing::Items(self.items.iter())
        }
    }

    /// Finds the first item with exactly the given name.
    #[must_use]
    pub fn search(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name() == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name() == name)
    }

    /// Rewrites the backing file with the current items.
    fn flush(&self) -> Result<(), SaveError> {
        let count = self.items.len();
        match replace_file(&self.path, |writer| write_records(writer, &self.items)) {
            Ok(()) => {
                debug!(count, "saved items");
                Ok(())
            }
            Err(source) => {
                warn!(error = %source, "failed to save items");
                Err(SaveError {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

/// Replaces the file at `path` with whatever `write` produces.
///
/// The content goes to a temporary file in the same directory, which is then
/// renamed over `path`. A failed write leaves the previous file untouched.
fn replace_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(file.as_file_mut());
    write(&mut writer)?;
    writer.flush()?;
    drop(writer);

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// The result of listing a store.
///
/// Iterating a listing yields items lazily, in insertion order.
#[derive(Debug, Clone)]
pub enum Listing<'a> {
    /// The store holds no items.
    Empty,
    /// The store holds at least one item.
    Items(slice::Iter<'a, Item>),
}

impl<'a> Iterator for Listing<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Empty => None,
            Self::Items(items) => items.next(),
        }
    }
}

/// Error returned when the store cannot be written to disk.
#[derive(Debug, thiserror::Error)]
#[error("failed to save items to {}", .path.display())]
pub struct SaveError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl SaveError {
    /// The file that could not be written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
