use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use crate::utils::path::{join_file_name, split_extension};
use crate::utils::time::now_millis;
use super::StorageError;

/// The on-disk layout of one tenant: a flat storage root with a quarantine
/// subdirectory for deleted objects.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    quarantine: PathBuf,
}

impl LocalStorage {
    pub fn new(root: &Path, quarantine: &Path) -> Self {
        LocalStorage {
            root: root.to_path_buf(),
            quarantine: quarantine.to_path_buf(),
        }
    }

    /// Creates the storage root and quarantine directory if missing.
    pub fn ensure_layout(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(&self.quarantine)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn quarantine_dir(&self) -> &Path {
        &self.quarantine
    }

    /// Absolute path of a public file name.
    pub fn object_path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Whether anything, even a dangling symlink, already occupies `file_name`.
    pub fn exists(&self, file_name: &str) -> bool {
        fs::symlink_metadata(self.object_path(file_name)).is_ok()
    }

    /// Writes `content` to a file that must not exist yet.
    ///
    /// The file is created with `create_new`, so a concurrent writer can never
    /// be overwritten. A failed write removes the partial file.
    pub fn write_new(&self, file_name: &str, content: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.object_path(file_name);
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        let written = file.write_all(content).and_then(|_| file.sync_all());
        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        Ok(path)
    }

    /// Moves an already-received temporary file into place as `file_name`.
    ///
    /// A plain rename is tried first. When it fails because source and
    /// destination live on different filesystems, the content is streamed
    /// into a temporary file next to the destination, persisted without
    /// clobbering, and the source is unlinked afterwards.
    pub fn relocate(&self, source: &Path, file_name: &str) -> Result<PathBuf, StorageError> {
        self.relocate_with(source, file_name, |from, to| fs::rename(from, to))
    }

    /// [`relocate`](Self::relocate) with the first-attempt rename supplied by
    /// the caller.
    pub(crate) fn relocate_with<R>(&self, source: &Path, file_name: &str, rename: R) -> Result<PathBuf, StorageError>
    where
        R: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        let destination = self.object_path(file_name);
        if self.exists(file_name) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists").into());
        }
        match rename(source, &destination) {
            Ok(()) => Ok(destination),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(source = %source.display(), "rename crossed devices, copying instead");
                copy_across(source, &destination).map_err(StorageError::CrossDevice)?;
                Ok(destination)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically replaces the content of an existing object, keeping its
    /// permissions.
    pub fn replace(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let dir = path.parent().unwrap_or(&self.root);
        let permissions = fs::metadata(path)?.permissions();
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(content)?;
        staged.as_file().set_permissions(permissions)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Renames an object within the storage root.
    pub fn rename(&self, from: &Path, to_name: &str) -> io::Result<PathBuf> {
        let destination = self.object_path(to_name);
        fs::rename(from, &destination)?;
        Ok(destination)
    }

    /// Moves an object into the quarantine directory and returns its new path.
    ///
    /// An object already quarantined under the same name is never overwritten;
    /// the newcomer gets a millisecond timestamp appended to its stem, plus a
    /// counter when that name is taken too.
    pub fn quarantine(&self, path: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.quarantine)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "object has no file name"))?;

        let mut destination = self.quarantine.join(file_name);
        if fs::symlink_metadata(&destination).is_ok() {
            let (stem, extension) = split_extension(file_name);
            let stamp = now_millis();
            let mut counter = 0u32;
            loop {
                let stamped = match counter {
                    0 => format!("{}-{}", stem, stamp),
                    n => format!("{}-{}-{}", stem, stamp, n),
                };
                destination = self.quarantine.join(join_file_name(&stamped, extension.unwrap_or("")));
                if fs::symlink_metadata(&destination).is_err() {
                    break;
                }
                counter += 1;
            }
        }
        fs::rename(path, &destination)?;
        Ok(destination)
    }
}

/// Copy-then-unlink move used when `rename` cannot cross filesystems.
///
/// At most one complete file ever appears at `destination`: the copy lands
/// in a temporary file that is only persisted once fully written, and if the
/// source cannot be unlinked afterwards the destination is removed again so
/// the move fails as a whole.
pub(crate) fn copy_across(source: &Path, destination: &Path) -> io::Result<()> {
    let dir = destination
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let mut staged = NamedTempFile::new_in(dir)?;
    let mut input = File::open(source)?;
    io::copy(&mut input, staged.as_file_mut())?;
    staged.as_file().set_permissions(input.metadata()?.permissions())?;
    staged.as_file().sync_all()?;
    // 临时文件在出错时会被自动删除
    staged.persist_noclobber(destination).map_err(|e| e.error)?;

    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    Ok(())
}
