//! Shared filesystem helpers built on `cap-std` and `camino`.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Resolve an ambient directory for the given path and return the directory with the file name.
///
/// # Errors
///
/// Fails when `path` has no file name or its parent cannot be opened.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file using capability-based IO.
///
/// # Errors
///
/// Fails with [`io::ErrorKind::NotFound`] when nothing exists at `path`, or
/// when the parent directory cannot be opened.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create `path` and any missing ancestors.
///
/// # Errors
///
/// Fails when a component cannot be created.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    if path.as_str().is_empty() || path == Utf8Path::new("/") {
        return Ok(());
    }
    let (base_dir, relative) = base_dir_and_relative(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Write `contents` to `path`, creating parent directories as needed.
///
/// An existing file is replaced.
///
/// # Errors
///
/// Fails when the parent cannot be created or the file cannot be written.
pub fn write_utf8_file(path: &Utf8Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(name.as_str(), contents)
}

/// Split an absolute or relative path into an ambient base directory and a relative suffix.
///
/// # Errors
///
/// Fails for non-UTF-8 prefixes or when the base directory cannot be
/// opened.
pub fn base_dir_and_relative(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();

    let (base, relative) = match std_path.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_path.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (base, relative)
        }
        // Unix-style absolute path.
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        // Relative path: resolve from the current directory.
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;

    Ok((dir, relative))
}
