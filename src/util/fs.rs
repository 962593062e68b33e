//! Filesystem utilities.
//!
//! Path comparison here is component-wise and optionally case-folded, so
//! that workspace roots behave identically whether or not the host
//! filesystem distinguishes letter case.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Whether the host filesystem compares paths case-insensitively.
///
/// Windows (NTFS) and macOS (APFS, HFS+) ship case-insensitive by default;
/// everything else is treated as case-sensitive.
pub fn host_is_case_insensitive() -> bool {
    cfg!(any(windows, target_os = "macos"))
}

fn components_equal(a: &Component<'_>, b: &Component<'_>, fold_case: bool) -> bool {
    if !fold_case {
        return a == b;
    }
    match (a, b) {
        (Component::Normal(a), Component::Normal(b)) => {
            a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
        }
        (Component::Prefix(a), Component::Prefix(b)) => {
            a.as_os_str().to_string_lossy().to_lowercase()
                == b.as_os_str().to_string_lossy().to_lowercase()
        }
        _ => a == b,
    }
}

/// Check whether `prefix` is a whole-component prefix of `path`.
pub fn has_path_prefix(path: &Path, prefix: &Path, fold_case: bool) -> bool {
    strip_path_prefix(path, prefix, fold_case).is_some()
}

/// Strip a whole-component `prefix` from `path`.
///
/// Returns the remainder (possibly empty) when every component of `prefix`
/// matches, `None` otherwise. `/go/srcx` is not below `/go/src`.
pub fn strip_path_prefix(path: &Path, prefix: &Path, fold_case: bool) -> Option<PathBuf> {
    let mut rest = path.components();
    for want in prefix.components() {
        match rest.next() {
            Some(got) if components_equal(&got, &want, fold_case) => {}
            _ => return None,
        }
    }
    Some(rest.as_path().to_path_buf())
}

/// Check whether two paths name the same location, component by component.
pub fn equivalent_paths(a: &Path, b: &Path, fold_case: bool) -> bool {
    let (mut a, mut b) = (a.components(), b.components());
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if components_equal(&x, &y, fold_case) => {}
            _ => return false,
        }
    }
}

/// Dereference every symlink in `path`, yielding the on-disk location.
pub fn resolve_symlinks(path: &Path) -> io::Result<PathBuf> {
    path.canonicalize()
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}
