//! Folder explorer
//!
//! Maps request paths onto files under a served folder. Kernel scripts
//! found there are evaluated through `Get`; anything else is a static
//! asset.

use std::path::{Component, Path, PathBuf};

/// Extensions evaluated by the kernel rather than served as-is
pub const SCRIPT_EXTENSIONS: &[&str] = &["wl", "m", "wls", "mx"];

/// What a request path resolved to inside the folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderEntry {
    /// Kernel script to `Get`
    Script(PathBuf),
    /// Plain file to serve without the kernel
    Static(PathBuf),
}

/// Resolve `request_path` to an existing file under `folder`
///
/// Segments are percent-decoded before they touch the filesystem.
/// Directories resolve to their `index` file. Segments that decode to
/// `.`, `..` or anything containing a separator never resolve.
pub fn resolve_folder_path(folder: &Path, request_path: &str, index: &str) -> Option<PathBuf> {
    let mut path = folder.to_path_buf();
    for raw in request_path.split('/').filter(|s| !s.is_empty()) {
        let segment = urlencoding::decode(raw).ok()?;
        if segment.contains(['/', '\\', '\0']) {
            return None;
        }
        let mut components = Path::new(segment.as_ref()).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => path.push(name),
            _ => return None,
        }
    }

    if path.is_dir() {
        path.push(index);
    }

    path.is_file().then_some(path)
}

/// Resolve and classify a request path
pub fn lookup(folder: &Path, request_path: &str, index: &str) -> Option<FolderEntry> {
    resolve_folder_path(folder, request_path, index).map(|path| {
        if is_script(&path) {
            FolderEntry::Script(path)
        } else {
            FolderEntry::Static(path)
        }
    })
}

pub fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCRIPT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
