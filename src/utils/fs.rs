use std::path::Path;

/// Last component of a path as a display name, `unknown` when the path has
/// no usable file name (e.g. ends in `..`).
pub fn file_name_or_unknown(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Replace the extension of `name` with `.webp`, appending it when the name
/// has no extension. Used as the save dialog's suggested default.
pub fn with_webp_extension(name: &str) -> String {
    Path::new(name)
        .with_extension("webp")
        .to_string_lossy()
        .to_string()
}
