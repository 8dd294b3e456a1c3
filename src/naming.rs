//! Collision-free filename generation for the backup tree.
//!
//! Two naming strategies are used depending on whether the original name
//! already exists in the target category directory:
//! - duplicates become `dups_<9 random chars><ext>`, dropping the original
//!   base name entirely;
//! - everything else becomes `<base>_<YYYYMMDD><ext>`, with a random suffix
//!   appended if a same-day run already produced that name.

use chrono::Local;
use rand::{Rng, rng};
use std::path::Path;

const SUFFIX_LEN: usize = 9;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a 9-character lowercase alphanumeric suffix.
fn random_suffix() -> String {
    let mut r = rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[r.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Splits a filename into stem and extension, keeping the leading dot on
/// the extension. A leading-dot name like `.env` has no extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Lowercased, dot-prefixed extension of a filename, if it has one.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = split_name(name);
    (!ext.is_empty()).then(|| ext.to_lowercase())
}

/// Produces a name for `original_name` that does not collide with any
/// entry in `target_dir`.
///
/// `is_duplicate` is decided by the caller: it means a file with the same
/// original name already resides in `target_dir`. That branch is not
/// rechecked against existing files; with 36^9 possible suffixes a
/// collision is negligible. The dated branch is rechecked in a loop
/// because same-day runs make collisions likely.
pub fn unique_name(target_dir: &Path, original_name: &str, is_duplicate: bool) -> String {
    let (stem, ext) = split_name(original_name);

    if is_duplicate {
        return format!("dups_{}{}", random_suffix(), ext);
    }

    let date = Local::now().format("%Y%m%d").to_string();
    let dated = format!("{stem}_{date}{ext}");
    if !target_dir.join(&dated).exists() {
        return dated;
    }

    loop {
        let candidate = format!("{stem}_{date}_{}{ext}", random_suffix());
        if !target_dir.join(&candidate).exists() {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn today() -> String {
        Local::now().format("%Y%m%d").to_string()
    }

    #[test]
    fn test_split_name_basic() {
        assert_eq!(split_name("a.jpg"), ("a", ".jpg"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("README"), ("README", ""));
        assert_eq!(split_name(".env"), (".env", ""));
    }

    #[test]
    fn test_extension_of_lowercases() {
        assert_eq!(extension_of("photo.JPG"), Some(".jpg".to_string()));
        assert_eq!(extension_of("README"), None);
    }

    #[test]
    fn test_duplicate_name_shape() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let name = unique_name(temp_dir.path(), "a.jpg", true);

        assert!(name.starts_with("dups_"));
        assert!(name.ends_with(".jpg"));
        // dups_ + 9 suffix chars + .jpg
        assert_eq!(name.len(), 5 + 9 + 4);
        let suffix = &name[5..14];
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_dated_name_when_free() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let name = unique_name(temp_dir.path(), "a.jpg", false);
        assert_eq!(name, format!("a_{}.jpg", today()));
    }

    #[test]
    fn test_dated_name_rechecked_on_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dated = format!("a_{}.jpg", today());
        fs::write(temp_dir.path().join(&dated), b"taken").expect("Failed to write file");

        let name = unique_name(temp_dir.path(), "a.jpg", false);
        assert_ne!(name, dated);
        assert!(name.starts_with(&format!("a_{}_", today())));
        assert!(name.ends_with(".jpg"));
        assert!(!temp_dir.path().join(&name).exists());
    }

    #[test]
    fn test_name_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let name = unique_name(temp_dir.path(), "README", false);
        assert_eq!(name, format!("README_{}", today()));
    }
}
