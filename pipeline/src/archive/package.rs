//! Canonical source-tree packaging.
//!
//! Builds the deployable archive for a source directory: one entry per
//! file, rooted under a fixed top-level directory, with excluded
//! directories pruned and excluded file suffixes skipped. Construction
//! is deterministic for an unchanged tree, so repackaging can be
//! verified byte for byte.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use kiln_core::error::{KilnError, Result};
use tar::Builder;

/// Top-level directory every packaged entry is rooted under.
pub const PACKAGE_ROOT: &str = "src";

/// Mode written for every packaged entry. Within the validation mask.
const ENTRY_MODE: u32 = 0o644;

/// Exclusion rules applied while packaging a source tree.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    /// Directory names pruned outright, not descended into
    dirs: Vec<String>,
    /// File suffixes skipped regardless of directory
    extensions: Vec<String>,
}

impl ExclusionRules {
    pub fn new(dirs: &[&str], extensions: &[&str]) -> Self {
        Self {
            dirs: dirs.iter().map(|d| d.to_string()).collect(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn excludes_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|d| d == name)
    }

    fn excludes_file(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Package a source directory into a gzip-compressed tar archive.
///
/// A trailing path separator is normalized away before use. Entries are
/// written in sorted traversal order with a fixed mode and zero mtime,
/// so two invocations over an unchanged tree produce byte-identical
/// archives.
pub fn package_source(path: &str, rules: &ExclusionRules) -> Result<Vec<u8>> {
    if path.is_empty() {
        return Err(KilnError::InvalidInput(
            "source path cannot be empty".to_string(),
        ));
    }
    let path = path.trim_end_matches('/');
    tracing::debug!(path, "Packaging deployable-unit source");

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    let root = Path::new(path);
    add_dir_to_package(&mut builder, root, root, rules)?;

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

/// Recursively add a directory's files to the package.
fn add_dir_to_package<W: Write>(
    builder: &mut Builder<W>,
    root: &Path,
    current: &Path,
    rules: &ExclusionRules,
) -> Result<()> {
    let mut entries = fs::read_dir(current)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            if rules.excludes_dir(&name) {
                tracing::debug!(dir = %path.display(), "Pruning excluded directory");
                continue;
            }
            add_dir_to_package(builder, root, &path, rules)?;
        } else if metadata.is_file() {
            if rules.excludes_file(&name) {
                continue;
            }
            let relative = path.strip_prefix(root).map_err(|e| {
                KilnError::InvalidInput(format!(
                    "failed to compute relative path for {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let entry_name = Path::new(PACKAGE_ROOT).join(relative);
            let content = fs::read(&path)?;
            append_bytes(builder, &entry_name.to_string_lossy(), &content)?;
        }
        // Symlinks and other special files are not packaged.
    }

    Ok(())
}

/// Append a single named regular-file entry to a caller-owned tar stream.
pub fn append_bytes<W: Write>(builder: &mut Builder<W>, name: &str, bytes: &[u8]) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(bytes.len() as u64);
    header.set_mode(ENTRY_MODE);
    header.set_mtime(0);
    header.set_cksum();
    builder.append_data(&mut header, name, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn java_rules() -> ExclusionRules {
        ExclusionRules::new(&["target", "build", "out"], &[".class"])
    }

    // Read an archive back into name → content.
    fn read_package(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
        use std::io::Read;

        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        let mut files = BTreeMap::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().to_string();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            files.insert(name, content);
        }
        files
    }

    fn write_tree(root: &Path, files: &[(&str, &str)]) {
        for (path, content) in files {
            let full = root.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
    }

    // --- package_source ---

    #[test]
    fn test_empty_path_is_invalid_input() {
        let result = package_source("", &java_rules());
        assert!(matches!(result, Err(KilnError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let result = package_source("/nonexistent/project", &java_rules());
        assert!(matches!(result, Err(KilnError::Io(_))));
    }

    #[test]
    fn test_entries_rooted_under_package_root() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("src/Main.java", "public class Main {}"),
                ("pom.xml", "<project/>"),
            ],
        );

        let bytes = package_source(&tmp.path().to_string_lossy(), &java_rules()).unwrap();
        let files = read_package(&bytes);

        assert!(files.contains_key("src/src/Main.java"));
        assert!(files.contains_key("src/pom.xml"));
        assert_eq!(files["src/pom.xml"], b"<project/>");
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("pom.xml", "<project/>")]);

        let with_slash = format!("{}/", tmp.path().to_string_lossy());
        let bytes = package_source(&with_slash, &java_rules()).unwrap();
        assert!(read_package(&bytes).contains_key("src/pom.xml"));
    }

    #[test]
    fn test_excluded_directories_pruned() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("src/Main.java", "public class Main {}"),
                ("build/Main.class", "bytecode"),
                ("target/classes/Main.class", "bytecode"),
                ("out/production/notes.txt", "junk"),
            ],
        );

        let bytes = package_source(&tmp.path().to_string_lossy(), &java_rules()).unwrap();
        let files = read_package(&bytes);

        assert_eq!(files.len(), 1);
        assert!(files.contains_key("src/src/Main.java"));
    }

    #[test]
    fn test_excluded_extension_skipped_anywhere() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("src/Main.java", "public class Main {}"),
                ("src/Main.class", "bytecode"),
            ],
        );

        let bytes = package_source(&tmp.path().to_string_lossy(), &java_rules()).unwrap();
        let files = read_package(&bytes);

        assert!(files.contains_key("src/src/Main.java"));
        assert!(!files.contains_key("src/src/Main.class"));
    }

    #[test]
    fn test_packaging_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("src/b.java", "class b {}"),
                ("src/a.java", "class a {}"),
                ("pom.xml", "<project/>"),
            ],
        );

        let path = tmp.path().to_string_lossy().to_string();
        let first = package_source(&path, &java_rules()).unwrap();
        let second = package_source(&path, &java_rules()).unwrap();
        assert_eq!(first, second);
    }

    // --- append_bytes ---

    #[test]
    fn test_append_bytes_read_back() {
        let mut builder = tar::Builder::new(Vec::new());
        append_bytes(&mut builder, "binpackage.tar", b"artifact bytes").unwrap();
        let bytes = builder.into_inner().unwrap();

        let mut archive = tar::Archive::new(&bytes[..]);
        let mut entries = archive.entries().unwrap();
        let entry = entries.next().unwrap().unwrap();
        assert_eq!(
            entry.path().unwrap().to_string_lossy(),
            "binpackage.tar"
        );
        assert_eq!(entry.header().mode().unwrap(), 0o644);
        assert_eq!(entry.header().size().unwrap(), 14);
    }
}
