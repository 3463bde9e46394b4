//! Local repository loader.
//!
//! Produces [`FileRecord`]s from a checked-out directory so the pipeline can
//! run without a remote VCS collaborator.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;
use crate::processing::filter::FileSelector;
use crate::types::FileRecord;

const VCS_DIRECTORIES: &[&str] = &[".git", ".hg", ".svn", ".bzr"];

/// A repository checked out on the local file system.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield every selected file under the root.
    ///
    /// Names are relative to the root and always `/`-separated. Contents that
    /// are not valid UTF-8 are decoded lossily.
    pub fn files<'a>(
        &'a self,
        selector: &'a FileSelector,
    ) -> impl Iterator<Item = Result<FileRecord>> + 'a {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_vcs_directory(entry))
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => return Some(Err(std::io::Error::from(err).into())),
                };
                if !entry.file_type().is_file() {
                    return None;
                }

                let file_name = self.relative_name(entry.path());
                if !selector.is_selected(&file_name) {
                    debug!(file = %file_name, "File not selected");
                    return None;
                }

                Some(read_record(entry.path(), file_name))
            })
    }

    fn relative_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_vcs_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| VCS_DIRECTORIES.contains(&name))
}

fn read_record(path: &Path, file_name: String) -> Result<FileRecord> {
    let bytes = std::fs::read(path)?;
    Ok(FileRecord::new(
        file_name,
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn repo_fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join("src/main.py"), "def main():\n    pass\n").unwrap();
        fs::write(dir.path().join("src/nested/util.go"), "func A(){}\n").unwrap();
        fs::write(dir.path().join("src/test_main.py"), "def test():\n    pass\n").unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(dir.path().join("README.md"), "# Demo\n").unwrap();
        dir
    }

    #[test]
    fn test_walks_relative_names_and_skips_vcs() {
        let dir = repo_fixture();
        let repo = LocalRepository::new(dir.path());
        let selector = FileSelector::all();

        let names: Vec<String> = repo
            .files(&selector)
            .map(|record| record.unwrap().file_name)
            .collect();

        assert_eq!(
            names,
            vec![
                "README.md".to_string(),
                "src/main.py".to_string(),
                "src/nested/util.go".to_string(),
                "src/test_main.py".to_string(),
            ]
        );
    }

    #[test]
    fn test_applies_selector() {
        let dir = repo_fixture();
        let repo = LocalRepository::new(dir.path());
        let selector = FileSelector::new(&["*.py"], &["*test_*"]).unwrap();

        let records: Vec<FileRecord> = repo.files(&selector).map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name, "src/main.py");
        assert_eq!(records[0].file_content, "def main():\n    pass\n");
    }
}
