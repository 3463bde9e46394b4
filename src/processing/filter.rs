//! File filtering rules.
//!
//! Two independent mechanisms live here:
//! - [`FileFilter`] drops files that are never worth chunking: empty files,
//!   VCS/CI/editor metadata, lockfiles, images and other binaries.
//! - [`FileSelector`] applies caller-provided whitelist/blacklist globs before
//!   files are even read.

use std::collections::HashSet;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::Result;
use crate::processing::language::extension_of;

/// File names that are never chunked.
pub const DEFAULT_SKIP: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".gitkeep",
    ".DS_Store",
    ".editorconfig",
    ".npmignore",
    "LICENSE",
    ".yarnignore",
    ".dockerignore",
    ".prettierignore",
    ".eslintignore",
    ".stylelintignore",
    ".gitlab-ci.yml",
    ".travis.yml",
    ".circleci",
    ".github",
    ".vscode",
    ".idea",
    ".git",
    ".hg",
    ".svn",
    ".bzr",
    ".npmrc",
    ".yarnrc",
    ".yarnrc.yml",
    ".yarnrc.yaml",
];

/// Extensions of images, documents and lockfiles.
pub const BINARY_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".bmp", ".webp", ".ico", ".tiff", ".tif",
    ".heic", ".heif", ".avif", ".pdf", ".lock",
];

/// Configuration for file filtering.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Names matched exactly against the whole file name.
    pub skip_names: HashSet<String>,
    /// Extensions (with leading dot) to exclude; compared case-sensitively.
    pub excluded_extensions: HashSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            skip_names: DEFAULT_SKIP.iter().map(|s| s.to_string()).collect(),
            excluded_extensions: BINARY_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Why a file was not chunked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Content is empty or whitespace only.
    Empty,
    /// The file name is on the skip list.
    SkipListed(String),
    /// The extension marks an image, document or lockfile.
    Binary(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Empty => write!(f, "empty content"),
            SkipReason::SkipListed(name) => write!(f, "skip-listed name: {}", name),
            SkipReason::Binary(ext) => write!(f, "binary extension: {}", ext),
        }
    }
}

/// Filter deciding which file records reach classification.
#[derive(Debug, Clone)]
pub struct FileFilter {
    config: FilterConfig,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FileFilter {
    /// Create a new file filter with the given configuration.
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Create a filter with the default skip list and binary extensions.
    pub fn with_defaults() -> Self {
        Self::new(FilterConfig::default())
    }

    /// Check if a file should be processed.
    ///
    /// Returns `Ok(())` if the file should be chunked, or the reason it is skipped.
    pub fn should_process(&self, file_name: &str, content: &str) -> std::result::Result<(), SkipReason> {
        if content.trim().is_empty() {
            return Err(SkipReason::Empty);
        }

        if self.config.skip_names.contains(file_name) {
            return Err(SkipReason::SkipListed(file_name.to_string()));
        }

        let extension = extension_of(file_name);
        if self.config.excluded_extensions.contains(extension) {
            return Err(SkipReason::Binary(extension.to_string()));
        }

        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

/// Whitelist/blacklist selection over file paths.
///
/// Patterns are shell-style wildcards; `*` also matches `/`. A path is
/// selected when it matches any whitelist pattern (or no whitelist is set)
/// and no blacklist pattern.
#[derive(Debug, Clone, Default)]
pub struct FileSelector {
    whitelist: Option<GlobSet>,
    blacklist: Option<GlobSet>,
}

impl FileSelector {
    /// Selector that accepts every path.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selector; empty pattern lists are treated as absent.
    pub fn new<S: AsRef<str>>(whitelist: &[S], blacklist: &[S]) -> Result<Self> {
        Ok(Self {
            whitelist: build_set(whitelist)?,
            blacklist: build_set(blacklist)?,
        })
    }

    pub fn is_selected(&self, path: &str) -> bool {
        let whitelisted = self
            .whitelist
            .as_ref()
            .map_or(true, |set| set.is_match(path));
        let blacklisted = self
            .blacklist
            .as_ref()
            .map_or(false, |set| set.is_match(path));

        whitelisted && !blacklisted
    }
}

fn build_set<S: AsRef<str>>(patterns: &[S]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    Ok(Some(builder.build()?))
}
