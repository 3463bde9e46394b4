//! Processing module for file classification and selection.
//!
//! This module provides:
//! - Language classification from file extensions
//! - File filtering (skip lists, binaries, whitelist/blacklist globs)
//! - A local repository loader feeding the chunking pipeline

pub mod filter;
pub mod language;
pub mod loader;

pub use filter::{FileFilter, FileSelector, FilterConfig, SkipReason, BINARY_EXTENSIONS, DEFAULT_SKIP};
pub use language::{extension_of, language_of, SplitterLanguage, SupportedLanguage};
pub use loader::LocalRepository;
