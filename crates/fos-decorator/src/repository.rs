//! Template Repository
//!
//! Hands out documents by name. Every fetch returns an independent copy, so
//! concurrent compositions can mutate what they get without coordination.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fos_dom::Document;
use fos_html::{ParseError, TemplateMode, parse_with_mode};

/// Source of template documents
pub trait TemplateRepository: Send + Sync {
    /// Fetch a fresh, independently mutable copy of the named template
    fn resolve(&self, name: &str) -> Result<Document, RepositoryError>;
}

impl<T: TemplateRepository + ?Sized> TemplateRepository for &T {
    fn resolve(&self, name: &str) -> Result<Document, RepositoryError> {
        (**self).resolve(name)
    }
}

impl<T: TemplateRepository + ?Sized> TemplateRepository for Box<T> {
    fn resolve(&self, name: &str) -> Result<Document, RepositoryError> {
        (**self).resolve(name)
    }
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Template not found: {name}")]
    NotFound { name: String },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Templates held in memory, parsed once
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    templates: HashMap<String, Document>,
    mode: TemplateMode,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse sources added from now on with the given mode
    pub fn with_mode(mut self, mode: TemplateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder form of `insert`
    pub fn with_template(mut self, name: &str, source: &str) -> Result<Self, RepositoryError> {
        self.insert(name, source)?;
        Ok(self)
    }

    /// Parse and store a template source
    pub fn insert(&mut self, name: &str, source: &str) -> Result<(), RepositoryError> {
        let document = parse_with_mode(source, name, self.mode)?;
        self.templates.insert(name.to_string(), document);
        Ok(())
    }

    /// Store an already built document
    pub fn insert_document(&mut self, name: &str, document: Document) {
        self.templates.insert(name.to_string(), document);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateRepository for MemoryRepository {
    fn resolve(&self, name: &str) -> Result<Document, RepositoryError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                name: name.to_string(),
            })
    }
}

/// Templates read from a directory on every fetch
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
    suffix: String,
    mode: TemplateMode,
}

impl FileRepository {
    /// Templates under `root`, named without the `.html` suffix
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: ".html".to_string(),
            mode: TemplateMode::Html,
        }
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn with_mode(mut self, mode: TemplateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a template name
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{}", self.suffix))
    }
}

impl TemplateRepository for FileRepository {
    fn resolve(&self, name: &str) -> Result<Document, RepositoryError> {
        let path = self.path_for(name);
        let source = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RepositoryError::NotFound {
                    name: name.to_string(),
                }
            } else {
                RepositoryError::Io { path, source }
            }
        })?;
        tracing::debug!("Loaded template {} ({} bytes)", name, source.len());
        Ok(parse_with_mode(&source, name, self.mode)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_repository_returns_copies() {
        let repo = MemoryRepository::new()
            .with_template("page", "<html><body><p>x</p></body></html>")
            .unwrap();

        let mut first = repo.resolve("page").unwrap();
        let body = first.body().unwrap();
        first.tree_mut().clear_children(body);

        let second = repo.resolve("page").unwrap();
        let body = second.body().unwrap();
        assert_eq!(second.tree().child_ids(body).len(), 1);
        assert_eq!(second.url(), "page");
    }

    #[test]
    fn test_memory_repository_not_found() {
        let repo = MemoryRepository::new();
        assert!(matches!(
            repo.resolve("missing"),
            Err(RepositoryError::NotFound { name }) if name == "missing"
        ));
    }

    #[test]
    fn test_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("layouts")).unwrap();
        std::fs::write(
            dir.path().join("layouts/main.html"),
            "<html><head><title>Main</title></head></html>",
        )
        .unwrap();

        let repo = FileRepository::new(dir.path());
        let doc = repo.resolve("layouts/main").unwrap();
        assert_eq!(doc.title(), "Main");
        assert_eq!(doc.url(), "layouts/main");

        assert!(matches!(
            repo.resolve("layouts/other"),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_file_repository_suffix() {
        let repo = FileRepository::new("/templates").with_suffix(".xml");
        assert_eq!(repo.path_for("feed"), PathBuf::from("/templates/feed.xml"));
    }
}
