// Taxonomy: the category → keyword dictionary the engine classifies against.
// Loaded once (file or bundled default), validated, flattened, then shared read-only
// as `Arc<Taxonomy>`. An external editor can submit a new tree between runs.

pub mod handlers;
pub mod matcher;
pub mod provider;
pub mod tree;

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

pub use matcher::{CategoryMatcher, FALLBACK_CATEGORY};
pub use tree::{TaxonomyDocument, TaxonomyInput, TaxonomyNode, TaxonomyTree};

const PATH_SEPARATOR: &str = "_";

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("category name under '{0}' is empty")]
    EmptyCategoryName(String),

    #[error("category path '{0}' is declared more than once")]
    DuplicatePath(String),

    #[error("priority entry '{0}' does not match any category path")]
    UnknownPriority(String),

    #[error("failed to read taxonomy file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed taxonomy JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One flattened leaf: a category path and its raw keyword list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub path: String,
    pub keywords: Vec<String>,
}

/// Immutable, validated taxonomy snapshot.
///
/// `entries` are in lookup order: grouped by the first priority prefix they fall
/// under, declaration order within a group, unprioritised entries last.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    document: TaxonomyDocument,
    entries: Vec<CategoryEntry>,
}

impl Taxonomy {
    /// A taxonomy with no categories: every skill resolves to the fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates and flattens a document.
    pub fn from_document(document: TaxonomyDocument) -> Result<Self, TaxonomyError> {
        let mut flattened = Vec::new();
        flatten_into(&document.categories, None, &mut flattened)?;

        {
            let mut seen = HashSet::new();
            for entry in &flattened {
                if !seen.insert(entry.path.as_str()) {
                    return Err(TaxonomyError::DuplicatePath(entry.path.clone()));
                }
            }
        }

        for prefix in &document.priority {
            if !flattened.iter().any(|e| path_has_prefix(&e.path, prefix)) {
                return Err(TaxonomyError::UnknownPriority(prefix.clone()));
            }
        }

        // stable: declaration order survives within a priority rank
        flattened.sort_by_key(|e| priority_rank(&e.path, &document.priority));

        Ok(Self {
            document,
            entries: flattened,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        Self::from_document(TaxonomyDocument::from_json_str(json)?)
    }

    pub fn from_input(input: TaxonomyInput) -> Result<Self, TaxonomyError> {
        Self::from_document(input.into())
    }

    pub fn document(&self) -> &TaxonomyDocument {
        &self.document
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category paths in lookup order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}

fn flatten_into(
    tree: &TaxonomyTree,
    parent: Option<&str>,
    out: &mut Vec<CategoryEntry>,
) -> Result<(), TaxonomyError> {
    for (name, node) in tree {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaxonomyError::EmptyCategoryName(
                parent.unwrap_or("<root>").to_string(),
            ));
        }
        let path = match parent {
            Some(p) => format!("{p}{PATH_SEPARATOR}{name}"),
            None => name.to_string(),
        };

        match node {
            TaxonomyNode::Keywords(keywords) => out.push(CategoryEntry {
                keywords: keywords
                    .iter()
                    .map(|k| k.trim())
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect(),
                path,
            }),
            TaxonomyNode::Branch(children) => flatten_into(children, Some(&path), out)?,
        }
    }
    Ok(())
}

fn path_has_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
}

fn priority_rank(path: &str, priority: &[String]) -> usize {
    priority
        .iter()
        .position(|p| path_has_prefix(path, p))
        .unwrap_or(priority.len())
}
