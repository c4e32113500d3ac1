//! Serializable taxonomy tree — the shape an external editor reads and writes.
//!
//! Accepted JSON forms:
//! - a bare nested mapping: `{"TECHNICAL": {"CLOUD": {"AWS": ["aws", "lambda"]}}}`
//! - a document with an explicit priority list:
//!   `{"priority": ["TECHNICAL_ML_AI", "TECHNICAL"], "categories": { ... }}`
//!
//! The document form is tried first, so `categories` and `priority` are reserved at the
//! top level: a bare tree whose only root category is named `categories` is read as a
//! document. Nest such a category one level down.
//!
//! Key order is preserved (`IndexMap`) because declaration order breaks ties. Decode
//! straight into `TaxonomyInput`; a detour through `serde_json::Value` sorts the keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category name → node.
pub type TaxonomyTree = IndexMap<String, TaxonomyNode>;

/// A taxonomy node: either a keyword leaf or a nested branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyNode {
    Keywords(Vec<String>),
    Branch(TaxonomyTree),
}

/// A tree plus the ordered list of path prefixes that decides which categories are
/// consulted first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyDocument {
    #[serde(default)]
    pub priority: Vec<String>,
    pub categories: TaxonomyTree,
}

/// Either accepted JSON form. Request bodies deserialize into this directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyInput {
    Document(TaxonomyDocument),
    Bare(TaxonomyTree),
}

impl TaxonomyDocument {
    pub fn new(categories: TaxonomyTree) -> Self {
        Self {
            priority: Vec::new(),
            categories,
        }
    }

    /// Parses either accepted JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let input: TaxonomyInput = serde_json::from_str(json)?;
        Ok(input.into())
    }
}

impl From<TaxonomyInput> for TaxonomyDocument {
    fn from(input: TaxonomyInput) -> Self {
        match input {
            TaxonomyInput::Document(doc) => doc,
            TaxonomyInput::Bare(tree) => TaxonomyDocument::new(tree),
        }
    }
}
