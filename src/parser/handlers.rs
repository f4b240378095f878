//! Composite field handlers.
//!
//! Some fields hold several pieces of data in one block, e.g. a
//! "Client Information" section with a name, a phone number and an email
//! address. A [`HandlerRegistry`] maps field names to [`FieldHandler`]s that
//! split such blocks into separate pairs after parsing.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fieldex::{ContactSplitter, FieldMap, FieldPair, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("Client Information", Arc::new(ContactSplitter::new("Client")));
//!
//! let fields: FieldMap = vec![FieldPair::new(
//!     "Client Information",
//!     "Bruce Davidson 555-123-4567 bruce@example.com",
//! )]
//! .into();
//! let fields = registry.apply(fields);
//! assert_eq!(fields.get("Client Email"), Some("bruce@example.com"));
//! ```

use super::normalize::collapse_whitespace;
use crate::model::{FieldMap, FieldPair};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Turns one extracted pair into zero or more pairs.
///
/// Closures of type `Fn(&FieldPair) -> Vec<FieldPair>` are handlers.
pub trait FieldHandler: Send + Sync {
    /// Produce the pairs that replace `pair` in the result.
    fn handle(&self, pair: &FieldPair) -> Vec<FieldPair>;
}

impl<F> FieldHandler for F
where
    F: Fn(&FieldPair) -> Vec<FieldPair> + Send + Sync,
{
    fn handle(&self, pair: &FieldPair) -> Vec<FieldPair> {
        self(pair)
    }
}

/// Registry of field handlers keyed by case-insensitive field name.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn FieldHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a field name, replacing any previous one.
    pub fn register(&mut self, field: &str, handler: Arc<dyn FieldHandler>) {
        self.handlers.insert(key(field), handler);
    }

    /// Register a closure as the handler for a field name.
    pub fn register_fn<F>(&mut self, field: &str, handler: F)
    where
        F: Fn(&FieldPair) -> Vec<FieldPair> + Send + Sync + 'static,
    {
        self.register(field, Arc::new(handler));
    }

    /// Check if a field has a handler.
    pub fn contains(&self, field: &str) -> bool {
        self.handlers.contains_key(&key(field))
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Replace every handled pair with its handler's output.
    ///
    /// Unhandled pairs pass through unchanged and order is preserved.
    pub fn apply(&self, fields: FieldMap) -> FieldMap {
        if self.handlers.is_empty() {
            return fields;
        }

        let mut result = FieldMap::new();
        for pair in fields.into_pairs() {
            match self.handlers.get(&key(&pair.field)) {
                Some(handler) => {
                    let produced = handler.handle(&pair);
                    log::debug!("handler split {:?} into {} pairs", pair.field, produced.len());
                    result.extend(produced);
                }
                None => {
                    result.insert(pair.field, pair.value);
                }
            }
        }
        result
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<&String> = self.handlers.keys().collect();
        fields.sort();
        f.debug_struct("HandlerRegistry")
            .field("fields", &fields)
            .finish()
    }
}

fn key(field: &str) -> String {
    collapse_whitespace(field).to_lowercase()
}

/// Splits a contact block into name, telephone and email fields.
///
/// Produces `{prefix} Name`, `{prefix} Telephone` and `{prefix} Email`
/// for the parts that are present. The name is whatever text remains once
/// the email address and phone number are removed.
#[derive(Debug, Clone)]
pub struct ContactSplitter {
    prefix: String,
    keep_original: bool,
    email: Regex,
    phone: Regex,
}

impl ContactSplitter {
    /// Create a splitter whose output fields start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim().to_string(),
            keep_original: false,
            email: Regex::new(r"[\w.-]+@[\w.-]+").expect("email pattern"),
            phone: Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone pattern"),
        }
    }

    /// Also keep the combined pair ahead of the split fields.
    pub fn keep_original(mut self, keep: bool) -> Self {
        self.keep_original = keep;
        self
    }

    fn field(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{} {}", self.prefix, suffix)
        }
    }
}

impl FieldHandler for ContactSplitter {
    fn handle(&self, pair: &FieldPair) -> Vec<FieldPair> {
        let mut pairs = Vec::new();
        if self.keep_original {
            pairs.push(pair.clone());
        }

        let email = self
            .email
            .find(&pair.value)
            .map(|m| m.as_str().trim_end_matches('.').to_string());
        let without_email = self.email.replace_all(&pair.value, " ");

        let phone = self.phone.find(&without_email).map(|m| m.as_str().to_string());
        let rest = self.phone.replace_all(&without_email, " ");

        let name = collapse_whitespace(&rest);
        let name = name.trim_matches(|c: char| matches!(c, ',' | ';' | '|' | '/') || c.is_whitespace());

        if !name.is_empty() {
            pairs.push(FieldPair::new(self.field("Name"), name));
        }
        if let Some(phone) = phone {
            pairs.push(FieldPair::new(self.field("Telephone"), phone));
        }
        if let Some(email) = email {
            pairs.push(FieldPair::new(self.field("Email"), email));
        }
        pairs
    }
}
