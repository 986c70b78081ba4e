//! Parsed translation tree and dotted-path resolution.
//!
//! A tree is built once by [`crate::syntax::parse_locale`] and never mutated
//! afterwards, so it can be shared between threads without locking.

use std::collections::HashMap;

use thiserror::Error;

/// Separator between the segments of a translation key.
pub const KEY_SEPARATOR: char = '.';

/// Errors raised while resolving a dotted key against a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The key ends on a container, which holds no value of its own.
    #[error("\"{container}\" is a container")]
    IsContainer {
        /// Name of the container the key stopped at
        container: String,
    },
    /// No child matches the next segment of the key.
    #[error("Key \"{key}\" not found in \"{scope}\"")]
    KeyNotFound {
        /// The full key as requested by the caller
        key: String,
        /// Name of the element that was searched
        scope: String,
    },
}

/// A named translation with its decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Key name
    name: String,
    /// Value with escape sequences already decoded
    value: String,
}

impl Leaf {
    pub(crate) const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A named group of translations.
///
/// Immediate child names are pairwise distinct; the parser rejects a
/// duplicate before adding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Container name
    name: String,
    /// Children in file order
    children: Vec<Element>,
}

impl Container {
    pub(crate) const fn new(name: String) -> Self {
        Self { name, children: Vec::new() }
    }

    pub(crate) fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns the immediate child with exactly this name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Resolves `path` relative to this container.
    ///
    /// `key` is the full key originally requested and is only used for errors.
    fn resolve<'a>(&'a self, path: &str, key: &str) -> Result<&'a str, ResolveError> {
        if path.is_empty() {
            return Err(ResolveError::IsContainer { container: self.name.clone() });
        }

        let (head, rest) = split_key(path);
        self.child(head)
            .ok_or_else(|| ResolveError::KeyNotFound {
                key: key.to_string(),
                scope: self.name.clone(),
            })?
            .resolve(rest, key)
    }
}

/// A node of a translation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Leaf(Leaf),
    Container(Container),
}

impl Element {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.name(),
            Self::Container(container) => container.name(),
        }
    }

    fn resolve<'a>(&'a self, path: &str, key: &str) -> Result<&'a str, ResolveError> {
        match self {
            Self::Container(container) => container.resolve(path, key),
            Self::Leaf(leaf) if path.is_empty() => Ok(leaf.value()),
            // A leaf has no children to descend into.
            Self::Leaf(leaf) => Err(ResolveError::KeyNotFound {
                key: key.to_string(),
                scope: leaf.name.clone(),
            }),
        }
    }
}

/// Splits a key on its first separator.
///
/// `"menu.file.save"` → `("menu", "file.save")`, `"save"` → `("save", "")`.
fn split_key(key: &str) -> (&str, &str) {
    key.split_once(KEY_SEPARATOR).unwrap_or((key, ""))
}

/// The parsed content of one locale file.
///
/// The root is always a container named after the locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTree {
    /// Root container, named after the locale
    root: Container,
}

impl TranslationTree {
    pub(crate) const fn new(root: Container) -> Self {
        Self { root }
    }

    /// Locale this tree was parsed for.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.root.name()
    }

    #[must_use]
    pub const fn root(&self) -> &Container {
        &self.root
    }

    /// Resolves a dotted key (e.g. `menu.file.save`) to its translation.
    ///
    /// The empty key designates the root itself and therefore always fails
    /// with [`ResolveError::IsContainer`].
    ///
    /// # Errors
    /// - [`ResolveError::IsContainer`] when the key ends on a container
    /// - [`ResolveError::KeyNotFound`] when a segment has no matching child
    pub fn resolve(&self, key: &str) -> Result<&str, ResolveError> {
        self.root.resolve(key, key)
    }

    /// Flattens the tree into a dotted key → value map.
    ///
    /// # Examples
    /// ```
    /// use trad::syntax::parse_locale;
    ///
    /// let tree = parse_locale("en", ["menu {", "save: \"Save\"", "}"]).unwrap();
    /// let flattened = tree.flatten();
    /// assert_eq!(flattened.get("menu.save"), Some(&"Save".to_string()));
    /// ```
    #[must_use]
    pub fn flatten(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();
        flatten_container(&self.root, None, &mut result);
        result
    }

    /// Number of leaves in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        count_leaves(&self.root)
    }

    /// Whether the tree holds no translation at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn flatten_container(
    container: &Container,
    prefix: Option<&str>,
    result: &mut HashMap<String, String>,
) {
    for child in container.children() {
        let full_key = prefix.map_or_else(
            || child.name().to_string(),
            |p| format!("{p}{KEY_SEPARATOR}{}", child.name()),
        );
        match child {
            Element::Leaf(leaf) => {
                result.insert(full_key, leaf.value().to_string());
            }
            Element::Container(inner) => flatten_container(inner, Some(&full_key), result),
        }
    }
}

fn count_leaves(container: &Container) -> usize {
    container
        .children()
        .iter()
        .map(|child| match child {
            Element::Leaf(_) => 1,
            Element::Container(inner) => count_leaves(inner),
        })
        .sum()
}
