//! Intermediate representation of parsed translations
mod translation;

pub use translation::{
    Container,
    Element,
    KEY_SEPARATOR,
    Leaf,
    ResolveError,
    TranslationTree,
};
