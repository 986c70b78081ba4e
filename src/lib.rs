//! trad
//!
//! Keyed lookup of localized strings stored in nested, human-editable
//! `.trad` files, one file per locale.
//!
//! ```
//! use trad::{TradSettings, Translator};
//!
//! let translator = Translator::new("lang", TradSettings::default());
//! translator.load_from_str("en", "menu {\n  save: \"Save\"\n}").unwrap();
//! translator.set_locale("en").unwrap();
//!
//! assert_eq!(translator.translate("menu.save").unwrap(), "Save");
//! assert_eq!(translator.translate("menu.quit").unwrap(), "menu.quit");
//! ```

pub mod config;
pub mod input;
pub mod ir;
pub mod registry;
pub mod syntax;

pub use config::TradSettings;
pub use ir::TranslationTree;
pub use registry::{
    Translator,
    TranslatorError,
};
pub use syntax::parse_locale;
