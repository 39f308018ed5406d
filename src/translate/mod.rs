//! Translation lookup for saved words
//!
//! This module provides:
//! - A bounded cache of lookup results keyed by normalized term
//! - A built-in offline dictionary
//! - An online client (MyMemory translations + dictionaryapi.dev entries)
//! - The `Translator` that tries them in that order under a timeout

mod cache;
mod client;
mod dictionary;
mod models;
mod translator;

pub use cache::{CachedTranslation, TranslationCache, DEFAULT_CACHE_CAPACITY};
pub use client::{LookupError, OnlineLookup, TranslationLookup};
pub use dictionary::BuiltinDictionary;
pub use models::*;
pub use translator::Translator;

#[cfg(test)]
pub(crate) use translator::tests::FakeLookup;
