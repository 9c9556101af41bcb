//! The localization collaborator interface and an in-memory catalog.
//!
//! The engine never stores translations itself; it calls into a
//! [`Localizer`] with a key, the current locale and a parameter [`Value`].
//! The current locale comes from the template's declared locale path when it
//! has one, otherwise from the engine default.

use std::collections::BTreeMap;

use crate::{Error, Result, Value};

/// Maps `(key, locale, parameters)` to a localized string.
///
/// Implementations must fail with a missing-key error rather than silently
/// returning the key; the engine propagates that error and aborts the
/// render.
pub trait Localizer: Send + Sync {
    fn resolve(&self, key: &str, locale: &str, params: &Value) -> Result<String>;
}

/// The default resolver: it has no entries, so every lookup is a missing
/// key. Engines that render localization nodes must install a real resolver.
pub(crate) struct NoTranslations;

impl Localizer for NoTranslations {
    fn resolve(&self, key: &str, locale: &str, _params: &Value) -> Result<String> {
        Err(Error::missing_key(key, locale))
    }
}

/// A simple in-memory catalog, keyed by locale and then key.
///
/// Patterns may contain `{name}` placeholders substituted from the parameter
/// map; placeholders without a matching parameter pass through literally.
/// This is a convenience collaborator, not a storage format: production
/// systems are expected to supply their own [`Localizer`].
#[derive(Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pattern for a key under a locale.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        pattern: impl Into<String>,
    ) {
        self.entries
            .entry(locale.into())
            .or_default()
            .insert(key.into(), pattern.into());
    }
}

impl Localizer for Catalog {
    fn resolve(&self, key: &str, locale: &str, params: &Value) -> Result<String> {
        let pattern = self
            .entries
            .get(locale)
            .and_then(|keys| keys.get(key))
            .ok_or_else(|| Error::missing_key(key, locale))?;
        Ok(substitute(pattern, params))
    }
}

fn substitute(pattern: &str, params: &Value) -> String {
    let map = match params {
        Value::Map(map) => map,
        _ => return pattern.to_owned(),
    };
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => {
                let name = &rest[open + 1..open + close];
                match map.get(name).and_then(Value::as_text) {
                    Some(text) => out.push_str(&text),
                    None => out.push_str(&rest[open..open + close + 1]),
                }
                rest = &rest[open + close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}
