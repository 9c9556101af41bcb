//! Element attributes, per-attribute merge policies and the open attribute
//! vocabulary.
//!
//! The engine ships no built-in attribute list. A surrounding layer declares
//! the vocabulary it wants as data: every [`Attribute`] carries its own
//! [`Merge`] policy, and a [`Vocabulary`] table can hold the `(name, policy)`
//! pairs for a whole tag set so call sites stay uniform.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use crate::node::AttrFn;
use crate::path::{Path, Predicate};

/// How repeated declarations of the same attribute name fold together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// The latest declared value replaces the previous one (`id`, `type`).
    Override,
    /// Values accumulate, joined by the separator (`class`, `style`).
    Append(&'static str),
}

/// A single attribute on an element.
pub struct Attribute<C> {
    pub(crate) name: Cow<'static, str>,
    pub(crate) parts: Vec<AttrPart<C>>,
    pub(crate) merge: Merge,
    pub(crate) when: Option<Predicate<C>>,
}

pub(crate) enum AttrPart<C> {
    Text(Cow<'static, str>),
    Var(Arc<AttrFn<C>>),
}

impl<C: 'static> Attribute<C> {
    /// A value-bearing attribute with [`Merge::Override`] policy.
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            parts: vec![AttrPart::Text(value.into())],
            merge: Merge::Override,
            when: None,
        }
    }

    /// A value-bearing attribute with [`Merge::Append`] policy.
    pub fn appending(
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
        separator: &'static str,
    ) -> Self {
        Self {
            name: name.into(),
            parts: vec![AttrPart::Text(value.into())],
            merge: Merge::Append(separator),
            when: None,
        }
    }

    /// A bare attribute with no value (`required`, `checked`).
    pub fn flag(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
            merge: Merge::Override,
            when: None,
        }
    }

    /// An attribute whose value is projected from the context at render time.
    /// The projected text is escaped for attribute position.
    pub fn bound<V>(name: impl Into<Cow<'static, str>>, path: &Path<C, V>) -> Self
    where
        V: Display + 'static,
    {
        let path = path.clone();
        Self {
            name: name.into(),
            parts: vec![AttrPart::Var(Arc::new(move |ctx: &C| {
                path.evaluate(ctx).map(|v| Some(v.to_string()))
            }))],
            merge: Merge::Override,
            when: None,
        }
    }

    /// Like [`bound`][Attribute::bound] for an optional projection: when the
    /// path lands on nothing the part drops out, and an attribute whose parts
    /// all drop out is omitted entirely.
    pub fn bound_optional<V>(name: impl Into<Cow<'static, str>>, path: &Path<C, V>) -> Self
    where
        V: Display + 'static,
    {
        let path = path.clone();
        Self {
            name: name.into(),
            parts: vec![AttrPart::Var(Arc::new(move |ctx: &C| {
                Ok(path.evaluate_optional(ctx).map(|v| v.to_string()))
            }))],
            merge: Merge::Override,
            when: None,
        }
    }

    /// Change the merge policy of this declaration.
    pub fn policy(mut self, merge: Merge) -> Self {
        self.merge = merge;
        self
    }

    /// Only emit the attribute when the predicate holds at render time.
    pub fn when(mut self, predicate: Predicate<C>) -> Self {
        self.when = Some(predicate);
        self
    }
}

/// An open table of `(attribute name, merge policy)` pairs.
///
/// New attributes are data, not code: a surrounding layer registers the
/// policies it wants and builds attributes through [`make`][Vocabulary::make].
/// Unregistered names default to [`Merge::Override`].
#[derive(Debug, Default)]
pub struct Vocabulary {
    policies: BTreeMap<&'static str, Merge>,
}

impl Vocabulary {
    /// An empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the merge policy for an attribute name.
    pub fn register(&mut self, name: &'static str, merge: Merge) {
        self.policies.insert(name, merge);
    }

    /// Lookup the registered policy for a name.
    pub fn policy(&self, name: &str) -> Merge {
        self.policies.get(name).copied().unwrap_or(Merge::Override)
    }

    /// Construct an attribute carrying the registered policy.
    pub fn make<C: 'static>(
        &self,
        name: &'static str,
        value: impl Into<Cow<'static, str>>,
    ) -> Attribute<C> {
        Attribute::new(name, value).policy(self.policy(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_policies() {
        let mut vocab = Vocabulary::new();
        vocab.register("class", Merge::Append(" "));
        assert_eq!(vocab.policy("class"), Merge::Append(" "));
        assert_eq!(vocab.policy("id"), Merge::Override);
        let attr: Attribute<()> = vocab.make("class", "btn");
        assert_eq!(attr.merge, Merge::Append(" "));
    }
}
