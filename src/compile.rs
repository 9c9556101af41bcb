//! Compiles a builder tree into an immutable [`Formula`].
//!
//! Compilation is mostly structural passthrough with three transformations:
//! fragment flattening, attribute folding, and embed resolution. Embedded
//! templates are compiled independently through the cache and wrapped with
//! their rebasing path; a template whose embeds disagree about how to reach
//! a shared inner context type fails to compile.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::mem;

use crate::attr::{Attribute, Merge};
use crate::node::{Kind, Node};
use crate::path::Path;
use crate::{Error, Result, Template};

/// The compiled, immutable representation of a template's structure.
///
/// Built at most once per template type and shared across renders; see
/// [`Engine::render`][crate::Engine::render].
pub struct Formula<C> {
    pub(crate) nodes: Vec<Node<C>>,
    pub(crate) locale: Option<Path<C, String>>,
}

impl<C> fmt::Debug for Formula<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<compiled>")
    }
}

/// Tracks the rebasing paths of embeds within one compilation scope.
///
/// Loop bodies open a fresh scope because their context is the loop item;
/// embedded templates guard their own scope when they themselves compile.
pub(crate) struct Scope {
    embeds: BTreeMap<TypeId, Registered>,
}

struct Registered {
    context: &'static str,
    via: String,
}

impl Scope {
    pub(crate) fn new() -> Self {
        Self {
            embeds: BTreeMap::new(),
        }
    }

    /// Record that the inner context type `I` is reached via the given
    /// rebasing path. Two embeds disagreeing on the path is a compile error,
    /// never a silent pick.
    pub(crate) fn embed<I: 'static>(&mut self, via: &str) -> Result<()> {
        match self.embeds.get(&TypeId::of::<I>()) {
            Some(reg) if reg.via != via => Err(Error::ambiguous_context(
                reg.context,
                reg.via.clone(),
                via,
            )),
            Some(_) => Ok(()),
            None => {
                self.embeds.insert(
                    TypeId::of::<I>(),
                    Registered {
                        context: std::any::type_name::<I>(),
                        via: via.to_owned(),
                    },
                );
                Ok(())
            }
        }
    }
}

/// Compile a template instance into its formula.
pub(crate) fn formula<T: Template>(template: &T) -> Result<Formula<T::Context>> {
    let mut nodes = vec![template.build()];
    let mut scope = Scope::new();
    fold_nodes(&mut nodes, &mut scope)?;
    Ok(Formula {
        nodes,
        locale: template.locale(),
    })
}

/// Normalize a sibling list in place: flatten fragments, fold attributes,
/// resolve embeds.
pub(crate) fn fold_nodes<C: 'static>(nodes: &mut Vec<Node<C>>, scope: &mut Scope) -> Result<()> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in flatten(mem::take(nodes)) {
        out.push(fold_node(node, scope)?);
    }
    *nodes = out;
    Ok(())
}

fn fold_node<C: 'static>(node: Node<C>, scope: &mut Scope) -> Result<Node<C>> {
    let kind = match node.kind {
        Kind::Element(mut el) => {
            el.attrs = fold_attrs(mem::take(&mut el.attrs));
            fold_nodes(&mut el.children, scope)?;
            Kind::Element(el)
        }
        Kind::Conditional(mut c) => {
            for (_, body) in &mut c.arms {
                fold_nodes(body, scope)?;
            }
            if let Some(body) = &mut c.otherwise {
                fold_nodes(body, scope)?;
            }
            Kind::Conditional(c)
        }
        Kind::Loop(mut l) => {
            l.fold()?;
            Kind::Loop(l)
        }
        Kind::Embed(spec) => Kind::Inlined(spec.resolve(scope)?),
        kind => kind,
    };
    Ok(Node { kind })
}

fn flatten<C>(nodes: Vec<Node<C>>) -> Vec<Node<C>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node.kind {
            Kind::Fragment(children) => out.extend(flatten(children)),
            kind => out.push(Node { kind }),
        }
    }
    out
}

/// Fold repeated attribute declarations left-to-right.
///
/// The final list keeps first-seen declaration order; the first declaration
/// of a name also fixes its merge policy. `Override` replaces the value
/// parts and the presence predicate wholesale, `Append` accumulates value
/// parts and keeps the first predicate; the declared separator is emitted at
/// render time between parts that produce a value.
fn fold_attrs<C>(attrs: Vec<Attribute<C>>) -> Vec<Attribute<C>> {
    let mut out: Vec<Attribute<C>> = Vec::with_capacity(attrs.len());
    for attr in attrs {
        let existing = out.iter_mut().find(|a| a.name == attr.name);
        match existing {
            None => out.push(attr),
            Some(merged) => match merged.merge {
                Merge::Override => {
                    merged.parts = attr.parts;
                    merged.when = attr.when;
                }
                Merge::Append(_) => {
                    merged.parts.extend(attr.parts);
                }
            },
        }
    }
    out
}
