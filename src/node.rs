//! The template node representation and its builder API.
//!
//! User code assembles a tree of [`Node`]s once per template type; the
//! compiler normalizes that tree into a [`Formula`][crate::Formula]. Nodes
//! are immutable after compilation and never mutated by rendering.
//!
//! Loops and embeds are type-erased behind object-safe traits so that a
//! `Node<C>` can carry bodies over other context types (the loop item, the
//! embedded template's context) without infecting `Node` with those types.

use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::attr::Attribute;
use crate::cache;
use crate::compile::Scope;
use crate::date::DateStyle;
use crate::fmt::Formatter;
use crate::path::{Path, Predicate};
use crate::render::Renderer;
use crate::value::to_value;
use crate::{Result, Template, Value};

pub(crate) type TextFn<C> = dyn Fn(&C) -> Result<String> + Send + Sync;
pub(crate) type AttrFn<C> = dyn Fn(&C) -> Result<Option<String>> + Send + Sync;
pub(crate) type DateFn<C> = dyn Fn(&C) -> Result<DateTime<Utc>> + Send + Sync;
pub(crate) type ParamFn<C> = dyn Fn(&C) -> Result<Value> + Send + Sync;

/// One piece of template structure.
///
/// Constructed with the builder functions in this module ([`text`], [`elem`],
/// [`var`], [`raw`], [`when`], [`each`], [`embed`], [`localize`], [`date`],
/// ...) and consumed by [`Engine::render`][crate::Engine::render] through the
/// owning [`Template`].
pub struct Node<C> {
    pub(crate) kind: Kind<C>,
}

pub(crate) enum Kind<C> {
    /// Literal text, emitted verbatim.
    Text(Cow<'static, str>),
    Element(Element<C>),
    /// An ordered group of siblings; erased by compilation.
    Fragment(Vec<Node<C>>),
    Variable(Variable<C>),
    Conditional(Conditional<C>),
    Loop(Box<dyn LoopNode<C>>),
    /// A declared embed; replaced during compilation by [`Kind::Inlined`].
    Embed(Box<dyn EmbedSpec<C>>),
    /// A resolved embed carrying the embedded template's compiled formula.
    Inlined(Box<dyn EmbedNode<C>>),
    Localize(Localize<C>),
    Date(DateNode<C>),
}

/// A markup element under construction.
pub struct Element<C> {
    pub(crate) name: Cow<'static, str>,
    pub(crate) attrs: Vec<Attribute<C>>,
    pub(crate) children: Vec<Node<C>>,
    pub(crate) void: bool,
}

pub(crate) struct Variable<C> {
    pub(crate) eval: Arc<TextFn<C>>,
    pub(crate) escape: Escape,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Escape {
    Html,
    Verbatim,
}

/// An if/else-if/else chain under construction.
///
/// Arms are evaluated at render time strictly in declared order and the
/// first true arm wins; later predicates are not evaluated.
pub struct Conditional<C> {
    pub(crate) arms: Vec<(Predicate<C>, Vec<Node<C>>)>,
    pub(crate) otherwise: Option<Vec<Node<C>>>,
}

pub(crate) struct Localize<C> {
    pub(crate) key: Cow<'static, str>,
    pub(crate) params: ParamSource<C>,
}

pub(crate) enum ParamSource<C> {
    None,
    Literal(Value),
    Record(Arc<ParamFn<C>>),
}

pub(crate) struct DateNode<C> {
    pub(crate) eval: Arc<DateFn<C>>,
    pub(crate) style: DateStyle,
}

/// A type-erased loop: a sequence path plus a body over the item type.
pub(crate) trait LoopNode<C>: Send + Sync {
    /// Normalize the loop body. The body has its own compilation scope since
    /// its context is the loop item.
    fn fold(&mut self) -> Result<()>;

    fn render(&self, r: &Renderer<'_>, ctx: &C, f: &mut Formatter<'_>) -> Result<()>;
}

/// A type-erased embed declaration: an optional rebasing path plus the
/// sub-template. Consumed by compilation.
pub(crate) trait EmbedSpec<C>: Send + Sync {
    /// Compile (or fetch from the cache) the embedded template's formula,
    /// register the rebasing with the ambiguity guard, and hand back the
    /// renderable form.
    fn resolve(self: Box<Self>, scope: &mut Scope) -> Result<Box<dyn EmbedNode<C>>>;
}

/// A type-erased resolved embed, ready to render.
pub(crate) trait EmbedNode<C>: Send + Sync {
    fn render(&self, r: &Renderer<'_>, ctx: &C, f: &mut Formatter<'_>) -> Result<()>;
}

struct LoopBlock<C, I> {
    path: Path<C, Vec<I>>,
    body: Vec<Node<I>>,
}

struct EmbedHere<T: Template> {
    template: T,
}

struct EmbedVia<C, T: Template> {
    rebase: Path<C, T::Context>,
    template: T,
}

struct InlineFormula<I: 'static> {
    formula: Arc<crate::Formula<I>>,
}

struct RebasedFormula<C, I: 'static> {
    rebase: Path<C, I>,
    formula: Arc<crate::Formula<I>>,
}

impl<C: 'static, I: 'static> LoopNode<C> for LoopBlock<C, I> {
    fn fold(&mut self) -> Result<()> {
        let mut scope = Scope::new();
        crate::compile::fold_nodes(&mut self.body, &mut scope)
    }

    fn render(&self, r: &Renderer<'_>, ctx: &C, f: &mut Formatter<'_>) -> Result<()> {
        let seq = self.path.evaluate(ctx)?;
        for item in &seq {
            r.nodes(&self.body, item, f)?;
        }
        Ok(())
    }
}

impl<T: Template> EmbedSpec<T::Context> for EmbedHere<T> {
    fn resolve(self: Box<Self>, scope: &mut Scope) -> Result<Box<dyn EmbedNode<T::Context>>> {
        scope.embed::<T::Context>("self")?;
        Ok(Box::new(InlineFormula {
            formula: cache::formula(&self.template)?,
        }))
    }
}

impl<C: 'static, T: Template> EmbedSpec<C> for EmbedVia<C, T> {
    fn resolve(self: Box<Self>, scope: &mut Scope) -> Result<Box<dyn EmbedNode<C>>> {
        scope.embed::<T::Context>(self.rebase.repr())?;
        Ok(Box::new(RebasedFormula {
            rebase: self.rebase,
            formula: cache::formula(&self.template)?,
        }))
    }
}

impl<I: 'static> EmbedNode<I> for InlineFormula<I> {
    fn render(&self, r: &Renderer<'_>, ctx: &I, f: &mut Formatter<'_>) -> Result<()> {
        r.formula(&self.formula, ctx, f)
    }
}

impl<C: 'static, I: 'static> EmbedNode<C> for RebasedFormula<C, I> {
    fn render(&self, r: &Renderer<'_>, ctx: &C, f: &mut Formatter<'_>) -> Result<()> {
        let sub = self.rebase.evaluate(ctx)?;
        r.formula(&self.formula, &sub, f)
    }
}

/// Literal text, emitted verbatim.
pub fn text<C>(s: impl Into<Cow<'static, str>>) -> Node<C> {
    Node {
        kind: Kind::Text(s.into()),
    }
}

/// An element with the given tag name.
pub fn elem<C>(name: impl Into<Cow<'static, str>>) -> Element<C> {
    Element {
        name: name.into(),
        attrs: Vec::new(),
        children: Vec::new(),
        void: false,
    }
}

/// An ordered group of sibling nodes.
///
/// Flattened into the surrounding child list during compilation; nesting
/// fragments loses no ordering.
pub fn fragment<C>(nodes: Vec<Node<C>>) -> Node<C> {
    Node {
        kind: Kind::Fragment(nodes),
    }
}

/// A variable bound by path, escaped for HTML output.
pub fn var<C: 'static, V>(path: &Path<C, V>) -> Node<C>
where
    V: Display + 'static,
{
    variable(path, Escape::Html)
}

/// A variable bound by path, emitted verbatim.
///
/// The caller asserts the projected text is already safe for HTML output.
pub fn raw<C: 'static, V>(path: &Path<C, V>) -> Node<C>
where
    V: Display + 'static,
{
    variable(path, Escape::Verbatim)
}

fn variable<C: 'static, V>(path: &Path<C, V>, escape: Escape) -> Node<C>
where
    V: Display + 'static,
{
    let path = path.clone();
    Node {
        kind: Kind::Variable(Variable {
            eval: Arc::new(move |ctx: &C| path.evaluate(ctx).map(|v| v.to_string())),
            escape,
        }),
    }
}

/// Start an if/else-if/else chain.
pub fn when<C>(predicate: Predicate<C>, body: Vec<Node<C>>) -> Conditional<C> {
    Conditional {
        arms: vec![(predicate, body)],
        otherwise: None,
    }
}

/// Loop over a sequence reached by path, rendering the body once per element
/// with the element as its context. Output concatenates with no separator.
pub fn each<C: 'static, I: 'static>(path: &Path<C, Vec<I>>, body: Vec<Node<I>>) -> Node<C> {
    Node {
        kind: Kind::Loop(Box::new(LoopBlock {
            path: path.clone(),
            body,
        })),
    }
}

/// Loop over the render context itself.
pub fn each_self<I: Clone + 'static>(body: Vec<Node<I>>) -> Node<Vec<I>> {
    each(&Path::identity(), body)
}

/// Embed a template that shares this template's context type.
pub fn embed<T: Template>(template: T) -> Node<T::Context> {
    Node {
        kind: Kind::Embed(Box::new(EmbedHere { template })),
    }
}

/// Embed a template with a different context type, rebased through the path.
///
/// At render time every inner path is evaluated by first applying the
/// rebasing path and then the inner path; nesting embeds composes the paths
/// associatively.
pub fn embed_with<C: 'static, T: Template>(
    path: &Path<C, T::Context>,
    template: T,
) -> Node<C> {
    Node {
        kind: Kind::Embed(Box::new(EmbedVia {
            rebase: path.clone(),
            template,
        })),
    }
}

/// A localized string with no parameters.
pub fn localize<C>(key: impl Into<Cow<'static, str>>) -> Node<C> {
    Node {
        kind: Kind::Localize(Localize {
            key: key.into(),
            params: ParamSource::None,
        }),
    }
}

/// A localized string with a literal parameter map, usually built with
/// [`params!`][crate::params!].
pub fn localize_with<C>(key: impl Into<Cow<'static, str>>, params: Value) -> Node<C> {
    Node {
        kind: Kind::Localize(Localize {
            key: key.into(),
            params: ParamSource::Literal(params),
        }),
    }
}

/// A localized string whose parameters come from a serializable record
/// reached by path.
pub fn localize_record<C: 'static, P>(
    key: impl Into<Cow<'static, str>>,
    path: &Path<C, P>,
) -> Node<C>
where
    P: Serialize + 'static,
{
    let path = path.clone();
    Node {
        kind: Kind::Localize(Localize {
            key: key.into(),
            params: ParamSource::Record(Arc::new(move |ctx: &C| {
                path.evaluate(ctx).and_then(to_value)
            })),
        }),
    }
}

/// A date reached by path, formatted by the engine's date collaborator.
pub fn date<C: 'static>(path: &Path<C, DateTime<Utc>>, style: DateStyle) -> Node<C> {
    let path = path.clone();
    Node {
        kind: Kind::Date(DateNode {
            eval: Arc::new(move |ctx: &C| path.evaluate(ctx)),
            style,
        }),
    }
}

impl<C: 'static> Element<C> {
    /// Add an attribute. Repeated names fold together during compilation
    /// according to the attribute's declared merge policy.
    pub fn attr(mut self, attr: Attribute<C>) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Append a child node.
    pub fn child(mut self, node: impl Into<Node<C>>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several child nodes in order.
    pub fn children(mut self, nodes: Vec<Node<C>>) -> Self {
        self.children.extend(nodes);
        self
    }

    /// Mark the element void: the opening tag is emitted alone, with no
    /// children and no closing tag. Which names are void is a vocabulary
    /// concern, not an engine one.
    pub fn void(mut self) -> Self {
        self.void = true;
        self
    }
}

impl<C> Conditional<C> {
    /// Add an else-if arm.
    pub fn else_when(mut self, predicate: Predicate<C>, body: Vec<Node<C>>) -> Self {
        self.arms.push((predicate, body));
        self
    }

    /// Finish the chain with an else body.
    pub fn otherwise(mut self, body: Vec<Node<C>>) -> Node<C> {
        self.otherwise = Some(body);
        Node {
            kind: Kind::Conditional(self),
        }
    }
}

impl<C> From<Element<C>> for Node<C> {
    fn from(element: Element<C>) -> Self {
        Node {
            kind: Kind::Element(element),
        }
    }
}

impl<C> From<Conditional<C>> for Node<C> {
    fn from(conditional: Conditional<C>) -> Self {
        Node {
            kind: Kind::Conditional(conditional),
        }
    }
}

impl<C> From<&'static str> for Node<C> {
    fn from(s: &'static str) -> Self {
        text(s)
    }
}

impl<C> From<String> for Node<C> {
    fn from(s: String) -> Self {
        text(s)
    }
}
