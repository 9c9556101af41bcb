//! Renders a compiled [`Formula`] against a context value.
//!
//! A render is a single top-down tree walk with no backtracking and no state
//! shared between renders besides the formula itself. Embedded formulas are
//! rendered by the same walker, so nesting depth is bounded only by the call
//! stack.

use std::fmt::Write;

use crate::attr::{AttrPart, Merge};
use crate::compile::Formula;
use crate::fmt::{escape, Formatter};
use crate::node::{Element, Escape, Kind, Node, ParamSource};
use crate::{Engine, Result, Value};

pub(crate) struct Renderer<'a> {
    pub(crate) engine: &'a Engine,
    pub(crate) locale: String,
}

impl Renderer<'_> {
    /// Render a formula, honoring its declared locale path.
    ///
    /// A locale path that projects to nothing falls back to the inherited
    /// locale rather than failing the render.
    pub(crate) fn formula<C: 'static>(
        &self,
        formula: &Formula<C>,
        ctx: &C,
        f: &mut Formatter<'_>,
    ) -> Result<()> {
        match formula.locale.as_ref().and_then(|p| p.evaluate_optional(ctx)) {
            Some(locale) => Renderer {
                engine: self.engine,
                locale,
            }
            .nodes(&formula.nodes, ctx, f),
            None => self.nodes(&formula.nodes, ctx, f),
        }
    }

    pub(crate) fn nodes<C: 'static>(
        &self,
        nodes: &[Node<C>],
        ctx: &C,
        f: &mut Formatter<'_>,
    ) -> Result<()> {
        for node in nodes {
            self.node(node, ctx, f)?;
        }
        Ok(())
    }

    fn node<C: 'static>(&self, node: &Node<C>, ctx: &C, f: &mut Formatter<'_>) -> Result<()> {
        match &node.kind {
            Kind::Text(s) => f.write_str(s)?,

            Kind::Element(el) => self.element(el, ctx, f)?,

            // Only compiled formulas reach the renderer; see
            // `compile::fold_nodes`.
            Kind::Fragment(_) | Kind::Embed(_) => {
                unreachable!("erased at compile time")
            }

            Kind::Variable(v) => {
                let s = (v.eval)(ctx)?;
                match v.escape {
                    Escape::Html => escape(f, &s)?,
                    Escape::Verbatim => f.write_str(&s)?,
                }
            }

            Kind::Conditional(c) => {
                // First true arm wins; later predicates are not evaluated.
                for (predicate, body) in &c.arms {
                    if predicate.test(ctx) {
                        return self.nodes(body, ctx, f);
                    }
                }
                if let Some(body) = &c.otherwise {
                    return self.nodes(body, ctx, f);
                }
            }

            Kind::Loop(l) => l.render(self, ctx, f)?,

            Kind::Inlined(e) => e.render(self, ctx, f)?,

            Kind::Localize(l) => {
                let params = match &l.params {
                    ParamSource::None => Value::None,
                    ParamSource::Literal(value) => value.clone(),
                    ParamSource::Record(eval) => eval(ctx)?,
                };
                let s = self
                    .engine
                    .localizer
                    .resolve(&l.key, &self.locale, &params)?;
                // Localized copy is trusted and not re-escaped.
                f.write_str(&s)?;
            }

            Kind::Date(d) => {
                let date = (d.eval)(ctx)?;
                let s = self.engine.dates.format(&date, &d.style, &self.locale)?;
                f.write_str(&s)?;
            }
        }
        Ok(())
    }

    fn element<C: 'static>(
        &self,
        el: &Element<C>,
        ctx: &C,
        f: &mut Formatter<'_>,
    ) -> Result<()> {
        enum Part<'s> {
            Static(&'s str),
            Dynamic(String),
        }

        write!(f, "<{}", el.name)?;
        for attr in &el.attrs {
            if let Some(predicate) = &attr.when {
                if !predicate.test(ctx) {
                    continue;
                }
            }
            if attr.parts.is_empty() {
                write!(f, " {}", attr.name)?;
                continue;
            }
            // Evaluate every part before emitting anything. A part that
            // projects to nothing drops out on its own; the attribute is
            // omitted only when no part produced a value.
            let mut parts = Vec::with_capacity(attr.parts.len());
            for part in &attr.parts {
                match part {
                    AttrPart::Text(s) => parts.push(Part::Static(s)),
                    AttrPart::Var(eval) => {
                        if let Some(s) = eval(ctx)? {
                            parts.push(Part::Dynamic(s));
                        }
                    }
                }
            }
            if parts.is_empty() {
                continue;
            }
            let sep = match attr.merge {
                Merge::Append(sep) => sep,
                Merge::Override => "",
            };
            write!(f, " {}=\"", attr.name)?;
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                match part {
                    Part::Static(s) => f.write_str(s)?,
                    Part::Dynamic(s) => escape(f, s)?,
                }
            }
            f.write_char('"')?;
        }
        f.write_char('>')?;

        if el.void {
            return Ok(());
        }
        self.nodes(&el.children, ctx, f)?;
        write!(f, "</{}>", el.name)?;
        Ok(())
    }
}
