//! A compile-once, render-many HTML template engine.
//!
//! # Overview
//!
//! Templates are built declaratively in Rust as trees of nodes: markup
//! elements, variables bound by typed [`Path`]s, conditionals, loops,
//! embedded sub-templates, localization references and formatted dates. The
//! tree is compiled once per template type into an immutable [`Formula`]
//! and cached for the lifetime of the process; rendering is then pure data
//! substitution against a typed context value. No markup is ever parsed at
//! runtime.
//!
//! ### Engine
//!
//! - Typed, composable context paths: embedding a template with a different
//!   context type only needs a rebasing [`Path`]
//! - HTML escaping by default, opt-out per variable with [`raw`]
//! - Attribute folding with per-attribute merge policies
//! - Pluggable localization and date-formatting collaborators
//! - Synchronous, render-local state only; formulas are freely shared
//!   across threads
//!
//! # Getting started
//!
//! Implement [`Template`] for a type, describing the markup in
//! [`build`][Template::build]:
//!
//! ```
//! use formulate::{elem, path, text, var, Engine, Node, Template};
//!
//! struct Person {
//!     name: String,
//! }
//!
//! struct Greeting;
//!
//! impl Template for Greeting {
//!     type Context = Person;
//!
//!     fn build(&self) -> Node<Person> {
//!         elem("p")
//!             .child(text("Hello "))
//!             .child(var(&path!(Person => name)))
//!             .child(text("!"))
//!             .into()
//!     }
//! }
//!
//! let engine = Engine::new();
//! let ctx = Person { name: String::from("Mats") };
//! assert_eq!(engine.render(&Greeting, &ctx)?, "<p>Hello Mats!</p>");
//! # Ok::<(), formulate::Error>(())
//! ```
//!
//! The first render compiles the formula; subsequent renders of `Greeting`
//! on any thread reuse it.

mod attr;
mod cache;
mod compile;
mod date;
mod error;
mod fmt;
mod locale;
mod macros;
mod node;
mod path;
mod render;
mod value;

use std::fmt as std_fmt;
use std::io;

pub use crate::attr::{Attribute, Merge, Vocabulary};
pub use crate::cache::clear_formula_cache;
pub use crate::compile::Formula;
pub use crate::date::{ChronoDates, DateFormatter, DateStyle, Style};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::locale::{Catalog, Localizer};
pub use crate::node::{
    date, each, each_self, elem, embed, embed_with, fragment, localize, localize_record,
    localize_with, raw, text, var, when, Conditional, Element, Node,
};
pub use crate::path::{Path, Predicate};
pub use crate::value::{to_value, List, Map, Value};

use crate::date::ChronoDates as DefaultDates;
use crate::fmt::Formatter;
use crate::locale::NoTranslations;
use crate::render::Renderer;

/// A template: a type that can describe its markup once.
///
/// [`build`][Template::build] must be a pure function of the instance's own
/// fields, and every instance of one implementing type must build the same
/// tree — the compiled formula is cached per *type* and reused for all
/// instances.
pub trait Template: Send + Sync + 'static {
    /// The typed context value supplied at render time.
    type Context: 'static;

    /// Describe the template's structure.
    fn build(&self) -> Node<Self::Context>;

    /// An optional path from the context to the locale to render with.
    ///
    /// When absent, the engine's default locale applies. An embedded
    /// template's locale path overrides the inherited locale for its
    /// subtree.
    fn locale(&self) -> Option<Path<Self::Context, String>> {
        None
    }
}

/// Holds the collaborators a render needs: the default locale, the
/// localization resolver and the date formatter.
///
/// Formulas live in a process-wide cache, not in the engine, so constructing
/// several engines never recompiles templates.
pub struct Engine {
    pub(crate) default_locale: String,
    pub(crate) localizer: Box<dyn Localizer>,
    pub(crate) dates: Box<dyn DateFormatter>,
}

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct an engine with default collaborators.
    ///
    /// The default locale is `en`, the default date formatter is
    /// [`ChronoDates`], and the default localizer has no entries — every
    /// localization node fails until a real resolver is installed.
    pub fn new() -> Self {
        Self {
            default_locale: String::from("en"),
            localizer: Box::new(NoTranslations),
            dates: Box::new(DefaultDates),
        }
    }

    /// Set the locale used when a template declares no locale path.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Install the localization resolver.
    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self
    }

    /// Install the date formatter.
    pub fn with_date_formatter(mut self, dates: impl DateFormatter + 'static) -> Self {
        self.dates = Box::new(dates);
        self
    }

    /// Render a template against a context value.
    ///
    /// The first render of a template type compiles and caches its formula;
    /// a compilation failure leaves the cache unpopulated. A render failure
    /// returns the error without any partial output.
    pub fn render<T: Template>(&self, template: &T, ctx: &T::Context) -> Result<String> {
        let formula = cache::formula(template)?;
        let mut out = String::with_capacity(128);
        let mut f = Formatter::with_string(&mut out);
        Renderer {
            engine: self,
            locale: self.default_locale.clone(),
        }
        .formula(&formula, ctx, &mut f)?;
        Ok(out)
    }

    /// Render a context-free template.
    pub fn render_static<T>(&self, template: &T) -> Result<String>
    where
        T: Template<Context = ()>,
    {
        self.render(template, &())
    }

    /// Render a template to a writer.
    ///
    /// Output is buffered and written in one step after the render
    /// succeeds, so a failed render commits nothing to the writer.
    pub fn render_to_writer<T, W>(&self, mut writer: W, template: &T, ctx: &T::Context) -> Result<()>
    where
        T: Template,
        W: io::Write,
    {
        let out = self.render(template, ctx)?;
        writer.write_all(out.as_bytes()).map_err(Error::io)
    }
}

impl std_fmt::Debug for Engine {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.debug_struct("Engine")
            .field("default_locale", &self.default_locale)
            .finish_non_exhaustive()
    }
}
