//! Typed, composable accessors from a root context type to values within it.
//!
//! A [`Path`] is the only way a compiled formula reaches into a context: it
//! is a pure projection function paired with a dotted name used for error
//! messages and for deciding whether two embeds agree on how to reach a
//! shared context. Paths compose with [`then`][Path::then], which is what
//! makes embedding one template inside another with a different context type
//! possible without re-deriving the inner template's structure.

use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

type GetFn<R, V> = dyn Fn(&R) -> Option<V> + Send + Sync;
type TestFn<R> = dyn Fn(&R) -> bool + Send + Sync;

/// A pure accessor from a root context type `R` to a value of type `V`
/// reachable within it.
///
/// Evaluating a path twice on equal inputs yields equal outputs; paths must
/// not have side effects.
pub struct Path<R, V> {
    repr: String,
    get: Arc<GetFn<R, V>>,
}

/// A boolean condition over a context, used by conditionals and attribute
/// presence checks.
///
/// Constructed from a [`Path`] via the comparison methods, or combined from
/// other predicates with [`and`][Predicate::and], [`or`][Predicate::or] and
/// [`not`][Predicate::not].
pub struct Predicate<R> {
    repr: String,
    test: Arc<TestFn<R>>,
}

impl<R, V> Clone for Path<R, V> {
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
            get: Arc::clone(&self.get),
        }
    }
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<R, V> fmt::Debug for Path<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.repr)
    }
}

impl<R> fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.repr)
    }
}

impl<R: 'static, V: 'static> Path<R, V> {
    /// Construct a path from a projection function.
    ///
    /// The name should be the dotted chain of projected fields, e.g.
    /// `"address.city"`. The [`path!`][crate::path!] macro derives both the
    /// name and the closure from a field chain.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> V + Send + Sync + 'static,
    {
        Self {
            repr: name.into(),
            get: Arc::new(move |root| Some(f(root))),
        }
    }

    /// Construct a path for an optional projection.
    pub fn optional<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> Option<V> + Send + Sync + 'static,
    {
        Self {
            repr: name.into(),
            get: Arc::new(f),
        }
    }

    /// Evaluate the path, requiring a value.
    ///
    /// Fails with [`ErrorKind::InvalidPath`][crate::ErrorKind::InvalidPath]
    /// when an optional projection lands on nothing.
    pub fn evaluate(&self, root: &R) -> Result<V> {
        (self.get)(root).ok_or_else(|| Error::invalid_path(&self.repr))
    }

    /// Evaluate the path, returning `None` when an optional projection lands
    /// on nothing.
    #[inline]
    pub fn evaluate_optional(&self, root: &R) -> Option<V> {
        (self.get)(root)
    }

    /// Rebase a path into `V` onto this path, yielding a path from `R`.
    ///
    /// Composition is total, pure and associative.
    pub fn then<W: 'static>(&self, inner: &Path<V, W>) -> Path<R, W> {
        let outer = Arc::clone(&self.get);
        let next = Arc::clone(&inner.get);
        Path {
            repr: join(&self.repr, &inner.repr),
            get: Arc::new(move |root| outer(root).and_then(|mid| next(&mid))),
        }
    }

    /// The dotted representation of this path.
    #[inline]
    pub fn repr(&self) -> &str {
        &self.repr
    }

    /// True when the projection yields a value.
    pub fn is_present(&self) -> Predicate<R> {
        let get = Arc::clone(&self.get);
        Predicate {
            repr: format!("{} != nil", self.repr),
            test: Arc::new(move |root| get(root).is_some()),
        }
    }

    /// True when the projection yields nothing.
    pub fn is_absent(&self) -> Predicate<R> {
        let get = Arc::clone(&self.get);
        Predicate {
            repr: format!("{} == nil", self.repr),
            test: Arc::new(move |root| get(root).is_none()),
        }
    }
}

impl<R: Clone + 'static> Path<R, R> {
    /// The identity path: the context itself.
    ///
    /// Used by self-loops, where the render context is the sequence. The
    /// identity is a neutral element of [`then`][Path::then].
    pub fn identity() -> Self {
        Self {
            repr: String::from("self"),
            get: Arc::new(|root| Some(root.clone())),
        }
    }
}

// Comparison predicates. An absent optional compares false against any
// literal; absence itself is tested with `is_present`/`is_absent`.
impl<R: 'static, V> Path<R, V>
where
    V: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    /// True when the projected value equals the literal.
    pub fn equals(&self, literal: V) -> Predicate<R> {
        let get = Arc::clone(&self.get);
        Predicate {
            repr: format!("{} == {:?}", self.repr, literal),
            test: Arc::new(move |root| get(root).map(|v| v == literal).unwrap_or(false)),
        }
    }

    /// True when the projected value does not equal the literal.
    pub fn not_equals(&self, literal: V) -> Predicate<R> {
        let get = Arc::clone(&self.get);
        Predicate {
            repr: format!("{} != {:?}", self.repr, literal),
            test: Arc::new(move |root| get(root).map(|v| v != literal).unwrap_or(false)),
        }
    }
}

impl<R: 'static, V> Path<R, V>
where
    V: PartialOrd + fmt::Debug + Send + Sync + 'static,
{
    /// True when the projected value orders strictly below the literal.
    pub fn less_than(&self, literal: V) -> Predicate<R> {
        let get = Arc::clone(&self.get);
        Predicate {
            repr: format!("{} < {:?}", self.repr, literal),
            test: Arc::new(move |root| get(root).map(|v| v < literal).unwrap_or(false)),
        }
    }

    /// True when the projected value orders strictly above the literal.
    pub fn greater_than(&self, literal: V) -> Predicate<R> {
        let get = Arc::clone(&self.get);
        Predicate {
            repr: format!("{} > {:?}", self.repr, literal),
            test: Arc::new(move |root| get(root).map(|v| v > literal).unwrap_or(false)),
        }
    }
}

impl<R: 'static> Predicate<R> {
    /// Construct a predicate from an arbitrary test function.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self {
            repr: name.into(),
            test: Arc::new(f),
        }
    }

    /// Evaluate the predicate against a context.
    #[inline]
    pub fn test(&self, root: &R) -> bool {
        (self.test)(root)
    }

    /// Logical conjunction.
    pub fn and(&self, other: &Predicate<R>) -> Predicate<R> {
        let a = Arc::clone(&self.test);
        let b = Arc::clone(&other.test);
        Predicate {
            repr: format!("({} && {})", self.repr, other.repr),
            test: Arc::new(move |root| a(root) && b(root)),
        }
    }

    /// Logical disjunction.
    pub fn or(&self, other: &Predicate<R>) -> Predicate<R> {
        let a = Arc::clone(&self.test);
        let b = Arc::clone(&other.test);
        Predicate {
            repr: format!("({} || {})", self.repr, other.repr),
            test: Arc::new(move |root| a(root) || b(root)),
        }
    }

    /// Logical negation.
    pub fn not(&self) -> Predicate<R> {
        let a = Arc::clone(&self.test);
        Predicate {
            repr: format!("!{}", self.repr),
            test: Arc::new(move |root| !a(root)),
        }
    }

    /// The representation of this predicate.
    #[inline]
    pub fn repr(&self) -> &str {
        &self.repr
    }
}

fn join(outer: &str, inner: &str) -> String {
    match (outer, inner) {
        ("self", _) => inner.to_owned(),
        (_, "self") => outer.to_owned(),
        _ => format!("{outer}.{inner}"),
    }
}
