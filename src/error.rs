use std::fmt;
use std::io;

/// A convenient type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur during template compilation or rendering.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
}

/// The different kinds of [`Error`] that can occur.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Two embeds in the same template disagree about how to reach a shared
    /// local context type. Compilation fails rather than silently picking
    /// one of the rebasing paths.
    AmbiguousContext {
        /// The contested inner context type.
        context: &'static str,
        /// The rebasing path of the first embed.
        first: String,
        /// The rebasing path of the conflicting embed.
        second: String,
    },

    /// The localization resolver has no entry for a key and locale.
    MissingLocalizationKey {
        /// The requested key.
        key: String,
        /// The locale the key was requested for.
        locale: String,
    },

    /// An optional projection landed on nothing in a place that requires a
    /// value.
    InvalidPath {
        /// The dotted representation of the failing path.
        path: String,
    },

    /// Any other render-time failure, e.g. from a collaborator or from
    /// serializing localization parameters.
    Render(String),

    /// The output writer failed.
    Io(String),
}

impl Error {
    pub(crate) fn ambiguous_context(
        context: &'static str,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::AmbiguousContext {
                context,
                first: first.into(),
                second: second.into(),
            },
        }
    }

    pub(crate) fn missing_key(key: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MissingLocalizationKey {
                key: key.into(),
                locale: locale.into(),
            },
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidPath { path: path.into() },
        }
    }

    pub(crate) fn render(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Render(msg.into()),
        }
    }

    pub(crate) fn io(err: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io(err.to_string()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::AmbiguousContext {
                context,
                first,
                second,
            } => write!(
                f,
                "ambiguous local context `{context}`: embedded via `{first}` and via `{second}`"
            ),
            ErrorKind::MissingLocalizationKey { key, locale } => {
                write!(f, "missing localization key `{key}` for locale `{locale}`")
            }
            ErrorKind::InvalidPath { path } => {
                write!(f, "path `{path}` evaluated to nothing")
            }
            ErrorKind::Render(msg) => write!(f, "{msg}"),
            ErrorKind::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::render("format error")
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::render(msg.to_string())
    }
}
