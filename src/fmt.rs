//! Output formatting and the HTML escaping policy.
//!
//! Rendering always goes through a [`Formatter`] over a string buffer; a
//! render that fails never commits partial output anywhere visible, and
//! [`render_to_writer`][crate::Engine::render_to_writer] flushes the
//! completed buffer in a single step.

use std::fmt;

/// A [`std::fmt::Write`] façade over the render buffer.
pub struct Formatter<'a> {
    buf: &'a mut String,
}

impl<'a> Formatter<'a> {
    pub(crate) fn with_string(buf: &'a mut String) -> Self {
        Self { buf }
    }
}

impl fmt::Write for Formatter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.buf.push(c);
        Ok(())
    }
}

/// Escape a string for HTML output.
///
/// Byte scan in the manner of rustdoc's escaper: only slices between unsafe
/// bytes are copied.
pub(crate) fn escape(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    use fmt::Write;

    let mut last = 0;
    for (i, byte) in s.bytes().enumerate() {
        let entity = match byte {
            b'>' => "&gt;",
            b'<' => "&lt;",
            b'&' => "&amp;",
            b'\'' => "&#39;",
            b'"' => "&quot;",
            _ => continue,
        };
        f.write_str(&s[last..i])?;
        f.write_str(entity)?;
        last = i + 1;
    }
    if last < s.len() {
        f.write_str(&s[last..])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str) -> String {
        let mut out = String::new();
        escape(&mut Formatter::with_string(&mut out), s).unwrap();
        out
    }

    #[test]
    fn escape_basic() {
        assert_eq!(escaped("<b>"), "&lt;b&gt;");
        assert_eq!(escaped("a & b"), "a &amp; b");
        assert_eq!(escaped("'\""), "&#39;&quot;");
    }

    #[test]
    fn escape_passthrough() {
        assert_eq!(escaped("plain text"), "plain text");
        assert_eq!(escaped(""), "");
    }
}
