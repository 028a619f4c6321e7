use crate::imp::{AuthMeta, Meta};
use core::{fmt, num::NonZeroUsize};

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    /// No scheme, i.e., the input does not contain a colon or starts with one.
    ///
    /// The error index is always zero.
    MissingScheme,
    /// A number sign `#` occurs before a question mark `?` after the authority.
    ///
    /// The error index points to the number sign.
    InvalidFragmentOrQueryOrder,
    /// A query segment has an empty key, as in `?=v` or `?a=1&&b=2`.
    ///
    /// The error index points to the first byte of the segment.
    InvalidQuery,
}

/// An error occurred when parsing a URI.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ParseErrorKind::MissingScheme => "missing scheme at index ",
            ParseErrorKind::InvalidFragmentOrQueryOrder => "fragment before query at index ",
            ParseErrorKind::InvalidQuery => "empty query key at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ParseError {}

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

pub(crate) fn parse(s: &str) -> Result<Meta> {
    let mut parser = Parser::new(s);
    match parser.parse_all() {
        Ok(()) => Ok(parser.out),
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(index = e.index, kind = ?e.kind, "failed to parse URI");
            Err(e)
        }
    }
}

/// Staged URI parser.
///
/// Each stage consumes a prefix of `remaining()` and records the bounds of
/// what it consumed in `out`.
///
/// # Invariants
///
/// `pos <= s.len()`, `pos` is non-decreasing and on a character boundary.
/// Every stage only advances over ASCII delimiters or whole substrings,
/// so all recorded indexes are on character boundaries.
struct Parser<'a> {
    s: &'a str,
    pos: usize,
    out: Meta,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Parser {
            s,
            pos: 0,
            out: Meta::default(),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.s[self.pos..]
    }

    fn skip(&mut self, n: usize) {
        // INVARIANT: `pos` is non-decreasing.
        self.pos += n;
        debug_assert!(self.pos <= self.s.len());
    }

    fn read_str(&mut self, prefix: &str) -> bool {
        if self.remaining().starts_with(prefix) {
            self.skip(prefix.len());
            true
        } else {
            false
        }
    }

    fn parse_all(&mut self) -> Result<()> {
        self.parse_scheme()?;
        self.parse_authority();
        self.parse_path()?;
        self.parse_query()?;
        self.parse_fragment();
        debug_assert_eq!(self.pos, self.s.len());
        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(pos = self.pos))
    )]
    fn parse_scheme(&mut self) -> Result<()> {
        match self.remaining().find(':') {
            Some(i) if i > 0 => {
                self.out.scheme_end = i;
                self.skip(i + 1);
                Ok(())
            }
            _ => err!(0, MissingScheme),
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(pos = self.pos))
    )]
    fn parse_authority(&mut self) {
        if !self.read_str("//") {
            return;
        }

        let start = self.pos;
        let rem = self.remaining();
        // Only a slash ends the authority. Without one it runs to the end
        // of input, leaving an empty path.
        let len = rem.find('/').unwrap_or(rem.len());
        let auth = &rem[..len];

        // '@' is resolved first so that a colon in userinfo is kept there.
        let (userinfo_end, host_start) = match auth.find('@') {
            Some(i) => (Some(start + i), start + i + 1),
            None => (None, start),
        };

        let host_port = &self.s[host_start..start + len];
        // Colons inside an IP literal belong to the host.
        let colon_from = if host_port.starts_with('[') {
            host_port.find(']').unwrap_or(0)
        } else {
            0
        };
        let (host_end, port_start) = match host_port[colon_from..].find(':') {
            Some(i) => {
                let colon = host_start + colon_from + i;
                (colon, Some(colon + 1))
            }
            None => (start + len, None),
        };

        self.out.auth_meta = Some(AuthMeta {
            start,
            userinfo_end,
            host_bounds: (host_start, host_end),
            port_start,
        });
        self.skip(len);
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(pos = self.pos))
    )]
    fn parse_path(&mut self) -> Result<()> {
        let rem = self.remaining();
        let len = match (rem.find('?'), rem.find('#')) {
            (None, None) => rem.len(),
            (None, Some(hash)) => hash,
            (Some(question), None) => question,
            (Some(question), Some(hash)) if hash < question => {
                err!(self.pos + hash, InvalidFragmentOrQueryOrder)
            }
            (Some(question), Some(_)) => question,
        };

        self.out.path_bounds = (self.pos, self.pos + len);
        self.skip(len);
        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(pos = self.pos))
    )]
    fn parse_query(&mut self) -> Result<()> {
        if !self.read_str("?") {
            return Ok(());
        }

        let start = self.pos;
        let rem = self.remaining();
        let len = rem.find('#').unwrap_or(rem.len());
        let query = &rem[..len];

        // An empty query is a single segment with an empty key.
        let mut seg_start = start;
        for seg in query.split('&') {
            let key = seg.split_once('=').map_or(seg, |(key, _)| key);
            if key.is_empty() {
                err!(seg_start, InvalidQuery);
            }
            seg_start += seg.len() + 1;
        }

        // The question mark was read, so `start + len` is non-zero.
        self.out.query_end = NonZeroUsize::new(start + len);
        self.skip(len);
        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "trace", skip_all, fields(pos = self.pos))
    )]
    fn parse_fragment(&mut self) {
        if self.read_str("#") {
            self.out.fragment_start = NonZeroUsize::new(self.pos);
            self.skip(self.remaining().len());
        }
    }
}
