//! Error types with rich diagnostics using miette
//!
//! Structural parse errors carry source spans pointing at the offending
//! record. A missing symbol is not an error at all: it is a warning-level
//! diagnostic collected on the scene while conversion carries on.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (file path, `<embedded ...>` or `<input>`)
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

/// Which kind of delimited block was left open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `[` ... `]` embedded symbol body
    Embedded,
    /// `{` ... `}` attribute list
    Attributes,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Embedded => f.write_str("embedded symbol `[`"),
            BlockKind::Attributes => f.write_str("attribute `{`"),
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors that occur while reading the record grammar. Always fatal.
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("malformed record: {message}")]
    #[diagnostic(code(schemsvg::parse::malformed_record))]
    MalformedRecord {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this record")]
        span: SourceSpan,
    },

    #[error("unterminated {block} block")]
    #[diagnostic(
        code(schemsvg::parse::unterminated_block),
        help("every opening delimiter needs its closing line before the end of the file")
    )]
    UnterminatedBlock {
        block: BlockKind,
        #[source_code]
        src: NamedSource<String>,
        #[label("opened here")]
        span: SourceSpan,
    },
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Errors that occur while resolving symbols. Fatal, unlike [`SymbolNotFound`].
#[derive(Error, Diagnostic, Debug)]
pub enum ResolveError {
    #[error("symbol nesting deeper than {limit} levels: {chain}")]
    #[diagnostic(
        code(schemsvg::resolve::recursion_depth_exceeded),
        help("a symbol probably instantiates itself, directly or through other symbols")
    )]
    RecursionDepthExceeded { limit: usize, chain: String },

    #[error("drawing extends beyond ±{limit} units: {chain}")]
    #[diagnostic(
        code(schemsvg::resolve::extent_exceeded),
        help("symbol placements add up to coordinates too large to draw")
    )]
    ExtentExceeded { limit: i32, chain: String },

    #[error("could not read symbol file {path}")]
    #[diagnostic(code(schemsvg::resolve::symbol_read))]
    SymbolRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// A component whose symbol could not be located. Rendered as empty geometry.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("component not found: '{name}' (referenced from {referenced_from})")]
#[diagnostic(
    code(schemsvg::resolve::symbol_not_found),
    severity(Warning),
    help("add the directory holding this symbol to the symbol search roots")
)]
pub struct SymbolNotFound {
    pub name: String,
    pub referenced_from: String,
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Any fatal error of a conversion
#[derive(Error, Diagnostic, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),
}

impl ConvertError {
    /// The underlying parse error, whether it came from the input file or
    /// from a symbol it references
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            ConvertError::Parse(e) | ConvertError::Resolve(ResolveError::Parse(e)) => Some(e),
            ConvertError::Resolve(_) => None,
        }
    }
}
