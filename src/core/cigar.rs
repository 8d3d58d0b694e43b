//! CIGAR string tokenizing and operation classification
//!
//! A CIGAR string is a run-length encoding of an alignment:
//!
//! ```text
//! 8M7D6M2I2M11D7M
//! ```
//!
//! Each token is a positive length followed by one operation character from
//! the SAM alphabet `M I D N S H P = X`. Only `M`, `X`, `I` and `D` carry
//! mapping semantics here; the rest are recognized so they can be reported
//! as unsupported instead of malformed.

use crate::core::error::{MappingError, MappingResult};
use std::collections::BTreeSet;
use std::fmt;

/// Every operation kind in the SAM CIGAR alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CigarKind {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Padding,
    Equal,
    Diff,
}

impl CigarKind {
    /// Parse an operation character, `None` if it is not in the CIGAR alphabet
    ///
    /// # Examples
    /// ```
    /// use cigarmap::core::CigarKind;
    /// assert_eq!(CigarKind::from_char('M'), Some(CigarKind::Match));
    /// assert_eq!(CigarKind::from_char('X'), Some(CigarKind::Diff));
    /// assert_eq!(CigarKind::from_char('m'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'M' => Some(CigarKind::Match),
            'I' => Some(CigarKind::Insertion),
            'D' => Some(CigarKind::Deletion),
            'N' => Some(CigarKind::Skip),
            'S' => Some(CigarKind::SoftClip),
            'H' => Some(CigarKind::HardClip),
            'P' => Some(CigarKind::Padding),
            '=' => Some(CigarKind::Equal),
            'X' => Some(CigarKind::Diff),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            CigarKind::Match => 'M',
            CigarKind::Insertion => 'I',
            CigarKind::Deletion => 'D',
            CigarKind::Skip => 'N',
            CigarKind::SoftClip => 'S',
            CigarKind::HardClip => 'H',
            CigarKind::Padding => 'P',
            CigarKind::Equal => '=',
            CigarKind::Diff => 'X',
        }
    }
}

impl fmt::Display for CigarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One `<length><op>` token of a CIGAR string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarToken {
    pub len: u32,
    pub kind: CigarKind,
}

/// A CIGAR operation the coordinate mapper knows how to walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarOperation {
    Match(u32),
    Mismatch(u32),
    Insertion(u32),
    Deletion(u32),
}

impl CigarOperation {
    pub fn len(&self) -> u32 {
        match self {
            CigarOperation::Match(n)
            | CigarOperation::Mismatch(n)
            | CigarOperation::Insertion(n)
            | CigarOperation::Deletion(n) => *n,
        }
    }

    pub fn consumes_reference(&self) -> bool {
        matches!(
            self,
            CigarOperation::Match(_) | CigarOperation::Mismatch(_) | CigarOperation::Deletion(_)
        )
    }

    pub fn consumes_query(&self) -> bool {
        matches!(
            self,
            CigarOperation::Match(_) | CigarOperation::Mismatch(_) | CigarOperation::Insertion(_)
        )
    }

    pub fn kind(&self) -> CigarKind {
        match self {
            CigarOperation::Match(_) => CigarKind::Match,
            CigarOperation::Mismatch(_) => CigarKind::Diff,
            CigarOperation::Insertion(_) => CigarKind::Insertion,
            CigarOperation::Deletion(_) => CigarKind::Deletion,
        }
    }
}

impl fmt::Display for CigarOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len(), self.kind())
    }
}

/// Outcome of classifying a token against the supported operation set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    Supported(CigarOperation),
    Unsupported(CigarKind),
}

/// The set of operations a build is allowed to walk
///
/// Defaults to `M`, `X`, `I`, `D`. It can be narrowed but never extended
/// past those four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedOps {
    matches: bool,
    mismatches: bool,
    insertions: bool,
    deletions: bool,
}

impl Default for SupportedOps {
    fn default() -> Self {
        Self {
            matches: true,
            mismatches: true,
            insertions: true,
            deletions: true,
        }
    }
}

impl SupportedOps {
    /// Build from operation characters, e.g. `"MXID"` or `"MD"`
    ///
    /// # Examples
    /// ```
    /// use cigarmap::core::{CigarKind, SupportedOps};
    /// let ops = SupportedOps::from_chars("MD").unwrap();
    /// assert!(ops.contains(CigarKind::Match));
    /// assert!(!ops.contains(CigarKind::Insertion));
    /// assert!(SupportedOps::from_chars("MS").is_err());
    /// ```
    pub fn from_chars(chars: &str) -> MappingResult<Self> {
        let mut ops = Self {
            matches: false,
            mismatches: false,
            insertions: false,
            deletions: false,
        };
        for c in chars.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            match c {
                'M' => ops.matches = true,
                'X' => ops.mismatches = true,
                'I' => ops.insertions = true,
                'D' => ops.deletions = true,
                other => return Err(MappingError::InvalidSupportedOp(other)),
            }
        }
        Ok(ops)
    }

    pub fn contains(&self, kind: CigarKind) -> bool {
        match kind {
            CigarKind::Match => self.matches,
            CigarKind::Diff => self.mismatches,
            CigarKind::Insertion => self.insertions,
            CigarKind::Deletion => self.deletions,
            _ => false,
        }
    }

    /// Classify a token, producing a walkable operation only if it is enabled
    pub fn classify(&self, token: CigarToken) -> OpClass {
        if !self.contains(token.kind) {
            return OpClass::Unsupported(token.kind);
        }
        let op = match token.kind {
            CigarKind::Match => CigarOperation::Match(token.len),
            CigarKind::Diff => CigarOperation::Mismatch(token.len),
            CigarKind::Insertion => CigarOperation::Insertion(token.len),
            CigarKind::Deletion => CigarOperation::Deletion(token.len),
            other => return OpClass::Unsupported(other),
        };
        OpClass::Supported(op)
    }
}

impl fmt::Display for SupportedOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enabled: Vec<String> = [
            CigarKind::Match,
            CigarKind::Diff,
            CigarKind::Insertion,
            CigarKind::Deletion,
        ]
        .iter()
        .filter(|k| self.contains(**k))
        .map(|k| k.to_char().to_string())
        .collect();
        write!(f, "{}", enabled.join(", "))
    }
}

/// Tokenize a CIGAR string into `(length, kind)` tokens
///
/// Fails with `MalformedCigar` on an empty string, a missing or zero
/// length, a length that does not fit in `u32`, trailing digits and any
/// character outside the CIGAR alphabet.
///
/// # Examples
/// ```
/// use cigarmap::core::{parse_cigar, CigarKind};
/// let tokens = parse_cigar("3M1I2S").unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[2].kind, CigarKind::SoftClip);
/// assert!(parse_cigar("0M").is_err());
/// ```
pub fn parse_cigar(cigar: &str) -> MappingResult<Vec<CigarToken>> {
    if cigar.is_empty() {
        return Err(MappingError::malformed(cigar, "empty CIGAR string"));
    }

    let mut tokens = Vec::with_capacity(cigar.len() / 2);
    let mut len: Option<u32> = None;

    for (pos, c) in cigar.char_indices() {
        if let Some(digit) = c.to_digit(10) {
            let next = len
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| {
                    MappingError::malformed(cigar, format!("length overflows at position {}", pos))
                })?;
            len = Some(next);
            continue;
        }

        let kind = CigarKind::from_char(c).ok_or_else(|| {
            MappingError::malformed(
                cigar,
                format!("unknown operation '{}' at position {}", c, pos),
            )
        })?;

        match len.take() {
            None => {
                return Err(MappingError::malformed(
                    cigar,
                    format!("operation '{}' at position {} has no length", c, pos),
                ))
            }
            Some(0) => {
                return Err(MappingError::malformed(
                    cigar,
                    format!("operation '{}' at position {} has zero length", c, pos),
                ))
            }
            Some(n) => tokens.push(CigarToken { len: n, kind }),
        }
    }

    if len.is_some() {
        return Err(MappingError::malformed(cigar, "trailing length without an operation"));
    }

    Ok(tokens)
}

/// Tokenize and classify a CIGAR string in one pass over the token list
///
/// Every token is checked before anything is returned, so a single
/// unsupported operation anywhere rejects the whole string.
pub fn parse_operations(cigar: &str, supported: &SupportedOps) -> MappingResult<Vec<CigarOperation>> {
    let tokens = parse_cigar(cigar)?;

    let mut ops = Vec::with_capacity(tokens.len());
    let mut unsupported = BTreeSet::new();

    for token in tokens {
        match supported.classify(token) {
            OpClass::Supported(op) => ops.push(op),
            OpClass::Unsupported(kind) => {
                unsupported.insert(kind.to_char());
            }
        }
    }

    if !unsupported.is_empty() {
        return Err(MappingError::UnsupportedOperation {
            cigar: cigar.to_string(),
            found: unsupported.into_iter().collect(),
            allowed: supported.to_string(),
        });
    }

    Ok(ops)
}
