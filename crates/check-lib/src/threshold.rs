//! Threshold ranges in the Nagios plugin range grammar
//!
//! A range literal describes the acceptable band for a measured value:
//! - `10` alerts when the value falls outside 0..=10
//! - `-10` alerts when the value falls outside -10..=0
//! - `10:` and `10:~` alert when the value drops below 10
//! - `~:10` and `:10` alert when the value rises above 10
//! - `10:20` alerts when the value falls outside 10..=20
//! - a leading `@` inverts the range: alert when the value is *inside*
//!
//! Thresholds are grouped into positional [`ThresholdSet`]s parsed from the
//! comma separated `-w`/`-c` option values, one position per metric.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A literal that does not match the range grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid range")]
pub struct RangeError(pub String);

/// A range literal rejected while parsing an option value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{literal}' is not a valid range for '{option}'")]
pub struct ThresholdError {
    /// The offending literal, exactly as given on the command line.
    pub literal: String,
    /// The option the literal was passed to.
    pub option: String,
}

/// Parse a value the lenient way the rest of the engine does: surrounding
/// whitespace is ignored, anything else must be a float.
pub(crate) fn parse_num(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// One alert range with optional bounds.
///
/// A value triggers when it falls outside `start..=end`, or inside it for
/// an inverted range. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    start: Option<f64>,
    end: Option<f64>,
    inverted: bool,
}

impl Threshold {
    /// Parse one range literal.
    pub fn parse(literal: &str) -> Result<Self, RangeError> {
        let err = || RangeError(literal.to_string());
        let (body, inverted) = match literal.strip_prefix('@') {
            Some(rest) => (rest, true),
            None => (literal, false),
        };

        let (start, end) = match body.split_once(':') {
            // A bare number is a zero-anchored band.
            None => {
                let number = parse_num(body).ok_or_else(err)?;
                if number < 0.0 {
                    (Some(number), Some(0.0))
                } else {
                    (Some(0.0), Some(number))
                }
            }
            // `N:` and `N:~` leave the range open above.
            Some((head, "")) | Some((head, "~")) => {
                (Some(parse_num(head).ok_or_else(err)?), None)
            }
            // `:N` and `~:N` leave the range open below.
            Some(("", tail)) | Some(("~", tail)) => {
                (None, Some(parse_num(tail).ok_or_else(err)?))
            }
            Some((head, tail)) => {
                let start = parse_num(head).ok_or_else(err)?;
                let end = parse_num(tail).ok_or_else(err)?;
                if start > end {
                    return Err(err());
                }
                (Some(start), Some(end))
            }
        };

        Ok(Self {
            start,
            end,
            inverted,
        })
    }

    /// Lower bound, if the range has one.
    pub fn start(&self) -> Option<f64> {
        self.start
    }

    /// Upper bound, if the range has one.
    pub fn end(&self) -> Option<f64> {
        self.end
    }

    /// Whether the range alerts on the inside instead of the outside.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Returns true when `value` triggers this threshold.
    pub fn check(&self, value: f64) -> bool {
        let below = self.start.map(|start| value < start).unwrap_or(false);
        let above = self.end.map(|end| value > end).unwrap_or(false);
        let outside = below || above;
        if self.inverted {
            !outside
        } else {
            outside
        }
    }
}

impl FromStr for Threshold {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            write!(f, "@")?;
        }
        match self.start {
            Some(start) => write!(f, "{}:", start)?,
            None => write!(f, "~:")?,
        }
        if let Some(end) = self.end {
            write!(f, "{}", end)?;
        }
        Ok(())
    }
}

/// Parses range literals, so an alternative grammar can be swapped in
/// without touching the check engine.
pub trait RangeParser {
    /// Parse one range literal into a [`Threshold`].
    fn parse(&self, literal: &str) -> Result<Threshold, RangeError>;
}

/// The standard plugin range grammar described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRangeParser;

impl RangeParser for DefaultRangeParser {
    fn parse(&self, literal: &str) -> Result<Threshold, RangeError> {
        Threshold::parse(literal)
    }
}

/// Positional thresholds parsed from one comma separated option value.
///
/// An empty element leaves that position unconfigured, as do positions past
/// the end of the list.
#[derive(Debug, Clone, Default)]
pub struct ThresholdSet {
    thresholds: Vec<Option<Threshold>>,
}

impl ThresholdSet {
    /// An empty set with no threshold at any position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma separated option value with the standard grammar.
    ///
    /// `option` names the command line option in error messages.
    pub fn parse(option: &str, raw: &str) -> Result<Self, ThresholdError> {
        Self::parse_with(&DefaultRangeParser, option, raw)
    }

    /// Parse a comma separated option value with a caller-supplied grammar.
    pub fn parse_with(
        parser: &dyn RangeParser,
        option: &str,
        raw: &str,
    ) -> Result<Self, ThresholdError> {
        let mut thresholds = Vec::new();
        for literal in raw.split(',') {
            if literal.is_empty() {
                thresholds.push(None);
                continue;
            }
            let threshold = parser.parse(literal).map_err(|_| ThresholdError {
                literal: literal.to_string(),
                option: option.to_string(),
            })?;
            thresholds.push(Some(threshold));
        }
        Ok(Self { thresholds })
    }

    /// Threshold configured at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Threshold> {
        self.thresholds.get(position).and_then(Option::as_ref)
    }

    /// Number of positions the option value covered.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Returns true when no position was configured at all.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}
