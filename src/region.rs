//! Genomic region strings of the form `NAME` or `NAME:START-END`.
//!
//! Textual coordinates are 1-based and inclusive at both ends; accessors
//! translate to the 0-based half-open convention used by index queries.

use std::fmt;
use std::str::FromStr;

use crate::errors::{HtsViewError, Result};

/// A parsed region: a sequence name with an optional 1-based inclusive
/// interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    name: String,
    interval: Option<(u64, u64)>,
}

impl Region {
    /// A region spanning a whole sequence.
    pub fn whole(name: impl Into<String>) -> Self {
        Self { name: name.into(), interval: None }
    }

    /// A bounded region. `start` and `end` are 1-based and inclusive.
    ///
    /// # Errors
    ///
    /// [`HtsViewError::RegionSyntax`] when `start` is zero or exceeds `end`.
    pub fn bounded(name: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        let name = name.into();
        if start == 0 {
            return Err(HtsViewError::RegionSyntax {
                region: format!("{name}:{start}-{end}"),
                reason: "start coordinate must be at least 1".into(),
            });
        }
        if start > end {
            return Err(HtsViewError::RegionSyntax {
                region: format!("{name}:{start}-{end}"),
                reason: "start coordinate exceeds end".into(),
            });
        }
        Ok(Self { name, interval: Some((start, end)) })
    }

    /// The sequence name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 1-based inclusive interval, if the region is bounded.
    #[must_use]
    pub fn interval(&self) -> Option<(u64, u64)> {
        self.interval
    }

    /// 0-based inclusive start; 0 for a whole-sequence region.
    #[must_use]
    pub fn start_zero_based(&self) -> u64 {
        self.interval.map_or(0, |(start, _)| start - 1)
    }

    /// 0-based exclusive end; `None` for a whole-sequence region.
    #[must_use]
    pub fn end_exclusive(&self) -> Option<u64> {
        self.interval.map(|(_, end)| end)
    }
}

impl FromStr for Region {
    type Err = HtsViewError;

    /// Parses `NAME` or `NAME:START-END`.
    ///
    /// The interval is split off at the last `:`, so a bounded region's
    /// name may itself contain colons. A string with a `:` whose suffix is
    /// not a valid interval is rejected; whole-sequence regions over such
    /// names are built with [`Region::whole`] instead.
    fn from_str(s: &str) -> Result<Self> {
        let syntax_err = |reason: &str| HtsViewError::RegionSyntax {
            region: s.to_string(),
            reason: reason.to_string(),
        };
        if s.is_empty() {
            return Err(syntax_err("empty region"));
        }
        let Some((name, suffix)) = s.rsplit_once(':') else {
            return Ok(Self::whole(s));
        };
        if name.is_empty() {
            return Err(syntax_err("empty sequence name"));
        }
        let Some((start_text, end_text)) = suffix.split_once('-') else {
            return Err(syntax_err("interval must be START-END"));
        };
        let start: u64 = start_text
            .parse()
            .map_err(|_| syntax_err("start coordinate is not a number"))?;
        let end: u64 = end_text
            .parse()
            .map_err(|_| syntax_err("end coordinate is not a number"))?;
        if start == 0 {
            return Err(syntax_err("start coordinate must be at least 1"));
        }
        if start > end {
            return Err(syntax_err("start coordinate exceeds end"));
        }
        Ok(Self { name: name.to_string(), interval: Some((start, end)) })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interval {
            None => f.write_str(&self.name),
            Some((start, end)) => write!(f, "{}:{}-{}", self.name, start, end),
        }
    }
}
