#![allow(dead_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Years of professional experience declared before upload.
///
/// Ranges over 0..=10, where 10 is the open-ended "10 or more" bucket.
/// Displays as `"10+"` for that bucket but is sent over the wire as `"10"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExperienceLevel(u8);

#[derive(Debug, Error, PartialEq)]
#[error("experience must be a whole number of years between 0 and 10 (or \"10+\"), got '{0}'")]
pub struct ParseExperienceError(String);

impl ExperienceLevel {
    pub const MAX_YEARS: u8 = 10;

    pub fn from_years(years: u8) -> Option<Self> {
        (years <= Self::MAX_YEARS).then_some(Self(years))
    }

    pub fn years(self) -> u8 {
        self.0
    }

    pub fn is_open_ended(self) -> bool {
        self.0 == Self::MAX_YEARS
    }

    /// Form value the parse and match endpoints expect.
    pub fn as_wire(self) -> String {
        self.0.to_string()
    }

    /// Human label used by the picker and the resume summary.
    pub fn label(self) -> String {
        match self.0 {
            0 => "0 years (Fresher)".to_string(),
            1 => "1 year".to_string(),
            n if n == Self::MAX_YEARS => format!("{n}+ years"),
            n => format!("{n} years"),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open_ended() {
            write!(f, "{}+", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = ParseExperienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('+').unwrap_or(trimmed);
        let years: u8 = digits
            .parse()
            .map_err(|_| ParseExperienceError(s.to_string()))?;
        // "+" is only meaningful on the open-ended bucket
        if digits.len() != trimmed.len() && years != Self::MAX_YEARS {
            return Err(ParseExperienceError(s.to_string()));
        }
        Self::from_years(years).ok_or_else(|| ParseExperienceError(s.to_string()))
    }
}

/// Structured fields extracted by the parse endpoint.
///
/// `skills` and `education` are comma-delimited text exactly as the service
/// returns them; they are split into lists only when a summary is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResumeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
}

/// One-shot payload carried from a successful upload to match retrieval.
/// Lives only in memory for a single transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationHandoff {
    pub parsed_data: ParsedResumeData,
    pub experience: ExperienceLevel,
}
