//! Site Profile
//!
//! Biographical values rendered into assembled pages. Fragments reference them
//! with `{{ profile.<field> }}` tokens; the profile is always passed in by the
//! caller, never looked up globally.
//!
//! Supported tokens:
//! - `{{ profile.name }}`, `{{ profile.title }}`, `{{ profile.email }}`,
//!   `{{ profile.location }}`
//! - `{{ profile.experience_years }}`: whole years since `career_start`
//! - `{{ year }}`: the current calendar year

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::sanitize::escape_html;

/// Personal details shown on the site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
    /// First day of professional experience
    #[serde(default)]
    pub career_start: Option<NaiveDate>,
}

impl Profile {
    /// Years of experience as of `today`, if a career start is configured
    pub fn experience_years(&self, today: NaiveDate) -> Option<u32> {
        self.career_start.map(|start| experience_years(start, today))
    }
}

/// Whole years elapsed between `career_start` and `today`
///
/// A start date in the future yields 0.
pub fn experience_years(career_start: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(career_start).unwrap_or(0)
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"\{\{\s*([a-z_]+(?:\.[a-z_]+)?)\s*\}\}").expect("token pattern is valid")
    })
}

/// Replace profile tokens in `markup`
///
/// Values are HTML-escaped. Unknown tokens, and `experience_years` without a
/// configured career start, are left as written.
pub fn interpolate(markup: &str, profile: &Profile, today: NaiveDate) -> String {
    token_regex()
        .replace_all(markup, |caps: &Captures| {
            let value = match &caps[1] {
                "profile.name" => Some(profile.name.clone()),
                "profile.title" => Some(profile.title.clone()),
                "profile.email" => Some(profile.email.clone()),
                "profile.location" => Some(profile.location.clone()),
                "profile.experience_years" => {
                    profile.experience_years(today).map(|y| y.to_string())
                }
                "year" => Some(today.year().to_string()),
                _ => None,
            };

            match value {
                Some(v) => escape_html(&v),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
