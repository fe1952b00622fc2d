//! Site locales.

use std::fmt;
use std::str::FromStr;

use crate::i18n::path::normalize_path;

/// Locales served by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Language tag used for `<html lang>` and query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    /// The other locale.
    pub fn opposite(self) -> Self {
        match self {
            Locale::En => Locale::Es,
            Locale::Es => Locale::En,
        }
    }

    /// Root path of the locale.
    pub fn root(self) -> &'static str {
        match self {
            Locale::En => "/",
            Locale::Es => "/es/",
        }
    }

    /// Detect the locale a site path belongs to.
    ///
    /// Everything under `/es/` is Spanish; every other path is English.
    pub fn of_path(path: &str) -> Self {
        let normalized = normalize_path(path);
        if normalized.starts_with("/es/") {
            Locale::Es
        } else {
            Locale::En
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    /// Lenient: anything that is not `es` falls back to English.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("es") {
            Ok(Locale::Es)
        } else {
            Ok(Locale::En)
        }
    }
}
