//! Supported recognition languages.

use std::str::FromStr;

/// A language a speech recognizer listens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum Language {
    /// English, `en-US`.
    #[default]
    #[display("en")]
    English,
    /// Persian, `fa-IR`.
    #[display("fa")]
    Persian,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 2] = [Self::English, Self::Persian];

    /// Returns the short language code used to tag riddles.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Persian => "fa",
        }
    }

    /// Returns the locale handed to the speech recognizer.
    #[must_use]
    pub const fn locale(self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Persian => "fa-IR",
        }
    }
}

/// Error returned when a language name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown language: {name:?}")]
pub struct LanguageParseError {
    /// The rejected name.
    pub name: String,
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Self::English),
            "fa" | "fa-ir" | "persian" | "farsi" => Ok(Self::Persian),
            _ => Err(LanguageParseError { name: s.to_owned() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_codes_and_locales() {
        assert_eq!("en".parse(), Ok(Language::English));
        assert_eq!("EN-US".parse(), Ok(Language::English));
        assert_eq!("fa-IR".parse(), Ok(Language::Persian));
        assert_eq!(" farsi ".parse(), Ok(Language::Persian));
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_codes_round_trip() {
        for language in Language::ALL {
            assert_eq!(language.code().parse(), Ok(language));
            assert_eq!(language.locale().parse(), Ok(language));
            assert_eq!(language.to_string(), language.code());
        }
    }
}
