use std::fmt;

use serde::Serialize;

/// Which rung of the response-parsing ladder produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Structured,
    FallbackRegex,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::FallbackRegex => "fallback_regex",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub sql_query: String,
    pub explanation: String,
    pub provenance: Provenance,
}

impl TranslationResult {
    pub fn structured(sql_query: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            sql_query: sql_query.into(),
            explanation: explanation.into(),
            provenance: Provenance::Structured,
        }
    }

    pub fn fallback(sql_query: impl Into<String>) -> Self {
        Self {
            sql_query: sql_query.into(),
            explanation: String::new(),
            provenance: Provenance::FallbackRegex,
        }
    }
}
