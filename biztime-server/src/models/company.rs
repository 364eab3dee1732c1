//! Company records and the code-derivation rule
//!
//! A company's code is the first two characters of its name, case preserved,
//! ignoring leading whitespace. Two names sharing a prefix collide; the second
//! insert is a conflict.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Number of leading characters of the name used as the company code
const CODE_LEN: usize = 2;

/// Company record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Validated company name (non-empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyName(String);

impl CompanyName {
    /// Validate a name from a request body.
    ///
    /// # Example
    /// ```
    /// use biztime_server::models::CompanyName;
    ///
    /// assert!(CompanyName::new(Some("IBM".into())).is_ok());
    /// assert!(CompanyName::new(Some("".into())).is_err());
    /// assert!(CompanyName::new(None).is_err());
    /// ```
    pub fn new(name: Option<String>) -> Result<Self, ValidationError> {
        let name = name.ok_or(ValidationError::Missing { field: "name" })?;
        if name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(Self(name))
    }

    /// Derive the company code: the first two characters after any leading
    /// whitespace, case preserved. The stored name keeps its whitespace.
    pub fn derive_code(&self) -> String {
        self.0.trim_start().chars().take(CODE_LEN).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Insert payload for a company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl NewCompany {
    /// Build an insert payload whose code is derived from the name.
    pub fn from_name(name: CompanyName, description: Option<String>) -> Self {
        Self {
            code: name.derive_code(),
            name: name.into_string(),
            description,
        }
    }
}

/// Full replacement of a company's mutable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyChanges {
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> CompanyName {
        CompanyName::new(Some(s.to_owned())).unwrap()
    }

    #[test]
    fn code_is_first_two_chars() {
        assert_eq!(name("IBM").derive_code(), "IB");
        assert_eq!(name("apple").derive_code(), "ap");
    }

    #[test]
    fn code_preserves_case() {
        assert_eq!(name("aPPLE").derive_code(), "aP");
    }

    #[test]
    fn short_name_uses_whole_name() {
        assert_eq!(name("X").derive_code(), "X");
    }

    #[test]
    fn code_skips_leading_whitespace() {
        let padded = name("  IBM");
        assert_eq!(padded.derive_code(), "IB");
        assert_eq!(padded.as_str(), "  IBM");
    }

    #[test]
    fn code_counts_characters_not_bytes() {
        assert_eq!(name("Émile SA").derive_code(), "Ém");
    }

    #[test]
    fn colliding_prefixes_derive_same_code() {
        assert_eq!(name("Apple").derive_code(), name("Apricot").derive_code());
    }

    #[test]
    fn rejects_missing_and_blank() {
        assert_eq!(
            CompanyName::new(None).unwrap_err(),
            ValidationError::Missing { field: "name" }
        );
        assert_eq!(
            CompanyName::new(Some("   ".into())).unwrap_err(),
            ValidationError::Empty { field: "name" }
        );
    }

    #[test]
    fn new_company_from_name() {
        let company = NewCompany::from_name(name("IBM"), Some("Big blue.".into()));
        assert_eq!(company.code, "IB");
        assert_eq!(company.name, "IBM");
        assert_eq!(company.description.as_deref(), Some("Big blue."));
    }
}
