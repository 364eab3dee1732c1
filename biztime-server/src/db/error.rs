//! Data-access error kinds

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} '{id}' already exists")]
    Duplicate { resource: &'static str, id: String },

    #[error("{resource} '{id}' does not exist")]
    MissingReference { resource: &'static str, id: String },

    #[error("{message}")]
    OutOfRange { message: String },
}

/// SQLSTATE for `numeric_value_out_of_range`
const NUMERIC_OUT_OF_RANGE: &str = "22003";

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Classify constraint violations raised by an INSERT or UPDATE.
    ///
    /// `resource`/`id` name the row a violation is about: the inserted key for
    /// unique violations, the referenced key for foreign-key violations.
    /// Numeric overflow (an amount too large for its column) becomes `OutOfRange`.
    pub fn from_constraint(err: sqlx::Error, resource: &'static str, id: &str) -> Self {
        let (unique, foreign_key) = match err.as_database_error() {
            Some(db) => {
                if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) {
                    return Self::OutOfRange {
                        message: db.message().to_owned(),
                    };
                }
                (db.is_unique_violation(), db.is_foreign_key_violation())
            }
            None => (false, false),
        };

        if unique {
            Self::Duplicate {
                resource,
                id: id.to_owned(),
            }
        } else if foreign_key {
            Self::MissingReference {
                resource,
                id: id.to_owned(),
            }
        } else {
            Self::Sqlx(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let err = DbError::from_constraint(sqlx::Error::RowNotFound, "company", "ap");
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn display_names_resource() {
        assert_eq!(
            DbError::not_found("invoice", 7).to_string(),
            "not found: invoice '7'"
        );
        let err = DbError::Duplicate {
            resource: "company",
            id: "IB".into(),
        };
        assert_eq!(err.to_string(), "company 'IB' already exists");
    }
}
