use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod ledger;
mod users;

pub use ledger::LedgerInput;
pub use users::Registration;

/// Entry point of the domain: credentials and the profit/loss ledger.
///
/// `Engine` owns the database handle; callers build one and share it (the
/// server keeps it behind an `Arc`).
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = normalize_required_text(value, "email")?.to_lowercase();
    if !email.contains('@') {
        return Err(EngineError::InvalidInput(format!("invalid email: {email}")));
    }
    Ok(email)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(normalize_required_text("  Acme ", "name").unwrap(), "Acme");
        assert_eq!(
            normalize_required_text("   ", "name"),
            Err(EngineError::InvalidInput("name must not be empty".to_string()))
        );
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" 0812 ")),
            Some("0812".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(
            normalize_email(" Jane@Example.com ").unwrap(),
            "jane@example.com"
        );
        assert!(normalize_email("jane").is_err());
    }
}
