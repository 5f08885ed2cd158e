//! Domain engine of the profit/loss ledger.
//!
//! The [`Engine`] owns the database connection and exposes the credential
//! flow (login, registration, password change) and CRUD over the ledger.
//! Statistics are computed by the pure [`stats::aggregate`] function.

pub use error::EngineError;
pub use ledger::{DATE_FORMAT, LedgerRecord};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, LedgerInput, Registration};
pub use stats::{LedgerStats, MonthTotals, Summary, Totals};
pub use users::User;

mod credentials;
mod error;
mod ledger;
mod money;
mod ops;
pub mod stats;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
