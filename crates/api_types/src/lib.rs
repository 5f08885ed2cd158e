//! JSON bodies of the HTTP API.
//!
//! Monetary values are decimal numbers with at most two fractional digits;
//! dates are ISO `YYYY-MM-DD` strings.

use serde::{Deserialize, Serialize};

/// `{"message": ...}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub organization: String,
        pub name: String,
        pub email: String,
        #[serde(default)]
        pub whatsapp: Option<String>,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChangePassword {
        pub user_id: i32,
        #[serde(rename = "currentPassword")]
        pub current_password: String,
        #[serde(rename = "newPassword")]
        pub new_password: String,
    }

    /// Public view of an account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub role_id: i32,
        pub name: String,
        pub email: String,
        pub organization: String,
        pub whatsapp: Option<String>,
    }

    /// Response of login and registration.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserResponse {
        pub message: String,
        pub user: UserView,
    }
}

pub mod ledger {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerRecord {
        pub id: i32,
        pub owner_id: i32,
        pub date: String,
        pub revenue: f64,
        pub expense: f64,
        pub net: f64,
    }

    /// Body of `POST /ledger`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerNew {
        pub owner_id: Option<i32>,
        pub date: String,
        pub revenue: f64,
        pub expense: f64,
    }

    /// Body of `PUT /ledger/{id}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerUpdate {
        pub date: String,
        pub revenue: f64,
        pub expense: f64,
    }

    /// Owner selector, as query string or JSON body.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OwnerQuery {
        pub owner_id: Option<i32>,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Totals {
        pub revenue: f64,
        pub expense: f64,
        pub net: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthTotals {
        /// e.g. `"March 2025"`.
        pub month: String,
        pub revenue: f64,
        pub expense: f64,
        pub net: f64,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Summary {
        pub avg_revenue: f64,
        pub avg_expense: f64,
        pub avg_net: f64,
        pub max_revenue: f64,
        pub min_revenue: f64,
        pub max_expense: f64,
        pub min_expense: f64,
        pub max_net: f64,
        pub min_net: f64,
    }

    /// Response of `/ledger/stats`; the summary is flattened into the top level.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Stats {
        pub records: Vec<LedgerRecord>,
        pub daily: BTreeMap<String, Totals>,
        /// January to December of the current year.
        pub monthly: Vec<MonthTotals>,
        pub yearly: BTreeMap<String, Totals>,
        #[serde(flatten)]
        pub summary: Summary,
    }
}
