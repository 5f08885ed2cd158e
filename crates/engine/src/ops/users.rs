use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};

use crate::{
    EngineError, ResultEngine, User, credentials, users,
    users::DEFAULT_ROLE_ID,
};

use super::{Engine, normalize_email, normalize_optional_text, normalize_required_text};

/// Input of [`Engine::register`].
#[derive(Clone, Debug)]
pub struct Registration {
    pub organization: String,
    pub name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub password: String,
}

/// Account flag toggled by the admin helpers.
#[derive(Clone, Copy, Debug)]
enum UserFlag {
    Active,
    LedgerAccess,
}

impl Engine {
    /// Check an email/password pair and return the matching account.
    ///
    /// Unknown emails and wrong passwords both fail with
    /// [`EngineError::InvalidCredentials`]. The activation and entitlement
    /// flags are checked only once the password is known to be right, and
    /// fail with [`EngineError::Forbidden`].
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        let Some(model) = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?
        else {
            credentials::verify_unknown_account(password);
            tracing::warn!(%email, "login attempt for unknown account");
            return Err(EngineError::InvalidCredentials);
        };

        if !credentials::verify_password(password, &model.password)? {
            tracing::warn!(user_id = model.id, "login attempt with wrong password");
            return Err(EngineError::InvalidCredentials);
        }
        if !model.is_active {
            return Err(EngineError::Forbidden("user not active".to_string()));
        }
        if !model.ledger_access {
            return Err(EngineError::Forbidden(
                "user has no access to the ledger".to_string(),
            ));
        }

        tracing::info!(user_id = model.id, "user logged in");
        Ok(model.into())
    }

    /// Create a new account with the default role and entitlement flags.
    ///
    /// Fails with [`EngineError::ExistingKey`] if the email is already
    /// registered; the unique index on `email` decides between concurrent
    /// registrations.
    pub async fn register(&self, registration: Registration) -> ResultEngine<User> {
        let organization = normalize_required_text(&registration.organization, "organization")?;
        let name = normalize_required_text(&registration.name, "name")?;
        let email = normalize_email(&registration.email)?;
        let whatsapp = normalize_optional_text(registration.whatsapp.as_deref());
        if registration.password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let password = credentials::hash_password(&registration.password)?;

        let now = Utc::now();
        let user = users::ActiveModel {
            id: ActiveValue::NotSet,
            role_id: ActiveValue::Set(DEFAULT_ROLE_ID),
            name: ActiveValue::Set(name),
            email: ActiveValue::Set(email.clone()),
            organization: ActiveValue::Set(organization),
            whatsapp: ActiveValue::Set(whatsapp),
            password: ActiveValue::Set(password),
            is_active: ActiveValue::Set(true),
            ledger_access: ActiveValue::Set(true),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = user
            .insert(&self.database)
            .await
            .map_err(|err| EngineError::from_unique_violation(err, &email))?;

        tracing::info!(user_id = model.id, email = %model.email, "user registered");
        Ok(model.into())
    }

    /// Replace the password of `user_id` after checking the current one.
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> ResultEngine<()> {
        if new_password.is_empty() {
            return Err(EngineError::InvalidInput(
                "new password must not be empty".to_string(),
            ));
        }

        let model = require_user(&self.database, user_id).await?;
        if !credentials::verify_password(current_password, &model.password)? {
            return Err(EngineError::InvalidCredentials);
        }

        // Only swap the hash that was verified; a concurrent change wins.
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Password,
                Expr::value(credentials::hash_password(new_password)?),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Password.eq(model.password))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::InvalidCredentials);
        }

        tracing::info!(user_id, "password changed");
        Ok(())
    }

    /// Activate or deactivate the account registered with `email`.
    pub async fn set_user_active(&self, email: &str, active: bool) -> ResultEngine<User> {
        self.set_user_flag(email, UserFlag::Active, active).await
    }

    /// Grant or revoke the ledger entitlement of the account registered with `email`.
    pub async fn set_ledger_access(&self, email: &str, granted: bool) -> ResultEngine<User> {
        self.set_user_flag(email, UserFlag::LedgerAccess, granted)
            .await
    }

    async fn set_user_flag(&self, email: &str, flag: UserFlag, value: bool) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let column = match flag {
            UserFlag::Active => users::Column::IsActive,
            UserFlag::LedgerAccess => users::Column::LedgerAccess,
        };

        let result = users::Entity::update_many()
            .col_expr(column, Expr::value(value))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Email.eq(email.clone()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(email));
        }

        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(email))?;

        tracing::info!(user_id = model.id, ?flag, value, "user flag updated");
        Ok(model.into())
    }
}

/// Load a user or fail with [`EngineError::KeyNotFound`].
pub(super) async fn require_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> ResultEngine<users::Model> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("user {user_id}")))
}
