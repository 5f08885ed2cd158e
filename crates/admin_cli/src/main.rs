use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError, Registration};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod prompt;

#[derive(Parser, Debug)]
#[command(name = "pnl_admin")]
#[command(about = "Admin utilities for the PNL ledger (bootstrap and manage accounts)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./pnl.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create an account, prompting for its password.
    Create(UserCreateArgs),
    /// Allow the account to log in again.
    Activate(UserEmail),
    /// Block every login of the account.
    Deactivate(UserEmail),
    /// Grant access to the ledger.
    Grant(UserEmail),
    /// Revoke access to the ledger.
    Revoke(UserEmail),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    organization: String,
    #[arg(long)]
    whatsapp: Option<String>,
}

#[derive(Args, Debug)]
struct UserEmail {
    #[arg(long)]
    email: String,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn describe(user: &engine::User) -> String {
    format!(
        "{} <{}> (id {}, active: {}, ledger access: {})",
        user.name, user.email, user.id, user.is_active, user.ledger_access
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    let Command::User(User { command }) = cli.command;
    let result = match command {
        UserCommand::Create(args) => {
            let password = prompt::new_password(&args.email)?;
            engine
                .register(Registration {
                    organization: args.organization,
                    name: args.name,
                    email: args.email,
                    whatsapp: args.whatsapp,
                    password,
                })
                .await
                .map(|user| format!("created user: {}", describe(&user)))
        }
        UserCommand::Activate(UserEmail { email }) => engine
            .set_user_active(&email, true)
            .await
            .map(|user| format!("activated: {}", describe(&user))),
        UserCommand::Deactivate(UserEmail { email }) => engine
            .set_user_active(&email, false)
            .await
            .map(|user| format!("deactivated: {}", describe(&user))),
        UserCommand::Grant(UserEmail { email }) => engine
            .set_ledger_access(&email, true)
            .await
            .map(|user| format!("granted ledger access: {}", describe(&user))),
        UserCommand::Revoke(UserEmail { email }) => engine
            .set_ledger_access(&email, false)
            .await
            .map(|user| format!("revoked ledger access: {}", describe(&user))),
    };

    match result {
        Ok(line) => println!("{line}"),
        Err(err @ (EngineError::ExistingKey(_) | EngineError::InvalidInput(_))) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err @ EngineError::KeyNotFound(_)) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
