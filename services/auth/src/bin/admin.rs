//! Account administration for back-office operators.
//!
//! ```bash
//! auth-admin create-account --username alice --password 's3cret-pass' --phone 13800138000
//! auth-admin disable-account --username alice
//! auth-admin enable-account --username alice
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sea_orm::Database;

use campus_auth::infra::db::DbAccountStore;
use campus_auth::usecase::account::{
    ProvisionAccountInput, ProvisionAccountUseCase, SetAccountStatusUseCase,
};
use campus_core::tracing::init_tracing;
use campus_domain::account::{AccountStatus, AdminRole};

#[derive(Parser)]
#[command(about = "Manage back-office administrator accounts")]
struct Args {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an active account
    CreateAccount {
        #[arg(long)]
        username: String,
        /// Initial password (at least 8 characters)
        #[arg(long, env = "AUTH_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        /// SMS destination for one-time login codes
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, value_enum, default_value_t = RoleArg::Admin)]
        role: RoleArg,
    },
    /// Block an account from signing in; its open sessions stop resolving
    DisableAccount {
        #[arg(long)]
        username: String,
    },
    /// Re-enable a disabled account
    EnableAccount {
        #[arg(long)]
        username: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    SuperAdmin,
}

impl From<RoleArg> for AdminRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => AdminRole::Admin,
            RoleArg::SuperAdmin => AdminRole::SuperAdmin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let db = Database::connect(&args.database_url).await?;
    let accounts = DbAccountStore { db };

    match args.command {
        Command::CreateAccount {
            username,
            password,
            phone,
            role,
        } => {
            let account = ProvisionAccountUseCase { accounts }
                .execute(ProvisionAccountInput {
                    username,
                    password,
                    phone,
                    role: role.into(),
                })
                .await?;
            println!("created {} ({})", account.username, account.id);
        }
        Command::DisableAccount { username } => {
            set_status(accounts, &username, AccountStatus::Disabled).await?;
        }
        Command::EnableAccount { username } => {
            set_status(accounts, &username, AccountStatus::Active).await?;
        }
    }
    Ok(())
}

async fn set_status(accounts: DbAccountStore, username: &str, status: AccountStatus) -> Result<()> {
    let account = SetAccountStatusUseCase { accounts }
        .execute(username, status)
        .await?;
    println!("{} is now {:?}", account.username, account.status);
    Ok(())
}
