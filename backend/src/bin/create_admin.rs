//! Provision an administrator account in the configured database.
//!
//! The password is read from `TRAVEL_ADMIN_PASSWORD` so it never appears in
//! shell history or process listings.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

use travel_backend::domain::ports::UserRegistration;
use travel_backend::domain::{
    EmailAddress, NewPassword, PersonName, UserProfile, UserService, Username,
};
use travel_backend::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use travel_backend::outbound::security::{Argon2PasswordHasher, HashCost};
use travel_backend::settings::AppSettings;

const PASSWORD_VAR: &str = "TRAVEL_ADMIN_PASSWORD";

/// `create-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-admin",
    about = "Create an administrator account; the password comes from TRAVEL_ADMIN_PASSWORD",
    version
)]
struct CliArgs {
    #[arg(long, value_name = "name")]
    username: String,
    #[arg(long, value_name = "address")]
    email: String,
    #[arg(long = "first-name", value_name = "name", default_value = "")]
    first_name: String,
    #[arg(long = "last-name", value_name = "name", default_value = "")]
    last_name: String,
}

fn invalid_input(error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error.to_string())
}

fn registration(args: CliArgs, password: &str) -> io::Result<UserRegistration> {
    Ok(UserRegistration {
        profile: UserProfile {
            username: Username::new(args.username).map_err(invalid_input)?,
            email: EmailAddress::new(args.email).map_err(invalid_input)?,
            name: PersonName::new(args.first_name, args.last_name).map_err(invalid_input)?,
        },
        password: NewPassword::confirm(password, password).map_err(invalid_input)?,
    })
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let password = Zeroizing::new(
        env::var(PASSWORD_VAR)
            .map_err(|_| invalid_input(format!("{PASSWORD_VAR} must be set")))?,
    );
    let registration = registration(args, &password)?;

    // Settings come from the environment and config file only; the CLI flags
    // above belong to this tool.
    let settings = AppSettings::load_from_iter([OsString::from("create-admin")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let database_url = settings
        .database_url()
        .ok_or_else(|| invalid_input("TRAVEL_DATABASE_URL must be set"))?
        .to_owned();

    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let hasher = Argon2PasswordHasher::new(HashCost::default())
        .map_err(|error| io::Error::other(format!("password hasher: {error}")))?;

    let service = UserService::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(hasher),
        Arc::new(DefaultClock),
    );
    let admin = service
        .provision_admin(registration)
        .await
        .map_err(|error| io::Error::other(format!("create administrator: {error}")))?;

    println!("created administrator {} ({})", admin.username(), admin.id());
    Ok(())
}
