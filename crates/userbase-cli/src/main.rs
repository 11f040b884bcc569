//! userbase - admin CLI for the flat-file credential store
//!
//! Each subcommand maps 1:1 to a store operation. Domain failures (unknown
//! user, duplicate user, wrong password) print a diagnostic to stdout and
//! exit non-zero; storage faults go to stderr.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;

use userbase_core::{Role, StoreError, UserStore};

/// userbase - user management for the flat-file credential store
#[derive(Parser, Debug)]
#[command(name = "userbase")]
#[command(version)]
#[command(about = "Manage users in the userbase credential store")]
struct Args {
    /// Path to the user document (defaults to the platform data directory)
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all registered users
    List,
    /// Register a new user
    Add {
        username: String,
        password: String,
        /// Role for the new user
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Delete a user
    Delete { username: String },
    /// Change a user's password
    Passwd {
        username: String,
        old_password: String,
        new_password: String,
    },
    /// Show details for a user
    Info { username: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<bool, Box<dyn Error>> {
    let path = match args.file {
        Some(path) => path,
        None => default_store_path()?,
    };
    let store = UserStore::open(path)?;

    match args.command {
        Command::List => Ok(list(&store)),
        Command::Add {
            username,
            password,
            role,
        } => add(&store, &username, &password, role),
        Command::Delete { username } => delete(&store, &username),
        Command::Passwd {
            username,
            old_password,
            new_password,
        } => passwd(&store, &username, &old_password, &new_password),
        Command::Info { username } => Ok(info(&store, &username)),
    }
}

/// Per-platform data directory for the user document
fn default_store_path() -> Result<PathBuf, StoreError> {
    ProjectDirs::from("dev", "userbase", "userbase")
        .map(|dirs| dirs.data_dir().join("users.json"))
        .ok_or_else(|| StoreError::StorageError("could not determine data directory".to_string()))
}

fn list(store: &UserStore) -> bool {
    let users = store.list_users();
    if users.is_empty() {
        println!("No users registered.");
        return true;
    }

    println!("\nRegistered users:");
    println!("{}", "-".repeat(40));
    for username in &users {
        let role = store
            .get_user_data(username)
            .map(|record| record.role)
            .unwrap_or_default();
        println!("- {username} (role: {role})");
    }
    println!("{}", "-".repeat(40));
    println!("Total: {} user(s)", users.len());
    true
}

fn add(store: &UserStore, username: &str, password: &str, role: Role) -> Result<bool, Box<dyn Error>> {
    if store.register_user(username, password, role)? {
        println!("User '{username}' created with role '{role}'.");
        Ok(true)
    } else {
        println!("ERROR: user '{username}' already exists.");
        Ok(false)
    }
}

fn delete(store: &UserStore, username: &str) -> Result<bool, Box<dyn Error>> {
    if store.delete_user(username)? {
        println!("User '{username}' deleted.");
        Ok(true)
    } else {
        println!("ERROR: user '{username}' does not exist.");
        Ok(false)
    }
}

fn passwd(
    store: &UserStore,
    username: &str,
    old_password: &str,
    new_password: &str,
) -> Result<bool, Box<dyn Error>> {
    if store.change_password(username, old_password, new_password)? {
        println!("Password updated for user '{username}'.");
        Ok(true)
    } else {
        // One diagnostic for both unknown user and wrong password
        println!("ERROR: could not update password. Check that the user exists and the current password is correct.");
        Ok(false)
    }
}

fn info(store: &UserStore, username: &str) -> bool {
    let Some(record) = store.get_user_data(username) else {
        println!("ERROR: user '{username}' does not exist.");
        return false;
    };

    println!("\nUser: {username}");
    println!("{}", "-".repeat(40));
    println!("Role: {}", record.role);
    if let Some(created) = Local.timestamp_opt(record.created_at as i64, 0).single() {
        println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(settings) = &record.settings {
        if !settings.is_empty() {
            let keys: Vec<&str> = settings.keys().map(String::as_str).collect();
            println!("Settings: {}", keys.join(", "));
        }
    }
    println!("{}", "-".repeat(40));
    true
}
