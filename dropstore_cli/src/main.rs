mod cli;
pub mod errors;
mod handlers;
mod ui;

use crate::cli::{Cli, Command, TenantArgs};
use crate::errors::CliError;
use clap::Parser;
use dropstore::{Store, TenantConfig};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable; `RUST_LOG` overrides the level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    // 不需要打开存储的命令
    if let Command::HashPassword { password } = &cli.command {
        println!("{}", TenantConfig::hash_password(password));
        return Ok(());
    }

    let store = Store::open(load_config(&cli.tenant)?)?;

    match cli.command {
        Command::Upload { file, paste, stdin, link, name, extension, move_source, json } => {
            let content = handlers::upload::UploadContent::from_args(file, paste, stdin, link)?;
            handlers::upload::handle_upload(&store, content, name, extension, move_source, json)
        }
        Command::List { page, glob, regex, extensions, images, since, until, max_size, json } => {
            let options = handlers::list::ListOptions { page, glob, regex, extensions, images, since, until, max_size };
            handlers::list::handle_list(&store, &options, json)
        }
        Command::Show { token } => handlers::manage::handle_show(&store, &token),
        Command::Rename { token, new_name } => handlers::manage::handle_rename(&store, &token, &new_name),
        Command::Edit { token, paste, stdin, from } => {
            handlers::manage::handle_edit(&store, &token, paste, stdin, from)
        }
        Command::Delete { token, password } => {
            handlers::manage::handle_delete(&store, &token, password.as_deref())
        }
        Command::HashPassword { .. } => Ok(()),
    }
}

fn load_config(tenant: &TenantArgs) -> Result<TenantConfig, CliError> {
    match (&tenant.config, &tenant.root) {
        (Some(path), _) => Ok(TenantConfig::from_file(path)?),
        (None, Some(root)) => Ok(TenantConfig {
            image_path: root.clone(),
            ..TenantConfig::default()
        }),
        (None, None) => Err(CliError::Config(dropstore::ConfigError::MissingStorageRoot)),
    }
}
