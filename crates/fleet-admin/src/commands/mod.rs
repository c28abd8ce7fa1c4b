//! Command handlers. Each returns the text to print on stdout.

mod access;
mod export;
mod fetch;
mod session;

use anyhow::Result;

use crate::cli::Command;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, command: Command) -> Result<String> {
    match command {
        Command::Access(command) => access::run(ctx, command),
        Command::Export { input, export } => export::run_file(ctx, &input, &export),
        Command::Fetch {
            resource,
            enveloped,
            export,
        } => fetch::run(ctx, resource, enveloped, &export).await,
        Command::Session(command) => session::run(ctx, command),
    }
}
