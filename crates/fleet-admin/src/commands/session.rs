//! `session` subcommands

use anyhow::Result;
use fleet_access::domain::{Session, SessionUser};
use fleet_shared::utils::mask_email;

use crate::cli::SessionCommand;
use crate::context::AppContext;

pub fn run(ctx: &AppContext, command: SessionCommand) -> Result<String> {
    match command {
        SessionCommand::Login {
            id,
            name,
            role,
            email,
            token,
        } => {
            let user = SessionUser::new(id, name, role, email);
            let message = format!("Signed in as {} ({})", user.name, user.role);
            ctx.session.save(&Session { user, token })?;
            Ok(message)
        }
        SessionCommand::Logout => {
            ctx.session.clear()?;
            Ok("Signed out".to_string())
        }
        SessionCommand::Whoami => Ok(match ctx.session.user() {
            Some(user) => format!("{} <{}> role={}", user.name, mask_email(&user.email), user.role),
            None => "Not signed in".to_string(),
        }),
    }
}
