//! Command dispatch: bridges CLI args -> console stores -> output formatting.
//!
//! Every handler first navigates the console to the route that owns the
//! resource, so the route guard decides access before any request is sent.

pub mod api_keys;
pub mod auth;
pub mod config_cmd;
pub mod devices;
pub mod health;
pub mod readings;
pub mod settings;
pub mod users;
pub mod util;

use wxdeck_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::config::ActiveProfile;
use crate::error::CliError;
use crate::output;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    active: &ActiveProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(console, active, args, global).await,
        Command::Logout => {
            auth::logout(console);
            Ok(())
        }
        Command::Whoami { remote } => auth::whoami(console, remote, global).await,
        Command::Devices(args) => devices::handle(console, args, global).await,
        Command::ApiKeys(args) => api_keys::handle(console, args, global).await,
        Command::Users(args) => users::handle(console, args, global).await,
        Command::Settings(args) => settings::handle(console, args, global).await,
        Command::Readings(args) => readings::handle(console, args, global).await,
        Command::Health => health::handle(console, global).await,
        // Config and Completions never reach a console
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Print and drop the toasts raised during the command.
pub fn flush_toasts(console: &Console, global: &GlobalOpts) {
    let toasts = console.notifications().snapshot();
    if toasts.is_empty() {
        return;
    }
    let color = output::should_color(global.color.unwrap_or_default());
    output::print_toasts(&toasts, color, global.quiet);
    console.notifications().clear_all();
}
