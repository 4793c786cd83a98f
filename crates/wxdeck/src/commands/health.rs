//! Backend health check. Needs no session.

use wxdeck_core::{Console, CoreError};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let health = console.api().health().await.map_err(CoreError::from)?;
    let out = output::render_single(
        global.format(),
        &health,
        |h| format!("Status:   {}\nDatabase: {}", h.status, h.database),
        |h| h.status.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
