//! Login, logout and whoami.

use dialoguer::Input;
use wxdeck_core::{AuthUser, Console, CoreError};
use wxdeck_core::models::User;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::ActiveProfile;
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(u: &AuthUser) -> String {
    [
        format!("ID:    {}", u.id),
        format!("Email: {}", u.email),
        format!("Name:  {}", u.full_name.as_deref().unwrap_or("-")),
        format!("Role:  {}", u.role),
    ]
    .join("\n")
}

fn account_detail(u: &User) -> String {
    [
        format!("ID:      {}", u.id),
        format!("Email:   {}", u.email),
        format!("Name:    {}", u.full_name.as_deref().unwrap_or("-")),
        format!("Role:    {}", u.role),
        format!("Active:  {}", u.is_active),
        format!("Created: {}", output::timestamp(u.created_at)),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    console: &Console,
    active: &ActiveProfile,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let loc = console.navigate("/login")?;
    if !loc.is_login() {
        let who = console
            .current_user()
            .map_or_else(String::new, |u| format!(" as {}", u.email));
        console.notifications().info(
            format!("Already logged in{who}"),
            Some("Run `wxdeck logout` to switch accounts".into()),
        );
        return Ok(());
    }

    let email = match args.email.or_else(|| active.profile.email.clone()) {
        Some(e) => e,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = util::password_or_prompt(args.password, "Password: ")?;

    let user = console.auth().login(&email, &password).await?;
    console
        .notifications()
        .success(format!("Logged in as {}", user.email), None);

    let out = output::render_single(global.format(), &user, user_detail, |u| u.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn logout(console: &Console) {
    if console.logout() {
        console.notifications().success("Logged out", None);
    } else {
        console.notifications().info("Not logged in", None);
    }
}

pub async fn whoami(console: &Console, remote: bool, global: &GlobalOpts) -> Result<(), CliError> {
    console.navigate("/")?;

    if remote {
        let me = console
            .api()
            .get_current_user()
            .await
            .map_err(CoreError::from)?;
        let out = output::render_single(global.format(), &me, account_detail, |u| u.email.clone())?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let user = console.current_user().ok_or_else(|| CliError::NotLoggedIn {
        redirect: "/".into(),
    })?;
    let out = output::render_single(global.format(), &user, user_detail, |u| u.email.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
