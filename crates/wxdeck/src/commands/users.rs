//! User command handlers.

use std::sync::Arc;

use tabled::Tabled;
use wxdeck_core::Console;
use wxdeck_core::models::{Page, User, UserCreate, UserRole, UserUpdate};

use crate::cli::{GlobalOpts, RoleArg, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Arc<User>> for UserRow {
    fn from(u: &Arc<User>) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.full_name.clone().unwrap_or_default(),
            role: u.role.to_string(),
            active: if u.is_active { "yes" } else { "no" }.into(),
        }
    }
}

fn detail(u: &User) -> String {
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

impl From<RoleArg> for UserRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Self::Admin,
            RoleArg::User => Self::User,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    console.navigate("/users")?;
    let store = console.users();

    match args.command {
        UsersCommand::List(list) => {
            store.fetch_users(Page::new(list.skip, list.limit)).await?;
            let out = output::render_list(
                global.format(),
                &store.users(),
                |u| UserRow::from(u),
                |u| u.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = store.fetch_user(id).await?;
            let out = output::render_single(global.format(), &user, detail, |u| u.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            email,
            full_name,
            role,
            password,
        } => {
            let password = util::password_or_prompt(password, "Password for the new user: ")?;
            let user = store
                .create_user(&UserCreate {
                    email,
                    password,
                    full_name,
                    role: role.map(Into::into),
                })
                .await?;
            console
                .notifications()
                .success(format!("User {} created", user.email), None);
            let out = output::render_single(global.format(), &user, detail, |u| u.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            email,
            full_name,
            role,
            active,
            reset_password,
        } => {
            let password = if reset_password {
                Some(util::password_or_prompt(None, "New password: ")?)
            } else {
                None
            };
            let update = UserUpdate {
                email,
                full_name,
                password,
                role: role.map(Into::into),
                is_active: active,
            };
            let user = store.update_user(id, &update).await?;
            console
                .notifications()
                .success(format!("User {} updated", user.email), None);
            let out = output::render_single(global.format(), &user, detail, |u| u.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if console.current_user().is_some_and(|me| me.id == id) {
                console.notifications().warning(
                    "Deleting your own account",
                    Some("The current session stops working once it is gone".into()),
                );
            }
            if !util::confirm(&format!("Delete user {id}?"), global.yes)? {
                return Ok(());
            }
            store.delete_user(id).await?;
            console
                .notifications()
                .success(format!("User {id} deleted"), None);
            Ok(())
        }
    }
}
