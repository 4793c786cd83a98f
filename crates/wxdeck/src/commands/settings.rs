//! Settings command handlers.

use std::sync::Arc;

use tabled::Tabled;
use wxdeck_core::Console;
use wxdeck_core::models::Setting;

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Arc<Setting>> for SettingRow {
    fn from(s: &Arc<Setting>) -> Self {
        Self {
            key: s.key.clone(),
            value: s.value.clone(),
            description: s.description.clone().unwrap_or_default(),
        }
    }
}

fn detail(s: &Setting) -> String {
    let mut lines = vec![format!("Key:   {}", s.key), format!("Value: {}", s.value)];
    if let Some(ref d) = s.description {
        lines.push(format!("About: {d}"));
    }
    lines.join("\n")
}

pub async fn handle(
    console: &Console,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    console.navigate("/settings")?;
    let store = console.settings();

    match args.command {
        SettingsCommand::List => {
            store.fetch_settings().await?;
            let out = output::render_list(
                global.format(),
                &store.settings(),
                |s| SettingRow::from(s),
                |s| format!("{}={}", s.key, s.value),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Get { key } => {
            let setting = store.fetch_setting(&key).await?;
            let out = output::render_single(global.format(), &setting, detail, |s| s.value.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Set { key, value } => {
            let setting = store.update_setting(&key, &value).await?;
            console
                .notifications()
                .success(format!("{} set to {}", setting.key, setting.value), None);
            Ok(())
        }
    }
}
