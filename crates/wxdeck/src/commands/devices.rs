//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;
use wxdeck_core::Console;
use wxdeck_core::models::{
    ApiKey, Device, DeviceCreate, DeviceFunction, DeviceStatus, DeviceType, DeviceUpdate, Page,
};

use crate::cli::{
    DeviceFunctionArg, DeviceStatusArg, DeviceTypeArg, DevicesArgs, DevicesCommand, GlobalOpts,
    OutputFormat,
};
use crate::error::CliError;
use crate::output;

use super::{api_keys, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Function")]
    function: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&Arc<Device>> for DeviceRow {
    fn from(d: &Arc<Device>) -> Self {
        Self {
            id: d.id,
            dtype: d.device_type.to_string(),
            location: d.location.clone(),
            function: output::opt(d.function),
            status: d.status.to_string(),
            last_seen: output::opt(d.last_seen.map(output::timestamp)),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!("ID:        {}", d.id),
        format!("Type:      {}", d.device_type),
        format!("Location:  {}", d.location),
        format!("Function:  {}", output::opt(d.function)),
        format!("Status:    {}", d.status),
        format!("Last seen: {}", output::opt(d.last_seen.map(output::timestamp))),
        format!("Created:   {}", output::timestamp(d.created_at)),
        format!("Updated:   {}", output::timestamp(d.updated_at)),
    ]
    .join("\n")
}

// ── Arg conversion ──────────────────────────────────────────────────

impl From<DeviceTypeArg> for DeviceType {
    fn from(arg: DeviceTypeArg) -> Self {
        match arg {
            DeviceTypeArg::Esp32 => Self::Esp32,
            DeviceTypeArg::Esp8266 => Self::Esp8266,
            DeviceTypeArg::Esp32S3 => Self::Esp32S3,
        }
    }
}

impl From<DeviceFunctionArg> for DeviceFunction {
    fn from(arg: DeviceFunctionArg) -> Self {
        match arg {
            DeviceFunctionArg::Sensor => Self::Sensor,
            DeviceFunctionArg::Display => Self::Display,
        }
    }
}

impl From<DeviceStatusArg> for DeviceStatus {
    fn from(arg: DeviceStatusArg) -> Self {
        match arg {
            DeviceStatusArg::Online => Self::Online,
            DeviceStatusArg::Offline => Self::Offline,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    console: &Console,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List(list) => {
            console.navigate("/devices")?;
            let store = console.devices();
            store.fetch_devices(Page::new(list.skip, list.limit)).await?;

            let devices = store.devices();
            let out = output::render_list(
                global.format(),
                &devices,
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if !global.quiet && global.format() == OutputFormat::Table {
                eprintln!("{} of {} devices", devices.len(), store.total());
            }
            Ok(())
        }

        DevicesCommand::Get { id } => {
            console.navigate(&format!("/devices/{id}"))?;
            let device = console.device_detail().fetch_device(id).await?;
            let out = output::render_single(global.format(), &device, detail, |d| d.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Create {
            device_type,
            location,
            function,
            status,
        } => {
            console.navigate("/devices")?;
            let request = DeviceCreate {
                device_type: device_type.into(),
                location,
                function: function.map(Into::into),
                status: status.map(Into::into),
            };
            let device = console.devices().create_device(&request).await?;
            console
                .notifications()
                .success(format!("Device {} created", device.id), None);
            let out = output::render_single(global.format(), &device, detail, |d| d.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Update {
            id,
            device_type,
            location,
            function,
            status,
        } => {
            console.navigate(&format!("/devices/{id}"))?;
            let update = DeviceUpdate {
                device_type: device_type.map(Into::into),
                location,
                function: function.map(Into::into),
                status: status.map(Into::into),
            };
            if update == DeviceUpdate::default() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --type, --location, --function or --status"
                        .into(),
                });
            }
            let device = console.device_detail().update_device(id, &update).await?;
            console
                .notifications()
                .success(format!("Device {id} updated"), None);
            let out = output::render_single(global.format(), &device, detail, |d| d.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            console.navigate("/devices")?;
            if !util::confirm(
                &format!("Delete device {id} and its readings?"),
                global.yes,
            )? {
                return Ok(());
            }
            console.devices().delete_device(id).await?;
            console
                .notifications()
                .success(format!("Device {id} deleted"), None);
            Ok(())
        }

        DevicesCommand::Keys { id } => {
            console.navigate(&format!("/devices/{id}"))?;
            let detail_store = console.device_detail();
            detail_store.fetch_api_keys(id).await?;
            let keys: Vec<Arc<ApiKey>> = detail_store.api_keys();
            api_keys::print_keys(&keys, global)
        }

        DevicesCommand::AddKey { id, name } => {
            console.navigate(&format!("/devices/{id}"))?;
            let issued = console.device_detail().generate_api_key(id, &name).await?;
            console.notifications().warning(
                format!("API key {} created", issued.key.id),
                Some("Copy the key now, it will not be shown again".into()),
            );
            api_keys::print_issued(&issued, global)
        }
    }
}
