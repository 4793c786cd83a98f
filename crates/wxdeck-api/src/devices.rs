// Device endpoints: `/devices`

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Device, DeviceCreate, DeviceList, DeviceUpdate, Id, Page};

impl ApiClient {
    /// List devices, one page at a time.
    pub async fn list_devices(&self, page: Page) -> Result<DeviceList, Error> {
        self.get_with_params(&["devices", ""], &page.params()).await
    }

    /// Fetch a single device.
    pub async fn get_device(&self, id: Id) -> Result<Device, Error> {
        self.get(&["devices", &id.to_string()]).await
    }

    /// Register a new device.
    pub async fn create_device(&self, device: &DeviceCreate) -> Result<Device, Error> {
        self.post(&["devices", ""], device).await
    }

    /// Partially update a device; unset fields are left untouched.
    pub async fn update_device(&self, id: Id, update: &DeviceUpdate) -> Result<Device, Error> {
        self.put(&["devices", &id.to_string()], update).await
    }

    /// Delete a device. The backend answers 204.
    pub async fn delete_device(&self, id: Id) -> Result<(), Error> {
        self.delete(&["devices", &id.to_string()]).await
    }
}
