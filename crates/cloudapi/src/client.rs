use crate::{
    DataCenter, Error, SnapshotRecord, SnapshotRequest, VirtualDisk, VirtualMachine, wire,
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use tracing::debug;

/// Operations the snapshot lifecycle needs from the cloud provider.
#[async_trait]
pub trait CloudApi: Send + Sync {
    async fn data_centers(&self) -> Result<Vec<DataCenter>, Error>;

    async fn virtual_machines(
        &self,
        data_center: &DataCenter,
    ) -> Result<Vec<VirtualMachine>, Error>;

    async fn virtual_disks(
        &self,
        data_center: &DataCenter,
        vm: &VirtualMachine,
    ) -> Result<Vec<VirtualDisk>, Error>;

    async fn snapshots(&self) -> Result<Vec<SnapshotRecord>, Error>;

    /// Ask for a snapshot of `disk`. Returns the id of the snapshot, which
    /// is usually still being created when this returns.
    async fn create_snapshot(
        &self,
        data_center: &DataCenter,
        disk: &VirtualDisk,
        request: &SnapshotRequest,
    ) -> Result<String, Error>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), Error>;
}

/// [`CloudApi`] over the provider's REST interface with basic auth.
#[derive(Debug, Clone)]
pub struct HttpCloudApi {
    client: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl HttpCloudApi {
    pub fn new(api: &config::Api) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(api.timeout).build()?;
        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_owned(),
            user: api.user.clone(),
            password: api.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, Error> {
        let response = request
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        check_status(status, body)
    }

    async fn get(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path);
        debug!(%url, "GET");
        self.send(self.client.get(url)).await
    }
}

fn check_status(status: StatusCode, body: String) -> Result<String, Error> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[async_trait]
impl CloudApi for HttpCloudApi {
    async fn data_centers(&self) -> Result<Vec<DataCenter>, Error> {
        wire::data_centers(&self.get("datacenters?depth=2").await?)
    }

    async fn virtual_machines(
        &self,
        data_center: &DataCenter,
    ) -> Result<Vec<VirtualMachine>, Error> {
        let path = format!("datacenters/{}/servers?depth=2", data_center.id);
        wire::virtual_machines(&self.get(&path).await?)
    }

    async fn virtual_disks(
        &self,
        data_center: &DataCenter,
        vm: &VirtualMachine,
    ) -> Result<Vec<VirtualDisk>, Error> {
        let path = format!(
            "datacenters/{}/servers/{}/volumes?depth=1",
            data_center.id, vm.id
        );
        wire::virtual_disks(&self.get(&path).await?, &vm.id)
    }

    async fn snapshots(&self) -> Result<Vec<SnapshotRecord>, Error> {
        wire::snapshots(&self.get("snapshots?depth=1").await?)
    }

    async fn create_snapshot(
        &self,
        data_center: &DataCenter,
        disk: &VirtualDisk,
        request: &SnapshotRequest,
    ) -> Result<String, Error> {
        let url = self.url(&format!(
            "datacenters/{}/volumes/{}/create-snapshot",
            data_center.id, disk.id
        ));
        debug!(%url, name = %request.name, "POST create-snapshot");
        let form = [
            ("name", request.name.as_str()),
            ("description", request.description.as_str()),
        ];
        let body = self.send(self.client.post(url).form(&form)).await?;
        wire::created_snapshot_id(&body)
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), Error> {
        let url = self.url(&format!("snapshots/{snapshot_id}"));
        debug!(%url, "DELETE");
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}
