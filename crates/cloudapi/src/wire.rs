//! JSON shapes of the cloud API and their conversion into records.

use crate::{DataCenter, Error, SnapshotRecord, VirtualDisk, VirtualMachine};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Resource<P> {
    id: String,
    #[serde(default)]
    metadata: Metadata,
    properties: P,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Metadata {
    created_date: Option<DateTime<Utc>>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotProperties {
    name: Option<String>,
    description: Option<String>,
    size: Option<f64>,
}

fn items<P: for<'de> Deserialize<'de>>(body: &str) -> Result<Vec<Resource<P>>, Error> {
    Ok(serde_json::from_str::<Collection<Resource<P>>>(body)?.items)
}

pub(crate) fn data_centers(body: &str) -> Result<Vec<DataCenter>, Error> {
    Ok(items::<Named>(body)?
        .into_iter()
        .map(|r| DataCenter {
            name: r.properties.name.unwrap_or_default(),
            id: r.id,
        })
        .collect())
}

pub(crate) fn virtual_machines(body: &str) -> Result<Vec<VirtualMachine>, Error> {
    Ok(items::<Named>(body)?
        .into_iter()
        .map(|r| VirtualMachine {
            name: r.properties.name.unwrap_or_default(),
            id: r.id,
        })
        .collect())
}

pub(crate) fn virtual_disks(body: &str, owner_vm_id: &str) -> Result<Vec<VirtualDisk>, Error> {
    Ok(items::<Named>(body)?
        .into_iter()
        .map(|r| VirtualDisk {
            name: r.properties.name.unwrap_or_default(),
            id: r.id,
            owner_vm_id: owner_vm_id.to_owned(),
        })
        .collect())
}

fn snapshot(resource: Resource<SnapshotProperties>) -> Result<SnapshotRecord, Error> {
    let created_at = resource
        .metadata
        .created_date
        .ok_or_else(|| Error::MissingField {
            resource: "snapshot",
            id: resource.id.clone(),
            field: "createdDate",
        })?;
    let size_gb = resource.properties.size.unwrap_or_default().max(0.0).ceil() as u64;
    Ok(SnapshotRecord::new(
        resource.id,
        resource.properties.name.unwrap_or_default(),
        resource.properties.description.unwrap_or_default(),
        created_at,
        size_gb,
        resource.metadata.state.unwrap_or_default(),
    ))
}

/// Snapshots of a listing. A record that cannot be read is skipped with a
/// warning so the rest of the listing stays usable.
pub(crate) fn snapshots(body: &str) -> Result<Vec<SnapshotRecord>, Error> {
    Ok(items::<SnapshotProperties>(body)?
        .into_iter()
        .filter_map(|resource| match snapshot(resource) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%err, "skipping unreadable snapshot record");
                None
            }
        })
        .collect())
}

/// Id of the snapshot announced by a `create-snapshot` answer.
pub(crate) fn created_snapshot_id(body: &str) -> Result<String, Error> {
    #[derive(Deserialize)]
    struct Created {
        id: String,
    }
    Ok(serde_json::from_str::<Created>(body)?.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const SNAPSHOTS: &str = r#"{
        "id": "snapshots",
        "type": "collection",
        "items": [
            {
                "id": "7df81087-5835-41c6-a10b-3e098593bba4",
                "type": "snapshot",
                "metadata": {
                    "createdDate": "2026-10-12T02:15:31Z",
                    "createdBy": "backup@example.com",
                    "state": "AVAILABLE"
                },
                "properties": {
                    "name": "web01_root_KW2026-42",
                    "description": "Auto-Script: Frankfurt-->web01-->root",
                    "location": "de/fra",
                    "size": 19.5
                }
            },
            {
                "id": "b9d3f2c0-1111-4a4a-9c9c-000000000002",
                "type": "snapshot",
                "metadata": {
                    "createdDate": "2026-09-01T08:00:00Z",
                    "state": "BUSY"
                },
                "properties": {
                    "name": "db01 before upgrade",
                    "description": null,
                    "size": 50
                }
            }
        ]
    }"#;

    #[test]
    fn decodes_snapshot_collection() {
        let snapshots = snapshots(SNAPSHOTS).unwrap();
        assert_eq!(snapshots.len(), 2);

        let auto = &snapshots[0];
        assert_eq!(auto.id, "7df81087-5835-41c6-a10b-3e098593bba4");
        assert_eq!(auto.name, "web01_root_KW2026-42");
        assert_eq!(
            auto.created_at,
            Utc.with_ymd_and_hms(2026, 10, 12, 2, 15, 31).unwrap()
        );
        assert_eq!(auto.size_gb, 20);
        assert_eq!(auto.state, "AVAILABLE");
        assert!(auto.auto_script_created);

        let manual = &snapshots[1];
        assert_eq!(manual.description, "");
        assert_eq!(manual.state, "BUSY");
        assert!(!manual.auto_script_created);
    }

    #[test]
    fn snapshot_without_creation_date_is_skipped() {
        let body = r#"{"items":[
            {"id":"bad","metadata":{"state":"BUSY"},"properties":{"name":"x"}},
            {"id":"good","metadata":{"createdDate":"2026-10-12T02:15:31Z","state":"AVAILABLE"},
             "properties":{"name":"web01_root_KW2026-42","size":10}}
        ]}"#;
        let snapshots = snapshots(body).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].id, "good");

        let bad = items::<SnapshotProperties>(body).unwrap().remove(0);
        assert!(matches!(
            snapshot(bad),
            Err(Error::MissingField { field: "createdDate", .. })
        ));
    }

    #[test]
    fn decodes_named_resources() {
        let body = r#"{"items":[
            {"id":"dc-1","properties":{"name":"Frankfurt","location":"de/fra"}},
            {"id":"dc-2","properties":{"name":"Berlin"}}
        ]}"#;
        let dcs = data_centers(body).unwrap();
        assert_eq!(
            dcs,
            vec![
                DataCenter { id: "dc-1".into(), name: "Frankfurt".into() },
                DataCenter { id: "dc-2".into(), name: "Berlin".into() },
            ]
        );

        let disks = virtual_disks(r#"{"items":[{"id":"v1","properties":{"name":"root"}}]}"#, "vm-1").unwrap();
        assert_eq!(disks[0].owner_vm_id, "vm-1");
        assert_eq!(disks[0].name, "root");
    }

    #[test]
    fn empty_collection_has_no_items() {
        assert!(virtual_machines(r#"{"id":"servers","type":"collection"}"#).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(snapshots("<html>maintenance</html>"), Err(Error::Decode(_))));
        assert_eq!(
            created_snapshot_id(r#"{"id":"new-1","metadata":{"state":"BUSY"}}"#).unwrap(),
            "new-1"
        );
    }
}
