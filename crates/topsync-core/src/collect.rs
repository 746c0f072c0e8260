// ── Fact collection seam ──

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;
use crate::facts::DeviceFacts;

/// Produces a [`DeviceFacts`] snapshot for a named device.
///
/// Implementations must raise [`Error::Connectivity`] when the device is
/// unreachable or rejects credentials, and [`Error::UnsupportedCommand`]
/// when a required query is not available on the platform. Optional
/// queries (stack membership, hardware report) degrade to `None` fields
/// instead of failing.
#[allow(async_fn_in_trait)]
pub trait Collector {
    async fn collect(&self, device: &str) -> Result<DeviceFacts, Error>;
}

/// Reads per-device fact snapshots from a directory of JSON files
/// (`<dir>/<device>.json`), the export format of the collection tooling.
///
/// A missing file is reported as a connectivity failure: the device was
/// configured for sync but no facts could be obtained for it.
pub struct FileCollector {
    dir: PathBuf,
}

impl FileCollector {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, device: &str) -> PathBuf {
        self.dir.join(format!("{device}.json"))
    }
}

impl Collector for FileCollector {
    async fn collect(&self, device: &str) -> Result<DeviceFacts, Error> {
        let path = self.path_for(device);
        debug!(device, path = %path.display(), "loading fact snapshot");

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| Error::connectivity(device, format!("{}: {e}", path.display())))?;

        parse_facts(device, &raw, &path)
    }
}

fn parse_facts(device: &str, raw: &str, path: &Path) -> Result<DeviceFacts, Error> {
    serde_json::from_str(raw).map_err(|e| Error::Facts {
        device: device.to_owned(),
        message: format!("{}: {e}", path.display()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_a_connectivity_error() {
        let dir = tempfile::tempdir().unwrap();
        let collector = FileCollector::new(dir.path());

        let err = collector.collect("ghost").await.unwrap_err();
        assert!(matches!(err, Error::Connectivity { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn malformed_facts_are_reported_per_device() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sw1.json"), "{ not json").unwrap();
        let collector = FileCollector::new(dir.path());

        let err = collector.collect("sw1").await.unwrap_err();
        assert!(matches!(err, Error::Facts { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn minimal_snapshot_parses() {
        let dir = tempfile::tempdir().unwrap();
        let raw = serde_json::json!({
            "version": {
                "hostname": "SW1",
                "os": "IOS",
                "version": "12.2(55)SE",
                "chassis_sn": "FDO1234",
                "platform": "c3750",
                "chassis": "WS-C3750G-24TS"
            }
        });
        std::fs::write(dir.path().join("SW1.json"), raw.to_string()).unwrap();

        let facts = FileCollector::new(dir.path()).collect("SW1").await.unwrap();
        assert_eq!(facts.version.hostname, "SW1");
        assert!(facts.vlans.is_empty());
        assert!(!facts.is_stacked());
    }
}
