// ── Site resolution ──
//
// Ordering is the invariant here: an already-assigned site always wins,
// then the subnet's site, then the fixed default. Site assignment is
// sticky once a device exists — a manually corrected site is never
// regressed by rediscovery.

use std::net::Ipv4Addr;

use tracing::{debug, info};

use crate::error::Error;
use crate::model::ObjectId;
use crate::store::Store;

use super::taxonomy::ensure_site;

pub const DEFAULT_SITE_NAME: &str = "Unknown";

/// Prefix length assumed for bare management addresses.
pub const DEFAULT_PREFIX_LEN: u8 = 24;

/// Normalize an observed address to CIDR form, applying the default
/// prefix length when the advertisement carried none.
pub fn normalize_cidr(address: &str) -> String {
    if address.contains('/') {
        address.to_owned()
    } else {
        format!("{address}/{DEFAULT_PREFIX_LEN}")
    }
}

/// The /24 subnet containing the given address, as a CIDR string.
/// Returns `None` for anything that does not parse as IPv4.
pub fn containing_prefix(address: &str) -> Option<String> {
    let bare = address.split('/').next()?;
    let ip: Ipv4Addr = bare.parse().ok()?;
    let [a, b, c, _] = ip.octets();
    Some(format!("{a}.{b}.{c}.0/{DEFAULT_PREFIX_LEN}"))
}

/// Resolve the owning site for `device_name`.
///
/// 1. An existing device's current site is authoritative.
/// 2. Else the site of the subnet containing `address`, if known.
/// 3. Else the default site, auto-created on first use.
pub async fn resolve_site<S: Store>(
    store: &S,
    device_name: &str,
    address: Option<&str>,
) -> Result<ObjectId, Error> {
    if let Some(existing) = store.device_by_name(device_name).await? {
        debug!(
            device = device_name,
            site = %existing.site,
            "device already placed, keeping its site"
        );
        return Ok(existing.site);
    }

    if let Some(prefix_str) = address.and_then(containing_prefix) {
        if let Some(prefix) = store.prefix_by_cidr(&prefix_str).await? {
            if let Some(site) = prefix.site {
                info!(prefix = prefix_str, site = %site, "site derived from prefix");
                return Ok(site);
            }
            debug!(prefix = prefix_str, "prefix has no site, using default");
        } else {
            debug!(prefix = prefix_str, "prefix not in store, using default");
        }
    }

    ensure_site(store, DEFAULT_SITE_NAME).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{CustomFields, DeviceStatus};
    use crate::store::memory::MemoryStore;
    use crate::store::NewDevice;

    #[test]
    fn containing_prefix_masks_to_slash_24() {
        assert_eq!(
            containing_prefix("10.1.2.34/24").as_deref(),
            Some("10.1.2.0/24")
        );
        assert_eq!(
            containing_prefix("192.168.0.1").as_deref(),
            Some("192.168.0.0/24")
        );
        assert_eq!(containing_prefix("not-an-ip"), None);
    }

    #[test]
    fn normalize_cidr_applies_default_length() {
        assert_eq!(normalize_cidr("10.0.0.2"), "10.0.0.2/24");
        assert_eq!(normalize_cidr("10.0.0.2/30"), "10.0.0.2/30");
    }

    #[tokio::test]
    async fn prefix_site_wins_for_new_devices() {
        let store = MemoryStore::new();
        let site = store.create_site("Berlin", "berlin").await.unwrap();
        store.seed_prefix("10.1.2.0/24", Some(site.id)).unwrap();

        let resolved = resolve_site(&store, "new-switch", Some("10.1.2.5/24"))
            .await
            .unwrap();
        assert_eq!(resolved, site.id);
    }

    #[tokio::test]
    async fn unknown_prefix_falls_back_to_default_site() {
        let store = MemoryStore::new();
        let resolved = resolve_site(&store, "new-switch", Some("10.9.9.1/24"))
            .await
            .unwrap();
        let default = store.site_by_slug("unknown").await.unwrap().unwrap();
        assert_eq!(resolved, default.id);
    }

    #[tokio::test]
    async fn existing_device_site_is_sticky() {
        let store = MemoryStore::new();
        let berlin = store.create_site("Berlin", "berlin").await.unwrap();
        let hamburg = store.create_site("Hamburg", "hamburg").await.unwrap();
        store.seed_prefix("10.1.2.0/24", Some(hamburg.id)).unwrap();
        store
            .create_device(NewDevice {
                name: "SW1".into(),
                device_type: ObjectId(99),
                platform: None,
                role: None,
                serial: String::new(),
                site: berlin.id,
                status: DeviceStatus::Active,
                custom_fields: CustomFields::default(),
            })
            .await
            .unwrap();

        // Facts now imply Hamburg via the prefix, but SW1 is already
        // placed in Berlin.
        let resolved = resolve_site(&store, "SW1", Some("10.1.2.5/24")).await.unwrap();
        assert_eq!(resolved, berlin.id);
    }
}
