// ── Neighbor reconciliation ──
//
// For each discovered neighbor: taxonomy, address, role, site, the
// neighbor device itself, both link endpoints, assign-once addressing,
// and finally the cable. The cable invariant is global: at most one
// link per unordered endpoint pair, no matter which side was observed
// as "local" first.

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::facts::{NeighborFacts, OsFamily};
use crate::model::{
    AssignedObject, Cable, CableEnd, CableStatus, CustomFields, Device, DeviceStatus, Interface,
    IpStatus, ObjectId,
};
use crate::store::{NewDevice, NewInterface, NewIpAddress, Store};

use super::interface::media_type_for_name;
use super::site::{normalize_cidr, resolve_site};
use super::taxonomy::{ensure_device_type, ensure_platform, ensure_role};

/// Canonical role for switch-like capability strings. Multi-word
/// capabilities starting with a switch indicator all map here, so role
/// slugs do not fragment into `switch_igmp`, `switch_router`, …
const SWITCH_ROLE: &str = "Switch";

/// Placeholder role for neighbors that advertise no capability string.
/// An empty role name would be rejected by the store on create.
const UNKNOWN_ROLE: &str = "Unknown";

/// Identity fields derived from one neighbor advertisement.
#[derive(Debug)]
struct NeighborIdentity {
    name: String,
    /// Hardware model with the vendor prefix stripped.
    model: String,
    /// Platform family: model minus a leading `WS-`, first `-` token.
    platform: String,
    role_name: String,
    os_family: OsFamily,
    /// First advertised management address, CIDR-normalized.
    mgmt: Option<String>,
}

impl NeighborIdentity {
    fn derive(neighbor: &NeighborFacts) -> Self {
        let model = neighbor
            .platform
            .trim()
            .strip_prefix("cisco ")
            .unwrap_or(neighbor.platform.trim())
            .to_owned();
        let platform = model
            .strip_prefix("WS-")
            .unwrap_or(&model)
            .split('-')
            .next()
            .unwrap_or_default()
            .to_owned();

        let role_name = match neighbor.capabilities.split_whitespace().next() {
            Some(first) if first.eq_ignore_ascii_case("switch") => SWITCH_ROLE.to_owned(),
            Some(_) => neighbor.capabilities.clone(),
            None => UNKNOWN_ROLE.to_owned(),
        };

        Self {
            name: neighbor.device_id.clone(),
            model,
            platform,
            role_name,
            os_family: OsFamily::detect(&neighbor.software_version),
            mgmt: neighbor
                .management_addresses
                .first()
                .map(|a| normalize_cidr(a)),
        }
    }
}

/// Reconcile every discovered neighbor of `device`.
pub async fn reconcile_neighbors<S: Store>(
    store: &S,
    device: &Device,
    neighbors: &[NeighborFacts],
) -> Result<(), Error> {
    for neighbor in neighbors {
        reconcile_neighbor(store, device, neighbor).await?;
    }
    Ok(())
}

async fn reconcile_neighbor<S: Store>(
    store: &S,
    device: &Device,
    neighbor: &NeighborFacts,
) -> Result<(), Error> {
    let identity = NeighborIdentity::derive(neighbor);
    debug!(
        device = device.name,
        neighbor = identity.name,
        local = neighbor.local_interface,
        remote = neighbor.port_id,
        "reconciling neighbor"
    );

    // 1. Taxonomy for the neighbor.
    let platform = ensure_platform(store, &identity.platform).await?;
    let device_type = ensure_device_type(store, &identity.model).await?;

    // 2. Management address record, if one was advertised.
    if let Some(cidr) = &identity.mgmt {
        if store.ip_by_address(cidr).await?.is_none() {
            info!(address = cidr, neighbor = identity.name, "creating neighbor address");
            store
                .create_ip(NewIpAddress {
                    address: cidr.clone(),
                    status: IpStatus::Active,
                    description: format!("Auto-discovered address for {}", identity.name),
                })
                .await?;
        }
    }

    // 3. Role from capabilities (switch-like strings canonicalized).
    let role = ensure_role(store, &identity.role_name).await?;

    // 4–5. Site, then the neighbor device itself.
    let site = resolve_site(store, &identity.name, identity.mgmt.as_deref()).await?;
    let neighbor_device = match store.device_by_name(&identity.name).await? {
        Some(mut existing) => {
            debug!(neighbor = identity.name, "neighbor known, updating");
            existing.device_type = device_type;
            existing.platform = Some(platform);
            existing.role = Some(role);
            existing.site = site;
            store.update_device(&existing).await?;
            existing
        }
        None => {
            info!(neighbor = identity.name, "neighbor unknown, creating");
            store
                .create_device(NewDevice {
                    name: identity.name.clone(),
                    device_type,
                    platform: Some(platform),
                    role: Some(role),
                    serial: String::new(),
                    site,
                    status: DeviceStatus::Active,
                    custom_fields: CustomFields {
                        os: Some(identity.os_family.to_string()),
                    },
                })
                .await?
        }
    };

    // 6–7. Both link endpoints.
    let local = ensure_endpoint(store, device, &neighbor.local_interface).await?;
    let remote = ensure_endpoint(store, &neighbor_device, &neighbor.port_id).await?;

    // 8. Assign-once addressing on the neighbor side.
    if let Some(cidr) = &identity.mgmt {
        assign_management_address(store, &neighbor_device, &remote, cidr, neighbor.native_vlan)
            .await?;
    }

    // 9. The cable between the two endpoints.
    reconcile_cable(store, &local, &remote).await
}

/// Get-or-create a link endpoint interface by `(device, name)`, with
/// media classified from the interface name.
async fn ensure_endpoint<S: Store>(
    store: &S,
    device: &Device,
    name: &str,
) -> Result<Interface, Error> {
    if let Some(existing) = store.interface(device.id, name).await? {
        return Ok(existing);
    }
    let if_type = media_type_for_name(name);
    info!(device = device.name, interface = name, %if_type, "creating link endpoint");
    store
        .create_interface(NewInterface {
            device: device.id,
            name: name.to_owned(),
            if_type,
            enabled: true,
            mtu: None,
            description: String::new(),
        })
        .await
}

/// Bind the neighbor's management address and promote it to primary.
///
/// Assign-once: an address already bound anywhere — including to the
/// VLAN interface itself — is left exactly as it is. When a native VLAN
/// is advertised the address belongs on the `Vlan<id>` virtual
/// interface, not the physical port.
async fn assign_management_address<S: Store>(
    store: &S,
    neighbor_device: &Device,
    remote: &Interface,
    cidr: &str,
    native_vlan: Option<u16>,
) -> Result<(), Error> {
    let Some(mut ip) = store.ip_by_address(cidr).await? else {
        return Err(Error::store(format!("address {cidr} vanished mid-pass")));
    };

    if let Some(bound) = &ip.assigned_object {
        if bound.object_id != remote.id {
            warn!(
                address = cidr,
                object_type = bound.object_type,
                object_id = %bound.object_id,
                "address already assigned elsewhere, leaving untouched"
            );
        }
        return Ok(());
    }

    let target = match native_vlan {
        Some(vid) => {
            let svi_name = format!("Vlan{vid}");
            info!(
                neighbor = neighbor_device.name,
                interface = svi_name,
                "binding management address to native-VLAN interface"
            );
            ensure_endpoint(store, neighbor_device, &svi_name).await?
        }
        None => remote.clone(),
    };

    info!(
        address = cidr,
        neighbor = neighbor_device.name,
        interface = target.name,
        "assigning management address"
    );
    ip.assigned_object = Some(AssignedObject::interface(target.id));
    store.update_ip(&ip).await?;

    if let Some(mut fresh) = store.device_by_name(&neighbor_device.name).await? {
        info!(neighbor = fresh.name, address = cidr, "setting primary address");
        fresh.primary_ip4 = Some(ip.id);
        store.update_device(&fresh).await?;
    }
    Ok(())
}

/// Enforce the one-cable-per-unordered-pair invariant.
///
/// No cable between the pair: first look for a stale link still hanging
/// off either endpoint and repair it in place rather than duplicate it;
/// only then create. A store conflict (e.g. media type cannot terminate
/// a cable) is logged with guidance and does not abort the device pass.
async fn reconcile_cable<S: Store>(
    store: &S,
    local: &Interface,
    remote: &Interface,
) -> Result<(), Error> {
    if let Some(existing) = store.cable_between(local.id, remote.id).await? {
        debug!(cable = %existing.id, "link already present");
        return Ok(());
    }

    let stale = match first_cable_at(store, remote.id).await? {
        Some(cable) => Some(cable),
        None => first_cable_at(store, local.id).await?,
    };

    if let Some(mut cable) = stale {
        warn!(
            cable = %cable.id,
            local = local.name,
            remote = remote.name,
            "endpoint moved, repairing existing link in place"
        );
        cable.a_terminations = vec![CableEnd::interface(local.id)];
        cable.b_terminations = vec![CableEnd::interface(remote.id)];
        return store.update_cable(&cable).await;
    }

    info!(local = local.name, remote = remote.name, "creating link");
    match store
        .create_cable(local.id, remote.id, CableStatus::Connected)
        .await
    {
        Ok(_) => Ok(()),
        Err(err) if err.is_conflict() => {
            warn!(
                local = local.name,
                remote = remote.name,
                error = %err,
                "store refused the link; fix the endpoint media types and re-run"
            );
            Ok(())
        }
        Err(err) => Err(err),
    }
}

async fn first_cable_at<S: Store>(store: &S, iface: ObjectId) -> Result<Option<Cable>, Error> {
    Ok(store.cables_terminating_at(iface).await?.into_iter().next())
}
