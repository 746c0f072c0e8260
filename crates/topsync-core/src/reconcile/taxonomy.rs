// ── Taxonomy resolution ──
//
// Get-or-create for the classification entities other records reference.
// Lookup-then-create is not atomic against concurrent writers; the store
// seam documents that race and the passes stay idempotent regardless.

use tracing::info;

use crate::error::Error;
use crate::model::ObjectId;
use crate::store::Store;

/// Fixed role color palette (lowercase hex, no `#`).
const ROLE_COLORS: [&str; 16] = [
    "ff6f61", // light coral
    "ffb07c", // peach
    "ffd700", // gold
    "ffef96", // pale yellow
    "beeb9f", // light green
    "a7d8ad", // seafoam green
    "77d8d8", // light blue
    "aec6cf", // light grayish blue
    "b39eb5", // lavender
    "d7b9d5", // light lilac
    "ffc3a0", // light salmon
    "ffabab", // light pink
    "ffc3a0", // light salmon
    "ff677d", // light red
    "ffd3b5", // light apricot
    "ffd3b5", // light apricot
];

/// Normalize an identity to the store's slug form: lowercase, spaces
/// became underscores.
pub fn slugify(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Deterministic palette color for a role slug (FNV-1a over the slug).
/// Same slug, same color, no cross-call state.
pub fn role_color(slug: &str) -> &'static str {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in slug.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    let modulus = u64::try_from(ROLE_COLORS.len()).unwrap_or(1);
    let index = usize::try_from(hash % modulus).unwrap_or(0);
    ROLE_COLORS[index]
}

/// Get-or-create a platform by name. Returns its id.
pub async fn ensure_platform<S: Store>(store: &S, name: &str) -> Result<ObjectId, Error> {
    let slug = slugify(name);
    if let Some(platform) = store.platform_by_slug(&slug).await? {
        return Ok(platform.id);
    }
    info!(platform = name, slug, "creating platform");
    Ok(store.create_platform(name, &slug).await?.id)
}

/// Get-or-create a hardware type by model. Returns its id.
pub async fn ensure_device_type<S: Store>(store: &S, model: &str) -> Result<ObjectId, Error> {
    let slug = slugify(model);
    if let Some(device_type) = store.device_type_by_slug(&slug).await? {
        return Ok(device_type.id);
    }
    info!(model, slug, "creating device type");
    Ok(store.create_device_type(model, &slug).await?.id)
}

/// Get-or-create a role by name, with a palette color derived from the
/// slug on creation. Returns its id.
pub async fn ensure_role<S: Store>(store: &S, name: &str) -> Result<ObjectId, Error> {
    let slug = slugify(name);
    if let Some(role) = store.role_by_slug(&slug).await? {
        return Ok(role.id);
    }
    let color = role_color(&slug);
    info!(role = name, slug, color, "creating device role");
    Ok(store.create_role(name, &slug, color).await?.id)
}

/// Get-or-create a site by name. Returns its id.
pub async fn ensure_site<S: Store>(store: &S, name: &str) -> Result<ObjectId, Error> {
    let slug = slugify(name);
    if let Some(site) = store.site_by_slug(&slug).await? {
        return Ok(site.id);
    }
    info!(site = name, slug, "creating site");
    Ok(store.create_site(name, &slug).await?.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn slugify_lowercases_and_underscores() {
        assert_eq!(slugify("Switch IGMP"), "switch_igmp");
        assert_eq!(slugify("WS-C3750G-24TS"), "ws-c3750g-24ts");
    }

    #[test]
    fn role_color_is_deterministic_and_in_palette() {
        let first = role_color("switch");
        let second = role_color("switch");
        assert_eq!(first, second);
        assert!(ROLE_COLORS.contains(&first));
    }

    #[tokio::test]
    async fn ensure_platform_creates_once() {
        let store = MemoryStore::new();
        let a = ensure_platform(&store, "c3750").await.unwrap();
        let b = ensure_platform(&store, "c3750").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn ensure_role_reuses_existing_slug() {
        let store = MemoryStore::new();
        let a = ensure_role(&store, "Switch").await.unwrap();
        let b = ensure_role(&store, "switch").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.roles().unwrap().len(), 1);
    }
}
