// ── Cable garbage collection ──

use tracing::info;

use crate::error::Error;
use crate::store::Store;

/// Delete every stored cable with an empty termination list on either
/// end — leftovers of interrupted operations. Returns the number of
/// cables removed.
pub async fn remove_loose_cables<S: Store>(store: &S) -> Result<usize, Error> {
    let mut removed = 0;
    for cable in store.all_cables().await? {
        if cable.is_loose() {
            info!(cable = %cable.id, "removing cable with loose terminations");
            store.delete_cable(cable.id).await?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Cable, CableEnd, CableStatus, ObjectId};
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn removes_only_half_terminated_cables() {
        let store = MemoryStore::new();
        let intact = store
            .create_cable(ObjectId(1), ObjectId(2), CableStatus::Connected)
            .await
            .unwrap();

        // Simulate a record left half-connected by a prior partial
        // operation.
        let loose = store
            .create_cable(ObjectId(3), ObjectId(4), CableStatus::Connected)
            .await
            .unwrap();
        let broken = Cable {
            a_terminations: vec![CableEnd::interface(ObjectId(3))],
            b_terminations: Vec::new(),
            ..loose
        };
        store.update_cable(&broken).await.unwrap();

        let removed = remove_loose_cables(&store).await.unwrap();
        assert_eq!(removed, 1);

        let remaining = store.cables().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, intact.id);
    }

    #[tokio::test]
    async fn clean_store_is_untouched() {
        let store = MemoryStore::new();
        store
            .create_cable(ObjectId(1), ObjectId(2), CableStatus::Connected)
            .await
            .unwrap();
        assert_eq!(remove_loose_cables(&store).await.unwrap(), 0);
        assert_eq!(store.cables().unwrap().len(), 1);
    }
}
