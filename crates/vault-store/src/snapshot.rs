//! JSON snapshot persistence.
//!
//! The snapshot is written to a temp file and renamed into place, so a
//! crash mid-write never truncates the previous snapshot. Load of a
//! missing file yields an empty store.

use std::path::Path;

use crate::{Result, Store};

impl Store {
    /// Load a store from a snapshot file, or start empty if it does not
    /// exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(?path, "no snapshot found, starting empty");
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&content)?;
        tracing::info!(
            users = store.users.len(),
            products = store.products.len(),
            "snapshot loaded"
        );
        Ok(store)
    }

    /// Write the snapshot. Atomic via temp-file-then-rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{test_product, test_user};
    use crate::Store;

    #[test]
    fn test_missing_file_yields_empty_store() {
        let dir = std::env::temp_dir().join("vault-snapshot-missing");
        let store = Store::load(&dir.join("nope.json")).expect("load");
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join("vault-snapshot-roundtrip");
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("vault.json");

        let mut store = Store::new();
        store
            .insert_user(test_user("u1", "alice", Some(7)))
            .expect("insert user");
        store
            .insert_product(test_product("p1", "u1", 250))
            .expect("insert product");
        store.push_favorite("u1", "p1");
        store.save(&path).expect("save");

        let reloaded = Store::load(&path).expect("reload");
        assert_eq!(reloaded.user_count(), 1);
        assert_eq!(reloaded.product_count(), 1);
        assert!(reloaded.has_favorite("u1", "p1"));
    }
}
