//! Per-user wishlist, published on a watch channel and cached per user id.

use tokio::sync::watch;

use super::Store;
use crate::domain::aggregates::*;
use crate::storage::{self, wishlist_key};

impl Store {
    /// Saves a product for the signed-in user. Ignored when signed out or
    /// when the product is already saved.
    pub fn add_to_wishlist(&mut self, product_id: ProductId) {
        let Some(user_id) = self.current_user else { return };
        let added = self.wishlist.send_if_modified(|ids| {
            if ids.contains(&product_id) { return false; }
            ids.push(product_id);
            true
        });
        if added {
            self.persist_wishlist(user_id);
            tracing::debug!(user_id, product_id, "Added to wishlist");
        }
    }

    pub fn remove_from_wishlist(&mut self, product_id: ProductId) {
        let removed = self.wishlist.send_if_modified(|ids| {
            let before = ids.len();
            ids.retain(|id| *id != product_id);
            ids.len() != before
        });
        if let (true, Some(user_id)) = (removed, self.current_user) { self.persist_wishlist(user_id); }
    }

    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool { self.wishlist.borrow().contains(&product_id) }

    /// Saved product ids in the order they were added.
    pub fn wishlist(&self) -> Vec<ProductId> { self.wishlist.borrow().clone() }

    /// Saved products still present in the catalog.
    pub fn wishlist_products(&self) -> Vec<&Product> {
        self.wishlist.borrow().iter().filter_map(|id| self.product_by_id(*id)).collect()
    }

    /// Stream of the wishlist; the receiver starts at the current contents.
    pub fn subscribe_wishlist(&self) -> watch::Receiver<Vec<ProductId>> { self.wishlist.subscribe() }

    fn persist_wishlist(&self, user_id: UserId) {
        storage::save_json(self.storage(), &wishlist_key(user_id), &*self.wishlist.borrow());
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::storage::{MemoryStorage, wishlist_key};
    use crate::store::Store;
    use std::sync::Arc;

    #[test]
    fn test_add_is_idempotent() {
        let mut store = customer_store();
        store.add_to_wishlist(9);
        store.add_to_wishlist(9);
        assert_eq!(store.wishlist(), vec![2, 4, 9]);
        assert!(store.is_in_wishlist(9));
    }

    #[test]
    fn test_add_ignored_when_signed_out() {
        let mut store = demo_store();
        store.add_to_wishlist(9);
        assert!(store.wishlist().is_empty());
    }

    #[test]
    fn test_remove_publishes_to_subscribers() {
        let mut store = customer_store();
        let mut rx = store.subscribe_wishlist();
        store.remove_from_wishlist(2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), vec![4]);
        store.remove_from_wishlist(2);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_wishlist_persists_per_user() {
        let storage = Arc::new(MemoryStorage::default());
        let mut store = Store::with_demo_data(storage.clone());
        assert!(store.login("reaksa@example.com", "password123"));
        store.add_to_wishlist(13);
        store.logout();
        assert!(store.wishlist().is_empty());

        assert!(store.login("admin@example.com", "admin123"));
        assert!(store.wishlist().is_empty());
        store.logout();

        let mut fresh = Store::with_demo_data(storage.clone());
        assert!(fresh.login("reaksa@example.com", "password123"));
        assert_eq!(fresh.wishlist(), vec![2, 4, 13]);
        assert!(crate::storage::try_load_json::<Vec<u64>>(&*storage, &wishlist_key(2)).is_none());
    }

    #[test]
    fn test_wishlist_products_skips_deleted() {
        let mut store = customer_store();
        store.delete_product(4).unwrap();
        let ids: Vec<u64> = store.wishlist_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
