//! Catalog queries and admin product management.

use validator::Validate;

use super::{next_id, Store};
use crate::domain::aggregates::*;
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::domain::value_objects::Money;
use crate::{Result, StoreError};

impl Store {
    pub fn products(&self) -> &[Product] { &self.products }

    pub fn featured_products(&self) -> Vec<&Product> { self.products.iter().filter(|p| p.featured).collect() }

    pub fn discounted_products(&self) -> Vec<&Product> { self.products.iter().filter(|p| p.is_discounted()).collect() }

    pub fn product_by_id(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn products_by_category(&self, category_id: CategoryId) -> Vec<&Product> {
        self.products.iter().filter(|p| p.category_id == category_id).collect()
    }

    /// Case-insensitive substring match on name or description.
    pub fn search_products(&self, query: &str) -> Vec<&Product> {
        let query = query.to_lowercase();
        self.products.iter()
            .filter(|p| p.name.to_lowercase().contains(&query) || p.description.to_lowercase().contains(&query))
            .collect()
    }

    pub fn discounted_price(&self, product: &Product) -> Money { product.discounted_price() }

    pub fn add_product(&mut self, draft: ProductDraft) -> Result<ProductId> {
        draft.validate()?;
        self.require_category(draft.category_id)?;
        let id = next_id(&self.products, |p| p.id);
        self.products.push(Product::from_draft(id, draft));
        self.raise_event(DomainEvent::Product(ProductEvent::Created { product_id: id }));
        tracing::info!(product_id = id, "Product created");
        Ok(id)
    }

    /// Merges the present fields of `patch` into the product.
    pub fn update_product(&mut self, product_id: ProductId, patch: ProductPatch) -> Result<&Product> {
        patch.validate()?;
        if let Some(category_id) = patch.category_id { self.require_category(category_id)?; }
        let index = self.product_index(product_id)?;
        self.products[index].apply(patch);
        self.raise_event(DomainEvent::Product(ProductEvent::Updated { product_id }));
        tracing::info!(product_id, "Product updated");
        Ok(&self.products[index])
    }

    /// Removes a product from the catalog. Orders and cart lines keep their
    /// own snapshot.
    pub fn delete_product(&mut self, product_id: ProductId) -> Result<()> {
        let index = self.product_index(product_id)?;
        self.products.remove(index);
        self.raise_event(DomainEvent::Product(ProductEvent::Deleted { product_id }));
        tracing::info!(product_id, "Product deleted");
        Ok(())
    }

    pub fn categories(&self) -> &[Category] { &self.categories }

    pub fn category_by_id(&self, category_id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub(super) fn product_index(&self, product_id: ProductId) -> Result<usize> {
        self.products.iter().position(|p| p.id == product_id).ok_or(StoreError::ProductNotFound(product_id))
    }

    fn require_category(&self, category_id: CategoryId) -> Result<()> {
        self.category_by_id(category_id).map(|_| ()).ok_or(StoreError::CategoryNotFound(category_id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::value_objects::{DiscountPercent, Quantity};

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Pixel Buds Pro".into(), category_id: 2, price: Money::from_major(199),
            description: "Wireless earbuds with active noise cancellation.".into(),
            image_url: "https://example.com/buds.png".into(), stock: Quantity::new(12), featured: false,
            discount: DiscountPercent::NONE,
        }
    }

    #[test]
    fn test_catalog_queries() {
        let store = demo_store();
        assert_eq!(store.product_by_id(1).map(|p| p.name.as_str()), Some("iPhone 15 Pro"));
        assert!(store.product_by_id(999).is_none());
        assert_eq!(store.products_by_category(6).len(), 3);
        assert!(store.featured_products().iter().all(|p| p.featured));
        assert!(store.discounted_products().iter().all(|p| p.discount.value() > 0));
        assert_eq!(store.category_by_id(11).map(|c| c.name.as_str()), Some("Home Audio"));
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_description() {
        let store = demo_store();
        let by_name: Vec<_> = store.search_products("IPHONE").iter().map(|p| p.id).collect();
        assert_eq!(by_name, vec![1]);
        assert!(store.search_products("dolby").iter().any(|p| p.id == 24));
        assert_eq!(store.search_products("").len(), store.products().len());
    }

    #[test]
    fn test_discounted_price_never_exceeds_list_price() {
        let store = demo_store();
        for product in store.products() {
            let discounted = store.discounted_price(product);
            assert!(discounted <= product.price);
            assert_eq!(discounted == product.price, product.discount.is_zero());
        }
    }

    #[test]
    fn test_add_product_assigns_next_id_and_raises_event() {
        let mut store = admin_store();
        let id = store.add_product(draft()).unwrap();
        assert_eq!(id, 27);
        assert_eq!(store.take_events(), vec![DomainEvent::Product(ProductEvent::Created { product_id: 27 })]);
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_add_product_rejects_unknown_category_and_invalid_draft() {
        let mut store = admin_store();
        let mut bad = draft();
        bad.category_id = 99;
        assert!(matches!(store.add_product(bad), Err(StoreError::CategoryNotFound(99))));
        let mut bad = draft();
        bad.name = "X".into();
        assert!(matches!(store.add_product(bad), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_update_product_merges_patch() {
        let mut store = admin_store();
        let patch = ProductPatch { price: Some(Money::from_major(1199)), ..Default::default() };
        let updated = store.update_product(1, patch).unwrap();
        assert_eq!(updated.price, Money::from_major(1199));
        assert_eq!(updated.name, "iPhone 15 Pro");
        assert!(matches!(store.update_product(404, ProductPatch::default()), Err(StoreError::ProductNotFound(404))));
    }

    #[test]
    fn test_delete_product() {
        let mut store = admin_store();
        store.delete_product(26).unwrap();
        assert!(store.product_by_id(26).is_none());
        assert!(matches!(store.delete_product(26), Err(StoreError::ProductNotFound(26))));
    }
}
