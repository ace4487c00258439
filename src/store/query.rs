//! Shop listing: filtering, sorting and paging over the catalog with
//! derived ratings.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::Store;
use crate::domain::aggregates::*;
use crate::domain::value_objects::{Money, Page, PageRequest};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability { #[default] Any, InStock, OutOfStock }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "percent")]
pub enum DiscountLevel {
    #[default]
    Any,
    /// Only products sold at list price.
    None,
    AtLeast(u8),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub max_price: Option<Money>,
    pub brands: Vec<String>,
    pub min_rating: Option<f64>,
    pub availability: Availability,
    pub discount: DiscountLevel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
    Rating,
    ReviewCount,
    Discount,
}

/// A product together with the figures a listing card shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub discounted_price: Money,
    pub rating: f64,
    pub review_count: usize,
    pub brand: String,
}

impl ProductListing {
    /// The brand is the first word of the product name.
    pub fn brand_of(name: &str) -> &str { name.split_whitespace().next().unwrap_or_default() }
}

impl ProductFilter {
    fn matches(&self, listing: &ProductListing) -> bool {
        let product = &listing.product;
        if let Some(term) = self.search.as_deref().map(str::to_lowercase).filter(|t| !t.is_empty()) {
            let hit = product.name.to_lowercase().contains(&term)
                || product.description.to_lowercase().contains(&term)
                || listing.brand.to_lowercase().contains(&term);
            if !hit { return false; }
        }
        if self.category_id.is_some_and(|c| c != product.category_id) { return false; }
        if self.max_price.is_some_and(|max| product.price > max) { return false; }
        if !self.brands.is_empty() && !self.brands.iter().any(|b| b.eq_ignore_ascii_case(&listing.brand)) { return false; }
        if self.min_rating.is_some_and(|min| listing.rating < min) { return false; }
        let availability = match self.availability {
            Availability::Any => true,
            Availability::InStock => product.is_in_stock(),
            Availability::OutOfStock => !product.is_in_stock(),
        };
        let discount = match self.discount {
            DiscountLevel::Any => true,
            DiscountLevel::None => !product.is_discounted(),
            DiscountLevel::AtLeast(pct) => product.discount.value() >= pct,
        };
        availability && discount
    }
}

impl ProductSort {
    fn compare(self, a: &ProductListing, b: &ProductListing) -> Ordering {
        match self {
            ProductSort::Name => a.product.name.to_lowercase().cmp(&b.product.name.to_lowercase()),
            ProductSort::PriceLow => a.product.price.cmp(&b.product.price),
            ProductSort::PriceHigh => b.product.price.cmp(&a.product.price),
            ProductSort::Rating => b.rating.total_cmp(&a.rating),
            ProductSort::ReviewCount => b.review_count.cmp(&a.review_count),
            ProductSort::Discount => b.product.discount.cmp(&a.product.discount),
        }
    }
}

impl Store {
    pub fn listing(&self, product: &Product) -> ProductListing {
        let reviews: Vec<&Review> = self.reviews.iter().filter(|r| r.product_id == product.id).collect();
        ProductListing {
            discounted_price: product.discounted_price(),
            rating: average_rating(reviews.iter().copied()),
            review_count: reviews.len(),
            brand: ProductListing::brand_of(&product.name).to_string(),
            product: product.clone(),
        }
    }

    /// Filters, sorts (stable, so ties keep catalog order) and pages the catalog.
    pub fn browse(&self, filter: &ProductFilter, sort: ProductSort, page: PageRequest) -> Page<ProductListing> {
        let mut listings: Vec<ProductListing> = self.products.iter()
            .map(|p| self.listing(p))
            .filter(|l| filter.matches(l))
            .collect();
        listings.sort_by(|a, b| sort.compare(a, b));
        Page::paginate(listings, page)
    }

    /// Distinct brands in catalog order.
    pub fn brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = Vec::new();
        for product in &self.products {
            let brand = ProductListing::brand_of(&product.name);
            if !brand.is_empty() && !brands.iter().any(|b| b == brand) { brands.push(brand.to_string()); }
        }
        brands
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn ids(page: &Page<ProductListing>) -> Vec<ProductId> { page.items.iter().map(|l| l.product.id).collect() }

    #[test]
    fn test_default_browse_sorts_by_name_and_pages() {
        let store = demo_store();
        let page = store.browse(&ProductFilter::default(), ProductSort::Name, PageRequest::default());
        assert_eq!(page.total, 26);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 12);
        assert_eq!(page.items[0].product.name, "AirPods Pro (2nd Gen)");
    }

    #[test]
    fn test_filter_by_category_and_price() {
        let store = demo_store();
        let filter = ProductFilter { category_id: Some(3), max_price: Some(Money::from_major(1600)), ..Default::default() };
        let page = store.browse(&filter, ProductSort::PriceLow, PageRequest::default());
        assert_eq!(ids(&page), vec![11, 4, 12]);
    }

    #[test]
    fn test_filter_by_rating_uses_reviews() {
        let store = demo_store();
        let filter = ProductFilter { min_rating: Some(4.5), ..Default::default() };
        let page = store.browse(&filter, ProductSort::Rating, PageRequest::default());
        assert_eq!(ids(&page), vec![3, 1]);
        assert_eq!(page.items[1].rating, 4.5);
        assert_eq!(page.items[1].review_count, 2);
    }

    #[test]
    fn test_filter_by_discount_and_brand() {
        let store = demo_store();
        let filter = ProductFilter { discount: DiscountLevel::AtLeast(15), ..Default::default() };
        let page = store.browse(&filter, ProductSort::Discount, PageRequest::default());
        assert_eq!(page.items[0].product.id, 26);
        assert!(page.items.iter().all(|l| l.product.discount.value() >= 15));

        let filter = ProductFilter { brands: vec!["apple".into()], discount: DiscountLevel::None, ..Default::default() };
        let page = store.browse(&filter, ProductSort::Name, PageRequest::default());
        assert_eq!(ids(&page), vec![9]);
    }

    #[test]
    fn test_availability_filter() {
        let mut store = admin_store();
        store.update_product(15, ProductPatch { stock: Some(0.into()), ..Default::default() }).unwrap();
        let filter = ProductFilter { availability: Availability::OutOfStock, ..Default::default() };
        assert_eq!(ids(&store.browse(&filter, ProductSort::Name, PageRequest::default())), vec![15]);
    }

    #[test]
    fn test_out_of_range_page_clamps() {
        let store = demo_store();
        let page = store.browse(&ProductFilter::default(), ProductSort::Name, PageRequest::new(9, 24));
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_brands_are_distinct() {
        let brands = demo_store().brands();
        assert_eq!(brands.iter().filter(|b| b.as_str() == "Samsung").count(), 1);
        assert!(brands.contains(&"Razer".to_string()));
    }
}
