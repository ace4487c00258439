//! Initial store contents.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::aggregates::discount::{ApplyTo, CustomerEligibility};
use crate::domain::aggregates::*;
use crate::domain::value_objects::{DiscountCode, DiscountPercent, Money, Quantity};

/// Everything a [`Store`](super::Store) starts from. `Default` is an empty store.
#[derive(Clone, Debug, Default)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
    pub reviews: Vec<Review>,
    /// `(user, product)` wishlist memberships used when a user has no cached list.
    pub wishlist: Vec<(UserId, ProductId)>,
    pub discounts: Vec<Discount>,
    pub discount_usages: Vec<DiscountUsage>,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN) }

#[allow(clippy::too_many_arguments)]
fn product(id: ProductId, name: &str, category_id: CategoryId, price: i64, description: &str, image_url: &str, stock: u32, featured: bool, discount: u8) -> Product {
    Product {
        id, name: name.into(), category_id, price: Money::from_major(price), description: description.into(),
        image_url: image_url.into(), stock: Quantity::new(stock), featured, discount: DiscountPercent::saturating(discount),
    }
}

fn products() -> Vec<Product> {
    vec![
        product(1, "iPhone 15 Pro", 1, 1299, "Apple iPhone 15 Pro with A17 Bionic chip and 256GB storage.",
            "https://www.channelnews.com.au/wp-content/uploads/2023/08/iPhone-14-Pro-Purple-Side-Perspective-Feature-Purple.jpg", 25, true, 10),
        product(2, "Samsung Galaxy S24", 1, 1199, "Samsung Galaxy S24 with 200MP camera and 5000mAh battery.",
            "https://stg-images.samsung.com/is/image/samsung/assets/za/smartphones/galaxy-s24-ultra/images/hotfix4/galaxy-s24-ultra-highlights-color-titanium-gray-back-mo.jpg?imbypass=true", 18, false, 5),
        product(3, "Sony WH-1000XM5 Headphones", 2, 399, "Noise-cancelling over-ear headphones with Bluetooth 5.2.",
            "https://m.media-amazon.com/images/I/61eeHPRFQ9L.jpg_BO30,255,255,255_UF900,850_SR1910,1000,0,C_QL100_.jpg", 40, true, 0),
        product(4, "MacBook Air M3", 3, 1599, "Apple MacBook Air with M3 chip, 16GB RAM, and 512GB SSD.",
            "https://www.loveitcoverit.com/wp-content/uploads/MacBook-Air-M3.webp", 12, true, 8),
        product(5, "Google Pixel 8 Pro", 1, 999, "Google Pixel 8 Pro with advanced AI features and camera.",
            "https://cdn.movertix.com/media/catalog/product/cache/image/1200x/g/o/google-pixel-8-pro-5g-mint-128gb.jpg", 15, false, 12),
        product(6, "Bose QuietComfort 45", 2, 329, "Wireless Bluetooth headphones with noise cancellation.",
            "https://m.media-amazon.com/images/I/6111lUBzI3L.jpg", 30, false, 15),
        product(7, "iPad Pro 12.9\" M2", 4, 1099, "Apple iPad Pro with M2 chip and Liquid Retina XDR display.",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQp3tHgw-RWuz2-6A5k8yYMNl0VvSPnFsng5g&s", 20, true, 5),
        product(8, "Samsung Galaxy Tab S9", 4, 849, "Samsung flagship tablet with S Pen and Dynamic AMOLED 2X display.",
            "https://angkormeas.com/wp-content/uploads/2023/12/Galaxy-Tab-S9-1.jpg", 22, false, 8),
        product(9, "Apple Watch Series 9", 5, 399, "Advanced smartwatch with blood oxygen app and ECG.",
            "https://store.storeimages.cdn-apple.com/1/as-images.apple.com/is/refurb-45-cell-alum-midnight-sport-band-midnight-s9?wid=1144&hei=1144&fmt=jpeg&qlt=90", 35, true, 0),
        product(10, "Samsung Galaxy Watch 6", 5, 299, "Advanced health monitoring with sleep coaching and body composition.",
            "https://images.samsung.com/is/image/samsung/p6pim/africa_en/2307/gallery/africa-en-galaxy-watch6-r945-sm-r940nzkamea-537401503?$684_547_PNG$", 28, false, 10),
        product(11, "Dell XPS 13 Plus", 3, 1299, "Ultra-thin laptop with InfinityEdge touch display and 12th Gen Intel Core.",
            "https://rootitsupport.com/userfiles/plus_9320-4.png", 16, true, 12),
        product(12, "ASUS ROG Zephyrus G14", 3, 1599, "Gaming laptop with AMD Ryzen 9 and NVIDIA GeForce RTX 4060.",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTFd-z7WLBrFGcv-LrwBojPyKCSJDW37-HppY2iiWktmIki8y7-lctVkJKVefXcfxFQJy0&usqp=CAU", 10, false, 15),
        product(13, "AirPods Pro (2nd Gen)", 2, 249, "Wireless earbuds with Active Noise Cancellation and Transparency mode.",
            "https://store.storeimages.cdn-apple.com/4982/as-images.apple.com/is/MQD83?wid=1144&hei=1144&fmt=jpeg&qlt=90&.v=1660803972361", 50, true, 0),
        product(14, "Samsung Galaxy Buds2 Pro", 2, 229, "True wireless earbuds with 360 Audio and intelligent ANC.",
            "https://arystorephone.com/wp-content/uploads/2022/08/galaxy_buds2pro_graphite_1.jpg", 45, false, 8),
        product(15, "PlayStation 5", 6, 499, "Next-gen gaming console with 4K/120fps and ray tracing.",
            "https://gmedia.playstation.com/is/image/SIEPDC/ps5-product-thumbnail-01-en-14sep21", 8, true, 0),
        product(16, "Xbox Series X", 6, 499, "4K gaming console with 120fps and Quick Resume feature.",
            "https://cms-assets.xboxservices.com/assets/f0/8d/f08dfa50-f2ef-4873-bc8f-bcb6c34e48c0.png?n=642227_Hero-Gallery-0_C2_857x676.png", 12, false, 5),
        product(17, "Nintendo Switch OLED", 6, 349, "Hybrid gaming console with vibrant 7-inch OLED screen.",
            "https://m.media-amazon.com/images/I/61nqNujSF2L.jpg", 25, true, 10),
        product(18, "Canon EOS R5", 7, 3899, "Full-frame mirrorless camera with 8K video and 45MP sensor.",
            "https://s7d1.scene7.com/is/image/canon/4147C002_eos-r5-body_primary?fmt=webp-alpha&wid=800", 6, true, 8),
        product(19, "Sony A7 IV", 7, 2499, "Full-frame mirrorless camera with 33MP sensor and 4K 60p video.",
            "https://i5.walmartimages.com/asr/9edaa46d-d2a3-46ad-8741-3f90b8de6f2d.7080c72996c9f3ee71cde59b83bb0d54.jpeg", 14, false, 12),
        product(20, "DJI Mavic 3 Pro", 8, 2199, "Professional drone with triple camera system and 43-minute flight time.",
            "https://www.dronedepot.be/wp-content/uploads/2023/04/DJI-Mavic-3-Pro_front-1_square-min.png", 9, true, 15),
        product(21, "GoPro HERO12 Black", 7, 399, "Action camera with 5.3K video and HyperSmooth 6.0 stabilization.",
            "https://static.gopro.com/assets/blta2b8522e5372af40/blt86b2d5c67d4f1ed5/64d0e286369276296caf7a71/02-pdp-h12b-gallery-1920.png", 32, false, 10),
        product(22, "Kindle Paperwhite", 9, 139, "Waterproof ereader with 6.8\" display and adjustable warm light.",
            "https://placehold.co/600x400?text=Kindle+Paperwhite", 40, true, 0),
        product(23, "Apple TV 4K", 10, 129, "Streaming device with A15 Bionic chip and Dolby Vision.",
            "https://store.storeimages.cdn-apple.com/4982/as-images.apple.com/is/apple-tv-4k-hero-select-202210", 28, false, 5),
        product(24, "Sonos Beam Soundbar", 11, 449, "Compact smart soundbar with Dolby Atmos and voice control.",
            "https://media.sonos.com/images/znqtjj88/production/c79156fe93547d1b0a993dc1fb7b381d8773737a-3000x1834.png?q=75&fit=clip&auto=format", 18, true, 8),
        product(25, "LG OLED C3 TV", 10, 1599, "65\" 4K Smart TV with AI processor and Dolby Vision IQ.",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSxrFFcn9PcXz82nE3TsBidv-ezMDKuyCLbOQ&s", 7, true, 12),
        product(26, "Razer Blade 15", 3, 2499, "Gaming laptop with NVIDIA GeForce RTX 4070 and 240Hz display.",
            "https://m.media-amazon.com/images/I/71kcJxMggRL._AC_SL1500_.jpg", 5, false, 18),
    ]
}

fn categories() -> Vec<Category> {
    ["Smartphones", "Audio", "Laptops", "Tablets", "Wearables", "Gaming", "Cameras", "Drones", "E-readers", "TV & Streaming", "Home Audio"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Category { id, name: name.into() })
        .collect()
}

fn user(id: UserId, name: &str, email: &str, password: &str, role: Role, background: &str) -> User {
    User {
        id, name: name.into(), email: email.into(), password: password.into(), role,
        avatar: format!("https://ui-avatars.com/api/?name={name}&background={background}&color=fff"),
        phone: None, address: None, city: None, country: None, zip_code: None, created_at: date(2024, 1, 1),
    }
}

fn home_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Reaksa".into(), address: "123 Main St".into(), city: "Phnom Penh".into(),
        zip_code: "12000".into(), country: "Cambodia".into(),
    }
}

fn orders() -> Vec<Order> {
    let line = |product_id, price| vec![OrderItem { product_id, quantity: 1, price: Money::from_major(price) }];
    vec![
        Order::from_parts(1, 1, date(2025, 10, 16), line(1, 1299), OrderStatus::Delivered, home_address()),
        Order::from_parts(2, 1, date(2025, 10, 10), line(3, 399), OrderStatus::Processing, home_address()),
    ]
}

fn reviews() -> Vec<Review> {
    let review = |id, product_id, user_id, user_name: &str, rating, title: &str, comment: &str, day| Review {
        id, product_id, user_id, user_name: user_name.into(), rating, title: title.into(), comment: comment.into(),
        recommend: true, date: date(2025, 10, day),
    };
    vec![
        review(1, 1, 1, "Reaksa", 5, "Amazing iPhone", "Excellent phone! Love the camera quality.", 15),
        review(2, 1, 2, "Admin", 4, "Good but not perfect", "Great device but battery could be better.", 14),
        review(3, 3, 1, "Reaksa", 5, "Excellent headphones", "Best noise cancellation I've ever experienced!", 12),
    ]
}

struct DiscountSeed {
    id: DiscountId,
    code: &'static str,
    name: &'static str,
    description: &'static str,
    kind: DiscountKind,
    value: i64,
    minimum_amount: Option<i64>,
    maximum_discount: Option<i64>,
    window: (NaiveDate, NaiveDate),
    usage_limit: Option<u32>,
    used_count: u32,
    is_active: bool,
    created_at: NaiveDate,
}

impl DiscountSeed {
    fn build(self) -> Option<Discount> {
        let code = DiscountCode::new(self.code).ok()?;
        Some(Discount {
            id: self.id, code, name: self.name.into(), description: self.description.into(), kind: self.kind,
            value: Decimal::from(self.value), minimum_amount: self.minimum_amount.map(Money::from_major),
            maximum_discount: self.maximum_discount.map(Money::from_major), start_date: self.window.0,
            end_date: self.window.1, usage_limit: self.usage_limit, used_count: self.used_count,
            is_active: self.is_active, apply_to: ApplyTo::AllProducts, products: vec![], categories: vec![],
            customer_eligibility: CustomerEligibility::AllCustomers, customers: vec![], once_per_customer: false,
            free_shipping: self.kind == DiscountKind::FreeShipping, created_at: self.created_at, created_by: "Admin".into(),
        })
    }
}

fn discounts() -> Vec<Discount> {
    let seeds = [
        DiscountSeed {
            id: 1, code: "WELCOME10", name: "Welcome Discount", description: "10% off for new customers",
            kind: DiscountKind::Percentage, value: 10, minimum_amount: Some(50), maximum_discount: Some(100),
            window: (date(2024, 1, 1), date(2024, 12, 31)), usage_limit: Some(1000), used_count: 245, is_active: true,
            created_at: date(2024, 1, 1),
        },
        DiscountSeed {
            id: 2, code: "SUMMER25", name: "Summer Sale", description: "25% off on all summer products",
            kind: DiscountKind::Percentage, value: 25, minimum_amount: Some(100), maximum_discount: None,
            window: (date(2024, 6, 1), date(2024, 8, 31)), usage_limit: Some(500), used_count: 189, is_active: true,
            created_at: date(2024, 5, 15),
        },
        DiscountSeed {
            id: 3, code: "FREESHIP", name: "Free Shipping", description: "Free shipping on orders over $50",
            kind: DiscountKind::FreeShipping, value: 0, minimum_amount: Some(50), maximum_discount: None,
            window: (date(2024, 1, 1), date(2024, 12, 31)), usage_limit: None, used_count: 567, is_active: true,
            created_at: date(2024, 1, 1),
        },
        DiscountSeed {
            id: 4, code: "SAVE20", name: "Fixed Amount Discount", description: "$20 off your order",
            kind: DiscountKind::FixedAmount, value: 20, minimum_amount: Some(100), maximum_discount: None,
            window: (date(2024, 3, 1), date(2024, 3, 31)), usage_limit: Some(200), used_count: 45, is_active: false,
            created_at: date(2024, 2, 20),
        },
        DiscountSeed {
            id: 5, code: "VIP15", name: "VIP Customer Discount", description: "15% off for VIP customers",
            kind: DiscountKind::Percentage, value: 15, minimum_amount: None, maximum_discount: None,
            window: (date(2024, 2, 1), date(2024, 2, 29)), usage_limit: Some(100), used_count: 78, is_active: false,
            created_at: date(2024, 1, 25),
        },
    ];
    let mut discounts: Vec<Discount> = seeds.into_iter().filter_map(DiscountSeed::build).collect();
    for discount in &mut discounts {
        match discount.id {
            1 => {
                discount.customer_eligibility = CustomerEligibility::NewCustomers;
                discount.once_per_customer = true;
            }
            2 => {
                discount.apply_to = ApplyTo::SpecificCategories;
                discount.categories = vec![1, 2];
            }
            4 => discount.once_per_customer = true,
            5 => {
                discount.customer_eligibility = CustomerEligibility::SpecificCustomers;
                discount.customers = vec![1, 2];
                discount.once_per_customer = true;
            }
            _ => {}
        }
    }
    discounts
}

fn discount_usages() -> Vec<DiscountUsage> {
    vec![
        DiscountUsage {
            id: 1, discount_id: 1, discount_code: "WELCOME10".into(), order_id: 1001, customer_id: 101,
            customer_name: "John Doe".into(), customer_email: "john@example.com".into(),
            discount_amount: Money::from_minor(1599), order_total: Money::from_minor(15999), used_at: date(2024, 1, 15),
        },
        DiscountUsage {
            id: 2, discount_id: 2, discount_code: "SUMMER25".into(), order_id: 1002, customer_id: 102,
            customer_name: "Jane Smith".into(), customer_email: "jane@example.com".into(),
            discount_amount: Money::from_minor(7475), order_total: Money::from_major(299), used_at: date(2024, 6, 5),
        },
    ]
}

impl SeedData {
    /// The demo electronics catalog with two accounts, sample orders,
    /// reviews and promotion codes.
    pub fn demo() -> Self {
        Self {
            products: products(),
            categories: categories(),
            users: vec![
                user(1, "Reaksa", "reaksa@example.com", "password123", Role::Customer, "0D8ABC"),
                user(2, "Admin", "admin@example.com", "admin123", Role::Admin, "DC3545"),
            ],
            orders: orders(),
            reviews: reviews(),
            wishlist: vec![(1, 2), (1, 4)],
            discounts: discounts(),
            discount_usages: discount_usages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_seed_shape() {
        let seed = SeedData::demo();
        assert_eq!(seed.products.len(), 26);
        assert_eq!(seed.categories.len(), 11);
        assert_eq!(seed.categories[9].name, "TV & Streaming");
        assert_eq!(seed.discounts.len(), 5);
        assert!(seed.products.iter().all(|p| seed.categories.iter().any(|c| c.id == p.category_id)));
        assert_eq!(seed.orders[0].total(), Money::from_major(1299));
    }

    #[test]
    fn test_default_seed_is_empty() {
        let seed = SeedData::default();
        assert!(seed.products.is_empty() && seed.users.is_empty());
    }
}
