use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dto::{Category, Product};

fn featured_products() -> [Product; 2] {
    [
        Product {
            id: 1,
            name: "Wireless Mouse".to_string(),
            category: Category::Electronics,
        },
        Product {
            id: 2,
            name: "Gaming Keyboard".to_string(),
            category: Category::Electronics,
        },
    ]
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Generates `count` products with categories seeded from the wall clock.
pub fn generate_products(count: usize) -> Vec<Product> {
    generate_products_seeded(count, clock_seed())
}

pub fn generate_products_seeded(count: usize, seed: u64) -> Vec<Product> {
    log::debug!("Generator seed: {}", seed);
    generate_products_with_rng(count, &mut StdRng::seed_from_u64(seed))
}

/// The two featured products always come first, so the result holds
/// `max(count, 2)` products with ids `1..` in order.
pub fn generate_products_with_rng<R: Rng>(count: usize, rng: &mut R) -> Vec<Product> {
    let mut products = Vec::with_capacity(count.max(2));
    products.extend(featured_products());

    for id in 3..=count as u64 {
        let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
        products.push(Product {
            id,
            name: format!("Product {}", id),
            category,
        });
    }

    products
}
