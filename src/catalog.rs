use std::collections::HashMap;

use crate::dto::{DocKey, Product};
use crate::index::{IndexBuilder, TextIndex};

/// Generated products together with the text index built over them.
pub struct Catalog {
    index: Box<dyn TextIndex>,
    products: HashMap<DocKey, Product>,
}

impl Catalog {
    /// Indexes every product under its document key. A product that fails to
    /// index is logged and skipped but still lands in the lookup table.
    pub fn build<B: IndexBuilder>(products: Vec<Product>, mut builder: B) -> crate::Result<Self> {
        let mut table = HashMap::with_capacity(products.len());
        let (mut indexed, mut failed) = (0usize, 0usize);

        for product in products {
            let key = product.doc_key();
            match builder.add(&key, &product) {
                Ok(()) => indexed += 1,
                Err(err) => {
                    failed += 1;
                    log::warn!("Error indexing product {}: {:#}", product.id, err);
                }
            }
            table.insert(key, product);
        }

        let index = builder.finish()?;
        log::info!("Indexed {} products, {} failed", indexed, failed);
        Ok(Self {
            index: Box::new(index),
            products: table,
        })
    }

    /// Products matching `query` in relevance order. Search errors are logged
    /// and reported as no results.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Product> {
        match self.index.search(query, limit) {
            Ok(keys) => keys
                .iter()
                .filter_map(|key| self.get(key))
                .cloned()
                .collect(),
            Err(err) => {
                log::error!("Search error for query '{}': {:#}", query, err);
                Vec::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Product> {
        self.products.get(key)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}
