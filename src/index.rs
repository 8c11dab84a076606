use anyhow::anyhow;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use crate::config;
use crate::dto::{DocKey, Product};
use crate::index_config::PRODUCT_ANALYZER;

/// Read side of the text index: ranked document keys for a free-text query.
pub trait TextIndex: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> crate::Result<Vec<DocKey>>;
}

/// Write side, used once at startup.
pub trait IndexBuilder {
    type Index: TextIndex + 'static;

    fn add(&mut self, key: &str, product: &Product) -> crate::Result<()>;
    fn finish(self) -> crate::Result<Self::Index>;
}

#[derive(Clone, Copy)]
struct ProductFields {
    key: Field,
    name: Field,
    category: Field,
}

impl ProductFields {
    fn schema() -> (Schema, ProductFields) {
        let indexing = TextFieldIndexing::default()
            .set_tokenizer(PRODUCT_ANALYZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text = TextOptions::default().set_indexing_options(indexing);

        let mut schema = Schema::builder();
        let fields = ProductFields {
            key: schema.add_text_field("key", STRING | STORED),
            name: schema.add_text_field("name", text.clone()),
            category: schema.add_text_field("category", text),
        };
        (schema.build(), fields)
    }

    fn searchable(&self) -> [Field; 2] {
        [self.name, self.category]
    }
}

pub struct TantivyIndexBuilder {
    index: Index,
    writer: IndexWriter,
    fields: ProductFields,
}

impl TantivyIndexBuilder {
    pub fn create(config: &config::Search) -> crate::Result<Self> {
        let (schema, fields) = ProductFields::schema();
        let index = Index::create_in_ram(schema);
        index
            .tokenizers()
            .register(PRODUCT_ANALYZER, config.analyzer.make_analyzer()?);

        let writer: IndexWriter = if let Some(num_threads) = config.indexer_num_threads {
            index.writer_with_num_threads(num_threads, config.indexer_heap_size)
        } else {
            index.writer(config.indexer_heap_size)
        }?;
        Ok(Self {
            index,
            writer,
            fields,
        })
    }
}

impl IndexBuilder for TantivyIndexBuilder {
    type Index = TantivyIndex;

    fn add(&mut self, key: &str, product: &Product) -> crate::Result<()> {
        let mut doc = TantivyDocument::default();
        doc.add_text(self.fields.key, key);
        doc.add_text(self.fields.name, &product.name);
        doc.add_text(self.fields.category, product.category.as_str());
        self.writer.add_document(doc)?;
        Ok(())
    }

    fn finish(mut self) -> crate::Result<TantivyIndex> {
        log::debug!("Committing product index");
        self.writer.commit()?;
        self.writer.wait_merging_threads()?;

        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let index = TantivyIndex {
            index: self.index,
            reader,
            fields: self.fields,
        };
        log::debug!("Product index holds {} documents", index.num_docs());
        Ok(index)
    }
}

pub struct TantivyIndex {
    index: Index,
    reader: IndexReader,
    fields: ProductFields,
}

impl TantivyIndex {
    /// Analyzes `text` per searchable field and ORs every resulting term,
    /// so any shared token is a hit and more shared tokens rank higher.
    fn match_query(&self, text: &str) -> crate::Result<BooleanQuery> {
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for field in self.fields.searchable() {
            let mut analyzer = self.index.tokenizer_for_field(field)?;
            let mut stream = analyzer.token_stream(text);
            stream.process(&mut |token| {
                let term = Term::from_field_text(field, &token.text);
                let query: Box<dyn Query> =
                    Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
                clauses.push((Occur::Should, query));
            });
        }
        Ok(BooleanQuery::new(clauses))
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}

impl TextIndex for TantivyIndex {
    fn search(&self, query: &str, limit: usize) -> crate::Result<Vec<DocKey>> {
        // TopDocs panics on a zero limit
        if limit == 0 {
            return Ok(Vec::new());
        }
        let query = self.match_query(query)?;
        let searcher = self.reader.searcher();
        let hits = searcher.search(&query, &TopDocs::with_limit(limit))?;

        hits.into_iter()
            .map(|(_score, doc_address)| -> crate::Result<DocKey> {
                let doc: TantivyDocument = searcher.doc(doc_address)?;
                doc.get_first(self.fields.key)
                    .and_then(|value| value.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("Document {:?} has no key", doc_address).into())
            })
            .collect()
    }
}
