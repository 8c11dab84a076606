use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tantivy::tokenizer::{
    AlphaNumOnlyFilter, AsciiFoldingFilter, Language, LowerCaser, NgramTokenizer, RawTokenizer,
    RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer,
    TextAnalyzerBuilder, WhitespaceTokenizer,
};

/// Name the product text analyzer is registered under in the index
pub const PRODUCT_ANALYZER: &str = "product_text";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgramTokenizerConfig {
    /// min size of the n-gram
    min_gram: usize,
    /// max size of the n-gram
    max_gram: usize,
    /// if true, will only parse the leading edge of the input
    #[serde(default)]
    prefix_only: bool,
}

impl NgramTokenizerConfig {
    fn make_tokenizer(&self) -> crate::Result<NgramTokenizer> {
        NgramTokenizer::new(self.min_gram, self.max_gram, self.prefix_only).map_err(From::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum TokenizerConfig {
    Raw,
    Simple,
    Whitespace,
    Ngram(NgramTokenizerConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveLongFilterConfig {
    limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    lang: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum TokenFilterConfig {
    Lowercase,
    RemoveLong(RemoveLongFilterConfig),
    AlphaNum,
    AsciiFolding,
    Stemmer(LanguageConfig),
    Stop(LanguageConfig),
}

impl TokenFilterConfig {
    fn apply(&self, builder: TextAnalyzerBuilder) -> crate::Result<TextAnalyzerBuilder> {
        Ok(match self {
            TokenFilterConfig::Lowercase => builder.filter_dynamic(LowerCaser),
            TokenFilterConfig::RemoveLong(conf) => {
                builder.filter_dynamic(RemoveLongFilter::limit(conf.limit))
            }
            TokenFilterConfig::AlphaNum => builder.filter_dynamic(AlphaNumOnlyFilter),
            TokenFilterConfig::AsciiFolding => builder.filter_dynamic(AsciiFoldingFilter),
            TokenFilterConfig::Stemmer(conf) => builder.filter_dynamic(Stemmer::new(conf.lang)),
            TokenFilterConfig::Stop(conf) => {
                let filter = StopWordFilter::new(conf.lang)
                    .ok_or_else(|| anyhow!("No stop words for language {:?}", conf.lang))?;
                builder.filter_dynamic(filter)
            }
        })
    }
}

/// Text analysis applied to product names and categories, both at
/// indexing time and to incoming queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub token_filters: Vec<TokenFilterConfig>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::Simple,
            token_filters: vec![
                TokenFilterConfig::RemoveLong(RemoveLongFilterConfig { limit: 40 }),
                TokenFilterConfig::Lowercase,
                TokenFilterConfig::Stop(LanguageConfig {
                    lang: Language::English,
                }),
            ],
        }
    }
}

impl AnalyzerConfig {
    pub fn make_analyzer(&self) -> crate::Result<TextAnalyzer> {
        use TokenizerConfig::*;
        let builder = match &self.tokenizer {
            Raw => TextAnalyzer::builder(RawTokenizer::default()).dynamic(),
            Simple => TextAnalyzer::builder(SimpleTokenizer::default()).dynamic(),
            Whitespace => TextAnalyzer::builder(WhitespaceTokenizer::default()).dynamic(),
            Ngram(conf) => TextAnalyzer::builder(conf.make_tokenizer()?).dynamic(),
        };

        self.token_filters
            .iter()
            .try_fold(builder, |builder, filter| filter.apply(builder))
            .map(TextAnalyzerBuilder::build)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tantivy::tokenizer::TokenStream;

    fn tokens(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut stream = analyzer.token_stream(text);
        stream.process(&mut |token| tokens.push(token.text.clone()));
        tokens
    }

    #[test]
    fn test_empty_analyzer_config_deserialize() {
        let config = r#"
{
    "tokenizer": { "type": "raw" }
}
        "#;
        let config: AnalyzerConfig = serde_json::from_str(config).unwrap();

        assert!(matches!(config.tokenizer, TokenizerConfig::Raw));
        assert_eq!(config.token_filters.len(), 0);
    }

    #[test]
    fn test_analyzer_config_with_filters_deserialize() {
        let config = r#"
{
    "tokenizer": {
        "type": "ngram",
        "min_gram": 1,
        "max_gram": 3,
        "prefix_only": true
    },
    "token_filters": [{
        "type": "stemmer",
        "lang": "English"
    }]
}
        "#;
        let config: AnalyzerConfig = serde_json::from_str(config).unwrap();

        assert!(matches!(config.tokenizer, TokenizerConfig::Ngram(_)));
        match &config.token_filters[0] {
            TokenFilterConfig::Stemmer(conf) => {
                assert_eq!(conf.lang, Language::English);
            }
            _ => panic!("Expected token filter 'stemmer'")
        }
    }

    #[test]
    fn test_default_analyzer_lowercases_and_drops_stop_words() {
        let mut analyzer = AnalyzerConfig::default().make_analyzer().unwrap();

        assert_eq!(tokens(&mut analyzer, "Wireless Mouse"), vec!["wireless", "mouse"]);
        assert_eq!(tokens(&mut analyzer, "Home & Kitchen"), vec!["home", "kitchen"]);
        assert_eq!(tokens(&mut analyzer, "The Books"), vec!["books"]);
    }

    #[test]
    fn test_stemmer_filter() {
        let config = AnalyzerConfig {
            tokenizer: TokenizerConfig::Simple,
            token_filters: vec![
                TokenFilterConfig::Lowercase,
                TokenFilterConfig::Stemmer(LanguageConfig {
                    lang: Language::English,
                }),
            ],
        };
        let mut analyzer = config.make_analyzer().unwrap();

        assert_eq!(tokens(&mut analyzer, "Wireless Keyboards"), vec!["wireless", "keyboard"]);
    }

    #[test]
    fn test_invalid_ngram_is_rejected() {
        let config = AnalyzerConfig {
            tokenizer: TokenizerConfig::Ngram(NgramTokenizerConfig {
                min_gram: 3,
                max_gram: 1,
                prefix_only: false,
            }),
            token_filters: vec![],
        };

        assert!(config.make_analyzer().is_err());
    }
}
