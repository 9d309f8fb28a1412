//! The vocabulary-expanding analyzer.
//!
//! In label mode text is tokenized on word characters, the SKOS label filter
//! injects vocabulary labels, and the result is lowercased, stopped and
//! deduplicated per position. In URI mode each field value is one concept
//! identifier, expanded into that concept's labels.
//!
//! # Configuration
//!
//! [`SkosAnalyzerConfig`] is plain serde data and can be kept as JSON:
//!
//! ```
//! use sarissa_skos::analysis::analyzer::{ExpansionType, SkosAnalyzerConfig};
//! use sarissa_skos::skos::SkosType;
//!
//! let config = SkosAnalyzerConfig::from_json(
//!     r#"{"expansion_type": "label", "types": ["ALT", "BROADER"], "buffer_size": 2}"#,
//! ).unwrap();
//!
//! assert_eq!(config.expansion_type, ExpansionType::Label);
//! assert_eq!(config.types, vec![SkosType::Alt, SkosType::Broader]);
//! assert_eq!(config.max_token_length, 255);
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::skos_label::DEFAULT_MAX_TOKEN_LENGTH;
use crate::analysis::token_filter::{
    AnalyzerNormalizer, LowercaseFilter, RemoveDuplicatesFilter, SkosLabelFilter, SkosUriFilter,
    StopFilter, TextNormalizer,
};
use crate::analysis::tokenizer::{RegexTokenizer, WholeTokenizer};
use crate::error::{Result, SkosError};
use crate::skos::engine::SkosEngine;
use crate::skos::types::{DEFAULT_EXPANSION_TYPES, SkosType};

/// What the analyzed field contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionType {
    /// Concept identifiers, one per value.
    Uri,
    /// Free text matched against labels.
    #[default]
    Label,
}

/// Settings of a [`SkosAnalyzer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkosAnalyzerConfig {
    pub expansion_type: ExpansionType,
    /// Label and relation types to expand into.
    pub types: Vec<SkosType>,
    /// Widest lookup window, in tokens.
    pub buffer_size: usize,
    /// Derive the window from the longest preferred label instead.
    pub auto_buffer_size: bool,
    /// Tokens longer than this, in characters, are never looked up.
    pub max_token_length: usize,
    /// Stop words; `None` selects the English default list.
    pub stop_words: Option<Vec<String>>,
    /// Emit a preferred label even when it equals the matched text.
    pub keep_identical_preferred: bool,
}

impl Default for SkosAnalyzerConfig {
    fn default() -> Self {
        SkosAnalyzerConfig {
            expansion_type: ExpansionType::Label,
            types: DEFAULT_EXPANSION_TYPES.to_vec(),
            buffer_size: 1,
            auto_buffer_size: false,
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
            stop_words: None,
            keep_identical_preferred: false,
        }
    }
}

impl SkosAnalyzerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SkosAnalyzerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: SkosAnalyzerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(SkosError::invalid_argument("buffer_size must be at least 1"));
        }
        if self.max_token_length == 0 {
            return Err(SkosError::invalid_argument(
                "max_token_length must be at least 1",
            ));
        }
        if self.types.is_empty() {
            return Err(SkosError::invalid_argument(
                "at least one expansion type is required",
            ));
        }
        Ok(())
    }

    pub fn with_expansion_type(mut self, expansion_type: ExpansionType) -> Self {
        self.expansion_type = expansion_type;
        self
    }

    pub fn with_types(mut self, types: Vec<SkosType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_auto_buffer_size(mut self, auto: bool) -> Self {
        self.auto_buffer_size = auto;
        self
    }

    pub fn with_stop_words(mut self, stop_words: Vec<String>) -> Self {
        self.stop_words = Some(stop_words);
        self
    }
}

/// Analyzer that expands text or concept identifiers with vocabulary labels.
pub struct SkosAnalyzer {
    inner: PipelineAnalyzer,
    engine: Arc<dyn SkosEngine>,
    config: SkosAnalyzerConfig,
}

impl SkosAnalyzer {
    pub fn new(engine: Arc<dyn SkosEngine>, config: SkosAnalyzerConfig) -> Result<Self> {
        config.validate()?;

        let normalizer: Arc<dyn TextNormalizer> = Arc::new(label_normalizer()?);

        let inner = match config.expansion_type {
            ExpansionType::Label => {
                let mut filter = SkosLabelFilter::new(Arc::clone(&engine))
                    .with_types(config.types.clone())
                    .with_max_token_length(config.max_token_length)
                    .with_normalizer(normalizer)
                    .with_keep_identical_preferred(config.keep_identical_preferred);
                filter = if config.auto_buffer_size {
                    filter.with_auto_buffer_size()
                } else {
                    filter.with_buffer_size(config.buffer_size)?
                };
                debug!("Label expansion window is {} tokens", filter.buffer_size());

                let stop = match &config.stop_words {
                    Some(words) => StopFilter::from_words(words.iter().cloned()),
                    None => StopFilter::new(),
                };

                PipelineAnalyzer::new(Arc::new(RegexTokenizer::new()?))
                    .add_filter(Arc::new(filter))
                    .add_filter(Arc::new(LowercaseFilter::new()))
                    .add_filter(Arc::new(stop))
                    .add_filter(Arc::new(RemoveDuplicatesFilter::new()))
                    .with_name("skos_label")
            }
            ExpansionType::Uri => {
                let filter = SkosUriFilter::new(Arc::clone(&engine))
                    .with_types(config.types.clone())
                    .with_max_token_length(config.max_token_length)
                    .with_normalizer(normalizer);

                PipelineAnalyzer::new(Arc::new(WholeTokenizer::new()))
                    .add_filter(Arc::new(filter))
                    .add_filter(Arc::new(LowercaseFilter::new()))
                    .with_name("skos_uri")
            }
        };

        Ok(SkosAnalyzer {
            inner,
            engine,
            config,
        })
    }

    pub fn config(&self) -> &SkosAnalyzerConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<dyn SkosEngine> {
        &self.engine
    }

    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

/// Expansion labels are tokenized and lowercased like input text.
fn label_normalizer() -> Result<AnalyzerNormalizer> {
    let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new()?))
        .add_filter(Arc::new(LowercaseFilter::new()))
        .with_name("skos_label_normalizer");
    Ok(AnalyzerNormalizer::new(Arc::new(analyzer)))
}

impl Analyzer for SkosAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "skos"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl std::fmt::Debug for SkosAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkosAnalyzer")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}
