//! Command implementations.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::analysis::analyzer::{Analyzer, ExpansionType, SkosAnalyzer, SkosAnalyzerConfig};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::skos::cache::StoreKey;
use crate::skos::engine::SkosEngine;
use crate::skos::store::{ConceptStore, StoreConfig};
use crate::storage::{FileStorage, StorageConfig};

/// Execute a CLI command.
pub fn execute_command(args: SkosArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => analyze(analyze_args, &args),
        Command::Lookup(lookup_args) => lookup(lookup_args, &args),
        Command::Build(build_args) => build(build_args, &args),
        Command::Stats(stats_args) => stats(stats_args, &args),
    }
}

impl StoreOptions {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_languages(self.languages.iter().cloned())
            .with_materialize_transitive(!self.no_transitive)
    }
}

fn load_store(path: &Path, options: &StoreOptions) -> Result<ConceptStore> {
    let start = Instant::now();
    let store = ConceptStore::from_file(path, options.store_config())?;
    info!(
        "Loaded {} concepts from {} in {} ms",
        store.concept_count(),
        path.display(),
        start.elapsed().as_millis()
    );
    Ok(store)
}

/// Analyzer settings from the config file, overridden by flags.
fn analyzer_config(args: &AnalyzeArgs) -> Result<SkosAnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => SkosAnalyzerConfig::from_file(path)?,
        None => SkosAnalyzerConfig::default(),
    };

    if !args.types.is_empty() {
        config.types = args.types.clone();
    }
    if let Some(buffer_size) = args.buffer_size {
        config.buffer_size = buffer_size;
        config.auto_buffer_size = false;
    }
    if args.uri {
        config.expansion_type = ExpansionType::Uri;
    }

    config.validate()?;
    Ok(config)
}

fn analyze(args: &AnalyzeArgs, cli_args: &SkosArgs) -> Result<()> {
    let config = analyzer_config(args)?;
    let store: Arc<dyn SkosEngine> = Arc::new(load_store(&args.vocabulary, &args.store)?);
    let analyzer = SkosAnalyzer::new(store, config)?;

    let tokens = analyzer
        .analyze(&args.text)?
        .map(|token| TokenRow::from(&token))
        .collect();

    output_result(
        &AnalysisResult {
            text: args.text.clone(),
            tokens,
        },
        cli_args,
    )
}

fn lookup(args: &LookupArgs, cli_args: &SkosArgs) -> Result<()> {
    let store = load_store(&args.vocabulary, &args.store)?;

    let mut concepts = Vec::new();
    for id in store.concepts(&args.label)? {
        concepts.push(ConceptReport {
            pref_labels: store.pref_labels(&id)?,
            alt_labels: store.alt_labels(&id)?,
            hidden_labels: store.hidden_labels(&id)?,
            broader: store.broader_concepts(&id)?,
            narrower: store.narrower_concepts(&id)?,
            related: store.related_concepts_of(&id)?,
            id,
        });
    }

    output_result(
        &LookupResult {
            label: args.label.clone(),
            concepts,
        },
        cli_args,
    )
}

fn build(args: &BuildArgs, cli_args: &SkosArgs) -> Result<()> {
    let start = Instant::now();
    let store = load_store(&args.vocabulary, &args.store)?;

    let key = StoreKey::new(args.vocabulary.display().to_string(), &args.store.languages);
    let segment = key.segment_name();
    let storage = FileStorage::new(&args.index_dir, StorageConfig::default())?;
    store.persist(&storage, &segment)?;

    output_result(
        &BuildResult {
            segment,
            directory: args.index_dir.display().to_string(),
            concepts: store.concept_count(),
            labels: store.label_count(),
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

fn stats(args: &StatsArgs, cli_args: &SkosArgs) -> Result<()> {
    let store = load_store(&args.vocabulary, &args.store)?;

    output_result(
        &VocabularyStats {
            source: args.vocabulary.display().to_string(),
            languages: store.languages().to_vec(),
            concepts: store.concept_count(),
            labels: store.label_count(),
            max_pref_label_terms: store.max_pref_label_terms(),
        },
        cli_args,
    )
}
