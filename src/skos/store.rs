//! The in-memory concept store and its builder.

use std::borrow::Cow;
use std::collections::{BTreeMap, VecDeque};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkosError};
use crate::rdf::{GraphLoader, RdfFormat, RdfLoader, Term, Triple};
use crate::skos::engine::{ConceptId, SkosEngine};
use crate::skos::types::{LabelKind, RelationKind};
use crate::skos::vocabulary::{RDF_TYPE, SKOS_CONCEPT, label_kind_of, relation_kind_of};

/// Options controlling how a store is built from a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Language tags whose labels are indexed. Empty means every label.
    pub languages: Vec<String>,

    /// Whether to compute the transitive closure of broader and narrower
    /// edges at build time. When off, the closure is computed per query;
    /// both settings answer the same.
    pub materialize_transitive: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            languages: Vec::new(),
            materialize_transitive: true,
        }
    }
}

impl StoreConfig {
    /// Restrict indexing to the given language tags.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable transitive materialization.
    pub fn with_materialize_transitive(mut self, materialize: bool) -> Self {
        self.materialize_transitive = materialize;
        self
    }

    /// The language filter in canonical form: lowercased, sorted, deduplicated.
    pub fn normalized_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> =
            self.languages.iter().map(|l| l.trim().to_lowercase()).collect();
        languages.sort();
        languages.dedup();
        languages
    }
}

/// Canonical form of label text used for indexing and lookup.
pub fn normalize_label(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Labels and outgoing edges of one concept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub id: ConceptId,
    labels: [Vec<String>; 3],
    relations: [Vec<ConceptId>; 5],
}

impl ConceptRecord {
    pub fn new<S: Into<ConceptId>>(id: S) -> Self {
        ConceptRecord {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Labels of one kind, in source order.
    pub fn labels(&self, kind: LabelKind) -> &[String] {
        &self.labels[kind.index()]
    }

    /// Edge targets of one kind, in source order.
    pub fn relations(&self, kind: RelationKind) -> &[ConceptId] {
        &self.relations[kind.index()]
    }

    /// Add a label unless the record already has it for this kind.
    pub fn add_label(&mut self, kind: LabelKind, text: String) {
        let labels = &mut self.labels[kind.index()];
        if !labels.contains(&text) {
            labels.push(text);
        }
    }

    /// Add an edge unless the record already has it for this kind.
    pub fn add_relation(&mut self, kind: RelationKind, target: ConceptId) {
        let targets = &mut self.relations[kind.index()];
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    pub(crate) fn set_relations(&mut self, kind: RelationKind, targets: Vec<ConceptId>) {
        self.relations[kind.index()] = targets;
    }
}

/// Single-writer builder for a [`ConceptStore`].
///
/// Triples are fed in with [`add_triple`](Self::add_triple), or concepts are
/// described directly with [`add_label`](Self::add_label) and
/// [`add_relation`](Self::add_relation). [`build`](Self::build) publishes
/// the immutable store.
#[derive(Debug)]
pub struct ConceptStoreBuilder {
    config: StoreConfig,
    language_filter: Option<AHashSet<String>>,
    records: BTreeMap<ConceptId, ConceptRecord>,
    concepts: AHashSet<ConceptId>,
    skipped_edges: usize,
}

impl ConceptStoreBuilder {
    pub fn new(config: StoreConfig) -> Self {
        let languages = config.normalized_languages();
        let language_filter = if languages.is_empty() {
            None
        } else {
            Some(languages.into_iter().collect())
        };

        ConceptStoreBuilder {
            config,
            language_filter,
            records: BTreeMap::new(),
            concepts: AHashSet::new(),
            skipped_edges: 0,
        }
    }

    fn record_mut(&mut self, id: &str) -> &mut ConceptRecord {
        self.records
            .entry(id.to_string())
            .or_insert_with(|| ConceptRecord::new(id))
    }

    /// Declare a resource to be a concept even if it has no labels.
    pub fn add_concept(&mut self, concept: &str) -> &mut Self {
        self.concepts.insert(concept.to_string());
        self.record_mut(concept);
        self
    }

    /// Attach a label to a concept.
    ///
    /// The resource becomes a concept whether or not the label passes the
    /// language filter. A label without a language tag is dropped whenever a
    /// filter is configured.
    pub fn add_label(
        &mut self,
        concept: &str,
        kind: LabelKind,
        text: &str,
        language: Option<&str>,
    ) -> &mut Self {
        self.add_concept(concept);

        if let Some(filter) = &self.language_filter {
            let accepted = language.is_some_and(|l| filter.contains(&l.to_lowercase()));
            if !accepted {
                debug!("Skipping {kind:?} label {text:?} of <{concept}>: language {language:?} filtered");
                return self;
            }
        }

        let normalized = normalize_label(text);
        if normalized.is_empty() {
            return self;
        }
        self.record_mut(concept).add_label(kind, normalized);
        self
    }

    /// Add a directed edge from `concept` to `target`.
    pub fn add_relation(&mut self, concept: &str, kind: RelationKind, target: &str) -> &mut Self {
        self.record_mut(concept).add_relation(kind, target.to_string());
        self
    }

    /// Interpret one triple.
    ///
    /// Malformed statements (a label that is not a literal, an edge to a
    /// literal or blank node, a blank-node concept) are logged and skipped.
    pub fn add_triple(&mut self, triple: &Triple) -> &mut Self {
        let subject = match &triple.subject {
            Term::Iri(iri) => iri.as_str(),
            Term::BlankNode(label) => {
                if label_kind_of(&triple.predicate).is_some()
                    || relation_kind_of(&triple.predicate).is_some()
                {
                    warn!("Skipping statement about blank node _:{label}: concepts need an IRI");
                    self.skipped_edges += 1;
                }
                return self;
            }
            Term::Literal { .. } => return self,
        };

        if triple.predicate == RDF_TYPE {
            if triple.object.as_iri() == Some(SKOS_CONCEPT) {
                self.add_concept(subject);
            }
            return self;
        }

        if let Some(kind) = label_kind_of(&triple.predicate) {
            match &triple.object {
                Term::Literal {
                    value, language, ..
                } => {
                    self.add_label(subject, kind, value, language.as_deref());
                }
                other => {
                    warn!("Skipping {kind:?} of <{subject}>: object {other} is not a literal");
                    self.skipped_edges += 1;
                }
            }
            return self;
        }

        if let Some(kind) = relation_kind_of(&triple.predicate) {
            match &triple.object {
                Term::Iri(target) => {
                    self.add_relation(subject, kind, target);
                }
                other => {
                    warn!("Skipping {kind:?} edge of <{subject}>: object {other} is not a resource");
                    self.skipped_edges += 1;
                }
            }
        }

        self
    }

    /// Interpret a sequence of triples.
    pub fn add_triples<'a, I>(&mut self, triples: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a Triple>,
    {
        for triple in triples {
            self.add_triple(triple);
        }
        self
    }

    /// Number of malformed statements skipped so far.
    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }

    /// Publish the store.
    pub fn build(self) -> ConceptStore {
        let ConceptStoreBuilder {
            config,
            records,
            concepts,
            skipped_edges,
            ..
        } = self;

        let closures = if config.materialize_transitive {
            let lookup = |id: &str| {
                if concepts.contains(id) {
                    records.get(id)
                } else {
                    None
                }
            };
            concepts
                .iter()
                .map(|id| {
                    let broader = reachable(lookup, id, RelationKind::Broader);
                    let narrower = reachable(lookup, id, RelationKind::Narrower);
                    (id.clone(), (broader, narrower))
                })
                .collect::<AHashMap<_, _>>()
        } else {
            AHashMap::new()
        };

        let mut concept_records: Vec<ConceptRecord> = records
            .into_values()
            .filter(|record| concepts.contains(&record.id))
            .collect();

        for record in &mut concept_records {
            if let Some((broader, narrower)) = closures.get(&record.id) {
                record.set_relations(RelationKind::BroaderTransitive, broader.clone());
                record.set_relations(RelationKind::NarrowerTransitive, narrower.clone());
            }
        }

        let store = ConceptStore::from_records(
            concept_records,
            config.normalized_languages(),
            config.materialize_transitive,
        );
        info!(
            "Built concept store: {} concepts, {} labels, {} skipped statements",
            store.concept_count(),
            store.label_count(),
            skipped_edges
        );
        store
    }
}

/// Concepts reachable from `start` over `kind` and its transitive variant,
/// in breadth-first discovery order, excluding `start`.
///
/// Only records returned by `lookup` are expanded further; other targets
/// are reported but not walked through.
fn reachable<'a, F>(lookup: F, start: &'a str, kind: RelationKind) -> Vec<ConceptId>
where
    F: Fn(&str) -> Option<&'a ConceptRecord>,
{
    let Some(transitive) = kind.transitive() else {
        return Vec::new();
    };

    let mut visited: AHashSet<&'a str> = AHashSet::new();
    visited.insert(start);
    let mut queue: VecDeque<&'a str> = VecDeque::from([start]);
    let mut found = Vec::new();

    while let Some(current) = queue.pop_front() {
        let Some(record) = lookup(current) else {
            continue;
        };
        for target in record
            .relations(kind)
            .iter()
            .chain(record.relations(transitive))
        {
            if visited.insert(target.as_str()) {
                found.push(target.clone());
                queue.push_back(target.as_str());
            }
        }
    }

    found
}

/// An immutable, in-memory concept store.
///
/// Safe to share between threads without locking once built.
#[derive(Debug, Clone)]
pub struct ConceptStore {
    records: Vec<ConceptRecord>,
    ids: AHashMap<ConceptId, u32>,
    label_index: AHashMap<String, Vec<u32>>,
    max_pref_label_terms: usize,
    languages: Vec<String>,
    materialized: bool,
}

impl ConceptStore {
    /// Build the store's indexes over concept records.
    ///
    /// `materialized` records whether the transitive relation lists already
    /// hold the closure.
    pub(crate) fn from_records(
        mut records: Vec<ConceptRecord>,
        languages: Vec<String>,
        materialized: bool,
    ) -> Self {
        records.sort_by(|a, b| a.id.cmp(&b.id));

        let mut ids = AHashMap::with_capacity(records.len());
        let mut label_index: AHashMap<String, Vec<u32>> = AHashMap::new();
        let mut max_pref_label_terms = 1;

        for (index, record) in records.iter().enumerate() {
            let index = index as u32;
            ids.insert(record.id.clone(), index);

            for kind in LabelKind::ALL {
                for label in record.labels(kind) {
                    let postings = label_index.entry(label.clone()).or_default();
                    if postings.last() != Some(&index) {
                        postings.push(index);
                    }
                    if kind == LabelKind::Preferred {
                        max_pref_label_terms =
                            max_pref_label_terms.max(label.split_whitespace().count());
                    }
                }
            }
        }

        ConceptStore {
            records,
            ids,
            label_index,
            max_pref_label_terms,
            languages,
            materialized,
        }
    }

    /// Load a vocabulary with the built-in [`RdfLoader`].
    pub fn from_reader(
        reader: &mut dyn Read,
        format: RdfFormat,
        config: StoreConfig,
    ) -> Result<Self> {
        Self::from_reader_with(&RdfLoader::new(), reader, format, config)
    }

    /// Load a vocabulary through a custom graph loader.
    pub fn from_reader_with(
        loader: &dyn GraphLoader,
        reader: &mut dyn Read,
        format: RdfFormat,
        config: StoreConfig,
    ) -> Result<Self> {
        let triples = loader.load(reader, format)?;
        debug!("Loaded {} triples", triples.len());

        let mut builder = ConceptStoreBuilder::new(config);
        builder.add_triples(&triples);
        Ok(builder.build())
    }

    /// Load a vocabulary file, choosing the serialization from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P, config: StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        let format = RdfFormat::from_path(path)?;
        let file = File::open(path).map_err(|e| {
            SkosError::load(format!("cannot open vocabulary {}: {e}", path.display()))
        })?;

        info!("Loading vocabulary {} as {format:?}", path.display());
        Self::from_reader(&mut BufReader::new(file), format, config)
    }

    /// The record of a concept.
    pub fn record(&self, concept: &str) -> Option<&ConceptRecord> {
        self.ids
            .get(concept)
            .map(|&index| &self.records[index as usize])
    }

    /// All records, ordered by concept identifier.
    pub fn records(&self) -> &[ConceptRecord] {
        &self.records
    }

    /// The label index: label text to positions in [`records`](Self::records).
    pub(crate) fn label_index(&self) -> &AHashMap<String, Vec<u32>> {
        &self.label_index
    }

    /// The language filter the store was built with.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// A record with its transitive relations filled in.
    pub(crate) fn closed_record<'a>(&'a self, record: &'a ConceptRecord) -> Cow<'a, ConceptRecord> {
        if self.materialized {
            return Cow::Borrowed(record);
        }

        let mut closed = record.clone();
        for (base, transitive) in [
            (RelationKind::Broader, RelationKind::BroaderTransitive),
            (RelationKind::Narrower, RelationKind::NarrowerTransitive),
        ] {
            closed.set_relations(transitive, self.closure(&record.id, base));
        }
        Cow::Owned(closed)
    }

    fn closure(&self, concept: &str, base: RelationKind) -> Vec<ConceptId> {
        reachable(|id| self.record(id), concept, base)
    }
}

impl SkosEngine for ConceptStore {
    fn concepts(&self, text: &str) -> Result<Vec<ConceptId>> {
        Ok(self
            .label_index
            .get(&normalize_label(text))
            .map(|postings| {
                postings
                    .iter()
                    .map(|&index| self.records[index as usize].id.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn labels(&self, concept: &str, kind: LabelKind) -> Result<Vec<String>> {
        Ok(self
            .record(concept)
            .map(|record| record.labels(kind).to_vec())
            .unwrap_or_default())
    }

    fn related_concepts(&self, concept: &str, kind: RelationKind) -> Result<Vec<ConceptId>> {
        if !self.materialized {
            match kind {
                RelationKind::BroaderTransitive => {
                    return Ok(self.closure(concept, RelationKind::Broader));
                }
                RelationKind::NarrowerTransitive => {
                    return Ok(self.closure(concept, RelationKind::Narrower));
                }
                _ => {}
            }
        }

        Ok(self
            .record(concept)
            .map(|record| record.relations(kind).to_vec())
            .unwrap_or_default())
    }

    fn concept_count(&self) -> usize {
        self.records.len()
    }

    fn label_count(&self) -> usize {
        self.label_index.len()
    }

    fn max_pref_label_terms(&self) -> usize {
        self.max_pref_label_terms
    }
}
