//! Persisted concept segments.
//!
//! A segment is a single file written through a [`Storage`]:
//!
//! ```text
//! header   magic u32 | version u32 | built_at i64 | languages | max_pref_terms | concept_count
//! records  one per concept: id | 3 label lists | 5 relation lists
//! index    label count | (label | delta-coded concept numbers)*
//!          concept count | (id | record offset u64)*
//! footer   index offset u64 | crc32
//! ```
//!
//! [`PersistedConceptStore`] keeps the index in memory and reads records on
//! demand, so opening a large vocabulary is cheap.

use std::collections::BTreeMap;
use std::fmt;

use ahash::AHashMap;
use chrono::{DateTime, TimeZone, Utc};
use log::{info, warn};
use parking_lot::Mutex;

use crate::error::{Result, SkosError};
use crate::skos::engine::{ConceptId, SkosEngine};
use crate::skos::store::{ConceptRecord, ConceptStore, normalize_label};
use crate::skos::types::{LabelKind, RelationKind};
use crate::storage::structured::CHECKSUM_SIZE;
use crate::storage::{Storage, StorageInput, StorageOutput, StructReader, StructWriter};

/// "SKOS" in ASCII.
pub const SEGMENT_MAGIC: u32 = 0x534B_4F53;
pub const SEGMENT_VERSION: u32 = 1;

const FOOTER_SIZE: u64 = 8 + CHECKSUM_SIZE;

impl ConceptRecord {
    fn write_to<W: StorageOutput>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_string(&self.id)?;
        for kind in LabelKind::ALL {
            writer.write_string_list(self.labels(kind))?;
        }
        for kind in RelationKind::ALL {
            writer.write_string_list(self.relations(kind))?;
        }
        Ok(())
    }

    fn read_from<R: StorageInput>(reader: &mut StructReader<R>) -> Result<Self> {
        let mut record = ConceptRecord::new(reader.read_string()?);
        for kind in LabelKind::ALL {
            for label in reader.read_string_list()? {
                record.add_label(kind, label);
            }
        }
        for kind in RelationKind::ALL {
            record.set_relations(kind, reader.read_string_list()?);
        }
        Ok(record)
    }
}

impl ConceptStore {
    /// Write this store as a segment named `name`.
    ///
    /// The segment is written to a temporary file and renamed into place, so
    /// readers never observe a partial segment.
    pub fn persist(&self, storage: &dyn Storage, name: &str) -> Result<()> {
        let (temp_name, output) = storage.create_temp_output(name)?;

        match self.write_segment(output) {
            Ok(()) => {
                storage.rename_file(&temp_name, name)?;
                info!(
                    "Persisted {} concepts to segment {name}",
                    self.records().len()
                );
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = storage.delete_file(&temp_name) {
                    warn!("Failed to remove temporary segment {temp_name}: {cleanup}");
                }
                Err(e)
            }
        }
    }

    fn write_segment(&self, output: Box<dyn StorageOutput>) -> Result<()> {
        let mut writer = StructWriter::new(output);

        writer.write_u32(SEGMENT_MAGIC)?;
        writer.write_u32(SEGMENT_VERSION)?;
        writer.write_i64(Utc::now().timestamp_millis())?;
        writer.write_string_list(self.languages())?;
        writer.write_varint(self.max_pref_label_terms() as u64)?;
        writer.write_varint(self.records().len() as u64)?;

        let mut offsets = Vec::with_capacity(self.records().len());
        for record in self.records() {
            offsets.push(writer.position());
            self.closed_record(record).write_to(&mut writer)?;
        }

        let index_offset = writer.position();
        let sorted: BTreeMap<&String, &Vec<u32>> = self.label_index().iter().collect();
        writer.write_varint(sorted.len() as u64)?;
        for (label, postings) in sorted {
            writer.write_string(label)?;
            writer.write_delta_compressed_u32s(postings)?;
        }

        writer.write_varint(offsets.len() as u64)?;
        for (record, offset) in self.records().iter().zip(&offsets) {
            writer.write_string(&record.id)?;
            writer.write_u64(*offset)?;
        }

        writer.write_u64(index_offset)?;
        writer.close()
    }
}

/// A concept store backed by a segment in storage.
///
/// Label lookups are served from memory; concept records are read from
/// storage per query. A failed read surfaces as [`SkosError::Query`] and
/// leaves the store usable.
pub struct PersistedConceptStore {
    name: String,
    reader: Mutex<StructReader<Box<dyn StorageInput>>>,
    ids: Vec<ConceptId>,
    positions: AHashMap<ConceptId, u32>,
    offsets: Vec<u64>,
    label_index: AHashMap<String, Vec<u32>>,
    max_pref_label_terms: usize,
    languages: Vec<String>,
    built_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for PersistedConceptStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedConceptStore")
            .field("name", &self.name)
            .field("concepts", &self.ids.len())
            .field("labels", &self.label_index.len())
            .field("languages", &self.languages)
            .finish()
    }
}

impl PersistedConceptStore {
    /// Open the segment `name`, verifying its header and checksum.
    ///
    /// Any problem with the segment is a load error.
    pub fn open(storage: &dyn Storage, name: &str) -> Result<Self> {
        let input = storage
            .open_input(name)
            .map_err(|e| SkosError::load(format!("cannot open segment {name}: {e}")))?;
        let mut reader = StructReader::new(input)?;

        Self::read_index(&mut reader, name)
            .map(|parts| parts.into_store(name, reader))
            .map_err(|e| match e {
                SkosError::Load(_) => e,
                other => SkosError::load(format!("corrupt segment {name}: {other}")),
            })
    }

    fn read_index(
        reader: &mut StructReader<Box<dyn StorageInput>>,
        name: &str,
    ) -> Result<SegmentIndex> {
        if reader.size() < FOOTER_SIZE + 8 {
            return Err(SkosError::load(format!("segment {name} is truncated")));
        }
        if !reader.verify_checksum()? {
            return Err(SkosError::load(format!("checksum mismatch in segment {name}")));
        }

        let magic = reader.read_u32()?;
        if magic != SEGMENT_MAGIC {
            return Err(SkosError::load(format!(
                "{name} is not a concept segment (magic {magic:#010x})"
            )));
        }
        let version = reader.read_u32()?;
        if version != SEGMENT_VERSION {
            return Err(SkosError::load(format!(
                "unsupported segment version {version} in {name}"
            )));
        }

        let built_at = Utc.timestamp_millis_opt(reader.read_i64()?).single();
        let languages = reader.read_string_list()?;
        let max_pref_label_terms = reader.read_varint()? as usize;
        let concept_count = reader.read_varint()? as usize;

        let footer_at = reader.size() - FOOTER_SIZE;
        reader.seek(footer_at)?;
        let index_offset = reader.read_u64()?;
        reader.seek(index_offset)?;

        let label_count = reader.read_varint()? as usize;
        let mut label_index = AHashMap::with_capacity(label_count);
        for _ in 0..label_count {
            let label = reader.read_string()?;
            let postings = reader.read_delta_compressed_u32s()?;
            if postings.iter().any(|&p| p as usize >= concept_count) {
                return Err(SkosError::load(format!(
                    "label {label:?} references a missing concept"
                )));
            }
            label_index.insert(label, postings);
        }

        let offset_count = reader.read_varint()? as usize;
        if offset_count != concept_count {
            return Err(SkosError::load(format!(
                "segment {name} declares {concept_count} concepts but indexes {offset_count}"
            )));
        }

        let mut ids = Vec::with_capacity(concept_count);
        let mut positions = AHashMap::with_capacity(concept_count);
        let mut offsets = Vec::with_capacity(concept_count);
        for position in 0..concept_count {
            let id = reader.read_string()?;
            positions.insert(id.clone(), position as u32);
            ids.push(id);
            offsets.push(reader.read_u64()?);
        }

        Ok(SegmentIndex {
            ids,
            positions,
            offsets,
            label_index,
            max_pref_label_terms: max_pref_label_terms.max(1),
            languages,
            built_at,
        })
    }

    /// When the segment was written, if recorded.
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// The language filter the segment was built with.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    fn read_record(&self, concept: &str) -> Result<Option<ConceptRecord>> {
        let Some(&position) = self.positions.get(concept) else {
            return Ok(None);
        };
        let offset = self.offsets[position as usize];

        let mut reader = self.reader.lock();
        let record = reader
            .seek(offset)
            .and_then(|_| ConceptRecord::read_from(&mut *reader))
            .map_err(|e| {
                SkosError::query(format!(
                    "failed to read concept {concept} from segment {}: {e}",
                    self.name
                ))
            })?;
        Ok(Some(record))
    }
}

struct SegmentIndex {
    ids: Vec<ConceptId>,
    positions: AHashMap<ConceptId, u32>,
    offsets: Vec<u64>,
    label_index: AHashMap<String, Vec<u32>>,
    max_pref_label_terms: usize,
    languages: Vec<String>,
    built_at: Option<DateTime<Utc>>,
}

impl SegmentIndex {
    fn into_store(
        self,
        name: &str,
        reader: StructReader<Box<dyn StorageInput>>,
    ) -> PersistedConceptStore {
        PersistedConceptStore {
            name: name.to_string(),
            reader: Mutex::new(reader),
            ids: self.ids,
            positions: self.positions,
            offsets: self.offsets,
            label_index: self.label_index,
            max_pref_label_terms: self.max_pref_label_terms,
            languages: self.languages,
            built_at: self.built_at,
        }
    }
}

impl SkosEngine for PersistedConceptStore {
    fn concepts(&self, text: &str) -> Result<Vec<ConceptId>> {
        Ok(self
            .label_index
            .get(&normalize_label(text))
            .map(|postings| {
                postings
                    .iter()
                    .map(|&p| self.ids[p as usize].clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn labels(&self, concept: &str, kind: LabelKind) -> Result<Vec<String>> {
        Ok(self
            .read_record(concept)?
            .map(|record| record.labels(kind).to_vec())
            .unwrap_or_default())
    }

    fn related_concepts(&self, concept: &str, kind: RelationKind) -> Result<Vec<ConceptId>> {
        Ok(self
            .read_record(concept)?
            .map(|record| record.relations(kind).to_vec())
            .unwrap_or_default())
    }

    fn concept_count(&self) -> usize {
        self.ids.len()
    }

    fn label_count(&self) -> usize {
        self.label_index.len()
    }

    fn max_pref_label_terms(&self) -> usize {
        self.max_pref_label_terms
    }
}
