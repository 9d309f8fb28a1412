//! Loading vocabularies from files, persisting them and sharing them across threads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use sarissa_skos::analysis::token::Token;
use sarissa_skos::prelude::*;
use sarissa_skos::storage::{FileStorage, StorageConfig};

const ANIMALS_TTL: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix ex: <http://example.org/animals/> .

ex:animal a skos:Concept ;
    skos:prefLabel "animal"@en , "animal"@fr ;
    skos:narrower ex:mammal .

ex:mammal a skos:Concept ;
    skos:prefLabel "mammal"@en , "mammifère"@fr ;
    skos:broader ex:animal ;
    skos:narrower ex:dog .

ex:dog a skos:Concept ;
    skos:prefLabel "dog"@en , "chien"@fr ;
    skos:altLabel "hound"@en , "domestic dog"@en ;
    skos:hiddenLabel "dgo" ;
    skos:broader ex:mammal ;
    skos:related ex:leash .

ex:leash a skos:Concept ;
    skos:prefLabel "leash"@en .
"#;

const ANIMALS_NT: &str = r#"
<http://example.org/animals/dog> <http://www.w3.org/2004/02/skos/core#prefLabel> "dog"@en .
<http://example.org/animals/dog> <http://www.w3.org/2004/02/skos/core#altLabel> "hound"@en .
<http://example.org/animals/dog> <http://www.w3.org/2004/02/skos/core#broader> <http://example.org/animals/mammal> .
<http://example.org/animals/mammal> <http://www.w3.org/2004/02/skos/core#prefLabel> "mammal"@en .
"#;

const ANIMALS_RDF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#"
         xml:base="http://example.org/animals/">
  <skos:Concept rdf:about="dog">
    <skos:prefLabel xml:lang="en">dog</skos:prefLabel>
    <skos:prefLabel xml:lang="fr">chien</skos:prefLabel>
    <skos:altLabel xml:lang="en">hound</skos:altLabel>
    <skos:broader rdf:resource="http://example.org/animals/mammal"/>
  </skos:Concept>
  <rdf:Description rdf:about="http://example.org/animals/mammal">
    <skos:prefLabel xml:lang="en">mammal</skos:prefLabel>
  </rdf:Description>
</rdf:RDF>
"#;

const SCHEME_TTL: &str = r#"
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix ex: <http://example.org/animals/> .

ex:scheme a skos:ConceptScheme ;
    dct:creator [ a dct:Agent ; dct:title "Editorial board" ] ;
    dct:language ( "en" "fr" ) .

ex:dog skos:inScheme ex:scheme ;
    skos:altLabel "hound"@en .
"#;

const DOG: &str = "http://example.org/animals/dog";
const MAMMAL: &str = "http://example.org/animals/mammal";
const ANIMAL: &str = "http://example.org/animals/animal";

fn write_vocabulary(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_turtle_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.ttl", ANIMALS_TTL);

    let store = ConceptStore::from_file(&path, StoreConfig::default())?;

    assert_eq!(store.concept_count(), 4);
    assert_eq!(store.concepts("Hound")?, vec![DOG.to_string()]);
    assert_eq!(store.concepts("domestic dog")?, vec![DOG.to_string()]);
    assert_eq!(store.hidden_labels(DOG)?, vec!["dgo".to_string()]);
    assert_eq!(store.broader_concepts(DOG)?, vec![MAMMAL.to_string()]);
    assert_eq!(
        store.broader_transitive_concepts(DOG)?,
        vec![MAMMAL.to_string(), ANIMAL.to_string()]
    );
    assert_eq!(store.related_labels_of(DOG)?, vec!["leash".to_string()]);
    Ok(())
}

#[test]
fn test_load_ntriples_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.nt", ANIMALS_NT);

    let store = ConceptStore::from_file(&path, StoreConfig::default())?;

    assert_eq!(store.alt_terms("dog")?, vec!["hound".to_string()]);
    assert_eq!(store.broader_labels(DOG)?, vec!["mammal".to_string()]);
    Ok(())
}

#[test]
fn test_load_rdf_xml_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.rdf", ANIMALS_RDF);

    let store = ConceptStore::from_file(&path, StoreConfig::default())?;

    assert_eq!(store.concept_count(), 2);
    assert_eq!(store.concepts("hound")?, vec![DOG.to_string()]);
    assert_eq!(store.pref_labels(DOG)?, vec!["dog".to_string(), "chien".to_string()]);
    assert_eq!(store.broader_labels(DOG)?, vec!["mammal".to_string()]);
    Ok(())
}

#[test]
fn test_turtle_with_anonymous_nodes_and_collections() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "scheme.ttl", SCHEME_TTL);

    let store = ConceptStore::from_file(&path, StoreConfig::default())?;

    assert_eq!(store.concept_count(), 1);
    assert_eq!(store.alt_labels(DOG)?, vec!["hound".to_string()]);
    assert!(store.concepts("Editorial board")?.is_empty());
    Ok(())
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.csv", "dog,hound");

    let error = ConceptStore::from_file(&path, StoreConfig::default()).unwrap_err();
    assert!(error.is_load_error());
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConceptStore::from_file(temp_dir.path().join("absent.ttl"), StoreConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_language_filter_from_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.ttl", ANIMALS_TTL);

    let french = ConceptStore::from_file(&path, StoreConfig::default().with_languages(["fr"]))?;

    assert_eq!(french.concepts("chien")?, vec![DOG.to_string()]);
    assert!(french.concepts("dog")?.is_empty());
    assert!(french.concepts("hound")?.is_empty());
    // untagged labels do not pass a language filter
    assert!(french.concepts("dgo")?.is_empty());
    Ok(())
}

#[test]
fn test_persisted_store_answers_like_the_source() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.ttl", ANIMALS_TTL);
    let store = ConceptStore::from_file(&path, StoreConfig::default())?;

    let storage = FileStorage::new(temp_dir.path().join("index"), StorageConfig::default())?;
    store.persist(&storage, "animals")?;
    let persisted = PersistedConceptStore::open(&storage, "animals")?;

    assert_eq!(persisted.concept_count(), store.concept_count());
    assert_eq!(persisted.label_count(), store.label_count());
    assert_eq!(persisted.max_pref_label_terms(), store.max_pref_label_terms());
    assert!(persisted.built_at().is_some());

    for text in ["dog", "hound", "domestic dog", "mammifère", "unknown"] {
        assert_eq!(persisted.concepts(text)?, store.concepts(text)?);
    }
    for concept in [DOG, MAMMAL, ANIMAL] {
        for skos_type in SkosType::ALL {
            assert_eq!(
                persisted.expansion_labels(concept, skos_type)?,
                store.expansion_labels(concept, skos_type)?
            );
        }
    }
    Ok(())
}

#[test]
fn test_cache_reuses_persisted_segment() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.ttl", ANIMALS_TTL);
    let index_dir = temp_dir.path().join("index");
    let config = StoreConfig::default().with_languages(["en"]);

    let cache = StoreCache::new();
    let first = cache.open_or_build_persisted(&index_dir, &path, &config)?;
    assert!(index_dir.join("animals.ttl-en").exists());

    let again = cache.open_or_build_persisted(&index_dir, &path, &config)?;
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(cache.len(), 1);

    // a fresh cache reopens the segment written by the first one
    let reopened = StoreCache::new().open_or_build_persisted(&index_dir, &path, &config)?;
    assert_eq!(reopened.concepts("hound")?, vec![DOG.to_string()]);
    assert!(reopened.concepts("chien")?.is_empty());
    Ok(())
}

#[test]
fn test_store_shared_across_threads() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = write_vocabulary(temp_dir.path(), "animals.ttl", ANIMALS_TTL);
    let store: Arc<dyn SkosEngine> =
        Arc::new(ConceptStore::from_file(&path, StoreConfig::default())?);
    let analyzer = Arc::new(SkosAnalyzer::new(
        Arc::clone(&store),
        SkosAnalyzerConfig::default().with_types(vec![SkosType::Alt]),
    )?);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || -> Result<Vec<String>> {
                let tokens: Vec<Token> = analyzer.analyze("a dog barks")?.collect();
                Ok(tokens.into_iter().map(|t| t.text).collect())
            })
        })
        .collect();

    for handle in handles {
        let texts = handle.join().unwrap()?;
        assert_eq!(texts, vec!["dog", "hound", "domestic dog", "barks"]);
    }
    Ok(())
}
