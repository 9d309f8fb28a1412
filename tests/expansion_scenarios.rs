//! End-to-end expansion scenarios over in-memory stores.

use std::io::Cursor;
use std::sync::Arc;

use sarissa_skos::analysis::analyzer::{Analyzer, SkosAnalyzer, SkosAnalyzerConfig};
use sarissa_skos::analysis::token::{Token, TokenStream};
use sarissa_skos::analysis::token_filter::{Filter, SkosLabelFilter};
use sarissa_skos::prelude::*;
use sarissa_skos::rdf::RdfFormat;

fn stream(words: &[&str]) -> TokenStream {
    let mut offset = 0;
    let tokens: Vec<Token> = words
        .iter()
        .enumerate()
        .map(|(position, word)| {
            let token = Token::with_offsets(*word, position, offset, offset + word.len());
            offset += word.len() + 1;
            token
        })
        .collect();
    Box::new(tokens.into_iter())
}

fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn test_scenario_alternate_labels() -> Result<()> {
    let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
    builder.add_label("ex:1", LabelKind::Preferred, "jumps", None);
    builder.add_label("ex:1", LabelKind::Alternate, "leaps", None);
    builder.add_label("ex:1", LabelKind::Alternate, "hops", None);
    let store: Arc<dyn SkosEngine> = Arc::new(builder.build());

    let filter = SkosLabelFilter::new(store)
        .with_types(vec![SkosType::Alt])
        .with_buffer_size(1)?;
    let tokens: Vec<Token> = filter.filter(stream(&["jumps"]))?.collect();

    assert_eq!(texts(&tokens), vec!["jumps", "leaps", "hops"]);
    assert!(tokens.iter().all(|t| t.position == 0));
    Ok(())
}

#[test]
fn test_scenario_widest_window() -> Result<()> {
    let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
    builder.add_label("ex:7", LabelKind::Preferred, "lazy dog", None);
    builder.add_label("ex:7", LabelKind::Alternate, "odie", None);
    builder.add_label("ex:4", LabelKind::Preferred, "lazy", None);
    builder.add_label("ex:4", LabelKind::Alternate, "idle", None);
    let store: Arc<dyn SkosEngine> = Arc::new(builder.build());

    let filter = SkosLabelFilter::new(store)
        .with_types(vec![SkosType::Pref, SkosType::Alt])
        .with_buffer_size(2)?;
    let tokens: Vec<Token> = filter.filter(stream(&["lazy", "dog"]))?.collect();

    // only ex:7 is expanded; its preferred label repeats the window and is skipped
    assert_eq!(texts(&tokens), vec!["lazy", "odie", "dog"]);
    assert_eq!(tokens.iter().filter(|t| t.text == "lazy").count(), 1);
    assert_eq!(tokens.iter().filter(|t| t.text == "dog").count(), 1);
    assert!(!tokens.iter().any(|t| t.text == "idle"));

    let dog = tokens.iter().find(|t| t.text == "dog").unwrap();
    assert_eq!(dog.position, 1);
    assert_eq!(dog.position_increment, 1);
    Ok(())
}

#[test]
fn test_scenario_unknown_label() -> Result<()> {
    let store = ConceptStoreBuilder::new(StoreConfig::default()).build();
    assert!(store.concepts("nonexistent")?.is_empty());
    assert!(store.labels("ex:missing", LabelKind::Preferred)?.is_empty());
    assert!(store.related_labels("ex:missing", RelationKind::Narrower)?.is_empty());
    Ok(())
}

#[test]
fn test_scenario_language_filter() -> Result<()> {
    let turtle = r#"
        @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
        @prefix ex: <http://example.org/> .

        ex:dog skos:prefLabel "dog"@en , "chien"@fr ;
               skos:altLabel "hound"@en .
    "#;

    let config = StoreConfig::default().with_languages(["en"]);
    let store = ConceptStore::from_reader(&mut Cursor::new(turtle), RdfFormat::Turtle, config)?;

    assert_eq!(store.concepts("dog")?, vec!["http://example.org/dog".to_string()]);
    assert!(store.concepts("chien")?.is_empty());
    assert_eq!(store.pref_labels("http://example.org/dog")?, vec!["dog".to_string()]);
    Ok(())
}

#[test]
fn test_expansions_share_anchor_position() -> Result<()> {
    let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
    builder.add_label("ex:1", LabelKind::Preferred, "jumps", None);
    builder.add_label("ex:1", LabelKind::Alternate, "leaps", None);
    builder.add_label("ex:2", LabelKind::Preferred, "fox", None);
    builder.add_label("ex:2", LabelKind::Hidden, "foxx", None);
    let store: Arc<dyn SkosEngine> = Arc::new(builder.build());

    let config = SkosAnalyzerConfig::default().with_types(vec![SkosType::Alt, SkosType::Hidden]);
    let analyzer = SkosAnalyzer::new(store, config)?;
    let tokens: Vec<Token> = analyzer.analyze("The quick fox jumps over")?.collect();

    let mut anchor = None;
    for token in &tokens {
        if token.is_expansion() {
            assert_eq!(token.position_increment, 0);
            assert_eq!(Some(token.position), anchor);
        } else {
            anchor = Some(token.position);
        }
    }

    // the literal phrase and the expanded phrase occupy the same positions
    let position_of = |text: &str| tokens.iter().find(|t| t.text == text).map(|t| t.position);
    assert_eq!(position_of("fox"), position_of("foxx"));
    assert_eq!(position_of("jumps"), position_of("leaps"));
    assert_eq!(position_of("leaps").unwrap(), position_of("foxx").unwrap() + 1);
    Ok(())
}

#[test]
fn test_pref_label_round_trip() -> Result<()> {
    let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
    for (id, label) in [("ex:a", "Animal"), ("ex:b", "Big Cat"), ("ex:c", "cat")] {
        builder.add_label(id, LabelKind::Preferred, label, None);
    }
    let store = builder.build();

    for id in ["ex:a", "ex:b", "ex:c"] {
        for label in store.pref_labels(id)? {
            assert!(store.concepts(&label)?.contains(&id.to_string()));
        }
    }
    Ok(())
}

#[test]
fn test_related_labels_is_union_of_related_concepts() -> Result<()> {
    let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
    builder.add_label("ex:animal", LabelKind::Preferred, "animal", None);
    builder.add_label("ex:dog", LabelKind::Preferred, "dog", None);
    builder.add_label("ex:dog", LabelKind::Alternate, "hound", None);
    builder.add_label("ex:dog", LabelKind::Hidden, "dgo", None);
    builder.add_label("ex:cat", LabelKind::Preferred, "cat", None);
    builder.add_relation("ex:animal", RelationKind::Narrower, "ex:dog");
    builder.add_relation("ex:animal", RelationKind::Narrower, "ex:cat");
    let store = builder.build();

    for concept in ["ex:animal", "ex:dog", "ex:cat"] {
        let mut expected = Vec::new();
        for related in store.related_concepts(concept, RelationKind::Narrower)? {
            expected.extend(store.labels(&related, LabelKind::Preferred)?);
            expected.extend(store.labels(&related, LabelKind::Alternate)?);
        }
        assert_eq!(store.related_labels(concept, RelationKind::Narrower)?, expected);
    }

    assert_eq!(
        store.narrower_labels("ex:animal")?,
        vec!["dog".to_string(), "hound".to_string(), "cat".to_string()]
    );
    Ok(())
}

#[test]
fn test_repeated_queries_are_stable() -> Result<()> {
    let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
    builder.add_label("ex:1", LabelKind::Preferred, "bank", None);
    builder.add_label("ex:2", LabelKind::Alternate, "Bank", None);
    let store = builder.build();

    let first = store.concepts("BANK")?;
    assert_eq!(first.len(), 2);
    assert_eq!(store.concepts("bank")?, first);
    Ok(())
}
