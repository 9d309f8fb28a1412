//! Query strings parsed through an expanding analyzer.

use std::sync::Arc;

use sarissa_skos::prelude::*;
use sarissa_skos::query::{BooleanQuery, TermQuery};

fn animal_parser(relation_boost: RelationBoost) -> Result<SkosQueryParser> {
    let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
    builder.add_label("ex:animal", LabelKind::Preferred, "animal", None);
    builder.add_label("ex:dog", LabelKind::Preferred, "dog", None);
    builder.add_label("ex:dog", LabelKind::Alternate, "hound", None);
    builder.add_relation("ex:dog", RelationKind::Broader, "ex:animal");
    let store: Arc<dyn SkosEngine> = Arc::new(builder.build());

    let config = SkosAnalyzerConfig::default().with_types(vec![
        SkosType::Pref,
        SkosType::Alt,
        SkosType::Broader,
    ]);
    let analyzer = SkosAnalyzer::new(store, config)?;
    Ok(SkosQueryParser::new(Arc::new(analyzer), "body").with_relation_boost(relation_boost))
}

#[test]
fn test_expansions_become_synonym_groups() -> Result<()> {
    let parser = animal_parser(RelationBoost::new())?;
    let query = parser.parse("barking dog")?;

    assert_eq!(
        query.description(),
        "(body:barking (body:dog body:hound body:animal))"
    );
    Ok(())
}

#[test]
fn test_relation_boost_reweights_expansions() -> Result<()> {
    let boost = RelationBoost::new()
        .with_boost(SkosType::Alt, 0.5)
        .with_boost(SkosType::Broader, 0.25);
    let parser = animal_parser(boost)?;
    let query = parser.parse("dog")?;

    assert_eq!(query.description(), "(body:dog body:hound^0.5 body:animal^0.25)");

    let group = query.as_any().downcast_ref::<BooleanQuery>().unwrap();
    let boosts: Vec<f32> = group.clauses().iter().map(|c| c.query.boost()).collect();
    assert_eq!(boosts, vec![1.0, 0.5, 0.25]);
    Ok(())
}

#[test]
fn test_single_unexpanded_word_is_a_term() -> Result<()> {
    let parser = animal_parser(RelationBoost::new())?;
    let query = parser.parse("cat")?;

    let term = query.as_any().downcast_ref::<TermQuery>().unwrap();
    assert_eq!(term.field(), "body");
    assert_eq!(query.description(), "body:cat");
    Ok(())
}

#[test]
fn test_quoted_input_is_a_phrase() -> Result<()> {
    let parser = animal_parser(RelationBoost::new())?;

    let plain = parser.parse("\"barking cat\"")?;
    assert_eq!(plain.description(), "body:\"barking cat\"");

    let expanded = parser.parse("\"barking dog\"")?;
    assert_eq!(expanded.description(), "body:\"barking (dog hound animal)\"");
    Ok(())
}

#[test]
fn test_phrase_keeps_gap_of_removed_stop_word() -> Result<()> {
    let parser = animal_parser(RelationBoost::new())?;

    let plain = parser.parse("\"lazy the cat\"")?;
    assert_eq!(plain.description(), "body:\"lazy ? cat\"");

    let expanded = parser.parse("\"lazy the dog\"")?;
    assert_eq!(expanded.description(), "body:\"lazy ? (dog hound animal)\"");
    Ok(())
}

#[test]
fn test_parse_other_field() -> Result<()> {
    let parser = animal_parser(RelationBoost::new())?;
    let query = parser.parse_field("title", "cat")?;
    assert_eq!(query.description(), "title:cat");
    Ok(())
}
