mod fixtures;

use fixtures::*;

use indoc::indoc;
use pretty_assertions::assert_eq;
use pubwire::model::Smil;
use pubwire::model::opds1::{Author, Entry, Feed, IndirectAcquisition};
use pubwire::{Mapper, MapperSettings, MappingError};

fn acquisition(media_type: &str, children: Vec<IndirectAcquisition>) -> IndirectAcquisition {
    IndirectAcquisition {
        type_acquisition: Some(media_type.to_owned()),
        children,
    }
}

#[test]
fn test_opds1_feed_sample() {
    ensure_env_logger_initialized();
    let text = read_sample(opds1_feed_sample());
    let mapped = Mapper::new().deserialize_xml::<Feed>(&text).unwrap();
    assert!(mapped.is_clean(), "{:?}", mapped.issues);

    let feed = mapped.value;
    assert_eq!(feed.title.as_deref(), Some("Unpopular Publications"));
    assert_eq!(
        feed.updated.map(|updated| updated.to_string()),
        Some("2010-01-10T10:01:11Z".to_owned())
    );
    assert_eq!(feed.total_results, Some(2));
    assert_eq!(feed.items_per_page, Some(25));
    assert_eq!(
        feed.authors,
        vec![Author {
            name: Some("Spec Writer".to_owned()),
            uri: Some("http://opds-spec.org".to_owned()),
        }]
    );

    assert_eq!(feed.links.len(), 3);
    let facet = &feed.links[2];
    assert_eq!(facet.count, Some(42));
    assert_eq!(facet.facet_group.as_deref(), Some("Genre"));
    assert_eq!(facet.active_facet, Some(true));

    assert_eq!(feed.entries.len(), 2);
    let bob = &feed.entries[0];
    assert_eq!(bob.language, vec!["en".to_owned()]);
    assert_eq!(bob.issued.as_deref(), Some("1917"));
    assert_eq!(bob.publishers[0].name.as_deref(), Some("Harper & Brothers"));
    assert_eq!(bob.categories[0].label.as_deref(), Some("Men's Adventure"));

    let prices: Vec<_> = bob.links[1]
        .prices
        .iter()
        .map(|price| (price.currency_code.as_deref(), price.value))
        .collect();
    assert_eq!(prices, vec![(Some("USD"), Some(18.99)), (Some("GBP"), Some(11.99))]);

    let philately = &feed.entries[1];
    assert_eq!(philately.authors.len(), 2);
    assert_eq!(
        philately.content.as_deref(),
        Some("The definitive reference for the web-curious philatelist.")
    );
}

#[test]
fn test_indirect_acquisitions_nest() {
    let text = read_sample(opds1_feed_sample());
    let feed = pubwire::from_xml::<Feed>(&text).unwrap().value;

    assert_eq!(
        feed.entries[1].links[0].indirect_acquisitions,
        vec![acquisition(
            "application/vnd.adobe.adept+xml",
            vec![
                acquisition("application/epub+zip", vec![]),
                acquisition("application/pdf", vec![]),
            ]
        )]
    );
}

#[test]
fn test_feed_serializes_to_json() {
    let text = read_sample(opds1_feed_sample());
    let mapper = Mapper::new();
    let feed = mapper.deserialize_xml::<Feed>(&text).unwrap().value;

    let json = mapper.serialize(&feed).unwrap().value;
    assert_eq!(json["author"]["name"], "Spec Writer");
    assert_eq!(json["entry"][0]["publisher"]["name"], "Harper & Brothers");
    assert_eq!(json["entry"][0]["language"], "en");
    assert_eq!(json["link"][2]["activeFacet"], true);
}

#[test]
fn test_bad_values_are_reported_per_field() {
    ensure_env_logger_initialized();
    let xml = indoc! {r#"
        <feed xmlns="http://www.w3.org/2005/Atom"
              xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
            <title>Catalog</title>
            <opensearch:totalResults>many</opensearch:totalResults>
            <link rel="start"/>
        </feed>
    "#};

    let mapped = Mapper::new().deserialize_xml::<Feed>(xml).unwrap();
    let paths: Vec<_> = mapped.issues.iter().map(|issue| issue.path.as_str()).collect();
    assert_eq!(paths, vec!["$.link[0]", "$.totalResults"]);
    assert!(matches!(
        mapped.issues[0].error,
        MappingError::MissingRequiredField {
            wire_key: "href",
            ..
        }
    ));
    assert!(matches!(
        mapped.issues[1].error,
        MappingError::Coercion { .. }
    ));

    assert_eq!(mapped.value.title.as_deref(), Some("Catalog"));
    assert_eq!(mapped.value.total_results, None);
    assert_eq!(mapped.value.links[0].rel.as_deref(), Some("start"));
}

#[test]
fn test_smil_sample() {
    ensure_env_logger_initialized();
    let text = read_sample(smil_sample());
    let mapped = Mapper::new().deserialize_xml::<Smil>(&text).unwrap();
    assert!(mapped.is_clean(), "{:?}", mapped.issues);

    let smil = mapped.value;
    assert_eq!(smil.version.as_deref(), Some("3.0"));

    let body = smil.body.unwrap();
    assert_eq!(body.seqs.len(), 1);
    let chapter = &body.seqs[0];
    assert_eq!(chapter.text_ref.as_deref(), Some("c001.html"));
    assert_eq!(chapter.epub_type.as_deref(), Some("bodymatter chapter"));
    assert_eq!(chapter.seqs[0].id.as_deref(), Some("id2"));

    let ids: Vec<_> = body
        .pars_in_order()
        .into_iter()
        .filter_map(|par| par.id.as_deref())
        .collect();
    assert_eq!(ids, vec!["heading1", "para1", "para2", "para3"]);

    let last = body.pars_in_order()[3];
    let audio = last.audio.as_ref().unwrap();
    assert_eq!(audio.clip_begin.as_deref(), Some("0:01:30.000"));
    assert_eq!(audio.clip_end.as_deref(), Some("0:02:10.400"));
    assert_eq!(
        last.text.as_ref().and_then(|text| text.src.as_deref()),
        Some("c001.html#c01p0003")
    );
}

#[test]
fn test_root_element_must_match() {
    let smil = read_sample(smil_sample());
    assert!(matches!(
        Mapper::new().deserialize_xml::<Feed>(&smil),
        Err(MappingError::MalformedInput {
            type_name: "Feed",
            ..
        })
    ));

    let unqualified = "<feed><title>No namespace</title></feed>";
    assert!(matches!(
        Mapper::new().deserialize_xml::<Feed>(unqualified),
        Err(MappingError::MalformedInput { .. })
    ));
}

#[test]
fn test_document_depth_is_bounded() {
    let text = read_sample(smil_sample());
    let shallow = Mapper::new().with_configuration(MapperSettings::new().max_depth(3));
    assert!(matches!(
        shallow.deserialize_xml::<Smil>(&text),
        Err(MappingError::DepthLimitExceeded { max_depth: 3 })
    ));
}

#[test]
fn test_broken_xml_is_fatal() {
    let result = Mapper::new().deserialize_xml::<Smil>("<smil xmlns=\"http://www.w3.org/ns/SMIL\"><body></smil>");
    assert!(matches!(result, Err(MappingError::Xml(_))));
}

#[test]
fn test_trimming_applies_to_text_but_not_attributes() {
    let xml = indoc! {r#"
        <entry xmlns="http://www.w3.org/2005/Atom">
            <title>  Padded Title  </title>
            <category term=" fiction " label="Fiction"/>
        </entry>
    "#};

    let entry = Mapper::new().deserialize_xml::<Entry>(xml).unwrap().value;
    assert_eq!(entry.title.as_deref(), Some("Padded Title"));
    assert_eq!(entry.categories[0].term.as_deref(), Some(" fiction "));

    let untrimmed = Mapper::new()
        .with_configuration(MapperSettings::new().trim_xml_text(false))
        .deserialize_xml::<Entry>(xml)
        .unwrap()
        .value;
    assert_eq!(untrimmed.title.as_deref(), Some("  Padded Title  "));
    assert_eq!(untrimmed.categories[0].term.as_deref(), Some(" fiction "));
}
