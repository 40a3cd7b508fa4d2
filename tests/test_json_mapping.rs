mod fixtures;

use fixtures::*;

use pretty_assertions::assert_eq;
use pubwire::model::{Contributor, Link, Metadata, OpdsFeed, OpdsLink, Publication};
use pubwire::{Mapper, MapperSettings, MappingError, OneOrMany};
use serde_json::json;

fn contributor(name: &str, role: &str) -> Contributor {
    Contributor {
        name: Some(name.to_owned()),
        role: Some(role.to_owned()),
        ..Default::default()
    }
}

#[test]
fn test_imprint_array_keeps_order_and_shape() {
    ensure_env_logger_initialized();
    let mapper = Mapper::new();
    let wire = json!({"imprint": [
        {"name": "theName1", "role": "theRole1"},
        {"name": "theName2", "role": "theRole2"},
    ]});

    let mapped = mapper.deserialize::<Metadata>(&wire).unwrap();
    assert!(mapped.is_clean());
    assert_eq!(
        mapped.value.imprint,
        vec![
            contributor("theName1", "theRole1"),
            contributor("theName2", "theRole2")
        ]
    );

    let json = mapper.serialize(&mapped.value).unwrap().value;
    assert_eq!(json, wire);
}

#[test]
fn test_single_imprint_collapses_to_bare_object() {
    ensure_env_logger_initialized();
    let mapper = Mapper::new();
    let wire = json!({"imprint": [{"name": "theName1", "role": "theRole1"}]});

    let metadata = mapper.deserialize::<Metadata>(&wire).unwrap().value;
    assert_eq!(metadata.imprint, vec![contributor("theName1", "theRole1")]);

    let json = mapper.serialize(&metadata).unwrap().value;
    assert_eq!(
        json,
        json!({"imprint": {"name": "theName1", "role": "theRole1"}})
    );
}

#[test]
fn test_bare_name_projects_into_contributor() {
    ensure_env_logger_initialized();
    let metadata = Mapper::new()
        .deserialize::<Metadata>(&json!({"imprint": "theName2"}))
        .unwrap()
        .value;

    assert_eq!(metadata.imprint, vec![Contributor::named("theName2")]);
    assert_eq!(metadata.imprint[0].role, None);
}

#[test]
fn test_single_item_arrays_can_be_kept() {
    let mapper = Mapper::new()
        .with_configuration(MapperSettings::new().collapse_single_item_collections(false));

    let metadata = Metadata {
        imprint: vec![contributor("theName1", "theRole1")],
        language: vec!["en".to_owned()],
        ..Default::default()
    };

    let json = mapper.serialize(&metadata).unwrap().value;
    assert_eq!(
        json,
        json!({
            "imprint": [{"name": "theName1", "role": "theRole1"}],
            "language": ["en"],
        })
    );
}

#[test]
fn test_context_accepts_one_or_many() {
    let mapper = Mapper::new();

    let single = mapper
        .deserialize::<Publication>(&json!({"@context": "http://context1"}))
        .unwrap()
        .value;
    assert_eq!(single.context, vec!["http://context1".to_owned()]);

    let many = mapper
        .deserialize::<Publication>(&json!({"@context": ["http://context1", "http://context2"]}))
        .unwrap()
        .value;
    assert_eq!(
        mapper.serialize(&many).unwrap().value,
        json!({"@context": ["http://context1", "http://context2"]})
    );
    assert_eq!(
        mapper.serialize(&single).unwrap().value,
        json!({"@context": "http://context1"})
    );
}

#[test]
fn test_rel_shape_follows_merges() {
    ensure_env_logger_initialized();
    let mapper = Mapper::new();

    let mut link = mapper
        .deserialize::<OpdsLink>(&json!({
            "href": "http://example.com/parent",
            "rel": "rel1",
            "children": [
                {"href": "http://example.com/child", "rel": ["rel1", "rel2"]}
            ]
        }))
        .unwrap()
        .value;

    assert_eq!(link.rel, OneOrMany::One("rel1".to_owned()));
    assert_eq!(link.children[0].rel.len(), 2);

    let json = mapper.serialize(&link).unwrap().value;
    assert_eq!(json["rel"], json!("rel1"));
    assert_eq!(json["children"]["rel"], json!(["rel1", "rel2"]));

    link.add_rel("rel2");
    let json = mapper.serialize(&link).unwrap().value;
    assert_eq!(json["rel"], json!(["rel1", "rel2"]));

    let child = mapper
        .deserialize::<OpdsLink>(&json["children"])
        .unwrap()
        .value;
    assert_eq!(child, link.children[0]);
}

#[test]
fn test_one_element_rel_list_collapses_on_read() {
    let link = Mapper::new()
        .deserialize::<Link>(&json!({"href": "c1.html", "rel": ["next"]}))
        .unwrap()
        .value;
    assert_eq!(link.rel, OneOrMany::One("next".to_owned()));
}

#[test]
fn test_field_errors_do_not_abort_the_document() {
    ensure_env_logger_initialized();
    let wire = json!({
        "title": "Moby-Dick",
        "imprint": [{"name": 3, "role": "theRole1"}],
        "language": ["en", 5],
        "duration": "long",
    });

    let mapped = Mapper::new().deserialize::<Metadata>(&wire).unwrap();
    let paths: Vec<_> = mapped.issues.iter().map(|issue| issue.path.as_str()).collect();
    assert_eq!(paths, vec!["$.imprint[0].name", "$.language[1]", "$.duration"]);
    assert!(
        mapped
            .issues
            .iter()
            .all(|issue| matches!(issue.error, MappingError::Coercion { .. }))
    );

    let metadata = mapped.value;
    assert_eq!(metadata.title.as_deref(), Some("Moby-Dick"));
    assert_eq!(metadata.imprint[0].role.as_deref(), Some("theRole1"));
    assert!(metadata.language.is_empty());
    assert_eq!(metadata.duration, None);
}

#[test]
fn test_object_from_primitive_without_projection_is_reported() {
    let wire = json!({"spine": [{"href": "c1.html", "properties": "fixed"}]});
    let mapped = Mapper::new().deserialize::<Publication>(&wire).unwrap();

    assert_eq!(mapped.issues.len(), 1);
    assert_eq!(mapped.issues[0].path, "$.spine[0].properties");
    assert!(matches!(
        mapped.issues[0].error,
        MappingError::IncompatibleShape {
            type_name: "Properties",
            ..
        }
    ));
    assert_eq!(mapped.value.spine[0].href.as_deref(), Some("c1.html"));
}

#[test]
fn test_missing_required_field_is_reported() {
    let wire = json!({"spine": [{"title": "Untitled"}]});
    let mapped = Mapper::new().deserialize::<Publication>(&wire).unwrap();

    assert_eq!(mapped.issues.len(), 1);
    assert_eq!(mapped.issues[0].path, "$.spine[0]");
    assert!(matches!(
        mapped.issues[0].error,
        MappingError::MissingRequiredField {
            type_name: "Link",
            wire_key: "href"
        }
    ));
    assert_eq!(mapped.value.spine.len(), 1);
}

#[test]
fn test_malformed_roots_are_fatal() {
    let mapper = Mapper::new();

    assert!(matches!(
        mapper.deserialize_str::<Publication>("[1, 2]"),
        Err(MappingError::MalformedInput {
            type_name: "Publication",
            ..
        })
    ));
    assert!(matches!(
        mapper.deserialize_str::<Publication>("{\"metadata\": "),
        Err(MappingError::Json(_))
    ));
}

#[test]
fn test_unknown_keys_and_nulls_are_absent() {
    let mapped = Mapper::new()
        .deserialize::<Link>(&json!({"href": "c1.html", "title": null, "x-vendor": {"a": 1}}))
        .unwrap();

    assert!(mapped.is_clean());
    assert_eq!(mapped.value, Link::new("c1.html"));
}

#[test]
fn test_depth_guard() {
    let wire = json!({
        "href": "1",
        "children": {"href": "2", "children": {"href": "3"}}
    });

    let shallow = Mapper::new().with_configuration(MapperSettings::new().max_depth(2));
    let mapped = shallow.deserialize::<Link>(&wire).unwrap();
    assert_eq!(mapped.issues.len(), 1);
    assert_eq!(mapped.issues[0].path, "$.children[0].children[0]");
    assert!(matches!(
        mapped.issues[0].error,
        MappingError::DepthLimitExceeded { max_depth: 2 }
    ));
    assert_eq!(mapped.value.children[0].href.as_deref(), Some("2"));
    assert!(mapped.value.children[0].children.is_empty());

    let none = Mapper::new().with_configuration(MapperSettings::new().max_depth(0));
    assert!(matches!(
        none.deserialize::<Link>(&wire),
        Err(MappingError::DepthLimitExceeded { max_depth: 0 })
    ));
}

#[test]
fn test_manifest_sample_roundtrips() {
    ensure_env_logger_initialized();
    let mapper = Mapper::new();
    let text = read_sample(publication_sample());

    let first = mapper.deserialize_str::<Publication>(&text).unwrap();
    assert!(first.is_clean(), "{:?}", first.issues);

    let publication = &first.value;
    let metadata = publication.metadata.as_ref().unwrap();
    assert_eq!(metadata.author, vec![Contributor::named("Herman Melville")]);
    assert_eq!(metadata.subject.len(), 2);
    assert_eq!(
        metadata.published.map(|published| published.to_string()),
        Some("1851-10-18T00:00:00Z".to_owned())
    );
    assert_eq!(publication.cover().and_then(|link| link.width), Some(400));
    assert!(publication.has_media_overlay());
    assert_eq!(publication.toc[0].children.len(), 1);

    let json = mapper.serialize(publication).unwrap();
    assert!(json.is_clean());
    assert_eq!(json.value["links"][1]["rel"], json!(["search", "alternate"]));

    let second = mapper.deserialize::<Publication>(&json.value).unwrap();
    assert_eq!(&second.value, publication);
}

#[test]
fn test_opds2_feed_sample() {
    ensure_env_logger_initialized();
    let text = read_sample(opds2_feed_sample());
    let mapped = pubwire::from_json::<OpdsFeed>(&text).unwrap();
    assert!(mapped.is_clean(), "{:?}", mapped.issues);

    let feed = mapped.value;
    assert_eq!(feed.context, vec!["http://opds-spec.org/opds.jsonld".to_owned()]);
    assert_eq!(feed.metadata.as_ref().and_then(|m| m.number_of_items), Some(2));
    assert!(feed.links[1].has_rel("search"));
    assert_eq!(feed.publications.len(), 1);

    let borrow = &feed.groups[0].navigation[0];
    let properties = borrow.properties.as_ref().unwrap();
    assert_eq!(properties.price.as_ref().and_then(|p| p.value), Some(2.99));
    assert_eq!(
        properties.indirect_acquisition[0].children[0]
            .type_acquisition
            .as_deref(),
        Some("application/epub+zip")
    );
    assert_eq!(borrow.children[0].rel.len(), 2);
}

#[test]
fn test_serialized_link_snapshot() {
    let mut link = Link::new("chapter1.html");
    link.type_link = Some("text/html".to_owned());
    link.add_rels(["next", "alternate"]);

    let json = pubwire::to_json(&link).unwrap().value;
    insta::assert_json_snapshot!(json, @r###"
    {
      "href": "chapter1.html",
      "type": "text/html",
      "rel": [
        "next",
        "alternate"
      ]
    }
    "###);
}

#[test]
fn test_empty_rel_list_stays_empty_and_is_omitted() {
    let mapper = Mapper::new();
    let mapped = mapper
        .deserialize::<Link>(&json!({"href": "a", "rel": []}))
        .unwrap();
    assert!(mapped.is_clean(), "{:?}", mapped.issues);
    assert_eq!(mapped.value.rel, OneOrMany::Many(vec![]));

    let json = mapper.serialize(&mapped.value).unwrap();
    assert!(json.is_clean());
    assert_eq!(json.value, json!({"href": "a"}));
}
