//! Integration tests for the recursive field materializer: per-type
//! dispatch, composite recursion, silent drops, and the all-or-nothing
//! failure contract.

use serde_json::json;

use fieldstone::{
    ContentError, ContentField, ContentModel, ContentType, Field, FieldType, Materializer,
};

/// A content model exercising the full field taxonomy.
fn news_model() -> ContentModel {
    ContentModel::new("site").with_content_type(
        ContentType::new("news")
            .with_field(Field::new("title", FieldType::Text))
            .with_field(Field::new("summary", FieldType::PlainText))
            .with_field(Field::new("body", FieldType::RichText))
            .with_field(Field::new("views", FieldType::Number))
            .with_field(Field::new("published", FieldType::Date))
            .with_field(Field::new("updated_at", FieldType::DateTime))
            .with_field(Field::new("featured", FieldType::Boolean))
            .with_field(Field::new("hero", FieldType::Image))
            .with_field(Field::new("author", FieldType::Relation))
            .with_field(
                Field::new("team", FieldType::Array)
                    .with_child(Field::new("member", FieldType::Text))
                    .with_child(Field::new("role", FieldType::Text)),
            ),
    )
}

fn news_materializer() -> Materializer {
    let mut materializer = Materializer::new(news_model());
    materializer.set_content_type("news").unwrap();
    materializer
}

mod leaf_dispatch {
    use super::*;

    #[test]
    fn every_leaf_type_wraps_its_value() {
        let materializer = news_materializer();
        let page = materializer
            .create_page(&json!({
                "title": "Launch day",
                "summary": "Short version",
                "body": "<p>Long version</p>",
                "views": 41,
                "published": "2024-03-01",
                "updated_at": "2024-03-01T09:30:00+00:00",
                "featured": true,
                "hero": {"url": "/img/launch.jpg", "title": "Launch"},
                "author": "authors/12"
            }))
            .unwrap();

        assert!(matches!(
            page.field("title"),
            Some(ContentField::Text { value, .. }) if value == "Launch day"
        ));
        assert!(matches!(
            page.field("summary"),
            Some(ContentField::PlainText { value, .. }) if value == "Short version"
        ));
        assert!(matches!(
            page.field("body"),
            Some(ContentField::RichText { value, .. }) if value == "<p>Long version</p>"
        ));
        assert!(matches!(
            page.field("views"),
            Some(ContentField::Number { value, .. }) if *value == 41.0
        ));
        assert!(matches!(
            page.field("featured"),
            Some(ContentField::Boolean { value: true, .. })
        ));
        assert!(matches!(page.field("published"), Some(ContentField::Date { .. })));
        assert!(matches!(page.field("updated_at"), Some(ContentField::DateTime { .. })));

        match page.field("hero") {
            Some(ContentField::Image { asset, .. }) => {
                assert_eq!(asset.url(), Some("/img/launch.jpg"));
                assert_eq!(asset.title(), Some("Launch"));
            }
            other => panic!("expected image field, got {:?}", other),
        }
        match page.field("author") {
            Some(ContentField::Relation { reference, .. }) => {
                assert_eq!(reference, &json!("authors/12"));
            }
            other => panic!("expected relation field, got {:?}", other),
        }
    }

    #[test]
    fn the_asset_family_wraps_metadata_verbatim() {
        let model = ContentModel::new("site").with_content_type(
            ContentType::new("press_kit")
                .with_field(Field::new("logo", FieldType::Asset))
                .with_field(Field::new("jingle", FieldType::Audio))
                .with_field(Field::new("reel", FieldType::Video))
                .with_field(Field::new("factsheet", FieldType::Document)),
        );
        let mut materializer = Materializer::new(model);
        materializer.set_content_type("press_kit").unwrap();

        let page = materializer
            .create_page(&json!({
                "logo": {"url": "/logo.svg"},
                "jingle": {"url": "/jingle.mp3", "filesize": 2048},
                "reel": {"url": "/reel.mp4"},
                "factsheet": {"url": "/facts.pdf", "title": "Facts"}
            }))
            .unwrap();

        assert!(matches!(page.field("logo"), Some(ContentField::Asset { .. })));
        assert!(matches!(page.field("jingle"), Some(ContentField::Audio { .. })));
        assert!(matches!(page.field("reel"), Some(ContentField::Video { .. })));
        match page.field("factsheet") {
            Some(ContentField::Document { asset, .. }) => {
                assert_eq!(asset.title(), Some("Facts"));
            }
            other => panic!("expected document field, got {:?}", other),
        }
    }

    #[test]
    fn numeric_strings_are_accepted_as_numbers() {
        let materializer = news_materializer();
        let page = materializer.create_page(&json!({"views": "17"})).unwrap();
        assert!(matches!(
            page.field("views"),
            Some(ContentField::Number { value, .. }) if *value == 17.0
        ));
    }

    #[test]
    fn node_name_always_matches_the_schema_field() {
        let materializer = news_materializer();
        let page = materializer
            .create_page(&json!({"title": "x", "views": 1}))
            .unwrap();
        for field in page.content() {
            assert!(materializer
                .content_type()
                .unwrap()
                .field(field.name())
                .is_some());
        }
    }
}

mod silent_drops {
    use super::*;

    #[test]
    fn missing_keys_produce_no_entry() {
        let materializer = news_materializer();
        let page = materializer.create_page(&json!({"title": "only"})).unwrap();
        assert_eq!(page.content().len(), 1);
        assert!(page.field("views").is_none());
    }

    #[test]
    fn unrecognized_field_type_is_dropped() {
        let model = ContentModel::new("site").with_content_type(
            ContentType::new("place")
                .with_field(Field::new("name", FieldType::Text))
                .with_field(Field::new("point", FieldType::Unknown("geo_point".into()))),
        );
        let mut materializer = Materializer::new(model);
        materializer.set_content_type("place").unwrap();

        let page = materializer
            .create_page(&json!({"name": "Depot", "point": {"lat": 1, "lng": 2}}))
            .unwrap();
        assert!(page.field("name").is_some());
        assert!(page.field("point").is_none());
    }

    #[test]
    fn non_sequence_value_drops_an_array_field() {
        let materializer = news_materializer();
        let page = materializer
            .create_page(&json!({"title": "ok", "team": "not a list"}))
            .unwrap();
        assert!(page.field("title").is_some());
        assert!(page.field("team").is_none());
    }
}

mod composite_recursion {
    use super::*;

    #[test]
    fn array_rows_materialize_in_order_with_missing_keys_skipped() {
        let materializer = news_materializer();
        let page = materializer
            .create_page(&json!({
                "team": [
                    {"member": "Ada", "role": "editor"},
                    {"member": "Grace"}
                ]
            }))
            .unwrap();

        let Some(ContentField::Array { rows, .. }) = page.field("team") else {
            panic!("expected array field");
        };
        assert_eq!(rows.len(), 2);
        assert!(rows[0].get("member").is_some());
        assert!(rows[0].get("role").is_some());
        assert!(rows[1].get("member").is_some());
        assert!(rows[1].get("role").is_none());
    }

    #[test]
    fn component_fields_materialize_into_one_nested_collection() {
        let model = ContentModel::new("site").with_content_type(
            ContentType::new("page").with_field(
                Field::new("cta", FieldType::Component)
                    .with_child(Field::new("label", FieldType::Text))
                    .with_child(Field::new("target", FieldType::Text)),
            ),
        );
        let mut materializer = Materializer::new(model);
        materializer.set_content_type("page").unwrap();

        let page = materializer
            .create_page(&json!({"cta": {"label": "Read more", "target": "/news"}}))
            .unwrap();
        let Some(ContentField::Component { fields, .. }) = page.field("cta") else {
            panic!("expected component field");
        };
        assert_eq!(fields.len(), 2);

        // A non-object payload drops the component, not the record.
        let page = materializer.create_page(&json!({"cta": "nope"})).unwrap();
        assert!(page.field("cta").is_none());
    }

    #[test]
    fn flexible_content_materializes_like_an_array() {
        let model = ContentModel::new("site").with_content_type(
            ContentType::new("page").with_field(
                Field::new("blocks", FieldType::FlexibleContent)
                    .with_child(Field::new("heading", FieldType::Text))
                    .with_child(Field::new("body", FieldType::RichText)),
            ),
        );
        let mut materializer = Materializer::new(model);
        materializer.set_content_type("page").unwrap();

        let page = materializer
            .create_page(&json!({
                "blocks": [
                    {"heading": "One"},
                    {"heading": "Two", "body": "<p>x</p>"}
                ]
            }))
            .unwrap();
        let Some(ContentField::FlexibleContent { rows, .. }) = page.field("blocks") else {
            panic!("expected flexible content field");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 2);
    }

    #[test]
    fn nested_arrays_recurse() {
        let model = ContentModel::new("site").with_content_type(
            ContentType::new("page").with_field(
                Field::new("sections", FieldType::Array).with_child(
                    Field::new("links", FieldType::Array)
                        .with_child(Field::new("url", FieldType::Text)),
                ),
            ),
        );
        let mut materializer = Materializer::new(model);
        materializer.set_content_type("page").unwrap();

        let page = materializer
            .create_page(&json!({
                "sections": [
                    {"links": [{"url": "/a"}, {"url": "/b"}]}
                ]
            }))
            .unwrap();
        let Some(ContentField::Array { rows, .. }) = page.field("sections") else {
            panic!("expected array field");
        };
        let Some(ContentField::Array { rows: links, .. }) = rows[0].get("links") else {
            panic!("expected nested array field");
        };
        assert_eq!(links.len(), 2);
    }
}

mod failure_isolation {
    use super::*;

    #[test]
    fn constructor_failure_aborts_the_whole_record() {
        let materializer = news_materializer();
        let err = materializer
            .create_page(&json!({
                "title": "fine",
                "published": "not-a-date"
            }))
            .unwrap_err();

        match err {
            ContentError::Field {
                name,
                field_type,
                content,
                trace,
                ..
            } => {
                assert_eq!(name, "published");
                assert_eq!(field_type, "date");
                assert!(content.contains("not-a-date"));
                assert!(trace.contains("Type: news"));
                assert!(trace.contains("SchemaField: published (date)"));
            }
            other => panic!("expected field error, got {:?}", other),
        }
    }

    #[test]
    fn deep_failure_surfaces_the_offending_field_with_its_path() {
        let model = ContentModel::new("site").with_content_type(
            ContentType::new("news").with_field(
                Field::new("team", FieldType::Array)
                    .with_child(Field::new("joined", FieldType::Date)),
            ),
        );
        let mut materializer = Materializer::new(model);
        materializer.set_content_type("news").unwrap();

        let err = materializer
            .create_page(&json!({"team": [{"joined": "yesterday-ish"}]}))
            .unwrap_err();

        match err {
            ContentError::Field {
                name, trace, ..
            } => {
                assert_eq!(name, "joined");
                assert!(trace.contains("Parents: news"));
                assert!(trace.contains("Type: team"));
                assert!(trace.contains("SchemaField: joined (date)"));
            }
            other => panic!("expected field error, got {:?}", other),
        }
    }

    #[test]
    fn scalar_where_sequence_expected_inside_a_leaf_fails_loudly() {
        let materializer = news_materializer();
        let err = materializer
            .create_page(&json!({"title": ["not", "a", "scalar"]}))
            .unwrap_err();
        assert!(matches!(err, ContentError::Field { name, .. } if name == "title"));
    }
}

mod preconditions {
    use super::*;

    #[test]
    fn materializing_without_a_content_type_is_an_error() {
        let materializer = Materializer::new(news_model());
        let err = materializer.create_page(&json!({})).unwrap_err();
        assert!(matches!(err, ContentError::ContentTypeNotSet));
    }

    #[test]
    fn selecting_an_unknown_content_type_is_an_error() {
        let mut materializer = Materializer::new(news_model());
        let err = materializer.set_content_type("events").unwrap_err();
        assert!(matches!(
            err,
            ContentError::UnknownContentType { name } if name == "events"
        ));
    }

    #[test]
    fn missing_field_lookup_is_a_precondition_error() {
        let materializer = news_materializer();
        let content_type = materializer.content_type().unwrap();
        assert!(content_type.field_required("title").is_ok());
        let err = content_type.field_required("nope").unwrap_err();
        assert!(matches!(
            err,
            ContentError::ContentFieldNotSet { name } if name == "nope"
        ));
    }
}

mod list_materialization {
    use super::*;

    #[test]
    fn list_bodies_produce_pages_with_pagination_and_metadata() {
        let materializer = news_materializer();
        let pages = materializer
            .create_pages(&json!({
                "data": [
                    {"title": "First"},
                    {"title": "Second"}
                ],
                "pagination": {"page": 1, "limit": 10, "total_results": 25},
                "metadata": {
                    "total_results": 25,
                    "limit": 10,
                    "results": 2,
                    "page": 1,
                    "generated_by": "api-v2"
                }
            }))
            .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages.get(0).unwrap().to_string(), "First");
        assert_eq!(pages.pagination().page, 1);
        assert_eq!(pages.pagination().total_pages(), 3);

        // Reserved pagination keys never pass through.
        assert_eq!(pages.metadata().len(), 1);
        assert_eq!(pages.metadata().get("generated_by"), Some(&json!("api-v2")));
        assert!(pages.metadata().get("total_results").is_none());
    }

    #[test]
    fn one_bad_record_fails_the_whole_list() {
        let materializer = news_materializer();
        let err = materializer
            .create_pages(&json!({
                "data": [
                    {"title": "fine"},
                    {"published": "not-a-date"}
                ]
            }))
            .unwrap_err();
        assert!(matches!(err, ContentError::Field { .. }));
    }
}

mod idempotence {
    use super::*;

    #[test]
    fn materializing_the_same_record_twice_is_structurally_equal() {
        let materializer = news_materializer();
        let record = json!({
            "title": "Launch day",
            "views": 3,
            "team": [{"member": "Ada"}]
        });
        let first = materializer.create_page(&record).unwrap();
        let second = materializer.create_page(&record).unwrap();
        assert_eq!(first, second);
    }
}
