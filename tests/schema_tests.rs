//! Content-model loading and validation.

use fieldstone::{ContentError, ContentModel, FieldType};

const MODEL_DOCUMENT: &str = r#"
name: example-site
content_types:
  - name: news
    api_endpoint: posts
    content_fields:
      - name: title
        type: text
      - name: published
        type: date
      - name: team
        type: array
        content_fields:
          - name: member
            type: text
          - name: joined
            type: date
  - name: events
    api_endpoint: events
    content_fields:
      - name: title
        type: text
      - name: location
        type: geo_point
"#;

#[test]
fn a_model_document_loads_with_declared_types() {
    let model = ContentModel::from_yaml(MODEL_DOCUMENT).unwrap();
    assert_eq!(model.name, "example-site");
    assert_eq!(model.content_types.len(), 2);

    let news = model.content_type("news").unwrap();
    assert_eq!(news.api_endpoint, "posts");
    assert_eq!(news.field("title").unwrap().field_type, FieldType::Text);

    let team = news.field("team").unwrap();
    assert_eq!(team.field_type, FieldType::Array);
    assert_eq!(team.children.len(), 2);
    assert_eq!(team.child("joined").unwrap().field_type, FieldType::Date);
}

#[test]
fn unrecognized_types_load_as_unknown() {
    let model = ContentModel::from_yaml(MODEL_DOCUMENT).unwrap();
    let location = model.content_type("events").unwrap().field("location").unwrap();
    assert_eq!(
        location.field_type,
        FieldType::Unknown("geo_point".to_string())
    );
}

#[test]
fn duplicate_child_names_fail_validation() {
    let document = r#"
content_types:
  - name: news
    content_fields:
      - name: team
        type: array
        content_fields:
          - name: member
            type: text
          - name: member
            type: number
"#;
    let err = ContentModel::from_yaml(document).unwrap_err();
    assert!(matches!(err, ContentError::Schema { .. }));
    assert!(err.to_string().contains("duplicate field 'member'"));
}

#[test]
fn duplicate_content_type_names_fail_validation() {
    let document = r#"
content_types:
  - name: news
    content_fields: []
  - name: news
    content_fields: []
"#;
    let err = ContentModel::from_yaml(document).unwrap_err();
    assert!(err.to_string().contains("duplicate content type 'news'"));
}

#[test]
fn malformed_documents_surface_the_parser_error() {
    let err = ContentModel::from_yaml("content_types: {not: [valid").unwrap_err();
    assert!(matches!(err, ContentError::ModelParse(_)));
}
