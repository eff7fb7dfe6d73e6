use std::collections::BTreeMap;
use typestore::common::{from_value, Convertible};
use typestore::errors::ErrorKind;
use typestore::{doc, server_date, FieldValue, Value};
use typestore_derive::{Convertible, Record};
use typestore_int_test::models::{profile, Visibility};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[derive(Clone, Debug, Default, PartialEq, Convertible, Record)]
#[converter(ignored = "cache, scratch")]
struct Draft {
    #[field(rename = "displayName")]
    display_name: String,
    labels: BTreeMap<String, i64>,
    note: Option<String>,
    cache: Vec<String>,
    scratch: i64,
}

#[test]
fn test_renamed_and_ignored_fields() {
    let draft = Draft {
        display_name: "Draft".to_string(),
        labels: BTreeMap::from([("a".to_string(), 1)]),
        note: None,
        cache: vec!["stale".to_string()],
        scratch: 42,
    };

    let value = draft.to_value().unwrap();
    let doc = value.as_document().unwrap();
    assert_eq!(doc.keys(), vec!["displayName", "labels"]);

    let decoded = from_value::<Draft>(&value).unwrap();
    assert_eq!(decoded.display_name, "Draft");
    assert_eq!(decoded.labels, draft.labels);
    assert!(decoded.cache.is_empty());
    assert_eq!(decoded.scratch, 0);
}

#[test]
fn test_ignored_fields_are_not_in_schema() {
    use typestore::schema::Record;

    let schema = Draft::schema();
    let names: Vec<&str> = schema.fields().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["displayName", "labels", "note"]);
}

#[test]
fn test_unit_enum_is_variant_name() {
    assert_eq!(Visibility::Private.to_value().unwrap(), Value::from("Private"));
    assert_eq!(
        from_value::<Visibility>(&Value::from("Public")).unwrap(),
        Visibility::Public
    );

    let err = from_value::<Visibility>(&Value::from("Hidden")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    let err = from_value::<Visibility>(&Value::from(1)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
}

#[test]
fn test_nested_records() {
    let value = profile("Alice").to_value().unwrap();
    let doc = value.as_document().unwrap();
    let address = doc.get("address");
    assert_eq!(
        address.as_document().map(|a| a.get("city")),
        Some(Value::from("Lisbon"))
    );
    assert!(!doc.contains_key("nickname"));
    assert_eq!(from_value::<typestore_int_test::models::Profile>(&value).unwrap(), profile("Alice"));
}

#[test]
fn test_server_value_field_is_kept_as_sentinel() {
    #[derive(Debug, PartialEq, Convertible)]
    struct Stamped {
        at: FieldValue<chrono::DateTime<chrono::Utc>>,
    }

    let stamped = Stamped {
        at: FieldValue::server(server_date()),
    };
    let value = stamped.to_value().unwrap();
    assert!(value.contains_server_op());

    let err = from_value::<Stamped>(&value).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::CorruptData);
}

#[test]
fn test_decoding_non_document_fails() {
    let err = from_value::<Draft>(&Value::from("text")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);

    let err = from_value::<Draft>(&Value::Document(doc! { "displayName": 5, "labels": {} })).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
}
