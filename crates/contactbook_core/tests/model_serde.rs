use chrono::NaiveDate;
use contactbook_core::{Contact, Meeting, StoreConfig};
use std::collections::BTreeSet;

#[test]
fn meeting_serialization_tags_the_variant() {
    let date = NaiveDate::from_ymd_opt(2013, 9, 1)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();
    let past = Meeting::new_past(3, date, BTreeSet::from([2, 1]), "retro");

    let json = serde_json::to_value(&past).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["attendees"], serde_json::json!([1, 2]));
    assert_eq!(json["kind"]["status"], "past");
    assert_eq!(json["kind"]["notes"], "retro");

    let decoded: Meeting = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, past);

    let future = Meeting::new_future(4, date, BTreeSet::from([1]));
    let json = serde_json::to_value(&future).unwrap();
    assert_eq!(json["kind"], serde_json::json!({ "status": "future" }));
}

#[test]
fn contact_serialization_uses_plain_fields() {
    let contact = Contact::new(9, "Ann", "notes");
    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 9, "name": "Ann", "notes": "notes" })
    );
}

#[test]
fn store_config_fills_missing_fields_with_defaults() {
    let config: StoreConfig =
        serde_json::from_value(serde_json::json!({ "data_file": "/tmp/book.txt" })).unwrap();
    assert_eq!(config.data_file, std::path::PathBuf::from("/tmp/book.txt"));
    assert_eq!(config.field_delimiter, '&');
    assert_eq!(config.attendee_delimiter, ',');
    assert!(config.validate().is_ok());
}
