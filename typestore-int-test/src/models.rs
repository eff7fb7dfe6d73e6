use chrono::{DateTime, Utc};
use typestore::{FieldValue, Ref};
use typestore_derive::{Convertible, Record};

#[derive(Clone, Debug, PartialEq, Convertible, Record)]
pub struct Note {
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Convertible, Record)]
pub struct ShareMeta {
    pub views: FieldValue<i64>,
    pub likes: FieldValue<i64>,
}

#[derive(Clone, Debug, PartialEq, Convertible, Record)]
pub struct Share {
    pub note: Ref<Note>,
    pub tags: Vec<String>,
    #[field(rename = "sharedAt")]
    pub shared_at: FieldValue<DateTime<Utc>>,
    pub meta: ShareMeta,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Convertible, Record)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

#[derive(Clone, Debug, PartialEq, Convertible)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Clone, Debug, PartialEq, Convertible, Record)]
#[record(name = "UserProfile")]
pub struct Profile {
    pub name: String,
    pub address: Address,
    pub visibility: Visibility,
    pub scores: Vec<i64>,
    pub nickname: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Convertible, Record)]
pub struct Counter {
    pub count: FieldValue<i64>,
    pub total: FieldValue<f64>,
}

/// A free-form record: every field of `Note` plus a field `Note` lacks.
#[derive(Clone, Debug, PartialEq, Convertible, Record)]
#[record(name = "Note")]
pub struct TaggedNote {
    pub text: String,
    pub tag: String,
}

pub fn note(text: &str) -> Note {
    Note {
        text: text.to_string(),
    }
}

pub fn address(city: &str, zip: &str) -> Address {
    Address {
        city: city.to_string(),
        zip: zip.to_string(),
    }
}

pub fn profile(name: &str) -> Profile {
    Profile {
        name: name.to_string(),
        address: address("Lisbon", "1000-001"),
        visibility: Visibility::Public,
        scores: vec![1, 2, 3],
        nickname: None,
    }
}
