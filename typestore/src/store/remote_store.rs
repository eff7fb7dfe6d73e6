use crate::collection::{CollectionPath, Document};
use crate::common::FieldPath;
use crate::errors::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};

/// How a write combines its payload with the stored document.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteMode {
    /// Create a new document. Fails with `WriteError` if the id is taken.
    Create,
    /// Replace the whole document, creating it if absent.
    Overwrite,
    /// Copy each masked field path from the payload into the existing
    /// document. Fails with `NotFound` if the document is absent.
    Merge(Vec<FieldPath>),
}

impl Display for WriteMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Create => write!(f, "create"),
            WriteMode::Overwrite => write!(f, "overwrite"),
            WriteMode::Merge(mask) => write!(f, "merge({} field(s))", mask.len()),
        }
    }
}

/// Acknowledgement of a committed write.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteAck {
    id: String,
    commit_time: DateTime<Utc>,
}

impl WriteAck {
    pub fn new(id: &str, commit_time: DateTime<Utc>) -> WriteAck {
        WriteAck {
            id: id.to_string(),
            commit_time,
        }
    }

    /// The id of the written document, store-assigned for an id-less create.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The instant the write was committed; server dates resolve to it.
    pub fn commit_time(&self) -> DateTime<Utc> {
        self.commit_time
    }
}

/// The remote document database, seen through the minimal request/response
/// contract the access layer needs.
///
/// Payloads are untyped [Document]s. A payload may carry pending server
/// values ([`Value::ServerOp`](crate::common::Value::ServerOp)); the store
/// must resolve them atomically against the stored document at commit
/// time, and must never return one from [`read`](RemoteStore::read).
/// Transport failures are reported as `WriteError` or `ReadError` and are
/// surfaced to callers unchanged.
///
/// # Thread Safety
/// Implementers must be `Send + Sync`; one store is shared by every
/// operation issued through a [Typestore](crate::Typestore) client.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Connects to the store. Called once by the client builder.
    async fn open(&self) -> StoreResult<()>;

    /// Writes `payload` to the document `id` of `collection`.
    ///
    /// With `id = None` (only valid for [`WriteMode::Create`]) the store
    /// assigns a fresh id.
    async fn write(
        &self,
        collection: &CollectionPath,
        id: Option<&str>,
        payload: Document,
        mode: WriteMode,
    ) -> StoreResult<WriteAck>;

    /// Reads the document `id` of `collection`, `None` if it does not exist.
    async fn read(&self, collection: &CollectionPath, id: &str) -> StoreResult<Option<Document>>;

    /// Disconnects. Called once on client shutdown.
    async fn close(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::field;

    #[test]
    fn test_write_mode_display() {
        assert_eq!(WriteMode::Create.to_string(), "create");
        assert_eq!(WriteMode::Overwrite.to_string(), "overwrite");
        let mask = vec![field(&["a"]).unwrap(), field(&["b", "c"]).unwrap()];
        assert_eq!(WriteMode::Merge(mask).to_string(), "merge(2 field(s))");
    }

    #[test]
    fn test_write_ack() {
        let now = Utc::now();
        let ack = WriteAck::new("abc", now);
        assert_eq!(ack.id(), "abc");
        assert_eq!(ack.commit_time(), now);
    }
}
