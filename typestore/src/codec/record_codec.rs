use crate::collection::{check_field_updates, Document, FieldUpdate, Patch};
use crate::common::{document_from_paths, FieldPath, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::schema::{Record, SchemaValidator};
use itertools::Itertools;

/// An encoded write: the payload document and the field paths it touches.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedUpdate {
    pub payload: Document,
    pub mask: Vec<FieldPath>,
}

/// Maps typed records to untyped documents and back, validating each
/// document against the record's schema.
///
/// The codec never evaluates a server value. On write it passes sentinels
/// through as [`Value::ServerOp`]; on read it rejects any that survived.
#[derive(Clone, Copy, Debug)]
pub struct RecordCodec {
    strict_schema: bool,
    validate_reads: bool,
}

impl Default for RecordCodec {
    fn default() -> Self {
        RecordCodec {
            strict_schema: true,
            validate_reads: true,
        }
    }
}

impl RecordCodec {
    pub fn new(strict_schema: bool, validate_reads: bool) -> RecordCodec {
        RecordCodec {
            strict_schema,
            validate_reads,
        }
    }

    pub fn strict_schema(&self) -> bool {
        self.strict_schema
    }

    pub fn validate_reads(&self) -> bool {
        self.validate_reads
    }

    /// Encodes a complete record for `add` and `set`.
    pub fn encode<T: Record>(&self, data: &T) -> StoreResult<Document> {
        let doc = match data.to_value()? {
            Value::Document(doc) => doc,
            other => {
                log::error!("Record must encode to a map, found {}", other.type_name());
                return Err(StoreError::new(
                    &format!("Record must encode to a map, found {}", other.type_name()),
                    ErrorKind::ObjectMappingError,
                ));
            }
        };

        let schema = T::schema();
        SchemaValidator::new(&schema, self.strict_schema).validate_record(&doc)?;
        Ok(doc)
    }

    /// Encodes a shallow partial record. Each set field is masked as a whole.
    pub fn encode_patch<T: Record>(&self, patch: Patch<T>) -> StoreResult<EncodedUpdate> {
        let payload = patch.into_document()?;
        if payload.is_empty() {
            log::error!("Update must contain at least one field");
            return Err(StoreError::new(
                "Update must contain at least one field",
                ErrorKind::InvalidOperation,
            ));
        }

        let schema = T::schema();
        SchemaValidator::new(&schema, self.strict_schema).validate_patch(&payload)?;

        let mask = payload
            .keys()
            .iter()
            .map(|key| FieldPath::new(&[key]))
            .collect::<StoreResult<Vec<FieldPath>>>()?;
        Ok(EncodedUpdate { payload, mask })
    }

    /// Encodes targeted writes at field paths.
    pub fn encode_field_updates<T: Record>(
        &self,
        updates: Vec<FieldUpdate>,
    ) -> StoreResult<EncodedUpdate> {
        check_field_updates(&updates)?;

        let schema = T::schema();
        let validator = SchemaValidator::new(&schema, self.strict_schema);
        for update in &updates {
            validator.validate_field_update(update.path(), update.value())?;
        }

        let entries: Vec<(FieldPath, Value)> = updates.into_iter().map(|u| u.into_parts()).collect();
        let payload = document_from_paths(&entries)?;
        let mask = entries.into_iter().map(|(path, _)| path).collect();
        Ok(EncodedUpdate { payload, mask })
    }

    /// Decodes a document returned by the store.
    ///
    /// # Errors
    ///
    /// `CorruptData` if the document still holds a server value,
    /// schema errors if read validation is on, `ObjectMappingError` if the
    /// record cannot be built.
    pub fn decode<T: Record>(&self, doc: &Document) -> StoreResult<T> {
        ensure_resolved(doc)?;
        if self.validate_reads {
            let schema = T::schema();
            SchemaValidator::new(&schema, self.strict_schema).validate_record(doc)?;
        }
        T::from_value(&Value::Document(doc.clone()))
    }
}

/// Fails with `CorruptData` if read data holds a pending server value.
pub fn ensure_resolved(doc: &Document) -> StoreResult<()> {
    if !doc.contains_server_op() {
        return Ok(());
    }

    let paths = doc.server_op_paths();
    let location = if paths.is_empty() {
        "an array".to_string()
    } else {
        paths.iter().join(", ")
    };
    log::error!("Read data holds an unresolved server value at {}", location);
    Err(StoreError::new(
        &format!("Read data holds an unresolved server value at {}", location),
        ErrorKind::CorruptData,
    ))
}

/// Encodes a record with the default, strict codec.
pub fn encode<T: Record>(data: &T) -> StoreResult<Document> {
    RecordCodec::default().encode(data)
}

/// Decodes a record with the default, strict codec.
pub fn decode<T: Record>(doc: &Document) -> StoreResult<T> {
    RecordCodec::default().decode(doc)
}
