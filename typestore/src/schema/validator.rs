use crate::collection::Document;
use crate::common::{FieldPath, ServerValue, Value};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::schema::{FieldType, Schema};

/// Checks untyped documents against a record [Schema].
///
/// Dispatch is on the [FieldType] tag of each field. In strict mode a field
/// the schema does not declare fails with `InvalidFieldName`; otherwise it
/// is passed through unchecked.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
    strict: bool,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema, strict: bool) -> SchemaValidator<'a> {
        SchemaValidator { schema, strict }
    }

    /// Validates a complete record, as written by `add`/`set` or returned by a read.
    pub fn validate_record(&self, doc: &Document) -> StoreResult<()> {
        self.check_document(self.schema, doc, "", false)
    }

    /// Validates the present fields of a shallow partial record.
    pub fn validate_patch(&self, doc: &Document) -> StoreResult<()> {
        self.check_document(self.schema, doc, "", true)
    }

    /// Validates a value written at a nested field path.
    pub fn validate_field_update(&self, path: &FieldPath, value: &Value) -> StoreResult<()> {
        let mut current = FieldType::Record(self.schema.clone());
        let mut required = true;
        let mut walked = String::new();

        for segment in path.segments() {
            walked = join(&walked, segment);
            match current {
                FieldType::Any => return Ok(()),
                FieldType::Record(schema) => match schema.get(segment) {
                    Some(spec) => {
                        required = spec.is_required();
                        current = spec.field_type().clone();
                    }
                    None if self.strict => {
                        return Err(unknown_field(&walked, schema.name()));
                    }
                    None => return Ok(()),
                },
                FieldType::Map(value_type) => {
                    required = true;
                    current = *value_type;
                }
                other => {
                    log::error!("Field {} of type {} has no nested fields", walked, other);
                    return Err(StoreError::new(
                        &format!("Field {} of type {} has no nested fields", walked, other),
                        ErrorKind::ValidationError,
                    ));
                }
            }
        }

        if value.is_null() {
            return if required && current != FieldType::Any {
                log::error!("Required field {} cannot be set to null", walked);
                Err(StoreError::new(
                    &format!("Required field {} cannot be set to null", walked),
                    ErrorKind::ValidationError,
                ))
            } else {
                Ok(())
            };
        }
        self.check_value(&current, value, &walked)
    }

    fn check_document(
        &self,
        schema: &Schema,
        doc: &Document,
        prefix: &str,
        partial: bool,
    ) -> StoreResult<()> {
        for (key, value) in doc.iter() {
            let path = join(prefix, key);
            match schema.get(key) {
                Some(spec) => {
                    if value.is_null() {
                        if spec.is_required() && *spec.field_type() != FieldType::Any {
                            return Err(missing_field(&path, schema.name()));
                        }
                        continue;
                    }
                    self.check_value(spec.field_type(), value, &path)?;
                }
                None if self.strict => return Err(unknown_field(&path, schema.name())),
                None => {}
            }
        }

        if !partial {
            for name in schema.required_fields() {
                if !doc.contains_key(name) {
                    return Err(missing_field(&join(prefix, name), schema.name()));
                }
            }
        }
        Ok(())
    }

    fn check_value(&self, field_type: &FieldType, value: &Value, path: &str) -> StoreResult<()> {
        if let Value::ServerOp(op) = value {
            return self.check_server_op(field_type, op, path);
        }

        if !field_type.matches_shallow(value) {
            return Err(type_mismatch(path, field_type, value));
        }

        match (field_type, value) {
            (FieldType::Array(element), Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    self.check_element(element, item, &format!("{}[{}]", path, index), true)?;
                }
                Ok(())
            }
            (FieldType::Map(value_type), Value::Document(doc)) => {
                for (key, item) in doc.iter() {
                    self.check_element(value_type, item, &join(path, key), false)?;
                }
                Ok(())
            }
            (FieldType::Record(schema), Value::Document(doc)) => {
                self.check_document(schema, doc, path, false)
            }
            _ => Ok(()),
        }
    }

    /// Elements of arrays and map values: no nulls unless untyped, and no
    /// server values inside arrays.
    fn check_element(
        &self,
        field_type: &FieldType,
        value: &Value,
        path: &str,
        in_array: bool,
    ) -> StoreResult<()> {
        if *field_type == FieldType::Any {
            return Ok(());
        }
        if value.is_null() {
            return Err(type_mismatch(path, field_type, value));
        }
        if in_array && value.is_server_op() {
            log::error!("Server value cannot be placed inside array at {}", path);
            return Err(StoreError::new(
                &format!("Server value cannot be placed inside array at {}", path),
                ErrorKind::ValidationError,
            ));
        }
        self.check_value(field_type, value, path)
    }

    fn check_server_op(&self, field_type: &FieldType, op: &ServerValue, path: &str) -> StoreResult<()> {
        let accepted = match (op, field_type) {
            (_, FieldType::Any) => true,
            (ServerValue::ServerDate, FieldType::Timestamp) => true,
            (ServerValue::Increment(n), FieldType::Integer) => n.is_integer(),
            (ServerValue::Increment(n), FieldType::Number) => n.is_number(),
            (ServerValue::ArrayUnion(items), FieldType::Array(element))
            | (ServerValue::ArrayRemove(items), FieldType::Array(element)) => {
                for (index, item) in items.iter().enumerate() {
                    self.check_element(element, item, &format!("{}[{}]", path, index), true)?;
                }
                true
            }
            _ => false,
        };

        if accepted {
            Ok(())
        } else {
            log::error!(
                "Server value {} cannot be applied to field {} of type {}",
                op,
                path,
                field_type
            );
            Err(StoreError::new(
                &format!(
                    "Server value {} cannot be applied to field {} of type {}",
                    op, path, field_type
                ),
                ErrorKind::ValidationError,
            ))
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn type_mismatch(path: &str, expected: &FieldType, found: &Value) -> StoreError {
    log::error!(
        "Field {} expects {}, found {}",
        path,
        expected,
        found.type_name()
    );
    StoreError::new(
        &format!(
            "Field {} expects {}, found {}",
            path,
            expected,
            found.type_name()
        ),
        ErrorKind::ValidationError,
    )
}

fn unknown_field(path: &str, schema: &str) -> StoreError {
    log::error!("Field {} does not exist in {}", path, schema);
    StoreError::new(
        &format!("Field {} does not exist in {}", path, schema),
        ErrorKind::InvalidFieldName,
    )
}

fn missing_field(path: &str, schema: &str) -> StoreError {
    log::error!("Required field {} of {} is missing", path, schema);
    StoreError::new(
        &format!("Required field {} of {} is missing", path, schema),
        ErrorKind::MissingRequiredField,
    )
}
