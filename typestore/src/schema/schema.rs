use crate::common::Convertible;
use crate::schema::{FieldType, SchemaType};
use indexmap::IndexMap;

/// Type and presence rules of one record field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    field_type: FieldType,
    required: bool,
}

impl FieldSpec {
    pub fn new(field_type: FieldType, required: bool) -> FieldSpec {
        FieldSpec {
            field_type,
            required,
        }
    }

    /// Describes a field holding a Rust value of type `T`.
    pub fn of<T: SchemaType>() -> FieldSpec {
        FieldSpec::new(T::field_type(), T::required())
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// The explicit shape of a record: field name to [FieldSpec], in
/// declaration order.
///
/// # Examples
///
/// ```rust,ignore
/// let schema = Schema::new("Note").field("text", FieldSpec::of::<String>());
/// assert!(schema.get("text").is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, FieldSpec>,
}

impl Schema {
    pub fn new(name: &str) -> Schema {
        Schema {
            name: name.to_string(),
            fields: IndexMap::new(),
        }
    }

    /// Adds or replaces a field.
    pub fn field(mut self, name: &str, spec: FieldSpec) -> Schema {
        self.fields.insert(name.to_string(), spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldSpec)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the fields every record must carry.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, spec)| spec.is_required())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// A record shape stored in a collection.
///
/// Derive it together with `Convertible`:
///
/// ```rust,ignore
/// #[derive(Convertible, Record, Clone, Debug, PartialEq)]
/// struct Note {
///     text: String,
/// }
/// ```
pub trait Record: Convertible<Output = Self> + SchemaType {
    fn schema() -> Schema;
}
