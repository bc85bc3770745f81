use crate::{ColumnMap, FieldDescriptor, Scan, Value};

/// Column the primary key falls back to when no field is marked `pk`.
pub const DEFAULT_ID_COLUMN: &str = "id";

/// A record type mapped to a table.
///
/// Usually implemented by `#[derive(Entity)]`, which reads the `#[column("...")]`
/// annotations at compile time. Implementing it by hand is supported as well:
/// build the descriptors with [`crate::parse_annotation`] once (for example in a
/// `LazyLock`) and route `column_value`/`scan_target` to the fields.
pub trait Entity: Send + Sync {
    /// Unprefixed table name: the lower-cased type name or the override.
    fn table_name() -> &'static str;

    /// Descriptors in declaration order, computed once per type.
    fn descriptors() -> &'static [FieldDescriptor];

    /// Column to field lookup over [`Entity::descriptors`].
    fn column_map() -> &'static ColumnMap;

    /// Current value of the field backing `column`.
    fn column_value(&self, column: &str) -> Option<Value>;

    /// Scan target of the field named `field`.
    fn scan_target(&mut self, field: &str) -> Option<&mut dyn Scan>;

    /// Descriptor of the primary key: the one marked `pk`, otherwise a column named `id`.
    fn primary_key_descriptor() -> Option<&'static FieldDescriptor> {
        let descriptors = Self::descriptors();
        descriptors
            .iter()
            .find(|d| d.primary_key)
            .or_else(|| descriptors.iter().find(|d| d.column_name == DEFAULT_ID_COLUMN))
    }

    /// Primary key column, `id` when the key is implicit.
    fn primary_key_column() -> &'static str {
        Self::primary_key_descriptor()
            .map(|d| d.column_name.as_ref())
            .unwrap_or(DEFAULT_ID_COLUMN)
    }

    /// Value of the primary key, `None` when the key is implicit and not on the record.
    fn primary_key_value(&self) -> Option<Value> {
        self.column_value(Self::primary_key_column())
    }
}

/// Metadata of a record type: descriptors and the reverse column map.
///
/// Repeated calls return the same cached statics.
pub fn extract<E: Entity>() -> (&'static [FieldDescriptor], &'static ColumnMap) {
    (E::descriptors(), E::column_map())
}
