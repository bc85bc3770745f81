use crate::{AsValue, Entity, OrmError, Result, RowLabeled, Value};
use anyhow::Context;

/// A field that can receive a result cell.
pub trait Scan {
    fn scan(&mut self, value: Value) -> Result<()>;
}

impl<T: AsValue> Scan for T {
    fn scan(&mut self, value: Value) -> Result<()> {
        *self = T::try_from_value(value)?;
        Ok(())
    }
}

/// Write one labeled cell into `target`.
///
/// Returns `false` when the column is not mapped to a field of `E`, the cell
/// is then discarded.
pub fn scan_column<E: Entity>(target: &mut E, column: &str, value: Value) -> Result<bool> {
    let Some(field) = E::column_map().field(column) else {
        return Ok(false);
    };
    let Some(slot) = target.scan_target(field) else {
        return Ok(false);
    };
    slot.scan(value).with_context(|| OrmError::Scan {
        column: column.to_string().into(),
        field: field.to_string().into(),
    })?;
    Ok(true)
}

/// Populate `target` from a result row. Unknown columns are read and discarded.
pub fn materialize<E: Entity>(row: RowLabeled, target: &mut E) -> Result<()> {
    let RowLabeled { labels, values } = row;
    for (label, value) in labels.iter().zip(values.into_vec()) {
        if !scan_column(target, label, value)? {
            log::trace!("Discarding column `{}` not mapped on `{}`", label, E::table_name());
        }
    }
    Ok(())
}

/// One fresh record per row, in row order.
pub fn materialize_all<E: Entity + Default>(
    rows: impl IntoIterator<Item = RowLabeled>,
) -> Result<Vec<E>> {
    rows.into_iter()
        .map(|row| {
            let mut entity = E::default();
            materialize(row, &mut entity)?;
            Ok(entity)
        })
        .collect()
}
