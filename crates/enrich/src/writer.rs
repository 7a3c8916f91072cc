use tracing::{error, warn};

use crate::field::{FieldId, FieldMeta};
use crate::registry::Registry;

/// Sink that scanners write extracted values into.
///
/// Repeated writes accumulate; the writer does no validation of its own.
pub trait ValueWriter {
    fn write_values(&mut self, field: FieldId, values: &[&str]);
}

/// Rows that can carry indicator collections.
pub trait IndicatorRow {
    fn append_indicator(&mut self, meta: &FieldMeta, values: &[&str]);
}

/// Collects raw `(field, value)` pairs in write order.
impl ValueWriter for Vec<(FieldId, String)> {
    fn write_values(&mut self, field: FieldId, values: &[&str]) {
        self.extend(values.iter().map(|v| (field, v.to_string())));
    }
}

/// A [`ValueWriter`] bound to one output row.
pub struct RowWriter<'a, R: ?Sized> {
    registry: &'a Registry,
    row: &'a mut R,
}

impl<'a, R: IndicatorRow + ?Sized> RowWriter<'a, R> {
    pub fn new(registry: &'a Registry, row: &'a mut R) -> Self {
        Self { registry, row }
    }
}

impl<R: IndicatorRow + ?Sized> ValueWriter for RowWriter<'_, R> {
    fn write_values(&mut self, field: FieldId, values: &[&str]) {
        if values.is_empty() {
            return;
        }
        match self.registry.field(field) {
            Ok(meta) => self.row.append_indicator(meta, values),
            // Registration validates scanner outputs, so this is a bug in a scanner.
            Err(e) => error!("Dropping {} value(s): {}", values.len(), e),
        }
    }
}

/// Restricts a scanner to the fields it declared at registration.
pub(crate) struct DeclaredWriter<'a, 'w> {
    pub(crate) inner: &'a mut (dyn ValueWriter + 'w),
    pub(crate) scanner: &'a str,
    pub(crate) fields: &'a [FieldId],
}

impl ValueWriter for DeclaredWriter<'_, '_> {
    fn write_values(&mut self, field: FieldId, values: &[&str]) {
        if self.fields.binary_search(&field).is_err() {
            warn!(
                "Scanner {} wrote undeclared field {}, dropping {} value(s)",
                self.scanner,
                field,
                values.len()
            );
            return;
        }
        self.inner.write_values(field, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_writer_accumulates() {
        let mut out: Vec<(FieldId, String)> = Vec::new();
        out.write_values(FieldId(1), &["a", "b"]);
        out.write_values(FieldId(2), &["c"]);
        assert_eq!(
            out,
            vec![
                (FieldId(1), "a".to_string()),
                (FieldId(1), "b".to_string()),
                (FieldId(2), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_declared_writer_drops_undeclared() {
        let mut out: Vec<(FieldId, String)> = Vec::new();
        {
            let mut w = DeclaredWriter {
                inner: &mut out,
                scanner: "test",
                fields: &[FieldId(1), FieldId(3)],
            };
            w.write_values(FieldId(1), &["kept"]);
            w.write_values(FieldId(2), &["dropped"]);
            w.write_values(FieldId(3), &["kept too"]);
        }
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(_, v)| v.starts_with("kept")));
    }
}
