use std::fmt;
use std::sync::Arc;

use crate::field::FieldId;
use crate::writer::{DeclaredWriter, ValueWriter};

/// Turns one raw string into zero or more indicator values.
pub trait ValueScanner: Send + Sync {
    fn scan_value(&self, w: &mut dyn ValueWriter, input: &str);
}

impl<F> ValueScanner for F
where
    F: Fn(&mut dyn ValueWriter, &str) + Send + Sync,
{
    fn scan_value(&self, w: &mut dyn ValueWriter, input: &str) {
        self(w, input)
    }
}

/// Passthrough: copy the raw input verbatim into this field.
impl ValueScanner for FieldId {
    fn scan_value(&self, w: &mut dyn ValueWriter, input: &str) {
        w.write_values(*self, &[input]);
    }
}

/// Run `scanner` over every present value, skipping `None`.
pub fn scan_all<I, S>(scanner: &dyn ValueScanner, w: &mut dyn ValueWriter, values: I)
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    for value in values.into_iter().flatten() {
        scanner.scan_value(w, value.as_ref());
    }
}

/// A registered, named scanner.
#[derive(Clone)]
pub struct Scanner {
    name: String,
    fields: Vec<FieldId>,
    behavior: Arc<dyn ValueScanner>,
}

impl Scanner {
    pub(crate) fn new(name: String, mut fields: Vec<FieldId>, behavior: Arc<dyn ValueScanner>) -> Self {
        fields.sort_unstable();
        fields.dedup();
        Self { name, fields, behavior }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared output fields, sorted.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn declares(&self, field: FieldId) -> bool {
        self.fields.binary_search(&field).is_ok()
    }

    /// Scan `input`; writes to undeclared fields are dropped.
    pub fn scan(&self, w: &mut dyn ValueWriter, input: &str) {
        let mut declared = DeclaredWriter {
            inner: w,
            scanner: &self.name,
            fields: &self.fields,
        };
        self.behavior.scan_value(&mut declared, input);
    }
}

impl ValueScanner for Scanner {
    fn scan_value(&self, w: &mut dyn ValueWriter, input: &str) {
        self.scan(w, input)
    }
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
