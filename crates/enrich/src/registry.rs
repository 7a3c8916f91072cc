use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{RegistryError, RegistryErrors, ScanError};
use crate::field::{FieldId, FieldMeta};
use crate::scanner::{Scanner, ValueScanner};
use crate::writer::{IndicatorRow, RowWriter, ValueWriter};

/// Collects field and scanner registrations at startup.
///
/// Every problem is recorded rather than aborting on the first one, and
/// `build` refuses to hand out a registry if any were found.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    fields: BTreeMap<FieldId, FieldMeta>,
    scanners: HashMap<String, Scanner>,
    errors: Vec<RegistryError>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an indicator field.
    ///
    /// Registering the same id twice with identical metadata is a no-op;
    /// with different metadata it is an error.
    pub fn register_field(&mut self, id: FieldId, meta: FieldMeta) -> &mut Self {
        if let Some(missing) = meta.missing() {
            self.errors.push(RegistryError::IncompleteField { id, missing });
            return self;
        }
        if let Some(existing) = self.fields.get(&id) {
            if *existing != meta {
                self.errors.push(RegistryError::DuplicateField {
                    id,
                    existing: existing.name_json.clone(),
                });
            }
            return self;
        }
        debug!("Registered field {} as {}", id, meta.name_json);
        self.fields.insert(id, meta);
        self
    }

    /// Bind `name` to a scanner that may write `fields`.
    ///
    /// All of `fields` must already be registered.
    pub fn register_scanner<S>(&mut self, name: &str, scanner: S, fields: &[FieldId]) -> &mut Self
    where
        S: ValueScanner + 'static,
    {
        self.insert_scanner(name, Arc::new(scanner), fields)
    }

    /// Bind `name` to a passthrough scanner copying raw input into `target`.
    pub fn register_passthrough(&mut self, name: &str, target: FieldId, fields: &[FieldId]) -> &mut Self {
        if !fields.contains(&target) {
            self.errors.push(RegistryError::UndeclaredPassthrough {
                scanner: name.to_string(),
                field: target,
            });
            return self;
        }
        self.insert_scanner(name, Arc::new(target), fields)
    }

    fn insert_scanner(&mut self, name: &str, scanner: Arc<dyn ValueScanner>, fields: &[FieldId]) -> &mut Self {
        if name.is_empty() {
            self.errors.push(RegistryError::EmptyScannerName);
            return self;
        }
        if self.scanners.contains_key(name) {
            self.errors.push(RegistryError::DuplicateScanner(name.to_string()));
            return self;
        }
        if fields.is_empty() {
            self.errors.push(RegistryError::NoOutputFields {
                scanner: name.to_string(),
            });
            return self;
        }
        let unknown: Vec<FieldId> = fields.iter().copied().filter(|id| !self.fields.contains_key(id)).collect();
        if !unknown.is_empty() {
            self.errors.extend(unknown.into_iter().map(|field| RegistryError::UnknownOutputField {
                scanner: name.to_string(),
                field,
            }));
            return self;
        }
        debug!("Registered scanner {} -> {:?}", name, fields);
        self.scanners
            .insert(name.to_string(), Scanner::new(name.to_string(), fields.to_vec(), scanner));
        self
    }

    /// Problems recorded so far.
    pub fn errors(&self) -> &[RegistryError] {
        &self.errors
    }

    /// Freeze the registry, or report every registration problem.
    pub fn build(self) -> Result<Registry, RegistryErrors> {
        if !self.errors.is_empty() {
            for err in &self.errors {
                error!("Registry configuration error: {}", err);
            }
            return Err(RegistryErrors(self.errors));
        }
        debug!(
            "Registry frozen with {} field(s) and {} scanner(s)",
            self.fields.len(),
            self.scanners.len()
        );
        Ok(Registry {
            fields: self.fields,
            scanners: self.scanners,
        })
    }
}

/// Read-only field and scanner tables, shared by all processing workers.
#[derive(Debug)]
pub struct Registry {
    fields: BTreeMap<FieldId, FieldMeta>,
    scanners: HashMap<String, Scanner>,
}

pub type SharedRegistry = Arc<Registry>;

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Metadata of a registered field. Every id a scanner writes is registered,
    /// so a miss here is a bug in the caller.
    pub fn field(&self, id: FieldId) -> Result<&FieldMeta, ScanError> {
        self.fields.get(&id).ok_or(ScanError::UnknownField(id))
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &FieldMeta)> {
        self.fields.iter().map(|(id, meta)| (*id, meta))
    }

    pub fn scanner(&self, name: &str) -> Option<&Scanner> {
        self.scanners.get(name)
    }

    pub fn has_scanner(&self, name: &str) -> bool {
        self.scanners.contains_key(name)
    }

    pub fn scanner_names(&self) -> impl Iterator<Item = &str> {
        self.scanners.keys().map(String::as_str)
    }

    /// Run the scanner called `name` over `input`.
    pub fn scan(&self, name: &str, w: &mut dyn ValueWriter, input: &str) -> Result<(), ScanError> {
        let scanner = self
            .scanners
            .get(name)
            .ok_or_else(|| ScanError::UnknownScanner(name.to_string()))?;
        scanner.scan(w, input);
        Ok(())
    }

    /// A writer that appends into `row`.
    pub fn writer<'a, R: IndicatorRow + ?Sized>(&'a self, row: &'a mut R) -> RowWriter<'a, R> {
        RowWriter::new(self, row)
    }

    /// Scan `input` straight into `row`.
    pub fn scan_into<R: IndicatorRow + ?Sized>(&self, row: &mut R, name: &str, input: &str) -> Result<(), ScanError> {
        let mut w = self.writer(row);
        self.scan(name, &mut w, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Indicators;

    const IDS: FieldId = FieldId::new(10);
    const TAGS: FieldId = FieldId::new(11);

    fn meta(name: &str) -> FieldMeta {
        FieldMeta::new(name, name.to_uppercase(), format!("{} values", name))
    }

    fn digits_only(w: &mut dyn ValueWriter, input: &str) {
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            w.write_values(IDS, &[input]);
        }
    }

    fn base() -> RegistryBuilder {
        let mut b = Registry::builder();
        b.register_field(IDS, meta("p_any_ids")).register_field(TAGS, meta("p_any_tags"));
        b
    }

    // ── Field registration ───────────────────────────────────────

    #[test]
    fn test_duplicate_field_with_different_meta_fails() {
        let mut b = base();
        b.register_field(IDS, meta("p_any_other"));
        let err = b.build().unwrap_err();
        assert_eq!(
            err.errors(),
            &[RegistryError::DuplicateField {
                id: IDS,
                existing: "p_any_ids".to_string()
            }]
        );
    }

    #[test]
    fn test_identical_reregistration_is_idempotent() {
        let mut b = base();
        b.register_field(IDS, meta("p_any_ids"));
        assert!(b.build().is_ok());
    }

    #[test]
    fn test_incomplete_meta_fails() {
        let mut b = base();
        b.register_field(FieldId(12), FieldMeta::new("p_any_x", "", "desc"));
        let err = b.build().unwrap_err();
        assert!(matches!(err.errors()[0], RegistryError::IncompleteField { missing: "name", .. }));
    }

    #[test]
    fn test_field_lookup() {
        let reg = base().build().unwrap();
        assert_eq!(reg.field(TAGS).unwrap().name_json, "p_any_tags");
        assert_eq!(reg.field(FieldId(99)).unwrap_err(), ScanError::UnknownField(FieldId(99)));
    }

    // ── Scanner registration ─────────────────────────────────────

    #[test]
    fn test_scanner_requires_registered_fields() {
        let mut b = base();
        b.register_scanner("bad", digits_only, &[IDS, FieldId(50)]);
        let err = b.build().unwrap_err();
        assert_eq!(
            err.errors(),
            &[RegistryError::UnknownOutputField {
                scanner: "bad".to_string(),
                field: FieldId(50)
            }]
        );
    }

    #[test]
    fn test_scanner_fields_checked_at_registration_time() {
        let mut b = Registry::builder();
        b.register_scanner("early", digits_only, &[IDS]);
        b.register_field(IDS, meta("p_any_ids"));
        assert!(b.build().is_err());
    }

    #[test]
    fn test_duplicate_scanner_fails() {
        let mut b = base();
        b.register_scanner("ids", digits_only, &[IDS])
            .register_scanner("ids", digits_only, &[IDS]);
        let err = b.build().unwrap_err();
        assert_eq!(err.errors(), &[RegistryError::DuplicateScanner("ids".to_string())]);
    }

    #[test]
    fn test_passthrough_must_target_declared_field() {
        let mut b = base();
        b.register_passthrough("tag", TAGS, &[IDS]);
        assert!(matches!(
            b.build().unwrap_err().errors()[0],
            RegistryError::UndeclaredPassthrough { .. }
        ));
    }

    #[test]
    fn test_errors_are_aggregated() {
        let mut b = base();
        b.register_field(IDS, meta("p_any_other"))
            .register_scanner("", digits_only, &[IDS])
            .register_scanner("none", digits_only, &[]);
        let err = b.build().unwrap_err();
        assert_eq!(err.errors().len(), 3);
        assert!(err.to_string().starts_with("3 registry error(s)"));
    }

    // ── Dispatch ─────────────────────────────────────────────────

    #[test]
    fn test_scan_into_row() {
        let mut b = base();
        b.register_scanner("ids", digits_only, &[IDS])
            .register_passthrough("tag", TAGS, &[TAGS]);
        let reg = b.build().unwrap();

        let mut row = Indicators::new();
        reg.scan_into(&mut row, "ids", "123").unwrap();
        reg.scan_into(&mut row, "ids", "abc").unwrap();
        reg.scan_into(&mut row, "tag", "team:core").unwrap();
        reg.scan_into(&mut row, "ids", "123").unwrap();

        assert_eq!(row.values("p_any_ids"), vec!["123"]);
        assert_eq!(row.values("p_any_tags"), vec!["team:core"]);
    }

    #[test]
    fn test_unknown_scanner_is_surfaced() {
        let reg = base().build().unwrap();
        let mut row = Indicators::new();
        let err = reg.scan_into(&mut row, "aws_arm", "x").unwrap_err();
        assert_eq!(err, ScanError::UnknownScanner("aws_arm".to_string()));
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let mut b = base();
        b.register_scanner("ids", digits_only, &[IDS]);
        let reg: SharedRegistry = Arc::new(b.build().unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let reg = Arc::clone(&reg);
                std::thread::spawn(move || {
                    let mut row = Indicators::new();
                    reg.scan_into(&mut row, "ids", &i.to_string()).unwrap();
                    row.values("p_any_ids").len()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 1);
        }
    }
}
