//! Per-session registry of pending document operations.
//!
//! Earlier revisions of this pipeline kept a process-wide map from input
//! document to its queued operations. That shape breaks as soon as two
//! pipelines run in one process, so the registry is an explicitly passed
//! context object instead: callers create one per session and hand it to
//! whatever stage queues or applies work. Nothing here is global.

use std::collections::BTreeMap;

use gridforge_core::{ApplyOptions, ColumnOptions, Combine, Document, SheetOptions};
use tracing::warn;

/// One queued mutation of a document.
#[derive(Clone, Debug)]
pub enum PendingOp {
    /// Merge a reference document into the target (fallback semantics).
    Merge(Box<Document>),
    /// Overlay sheet options onto a named sheet.
    SheetOptions {
        sheet: String,
        options: SheetOptions,
    },
    /// Overlay column options onto a named column of a named sheet.
    ColumnOptions {
        sheet: String,
        column: String,
        options: ColumnOptions,
    },
}

/// Pending operations keyed by input document name.
///
/// Operations apply in registration order. Unknown keys drain to nothing;
/// operations addressing a missing sheet or column are skipped with a
/// warning rather than failing the whole batch.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    pending: BTreeMap<String, Vec<PendingOp>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an operation for the given input document.
    pub fn register(&mut self, input: impl Into<String>, op: PendingOp) {
        self.pending.entry(input.into()).or_default().push(op);
    }

    /// The operations currently queued for `input`.
    pub fn pending(&self, input: &str) -> &[PendingOp] {
        self.pending.get(input).map_or(&[], Vec::as_slice)
    }

    /// Number of inputs with queued operations.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the operations queued for `input`.
    pub fn drain(&mut self, input: &str) -> Vec<PendingOp> {
        self.pending.remove(input).unwrap_or_default()
    }

    /// Drain `input`'s operations and apply them to `document` in
    /// registration order. Returns the number of operations applied.
    pub fn apply_all(&mut self, input: &str, document: &mut Document) -> usize {
        let ops = self.drain(input);
        let mut applied = 0;
        for op in ops {
            if apply_op(document, op) {
                applied += 1;
            }
        }
        applied
    }
}

fn apply_op(document: &mut Document, op: PendingOp) -> bool {
    match op {
        PendingOp::Merge(reference) => {
            document.combine(&reference);
            true
        }
        PendingOp::SheetOptions { sheet, options } => match document.sheet_mut(&sheet) {
            Some(target) => {
                target.apply_options(&options);
                true
            }
            None => {
                warn!(sheet = %sheet, "skipping options for unknown sheet");
                false
            }
        },
        PendingOp::ColumnOptions {
            sheet,
            column,
            options,
        } => {
            let Some(target_sheet) = document.sheet_mut(&sheet) else {
                warn!(sheet = %sheet, "skipping options for unknown sheet");
                return false;
            };
            match target_sheet.get_column_mut(&column) {
                Some(target) => {
                    target.apply_options(&options);
                    true
                }
                None => {
                    warn!(sheet = %sheet, column = %column, "skipping options for unknown column");
                    false
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gridforge_core::{Column, Sheet, TotalsFunction};
    use pretty_assertions::assert_eq;

    fn target() -> Document {
        Document::new("Report").sheet_with(
            Sheet::new("Summary")
                .column(Column::new("Item"))
                .column(Column::new("Amount")),
        )
    }

    #[test]
    fn operations_apply_in_registration_order() {
        let mut registry = SessionRegistry::new();
        registry.register(
            "report.json",
            PendingOp::ColumnOptions {
                sheet: "Summary".to_string(),
                column: "Amount".to_string(),
                options: ColumnOptions {
                    totals: Some(TotalsFunction::Sum),
                    ..Default::default()
                },
            },
        );
        registry.register(
            "report.json",
            PendingOp::ColumnOptions {
                sheet: "Summary".to_string(),
                column: "amount".to_string(),
                options: ColumnOptions {
                    totals: Some(TotalsFunction::Average),
                    ..Default::default()
                },
            },
        );

        let mut document = target();
        let applied = registry.apply_all("report.json", &mut document);

        assert_eq!(applied, 2);
        // The later registration wins.
        assert_eq!(
            document
                .sheet("Summary")
                .unwrap()
                .get_column("Amount")
                .unwrap()
                .totals,
            TotalsFunction::Average
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn merge_op_pulls_reference_content() {
        let mut registry = SessionRegistry::new();
        let reference = Document::new("Fallback")
            .sheet_with(Sheet::new("Detail").column(Column::new("Notes")));
        registry.register("report.json", PendingOp::Merge(Box::new(reference)));

        let mut document = target();
        registry.apply_all("report.json", &mut document);

        assert_eq!(document.sheets.len(), 2);
        assert!(document.sheet("Detail").is_some());
    }

    #[test]
    fn unknown_targets_are_skipped_not_fatal() {
        let mut registry = SessionRegistry::new();
        registry.register(
            "report.json",
            PendingOp::SheetOptions {
                sheet: "Missing".to_string(),
                options: SheetOptions {
                    auto_filter: Some(true),
                    ..Default::default()
                },
            },
        );

        let mut document = target();
        let applied = registry.apply_all("report.json", &mut document);

        assert_eq!(applied, 0);
        assert_eq!(document, target());
    }

    #[test]
    fn draining_an_unknown_key_is_a_noop() {
        let mut registry = SessionRegistry::new();
        assert!(registry.drain("never-registered").is_empty());
        assert_eq!(registry.pending("never-registered").len(), 0);

        let mut document = target();
        assert_eq!(registry.apply_all("never-registered", &mut document), 0);
    }
}
