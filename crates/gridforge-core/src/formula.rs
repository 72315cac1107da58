//! Totals-row formula resolution.
//!
//! Maps an aggregate function to an Excel `SUBTOTAL` formula string. The
//! SUBTOTAL function code selects both the aggregate and whether rows hidden
//! by an autofilter are excluded: the filter-aware codes are the plain codes
//! offset by +100, per the spreadsheet format's own convention.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Aggregate applied in a column's totals row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TotalsFunction {
    /// No totals cell for this column.
    #[default]
    None,
    Sum,
    Average,
    /// Count of non-empty cells (COUNTA).
    Count,
    Max,
    Min,
    /// A literal text label instead of an aggregate.
    Text,
}

impl TotalsFunction {
    /// The SUBTOTAL function code, before any autofilter offset.
    ///
    /// `None` and `Text` have no code; they do not produce a SUBTOTAL call.
    fn subtotal_code(self) -> Option<u16> {
        match self {
            TotalsFunction::Sum => Some(9),
            TotalsFunction::Average => Some(1),
            TotalsFunction::Count => Some(3),
            TotalsFunction::Max => Some(4),
            TotalsFunction::Min => Some(5),
            TotalsFunction::None | TotalsFunction::Text => None,
        }
    }
}

impl FromStr for TotalsFunction {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Ok(TotalsFunction::None),
            "sum" => Ok(TotalsFunction::Sum),
            "average" => Ok(TotalsFunction::Average),
            "count" => Ok(TotalsFunction::Count),
            "max" => Ok(TotalsFunction::Max),
            "min" => Ok(TotalsFunction::Min),
            "text" => Ok(TotalsFunction::Text),
            _ => Err(ModelError::InvalidEnum {
                type_name: "TotalsFunction",
                value: value.to_string(),
            }),
        }
    }
}

/// Resolve the totals-row formula for a column.
///
/// - `TotalsFunction::None` yields an empty string (no cell written).
/// - `TotalsFunction::Text` yields a literal text formula carrying `label`.
/// - Every other function yields `SUBTOTAL(<code>, <range>)`, with the code
///   offset by +100 when `has_autofilter` so hidden rows are excluded.
pub fn totals_formula(
    function: TotalsFunction,
    range: &str,
    has_autofilter: bool,
    label: &str,
) -> String {
    if function == TotalsFunction::Text {
        return format!("\"{label}\"");
    }
    match function.subtotal_code() {
        Some(code) => {
            let code = if has_autofilter { code + 100 } else { code };
            format!("SUBTOTAL({code}, {range})")
        }
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
