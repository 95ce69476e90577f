use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

/// The worksheets the dashboard reads, in tab order.
///
/// The string form is the worksheet title as it appears in the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display, EnumIter)]
pub enum WorksheetName {
    #[strum(serialize = "Products")]
    Products,
    #[strum(serialize = "Sales Reps")]
    SalesReps,
    #[strum(serialize = "Sales Record")]
    SalesRecord,
    #[strum(serialize = "Sales Records")]
    SalesRecords,
    #[strum(serialize = "KPI Settings")]
    KpiSettings,
    #[strum(serialize = "Calculations")]
    Calculations,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown worksheet '{0}'")]
pub struct UnknownWorksheet(pub String);

impl WorksheetName {
    pub fn all() -> impl Iterator<Item = WorksheetName> {
        WorksheetName::iter()
    }

    /// Title of the dashboard tab showing this worksheet.
    pub fn tab_label(&self) -> &'static str {
        match self {
            WorksheetName::Products => "Products",
            WorksheetName::SalesReps => "Sales Reps",
            WorksheetName::SalesRecord => "Real-time Sales",
            WorksheetName::SalesRecords => "Historical Sales",
            WorksheetName::KpiSettings => "KPI Settings",
            WorksheetName::Calculations => "Calculations",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            WorksheetName::Products => "Product Catalog",
            WorksheetName::SalesReps => "Sales Representatives Information",
            WorksheetName::SalesRecord => "Real-time Sales Records (Google Form Input)",
            WorksheetName::SalesRecords => "Historical Sales Records",
            WorksheetName::KpiSettings => "KPI Settings and Individual Performance",
            WorksheetName::Calculations => "Processed Sales Data & Calculations",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WorksheetName::Products => "Details about all products offered by GadgetHub.",
            WorksheetName::SalesReps => "Information about our sales team members.",
            WorksheetName::SalesRecord => "Latest sales entries, potentially from a Google Form.",
            WorksheetName::SalesRecords => {
                "Comprehensive historical sales data for in-depth analysis."
            }
            WorksheetName::KpiSettings => {
                "Key Performance Indicators data, likely for monitoring individual or team goals."
            }
            WorksheetName::Calculations => {
                "Data that has already undergone various calculations or transformations."
            }
        }
    }
}

/// Accepts either the worksheet title or the tab label, ignoring case and
/// surrounding whitespace. `-` and `_` are read as spaces so that names can
/// be typed on a command line without quoting.
impl FromStr for WorksheetName {
    type Err = UnknownWorksheet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        WorksheetName::iter()
            .find(|name| normalize(name.as_ref()) == wanted || normalize(name.tab_label()) == wanted)
            .ok_or_else(|| UnknownWorksheet(s.trim().to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.trim().replace(['-', '_'], " ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_worksheets_in_tab_order() {
        let names: Vec<String> = WorksheetName::all().map(|w| w.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Products",
                "Sales Reps",
                "Sales Record",
                "Sales Records",
                "KPI Settings",
                "Calculations"
            ]
        );
    }

    #[test]
    fn test_parse_by_worksheet_title() {
        assert_eq!("Sales Reps".parse(), Ok(WorksheetName::SalesReps));
        assert_eq!("sales records".parse(), Ok(WorksheetName::SalesRecords));
        assert_eq!("  KPI Settings ".parse(), Ok(WorksheetName::KpiSettings));
    }

    #[test]
    fn test_parse_by_tab_label() {
        assert_eq!("Real-time Sales".parse(), Ok(WorksheetName::SalesRecord));
        assert_eq!("historical_sales".parse(), Ok(WorksheetName::SalesRecords));
    }

    #[test]
    fn test_parse_unknown() {
        let result: Result<WorksheetName, _> = "Inventory".parse();
        assert_eq!(result, Err(UnknownWorksheet("Inventory".to_string())));
    }

    #[test]
    fn test_as_ref_is_remote_title() {
        assert_eq!(WorksheetName::SalesRecord.as_ref(), "Sales Record");
        assert_eq!(WorksheetName::SalesRecord.tab_label(), "Real-time Sales");
    }
}
