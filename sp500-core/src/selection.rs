//! Turning a company selection into a price request.
//!
//! The request names the symbols to download and, separately, the companies
//! to chart. They differ only when single-company padding is on: the extra
//! companion symbol is downloaded but never charted.

use crate::data::{Company, ConstituentTable};

pub const NO_COMPANY_PROMPT: &str = "Choose at least one company first (Sidebar to the left).";
pub const SINGLE_COMPANY_NOTE: &str =
    "One company selected: showing its chart. Select more companies to compare.";

/// What to download and what to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    /// Symbols to download, targets first.
    pub symbols: Vec<String>,
    /// Companies to chart, in selection order.
    pub targets: Vec<Company>,
}

impl ChartRequest {
    /// Symbols that are downloaded but not charted.
    pub fn companions(&self) -> Vec<&str> {
        self.symbols
            .iter()
            .map(String::as_str)
            .filter(|s| !self.targets.iter().any(|t| t.symbol == *s))
            .collect()
    }
}

/// Result of planning a fetch from the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartPlan {
    /// Nothing selected: no download, show the prompt.
    Empty,
    Fetch(ChartRequest),
}

impl ChartPlan {
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            ChartPlan::Empty => Some(NO_COMPANY_PROMPT),
            ChartPlan::Fetch(req) if req.targets.len() == 1 => Some(SINGLE_COMPANY_NOTE),
            ChartPlan::Fetch(_) => None,
        }
    }
}

/// Resolve selected display names against the full table.
///
/// Names are resolved in the order given; unknown or repeated names are
/// dropped. With `pad_single` a single target is paired with the first
/// table row that is a different company.
pub fn plan_charts(table: &ConstituentTable, selected: &[String], pad_single: bool) -> ChartPlan {
    let mut targets: Vec<Company> = Vec::with_capacity(selected.len());
    for name in selected {
        if let Some(company) = table.company_by_security(name) {
            if !targets.contains(&company) {
                targets.push(company);
            }
        }
    }

    if targets.is_empty() {
        return ChartPlan::Empty;
    }

    let mut symbols: Vec<String> = targets.iter().map(|c| c.symbol.clone()).collect();
    if pad_single && targets.len() == 1 {
        let companion = (0..table.row_count())
            .filter_map(|i| table.symbol(i))
            .find(|s| *s != targets[0].symbol);
        if let Some(s) = companion {
            symbols.push(s.to_string());
        }
    }

    ChartPlan::Fetch(ChartRequest { symbols, targets })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::constituents::fixtures::sample_table;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn nothing_selected_plans_no_fetch() {
        let plan = plan_charts(&sample_table(), &[], true);
        assert_eq!(plan, ChartPlan::Empty);
        assert_eq!(plan.guidance(), Some(NO_COMPANY_PROMPT));
    }

    #[test]
    fn unknown_names_only_plans_no_fetch() {
        let plan = plan_charts(&sample_table(), &names(&["Not a company"]), false);
        assert_eq!(plan, ChartPlan::Empty);
    }

    #[test]
    fn single_company_without_padding() {
        let ChartPlan::Fetch(req) = plan_charts(&sample_table(), &names(&["Apple Inc."]), false)
        else {
            panic!("expected a fetch");
        };
        assert_eq!(req.symbols, vec!["AAPL"]);
        assert_eq!(req.targets.len(), 1);
        assert!(req.companions().is_empty());
    }

    #[test]
    fn single_company_padding_adds_first_row_as_companion() {
        let ChartPlan::Fetch(req) = plan_charts(&sample_table(), &names(&["Apple Inc."]), true)
        else {
            panic!("expected a fetch");
        };
        assert_eq!(req.symbols, vec!["AAPL", "MMM"]);
        assert_eq!(req.targets[0].symbol, "AAPL");
        assert_eq!(req.companions(), vec!["MMM"]);
    }

    #[test]
    fn padding_skips_the_target_itself() {
        let ChartPlan::Fetch(req) = plan_charts(&sample_table(), &names(&["3M"]), true) else {
            panic!("expected a fetch");
        };
        assert_eq!(req.symbols, vec!["MMM", "AOS"]);
        assert_eq!(req.targets.len(), 1);
    }

    #[test]
    fn many_companies_keep_selection_order() {
        let plan = plan_charts(
            &sample_table(),
            &names(&["Berkshire Hathaway", "3M", "Abbott", "3M"]),
            true,
        );
        let ChartPlan::Fetch(req) = plan else {
            panic!("expected a fetch");
        };
        let order: Vec<_> = req.targets.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(order, vec!["BRK.B", "MMM", "ABT"]);
        assert_eq!(req.symbols.len(), 3);
        assert_eq!(plan_charts(&sample_table(), &names(&["3M", "Abbott"]), true).guidance(), None);
    }
}
