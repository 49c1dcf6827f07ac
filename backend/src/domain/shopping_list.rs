//! Shopping-list aggregation and report rendering.
//!
//! Lines from every recipe in a user's cart are grouped by the exact
//! `(name, measurement_unit)` pair and summed. Items are numbered from one
//! in name order, with the unit breaking ties.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// First line of every rendered report.
pub const SHOPPING_LIST_HEADER: &str = "Shopping list";

const CSV_HEADER: &str = "position,name,amount,measurement_unit";

/// One ingredient line contributed by a recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartIngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

impl CartIngredientLine {
    /// Convenience constructor used by adapters and tests.
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Aggregated purchase line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub position: usize,
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: u64,
}

/// Ordered, aggregated shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Group and sum cart lines.
    ///
    /// # Examples
    /// ```
    /// use recipebook::domain::{CartIngredientLine, ShoppingList};
    ///
    /// let list = ShoppingList::aggregate([
    ///     CartIngredientLine::new("flour", "g", 2),
    ///     CartIngredientLine::new("egg", "pc", 1),
    ///     CartIngredientLine::new("flour", "g", 3),
    /// ]);
    /// let totals: Vec<_> = list
    ///     .items()
    ///     .iter()
    ///     .map(|item| (item.name.as_str(), item.total_amount))
    ///     .collect();
    /// assert_eq!(totals, [("egg", 1), ("flour", 5)]);
    /// ```
    pub fn aggregate(lines: impl IntoIterator<Item = CartIngredientLine>) -> Self {
        let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
        for line in lines {
            *totals
                .entry((line.name, line.measurement_unit))
                .or_default() += u64::from(line.amount);
        }
        let items = totals
            .into_iter()
            .enumerate()
            .map(|(index, ((name, measurement_unit), total_amount))| ShoppingListItem {
                position: index + 1,
                name,
                measurement_unit,
                total_amount,
            })
            .collect();
        Self { items }
    }

    /// Aggregated items in report order.
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// `true` when the cart contributed no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the list in the requested format.
    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.render_text(),
            ReportFormat::Csv => self.render_csv(),
        }
    }

    /// Plain-text report: the header followed by `"{n}. {name} - {amount} {unit}"`.
    pub fn render_text(&self) -> String {
        let mut out = String::from(SHOPPING_LIST_HEADER);
        out.push('\n');
        for item in &self.items {
            out.push_str(&format!(
                "{}. {} - {} {}\n",
                item.position, item.name, item.total_amount, item.measurement_unit
            ));
        }
        out
    }

    /// CSV report with RFC 4180 quoting.
    pub fn render_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push_str("\r\n");
        for item in &self.items {
            out.push_str(&format!(
                "{},{},{},{}\r\n",
                item.position,
                csv_field(&item.name),
                item.total_amount,
                csv_field(&item.measurement_unit)
            ));
        }
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Download formats for the shopping list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    #[serde(rename = "txt")]
    Text,
    Csv,
}

impl ReportFormat {
    /// Attachment file name.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Text => "shopping_list.txt",
            Self::Csv => "shopping_list.csv",
        }
    }

    /// MIME type of the rendered report.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// Raised when a report format is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported report format {0:?}; expected \"txt\" or \"csv\"")]
pub struct UnsupportedReportFormat(pub String);

impl FromStr for ReportFormat {
    type Err = UnsupportedReportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            _ => Err(UnsupportedReportFormat(s.to_owned())),
        }
    }
}
