use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;

use std::{
    fmt::{Debug, Display},
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    amount::Amount,
    loader::{PriceCatalog, SaleRecord},
};

/// The default name of the results file, relative to the working directory.
pub const RESULTS_FILE: &str = "SalesResults.txt";

/// Holds the running sales total for a pair of input files.
///
/// To create a new report, use [`Report::new`].
///
/// To add sales data, use [`Report::add_sales`] or [`Report::add_sale`].
///
/// To get a printable version of the report, use its [`Display`]
/// implementation. To save it, use [`Report::write`].
#[derive(Debug, Default)]
pub struct Report {
    price_list: PathBuf,
    sales_list: PathBuf,
    total: Amount,
    missing: Vec<String>,
}

impl Report {
    /// Creates a new report with a zero total, naming the input files it was
    /// built from.
    #[must_use]
    pub fn new(price_list: impl Into<PathBuf>, sales_list: impl Into<PathBuf>) -> Report {
        Self {
            price_list: price_list.into(),
            sales_list: sales_list.into(),
            ..Self::default()
        }
    }

    /// Adds each of `sales`, in order, to the total.
    pub fn add_sales<'a>(
        &mut self,
        catalog: &PriceCatalog,
        sales: impl IntoIterator<Item = &'a SaleRecord>,
    ) {
        for sale in sales {
            self.add_sale(catalog, sale);
        }
    }

    /// Adds the value of `sale` (unit price times quantity) to the total.
    ///
    /// Records with no `Product`, or no numeric `Quantity`, are skipped. If
    /// the product isn't in `catalog`, the sale is skipped and the product
    /// name is added to [`Report::missing_products`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use serde_json::json;
    /// # use sales_total::{PriceCatalog, Report, SaleRecord};
    /// let catalog = PriceCatalog::from_entries(vec![json!({ "title": "A", "price": 10.0 })]);
    /// let mut report = Report::new("prices.json", "sales.json");
    /// report.add_sale(&catalog, &SaleRecord::from(json!({ "Product": "A", "Quantity": 2 })));
    /// report.add_sale(&catalog, &SaleRecord::from(json!({ "Product": "C", "Quantity": 1 })));
    /// assert_eq!(report.total().to_string(), "20.00");
    /// assert_eq!(report.missing_products(), ["C"]);
    /// ```
    pub fn add_sale(&mut self, catalog: &PriceCatalog, sale: &SaleRecord) {
        let Some((product, qty)) = sale.line() else {
            debug!("skipping malformed sale record: {sale:?}");
            return;
        };
        match product.as_str().and_then(|name| catalog.price(name)) {
            Some(price) => self.total += price * qty,
            None => {
                let name = match product {
                    Value::String(name) => name.clone(),
                    other => other.to_string(),
                };
                info!("product {name:?} is not in the price list");
                self.missing.push(name);
            }
        }
    }

    #[must_use]
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Returns the names of products that were sold but aren't in the price
    /// list, in the order their sales were added (once per sale).
    #[must_use]
    pub fn missing_products(&self) -> &[String] {
        &self.missing
    }

    /// Writes the report to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns any errors from creating or writing the file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).with_context(|| format!("{}", path.display()))?;
        write!(file, "{self}").with_context(|| format!("{}", path.display()))?;
        Ok(())
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "PRICE_LIST:  {}", self.price_list.display())?;
        writeln!(f, "SALES_LIST:  {}", self.sales_list.display())?;
        writeln!(f, "TOTAL SALES: {}", self.total)?;
        Ok(())
    }
}

/// The wall-clock time a run took.
///
/// The [`Display`] implementation gives the report line for it, in seconds to
/// 6 decimal places.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct Elapsed(pub Duration);

impl Elapsed {
    /// Appends the elapsed time line to the file at `path`, creating the file
    /// if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns any errors from opening or writing the file.
    pub fn append_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("{}", path.display()))?;
        writeln!(file, "{self}").with_context(|| format!("{}", path.display()))?;
        Ok(())
    }
}

impl Debug for Elapsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Elapsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ELAPSED TIME: {:.6} seconds.", self.0.as_secs_f64())
    }
}
