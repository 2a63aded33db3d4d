use anyhow::{Context, Result};
use log::{debug, error, info};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use crate::{amount::Amount, status::Status};

/// Maps product names to their unit prices.
///
/// Every name is non-empty, and every price is greater than zero. To build a
/// catalog from a price list file, use [`load_price_catalog`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceCatalog(HashMap<String, f64>);

impl PriceCatalog {
    /// Builds a catalog from raw price list entries, dropping any entry
    /// without a non-empty `title` or a numeric `price` above zero.
    ///
    /// If more than one valid entry has the same title, the last one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use serde_json::json;
    /// # use sales_total::PriceCatalog;
    /// let catalog = PriceCatalog::from_entries(vec![
    ///     json!({ "title": "Brown eggs", "price": 28.1 }),
    ///     json!({ "title": "", "price": 10 }),
    ///     json!({ "title": "Free sample", "price": 0 }),
    /// ]);
    /// assert_eq!(catalog.len(), 1);
    /// assert_eq!(catalog.price("Brown eggs").unwrap().value(), 28.1);
    /// ```
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = Value>) -> Self {
        let mut prices = HashMap::new();
        for entry in entries {
            if !entry.is_object() {
                debug!("dropping price list entry: not an object: {entry}");
                continue;
            }
            let Ok(CatalogEntry { title, price }) = serde_json::from_value(entry) else {
                debug!("dropping price list entry: unreadable");
                continue;
            };
            match (title, price) {
                (Some(title), Some(price)) if !title.is_empty() && price > 0.0 => {
                    prices.insert(title, price);
                }
                (title, price) => {
                    debug!("dropping price list entry: title {title:?}, price {price:?}");
                }
            }
        }
        Self(prices)
    }

    /// Returns the unit price of `product`, if it's in the catalog.
    #[must_use]
    pub fn price(&self, product: &str) -> Option<Amount> {
        self.0.get(product).copied().map(Amount::from)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The parts of a price list entry we care about.
///
/// A field of the wrong type reads as missing, so it only invalidates its own
/// entry.
#[serde_as]
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    title: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    price: Option<f64>,
}

/// One entry from the sales list, exactly as it was read.
///
/// Records aren't validated when they're loaded. Use [`SaleRecord::line`] to
/// find out whether a record is usable.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SaleRecord(Value);

impl SaleRecord {
    /// Returns the record's `Product` value and its quantity, provided the
    /// record has both a `Product` and a `Quantity`, and the quantity is a
    /// number.
    ///
    /// # Examples
    ///
    /// ```
    /// # use serde_json::json;
    /// # use sales_total::SaleRecord;
    /// let sale = SaleRecord::from(json!({ "Product": "Brown eggs", "Quantity": 2 }));
    /// let (product, qty) = sale.line().unwrap();
    /// assert_eq!(product, "Brown eggs");
    /// assert_eq!(qty, 2.0);
    ///
    /// let sale = SaleRecord::from(json!({ "Product": "Brown eggs", "Quantity": "2" }));
    /// assert_eq!(sale.line(), None);
    /// ```
    #[must_use]
    pub fn line(&self) -> Option<(&Value, f64)> {
        let record = self.0.as_object()?;
        let product = record.get("Product")?;
        let qty = record.get("Quantity")?.as_f64()?;
        Some((product, qty))
    }
}

impl From<Value> for SaleRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Reads the price list at `path` and builds a [`PriceCatalog`] from it.
///
/// Returns [`Status::Error`] and no catalog if the file can't be read, or isn't
/// a JSON array. Returns [`Status::Empty`] if no entry in the list was usable.
/// Otherwise returns [`Status::Ok`].
pub fn load_price_catalog(path: impl AsRef<Path>) -> (Status, Option<PriceCatalog>) {
    let entries = match read_json_array(path.as_ref()) {
        Ok(entries) => entries,
        Err(e) => {
            report_load_error("price list", &e);
            return (Status::Error, None);
        }
    };
    let catalog = PriceCatalog::from_entries(entries);
    info!(
        "loaded {} priced products from {}",
        catalog.len(),
        path.as_ref().display()
    );
    let status = if catalog.is_empty() {
        Status::Empty
    } else {
        Status::Ok
    };
    (status, Some(catalog))
}

/// Reads the sales list at `path`.
///
/// Returns [`Status::Error`] and no records if the file can't be read, or isn't
/// a JSON array. Returns [`Status::Empty`] if the array is empty. Otherwise
/// returns [`Status::Ok`].
pub fn load_sales_list(path: impl AsRef<Path>) -> (Status, Option<Vec<SaleRecord>>) {
    let sales: Vec<SaleRecord> = match read_json_array(path.as_ref()) {
        Ok(values) => values.into_iter().map(SaleRecord::from).collect(),
        Err(e) => {
            report_load_error("sales list", &e);
            return (Status::Error, None);
        }
    };
    info!(
        "loaded {} sale records from {}",
        sales.len(),
        path.as_ref().display()
    );
    let status = if sales.is_empty() {
        Status::Empty
    } else {
        Status::Ok
    };
    (status, Some(sales))
}

fn read_json_array(path: &Path) -> Result<Vec<Value>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let values: Vec<Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(values)
}

fn report_load_error(what: &str, e: &anyhow::Error) {
    error!("reading {what}: {e:#}");
    println!("[ERROR] - An exception ocurred while processing {what} file: {e:#}");
}
