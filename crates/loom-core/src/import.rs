//! # CSV Product Import
//!
//! Bulk product load from a spreadsheet export.
//!
//! ## Expected Header
//! ```text
//! name,code,fabricType,size,color,purchaseCost,minSalePrice,maxSalePrice,
//! currentPrice,stock,minStock,supplier,batchInfo
//! ```
//! Columns are matched by header name (case-insensitive), so their order
//! does not matter. `name`, `code`, the four prices and `stock` are
//! required; the rest default to empty / zero.
//!
//! Each data row either becomes a [`Product`] or a [`RowError`]; one bad
//! row never aborts the whole file.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, ProductStatus};

/// Header names in export order.
pub const COLUMNS: [&str; 13] = [
    "name",
    "code",
    "fabricType",
    "size",
    "color",
    "purchaseCost",
    "minSalePrice",
    "maxSalePrice",
    "currentPrice",
    "stock",
    "minStock",
    "supplier",
    "batchInfo",
];

const REQUIRED: [&str; 7] = [
    "name",
    "code",
    "purchaseCost",
    "minSalePrice",
    "maxSalePrice",
    "currentPrice",
    "stock",
];

/// A row that could not be turned into a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RowError {
    /// 1-based line number in the file (the header is line 1).
    pub line: usize,
    pub message: String,
}

/// Outcome of parsing a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportReport {
    pub products: Vec<Product>,
    pub errors: Vec<RowError>,
}

// =============================================================================
// Tokenizer
// =============================================================================

/// Splits CSV text into records.
///
/// Handles quoted fields with embedded commas, newlines and doubled quotes
/// (`""`). Returns `(line_number, fields)` where the line number is where
/// the record starts.
pub fn parse_records(input: &str) -> Vec<(usize, Vec<String>)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    records
        .into_iter()
        .filter(|(_, f)| !(f.len() == 1 && f[0].trim().is_empty()))
        .collect()
}

// =============================================================================
// Row Mapping
// =============================================================================

struct HeaderMap {
    index: Vec<Option<usize>>,
}

impl HeaderMap {
    fn new(header: &[String]) -> Result<Self, String> {
        let index: Vec<Option<usize>> = COLUMNS
            .iter()
            .map(|col| {
                header
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(col))
            })
            .collect();

        let missing: Vec<&str> = REQUIRED
            .iter()
            .filter(|req| {
                COLUMNS
                    .iter()
                    .position(|c| c == *req)
                    .and_then(|i| index[i])
                    .is_none()
            })
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing required columns: {}", missing.join(", ")));
        }
        Ok(Self { index })
    }

    fn get<'a>(&self, row: &'a [String], column: &str) -> &'a str {
        COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.index[i])
            .and_then(|i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

fn parse_amount(field: &str, raw: &str) -> Result<i64, ValidationError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != ' ').collect();
    if cleaned.is_empty() {
        return Ok(0);
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return Ok(v);
    }
    // Spreadsheets like to export `1500.00`.
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v.round() as i64),
        _ => Err(ValidationError::invalid_format(
            field,
            format!("'{}' is not a number", raw),
        )),
    }
}

fn row_to_product(headers: &HeaderMap, row: &[String]) -> Result<Product, ValidationError> {
    let text = |col: &str| headers.get(row, col).to_string();
    let number = |col: &str| parse_amount(col, headers.get(row, col));

    let product = Product {
        id: String::new(),
        name: text("name"),
        code: text("code"),
        fabric_type: text("fabricType"),
        size: text("size"),
        color: text("color"),
        purchase_cost: Money::from_units(number("purchaseCost")?),
        min_sale_price: Money::from_units(number("minSalePrice")?),
        max_sale_price: Money::from_units(number("maxSalePrice")?),
        current_price: Money::from_units(number("currentPrice")?),
        stock: number("stock")?,
        min_stock: number("minStock")?,
        supplier: text("supplier"),
        batch_info: text("batchInfo"),
        status: ProductStatus::Active,
        created_at: None,
        updated_at: None,
    };
    product.validate()?;
    Ok(product)
}

/// Parses a whole file. A missing or malformed header yields a single
/// error on line 1 and no products.
pub fn parse_products(input: &str) -> ImportReport {
    let mut records = parse_records(input).into_iter();
    let mut report = ImportReport::default();

    let Some((_, header)) = records.next() else {
        report.errors.push(RowError {
            line: 1,
            message: "file is empty".to_string(),
        });
        return report;
    };

    let headers = match HeaderMap::new(&header) {
        Ok(h) => h,
        Err(message) => {
            report.errors.push(RowError { line: 1, message });
            return report;
        }
    };

    for (line, row) in records {
        match row_to_product(&headers, &row) {
            Ok(product) => report.products.push(product),
            Err(e) => report.errors.push(RowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,code,fabricType,size,color,purchaseCost,minSalePrice,maxSalePrice,currentPrice,stock,minStock,supplier,batchInfo";

    #[test]
    fn test_parse_records_quotes() {
        let recs = parse_records("a,\"b, c\",\"say \"\"hi\"\"\"\r\n\"multi\nline\",x\n\n");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].1, vec!["a", "b, c", "say \"hi\""]);
        assert_eq!(recs[1].0, 2);
        assert_eq!(recs[1].1, vec!["multi\nline", "x"]);
    }

    #[test]
    fn test_parse_products() {
        let csv = format!(
            "{HEADER}\n\
             Lawn Suit,LWN-01,Lawn,M,Blue,1200,1500,2200,1800,10,2,Gul Ahmed,B-7\n\
             \"Silk Shawl, Embroidered\",SLK-02,Silk,L,Red,\"3,000\",3500,5000,4200.00,4,1,,\n"
        );
        let report = parse_products(&csv);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(report.products.len(), 2);

        let shawl = &report.products[1];
        assert_eq!(shawl.name, "Silk Shawl, Embroidered");
        assert_eq!(shawl.purchase_cost.units(), 3000);
        assert_eq!(shawl.current_price.units(), 4200);
        assert_eq!(shawl.stock, 4);
    }

    #[test]
    fn test_bad_rows_are_reported_not_fatal() {
        let csv = format!(
            "{HEADER}\n\
             Good,G-1,,,,10,20,30,25,1,0,,\n\
             Bad Number,B-1,,,,ten,20,30,25,1,0,,\n\
             Bad Ladder,B-2,,,,10,20,30,99,1,0,,\n"
        );
        let report = parse_products(&csv);
        assert_eq!(report.products.len(), 1);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].line, 3);
        assert!(report.errors[0].message.contains("purchaseCost"));
        assert_eq!(report.errors[1].line, 4);
    }

    #[test]
    fn test_header_by_name_and_missing_columns() {
        let report = parse_products("CODE,Name,stock,currentPrice,maxSalePrice,minSalePrice,purchaseCost\nX-1,Scarf,3,100,120,80,50\n");
        assert_eq!(report.products.len(), 1);
        assert_eq!(report.products[0].name, "Scarf");

        let report = parse_products("name,code\nScarf,X-1\n");
        assert!(report.products.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("purchaseCost"));

        assert_eq!(parse_products("").errors[0].message, "file is empty");
    }
}
