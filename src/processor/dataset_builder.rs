use std::collections::HashSet;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{info, warn};

use crate::models::RawListing;
use crate::processor::style_lookup;

/// Square feet per acre, for lot sizes entered in the wrong unit.
const SQFT_PER_ACRE: f64 = 43560.0;

const NUMERIC_COLUMNS: &[&str] = &["price", "beds", "baths", "size", "lot", "broker_comp"];
const DATE_COLUMNS: &[&str] = &["year_built", "sold_date"];
// Carried through extraction but not used as modeling features.
const DROPPED_COLUMNS: &[&str] = &["address", "community", "style", "status", "parking", "url"];

/// Turns raw listing records into the final modeling table.
pub struct DatasetBuilder;

impl DatasetBuilder {
    pub fn new() -> Self {
        DatasetBuilder
    }

    /// Deduplicate, classify, coerce, unit-correct, project, and one-hot
    /// encode. Every step is total: unparseable values become nulls and flow
    /// through later steps untouched. An empty batch yields an empty frame.
    pub fn build(&self, records: &[RawListing]) -> Result<DataFrame> {
        let records = dedup_records(records);
        if records.is_empty() {
            return Ok(DataFrame::empty());
        }

        let mut df = self.records_to_dataframe(&records)?;

        for col_name in NUMERIC_COLUMNS {
            self.coerce_numeric_column(&mut df, col_name)?;
        }
        for col_name in DATE_COLUMNS {
            self.coerce_date_column(&mut df, col_name)?;
        }
        self.correct_lot_units(&mut df)?;

        let df = df.drop_many(DROPPED_COLUMNS.iter().copied());
        let df = df
            .columns_to_dummies(vec!["type"], None, true)
            .map_err(|e| anyhow!("Failed to encode type column: {}", e))?;

        info!(
            "Built dataset with {} rows and {} columns",
            df.height(),
            df.width()
        );
        Ok(df)
    }

    fn records_to_dataframe(&self, records: &[RawListing]) -> Result<DataFrame> {
        let fields: [(&str, fn(&RawListing) -> &str); 15] = [
            ("address", |r| &r.address),
            ("zip", |r| &r.zip),
            ("community", |r| &r.community),
            ("price", |r| &r.price),
            ("beds", |r| &r.beds),
            ("baths", |r| &r.baths),
            ("size", |r| &r.size),
            ("style", |r| &r.style),
            ("lot", |r| &r.lot),
            ("year_built", |r| &r.year_built),
            ("status", |r| &r.status),
            ("sold_date", |r| &r.sold_date),
            ("parking", |r| &r.parking),
            ("broker_comp", |r| &r.broker_comp),
            ("url", |r| &r.url),
        ];

        let mut columns = Vec::with_capacity(fields.len() + 2);
        for (name, get) in fields {
            let values: Vec<String> = records.iter().map(|r| get(r).to_string()).collect();
            let series = Series::new(name.into(), values);
            columns.push(series.into());
        }

        let types: Vec<String> = records
            .iter()
            .map(|r| style_lookup::classify_type(&r.style).label().to_string())
            .collect();
        columns.push(Series::new("type".into(), types).into());

        let basements: Vec<u32> = records
            .iter()
            .map(|r| style_lookup::has_basement(&r.style) as u32)
            .collect();
        columns.push(Series::new("has_basement".into(), basements).into());

        DataFrame::new(columns).map_err(|e| anyhow!("Failed to create DataFrame: {}", e))
    }

    fn coerce_numeric_column(&self, df: &mut DataFrame, col_name: &str) -> Result<()> {
        let parsed: Vec<Option<f64>> = df
            .column(col_name)?
            .str()?
            .into_no_null_iter()
            .map(|s| f64::from_str(s.trim()).ok())
            .collect();
        df.with_column(Series::new(col_name.into(), parsed))?;
        Ok(())
    }

    fn coerce_date_column(&self, df: &mut DataFrame, col_name: &str) -> Result<()> {
        let parsed: Vec<Option<NaiveDate>> = df
            .column(col_name)?
            .str()?
            .into_no_null_iter()
            .map(parse_date)
            .collect();
        let series = DateChunked::from_naive_date_options(col_name.into(), parsed).into_series();
        df.with_column(series)?;
        Ok(())
    }

    /// Lot sizes under 1 on house rows were entered in acres; rescale to
    /// square feet. Missing lots and non-house rows stay untouched.
    fn correct_lot_units(&self, df: &mut DataFrame) -> Result<()> {
        let types = df.column("type")?.str()?.clone();
        let lots = df.column("lot")?.f64()?;
        let corrected: Vec<Option<f64>> = types
            .into_iter()
            .zip(lots.into_iter())
            .map(|(kind, lot)| match (kind, lot) {
                (Some("house"), Some(value)) if value < 1.0 => Some(value * SQFT_PER_ACRE),
                (_, lot) => lot,
            })
            .collect();
        df.with_column(Series::new("lot".into(), corrected))?;
        Ok(())
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse exact duplicates (all fields including URL), keeping the first
/// occurrence in input order. The same listing reached through different
/// URLs survives this pass, so suspected cross-URL duplicates (same address
/// and ZIP, different record) are counted and surfaced in the logs instead
/// of silently kept.
fn dedup_records(records: &[RawListing]) -> Vec<RawListing> {
    let mut seen = HashSet::new();
    let mut kept: Vec<RawListing> = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.clone()) {
            kept.push(record.clone());
        }
    }

    let dropped = records.len() - kept.len();
    if dropped > 0 {
        info!("Dropped {} exact duplicate records", dropped);
    }

    let mut locations = HashSet::new();
    let mut suspects = 0usize;
    for record in &kept {
        if record.address.is_empty() {
            continue;
        }
        if !locations.insert((record.address.clone(), record.zip.clone())) {
            suspects += 1;
        }
    }
    if suspects > 0 {
        warn!(
            "{} records share an address and ZIP with an earlier record but differ elsewhere \
             (likely the same listing under different URLs); keeping all of them",
            suspects
        );
    }

    kept
}

/// Parse the date formats observed in the source: bare years ("1984"),
/// sale pill dates ("MAY 5, 2020"), and a couple of common fallbacks.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    for format in ["%b %d, %Y", "%B %d, %Y", "%m/%d/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}
