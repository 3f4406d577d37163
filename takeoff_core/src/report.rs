//! # Result Table
//!
//! Turns [`QuantityTotals`] into labeled, unit-annotated rows in a
//! reproducible order. The table is plain data; [`file_io`](crate::file_io)
//! persists it.
//!
//! Rows are sorted by label with a stable sort, so identical input always
//! yields an identical table regardless of manifest ordering.
//!
//! ## Units
//!
//! Weight rows are labeled `kg`. Legacy takeoff sheets labeled them `m`
//! although the value was always a mass; only the label differs.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::QuantityTotals;
//! use takeoff_core::project::GlobalSettings;
//! use takeoff_core::report::ResultTable;
//! use takeoff_core::units::{CubicMeters, SqM};
//!
//! let totals = QuantityTotals {
//!     concrete_volume: CubicMeters(0.6),
//!     formwork_area: SqM(4.0),
//!     ..QuantityTotals::default()
//! };
//! let table = ResultTable::from_totals(&totals, &GlobalSettings::default());
//! assert_eq!(table.rows()[0].label, "Concrete total volume");
//! assert_eq!(table.rows()[1].unit, "m^2");
//! ```

use std::fmt;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::QuantityTotals;
use crate::errors::{TakeoffError, TakeoffResult};
use crate::materials::BarSize;
use crate::project::{GlobalSettings, LabelLanguage, TakeoffProject, SCHEMA_VERSION};

/// What a row measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    ConcreteVolume,
    FormworkArea,
    RebarWeight,
    RebarLength,
}

impl RowKind {
    pub fn unit(&self) -> &'static str {
        match self {
            RowKind::ConcreteVolume => "m^3",
            RowKind::FormworkArea => "m^2",
            RowKind::RebarWeight => "kg",
            RowKind::RebarLength => "m",
        }
    }
}

/// One output quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub kind: RowKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_size: Option<BarSize>,
}

impl TableRow {
    fn new(kind: RowKind, bar_size: Option<&BarSize>, value: f64, language: LabelLanguage) -> Self {
        TableRow {
            label: label_for(kind, bar_size, language),
            value,
            unit: kind.unit().to_string(),
            kind,
            bar_size: bar_size.cloned(),
        }
    }
}

fn label_for(kind: RowKind, bar_size: Option<&BarSize>, language: LabelLanguage) -> String {
    let bar = bar_size.map(BarSize::as_str).unwrap_or_default();
    match (language, kind) {
        (LabelLanguage::English, RowKind::ConcreteVolume) => "Concrete total volume".to_string(),
        (LabelLanguage::English, RowKind::FormworkArea) => "Formwork total area".to_string(),
        (LabelLanguage::English, RowKind::RebarWeight) => format!("Rebar {} total weight", bar),
        (LabelLanguage::English, RowKind::RebarLength) => format!("Rebar {} total length", bar),
        (LabelLanguage::Chinese, RowKind::ConcreteVolume) => "混凝土總體積".to_string(),
        (LabelLanguage::Chinese, RowKind::FormworkArea) => "模板總面積".to_string(),
        (LabelLanguage::Chinese, RowKind::RebarWeight) => format!("{}鋼筋總重量", bar),
        (LabelLanguage::Chinese, RowKind::RebarLength) => format!("{}鋼筋總長度", bar),
    }
}

/// Labeled takeoff results, sorted by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    language: LabelLanguage,
    rows: Vec<TableRow>,
}

impl ResultTable {
    /// Build the table from converted totals.
    pub fn from_totals(totals: &QuantityTotals, settings: &GlobalSettings) -> Self {
        let language = settings.label_language;
        let mut rows = vec![
            TableRow::new(RowKind::ConcreteVolume, None, totals.concrete_volume.0, language),
            TableRow::new(RowKind::FormworkArea, None, totals.formwork_area.0, language),
        ];
        for (bar, weight) in &totals.rebar_weights {
            rows.push(TableRow::new(RowKind::RebarWeight, Some(bar), weight.0, language));
        }
        if settings.include_lengths {
            for (bar, length) in &totals.rebar_lengths {
                rows.push(TableRow::new(RowKind::RebarLength, Some(bar), length.0, language));
            }
        }

        // Vec::sort_by is stable: equal labels keep insertion order
        rows.sort_by(|a, b| a.label.cmp(&b.label));

        ResultTable { language, rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a row by its label
    pub fn get(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    fn headers(&self) -> [&'static str; 3] {
        match self.language {
            LabelLanguage::English => ["item", "value", "unit"],
            LabelLanguage::Chinese => ["品類", "數值", "單位"],
        }
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> TakeoffResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.headers()).map_err(csv_error)?;
        for row in &self.rows {
            let value = row.value.to_string();
            csv.write_record([row.label.as_str(), value.as_str(), row.unit.as_str()])
                .map_err(csv_error)?;
        }
        csv.flush()
            .map_err(|e| TakeoffError::serialization(format!("CSV flush failed: {}", e)))
    }

    /// CSV rendering as a string
    pub fn to_csv_string(&self) -> TakeoffResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| TakeoffError::serialization(e.to_string()))
    }
}

fn csv_error(e: csv::Error) -> TakeoffError {
    TakeoffError::serialization(format!("CSV write failed: {}", e))
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0);
        for row in &self.rows {
            let pad = width - row.label.chars().count();
            writeln!(f, "{}{}  {:>14.4} {}", row.label, " ".repeat(pad), row.value, row.unit)?;
        }
        Ok(())
    }
}

/// Report header written alongside the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub schema_version: String,
    pub job_id: String,
    pub client: String,
    pub generated: DateTime<Utc>,
    pub instance_count: usize,
}

/// Full JSON result: metadata, raw totals, and the labeled table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeoffReport {
    pub meta: ReportMetadata,
    pub totals: QuantityTotals,
    pub table: ResultTable,
}

impl TakeoffReport {
    pub fn new(project: &TakeoffProject, totals: QuantityTotals) -> Self {
        let table = ResultTable::from_totals(&totals, &project.settings);
        TakeoffReport {
            meta: ReportMetadata {
                schema_version: SCHEMA_VERSION.to_string(),
                job_id: project.meta.job_id.clone(),
                client: project.meta.client.clone(),
                generated: Utc::now(),
                instance_count: totals.instance_count,
            },
            totals,
            table,
        }
    }
}
