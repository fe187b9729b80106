//! CSV export of projection output and display helpers

use std::io::Write;

use serde::Serialize;

use super::records::{MonthlyRecord, YearlyRecord};
use super::summary::Summary;

/// One row of a batch summary file
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow<'a> {
    pub name: &'a str,
    pub final_balance: f64,
    pub total_invested: f64,
    pub total_contributions: f64,
    pub total_interest_earned: f64,
    pub total_encashed_interest: f64,
    pub balance_after_tax: Option<f64>,
    pub balance_after_inflation: Option<f64>,
    pub effective_annual_rate: f64,
}

impl<'a> SummaryRow<'a> {
    pub fn new(name: &'a str, summary: &Summary) -> Self {
        Self {
            name,
            final_balance: summary.final_balance,
            total_invested: summary.total_invested,
            total_contributions: summary.total_contributions,
            total_interest_earned: summary.total_interest_earned,
            total_encashed_interest: summary.total_encashed_interest,
            balance_after_tax: summary.balance_after_tax,
            balance_after_inflation: summary.balance_after_inflation,
            effective_annual_rate: summary.effective_annual_rate,
        }
    }
}

/// Write monthly records with a header row
pub fn write_monthly_csv<W: Write>(writer: W, records: &[MonthlyRecord]) -> Result<(), csv::Error> {
    write_rows(writer, records)
}

/// Write yearly records with a header row
pub fn write_yearly_csv<W: Write>(writer: W, records: &[YearlyRecord]) -> Result<(), csv::Error> {
    write_rows(writer, records)
}

/// Write batch summary rows with a header row
pub fn write_summary_csv<W: Write>(writer: W, rows: &[SummaryRow<'_>]) -> Result<(), csv::Error> {
    write_rows(writer, rows)
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Format an amount as dollars with thousands separators, e.g. `$12,345.67`
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}
