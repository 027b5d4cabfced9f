use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

use crate::application::{BalanceRow, ExpenseRow, LedgerContext};
use crate::domain::{format_amount, join_names, SettlementTransaction};

/// What to export from a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportType {
    Expenses,
    Balances,
    Transactions,
    Full,
}

impl FromStr for ExportType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "expenses" => Ok(ExportType::Expenses),
            "balances" => Ok(ExportType::Balances),
            "transactions" => Ok(ExportType::Transactions),
            "full" => Ok(ExportType::Full),
            other => bail!(
                "Unknown export type '{}'. Valid types: expenses, balances, transactions, full",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => bail!("Unknown format '{}'. Valid formats: csv, json", other),
        }
    }
}

/// Session snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub expenses: Vec<ExpenseRow>,
    pub balances: Vec<BalanceRow>,
    pub transactions: Vec<SettlementTransaction>,
}

/// Exporter for converting session data to CSV or JSON
pub struct Exporter<'a> {
    context: &'a LedgerContext,
}

impl<'a> Exporter<'a> {
    pub fn new(context: &'a LedgerContext) -> Self {
        Self { context }
    }

    /// Export `export_type` rows in `format`; returns the number of rows written.
    /// A full export is always JSON.
    pub fn export<W: Write>(
        &self,
        writer: W,
        export_type: ExportType,
        format: ExportFormat,
    ) -> Result<usize> {
        match (export_type, format) {
            (ExportType::Full, _) => {
                let snapshot = self.export_full_json(writer)?;
                Ok(snapshot.expenses.len())
            }
            (ExportType::Expenses, ExportFormat::Csv) => self.export_expenses_csv(writer),
            (ExportType::Balances, ExportFormat::Csv) => self.export_balances_csv(writer),
            (ExportType::Transactions, ExportFormat::Csv) => {
                self.export_transactions_csv(writer)
            }
            (ExportType::Expenses, ExportFormat::Json) => {
                write_json(writer, &self.context.expense_rows())
            }
            (ExportType::Balances, ExportFormat::Json) => {
                write_json(writer, &self.context.balance_rows())
            }
            (ExportType::Transactions, ExportFormat::Json) => {
                write_json(writer, &self.context.settlement())
            }
        }
    }

    /// Export expense history to CSV format
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let rows = self.context.expense_rows();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["date", "description", "amount", "paid_by", "split_among"])?;

        for row in &rows {
            csv_writer.write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.description.clone(),
                format_amount(row.amount),
                row.paid_by.to_string(),
                join_names(&row.split_among),
            ])?;
        }

        csv_writer.flush()?;
        Ok(rows.len())
    }

    /// Export current balances to CSV format
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let rows = self.context.balance_rows();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["participant", "balance", "status"])?;

        for row in &rows {
            csv_writer.write_record([
                row.participant.as_str(),
                format_amount(row.balance).as_str(),
                row.status.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(rows.len())
    }

    /// Export suggested payments to CSV format
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.context.settlement();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["from", "to", "amount"])?;

        for transaction in &transactions {
            csv_writer.write_record([
                transaction.from.as_str(),
                transaction.to.as_str(),
                format_amount(transaction.amount).as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export everything as one JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<SessionSnapshot> {
        let snapshot = SessionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            expenses: self.context.expense_rows(),
            balances: self.context.balance_rows(),
            transactions: self.context.settlement(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

fn write_json<W: Write, T: Serialize>(mut writer: W, rows: &[T]) -> Result<usize> {
    let json = serde_json::to_string_pretty(rows)?;
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(rows.len())
}
