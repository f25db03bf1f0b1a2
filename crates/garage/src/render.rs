//! Active-table rendering and the terminal surface.
//!
//! [`render`] turns the stored vehicle list into instructions for the active
//! table. [`TerminalSurface`] is the user-interface adapter: it applies
//! instructions to its own copy of the table and writes notices and history
//! reports to an output stream.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::app::{CheckOutRequest, Instruction};
use crate::error::Result;
use crate::format::{format_date_time, DisplayZone};
use crate::vehicle::Vehicle;

/// One row of the active table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Vehicle name.
    pub name: String,
    /// Licence plate.
    pub licence: String,
    /// Owner.
    pub owner: String,
    /// Check-in time as displayed (`dd/MM/yyyy HH:mm`).
    pub checked_in: String,
    /// Raw check-in instant, carried as row metadata.
    pub checked_in_at: DateTime<Utc>,
}

impl TableRow {
    /// Build the row for `vehicle`.
    #[must_use]
    pub fn from_vehicle(vehicle: &Vehicle, zone: DisplayZone) -> Self {
        Self {
            name: vehicle.name.clone(),
            licence: vehicle.licence.clone(),
            owner: vehicle.owner.clone(),
            checked_in: format_date_time(vehicle.time, zone),
            checked_in_at: vehicle.time,
        }
    }

    /// The request the row's check-out action sends.
    #[must_use]
    pub fn check_out_request(&self) -> CheckOutRequest {
        CheckOutRequest {
            name: self.name.clone(),
            licence: self.licence.clone(),
            owner: self.owner.clone(),
            checked_in_at: self.checked_in_at,
        }
    }
}

/// Rows for every vehicle still parked, in stored order.
#[must_use]
pub fn active_rows(vehicles: &[Vehicle], zone: DisplayZone) -> Vec<TableRow> {
    vehicles
        .iter()
        .filter(|v| v.is_parked())
        .map(|v| TableRow::from_vehicle(v, zone))
        .collect()
}

/// Instructions that redraw the active table from scratch.
#[must_use]
pub fn render(vehicles: &[Vehicle], zone: DisplayZone) -> Vec<Instruction> {
    std::iter::once(Instruction::ClearTable)
        .chain(active_rows(vehicles, zone).into_iter().map(Instruction::AppendRow))
        .collect()
}

/// Output format for tables and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceFormat {
    /// Aligned text table.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Terminal user interface.
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
    format: SurfaceFormat,
    rows: Vec<TableRow>,
    owner_field: Option<String>,
    html_path: Option<PathBuf>,
}

impl<W: Write> TerminalSurface<W> {
    /// Create a surface writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            format: SurfaceFormat::default(),
            rows: Vec::new(),
            owner_field: None,
            html_path: None,
        }
    }

    /// Print tables and reports in `format`.
    #[must_use]
    pub fn with_format(mut self, format: SurfaceFormat) -> Self {
        self.format = format;
        self
    }

    /// Write opened history reports as HTML to `path` instead of the stream.
    #[must_use]
    pub fn with_html_output(mut self, path: Option<PathBuf>) -> Self {
        self.html_path = path;
        self
    }

    /// Rows currently in the active table.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// First displayed row with `licence`.
    #[must_use]
    pub fn find_row(&self, licence: &str) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.licence == licence)
    }

    /// Current content of the owner field.
    #[must_use]
    pub fn owner_field(&self) -> Option<&str> {
        self.owner_field.as_deref()
    }

    /// Consume the surface and return its output stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Apply a batch of instructions.
    ///
    /// # Errors
    ///
    /// Returns an error if writing a notice or report fails.
    pub fn apply(&mut self, instructions: Vec<Instruction>) -> Result<()> {
        for instruction in instructions {
            self.apply_one(instruction)?;
        }
        Ok(())
    }

    fn apply_one(&mut self, instruction: Instruction) -> Result<()> {
        match instruction {
            Instruction::ClearTable => self.rows.clear(),
            Instruction::AppendRow(row) => self.rows.push(row),
            Instruction::ClearForm => {
                trace!("Clearing form fields");
                self.owner_field = None;
            }
            Instruction::PrefillOwner(name) => self.owner_field = Some(name),
            Instruction::Notice(notice) => writeln!(self.out, "{notice}")?,
            Instruction::OpenHistory(report) => {
                if let Some(path) = &self.html_path {
                    std::fs::write(path, report.to_html())?;
                    debug!("Wrote history report to {}", path.display());
                    writeln!(
                        self.out,
                        "History ({} vehicles) written to {}",
                        report.len(),
                        path.display()
                    )?;
                } else {
                    match self.format {
                        SurfaceFormat::Table => report.write_table(&mut self.out)?,
                        SurfaceFormat::Json => {
                            serde_json::to_writer_pretty(&mut self.out, &report)?;
                            writeln!(self.out)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Write a line of text that is not tied to an instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_message(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    /// Print the active table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn print_table(&mut self) -> Result<()> {
        match self.format {
            SurfaceFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, &self.rows)?;
                writeln!(self.out)?;
            }
            SurfaceFormat::Table if self.rows.is_empty() => {
                writeln!(self.out, "No vehicles parked.")?;
            }
            SurfaceFormat::Table => {
                let cells: Vec<[&str; 4]> = self
                    .rows
                    .iter()
                    .map(|r| {
                        [
                            r.name.as_str(),
                            r.licence.as_str(),
                            r.owner.as_str(),
                            r.checked_in.as_str(),
                        ]
                    })
                    .collect();
                write_table(
                    &mut self.out,
                    ["Vehicle", "Licence", "Owner", "Check-in"],
                    &cells,
                )?;
            }
        }
        Ok(())
    }
}

/// Write an aligned four-column text table.
pub(crate) fn write_table<W: Write + ?Sized>(
    out: &mut W,
    headers: [&str; 4],
    rows: &[[&str; 4]],
) -> std::io::Result<()> {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, &headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
    write_line(out, &rule, &widths)?;
    for row in rows {
        write_line(out, row, &widths)?;
    }
    Ok(())
}

fn write_line<W: Write + ?Sized>(
    out: &mut W,
    cells: &[&str],
    widths: &[usize; 4],
) -> std::io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}
