//! Read-only history reports.
//!
//! A [`HistoryReport`] is a snapshot of the checked-out vehicles taken when
//! the history view is opened. It holds no handle on the store, so viewing a
//! report can never change stored data; clearing history is a separate
//! action.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{format_date_time, DisplayZone};
use crate::render::write_table;
use crate::vehicle::Vehicle;

const HTML_STYLE: &str = r"
      body { font-family: sans-serif; background-color: #1b1b1b; }
      table { border-collapse: collapse; width: 100%; }
      th, td { background-color: rgb(187, 192, 63); border: 1px solid black; padding: 8px; text-align: left; }
      .history-title { background-color: rgb(187, 192, 63); }
";

/// One checked-out vehicle in a history report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Licence plate.
    pub licence: String,
    /// Vehicle name.
    pub name: String,
    /// Owner.
    pub owner: String,
    /// Check-in time as displayed (`dd/MM/yyyy HH:mm`).
    pub checked_in: String,
    /// Raw check-in instant.
    pub checked_in_at: DateTime<Utc>,
}

/// Snapshot of the checked-out vehicles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryReport {
    entries: Vec<HistoryEntry>,
}

impl HistoryReport {
    /// Build a report from every checked-out vehicle in `vehicles`.
    #[must_use]
    pub fn from_vehicles(vehicles: &[Vehicle], zone: DisplayZone) -> Self {
        let entries = vehicles
            .iter()
            .filter(|v| !v.is_parked())
            .map(|v| HistoryEntry {
                licence: v.licence.clone(),
                name: v.name.clone(),
                owner: v.owner.clone(),
                checked_in: format_date_time(v.time, zone),
                checked_in_at: v.time,
            })
            .collect();
        Self { entries }
    }

    /// The entries, in stored order.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been checked out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the report as an aligned text table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_table<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Vehicle History")?;
        writeln!(out)?;
        let cells: Vec<[&str; 4]> = self
            .entries
            .iter()
            .map(|e| {
                [
                    e.licence.as_str(),
                    e.name.as_str(),
                    e.owner.as_str(),
                    e.checked_in.as_str(),
                ]
            })
            .collect();
        write_table(out, ["Licence", "Vehicle", "Owner", "Check-in"], &cells)
    }

    /// Render the report as a standalone static HTML page.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\">\n");
        html.push_str("    <title>Vehicle History</title>\n    <style>");
        html.push_str(HTML_STYLE);
        html.push_str("    </style>\n  </head>\n  <body>\n");
        html.push_str("    <h2 class=\"history-title\">Vehicle History</h2>\n");
        html.push_str("    <table id=\"history-table\">\n");
        html.push_str(
            "      <tr><th>Licence</th><th>Vehicle</th><th>Owner</th><th>Check-in</th></tr>\n",
        );
        for entry in &self.entries {
            html.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&entry.licence),
                escape_html(&entry.name),
                escape_html(&entry.owner),
                escape_html(&entry.checked_in),
            ));
        }
        html.push_str("    </table>\n  </body>\n</html>\n");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_vehicles() -> Vec<Vehicle> {
        let time = Utc.with_ymd_and_hms(2024, 8, 9, 7, 5, 0).unwrap();
        let mut civic = Vehicle::new("Civic", "ABC-1234", "Ana", time);
        civic.check_out();
        let mut kombi = Vehicle::new("Kombi <T2>", "VWK-1967", "Beto & Cia", time);
        kombi.check_out();
        vec![civic, Vehicle::new("Golf", "DEF-5678", "Bia", time), kombi]
    }

    #[test]
    fn test_report_keeps_checked_out_only() {
        let report = HistoryReport::from_vehicles(&create_test_vehicles(), DisplayZone::Utc);
        assert_eq!(report.len(), 2);
        assert_eq!(report.entries()[0].licence, "ABC-1234");
        assert_eq!(report.entries()[1].licence, "VWK-1967");
        assert_eq!(report.entries()[0].checked_in, "09/08/2024 07:05");
    }

    #[test]
    fn test_report_empty() {
        let time = Utc.with_ymd_and_hms(2024, 8, 9, 7, 5, 0).unwrap();
        let vehicles = vec![Vehicle::new("Golf", "DEF-5678", "Bia", time)];
        assert!(HistoryReport::from_vehicles(&vehicles, DisplayZone::Utc).is_empty());
    }

    #[test]
    fn test_write_table() {
        let report = HistoryReport::from_vehicles(&create_test_vehicles(), DisplayZone::Utc);
        let mut out = Vec::new();
        report.write_table(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Vehicle History");
        assert!(lines[2].starts_with("Licence"));
        assert!(lines[4].starts_with("ABC-1234"));
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_to_html_escapes_and_has_no_script() {
        let report = HistoryReport::from_vehicles(&create_test_vehicles(), DisplayZone::Utc);
        let html = report.to_html();

        assert!(html.contains("<td>Kombi &lt;T2&gt;</td>"));
        assert!(html.contains("<td>Beto &amp; Cia</td>"));
        assert!(html.contains("<th>Licence</th>"));
        assert!(!html.contains("<script"));
        assert_eq!(html.matches("<tr><td>").count(), 2);
    }

    #[test]
    fn test_to_html_one_row_per_line() {
        let report = HistoryReport::from_vehicles(&create_test_vehicles(), DisplayZone::Utc);
        let html = report.to_html();
        let rows: Vec<&str> = html.lines().filter(|l| l.contains("<tr><td>")).collect();

        assert_eq!(
            rows[0],
            "      <tr><td>ABC-1234</td><td>Civic</td><td>Ana</td><td>09/08/2024 07:05</td></tr>"
        );
        assert!(rows[1].ends_with("</tr>"));
        assert!(html.ends_with("</table>\n  </body>\n</html>\n"));
    }

    #[test]
    fn test_serialize_report() {
        let report = HistoryReport::from_vehicles(&create_test_vehicles(), DisplayZone::Utc);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entries"].as_array().unwrap().len(), 2);
        assert_eq!(json["entries"][0]["owner"], "Ana");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
