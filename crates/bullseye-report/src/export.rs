//! Flat text exports of a report.

use std::io::Write;

use crate::error::Result;
use crate::payload::MatchReport;
use crate::table::ReportTable;

/// Write the table as CSV: header rows first, spanned labels in their first
/// column, then one line per shooter.
pub fn write_table_csv<W: Write>(table: &ReportTable, writer: W) -> Result<()> {
    let width = usize::from(table.column_count());
    let mut out = csv::WriterBuilder::new().flexible(false).from_writer(writer);

    for header in &table.header_rows {
        let mut record = vec![String::new(); width];
        for cell in header {
            if let Some(slot) = record.get_mut(usize::from(cell.col)) {
                slot.clone_from(&cell.label);
            }
        }
        out.write_record(&record)?;
    }
    for row in &table.rows {
        let mut record: Vec<String> = row.cells.iter().map(ToString::to_string).collect();
        record.resize(width, String::new());
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Write the report payload as pretty-printed JSON.
pub fn write_report_json<W: Write>(report: &MatchReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
