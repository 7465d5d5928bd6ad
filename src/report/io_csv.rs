// Writing the reports in CSV.

use std::io::Write;

use crate::report::*;

/// Writes the header of the schema, then one record per row.
pub fn write_report<W: Write>(
    rows: &[ReportRow],
    schema: &ReportSchema,
    sink: W,
) -> ReportResult<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record(schema.headers())
        .context(CsvWriteSnafu {})?;
    for row in rows.iter() {
        writer
            .write_record(row.fields(schema))
            .context(CsvWriteSnafu {})?;
    }
    writer.flush().context(CsvFlushSnafu {})?;
    Ok(())
}

pub fn render_report(rows: &[ReportRow], schema: &ReportSchema) -> ReportResult<String> {
    let mut buffer: Vec<u8> = Vec::new();
    write_report(rows, schema, &mut buffer)?;
    String::from_utf8(buffer).context(CsvEncodingSnafu {})
}
