use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InspectArgs;
use crate::extract::{PageRole, ParsedSheet, parse_sheet};
use crate::grid::Grid;

pub fn run(args: InspectArgs) -> Result<()> {
    let role = PageRole::from_tag(&args.role);
    if role == PageRole::Unknown {
        bail!(
            "unknown page role {:?}; expected cover, page1, page2 or page3..page13",
            args.role
        );
    }

    let grid = Grid::load(&args.grid)?;
    let parsed = parse_sheet(&grid, role);
    info!(
        grid = %args.grid.display(),
        page = %role,
        schema = parsed.schema.as_str(),
        "inspected sheet"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &parsed)
            .context("failed to serialize inspect json output")?;
        writeln!(output)?;
    } else {
        write_summary(&mut output, &parsed)?;
    }
    output.flush()?;
    Ok(())
}

fn write_summary(output: &mut impl Write, parsed: &ParsedSheet) -> Result<()> {
    writeln!(output, "Page: {}", parsed.role)?;
    writeln!(output, "Schema: {}", parsed.schema.as_str())?;

    if let Some(columns) = &parsed.columns {
        writeln!(
            output,
            "Columns: field_key={} element={} html_hook={} data_type={} values={:?}",
            columns.field_key, columns.element, columns.html_hook, columns.data_type, columns.values
        )?;
    }

    writeln!(output, "Text updates: {}", parsed.text_updates.len())?;
    for (index, update) in parsed.text_updates.iter().enumerate() {
        writeln!(output, "{}.\t#{}\t{}", index + 1, update.id, update.value)?;
    }

    match &parsed.record {
        Some(record) => writeln!(output, "Record fields: {}", record.field_names().join(", "))?,
        None => writeln!(output, "Record: (none)")?,
    }

    Ok(())
}
