use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use import_core::{ImportSession, PreviewRow};
use import_map::{ConfidenceLevel, ConfidenceThresholds, MappingSummary, TemplateMetadata};
use import_model::{FieldCatalog, MappingTemplate};
use import_validate::{Finding, Severity};

pub fn print_catalog(catalog: &FieldCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Required"),
        header_cell("Format"),
        header_cell("Synonyms"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for field in catalog.fields() {
        let is_identifying = catalog.identifying_field() == Some(field.name.as_str());
        let name = if is_identifying {
            Cell::new(format!("{} (id)", field.name)).fg(Color::Cyan)
        } else {
            Cell::new(&field.name)
        };
        table.add_row(vec![
            name,
            flag_cell(field.required),
            field
                .format
                .map_or_else(|| dim_cell("-"), |format| Cell::new(format.label())),
            Cell::new(field.synonyms.join(", ")),
        ]);
    }
    println!("{table}");
}

pub fn print_mapping(session: &ImportSession) {
    let mapping = session.mapping();
    let thresholds = ConfidenceThresholds::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Level"),
        header_cell("Signal"),
        header_cell("Transform"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in mapping.mappings() {
        let matched = mapping
            .match_for(&column.source_header)
            .filter(|result| result.field == column.target_field);
        let field_cell = match column.target_field.as_deref() {
            Some(field) if mapping.catalog().is_required(field) => {
                Cell::new(field).add_attribute(Attribute::Bold)
            }
            Some(field) => Cell::new(field),
            None => dim_cell("(unmapped)"),
        };
        let level = matched.and_then(|result| result.level(&thresholds));
        let (confidence, level, signal) = match (matched, level) {
            (Some(result), Some(level)) => (
                Cell::new(format!("{:.0}%", result.confidence * 100.0)),
                level_cell(level),
                Cell::new(result.signal.label()),
            ),
            _ => (dim_cell("-"), dim_cell("-"), dim_cell("-")),
        };
        let transform = column
            .target_field
            .as_deref()
            .map(|field| mapping.transformation_for(field))
            .filter(|kind| !kind.is_none())
            .map_or_else(|| dim_cell("-"), |kind| Cell::new(kind.label()));
        table.add_row(vec![
            Cell::new(&column.source_header),
            field_cell,
            confidence,
            level,
            signal,
            transform,
        ]);
    }
    println!("{table}");

    if !mapping.default_values().is_empty() {
        let mut defaults = Table::new();
        defaults.set_header(vec![header_cell("Field"), header_cell("Default")]);
        apply_table_style(&mut defaults);
        for (field, value) in mapping.default_values() {
            defaults.add_row(vec![Cell::new(field), Cell::new(value)]);
        }
        println!("Defaults:");
        println!("{defaults}");
    }
    print_mapping_summary(&mapping.summary());
}

fn print_mapping_summary(summary: &MappingSummary) {
    println!(
        "Mapped {}/{} headers, {}/{} required fields, {} default(s)",
        summary.mapped_headers,
        summary.total_headers,
        summary.required_mapped,
        summary.required_total,
        summary.defaults
    );
    if !summary.all_required_mapped() {
        eprintln!(
            "Required fields without a header: {}",
            summary.unmapped_required.join(", ")
        );
    }
}

pub fn print_preview(session: &ImportSession, fields: &[String], rows: &[PreviewRow]) {
    let mut table = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend(fields.iter().map(String::as_str).map(header_cell));
    header.push(header_cell("Status"));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in rows {
        let mut cells = vec![Cell::new(row.index + 1)];
        cells.extend(fields.iter().map(|field| {
            if row.record.is_empty_value(field) {
                dim_cell("")
            } else {
                Cell::new(row.record.value(field))
            }
        }));
        cells.push(status_cell(row));
        table.add_row(cells);
    }
    println!(
        "Page {} of {} ({} rows, {} per page)",
        session.page_number(),
        session.total_pages(),
        session.rows().len(),
        session.page_size()
    );
    println!("{table}");
}

pub fn print_findings(findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    for finding in findings {
        table.add_row(vec![
            Cell::new(finding.row_index + 1),
            severity_cell(finding.severity),
            Cell::new(&finding.target_field),
            Cell::new(&finding.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

pub fn print_templates(templates: &[TemplateMetadata]) {
    if templates.is_empty() {
        println!("No saved templates.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Mappings"),
        header_cell("Defaults"),
        header_cell("Saved"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for template in templates {
        table.add_row(vec![
            Cell::new(template.id.as_str()),
            Cell::new(&template.name),
            count_cell(template.mapping_count),
            count_cell(template.default_count),
            template.saved_at.map_or_else(
                || dim_cell("-"),
                |at| Cell::new(at.format("%Y-%m-%d %H:%M")),
            ),
        ]);
    }
    println!("{table}");
}

pub fn print_template(template: &MappingTemplate) {
    println!("Template: {} ({})", template.name, template.id);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Header"), header_cell("Field")]);
    apply_table_style(&mut table);
    for (header, field) in &template.mappings {
        table.add_row(vec![Cell::new(header), Cell::new(field)]);
    }
    println!("{table}");
    if !template.default_values.is_empty() {
        let mut defaults = Table::new();
        defaults.set_header(vec![header_cell("Field"), header_cell("Default")]);
        apply_table_style(&mut defaults);
        for (field, value) in &template.default_values {
            defaults.add_row(vec![Cell::new(field), Cell::new(value)]);
        }
        println!("{defaults}");
    }
}

fn status_cell(row: &PreviewRow) -> Cell {
    match (row.errors.len(), row.duplicate) {
        (0, false) => Cell::new("ok").fg(Color::Green),
        (0, true) => Cell::new("duplicate").fg(Color::Yellow),
        (count, duplicate) => {
            let suffix = if duplicate { ", duplicate" } else { "" };
            Cell::new(format!("{count} error(s){suffix}"))
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        }
    }
}

fn level_cell(level: ConfidenceLevel) -> Cell {
    let cell = Cell::new(level.description());
    match level {
        ConfidenceLevel::High => cell.fg(Color::Green),
        ConfidenceLevel::Medium => cell.fg(Color::Yellow),
        ConfidenceLevel::Low => cell.fg(Color::Red),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new(severity.label())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new(severity.label()).fg(Color::Yellow),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
