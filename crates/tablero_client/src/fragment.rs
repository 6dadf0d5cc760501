use scraper::{ElementRef, Html, Selector};

use crate::types::RowId;

/// One table row digested from a server-rendered fragment.
///
/// The named fields follow the procesos table layout; `cells` keeps every
/// column's text so other tables (the documentos panel) can be rendered
/// from the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRow {
    pub id: Option<RowId>,
    pub cells: Vec<String>,
    pub fecha: String,
    pub patente: String,
    pub taller: Option<(String, String)>,
    pub estado: String,
    pub resultado: String,
    pub detalle: String,
    pub selectable: bool,
    pub pending: bool,
    pub error_detail: Option<String>,
}

/// All rows of a fragment plus the workshop options harvested from the
/// per-row selectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTable {
    pub rows: Vec<ParsedRow>,
    pub taller_options: Vec<(String, String)>,
}

fn sel(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Digest the `html` fragment of a refresh response.
pub fn parse_table(html: &str) -> ParsedTable {
    let doc = Html::parse_fragment(html);
    let row_sel = sel("tr");
    let checkbox_sel = sel("input.rpa-select");
    let cell_sel = sel("td");
    let taller_sel = sel("select.rpa-taller-select");
    let option_sel = sel("option");
    let detail_sel = sel("button[data-error-detail]");

    let mut table = ParsedTable::default();
    let Some(row_sel) = row_sel else {
        return table;
    };

    for row in doc.select(&row_sel) {
        let mut parsed = ParsedRow {
            pending: row.value().classes().any(|class| class == "pending-row"),
            ..ParsedRow::default()
        };

        if let Some(checkbox_sel) = checkbox_sel.as_ref() {
            if let Some(checkbox) = row.select(checkbox_sel).next() {
                parsed.id = checkbox
                    .value()
                    .attr("value")
                    .and_then(|value| value.parse::<RowId>().ok());
                parsed.selectable = checkbox.value().attr("disabled").is_none();
            }
        }

        if let Some(cell_sel) = cell_sel.as_ref() {
            parsed.cells = row.select(cell_sel).map(collapsed_text).collect();
        }

        if let Some(taller_sel) = taller_sel.as_ref() {
            if let Some(select) = row.select(taller_sel).next() {
                let current_id = select.value().attr("data-current-id").unwrap_or("");
                let current_name = select
                    .value()
                    .attr("data-current-name")
                    .unwrap_or("Sin taller");
                parsed.taller = Some((current_id.to_string(), current_name.to_string()));
                if let Some(option_sel) = option_sel.as_ref() {
                    for option in select.select(option_sel) {
                        let value = option.value().attr("value").unwrap_or("");
                        if value.is_empty() {
                            continue;
                        }
                        let label = collapsed_text(option);
                        if !table
                            .taller_options
                            .iter()
                            .any(|(id, _)| id == value)
                        {
                            table.taller_options.push((value.to_string(), label));
                        }
                    }
                }
            }
        }

        if let Some(detail_sel) = detail_sel.as_ref() {
            if let Some(button) = row.select(detail_sel).next() {
                parsed.error_detail = button
                    .value()
                    .attr("data-error-detail")
                    .map(unwrap_json_string);
            }
        }

        // Column layout of the procesos table: select, fecha, patente,
        // taller, estado, resultado, detalle, actions.
        parsed.fecha = parsed.cells.get(1).cloned().unwrap_or_default();
        parsed.patente = parsed.cells.get(2).cloned().unwrap_or_default();
        parsed.estado = parsed.cells.get(4).cloned().unwrap_or_default();
        parsed.resultado = parsed.cells.get(5).cloned().unwrap_or_default();
        parsed.detalle = parsed.cells.get(6).cloned().unwrap_or_default();

        table.rows.push(parsed);
    }

    table
}

/// Digest a single-row `row_html` payload.
pub fn parse_row(html: &str) -> Option<ParsedRow> {
    parse_table(html).rows.into_iter().next()
}

/// Read `data-page`/`data-total-pages` off a pagination fragment.
pub fn parse_pagination(html: &str) -> Option<(u32, u32)> {
    let doc = Html::parse_fragment(html);
    let pagination_sel = sel(".pagination")?;
    let element = doc.select(&pagination_sel).next()?;
    let page = element.value().attr("data-page")?.parse().ok()?;
    let total_pages = element.value().attr("data-total-pages")?.parse().ok()?;
    Some((page, total_pages))
}

/// Error details arrive JSON-encoded when the worker stored a quoted
/// string; unwrap that layer and keep anything else verbatim.
fn unwrap_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string())
}
