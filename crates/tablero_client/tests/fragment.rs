use pretty_assertions::assert_eq;
use tablero_client::{parse_pagination, parse_row, parse_table};

const ROWS: &str = r#"
<tr>
  <td class="select-col"><input type="checkbox" class="rpa-select" value="41" /></td>
  <td>05/08/26</td>
  <td>AB123CD</td>
  <td>
    <select class="rpa-taller-select" data-proceso-id="41" data-current-id="3" data-current-name="Taller Norte">
      <option value=""></option>
      <option value="3" selected>Taller Norte</option>
      <option value="5">Taller Sur</option>
    </select>
  </td>
  <td><span class="badge completado">completado</span></td>
  <td>Patente registrada</td>
  <td>-</td>
  <td><button class="ghost-btn" type="button">PDF</button></td>
</tr>
<tr class="pending-row">
  <td class="select-col"><input type="checkbox" class="rpa-select" disabled aria-label="Seleccionar proceso" /></td>
  <td>05/08/26</td>
  <td>ZZ999XX</td>
  <td>-</td>
  <td><span class="badge en-proceso">en proceso</span></td>
  <td>-</td>
  <td>-</td>
  <td></td>
</tr>
<tr>
  <td class="select-col"><input type="checkbox" class="rpa-select" value="39" /></td>
  <td>04/08/26</td>
  <td>AC482BB</td>
  <td>Taller Sur</td>
  <td><span class="badge error">error</span></td>
  <td>-</td>
  <td><button data-error-detail="&quot;Credenciales invalidas&quot;" type="button">ver</button></td>
  <td></td>
</tr>
"#;

#[test]
fn rows_are_digested_with_ids_and_flags() {
    let table = parse_table(ROWS);
    assert_eq!(table.rows.len(), 3);

    let first = &table.rows[0];
    assert_eq!(first.id, Some(41));
    assert!(first.selectable);
    assert!(!first.pending);
    assert_eq!(first.fecha, "05/08/26");
    assert_eq!(first.patente, "AB123CD");
    assert_eq!(first.estado, "completado");
    assert_eq!(first.resultado, "Patente registrada");
    assert_eq!(
        first.taller,
        Some(("3".to_string(), "Taller Norte".to_string()))
    );

    let second = &table.rows[1];
    assert_eq!(second.id, None);
    assert!(!second.selectable);
    assert!(second.pending);
    assert_eq!(second.estado, "en proceso");
}

#[test]
fn taller_options_are_harvested_without_duplicates() {
    let table = parse_table(ROWS);
    assert_eq!(
        table.taller_options,
        vec![
            ("3".to_string(), "Taller Norte".to_string()),
            ("5".to_string(), "Taller Sur".to_string()),
        ]
    );
}

#[test]
fn error_detail_is_unwrapped_from_its_json_encoding() {
    let table = parse_table(ROWS);
    assert_eq!(
        table.rows[2].error_detail.as_deref(),
        Some("Credenciales invalidas")
    );
}

#[test]
fn raw_error_detail_is_kept_verbatim() {
    let html = r#"<tr><td></td><td></td><td></td><td></td><td></td><td></td>
        <td><button data-error-detail="sin detalle" type="button">ver</button></td></tr>"#;
    let row = parse_row(html).expect("one row");
    assert_eq!(row.error_detail.as_deref(), Some("sin detalle"));
}

#[test]
fn single_row_payloads_use_the_first_row() {
    let row = parse_row(
        r#"<tr><td><input type="checkbox" class="rpa-select" value="77" /></td>
            <td>05/08/26</td><td>AB123CD</td><td>-</td>
            <td><span class="badge en-proceso">en proceso</span></td><td>-</td><td>-</td><td></td></tr>"#,
    )
    .expect("one row");
    assert_eq!(row.id, Some(77));
    assert!(row.selectable);
}

#[test]
fn pagination_attributes_are_read() {
    let html = r#"<div class="pagination" data-page="3" data-total-pages="9">
        <button data-page-action="prev">Anterior</button>
        <button data-page-action="next">Siguiente</button>
    </div>"#;
    assert_eq!(parse_pagination(html), Some((3, 9)));
}

#[test]
fn missing_pagination_yields_none() {
    assert_eq!(parse_pagination("<div></div>"), None);
    assert_eq!(parse_pagination(r#"<div class="pagination"></div>"#), None);
}

#[test]
fn documentos_rows_fall_back_to_generic_cells() {
    let html = r#"<tr><td>05/08/26</td><td>legajo.pdf</td><td>3</td><td>completado</td><td></td></tr>"#;
    let table = parse_table(html);
    let row = &table.rows[0];
    assert_eq!(row.id, None);
    assert_eq!(
        row.cells,
        vec!["05/08/26", "legajo.pdf", "3", "completado", ""]
    );
}
