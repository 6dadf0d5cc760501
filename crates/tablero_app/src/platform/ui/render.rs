use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use tablero_core::{
    AppViewModel, ModalView, NoticeKind, RowView, SelectAllState, SortDir,
};

use super::super::app::{InputKind, InputPrompt, Panel, UiState};
use super::{constants, layout};

pub(crate) fn draw(frame: &mut Frame<'_>, view: &AppViewModel, ui: &UiState) {
    let regions = layout::regions(frame.area(), view.banner.is_some());

    frame.render_widget(header_line(view, ui), regions.header);
    if let Some(banner) = &view.banner {
        frame.render_widget(
            Paragraph::new(banner.as_str()).style(Style::default().fg(Color::Yellow)),
            regions.banner,
        );
    }

    match ui.focus {
        Panel::Procesos => draw_procesos(frame, view, ui, regions.table),
        Panel::Documentos => draw_documentos(frame, view, ui, regions.table),
    }

    frame.render_widget(form_line(view, ui), regions.form);
    frame.render_widget(footer_line(view, ui), regions.footer);

    draw_toasts(frame, view);
    draw_modal(frame, view, ui);
}

fn header_line(view: &AppViewModel, ui: &UiState) -> Paragraph<'static> {
    let select_all = match view.select_all {
        SelectAllState::Checked => "[x]",
        SelectAllState::Indeterminate => "[-]",
        SelectAllState::Unchecked => "[ ]",
    };
    let dir = match view.sort_dir {
        SortDir::Asc => "↑",
        SortDir::Desc => "↓",
    };
    let mut spans = vec![
        Span::styled(
            match ui.focus {
                Panel::Procesos => constants::TITLE_PROCESOS,
                Panel::Documentos => constants::TITLE_DOCUMENTOS,
            },
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}: {}  ", view.count.label, view.count.value)),
        Span::raw(format!(
            "pag {}/{}  ",
            view.pagination.page, view.pagination.total_pages
        )),
        Span::raw(format!("orden {} {}  ", view.sort_key, dir)),
        Span::raw(format!("todos {select_all}")),
    ];
    if !view.filters.query.is_empty() {
        spans.push(Span::styled(
            format!("  buscar:{}", view.filters.query),
            Style::default().fg(Color::Cyan),
        ));
    }
    if !view.filters.estado.is_empty() {
        spans.push(Span::styled(
            format!("  estado:{}", view.filters.estado),
            Style::default().fg(Color::Cyan),
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn estado_style(estado: &str) -> Style {
    match estado {
        "completado" => Style::default().fg(Color::Green),
        "error" => Style::default().fg(Color::Red),
        "en proceso" => Style::default().fg(Color::Yellow),
        _ => Style::default(),
    }
}

fn draw_procesos(frame: &mut Frame<'_>, view: &AppViewModel, ui: &UiState, area: Rect) {
    let rows = view.rows.iter().enumerate().map(|(index, row)| {
        let mut style = Style::default();
        if row.pending {
            style = style.add_modifier(Modifier::DIM);
        }
        if index == ui.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        table_row(row, row_mark(row)).style(style)
    });
    let table = Table::new(
        rows,
        [
            ratatui::layout::Constraint::Length(3),
            ratatui::layout::Constraint::Length(9),
            ratatui::layout::Constraint::Length(9),
            ratatui::layout::Constraint::Min(12),
            ratatui::layout::Constraint::Length(11),
            ratatui::layout::Constraint::Min(14),
            ratatui::layout::Constraint::Min(10),
        ],
    )
    .header(
        Row::new(["", "Fecha", "Patente", "Taller", "Estado", "Resultado", "Detalle"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(constants::TITLE_PROCESOS));
    frame.render_widget(table, area);
}

fn row_mark(row: &RowView) -> &'static str {
    if !row.selectable {
        " · "
    } else if row.checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn table_row(row: &RowView, mark: &'static str) -> Row<'static> {
    Row::new(vec![
        Cell::from(mark),
        Cell::from(row.fecha.clone()),
        Cell::from(row.patente.clone()),
        Cell::from(row.taller_label.clone()),
        Cell::from(Span::styled(row.estado.clone(), estado_style(&row.estado))),
        Cell::from(row.resultado.clone()),
        Cell::from(if row.has_error_detail {
            format!("{} [e]", row.detalle)
        } else {
            row.detalle.clone()
        }),
    ])
}

fn draw_documentos(frame: &mut Frame<'_>, view: &AppViewModel, ui: &UiState, area: Rect) {
    let chunks = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Min(4),
            ratatui::layout::Constraint::Length(view.docs.files.len().max(1) as u16 + 2),
        ])
        .split(area);

    let rows = view.docs.rows.iter().enumerate().map(|(index, row)| {
        let mut style = Style::default();
        if row.pending {
            style = style.add_modifier(Modifier::DIM);
        }
        if index == ui.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Row::new(vec![
            Cell::from(row.fecha.clone()),
            Cell::from(row.patente.clone()),
            Cell::from(row.resultado.clone()),
            Cell::from(Span::styled(row.estado.clone(), estado_style(&row.estado))),
        ])
        .style(style)
    });
    let table = Table::new(
        rows,
        [
            ratatui::layout::Constraint::Length(9),
            ratatui::layout::Constraint::Min(18),
            ratatui::layout::Constraint::Length(8),
            ratatui::layout::Constraint::Length(12),
        ],
    )
    .header(
        Row::new(["Fecha", "Archivo", "Paginas", "Estado"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(constants::TITLE_DOCUMENTOS));
    frame.render_widget(table, chunks[0]);

    let mut lines: Vec<Line<'_>> = Vec::new();
    if view.docs.files.is_empty() {
        lines.push(Line::from("No hay imagenes seleccionadas."));
    } else {
        for (index, file) in view.docs.files.iter().enumerate() {
            let marker = if index == ui.upload_cursor { "> " } else { "  " };
            lines.push(Line::from(format!(
                "{marker}{} ({} bytes)",
                file.name, file.size
            )));
        }
    }
    lines.push(Line::from(format!(
        "previas: {}  mejora: {}  archivo: {}  {}",
        view.docs.preview_count,
        view.docs.enhance_mode,
        if view.docs.filename.is_empty() {
            "(auto)"
        } else {
            view.docs.filename.as_str()
        },
        if view.docs.preview_busy {
            "Procesando..."
        } else if view.docs.generate_busy {
            "Generando..."
        } else {
            ""
        }
    )));
    let uploads = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Imagenes ({}/6) ", view.docs.files.len())),
    );
    frame.render_widget(uploads, chunks[1]);
}

fn form_line(view: &AppViewModel, ui: &UiState) -> Paragraph<'static> {
    let taller = view
        .form
        .taller_options
        .iter()
        .find(|option| option.id == view.form.taller_value)
        .map(|option| option.nombre.clone())
        .unwrap_or_else(|| {
            if view.form.taller_value == "new" {
                format!("nuevo: {}", view.form.new_taller_nombre)
            } else {
                "-".to_string()
            }
        });
    let submit = if view.form.submit_enabled {
        Span::styled("[enviar]", Style::default().fg(Color::Green))
    } else {
        Span::styled("[enviar]", Style::default().add_modifier(Modifier::DIM))
    };
    let editing = matches!(
        &ui.input,
        Some(InputPrompt {
            kind: InputKind::Plate,
            ..
        })
    );
    Paragraph::new(Line::from(vec![
        Span::raw(format!(
            " patente: {}{}  taller: {}  ",
            view.form.patente,
            if editing { "_" } else { "" },
            taller
        )),
        submit,
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Nuevo proceso "))
}

fn footer_line(view: &AppViewModel, ui: &UiState) -> Paragraph<'static> {
    let help = if ui.input.is_some() {
        constants::HELP_INPUT
    } else if view.modal.is_some() {
        constants::HELP_MODAL
    } else {
        match ui.focus {
            Panel::Procesos => constants::HELP_PROCESOS,
            Panel::Documentos => constants::HELP_DOCUMENTOS,
        }
    };
    Paragraph::new(help).style(Style::default().add_modifier(Modifier::DIM))
}

fn draw_toasts(frame: &mut Frame<'_>, view: &AppViewModel) {
    for (index, notice) in view.notices.iter().enumerate() {
        let slot = layout::toast_slot(frame.area(), index);
        if slot.height == 0 {
            break;
        }
        let color = match notice.kind {
            NoticeKind::Error => Color::Red,
            NoticeKind::Success => Color::Green,
            NoticeKind::Info => Color::Blue,
        };
        frame.render_widget(Clear, slot);
        frame.render_widget(
            Paragraph::new(notice.text.clone())
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).style(Style::default().fg(color))),
            slot,
        );
    }
}

fn draw_modal(frame: &mut Frame<'_>, view: &AppViewModel, ui: &UiState) {
    if let Some(prompt) = &ui.input {
        let area = layout::centered(frame.area(), 60, 20);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(format!("{}_", prompt.buffer))
                .block(Block::default().borders(Borders::ALL).title(prompt.kind.title())),
            area,
        );
        return;
    }

    let Some(modal) = &view.modal else {
        if view.form.naming_taller {
            let area = layout::centered(frame.area(), 60, 20);
            frame.render_widget(Clear, area);
            let error = if view.form.naming_error {
                "\nIngresa un nombre."
            } else {
                ""
            };
            frame.render_widget(
                Paragraph::new(format!("{}_{error}", view.form.naming_draft))
                    .block(Block::default().borders(Borders::ALL).title(" Nuevo taller ")),
                area,
            );
        } else if view.users.create_open {
            let area = layout::centered(frame.area(), 60, 30);
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(format!(
                    "g: generar contraseña\n{}\nEnter: guardar  Esc: cerrar",
                    view.users.generated_password
                ))
                .block(Block::default().borders(Borders::ALL).title(" Nuevo usuario ")),
                area,
            );
        }
        return;
    };

    let (title, body) = match modal {
        ModalView::ConfirmDelete { count } => (
            " Eliminar procesos ",
            format!("Eliminar {count} proceso(s) seleccionados?"),
        ),
        ModalView::ConfirmTaller { message } => (" Cambiar taller ", message.clone()),
        ModalView::ConfirmUserSave => (
            " Guardar usuario ",
            "Guardar los cambios del usuario?".to_string(),
        ),
        ModalView::ConfirmUserActive { active } => (
            " Usuario activo ",
            if *active {
                "Activar este usuario?".to_string()
            } else {
                "Desactivar este usuario?".to_string()
            },
        ),
        ModalView::ErrorDetail { detail } => (" Detalle del error ", detail.clone()),
    };
    let area = layout::centered(frame.area(), 60, 30);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}
