use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions of the main view.
pub(crate) struct Regions {
    pub header: Rect,
    pub banner: Rect,
    pub table: Rect,
    pub form: Rect,
    pub footer: Rect,
}

pub(crate) fn regions(area: Rect, banner_visible: bool) -> Regions {
    let banner_height = u16::from(banner_visible);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);
    Regions {
        header: chunks[0],
        banner: chunks[1],
        table: chunks[2],
        form: chunks[3],
        footer: chunks[4],
    }
}

/// A centered overlay sized as a fraction of the screen.
pub(crate) fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Toasts stack in the top-right corner, newest on top.
pub(crate) fn toast_slot(area: Rect, index: usize) -> Rect {
    let width = area.width.min(46);
    let x = area.right().saturating_sub(width);
    let y = area.top() + 1 + (index as u16) * 3;
    Rect {
        x,
        y,
        width,
        height: 3.min(area.height.saturating_sub(y)),
    }
}
