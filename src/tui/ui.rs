use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::calculator::{has_drift, recompute};
use crate::error::Field;
use crate::store::TaskStore;
use super::app::{App, InputMode, TaskForm};

pub fn ui<S: TaskStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Notification
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let rows: Vec<Row> = app
        .tasks()
        .iter()
        .map(|t| {
            let style = if has_drift(t) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.employee_name.clone()),
                Cell::from(t.task_description.clone()),
                Cell::from(t.date.clone()),
                Cell::from(format!("{:.2}", t.hours_spent)),
                Cell::from(format!("{:.2}", t.hourly_rate)),
                Cell::from(format!("{:.2}", t.additional_charges)),
                Cell::from(format!("{:.2}", recompute(t))),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Employee Name", "Task Description", "Date", "Hours", "Rate", "Charges", "Total"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Employee Tasks"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let notification = Paragraph::new(app.notification.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(notification, chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | e/Enter: Edit | d: Delete | r: Refresh | j/k: Move",
        InputMode::Editing => "Tab/Down: Next Field | Shift-Tab/Up: Previous | Enter: Save | Esc: Cancel",
        InputMode::ConfirmDelete => "y: Delete | n/Esc: Keep",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    match app.input_mode {
        InputMode::Editing => {
            if let Some(form) = &app.form {
                render_form(f, form);
            }
        }
        InputMode::ConfirmDelete => {
            let area = centered_rect(50, 3, f.area());
            f.render_widget(Clear, area);
            let id = app.pending_delete.map(|id| id.to_string()).unwrap_or_default();
            let confirm = Paragraph::new(format!("Delete task {}? This cannot be undone. [y/N]", id))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title("Confirm"));
            f.render_widget(confirm, area);
        }
        InputMode::Normal => {}
    }
}

fn render_form(f: &mut Frame, form: &TaskForm) {
    // one line per field, one for the preview, two for the border
    let height = Field::ALL.len() as u16 + 3;
    let area = centered_rect(70, height, f.area());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let focused = *field == form.focused_field();
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut spans = vec![
                Span::styled(format!("{:<20}", field.label()), label_style),
                Span::styled(form.value(*field).to_string(), Style::default().fg(Color::Yellow)),
            ];
            if focused {
                spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
            }
            if let Some(err) = form.error_for(*field) {
                spans.push(Span::styled(format!("  {}", err.message), Style::default().fg(Color::Red)));
            }
            Line::from(spans)
        })
        .collect();

    let preview = form
        .preview_total()
        .map(|t| format!("{:.2}", t))
        .unwrap_or_else(|| "-".to_string());
    lines.push(Line::from(vec![
        Span::styled(format!("{:<20}", "Total Remuneration"), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(preview),
    ]));

    let title = match form.target_id {
        Some(id) => format!("Edit Task {}", id),
        None => "Add Task".to_string(),
    };
    let dialog = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
