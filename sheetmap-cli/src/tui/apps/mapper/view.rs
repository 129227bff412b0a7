//! Rendering for the mapper shell
//!
//! Pure projection of `State`; the only writes are the list viewport heights
//! so paging keys know how far to jump.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::tui::graph::LinkState;
use crate::tui::log::LogLevel;
use crate::tui::resource::Resource;
use crate::tui::theme::Theme;
use crate::tui::widgets::{ListState, TextInputField};

use super::state::{Focus, State};

const LABEL_WIDTH: usize = 10;

pub fn render(frame: &mut Frame, state: &mut State) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(8),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let forms = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    render_sheet_step(frame, state, forms[0]);
    render_table_step(frame, state, forms[1]);

    render_graph(frame, state, rows[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);
    render_scripts(frame, state, bottom[0]);
    render_log(frame, state, bottom[1]);

    render_help(frame, state, rows[3]);
}

fn panel<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if focused {
        Style::default().fg(theme.border_primary)
    } else {
        Style::default().fg(theme.border_secondary)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(theme.accent_primary).bold(),
        ))
}

/// `label: value` with a block cursor when focused
fn input_line(
    label: &str,
    field: &TextInputField,
    focused: bool,
    width: usize,
    theme: &Theme,
) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(theme.accent_primary)
    } else {
        Style::default().fg(theme.text_secondary)
    };
    let mut spans = vec![Span::styled(
        format!("{:<width$} ", label, width = LABEL_WIDTH),
        label_style,
    )];

    let visible_width = width.saturating_sub(LABEL_WIDTH + 2).max(1);
    let chars: Vec<char> = field.display().chars().collect();
    let cursor = field.state.cursor().min(chars.len());
    // Scroll so the cursor stays in view
    let start = (cursor + 1).saturating_sub(visible_width);
    let end = (start + visible_width).min(chars.len());
    let text_style = Style::default().fg(theme.text_primary);

    if !focused {
        let visible: String = chars[start..end].iter().collect();
        spans.push(Span::styled(visible, text_style));
        return Line::from(spans);
    }

    let cursor_style = Style::default()
        .fg(theme.text_primary)
        .bg(theme.border_primary);
    let before: String = chars[start..cursor].iter().collect();
    let at = chars.get(cursor).map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
    let after: String = if cursor < end {
        chars[cursor + 1..end].iter().collect()
    } else {
        String::new()
    };
    spans.push(Span::styled(before, text_style));
    spans.push(Span::styled(at, cursor_style));
    spans.push(Span::styled(after, text_style));
    Line::from(spans)
}

fn status_line(resource: &Resource<String>, theme: &Theme, done: impl Fn(&str) -> String) -> Line<'static> {
    match resource {
        Resource::NotAsked => Line::from(Span::styled(
            "Nothing loaded",
            Style::default().fg(theme.text_tertiary).italic(),
        )),
        Resource::Loading => Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.accent_warning),
        )),
        Resource::Success(value) => Line::from(Span::styled(
            done(value.as_str()),
            Style::default().fg(theme.accent_success),
        )),
        Resource::Failure(err) => Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.accent_error),
        )),
    }
}

fn render_sheet_step(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let focused = state.focus == Focus::ExcelPath;
    let width = area.width.saturating_sub(2) as usize;

    let rows = state.sheet.as_ref().map(|s| s.row_count()).unwrap_or(0);
    let columns = state.source_columns().len();
    let mut lines = vec![
        input_line("Path", &state.excel_path, focused, width, theme),
        Line::from(""),
        status_line(&state.sheet_load, theme, |path| format!("Loaded {}", path)),
    ];
    if let Some(sheet) = &state.sheet {
        lines.push(Line::from(Span::styled(
            format!("Sheet '{}': {} columns, {} rows", sheet.sheet_name(), columns, rows),
            Style::default().fg(theme.text_secondary),
        )));
        if let Some(row) = sheet.row(0) {
            let sample = row
                .iter()
                .map(|(column, value)| format!("{}={}", column, value))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(Line::from(Span::styled(
                format!("Row 1: {}", sample),
                Style::default().fg(theme.text_tertiary),
            )));
        }
    }

    let widget = Paragraph::new(lines).block(panel(
        "Step 1: Import Excel File".to_string(),
        focused,
        theme,
    ));
    frame.render_widget(widget, area);
}

fn render_table_step(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let focused = state.focus.is_table_form();
    let width = area.width.saturating_sub(2) as usize;
    let dim = Style::default().fg(theme.text_tertiary);

    let check = if state.mock_enabled { "x" } else { " " };
    let toggle_style = if state.focus == Focus::MockToggle {
        Style::default().fg(theme.accent_primary).bold()
    } else if state.mock_enabled {
        Style::default().fg(theme.accent_primary)
    } else {
        Style::default().fg(theme.text_primary)
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("[{}] Enable mock table", check),
        toggle_style,
    ))];

    let fields = [
        (Focus::MockColumns, "Columns", &state.mock_columns, state.mock_enabled),
        (Focus::Server, "Server", &state.server, !state.mock_enabled),
        (Focus::Database, "Database", &state.database, !state.mock_enabled),
        (Focus::Username, "Username", &state.username, !state.mock_enabled),
        (Focus::Password, "Password", &state.password, !state.mock_enabled),
        (Focus::Table, "Table", &state.table, true),
    ];
    for (focus, label, field, active) in fields {
        let line = input_line(label, field, state.focus == focus, width, theme);
        if active {
            lines.push(line);
        } else {
            lines.push(Line::from(
                line.spans.into_iter().map(|span| span.style(dim)).collect::<Vec<_>>(),
            ));
        }
    }

    let columns = state.target_columns.len();
    lines.push(status_line(&state.columns_load, theme, |table| {
        let table = if table.is_empty() { "mock table" } else { table };
        format!("{}: {} columns", table, columns)
    }));

    let widget = Paragraph::new(lines).block(panel(
        "Step 2: Target Table".to_string(),
        focused,
        theme,
    ));
    frame.render_widget(widget, area);
}

fn render_graph(frame: &mut Frame, state: &mut State, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let list_height = columns[0].height.saturating_sub(2) as usize;
    state.source_list.set_viewport_height(list_height);
    state.target_list.set_viewport_height(list_height);

    render_sources(frame, state, columns[0]);
    render_targets(frame, state, columns[1]);
    render_edges(frame, state, columns[2]);
}

fn render_list(
    frame: &mut Frame,
    items: Vec<ListItem<'static>>,
    block: Block<'static>,
    selection: &ListState,
    focused: bool,
    theme: &Theme,
    area: Rect,
) {
    let highlight = if focused {
        Style::default().bg(theme.bg_surface).bold()
    } else {
        Style::default().bg(theme.bg_surface)
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut list_state = ratatui::widgets::ListState::default()
        .with_offset(selection.scroll_offset())
        .with_selected(selection.selected());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_sources(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let proposed = match &state.link {
        LinkState::Proposed { source, .. } => Some(source.as_str()),
        LinkState::Idle => None,
    };

    let items: Vec<ListItem> = state
        .graph
        .sources()
        .iter()
        .map(|node| {
            let degree = state.graph.out_degree(&node.column);
            let (icon, style) = if proposed == Some(node.column.as_str()) {
                ("◉ ", Style::default().fg(theme.accent_warning).bold())
            } else if degree > 0 {
                ("● ", Style::default().fg(theme.accent_success))
            } else {
                ("○ ", Style::default().fg(theme.text_secondary))
            };
            let fed: Vec<&str> = state.mapping.targets_for(&node.column).collect();
            let suffix = if fed.is_empty() {
                String::new()
            } else {
                format!(" → {}", fed.join(", "))
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{}", icon, node.column), style),
                Span::styled(suffix, Style::default().fg(theme.text_tertiary)),
            ]))
        })
        .collect();

    let focused = state.focus == Focus::Sources;
    let title = format!("Excel Columns ({})", items.len());
    render_list(
        frame,
        items,
        panel(title, focused, theme),
        &state.source_list,
        focused,
        theme,
        area,
    );
}

fn render_targets(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let items: Vec<ListItem> = state
        .graph
        .targets()
        .iter()
        .map(|node| match state.graph.edge_into(&node.column) {
            Some(edge) => ListItem::new(Line::from(vec![
                Span::styled(
                    format!("● {}", node.column),
                    Style::default().fg(theme.accent_success),
                ),
                Span::styled(
                    format!(" ← {}", edge.source),
                    Style::default().fg(theme.text_secondary),
                ),
            ])),
            None => ListItem::new(Line::from(Span::styled(
                format!("○ {}", node.column),
                Style::default().fg(theme.text_primary),
            ))),
        })
        .collect();

    let focused = state.focus == Focus::Targets;
    let title = match &state.link {
        LinkState::Proposed { source, .. } => format!("Table Columns: connect {} to...", source),
        LinkState::Idle => format!("Table Columns ({})", items.len()),
    };
    render_list(
        frame,
        items,
        panel(title, focused, theme),
        &state.target_list,
        focused,
        theme,
        area,
    );
}

fn render_edges(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let lines: Vec<Line> = if state.graph.edges().is_empty() {
        vec![Line::from(Span::styled(
            "No mappings",
            Style::default().fg(theme.text_tertiary).italic(),
        ))]
    } else {
        state
            .graph
            .edges()
            .iter()
            .map(|edge| {
                Line::from(vec![
                    Span::styled(edge.source.clone(), Style::default().fg(theme.text_primary)),
                    Span::styled(" -> ", Style::default().fg(theme.text_tertiary)),
                    Span::styled(edge.target.clone(), Style::default().fg(theme.accent_primary)),
                    Span::styled(
                        format!(" {}", edge.origin.label()),
                        Style::default().fg(theme.accent_secondary),
                    ),
                ])
            })
            .collect()
    };

    let title = format!("Step 3: Mappings ({})", state.mapping.len());
    let widget = Paragraph::new(lines).block(panel(title, false, theme));
    frame.render_widget(widget, area);
}

fn render_scripts(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let widget = if state.preview.is_empty() {
        Paragraph::new(Span::styled(
            "Press g to generate INSERT statements",
            Style::default().fg(theme.text_tertiary).italic(),
        ))
    } else {
        Paragraph::new(state.preview.clone()).style(Style::default().fg(theme.text_primary))
    };

    let title = if state.scripts.is_empty() {
        "Step 4: SQL Preview".to_string()
    } else {
        format!(
            "Step 4: SQL Preview ({} statements, w writes {})",
            state.scripts.len(),
            state.output_path.display()
        )
    };
    frame.render_widget(widget.block(panel(title, false, theme)), area);
}

fn render_log(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.log.len().saturating_sub(visible);

    let lines: Vec<Line> = state
        .log
        .entries()
        .skip(skip)
        .map(|entry| {
            let color = match entry.level {
                LogLevel::Info => theme.text_secondary,
                LogLevel::Warn => theme.accent_warning,
                LogLevel::Error => theme.accent_error,
            };
            Line::from(Span::styled(entry.to_string(), Style::default().fg(color)))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel("Log".to_string(), false, theme));
    frame.render_widget(widget, area);
}

fn render_help(frame: &mut Frame, state: &State, area: Rect) {
    let theme = &state.theme;
    let text = match state.focus {
        Focus::ExcelPath => "Enter import • Tab next field • Ctrl+L connect • Ctrl+G generate • Ctrl+C quit",
        Focus::MockToggle => "Space toggle mock • Enter load columns • Tab next • q quit",
        Focus::Sources => "Space/Enter start mapping • a auto-map • c clear • g generate • w write • q quit",
        Focus::Targets if matches!(state.link, LinkState::Proposed { .. }) => {
            "Enter connect • Esc cancel • ↑/↓ choose target column"
        }
        Focus::Targets => "d delete mapping • a auto-map • c clear • g generate • w write • q quit",
        _ => "Enter load columns • Tab next field • Ctrl+G generate • Ctrl+C quit",
    };
    let widget = Paragraph::new(Span::styled(text, Style::default().fg(theme.text_tertiary)));
    frame.render_widget(widget, area);
}
