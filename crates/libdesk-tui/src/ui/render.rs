use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use libdesk_core::panels::{SearchPanel, ShelfPanel, StatisticsPanel};
use libdesk_core::PanelKind;

use crate::app::{App, AppState};

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(6),    // Panel table
            Constraint::Length(1), // Prompt / hints
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_panel(frame, app, chunks[2]);
    render_prompt(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }

    // Notices sit above everything until dismissed
    if app.notice().is_some() {
        render_notice_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  libdesk";
    let who = format!("{} ({})  [?] Help ", app.user_name(), app.tabs.role());

    let padding = (area.width as usize).saturating_sub(title.len() + who.chars().count());
    let line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(who, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.tabs.active_index();

    let mut spans = vec![Span::raw(" ")];
    for (i, kind) in app.tabs.kinds().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, kind.title()),
            styles::tab_style(i == active),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Block title for the active panel: name, row count and any narrowing.
fn panel_title(app: &App, rows: usize) -> String {
    let kind = app.active_kind();
    let mut title = format!(" {} ({})", kind.title(), rows);

    match kind {
        PanelKind::Search => {
            if let Some(search) = app.tabs.panel::<SearchPanel>() {
                if search.is_searching() {
                    title.push_str(" - searching...");
                } else if search.has_searched() {
                    title.push_str(&format!(" - \"{}\"", search.query()));
                }
            }
        }
        PanelKind::Shelf => {
            if let Some(shelf) = app.tabs.panel::<ShelfPanel>() {
                title.push_str(&format!(" - category: {}", shelf.category().unwrap_or("all")));
            }
        }
        PanelKind::Statistics => {
            if let Some(stats) = app.tabs.panel::<StatisticsPanel>() {
                let (books, borrows) = stats.totals();
                title.push_str(&format!(" - {} books, {} borrows", books, borrows));
            }
        }
        _ => {}
    }

    if let Some(filter) = app.current_filter().filter(|f| !f.is_empty()) {
        title.push_str(&format!(" - filter: {}", filter));
    }
    title.push(' ');
    title
}

fn render_panel(frame: &mut Frame, app: &App, area: Rect) {
    let panel = app.tabs.active_panel();
    let model = panel.table();

    let header = Row::new(model.columns.iter().map(|c| Cell::from(*c)))
        .style(styles::title_style())
        .height(1);

    let rows: Vec<Row> = model
        .rows
        .iter()
        .map(|cells| {
            Row::new(cells.iter().map(|c| Cell::from(c.as_str()))).style(styles::list_item_style())
        })
        .collect();

    let widths = vec![Constraint::Fill(1); model.columns.len().max(1)];
    let title = panel_title(app, model.rows.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(matches!(app.state, AppState::Normal))),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !model.rows.is_empty() {
        state.select(Some(panel.selection()));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Key hints for the active panel's actions.
fn panel_hints(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Search => "[/] search  [b]orrow  [a]dd to shelf",
        PanelKind::Shelf => "[c]ategory  [d] remove  [/] filter",
        PanelKind::CurrentBorrows => "[t] return  [n] renew  [/] filter",
        PanelKind::History => "[e]xport  [/] filter",
        PanelKind::Recommendation => "[Enter] recommend a book  [/] filter",
        PanelKind::Reference => "[/] filter",
        PanelKind::Management => "[d]elete  [/] filter",
        PanelKind::BorrowAdmin => "[t] force return  [/] filter",
        PanelKind::Statistics => "[/] filter",
        PanelKind::RecommendationAdmin => "[y] approve  [x] reject  [/] filter",
    }
}

fn render_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.state {
        AppState::Editing(target) => Line::from(vec![
            Span::styled(format!(" {}: ", target.label()), styles::highlight_style()),
            Span::styled(format!("{}▌", app.input), styles::list_item_style()),
            Span::styled("  [Enter] ok  [Esc] cancel", styles::muted_style()),
        ]),
        _ => Line::from(Span::styled(
            format!(" {}  [r]efresh", panel_hints(app.active_kind())),
            styles::muted_style(),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = " [Tab] next tab | [q]uit ";

    let load_state = app.tabs.active_panel().load_state();
    let (left_text, left_style) = match (&app.status_message, load_state) {
        (Some(msg), _) => (format!(" {} ", msg), styles::muted_style()),
        (None, Some(state)) => (format!(" {} ", state), styles::load_state_style(state)),
        (None, None) => (String::from(" Ready "), styles::muted_style()),
    };

    let padding = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(shortcuts.len());
    let line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding)),
        Span::styled(shortcuts, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line).style(styles::status_bar_style()), area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let lines = vec![
        Line::from(Span::styled(format!("  libdesk {}", version), styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-9", "Switch tabs"),
        help_line("Tab/S-Tab", "Next/previous tab"),
        help_line("↑/↓ j/k", "Move selection"),
        help_line("PgUp/PgDn", "Move by a page"),
        help_line("Home/End", "First/last row"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("r", "Refresh the current tab"),
        help_line("/", "Search (Search tab) or filter"),
        help_line("b / a", "Borrow / add to bookshelf"),
        help_line("t / n", "Return / renew"),
        help_line("d", "Remove or delete selected"),
        help_line("c", "Next bookshelf category"),
        help_line("e", "Export borrow history"),
        help_line("y / x", "Approve / reject request"),
        help_line("Esc", "Dismiss a notice"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_notice_overlay(frame: &mut Frame, app: &App) {
    let Some(notice) = app.notice() else {
        return;
    };
    let area = centered_rect_fixed(56, 9, frame.area());
    frame.render_widget(Clear, area);

    let (border, message_style) = styles::notice_styles(notice.level);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", notice.message), message_style)),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" to dismiss", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", notice.title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(border);
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
