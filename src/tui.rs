use crate::config::config::Config;
use crate::logging::LogBuffer;
use crate::models::{Company, CompanyDraft};
use crate::registry::{Registry, Severity};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use tui_input::{backend::crossterm::EventHandler, Input};

const FIELD_COUNT: usize = 8;

/// Form fields in tab order, paired two per row in the popup.
const FIELD_LABELS: [&str; FIELD_COUNT] = [
    "Company name *",
    "Tax ID",
    "Address",
    "Phone",
    "Website",
    "Email",
    "Contact person",
    "Notes",
];

fn form_value(draft: &CompanyDraft, idx: usize) -> &str {
    match idx {
        0 => &draft.name,
        1 => &draft.tax_id,
        2 => &draft.address,
        3 => &draft.phone,
        4 => &draft.website,
        5 => &draft.email,
        6 => &draft.contact_person,
        _ => &draft.notes,
    }
}

fn set_form_value(draft: &mut CompanyDraft, idx: usize, value: String) {
    let slot = match idx {
        0 => &mut draft.name,
        1 => &mut draft.tax_id,
        2 => &mut draft.address,
        3 => &mut draft.phone,
        4 => &mut draft.website,
        5 => &mut draft.email,
        6 => &mut draft.contact_person,
        _ => &mut draft.notes,
    };
    *slot = value;
}

pub struct CompanyApp {
    registry: Registry,
    config: Config,
    log_buffer: LogBuffer,
    table_state: TableState,
    inputs: Vec<Input>,
    focus: usize,
    show_help: bool,
    show_logs: bool,
    should_quit: bool,
}

impl CompanyApp {
    pub fn new(registry: Registry, config: Config, log_buffer: LogBuffer) -> Self {
        let mut table_state = TableState::default();
        if !registry.companies.is_empty() {
            table_state.select(Some(0));
        }
        Self {
            registry,
            config,
            log_buffer,
            table_state,
            inputs: (0..FIELD_COUNT).map(|_| Input::default()).collect(),
            focus: 0,
            show_help: false,
            show_logs: false,
            should_quit: false,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.ui(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Popups swallow input, topmost first.
        if self.registry.notification.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.registry.dismiss_notification();
            }
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return;
        }
        if self.show_logs {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(9)) {
                self.show_logs = false;
            }
            return;
        }
        if self.registry.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.registry.confirm_delete();
                    self.clamp_selection();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.registry.cancel_delete();
                }
                _ => {}
            }
            return;
        }
        if self.registry.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.registry.close_detail();
            }
            return;
        }

        if key.code == KeyCode::F(1) {
            self.show_help = true;
            return;
        }
        if key.code == KeyCode::F(9) {
            self.show_logs = true;
            return;
        }

        if self.registry.show_form {
            self.handle_form_key(key);
        } else {
            self.handle_list_key(key);
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.registry.reset_form();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
            }
            KeyCode::Enter => {
                if !self.registry.loading {
                    self.registry.submit();
                    self.clamp_selection();
                }
            }
            _ => {
                self.inputs[self.focus].handle_event(&Event::Key(key));
                set_form_value(
                    &mut self.registry.form,
                    self.focus,
                    self.inputs[self.focus].value().to_string(),
                );
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('a') => {
                self.registry.toggle_form();
                self.load_inputs_from_form();
            }
            KeyCode::Char('e') => {
                if let Some(company) = self.selected_company() {
                    self.registry.edit_company(&company);
                    self.load_inputs_from_form();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(company) = self.selected_company() {
                    self.registry.request_delete(&company.id);
                }
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                if let Some(company) = self.selected_company() {
                    self.registry.open_detail(&company);
                }
            }
            KeyCode::Char('r') | KeyCode::F(5) => {
                self.registry.load_companies();
                self.clamp_selection();
            }
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
                self.handle_navigation(key.code);
            }
            _ => {}
        }
    }

    fn handle_navigation(&mut self, key: KeyCode) {
        let num_rows = self.registry.companies.len();
        if num_rows == 0 {
            return;
        }

        let current = self.table_state.selected().unwrap_or(0);
        let new_selection = match key {
            KeyCode::Up => {
                if current > 0 {
                    current - 1
                } else {
                    num_rows - 1
                }
            }
            KeyCode::Down => {
                if current < num_rows - 1 {
                    current + 1
                } else {
                    0
                }
            }
            KeyCode::PageUp => current.saturating_sub(10),
            KeyCode::PageDown => (current + 10).min(num_rows - 1),
            _ => current,
        };
        self.table_state.select(Some(new_selection));
    }

    fn selected_company(&self) -> Option<Company> {
        let idx = self.table_state.selected()?;
        self.registry.companies.get(idx).cloned()
    }

    fn clamp_selection(&mut self) {
        let len = self.registry.companies.len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(idx));
        }
    }

    fn load_inputs_from_form(&mut self) {
        self.inputs = (0..FIELD_COUNT)
            .map(|i| Input::new(form_value(&self.registry.form, i).to_string()))
            .collect();
        self.focus = 0;
    }

    fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Company table
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_table(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        if self.registry.show_form {
            self.render_form(f);
        }
        if self.registry.pending_delete.is_some() {
            self.render_confirm(f);
        }
        if self.registry.detail.is_some() || self.registry.detail_loading {
            self.render_detail(f);
        }
        if self.show_logs {
            self.render_logs(f);
        }
        if self.show_help {
            self.render_help(f);
        }
        if self.registry.notification.is_some() {
            self.render_notification(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                "Company Registry",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  a=Add  e=Edit  d=Delete  Enter=Details  r=Reload  F1=Help  q=Quit"),
        ]);
        let header = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let companies = &self.registry.companies;

        if companies.is_empty() {
            let placeholder = Paragraph::new("No companies yet - press 'a' to add one")
                .block(Block::default().borders(Borders::ALL).title("Companies"));
            f.render_widget(placeholder, area);
            return;
        }

        let mut headers = vec!["Name", "Tax ID", "Address", "Phone", "Email", "Website"];
        if self.config.display.show_row_numbers {
            headers.insert(0, "#");
        }

        let header_cells: Vec<Cell> = headers
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)))
            .collect();
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let dash = |s: &str| {
            if s.is_empty() {
                "-".to_string()
            } else {
                s.to_string()
            }
        };

        let rows: Vec<Row> = companies
            .iter()
            .enumerate()
            .map(|(i, company)| {
                let mut cells = vec![
                    Cell::from(company.name.clone())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(dash(&company.tax_id)),
                    Cell::from(dash(&company.address)),
                    Cell::from(dash(&company.phone)),
                    Cell::from(dash(&company.email)),
                    Cell::from(dash(&company.website)),
                ];
                if self.config.display.show_row_numbers {
                    cells.insert(0, Cell::from((i + 1).to_string()));
                }
                Row::new(cells).height(1)
            })
            .collect();

        let num_cols = headers.len();
        let col_width = (area.width.saturating_sub(2)) / num_cols as u16;
        let widths: Vec<Constraint> = (0..num_cols)
            .map(|_| Constraint::Length(col_width))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Companies ({}) - Enter for details",
                companies.len()
            )))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if self.registry.loading {
            "Working..."
        } else {
            self.registry.status.as_str()
        };

        let mode = if self.registry.show_form {
            "FORM"
        } else {
            "LIST"
        };

        let status_line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(
                mode,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | F1=Help | F9=Logs"),
        ]);

        let status = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));
        f.render_widget(status, area);
    }

    fn render_form(&self, f: &mut Frame) {
        let area = centered_rect(72, 70, f.area());
        f.render_widget(Clear, area);

        let title = if self.registry.editing_id.is_some() {
            "Update company"
        } else {
            "Add new company"
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        // Four rows of paired fields plus a hint line.
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        for pair in 0..4 {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[pair]);
            for side in 0..2 {
                let idx = pair * 2 + side;
                self.render_field(f, cols[side], idx);
            }
        }

        let hint = Paragraph::new("Enter=Save  Tab=Next field  Esc=Cancel")
            .style(Style::default().fg(Color::Gray));
        f.render_widget(hint, rows[4]);
    }

    fn render_field(&self, f: &mut Frame, area: Rect, idx: usize) {
        let focused = self.focus == idx;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };

        let input = &self.inputs[idx];
        let paragraph = Paragraph::new(input.value())
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(FIELD_LABELS[idx]));
        f.render_widget(paragraph, area);

        if focused {
            f.set_cursor_position((area.x + input.visual_cursor() as u16 + 1, area.y + 1));
        }
    }

    fn render_confirm(&self, f: &mut Frame) {
        let area = centered_rect(50, 20, f.area());
        f.render_widget(Clear, area);

        let name = self
            .registry
            .pending_delete
            .as_ref()
            .and_then(|id| self.registry.companies.iter().find(|c| &c.id == id))
            .map(|c| c.name.clone())
            .unwrap_or_default();

        let text = vec![
            Line::from(format!("Delete company \"{}\"?", name)),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(" = delete    "),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" = cancel"),
            ]),
        ];

        let popup = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm delete")
                    .border_style(Style::default().fg(Color::Red)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(popup, area);
    }

    fn render_detail(&self, f: &mut Frame) {
        let area = centered_rect(80, 80, f.area());
        f.render_widget(Clear, area);

        if self.registry.detail_loading {
            let loading = Paragraph::new("Searching company information...")
                .block(Block::default().borders(Borders::ALL).title("Details"));
            f.render_widget(loading, area);
            return;
        }

        let Some(detail) = &self.registry.detail else {
            return;
        };

        let mut lines: Vec<Line> = detail
            .info
            .answer
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect();

        if !detail.info.sources.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Sources:",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for source in &detail.info.sources {
                lines.push(Line::from(format!("  {} - {}", source.title, source.url)));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Esc=Close",
            Style::default().fg(Color::Gray),
        )));

        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Details: {}", detail.company.name)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(popup, area);
    }

    fn render_notification(&self, f: &mut Frame) {
        let Some(notification) = &self.registry.notification else {
            return;
        };

        let (title, color) = match notification.severity {
            Severity::Info => ("Success", Color::Green),
            Severity::Error => ("Error", Color::Red),
        };

        let area = centered_rect(60, 25, f.area());
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(notification.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to close",
                Style::default().fg(Color::Gray),
            )),
        ];

        let popup = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(color)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(popup, area);
    }

    fn render_logs(&self, f: &mut Frame) {
        let area = centered_rect(80, 70, f.area());
        f.render_widget(Clear, area);

        let visible = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .log_buffer
            .recent(visible)
            .into_iter()
            .map(|entry| Line::from(entry.format_for_display()))
            .collect();

        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Logs (F9=Close)"))
            .wrap(Wrap { trim: true });
        f.render_widget(popup, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(70, 70, f.area());
        f.render_widget(Clear, area);

        let help_text = vec![
            Line::from(vec![Span::styled(
                "Company Registry Help",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("List:"),
            Line::from("  ↑↓ / PgUp PgDn - Navigate rows"),
            Line::from("  a              - Add a company"),
            Line::from("  e              - Edit the selected company"),
            Line::from("  d              - Delete the selected company (asks first)"),
            Line::from("  Enter / v      - Company details and search link"),
            Line::from("  r / F5         - Reload the list"),
            Line::from("  q / Esc        - Quit"),
            Line::from(""),
            Line::from("Form:"),
            Line::from("  Tab / Shift+Tab - Move between fields"),
            Line::from("  Enter           - Save (name is required)"),
            Line::from("  Esc             - Cancel and close the form"),
            Line::from(""),
            Line::from("Global:"),
            Line::from("  F1 - This help"),
            Line::from("  F9 - Recent log lines"),
        ];

        let popup = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: true });
        f.render_widget(popup, area);
    }
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Set up the terminal, run the app, restore the terminal.
pub fn run(registry: Registry, config: Config, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = CompanyApp::new(registry, config, log_buffer);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
