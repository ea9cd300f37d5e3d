//! Frame layout and widgets.

use crate::app::{App, Focus, NEW_NOTE_ROW, THINKING};
use crate::markdown::render_markdown;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

const KEY_HINTS: &str =
    "n new | ^S save | ^D delete | ^R rename | ^E api key | ^F forget key | Tab focus | ^Q quit";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [header, body, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .areas(frame.area());
    let [notes_area, editor_area, ai_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
        ])
        .areas(body);
    let [prompt_area, response_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .areas(ai_area);

    draw_header(frame, app, header);
    draw_notes(frame, app, notes_area);
    draw_editor(frame, app, editor_area);
    draw_prompt(frame, app, prompt_area);
    draw_response(frame, app, response_area);
    draw_footer(frame, app, footer);
    draw_modal(frame, app);
}

fn panel(title: impl Into<String>, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", title.into()))
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let ai = if app.query_pending() {
        Span::styled("AI: thinking", Style::default().fg(Color::Yellow))
    } else if app.ai_enabled() {
        Span::styled("AI: on", Style::default().fg(Color::Green))
    } else {
        Span::styled("AI: off", Style::default().fg(Color::DarkGray))
    };
    let line = Line::from(vec![
        Span::styled(
            format!("notepane v{}", notepane_core::core_version()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        ai,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_notes(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut items = vec![ListItem::new(Span::styled(
        NEW_NOTE_ROW,
        Style::default().add_modifier(Modifier::ITALIC),
    ))];
    items.extend(
        app.note_names
            .iter()
            .map(|name| ListItem::new(name.clone())),
    );
    let list = List::new(items)
        .block(panel("Notes", app.focus() == Focus::Notes))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = panel(app.editor_title(), app.focus() == Focus::Editor);
    app.editor.set_block(block);
    frame.render_widget(&app.editor, area);
}

fn draw_prompt(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = panel("Ask Gemini", app.focus() == Focus::Prompt);
    app.prompt.set_block(block);
    frame.render_widget(&app.prompt, area);
}

fn draw_response(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.response() == THINKING {
        ratatui::text::Text::styled(THINKING, Style::default().fg(Color::Yellow))
    } else {
        render_markdown(app.response())
    };
    let paragraph = Paragraph::new(text)
        .block(panel("Response", app.focus() == Focus::Response))
        .wrap(Wrap { trim: false })
        .scroll((app.response_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(app.status().to_string()),
        Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_modal(frame: &mut Frame, app: &mut App) {
    let Some(modal) = app.modal.as_mut() else {
        return;
    };
    let area = centered(frame.area(), 60, 3);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", modal.kind().title()))
        .title_bottom(" Enter confirm | Esc cancel ");
    modal.input_mut().set_block(block);
    frame.render_widget(Clear, area);
    frame.render_widget(&*modal.input_mut(), area);
}

fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
