//! Markdown rendering for model answers.
//!
//! Maps pulldown-cmark events onto styled ratatui lines. Only the subset
//! models actually emit is styled: headings, emphasis, inline and fenced
//! code, lists, quotes and rules. Everything else falls back to plain text.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const CODE_STYLE: Style = Style::new().fg(Color::Yellow);
const QUOTE_STYLE: Style = Style::new().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
const RULE: &str = "────────────────────";

/// Renders `source` into owned, styled lines.
pub fn render_markdown(source: &str) -> Text<'static> {
    let mut renderer = Renderer::default();
    for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
        renderer.handle(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    in_code_block: bool,
}

impl Renderer {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self
                .spans
                .push(Span::styled(code.into_string(), self.style().patch(CODE_STYLE))),
            Event::SoftBreak => self.spans.push(Span::raw(" ")),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines
                    .push(Line::styled(RULE, Style::new().fg(Color::DarkGray)));
                self.blank();
            }
            Event::TaskListMarker(done) => {
                self.spans
                    .push(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            Event::Html(raw) => self.text(&raw),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.push_style(heading_style(level));
            }
            Tag::Emphasis => self.push_style(Style::new().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::new().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::new().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { .. } => self.push_style(
                Style::new()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Tag::BlockQuote => {
                self.flush();
                self.push_style(QUOTE_STYLE);
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.spans
                    .push(Span::raw(format!("{}{marker}", "  ".repeat(depth))));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush();
                self.blank();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.styles.pop();
            }
            TagEnd::BlockQuote => {
                self.styles.pop();
                self.flush();
                self.blank();
            }
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.flush();
                self.blank();
            }
            TagEnd::Item => self.flush(),
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.lines
                    .push(Line::from(Span::styled(format!("  {line}"), CODE_STYLE)));
            }
            return;
        }
        self.spans.push(Span::styled(text.to_string(), self.style()));
    }

    fn style(&self) -> Style {
        self.styles
            .iter()
            .fold(Style::new(), |acc, style| acc.patch(*style))
    }

    fn push_style(&mut self, style: Style) {
        self.styles.push(style);
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    // Collapses runs of blank lines into one.
    fn blank(&mut self) {
        let last_is_blank = self
            .lines
            .last()
            .map(|line| line.spans.is_empty())
            .unwrap_or(true);
        if !last_is_blank {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        while self
            .lines
            .last()
            .map(|line| line.spans.is_empty())
            .unwrap_or(false)
        {
            self.lines.pop();
        }
        Text::from(self.lines)
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let color = match level {
        HeadingLevel::H1 => Color::Magenta,
        HeadingLevel::H2 => Color::Blue,
        _ => Color::Cyan,
    };
    Style::new().fg(color).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::{render_markdown, CODE_STYLE};
    use ratatui::style::{Color, Modifier};
    use ratatui::text::Text;

    fn plain_lines(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn heading_is_bold_and_followed_by_blank_line() {
        let text = render_markdown("# Title\nBody text");
        assert_eq!(plain_lines(&text), vec!["Title", "", "Body text"]);
        let heading = &text.lines[0].spans[0];
        assert!(heading.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(heading.style.fg, Some(Color::Magenta));
    }

    #[test]
    fn lists_get_markers_and_numbers() {
        let text = render_markdown("- one\n- two\n\n3. three\n4. four");
        assert_eq!(
            plain_lines(&text),
            vec!["• one", "• two", "", "3. three", "4. four"]
        );
    }

    #[test]
    fn nested_list_items_are_indented() {
        let text = render_markdown("- outer\n  - inner");
        assert_eq!(plain_lines(&text), vec!["• outer", "  • inner"]);
    }

    #[test]
    fn fenced_code_keeps_lines_and_code_style() {
        let text = render_markdown("```rust\nfn main() {}\nlet x = 1;\n```");
        assert_eq!(plain_lines(&text), vec!["  fn main() {}", "  let x = 1;"]);
        assert_eq!(text.lines[0].spans[0].style, CODE_STYLE);
    }

    #[test]
    fn inline_styles_stack() {
        let text = render_markdown("plain **bold _both_** `code`");
        let spans = &text.lines[0].spans;
        let both = spans
            .iter()
            .find(|span| span.content == "both")
            .expect("nested span");
        assert!(both.style.add_modifier.contains(Modifier::BOLD));
        assert!(both.style.add_modifier.contains(Modifier::ITALIC));
        let code = spans.iter().find(|span| span.content == "code").unwrap();
        assert_eq!(code.style.fg, Some(Color::Yellow));
    }

    #[test]
    fn plain_text_passes_through() {
        let text = render_markdown("Thinking...");
        assert_eq!(plain_lines(&text), vec!["Thinking..."]);
    }
}
