//! UI rendering for image flashcards.

use crate::app::{App, InputField};
use flashcard_deck::{CurrentCard, Side, Status};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 32;
const FOOTER: &str =
    "←/→:Prev/Next  Space:Flip  m/n:Mark  f:Review  a:All  r:Range  s:Shuffle  ?:Help  q:Quit";

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);
    draw_sidebar(f, app, body[0]);
    draw_card_area(f, app, body[1]);

    let footer = Paragraph::new(FOOTER)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);

    if app.show_help {
        draw_help(f);
    }

    if app.editing {
        draw_input(f, app);
    }

    if let Some(msg) = &app.message {
        draw_message(f, msg);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled("Image Flashcards", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", app.data_folder.display()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let progress = session.progress();
    let heading = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled("Range", heading)),
        Line::from(format!("  Start: {}", app.range_start)),
        Line::from(format!("  End:   {}", app.range_end)),
        Line::from(format!("  Shuffle: {}", if app.shuffle_on { "on" } else { "off" })),
        Line::from(format!("  Loaded: {} pairs", session.source_len())),
        Line::from(""),
        Line::from(Span::styled("Progress (range)", heading)),
        Line::from(vec![
            Span::styled("  Mastered:     ", Style::default().fg(status_color(Status::Mastered))),
            Span::raw(format!(
                "{} / {} ({:.0}%)",
                progress.mastered,
                progress.total,
                progress.mastered_ratio() * 100.0
            )),
        ]),
        Line::from(vec![
            Span::styled(
                "  Needs review: ",
                Style::default().fg(status_color(Status::NeedsReview)),
            ),
            Span::raw(format!("{} / {}", progress.needs_review, progress.total)),
        ]),
        Line::from(format!("  Unseen:       {}", progress.unseen())),
        Line::from(""),
        Line::from(Span::styled("Mode", heading)),
        Line::from(if session.is_filtered() {
            "  Review (unmastered only)"
        } else {
            "  All cards in range"
        }),
    ];

    let sidebar =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Settings "));
    f.render_widget(sidebar, area);
}

fn draw_card_area(f: &mut Frame, app: &App, area: Rect) {
    let card = match app.session.current_pair() {
        Ok(card) => card,
        Err(_) => {
            let empty = Paragraph::new("No cards to show. Set a range or show all cards.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, area);
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress
            Constraint::Min(0),    // Card
            Constraint::Length(3), // Buttons
        ])
        .split(area);

    let ratio = (card.position + 1) as f64 / card.total as f64;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("Card {} / {}", card.position + 1, card.total));
    f.render_widget(gauge, chunks[0]);

    draw_card(f, app, &card, chunks[1]);
    draw_buttons(f, app, &card, chunks[2]);
}

fn draw_card(f: &mut Frame, app: &App, card: &CurrentCard<'_>, area: Rect) {
    let path = card.visible_path();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(card.status.name(), Style::default().fg(status_color(card.status))),
        ]),
        Line::from(format!("Card #{}", card.pair.id)),
        Line::from(""),
        Line::from(Span::styled(file_name, Style::default().add_modifier(Modifier::BOLD))),
    ];
    if app.config.display.show_paths {
        lines.push(Line::from(Span::styled(
            path.display().to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if card.is_last {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Last card! Press f to retry the cards you have not mastered.",
            Style::default().fg(Color::Cyan),
        )));
    }

    let title_style = match card.side {
        Side::Problem => Style::default().add_modifier(Modifier::BOLD),
        Side::Solution => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", card.side.name()), title_style));

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(content, area);
}

fn draw_buttons(f: &mut Frame, app: &App, card: &CurrentCard<'_>, area: Rect) {
    let session = &app.session;
    let flip_label = match card.side {
        Side::Problem => "Show solution",
        Side::Solution => "Back to problem",
    };

    let buttons = [
        ("←", "Prev", Color::White, !session.at_first()),
        ("Space", flip_label, Color::White, true),
        ("→", "Next", Color::White, !session.at_last()),
        ("m", "Mastered", status_color(Status::Mastered), true),
        ("n", "Needs review", status_color(Status::NeedsReview), true),
    ];

    let button_spans: Vec<Span> = buttons
        .iter()
        .flat_map(|(key, label, color, enabled)| {
            let key_style = if *enabled {
                Style::default().fg(*color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::styled(format!("[{}]", key), key_style),
                Span::raw(format!(" {} ", label)),
                Span::raw("  "),
            ]
        })
        .collect();

    let button_line = Paragraph::new(Line::from(button_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button_line, area);
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Unseen => Color::Gray,
        Status::Mastered => Color::Green,
        Status::NeedsReview => Color::Yellow,
    }
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Image Flashcards Keybindings

Cards:
  h/l, Left/Right   Previous / next card
  Space, Enter      Flip problem / solution
  m                 Mark mastered
  n                 Mark needs review
  o                 Open image in viewer

Deck:
  r                 Set range (start, then end)
  s                 Toggle shuffle for next range
  f                 Show only unmastered cards
  a                 Show all cards in range
  R                 Reset progress

General:
  ?                 Show this help
  q, Ctrl-C         Quit

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_input(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 15, f.area());
    f.render_widget(Clear, area);

    let total = app.session.source_len();
    let title = match app.input_field {
        InputField::RangeStart => {
            format!("Start card (1-{total}, Enter keeps {})", app.range_start)
        }
        InputField::RangeEnd => format!("End card (1-{total}, Enter keeps {})", app.range_end),
        InputField::None => String::new(),
    };

    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
    f.render_widget(input, area);

    f.set_cursor_position((area.x + 1 + app.input_buffer.len() as u16, area.y + 1));
}

fn draw_message(f: &mut Frame, msg: &str) {
    let area = Rect::new(
        f.area().x + 2,
        f.area().height.saturating_sub(5),
        f.area().width.saturating_sub(4),
        3,
    );
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use flashcard_deck::{DeckSession, Pair};
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn app(n: u64) -> App {
        let pairs = (1..=n)
            .map(|i| Pair::new(i, format!("front/f{i}.png"), format!("back/b{i}.png")))
            .collect();
        App::new(DeckSession::new(pairs), Config::default(), PathBuf::from("Data"))
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_problem_side() {
        let app = app(3);
        let screen = render(&app);
        assert!(screen.contains("Card 1 / 3"));
        assert!(screen.contains(" Problem "));
        assert!(screen.contains("f1.png"));
        assert!(screen.contains("Mastered:     0 / 3"));
    }

    #[test]
    fn test_renders_solution_after_flip() {
        let mut app = app(2);
        app.session.next();
        app.session.flip();
        let screen = render(&app);
        assert!(screen.contains(" Solution "));
        assert!(screen.contains("b2.png"));
        assert!(screen.contains("Last card!"));
    }

    #[test]
    fn test_renders_empty_state() {
        let app = app(0);
        let screen = render(&app);
        assert!(screen.contains("No cards to show."));
    }

    #[test]
    fn test_renders_review_mode() {
        let mut app = app(3);
        app.session.mark_status(Status::Mastered).unwrap();
        app.session.filter_for_review();
        let screen = render(&app);
        assert!(screen.contains("Review (unmastered only)"));
        assert!(screen.contains("Card 1 / 2"));
    }
}
