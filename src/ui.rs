use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use crate::app::{App, Focus};
use crate::message_list::MessageList;

const TITLE: &str = "Chatter Cave";
const USERS_ICON: &str = "👥";
const SEND_ICON: &str = "➤";
const COMPOSER_PLACEHOLDER: &str = "Type your message...";
/// Shown in the composer in place of a line break so one row can hold the whole draft.
const LINE_BREAK_GLYPH: char = '⏎';
const ROSTER_PANEL_WIDTH: u16 = 30;
const SEND_BUTTON_WIDTH: u16 = 7;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, messages, composer, footer
    let [header_area, list_area, composer_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_messages(app, frame, list_area);
    render_composer(app, frame, composer_area);
    render_footer(app, frame, footer_area);

    if app.roster_open {
        render_roster(app, frame, area);
    }

    app.mark_drawn();
}

fn render_header(app: &mut App, frame: &mut Frame, area: Rect) {
    let trigger_label = format!(" {} {} ", USERS_ICON, app.roster.len());
    let trigger_width = Line::from(trigger_label.as_str()).width() as u16;

    let [title_area, trigger_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(trigger_width),
    ])
    .areas(area);

    app.roster_trigger_area = Some(trigger_area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", TITLE),
        Style::default().fg(Color::Cyan).bold(),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(title, title_area);

    let trigger_style = if app.roster_open || app.focus == Focus::Participants {
        Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    frame.render_widget(Paragraph::new(trigger_label).style(trigger_style), trigger_area);
}

fn render_messages(app: &mut App, frame: &mut Frame, area: Rect) {
    let inner = area.inner(Margin::new(1, 1));
    app.list_area = Some(inner);

    let badges = app.message_badges();
    let list = MessageList::new(app.store.messages(), &badges);
    frame.render_stateful_widget(list, inner, &mut app.viewport);
}

fn render_composer(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(SEND_BUTTON_WIDTH),
    ])
    .areas(area);

    app.composer_area = Some(input_area);
    app.send_area = Some(button_area);

    let input_focused = app.focus == Focus::Composer && !app.roster_open;
    let input_border_color = if input_focused { Color::Yellow } else { Color::DarkGray };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color));

    // Inner width = total width - 2 (for borders)
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) =
        composer_window(app.composer.text(), app.composer.cursor(), inner_width);

    let input = if app.composer.text().is_empty() {
        Paragraph::new(COMPOSER_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(input.block(input_block), input_area);

    if input_focused && inner_width > 0 {
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }

    let button_style = if app.focus == Focus::SendButton && !app.roster_open {
        Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let button = Paragraph::new(Line::from(SEND_ICON).centered())
        .style(button_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(button, button_area);
}

fn glyph_width(c: char) -> usize {
    let mut utf8 = [0u8; 4];
    Span::raw(&*c.encode_utf8(&mut utf8)).width()
}

/// Slice of the draft that fits `width` cells with the cursor in view, and the
/// cursor column inside it. Measured in display cells so wide glyphs line up.
fn composer_window(text: &str, cursor: usize, width: usize) -> (String, u16) {
    let glyphs: Vec<(char, usize)> = text
        .chars()
        .map(|c| if c == '\n' { LINE_BREAK_GLYPH } else { c })
        .map(|c| (c, glyph_width(c)))
        .collect();
    let cursor = cursor.min(glyphs.len());

    // Scroll left until the cursor cell fits.
    let mut start = 0;
    let mut before: usize = glyphs[..cursor].iter().map(|&(_, w)| w).sum();
    while start < cursor && before >= width {
        before -= glyphs[start].1;
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for &(c, w) in &glyphs[start..] {
        if used + w > width {
            break;
        }
        used += w;
        visible.push(c);
    }

    (visible, u16::try_from(before).unwrap_or(u16::MAX))
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = if app.roster_open {
        vec![
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" browse ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
        ]
    } else {
        match app.focus {
            Focus::Composer => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" Alt+Enter ", key_style),
                Span::styled(" new line ", label_style),
            ],
            Focus::SendButton => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
            ],
            Focus::Participants => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" participants ", label_style),
            ],
        }
    };

    hints.extend(vec![
        Span::styled(" Tab ", key_style),
        Span::styled(" focus ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" ^P ", key_style),
        Span::styled(" online ", label_style),
        Span::styled(" ^C ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

/// Dropdown panel hanging under the participants trigger, right-aligned with it.
fn roster_panel_area(app: &App, area: Rect) -> Rect {
    let anchor = app.roster_trigger_area.unwrap_or(Rect::new(area.right(), area.y, 0, 1));
    let width = ROSTER_PANEL_WIDTH.min(area.width);
    // Borders, label and separator around one row per participant.
    let height = (app.roster.len() as u16 + 4)
        .min(area.height.saturating_sub(anchor.bottom().saturating_sub(area.y)));

    let x = anchor.right().saturating_sub(width).max(area.x);
    Rect::new(x, anchor.bottom(), width, height)
}

fn render_roster(app: &mut App, frame: &mut Frame, area: Rect) {
    let popup_area = roster_panel_area(app, area);
    app.roster_panel_area = Some(popup_area);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let [label_area, separator_area, rows_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(" Online Participants").style(Style::default().add_modifier(Modifier::BOLD)),
        label_area,
    );
    frame.render_widget(
        Paragraph::new("─".repeat(separator_area.width as usize))
            .style(Style::default().fg(Color::DarkGray)),
        separator_area,
    );

    let avatars = &mut app.avatars;
    let items: Vec<ListItem> = app
        .roster
        .iter()
        .map(|participant| {
            let badge = avatars.badge(&participant.name, &participant.avatar);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", badge.glyph()),
                    Style::default().bg(Color::DarkGray).fg(Color::White),
                ),
                Span::raw(format!(" {}", participant.name)),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, rows_area, &mut app.roster_state);
}
