//! Scrollable list of message bubbles.
//!
//! Every bubble is laid out on each draw. Only bubbles that overlap the
//! viewport are drawn, each onto a scratch buffer holding just its visible
//! rows, so neither the length of the conversation nor the size of a single
//! message bounds what can be shown.

use chrono::{DateTime, Local, TimeZone, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};
use std::fmt;

use crate::avatar::AvatarBadge;
use crate::chat::Message;
use crate::scroll::ListViewport;

/// Width cap of a bubble holding long content, in percent of the list width.
const WIDE_BUBBLE_PERCENT: u16 = 70;
/// Width cap of a bubble holding short content, in percent of the list width.
const NARROW_BUBBLE_PERCENT: u16 = 60;
/// Borders plus one column of padding on each side.
const BUBBLE_CHROME: u16 = 4;
/// Blank rows between consecutive bubbles.
const BUBBLE_GAP: u32 = 1;

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// `Jul 5, 2023, 12:34 PM`, the en-US short date-time layout.
pub fn format_timestamp<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    timestamp.format("%b %-d, %Y, %-I:%M %p").to_string()
}

fn local_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp(&timestamp.with_timezone(&Local))
}

/// Where one bubble sits inside the list, relative to the top-left of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleLayout {
    pub x: u16,
    pub y: u32,
    pub width: u16,
    pub height: u32,
    pub wide: bool,
}

struct Bubble<'a> {
    message: &'a Message,
    badge: AvatarBadge,
    timestamp: String,
    body: Text<'a>,
    wrap: Wrap,
}

impl<'a> Bubble<'a> {
    fn new(message: &'a Message, badge: AvatarBadge, timestamp: String) -> Self {
        let (body, wrap) = if message.is_wide() {
            // Literal whitespace and line breaks survive in the wide bubble.
            (Text::from(message.content.as_str()), Wrap { trim: false })
        } else {
            let collapsed = message.content.split_whitespace().collect::<Vec<_>>().join(" ");
            (Text::from(collapsed), Wrap { trim: true })
        };

        Self {
            message,
            badge,
            timestamp,
            body,
            wrap,
        }
    }

    fn title(&self) -> Line<'a> {
        let name_style = if self.message.is_sender {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        };

        Line::from(vec![
            Span::styled(
                format!(" {} ", self.badge.glyph()),
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ),
            Span::styled(format!(" {} ", self.message.user.name), name_style),
        ])
    }

    fn footer(&self) -> Line<'static> {
        Line::from(Span::styled(
            format!(" {} ", self.timestamp),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Right)
    }

    fn measure(&self, list_width: u16) -> (u16, u32) {
        let percent = if self.message.is_wide() {
            WIDE_BUBBLE_PERCENT
        } else {
            NARROW_BUBBLE_PERCENT
        };
        let cap = (list_width.saturating_mul(percent) / 100)
            .max((BUBBLE_CHROME + 1).min(list_width));

        let body_width = clamp_u16(self.body.width()).saturating_add(BUBBLE_CHROME);
        let title_width = clamp_u16(self.title().width()).saturating_add(2);
        let footer_width = clamp_u16(self.footer().width()).saturating_add(2);
        let natural = body_width.max(title_width).max(footer_width);

        let width = natural.min(cap).min(list_width);
        let inner_width = width.saturating_sub(BUBBLE_CHROME);
        let body_lines = Paragraph::new(self.body.clone())
            .wrap(self.wrap)
            .line_count(inner_width)
            .max(1);

        (width, u32::try_from(body_lines).unwrap_or(u32::MAX).saturating_add(2))
    }

    /// Draw rows `skip..skip + area.height` of a bubble `height` rows tall into `area`.
    ///
    /// Body lines above the slice are scrolled away and nothing below it is
    /// laid out, so the scratch buffer never outgrows the viewport.
    fn render_rows(self, height: u32, skip: u32, area: Rect, buf: &mut Buffer) {
        // The top border stands in for the last hidden body line.
        let scroll = skip.saturating_sub(1);
        let first = skip - scroll;
        let window = (height - scroll).min(first + u32::from(area.height) + 1);
        let window = u16::try_from(window).unwrap_or(u16::MAX);

        let border_color = if self.message.is_sender {
            Color::Cyan
        } else {
            Color::Gray
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::horizontal(1))
            .title(self.title())
            .title_bottom(self.footer());

        let mut scratch = Buffer::empty(Rect::new(0, 0, area.width, window));
        Paragraph::new(self.body)
            .wrap(self.wrap)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .block(block)
            .render(scratch.area, &mut scratch);

        let first = first as u16;
        for row in 0..area.height {
            for col in 0..area.width {
                if let (Some(src), Some(dst)) = (
                    scratch.cell((col, first + row)),
                    buf.cell_mut((area.x + col, area.y + row)),
                ) {
                    *dst = src.clone();
                }
            }
        }
    }
}

pub struct MessageList<'a> {
    messages: &'a [Message],
    badges: &'a [AvatarBadge],
    timestamp: fn(&DateTime<Utc>) -> String,
}

impl<'a> MessageList<'a> {
    /// `badges` holds one avatar badge per message, in the same order.
    pub fn new(messages: &'a [Message], badges: &'a [AvatarBadge]) -> Self {
        Self {
            messages,
            badges,
            timestamp: local_timestamp,
        }
    }

    /// Override how timestamps are rendered (local time by default).
    #[cfg(test)]
    pub fn timestamp_format(mut self, format: fn(&DateTime<Utc>) -> String) -> Self {
        self.timestamp = format;
        self
    }

    fn bubbles(&self) -> Vec<Bubble<'a>> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, message)| {
                let badge = self
                    .badges
                    .get(i)
                    .copied()
                    .unwrap_or_else(|| AvatarBadge::Initial(crate::avatar::initial(&message.user.name)));
                Bubble::new(message, badge, (self.timestamp)(&message.timestamp))
            })
            .collect()
    }

    /// Position every bubble for a list `width` columns wide.
    #[cfg(test)]
    pub fn layout(&self, width: u16) -> Vec<BubbleLayout> {
        layout_bubbles(&self.bubbles(), width)
    }
}

fn layout_bubbles(bubbles: &[Bubble<'_>], width: u16) -> Vec<BubbleLayout> {
    let mut y = 0u32;
    bubbles
        .iter()
        .map(|bubble| {
            let (bubble_width, height) = bubble.measure(width);
            let x = if bubble.message.is_sender {
                width.saturating_sub(bubble_width)
            } else {
                0
            };
            let layout = BubbleLayout {
                x,
                y,
                width: bubble_width,
                height,
                wide: bubble.message.is_wide(),
            };
            y = y.saturating_add(height).saturating_add(BUBBLE_GAP);
            layout
        })
        .collect()
}

impl StatefulWidget for MessageList<'_> {
    type State = ListViewport;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ListViewport) {
        if area.is_empty() {
            return;
        }

        if self.messages.is_empty() {
            state.update_layout(u32::from(area.height), 0);
            Paragraph::new("No messages yet. Say hello!")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .render(area, buf);
            return;
        }

        // Keep the last column for the scrollbar.
        let list_width = area.width.saturating_sub(1).max(1);
        let bubbles = self.bubbles();
        let layouts = layout_bubbles(&bubbles, list_width);
        let content_height = layouts
            .last()
            .map(|l| l.y.saturating_add(l.height))
            .unwrap_or(0);

        state.update_layout(u32::from(area.height), content_height);

        let view_top = state.offset;
        let view_bottom = view_top.saturating_add(u32::from(area.height));
        for (bubble, layout) in bubbles.into_iter().zip(&layouts) {
            let bottom = layout.y.saturating_add(layout.height);
            if bottom <= view_top || layout.y >= view_bottom {
                continue;
            }
            // Both are bounded by the viewport height.
            let top = (layout.y.max(view_top) - view_top) as u16;
            let rows = (bottom.min(view_bottom) - layout.y.max(view_top)) as u16;
            bubble.render_rows(
                layout.height,
                view_top.saturating_sub(layout.y),
                Rect::new(area.x + layout.x, area.y + top, layout.width, rows),
                buf,
            );
        }

        if state.max_offset() > 0 {
            let mut scrollbar_state = ScrollbarState::new(state.max_offset() as usize)
                .position(state.offset as usize);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .render(area, buf, &mut scrollbar_state);
        }
    }
}
