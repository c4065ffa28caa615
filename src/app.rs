use chrono::Utc;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use crate::avatar::{AvatarBadge, AvatarResolver};
use crate::chat::{MessageId, MessageStore, Sender};
use crate::composer::Composer;
use crate::config::Config;
use crate::history::{HistorySource, SampleHistory};
use crate::presence::{Participant, PresenceSource, StaticRoster};
use crate::scroll::{AutoScroll, ListViewport};

/// Element that receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Composer,
    SendButton,
    Participants,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Composer => Focus::SendButton,
            Focus::SendButton => Focus::Participants,
            Focus::Participants => Focus::Composer,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Composer => Focus::Participants,
            Focus::SendButton => Focus::Composer,
            Focus::Participants => Focus::SendButton,
        }
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: Focus,

    // Chat state
    pub store: MessageStore,
    pub composer: Composer,
    pub viewport: ListViewport,
    me: Sender,
    history: Box<dyn HistorySource>,

    // Roster dropdown
    pub roster: Vec<Participant>,
    pub roster_open: bool,
    pub roster_state: ListState,

    pub avatars: AvatarResolver,

    // Effects
    auto_scroll: AutoScroll,
    drawn_revision: Option<u64>,

    // Areas for mouse hit-testing (updated during render)
    pub list_area: Option<Rect>,
    pub composer_area: Option<Rect>,
    pub send_area: Option<Rect>,
    pub roster_trigger_area: Option<Rect>,
    pub roster_panel_area: Option<Rect>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_sources(
            Sender::new(config.display_name(), config.avatar()),
            Box::new(SampleHistory),
            &StaticRoster::default(),
            AvatarResolver::new(config.assets_dir()),
        )
    }

    pub fn with_sources(
        me: Sender,
        history: Box<dyn HistorySource>,
        presence: &dyn PresenceSource,
        avatars: AvatarResolver,
    ) -> Self {
        let store = MessageStore::new(history.load());
        let roster = presence.participants();

        tracing::info!(
            messages = store.len(),
            participants = roster.len(),
            name = %me.name,
            "chat page ready"
        );

        Self {
            should_quit: false,
            focus: Focus::default(),

            store,
            composer: Composer::new(),
            viewport: ListViewport::default(),
            me,
            history,

            roster,
            roster_open: false,
            roster_state: ListState::default(),

            avatars,

            auto_scroll: AutoScroll::new(),
            drawn_revision: None,

            list_area: None,
            composer_area: None,
            send_area: None,
            roster_trigger_area: None,
            roster_panel_area: None,
        }
    }

    /// Send whatever is in the composer. Whitespace-only input is ignored.
    pub fn submit_message(&mut self) -> Option<MessageId> {
        let content = self.composer.take_submission()?;

        let message = self
            .store
            .append(self.me.clone(), content, Utc::now(), true);
        let id = message.id;
        self.history.record(message);

        Some(id)
    }

    // Roster dropdown
    pub fn toggle_roster(&mut self) {
        if self.roster_open {
            self.close_roster();
        } else {
            self.open_roster();
        }
    }

    pub fn open_roster(&mut self) {
        self.roster_open = true;
        if self.roster_state.selected().is_none() && !self.roster.is_empty() {
            self.roster_state.select(Some(0));
        }
        tracing::debug!("participants dropdown opened");
    }

    pub fn close_roster(&mut self) {
        self.roster_open = false;
        self.roster_panel_area = None;
        tracing::debug!("participants dropdown closed");
    }

    pub fn roster_nav_down(&mut self) {
        let len = self.roster.len();
        if len > 0 {
            let i = self.roster_state.selected().unwrap_or(0);
            self.roster_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn roster_nav_up(&mut self) {
        let i = self.roster_state.selected().unwrap_or(0);
        self.roster_state.select(Some(i.saturating_sub(1)));
    }

    // Message list scrolling
    pub fn scroll_messages_down(&mut self, rows: u32) {
        self.viewport.scroll_down(rows);
    }

    pub fn scroll_messages_up(&mut self, rows: u32) {
        self.viewport.scroll_up(rows);
    }

    pub fn page_down(&mut self) {
        let page = self.viewport.page();
        self.viewport.scroll_down(page);
    }

    pub fn page_up(&mut self) {
        let page = self.viewport.page();
        self.viewport.scroll_up(page);
    }

    /// Avatar badge for every message, in store order.
    pub fn message_badges(&mut self) -> Vec<AvatarBadge> {
        let avatars = &mut self.avatars;
        self.store
            .messages()
            .iter()
            .map(|m| avatars.badge(&m.user.name, &m.user.avatar))
            .collect()
    }

    /// Record that the current store contents reached the screen.
    pub fn mark_drawn(&mut self) {
        self.drawn_revision = Some(self.store.revision());
    }

    /// Run effects that depend on the last drawn layout.
    ///
    /// Returns true when something visible changed and the caller should draw again.
    pub fn run_effects(&mut self) -> bool {
        let drawn = self
            .drawn_revision
            .filter(|&revision| revision == self.store.revision());
        self.auto_scroll.run(drawn, &mut self.viewport)
    }

    pub fn auto_scroll_runs(&self) -> usize {
        self.auto_scroll.runs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> (App, tempfile::TempDir) {
        let assets = tempfile::tempdir().unwrap();
        let app = App::with_sources(
            Sender::new("You", "/placeholder-user.jpg"),
            Box::new(SampleHistory),
            &StaticRoster::default(),
            AvatarResolver::new(assets.path()),
        );
        (app, assets)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.composer.insert_char(c);
        }
    }

    #[test]
    fn test_submit_appends_sender_message_and_clears_composer() {
        let (mut app, _assets) = test_app();
        type_text(&mut app, "hello");

        let id = app.submit_message();

        assert_eq!(id, Some(MessageId(4)));
        assert_eq!(app.store.len(), 4);
        let last = app.store.last().unwrap();
        assert_eq!(last.user.name, "You");
        assert_eq!(last.content, "hello");
        assert!(last.is_sender);
        assert_eq!(app.composer.text(), "");
    }

    #[test]
    fn test_submit_blank_is_a_no_op() {
        let (mut app, _assets) = test_app();
        type_text(&mut app, "   ");
        let revision = app.store.revision();

        assert_eq!(app.submit_message(), None);
        assert_eq!(app.store.len(), 3);
        assert_eq!(app.store.revision(), revision);
        assert_eq!(app.composer.text(), "   ");
    }

    #[test]
    fn test_auto_scroll_waits_for_draw_and_fires_once() {
        let (mut app, _assets) = test_app();
        app.viewport.update_layout(10, 40);

        // Mount: nothing drawn yet.
        assert!(!app.run_effects());
        app.mark_drawn();
        assert!(app.run_effects());
        assert_eq!(app.auto_scroll_runs(), 1);

        type_text(&mut app, "hello");
        app.submit_message();
        // The appended message has not been drawn yet.
        assert!(!app.run_effects());
        assert_eq!(app.auto_scroll_runs(), 1);

        app.viewport.update_layout(10, 46);
        app.mark_drawn();
        assert!(app.run_effects());
        assert_eq!(app.viewport.offset, 36);
        assert_eq!(app.auto_scroll_runs(), 2);

        assert!(!app.run_effects());
        assert_eq!(app.auto_scroll_runs(), 2);
    }

    #[test]
    fn test_composer_edits_do_not_trigger_auto_scroll() {
        let (mut app, _assets) = test_app();
        app.viewport.update_layout(10, 40);
        app.mark_drawn();
        app.run_effects();

        app.viewport.scroll_up(7);
        type_text(&mut app, "draft");
        app.mark_drawn();
        assert!(!app.run_effects());
        assert_eq!(app.viewport.offset, 23);
        assert_eq!(app.auto_scroll_runs(), 1);
    }

    #[test]
    fn test_roster_toggle_and_navigation() {
        let (mut app, _assets) = test_app();
        app.toggle_roster();
        assert!(app.roster_open);
        assert_eq!(app.roster_state.selected(), Some(0));

        app.roster_nav_down();
        app.roster_nav_down();
        app.roster_nav_down();
        assert_eq!(app.roster_state.selected(), Some(2));
        app.roster_nav_up();
        assert_eq!(app.roster_state.selected(), Some(1));

        app.toggle_roster();
        assert!(!app.roster_open);
        assert_eq!(app.roster.len(), 3);
    }

    #[test]
    fn test_focus_cycle() {
        assert_eq!(Focus::Composer.next(), Focus::SendButton);
        assert_eq!(Focus::SendButton.next(), Focus::Participants);
        assert_eq!(Focus::Participants.next(), Focus::Composer);
        assert_eq!(Focus::Composer.prev(), Focus::Participants);
    }

    #[test]
    fn test_missing_avatar_images_fall_back_to_initials() {
        let (mut app, _assets) = test_app();
        let glyphs: Vec<char> = app.message_badges().into_iter().map(|b| b.glyph()).collect();
        assert_eq!(glyphs, vec!['J', 'J', 'B']);
    }
}
