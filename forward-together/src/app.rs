//! Central application state.
//!
//! `AppState` owns the locale resolver, the conversation player, and the chat
//! session that is currently on screen, plus the pure UI state (page, mode,
//! scroll offsets, the demo input line). No ratatui rendering lives here: the
//! render module reads it and the keybinding dispatcher mutates it.
//!
//! At most one chat session exists at a time. Every path that takes the chat
//! off screen (navigating away, switching guide, switching language, quitting)
//! cancels the session before anything else happens.

use forward_together_core::{ChatSession, ChatView, ConversationPlayer, LocaleResolver, Persona};
use ratatui::layout::Rect;
use tokio::sync::watch;
use tracing::{debug, info};

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a message into the demo chat.
    Insert,
    /// Help overlay shown above everything else.
    HelpOverlay,
}

/// The page shown in the body area.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    HowItWorks,
    ForSurvivors,
    ForCaregivers,
    Stories,
    GetStarted,
    /// The demo chat with one guide. Not listed in the navigation bar.
    Chat(Persona),
}

impl Page {
    /// Pages in navigation-bar order; `1`..`6` select them.
    pub const NAV: [Page; 6] = [
        Page::Home,
        Page::HowItWorks,
        Page::ForSurvivors,
        Page::ForCaregivers,
        Page::Stories,
        Page::GetStarted,
    ];

    /// Content key of the navigation label.
    pub fn nav_key(self) -> &'static str {
        match self {
            Page::Home => "nav.home",
            Page::HowItWorks => "nav.howItWorks",
            Page::ForSurvivors => "nav.forSurvivors",
            Page::ForCaregivers => "nav.forCaregivers",
            Page::Stories => "nav.stories",
            Page::GetStarted | Page::Chat(_) => "nav.beginJourney",
        }
    }

    /// Position in [`Page::NAV`]. The chat counts as part of Get Started.
    pub fn nav_index(self) -> usize {
        match self {
            Page::Home => 0,
            Page::HowItWorks => 1,
            Page::ForSurvivors => 2,
            Page::ForCaregivers => 3,
            Page::Stories => 4,
            Page::GetStarted | Page::Chat(_) => 5,
        }
    }

    pub fn next(self) -> Self {
        Self::NAV[(self.nav_index() + 1) % Self::NAV.len()]
    }

    pub fn prev(self) -> Self {
        Self::NAV[(self.nav_index() + Self::NAV.len() - 1) % Self::NAV.len()]
    }

    /// Maps `'1'`..`'6'` to a navigation page.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::NAV.get(i)).copied()
    }

    pub fn persona(self) -> Option<Persona> {
        match self {
            Page::Chat(persona) => Some(persona),
            _ => None,
        }
    }
}

/// All mutable state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    pub page: Page,
    /// Page to return to when the chat is closed.
    return_page: Page,

    pub resolver: LocaleResolver,
    player: ConversationPlayer,
    chat: Option<ChatSession>,

    /// Demo reply being typed in Insert mode.
    pub input: String,

    /// Vertical scroll offset of static pages, from the top.
    pub page_scroll: u16,
    /// Lines scrolled back from the newest chat message. `0` follows the bottom.
    pub chat_scrollback: u16,
    pub help_scroll: u16,
    /// Inner height of the body panel, cached after each render.
    pub viewport_height: u16,
    /// Navigation-bar label areas from the last render, for click-to-navigate.
    pub nav_rects: [Rect; 6],

    /// Animation counter advanced on every tick.
    pub tick: u64,
}

impl AppState {
    pub fn new(resolver: LocaleResolver, player: ConversationPlayer) -> Self {
        Self {
            mode: Mode::default(),
            page: Page::default(),
            return_page: Page::default(),
            resolver,
            player,
            chat: None,
            input: String::new(),
            page_scroll: 0,
            chat_scrollback: 0,
            help_scroll: 0,
            viewport_height: 0,
            nav_rects: [Rect::default(); 6],
            tick: 0,
        }
    }

    /// Shorthand for `resolver.t(key)`.
    pub fn t(&self, key: &str) -> String {
        self.resolver.t(key)
    }

    /// Shows `page`, resetting scroll to the top.
    ///
    /// Leaving the chat cancels its session; navigating to `Page::Chat` starts one.
    pub fn navigate(&mut self, page: Page) {
        if let Page::Chat(persona) = page {
            self.open_chat(persona);
            return;
        }
        self.stop_chat();
        self.mode = Mode::Normal;
        self.page = page;
        self.page_scroll = 0;
        debug!(?page, "navigated");
    }

    /// Opens the demo chat with `persona`, replacing any running session.
    pub fn open_chat(&mut self, persona: Persona) {
        if !matches!(self.page, Page::Chat(_)) {
            self.return_page = self.page;
        }
        self.stop_chat();
        let transcript = self.resolver.conversation_for(persona);
        self.chat = Some(self.player.start(transcript));
        self.page = Page::Chat(persona);
        self.mode = Mode::Normal;
        self.chat_scrollback = 0;
        info!(%persona, locale = %self.resolver.current(), "chat opened");
    }

    /// Leaves the chat for the page it was opened from.
    pub fn close_chat(&mut self) {
        if matches!(self.page, Page::Chat(_)) {
            self.navigate(self.return_page);
        }
    }

    /// Starts the visible conversation over from its first message.
    pub fn restart_chat(&mut self) {
        if let Some(session) = self.chat.as_ref() {
            let fresh = self.player.restart(session);
            self.chat = Some(fresh);
            self.chat_scrollback = 0;
            debug!("chat restarted");
        }
    }

    /// Sends the input line as a demo message and clears it.
    ///
    /// Returns `false` when there is no chat or the input is blank.
    pub fn send_reply(&mut self) -> bool {
        let canned = self.resolver.t("chat.demoReply");
        let Some(session) = self.chat.as_ref() else {
            return false;
        };
        let Some(answer) = self.player.reply(session, &self.input, &canned) else {
            return false;
        };
        self.chat = Some(answer);
        self.input.clear();
        self.chat_scrollback = 0;
        true
    }

    /// Switches to the next language and restarts a visible chat in it.
    pub async fn cycle_locale(&mut self) {
        let locale = self.resolver.cycle_locale().await;
        if let Page::Chat(persona) = self.page {
            self.stop_chat();
            self.chat = Some(self.player.start(self.resolver.conversation_for(persona)));
            self.chat_scrollback = 0;
        }
        debug!(%locale, "language toggled");
    }

    /// Borrows the current chat view, if a chat is open.
    pub fn chat_view(&self) -> Option<watch::Ref<'_, ChatView>> {
        self.chat.as_ref().map(ChatSession::view)
    }

    /// Cancels any running chat. Called on quit.
    pub fn shutdown(&mut self) {
        self.stop_chat();
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    fn stop_chat(&mut self) {
        if let Some(session) = self.chat.take() {
            session.cancel();
            debug!("chat session cancelled");
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    /// Scrolls the body down by `lines` rows (towards newer messages in the chat).
    pub fn scroll_down(&mut self, lines: u16) {
        match self.page {
            Page::Chat(_) => self.chat_scrollback = self.chat_scrollback.saturating_sub(lines),
            _ => self.page_scroll = self.page_scroll.saturating_add(lines),
        }
    }

    /// Scrolls the body up by `lines` rows (back through the chat history).
    pub fn scroll_up(&mut self, lines: u16) {
        match self.page {
            Page::Chat(_) => self.chat_scrollback = self.chat_scrollback.saturating_add(lines),
            _ => self.page_scroll = self.page_scroll.saturating_sub(lines),
        }
    }

    /// Jumps to the top of the page or the oldest chat message. The renderer clamps.
    pub fn scroll_top(&mut self) {
        match self.page {
            Page::Chat(_) => self.chat_scrollback = u16::MAX,
            _ => self.page_scroll = 0,
        }
    }

    /// Jumps to the bottom of the page or the newest chat message.
    pub fn scroll_bottom(&mut self) {
        match self.page {
            Page::Chat(_) => self.chat_scrollback = 0,
            _ => self.page_scroll = u16::MAX,
        }
    }

    /// Scrolls down by half the body height cached from the previous render.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height / 2).max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use forward_together_core::{
        ContentStore, Locale, Pacing, Phase, Preferences,
    };

    async fn state() -> AppState {
        let content = Arc::new(ContentStore::embedded().unwrap());
        let resolver = LocaleResolver::restore(content, Preferences::memory(), Locale::En).await;
        AppState::new(resolver, ConversationPlayer::seeded(Pacing::default(), 11))
    }

    fn chat_receiver(state: &AppState) -> watch::Receiver<ChatView> {
        state.chat.as_ref().unwrap().subscribe()
    }

    #[test]
    fn nav_order_wraps() {
        assert_eq!(Page::Home.prev(), Page::GetStarted);
        assert_eq!(Page::GetStarted.next(), Page::Home);
        assert_eq!(Page::Chat(Persona::CaregiverGuide).next(), Page::Home);
        assert_eq!(Page::from_digit('3'), Some(Page::ForSurvivors));
        assert_eq!(Page::from_digit('0'), None);
        assert_eq!(Page::from_digit('7'), None);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_resets_scroll() {
        let mut state = state().await;
        state.navigate(Page::Stories);
        state.scroll_down(12);
        assert_eq!(state.page_scroll, 12);
        state.navigate(Page::ForCaregivers);
        assert_eq!(state.page_scroll, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_the_chat_cancels_its_session() {
        let mut state = state().await;
        state.navigate(Page::GetStarted);
        state.open_chat(Persona::SurvivorGuide);
        let rx = chat_receiver(&state);

        tokio::time::sleep(Duration::from_secs(3)).await;
        state.close_chat();
        assert_eq!(state.page, Page::GetStarted);
        assert!(state.chat_view().is_none());
        assert_eq!(rx.borrow().phase, Phase::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_guide_replaces_the_session() {
        let mut state = state().await;
        state.open_chat(Persona::SurvivorGuide);
        let bob = chat_receiver(&state);
        state.open_chat(Persona::CaregiverGuide);
        assert_eq!(bob.borrow().phase, Phase::Cancelled);
        assert_eq!(state.page, Page::Chat(Persona::CaregiverGuide));

        tokio::time::sleep(Duration::from_secs(3)).await;
        let miri = state.resolver.conversation_for(Persona::CaregiverGuide);
        let view = state.chat_view().unwrap().clone();
        assert_eq!(view.messages[0], miri.messages()[0]);

        // Esc returns to where the first chat was opened from.
        state.close_chat();
        assert_eq!(state.page, Page::Home);
    }

    #[tokio::test(start_paused = true)]
    async fn language_toggle_restarts_the_chat_in_the_new_language() {
        let mut state = state().await;
        state.open_chat(Persona::SurvivorGuide);
        tokio::time::sleep(Duration::from_secs(3)).await;
        let english = chat_receiver(&state);

        state.cycle_locale().await;
        assert_eq!(state.resolver.current(), Locale::Es);
        assert_eq!(english.borrow().phase, Phase::Cancelled);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let spanish = state.resolver.content().transcript_for(Locale::Es, Persona::SurvivorGuide);
        let view = state.chat_view().unwrap().clone();
        assert_eq!(view.messages[0], spanish.messages()[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn demo_reply_uses_the_localized_answer() {
        let mut state = state().await;
        state.open_chat(Persona::CaregiverGuide);
        assert!(!state.send_reply());

        state.input = "I'm so tired".to_owned();
        assert!(state.send_reply());
        assert!(state.input.is_empty());

        tokio::time::sleep(Duration::from_secs(5)).await;
        let view = state.chat_view().unwrap().clone();
        let last = view.messages.last().unwrap();
        assert_eq!(last.text, "Thank you for sharing. You're not alone.");
        assert!(last.is_bot());
    }

    #[tokio::test(start_paused = true)]
    async fn chat_scrolling_counts_back_from_the_newest_message() {
        let mut state = state().await;
        state.open_chat(Persona::SurvivorGuide);
        state.scroll_up(4);
        assert_eq!(state.chat_scrollback, 4);
        state.scroll_down(10);
        assert_eq!(state.chat_scrollback, 0);
        state.scroll_top();
        state.restart_chat();
        assert_eq!(state.chat_scrollback, 0);
    }
}
