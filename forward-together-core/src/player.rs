//! Scripted conversation playback.
//!
//! A [`ChatSession`] replays one transcript as a looping animation: the guide or
//! the visitor "types" for a while, the bubble appears, a short or long read
//! pause follows, and after the last bubble the whole script starts over. The
//! session is a single tokio task that publishes a [`ChatView`] through a
//! `watch` channel; the UI borrows the latest view on every frame.
//!
//! # Cancellation
//!
//! Every suspension point races a `CancellationToken`. Publishing re-checks the
//! token while holding the channel's write lock, and [`ChatSession::cancel`]
//! takes that same lock after tripping the token, so once `cancel` returns no
//! further change to the messages or typing flags can land. The task is also
//! aborted, which drops whichever timer was pending.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::pacing::Pacing;
use crate::types::{Message, Sender, Transcript};

/// Where a session currently is in its script.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Start of a pass, nothing revealed yet.
    #[default]
    Idle,
    /// The typing indicator for the next message is showing.
    Typing(Sender),
    /// A message from this sender has just been revealed.
    Revealed(Sender),
    /// The script finished; waiting before it loops.
    EndPause,
    /// The session was cancelled. Terminal.
    Cancelled,
}

/// Everything the chat panel needs to draw one frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChatView {
    /// Messages revealed so far in the current pass, in order.
    pub messages: Vec<Message>,
    pub bot_typing: bool,
    pub user_typing: bool,
    pub phase: Phase,
    /// Number of passes started; `0` until the task first runs.
    pub pass: u64,
}

impl ChatView {
    pub fn is_typing(&self) -> bool {
        self.bot_typing || self.user_typing
    }
}

/// Marker for "the session was cancelled while this step was pending".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cancelled;

/// Shared between the session handle and its task.
struct Publisher {
    tx: watch::Sender<ChatView>,
    token: CancellationToken,
}

impl Publisher {
    /// Applies `change` to the view unless the session is cancelled.
    fn publish(&self, change: impl FnOnce(&mut ChatView)) -> Result<(), Cancelled> {
        let mut applied = false;
        self.tx.send_if_modified(|view| {
            if self.token.is_cancelled() {
                return false;
            }
            change(view);
            applied = true;
            true
        });
        if applied {
            Ok(())
        } else {
            Err(Cancelled)
        }
    }

    /// Sleeps for `duration`, returning early with `Cancelled` if the token trips.
    async fn pause(&self, duration: Duration) -> Result<(), Cancelled> {
        if self.token.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Cancelled),
            _ = tokio::time::sleep(duration) => {
                if self.token.is_cancelled() { Err(Cancelled) } else { Ok(()) }
            }
        }
    }

    /// Trips the token, then waits out any in-flight publish and marks the view.
    fn seal(&self) {
        self.token.cancel();
        self.tx.send_modify(|view| view.phase = Phase::Cancelled);
    }
}

/// Starts playback sessions. Owns the pacing and the jitter source.
pub struct ConversationPlayer {
    pacing: Pacing,
    rng: StdRng,
}

impl ConversationPlayer {
    /// A player whose jitter is seeded from OS entropy.
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing, rng: StdRng::from_entropy() }
    }

    /// A player with reproducible jitter.
    pub fn seeded(pacing: Pacing, seed: u64) -> Self {
        Self { pacing, rng: StdRng::seed_from_u64(seed) }
    }

    /// Starts looping playback of `transcript` from its first message.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `transcript` is empty. `Transcript::new` rules this out, so a
    /// failure here is a bug.
    pub fn start(&mut self, transcript: Arc<Transcript>) -> ChatSession {
        assert!(!transcript.is_empty(), "cannot play an empty transcript");
        let rng = self.session_rng();
        let pacing = self.pacing.clone();
        let script = Arc::clone(&transcript);
        debug!(messages = transcript.len(), "starting scripted playback");
        ChatSession::spawn(transcript, ChatView::default(), move |publisher| {
            run_script(publisher, script, pacing, rng)
        })
    }

    /// Cancels `previous` and starts its transcript again from the top.
    pub fn restart(&mut self, previous: &ChatSession) -> ChatSession {
        previous.cancel();
        self.start(Arc::clone(&previous.transcript))
    }

    /// Answers a visitor message typed into the demo chat.
    ///
    /// Cancels the scripted loop of `previous`, keeps what it had revealed,
    /// appends `text` as a visitor bubble, shows the guide typing, then reveals
    /// `canned_reply`. The new session does not loop. Returns `None` without
    /// touching `previous` when `text` is blank.
    pub fn reply(
        &mut self,
        previous: &ChatSession,
        text: &str,
        canned_reply: &str,
    ) -> Option<ChatSession> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        previous.cancel();

        let mut seed = previous.snapshot();
        seed.bot_typing = false;
        seed.user_typing = false;
        seed.phase = Phase::Idle;

        let rng = self.session_rng();
        let pacing = self.pacing.clone();
        let text = text.to_owned();
        let reply = canned_reply.to_owned();
        debug!("answering demo message");
        Some(ChatSession::spawn(
            Arc::clone(&previous.transcript),
            seed,
            move |publisher| run_reply(publisher, text, reply, pacing, rng),
        ))
    }

    fn session_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }
}

/// Handle to one running playback. Dropping it cancels the playback.
pub struct ChatSession {
    transcript: Arc<Transcript>,
    publisher: Arc<Publisher>,
    view: watch::Receiver<ChatView>,
    task: JoinHandle<()>,
}

impl ChatSession {
    fn spawn<F, Fut>(transcript: Arc<Transcript>, initial: ChatView, body: F) -> Self
    where
        F: FnOnce(Arc<Publisher>) -> Fut,
        Fut: std::future::Future<Output = Result<(), Cancelled>> + Send + 'static,
    {
        let (tx, view) = watch::channel(initial);
        let publisher = Arc::new(Publisher { tx, token: CancellationToken::new() });
        let fut = body(Arc::clone(&publisher));
        let task = tokio::spawn(async move {
            if fut.await.is_err() {
                debug!("playback cancelled");
            }
        });
        Self { transcript, publisher, view, task }
    }

    /// Borrows the latest view. Hold the guard only briefly: the session's
    /// task cannot publish while it is alive.
    pub fn view(&self) -> watch::Ref<'_, ChatView> {
        self.view.borrow()
    }

    /// Clones the latest view.
    pub fn snapshot(&self) -> ChatView {
        self.view.borrow().clone()
    }

    /// A receiver that is notified on every change of the view.
    pub fn subscribe(&self) -> watch::Receiver<ChatView> {
        self.view.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.publisher.token.is_cancelled()
    }

    /// Stops playback. Synchronous and idempotent; once this returns the
    /// messages and typing flags of this session never change again.
    pub fn cancel(&self) {
        self.publisher.seal();
        self.task.abort();
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Loops the full transcript until cancelled.
async fn run_script(
    publisher: Arc<Publisher>,
    transcript: Arc<Transcript>,
    pacing: Pacing,
    mut rng: StdRng,
) -> Result<(), Cancelled> {
    loop {
        publisher.publish(|view| {
            view.messages.clear();
            view.bot_typing = false;
            view.user_typing = false;
            view.phase = Phase::Idle;
            view.pass += 1;
        })?;

        for (cursor, message) in transcript.iter().enumerate() {
            reveal(&publisher, message, &pacing, &mut rng).await?;
            if let Some(pause) = pacing.read_pause(message, transcript.get(cursor + 1)) {
                publisher.pause(pause).await?;
            }
        }

        publisher.publish(|view| view.phase = Phase::EndPause)?;
        publisher.pause(pacing.end_pause).await?;
        debug!("looping scripted playback");
    }
}

/// Shows the typing indicator for `message`, waits, then reveals it.
async fn reveal(
    publisher: &Publisher,
    message: &Message,
    pacing: &Pacing,
    rng: &mut StdRng,
) -> Result<(), Cancelled> {
    let sender = message.sender;
    publisher.publish(|view| {
        match sender {
            Sender::Bot => view.bot_typing = true,
            Sender::User => view.user_typing = true,
        }
        view.phase = Phase::Typing(sender);
    })?;

    publisher.pause(pacing.thinking_delay(sender, rng)).await?;

    publisher.publish(|view| {
        view.bot_typing = false;
        view.user_typing = false;
        view.messages.push(message.clone());
        view.phase = Phase::Revealed(sender);
    })
}

/// Reveals the visitor's message at once, then the guide's canned answer.
async fn run_reply(
    publisher: Arc<Publisher>,
    text: String,
    reply: String,
    pacing: Pacing,
    mut rng: StdRng,
) -> Result<(), Cancelled> {
    publisher.publish(|view| view.messages.push(Message::user(text)))?;
    reveal(&publisher, &Message::bot(reply), &pacing, &mut rng).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn scenario() -> Arc<Transcript> {
        Arc::new(
            Transcript::new(vec![
                Message::bot("Hey. I'm Bob."),
                Message::bot("I'm a survivor too."),
                Message::user("I just got diagnosed yesterday..."),
            ])
            .unwrap(),
        )
    }

    /// Records every observed view until `done` returns true.
    async fn record(
        session: &ChatSession,
        done: impl Fn(&ChatView) -> bool,
    ) -> Vec<(Instant, ChatView)> {
        let mut rx = session.subscribe();
        let mut trace = vec![(Instant::now(), rx.borrow_and_update().clone())];
        loop {
            rx.changed().await.expect("session dropped its sender");
            let view = rx.borrow_and_update().clone();
            let stop = done(&view);
            trace.push((Instant::now(), view));
            if stop {
                return trace;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn follows_the_typing_then_reveal_sequence() {
        let mut player = ConversationPlayer::seeded(Pacing::default(), 1);
        let session = player.start(scenario());

        let trace = record(&session, |v| v.phase == Phase::EndPause).await;
        let phases: Vec<Phase> = trace.iter().map(|(_, v)| v.phase).collect();
        // Changes with no pause between them coalesce for the observer: the
        // pass reset with the first typing indicator, the last reveal with
        // the end pause.
        assert_eq!(
            phases,
            vec![
                Phase::Idle,
                Phase::Typing(Sender::Bot),
                Phase::Revealed(Sender::Bot),
                Phase::Typing(Sender::Bot),
                Phase::Revealed(Sender::Bot),
                Phase::Typing(Sender::User),
                Phase::EndPause,
            ]
        );

        for (_, view) in &trace {
            match view.phase {
                Phase::Typing(Sender::Bot) => assert!(view.bot_typing && !view.user_typing),
                Phase::Typing(Sender::User) => assert!(view.user_typing && !view.bot_typing),
                _ => assert!(!view.is_typing()),
            }
        }

        let lens: Vec<usize> = trace.iter().map(|(_, v)| v.messages.len()).collect();
        assert_eq!(lens, vec![0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(trace.last().unwrap().1.messages, scenario().messages());
    }

    #[tokio::test(start_paused = true)]
    async fn pacing_follows_speaker_changes() {
        let pacing = Pacing::default();
        let mut player = ConversationPlayer::seeded(pacing.clone(), 2);
        let session = player.start(scenario());

        let trace = record(&session, |v| v.phase == Phase::EndPause).await;
        let at = |i: usize| trace[i].0;
        let tolerance = Duration::from_millis(2);

        let first_bot = at(2) - at(1);
        let second_bot = at(4) - at(3);
        let user = at(6) - at(5);
        for bot in [first_bot, second_bot] {
            assert!(bot >= pacing.bot_delay.start && bot < pacing.bot_delay.end + tolerance, "{bot:?}");
        }
        assert!(user >= pacing.user_delay.start && user < pacing.user_delay.end + tolerance, "{user:?}");
        assert!(user > first_bot && user > second_bot);

        // Bot followed by bot reads as one breath; bot followed by user does not.
        let burst = at(3) - at(2);
        let turn = at(5) - at(4);
        assert!(burst >= pacing.burst_pause && burst < pacing.burst_pause + tolerance);
        assert!(turn >= pacing.turn_pause && turn < pacing.turn_pause + tolerance);
        assert_eq!(trace[6].1.messages.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn reveals_grow_monotonically_and_typing_is_exclusive() {
        let mut player = ConversationPlayer::seeded(Pacing::default(), 3);
        let transcript = Arc::new(
            Transcript::new(vec![
                Message::bot("a"),
                Message::user("b"),
                Message::user("c"),
                Message::bot("d"),
                Message::bot("e"),
                Message::user("f"),
            ])
            .unwrap(),
        );
        let session = player.start(Arc::clone(&transcript));

        let trace = record(&session, |v| v.phase == Phase::EndPause).await;
        let mut last_len = 0;
        for (_, view) in &trace {
            assert!(!(view.bot_typing && view.user_typing));
            assert!(view.messages.len() >= last_len);
            assert_eq!(view.messages[..], transcript.messages()[..view.messages.len()]);
            last_len = view.messages.len();
        }
        assert_eq!(last_len, transcript.len());
    }

    #[tokio::test(start_paused = true)]
    async fn loops_forever_with_identical_passes() {
        let pacing = Pacing::default();
        let mut player = ConversationPlayer::seeded(pacing.clone(), 4);
        let session = player.start(scenario());
        let full = scenario().len();

        let trace = record(&session, |v| v.pass == 3 && v.messages.len() == 1).await;

        let completed: Vec<&ChatView> = trace
            .iter()
            .map(|(_, v)| v)
            .filter(|v| v.phase == Phase::EndPause)
            .collect();
        assert_eq!(completed.len(), 2);
        assert_eq!(completed[0].messages, completed[1].messages);
        assert_eq!(completed[0].messages, scenario().messages());

        // After each end pause the next pass starts from an empty history.
        for (i, (at, view)) in trace.iter().enumerate() {
            if view.phase == Phase::EndPause {
                let (next_at, next) = &trace[i + 1];
                assert!(next.messages.is_empty());
                assert_eq!(next.pass, view.pass + 1);
                assert!(*next_at - *at >= pacing.end_pause);
            }
            assert!(view.messages.len() <= full);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_freezes_the_view() {
        let mut player = ConversationPlayer::seeded(Pacing::default(), 5);
        let session = player.start(scenario());

        // Cancel while the second typing indicator (and its timer) is pending.
        record(&session, |v| v.phase == Phase::Typing(Sender::Bot) && v.messages.len() == 1).await;
        session.cancel();
        assert!(session.is_cancelled());

        let mut rx = session.subscribe();
        let frozen = rx.borrow_and_update().clone();
        assert_eq!(frozen.phase, Phase::Cancelled);
        assert!(frozen.bot_typing);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!rx.has_changed().unwrap());
        let after = session.snapshot();
        assert_eq!(after.messages, frozen.messages);
        assert_eq!((after.bot_typing, after.user_typing), (frozen.bot_typing, frozen.user_typing));

        // Idempotent.
        session.cancel();
        assert_eq!(session.snapshot().messages, frozen.messages);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_first_poll_publishes_nothing() {
        let mut player = ConversationPlayer::seeded(Pacing::default(), 6);
        let session = player.start(scenario());
        session.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        let view = session.snapshot();
        assert_eq!(view.pass, 0);
        assert!(view.messages.is_empty());
        assert!(!view.is_typing());
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_a_session_leaves_the_old_one_untouched() {
        let mut player = ConversationPlayer::seeded(Pacing::default(), 7);
        let first = player.start(scenario());
        record(&first, |v| v.messages.len() == 2).await;

        let second = player.restart(&first);
        let old = first.snapshot();
        let trace = record(&second, |v| v.messages.len() == 1).await;
        assert!(trace.iter().all(|(_, v)| v.messages.len() <= 1));
        assert_eq!(first.snapshot().messages, old.messages);
        assert_eq!(first.snapshot().messages.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_session_stops_playback() {
        let mut player = ConversationPlayer::seeded(Pacing::default(), 8);
        let session = player.start(scenario());
        let mut rx = session.subscribe();
        drop(session);
        rx.borrow_and_update();
        tokio::time::sleep(Duration::from_secs(30)).await;
        // Only the seal landed; the aborted task never published.
        let view = rx.borrow().clone();
        assert!(view.messages.is_empty());
        assert_eq!(view.phase, Phase::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_appends_visitor_message_and_canned_answer() {
        let pacing = Pacing::default();
        let mut player = ConversationPlayer::seeded(pacing.clone(), 9);
        let script = player.start(scenario());
        record(&script, |v| v.messages.len() == 1).await;

        assert!(player.reply(&script, "   ", "unused").is_none());
        assert!(!script.is_cancelled());

        let reply = player
            .reply(&script, "I need help", "Thank you for sharing. You're not alone.")
            .unwrap();
        assert!(script.is_cancelled());

        let trace = record(&reply, |v| v.phase == Phase::Revealed(Sender::Bot)).await;
        let last = &trace.last().unwrap().1;
        assert_eq!(
            last.messages,
            vec![
                Message::bot("Hey. I'm Bob."),
                Message::user("I need help"),
                Message::bot("Thank you for sharing. You're not alone."),
            ]
        );
        assert!(!last.is_typing());

        // Stays put afterwards instead of looping.
        tokio::time::sleep(pacing.end_pause * 3).await;
        assert_eq!(reply.snapshot().messages, last.messages);
    }
}
