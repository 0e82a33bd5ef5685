//! Session manager: the chat store, the active session pointer, the composer
//! and the sidebar search.
//!
//! Every operation is a synchronous state transition. The two delayed
//! operations (assistant reply, prompt refresh) are split in two halves:
//! the first half returns what the caller needs to schedule the delay, the
//! second half is applied when the delay elapses. Replies are routed back by
//! session id, so a reply always lands in the session that asked for it even
//! if another session is active by then.
//!
//! ## Composer lifecycle
//!
//! ```text
//! Idle --send_message--> Sending --complete_reply--> Idle
//! ```
//!
//! A send while `Sending` is rejected.

use tracing::{debug, info};

use crate::attachment::{self, Attachment, ImageFile};
use crate::prompts;
use crate::session::{IdSeq, Message, MessageId, Session, SessionId};

/// Pending input for the next message.
#[derive(Debug, Default, Clone)]
pub struct Composer {
    draft: String,
    attachment: Option<Attachment>,
    busy: bool,
}

impl Composer {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Draft length in characters (what the counter shows).
    pub fn draft_len(&self) -> usize {
        self.draft.chars().count()
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// True when a send would be accepted.
    pub fn can_send(&self) -> bool {
        !self.busy && (!self.draft.trim().is_empty() || self.attachment.is_some())
    }

    fn reset_input(&mut self) {
        self.draft.clear();
        self.attachment = None;
    }
}

/// What the runtime needs to deliver a reply later.
#[derive(Debug, Clone)]
pub struct ReplyTicket {
    /// Session the reply belongs to.
    pub session_id: SessionId,
    /// Id of the user message that triggered the reply.
    pub message_id: MessageId,
    /// Session history at send time, oldest first.
    pub history: Vec<Message>,
}

/// Owner of all chat state.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Vec<Session>,
    active: Option<SessionId>,
    composer: Composer,
    search_query: String,
    sidebar_expanded: bool,
    refreshing: bool,
    session_ids: IdSeq,
    message_ids: IdSeq,
}

impl SessionManager {
    pub fn new(sidebar_expanded: bool) -> Self {
        Self {
            sidebar_expanded,
            ..Self::default()
        }
    }

    // ========================================================================
    // Chat store
    // ========================================================================

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active.and_then(|id| self.session(id))
    }

    /// Creates a session, makes it active and widens the sidebar.
    ///
    /// The composer starts empty for the new session.
    pub fn create_session(&mut self) -> SessionId {
        self.composer.reset_input();
        self.open_session()
    }

    /// Makes `id` the active session. Unknown ids are ignored.
    pub fn select_session(&mut self, id: SessionId) {
        if self.session(id).is_none() {
            debug!(session = %id, "select ignored: unknown session");
            return;
        }
        if self.active != Some(id) {
            self.composer.reset_input();
            self.active = Some(id);
        }
    }

    /// Starts a new session from a suggestion card and puts its text in the
    /// composer.
    pub fn start_from_prompt(&mut self, index: usize) -> Option<SessionId> {
        let card = prompts::card(index)?;
        let id = self.create_session();
        self.composer.draft = card.title.to_string();
        Some(id)
    }

    fn open_session(&mut self) -> SessionId {
        let id = SessionId(self.session_ids.next_raw());
        let title = Session::default_title(self.sessions.len() + 1);
        info!(session = %id, %title, "session created");
        self.sessions.push(Session::new(id, title));
        self.active = Some(id);
        self.sidebar_expanded = true;
        id
    }

    // ========================================================================
    // Search filter
    // ========================================================================

    /// Sessions whose title contains `query` (case-insensitive), in store order.
    pub fn filter_sessions(&self, query: &str) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.title_matches(query))
            .collect()
    }

    /// Sessions matching the current search query.
    pub fn visible_sessions(&self) -> Vec<&Session> {
        self.filter_sessions(&self.search_query)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    // ========================================================================
    // Sidebar / landing flags
    // ========================================================================

    pub fn is_sidebar_expanded(&self) -> bool {
        self.sidebar_expanded
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_expanded = !self.sidebar_expanded;
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Raises the refreshing flag. Returns false if a refresh is already running.
    pub fn refresh_prompts(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        true
    }

    pub fn finish_refresh(&mut self) {
        self.refreshing = false;
    }

    // ========================================================================
    // Composer
    // ========================================================================

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.composer.draft = text.into();
    }

    /// Attaches an image, replacing any previous one.
    ///
    /// Returns false (and leaves the composer untouched) for non-image input.
    pub fn attach_image(&mut self, bytes: &[u8], media_type: Option<&str>) -> bool {
        match attachment::decode_image(bytes, media_type) {
            Some(image) => {
                self.composer.attachment = Some(image);
                true
            }
            None => {
                debug!(?media_type, "attachment ignored: not an image");
                false
            }
        }
    }

    /// Attaches an image read from disk, remembering where it came from.
    pub fn attach_image_file(&mut self, file: &ImageFile) -> bool {
        let Some(image) = attachment::decode_image(&file.bytes, file.media_type.as_deref()) else {
            debug!(path = %file.path.display(), "attachment ignored: not an image");
            return false;
        };
        self.composer.attachment = Some(image.with_source(file.path.display().to_string()));
        true
    }

    pub fn clear_attachment(&mut self) {
        self.composer.attachment = None;
    }

    /// Sends the current draft.
    pub fn submit_draft(&mut self) -> Option<ReplyTicket> {
        let text = self.composer.draft.clone();
        self.send_message(&text)
    }

    /// Appends a user message (with the pending attachment) to the active
    /// session, creating one if none is active.
    ///
    /// Returns `None` without changing anything when there is nothing to send
    /// or a reply is still outstanding. Otherwise the composer is cleared,
    /// marked busy, and the returned ticket must eventually be answered with
    /// [`SessionManager::complete_reply`].
    pub fn send_message(&mut self, text: &str) -> Option<ReplyTicket> {
        if self.composer.busy {
            debug!("send ignored: reply outstanding");
            return None;
        }
        if text.trim().is_empty() && self.composer.attachment.is_none() {
            debug!("send ignored: empty message");
            return None;
        }

        let session_id = match self.active_session().map(|s| s.id) {
            Some(id) => id,
            None => self.open_session(),
        };

        self.composer.busy = true;
        let message_id = MessageId(self.message_ids.next_raw());
        let attachment = self.composer.attachment.take();
        let message = Message::user(message_id, text, attachment);
        self.composer.reset_input();

        let session = self.session_mut(session_id)?;
        session.push(message);
        info!(session = %session_id, message = message_id.0, "message sent");

        Some(ReplyTicket {
            session_id,
            message_id,
            history: session.messages().to_vec(),
        })
    }

    /// Appends the assistant reply to `session_id` and clears `busy`.
    ///
    /// A reply for a session that no longer exists is dropped. Returns whether
    /// the reply was appended.
    pub fn complete_reply(&mut self, session_id: SessionId, content: impl Into<String>) -> bool {
        self.composer.busy = false;
        let message_id = MessageId(self.message_ids.next_raw());
        let Some(session) = self.session_mut(session_id) else {
            debug!(session = %session_id, "reply dropped: unknown session");
            return false;
        };
        session.push(Message::assistant(message_id, content));
        true
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}
