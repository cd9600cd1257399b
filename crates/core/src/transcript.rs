//! Append-only conversation transcript with a single-flight request guard.
//!
//! Both chat surfaces drive the same machine: `submit` appends the local entry
//! and hands back a [`Dispatch`] for the collaborator; the collaborator's
//! outcome comes back through [`Transcript::complete`] (or the direct
//! `on_reply_*` calls). While a request is pending every further submit is a
//! silent no-op, so replies are applied in the order requests were issued.

use chrono::{DateTime, Local};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::compose::Composer;

/// Text of the remote entry appended when a collaborator call fails
pub const FAILURE_MESSAGE: &str = "I encountered an error processing your message. Please try again.";

/// Transcript-local entry identifier, derived from creation time
///
/// Strictly increasing within one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    /// The person at this terminal
    Local,
    /// The answer service or a messaging peer
    Remote,
}

/// One message in a transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub author: Author,
    /// Plain text, rendered verbatim
    pub content: String,
    /// Source links, only on answers from the answer service
    pub citations: Option<Vec<String>>,
    pub timestamp: DateTime<Local>,
    /// Set on the synthetic entry appended for a failed exchange
    pub is_error: bool,
    /// Message id on the messaging network, when known
    pub remote_id: Option<String>,
    /// Local entry whose send was rejected; never bound to a network id
    pub send_failed: bool,
}

impl TranscriptEntry {
    pub fn is_local(&self) -> bool {
        self.author == Author::Local
    }

    pub fn is_remote(&self) -> bool {
        self.author == Author::Remote
    }

    pub fn has_citations(&self) -> bool {
        self.citations.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Display time (hour:minute)
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Identifies the request a reply belongs to
///
/// Tickets from before the last [`Transcript::reset`] are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
}

/// Work order produced by an accepted submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Trimmed text to hand to the collaborator
    pub text: String,
    pub ticket: Ticket,
}

/// Outcome of one outbound call
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Answer service replied
    Answer { content: String, citations: Vec<String> },
    /// Answer service failed; the fixed failure text is appended
    Failure,
    /// Messaging send completed with the given network id
    Acknowledged { remote_id: String },
    /// Messaging send failed; `message` is appended as a failure entry
    SendFailed { message: String },
}

/// A message observed from the messaging network (history or live stream)
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub remote_id: String,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

/// Append-only transcript plus the pending-request flag and compose buffer
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    pending: bool,
    epoch: u64,
    last_id: u64,
    composer: Composer,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// Whether the send control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.composer.is_blank()
    }

    /// Accept `text` as the next local message.
    ///
    /// Returns `None` without touching any state when `text` is blank or a
    /// request is already in flight. On success the local entry is appended,
    /// the compose buffer cleared and the pending flag raised; the caller then
    /// performs the outbound call with the returned [`Dispatch`].
    pub fn submit(&mut self, text: &str) -> Option<Dispatch> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.pending {
            return None;
        }

        let entry = self.new_entry(Author::Local, trimmed.to_string(), Local::now());
        self.entries.push(entry);
        self.composer.clear();
        self.pending = true;

        Some(Dispatch { text: trimmed.to_string(), ticket: Ticket { epoch: self.epoch } })
    }

    /// Submit whatever is in the compose buffer
    pub fn submit_compose(&mut self) -> Option<Dispatch> {
        let text = self.composer.text().to_string();
        self.submit(&text)
    }

    /// Append the collaborator's answer and release the pending flag
    pub fn on_reply_success(&mut self, content: impl Into<String>, citations: Option<Vec<String>>) {
        let mut entry = self.new_entry(Author::Remote, content.into(), Local::now());
        entry.citations = citations;
        self.entries.push(entry);
        self.pending = false;
    }

    /// Append the fixed failure entry and release the pending flag
    pub fn on_reply_failure(&mut self) {
        self.push_failure(FAILURE_MESSAGE.to_string());
    }

    /// A messaging send was rejected: mark the unsent local entry and append
    /// a failure entry with `message`
    pub fn on_send_failure(&mut self, message: impl Into<String>) {
        if let Some(entry) = self.unbound_local_entries().next() {
            entry.send_failed = true;
        }
        self.push_failure(message.into());
    }

    fn push_failure(&mut self, message: String) {
        let mut entry = self.new_entry(Author::Remote, message, Local::now());
        entry.is_error = true;
        self.entries.push(entry);
        self.pending = false;
    }

    /// A messaging send went through: bind its network id, release the flag
    pub fn on_send_acknowledged(&mut self, remote_id: impl Into<String>) {
        let remote_id = remote_id.into();
        if !self.knows_remote_id(&remote_id)
            && let Some(entry) = self.unbound_local_entries().next()
        {
            entry.remote_id = Some(remote_id);
        }
        self.pending = false;
    }

    /// Apply `reply` if `ticket` is current and a request is in flight.
    ///
    /// Returns false (and changes nothing) for stale or unexpected replies.
    pub fn complete(&mut self, ticket: Ticket, reply: Reply) -> bool {
        if ticket.epoch != self.epoch || !self.pending {
            tracing::debug!(epoch = ticket.epoch, current = self.epoch, "dropping stale reply");
            return false;
        }

        match reply {
            Reply::Answer { content, citations } => self.on_reply_success(content, Some(citations)),
            Reply::Failure => self.on_reply_failure(),
            Reply::Acknowledged { remote_id } => self.on_send_acknowledged(remote_id),
            Reply::SendFailed { message } => self.on_send_failure(message),
        }
        true
    }

    /// Append a message seen on the messaging network.
    ///
    /// Messages already present (by network id) are skipped. A locally
    /// authored message that echoes an optimistic local entry binds to it
    /// instead of being appended twice. Returns whether an entry was added.
    pub fn ingest(&mut self, message: IncomingMessage) -> bool {
        if self.knows_remote_id(&message.remote_id) {
            return false;
        }

        if message.author == Author::Local
            && let Some(entry) = self.unbound_local_entries().find(|e| e.content == message.content)
        {
            entry.remote_id = Some(message.remote_id);
            return false;
        }

        let mut entry = self.new_entry(message.author, message.content, message.timestamp);
        entry.remote_id = Some(message.remote_id);
        self.entries.push(entry);
        true
    }

    /// Drop every entry and release the pending flag.
    ///
    /// Replies to requests issued before the reset are ignored by [`complete`](Self::complete).
    pub fn reset(&mut self) {
        self.entries.clear();
        self.pending = false;
        self.epoch += 1;
        self.composer.clear();
    }

    /// Local entries still waiting for a network id, newest first
    fn unbound_local_entries(&mut self) -> impl Iterator<Item = &mut TranscriptEntry> {
        self.entries.iter_mut().rev().filter(|e| e.is_local() && e.remote_id.is_none() && !e.send_failed)
    }

    fn knows_remote_id(&self, remote_id: &str) -> bool {
        self.entries.iter().any(|e| e.remote_id.as_deref() == Some(remote_id))
    }

    fn next_id(&mut self) -> EntryId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_id = now.max(self.last_id + 1);
        EntryId(self.last_id)
    }

    fn new_entry(&mut self, author: Author, content: String, timestamp: DateTime<Local>) -> TranscriptEntry {
        TranscriptEntry {
            id: self.next_id(),
            author,
            content,
            citations: None,
            timestamp,
            is_error: false,
            remote_id: None,
            send_failed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incoming(id: &str, author: Author, content: &str) -> IncomingMessage {
        IncomingMessage { remote_id: id.to_string(), author, content: content.to_string(), timestamp: Local::now() }
    }

    #[test]
    fn test_new_transcript_is_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert!(!transcript.is_pending());
        assert!(transcript.last().is_none());
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut transcript = Transcript::new();
        for text in ["", "   ", "\n\t  \n"] {
            assert!(transcript.submit(text).is_none());
        }
        assert!(transcript.is_empty());
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_submit_appends_trimmed_local_entry() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("  Hello  ").unwrap();

        assert_eq!(dispatch.text, "Hello");
        assert!(transcript.is_pending());
        let last = transcript.last().unwrap();
        assert_eq!(last.author, Author::Local);
        assert_eq!(last.content, "Hello");
        assert!(last.citations.is_none());
        assert!(!last.is_error);
    }

    #[test]
    fn test_submit_keeps_inner_newlines() {
        let mut transcript = Transcript::new();
        transcript.submit("line one\nline two\n").unwrap();
        assert_eq!(transcript.last().unwrap().content, "line one\nline two");
    }

    #[test]
    fn test_submit_while_pending_is_noop() {
        let mut transcript = Transcript::new();
        transcript.submit("first").unwrap();
        assert!(transcript.submit("second").is_none());
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().content, "first");
    }

    #[test]
    fn test_reply_success_scenario() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("Hello").unwrap();

        let applied = transcript.complete(
            dispatch.ticket,
            Reply::Answer { content: "Hi there".to_string(), citations: vec!["https://example.com".to_string()] },
        );

        assert!(applied);
        assert!(!transcript.is_pending());
        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].author, entries[0].content.as_str()), (Author::Local, "Hello"));
        assert_eq!((entries[1].author, entries[1].content.as_str()), (Author::Remote, "Hi there"));
        assert_eq!(entries[1].citations, Some(vec!["https://example.com".to_string()]));
        assert!(entries[1].has_citations());
    }

    #[test]
    fn test_on_reply_success_without_citations() {
        let mut transcript = Transcript::new();
        transcript.submit("Hello").unwrap();
        transcript.on_reply_success("Hi", None);

        let last = transcript.last().unwrap();
        assert!(last.is_remote());
        assert!(last.citations.is_none());
        assert!(!last.has_citations());
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_reply_failure_appends_fixed_text() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("Hello").unwrap();
        assert!(transcript.complete(dispatch.ticket, Reply::Failure));

        let last = transcript.last().unwrap();
        assert_eq!(last.author, Author::Remote);
        assert_eq!(last.content, FAILURE_MESSAGE);
        assert!(last.citations.is_none());
        assert!(last.is_error);
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_submit_allowed_again_after_resolution() {
        let mut transcript = Transcript::new();
        transcript.submit("one").unwrap();
        transcript.on_reply_failure();
        assert!(transcript.submit("two").is_some());
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut transcript = Transcript::new();
        transcript.submit("Hello").unwrap();
        transcript.composer_mut().set_text("draft");

        transcript.reset();
        assert!(transcript.is_empty());
        assert!(!transcript.is_pending());
        assert!(transcript.composer().is_empty());
    }

    #[test]
    fn test_stale_ticket_is_dropped_after_reset() {
        let mut transcript = Transcript::new();
        let stale = transcript.submit("old conversation").unwrap();
        transcript.reset();

        let fresh = transcript.submit("new conversation").unwrap();
        let applied =
            transcript.complete(stale.ticket, Reply::Answer { content: "late".to_string(), citations: vec![] });

        assert!(!applied);
        assert_eq!(transcript.len(), 1);
        assert!(transcript.is_pending());

        assert!(transcript.complete(fresh.ticket, Reply::Failure));
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_complete_without_pending_is_dropped() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("Hello").unwrap();
        assert!(transcript.complete(dispatch.ticket, Reply::Failure));
        assert!(!transcript.complete(dispatch.ticket, Reply::Failure));
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn test_submit_compose_clears_buffer_only_on_accept() {
        let mut transcript = Transcript::new();
        transcript.composer_mut().set_text("   ");
        assert!(transcript.submit_compose().is_none());
        assert_eq!(transcript.composer().text(), "   ");

        transcript.composer_mut().set_text(" hi ");
        let dispatch = transcript.submit_compose().unwrap();
        assert_eq!(dispatch.text, "hi");
        assert!(transcript.composer().is_empty());

        transcript.composer_mut().set_text("while pending");
        assert!(transcript.submit_compose().is_none());
        assert_eq!(transcript.composer().text(), "while pending");
    }

    #[test]
    fn test_can_submit() {
        let mut transcript = Transcript::new();
        assert!(!transcript.can_submit());
        transcript.composer_mut().set_text("x");
        assert!(transcript.can_submit());
        transcript.submit_compose().unwrap();
        transcript.composer_mut().set_text("y");
        assert!(!transcript.can_submit());
    }

    #[test]
    fn test_entry_ids_strictly_increase() {
        let mut transcript = Transcript::new();
        for i in 0..20 {
            transcript.submit(&format!("message {}", i)).unwrap();
            transcript.on_reply_success("ok", None);
        }

        let ids: Vec<EntryId> = transcript.entries().iter().map(|e| e.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_entries_are_append_only() {
        let mut transcript = Transcript::new();
        transcript.submit("a").unwrap();
        let first = transcript.entries()[0].clone();
        transcript.on_reply_success("b", None);
        transcript.submit("c").unwrap();

        assert_eq!(transcript.entries()[0], first);
        assert_eq!(transcript.last().unwrap().content, "c");
    }

    #[test]
    fn test_send_acknowledged_binds_remote_id() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("gm").unwrap();
        assert!(transcript.complete(dispatch.ticket, Reply::Acknowledged { remote_id: "m1".to_string() }));

        assert_eq!(transcript.len(), 1);
        assert!(!transcript.is_pending());
        assert_eq!(transcript.last().unwrap().remote_id.as_deref(), Some("m1"));
    }

    #[test]
    fn test_send_failed_appends_error_entry() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("gm").unwrap();
        transcript.complete(dispatch.ticket, Reply::SendFailed { message: "network down".to_string() });

        let last = transcript.last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.content, "network down");
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_failed_send_is_not_bound_to_later_echo() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("hi").unwrap();
        transcript.complete(dispatch.ticket, Reply::SendFailed { message: "network down".to_string() });
        assert!(transcript.entries()[0].send_failed);

        assert!(transcript.ingest(incoming("m9", Author::Local, "hi")));
        assert_eq!(transcript.len(), 3);
        assert!(transcript.entries()[0].remote_id.is_none());
        assert_eq!(transcript.last().unwrap().remote_id.as_deref(), Some("m9"));
    }

    #[test]
    fn test_ack_after_failed_send_binds_newer_entry() {
        let mut transcript = Transcript::new();
        let failed = transcript.submit("first").unwrap();
        transcript.complete(failed.ticket, Reply::SendFailed { message: "network down".to_string() });

        let dispatch = transcript.submit("second").unwrap();
        transcript.complete(dispatch.ticket, Reply::Acknowledged { remote_id: "m2".to_string() });

        assert!(transcript.entries()[0].remote_id.is_none());
        assert_eq!(transcript.entries()[2].remote_id.as_deref(), Some("m2"));
    }

    #[test]
    fn test_reply_failure_leaves_question_unmarked() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("why?").unwrap();
        transcript.complete(dispatch.ticket, Reply::Failure);
        assert!(!transcript.entries()[0].send_failed);
    }

    #[test]
    fn test_ingest_remote_message() {
        let mut transcript = Transcript::new();
        assert!(transcript.ingest(incoming("m1", Author::Remote, "hello from peer")));
        assert!(!transcript.ingest(incoming("m1", Author::Remote, "hello from peer")));

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().remote_id.as_deref(), Some("m1"));
    }

    #[test]
    fn test_stream_echo_before_ack_binds_local_entry() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("gm").unwrap();

        assert!(!transcript.ingest(incoming("m1", Author::Local, "gm")));
        assert_eq!(transcript.len(), 1);
        assert!(transcript.is_pending());

        transcript.complete(dispatch.ticket, Reply::Acknowledged { remote_id: "m1".to_string() });
        assert_eq!(transcript.len(), 1);
        assert!(!transcript.is_pending());
    }

    #[test]
    fn test_stream_echo_after_ack_is_skipped() {
        let mut transcript = Transcript::new();
        let dispatch = transcript.submit("gm").unwrap();
        transcript.complete(dispatch.ticket, Reply::Acknowledged { remote_id: "m1".to_string() });

        assert!(!transcript.ingest(incoming("m1", Author::Local, "gm")));
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_ingest_local_message_from_other_device_appends() {
        let mut transcript = Transcript::new();
        assert!(transcript.ingest(incoming("m9", Author::Local, "sent elsewhere")));
        assert_eq!(transcript.last().unwrap().author, Author::Local);
    }

    #[test]
    fn test_time_label_format() {
        let mut transcript = Transcript::new();
        let timestamp = Local::now();
        transcript.ingest(IncomingMessage {
            remote_id: "m1".to_string(),
            author: Author::Remote,
            content: "hi".to_string(),
            timestamp,
        });
        assert_eq!(transcript.last().unwrap().time_label(), timestamp.format("%H:%M").to_string());
    }
}
