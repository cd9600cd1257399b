use duet_core::Transcript;

use super::ScrollState;

/// State of the answer-service chat surface
///
/// The surface is mounted fresh every time it becomes active; remounting
/// resets the transcript, so answers to earlier requests are dropped.
#[derive(Debug, Default)]
pub struct AiChatState {
    pub transcript: Transcript,
    pub scroll: ScrollState,
}

impl AiChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remount(&mut self) {
        self.transcript.reset();
        self.scroll.reset();
    }

    /// Line count proxy used for auto-scroll: entries plus the typing indicator
    pub fn content_size(&self) -> usize {
        self.transcript.len() + usize::from(self.transcript.is_pending())
    }
}
