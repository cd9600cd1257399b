pub mod compose;
pub mod config;
pub mod error;
pub mod logging;
pub mod transcript;

pub use compose::Composer;
pub use config::{AnswerConfig, AnswerProviderConfig, Config, MessagingBackend, MessagingConfig};
pub use error::{Error, Result};
pub use transcript::{
    Author, Dispatch, EntryId, FAILURE_MESSAGE, IncomingMessage, Reply, Ticket, Transcript, TranscriptEntry,
};
