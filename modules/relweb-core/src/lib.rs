//! Story gallery core.
//!
//! Curates the gallery order, runs the optimistic like protocol against a
//! remote record store, and validates the site's forms. Storage, notices and
//! bot verification are collaborators behind the traits in [`traits`].

pub mod curator;
pub mod forms;
pub mod likes;
pub mod memory;
pub mod persist;
pub mod seed;
pub mod stories;
pub mod traits;

pub use curator::{filter_by_category, organize};
pub use forms::{submit_contact, submit_remix, submit_story, ContactForm, RemixForm, StoryForm};
pub use likes::{LikeToggle, PersistOutcome, StoryBoard};
pub use memory::{MemoryStore, NoticeBuffer};
pub use persist::{AllowAll, RecaptchaVerifier};
pub use stories::{load_board, load_stories};
pub use traits::{Notifier, RecordStore, Verdict, Verifier};
