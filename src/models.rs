mod ids;
mod kind;
mod note;
mod priority;
mod status;

pub use ids::{NoteId, UserId};
pub use kind::NoteKind;
pub use note::{Note, NoteBuilder};
pub use priority::Priority;
pub use status::NoteStatus;
