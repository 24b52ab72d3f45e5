//! Commands for the Note context.
//!
//! Commands are plain data values handed in by the excluded transport
//! layer; `owner_id` is always the verified identity supplied by the
//! excluded authentication layer.

use memo_core::command::Command;
use uuid::Uuid;

/// Command to create a new note.
#[derive(Debug, Clone)]
pub struct CreateNote {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The verified owner of the new note.
    pub owner_id: Uuid,
    /// The initial title.
    pub title: String,
    /// The initial content.
    pub content: String,
    /// The initial tags.
    pub tags: Vec<String>,
}

impl Command for CreateNote {
    fn command_type(&self) -> &'static str {
        "note.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Command to change a note's title.
#[derive(Debug, Clone)]
pub struct ChangeNoteTitle {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The verified caller identity.
    pub owner_id: Uuid,
    /// The note to change.
    pub note_id: Uuid,
    /// The new title.
    pub title: String,
}

impl Command for ChangeNoteTitle {
    fn command_type(&self) -> &'static str {
        "note.change_title"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Command to change a note's content.
#[derive(Debug, Clone)]
pub struct ChangeNoteContent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The verified caller identity.
    pub owner_id: Uuid,
    /// The note to change.
    pub note_id: Uuid,
    /// The new content.
    pub content: String,
}

impl Command for ChangeNoteContent {
    fn command_type(&self) -> &'static str {
        "note.change_content"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Command to replace a note's tag set.
#[derive(Debug, Clone)]
pub struct ChangeNoteTags {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The verified caller identity.
    pub owner_id: Uuid,
    /// The note to change.
    pub note_id: Uuid,
    /// The full replacement tag set.
    pub tags: Vec<String>,
}

impl Command for ChangeNoteTags {
    fn command_type(&self) -> &'static str {
        "note.change_tags"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Command to logically delete a note.
#[derive(Debug, Clone)]
pub struct DeleteNote {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The verified caller identity.
    pub owner_id: Uuid,
    /// The note to delete.
    pub note_id: Uuid,
}

impl Command for DeleteNote {
    fn command_type(&self) -> &'static str {
        "note.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}
