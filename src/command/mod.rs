mod commands;
mod history;

use thiserror::Error;

use crate::id_generator::ObjectId;

pub use commands::{Command, array_move};
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT};

/// `Ok(true)` when the object list changed, `Ok(false)` for a harmless no-op.
pub type CommandResult = Result<bool, CommandError>;

/// Commands refused because they would break an invariant of the object list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("an object with id {0} already exists")]
    DuplicateId(ObjectId),
    #[error("the scene already has a template")]
    SecondTemplate,
    #[error("layer index {index} out of range for {len} objects")]
    OutOfRange { index: usize, len: usize },
    #[error("the template stays at the bottom of the stack")]
    TemplatePinned,
}
