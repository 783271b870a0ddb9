mod editor_state;
mod persistence;

pub use editor_state::{EditorState, ToolMode, TransitionError};
pub use persistence::{
    DESIGN_VERSION,
    DesignDocument,
    PersistenceResult,
    load_design,
    save_design,
};
