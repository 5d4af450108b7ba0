//! Tooling & Integration Layer
//!
//! Adapters to programs outside the client, currently the user's text editor.

pub mod editor;

pub use editor::{CannedEditor, ExternalEditor, TextEditor};
