//! Application messages for the Elm-style update loop.
//!
//! Each variant represents an event that can update the application state.

use std::path::PathBuf;
use iced::widget::image;
use iced::widget::scrollable::Viewport;
use iced::keyboard::{Key, Modifiers};

use crate::api::User;
use crate::export::ExportRequest;
use crate::model::{Dataset, StructuralPath};
use crate::navigation::Ticket;

/// Messages that can be sent to update the app
#[derive(Debug, Clone)]
pub enum Message {
    /// Result of `GET /auth/me`
    SessionChecked(Result<Option<User>, String>),
    /// Session cookie field on the login screen
    SessionInputChanged(String),
    SubmitSession,
    /// Open the OAuth login page in the system browser
    OpenLogin,
    Logout,
    LoggedOut,
    AvatarLoaded(Option<image::Handle>),
    DatasetLoaded(Result<Dataset, String>),
    /// Reload the dataset from the server
    Refresh,
    SelectCollection(String),
    SearchQueryChanged(String),
    ClearSearch,
    FocusSearch,
    /// Expand or collapse the node at this path
    TogglePath(StructuralPath),
    ExpandDocument(String, usize),
    CollapseDocument(String, usize),
    /// Put text on the clipboard, verbatim
    CopyText(String),
    /// Copy a document as pretty-printed JSON
    CopyDocument(String, usize),
    /// Search result clicked: (collection, document id)
    GoToDocument(String, String),
    /// Scroll timer for a jump fired
    ScrollDue(Ticket),
    /// Highlight timer for a jump fired
    ClearHighlightDue(Ticket),
    ResolveName(String),
    NameResolved(String, Result<String, String>),
    ToggleExportMenu,
    Export(ExportRequest),
    ExportFinished(Result<Option<PathBuf>, String>),
    Scrolled(Viewport),
    /// Keyboard events - Key and Modifiers tell us what was pressed
    KeyPressed(Key, Modifiers),
    /// Toggle between dark and light theme
    ToggleTheme,
}

/// Where name resolution stands for one id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolveState {
    #[default]
    Idle,
    Loading,
    Resolved(String),
    Failed(String),
}

impl ResolveState {
    pub fn from_result(result: Result<String, String>) -> Self {
        match result {
            Ok(name) => ResolveState::Resolved(name),
            Err(message) => ResolveState::Failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_start_idle() {
        assert_eq!(ResolveState::default(), ResolveState::Idle);
    }

    #[test]
    fn test_resolve_state_from_result() {
        assert_eq!(
            ResolveState::from_result(Ok("Ada".to_string())),
            ResolveState::Resolved("Ada".to_string())
        );
        assert_eq!(
            ResolveState::from_result(Err("Unknown user".to_string())),
            ResolveState::Failed("Unknown user".to_string())
        );
    }
}
