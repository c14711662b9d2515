/// Detail dialog state

use crate::reaction_data::VideoDetail;

/// Closed, or open showing one video. `open` and `close` are the only transitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open(VideoDetail),
}

impl DialogState {
    /// Opening while already open replaces the selection
    pub fn open(detail: VideoDetail) -> DialogState {
        DialogState::Open(detail)
    }

    pub fn close(&self) -> DialogState {
        DialogState::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DialogState::Open(_))
    }

    pub fn selected(&self) -> Option<&VideoDetail> {
        match self {
            DialogState::Open(detail) => Some(detail),
            DialogState::Closed => None,
        }
    }
}
