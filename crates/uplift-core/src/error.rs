use thiserror::Error;

/// Failure signals from toolbar navigation. All of these are recoverable;
/// focus stays where it was when an action fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("no field is focused")]
    NothingFocused,
    #[error("focused field is not part of the resolved order")]
    NotInOrder,
    #[error("already at the boundary of the navigation order")]
    AtBoundary,
    #[error("candidate field refused focus")]
    FocusRefused,
    #[error("focused field refused to give up focus")]
    ResignRefused,
}
