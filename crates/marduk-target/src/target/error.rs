/// Misuse of a [`DrawTarget`](super::DrawTarget) API that does not apply to
/// its kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("the display surface has no attachable buffer")]
    NotOffscreen,

    #[error("the display surface is always vertically flipped")]
    FixedOrientation,
}
