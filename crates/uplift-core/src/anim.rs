/// Animation curve token carried by keyboard events and passed through to
/// the rendering collaborator unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationCurve {
    #[default]
    EaseInOut,
    EaseIn,
    EaseOut,
    Linear,
}
