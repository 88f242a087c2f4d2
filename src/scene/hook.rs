use crate::gls::Gls;
use crate::scene::{NodeKey, Scene};

/// What a hook may touch while it runs.
///
/// The hook's own node stays in the scene but its role reads as
/// [`NodeRole::Group`](super::NodeRole::Group) until the hook returns.
pub struct FrameContext<'a> {
    pub gls: &'a mut Gls,
    pub scene: &'a mut Scene,
    /// Node the running hook is attached to
    pub node: NodeKey,
}

/// Per-frame behaviour of a node that is neither a graphic nor a light
/// (audio emitters, animators, players...).
///
/// Runs once per frame after classification and before any draw, in
/// scene traversal order, unless its node became invisible first.
pub trait FrameHook {
    fn on_frame(&mut self, ctx: &mut FrameContext<'_>);
}

impl<F> FrameHook for F
where
    F: FnMut(&mut FrameContext<'_>),
{
    fn on_frame(&mut self, ctx: &mut FrameContext<'_>) {
        self(ctx);
    }
}
