/// Paint layer of a draw item. Higher layers paint over lower ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Committed scene elements.
    pub const SCENE: ZIndex = ZIndex(0);
    /// Strokes still being drawn.
    pub const LIVE_STROKE: ZIndex = ZIndex(10);
    /// Elements picked up by a manipulation tool.
    pub const MANIPULATED: ZIndex = ZIndex(20);
    /// Manipulation overlay: glow, outline, rotation bar, handles.
    pub const TOOL_GLOW: ZIndex = ZIndex(30);
    pub const TOOL_OUTLINE: ZIndex = ZIndex(31);
    pub const TOOL_ROTATION_BAR: ZIndex = ZIndex(32);
    pub const TOOL_HANDLES: ZIndex = ZIndex(33);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    /// True for the manipulation overlay layers.
    #[inline]
    pub fn is_tool_overlay(self) -> bool {
        self >= Self::TOOL_GLOW
    }
}

/// Paint-order key: layer first, then recording order within the layer.
///
/// Field order matters: the derived `Ord` compares `z` before `order`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}
