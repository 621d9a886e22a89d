//! Wrap-list layout math.
//!
//! Block modes lay items out in *blocks* along the major axis, with
//! `items_per_block` items side by side along the minor axis. Row-major and
//! column-major share one implementation: the mode only decides which screen
//! axis is minor.
//!
//! | mode         | minor axis   | major axis   | block  |
//! |--------------|--------------|--------------|--------|
//! | row-major    | horizontal   | vertical     | row    |
//! | column-major | vertical     | horizontal   | column |
//!
//! Spacing is applied before the first item and between items on both axes,
//! so an item's content origin along an axis is `space + k * (item + space)`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

/// How items are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Fill rows left to right, wrap downward.
    #[default]
    RowMajor,
    /// Fill columns top to bottom, wrap rightward.
    ColumnMajor,
    /// Place each index where a position model says.
    Manual,
}

impl LayoutMode {
    /// Whether this mode wraps items into blocks.
    pub fn is_block(self) -> bool {
        !matches!(self, Self::Manual)
    }

    /// Split a `(horizontal, vertical)` pair into `(minor, major)`.
    pub(crate) fn to_axes<T>(self, horizontal: T, vertical: T) -> (T, T) {
        match self {
            Self::ColumnMajor => (vertical, horizontal),
            Self::RowMajor | Self::Manual => (horizontal, vertical),
        }
    }

    /// Join a `(minor, major)` pair back into `(horizontal, vertical)`.
    pub(crate) fn from_axes<T>(self, minor: T, major: T) -> (T, T) {
        // The mapping is its own inverse.
        self.to_axes(minor, major)
    }
}

/// Gaps between items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Spacing {
    /// Vertical gap between rows.
    pub row: u32,
    /// Horizontal gap between columns.
    pub col: u32,
}

impl Spacing {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Scroll position of the viewport within the content, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScrollOffsets {
    pub x: u32,
    pub y: u32,
}

impl ScrollOffsets {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Clamp each axis so the viewport never extends past `content`.
    pub fn clamped(self, content: Size, viewport: Size) -> Self {
        Self {
            x: self.x.min(content.width.saturating_sub(viewport.width)),
            y: self.y.min(content.height.saturating_sub(viewport.height)),
        }
    }
}

/// Derived placement of the visible blocks, recomputed every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDescriptor {
    pub mode: LayoutMode,
    pub item_minor: u32,
    pub item_major: u32,
    pub space_minor: u32,
    pub space_major: u32,
    /// Items laid side by side along the minor axis. Never zero.
    pub items_per_block: usize,
    pub first_block: usize,
    pub last_block: usize,
}

impl LayoutDescriptor {
    /// Compute the descriptor for a block mode.
    ///
    /// Returns `None` for manual mode, a zero item size or an empty
    /// viewport; callers treat that as "nothing visible".
    pub fn compute(
        mode: LayoutMode,
        item: Size,
        spacing: Spacing,
        viewport: Size,
        scroll: ScrollOffsets,
    ) -> Option<Self> {
        if !mode.is_block() || item.is_empty() || viewport.is_empty() {
            return None;
        }

        let (size_minor, size_major) = mode.to_axes(viewport.width, viewport.height);
        let (item_minor, item_major) = mode.to_axes(item.width, item.height);
        let (space_minor, space_major) = mode.to_axes(spacing.col, spacing.row);
        let (_, scroll_major) = mode.to_axes(scroll.x, scroll.y);

        let minor_pitch = u64::from(item_minor) + u64::from(space_minor);
        let fit = u64::from(size_minor.saturating_sub(space_minor)) / minor_pitch;
        let items_per_block = usize::try_from(fit).unwrap_or(usize::MAX).max(1);

        let major_pitch = u64::from(item_major) + u64::from(space_major);
        let scroll_major = u64::from(scroll_major);
        let first_block = scroll_major / major_pitch;
        let last_block = (scroll_major + u64::from(size_major) - 1) / major_pitch;

        Some(Self {
            mode,
            item_minor,
            item_major,
            space_minor,
            space_major,
            items_per_block,
            first_block: usize::try_from(first_block).unwrap_or(usize::MAX),
            last_block: usize::try_from(last_block).unwrap_or(usize::MAX),
        })
    }

    /// Distance between the starts of consecutive blocks.
    pub fn block_pitch(&self) -> u32 {
        self.item_major.saturating_add(self.space_major)
    }

    /// Distance between the starts of consecutive items within a block.
    pub fn minor_pitch(&self) -> u32 {
        self.item_minor.saturating_add(self.space_minor)
    }

    /// Number of indices the visible blocks can hold.
    pub fn slot_count(&self) -> usize {
        (self.last_block - self.first_block + 1).saturating_mul(self.items_per_block)
    }

    /// Indices covered by the visible blocks, regardless of sequence length.
    pub fn window(&self) -> Range<usize> {
        let start = self.first_block.saturating_mul(self.items_per_block);
        start..start.saturating_add(self.slot_count())
    }

    /// Blocks needed to hold `len` items.
    pub fn block_count(&self, len: usize) -> usize {
        len.div_ceil(self.items_per_block)
    }

    /// Top-left corner of `index` in content coordinates.
    pub fn item_origin(&self, index: usize) -> Point {
        let block = (index / self.items_per_block) as i64;
        let within = (index % self.items_per_block) as i64;
        let minor = i64::from(self.space_minor) + within * i64::from(self.minor_pitch());
        let major = i64::from(self.space_major) + block * i64::from(self.block_pitch());
        let (x, y) = self.mode.from_axes(clamp_i32(minor), clamp_i32(major));
        Point::new(x, y)
    }

    /// Scrollable extent for `len` items in a viewport of `viewport`.
    ///
    /// The minor extent is the viewport's minor dimension; the major extent
    /// covers every block plus the trailing gap.
    pub fn content_size(&self, len: usize, viewport: Size) -> Size {
        let (viewport_minor, _) = self.mode.to_axes(viewport.width, viewport.height);
        let blocks = self.block_count(len) as u64;
        let major = if blocks == 0 {
            0
        } else {
            blocks * u64::from(self.block_pitch()) + u64::from(self.space_major)
        };
        let major = u32::try_from(major).unwrap_or(u32::MAX);
        let (width, height) = self.mode.from_axes(viewport_minor, major);
        Size::new(width, height)
    }

    /// Index whose item covers `point` (content coordinates).
    ///
    /// Points in the spacing between items hit nothing. The caller bounds
    /// the result by the sequence length.
    pub fn index_at(&self, point: Point) -> Option<usize> {
        let (minor, major) = self.mode.to_axes(point.x, point.y);
        let within = hit_axis(minor, self.space_minor, self.item_minor, self.minor_pitch())?;
        if within >= self.items_per_block {
            return None;
        }
        let block = hit_axis(major, self.space_major, self.item_major, self.block_pitch())?;
        block
            .checked_mul(self.items_per_block)
            .and_then(|start| start.checked_add(within))
    }

    /// Content-coordinate span `[start, end)` of `index` along the major axis.
    pub fn major_span(&self, index: usize) -> (u64, u64) {
        let block = (index / self.items_per_block) as u64;
        let start = u64::from(self.space_major) + block * u64::from(self.block_pitch());
        (start, start + u64::from(self.item_major))
    }
}

/// Snap a major-axis offset down to the nearest block boundary.
pub fn snap_to_block(offset: u32, pitch: u32) -> u32 {
    if pitch == 0 {
        offset
    } else {
        offset - offset % pitch
    }
}

/// Smallest change to `offset` that brings `[start, end)` inside a window of
/// `size` pixels.
pub(crate) fn reveal(offset: u32, size: u32, start: u64, end: u64) -> u32 {
    let offset64 = u64::from(offset);
    let target = if start < offset64 || end - start > u64::from(size) {
        start
    } else if end > offset64 + u64::from(size) {
        end - u64::from(size)
    } else {
        offset64
    };
    u32::try_from(target).unwrap_or(u32::MAX)
}

fn hit_axis(coord: i32, space: u32, item: u32, pitch: u32) -> Option<usize> {
    let offset = i64::from(coord) - i64::from(space);
    if offset < 0 || pitch == 0 {
        return None;
    }
    let slot = offset / i64::from(pitch);
    let inside = offset % i64::from(pitch);
    (inside < i64::from(item)).then(|| usize::try_from(slot).ok()).flatten()
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Manual-mode placement: which indices intersect the viewport, and how big
/// the content is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManualLayout {
    /// Visible indices in ascending order.
    pub visible: Vec<usize>,
    pub content: Size,
}

impl ManualLayout {
    /// Scan `count` positions, keeping those whose item rectangle meets the
    /// viewport.
    pub fn compute(
        count: usize,
        position: impl Fn(usize) -> Option<Point>,
        item: Size,
        viewport: Size,
        scroll: ScrollOffsets,
    ) -> Self {
        let view = Rect::new(
            clamp_i32(i64::from(scroll.x)),
            clamp_i32(i64::from(scroll.y)),
            viewport.width,
            viewport.height,
        );
        let mut visible = Vec::new();
        let (mut right, mut bottom) = (0i64, 0i64);

        for index in 0..count {
            let Some(origin) = position(index) else {
                continue;
            };
            let rect = Rect::from_origin_size(origin, item);
            right = right.max(rect.right());
            bottom = bottom.max(rect.bottom());
            if !item.is_empty() && !viewport.is_empty() && rect.intersects(&view) {
                visible.push(index);
            }
        }

        let to_extent = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
        Self {
            visible,
            content: Size::new(to_extent(right), to_extent(bottom)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(viewport: Size, scroll: ScrollOffsets) -> LayoutDescriptor {
        LayoutDescriptor::compute(
            LayoutMode::RowMajor,
            Size::new(100, 100),
            Spacing::default(),
            viewport,
            scroll,
        )
        .unwrap()
    }

    // -------------------------------------------------------------------------
    // Descriptor
    // -------------------------------------------------------------------------

    #[test]
    fn test_items_per_block_and_window() {
        let layout = grid(Size::new(1000, 500), ScrollOffsets::new(0, 300));
        assert_eq!(layout.items_per_block, 10);
        assert_eq!(layout.first_block, 3);
        assert_eq!(layout.last_block, 7);
        assert_eq!(layout.window(), 30..80);
        assert_eq!(layout.slot_count(), 50);
    }

    #[test]
    fn test_partial_block_is_visible() {
        let layout = grid(Size::new(1000, 500), ScrollOffsets::new(0, 350));
        assert_eq!(layout.first_block, 3);
        assert_eq!(layout.last_block, 8);
        assert_eq!(layout.window(), 30..90);
    }

    #[test]
    fn test_items_per_block_floors_at_one() {
        let layout = grid(Size::new(40, 500), ScrollOffsets::default());
        assert_eq!(layout.items_per_block, 1);
    }

    #[test]
    fn test_spacing_reduces_fit() {
        let layout = LayoutDescriptor::compute(
            LayoutMode::RowMajor,
            Size::new(100, 80),
            Spacing::new(20, 10),
            Size::new(450, 300),
            ScrollOffsets::default(),
        )
        .unwrap();
        // (450 - 10) / (100 + 10)
        assert_eq!(layout.items_per_block, 4);
        assert_eq!(layout.block_pitch(), 100);
        assert_eq!(layout.item_origin(5), Point::new(120, 120));
    }

    #[test]
    fn test_empty_inputs_yield_no_layout() {
        let compute = |mode, item, viewport| {
            LayoutDescriptor::compute(
                mode,
                item,
                Spacing::default(),
                viewport,
                ScrollOffsets::default(),
            )
        };
        assert!(compute(LayoutMode::RowMajor, Size::ZERO, Size::new(10, 10)).is_none());
        assert!(compute(LayoutMode::RowMajor, Size::new(10, 10), Size::new(10, 0)).is_none());
        assert!(compute(LayoutMode::Manual, Size::new(10, 10), Size::new(10, 10)).is_none());
    }

    #[test]
    fn test_column_major_swaps_axes() {
        let layout = LayoutDescriptor::compute(
            LayoutMode::ColumnMajor,
            Size::new(50, 100),
            Spacing::default(),
            Size::new(300, 500),
            ScrollOffsets::new(100, 0),
        )
        .unwrap();
        // Five items per column, columns 2..=7 visible.
        assert_eq!(layout.items_per_block, 5);
        assert_eq!(layout.first_block, 2);
        assert_eq!(layout.last_block, 7);
        assert_eq!(layout.item_origin(7), Point::new(50, 200));
        assert_eq!(layout.content_size(12, Size::new(300, 500)), Size::new(150, 500));
    }

    // -------------------------------------------------------------------------
    // Extent and hit testing
    // -------------------------------------------------------------------------

    #[test]
    fn test_content_size_counts_partial_blocks() {
        let layout = grid(Size::new(1000, 500), ScrollOffsets::default());
        assert_eq!(layout.content_size(100, Size::new(1000, 500)), Size::new(1000, 1000));
        assert_eq!(layout.content_size(91, Size::new(1000, 500)), Size::new(1000, 1000));
        assert_eq!(layout.content_size(0, Size::new(1000, 500)), Size::new(1000, 0));
    }

    #[test]
    fn test_index_at_skips_spacing() {
        let layout = LayoutDescriptor::compute(
            LayoutMode::RowMajor,
            Size::new(100, 100),
            Spacing::new(10, 10),
            Size::new(340, 300),
            ScrollOffsets::default(),
        )
        .unwrap();
        assert_eq!(layout.items_per_block, 3);
        assert_eq!(layout.index_at(Point::new(15, 15)), Some(0));
        assert_eq!(layout.index_at(Point::new(125, 15)), Some(1));
        assert_eq!(layout.index_at(Point::new(115, 15)), None);
        assert_eq!(layout.index_at(Point::new(15, 125)), Some(3));
        assert_eq!(layout.index_at(Point::new(5, 5)), None);
        assert_eq!(layout.index_at(Point::new(335, 15)), None);
    }

    #[test]
    fn test_snap_and_reveal() {
        assert_eq!(snap_to_block(250, 100), 200);
        assert_eq!(snap_to_block(250, 0), 250);

        // Already visible.
        assert_eq!(reveal(100, 300, 150, 250), 100);
        // Above the window.
        assert_eq!(reveal(100, 300, 20, 120), 20);
        // Below the window.
        assert_eq!(reveal(100, 300, 380, 480), 180);
    }

    #[test]
    fn test_scroll_offsets_clamped() {
        let offsets =
            ScrollOffsets::new(50, 900).clamped(Size::new(100, 1000), Size::new(100, 500));
        assert_eq!(offsets, ScrollOffsets::new(0, 500));
    }

    // -------------------------------------------------------------------------
    // Manual layout
    // -------------------------------------------------------------------------

    #[test]
    fn test_manual_layout_visibility_and_extent() {
        let points = [Point::new(0, 0), Point::new(500, 500), Point::new(90, 10)];
        let layout = ManualLayout::compute(
            points.len(),
            |i| points.get(i).copied(),
            Size::new(20, 20),
            Size::new(100, 100),
            ScrollOffsets::default(),
        );
        assert_eq!(layout.visible, vec![0, 2]);
        assert_eq!(layout.content, Size::new(520, 520));
    }
}
