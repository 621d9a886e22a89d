//! Thumbnail-with-caption items, the reference factory.
//!
//! Each item is a fixed-size cell: the image (or a placeholder box while the
//! thumbnail is not loaded) sits on top, aspect-fit and centered, with the
//! caption below it. An optional frame and drop shadow surround the image.
//!
//! ```text
//! +----------------------+
//! | border               |
//! |   +--------------+   |
//! |   |    image     |   |
//! |   +--------------+   |
//! |   caption spacing    |
//! |   [  caption...  ]   |
//! | border               |
//! +----------------------+
//! ```

use unicode_segmentation::UnicodeSegmentation;

use super::{ItemFactory, ItemState, ParentContext};
use crate::config::ItemConfig;
use crate::error::{WrapViewError, WrapViewResult};
use crate::geometry::{Point, Rect, Size};
use crate::model::ListModel;
use crate::view::ViewId;

/// Appended to captions that do not fit.
pub const ELLIPSIS: &str = "...";

/// How far the drop shadow is offset from the frame, in pixels.
const SHADOW_OFFSET: i32 = 3;

/// One entry of a thumbnail collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub caption: String,
    /// Pixel size of the loaded thumbnail, `None` while it is loading.
    pub image: Option<Size>,
}

impl Thumbnail {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, size: Size) -> Self {
        self.image = Some(size);
        self
    }
}

/// The model a [`ThumbnailItemFactory`] renders.
pub type ThumbnailCollection = ListModel<Thumbnail>;

/// Cell geometry shared by every thumbnail item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailMetrics {
    pub item: Size,
    pub border: u32,
    pub shadow: bool,
    pub caption_height: u32,
    pub caption_spacing: u32,
    /// Advance of one grapheme when measuring captions.
    pub glyph_width: u32,
}

impl ThumbnailMetrics {
    /// Validate `config` and derive the cell geometry from it.
    pub fn from_config(config: &ItemConfig) -> WrapViewResult<Self> {
        let item = Size::new(config.width, config.height);
        if item.is_empty() {
            return Err(WrapViewError::InvalidItemSize {
                width: config.width,
                height: config.height,
            });
        }
        let metrics = Self {
            item,
            border: config.border,
            shadow: config.shadow,
            caption_height: config.caption_height,
            caption_spacing: config.caption_spacing,
            glyph_width: config.glyph_width,
        };
        if metrics.image_box().size.is_empty() {
            return Err(WrapViewError::NoRoomForImage {
                width: config.width,
                height: config.height,
            });
        }
        Ok(metrics)
    }

    /// Area the image is fitted into, relative to the item origin.
    pub fn image_box(&self) -> Rect {
        let chrome = self.border.saturating_mul(2);
        let height = self
            .item
            .height
            .saturating_sub(chrome)
            .saturating_sub(self.caption_spacing)
            .saturating_sub(self.caption_height);
        Rect::new(
            to_i32(self.border),
            to_i32(self.border),
            self.item.width.saturating_sub(chrome),
            height,
        )
    }

    /// Area the caption is centered in, relative to the item origin.
    pub fn caption_box(&self) -> Rect {
        let top = self
            .item
            .height
            .saturating_sub(self.border)
            .saturating_sub(self.caption_height);
        Rect::new(
            to_i32(self.border),
            to_i32(top),
            self.item.width.saturating_sub(self.border.saturating_mul(2)),
            self.caption_height,
        )
    }
}

/// A realized thumbnail cell. Rectangles are relative to the item origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailItem {
    pub view: ViewId,
    /// Index currently shown, `None` for a blank item.
    pub index: Option<usize>,
    /// Where the image is drawn, `None` while showing the placeholder.
    pub image: Option<Rect>,
    pub caption: String,
    pub caption_rect: Rect,
    pub frame: Option<Rect>,
    pub shadow: Option<Rect>,
    pub selected: bool,
    pub focused: bool,
}

impl ThumbnailItem {
    fn blank(view: ViewId) -> Self {
        Self {
            view,
            index: None,
            image: None,
            caption: String::new(),
            caption_rect: Rect::ZERO,
            frame: None,
            shadow: None,
            selected: false,
            focused: false,
        }
    }
}

/// Renders a [`ThumbnailCollection`].
#[derive(Debug, Clone)]
pub struct ThumbnailItemFactory {
    metrics: ThumbnailMetrics,
}

impl ThumbnailItemFactory {
    pub fn new(metrics: ThumbnailMetrics) -> Self {
        Self { metrics }
    }

    pub fn from_config(config: &ItemConfig) -> WrapViewResult<Self> {
        ThumbnailMetrics::from_config(config).map(Self::new)
    }

    pub fn metrics(&self) -> &ThumbnailMetrics {
        &self.metrics
    }

    fn place_image(&self, image: Option<Size>) -> (Option<Rect>, Rect) {
        let area = self.metrics.image_box();
        match image.map(|size| size.fit_within(area.size)) {
            Some(fitted) if !fitted.is_empty() => {
                let rect = centered(area, fitted);
                (Some(rect), rect)
            }
            // Placeholder: decorate the whole image box.
            _ => (None, area),
        }
    }
}

impl ItemFactory for ThumbnailItemFactory {
    type Model = ThumbnailCollection;
    type Item = ThumbnailItem;

    fn create(&self, parent: &ParentContext) -> ThumbnailItem {
        ThumbnailItem::blank(parent.view)
    }

    fn update(
        &self,
        item: &mut ThumbnailItem,
        model: &ThumbnailCollection,
        index: usize,
        state: ItemState,
    ) {
        let Some((caption, image)) =
            model.with_item(index, |entry| (entry.caption.clone(), entry.image))
        else {
            *item = ThumbnailItem::blank(item.view);
            return;
        };

        let metrics = &self.metrics;
        let (image, decorated) = self.place_image(image);

        let caption_box = metrics.caption_box();
        let caption = shrink_to_width(&caption, caption_box.size.width, metrics.glyph_width);
        let text_width = (caption.graphemes(true).count() as u32)
            .saturating_mul(metrics.glyph_width)
            .min(caption_box.size.width);

        let frame = (metrics.border > 0).then(|| grow(decorated, metrics.border));
        let shadow = metrics.shadow.then(|| {
            let base = frame.unwrap_or(decorated);
            Rect::from_origin_size(base.origin.offset(SHADOW_OFFSET, SHADOW_OFFSET), base.size)
        });

        *item = ThumbnailItem {
            view: item.view,
            index: Some(index),
            image,
            caption_rect: centered(caption_box, Size::new(text_width, caption_box.size.height)),
            caption,
            frame,
            shadow,
            selected: state.selected,
            focused: state.focused,
        };
    }

    fn item_size(&self) -> Size {
        self.metrics.item
    }
}

/// Shorten `text` so that it spans at most `max_width` pixels at
/// `glyph_width` per grapheme, ending it with [`ELLIPSIS`] when cut.
pub fn shrink_to_width(text: &str, max_width: u32, glyph_width: u32) -> String {
    if glyph_width == 0 {
        return text.to_string();
    }
    let budget = (max_width / glyph_width) as usize;
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= budget {
        return text.to_string();
    }

    let ellipsis_len = ELLIPSIS.len();
    if budget <= ellipsis_len {
        return ELLIPSIS[..budget].to_string();
    }
    let mut shrunk: String = graphemes[..budget - ellipsis_len].concat();
    shrunk.push_str(ELLIPSIS);
    shrunk
}

fn centered(area: Rect, size: Size) -> Rect {
    let dx = area.size.width.saturating_sub(size.width) / 2;
    let dy = area.size.height.saturating_sub(size.height) / 2;
    Rect::from_origin_size(area.origin.offset(to_i32(dx), to_i32(dy)), size)
}

fn grow(rect: Rect, amount: u32) -> Rect {
    let shift = to_i32(amount);
    Rect::from_origin_size(
        Point::new(rect.origin.x.saturating_sub(shift), rect.origin.y.saturating_sub(shift)),
        Size::new(
            rect.size.width.saturating_add(amount.saturating_mul(2)),
            rect.size.height.saturating_add(amount.saturating_mul(2)),
        ),
    )
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
