//! Pointer and keyboard selection rules.
//!
//! Maps a click on an item (or on empty space) to selection changes:
//!
//! - plain click selects just that item and makes it the anchor
//! - ctrl-click toggles the item
//! - shift-click selects from the anchor to the item (ctrl+shift extends)
//! - a double click activates the item
//! - a secondary click selects the item if needed and asks for a context menu
//! - a plain click on empty space clears the selection
//!
//! Cursor keys move a single selection through the grid; see [`Navigate`].

use super::layout::LayoutMode;
use crate::model::SelectionModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.shift
    }
}

/// One button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub button: MouseButton,
    pub modifiers: Modifiers,
    /// 1 for a single click, 2 for a double click.
    pub count: u8,
}

impl Default for Click {
    fn default() -> Self {
        Self::primary()
    }
}

impl Click {
    pub fn primary() -> Self {
        Self {
            button: MouseButton::Primary,
            modifiers: Modifiers::default(),
            count: 1,
        }
    }

    pub fn secondary() -> Self {
        Self {
            button: MouseButton::Secondary,
            ..Self::primary()
        }
    }

    pub fn double() -> Self {
        Self {
            count: 2,
            ..Self::primary()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    SelectionChanged,
    Activated(usize),
    ContextRequested(usize),
}

/// Result of [`apply_click`]: the outcome plus the new anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClickResult {
    pub outcome: ClickOutcome,
    pub anchor: Option<usize>,
}

/// Apply `click` at `index` (`None` for empty space) to `selection`.
pub(crate) fn apply_click(
    selection: &dyn SelectionModel,
    anchor: Option<usize>,
    index: Option<usize>,
    click: Click,
) -> ClickResult {
    let unchanged = |outcome| ClickResult { outcome, anchor };

    let Some(index) = index else {
        if click.button == MouseButton::Primary && click.modifiers.is_empty() {
            selection.clear();
            return ClickResult {
                outcome: ClickOutcome::SelectionChanged,
                anchor: None,
            };
        }
        return unchanged(ClickOutcome::Ignored);
    };

    match click.button {
        MouseButton::Middle => unchanged(ClickOutcome::Ignored),
        MouseButton::Secondary => {
            if selection.is_selected(index) {
                unchanged(ClickOutcome::ContextRequested(index))
            } else {
                selection.set_interval(index, 1);
                ClickResult {
                    outcome: ClickOutcome::ContextRequested(index),
                    anchor: Some(index),
                }
            }
        }
        MouseButton::Primary if click.count >= 2 => unchanged(ClickOutcome::Activated(index)),
        MouseButton::Primary => {
            let Modifiers { ctrl, shift } = click.modifiers;
            match (anchor, shift) {
                (Some(from), true) => {
                    let (lo, hi) = (from.min(index), from.max(index));
                    if ctrl {
                        selection.add_interval(lo, hi - lo + 1);
                    } else {
                        selection.set_interval(lo, hi - lo + 1);
                    }
                    unchanged(ClickOutcome::SelectionChanged)
                }
                _ if ctrl => {
                    selection.toggle(index);
                    ClickResult {
                        outcome: ClickOutcome::SelectionChanged,
                        anchor: Some(index),
                    }
                }
                _ => {
                    selection.set_interval(index, 1);
                    ClickResult {
                        outcome: ClickOutcome::SelectionChanged,
                        anchor: Some(index),
                    }
                }
            }
        }
    }
}

/// A cursor key.
///
/// Keys along the block axis (up/down in row-major, left/right in
/// column-major) jump a whole block and stop at either end. Keys across it
/// step by one and wrap around the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigate {
    Up,
    Down,
    Left,
    Right,
    First,
    Last,
}

/// Where the cursor lands after `nav` from `current` in a sequence of `len`.
///
/// Without a cursor, every key but [`Navigate::Last`] lands on the first
/// index. Manual mode has no blocks and steps by one.
pub(crate) fn step_cursor(
    current: Option<usize>,
    len: usize,
    mode: LayoutMode,
    items_per_block: usize,
    nav: Navigate,
) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let Some(current) = current.map(|index| index.min(last)) else {
        return Some(if nav == Navigate::Last { last } else { 0 });
    };

    let block = if mode.is_block() { items_per_block.max(1) } else { 1 };
    let (block_back, block_forward, step_back) = match mode {
        LayoutMode::ColumnMajor => (Navigate::Left, Navigate::Right, Navigate::Up),
        LayoutMode::RowMajor | LayoutMode::Manual => (Navigate::Up, Navigate::Down, Navigate::Left),
    };

    match nav {
        Navigate::First => Some(0),
        Navigate::Last => Some(last),
        nav if nav == block_back => current.checked_sub(block),
        nav if nav == block_forward => current.checked_add(block).filter(|&index| index <= last),
        nav if nav == step_back => Some(if current == 0 { last } else { current - 1 }),
        _ => Some(if current == last { 0 } else { current + 1 }),
    }
}
