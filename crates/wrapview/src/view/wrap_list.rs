//! The wrap-list engine.
//!
//! [`WrapList`] realizes only the items that intersect its viewport. Setters
//! and model notifications never touch items directly: they record *requests*
//! (a dirty range, dirty flags, new settings) and ask the idle scheduler for a
//! single deferred pass. The pass turns everything accumulated since the last
//! one into item creations, updates and destructions.
//!
//! # Phases
//!
//! ```text
//! Idle --request--> Scheduled --idle task--> Reconciling --+--> Idle
//!                      ^                                   |
//!                      +------- work recorded during pass -+
//! ```
//!
//! Requests while `Scheduled` are absorbed into the pending pass. Requests
//! while `Reconciling` are recorded and get exactly one follow-up pass.
//!
//! # Locking
//!
//! Pending requests and engine state sit behind separate locks. Setters and
//! notification handlers only take the request lock, so a model may notify
//! from inside an item factory without deadlocking. The engine lock is held
//! for the duration of a pass and by read-only queries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use wrapview_core::logging::span_names;
use wrapview_core::logging::targets::{FACTORY, VIEW};
use wrapview_core::{IdleScheduler, IdleTask, PerfSpan, Signal, TaskId};

use super::dirty::{DirtyFlags, DirtyRange};
use super::interaction::{apply_click, step_cursor, Click, ClickOutcome, Navigate};
use super::layout::{
    reveal, snap_to_block, LayoutDescriptor, LayoutMode, ManualLayout, ScrollOffsets, Spacing,
};
use super::slots::{Acquired, SlotTable};
use crate::config::WrapListConfig;
use crate::error::{WrapViewError, WrapViewResult};
use crate::factory::{ItemFactory, ItemState, ParentContext};
use crate::geometry::{Point, Rect, Size};
use crate::model::{
    subscribe, PositionModel, SelectionModel, SequenceListener, SequenceModel, Span, Subscription,
};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one wrap-list instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// A process-unique ID.
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Where a wrap-list is in its update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePhase {
    #[default]
    Idle,
    /// A pass is queued on the idle scheduler.
    Scheduled,
    /// A pass is running.
    Reconciling,
}

/// What one reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    /// 1-based pass number.
    pub pass: u64,
    pub created: usize,
    pub recycled: usize,
    /// Calls to [`ItemFactory::update`].
    pub updated: usize,
    pub destroyed: usize,
    /// Bound slots after the pass.
    pub visible: usize,
    /// Every slot was torn down before updating.
    pub rebuilt: bool,
}

/// Notifications a wrap-list emits. All fire outside the engine's locks.
pub struct WrapListSignals {
    /// The scrollable content size changed. Args: new size.
    pub scroll_region_changed: Signal<Size>,
    /// The committed scroll offsets changed, including snapping and
    /// clamping. Args: new offsets.
    pub scroll_offsets_changed: Signal<ScrollOffsets>,
    /// A pass finished.
    pub reconciled: Signal<ReconcileStats>,
    /// An item was double-clicked. Args: index.
    pub activated: Signal<usize>,
    /// A context menu was requested on an item. Args: index.
    pub context_requested: Signal<usize>,
}

impl WrapListSignals {
    fn new() -> Self {
        Self {
            scroll_region_changed: Signal::new(),
            scroll_offsets_changed: Signal::new(),
            reconciled: Signal::new(),
            activated: Signal::new(),
            context_requested: Signal::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Settings {
    mode: LayoutMode,
    spacing: Spacing,
    unit_scrolling: bool,
}

impl Settings {
    fn from_config(config: &WrapListConfig) -> Self {
        Self {
            mode: config.mode,
            spacing: config.spacing(),
            unit_scrolling: config.unit_scrolling,
        }
    }
}

/// Everything recorded since the last pass. Guarded by `Shared::requests`.
struct Requests<F: ItemFactory> {
    phase: UpdatePhase,
    /// The idle task that will run the scheduled pass.
    queued: Option<TaskId>,
    dirty: DirtyRange,
    flags: DirtyFlags,
    settings: Settings,
    viewport: Size,
    offsets: ScrollOffsets,
    focus: Option<usize>,
    anchor: Option<usize>,
    model: Option<Arc<F::Model>>,
    selection: Option<Arc<dyn SelectionModel>>,
    positions: Option<Arc<dyn PositionModel>>,
    factory: Option<Arc<F>>,
    model_subscription: Option<Subscription>,
    selection_subscription: Option<Subscription>,
    positions_subscription: Option<Subscription>,
}

impl<F: ItemFactory> Requests<F> {
    fn new(settings: Settings) -> Self {
        Self {
            phase: UpdatePhase::Idle,
            queued: None,
            dirty: DirtyRange::new(),
            flags: DirtyFlags::default(),
            settings,
            viewport: Size::ZERO,
            offsets: ScrollOffsets::default(),
            focus: None,
            anchor: None,
            model: None,
            selection: None,
            positions: None,
            factory: None,
            model_subscription: None,
            selection_subscription: None,
            positions_subscription: None,
        }
    }

    fn has_work(&self) -> bool {
        !self.dirty.is_clean() || self.flags.any()
    }

    fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        let before = self.settings;
        change(&mut self.settings);
        if self.settings != before {
            self.flags.geometry = true;
        }
    }

    fn set_offsets(&mut self, offsets: ScrollOffsets) {
        if self.offsets != offsets {
            self.offsets = offsets;
            self.flags.scroll = true;
        }
    }

    fn move_focus(&mut self, focus: Option<usize>) {
        if self.focus == focus {
            return;
        }
        for index in [self.focus, focus].into_iter().flatten() {
            self.dirty.mark(Span::new(index, 1));
        }
        self.focus = focus;
    }

    /// Scroll the pending offsets just far enough to show `index`.
    fn reveal(&mut self, index: usize) {
        let Some(item) = self.factory.as_ref().map(|factory| factory.item_size()) else {
            return;
        };
        let Settings { mode, spacing, .. } = self.settings;
        let (viewport, offsets) = (self.viewport, self.offsets);

        let target = if mode.is_block() {
            let Some(layout) = LayoutDescriptor::compute(mode, item, spacing, viewport, offsets)
            else {
                return;
            };
            let (start, end) = layout.major_span(index);
            let (_, size_major) = mode.to_axes(viewport.width, viewport.height);
            let (minor, major) = mode.to_axes(offsets.x, offsets.y);
            let (x, y) = mode.from_axes(minor, reveal(major, size_major, start, end));
            ScrollOffsets::new(x, y)
        } else {
            let Some(origin) = self.positions.as_ref().and_then(|p| p.position(index)) else {
                return;
            };
            let left = u64::try_from(origin.x).unwrap_or(0);
            let top = u64::try_from(origin.y).unwrap_or(0);
            ScrollOffsets::new(
                reveal(offsets.x, viewport.width, left, left + u64::from(item.width)),
                reveal(offsets.y, viewport.height, top, top + u64::from(item.height)),
            )
        };
        self.set_offsets(target);
    }

    fn take_input(&mut self) -> PassInput<F> {
        PassInput {
            dirty: self.dirty.take(),
            flags: self.flags.take(),
            settings: self.settings,
            viewport: self.viewport,
            offsets: self.offsets,
            focus: self.focus,
            model: self.model.clone(),
            selection: self.selection.clone(),
            positions: self.positions.clone(),
            factory: self.factory.clone(),
        }
    }
}

/// Snapshot of the requests one pass works from.
struct PassInput<F: ItemFactory> {
    dirty: DirtyRange,
    flags: DirtyFlags,
    settings: Settings,
    viewport: Size,
    offsets: ScrollOffsets,
    focus: Option<usize>,
    model: Option<Arc<F::Model>>,
    selection: Option<Arc<dyn SelectionModel>>,
    positions: Option<Arc<dyn PositionModel>>,
    factory: Option<Arc<F>>,
}

/// Where the visible items go for one pass.
#[derive(Debug, Clone)]
enum Placement {
    Empty,
    Blocks(LayoutDescriptor),
    Manual(ManualLayout),
}

impl Placement {
    fn compute(
        settings: Settings,
        item: Size,
        viewport: Size,
        offsets: ScrollOffsets,
        len: usize,
        positions: Option<&dyn PositionModel>,
    ) -> Self {
        if settings.mode.is_block() {
            let layout =
                LayoutDescriptor::compute(settings.mode, item, settings.spacing, viewport, offsets);
            return layout.map_or(Self::Empty, Self::Blocks);
        }
        match positions {
            Some(positions) => Self::Manual(ManualLayout::compute(
                len.min(positions.len()),
                |index| positions.position(index),
                item,
                viewport,
                offsets,
            )),
            None => Self::Empty,
        }
    }

    /// Visible indices below `len`, ascending.
    fn indices(&self, len: usize) -> impl Iterator<Item = usize> + '_ {
        let (window, listed): (std::ops::Range<usize>, &[usize]) = match self {
            Self::Blocks(layout) => {
                let window = layout.window();
                (window.start..window.end.min(len), &[] as &[usize])
            }
            Self::Manual(manual) => (0..0, manual.visible.as_slice()),
            Self::Empty => (0..0, &[] as &[usize]),
        };
        window.chain(listed.iter().copied().filter(move |&index| index < len))
    }

    fn contains(&self, index: usize) -> bool {
        match self {
            Self::Blocks(layout) => layout.window().contains(&index),
            Self::Manual(manual) => manual.visible.binary_search(&index).is_ok(),
            Self::Empty => false,
        }
    }

    /// Slots the table may keep.
    fn capacity(&self) -> usize {
        match self {
            Self::Blocks(layout) => layout.slot_count(),
            Self::Manual(manual) => manual.visible.len(),
            Self::Empty => 0,
        }
    }

    fn origin(&self, index: usize, positions: Option<&dyn PositionModel>) -> Point {
        match self {
            Self::Blocks(layout) => layout.item_origin(index),
            Self::Manual(_) => positions
                .and_then(|positions| positions.position(index))
                .unwrap_or(Point::ZERO),
            Self::Empty => Point::ZERO,
        }
    }

    fn content_size(&self, len: usize, viewport: Size) -> Size {
        match self {
            Self::Blocks(layout) => layout.content_size(len, viewport),
            Self::Manual(manual) => manual.content,
            Self::Empty => Size::ZERO,
        }
    }
}

/// Inputs whose change invalidates every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    mode: LayoutMode,
    spacing: Spacing,
    item_size: Size,
    items_per_block: Option<usize>,
    slot_count: Option<usize>,
}

impl Geometry {
    fn of(settings: Settings, item_size: Size, placement: &Placement) -> Self {
        let blocks = match placement {
            Placement::Blocks(layout) => Some(layout),
            _ => None,
        };
        Self {
            mode: settings.mode,
            spacing: settings.spacing,
            item_size,
            items_per_block: blocks.map(|layout| layout.items_per_block),
            slot_count: blocks.map(|layout| layout.slot_count()),
        }
    }
}

/// Committed state, owned by the pass.
struct Engine<F: ItemFactory> {
    factory: Option<Arc<F>>,
    slots: SlotTable<F::Item>,
    placement: Placement,
    geometry: Option<Geometry>,
    item_size: Size,
    offsets: ScrollOffsets,
    content: Size,
    len: usize,
    passes: u64,
}

/// What a pass hands back for signalling and follow-up scheduling.
struct PassReport {
    stats: ReconcileStats,
    /// Offsets the pass was asked for.
    requested: ScrollOffsets,
    /// New committed offsets, if they changed.
    committed: Option<ScrollOffsets>,
    /// New content size, if it changed.
    region: Option<Size>,
    /// Offsets to request next because the committed ones overshoot.
    clamp: Option<ScrollOffsets>,
}

impl<F: ItemFactory> Engine<F> {
    fn new() -> Self {
        Self {
            factory: None,
            slots: SlotTable::new(),
            placement: Placement::Empty,
            geometry: None,
            item_size: Size::ZERO,
            offsets: ScrollOffsets::default(),
            content: Size::ZERO,
            len: 0,
            passes: 0,
        }
    }

    /// Hand destroyed items back to the factory that made them.
    fn release(&self, items: Vec<F::Item>) -> usize {
        let count = items.len();
        if let Some(factory) = &self.factory {
            for item in items {
                factory.release(item);
            }
        }
        count
    }

    fn release_all(&mut self) -> usize {
        let items = self.slots.drain();
        self.release(items)
    }

    fn run_pass(&mut self, input: PassInput<F>, view: ViewId) -> PassReport {
        self.passes += 1;
        let mut stats = ReconcileStats {
            pass: self.passes,
            ..Default::default()
        };
        let settings = input.settings;
        let mut dirty = input.dirty;

        if input.flags.factory {
            stats.destroyed += self.release_all();
            self.factory = input.factory.clone();
            stats.rebuilt = true;
        }
        let item_size = self
            .factory
            .as_ref()
            .map_or(Size::ZERO, |factory| factory.item_size());

        // 1. Scroll resolution.
        let committed = commit_offsets(settings, item_size, input.offsets);
        let offsets_changed = committed != self.offsets;
        self.offsets = committed;

        // 2. Layout.
        let len = input.model.as_ref().map_or(0, |model| model.len());
        let positions = input.positions.as_deref();
        let placement = if self.factory.is_some() && input.model.is_some() {
            Placement::compute(settings, item_size, input.viewport, committed, len, positions)
        } else {
            Placement::Empty
        };
        if let Placement::Blocks(layout) = &placement {
            assert!(layout.items_per_block > 0, "layout produced zero items per block");
        }

        // 3. Slot table.
        let geometry = Geometry::of(settings, item_size, &placement);
        if !stats.rebuilt && self.geometry.is_some_and(|previous| previous != geometry) {
            stats.destroyed += self.release_all();
            stats.rebuilt = true;
        }
        self.geometry = Some(geometry);
        if stats.rebuilt {
            dirty.mark(Span::everything());
        }

        // 4. Trailing slots go first so the window scan never sees them.
        let trailing = self.slots.destroy_from(len);
        stats.destroyed += self.release(trailing);
        self.slots.unbind_where(|index| placement.contains(index));

        // 5. Per-index update of dirty and newly exposed indices.
        if let (Some(factory), Some(model)) = (self.factory.as_ref(), input.model.as_ref()) {
            let parent = ParentContext {
                view,
                mode: settings.mode,
                item_size,
            };
            for index in placement.indices(len) {
                if self.slots.is_bound(index) && !dirty.contains(index) {
                    continue;
                }
                let state = ItemState {
                    selected: input
                        .selection
                        .as_ref()
                        .is_some_and(|selection| selection.is_selected(index)),
                    focused: input.focus == Some(index),
                };
                let (slot, how) = self.slots.acquire(index, || {
                    tracing::trace!(target: FACTORY, view = view.as_u64(), index, "creating item");
                    factory.create(&parent)
                });
                factory.update(&mut slot.item, &**model, index, state);
                slot.origin = placement.origin(index, positions);

                match how {
                    Acquired::Created => stats.created += 1,
                    Acquired::Recycled => stats.recycled += 1,
                    Acquired::Bound => {}
                }
                stats.updated += 1;
            }
        }

        // 6. Parked slots beyond what the window can use.
        let surplus = self.slots.trim_to(placement.capacity());
        stats.destroyed += self.release(surplus);
        stats.visible = self.slots.bound_count();

        // 7. Scroll region.
        let content = placement.content_size(len, input.viewport);
        let region = (content != self.content).then_some(content);
        self.content = content;
        let clamped = committed.clamped(content, input.viewport);

        self.placement = placement;
        self.item_size = item_size;
        self.len = len;

        tracing::debug!(
            target: VIEW,
            view = view.as_u64(),
            pass = stats.pass,
            created = stats.created,
            recycled = stats.recycled,
            updated = stats.updated,
            destroyed = stats.destroyed,
            visible = stats.visible,
            rebuilt = stats.rebuilt,
            dirty = ?dirty.span(),
            "reconciled"
        );

        PassReport {
            stats,
            requested: input.offsets,
            committed: offsets_changed.then_some(committed),
            region,
            clamp: (clamped != committed).then_some(clamped),
        }
    }
}

impl<F: ItemFactory> Drop for Engine<F> {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Snap the major-axis offset to a block boundary when unit scrolling.
fn commit_offsets(settings: Settings, item: Size, requested: ScrollOffsets) -> ScrollOffsets {
    let mode = settings.mode;
    if !settings.unit_scrolling || !mode.is_block() {
        return requested;
    }
    let (_, item_major) = mode.to_axes(item.width, item.height);
    let (_, space_major) = mode.to_axes(settings.spacing.col, settings.spacing.row);
    let (minor, major) = mode.to_axes(requested.x, requested.y);
    let pitch = item_major.saturating_add(space_major);
    let (x, y) = mode.from_axes(minor, snap_to_block(major, pitch));
    ScrollOffsets::new(x, y)
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

struct Shared<F: ItemFactory> {
    id: ViewId,
    requests: Mutex<Requests<F>>,
    engine: Mutex<Engine<F>>,
    scheduler: Arc<dyn IdleScheduler>,
    signals: WrapListSignals,
}

impl<F: ItemFactory> Shared<F> {
    /// Apply `change` to the pending requests and schedule a pass if this
    /// created the first pending work.
    fn request(self: &Arc<Self>, change: impl FnOnce(&mut Requests<F>)) -> WrapViewResult<()> {
        let schedule = {
            let mut requests = self.requests.lock();
            change(&mut requests);
            if !requests.has_work() {
                false
            } else if requests.phase == UpdatePhase::Idle {
                requests.phase = UpdatePhase::Scheduled;
                true
            } else {
                tracing::trace!(
                    target: VIEW,
                    view = self.id.as_u64(),
                    phase = ?requests.phase,
                    "request coalesced"
                );
                false
            }
        };
        if schedule { self.submit() } else { Ok(()) }
    }

    fn submit(self: &Arc<Self>) -> WrapViewResult<()> {
        let view = Arc::downgrade(self);
        let task: IdleTask = Box::new(move || {
            if let Some(shared) = view.upgrade() {
                shared.reconcile();
            }
        });
        match self.scheduler.schedule_idle(task) {
            Ok(task) => {
                let mut requests = self.requests.lock();
                if requests.phase == UpdatePhase::Scheduled {
                    requests.queued = Some(task);
                }
                tracing::trace!(
                    target: VIEW,
                    view = self.id.as_u64(),
                    task = task.as_u64(),
                    "pass scheduled"
                );
                Ok(())
            }
            Err(err) => {
                self.requests.lock().phase = UpdatePhase::Idle;
                Err(err.into())
            }
        }
    }

    fn reconcile(self: &Arc<Self>) -> Option<ReconcileStats> {
        let (input, queued) = {
            let mut requests = self.requests.lock();
            match requests.phase {
                UpdatePhase::Reconciling => {
                    tracing::warn!(target: VIEW, view = self.id.as_u64(), "nested pass ignored");
                    return None;
                }
                UpdatePhase::Idle if !requests.has_work() => return None,
                UpdatePhase::Idle | UpdatePhase::Scheduled => {}
            }
            requests.phase = UpdatePhase::Reconciling;
            (requests.take_input(), requests.queued.take())
        };

        // A flush runs ahead of the queued task; the task itself is no
        // longer queued by the time it runs.
        if let Some(task) = queued
            && self.scheduler.cancel_idle(task)
        {
            tracing::trace!(
                target: VIEW,
                view = self.id.as_u64(),
                task = task.as_u64(),
                "queued pass cancelled"
            );
        }

        let report = {
            let _perf = PerfSpan::new(span_names::RECONCILE);
            self.engine.lock().run_pass(input, self.id)
        };

        let follow_up = {
            let mut requests = self.requests.lock();
            // A newer scroll request wins over the clamp.
            if let Some(clamped) = report.clamp
                && requests.offsets == report.requested
            {
                requests.set_offsets(clamped);
            }
            let follow_up = requests.has_work();
            requests.phase = if follow_up {
                UpdatePhase::Scheduled
            } else {
                UpdatePhase::Idle
            };
            follow_up
        };
        if follow_up && let Err(err) = self.submit() {
            tracing::warn!(
                target: VIEW,
                view = self.id.as_u64(),
                %err,
                "follow-up pass not scheduled"
            );
        }

        if let Some(offsets) = report.committed {
            self.signals.scroll_offsets_changed.emit(offsets);
        }
        if let Some(size) = report.region {
            self.signals.scroll_region_changed.emit(size);
        }
        self.signals.reconciled.emit(report.stats);
        Some(report.stats)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Data,
    Selection,
    Positions,
}

/// Turns model notifications into dirty marks on one view.
struct Listener<F: ItemFactory> {
    view: Weak<Shared<F>>,
    source: Source,
}

impl<F: ItemFactory> Listener<F> {
    fn attach<M>(shared: &Arc<Shared<F>>, model: &Arc<M>, source: Source) -> Subscription
    where
        M: SequenceModel + ?Sized + 'static,
    {
        let listener = Arc::new(Self {
            view: Arc::downgrade(shared),
            source,
        });
        subscribe(model, listener)
    }

    fn invalidate(&self, span: Span) {
        let Some(shared) = self.view.upgrade() else {
            return;
        };
        if let Err(err) = shared.request(|requests| requests.dirty.mark(span)) {
            tracing::warn!(
                target: VIEW,
                view = shared.id.as_u64(),
                source = ?self.source,
                %err,
                "notification not scheduled"
            );
        }
    }

    /// Data and position inserts/removals shift every later index; selection
    /// changes do not.
    fn reach(&self, span: Span) -> Span {
        match self.source {
            Source::Selection => span,
            Source::Data | Source::Positions => Span::to_end(span.start),
        }
    }
}

impl<F: ItemFactory> SequenceListener for Listener<F> {
    fn changed(&self, span: Span) {
        self.invalidate(span);
    }

    fn added(&self, span: Span) {
        self.invalidate(self.reach(span));
    }

    fn removed(&self, span: Span) {
        self.invalidate(self.reach(span));
    }
}

/// A virtualized list that wraps items into rows or columns.
///
/// Cloning yields another handle to the same view. Inputs can be set in any
/// order; nothing is realized until the first pass runs on `scheduler`.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use wrapview::prelude::*;
///
/// let queue = Arc::new(IdleQueue::new());
/// let photos = Arc::new(ThumbnailCollection::new(vec![Thumbnail::new("a.jpg")]));
/// let factory = ThumbnailItemFactory::from_config(&ItemConfig::default())?;
///
/// let view = WrapList::new(queue.clone());
/// view.set_factory(Some(Arc::new(factory)));
/// view.set_model(Some(photos));
/// view.set_viewport_size(Size::new(800, 600));
///
/// queue.run_pending();
/// view.for_each_visible(|index, item, origin| {
///     println!("{index} at {origin:?}: {}", item.caption);
/// });
/// ```
pub struct WrapList<F: ItemFactory> {
    shared: Arc<Shared<F>>,
}

impl<F: ItemFactory> Clone for WrapList<F> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<F: ItemFactory> WrapList<F> {
    /// An empty row-major view that schedules its passes on `scheduler`.
    pub fn new(scheduler: Arc<dyn IdleScheduler>) -> Self {
        Self::with_settings(scheduler, Settings::default())
    }

    /// A view using the mode, spacing and unit scrolling of `config`.
    pub fn with_config(scheduler: Arc<dyn IdleScheduler>, config: &WrapListConfig) -> Self {
        Self::with_settings(scheduler, Settings::from_config(config))
    }

    fn with_settings(scheduler: Arc<dyn IdleScheduler>, settings: Settings) -> Self {
        let id = ViewId::next();
        tracing::debug!(
            target: VIEW,
            view = id.as_u64(),
            mode = ?settings.mode,
            "wrap-list created"
        );
        Self {
            shared: Arc::new(Shared {
                id,
                requests: Mutex::new(Requests::new(settings)),
                engine: Mutex::new(Engine::new()),
                scheduler,
                signals: WrapListSignals::new(),
            }),
        }
    }

    pub fn id(&self) -> ViewId {
        self.shared.id
    }

    pub fn signals(&self) -> &WrapListSignals {
        &self.shared.signals
    }

    fn post(&self, change: impl FnOnce(&mut Requests<F>)) {
        if let Err(err) = self.shared.request(change) {
            tracing::warn!(
                target: VIEW,
                view = self.shared.id.as_u64(),
                %err,
                "update not scheduled"
            );
        }
    }

    // -------------------------------------------------------------------------
    // Models and factory
    // -------------------------------------------------------------------------

    /// Replace the data model. Every index is refreshed on the next pass.
    pub fn set_model(&self, model: Option<Arc<F::Model>>) {
        let subscription = model
            .as_ref()
            .map(|model| Listener::attach(&self.shared, model, Source::Data));
        self.post(move |requests| {
            requests.model = model;
            requests.model_subscription = subscription;
            requests.dirty.mark(Span::everything());
        });
    }

    pub fn model(&self) -> Option<Arc<F::Model>> {
        self.shared.requests.lock().model.clone()
    }

    pub fn set_selection_model(&self, selection: Option<Arc<dyn SelectionModel>>) {
        let subscription = selection
            .as_ref()
            .map(|selection| Listener::attach(&self.shared, selection, Source::Selection));
        self.post(move |requests| {
            requests.selection = selection;
            requests.selection_subscription = subscription;
            requests.anchor = None;
            requests.dirty.mark(Span::everything());
        });
    }

    pub fn selection_model(&self) -> Option<Arc<dyn SelectionModel>> {
        self.shared.requests.lock().selection.clone()
    }

    /// Positions consulted in [`LayoutMode::Manual`].
    pub fn set_position_model(&self, positions: Option<Arc<dyn PositionModel>>) {
        let subscription = positions
            .as_ref()
            .map(|positions| Listener::attach(&self.shared, positions, Source::Positions));
        self.post(move |requests| {
            requests.positions = positions;
            requests.positions_subscription = subscription;
            requests.dirty.mark(Span::everything());
        });
    }

    pub fn position_model(&self) -> Option<Arc<dyn PositionModel>> {
        self.shared.requests.lock().positions.clone()
    }

    /// Replace the item factory. Every slot is destroyed and recreated on the
    /// next pass.
    pub fn set_factory(&self, factory: Option<Arc<F>>) {
        self.post(move |requests| {
            requests.factory = factory;
            requests.flags.factory = true;
        });
    }

    pub fn factory(&self) -> Option<Arc<F>> {
        self.shared.requests.lock().factory.clone()
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    pub fn set_mode(&self, mode: LayoutMode) {
        self.post(|requests| requests.update_settings(|settings| settings.mode = mode));
    }

    pub fn mode(&self) -> LayoutMode {
        self.shared.requests.lock().settings.mode
    }

    pub fn set_spacing(&self, spacing: Spacing) {
        self.post(|requests| requests.update_settings(|settings| settings.spacing = spacing));
    }

    pub fn set_row_spacing(&self, row: u32) {
        self.post(|requests| requests.update_settings(|settings| settings.spacing.row = row));
    }

    pub fn set_col_spacing(&self, col: u32) {
        self.post(|requests| requests.update_settings(|settings| settings.spacing.col = col));
    }

    pub fn spacing(&self) -> Spacing {
        self.shared.requests.lock().settings.spacing
    }

    /// Snap scrolling to whole rows (or columns).
    pub fn set_unit_scrolling(&self, enabled: bool) {
        self.post(|requests| {
            requests.update_settings(|settings| settings.unit_scrolling = enabled)
        });
    }

    pub fn unit_scrolling(&self) -> bool {
        self.shared.requests.lock().settings.unit_scrolling
    }

    // -------------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------------

    /// Size allocation of the visible area.
    pub fn set_viewport_size(&self, size: Size) {
        self.post(|requests| {
            if requests.viewport != size {
                requests.viewport = size;
                requests.flags.geometry = true;
            }
        });
    }

    pub fn viewport_size(&self) -> Size {
        self.shared.requests.lock().viewport
    }

    pub fn set_scroll_offsets(&self, offsets: ScrollOffsets) {
        self.post(|requests| requests.set_offsets(offsets));
    }

    pub fn set_h_offset(&self, x: u32) {
        self.post(|requests| requests.set_offsets(ScrollOffsets { x, ..requests.offsets }));
    }

    pub fn set_v_offset(&self, y: u32) {
        self.post(|requests| requests.set_offsets(ScrollOffsets { y, ..requests.offsets }));
    }

    /// Offsets committed by the last pass.
    pub fn scroll_offsets(&self) -> ScrollOffsets {
        self.shared.engine.lock().offsets
    }

    /// Scroll minimally so `index` is fully visible (or starts at the top
    /// when it is larger than the viewport).
    pub fn ensure_visible(&self, index: usize) {
        self.post(|requests| requests.reveal(index));
    }

    // -------------------------------------------------------------------------
    // Focus, pointer and keyboard input
    // -------------------------------------------------------------------------

    pub fn set_focus(&self, focus: Option<usize>) {
        self.post(|requests| requests.move_focus(focus));
    }

    pub fn focus(&self) -> Option<usize> {
        self.shared.requests.lock().focus
    }

    /// Apply a click on `index` (`None` for empty space) to the selection
    /// model, move focus, and emit [`activated`](WrapListSignals::activated)
    /// or [`context_requested`](WrapListSignals::context_requested).
    ///
    /// Without a selection model every click is ignored.
    pub fn handle_click(&self, index: Option<usize>, click: Click) -> ClickOutcome {
        let (selection, anchor) = {
            let requests = self.shared.requests.lock();
            (requests.selection.clone(), requests.anchor)
        };
        let Some(selection) = selection else {
            return ClickOutcome::Ignored;
        };

        let result = apply_click(&*selection, anchor, index, click);
        self.post(|requests| {
            requests.anchor = result.anchor;
            if index.is_some() {
                requests.move_focus(index);
            }
        });

        match result.outcome {
            ClickOutcome::Activated(index) => self.shared.signals.activated.emit(index),
            ClickOutcome::ContextRequested(index) => {
                self.shared.signals.context_requested.emit(index)
            }
            ClickOutcome::Ignored | ClickOutcome::SelectionChanged => {}
        }
        result.outcome
    }

    /// Move the cursor with a key and make it the single selection.
    ///
    /// Block-axis keys jump by the committed items-per-block. Returns the new
    /// cursor, or `None` if the key would leave the sequence; nothing changes
    /// then. The new cursor becomes the anchor and is scrolled into view.
    pub fn move_cursor(&self, nav: Navigate) -> Option<usize> {
        let committed = self.layout().map(|layout| (layout.mode, layout.items_per_block));
        let (index, selection) = {
            let requests = self.shared.requests.lock();
            let len = requests.model.as_ref().map_or(0, |model| model.len());
            let (mode, items_per_block) = committed.unwrap_or((requests.settings.mode, 1));
            let index = step_cursor(requests.focus, len, mode, items_per_block, nav)?;
            (index, requests.selection.clone())
        };

        if let Some(selection) = selection {
            selection.set_interval(index, 1);
        }
        self.post(|requests| {
            requests.anchor = Some(index);
            requests.move_focus(Some(index));
            requests.reveal(index);
        });
        tracing::trace!(target: VIEW, view = self.shared.id.as_u64(), ?nav, index, "cursor moved");
        Some(index)
    }

    // -------------------------------------------------------------------------
    // Scheduling
    // -------------------------------------------------------------------------

    /// Refresh every visible item on the next pass.
    pub fn request_update(&self) -> WrapViewResult<()> {
        self.shared
            .request(|requests| requests.dirty.mark(Span::everything()))
    }

    /// Run the pending pass now instead of waiting for the scheduler.
    ///
    /// Returns `None` when nothing was pending or a pass is already running.
    /// The queued idle task is cancelled.
    pub fn flush(&self) -> Option<ReconcileStats> {
        self.shared.reconcile()
    }

    pub fn phase(&self) -> UpdatePhase {
        self.shared.requests.lock().phase
    }

    pub fn is_update_pending(&self) -> bool {
        self.phase() != UpdatePhase::Idle
    }

    /// Check that the current inputs can produce items.
    pub fn validate(&self) -> WrapViewResult<()> {
        let requests = self.shared.requests.lock();
        if requests.settings.mode == LayoutMode::Manual && requests.positions.is_none() {
            return Err(WrapViewError::MissingPositionModel);
        }
        if let Some(size) = requests.factory.as_ref().map(|factory| factory.item_size())
            && size.is_empty()
        {
            return Err(WrapViewError::InvalidItemSize {
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Committed state
    // -------------------------------------------------------------------------

    /// Scrollable content size published by the last pass.
    pub fn scroll_region(&self) -> Size {
        self.shared.engine.lock().content
    }

    /// Block layout of the last pass; `None` in manual mode or when nothing
    /// was visible.
    pub fn layout(&self) -> Option<LayoutDescriptor> {
        match self.shared.engine.lock().placement {
            Placement::Blocks(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn pass_count(&self) -> u64 {
        self.shared.engine.lock().passes
    }

    /// Live slots, including parked ones awaiting reuse.
    pub fn slot_count(&self) -> usize {
        self.shared.engine.lock().slots.len()
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        let engine = self.shared.engine.lock();
        engine.slots.iter_bound().map(|(index, _)| index).collect()
    }

    /// Run `f` on the item realized for `index`.
    ///
    /// `f` runs with the engine locked and must not call back into the view.
    pub fn with_item<R>(&self, index: usize, f: impl FnOnce(&F::Item) -> R) -> Option<R> {
        let engine = self.shared.engine.lock();
        engine.slots.get(index).map(|slot| f(&slot.item))
    }

    /// Visit every realized item in index order with its viewport position.
    ///
    /// `f` runs with the engine locked and must not call back into the view.
    pub fn for_each_visible(&self, mut f: impl FnMut(usize, &F::Item, Point)) {
        let engine = self.shared.engine.lock();
        let (dx, dy) = (to_i32(engine.offsets.x), to_i32(engine.offsets.y));
        for (index, slot) in engine.slots.iter_bound() {
            f(index, &slot.item, slot.origin.offset(-dx, -dy));
        }
    }

    /// Content-coordinate origin of the item realized for `index`.
    pub fn item_origin(&self, index: usize) -> Option<Point> {
        self.shared.engine.lock().slots.get(index).map(|slot| slot.origin)
    }

    /// Index of the item under `point` (viewport coordinates).
    pub fn index_at(&self, point: Point) -> Option<usize> {
        let engine = self.shared.engine.lock();
        let content = point.offset(to_i32(engine.offsets.x), to_i32(engine.offsets.y));
        match &engine.placement {
            Placement::Blocks(layout) => {
                layout.index_at(content).filter(|&index| index < engine.len)
            }
            // Later items draw on top.
            Placement::Manual(_) => engine
                .slots
                .iter_bound()
                .filter(|(_, slot)| {
                    Rect::from_origin_size(slot.origin, engine.item_size).contains(content)
                })
                .map(|(index, _)| index)
                .last(),
            Placement::Empty => None,
        }
    }
}

static_assertions::assert_impl_all!(
    WrapList<crate::factory::ThumbnailItemFactory>: Send, Sync, Clone
);
