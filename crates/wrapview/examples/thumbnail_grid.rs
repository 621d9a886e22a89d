//! Thumbnail Grid Example
//!
//! Drives a wrap-list of photo thumbnails through an idle queue and prints
//! what each pass realized:
//! - Initial layout of a 1000-photo collection
//! - Scrolling with recycled slots
//! - Selection and a removal that shifts later items
//! - Moving the keyboard cursor
//! - Switching to column-major layout
//!
//! Pass an optional TOML config path to override the defaults.
//!
//! Run with: RUST_LOG=wrapview=debug cargo run -p wrapview --example thumbnail_grid

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wrapview::prelude::*;

fn print_grid(view: &WrapList<ThumbnailItemFactory>) {
    let mut first = None;
    let mut count = 0;
    view.for_each_visible(|index, item, origin| {
        if first.is_none() {
            first = Some((index, item.caption.clone(), origin));
        }
        count += 1;
    });

    let offsets = view.scroll_offsets();
    println!(
        "  offsets ({}, {}), region {:?}, {} items realized, {} slots",
        offsets.x,
        offsets.y,
        view.scroll_region(),
        count,
        view.slot_count()
    );
    if let Some((index, caption, origin)) = first {
        println!("  first: #{index} {caption:?} at {origin:?}");
    }
}

fn main() -> WrapViewResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => WrapListConfig::load(path)?,
        None => WrapListConfig::default(),
    };
    config.validate()?;

    let photos = Arc::new(ThumbnailCollection::new(
        (0..1000)
            .map(|n| Thumbnail::new(format!("IMG_{n:04}.jpg")).with_image(Size::new(640, 480)))
            .collect(),
    ));
    let selection = Arc::new(IntervalSelection::new());
    let queue = Arc::new(IdleQueue::new());

    let view = WrapList::with_config(queue.clone(), &config);
    view.set_factory(Some(Arc::new(ThumbnailItemFactory::from_config(&config.item)?)));
    view.set_model(Some(photos.clone()));
    view.set_selection_model(Some(selection.clone()));
    view.set_viewport_size(Size::new(800, 600));
    view.validate()?;

    view.signals().reconciled.connect(|stats| {
        println!(
            "pass {}: {} created, {} recycled, {} updated, {} destroyed",
            stats.pass, stats.created, stats.recycled, stats.updated, stats.destroyed
        );
    });
    view.signals().activated.connect(|index| println!("activated #{index}"));

    println!("Initial layout:");
    queue.run_until_idle(16);
    print_grid(&view);

    println!("Scroll down two rows:");
    view.set_v_offset(284);
    queue.run_until_idle(16);
    print_grid(&view);

    println!("Select, open, remove:");
    view.handle_click(Some(14), Click::primary());
    view.handle_click(Some(17), Click::primary().with_shift());
    view.handle_click(Some(17), Click::double());
    photos.remove_range(15, 5);
    queue.run_until_idle(16);
    println!("  selected: {:?}..={:?}", selection.min_selected(), selection.max_selected());
    print_grid(&view);

    println!("Cursor down a row:");
    if let Some(index) = view.move_cursor(Navigate::Down) {
        queue.run_until_idle(16);
        println!("  focus #{index}, selected {:?}", selection.min_selected());
    }

    println!("Column-major:");
    view.set_mode(LayoutMode::ColumnMajor);
    view.ensure_visible(500);
    queue.run_until_idle(16);
    print_grid(&view);

    Ok(())
}
