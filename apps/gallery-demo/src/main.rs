//! Headless gallery host.
//!
//! Builds a three-page pager of differently sized images and replays a
//! scripted session against it: swipe between pages, double tap to zoom,
//! pan a zoomed page into its edge, pinch, and persist the final state.
//! Run with `RUST_LOG=debug` to watch the gesture decisions.

mod pager;

use anyhow::{ensure, Context};
use zoomable::prelude::*;
use zoomable::{SavedZoomState, ZoomState};
use zoomable_core::{Runtime, WebClock};
use zoomable_testing::GestureRobot;

use crate::pager::HorizontalPager;

const VIEWPORT: Size = Size {
    width: 1080.0,
    height: 1920.0,
};
const PAGES: [Size; 3] = [
    Size {
        width: 1080.0,
        height: 1920.0,
    },
    Size {
        width: 4032.0,
        height: 3024.0,
    },
    Size {
        width: 800.0,
        height: 2400.0,
    },
];
const CENTER: Point = Point::new(540.0, 960.0);
const MAX_SWIPES: usize = 10;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let wall_clock = WebClock::new();
    let runtime = Runtime::default();
    let config = ZoomableConfig::default()
        .min_scale(1.0)
        .max_scale(8.0)
        .double_tap_scale(DoubleTapScale::Toggle(3.0));
    let pager = HorizontalPager::new(&PAGES, VIEWPORT, &config, &runtime.frame_clock())
        .context("building gallery pages")?;

    let mut subscriptions = Vec::with_capacity(pager.page_count());
    for index in 0..pager.page_count() {
        if let Some(page) = pager.page(index) {
            page.set_on_double_tap(move |at| log::info!("page {index}: double tap at {at:?}"));
            subscriptions.push(page.state().subscribe(move |transform| {
                log::trace!("page {index}: {transform:?}");
            }));
        }
    }

    let mut robot = GestureRobot::new(&runtime, |event: &PointerEvent| {
        pager.on_pointer_event(event)
    });

    log::info!("swiping to the panorama");
    robot.drag(1, Point::new(900.0, 960.0), Point::new(200.0, 960.0), 12, 192);
    ensure!(pager.current_index() == 1, "swipe did not turn the page");

    log::info!("double tap to zoom in");
    robot.advance_time(400);
    robot.double_tap(Point::new(700.0, 800.0));
    ensure!(robot.wait_for_idle(), "double-tap zoom did not settle");
    report(&pager);

    log::info!("panning the zoomed page");
    robot.advance_time(400);
    robot.drag(1, Point::new(900.0, 960.0), Point::new(300.0, 1100.0), 12, 240);
    ensure!(robot.wait_for_idle(), "fling did not settle");
    report(&pager);

    log::info!("pinching out");
    robot.advance_time(400);
    robot.pinch(CENTER, 200.0, 500.0, 16, 256);
    report(&pager);

    let saved = pager
        .current_page()
        .map(|page| page.state().save())
        .context("pager has no current page")?;
    let bytes = saved.encode();
    log::info!("saved state: {} bytes, {:?}", bytes.len(), saved.to_array());
    let restored = ZoomState::restore(SavedZoomState::decode(&bytes)?, runtime.frame_clock())?;
    ensure!(
        restored.scale() == saved.scale,
        "restored scale {} != {}",
        restored.scale(),
        saved.scale
    );

    log::info!("double tap to zoom back out");
    robot.advance_time(400);
    robot.double_tap(CENTER);
    ensure!(robot.wait_for_idle(), "zoom-out did not settle");
    report(&pager);

    // The panorama is wider than the screen even unzoomed: swipes pan it
    // until its right edge, then the pager takes over.
    log::info!("swiping on to the last page");
    for swipe in 1..=MAX_SWIPES {
        robot.advance_time(400);
        robot.drag(1, Point::new(900.0, 960.0), Point::new(200.0, 960.0), 12, 192);
        robot.wait_for_idle();
        if pager.current_index() == 2 {
            log::info!("reached the last page after {swipe} swipe(s)");
            break;
        }
        report(&pager);
    }
    ensure!(pager.current_index() == 2, "swipes did not reach the last page");

    drop(robot);
    drop(subscriptions);
    log::info!("scenario replayed in {}ms", wall_clock.uptime_millis());
    Ok(())
}

fn report(pager: &HorizontalPager) {
    let Some(page) = pager.current_page() else {
        return;
    };
    let state = page.state();
    let transform = state.transform();
    log::info!(
        "page {}: scale {:.2}, translation ({:.1}, {:.1}), bounds ±({:.1}, {:.1})",
        pager.current_index(),
        transform.scale,
        transform.translation.x,
        transform.translation.y,
        state.bounds().max_x,
        state.bounds().max_y,
    );
    if let (Some(content), Some(viewport)) = (state.content_size(), state.viewport_size()) {
        log::debug!("affine {:?}", transform.to_affine(content, viewport));
    }
}
