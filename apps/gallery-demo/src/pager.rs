//! A minimal horizontal pager hosting one [`Zoomable`] per page.
//!
//! Every pointer event goes to the current page first. The pager only moves
//! when the page hands a horizontal drag back with
//! [`PointerDisposition::Released`], so a zoomed-in page pans until its edge
//! and only then lets the swipe turn the page.

use std::cell::Cell;

use zoomable::prelude::*;
use zoomable::PointerEventKind;
use zoomable_core::FrameClock;

/// Fraction of the page width a released swipe has to cover to turn the page.
const PAGE_TURN_FRACTION: f32 = 0.2;

#[derive(Clone, Copy, Debug)]
struct PagerDrag {
    start_x: f32,
    offset: f32,
}

pub struct HorizontalPager {
    pages: Vec<Zoomable>,
    page_size: Size,
    current: Cell<usize>,
    down_x: Cell<Option<f32>>,
    drag: Cell<Option<PagerDrag>>,
}

impl HorizontalPager {
    pub fn new(
        content_sizes: &[Size],
        page_size: Size,
        config: &ZoomableConfig,
        frame_clock: &FrameClock,
    ) -> Result<Self, zoomable::ZoomConfigError> {
        let pages = content_sizes
            .iter()
            .map(|&content| {
                let page = Zoomable::try_new(config.clone(), frame_clock.clone())?;
                page.set_layout(content, page_size);
                Ok(page)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            pages,
            page_size,
            current: Cell::new(0),
            down_x: Cell::new(None),
            drag: Cell::new(None),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current.get()
    }

    pub fn current_page(&self) -> Option<&Zoomable> {
        self.pages.get(self.current.get())
    }

    pub fn page(&self, index: usize) -> Option<&Zoomable> {
        self.pages.get(index)
    }

    /// Horizontal offset of the pager's own drag, if a swipe is in progress.
    pub fn drag_offset(&self) -> Option<f32> {
        self.drag.get().map(|drag| drag.offset)
    }

    pub fn on_pointer_event(&self, event: &PointerEvent) -> PointerDisposition {
        let Some(page) = self.current_page() else {
            return PointerDisposition::Ignored;
        };
        let disposition = page.on_pointer_event(event);

        match event.kind {
            PointerEventKind::Down => {
                if self.down_x.get().is_none() {
                    self.down_x.set(Some(event.position.x));
                }
            }
            PointerEventKind::Move if disposition == PointerDisposition::Released => {
                let start_x = match self.drag.get() {
                    Some(drag) => drag.start_x,
                    None => self.down_x.get().unwrap_or(event.position.x),
                };
                self.drag.set(Some(PagerDrag {
                    start_x,
                    offset: event.position.x - start_x,
                }));
            }
            PointerEventKind::Up => {
                self.down_x.set(None);
                if let Some(drag) = self.drag.take() {
                    self.settle(drag.offset);
                }
            }
            PointerEventKind::Cancel => {
                self.down_x.set(None);
                self.drag.set(None);
            }
            _ => {}
        }
        disposition
    }

    fn settle(&self, offset: f32) {
        let current = self.current.get();
        let threshold = self.page_size.width * PAGE_TURN_FRACTION;
        let target = if offset <= -threshold && current + 1 < self.pages.len() {
            current + 1
        } else if offset >= threshold && current > 0 {
            current - 1
        } else {
            log::debug!("swipe of {offset:.1}px snaps back to page {current}");
            return;
        };
        log::info!("page {current} -> {target}");
        // Pages that scroll out of view come back unzoomed.
        if let Some(page) = self.pages.get(current) {
            page.state().snap_reset();
        }
        self.current.set(target);
    }
}
