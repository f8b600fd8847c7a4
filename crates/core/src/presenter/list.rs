//! Virtualized vertical stack of content units.
//!
//! Geometry lives in an [`understory_virtual_list::VirtualList`] over a
//! [`PrefixSumExtentModel`]; this type owns the units, their rendered handles
//! and the renderer calls. Each unit occupies its extent plus the item spacing
//! in the model, so the trailing spacing of the last unit is not content.
//!
//! Only units intersecting the viewport (grown by the overscan distance on both
//! sides) hold a rendered handle. Extents start at an estimate and are replaced
//! by the renderer's measurement once a unit has been rendered.
//!
//! Mutations only mark the stack dirty. The layout pass runs once per frame
//! through [`VirtualStack::layout_if_dirty`], so several mutations within a
//! frame cost a single layout.
//!
//! ```text
//!   offset 0 ─┬───────────────┐
//!             │ unit 0        │  released (above overscan)
//!             ├── spacing ────┤
//!   scroll ───┼───────────────┼── viewport top
//!             │ unit 1        │  realized
//!             │ unit 2        │  realized
//!             ├───────────────┼── viewport bottom
//!             │ unit 3        │  realized (overscan)
//!             │ unit 4        │  released
//!             └───────────────┘
//! ```

use crate::content::{CardRenderer, ContentRef};
use std::ops::Range;
use understory_virtual_list::{ExtentModel, PrefixSumExtentModel, VirtualList};

type StackModel = PrefixSumExtentModel<f32>;

#[derive(Debug)]
pub struct VirtualStack<H> {
    items: Vec<ContentRef>,
    slots: Vec<Option<H>>,
    list: VirtualList<StackModel>,
    spacing: f32,
    estimated_extent: f32,
    /// Cached model total, minus the trailing spacing.
    content_extent: f32,
    realized: Range<usize>,
    dirty: bool,
}

impl<H> VirtualStack<H> {
    pub fn new(spacing: f32, overscan: f32, estimated_extent: f32) -> Self {
        VirtualStack {
            items: Vec::new(),
            slots: Vec::new(),
            list: VirtualList::new(StackModel::new(), 0.0, overscan.max(0.0)),
            spacing: spacing.max(0.0),
            estimated_extent: estimated_extent.max(0.0),
            content_extent: 0.0,
            realized: 0..0,
            dirty: false,
        }
    }

    pub fn items(&self) -> &[ContentRef] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Indices currently holding a rendered handle.
    pub fn realized_range(&self) -> Range<usize> {
        self.realized.clone()
    }

    pub fn handle(&self, index: usize) -> Option<&H> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Replaces every item. Existing handles are released immediately.
    pub fn set_items<R>(&mut self, items: Vec<ContentRef>, renderer: &mut R)
    where
        R: CardRenderer<Handle = H>,
    {
        self.release_all(renderer);
        let slot_extent = self.estimated_extent + self.spacing;
        self.list
            .model_mut()
            .rebuild(0..items.len(), &|_: &usize| slot_extent);
        self.slots = items.iter().map(|_| None).collect();
        self.items = items;
        self.refresh_content_extent();
        self.clamp_scroll();
        self.mark_dirty();
    }

    pub fn clear<R>(&mut self, renderer: &mut R)
    where
        R: CardRenderer<Handle = H>,
    {
        self.set_items(Vec::new(), renderer);
    }

    pub fn set_viewport_extent(&mut self, extent: f32) {
        let extent = extent.max(0.0);
        if extent != self.list.viewport_extent() {
            self.list.set_viewport_extent(extent);
            self.mark_dirty();
        }
    }

    pub fn viewport_extent(&self) -> f32 {
        self.list.viewport_extent()
    }

    /// Height of all items and the spacing between them.
    pub fn content_extent(&self) -> f32 {
        self.content_extent
    }

    pub fn max_scroll_offset(&self) -> f32 {
        (self.content_extent - self.list.viewport_extent()).max(0.0)
    }

    /// Distance scrolled from the top.
    pub fn scroll_offset(&self) -> f32 {
        self.list.scroll_offset()
    }

    pub fn set_scroll_offset(&mut self, offset: f32) {
        let offset = offset.clamp(0.0, self.max_scroll_offset());
        if offset != self.list.scroll_offset() {
            self.list.set_scroll_offset(offset);
            self.mark_dirty();
        }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_offset(self.list.scroll_offset() + delta);
    }

    /// Scroll position where `1.0` is the top and `0.0` the bottom.
    pub fn normalized_position(&self) -> f32 {
        let max = self.max_scroll_offset();
        if max <= 0.0 {
            return 1.0;
        }
        1.0 - self.list.scroll_offset() / max
    }

    pub fn set_normalized_position(&mut self, position: f32) {
        let max = self.max_scroll_offset();
        self.set_scroll_offset((1.0 - position.clamp(0.0, 1.0)) * max);
    }

    pub fn scroll_to_top(&mut self) {
        self.set_scroll_offset(0.0);
    }

    pub fn layout_if_dirty<R>(&mut self, renderer: &mut R) -> bool
    where
        R: CardRenderer<Handle = H>,
    {
        if !self.dirty {
            return false;
        }
        self.layout(renderer);
        true
    }

    /// Realizes the visible items, measures them and releases the rest.
    pub fn layout<R>(&mut self, renderer: &mut R)
    where
        R: CardRenderer<Handle = H>,
    {
        let strip = self.list.visible_strip();
        let wanted = strip.start..strip.end;

        for index in self.realized.clone() {
            if !wanted.contains(&index) {
                if let Some(handle) = self.slots[index].take() {
                    renderer.release(handle);
                }
            }
        }

        for index in wanted.clone() {
            if self.slots[index].is_none() {
                let handle = renderer.render(&*self.items[index], None);
                self.measure(index, renderer.extent(&handle));
                self.slots[index] = Some(handle);
            }
        }

        self.realized = wanted;
        self.refresh_content_extent();
        self.clamp_scroll();
        self.dirty = false;
    }

    /// Renders every realized item again over its existing handle.
    ///
    /// The scroll offset is left untouched; the next layout pass clamps it if
    /// the content shrank.
    pub fn rebind<R>(&mut self, renderer: &mut R)
    where
        R: CardRenderer<Handle = H>,
    {
        for index in self.realized.clone() {
            let existing = self.slots[index].take();
            let handle = renderer.render(&*self.items[index], existing);
            self.measure(index, renderer.extent(&handle));
            self.slots[index] = Some(handle);
        }
        self.refresh_content_extent();
        self.mark_dirty();
    }

    fn release_all<R>(&mut self, renderer: &mut R)
    where
        R: CardRenderer<Handle = H>,
    {
        for slot in &mut self.slots {
            if let Some(handle) = slot.take() {
                renderer.release(handle);
            }
        }
        self.realized = 0..0;
    }

    fn measure(&mut self, index: usize, extent: f32) {
        self.list
            .model_mut()
            .set_extent(index, extent.max(0.0) + self.spacing);
    }

    fn refresh_content_extent(&mut self) {
        self.content_extent = if self.items.is_empty() {
            0.0
        } else {
            (self.list.model_mut().total_extent() - self.spacing).max(0.0)
        };
    }

    fn clamp_scroll(&mut self) {
        let offset = self.list.scroll_offset().clamp(0.0, self.max_scroll_offset());
        self.list.set_scroll_offset(offset);
    }
}
