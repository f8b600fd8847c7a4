//! Shared fixtures for unit tests.

use crate::content::{CardRenderer, ContentRef, ContentUnit, MarkdownCard};
use crate::provider::{DirtyState, Provider};
use std::cell::Cell;
use std::time::Duration;

/// One 60 Hz-ish frame.
pub const FRAME: Duration = Duration::from_millis(16);

/// Renderer recording every call. Handles are render serial numbers.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub extent: f32,
    /// Ids of the units passed to `render`, in call order.
    pub rendered: Vec<String>,
    /// Number of `render` calls that received an existing handle.
    pub reused: usize,
    pub released: usize,
    serial: usize,
}

impl RecordingRenderer {
    pub fn with_extent(extent: f32) -> Self {
        RecordingRenderer {
            extent,
            ..RecordingRenderer::default()
        }
    }
}

impl CardRenderer for RecordingRenderer {
    type Handle = usize;

    fn render(&mut self, model: &dyn ContentUnit, existing: Option<usize>) -> usize {
        self.rendered.push(model.id().to_string());
        if let Some(handle) = existing {
            self.reused += 1;
            return handle;
        }
        self.serial += 1;
        self.serial
    }

    fn extent(&self, _handle: &usize) -> f32 {
        self.extent
    }

    fn release(&mut self, _handle: usize) {
        self.released += 1;
    }
}

/// `count` markdown cards with ids `prefix.0`, `prefix.1`, ...
pub fn cards(prefix: &str, count: usize) -> Vec<ContentRef> {
    (0..count)
        .map(|i| MarkdownCard::new(format!("{prefix}.{i}"), prefix, "").into_ref())
        .collect()
}

pub fn ids(models: &[ContentRef]) -> Vec<String> {
    models.iter().map(|m| m.id().to_string()).collect()
}

/// Provider serving `pages`, each as a single card whose id is the logical
/// page id. Any other page comes back empty.
pub fn page_provider(id: &str, title: &str, pages: &[&str]) -> Provider {
    let provider_id = id.to_string();
    let pages: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
    Provider::builder(id, title)
        .page_models(move |page| {
            if pages.iter().any(|p| p == page) {
                Ok(Some(vec![MarkdownCard::new(
                    format!("{provider_id}:{page}"),
                    page,
                    "",
                )
                .into_ref()]))
            } else {
                Ok(None)
            }
        })
        .build()
}

/// Dirty-state owner toggled by tests.
#[derive(Debug, Default)]
pub struct DirtyFlag {
    pub dirty: Cell<bool>,
    pub commits: Cell<usize>,
    pub rollbacks: Cell<usize>,
    /// Page ids passed to `has_uncommitted_state`.
    pub queried: std::cell::RefCell<Vec<String>>,
}

impl DirtyState for DirtyFlag {
    fn has_uncommitted_state(&self, page_id: &str) -> bool {
        self.queried.borrow_mut().push(page_id.to_string());
        self.dirty.get()
    }

    fn commit_and_flush(&self, _page_id: &str) {
        self.commits.set(self.commits.get() + 1);
        self.dirty.set(false);
    }

    fn rollback(&self, _page_id: &str) {
        self.rollbacks.set(self.rollbacks.get() + 1);
        self.dirty.set(false);
    }
}
