use super::viewer::{classify_click, ClickOutcome, Direction, Key, Point, Rect, Viewer};
use crate::models::{Category, MediaItem};

/// Initial grid size and the step for "show more"/"show less".
pub const PAGE_SIZE: usize = 6;

/// Client-side gallery: category filter, pagination window and the viewer.
#[derive(Debug, Clone)]
pub struct GalleryState {
    items: Vec<MediaItem>,
    error: Option<String>,
    active_category: Category,
    display_count: usize,
    viewer: Option<Viewer>,
}

impl GalleryState {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            error: None,
            active_category: Category::All,
            display_count: PAGE_SIZE,
            viewer: None,
        }
    }

    pub fn with_error(items: Vec<MediaItem>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(items)
        }
    }

    /// Inline message shown when loading failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn active_category(&self) -> Category {
        self.active_category
    }

    /// Switches category and resets the window to its initial size.
    pub fn set_category(&mut self, category: Category) {
        self.active_category = category;
        self.display_count = PAGE_SIZE;
    }

    pub fn filtered(&self) -> Vec<&MediaItem> {
        self.items
            .iter()
            .filter(|item| {
                self.active_category == Category::All
                    || item.category.as_str().eq_ignore_ascii_case(self.active_category.as_str())
            })
            .collect()
    }

    pub fn displayed(&self) -> Vec<&MediaItem> {
        let mut filtered = self.filtered();
        filtered.truncate(self.display_count);
        filtered
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }

    pub fn has_more(&self) -> bool {
        self.display_count < self.filtered().len()
    }

    pub fn can_show_less(&self) -> bool {
        self.display_count > PAGE_SIZE
    }

    pub fn show_more(&mut self) {
        if self.has_more() {
            self.display_count += PAGE_SIZE;
        }
    }

    pub fn show_less(&mut self) {
        self.display_count = self.display_count.saturating_sub(PAGE_SIZE).max(PAGE_SIZE);
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    /// Opens the viewer on the post with `id`. Returns false if no such post exists.
    pub fn open(&mut self, id: &str, initial_url: Option<&str>) -> bool {
        match self.items.iter().find(|item| item.id == id) {
            Some(post) => {
                self.viewer = Some(Viewer::open(post.clone(), initial_url));
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.viewer = None;
    }

    pub fn navigate(&mut self, direction: Direction) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.navigate(direction);
        }
    }

    pub fn select(&mut self, index: usize) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.select(index);
        }
    }

    /// Keyboard handling; keys are ignored while the viewer is closed.
    pub fn handle_key(&mut self, key: Key) {
        if self.viewer.is_none() {
            return;
        }
        match key {
            Key::ArrowLeft => self.navigate(Direction::Prev),
            Key::ArrowRight => self.navigate(Direction::Next),
            Key::Escape => self.close(),
            Key::Other => {}
        }
    }

    pub fn handle_click(&mut self, click: Point, image: Rect) -> ClickOutcome {
        let Some(viewer) = self.viewer.as_ref() else {
            return ClickOutcome::Ignore;
        };
        let outcome = classify_click(click, image, viewer.is_navigable());
        match outcome {
            ClickOutcome::Navigate(direction) => self.navigate(direction),
            ClickOutcome::Close => self.close(),
            ClickOutcome::Ignore => {}
        }
        outcome
    }
}
