use crate::models::MediaItem;

/// Vertical band around the image centre in which side clicks navigate.
pub const NAV_BAND_HALF_HEIGHT: f64 = 100.0;
/// Width of the click zone outside each image edge.
pub const NAV_ZONE_WIDTH: f64 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// On-screen bounds of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// What a click inside the open viewer resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignore,
    Navigate(Direction),
    Close,
}

/// Classifies a click given the image bounds.
///
/// Clicks on the image do nothing. For navigable carousels, clicks within
/// `NAV_BAND_HALF_HEIGHT` of the image's vertical centre and within
/// `NAV_ZONE_WIDTH` outside the left/right edge navigate. Anything else closes.
pub fn classify_click(click: Point, image: Rect, navigable: bool) -> ClickOutcome {
    if image.contains(click) {
        return ClickOutcome::Ignore;
    }

    let in_band = (click.y - image.center_y()).abs() <= NAV_BAND_HALF_HEIGHT;
    if navigable && in_band {
        if click.x >= image.left - NAV_ZONE_WIDTH && click.x < image.left {
            return ClickOutcome::Navigate(Direction::Prev);
        }
        if click.x > image.right() && click.x <= image.right() + NAV_ZONE_WIDTH {
            return ClickOutcome::Navigate(Direction::Next);
        }
    }
    ClickOutcome::Close
}

/// Full-screen view of a single post.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    post: MediaItem,
    index: usize,
}

impl Viewer {
    /// Opens on the post's primary image, or for carousels on the child whose
    /// URL matches `initial_url` (first child otherwise).
    pub fn open(post: MediaItem, initial_url: Option<&str>) -> Self {
        let index = match (&post.items, initial_url) {
            (Some(items), Some(url)) if post.is_carousel() => {
                items.iter().position(|i| i.url == url).unwrap_or(0)
            }
            _ => 0,
        };
        Self { post, index }
    }

    pub fn post(&self) -> &MediaItem {
        &self.post
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn len(&self) -> usize {
        if self.post.is_carousel() {
            self.post.items.as_ref().map_or(0, Vec::len)
        } else {
            0
        }
    }

    /// Navigation is only meaningful for carousels with more than one child.
    pub fn is_navigable(&self) -> bool {
        self.len() > 1
    }

    pub fn current_url(&self) -> &str {
        match &self.post.items {
            Some(items) if self.post.is_carousel() => items
                .get(self.index)
                .map(|i| i.url.as_str())
                .unwrap_or(self.post.url.as_str()),
            _ => self.post.url.as_str(),
        }
    }

    /// Moves one step with wraparound. Returns the new index.
    pub fn navigate(&mut self, direction: Direction) -> usize {
        let len = self.len();
        if len == 0 {
            return self.index;
        }
        self.index = match direction {
            Direction::Next => (self.index + 1) % len,
            Direction::Prev => (self.index + len - 1) % len,
        };
        self.index
    }

    /// Jumps to a specific child (carousel dots). Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.len() {
            self.index = index;
            true
        } else {
            false
        }
    }
}
