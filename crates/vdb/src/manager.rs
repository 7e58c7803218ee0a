//! Tracks in-flight loads and reports their lifecycle.

/// Callback receiving `(url, items_loaded, items_total)`.
pub type ProgressCallback = Box<dyn FnMut(&str, usize, usize)>;

/// Counts started and finished items and fires lifecycle callbacks.
///
/// Every [`item_start`](Self::item_start) must be matched by one
/// [`item_end`](Self::item_end), including after an error, or
/// `on_load` never fires.
#[derive(Default)]
pub struct LoadingManager {
    items_loaded: usize,
    items_total: usize,
    is_loading: bool,
    on_start: Option<ProgressCallback>,
    on_progress: Option<ProgressCallback>,
    on_load: Option<Box<dyn FnMut()>>,
    on_error: Option<Box<dyn FnMut(&str)>>,
}

impl LoadingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the first item of a batch starts.
    #[must_use]
    pub fn with_on_start(mut self, f: impl FnMut(&str, usize, usize) + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Called each time an item ends.
    #[must_use]
    pub fn with_on_progress(mut self, f: impl FnMut(&str, usize, usize) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Called when every started item has ended.
    #[must_use]
    pub fn with_on_load(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_load = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_on_error(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn item_start(&mut self, url: &str) {
        self.items_total += 1;
        if !self.is_loading {
            if let Some(f) = self.on_start.as_mut() {
                f(url, self.items_loaded, self.items_total);
            }
        }
        self.is_loading = true;
    }

    pub fn item_end(&mut self, url: &str) {
        self.items_loaded += 1;
        if let Some(f) = self.on_progress.as_mut() {
            f(url, self.items_loaded, self.items_total);
        }
        if self.items_loaded == self.items_total {
            self.is_loading = false;
            if let Some(f) = self.on_load.as_mut() {
                f();
            }
        }
    }

    pub fn item_error(&mut self, url: &str) {
        if let Some(f) = self.on_error.as_mut() {
            f(url);
        }
    }

    pub fn items_loaded(&self) -> usize {
        self.items_loaded
    }

    pub fn items_total(&self) -> usize {
        self.items_total
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }
}

impl std::fmt::Debug for LoadingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingManager")
            .field("items_loaded", &self.items_loaded)
            .field("items_total", &self.items_total)
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}
