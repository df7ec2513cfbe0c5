//! The page the controller drives.
//!
//! The controller never touches a terminal or a browser directly. It talks to
//! a [`Page`], which shows alerts, toggles the loading region and moves the
//! location. The loading region alone is split out as [`LoadingView`] because
//! the rotation task needs to own a handle to it.

/// Status region shown while a generation request is outstanding.
pub trait LoadingView: Send + Sync {
    /// Make the region visible.
    fn show_loading(&self);
    /// Replace the status line.
    fn set_loading_message(&self, message: &str);
    /// Hide the region.
    fn hide_loading(&self);
}

/// Everything the controller may do to the page besides editing the form.
pub trait Page: LoadingView {
    /// Blocking, user-facing notice.
    fn alert(&self, message: &str);
    /// Toggle the warning next to the length select.
    fn set_length_warning(&self, visible: bool);
    /// Move the page to `path`.
    fn navigate(&self, path: &str);
}
