use tracing::info;

use crate::dispatch::Dispatcher;
use crate::error::EmitError;
use crate::initialize_tracing;
use crate::names::Name;
use crate::signal::WindowSignal;
use crate::styles::StyleSheet;
use crate::widget::{Widget, Window};

/// The state of one application: its identity, style sheet, windows, and the
/// [`Dispatcher`] routing its widgets' signals.
///
/// Nothing here is global. Tests can create as many independent apps as they
/// like.
///
/// ## Logging/Tracing
///
/// [`with_tracing()`](Self::with_tracing) installs a global
/// `tracing_subscriber` Subscriber that honors `RUST_LOG`. Emissions are
/// logged at the `trace` level, so `RUST_LOG=widget_signals=trace` prints
/// every signal as it is raised. The subscriber is installed with
/// `try_init()`, so a subscriber installed beforehand takes precedence.
///
/// The `tracing-output` Cargo feature controls whether the subscriber is
/// available. It is included in `default-features`.
#[derive(Debug)]
pub struct App {
    name: Name,
    about: String,
    style_sheet: StyleSheet,
    dispatcher: Dispatcher,
    windows: Vec<Widget<Window>>,
}

impl App {
    /// Returns a new application named `name`.
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            about: String::new(),
            style_sheet: StyleSheet::default(),
            dispatcher: Dispatcher::new(),
            windows: Vec::new(),
        }
    }

    /// Sets the text shown in the application's about box and returns self.
    #[must_use]
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Sets the application's style sheet and returns self.
    #[must_use]
    pub fn with_style_sheet(mut self, style_sheet: StyleSheet) -> Self {
        self.style_sheet = style_sheet;
        self
    }

    /// Installs a global `tracing` Subscriber and returns self.
    #[must_use]
    pub fn with_tracing(self) -> Self {
        initialize_tracing();
        self
    }

    /// Returns the name of this application.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the about text of this application.
    #[must_use]
    pub fn about(&self) -> &str {
        &self.about
    }

    /// Returns the application's style sheet.
    #[must_use]
    pub const fn style_sheet(&self) -> &StyleSheet {
        &self.style_sheet
    }

    /// Returns exclusive access to the application's style sheet.
    pub fn style_sheet_mut(&mut self) -> &mut StyleSheet {
        &mut self.style_sheet
    }

    /// Returns the dispatcher routing this application's signals.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Opens a new window named `name`.
    pub fn new_window(&mut self, name: impl Into<Name>) -> Widget<Window> {
        let window = self.dispatcher.create::<Window>(name);
        info!(app = %self.name, window = %window.name(), "window opened");
        self.windows.push(window.clone());
        window
    }

    /// Returns the open windows, in the order they were opened.
    #[must_use]
    pub fn windows(&self) -> &[Widget<Window>] {
        &self.windows
    }

    /// Asks `window` to close.
    ///
    /// Emits [`WindowSignal::CloseRequested`] and then closes the window
    /// with [`close_window()`](Self::close_window). Callback failures are
    /// reported, but do not keep the window open.
    ///
    /// # Errors
    ///
    /// Returns the first error from emitting `CloseRequested` or from closing
    /// the window.
    pub fn request_close(&mut self, window: &Widget<Window>) -> Result<(), EmitError> {
        let requested = self
            .dispatcher
            .emit(window, WindowSignal::CloseRequested, ());
        if let Err(EmitError::InvalidWidget(err)) = requested {
            return Err(err.into());
        }
        let closed = self.close_window(window);
        requested.and(closed)
    }

    /// Closes `window`: emits [`WindowSignal::Closed`], then destroys the
    /// window and every widget it owns.
    ///
    /// # Errors
    ///
    /// - [`EmitError::InvalidWidget`]: `window` is not open.
    /// - [`EmitError::Callbacks`]: a `Closed` callback failed. The window is
    ///   still closed.
    pub fn close_window(&mut self, window: &Widget<Window>) -> Result<(), EmitError> {
        let closed = self.dispatcher.emit(window, WindowSignal::Closed, ());
        if let Err(EmitError::InvalidWidget(err)) = closed {
            return Err(err.into());
        }
        // A `Closed` callback may have destroyed the window already.
        if self.dispatcher.is_live(window) {
            self.dispatcher.destroy_widget(window)?;
        }
        self.windows.retain(|open| open != window);
        info!(app = %self.name, window = %window.name(), "window closed");
        closed
    }

    /// Closes every open window, most recently opened first.
    ///
    /// # Errors
    ///
    /// Returns the errors reported by each window that failed to close
    /// cleanly. Every window is closed regardless.
    pub fn close_all(&mut self) -> Result<(), Vec<EmitError>> {
        let mut errors = Vec::new();
        while let Some(window) = self.windows.last().cloned() {
            if let Err(err) = self.close_window(&window) {
                errors.push(err);
            }
            // Ensure progress if the window was destroyed out from under us.
            self.windows.retain(|open| *open != window);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
