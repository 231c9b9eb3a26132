//! Signal enumerations and emission payloads.
//!
//! Every widget family has its own signal enumeration. A [`Widget<K>`] only
//! accepts the signals of its kind, so wiring a slider callback to a button
//! is a compile error rather than a silently ignored integer code.
//!
//! [`Widget<K>`]: crate::widget::Widget
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// A signal that a widget can raise.
///
/// This trait is implemented by each per-kind signal enumeration in this
/// module. It is not meant to be implemented outside of this crate.
pub trait Signal: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static {
    /// Returns this signal wrapped in the kind-erased [`AnySignal`].
    fn into_any(self) -> AnySignal;

    /// Returns the name of this signal, e.g. `"clicked"`.
    fn name(self) -> &'static str;
}

macro_rules! signals {
    ($(
        $(#[$meta:meta])*
        $signal:ident => $any:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $name:literal),+ $(,)?
        }
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
            pub enum $signal {
                $($(#[$variant_meta])* $variant,)+
            }

            impl $signal {
                /// Every signal of this kind, in declaration order.
                pub const ALL: &'static [Self] = &[$(Self::$variant),+];
            }

            impl Signal for $signal {
                fn into_any(self) -> AnySignal {
                    AnySignal::$any(self)
                }

                fn name(self) -> &'static str {
                    match self {
                        $(Self::$variant => $name,)+
                    }
                }
            }

            impl Display for $signal {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }

            impl From<$signal> for AnySignal {
                fn from(signal: $signal) -> Self {
                    signal.into_any()
                }
            }
        )+

        /// A signal of any widget kind.
        ///
        /// The dispatcher keys its observer table with this type.
        #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
        pub enum AnySignal {
            $(
                #[doc = concat!("A [`", stringify!($signal), "`].")]
                $any($signal),
            )+
        }

        impl AnySignal {
            /// Returns the name of the wrapped signal.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$any(signal) => signal.name(),)+
                }
            }
        }
    };
}

signals! {
    /// Signals raised by buttons and check boxes.
    ButtonSignal => Button {
        /// The button was pressed down.
        Pressed => "pressed",
        /// The button was released.
        Released => "released",
        /// The button was pressed and released while hovered.
        Clicked => "clicked",
        /// A checkable button changed its checked state.
        Toggled => "toggled",
    }

    /// Signals raised by sliders and scroll bars.
    SliderSignal => Slider {
        /// The value changed. While tracking, this is raised during a drag.
        ValueChanged => "value-changed",
        /// The user started dragging the thumb.
        DragStarted => "drag-started",
        /// The user released the thumb.
        DragEnded => "drag-ended",
        /// The thumb moved without the value being committed.
        Moved => "moved",
    }

    /// Signals raised by single-line text fields.
    TextFieldSignal => TextField {
        /// Editing finished, usually via enter.
        Done => "done",
        /// The field lost focus.
        Deselected => "deselected",
        /// Text was inserted.
        Inserted => "inserted",
        /// A character before the cursor was removed.
        Backspaced => "backspaced",
        /// A character after the cursor was removed.
        Deleted => "deleted",
        /// The contents were cleared.
        Cleared => "cleared",
    }

    /// Signals raised by spin boxes.
    SpinBoxSignal => SpinBox {
        /// The value changed.
        ValueChanged => "value-changed",
    }

    /// Signals raised by combo boxes.
    ComboBoxSignal => ComboBox {
        /// An item was selected.
        Selected => "selected",
    }

    /// Signals raised by menu actions.
    ActionSignal => Action {
        /// The action was triggered from a menu or its shortcut.
        Triggered => "triggered",
    }

    /// Signals raised by tab views. The payload is the index of the tab.
    TabViewSignal => TabView {
        /// A tab was selected.
        Selected => "tab-selected",
        /// A tab was unselected.
        Unselected => "tab-unselected",
        /// A collapsed tab was opened.
        Opened => "tab-opened",
        /// An open tab was collapsed, hiding its contents.
        Collapsed => "tab-collapsed",
    }

    /// Signals raised by dialogs.
    DialogSignal => Dialog {
        /// The dialog was accepted.
        Accepted => "accepted",
        /// The dialog was dismissed.
        Canceled => "canceled",
    }

    /// Signals raised by top-level windows.
    WindowSignal => Window {
        /// Closing was requested by the user or the application.
        CloseRequested => "close-requested",
        /// The window has closed.
        Closed => "closed",
        /// The window was resized.
        Resized => "resized",
    }
}

/// Signal-specific data attached to an emission.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    /// The signal carries no data.
    #[default]
    None,
    /// An integer, such as the data attached to a menu action.
    Int(i64),
    /// A floating point value, such as a slider position.
    Float(f64),
    /// Text, such as a text field's contents.
    Text(String),
    /// An index, such as a combo box selection.
    Index(usize),
    /// A boolean, such as a check box's state.
    Bool(bool),
}

impl Payload {
    /// Returns the integer, if this is [`Payload::Int`].
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Payload::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float, if this is [`Payload::Float`] or
    /// [`Payload::Int`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Payload::Float(value) => Some(*value),
            Payload::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the text, if this is [`Payload::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the index, if this is [`Payload::Index`].
    #[must_use]
    pub const fn as_index(&self) -> Option<usize> {
        match self {
            Payload::Index(index) => Some(*index),
            _ => None,
        }
    }

    /// Returns the boolean, if this is [`Payload::Bool`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Payload::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns true if this payload carries no data.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::None => f.write_str("none"),
            Payload::Int(value) => Display::fmt(value, f),
            Payload::Float(value) => Display::fmt(value, f),
            Payload::Text(text) => Debug::fmt(text, f),
            Payload::Index(index) => write!(f, "#{index}"),
            Payload::Bool(value) => Display::fmt(value, f),
        }
    }
}

impl From<()> for Payload {
    fn from((): ()) -> Self {
        Payload::None
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Int(value)
    }
}

impl From<i32> for Payload {
    fn from(value: i32) -> Self {
        Payload::Int(i64::from(value))
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<f32> for Payload {
    fn from(value: f32) -> Self {
        Payload::Float(f64::from(value))
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl<'a> From<&'a str> for Payload {
    fn from(value: &'a str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<usize> for Payload {
    fn from(value: usize) -> Self {
        Payload::Index(value)
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}
