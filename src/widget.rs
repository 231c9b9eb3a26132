//! Widget handles and kinds.

use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;
use std::sync::atomic::{self, AtomicBool, AtomicU64};
use std::sync::Arc;

use crate::error::{InvalidReason, InvalidWidgetError};
use crate::names::Name;
use crate::signal::{
    ActionSignal, ButtonSignal, ComboBoxSignal, DialogSignal, Signal, SliderSignal,
    SpinBoxSignal, TabViewSignal, TextFieldSignal, WindowSignal,
};

/// The unique id of a widget.
///
/// Each widget is guaranteed to have a unique [`WidgetId`] across the
/// lifetime of the process, even across independent
/// [`Dispatcher`](crate::dispatch::Dispatcher)s.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Ord, PartialOrd)]
pub struct WidgetId(u64);

impl WidgetId {
    pub(crate) fn unique() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, atomic::Ordering::Acquire))
    }
}

impl Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// The kind tag of a widget.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Ord, PartialOrd)]
pub enum Kind {
    /// A top-level window.
    Window,
    /// A push button.
    Button,
    /// A checkable button.
    CheckBox,
    /// A menu entry or toolbar action.
    Action,
    /// A slider.
    Slider,
    /// A scroll bar.
    ScrollBar,
    /// A single-line text field.
    TextField,
    /// A numeric spin box.
    SpinBox,
    /// A drop-down list.
    ComboBox,
    /// A set of tabs over stacked frames.
    TabView,
    /// A modal dialog.
    Dialog,
}

impl Kind {
    /// Returns the lowercase name of this kind, as used by style sheet
    /// selectors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Window => "window",
            Kind::Button => "button",
            Kind::CheckBox => "checkbox",
            Kind::Action => "action",
            Kind::Slider => "slider",
            Kind::ScrollBar => "scrollbar",
            Kind::TextField => "textfield",
            Kind::SpinBox => "spinbox",
            Kind::ComboBox => "combobox",
            Kind::TabView => "tabview",
            Kind::Dialog => "dialog",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A statically known widget kind.
///
/// Each kind names the signal enumeration its widgets raise. The marker
/// types in this module are never constructed; they only parameterize
/// [`Widget`].
pub trait WidgetKind: Send + Sync + 'static {
    /// The signals widgets of this kind can raise.
    type Signal: Signal;

    /// The runtime tag of this kind.
    const KIND: Kind;
}

macro_rules! kinds {
    ($($(#[$meta:meta])* $marker:ident => $signal:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            pub enum $marker {}

            impl WidgetKind for $marker {
                type Signal = $signal;

                const KIND: Kind = Kind::$marker;
            }
        )+
    };
}

kinds! {
    /// Marks a [`Widget`] as a top-level window.
    Window => WindowSignal,
    /// Marks a [`Widget`] as a push button.
    Button => ButtonSignal,
    /// Marks a [`Widget`] as a check box.
    CheckBox => ButtonSignal,
    /// Marks a [`Widget`] as a menu action.
    Action => ActionSignal,
    /// Marks a [`Widget`] as a slider.
    Slider => SliderSignal,
    /// Marks a [`Widget`] as a scroll bar.
    ScrollBar => SliderSignal,
    /// Marks a [`Widget`] as a text field.
    TextField => TextFieldSignal,
    /// Marks a [`Widget`] as a spin box.
    SpinBox => SpinBoxSignal,
    /// Marks a [`Widget`] as a combo box.
    ComboBox => ComboBoxSignal,
    /// Marks a [`Widget`] as a tab view.
    TabView => TabViewSignal,
    /// Marks a [`Widget`] as a dialog.
    Dialog => DialogSignal,
}

#[derive(Debug)]
struct WidgetInfo {
    id: WidgetId,
    name: Name,
    kind: Kind,
    destroyed: AtomicBool,
}

/// A handle to a widget of kind `K`.
///
/// Handles are cheap to clone and remain valid to hold after the widget is
/// destroyed; operations on a destroyed widget fail with
/// [`InvalidWidgetError`](crate::error::InvalidWidgetError).
pub struct Widget<K> {
    any: AnyWidget,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Widget<K>
where
    K: WidgetKind,
{
    pub(crate) fn new(name: Name) -> Self {
        Self::from_any(AnyWidget::new(name, K::KIND))
    }

    fn from_any(any: AnyWidget) -> Self {
        debug_assert_eq!(any.kind(), K::KIND);
        Self {
            any,
            _kind: PhantomData,
        }
    }
}

impl<K> Widget<K> {
    /// Returns this widget with its kind erased.
    #[must_use]
    pub fn as_any(&self) -> &AnyWidget {
        &self.any
    }

    /// Returns the unique id of this widget.
    #[must_use]
    pub fn id(&self) -> WidgetId {
        self.any.id()
    }

    /// Returns the name this widget was created with.
    #[must_use]
    pub fn name(&self) -> &Name {
        self.any.name()
    }

    /// Returns the kind tag of this widget.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.any.kind()
    }

    /// Returns true once the widget has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.any.is_destroyed()
    }
}

impl<K> Clone for Widget<K> {
    fn clone(&self) -> Self {
        Self {
            any: self.any.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> Debug for Widget<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.any.info.id)
            .field("name", &&*self.any.info.name)
            .field("kind", &self.any.info.kind)
            .finish()
    }
}

impl<K> Eq for Widget<K> {}

impl<K> PartialEq for Widget<K> {
    fn eq(&self, other: &Self) -> bool {
        self.any == other.any
    }
}

impl<K> AsRef<AnyWidget> for Widget<K> {
    fn as_ref(&self) -> &AnyWidget {
        &self.any
    }
}

/// A widget handle whose kind is only known at runtime.
#[derive(Clone)]
pub struct AnyWidget {
    info: Arc<WidgetInfo>,
}

impl AnyWidget {
    fn new(name: Name, kind: Kind) -> Self {
        Self {
            info: Arc::new(WidgetInfo {
                id: WidgetId::unique(),
                name,
                kind,
                destroyed: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the unique id of this widget.
    #[must_use]
    pub fn id(&self) -> WidgetId {
        self.info.id
    }

    /// Returns the name this widget was created with.
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.info.name
    }

    /// Returns the kind tag of this widget.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.info.kind
    }

    /// Returns true once the widget has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.info.destroyed.load(atomic::Ordering::Acquire)
    }

    pub(crate) fn mark_destroyed(&self) {
        self.info.destroyed.store(true, atomic::Ordering::Release);
    }

    /// Returns the error describing why this widget is not usable by a
    /// dispatcher that has no record of it.
    pub(crate) fn invalid(&self) -> InvalidWidgetError {
        InvalidWidgetError {
            widget: self.id(),
            reason: if self.is_destroyed() {
                InvalidReason::Destroyed
            } else {
                InvalidReason::Unknown
            },
        }
    }

    /// Returns a typed handle if this widget is of kind `K`.
    #[must_use]
    pub fn downcast<K>(&self) -> Option<Widget<K>>
    where
        K: WidgetKind,
    {
        (self.info.kind == K::KIND).then(|| Widget::from_any(self.clone()))
    }
}

impl Debug for AnyWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyWidget")
            .field("id", &self.info.id)
            .field("name", &&*self.info.name)
            .field("kind", &self.info.kind)
            .finish()
    }
}

impl Eq for AnyWidget {}

impl PartialEq for AnyWidget {
    fn eq(&self, other: &Self) -> bool {
        self.info.id == other.info.id
    }
}

impl<K> PartialEq<Widget<K>> for AnyWidget {
    fn eq(&self, other: &Widget<K>) -> bool {
        *self == other.any
    }
}

impl AsRef<AnyWidget> for AnyWidget {
    fn as_ref(&self) -> &AnyWidget {
        self
    }
}

impl<K> From<Widget<K>> for AnyWidget {
    fn from(widget: Widget<K>) -> Self {
        widget.any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = WidgetId::unique();
        let b = WidgetId::unique();
        assert_ne!(a, b);
    }

    #[test]
    fn downcast_checks_kind() {
        let button = Widget::<Button>::new(Name::new("ok"));
        let any = button.as_any().clone();
        assert_eq!(any.kind(), Kind::Button);
        assert_eq!(any.downcast::<Button>(), Some(button.clone()));
        assert!(any.downcast::<CheckBox>().is_none());
        assert_eq!(any, button);
        assert_eq!(any.invalid().reason, InvalidReason::Unknown);
        any.mark_destroyed();
        assert!(button.is_destroyed());
        assert_eq!(any.invalid().reason, InvalidReason::Destroyed);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Kind::ComboBox.to_string(), "combobox");
        assert_eq!(<ScrollBar as WidgetKind>::KIND, Kind::ScrollBar);
        assert_eq!(Kind::TabView.name(), "tabview");
        assert_eq!(Widget::<TabView>::new(Name::new("tabs")).kind(), Kind::TabView);
    }
}
