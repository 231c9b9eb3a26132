//! Routing widget signals to application callbacks.
//!
//! A [`Dispatcher`] keeps a table keyed by `(widget, signal)`. Emitting a
//! signal invokes the callbacks registered for that exact pair, in the order
//! they were connected:
//!
//! ```rust
//! use widget_signals::dispatch::Dispatcher;
//! use widget_signals::signal::ButtonSignal;
//! use widget_signals::widget::Button;
//!
//! let dispatcher = Dispatcher::new();
//! let ok = dispatcher.create::<Button>("ok");
//! dispatcher
//!     .connect(&ok, ButtonSignal::Clicked, 0, |clicks: &mut u32, _, _, _| {
//!         *clicks += 1;
//!     })
//!     .unwrap();
//! dispatcher.emit(&ok, ButtonSignal::Clicked, ()).unwrap();
//! ```
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{self, AtomicBool};
use std::sync::{mpsc, Arc};

use ahash::AHashMap;
use alot::{LotId, Lots};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::error::{
    AggregateCallbackError, BoxedError, CallbackFailure, EmitError, FailureCause,
    InvalidWidgetError, QueueError,
};
use crate::names::Name;
use crate::signal::{AnySignal, Payload, Signal};
use crate::widget::{AnyWidget, Widget, WidgetId, WidgetKind};

/// Routes signals raised by widgets to the callbacks connected to them.
///
/// Cloning a dispatcher returns another handle to the same registration
/// table. Independent dispatchers share nothing.
#[derive(Clone)]
pub struct Dispatcher {
    data: Arc<DispatcherData>,
}

struct DispatcherData {
    registry: Mutex<Registry>,
    pending_sender: mpsc::SyncSender<PendingEmission>,
    pending: Mutex<mpsc::Receiver<PendingEmission>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.data.registry.lock();
        f.debug_struct("Dispatcher")
            .field("widgets", &registry.widgets.len())
            .field("registrations", &registry.registrations.len())
            .finish()
    }
}

impl Dispatcher {
    /// Returns a new dispatcher with no widgets.
    #[must_use]
    pub fn new() -> Self {
        let (pending_sender, pending) = mpsc::sync_channel(PENDING_CAPACITY);
        Self {
            data: Arc::new(DispatcherData {
                registry: Mutex::new(Registry::default()),
                pending_sender,
                pending: Mutex::new(pending),
            }),
        }
    }

    /// Creates a new top-level widget of kind `K`.
    ///
    /// This is the notification a toolkit sends when it constructs a widget.
    /// The returned widget is live until it is passed to
    /// [`destroy_widget()`](Self::destroy_widget).
    pub fn create<K>(&self, name: impl Into<Name>) -> Widget<K>
    where
        K: WidgetKind,
    {
        let widget = Widget::<K>::new(name.into());
        self.data
            .registry
            .lock()
            .widgets
            .insert(widget.id(), WidgetRecord::new(widget.as_any().clone(), None));
        debug!(widget = %widget.id(), name = %widget.name(), kind = %K::KIND, "widget created");
        widget
    }

    /// Creates a new widget of kind `K` owned by `parent`.
    ///
    /// The new widget is destroyed when `parent` is destroyed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWidgetError`] if `parent` is not live.
    pub fn create_child<K>(
        &self,
        parent: &impl AsRef<AnyWidget>,
        name: impl Into<Name>,
    ) -> Result<Widget<K>, InvalidWidgetError>
    where
        K: WidgetKind,
    {
        let parent = parent.as_ref();
        let mut registry = self.data.registry.lock();
        let widget = Widget::<K>::new(name.into());
        registry.live_mut(parent)?.children.push(widget.id());
        registry.widgets.insert(
            widget.id(),
            WidgetRecord::new(widget.as_any().clone(), Some(parent.id())),
        );
        drop(registry);
        debug!(
            widget = %widget.id(),
            name = %widget.name(),
            kind = %K::KIND,
            parent = %parent.id(),
            "widget created"
        );
        Ok(widget)
    }

    /// Returns true if `widget` was created by this dispatcher and has not
    /// been destroyed.
    #[must_use]
    pub fn is_live(&self, widget: &impl AsRef<AnyWidget>) -> bool {
        self.data
            .registry
            .lock()
            .widgets
            .contains_key(&widget.as_ref().id())
    }

    /// Returns the number of live widgets.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.data.registry.lock().widgets.len()
    }

    /// Returns the live children of `widget`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWidgetError`] if `widget` is not live.
    pub fn children(
        &self,
        widget: &impl AsRef<AnyWidget>,
    ) -> Result<Vec<AnyWidget>, InvalidWidgetError> {
        let registry = self.data.registry.lock();
        let record = registry.live(widget.as_ref())?;
        Ok(record
            .children
            .iter()
            .filter_map(|child| registry.widgets.get(child))
            .map(|child| child.widget.clone())
            .collect())
    }

    /// Returns the widget that owns `widget`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWidgetError`] if `widget` is not live.
    pub fn parent(
        &self,
        widget: &impl AsRef<AnyWidget>,
    ) -> Result<Option<AnyWidget>, InvalidWidgetError> {
        let registry = self.data.registry.lock();
        let record = registry.live(widget.as_ref())?;
        Ok(record
            .parent
            .and_then(|parent| registry.widgets.get(&parent))
            .map(|parent| parent.widget.clone()))
    }

    /// Connects `callback` to `signal` raised by `widget`.
    ///
    /// Each time the signal is emitted, `callback` is invoked with exclusive
    /// access to `context`, the widget, the signal, and the emitted payload.
    /// The callback stays connected until it is passed to
    /// [`disconnect()`](Self::disconnect) or the widget is destroyed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWidgetError`] if `widget` is not live.
    pub fn connect<K, C, F>(
        &self,
        widget: &Widget<K>,
        signal: K::Signal,
        context: C,
        mut callback: F,
    ) -> Result<Registration, InvalidWidgetError>
    where
        K: WidgetKind,
        C: Send + 'static,
        F: FnMut(&mut C, &Widget<K>, K::Signal, &Payload) + Send + 'static,
    {
        let mut context = context;
        let target = widget.clone();
        self.register(
            widget.as_any(),
            signal.into_any(),
            type_name::<F>(),
            Box::new(move |payload: &Payload| -> Result<(), BoxedError> {
                callback(&mut context, &target, signal, payload);
                Ok(())
            }),
        )
    }

    /// Connects a fallible `callback` to `signal` raised by `widget`.
    ///
    /// This behaves the same as [`connect()`](Self::connect), except that
    /// errors returned by `callback` are reported to the caller of
    /// [`emit()`](Self::emit).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWidgetError`] if `widget` is not live.
    pub fn connect_try<K, C, F, E>(
        &self,
        widget: &Widget<K>,
        signal: K::Signal,
        context: C,
        mut callback: F,
    ) -> Result<Registration, InvalidWidgetError>
    where
        K: WidgetKind,
        C: Send + 'static,
        F: FnMut(&mut C, &Widget<K>, K::Signal, &Payload) -> Result<(), E> + Send + 'static,
        E: Into<BoxedError>,
    {
        let mut context = context;
        let target = widget.clone();
        self.register(
            widget.as_any(),
            signal.into_any(),
            type_name::<F>(),
            Box::new(move |payload: &Payload| -> Result<(), BoxedError> {
                callback(&mut context, &target, signal, payload).map_err(Into::into)
            }),
        )
    }

    fn register(
        &self,
        widget: &AnyWidget,
        signal: AnySignal,
        callback: &'static str,
        function: Box<dyn ObserverFn>,
    ) -> Result<Registration, InvalidWidgetError> {
        let mut registry = self.data.registry.lock();
        registry.live(widget)?;
        let key = (widget.id(), signal);
        let id = registry.registrations.push(RegistrationData {
            key,
            slot: Arc::new(CallbackSlot {
                name: callback,
                connected: AtomicBool::new(true),
                function: Mutex::new(function),
            }),
        });
        registry.observers.entry(key).or_default().push(id);
        if let Some(record) = registry.widgets.get_mut(&widget.id()) {
            if !record.observed.contains(&signal) {
                record.observed.push(signal);
            }
        }
        drop(registry);

        debug!(widget = %widget.id(), signal = signal.name(), callback, "connected");
        Ok(Registration {
            id,
            widget: widget.id(),
            signal,
        })
    }

    /// Disconnects a single registration.
    ///
    /// Returns true if the registration was connected. Disconnecting a
    /// registration that was already disconnected, or whose widget was
    /// destroyed, does nothing and returns false.
    ///
    /// If the registration's signal is being emitted on another thread and
    /// its callback has not been reached yet, the callback is skipped.
    #[allow(clippy::must_use_candidate)]
    pub fn disconnect(&self, registration: Registration) -> bool {
        let removed = self
            .data
            .registry
            .lock()
            .remove_registration(registration.id);
        let Some(_slot) = removed else {
            return false;
        };
        debug!(
            widget = %registration.widget,
            signal = registration.signal.name(),
            "disconnected"
        );
        true
    }

    /// Disconnects every callback connected to `signal` on `widget`,
    /// returning the number of registrations removed.
    #[allow(clippy::must_use_candidate)]
    pub fn disconnect_all<K>(&self, widget: &Widget<K>, signal: K::Signal) -> usize
    where
        K: WidgetKind,
    {
        let signal = signal.into_any();
        let mut registry = self.data.registry.lock();
        let ids = registry
            .observers
            .get(&(widget.id(), signal))
            .cloned()
            .unwrap_or_default();
        let slots = ids
            .into_iter()
            .filter_map(|id| registry.remove_registration(id))
            .collect::<Vec<_>>();
        drop(registry);
        let removed = slots.len();
        drop(slots);
        if removed > 0 {
            debug!(widget = %widget.id(), signal = signal.name(), removed, "disconnected all");
        }
        removed
    }

    /// Returns the number of callbacks connected to `signal` on `widget`.
    #[must_use]
    pub fn observer_count<K>(&self, widget: &Widget<K>, signal: K::Signal) -> usize
    where
        K: WidgetKind,
    {
        self.data
            .registry
            .lock()
            .observers
            .get(&(widget.id(), signal.into_any()))
            .map_or(0, Vec::len)
    }

    /// Emits `signal` from `widget` with `payload`.
    ///
    /// Every callback connected to `signal` on `widget` is invoked in the
    /// order it was connected, on the current thread, before this function
    /// returns. Emitting a signal with no callbacks connected does nothing.
    ///
    /// Callbacks connected while this emission is running are first invoked
    /// by the next emission.
    ///
    /// # Errors
    ///
    /// - [`EmitError::InvalidWidget`]: `widget` is not live. No callbacks were
    ///   invoked.
    /// - [`EmitError::Callbacks`]: one or more callbacks returned an error or
    ///   panicked. Every other callback still ran.
    pub fn emit<K>(
        &self,
        widget: &Widget<K>,
        signal: K::Signal,
        payload: impl Into<Payload>,
    ) -> Result<(), EmitError>
    where
        K: WidgetKind,
    {
        self.emit_any(widget.as_any(), signal.into_any(), &payload.into())
    }

    fn emit_any(
        &self,
        widget: &AnyWidget,
        signal: AnySignal,
        payload: &Payload,
    ) -> Result<(), EmitError> {
        let observers = {
            let registry = self.data.registry.lock();
            registry.live(widget)?;
            registry.observers_of(widget.id(), signal)
        };
        trace!(
            widget = %widget.id(),
            name = %widget.name(),
            signal = signal.name(),
            %payload,
            observers = observers.len(),
            "emit"
        );

        let mut failures = Vec::new();
        for (registration, slot) in observers {
            if let Err(cause) = slot.invoke(payload) {
                warn!(
                    widget = %widget.id(),
                    signal = signal.name(),
                    callback = slot.name,
                    "callback failed: {cause}"
                );
                failures.push(CallbackFailure {
                    registration,
                    callback: slot.name,
                    cause,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EmitError::Callbacks(AggregateCallbackError::new(failures)))
        }
    }

    /// Destroys `widget` and every widget it owns, disconnecting all of their
    /// callbacks.
    ///
    /// This happens atomically with respect to emissions on other threads:
    /// once this function returns, no callback of a destroyed widget that has
    /// not already started will run.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWidgetError`] if `widget` is not live.
    pub fn destroy_widget(&self, widget: &impl AsRef<AnyWidget>) -> Result<(), InvalidWidgetError> {
        let widget = widget.as_ref();
        let mut registry = self.data.registry.lock();
        let parent = registry.live(widget)?.parent;
        if let Some(parent) = parent.and_then(|parent| registry.widgets.get_mut(&parent)) {
            parent.children.retain(|child| *child != widget.id());
        }
        let mut slots = Vec::new();
        let destroyed = registry.destroy_recursive(widget.id(), &mut slots);
        drop(registry);
        // Callbacks and their contexts may call back into the dispatcher when
        // dropped.
        drop(slots);

        debug!(widget = %widget.id(), name = %widget.name(), destroyed, "widget destroyed");
        Ok(())
    }

    /// Returns a sender that can queue emissions from any thread.
    ///
    /// Queued emissions run when the thread driving this dispatcher calls
    /// [`process_pending()`](Self::process_pending).
    #[must_use]
    pub fn sender(&self) -> EmitSender {
        EmitSender {
            sender: self.data.pending_sender.clone(),
        }
    }

    /// Emits every signal queued through an [`EmitSender`], in the order they
    /// were sent, and returns the errors of the emissions that failed.
    ///
    /// Emissions queued by callbacks while this runs are left for the next
    /// call.
    #[must_use]
    pub fn process_pending(&self) -> Vec<EmitError> {
        let queued = self.data.pending.lock().try_iter().collect::<Vec<_>>();
        queued
            .into_iter()
            .filter_map(|pending| {
                self.emit_any(&pending.widget, pending.signal, &pending.payload)
                    .err()
            })
            .collect()
    }
}

/// A handle to a single connected callback.
///
/// Registrations are plain identifiers: dropping one does not disconnect the
/// callback. Pass it to [`Dispatcher::disconnect()`] to do so.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Registration {
    id: LotId,
    widget: WidgetId,
    signal: AnySignal,
}

impl Registration {
    /// Returns the widget this registration observes.
    #[must_use]
    pub const fn widget(&self) -> WidgetId {
        self.widget
    }

    /// Returns the signal this registration observes.
    #[must_use]
    pub const fn signal(&self) -> AnySignal {
        self.signal
    }
}

/// The number of emissions an [`EmitSender`] can queue before
/// [`Dispatcher::process_pending()`] must be called.
pub const PENDING_CAPACITY: usize = 256;

/// Queues emissions for a [`Dispatcher`] from any thread.
#[derive(Clone, Debug)]
pub struct EmitSender {
    sender: mpsc::SyncSender<PendingEmission>,
}

impl EmitSender {
    /// Queues `signal` to be emitted from `widget` with `payload`.
    ///
    /// This never blocks.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Full`]: [`PENDING_CAPACITY`] emissions are already
    ///   waiting for [`Dispatcher::process_pending()`].
    /// - [`QueueError::Disconnected`]: every handle to the dispatcher has
    ///   been dropped.
    pub fn send<K>(
        &self,
        widget: &Widget<K>,
        signal: K::Signal,
        payload: impl Into<Payload>,
    ) -> Result<(), QueueError>
    where
        K: WidgetKind,
    {
        let result = self.sender.try_send(PendingEmission {
            widget: widget.as_any().clone(),
            signal: signal.into_any(),
            payload: payload.into(),
        });
        let err = match result {
            Ok(()) => return Ok(()),
            Err(mpsc::TrySendError::Full(_)) => QueueError::Full,
            Err(mpsc::TrySendError::Disconnected(_)) => QueueError::Disconnected,
        };
        warn!(widget = %widget.id(), signal = signal.name(), "emission not queued: {err}");
        Err(err)
    }
}

#[derive(Debug)]
struct PendingEmission {
    widget: AnyWidget,
    signal: AnySignal,
    payload: Payload,
}

#[derive(Default)]
struct Registry {
    widgets: AHashMap<WidgetId, WidgetRecord>,
    registrations: Lots<RegistrationData>,
    observers: AHashMap<(WidgetId, AnySignal), Vec<LotId>>,
}

impl Registry {
    fn live(&self, widget: &AnyWidget) -> Result<&WidgetRecord, InvalidWidgetError> {
        self.widgets
            .get(&widget.id())
            .ok_or_else(|| widget.invalid())
    }

    fn live_mut(&mut self, widget: &AnyWidget) -> Result<&mut WidgetRecord, InvalidWidgetError> {
        self.widgets
            .get_mut(&widget.id())
            .ok_or_else(|| widget.invalid())
    }

    fn observers_of(
        &self,
        widget: WidgetId,
        signal: AnySignal,
    ) -> Vec<(Registration, Arc<CallbackSlot>)> {
        let Some(ids) = self.observers.get(&(widget, signal)) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| {
                let data = self.registrations.get(*id)?;
                Some((
                    Registration {
                        id: *id,
                        widget,
                        signal,
                    },
                    data.slot.clone(),
                ))
            })
            .collect()
    }

    /// Removes the registration `id`, returning its callback so that it can
    /// be dropped after the registry is unlocked.
    fn remove_registration(&mut self, id: LotId) -> Option<Arc<CallbackSlot>> {
        let data = self.registrations.get(id)?;
        data.slot.connected.store(false, atomic::Ordering::Release);
        let key = data.key;
        let slot = data.slot.clone();
        self.registrations.remove(id);

        if let Some(ids) = self.observers.get_mut(&key) {
            ids.retain(|observer| *observer != id);
            if ids.is_empty() {
                self.observers.remove(&key);
                if let Some(record) = self.widgets.get_mut(&key.0) {
                    record.observed.retain(|signal| *signal != key.1);
                }
            }
        }
        Some(slot)
    }

    /// Removes `root` and all of its descendants, returning the number of
    /// widgets removed. The callbacks of the removed widgets are moved into
    /// `slots`.
    fn destroy_recursive(
        &mut self,
        root: WidgetId,
        slots: &mut Vec<Arc<CallbackSlot>>,
    ) -> usize {
        let mut to_destroy = vec![root];
        let mut destroyed = 0;
        while let Some(id) = to_destroy.pop() {
            let Some(record) = self.widgets.remove(&id) else {
                continue;
            };
            record.widget.mark_destroyed();
            for signal in record.observed {
                for observer in self.observers.remove(&(id, signal)).unwrap_or_default() {
                    if let Some(data) = self.registrations.get(observer) {
                        data.slot.connected.store(false, atomic::Ordering::Release);
                        slots.push(data.slot.clone());
                    }
                    self.registrations.remove(observer);
                }
            }
            to_destroy.extend(record.children);
            destroyed += 1;
        }
        destroyed
    }
}

struct WidgetRecord {
    widget: AnyWidget,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    observed: Vec<AnySignal>,
}

impl WidgetRecord {
    fn new(widget: AnyWidget, parent: Option<WidgetId>) -> Self {
        Self {
            widget,
            parent,
            children: Vec::new(),
            observed: Vec::new(),
        }
    }
}

struct RegistrationData {
    key: (WidgetId, AnySignal),
    slot: Arc<CallbackSlot>,
}

struct CallbackSlot {
    name: &'static str,
    connected: AtomicBool,
    function: Mutex<Box<dyn ObserverFn>>,
}

thread_local! {
    static RUNNING_CALLBACKS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl CallbackSlot {
    fn invoke(&self, payload: &Payload) -> Result<(), FailureCause> {
        if !self.connected.load(atomic::Ordering::Acquire) {
            return Ok(());
        }

        let key = self as *const Self as usize;
        if RUNNING_CALLBACKS.with_borrow(|running| running.contains(&key)) {
            return Err(FailureCause::Reentrant);
        }

        let mut function = self.function.lock();
        // Disconnection may have raced with acquiring the lock.
        if !self.connected.load(atomic::Ordering::Acquire) {
            return Ok(());
        }

        RUNNING_CALLBACKS.with_borrow_mut(|running| running.push(key));
        let result = panic::catch_unwind(AssertUnwindSafe(|| function.invoke(payload)));
        RUNNING_CALLBACKS.with_borrow_mut(|running| {
            running.pop();
        });

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(FailureCause::Returned(err)),
            Err(panic) => Err(FailureCause::Panicked(panic_message(&*panic))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("<non-string panic payload>")
    }
}

trait ObserverFn: Send {
    fn invoke(&mut self, payload: &Payload) -> Result<(), BoxedError>;
}

impl<F> ObserverFn for F
where
    F: for<'a> FnMut(&'a Payload) -> Result<(), BoxedError> + Send,
{
    fn invoke(&mut self, payload: &Payload) -> Result<(), BoxedError> {
        self(payload)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use parking_lot::Mutex;
    use rand::Rng;

    use super::*;
    use crate::error::InvalidReason;
    use crate::signal::{ButtonSignal, SliderSignal, TabViewSignal, WindowSignal};
    use crate::widget::{Button, Slider, TabView, Window};

    type Log = Arc<Mutex<Vec<(&'static str, Payload)>>>;

    fn log() -> Log {
        Arc::default()
    }

    fn entries(log: &Log) -> Vec<(&'static str, Payload)> {
        log.lock().clone()
    }

    fn c1(
        log: &mut Log,
        _: &Widget<Button>,
        _: ButtonSignal,
        payload: &Payload,
    ) -> Result<(), BoxedError> {
        log.lock().push(("c1", payload.clone()));
        Err("c1 failed".into())
    }

    fn c2(
        log: &mut Log,
        _: &Widget<Button>,
        _: ButtonSignal,
        payload: &Payload,
    ) -> Result<(), BoxedError> {
        log.lock().push(("c2", payload.clone()));
        Ok(())
    }

    fn c3(
        log: &mut Log,
        _: &Widget<Button>,
        _: ButtonSignal,
        payload: &Payload,
    ) -> Result<(), BoxedError> {
        log.lock().push(("c3", payload.clone()));
        Ok(())
    }

    fn c3_fails(
        log: &mut Log,
        _: &Widget<Button>,
        _: ButtonSignal,
        payload: &Payload,
    ) -> Result<(), BoxedError> {
        log.lock().push(("c3", payload.clone()));
        Err("c3 failed".into())
    }

    fn count_call(calls: &mut Arc<AtomicUsize>, _: &Widget<Button>, _: ButtonSignal, _: &Payload) {
        calls.fetch_add(1, atomic::Ordering::Relaxed);
    }

    fn recorder(
        name: &'static str,
    ) -> impl FnMut(&mut Log, &Widget<Button>, ButtonSignal, &Payload) + Send + 'static {
        move |log, _, _, payload| log.lock().push((name, payload.clone()))
    }

    #[test]
    fn emit_without_observers_is_noop() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        for signal in ButtonSignal::ALL {
            dispatcher.emit(&button, *signal, 1).unwrap();
        }
        assert_eq!(dispatcher.observer_count(&button, ButtonSignal::Clicked), 0);
    }

    #[test]
    fn observers_run_in_registration_order() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("c1"))
            .unwrap();
        dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("c2"))
            .unwrap();

        dispatcher.emit(&button, ButtonSignal::Clicked, 42).unwrap();
        assert_eq!(
            entries(&calls),
            vec![("c1", Payload::Int(42)), ("c2", Payload::Int(42))]
        );
    }

    #[test]
    fn many_observers_each_run_once_in_order() {
        let dispatcher = Dispatcher::new();
        let slider = dispatcher.create::<Slider>("slider1");
        let count = rand::rng().random_range(1..64);
        let order = Arc::new(Mutex::new(Vec::new()));
        for index in 0..count {
            dispatcher
                .connect(
                    &slider,
                    SliderSignal::ValueChanged,
                    order.clone(),
                    move |order: &mut Arc<Mutex<Vec<usize>>>, _, _, _| order.lock().push(index),
                )
                .unwrap();
        }

        dispatcher
            .emit(&slider, SliderSignal::ValueChanged, 0.5)
            .unwrap();
        assert_eq!(*order.lock(), (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn signals_are_routed_by_widget_and_kind() {
        let dispatcher = Dispatcher::new();
        let first = dispatcher.create::<Button>("button");
        let second = dispatcher.create::<Button>("button");
        let calls = log();
        dispatcher
            .connect(&first, ButtonSignal::Clicked, calls.clone(), recorder("clicked"))
            .unwrap();
        dispatcher
            .connect(&first, ButtonSignal::Pressed, calls.clone(), recorder("pressed"))
            .unwrap();

        dispatcher.emit(&second, ButtonSignal::Clicked, ()).unwrap();
        dispatcher.emit(&first, ButtonSignal::Released, ()).unwrap();
        assert!(entries(&calls).is_empty());

        dispatcher.emit(&first, ButtonSignal::Pressed, ()).unwrap();
        assert_eq!(entries(&calls), vec![("pressed", Payload::None)]);
    }

    #[test]
    fn context_is_passed_back_mutably() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("counter");
        let total = Arc::new(Mutex::new(0));
        dispatcher
            .connect(
                &button,
                ButtonSignal::Clicked,
                (0, total.clone()),
                |(clicks, total): &mut (i64, Arc<Mutex<i64>>), widget, signal, _| {
                    assert_eq!(&**widget.name(), "counter");
                    assert_eq!(signal, ButtonSignal::Clicked);
                    *clicks += 1;
                    *total.lock() = *clicks;
                },
            )
            .unwrap();

        for _ in 0..3 {
            dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        }
        assert_eq!(*total.lock(), 3);
    }

    #[test]
    fn disconnect_removes_one_registration() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        let first = dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("first"))
            .unwrap();
        dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("second"))
            .unwrap();
        assert_eq!(first.widget(), button.id());
        assert_eq!(first.signal(), ButtonSignal::Clicked.into_any());

        assert!(dispatcher.disconnect(first));
        assert_eq!(dispatcher.observer_count(&button, ButtonSignal::Clicked), 1);
        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        assert_eq!(entries(&calls), vec![("second", Payload::None)]);

        // The second disconnect is a no-op.
        assert!(!dispatcher.disconnect(first));
        assert_eq!(dispatcher.observer_count(&button, ButtonSignal::Clicked), 1);
        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        assert_eq!(entries(&calls).len(), 2);
    }

    #[test]
    fn stale_registration_does_not_remove_new_one() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        let stale = dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("stale"))
            .unwrap();
        assert!(dispatcher.disconnect(stale));
        let fresh = dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("fresh"))
            .unwrap();
        assert_ne!(stale, fresh);

        assert!(!dispatcher.disconnect(stale));
        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        assert_eq!(entries(&calls), vec![("fresh", Payload::None)]);
    }

    #[test]
    fn disconnect_all_removes_pair() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        for _ in 0..3 {
            dispatcher
                .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("clicked"))
                .unwrap();
        }
        dispatcher
            .connect(&button, ButtonSignal::Toggled, calls.clone(), recorder("toggled"))
            .unwrap();

        assert_eq!(dispatcher.disconnect_all(&button, ButtonSignal::Clicked), 3);
        assert_eq!(dispatcher.disconnect_all(&button, ButtonSignal::Clicked), 0);
        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        dispatcher.emit(&button, ButtonSignal::Toggled, true).unwrap();
        assert_eq!(entries(&calls), vec![("toggled", Payload::Bool(true))]);
    }

    #[test]
    fn destroyed_widget_rejects_operations() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        let registration = dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("c1"))
            .unwrap();

        dispatcher.destroy_widget(&button).unwrap();
        assert!(button.is_destroyed());
        assert!(!dispatcher.is_live(&button));

        let err = dispatcher
            .emit(&button, ButtonSignal::Clicked, ())
            .unwrap_err();
        let invalid = err.invalid_widget().expect("invalid widget");
        assert_eq!(invalid.widget, button.id());
        assert_eq!(invalid.reason, InvalidReason::Destroyed);

        let err = dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("c2"))
            .unwrap_err();
        assert_eq!(err.reason, InvalidReason::Destroyed);
        assert_eq!(
            dispatcher.destroy_widget(&button).unwrap_err().reason,
            InvalidReason::Destroyed
        );
        assert!(!dispatcher.disconnect(registration));
        assert!(entries(&calls).is_empty());
    }

    #[test]
    fn widgets_from_other_dispatchers_are_unknown() {
        let first = Dispatcher::new();
        let second = Dispatcher::new();
        let button = first.create::<Button>("button1");

        let err = second
            .emit(&button, ButtonSignal::Clicked, ())
            .unwrap_err();
        assert_eq!(
            err.invalid_widget().map(|err| err.reason),
            Some(InvalidReason::Unknown)
        );
        assert!(first.is_live(&button));
        assert!(!second.is_live(&button));
    }

    #[test]
    fn failing_callback_does_not_stop_siblings() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        let first = dispatcher
            .connect_try(&button, ButtonSignal::Clicked, calls.clone(), c1)
            .unwrap();
        dispatcher
            .connect_try(&button, ButtonSignal::Clicked, calls.clone(), c2)
            .unwrap();
        dispatcher
            .connect_try(&button, ButtonSignal::Clicked, calls.clone(), c3)
            .unwrap();

        let err = dispatcher
            .emit(&button, ButtonSignal::Clicked, 7)
            .unwrap_err();
        assert_eq!(
            entries(&calls),
            vec![
                ("c1", Payload::Int(7)),
                ("c2", Payload::Int(7)),
                ("c3", Payload::Int(7))
            ]
        );

        let aggregate = err.callbacks().expect("callback errors");
        assert_eq!(aggregate.failures().len(), 1);
        assert!(aggregate.contains(first));
        let failure = &aggregate.failures()[0];
        assert!(failure.callback.ends_with("::c1"), "{}", failure.callback);
        assert!(
            matches!(&failure.cause, FailureCause::Returned(err) if err.to_string() == "c1 failed")
        );
        assert!(err.to_string().contains("c1 failed"));
    }

    #[test]
    fn panicking_callback_is_reported() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        let panicking = dispatcher
            .connect(&button, ButtonSignal::Clicked, (), |(), _, _, _| {
                panic!("boom");
            })
            .unwrap();
        dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("after"))
            .unwrap();

        let err = dispatcher
            .emit(&button, ButtonSignal::Clicked, ())
            .unwrap_err();
        assert_eq!(entries(&calls), vec![("after", Payload::None)]);
        let aggregate = err.callbacks().expect("callback errors");
        assert_eq!(aggregate.failures()[0].registration, panicking);
        assert!(
            matches!(
                &aggregate.failures()[0].cause,
                FailureCause::Panicked(message) if message == "boom"
            )
        );

        // The panicking callback stays connected and keeps failing on its own.
        assert!(dispatcher.emit(&button, ButtonSignal::Clicked, ()).is_err());
        assert_eq!(entries(&calls).len(), 2);
    }

    #[test]
    fn destroying_parent_destroys_children() {
        let dispatcher = Dispatcher::new();
        let window = dispatcher.create::<Window>("main");
        let button = dispatcher.create_child::<Button>(&window, "button1").unwrap();
        let slider = dispatcher.create_child::<Slider>(&button, "nested").unwrap();
        let sibling = dispatcher.create::<Button>("standalone");
        let calls = log();
        dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("button"))
            .unwrap();

        assert_eq!(
            dispatcher.children(&window).unwrap(),
            vec![button.as_any().clone()]
        );
        assert_eq!(
            dispatcher.parent(&slider).unwrap(),
            Some(button.as_any().clone())
        );
        assert_eq!(dispatcher.widget_count(), 4);

        dispatcher.destroy_widget(&window).unwrap();
        assert!(button.is_destroyed());
        assert!(slider.is_destroyed());
        assert!(!sibling.is_destroyed());
        assert_eq!(dispatcher.widget_count(), 1);
        assert_eq!(dispatcher.observer_count(&button, ButtonSignal::Clicked), 0);
        assert!(dispatcher.emit(&slider, SliderSignal::Moved, 0.).is_err());

        let err = dispatcher
            .create_child::<Button>(&window, "orphan")
            .unwrap_err();
        assert_eq!(err.reason, InvalidReason::Destroyed);
    }

    #[test]
    fn destroying_child_detaches_from_parent() {
        let dispatcher = Dispatcher::new();
        let window = dispatcher.create::<Window>("main");
        let first = dispatcher.create_child::<Button>(&window, "first").unwrap();
        let second = dispatcher.create_child::<Button>(&window, "second").unwrap();

        dispatcher.destroy_widget(&first).unwrap();
        assert_eq!(
            dispatcher.children(&window).unwrap(),
            vec![second.as_any().clone()]
        );
        assert!(dispatcher.is_live(&window));
    }

    #[test]
    fn disconnect_during_emission_skips_observer() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        let victim = Arc::new(Mutex::new(None::<Registration>));
        dispatcher
            .connect(
                &button,
                ButtonSignal::Clicked,
                (dispatcher.clone(), victim.clone(), calls.clone()),
                |(dispatcher, victim, calls): &mut (
                    Dispatcher,
                    Arc<Mutex<Option<Registration>>>,
                    Log,
                ),
                 _,
                 _,
                 _| {
                    calls.lock().push(("first", Payload::None));
                    if let Some(victim) = victim.lock().take() {
                        assert!(dispatcher.disconnect(victim));
                    }
                },
            )
            .unwrap();
        let second = dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("second"))
            .unwrap();
        dispatcher
            .connect(&button, ButtonSignal::Clicked, calls.clone(), recorder("third"))
            .unwrap();
        *victim.lock() = Some(second);

        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        assert_eq!(
            entries(&calls),
            vec![("first", Payload::None), ("third", Payload::None)]
        );
    }

    #[test]
    fn connect_during_emission_waits_for_next_emission() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        dispatcher
            .connect(
                &button,
                ButtonSignal::Clicked,
                (dispatcher.clone(), calls.clone(), false),
                |(dispatcher, calls, connected): &mut (Dispatcher, Log, bool), widget, signal, _| {
                    calls.lock().push(("outer", Payload::None));
                    if !*connected {
                        *connected = true;
                        dispatcher
                            .connect(widget, signal, calls.clone(), recorder("late"))
                            .unwrap();
                    }
                },
            )
            .unwrap();

        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        assert_eq!(entries(&calls), vec![("outer", Payload::None)]);
        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        assert_eq!(
            entries(&calls),
            vec![
                ("outer", Payload::None),
                ("outer", Payload::None),
                ("late", Payload::None)
            ]
        );
    }

    #[test]
    fn reentrant_emission_is_reported() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let inner = Arc::new(Mutex::new(None));
        dispatcher
            .connect(
                &button,
                ButtonSignal::Clicked,
                (dispatcher.clone(), inner.clone()),
                |(dispatcher, inner): &mut (Dispatcher, Arc<Mutex<Option<Result<(), EmitError>>>>),
                 widget,
                 signal,
                 _| {
                    *inner.lock() = Some(dispatcher.emit(widget, signal, ()));
                },
            )
            .unwrap();

        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        let inner = inner.lock().take().expect("callback ran");
        let err = inner.unwrap_err();
        let aggregate = err.callbacks().expect("callback errors");
        assert!(matches!(aggregate.failures()[0].cause, FailureCause::Reentrant));
    }

    #[test]
    fn queued_emissions_run_in_order() {
        let dispatcher = Dispatcher::new();
        let slider = dispatcher.create::<Slider>("slider1");
        let values = Arc::new(Mutex::new(Vec::new()));
        dispatcher
            .connect(
                &slider,
                SliderSignal::ValueChanged,
                values.clone(),
                |values: &mut Arc<Mutex<Vec<f64>>>, _, _, payload| {
                    values.lock().push(payload.as_float().unwrap_or_default());
                },
            )
            .unwrap();

        let sender = dispatcher.sender();
        let background = {
            let slider = slider.clone();
            thread::spawn(move || {
                for value in [0.25, 0.5, 0.75] {
                    sender
                        .send(&slider, SliderSignal::ValueChanged, value)
                        .unwrap();
                }
            })
        };
        background.join().unwrap();
        assert!(values.lock().is_empty());

        assert!(dispatcher.process_pending().is_empty());
        assert_eq!(*values.lock(), vec![0.25, 0.5, 0.75]);
        assert!(dispatcher.process_pending().is_empty());
        assert_eq!(values.lock().len(), 3);
    }

    #[test]
    fn queued_emissions_report_failures() {
        let dispatcher = Dispatcher::new();
        let window = dispatcher.create::<Window>("main");
        let sender = dispatcher.sender();
        assert!(sender.send(&window, WindowSignal::Resized, ()).is_ok());
        dispatcher.destroy_widget(&window).unwrap();

        let errors = dispatcher.process_pending();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].invalid_widget().is_some());
    }

    #[test]
    fn sender_outliving_dispatcher_fails() {
        let dispatcher = Dispatcher::new();
        let window = dispatcher.create::<Window>("main");
        let sender = dispatcher.sender();
        drop(dispatcher);
        assert_eq!(
            sender.send(&window, WindowSignal::Closed, ()),
            Err(QueueError::Disconnected)
        );
    }

    #[test]
    fn concurrent_connections() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("shared");
        let threads = (0..8)
            .map(|_| {
                let dispatcher = dispatcher.clone();
                let button = button.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        dispatcher
                            .connect(&button, ButtonSignal::Clicked, (), |(), _, _, _| {})
                            .unwrap();
                    }
                })
            })
            .collect::<Vec<_>>();
        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(dispatcher.observer_count(&button, ButtonSignal::Clicked), 400);
        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
    }

    #[test]
    fn failures_are_reported_in_invocation_order() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let calls = log();
        let first = dispatcher
            .connect_try(&button, ButtonSignal::Clicked, calls.clone(), c1)
            .unwrap();
        let second = dispatcher
            .connect_try(&button, ButtonSignal::Clicked, calls.clone(), c2)
            .unwrap();
        let third = dispatcher
            .connect_try(&button, ButtonSignal::Clicked, calls.clone(), c3_fails)
            .unwrap();

        let EmitError::Callbacks(aggregate) = dispatcher
            .emit(&button, ButtonSignal::Clicked, 1)
            .unwrap_err()
        else {
            unreachable!("every widget is live")
        };
        assert_eq!(entries(&calls).len(), 3);
        assert!(!aggregate.contains(second));

        let failures = aggregate.into_failures();
        assert_eq!(
            failures
                .iter()
                .map(|failure| failure.registration)
                .collect::<Vec<_>>(),
            vec![first, third]
        );
        assert!(failures[1].callback.ends_with("::c3_fails"));
        assert_eq!(
            failures
                .iter()
                .map(|failure| failure.cause.to_string())
                .collect::<Vec<_>>(),
            ["c1 failed", "c3 failed"]
        );
    }

    struct LocksOnDrop {
        dispatcher: Dispatcher,
        drops: Arc<AtomicUsize>,
    }

    impl Drop for LocksOnDrop {
        fn drop(&mut self) {
            let _ = self.dispatcher.widget_count();
            self.drops.fetch_add(1, atomic::Ordering::SeqCst);
        }
    }

    #[test]
    fn dropped_callbacks_may_use_the_dispatcher() {
        let dispatcher = Dispatcher::new();
        let window = dispatcher.create::<Window>("main");
        let button = dispatcher.create_child::<Button>(&window, "button1").unwrap();
        let drops = Arc::new(AtomicUsize::new(0));
        let context = || LocksOnDrop {
            dispatcher: dispatcher.clone(),
            drops: drops.clone(),
        };

        let single = dispatcher
            .connect(&button, ButtonSignal::Clicked, context(), |_, _, _, _| {})
            .unwrap();
        assert!(dispatcher.disconnect(single));
        assert_eq!(drops.load(atomic::Ordering::SeqCst), 1);

        for _ in 0..2 {
            dispatcher
                .connect(&button, ButtonSignal::Pressed, context(), |_, _, _, _| {})
                .unwrap();
        }
        assert_eq!(dispatcher.disconnect_all(&button, ButtonSignal::Pressed), 2);
        assert_eq!(drops.load(atomic::Ordering::SeqCst), 3);

        dispatcher
            .connect(&button, ButtonSignal::Released, context(), |_, _, _, _| {})
            .unwrap();
        dispatcher
            .connect(&window, WindowSignal::Closed, context(), |_, _, _, _| {})
            .unwrap();
        dispatcher.destroy_widget(&window).unwrap();
        assert_eq!(drops.load(atomic::Ordering::SeqCst), 5);
    }

    #[test]
    fn destroy_during_emission_on_another_thread() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("button1");
        let started = Arc::new(Mutex::new(Vec::new()));
        let (notify, first_started) = mpsc::channel();
        for index in 0..50 {
            dispatcher
                .connect(
                    &button,
                    ButtonSignal::Clicked,
                    (started.clone(), notify.clone()),
                    move |(started, notify): &mut (Arc<Mutex<Vec<usize>>>, mpsc::Sender<()>),
                          _,
                          _,
                          _| {
                        started.lock().push(index);
                        let _ = notify.send(());
                        thread::sleep(Duration::from_millis(1));
                    },
                )
                .unwrap();
        }
        drop(notify);

        let emitter = {
            let dispatcher = dispatcher.clone();
            let button = button.clone();
            thread::spawn(move || dispatcher.emit(&button, ButtonSignal::Clicked, ()))
        };
        first_started.recv().unwrap();
        dispatcher.destroy_widget(&button).unwrap();
        let started_before_destroy = started.lock().len();

        // Skipped callbacks are not failures.
        emitter.join().unwrap().unwrap();
        let started = started.lock();
        assert!(
            started.len() <= started_before_destroy + 1,
            "{} callbacks started after destroy_widget returned",
            started.len() - started_before_destroy
        );
        assert_eq!(*started, (0..started.len()).collect::<Vec<_>>());
    }

    #[test]
    fn concurrent_disconnects_and_connects() {
        let dispatcher = Dispatcher::new();
        let button = dispatcher.create::<Button>("shared");
        let old_calls = Arc::new(AtomicUsize::new(0));
        let new_calls = Arc::new(AtomicUsize::new(0));
        let old = (0..200)
            .map(|_| {
                dispatcher
                    .connect(&button, ButtonSignal::Clicked, old_calls.clone(), count_call)
                    .unwrap()
            })
            .collect::<Vec<_>>();

        let disconnecting = old
            .chunks(50)
            .map(|chunk| {
                let dispatcher = dispatcher.clone();
                let chunk = chunk.to_vec();
                thread::spawn(move || {
                    chunk
                        .into_iter()
                        .filter(|registration| dispatcher.disconnect(*registration))
                        .count()
                })
            })
            .collect::<Vec<_>>();
        let connecting = (0..4)
            .map(|_| {
                let dispatcher = dispatcher.clone();
                let button = button.clone();
                let calls = new_calls.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        dispatcher
                            .connect(&button, ButtonSignal::Clicked, calls.clone(), count_call)
                            .unwrap();
                    }
                })
            })
            .collect::<Vec<_>>();

        let disconnected = disconnecting
            .into_iter()
            .map(|thread| thread.join().unwrap())
            .sum::<usize>();
        for thread in connecting {
            thread.join().unwrap();
        }
        assert_eq!(disconnected, 200);
        assert_eq!(dispatcher.observer_count(&button, ButtonSignal::Clicked), 200);

        dispatcher.emit(&button, ButtonSignal::Clicked, ()).unwrap();
        assert_eq!(old_calls.load(atomic::Ordering::Relaxed), 0);
        assert_eq!(new_calls.load(atomic::Ordering::Relaxed), 200);
    }

    #[test]
    fn full_queue_rejects_emissions() {
        let dispatcher = Dispatcher::new();
        let window = dispatcher.create::<Window>("main");
        let sender = dispatcher.sender();
        for _ in 0..PENDING_CAPACITY {
            sender.send(&window, WindowSignal::Resized, ()).unwrap();
        }
        assert_eq!(
            sender.send(&window, WindowSignal::Resized, ()),
            Err(QueueError::Full)
        );

        assert!(dispatcher.process_pending().is_empty());
        assert_eq!(sender.send(&window, WindowSignal::Resized, ()), Ok(()));
    }

    #[test]
    fn tab_view_selection_carries_index() {
        let dispatcher = Dispatcher::new();
        let tabs = dispatcher.create::<TabView>("tabs");
        let selected = Arc::new(Mutex::new(Vec::new()));
        dispatcher
            .connect(
                &tabs,
                TabViewSignal::Selected,
                selected.clone(),
                |selected: &mut Arc<Mutex<Vec<usize>>>, _, _, tab| {
                    selected.lock().extend(tab.as_index());
                },
            )
            .unwrap();

        dispatcher.emit(&tabs, TabViewSignal::Selected, 2_usize).unwrap();
        dispatcher.emit(&tabs, TabViewSignal::Collapsed, 2_usize).unwrap();
        assert_eq!(*selected.lock(), vec![2]);
    }
}
