use std::{cell::RefCell, rc::Rc};

use crate::foundation::core::Viewport;
use crate::scroll::mapper::{MetricsProvider, ScrollMetrics};

/// Handle returned by [`ScrollBus::on`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(f64)>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
    emitting: bool,
    removed_while_emitting: Vec<ListenerId>,
    cleared_while_emitting: bool,
}

/// Single-threaded scroll-offset observer registry.
///
/// Cloning shares the registry. Listeners may register or remove listeners from inside a
/// callback; such changes take effect from the next emit.
#[derive(Clone, Default)]
pub struct ScrollBus {
    inner: Rc<RefCell<BusInner>>,
}

impl std::fmt::Debug for ScrollBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ScrollBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, listener: impl FnMut(f64) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered; always `true` mid-emit.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.emitting {
            inner.removed_while_emitting.push(id);
        }
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before || inner.emitting
    }

    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.emitting {
            inner.cleared_while_emitting = true;
        }
        inner.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Deliver `offset` to every listener registered before this call.
    pub fn emit(&self, offset: f64) {
        let mut taken = {
            let mut inner = self.inner.borrow_mut();
            inner.emitting = true;
            std::mem::take(&mut inner.listeners)
        };
        for (_, listener) in taken.iter_mut() {
            listener(offset);
        }
        let mut inner = self.inner.borrow_mut();
        inner.emitting = false;
        let removed = std::mem::take(&mut inner.removed_while_emitting);
        if std::mem::take(&mut inner.cleared_while_emitting) {
            taken.clear();
        }
        taken.retain(|(id, _)| !removed.contains(id));
        let added = std::mem::take(&mut inner.listeners);
        inner.listeners = taken;
        inner.listeners.extend(added);
    }
}

/// Current scroll offset plus change notifications.
///
/// Implemented by the plain [`NativeScroll`] and by the smooth-scroll driver; the scroller only
/// depends on this trait.
pub trait ScrollSource {
    /// Vertical document scroll offset in pixels.
    fn scroll(&self) -> f64;
    fn bus(&self) -> &ScrollBus;
}

/// Host-driven scroll offset with no interpolation.
#[derive(Debug, Default)]
pub struct NativeScroll {
    offset: f64,
    bus: ScrollBus,
}

impl NativeScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to `offset` (clamped at 0) and notify listeners.
    pub fn set_scroll(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
        self.bus.emit(self.offset);
    }
}

impl ScrollSource for NativeScroll {
    fn scroll(&self) -> f64 {
        self.offset
    }

    fn bus(&self) -> &ScrollBus {
        &self.bus
    }
}

/// Position of the scroll container within the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerLayout {
    /// Document offset of the container start.
    pub offset_top: f64,
    pub height: f64,
}

/// [`MetricsProvider`] reading a live [`ScrollSource`] against a fixed container layout.
pub struct SourceMetrics<'a> {
    pub source: &'a dyn ScrollSource,
    pub layout: ContainerLayout,
    pub viewport: Viewport,
}

impl MetricsProvider for SourceMetrics<'_> {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.layout.offset_top - self.source.scroll(),
            self.layout.height,
            self.viewport,
        )
    }
}

/// Live registration on a [`ScrollBus`]; removed on drop.
///
/// The latest offset delivered since the last [`ScrollSubscription::take`] is kept.
pub struct ScrollSubscription {
    bus: ScrollBus,
    id: ListenerId,
    latest: Rc<RefCell<Option<f64>>>,
}

impl ScrollSubscription {
    pub fn attach(source: &dyn ScrollSource) -> Self {
        let latest = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&latest);
        let bus = source.bus().clone();
        let id = bus.on(move |offset| {
            *slot.borrow_mut() = Some(offset);
        });
        Self { bus, id, latest }
    }

    /// Offset of the most recent event, if any arrived since the last call.
    pub fn take(&self) -> Option<f64> {
        self.latest.borrow_mut().take()
    }
}

impl Drop for ScrollSubscription {
    fn drop(&mut self) {
        self.bus.off(self.id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/source.rs"]
mod tests;
