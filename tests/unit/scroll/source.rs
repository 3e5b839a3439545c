use std::cell::Cell;

use super::*;

#[test]
fn bus_delivers_to_listeners_until_removed() {
    let bus = ScrollBus::new();
    let seen = Rc::new(Cell::new(0.0));
    let s = Rc::clone(&seen);
    let id = bus.on(move |y| s.set(y));

    bus.emit(12.5);
    assert_eq!(seen.get(), 12.5);

    assert!(bus.off(id));
    assert!(!bus.off(id));
    bus.emit(99.0);
    assert_eq!(seen.get(), 12.5);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn listener_can_remove_itself_mid_emit() {
    let bus = ScrollBus::new();
    let calls = Rc::new(Cell::new(0));
    let own_id: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

    let b = bus.clone();
    let c = Rc::clone(&calls);
    let me = Rc::clone(&own_id);
    let id = bus.on(move |_| {
        c.set(c.get() + 1);
        if let Some(id) = me.get() {
            b.off(id);
        }
    });
    own_id.set(Some(id));

    bus.emit(1.0);
    bus.emit(2.0);
    assert_eq!(calls.get(), 1);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn listener_added_mid_emit_fires_next_time() {
    let bus = ScrollBus::new();
    let late = Rc::new(Cell::new(0));
    let b = bus.clone();
    let l = Rc::clone(&late);
    let armed = Rc::new(Cell::new(false));
    let a = Rc::clone(&armed);
    bus.on(move |_| {
        if !a.replace(true) {
            let l = Rc::clone(&l);
            b.on(move |_| l.set(l.get() + 1));
        }
    });

    bus.emit(1.0);
    assert_eq!(late.get(), 0);
    bus.emit(2.0);
    assert_eq!(late.get(), 1);
    assert_eq!(bus.listener_count(), 2);
}

#[test]
fn native_scroll_clamps_and_notifies() {
    let mut native = NativeScroll::new();
    let sub = ScrollSubscription::attach(&native);
    assert_eq!(sub.take(), None);

    native.set_scroll(-20.0);
    assert_eq!(native.scroll(), 0.0);
    native.set_scroll(300.0);
    assert_eq!(sub.take(), Some(300.0));
    assert_eq!(sub.take(), None);
}

#[test]
fn dropping_subscription_unregisters() {
    let native = NativeScroll::new();
    let sub = ScrollSubscription::attach(&native);
    assert_eq!(native.bus().listener_count(), 1);
    drop(sub);
    assert_eq!(native.bus().listener_count(), 0);
}

#[test]
fn source_metrics_derives_top_from_offset() {
    let mut native = NativeScroll::new();
    native.set_scroll(1500.0);
    let m = SourceMetrics {
        source: &native,
        layout: ContainerLayout {
            offset_top: 500.0,
            height: 4000.0,
        },
        viewport: Viewport::new(800, 1000).unwrap(),
    }
    .metrics();
    assert_eq!(m.top, -1000.0);
    assert_eq!(m.height, 4000.0);
}
