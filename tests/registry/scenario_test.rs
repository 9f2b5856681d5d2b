/*!
 * Component Lifecycle Scenarios
 * Mount/unmount flows driven through component scopes
 */

use pretty_assertions::assert_eq;
use resource_lifecycle::{
    Event, EventEmitter, EventTarget, Listener, ListenerOptions, RegistryError, ResourceKind,
    ResourceRegistry,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_cleaned_up_timeout_never_fires() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Comp");
    let fired = Arc::new(AtomicBool::new(false));

    let flag = fired.clone();
    scope
        .create_timeout(
            "t1",
            move || flag.store(true, Ordering::SeqCst),
            Duration::from_millis(1000),
            "delayed refresh",
        )
        .unwrap();

    assert_eq!(scope.cleanup_component(), 1);
    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert!(!fired.load(Ordering::SeqCst));
    assert_eq!(registry.stats().count_of(ResourceKind::Timeout), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fired_timeout_leaves_registry_and_frees_id() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Search");
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = fired.clone();
    let timer = scope
        .create_timeout(
            "debounce",
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(300),
            "search debounce",
        )
        .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(timer.is_finished());
    assert_eq!(registry.stats().count_of(ResourceKind::Timeout), 0);
    assert_eq!(registry.stats().lifetime.expired, 1);
    assert!(!registry.dispose_one("debounce"));

    // Same id again, the usual debounce refresh
    let counter = fired.clone();
    scope
        .create_timeout(
            "debounce",
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(300),
            "search debounce",
        )
        .unwrap();
    assert_eq!(registry.stats().count_of(ResourceKind::Timeout), 1);
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 2);
    assert_eq!(scope.resource_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_many_fired_timeouts_do_not_accumulate() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Toasts");
    scope.create_abort_handle("keep", "long-lived fetch").unwrap();

    for n in 0..1000 {
        scope
            .create_timeout(
                format!("toast-{n}"),
                || {},
                Duration::from_millis(1),
                "toast dismiss",
            )
            .unwrap();
    }

    tokio::time::sleep(Duration::from_millis(10)).await;
    let stats = registry.stats();
    assert_eq!(stats.total_resources, 1);
    assert_eq!(stats.lifetime.expired, 1000);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_rescheduled_from_its_own_callback() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Poller");
    let fired = Arc::new(AtomicUsize::new(0));

    let next = scope.clone();
    let counter = fired.clone();
    scope
        .create_timeout(
            "retry",
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                next.create_timeout("retry", || {}, Duration::from_millis(100), "second retry")
                    .unwrap();
            },
            Duration::from_millis(100),
            "first retry",
        )
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    let live = registry.list_by_component("Poller");
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].description, "second retry");

    // The replacement is tracked and cancellable like any other timer
    assert_eq!(scope.cleanup_component(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_interval_stops_after_cleanup() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Poller");
    let ticks = Arc::new(AtomicUsize::new(0));

    let counter = ticks.clone();
    scope
        .create_interval(
            "poll",
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            Duration::from_millis(100),
            "listing availability poll",
        )
        .unwrap();

    tokio::time::sleep(Duration::from_millis(350)).await;
    let seen = ticks.load(Ordering::SeqCst);
    assert!(seen >= 3);

    assert_eq!(scope.cleanup_component(), 1);
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), seen);
}

#[test]
fn test_disposed_listener_is_not_invoked() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Gallery");
    let emitter = Arc::new(EventEmitter::new());
    let clicks = Arc::new(AtomicUsize::new(0));

    let counter = clicks.clone();
    let listener: Listener = Arc::new(move |_event: &Event| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    scope
        .add_event_listener(
            "l1",
            emitter.clone() as Arc<dyn EventTarget>,
            "click",
            listener,
            ListenerOptions::default(),
            "thumbnail click",
        )
        .unwrap();

    emitter.dispatch(&Event::new("click"));
    assert_eq!(clicks.load(Ordering::SeqCst), 1);

    assert!(registry.dispose_one("l1"));
    emitter.dispatch(&Event::new("click"));

    assert_eq!(clicks.load(Ordering::SeqCst), 1);
    assert_eq!(emitter.listener_count("click"), 0);
}

#[test]
fn test_component_disposal_is_isolated() {
    let registry = ResourceRegistry::new();
    let x = registry.scope("X").create_abort_handle("x1", "x fetch").unwrap();
    let y = registry.scope("Y").create_abort_handle("y1", "y fetch").unwrap();

    assert_eq!(registry.dispose_component("X"), 1);

    assert!(x.is_aborted());
    assert!(!y.is_aborted());
    assert_eq!(registry.list_by_component("Y").len(), 1);
    assert!(registry.list_by_component("X").is_empty());
}

#[test]
fn test_duplicate_id_rejected_without_mutation() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Checkout");
    let before = registry.stats().total_resources;

    let first = scope.create_abort_handle("payment", "payment intent").unwrap();
    let err = scope
        .create_abort_handle("payment", "payment intent retry")
        .unwrap_err();

    assert_eq!(err, RegistryError::DuplicateId("payment".into()));
    assert_eq!(registry.stats().total_resources, before + 1);
    assert_eq!(
        registry.list_all()[0].description,
        "payment intent".to_string()
    );
    assert!(!first.is_aborted());
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_timer_never_starts() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Checkout");
    let second_fired = Arc::new(AtomicBool::new(false));

    scope
        .create_timeout("expiry", || {}, Duration::from_millis(50), "hold expiry")
        .unwrap();
    let flag = second_fired.clone();
    let err = scope
        .create_timeout(
            "expiry",
            move || flag.store(true, Ordering::SeqCst),
            Duration::from_millis(50),
            "hold expiry again",
        )
        .unwrap_err();

    assert_eq!(err, RegistryError::DuplicateId("expiry".into()));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!second_fired.load(Ordering::SeqCst));
    assert_eq!(registry.stats().lifetime.rejected_duplicates, 1);
}

#[test]
fn test_duplicate_listener_is_not_attached() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Map");
    let emitter = Arc::new(EventEmitter::new());
    let hits = Arc::new(AtomicUsize::new(0));

    let make_listener = |hits: &Arc<AtomicUsize>| -> Listener {
        let hits = hits.clone();
        Arc::new(move |_event: &Event| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };

    scope
        .add_event_listener(
            "resize",
            emitter.clone(),
            "resize",
            make_listener(&hits),
            ListenerOptions::default(),
            "",
        )
        .unwrap();
    assert!(scope
        .add_event_listener(
            "resize",
            emitter.clone(),
            "resize",
            make_listener(&hits),
            ListenerOptions::default(),
            "",
        )
        .is_err());

    assert_eq!(emitter.listener_count("resize"), 1);
}

#[test]
fn test_id_reusable_after_disposal() {
    let registry = ResourceRegistry::new();
    let scope = registry.scope("Chat");

    scope.create_abort_handle("send", "").unwrap();
    assert!(scope.dispose("send"));
    assert!(scope.create_abort_handle("send", "").is_ok());
    assert_eq!(scope.resource_count(), 1);
}

#[tokio::test]
async fn test_scope_guard_releases_on_unmount() {
    let registry = ResourceRegistry::new();
    let unsubscribed = Arc::new(AtomicBool::new(false));

    {
        let guard = registry.scope("Notifications").guard();
        let flag = unsubscribed.clone();
        guard
            .add_subscription(
                "feed",
                move || flag.store(true, Ordering::SeqCst),
                "notification feed",
            )
            .unwrap();
        guard
            .create_interval("badge", || {}, Duration::from_secs(30), "badge refresh")
            .unwrap();
        assert_eq!(guard.resource_count(), 2);
    }

    assert!(unsubscribed.load(Ordering::SeqCst));
    assert_eq!(registry.stats().component_total("Notifications"), 0);
}
