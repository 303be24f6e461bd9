use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::common::user;
use crate::burnout::alerts::AlertBus;
use crate::burnout::domain::{RiskAlert, RiskLevel};

fn alert() -> RiskAlert {
    RiskAlert {
        risk_level: RiskLevel::Severe,
        message: "Today's check-in shows severe burnout risk.".to_string(),
    }
}

#[test]
fn subscribers_receive_each_published_alert_once() {
    let bus = AlertBus::new();
    let maya = user("maya");
    let received = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&received);
    let _subscription = bus.subscribe(&maya, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    bus.publish(&maya, &alert());
    bus.publish(&maya, &alert());
    assert_eq!(received.load(Ordering::SeqCst), 2);
}

#[test]
fn cancelled_subscriptions_never_fire_again() {
    let bus = AlertBus::new();
    let maya = user("maya");
    let received = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&received);
    let subscription = bus.subscribe(&maya, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    bus.publish(&maya, &alert());
    subscription.cancel();
    bus.publish(&maya, &alert());

    assert_eq!(received.load(Ordering::SeqCst), 1);
    assert_eq!(bus.subscriber_count(&maya), 0);
}

#[test]
fn cancel_is_idempotent() {
    let bus = AlertBus::new();
    let maya = user("maya");
    let subscription = bus.subscribe(&maya, |_| {});

    subscription.cancel();
    subscription.cancel();
    assert_eq!(bus.subscriber_count(&maya), 0);
}

#[test]
fn dropping_the_handle_releases_the_channel() {
    let bus = AlertBus::new();
    let maya = user("maya");

    {
        let _subscription = bus.subscribe(&maya, |_| {});
        assert_eq!(bus.subscriber_count(&maya), 1);
    }
    assert_eq!(bus.subscriber_count(&maya), 0);
}

#[test]
fn alerts_are_scoped_to_their_user() {
    let bus = AlertBus::new();
    let maya = user("maya");
    let noor = user("noor");
    let received = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&received);
    let _subscription = bus.subscribe(&maya, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    bus.publish(&noor, &alert());
    assert_eq!(received.load(Ordering::SeqCst), 0);
}

#[test]
fn callbacks_see_the_published_payload() {
    let bus = AlertBus::new();
    let maya = user("maya");
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let _subscription = bus.subscribe(&maya, move |alert: &RiskAlert| {
        sink.lock().expect("mutex").push(alert.clone());
    });

    bus.publish(&maya, &alert());
    let seen = seen.lock().expect("mutex");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].risk_level, RiskLevel::Severe);
}
