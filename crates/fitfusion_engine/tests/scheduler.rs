use std::sync::{Arc, Mutex};
use std::time::Duration;

use fitfusion_core::responder::{GRATITUDE_REPLY, WORKOUT_REPLIES};
use fitfusion_core::Responder;
use fitfusion_engine::{EngineEvent, EventSink, ReplyDelay, ReplyScheduler};
use tokio::time::Instant;

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test(start_paused = true)]
async fn reply_lands_inside_the_typing_window() {
    let sink = Arc::new(TestSink::default());
    let scheduler = ReplyScheduler::new(Responder::default(), ReplyDelay::default());

    let started = Instant::now();
    let task = scheduler.schedule(1, "How often should I workout?".to_string(), sink.clone());
    assert_eq!(scheduler.pending_count(), 1);
    task.await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(800), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(1_800), "{elapsed:?}");
    assert_eq!(scheduler.pending_count(), 0);

    let events = sink.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        EngineEvent::ReplyReady { exchange, reply } => {
            assert_eq!(*exchange, 1);
            assert!(WORKOUT_REPLIES.contains(&reply.as_str()));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn cancelled_reply_never_fires() {
    let sink = Arc::new(TestSink::default());
    let scheduler = ReplyScheduler::new(Responder::default(), ReplyDelay::default());

    let task = scheduler.schedule(7, "thank you".to_string(), sink.clone());
    assert!(scheduler.cancel(7));
    assert!(!scheduler.cancel(7));
    task.await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(sink.take().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_every_pending_reply() {
    let sink = Arc::new(TestSink::default());
    let scheduler = ReplyScheduler::new(Responder::default(), ReplyDelay::from_millis(100, 100));

    let first = scheduler.schedule(1, "hello".to_string(), sink.clone());
    let second = scheduler.schedule(2, "hello".to_string(), sink.clone());
    scheduler.shutdown();
    first.await.unwrap();
    second.await.unwrap();

    assert!(sink.take().is_empty());
    assert_eq!(scheduler.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn replies_are_independent_per_exchange() {
    let sink = Arc::new(TestSink::default());
    let scheduler = ReplyScheduler::new(Responder::default(), ReplyDelay::from_millis(10, 10));

    let kept = scheduler.schedule(1, "thank you".to_string(), sink.clone());
    let dropped = scheduler.schedule(2, "thank you".to_string(), sink.clone());
    scheduler.cancel(2);
    kept.await.unwrap();
    dropped.await.unwrap();

    assert_eq!(
        sink.take(),
        vec![EngineEvent::ReplyReady {
            exchange: 1,
            reply: GRATITUDE_REPLY.to_string(),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn rescheduled_exchange_stays_cancellable() {
    let sink = Arc::new(TestSink::default());
    let scheduler = ReplyScheduler::new(Responder::default(), ReplyDelay::from_millis(100, 100));

    let replaced = scheduler.schedule(5, "hello".to_string(), sink.clone());
    let current = scheduler.schedule(5, "hello".to_string(), sink.clone());
    replaced.await.unwrap();
    assert_eq!(scheduler.pending_count(), 1);

    assert!(scheduler.cancel(5));
    current.await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(sink.take().is_empty());
    assert_eq!(scheduler.pending_count(), 0);
}
