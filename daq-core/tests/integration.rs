//! Integration tests — full pipeline runs, cross-thread queue traffic,
//! overload and shutdown scenarios on real OS threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use daq_core::{
    BoundedQueue, DaqError, Frame, FrameKind, KindDispatcher, Pipeline, PipelineConfig,
    WatermarkConfig, Worker, WorkerState,
};

// ── Helpers ──────────────────────────────────────────────────────

/// Poll `cond` until it holds or `timeout` elapses.
fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}

fn small_config(kind: FrameKind, depth: usize) -> PipelineConfig {
    PipelineConfig {
        kind,
        frame_size: 64,
        queue_depth: depth,
        watermark: None,
    }
}

/// Acquisition source writing a running sequence number into each frame.
fn sequence_source() -> impl FnMut(&mut [u8]) + Send + 'static {
    let mut seq = 0u32;
    move |out: &mut [u8]| {
        out[..4].copy_from_slice(&seq.to_le_bytes());
        seq += 1;
    }
}

/// Dispatch that forwards the payload untouched.
fn passthrough(frame: Frame) -> Result<Bytes, DaqError> {
    Ok(frame.into_payload().freeze())
}

/// Run `f` on a helper thread and fail the test if it does not return in time.
fn within<F: FnOnce() + Send + 'static>(timeout: Duration, f: F) {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    rx.recv_timeout(timeout).expect("operation hung");
}

// ── Pipeline end-to-end ──────────────────────────────────────────

#[test]
fn test_pipeline_delivers_frames_in_order() {
    let sent = Arc::new(Mutex::new(Vec::<u32>::new()));
    let sink = {
        let sent = Arc::clone(&sent);
        move |input: &[u8]| {
            let seq = u32::from_le_bytes(input[..4].try_into().unwrap());
            sent.lock().unwrap().push(seq);
        }
    };

    let mut pipeline = Pipeline::start(
        small_config(FrameKind::Video, 4),
        sequence_source(),
        passthrough,
        sink,
    )
    .unwrap();
    let ticks = pipeline.ticks();

    for i in 1..=20 {
        ticks.tick();
        assert!(
            wait_for(Duration::from_secs(5), || sent.lock().unwrap().len() == i),
            "frame {i} was not delivered"
        );
    }

    pipeline.stop();
    let sent = sent.lock().unwrap();
    assert_eq!(*sent, (0..20u32).collect::<Vec<_>>());
}

#[test]
fn test_pipeline_tags_frames_with_configured_kind() {
    let sent = Arc::new(Mutex::new(Vec::<Vec<u8>>::new()));
    let sink = {
        let sent = Arc::clone(&sent);
        move |input: &[u8]| sent.lock().unwrap().push(input[..14].to_vec())
    };

    let mut pipeline = Pipeline::start(
        small_config(FrameKind::Network, 2),
        |out: &mut [u8]| out.fill(b'z'),
        KindDispatcher::without_load(),
        sink,
    )
    .unwrap();

    pipeline.ticks().tick();
    assert!(wait_for(Duration::from_secs(5), || !sent.lock().unwrap().is_empty()));
    pipeline.stop();

    assert_eq!(&sent.lock().unwrap()[0][..], b"network_frame\0");
}

#[test]
fn test_generic_frames_are_reported_and_pipeline_keeps_running() {
    let sends = Arc::new(AtomicUsize::new(0));
    let sink = {
        let sends = Arc::clone(&sends);
        move |_: &[u8]| {
            sends.fetch_add(1, Ordering::SeqCst);
        }
    };

    let mut pipeline = Pipeline::start(
        small_config(FrameKind::Generic, 2),
        |_: &mut [u8]| {},
        KindDispatcher::without_load(),
        sink,
    )
    .unwrap();
    let consumer = pipeline.consumer_stats();

    for i in 1..=3 {
        pipeline.ticks().tick();
        assert!(wait_for(Duration::from_secs(5), || consumer.failures() == i));
    }

    assert!(pipeline.is_running());
    pipeline.stop();
    assert_eq!(sends.load(Ordering::SeqCst), 0);
}

// ── Overload ─────────────────────────────────────────────────────

#[test]
fn test_overload_is_reported_and_producer_continues() {
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let dispatch = move |frame: Frame| {
        // Hold the consumer inside dispatch until the gate closes.
        let _ = gate_rx.recv();
        passthrough(frame)
    };

    let mut pipeline = Pipeline::start(
        small_config(FrameKind::Audio, 1),
        sequence_source(),
        dispatch,
        |_: &[u8]| {},
    )
    .unwrap();
    let ticks = pipeline.ticks();
    let producer = pipeline.producer_stats();

    // 1st frame parks the consumer, 2nd fills the queue, 3rd and 4th overload.
    for i in 1..=4 {
        ticks.tick();
        assert!(wait_for(Duration::from_secs(5), || producer.iterations() == i));
        if i == 1 {
            assert!(wait_for(Duration::from_secs(5), || pipeline.queue_len() == 0));
        }
    }
    assert_eq!(producer.failures(), 2);
    assert_eq!(pipeline.queue_len(), 1);
    assert!(pipeline.is_running());

    drop(gate_tx);
    within(Duration::from_secs(5), move || pipeline.stop());
}

// ── Shutdown ─────────────────────────────────────────────────────

#[test]
fn test_stop_releases_blocked_workers() {
    let pipeline = Pipeline::start(
        small_config(FrameKind::Hardware, 3),
        |_: &mut [u8]| {},
        KindDispatcher::without_load(),
        |_: &[u8]| {},
    )
    .unwrap();

    // Both threads are parked: producer on the tick latch, consumer on dequeue.
    thread::sleep(Duration::from_millis(20));
    within(Duration::from_secs(5), move || drop(pipeline));
}

#[test]
fn test_worker_blocked_in_dequeue_stops_via_abort() {
    let queue = Arc::new(BoundedQueue::<u32>::new(2).unwrap());
    let mut worker = Worker::new("drain");
    let dequeued = Arc::new(AtomicUsize::new(0));

    worker
        .start(
            {
                let queue = Arc::clone(&queue);
                let dequeued = Arc::clone(&dequeued);
                move || {
                    if queue.dequeue().is_some() {
                        dequeued.fetch_add(1, Ordering::SeqCst);
                    }
                    Ok(())
                }
            },
            {
                let queue = Arc::clone(&queue);
                move || queue.abort()
            },
        )
        .unwrap();

    queue.enqueue(7).unwrap();
    assert!(wait_for(Duration::from_secs(5), || dequeued.load(Ordering::SeqCst) == 1));

    within(Duration::from_secs(5), move || {
        worker.request_stop();
        assert_eq!(worker.state(), WorkerState::Stopped);
    });
}

// ── Watermark ────────────────────────────────────────────────────

#[test]
fn test_pipeline_rejects_watermark_above_depth() {
    let config = PipelineConfig {
        watermark: Some(WatermarkConfig { low: 1, high: 5 }),
        ..small_config(FrameKind::Video, 4)
    };
    let result = Pipeline::start(
        config,
        |_: &mut [u8]| {},
        KindDispatcher::without_load(),
        |_: &[u8]| {},
    );
    assert!(matches!(result, Err(DaqError::Config(_))));
}

// ── Concurrency stress ───────────────────────────────────────────

#[test]
fn test_queue_stress_no_loss_no_duplication() {
    const N: u64 = 20_000;
    const DEPTH: usize = 8;

    let queue = Arc::new(BoundedQueue::<u64>::new(DEPTH).unwrap());

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for i in 0..N {
                let mut item = i;
                // enqueue never blocks; spin until the consumer frees a slot.
                while let Err(full) = queue.enqueue(item) {
                    item = full.into_inner();
                    thread::yield_now();
                }
            }
        })
    };

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut received = Vec::with_capacity(N as usize);
            let mut max_len = 0;
            for _ in 0..N {
                max_len = max_len.max(queue.len());
                received.push(queue.dequeue().expect("no abort was issued"));
            }
            (received, max_len)
        })
    };

    producer.join().unwrap();
    let (received, max_len) = consumer.join().unwrap();

    assert_eq!(received, (0..N).collect::<Vec<_>>());
    assert!(max_len <= DEPTH);
    assert!(queue.is_empty());
    assert_eq!(queue.free_slots(), DEPTH);
}
