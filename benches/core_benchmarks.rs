//! Benchmarks for callscope timeline resolution

use callscope_core::{
    CallRecord, Config, EventKind, EventMarker, Speaker, TranscriptLine, utils::format_timestamp,
};
use callscope_timeline::{
    CallTimeline, FrameRequest, Message, OverlayPolicy, Session, TimeWindow, Viewport,
    ZoomSettings, overlay::resolve_frame, sample::sample_call, segments::derive_segments,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

/// Generate a call of `lines` alternating utterances with short gaps
fn synthetic_call(lines: u32) -> CallRecord {
    let mut record = CallRecord::new(format!("synthetic-{lines}"), 0.0);
    let mut time = 0.0;
    for id in 1..=lines {
        let speaker = if id % 2 == 0 { Speaker::Customer } else { Speaker::Agent };
        let duration = f64::from(3 + id % 7);
        record
            .transcript
            .push(TranscriptLine::new(id, speaker, "Synthetic utterance", time, duration));
        time += duration + f64::from(id % 4);
    }
    record.total_duration = time + 30.0;
    record.markers = (1..=lines / 3)
        .map(|id| EventMarker::new(id, EventKind::KeyPoint, f64::from(id) * 9.0 % time))
        .collect();
    record
}

/// Benchmark resolving every lane for one window
fn bench_overlay_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay_resolution");

    for lines in [15_u32, 500, 5_000] {
        let record = if lines == 15 {
            sample_call()
        } else {
            synthetic_call(lines)
        };
        let Ok(call) = CallTimeline::new(record) else {
            continue;
        };
        let total = call.total();
        let windows = [
            TimeWindow::new(0.0, total),
            TimeWindow::new(total * 0.4, total / 5.0),
        ];

        group.throughput(Throughput::Elements(
            (call.segments().len() + call.markers().len()) as u64,
        ));
        for (name, window) in ["full", "zoomed"].into_iter().zip(windows) {
            let request = FrameRequest {
                window,
                playhead: window.center(),
                policy: OverlayPolicy::default(),
                tick_count: 6,
            };
            group.bench_with_input(
                BenchmarkId::new(name, lines),
                &request,
                |b, request| {
                    b.iter(|| {
                        resolve_frame(
                            black_box(call.segments()),
                            black_box(call.markers()),
                            request,
                        )
                        .item_count()
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark segment derivation from transcripts
fn bench_segment_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_derivation");

    for lines in [100_u32, 5_000] {
        let record = synthetic_call(lines);
        group.throughput(Throughput::Elements(u64::from(lines)));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &record, |b, record| {
            b.iter(|| derive_segments(black_box(&record.transcript), record.total_duration));
        });
    }

    group.finish();
}

/// Benchmark bursts of zoom, pan and drag input
fn bench_viewport_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_churn");

    group.bench_function("zoom_pan_drag", |b| {
        b.iter(|| {
            let mut viewport = Viewport::new(420.0, ZoomSettings::default());
            for step in 0..64 {
                match step % 6 {
                    0 | 1 => {
                        viewport.zoom_in();
                    }
                    2 => viewport.pan_right(),
                    3 => {
                        viewport.begin_drag(400.0);
                        viewport.drag_to(f64::from(step) * 10.0, 800.0);
                        viewport.end_drag();
                    }
                    4 => viewport.zoom_out(),
                    _ => viewport.pan_left(),
                }
            }
            black_box(viewport.window())
        });
    });

    group.bench_function("session_playback_minute", |b| {
        let Ok(call) = CallTimeline::new(sample_call()) else {
            return;
        };
        let config = Config::default();
        b.iter(|| {
            let mut session = Session::new(call.clone(), &config);
            session.update(Message::ZoomIn);
            session.update(Message::ZoomIn);
            session.update(Message::Play);
            for _ in 0..600 {
                session.update(Message::Tick(Duration::from_millis(100)));
            }
            black_box(session.frame().item_count())
        });
    });

    group.bench_function("format_ruler_labels", |b| {
        b.iter(|| {
            (0..420)
                .map(|second| format_timestamp(f64::from(second)))
                .collect::<Vec<_>>()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_overlay_resolution,
    bench_segment_derivation,
    bench_viewport_churn
);

criterion_main!(benches);
