//! Criterion benchmarks for the PC Remote JSON codec.
//!
//! `mouse_move` commands fire continuously while the user drags on the
//! touchpad view, and screen frames arrive at capture rate during
//! mirroring — encode and frame-decode latency bound the interactive feel.
//!
//! Run with:
//! ```bash
//! cargo bench --package remote-core --bench codec_bench
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use remote_core::{
    decode_event, encode_command, Command, FileAction, InputAction, MediaAction, SystemAction,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_mouse_move() -> Command {
    Command::input(
        InputAction::MouseMove {
            delta_x: 5,
            delta_y: -3,
        },
        1_712_345_678_901,
    )
}

fn make_play_pause() -> Command {
    Command::media(MediaAction::PlayPause, 1_712_345_678_902)
}

fn make_shutdown() -> Command {
    Command::system(SystemAction::Shutdown, 1_712_345_678_903)
}

fn make_file_transfer(size: usize) -> Command {
    Command::file(
        &FileAction::Receive {
            filename: "bench.bin".to_string(),
            contents: vec![0xAB; size],
        },
        1_712_345_678_904,
    )
}

/// A screen-frame wire message with `size` bytes of JPEG-signed payload.
fn make_frame_message(size: usize) -> String {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.resize(size, 0x42);
    format!(
        r#"{{"type":"screen","action":"frame","data":"{}"}}"#,
        BASE64.encode(&bytes)
    )
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.bench_function("mouse_move", |b| {
        let cmd = make_mouse_move();
        b.iter(|| encode_command(black_box(&cmd)));
    });
    group.bench_function("play_pause", |b| {
        let cmd = make_play_pause();
        b.iter(|| encode_command(black_box(&cmd)));
    });
    group.bench_function("shutdown", |b| {
        let cmd = make_shutdown();
        b.iter(|| encode_command(black_box(&cmd)));
    });
    group.bench_function("file_64k", |b| {
        let cmd = make_file_transfer(64 * 1024);
        b.iter(|| encode_command(black_box(&cmd)));
    });
    group.finish();
}

fn bench_decode_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_frame");
    for size in [4 * 1024usize, 64 * 1024, 512 * 1024] {
        let text = make_frame_message(size);
        group.bench_function(format!("{}k", size / 1024), |b| {
            b.iter(|| decode_event(black_box(&text)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode_frame);
criterion_main!(benches);
