//! Rendering and palette benchmarks
//!
//! Run with: `cargo bench --bench render_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grainplot::palette::palette_lines;
use grainplot::{render_frame, Bounds, Frame, NamedColorTable, Palette, RenderOptions};

/// A square container holding a grid of circles and triangles
fn packed_frame(per_side: usize) -> Frame {
    let mut source = String::from("-1 4 0 0 100 0 100 100 0 100 0\n");
    let step = 100.0 / per_side as f64;
    let radius = step * 0.4;

    for row in 0..per_side {
        for col in 0..per_side {
            let id = row * per_side + col;
            let (cx, cy) = ((col as f64 + 0.5) * step, (row as f64 + 0.5) * step);
            if id % 2 == 0 {
                source.push_str(&format!("{id} 1 {cx} {cy} {radius} {}\n", id % 10));
            } else {
                source.push_str(&format!(
                    "{id} 3 {} {} {} {} {cx} {} {}\n",
                    cx - radius,
                    cy - radius,
                    cx + radius,
                    cy - radius,
                    cy + radius,
                    id % 10
                ));
            }
        }
    }

    Frame::parse(&source).expect("benchmark frame should parse")
}

fn bench_render_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame");
    group.sample_size(20);

    let bounds = Bounds::new(0.0, 100.0, 0.0, 100.0).expect("valid bounds");
    for per_side in [10, 40] {
        let frame = packed_frame(per_side);
        let options = RenderOptions::new(bounds).with_size(500, 500);

        group.bench_with_input(
            BenchmarkId::from_parameter(frame.body_count()),
            &frame,
            |b, frame| b.iter(|| render_frame(black_box(frame), &options)),
        );
    }

    group.finish();
}

fn bench_parse_frame(c: &mut Criterion) {
    let frame = packed_frame(40);
    let source: String = frame
        .circles
        .iter()
        .map(|c| format!("{} 1 {} {} {} {}\n", c.id, c.center.x, c.center.y, c.radius, c.kind))
        .collect();

    c.bench_function("parse_frame_800_circles", |b| {
        b.iter(|| Frame::parse(black_box(&source)))
    });
}

fn bench_palette(c: &mut Criterion) {
    let table = NamedColorTable::builtin(Palette::Tableau);
    c.bench_function("palette_lines_tableau", |b| {
        b.iter(|| palette_lines(black_box(&table)))
    });
}

criterion_group!(benches, bench_render_frame, bench_parse_frame, bench_palette);
criterion_main!(benches);
