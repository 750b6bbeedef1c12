//! Render backend benchmark: Measure frame synthesis performance.
//!
//! Target: < 1ms for a 200×50 full-change frame on either backend

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rasterm::screen::default_color_table;
use rasterm::{
    Backend, CharCell, Console, DisplayError, EscapeBackend, IndexedPixel, NativeBackend, Rect,
    Rgb, RgbPixel, ScreenBuffer, SurfaceOptions,
};
use std::io;

/// Device that swallows output so only synthesis cost is measured.
struct SinkConsole;

impl Console for SinkConsole {
    fn acquire(&mut self, _options: SurfaceOptions) -> Result<(), DisplayError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_buffer_size(&mut self, _width: u16, _height: u16) -> io::Result<()> {
        Ok(())
    }

    fn set_font(&mut self, _width: u16, _height: u16) -> io::Result<()> {
        Ok(())
    }

    fn max_size(&self, _font_width: u16, _font_height: u16) -> (u16, u16) {
        (u16::MAX, u16::MAX)
    }

    fn set_window_rect(&mut self, _rect: Rect) -> io::Result<()> {
        Ok(())
    }

    fn window_rect(&self) -> io::Result<Rect> {
        Ok(Rect::from_size(300, 80))
    }

    fn blit(&mut self, cells: &[CharCell], _dest: Rect) -> io::Result<()> {
        black_box(cells.len());
        Ok(())
    }

    fn write_stream(&mut self, bytes: &[u8]) -> io::Result<()> {
        black_box(bytes.len());
        Ok(())
    }

    fn color_table(&self) -> io::Result<[Rgb; 16]> {
        Ok(default_color_table())
    }

    fn set_color_table(&mut self, _table: &[Rgb; 16]) -> io::Result<()> {
        Ok(())
    }

    fn set_title(&mut self, _title: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Create a true-color buffer where every cell differs from its neighbor.
fn create_rgb_buffer(width: u16, height: u16, seed: u8) -> ScreenBuffer<RgbPixel> {
    let mut buffer = ScreenBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = ((x + y + seed as u16) % 26 + 65) as u8 as char; // A-Z
            let cell = RgbPixel::new(c)
                .with_fg(Rgb::new(
                    ((x * 3 + seed as u16) % 256) as u8,
                    ((y * 7 + seed as u16) % 256) as u8,
                    ((x + y + seed as u16) % 256) as u8,
                ))
                .with_bg(Rgb::new(20, 20, 30));
            buffer.set(x, y, cell);
        }
    }
    buffer
}

/// Create an indexed buffer cycling through all 16 palette slots.
fn create_indexed_buffer(width: u16, height: u16, seed: u8) -> ScreenBuffer<IndexedPixel> {
    let mut buffer = ScreenBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = ((x + y + seed as u16) % 26 + 65) as u8 as char; // A-Z
            let cell = IndexedPixel::new(c)
                .with_fg(((x + y + seed as u16) % 16) as u8)
                .with_bg(((x / 8) % 16) as u8);
            buffer.set(x, y, cell);
        }
    }
    buffer
}

fn escape_full_change(c: &mut Criterion) {
    let buffer = create_rgb_buffer(200, 50, 0);
    let mut backend = EscapeBackend::new();
    let mut sink = SinkConsole;

    c.bench_function("escape_render_200x50_full_change", |b| {
        b.iter(|| {
            backend
                .render(&mut sink, black_box(buffer.cells()), buffer.rect())
                .unwrap()
        })
    });
}

fn escape_uniform(c: &mut Criterion) {
    let mut buffer: ScreenBuffer<RgbPixel> = ScreenBuffer::new(200, 50);
    let cell = RgbPixel::new('#')
        .with_fg(Rgb::new(200, 200, 200))
        .with_bg(Rgb::new(20, 20, 30));
    buffer.clear(cell);
    let mut backend = EscapeBackend::new();
    let mut sink = SinkConsole;

    c.bench_function("escape_render_200x50_uniform", |b| {
        b.iter(|| {
            backend
                .render(&mut sink, black_box(buffer.cells()), buffer.rect())
                .unwrap()
        })
    });
}

fn escape_sparse(c: &mut Criterion) {
    // Mostly transparent cells exercise the skip path.
    let mut buffer: ScreenBuffer<RgbPixel> = ScreenBuffer::new(200, 50);
    for y in (0..50).step_by(3) {
        for x in (0..200).step_by(7) {
            buffer.set(x, y, RgbPixel::new('*').with_fg(Rgb::new(255, 255, 0)));
        }
    }
    let mut backend = EscapeBackend::new();
    let mut sink = SinkConsole;

    c.bench_function("escape_render_200x50_sparse", |b| {
        b.iter(|| {
            backend
                .render(&mut sink, black_box(buffer.cells()), buffer.rect())
                .unwrap()
        })
    });
}

fn native_pack(c: &mut Criterion) {
    let buffer = create_indexed_buffer(200, 50, 0);
    let mut backend = NativeBackend::new();
    let mut sink = SinkConsole;

    c.bench_function("native_render_200x50_full_change", |b| {
        b.iter(|| {
            backend
                .render(&mut sink, black_box(buffer.cells()), buffer.rect())
                .unwrap()
        })
    });
}

fn render_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_render_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50), (300, 80)] {
        let buffer = create_rgb_buffer(width, height, 0);
        let mut backend = EscapeBackend::new();
        let mut sink = SinkConsole;

        group.bench_with_input(
            BenchmarkId::new("full_change", format!("{}x{}", width, height)),
            &buffer,
            |b, buf| {
                b.iter(|| {
                    backend
                        .render(&mut sink, black_box(buf.cells()), buf.rect())
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    escape_full_change,
    escape_uniform,
    escape_sparse,
    native_pack,
    render_by_size,
);
criterion_main!(benches);
