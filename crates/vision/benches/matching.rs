use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use vision::{ncc, Letterbox};

fn bench_letterbox(c: &mut Criterion) {
    let frame = RgbaImage::from_fn(1920, 1080, |x, y| Rgba([(x % 251) as u8, (y % 241) as u8, 0, 255]));
    let lb = Letterbox::new(512);
    c.bench_function("letterbox_1080p", |b| b.iter(|| lb.fit(black_box(&frame))));
}

fn bench_ncc(c: &mut Criterion) {
    let frame = GrayImage::from_fn(320, 180, |x, y| Luma([((x * 31) ^ (y * 17)) as u8]));
    let template = image::imageops::crop_imm(&frame, 100, 60, 24, 12).to_image();
    c.bench_function("ncc_320x180_24x12", |b| {
        b.iter(|| ncc::best_match(black_box(&frame), black_box(&template)))
    });
}

/// Menu-button sized template on full game resolutions.
fn bench_ncc_game_frames(c: &mut Criterion) {
    for (label, width, height) in [("720p", 1280, 720), ("1080p", 1920, 1080)] {
        let frame = GrayImage::from_fn(width, height, |x, y| {
            let cell = ((x / 8).wrapping_mul(73) ^ (y / 8).wrapping_mul(151)).wrapping_mul(2_654_435_761);
            Luma([(cell >> 24) as u8])
        });
        let template = image::imageops::crop_imm(&frame, width / 2 + 13, height / 2 + 7, 120, 40).to_image();
        c.bench_function(&format!("ncc_{label}_120x40"), |b| {
            b.iter(|| ncc::best_match(black_box(&frame), black_box(&template)))
        });
    }
}

criterion_group!(benches, bench_letterbox, bench_ncc, bench_ncc_game_frames);
criterion_main!(benches);
