//! Benchmarks for segmentation mask processing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use physique_core::{FrameSize, Joint, Landmark, PoseLandmarks};
use physique_vision::brightness::{sample_average_luma, Rgb, RgbFrame};
use physique_vision::segmentation::{compute_slice_indices, MaskData};

/// Soft elliptical silhouette roughly filling the middle third of the frame
fn create_test_mask(width: usize, height: usize) -> MaskData {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let (rx, ry) = (width as f32 / 6.0, height as f32 * 0.45);
    let values = (0..width * height)
        .map(|i| {
            let (x, y) = ((i % width) as f32, (i / width) as f32);
            let d = ((x - cx) / rx).powi(2) + ((y - cy) / ry).powi(2);
            (1.2 - d).clamp(0.0, 1.0)
        })
        .collect();
    MaskData::new(values, width, height).expect("valid mask shape")
}

fn create_test_pose() -> PoseLandmarks {
    let mut pose = PoseLandmarks::empty();
    for (left, right, y) in [
        (Joint::LeftHip, Joint::RightHip, 0.52),
        (Joint::LeftKnee, Joint::RightKnee, 0.72),
        (Joint::LeftAnkle, Joint::RightAnkle, 0.92),
    ] {
        pose.set(left, Landmark::new(0.46, y, 0.95));
        pose.set(right, Landmark::new(0.54, y, 0.95));
    }
    pose
}

fn benchmark_mask_quality(c: &mut Criterion) {
    let mask_256 = create_test_mask(256, 256);
    let mask_512 = create_test_mask(512, 512);

    c.bench_function("mask_quality_256", |b| {
        b.iter(|| black_box(&mask_256).quality_score())
    });

    c.bench_function("mask_quality_512", |b| {
        b.iter(|| black_box(&mask_512).quality_score())
    });
}

fn benchmark_slice_indices(c: &mut Criterion) {
    let binary = create_test_mask(256, 256).binarize(0.5);
    let pose = create_test_pose();
    let frame = FrameSize::new(1080, 1920);

    c.bench_function("slice_indices_256", |b| {
        b.iter(|| compute_slice_indices(black_box(&binary), &pose, frame, 1700.0))
    });
}

fn benchmark_brightness(c: &mut Criterion) {
    let frame = RgbFrame::filled(1920, 1080, Rgb::new(120, 110, 100));

    c.bench_function("average_luma_1080p", |b| {
        b.iter(|| sample_average_luma(black_box(&frame)))
    });
}

criterion_group!(
    benches,
    benchmark_mask_quality,
    benchmark_slice_indices,
    benchmark_brightness
);
criterion_main!(benches);
