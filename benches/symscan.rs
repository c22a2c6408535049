use criterion::{criterion_group, criterion_main, Criterion};
use image::{GrayImage, ImageFormat, Luma};
use std::hint::black_box;
use std::io::Cursor;
use symscan::{
    CancelToken, DetectionRequest, MatchConfig, Matcher, Normalizer, Pipeline,
    Template, TemplateDescriptor, TemplateId,
};

const GLYPH: u32 = 32;

fn glyph(x: u32, y: u32) -> bool {
    let outer = (5..27).contains(&x) && (5..27).contains(&y);
    let inner = (8..24).contains(&x) && (8..24).contains(&y);
    let ring = outer && !inner;
    let bar = (14..18).contains(&x) && (5..27).contains(&y);
    ring || bar
}

/// Grid of glyphs joined by thin pipe runs, roughly like a schematic sheet.
fn make_drawing(width: u32, height: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    for gy in (0..height.saturating_sub(GLYPH)).step_by(96) {
        for gx in (0..width.saturating_sub(GLYPH)).step_by(112) {
            for y in 0..GLYPH {
                for x in 0..GLYPH {
                    if glyph(x, y) {
                        img.put_pixel(gx + x, gy + y, Luma([20]));
                    }
                }
            }
            let pipe_y = gy + GLYPH / 2;
            for x in (gx + GLYPH)..(gx + 112).min(width) {
                img.put_pixel(x, pipe_y, Luma([40]));
            }
        }
    }
    img
}

fn make_glyph() -> GrayImage {
    GrayImage::from_fn(GLYPH, GLYPH, |x, y| Luma([if glyph(x, y) { 20 } else { 255 }]))
}

fn png(img: &GrayImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn bench_normalize(c: &mut Criterion) {
    let drawing = make_drawing(640, 480);
    let normalizer = Normalizer::default();

    c.bench_function("normalize_640x480", |b| {
        b.iter(|| normalizer.normalize_gray(black_box(&drawing)).unwrap())
    });
}

fn bench_match(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let drawing = make_drawing(640, 480);
    let target = normalizer.normalize_gray(&drawing).unwrap();
    let tpl_mask = normalizer.normalize_gray(&make_glyph()).unwrap();
    let template = Template::new(TemplateId(0), tpl_mask);

    let sequential = Matcher::new(&target);
    c.bench_function("match_640x480_seq", |b| {
        b.iter(|| {
            sequential
                .match_template(black_box(&template), &CancelToken::new())
                .unwrap()
        })
    });

    let parallel = Matcher::new(&target).with_config(MatchConfig {
        parallel: true,
        ..MatchConfig::default()
    });
    c.bench_function("match_640x480_par", |b| {
        b.iter(|| {
            parallel
                .match_template(black_box(&template), &CancelToken::new())
                .unwrap()
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let request = DetectionRequest::new(
        png(&make_drawing(640, 480)),
        vec![TemplateDescriptor::new(png(&make_glyph())).unwrap()],
        None,
    )
    .unwrap();
    let pipeline = Pipeline::default();

    c.bench_function("pipeline_640x480", |b| {
        b.iter(|| pipeline.run(black_box(&request), &CancelToken::new()).unwrap())
    });
}

criterion_group!(benches, bench_normalize, bench_match, bench_pipeline);
criterion_main!(benches);
