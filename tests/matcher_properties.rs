use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use symscan::{
    BinaryMask, CancelToken, MatchConfig, MatchFailure, Matcher, OwnedImage, SymScanError,
    Template, TemplateId,
};

const SIDE: usize = 24;

fn plus(x: usize, y: usize) -> bool {
    ((10..13).contains(&x) && (4..20).contains(&y)) || ((10..13).contains(&y) && (4..20).contains(&x))
}

fn mask_with(width: usize, height: usize, stamps: &[(usize, usize)]) -> BinaryMask {
    let mut data = vec![0u8; width * height];
    for &(px, py) in stamps {
        for y in 0..SIDE {
            for x in 0..SIDE {
                if plus(x, y) {
                    data[(py + y) * width + px + x] = 255;
                }
            }
        }
    }
    BinaryMask::from_image(OwnedImage::new(data, width, height).unwrap()).unwrap()
}

fn plus_template(id: usize) -> Template {
    Template::new(TemplateId(id), mask_with(SIDE, SIDE, &[(0, 0)]))
}

#[test]
fn scores_respect_threshold_and_range() {
    let target = mask_with(96, 48, &[(5, 6), (60, 20)]);
    let template = plus_template(0);

    for threshold in [0.3f32, 0.6, 0.8, 1.0] {
        let matcher = Matcher::new(&target).with_config(MatchConfig {
            threshold,
            ..MatchConfig::default()
        });
        let found = matcher
            .match_template(&template, &CancelToken::new())
            .unwrap();
        assert!(found.len() >= 2, "threshold {threshold}");
        for det in &found {
            assert!(det.confidence >= threshold);
            assert!(det.confidence <= 1.0);
            assert_eq!((det.bbox.width(), det.bbox.height()), (SIDE as u32, SIDE as u32));
            assert_eq!(det.template, TemplateId(0));
        }
    }
}

#[test]
fn exact_copies_score_one_in_row_major_order() {
    let target = mask_with(96, 48, &[(60, 2), (5, 20)]);
    let matcher = Matcher::new(&target).with_config(MatchConfig {
        threshold: 1.0,
        ..MatchConfig::default()
    });

    let found = matcher
        .match_template(&plus_template(0), &CancelToken::new())
        .unwrap();

    let origins: Vec<(u32, u32)> = found.iter().map(|d| d.bbox.top_left()).collect();
    assert_eq!(origins, vec![(60, 2), (5, 20)]);
    assert!(found.iter().all(|d| d.confidence == 1.0));
}

#[test]
fn irregular_pattern_copy_is_found_at_threshold_one() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let pattern: Vec<u8> = (0..SIDE * SIDE)
        .map(|_| if rng.random_bool(0.5) { 255 } else { 0 })
        .collect();
    let (width, height, ox, oy) = (64, 54, 23, 17);
    let mut data = vec![0u8; width * height];
    for y in 0..SIDE {
        let row = &pattern[y * SIDE..(y + 1) * SIDE];
        data[(oy + y) * width + ox..(oy + y) * width + ox + SIDE].copy_from_slice(row);
    }
    let target = BinaryMask::from_image(OwnedImage::new(data, width, height).unwrap()).unwrap();
    let template = Template::new(
        TemplateId(0),
        BinaryMask::from_image(OwnedImage::new(pattern, SIDE, SIDE).unwrap()).unwrap(),
    );
    let matcher = Matcher::new(&target).with_config(MatchConfig {
        threshold: 1.0,
        ..MatchConfig::default()
    });

    let found = matcher
        .match_template(&template, &CancelToken::new())
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].bbox.top_left(), (ox as u32, oy as u32));
    assert_eq!(found[0].confidence, 1.0);
}

#[test]
fn blank_target_has_no_candidates() {
    let target = mask_with(64, 64, &[]);
    let matcher = Matcher::new(&target).with_config(MatchConfig {
        threshold: 0.1,
        ..MatchConfig::default()
    });

    let found = matcher
        .match_template(&plus_template(0), &CancelToken::new())
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn template_as_large_as_target_has_one_placement() {
    let target = mask_with(SIDE, SIDE, &[(0, 0)]);
    let found = Matcher::new(&target)
        .match_template(&plus_template(0), &CancelToken::new())
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].bbox.top_left(), (0, 0));
}

#[test]
fn oversized_template_is_a_match_error() {
    let target = mask_with(SIDE, SIDE, &[(0, 0)]);
    let tall = Template::new(TemplateId(4), mask_with(SIDE, SIDE + 8, &[(0, 4)]));

    let err = Matcher::new(&target)
        .match_template(&tall, &CancelToken::new())
        .unwrap_err();
    assert_eq!(
        err,
        SymScanError::Match {
            template: TemplateId(4),
            reason: MatchFailure::TemplateLargerThanTarget {
                tpl_width: SIDE,
                tpl_height: SIDE + 8,
                img_width: SIDE,
                img_height: SIDE,
            },
        }
    );
}

#[test]
fn flat_template_is_degenerate() {
    let target = mask_with(64, 64, &[(10, 10)]);
    let flat = Template::new(TemplateId(2), mask_with(SIDE, SIDE, &[]));

    let err = Matcher::new(&target)
        .match_template(&flat, &CancelToken::new())
        .unwrap_err();
    assert_eq!(
        err,
        SymScanError::Match {
            template: TemplateId(2),
            reason: MatchFailure::DegenerateTemplate,
        }
    );
}

#[test]
fn cancelled_scan_stops() {
    let target = mask_with(64, 64, &[(10, 10)]);
    let token = CancelToken::new();
    token.cancel();

    let err = Matcher::new(&target)
        .match_template(&plus_template(0), &token)
        .unwrap_err();
    assert_eq!(err, SymScanError::Cancelled);
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let target = mask_with(64, 64, &[(10, 10)]);
    let matcher = Matcher::new(&target).with_config(MatchConfig {
        threshold: 0.0,
        ..MatchConfig::default()
    });

    let err = matcher
        .match_template(&plus_template(0), &CancelToken::new())
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
}
