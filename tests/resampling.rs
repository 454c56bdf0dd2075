//! Resampling integration tests.

mod common;

use common::{StubDecoder, StubDemuxer, StubResampler};
use lumaslice::{
    AnnexBNormalizer, ExtractionConfig, ExtractionSession, PlanarPicture, RegionSpec,
    SelectionPolicy,
};

fn quadrants(_: u64) -> PlanarPicture {
    // Four 32x32 quadrants: 10, 20 / 30, 40.
    PlanarPicture::from_fn(64, 64, 64, |column, row| match (column < 32, row < 32) {
        (true, true) => 10,
        (false, true) => 20,
        (true, false) => 30,
        (false, false) => 40,
    })
}

fn run(config: ExtractionConfig, pictures: u64) -> (ExtractionSession, StubResampler) {
    let mut demuxer = StubDemuxer::video(pictures as usize);
    let mut decoder = StubDecoder::new(pictures, quadrants);
    let mut normalizer = AnnexBNormalizer::passthrough();
    let mut resampler = StubResampler::default();
    let mut session = ExtractionSession::new(config);

    session
        .run(&mut demuxer, &mut normalizer, &mut decoder, &mut resampler)
        .expect("run");
    (session, resampler)
}

#[test]
fn resampling_maps_native_size_to_region_size() {
    let config = ExtractionConfig::new()
        .with_policy(SelectionPolicy::run(0, 3).unwrap())
        .with_region(RegionSpec::new(8, 4).unwrap())
        .with_resample(true);

    let (session, resampler) = run(config, 3);

    assert_eq!(resampler.calls, vec![(64, 64, 8, 4); 3]);
    assert_eq!(session.records().len(), 3);
    let expected: Vec<u8> = [[10, 20], [10, 20], [30, 40], [30, 40]]
        .iter()
        .flat_map(|&[left, right]| [[left; 4], [right; 4]].concat())
        .collect();
    assert_eq!(session.records()[0].pixels(), expected.as_slice());
}

#[test]
fn without_resampling_the_native_corner_is_taken() {
    let config = ExtractionConfig::new()
        .with_policy(SelectionPolicy::single(0))
        .with_region(RegionSpec::square(16).unwrap());

    let (session, resampler) = run(config, 1);

    assert!(resampler.calls.is_empty());
    assert_eq!(session.records().len(), 1);
    assert!(session.records()[0].pixels().iter().all(|&sample| sample == 10));
}

#[test]
fn resampled_region_ignores_configured_origin() {
    let config = ExtractionConfig::new()
        .with_policy(SelectionPolicy::single(0))
        .with_region(RegionSpec::square(2).unwrap().with_origin(40, 40))
        .with_resample(true);

    let (session, _) = run(config, 1);

    assert_eq!(session.records()[0].pixels(), &[10, 20, 30, 40]);
}

#[test]
fn native_extraction_ignores_configured_origin() {
    let config = ExtractionConfig::new()
        .with_policy(SelectionPolicy::single(0))
        .with_region(RegionSpec::square(2).unwrap().with_origin(40, 40));

    let (session, resampler) = run(config, 1);

    assert!(resampler.calls.is_empty());
    assert_eq!(session.records()[0].pixels(), &[10, 10, 10, 10]);
}
