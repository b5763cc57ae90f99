use std::cell::Cell;

use mc_nbt::compression::inflate;
use mc_nbt::{write_as_root, Compound};
use mc_region::error::Error;
use mc_region::{
    list_chunk_locations, load_chunk, load_chunks_with, load_chunks_with_cancel, AnvilLocation,
    ChunkLocation, RegionFile,
};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn get_input() -> Vec<u8> {
    std::fs::read(format!(
        "{}/resources/r.0.-1.mca",
        env!("CARGO_MANIFEST_DIR")
    ))
    .expect("fixture is readable")
}

const ANVIL: AnvilLocation = AnvilLocation::new(0, -1);

#[traced_test]
#[test]
fn list_fixture_chunks() -> Result<(), Error> {
    let bytes = get_input();

    assert_eq!(
        list_chunk_locations(ANVIL, &bytes)?,
        vec![
            ChunkLocation::new(0, -32),
            ChunkLocation::new(10, -30),
            ChunkLocation::new(3, -27),
            ChunkLocation::new(31, -1),
        ]
    );

    let region = RegionFile::new(ANVIL, &bytes)?;
    assert_eq!(region.len(), 4);
    assert_eq!(region.timestamp(ChunkLocation::new(3, -27)), Some(1_700_000_000));
    assert_eq!(region.timestamp(ChunkLocation::new(31, -1)), Some(1_700_000_300));
    assert_eq!(region.timestamp(ChunkLocation::new(1, -32)), None);
    assert_eq!(
        region.entry(ChunkLocation::new(0, -32)).map(|e| e.sector.count),
        Some(2)
    );

    Ok(())
}

#[traced_test]
#[test]
fn load_fixture_chunk() -> Result<(), Error> {
    let bytes = get_input();

    let chunk = load_chunk(ChunkLocation::new(3, -27), &bytes)?.expect("chunk is present");
    assert_eq!(chunk.get_i32("xPos"), Some(3));
    assert_eq!(chunk.get_i32("zPos"), Some(-27));
    assert_eq!(chunk.get_str("Status"), Some("minecraft:full"));

    let big = load_chunk(ChunkLocation::new(0, -32), &bytes)?.expect("chunk is present");
    assert_eq!(big.get_long_array("Noise").map(<[i64]>::len), Some(600));

    assert_eq!(load_chunk(ChunkLocation::new(5, -20), &bytes)?, None);

    Ok(())
}

#[test]
fn reencode_is_byte_exact() -> Result<(), Error> {
    let bytes = get_input();
    let region = RegionFile::new(ANVIL, &bytes)?;

    for location in [ChunkLocation::new(0, -32), ChunkLocation::new(3, -27)] {
        let raw = region.raw_chunk(location)?.expect("chunk is present");
        let chunk = region.load_chunk(location)?.expect("chunk is present");

        let mut encoded = Vec::new();
        write_as_root(&chunk, &mut encoded)?;
        assert_eq!(encoded, inflate(raw.data)?);
    }

    Ok(())
}

#[test]
fn unsupported_and_corrupt_chunks() -> Result<(), Error> {
    let bytes = get_input();

    assert!(matches!(
        load_chunk(ChunkLocation::new(10, -30), &bytes),
        Err(Error::UnsupportedCompressionScheme(1))
    ));
    assert!(matches!(
        load_chunk(ChunkLocation::new(31, -1), &bytes),
        Err(Error::Nbt(mc_nbt::error::Error::CorruptData))
    ));

    Ok(())
}

#[traced_test]
#[test]
fn failing_chunks_do_not_stop_the_scan() -> Result<(), Error> {
    let bytes = get_input();

    let outcomes = load_chunks_with(ANVIL, &bytes, |location, chunk: Compound| {
        Ok::<_, Error>((location, chunk.get_i32("xPos")))
    })?;

    let summary: Vec<_> = outcomes
        .iter()
        .map(|outcome| (outcome.location, outcome.result.as_ref().ok().copied()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                ChunkLocation::new(0, -32),
                Some((ChunkLocation::new(0, -32), Some(0)))
            ),
            (ChunkLocation::new(10, -30), None),
            (
                ChunkLocation::new(3, -27),
                Some((ChunkLocation::new(3, -27), Some(3)))
            ),
            (ChunkLocation::new(31, -1), None),
        ]
    );
    assert!(logs_contain("skipping chunk"));

    Ok(())
}

#[test]
fn transform_errors_stay_with_their_chunk() -> Result<(), Error> {
    let bytes = get_input();

    let outcomes = load_chunks_with(ANVIL, &bytes, |location, _chunk| {
        if location == ChunkLocation::new(3, -27) {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    })?;

    let failed: Vec<_> = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_err())
        .map(|outcome| outcome.location)
        .collect();
    assert_eq!(
        failed,
        vec![
            ChunkLocation::new(10, -30),
            ChunkLocation::new(3, -27),
            ChunkLocation::new(31, -1),
        ]
    );

    Ok(())
}

#[traced_test]
#[test]
fn region_scan_reports_every_failure() -> Result<(), Error> {
    let bytes = get_input();
    let region = RegionFile::new(ANVIL, &bytes)?;

    let outcomes = region.load_all_with(|_, _| Err::<(), _>(Error::TruncatedBuffer));

    let locations: Vec<_> = outcomes.iter().map(|outcome| outcome.location).collect();
    assert_eq!(locations, region.chunk_locations().collect::<Vec<_>>());
    assert!(outcomes.iter().all(|outcome| outcome.result.is_err()));

    Ok(())
}

#[test]
fn cancel_between_chunks() {
    let bytes = get_input();
    let asked = Cell::new(0);
    let visited = Cell::new(0);

    let result = load_chunks_with_cancel(
        ANVIL,
        &bytes,
        || {
            asked.set(asked.get() + 1);
            asked.get() <= 2
        },
        |_, _| {
            visited.set(visited.get() + 1);
            Ok::<_, Error>(())
        },
    );

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(asked.get(), 3);
    // the second chunk uses an unsupported scheme and never reaches the transform
    assert_eq!(visited.get(), 1);
}
