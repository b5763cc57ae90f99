use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn get_input() -> Vec<u8> {
    std::fs::read(format!(
        "{}/resources/r.0.-1.mca",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

const ANVIL: mc_region::AnvilLocation = mc_region::AnvilLocation::new(0, -1);

pub mod read {
    use divan::Bencher;
    use mc_region::{load_chunks_with, ChunkLocation, RegionFile};

    use super::{get_input, ANVIL};

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(RegionFile::new(ANVIL, data).unwrap());
        });
    }

    #[divan::bench]
    fn load_chunk(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            let region = RegionFile::new(ANVIL, data).unwrap();
            divan::black_box(region.load_chunk(ChunkLocation::new(0, -32)).unwrap());
        });
    }

    #[divan::bench]
    fn load_all(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(
                load_chunks_with(ANVIL, data, |_, chunk| {
                    Ok::<_, mc_region::error::Error>(chunk.len())
                })
                .unwrap(),
            );
        });
    }
}

pub mod write {
    use divan::Bencher;
    use mc_region::write::{RegionWriter, RegionWriterOptions};
    use mc_region::RegionFile;

    use super::{get_input, ANVIL};

    #[divan::bench(sample_count = 10)]
    fn copy_region(bencher: Bencher) {
        let data = get_input();
        bencher.bench_local(move || {
            let region = RegionFile::new(ANVIL, &data).unwrap();
            let writer = RegionWriter::from_region(&region, RegionWriterOptions::default()).unwrap();
            divan::black_box(writer.finish().unwrap());
        });
    }
}
