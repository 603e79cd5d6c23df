use chrono::Local;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sentence_logger::{classify, CategoryLogger, MemoryDestination};
use tempfile::tempdir;

// A mix roughly like a live receiver: mostly GPS, some AIS, a little debug and noise.
const SENTENCES: [&[u8]; 8] = [
    b"$GNGLL,4916.45,N,12311.12,W,225444,A*1D\r\n",
    b"$GNGLL,4916.46,N,12311.13,W,225445,A*1F\r\n",
    b"!AIVDM,1,1,,B,15M67FC000G?ufbE`FepT@3n00Sa,0*5C\r\n",
    b"$GNGLL,4916.47,N,12311.14,W,225446,A*19\r\n",
    b"$PGRMZ,246,f,3*1B\r\n",
    b"!AIVDM,2,1,3,B,55P5TL01VIaAL@7WKO@mBplU@<PDhh000000001S;AJ::4A80?4i@E53,0*3E\r\n",
    b"$GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00*74\r\n",
    b"\xff\xfe$GNGLL,noise\r\n",
];

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ingest");

    group.bench_function("classify", |b| {
        b.iter(|| {
            for sentence in SENTENCES {
                let text = std::str::from_utf8(&sentence[..sentence.len() - 2]).unwrap_or("");
                black_box(classify(black_box(text)));
            }
        })
    });

    group.bench_function("memory_destinations", |b| {
        let mut logger = CategoryLogger::with_destinations(Local::now(), MemoryDestination::set());
        b.iter(|| {
            for sentence in SENTENCES {
                black_box(logger.ingest(sentence, Local::now()).unwrap());
            }
            // Keep memory bounded across iterations.
            if logger.stats().lines() % 80_000 == 0 {
                logger = CategoryLogger::with_destinations(Local::now(), MemoryDestination::set());
            }
        })
    });

    group.sample_size(20);
    group.bench_function("file_destinations", |b| {
        let dir = tempdir().unwrap();
        let mut logger = CategoryLogger::create(dir.path(), Local::now()).unwrap();
        b.iter(|| {
            for sentence in SENTENCES {
                black_box(logger.ingest(sentence, Local::now()).unwrap());
            }
            logger.maybe_flush(Local::now()).unwrap();
        });
        logger.shutdown().unwrap();
    });

    group.finish();
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
