//! Property tests: exact counting against a single-threaded reference and
//! Bloom engine membership guarantees.

use ipcount::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_lines(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn count(file: &NamedTempFile, engine: EngineKind, workers: usize) -> u64 {
    let config = RunConfig::builder()
        .input(file.path())
        .engine(engine)
        .workers(workers)
        .bloom(BloomConfig::new(1 << 24, 5))
        .build()
        .unwrap();
    Driver::new(config).unwrap().run().unwrap().distinct
}

/// Dotted quads drawn from a small pool so duplicates are common.
fn fixed_width_ip() -> impl Strategy<Value = String> {
    (0u8..4, 0u8..16).prop_map(|(c, d)| format!("192.168.{:03}.{:03}", c, d))
}

fn any_ip() -> impl Strategy<Value = String> {
    any::<[u8; 4]>().prop_map(|o| format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3]))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn exact_matches_reference_for_any_worker_count(
        lines in prop::collection::vec(fixed_width_ip(), 0..120),
        workers in 1usize..=6,
    ) {
        // Whole lines per range: equal-width lines, count divisible by workers
        let keep = lines.len() - lines.len() % workers;
        let lines = &lines[..keep];
        let expected = lines.iter().collect::<HashSet<_>>().len() as u64;

        let file = write_lines(lines);
        prop_assert_eq!(count(&file, EngineKind::Exact, workers), expected);
    }

    #[test]
    fn bloom_single_worker_matches_exact_on_small_files(
        lines in prop::collection::vec(any_ip(), 0..60),
    ) {
        let file = write_lines(&lines);
        let exact = count(&file, EngineKind::Exact, 1);
        prop_assert_eq!(count(&file, EngineKind::Bloom, 1), exact);
    }

    #[test]
    fn bloom_has_no_false_negatives(
        keys in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..24), 0..200),
        word_blocked in any::<bool>(),
    ) {
        let layout = if word_blocked { BloomLayout::WordBlocked } else { BloomLayout::Classic };
        let engine = BloomEngine::new(BloomConfig::new(2_048, 4).with_layout(layout)).unwrap();

        for key in &keys {
            engine.add(key);
        }
        for key in &keys {
            prop_assert!(engine.test(key));
        }
    }

    #[test]
    fn bloom_never_reports_more_than_seen(
        keys in prop::collection::vec(any_ip(), 0..200),
    ) {
        let engine = BloomEngine::new(BloomConfig::new(4_096, 3)).unwrap();
        let distinct = keys.iter().collect::<HashSet<_>>().len();
        let reported = keys.iter().filter(|k| engine.test_and_insert(k.as_bytes())).count();
        prop_assert!(reported <= distinct);
    }

    #[test]
    fn partition_covers_file(size in 0u64..1_000_000, parts in 1usize..64) {
        let ranges = ipcount::reader::partition(size, parts);
        prop_assert_eq!(ranges.len(), parts);
        prop_assert_eq!(ranges.iter().map(|r| r.len).sum::<u64>(), size);
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].end(), pair[1].start);
        }
    }
}
