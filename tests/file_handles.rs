//! Lives in its own binary so no other test opens files while descriptors
//! are being counted.

mod helpers;

use csvmerge::api::Merger;
use csvmerge::config::{CsvOptions, MergeOptions};
use csvmerge::types::Value;

use helpers::harness::TempDir;

#[cfg(target_os = "linux")]
fn open_descriptors() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

#[cfg(target_os = "linux")]
#[test]
fn directory_merge_holds_one_file_at_a_time() {
    let dir = TempDir::new();
    for i in 0..40 {
        dir.write(&format!("part_{i:02}.csv"), &format!("id,n\n{i},1\n{i},2\n{i},3\n"));
    }
    let csv = CsvOptions {
        infer_rows: 1,
        ..CsvOptions::default()
    };

    let before = open_descriptors();
    let mut m = Merger::new(MergeOptions::default()).with_csv_options(csv);
    assert_eq!(m.add_csv_dir(dir.path()).unwrap(), 40);
    let after_add = open_descriptors();

    assert!(
        after_add <= before + 1,
        "{} descriptor(s) open after adding 40 files, {} before",
        after_add,
        before
    );

    let mut rows = m.stream().unwrap();
    let mut seen = 0;
    let mut peak = after_add;
    for row in rows.by_ref() {
        let row = row.unwrap();
        assert_eq!(row[0], Value::Integer(seen / 3));
        assert_eq!(row[1], Value::Integer(seen % 3 + 1));
        seen += 1;
        peak = peak.max(open_descriptors());
    }

    assert_eq!(seen, 120);
    assert!(peak <= before + 2, "peak of {peak} descriptor(s), {before} before");
    assert_eq!(open_descriptors(), before);
}
