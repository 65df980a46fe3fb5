#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use crate::config::CsvOptions;
    use crate::source::{
        CsvSource, InMemorySource, RowSource, SourceError, discover_csv_files, drain,
    };
    use crate::types::{Schema, TypeTag, Value};

    fn csv(text: &str) -> Cursor<Vec<u8>> {
        Cursor::new(text.as_bytes().to_vec())
    }

    fn open(text: &str) -> CsvSource {
        CsvSource::from_reader("mem.csv", csv(text), &CsvOptions::default()).unwrap()
    }

    #[test]
    fn in_memory_source_yields_rows_in_order() {
        let schema = Schema::of(&[("x", TypeTag::Integer)]);
        let mut src = InMemorySource::new(
            "t",
            schema,
            vec![vec![Value::Integer(1)], vec![Value::Integer(2)]],
        );

        assert_eq!(src.remaining(), 2);
        assert_eq!(src.next_row().unwrap(), Some(vec![Value::Integer(1)]));
        assert_eq!(src.next_row().unwrap(), Some(vec![Value::Integer(2)]));
        assert_eq!(src.next_row().unwrap(), None);
    }

    #[test]
    fn csv_infers_column_types() {
        let src = open("id,score,name,active,empty\n1,2.5,x,true,\n2,3,y,FALSE,\n");

        assert_eq!(
            src.schema().types(),
            vec![
                TypeTag::Integer,
                TypeTag::Float,
                TypeTag::String,
                TypeTag::Boolean,
                TypeTag::Null
            ]
        );
    }

    #[test]
    fn csv_rows_are_typed_by_column() {
        let mut src = open("id,score,active,note\n7,1.5,True,\n");

        let row = src.next_row().unwrap().unwrap();
        assert_eq!(
            row,
            vec![
                Value::Integer(7),
                Value::Float(1.5),
                Value::Boolean(true),
                Value::Null
            ]
        );
        assert!(src.next_row().unwrap().is_none());
    }

    #[test]
    fn sample_is_replayed_not_lost() {
        let opts = CsvOptions {
            infer_rows: 2,
            ..CsvOptions::default()
        };
        let mut src = CsvSource::from_reader("mem.csv", csv("n\n1\n2\n3\n4\n"), &opts).unwrap();

        let rows = drain(&mut src).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], vec![Value::Integer(4)]);
    }

    #[test]
    fn values_past_the_sample_stay_raw() {
        let opts = CsvOptions {
            infer_rows: 1,
            ..CsvOptions::default()
        };
        let mut src = CsvSource::from_reader("mem.csv", csv("n\n1\nabc\n"), &opts).unwrap();

        assert_eq!(src.schema().types(), vec![TypeTag::Integer]);
        assert_eq!(src.next_row().unwrap(), Some(vec![Value::Integer(1)]));
        assert_eq!(src.next_row().unwrap(), Some(vec![Value::String("abc".into())]));
    }

    #[test]
    fn headerless_input_gets_generated_names() {
        let opts = CsvOptions {
            has_header: false,
            ..CsvOptions::default()
        };
        let mut src = CsvSource::from_reader("mem.csv", csv("1,a\n2,b\n"), &opts).unwrap();

        assert_eq!(src.schema().names(), vec!["column_1", "column_2"]);
        assert_eq!(drain(&mut src).unwrap().len(), 2);
    }

    #[test]
    fn null_token_and_delimiter_are_honored() {
        let opts = CsvOptions {
            delimiter: b';',
            null_token: Some("NA".into()),
            ..CsvOptions::default()
        };
        let mut src = CsvSource::from_reader("mem.csv", csv("a;b\nNA;2\n"), &opts).unwrap();

        assert_eq!(src.schema().types(), vec![TypeTag::Null, TypeTag::Integer]);
        assert_eq!(
            src.next_row().unwrap(),
            Some(vec![Value::Null, Value::Integer(2)])
        );
    }

    #[test]
    fn quoted_fields_keep_delimiters() {
        let mut src = open("name,city\n\"Doe, Jane\",Oslo\n");
        assert_eq!(
            src.next_row().unwrap(),
            Some(vec![Value::String("Doe, Jane".into()), Value::String("Oslo".into())])
        );
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = CsvSource::from_reader("dup.csv", csv("a,a\n1,2\n"), &CsvOptions::default())
            .err()
            .unwrap();

        assert!(matches!(err, SourceError::InvalidHeader { .. }));
        assert_eq!(err.source_name(), "dup.csv");
    }

    #[test]
    fn ragged_record_is_malformed() {
        let opts = CsvOptions {
            infer_rows: 1,
            ..CsvOptions::default()
        };
        let mut src = CsvSource::from_reader("r.csv", csv("a,b\n1,2\n3\n"), &opts).unwrap();

        assert!(src.next_row().unwrap().is_some());
        match src.next_row() {
            Err(SourceError::Malformed {
                row,
                expected,
                found,
                ..
            }) => {
                assert_eq!((row, expected, found), (2, 2, 1));
            }
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn header_only_file_has_null_columns() {
        let mut src = open("a,b\n");
        assert_eq!(src.schema().types(), vec![TypeTag::Null, TypeTag::Null]);
        assert!(src.next_row().unwrap().is_none());
    }

    #[test]
    fn column_empty_through_partial_window_becomes_string() {
        let mut text = String::from("id,note\n");
        for i in 1..=150 {
            let note = if i == 121 { "late note" } else { "" };
            text.push_str(&format!("{i},{note}\n"));
        }
        let mut src = open(&text);

        assert_eq!(src.schema().types(), vec![TypeTag::Integer, TypeTag::String]);

        let rows = drain(&mut src).unwrap();
        assert_eq!(rows.len(), 150);
        assert_eq!(rows[120][1], Value::from("late note"));
        assert_eq!(rows[0][1], Value::Null);
    }

    #[test]
    fn window_covering_whole_input_keeps_null_columns() {
        let opts = CsvOptions {
            infer_rows: 3,
            ..CsvOptions::default()
        };
        let mut src = CsvSource::from_reader("mem.csv", csv("a,b\n1,\n2,\n3,\n"), &opts).unwrap();

        assert_eq!(src.schema().types(), vec![TypeTag::Integer, TypeTag::Null]);
        assert_eq!(drain(&mut src).unwrap().len(), 3);
    }

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("csvmerge_{tag}_{}", rand::random::<u64>()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn file_is_reopened_past_the_sample() {
        let dir = scratch_dir("reopen");
        let path = dir.join("long.csv");
        fs::write(&path, "n,s\n1,a\n2,b\n3,c\n4,d\n").unwrap();
        let opts = CsvOptions {
            infer_rows: 1,
            ..CsvOptions::default()
        };

        let mut src = CsvSource::open(&path, &opts).unwrap();
        let rows = drain(&mut src).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec![Value::Integer(1), Value::from("a")]);
        assert_eq!(rows[2], vec![Value::Integer(3), Value::from("c")]);
        assert_eq!(rows[3], vec![Value::Integer(4), Value::from("d")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn file_is_not_held_between_inference_and_reading() {
        let dir = scratch_dir("closed");
        let long = dir.join("long.csv");
        let short = dir.join("short.csv");
        fs::write(&long, "n\n1\n2\n3\n").unwrap();
        fs::write(&short, "n\n1\n").unwrap();
        let opts = CsvOptions {
            infer_rows: 1,
            ..CsvOptions::default()
        };

        let mut long_src = CsvSource::open(&long, &opts).unwrap();
        let mut short_src = CsvSource::open(&short, &opts).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        // Fully sampled: nothing left to read from disk.
        assert_eq!(drain(&mut short_src).unwrap(), vec![vec![Value::Integer(1)]]);

        // An open handle would still read the unlinked file; a closed one cannot.
        assert_eq!(long_src.next_row().unwrap(), Some(vec![Value::Integer(1)]));
        assert_eq!(long_src.next_row().unwrap(), Some(vec![Value::Integer(2)]));
        assert!(matches!(long_src.next_row(), Err(SourceError::Io { .. })));
    }

    #[test]
    fn discovery_lists_only_csv_files_sorted() {
        let dir = std::env::temp_dir().join(format!("csvmerge_disc_{}", rand::random::<u64>()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.csv"), "x\n1\n").unwrap();
        fs::write(dir.join("a.CSV"), "x\n2\n").unwrap();
        fs::write(dir.join("notes.txt"), "hello").unwrap();
        fs::create_dir_all(dir.join("nested.csv")).unwrap();

        let files = discover_csv_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.CSV", "b.csv"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CsvSource::open("/definitely/not/here.csv", &CsvOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
