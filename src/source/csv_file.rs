//! CSV-backed row source.
//!
//! Lexing is delegated to the `csv` crate. This module only names the
//! columns, infers their types from a leading sample and turns fields into
//! values.

use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::config::CsvOptions;
use crate::debugger::{Component, DebugLevel};
use crate::source::RowSource;
use crate::source::errors::{SourceError, SourceResult};
use crate::types::value::{parse_bool, parse_float};
use crate::types::{ColumnDescriptor, Row, Schema, TypeTag, Value};
use crate::{db_debug, db_info, db_scope, db_trace};

/// Where records come from.
enum Input {
    Open(Reader<Box<dyn Read + Send>>),
    /// File closed after inference; reopened on the first read past the sample.
    Closed(PathBuf),
    Done,
}

pub struct CsvSource {
    name: String,
    schema: Schema,
    input: Input,
    /// Records consumed during inference, replayed before reading further.
    sample: VecDeque<StringRecord>,
    /// Failure on the record just past the window, reported after the sample.
    deferred: Option<SourceError>,
    options: CsvOptions,
    width: Option<usize>,
    /// 1-based number of the last data record pulled from the input.
    records_read: usize,
}

impl CsvSource {
    /// Opens `path` and infers its schema.
    ///
    /// The file is only held open while the schema is inferred and, later,
    /// while rows past the inference sample are read. Files that fit in the
    /// sample are closed before this returns.
    pub fn open(path: impl AsRef<Path>, options: &CsvOptions) -> SourceResult<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|e| SourceError::io(&name, e))?;

        db_info!(Component::Source, "opened {}", name);
        let mut source = Self::build(name, file, options)?;

        if matches!(source.input, Input::Open(_)) {
            db_debug!(Component::Source, "{}: closed until rows are needed", source.name);
            source.input = Input::Closed(path.to_path_buf());
        }
        Ok(source)
    }

    /// Reads from an arbitrary input. It stays open until the source is
    /// exhausted or dropped.
    pub fn from_reader<R>(name: impl Into<String>, input: R, options: &CsvOptions) -> SourceResult<Self>
    where
        R: Read + Send + 'static,
    {
        Self::build(name.into(), input, options)
    }

    fn build<R>(name: String, input: R, options: &CsvOptions) -> SourceResult<Self>
    where
        R: Read + Send + 'static,
    {
        let mut reader = reader_for(input, options);
        let header = if options.has_header {
            Some(reader.headers().map_err(|e| SourceError::csv(&name, e))?.clone())
        } else {
            None
        };

        let mut source = Self {
            name,
            schema: Schema::default(),
            input: Input::Open(reader),
            sample: VecDeque::new(),
            deferred: None,
            options: options.clone(),
            width: None,
            records_read: 0,
        };

        let names = match header {
            Some(header) => source.check_header(&header)?,
            None => source.generated_names()?,
        };
        let types = db_scope!(DebugLevel::Trace, Component::Source, "infer types", {
            source.infer_types(names.len())
        })?;

        source.schema = Schema::new(
            names
                .into_iter()
                .zip(types)
                .map(|(name, ty)| ColumnDescriptor::new(name, ty))
                .collect(),
        );

        db_debug!(Component::Source, "{}: inferred {}", source.name, source.schema);
        Ok(source)
    }

    /// Headerless input: width comes from the first record, kept for replay.
    fn generated_names(&mut self) -> SourceResult<Vec<String>> {
        let first = self.read_record()?.ok_or_else(|| SourceError::InvalidHeader {
            source: self.name.clone(),
            reason: "input is empty".into(),
        })?;
        let names = (1..=first.len()).map(|i| format!("column_{i}")).collect();
        self.sample.push_back(first);
        Ok(names)
    }

    fn check_header(&mut self, header: &StringRecord) -> SourceResult<Vec<String>> {
        if header.is_empty() {
            return Err(SourceError::InvalidHeader {
                source: self.name.clone(),
                reason: "no columns".into(),
            });
        }

        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(header.len());
        for (i, raw) in header.iter().enumerate() {
            let name = raw.trim();
            if name.is_empty() {
                return Err(SourceError::InvalidHeader {
                    source: self.name.clone(),
                    reason: format!("column {} has an empty name", i + 1),
                });
            }
            if !seen.insert(name.to_string()) {
                return Err(SourceError::InvalidHeader {
                    source: self.name.clone(),
                    reason: format!("duplicate column '{name}'"),
                });
            }
            names.push(name.to_string());
        }

        self.width = Some(names.len());
        Ok(names)
    }

    /// Infers from the first `infer_rows` records. One extra record is
    /// buffered to learn whether the window saw the whole input.
    fn infer_types(&mut self, width: usize) -> SourceResult<Vec<TypeTag>> {
        let limit = match self.options.infer_rows {
            0 => usize::MAX,
            n => n,
        };

        while self.sample.len() <= limit {
            match self.read_record() {
                Ok(Some(record)) => self.sample.push_back(record),
                Ok(None) => break,
                Err(err) if self.sample.len() == limit => {
                    self.deferred = Some(err);
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        let mut types = vec![TypeTag::Null; width];
        for record in self.sample.iter().take(limit) {
            for (ty, field) in types.iter_mut().zip(record.iter()) {
                *ty = ty.widen(infer_field(field, &self.options));
            }
        }

        let partial = self.sample.len() > limit || self.deferred.is_some();
        db_trace!(
            Component::Source,
            "{}: sampled {} record(s){}",
            self.name,
            self.sample.len().min(limit),
            if partial { ", input continues" } else { "" }
        );

        // A column empty throughout a partial window may still hold text
        // further down; only a fully read input proves it is all-null.
        if partial {
            for ty in types.iter_mut().filter(|ty| **ty == TypeTag::Null) {
                *ty = TypeTag::String;
            }
        }

        Ok(types)
    }

    /// Reopens a closed file and skips the records already pulled.
    fn reopen(&self, path: &Path) -> SourceResult<Reader<Box<dyn Read + Send>>> {
        let file = File::open(path).map_err(|e| SourceError::io(&self.name, e))?;
        let mut reader = reader_for(file, &self.options);

        let mut skipped = StringRecord::new();
        for _ in 0..self.records_read {
            let more = reader
                .read_record(&mut skipped)
                .map_err(|e| SourceError::csv(&self.name, e))?;
            if !more {
                return Err(SourceError::io(
                    &self.name,
                    io::Error::new(io::ErrorKind::UnexpectedEof, "file shrank after it was opened"),
                ));
            }
        }

        db_debug!(Component::Source, "{}: reopened at record {}", self.name, self.records_read + 1);
        Ok(reader)
    }

    /// Pulls the next record off the input and checks its width.
    fn read_record(&mut self) -> SourceResult<Option<StringRecord>> {
        if let Input::Closed(path) = &self.input {
            let reader = self.reopen(path)?;
            self.input = Input::Open(reader);
        }

        let Input::Open(reader) = &mut self.input else {
            return Ok(None);
        };

        let mut record = StringRecord::new();
        let more = reader
            .read_record(&mut record)
            .map_err(|e| SourceError::csv(&self.name, e))?;

        if !more {
            // Drops the reader, closing any file behind it.
            self.input = Input::Done;
            return Ok(None);
        }

        self.records_read += 1;

        // Headerless input takes its width from the first record.
        let expected = *self.width.get_or_insert(record.len());

        if record.len() != expected {
            return Err(SourceError::Malformed {
                source: self.name.clone(),
                row: self.records_read,
                expected,
                found: record.len(),
            });
        }

        Ok(Some(record))
    }

    fn to_row(&self, record: &StringRecord) -> Row {
        record
            .iter()
            .zip(&self.schema.columns)
            .map(|(field, col)| field_value(field, col.ty, &self.options))
            .collect()
    }
}

fn reader_for<R>(input: R, options: &CsvOptions) -> Reader<Box<dyn Read + Send>>
where
    R: Read + Send + 'static,
{
    ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(options.has_header)
        // Width is checked per record so errors can carry a row number.
        .flexible(true)
        .from_reader(Box::new(input) as Box<dyn Read + Send>)
}

impl RowSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_row(&mut self) -> SourceResult<Option<Row>> {
        let record = match self.sample.pop_front() {
            Some(record) => record,
            None => {
                if let Some(err) = self.deferred.take() {
                    self.input = Input::Done;
                    return Err(err);
                }
                match self.read_record()? {
                    Some(record) => record,
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(self.to_row(&record)))
    }
}

/// Narrowest tag that can hold `field`.
pub fn infer_field(field: &str, options: &CsvOptions) -> TypeTag {
    let field = field.trim();

    if options.is_null(field) {
        TypeTag::Null
    } else if field.parse::<i64>().is_ok() {
        TypeTag::Integer
    } else if parse_float(field).is_some() {
        TypeTag::Float
    } else if parse_bool(field).is_some() {
        TypeTag::Boolean
    } else {
        TypeTag::String
    }
}

/// Typed value for `field` under the column's inferred tag.
///
/// Fields past the inference sample may not fit the tag; they are passed on
/// as raw text and left for the concatenator to accept or reject.
fn field_value(field: &str, ty: TypeTag, options: &CsvOptions) -> Value {
    let trimmed = field.trim();
    if options.is_null(trimmed) {
        return Value::Null;
    }

    let typed = match ty {
        TypeTag::Integer => trimmed.parse::<i64>().ok().map(Value::Integer),
        TypeTag::Float => parse_float(trimmed).map(Value::Float),
        TypeTag::Boolean => parse_bool(trimmed).map(Value::Boolean),
        TypeTag::String | TypeTag::Null => None,
    };

    typed.unwrap_or_else(|| Value::String(field.to_string()))
}
