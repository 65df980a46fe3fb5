use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use csvmerge::api::Merger;
use csvmerge::config::{CliConfig, LOG_ENV_VAR};
use csvmerge::debugger::{Component, get_report, set_debug_level};
use csvmerge::output::{render_table, write_stream_file};
use csvmerge::source::{CsvSource, RowSource, discover_csv_files};
use csvmerge::{db_error, db_info};

const USAGE: &str = "\
usage: csvmerge [flags] [files...]

  --dir=PATH            merge every .csv file in PATH
  --out=PATH            write the merged table to PATH instead of printing it
  --head=N              rows to print (default 5)
  --order=first_seen|alphabetical
  --types=relaxed|strict
  --lenient             replace unconvertible values with NULL
  --ignore-case         match column names case-insensitively
  --parallel            read sources on worker threads
  --delimiter=C --quote=C --no-header --null=TOKEN --infer-rows=N
  --debug=LEVEL         0-5 or off|error|warn|info|debug|trace (also CSVMERGE_LOG)
  --timings             print phase timings to stderr
  --shell               interactive mode";

fn main() -> Result<()> {
    let env_level = std::env::var(LOG_ENV_VAR).ok();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let cfg = CliConfig::from_args(&args, env_level.as_deref())?;
    set_debug_level(cfg.debug_level);

    if cfg.shell {
        return Session::new(cfg).run();
    }

    if !cfg.has_inputs() {
        bail!("nothing to merge\n\n{USAGE}");
    }

    let result = run_batch(&cfg);
    if cfg.timings {
        eprintln!("{}", get_report());
    }
    if let Err(err) = &result {
        db_error!(Component::Cli, "{:#}", err);
    }
    result
}

fn input_paths(cfg: &CliConfig) -> Result<Vec<PathBuf>> {
    let mut paths = cfg.files.clone();
    if let Some(dir) = &cfg.dir {
        let found = discover_csv_files(dir)
            .with_context(|| format!("listing {}", dir.display()))?;
        if found.is_empty() {
            bail!("no .csv files in {}", dir.display());
        }
        paths.extend(found);
    }
    Ok(paths)
}

fn build_merger(cfg: &CliConfig, paths: &[PathBuf]) -> Result<Merger> {
    let mut merger = Merger::new(cfg.merge.clone()).with_csv_options(cfg.csv.clone());
    for path in paths {
        merger
            .add_csv(path)
            .with_context(|| format!("opening {}", path.display()))?;
    }
    Ok(merger)
}

fn run_batch(cfg: &CliConfig) -> Result<()> {
    let paths = input_paths(cfg)?;
    let merger = build_merger(cfg, &paths)?;

    if let Some(out) = &cfg.out {
        let n = write_stream_file(merger.stream()?, out)?;
        println!("wrote {} row(s) from {} file(s) to {}", n, paths.len(), out.display());
        return Ok(());
    }

    let table = merger.collect()?;
    println!("columns: {}", table.columns().join(", "));
    print!("{}", render_table(table.schema(), table.head(cfg.head)));
    println!("total: {} row(s) from {} file(s)", table.len(), paths.len());
    Ok(())
}

/// Interactive shell state. Sources are reopened for every command since a
/// merge consumes them.
struct Session {
    cfg: CliConfig,
    paths: Vec<PathBuf>,
}

impl Session {
    fn new(cfg: CliConfig) -> Self {
        let paths = cfg.files.clone();
        Self { cfg, paths }
    }

    fn run(mut self) -> Result<()> {
        if let Some(dir) = self.cfg.dir.clone() {
            self.add_dir(&dir.to_string_lossy())?;
        }

        let mut rl = DefaultEditor::new()?;

        println!("csvmerge shell");
        println!("Type 'help' for commands. Ctrl+D to exit");

        loop {
            let line = match rl.readline("csvmerge> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            rl.add_history_entry(line)?;

            let mut parts = line.split_whitespace();
            let cmd = parts.next().unwrap_or_default();
            let rest: Vec<&str> = parts.collect();

            let outcome = match cmd {
                "quit" | "exit" => break,
                "help" => {
                    println!("{}", SHELL_HELP);
                    Ok(())
                }
                "add" => rest.iter().try_for_each(|p| self.add_file(p)),
                "dir" => match rest.first() {
                    Some(dir) => self.add_dir(dir),
                    None => Err(anyhow::anyhow!("usage: dir <path>")),
                },
                "sources" => {
                    for (i, p) in self.paths.iter().enumerate() {
                        println!("{:>3}  {}", i + 1, p.display());
                    }
                    Ok(())
                }
                "clear" => {
                    self.paths.clear();
                    Ok(())
                }
                "schema" => self.schema(),
                "head" => self.head(rest.first().copied()),
                "write" => match rest.first() {
                    Some(path) => self.write(path),
                    None => Err(anyhow::anyhow!("usage: write <path>")),
                },
                "set" => self.set(&rest),
                other => Err(anyhow::anyhow!("unknown command '{other}', try 'help'")),
            };

            if let Err(err) = outcome {
                println!("error: {err:#}");
            }
        }

        Ok(())
    }

    fn add_file(&mut self, path: &str) -> Result<()> {
        let source = CsvSource::open(path, &self.cfg.csv)?;
        println!("{}: {}", source.name(), source.schema());
        self.paths.push(PathBuf::from(path));
        Ok(())
    }

    fn add_dir(&mut self, dir: &str) -> Result<()> {
        let found = discover_csv_files(dir)?;
        println!("found {} csv file(s)", found.len());
        for path in found {
            self.add_file(&path.to_string_lossy())?;
        }
        Ok(())
    }

    fn schema(&self) -> Result<()> {
        let unification = build_merger(&self.cfg, &self.paths)?.unify()?;
        for col in &unification.schema.columns {
            println!("  {col}");
        }
        for plan in &unification.plans {
            println!("  {plan}");
        }
        Ok(())
    }

    fn head(&self, n: Option<&str>) -> Result<()> {
        let n = match n {
            Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
            None => self.cfg.head,
        };

        let table = build_merger(&self.cfg, &self.paths)?.collect()?;
        print!("{}", render_table(table.schema(), table.head(n)));
        Ok(())
    }

    fn write(&self, path: &str) -> Result<()> {
        let rows = build_merger(&self.cfg, &self.paths)?.stream()?;
        let n = write_stream_file(rows, path)?;
        db_info!(Component::Cli, "shell write finished");
        println!("wrote {n} row(s) to {path}");
        Ok(())
    }

    fn set(&mut self, args: &[&str]) -> Result<()> {
        let [key, value] = args else {
            bail!("usage: set <order|types|coercion|case|parallel> <value>");
        };

        match *key {
            "order" => self.cfg.merge.column_order = value.parse()?,
            "types" => self.cfg.merge.type_policy = value.parse()?,
            "coercion" => self.cfg.merge.coercion = value.parse()?,
            "case" => {
                self.cfg.merge.case_sensitive = match *value {
                    "sensitive" => true,
                    "insensitive" => false,
                    other => bail!("expected sensitive or insensitive, got '{other}'"),
                }
            }
            "parallel" => {
                self.cfg.merge.parallel = value
                    .parse()
                    .with_context(|| format!("expected true or false, got '{value}'"))?
            }
            other => bail!("unknown setting '{other}'"),
        }
        Ok(())
    }
}

const SHELL_HELP: &str = "\
  add <path>...          add csv files
  dir <path>             add every csv file in a directory
  sources                list added files
  clear                  forget all files
  schema                 show the unified schema and per-file plans
  head [n]               merge and print the first n rows
  write <path>           merge and write the result as csv
  set order first_seen|alphabetical
  set types relaxed|strict
  set coercion fail_fast|lenient
  set case sensitive|insensitive
  set parallel true|false
  quit";
