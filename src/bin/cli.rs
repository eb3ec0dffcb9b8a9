use clap::{ArgAction, Parser, Subcommand};
use codespan_reporting::term::termcolor::{
  Color, ColorChoice, ColorSpec, StandardStream, WriteColor,
};
use pm1::{describe, filter::Error as FilterError, parse, Filter, ValidatorOptions};
use simplelog::{Config, LevelFilter, TermLogger, TerminalMode};
use std::{
  error::Error,
  fs,
  io::{self, Read, Write},
  path::{Path, PathBuf},
  process::ExitCode,
};

/// Tool for checking PM1 schema notation and validating JSON documents against it
#[derive(Parser)]
#[clap(name = "pm1", version, author)]
struct Cli {
  /// Log verbosity, repeat for more detail
  #[clap(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  #[clap(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse a notation file and print its canonical form
  Compile {
    /// Notation file
    #[clap(value_parser)]
    file: PathBuf,
  },
  /// Validate JSON documents against a notation file
  Validate {
    /// Notation file
    #[clap(short, long, value_parser)]
    schema: PathBuf,
    /// Directory for compiled definitions
    #[clap(long, value_parser)]
    cache_dir: Option<PathBuf>,
    /// Trim surrounding whitespace before checking string lengths
    #[clap(long)]
    trim_strings: bool,
    /// Read a single JSON document from stdin
    #[clap(long, conflicts_with = "files")]
    stdin: bool,
    /// JSON documents
    #[clap(value_parser, value_name = "JSON", required_unless_present = "stdin")]
    files: Vec<PathBuf>,
  },
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
  let cli = Cli::parse();

  let level = match cli.verbose {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  TermLogger::init(
    level,
    Config::default(),
    TerminalMode::Stderr,
    simplelog::ColorChoice::Auto,
  )?;

  match cli.command {
    Commands::Compile { file } => compile(file),
    Commands::Validate {
      schema,
      cache_dir,
      trim_strings,
      stdin,
      files,
    } => {
      let filter = Filter::new(cache_dir)
        .with_options(ValidatorOptions::new().trim_string_length(trim_strings));

      if let Err(e) = filter.resolve(&schema) {
        failure(&e.to_string())?;

        return Ok(ExitCode::FAILURE);
      }

      let mut documents = Vec::new();
      if stdin {
        let mut data = String::new();
        io::stdin().lock().read_to_string(&mut data)?;
        documents.push(("stdin".to_string(), data));
      } else {
        for file in files {
          let data = fs::read_to_string(&file)?;
          documents.push((format!("{:?}", file), data));
        }
      }

      let mut status = ExitCode::SUCCESS;
      for (name, data) in documents {
        if !validate(&filter, &schema, &name, &data)? {
          status = ExitCode::FAILURE;
        }
      }

      Ok(status)
    }
  }
}

fn compile(file: PathBuf) -> Result<ExitCode, Box<dyn Error>> {
  let source = fs::read_to_string(&file)?;

  match parse(&source) {
    Ok(definition) => {
      success(&describe(&definition))?;

      Ok(ExitCode::SUCCESS)
    }
    Err(e) => {
      failure(&format!("{:?} is not valid notation\n\n{}", file, e))?;

      Ok(ExitCode::FAILURE)
    }
  }
}

fn validate(
  filter: &Filter,
  schema: &Path,
  name: &str,
  data: &str,
) -> Result<bool, Box<dyn Error>> {
  let value = match serde_json::from_str(data) {
    Ok(value) => value,
    Err(e) => {
      failure(&format!("Validation of {} failed: error parsing JSON: {}", name, e))?;

      return Ok(false);
    }
  };

  match filter.filter(schema, &value) {
    Ok(()) => {
      success(&format!("Validation of {} is successful", name))?;

      Ok(true)
    }
    Err(FilterError::Validation(e)) => {
      failure(&format!("Validation of {} failed: {}", name, e))?;

      Ok(false)
    }
    Err(e) => Err(e.into()),
  }
}

fn success(message: &str) -> io::Result<()> {
  let mut stdout = StandardStream::stdout(ColorChoice::Auto);
  stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
  writeln!(&mut stdout, "{}", message)?;
  stdout.reset()
}

fn failure(message: &str) -> io::Result<()> {
  let mut stderr = StandardStream::stderr(ColorChoice::Auto);
  stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
  writeln!(&mut stderr, "{}", message)?;
  stderr.reset()
}
