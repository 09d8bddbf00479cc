use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Once;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "ipp::load=debug,ipp::vm::frames=debug,ipp_core=info,ipp_cli=info";

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ipp_core::{
    error::{ErrorKind, VmError},
    program::{SourceFormat, load_source},
    vm::{EofPolicy, InputSource, LineInput, ReadCoercion, Vm, VmConfig, VmContext},
};
use tracing::debug;


#[derive(Debug, Parser)]
#[command(
    name = "ippi",
    author,
    version,
    about = "Interpreter for IPPcode22 programs",
    long_about = None,
    after_help = "At least one of --source and --input is required; the other one is read from stdin."
)]
struct CliArgs {
    /// Program to run: an XML document, `.IPPcode22` text or a JSON document
    #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
    source: Option<PathBuf>,

    /// Lines consumed by READ
    #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
    input: Option<PathBuf>,

    /// Source encoding; `auto` picks XML for `<` and JSON for `{`
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// What READ does once the input is exhausted
    #[arg(long = "on-eof", value_enum, default_value_t = EofArg::Nil)]
    on_eof: EofArg,

    /// How READ converts lines: `strict` fails on a bad int, `lenient` stores nil
    #[arg(long = "read-mode", value_enum, default_value_t = ReadModeArg::Strict)]
    read_mode: ReadModeArg,

    /// Print the number of executed instructions to stderr
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Auto,
    Xml,
    Text,
    Json,
}

impl FormatArg {
    fn resolve(self, source: &str) -> SourceFormat {
        match self {
            FormatArg::Auto => SourceFormat::detect(source),
            FormatArg::Xml => SourceFormat::Xml,
            FormatArg::Text => SourceFormat::Text,
            FormatArg::Json => SourceFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EofArg {
    Nil,
    Error,
}

impl From<EofArg> for EofPolicy {
    fn from(value: EofArg) -> Self {
        match value {
            EofArg::Nil => EofPolicy::Nil,
            EofArg::Error => EofPolicy::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReadModeArg {
    Strict,
    Lenient,
}

impl From<ReadModeArg> for ReadCoercion {
    fn from(value: ReadModeArg) -> Self {
        match value {
            ReadModeArg::Strict => ReadCoercion::Strict,
            ReadModeArg::Lenient => ReadCoercion::Lenient,
        }
    }
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);
    if p.components().any(|comp| matches!(comp, Component::ParentDir)) {
        anyhow::bail!("Parent directory components ('..') are not allowed in file paths.");
    }
    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum TraceSetting {
    Off,
    Default,
    Filter(String),
}

/// Interprets `IPP_TRACE`: `0`/`false`/`off` or empty disables tracing,
/// `1`/`true`/`on` enables the default filter, anything else is a filter expression.
fn trace_setting(raw: &str) -> TraceSetting {
    let trimmed = raw.trim();
    let is = |word: &str| trimmed.eq_ignore_ascii_case(word);
    if trimmed.is_empty() || is("0") || is("false") || is("off") {
        TraceSetting::Off
    } else if is("1") || is("true") || is("on") {
        TraceSetting::Default
    } else {
        TraceSetting::Filter(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let Ok(raw) = std::env::var("IPP_TRACE") else {
        return;
    };

    let filter_expr = match trace_setting(&raw) {
        TraceSetting::Off => return,
        TraceSetting::Default => std::env::var("RUST_LOG").ok(),
        TraceSetting::Filter(expr) => Some(expr),
    };

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let builder = fmt().with_writer(std::io::stderr);
        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn input_error(what: &str, path: &Path, err: io::Error) -> VmError {
    VmError::new(
        ErrorKind::InputFile,
        format!("cannot read {what} '{}': {err}", path.display()),
    )
}

fn read_source(path: Option<&Path>) -> Result<String, VmError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| input_error("source", path, e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .map_err(|e| VmError::new(ErrorKind::InputFile, format!("cannot read source from stdin: {e}")))?;
            Ok(buf)
        }
    }
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn InputSource>, VmError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| input_error("input", path, e))?;
            Ok(Box::new(LineInput::new(BufReader::new(file))))
        }
        None => Ok(Box::new(LineInput::new(io::stdin().lock()))),
    }
}

/// Exit code for a failure: the code of the first interpreter error in the chain.
fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<VmError>())
        .map(VmError::exit_code)
        .unwrap_or(ErrorKind::Internal.exit_code())
}

fn run(args: &CliArgs) -> anyhow::Result<i32> {
    if args.source.is_none() && args.input.is_none() {
        return Err(VmError::new(
            ErrorKind::InvalidArguments,
            "at least one of --source and --input is required",
        )
        .into());
    }

    let source = read_source(args.source.as_deref())?;
    let format = args.format.resolve(&source);
    let program = load_source(&source, format).with_context(|| {
        let origin = args
            .source
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<stdin>".to_string());
        format!("failed to load {origin}")
    })?;
    debug!(
        target: "ipp_cli",
        ?format,
        instructions = program.len(),
        "source loaded"
    );

    let mut input = open_input(args.input.as_deref())?;
    let mut stdout = BufWriter::new(io::stdout().lock());
    let mut stderr = io::stderr().lock();
    let mut ctx = VmContext::new(input.as_mut(), &mut stdout, &mut stderr);

    let config = VmConfig::default()
        .with_eof_policy(args.on_eof.into())
        .with_read_coercion(args.read_mode.into());
    let mut vm = Vm::with_config(&program, config);
    let result = vm.run(&mut ctx);
    drop(ctx);

    if args.stats {
        writeln!(stderr, "executed instructions: {}", vm.executed())
            .map_err(|e| VmError::new(ErrorKind::OutputFile, format!("cannot write stats: {e}")))?;
    }
    debug!(target: "ipp_cli", executed = vm.executed(), ?result, "run finished");

    Ok(result?)
}

fn main() {
    maybe_init_tracing();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version print to stdout and succeed
            let code = if err.use_stderr() {
                ErrorKind::InvalidArguments.exit_code()
            } else {
                0
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code_of(&err)
        }
    };
    std::process::exit(code);
}
