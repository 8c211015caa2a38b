use serde::Serialize;
use std::io::Read;
use tideline_core::{CalendarNormalizer, Dataset, LaneAssignment};
use tideline_layout::{AlgorithmRegistry, DEFAULT_ALGORITHM, LayoutOptions, compact_rows};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Dataset(tideline_core::Error),
    Layout(tideline_layout::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Dataset(err) => write!(f, "invalid dataset: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<tideline_core::Error> for CliError {
    fn from(value: tideline_core::Error) -> Self {
        Self::Dataset(value)
    }
}

impl From<tideline_core::ValidationError> for CliError {
    fn from(value: tideline_core::ValidationError) -> Self {
        Self::Dataset(value.into())
    }
}

impl From<tideline_layout::Error> for CliError {
    fn from(value: tideline_layout::Error) -> Self {
        match value {
            tideline_layout::Error::Core(err) => Self::Dataset(err),
            other => Self::Layout(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Layout,
    Validate,
    Algorithms,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    algorithm: Option<String>,
    now: Option<f64>,
    compact: bool,
    validate: bool,
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOut<'a> {
    algorithm: &'a str,
    lane_count: usize,
    assignments: &'a [LaneAssignment],
}

fn usage() -> &'static str {
    "tideline\n\
\n\
USAGE:\n\
  tideline [layout] [--algorithm <name>] [--now <year>] [--compact] [--no-validate] [--pretty] [<path>|-]\n\
  tideline validate [--now <year>] [<path>|-]\n\
  tideline algorithms\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the JSON dataset is read from stdin.\n\
  - layout prints {\"algorithm\", \"laneCount\", \"assignments\"} as JSON.\n\
  - --now pins the decimal year used for ongoing periods and \"now\" time values.\n\
  - --compact renumbers lanes into consecutive rows.\n\
  - Set RUST_LOG (e.g. RUST_LOG=tideline_layout=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Layout,
        validate: true,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "validate" => args.command = Command::Validate,
            "algorithms" => args.command = Command::Algorithms,
            "--pretty" => args.pretty = true,
            "--compact" => args.compact = true,
            "--no-validate" => args.validate = false,
            "--algorithm" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.algorithm = Some(name.trim().to_string());
            }
            "--now" => {
                let Some(year) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let year = year.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !year.is_finite() {
                    return Err(CliError::Usage(usage()));
                }
                args.now = Some(year);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn build_normalizer(now: Option<f64>) -> CalendarNormalizer {
    match now {
        Some(year) => CalendarNormalizer::with_now(year),
        None => CalendarNormalizer::new(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn load(args: &Args) -> Result<(Dataset, CalendarNormalizer), CliError> {
    let text = read_input(args.input.as_deref())?;
    let dataset = Dataset::from_json(&text)?;
    tracing::debug!(
        periods = dataset.periods.len(),
        events = dataset.events.len(),
        connectors = dataset.connectors.len(),
        "dataset loaded"
    );
    Ok((dataset, build_normalizer(args.now)))
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Algorithms => {
            for id in AlgorithmRegistry::default().ids() {
                println!("{id}");
            }
            Ok(())
        }
        Command::Validate => {
            let (dataset, normalizer) = load(&args)?;
            dataset.validate(&normalizer)?;
            println!(
                "ok: {} periods, {} events, {} connectors",
                dataset.periods.len(),
                dataset.events.len(),
                dataset.connectors.len()
            );
            Ok(())
        }
        Command::Layout => {
            let (dataset, normalizer) = load(&args)?;
            if args.validate {
                dataset.validate(&normalizer)?;
            }
            let algorithm = args.algorithm.as_deref().unwrap_or(DEFAULT_ALGORITHM);
            let options = LayoutOptions::default().with_time_normalizer(normalizer);
            let mut assignments =
                tideline_layout::layout_dataset(&dataset, Some(algorithm), &options)?;
            if args.compact {
                compact_rows(&assignments).apply(&mut assignments);
            }
            let out = LayoutOut {
                algorithm,
                lane_count: tideline_layout::lane_count(&assignments),
                assignments: &assignments,
            };
            write_json(&out, args.pretty)
        }
    }
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        std::iter::once("tideline")
            .chain(items.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn defaults_to_validated_layout_from_stdin() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(args.command, Command::Layout);
        assert!(args.validate);
        assert!(args.input.is_none());
    }

    #[test]
    fn parses_layout_flags() {
        let args = parse_args(&argv(&[
            "layout",
            "--algorithm",
            "greedy",
            "--now",
            "2020.5",
            "--compact",
            "--no-validate",
            "--pretty",
            "timeline.json",
        ]))
        .unwrap();
        assert_eq!(args.algorithm.as_deref(), Some("greedy"));
        assert_eq!(args.now, Some(2020.5));
        assert!(args.compact && args.pretty && !args.validate);
        assert_eq!(args.input.as_deref(), Some("timeline.json"));
    }

    #[test]
    fn rejects_bad_usage() {
        let cases: [&[&str]; 5] = [
            &["--now"],
            &["--now", "soon"],
            &["--frobnicate"],
            &["a.json", "b.json"],
            &["--", "a.json", "b.json"],
        ];
        for bad in cases {
            assert!(matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))));
        }
    }

    #[test]
    fn dash_means_stdin() {
        let args = parse_args(&argv(&["validate", "-"])).unwrap();
        assert_eq!(args.command, Command::Validate);
        assert_eq!(args.input.as_deref(), Some("-"));
    }
}
