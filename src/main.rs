use std::io::{self, Write};

use clap::{Arg, ArgMatches, Command};
use tracing::{error, info};

use vector_sum::logging;
use vector_sum::pipeline::{sum_sources, InputSource, SumError};
use vector_sum::report::SumReport;
use vector_sum::sum_config::{OutputFormat, OutputSettings, SumSettings};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn cli() -> Command<'static> {
    Command::new("vector_sum")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sums numeric vectors strictly left to right")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .takes_value(true)
            .value_name("FILE")
            .help("TOML settings file"))
        .arg(Arg::new("json")
            .long("json")
            .help("Print one JSON object per input"))
        .arg(Arg::new("running")
            .long("running")
            .help("Also print the running sums"))
        .arg(Arg::new("digits")
            .long("digits")
            .takes_value(true)
            .value_name("N")
            .help("Significant digits for plain output"))
        .arg(Arg::new("verbose")
            .short('v')
            .multiple_occurrences(true)
            .help("Log more, may be repeated"))
        .arg(Arg::new("inputs")
            .value_name("INPUT")
            .multiple_values(true)
            .help("Files holding numeric vectors, - for stdin (the default)"))
}

fn load_settings(matches: &ArgMatches) -> Result<SumSettings, i32> {
    let mut settings = match matches.value_of("config") {
        Some(config_file_name) => match SumSettings::from_file(config_file_name) {
            Ok(config) => config,
            Err(e) => {
                error!("{} ({})", e, config_file_name);
                return Err(1);
            }
        },
        None => SumSettings::default()
    };
    if matches.is_present("json") {
        settings.output.format = OutputFormat::Json;
    }
    if matches.is_present("running") {
        settings.output.running = true;
    }
    if let Some(digits) = matches.value_of("digits") {
        settings.output.digits = match digits.parse() {
            Ok(digits) => digits,
            Err(e) => {
                error!("Invalid --digits {}: {}", digits, e);
                return Err(2);
            }
        };
        if let Err(e) = settings.validate() {
            error!("{}", e);
            return Err(2);
        }
    }
    Ok(settings)
}

fn run() -> i32 {
    let matches = cli().get_matches();
    logging::setup_logger(logging::level_for_verbosity(matches.occurrences_of("verbose")));

    let settings = match load_settings(&matches) {
        Ok(settings) => settings,
        Err(exit_code) => return exit_code
    };
    let sources = input_sources(&matches);
    info!("Summing {} input(s)", sources.len());

    let results = match sum_sources(&sources, &settings) {
        Ok(results) => results,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };
    let stdout = io::stdout();
    print_results(results, &settings.output, &mut stdout.lock())
}

/// No inputs on the command line means stdin.
fn input_sources(matches: &ArgMatches) -> Vec<InputSource> {
    match matches.values_of("inputs") {
        Some(inputs) => inputs.map(InputSource::from_arg).collect(),
        None => vec![InputSource::Stdin]
    }
}

/// Writes each successful report in order and logs the failures.
/// Returns 1 if any input failed.
fn print_results(results: Vec<Result<SumReport, SumError>>, output: &OutputSettings, out: &mut impl Write) -> i32 {
    let mut exit_code = 0;
    for result in results {
        match result {
            Ok(report) => {
                if let Err(e) = writeln!(out, "{}", report.render(output)) {
                    error!("Error writing output: {}", e);
                    return 1;
                }
            },
            Err(e) => {
                error!("{}", e);
                exit_code = 1;
            }
        }
    }
    exit_code
}

#[cfg(test)]
mod test {
    use super::*;

    use vector_sum::numeric_vector::{NumericParseErr, NumericVector};

    #[test]
    fn flags_override_config() {
        let matches = cli().get_matches_from(["vector_sum", "--json", "--running", "--digits", "15", "a.txt", "-"]);
        let settings = load_settings(&matches).unwrap();
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert!(settings.output.running);
        assert_eq!(settings.output.digits, 15);
        let inputs: Vec<&str> = matches.values_of("inputs").unwrap().collect();
        assert_eq!(inputs, vec!["a.txt", "-"]);
    }

    #[test]
    fn bad_digits_is_usage_error() {
        let matches = cli().get_matches_from(["vector_sum", "--digits", "0"]);
        assert_eq!(load_settings(&matches), Err(2));
        let matches = cli().get_matches_from(["vector_sum", "--digits", "many"]);
        assert_eq!(load_settings(&matches), Err(2));
    }

    #[test]
    fn no_inputs_means_stdin() {
        let matches = cli().get_matches_from(["vector_sum"]);
        assert_eq!(input_sources(&matches), vec![InputSource::Stdin]);
        let matches = cli().get_matches_from(["vector_sum", "a.txt", "-"]);
        assert_eq!(
            input_sources(&matches),
            vec![InputSource::File("a.txt".into()), InputSource::Stdin]
        );
    }

    #[test]
    fn partial_failure_prints_successes_in_order() {
        let first = SumReport::new("a.txt", &NumericVector::from(vec![1.0, 2.0]), false);
        let last = SumReport::new("c.txt", &NumericVector::from(vec![0.5]), false);
        let failure = SumError::Parse {
            source_name: "b.txt".to_owned(),
            err: NumericParseErr::UnbalancedWrapper
        };
        let mut out = Vec::new();
        let exit_code = print_results(vec![Ok(first), Err(failure), Ok(last)], &OutputSettings::default(), &mut out);
        assert_eq!(exit_code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "a.txt: 3\nc.txt: 0.5\n");
    }

    #[test]
    fn all_successes_exit_zero() {
        let report = SumReport::new("-", &NumericVector::from(vec![1.0, 2.0, 3.0]), true);
        let mut out = Vec::new();
        assert_eq!(print_results(vec![Ok(report)], &OutputSettings::default(), &mut out), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "-: 6 [1 3 6]\n");
        assert_eq!(print_results(Vec::new(), &OutputSettings::default(), &mut Vec::<u8>::new()), 0);
    }

    #[test]
    fn missing_config_fails() {
        let matches = cli().get_matches_from(["vector_sum", "-c", "/nonexistent/vector_sum.toml"]);
        assert_eq!(load_settings(&matches), Err(1));
    }
}
