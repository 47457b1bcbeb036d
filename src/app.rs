//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and `.env`
//! - loads or generates the point set
//! - solves for the target curve and drives training
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, CommonArgs, FitArgs, PlotArgs, PlotOpts, PredictArgs, TrainArgs};
use crate::domain::{DemoConfig, PREDICTION_MAX};
use crate::error::AppError;
use crate::i18n::{Language, strings};
use crate::train::Rates;

pub mod pipeline;

/// Environment variable consulted for the language when `--lang` is absent.
pub const LANG_ENV: &str = "DOSEFIT_LANG";

/// Entry point for the `dosefit` binary.
pub fn run() -> Result<(), AppError> {
    // `dosefit` and `dosefit --lang zh` behave like `dosefit tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Fit(args) => handle_fit(args),
        Command::Train(args) => handle_train(args),
        Command::Predict(args) => handle_predict(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.common)?;
    apply_plot_opts(&mut config, &args.plot);
    config.export_results = args.export;
    config.export_curve = args.export_curve;
    let s = strings(config.language);
    let run = pipeline::run_fit(&config)?;

    for e in &run.row_errors {
        eprintln!("line {}: {}", e.line, e.message);
    }

    println!(
        "{}",
        crate::report::format_run_summary(s, run.points.stats().as_ref(), &run.target, &run.quality)
    );
    println!("{}", crate::report::format_point_table(s, &run.residuals));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            run.points.points(),
            &run.target,
            config.plot_width,
            config.plot_height,
            None,
        );
        println!("{plot}");
    }

    write_exports(&config, &run)
}

fn handle_train(args: TrainArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.common)?;
    apply_plot_opts(&mut config, &args.plot);
    config.report_every = args.report_every;
    config.max_ticks = args.max_ticks;
    let s = strings(config.language);

    let (points, _) = pipeline::load_points(&config)?;
    if points.len() < crate::math::MIN_POINTS {
        eprintln!("{}", s.need_points);
    }

    let every = config.report_every;
    let outcome = pipeline::run_training(&points, config.rates, config.max_ticks, |tick, step| {
        if every > 0 && tick % every == 0 && !step.done {
            println!("{}", crate::report::format_training_line(tick, &step.next));
        }
    });

    println!("{}", crate::report::format_training_line(outcome.ticks, &outcome.current));
    if outcome.converged {
        println!("{}", s.converged_after(outcome.ticks));
    } else {
        return Err(AppError::runtime(format!(
            "Training did not converge within {} steps.",
            config.max_ticks
        )));
    }

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            points.points(),
            &outcome.current,
            config.plot_width,
            config.plot_height,
            None,
        );
        println!("{plot}");
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.common)?;
    apply_plot_opts(&mut config, &args.plot);
    config.dose = resolve_dose(args.dose)?;
    let s = strings(config.language);

    let (points, _) = pipeline::load_points(&config)?;
    let outcome = pipeline::run_training(&points, config.rates, config.max_ticks, |_, _| {});
    if !outcome.converged {
        return Err(AppError::runtime(s.pred_need_train));
    }

    let predicted = crate::math::evaluate(&outcome.current, config.dose);
    println!("{}", crate::report::format_prediction(s, config.dose, predicted));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            points.points(),
            &outcome.current,
            config.plot_width,
            config.plot_height,
            Some(config.dose),
        );
        println!("{plot}");
    }
    Ok(())
}

fn handle_tui(args: CommonArgs) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    crate::tui::run(config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);

    println!("{}", crate::report::format_formula(&curve.coefficients));
    println!("{plot}");
    Ok(())
}

fn write_exports(config: &DemoConfig, run: &pipeline::FitRun) -> Result<(), AppError> {
    let s = strings(config.language);
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals)?;
        eprintln!("{}", s.wrote_file(path));
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run.target, &run.quality)?;
        eprintln!("{}", s.wrote_file(path));
    }
    Ok(())
}

/// Resolve a [`DemoConfig`] from parsed args plus the environment.
pub fn config_from_args(args: &CommonArgs) -> Result<DemoConfig, AppError> {
    // A missing `.env` is fine.
    dotenvy::dotenv().ok();
    let env_lang = std::env::var(LANG_ENV).ok();

    Ok(DemoConfig {
        language: resolve_language(args.lang, env_lang.as_deref()),
        rates: Rates::new(args.rate, args.tol_a, args.tol_b, args.tol_c)?,
        points_csv: args.points.clone(),
        extra_points: args.add.clone(),
        random_count: args.random,
        random_seed: args.seed,
        random_noise: args.noise,
        ..DemoConfig::default()
    })
}

fn apply_plot_opts(config: &mut DemoConfig, opts: &PlotOpts) {
    config.plot = !opts.no_plot;
    config.plot_width = opts.width;
    config.plot_height = opts.height;
}

/// Clamp a requested dose into the prediction range. NaN and infinities are rejected.
fn resolve_dose(dose: f64) -> Result<f64, AppError> {
    if !dose.is_finite() {
        return Err(AppError::input(format!("--dose must be a finite number, got {dose}.")));
    }
    let clamped = dose.clamp(0.0, PREDICTION_MAX);
    if clamped != dose {
        log::warn!("dose {dose} clamped to {clamped}");
    }
    Ok(clamped)
}

/// `--lang` wins, then a recognised `DOSEFIT_LANG`, then English.
fn resolve_language(flag: Option<Language>, env: Option<&str>) -> Language {
    flag.or_else(|| {
        let lang = env.and_then(Language::from_code);
        if lang.is_none() && env.is_some() {
            log::warn!("ignoring unrecognised {LANG_ENV}={env:?}");
        }
        lang
    })
    .unwrap_or_default()
}

/// Rewrite argv so `dosefit` defaults to `dosefit tui`.
///
/// Rules:
/// - `dosefit`                      -> `dosefit tui`
/// - `dosefit --lang zh ...`        -> `dosefit tui --lang zh ...`
/// - `dosefit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "fit" | "train" | "predict" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(argv(&["dosefit"])), argv(&["dosefit", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["dosefit", "--lang", "zh"])),
            argv(&["dosefit", "tui", "--lang", "zh"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        for a in [
            argv(&["dosefit", "fit"]),
            argv(&["dosefit", "predict", "--dose", "20"]),
            argv(&["dosefit", "--help"]),
            argv(&["dosefit", "-V"]),
        ] {
            assert_eq!(rewrite_args(a.clone()), a);
        }
    }

    #[test]
    fn language_precedence() {
        assert_eq!(resolve_language(Some(Language::En), Some("zh")), Language::En);
        assert_eq!(resolve_language(None, Some("zh_CN.UTF-8")), Language::Zh);
        assert_eq!(resolve_language(None, Some("klingon")), Language::En);
        assert_eq!(resolve_language(None, None), Language::En);
    }

    #[test]
    fn invalid_rate_is_input_error() {
        let cli = crate::cli::Cli::try_parse_from(["dosefit", "fit", "--rate", "1.5"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let err = config_from_args(&args.common).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn dose_is_clamped_into_prediction_range() {
        assert_eq!(resolve_dose(20.0).unwrap(), 20.0);
        assert_eq!(resolve_dose(-5.0).unwrap(), 0.0);
        assert_eq!(resolve_dose(80.0).unwrap(), PREDICTION_MAX);
    }

    #[test]
    fn non_finite_dose_is_input_error() {
        for dose in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = resolve_dose(dose).unwrap_err();
            assert_eq!(err.exit_code(), crate::error::EXIT_INPUT, "{dose}");
        }

        // clap accepts `NaN` as an f64, so the check has to happen after parsing.
        let cli = crate::cli::Cli::try_parse_from(["dosefit", "predict", "--dose", "NaN"]).unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert!(resolve_dose(args.dose).is_err());
    }
}
