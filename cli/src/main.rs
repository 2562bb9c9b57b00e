//! fitlog - fitness log calculations from the command line

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use fitlog_cli::config::AppConfig;
use fitlog_cli::{input, logging, report};
use fitlog_shared::body_metrics::{Gender, UserProfile, BMI_HISTORY_DAYS};
use fitlog_shared::{CalorieCalculationParams, CalorieEstimator, ExerciseType};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::info;

/// Fitlog - workout calorie, strength and streak reports
#[derive(Parser)]
#[command(name = "fitlog")]
#[command(version)]
#[command(about = "Fitness log calculations", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate calories for a single activity
    Calories {
        /// strength or cardio
        #[arg(short = 't', long = "type")]
        exercise_type: ExerciseType,

        /// Exercise name used for the MET lookup
        #[arg(short, long)]
        name: Option<String>,

        /// Body weight in kg
        #[arg(short, long)]
        weight: Option<f64>,

        /// Duration in seconds
        #[arg(short, long)]
        duration: Option<f64>,

        /// Distance in km
        #[arg(long)]
        distance: Option<f64>,

        /// Average heart rate in bpm
        #[arg(long)]
        heart_rate: Option<f64>,

        /// Reject negative or non-finite inputs instead of estimating
        #[arg(long)]
        strict: bool,
    },

    /// Estimate a one-rep max (Epley)
    OneRepMax {
        /// Weight lifted in kg
        weight: f64,

        /// Repetitions performed
        reps: u32,

        /// Reject non-positive weight and zero reps instead of estimating
        #[arg(long)]
        strict: bool,
    },

    /// Estimated one-rep maxes of an exercise, newest first
    Lifts {
        /// Activity log (JSON)
        file: PathBuf,

        /// Exercise name
        #[arg(short, long)]
        exercise: String,
    },

    /// Lifetime workout, set and volume totals
    Summary {
        /// Activity log (JSON)
        file: PathBuf,
    },

    /// Calories, volume and best lifts per workout
    Workout {
        /// Activity log (JSON)
        file: PathBuf,

        /// Only workouts on this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Consecutive training days ending at a date
    Streak {
        /// Activity log (JSON)
        file: PathBuf,

        /// Last day of the streak (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Month view with streak shading
    Calendar {
        /// Activity log (JSON)
        file: PathBuf,

        #[arg(short, long)]
        year: i32,

        #[arg(short, long)]
        month: u32,
    },

    /// Dashboard widgets
    Dashboard {
        /// Activity log (JSON)
        file: PathBuf,

        /// Reference day (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// BMI of each weigh-in over a look-back window
    Bmi {
        /// Activity log (JSON)
        file: PathBuf,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Days to look back
        #[arg(long, default_value_t = BMI_HISTORY_DAYS)]
        days: u32,

        /// Reference day (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Body metrics over the last 30 days
    Body {
        /// Activity log (JSON)
        file: PathBuf,

        /// Reference day (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,

        #[command(flatten)]
        profile: ProfileArgs,
    },
}

#[derive(Args)]
struct ProfileArgs {
    /// Height in cm
    #[arg(long)]
    height: Option<f64>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<NaiveDate>,

    /// male, female or other
    #[arg(long)]
    gender: Option<Gender>,
}

impl From<ProfileArgs> for UserProfile {
    fn from(args: ProfileArgs) -> Self {
        UserProfile {
            birth_date: args.birth_date,
            gender: args.gender,
            height_cm: args.height,
        }
    }
}

fn emit<R: Serialize + Display>(report: &R, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    logging::init_tracing(&config.logging, cli.verbose);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %AppConfig::environment(),
        "Starting fitlog"
    );

    let estimator = CalorieEstimator::new(config.calories.clone());

    match cli.command {
        Commands::Calories {
            exercise_type,
            name,
            weight,
            duration,
            distance,
            heart_rate,
            strict,
        } => {
            let params = CalorieCalculationParams {
                weight_kg: weight,
                duration_seconds: duration,
                distance_km: distance,
                avg_heart_rate: heart_rate,
                exercise_name: name,
                ..CalorieCalculationParams::new(exercise_type)
            };
            emit(&report::calories_report(&estimator, &params, strict)?, cli.json)
        }
        Commands::OneRepMax { weight, reps, strict } => {
            emit(&report::one_rep_max_report(weight, reps, strict)?, cli.json)
        }
        Commands::Lifts { file, exercise } => {
            let log = input::load_activity_log(&file)?;
            emit(&report::lifts_report(&log, &exercise), cli.json)
        }
        Commands::Summary { file } => {
            let log = input::load_activity_log(&file)?;
            emit(&report::summary_report(&log), cli.json)
        }
        Commands::Workout { file, date } => {
            let log = input::load_activity_log(&file)?;
            emit(&report::workout_report(&log, &estimator, date), cli.json)
        }
        Commands::Streak { file, date } => {
            let log = input::load_activity_log(&file)?;
            let date = date.unwrap_or_else(today);
            emit(&report::streak_report(&log, &config.calendar, date), cli.json)
        }
        Commands::Calendar { file, year, month } => {
            let log = input::load_activity_log(&file)?;
            emit(&report::calendar_report(&log, &config.calendar, year, month)?, cli.json)
        }
        Commands::Dashboard { file, today: day, profile } => {
            let log = input::load_activity_log(&file)?;
            let report = report::dashboard_report(
                &log,
                &profile.into(),
                day.unwrap_or_else(today),
                &estimator,
                &config.dashboard_config(),
            );
            emit(&report, cli.json)
        }
        Commands::Bmi {
            file,
            height,
            days,
            today: day,
        } => {
            let log = input::load_activity_log(&file)?;
            emit(&report::bmi_report(&log, height, day.unwrap_or_else(today), days)?, cli.json)
        }
        Commands::Body { file, today: day, profile } => {
            let log = input::load_activity_log(&file)?;
            emit(&report::body_report(&log, &profile.into(), day.unwrap_or_else(today)), cli.json)
        }
    }
}
