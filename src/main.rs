mod analytics;
mod cli;
mod config;
mod logging;
mod seed;
mod store;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use cli::commands::{
    self, AirportArgs, AssignmentArgs, BookingArgs, ChartKind, EmployeeArgs, FlightArgs,
    KeyedKind, MealArgs, PassengerArgs, RecordKind, ServiceArgs,
};
use cli::{OutputEvent, OutputMode, create_handler};
use std::path::PathBuf;
use store::RecordStore;

#[derive(Parser)]
#[command(name = "skylogix")]
#[command(about = "Airline operations records: airports, crew, flights, passengers and bookings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (overrides config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Project directory used for config discovery (defaults to current)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Output format: console, json or quiet
    #[arg(long, global = true)]
    output: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress normal output
    #[arg(long, global = true)]
    quiet: bool,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Setup,

    /// Show the database location and row counts
    Status,

    AddAirport(AirportArgs),
    ListAirports,
    AddEmployee(EmployeeArgs),
    ListEmployees,
    AddFlight(FlightArgs),
    ListFlights,

    /// Assign an employee to a flight
    AssignCrew(AssignmentArgs),
    ListAssignments,

    AddPassenger(PassengerArgs),
    ListPassengers,
    AddBooking(BookingArgs),
    ListBookings,
    AddMeal(MealArgs),
    ListMeals,
    AddService(ServiceArgs),
    ListServices,

    /// Look up one record by its natural key
    Find {
        #[arg(value_enum)]
        entity: KeyedKind,
        key: String,
    },

    /// Flights leaving an airport
    Departures { code: String },

    /// Flights landing at an airport
    Arrivals { code: String },

    /// Crew and bookings for one flight
    Manifest { flight_number: String },

    /// Show an aggregate view of the records
    Analytics {
        #[arg(value_enum)]
        chart: ChartKind,
    },

    /// Replace all data with the demo data set
    Seed {
        /// RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,

        /// First day of the flight schedule (defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// Delete every record
    ClearAllData {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_dir = cli.dir.as_deref();
    let config = config::SkylogixConfig::load(project_dir)?;

    let log_file = cli.log_file.clone().or_else(|| config.log_file(project_dir));
    logging::init_logging(cli.debug, cli.quiet, log_file.as_deref())?;

    let mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::from_str(cli.output.as_deref().unwrap_or(config.output_format()))
    };
    let handler = create_handler(mode, cli.debug);

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.database_path(project_dir));
    handler.emit(OutputEvent::Debug {
        message: format!("Using database {}", db_path.display()),
    });

    if let Commands::ClearAllData { yes: false } = cli.command {
        handler.emit(OutputEvent::Error {
            message: "Refusing to delete every record without --yes".to_string(),
        });
        std::process::exit(1);
    }

    let mut store = RecordStore::open(&db_path)?;
    let handler = &*handler;

    let result = match cli.command {
        Commands::Setup => commands::setup(handler, &db_path),
        Commands::Status => commands::status(&store, handler, &db_path),
        Commands::AddAirport(args) => commands::add_airport(&mut store, handler, args),
        Commands::ListAirports => commands::list_records(&store, handler, RecordKind::Airports),
        Commands::AddEmployee(args) => commands::add_employee(&mut store, handler, args),
        Commands::ListEmployees => commands::list_records(&store, handler, RecordKind::Employees),
        Commands::AddFlight(args) => commands::add_flight(&mut store, handler, args),
        Commands::ListFlights => commands::list_records(&store, handler, RecordKind::Flights),
        Commands::AssignCrew(args) => commands::assign_crew(&mut store, handler, args),
        Commands::ListAssignments => {
            commands::list_records(&store, handler, RecordKind::Assignments)
        }
        Commands::AddPassenger(args) => commands::add_passenger(&mut store, handler, args),
        Commands::ListPassengers => {
            commands::list_records(&store, handler, RecordKind::Passengers)
        }
        Commands::AddBooking(args) => commands::add_booking(&mut store, handler, args),
        Commands::ListBookings => commands::list_records(&store, handler, RecordKind::Bookings),
        Commands::AddMeal(args) => commands::add_meal(&mut store, handler, args),
        Commands::ListMeals => commands::list_records(&store, handler, RecordKind::Meals),
        Commands::AddService(args) => commands::add_service(&mut store, handler, args),
        Commands::ListServices => commands::list_records(&store, handler, RecordKind::Services),
        Commands::Find { entity, key } => commands::find_record(&store, handler, entity, &key),
        Commands::Departures { code } => commands::airport_flights(&store, handler, &code, false),
        Commands::Arrivals { code } => commands::airport_flights(&store, handler, &code, true),
        Commands::Manifest { flight_number } => {
            commands::manifest(&store, handler, &flight_number)
        }
        Commands::Analytics { chart } => commands::show_chart(&store, handler, chart),
        Commands::Seed { seed, start } => {
            let start = start.unwrap_or_else(|| Utc::now().date_naive());
            commands::seed_sample_data(&mut store, handler, seed, start)
        }
        Commands::ClearAllData { .. } => commands::clear_all(&mut store, handler),
    };

    if let Err(e) = result {
        if e.is_input_error() {
            tracing::debug!(error = ?e, "Command rejected");
        } else {
            tracing::error!(error = ?e, "Command failed");
        }
        handler.emit(OutputEvent::Error {
            message: e.to_string(),
        });
        std::process::exit(1);
    }

    Ok(())
}
