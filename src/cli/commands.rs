//! CLI command implementations

use super::output::{Listing, OutputEvent, OutputHandler};
use super::tables::{
    AirportRow, AssignmentRow, BookingRow, ChartRow, CountRow, EmployeeRow, FlightRow, MealRow,
    PassengerRow, ServiceRow,
};
use crate::analytics;
use crate::seed;
use crate::store::{
    EntityKind, FlightStatus, NewAirport, NewAssignment, NewBooking, NewEmployee, NewFlight,
    NewMeal, NewPassenger, NewService, RecordStore, StoreError, StoreResult, validate,
};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

#[derive(Debug, Clone, Args)]
pub struct AirportArgs {
    /// Three-letter airport code
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub country: String,
    /// IANA timezone, e.g. America/New_York
    #[arg(long)]
    pub timezone: String,
}

impl AirportArgs {
    fn into_new(self) -> NewAirport {
        NewAirport {
            code: self.code,
            name: self.name,
            city: self.city,
            country: self.country,
            timezone: self.timezone,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct EmployeeArgs {
    #[arg(long)]
    pub employee_id: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// pilot, flight_attendant, ground_staff or administrative
    #[arg(long)]
    pub role: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    /// Hire date (YYYY-MM-DD), defaults to now
    #[arg(long)]
    pub hire_date: Option<String>,
    /// Record the employee as inactive
    #[arg(long)]
    pub inactive: bool,
}

impl EmployeeArgs {
    fn into_new(self) -> StoreResult<NewEmployee> {
        let hire_date = self
            .hire_date
            .as_deref()
            .map(|d| validate::date("hire_date", d))
            .transpose()?
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc());

        Ok(NewEmployee {
            employee_id: self.employee_id,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role.parse()?,
            email: self.email,
            phone: self.phone,
            hire_date,
            is_active: !self.inactive,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct FlightArgs {
    #[arg(long)]
    pub flight_number: String,
    /// Departure airport code
    #[arg(long)]
    pub departure_airport: String,
    /// Arrival airport code
    #[arg(long)]
    pub arrival_airport: String,
    /// Local departure time, e.g. 2026-03-01T08:30
    #[arg(long)]
    pub departure_time: String,
    /// Local arrival time, e.g. 2026-03-01T14:45
    #[arg(long)]
    pub arrival_time: String,
    #[arg(long)]
    pub aircraft_type: String,
    #[arg(long)]
    pub base_price: f64,
    /// scheduled, delayed, cancelled or completed
    #[arg(long)]
    pub status: Option<String>,
}

impl FlightArgs {
    fn into_new(self) -> StoreResult<NewFlight> {
        Ok(NewFlight {
            departure_time: validate::timestamp("departure_time", &self.departure_time)?,
            arrival_time: validate::timestamp("arrival_time", &self.arrival_time)?,
            status: self.status.as_deref().map(str::parse::<FlightStatus>).transpose()?,
            flight_number: self.flight_number,
            departure_airport: self.departure_airport,
            arrival_airport: self.arrival_airport,
            aircraft_type: self.aircraft_type,
            base_price: self.base_price,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct AssignmentArgs {
    #[arg(long)]
    pub flight_number: String,
    #[arg(long)]
    pub employee_id: String,
    /// Assignment date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,
}

impl AssignmentArgs {
    fn into_new(self) -> StoreResult<NewAssignment> {
        Ok(NewAssignment {
            assignment_date: self
                .date
                .as_deref()
                .map(|d| validate::date("date", d))
                .transpose()?,
            flight_number: self.flight_number,
            employee_id: self.employee_id,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct PassengerArgs {
    #[arg(long)]
    pub passport_number: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value_t = 0)]
    pub loyalty_points: i64,
}

impl PassengerArgs {
    fn into_new(self) -> NewPassenger {
        NewPassenger {
            passport_number: self.passport_number,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            loyalty_points: self.loyalty_points,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BookingArgs {
    /// Generated when omitted
    #[arg(long)]
    pub booking_reference: Option<String>,
    #[arg(long)]
    pub flight_number: String,
    #[arg(long)]
    pub passport_number: String,
    #[arg(long)]
    pub seat_number: String,
    #[arg(long, default_value = "")]
    pub meal_preference: String,
    #[arg(long)]
    pub total_price: f64,
}

impl BookingArgs {
    fn into_new(self) -> NewBooking {
        NewBooking {
            booking_reference: self.booking_reference,
            flight_number: self.flight_number,
            passport_number: self.passport_number,
            booking_date: None,
            seat_number: self.seat_number,
            meal_preference: self.meal_preference,
            total_price: self.total_price,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct MealArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// e.g. Vegetarian, Non-Vegetarian, Vegan
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long)]
    pub price: f64,
    /// Record the meal as unavailable
    #[arg(long)]
    pub unavailable: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ServiceArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub price: f64,
    /// Record the service as unavailable
    #[arg(long)]
    pub unavailable: bool,
}

/// Record kinds that can be listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Airports,
    Employees,
    Flights,
    Assignments,
    Passengers,
    Bookings,
    Meals,
    Services,
}

/// Record kinds with a natural key
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyedKind {
    Airport,
    Employee,
    Flight,
    /// Key is FLIGHT/EMPLOYEE/YYYY-MM-DD
    Assignment,
    Passenger,
    Booking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    FlightDistribution,
    RevenueByRoute,
    EmployeeDistribution,
    BookingTrends,
}

pub fn add_airport(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: AirportArgs,
) -> StoreResult<()> {
    let airport = store.create_airport(&args.into_new())?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::Airport,
        key: airport.code,
    });
    Ok(())
}

pub fn add_employee(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: EmployeeArgs,
) -> StoreResult<()> {
    let employee = store.create_employee(&args.into_new()?)?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::Employee,
        key: employee.employee_id,
    });
    Ok(())
}

pub fn add_flight(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: FlightArgs,
) -> StoreResult<()> {
    let flight = store.create_flight(&args.into_new()?)?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::Flight,
        key: flight.flight_number,
    });
    Ok(())
}

pub fn assign_crew(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: AssignmentArgs,
) -> StoreResult<()> {
    let assignment = store.create_assignment(&args.into_new()?)?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::FlightAssignment,
        key: format!(
            "{}/{}/{}",
            assignment.flight_number, assignment.employee_id, assignment.assignment_date
        ),
    });
    Ok(())
}

pub fn add_passenger(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: PassengerArgs,
) -> StoreResult<()> {
    let passenger = store.create_passenger(&args.into_new())?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::Passenger,
        key: passenger.passport_number,
    });
    Ok(())
}

pub fn add_booking(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: BookingArgs,
) -> StoreResult<()> {
    let booking = store.create_booking(&args.into_new())?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::Booking,
        key: booking.booking_reference,
    });
    Ok(())
}

pub fn add_meal(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: MealArgs,
) -> StoreResult<()> {
    let meal = store.create_meal(&NewMeal {
        name: args.name,
        description: args.description,
        category: args.category,
        price: args.price,
        is_available: !args.unavailable,
    })?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::Meal,
        key: meal.name,
    });
    Ok(())
}

pub fn add_service(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    args: ServiceArgs,
) -> StoreResult<()> {
    let service = store.create_service(&NewService {
        name: args.name,
        description: args.description,
        price: args.price,
        is_available: !args.unavailable,
    })?;
    handler.emit(OutputEvent::Created {
        entity: EntityKind::Service,
        key: service.name,
    });
    Ok(())
}

/// Show every record of one kind
pub fn list_records(
    store: &RecordStore,
    handler: &dyn OutputHandler,
    kind: RecordKind,
) -> StoreResult<()> {
    let listing = match kind {
        RecordKind::Airports => {
            let records = store.list_airports()?;
            Listing::new("Airports", records.iter().map(AirportRow::from).collect(), &records)
        }
        RecordKind::Employees => {
            let records = store.list_employees()?;
            Listing::new("Employees", records.iter().map(EmployeeRow::from).collect(), &records)
        }
        RecordKind::Flights => {
            let records = store.list_flights()?;
            Listing::new("Flights", records.iter().map(FlightRow::from).collect(), &records)
        }
        RecordKind::Assignments => {
            let records = store.list_assignments()?;
            Listing::new(
                "Flight Assignments",
                records.iter().map(AssignmentRow::from).collect(),
                &records,
            )
        }
        RecordKind::Passengers => {
            let records = store.list_passengers()?;
            Listing::new("Passengers", records.iter().map(PassengerRow::from).collect(), &records)
        }
        RecordKind::Bookings => {
            let records = store.list_bookings()?;
            Listing::new("Bookings", records.iter().map(BookingRow::from).collect(), &records)
        }
        RecordKind::Meals => {
            let records = store.list_meals()?;
            Listing::new("Meals", records.iter().map(MealRow::from).collect(), &records)
        }
        RecordKind::Services => {
            let records = store.list_services()?;
            Listing::new("Services", records.iter().map(ServiceRow::from).collect(), &records)
        }
    };

    handler.listing(&listing);
    Ok(())
}

/// Look one record up by natural key
pub fn find_record(
    store: &RecordStore,
    handler: &dyn OutputHandler,
    kind: KeyedKind,
    key: &str,
) -> StoreResult<()> {
    let listing = match kind {
        KeyedKind::Airport => {
            let record = store
                .find_airport(key)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Airport, key.trim().to_uppercase()))?;
            Listing::new("Airport", vec![AirportRow::from(&record)], &[record])
        }
        KeyedKind::Employee => {
            let record = store
                .find_employee(key)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Employee, key))?;
            Listing::new("Employee", vec![EmployeeRow::from(&record)], &[record])
        }
        KeyedKind::Flight => {
            let record = store
                .find_flight(key)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Flight, key))?;
            Listing::new("Flight", vec![FlightRow::from(&record)], &[record])
        }
        KeyedKind::Assignment => {
            let (flight_number, employee_id, date) = split_assignment_key(key)?;
            let record = store
                .find_assignment(flight_number, employee_id, date)?
                .ok_or_else(|| StoreError::not_found(EntityKind::FlightAssignment, key))?;
            Listing::new("Flight Assignment", vec![AssignmentRow::from(&record)], &[record])
        }
        KeyedKind::Passenger => {
            let record = store
                .find_passenger(key)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Passenger, key))?;
            Listing::new("Passenger", vec![PassengerRow::from(&record)], &[record])
        }
        KeyedKind::Booking => {
            let record = store
                .find_booking(key)?
                .ok_or_else(|| StoreError::not_found(EntityKind::Booking, key))?;
            Listing::new("Booking", vec![BookingRow::from(&record)], &[record])
        }
    };

    handler.listing(&listing);
    Ok(())
}

fn split_assignment_key(key: &str) -> StoreResult<(&str, &str, NaiveDate)> {
    let parts: Vec<&str> = key.split('/').collect();
    match parts.as_slice() {
        [flight_number, employee_id, date] => {
            Ok((*flight_number, *employee_id, validate::date("date", date)?))
        }
        _ => Err(StoreError::validation(
            "key",
            "assignment keys look like FLIGHT/EMPLOYEE/YYYY-MM-DD",
        )),
    }
}

/// Flights leaving (or, with `arriving`, landing at) an airport
pub fn airport_flights(
    store: &RecordStore,
    handler: &dyn OutputHandler,
    code: &str,
    arriving: bool,
) -> StoreResult<()> {
    let (title, flights) = if arriving {
        ("Arrivals", store.arrivals_to(code)?)
    } else {
        ("Departures", store.departures_from(code)?)
    };
    let title = format!("{} {}", title, code.trim().to_uppercase());
    handler.listing(&Listing::new(
        &title,
        flights.iter().map(FlightRow::from).collect(),
        &flights,
    ));
    Ok(())
}

/// Crew and bookings for one flight
pub fn manifest(
    store: &RecordStore,
    handler: &dyn OutputHandler,
    flight_number: &str,
) -> StoreResult<()> {
    let crew = store.assignments_for_flight(flight_number)?;
    let bookings = store.bookings_for_flight(flight_number)?;

    handler.listing(&Listing::new(
        &format!("Crew on {}", flight_number),
        crew.iter().map(AssignmentRow::from).collect(),
        &crew,
    ));
    handler.listing(&Listing::new(
        &format!("Bookings on {}", flight_number),
        bookings.iter().map(BookingRow::from).collect(),
        &bookings,
    ));
    Ok(())
}

pub fn show_chart(
    store: &RecordStore,
    handler: &dyn OutputHandler,
    kind: ChartKind,
) -> StoreResult<()> {
    let chart = match kind {
        ChartKind::FlightDistribution => analytics::flight_distribution(&store.list_flights()?),
        ChartKind::RevenueByRoute => {
            analytics::revenue_by_route(&store.list_flights()?, &store.list_bookings()?)
        }
        ChartKind::EmployeeDistribution => {
            analytics::employee_distribution(&store.list_employees()?)
        }
        ChartKind::BookingTrends => analytics::booking_trends(&store.list_bookings()?),
    };

    let title = format!("{} ({})", chart.title, chart.value_label);
    handler.listing(&Listing::new(&title, ChartRow::rows(&chart), &chart.entries));
    Ok(())
}

/// Opening the store already created the schema; report where it lives
pub fn setup(handler: &dyn OutputHandler, db_path: &Path) -> StoreResult<()> {
    tracing::info!(path = %db_path.display(), "Database initialized");
    handler.emit(OutputEvent::Info {
        message: format!("✓ Database ready at {}", db_path.display()),
    });
    Ok(())
}

/// Row counts for every table
pub fn status(store: &RecordStore, handler: &dyn OutputHandler, db_path: &Path) -> StoreResult<()> {
    handler.emit(OutputEvent::Info {
        message: format!("Database: {}", db_path.display()),
    });

    let mut counts = Vec::new();
    for kind in EntityKind::DELETE_ORDER.iter().rev() {
        counts.push((*kind, store.count(*kind)?));
    }
    handler.listing(&Listing::new(
        "Records",
        counts.iter().map(|(k, n)| CountRow::new(*k, *n)).collect(),
        &counts,
    ));
    Ok(())
}

/// Replace everything with the demo data set
pub fn seed_sample_data(
    store: &mut RecordStore,
    handler: &dyn OutputHandler,
    seed: Option<u64>,
    start: NaiveDate,
) -> StoreResult<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let summary = seed::populate(store, &mut rng, start)?;
    let rows = summary.rows();
    handler.listing(&Listing::new(
        "Sample Data Loaded",
        rows.iter().map(|(k, n)| CountRow::new(*k, *n)).collect(),
        &rows,
    ));
    Ok(())
}

pub fn clear_all(store: &mut RecordStore, handler: &dyn OutputHandler) -> StoreResult<()> {
    let summary = store.clear_all()?;
    handler.emit(OutputEvent::Cleared {
        rows: summary.total(),
    });
    Ok(())
}
