//! Demo data set for a fresh store
//!
//! Everything goes through the normal create operations, so the loaded data
//! obeys the same validation and lookup rules as user input.

use crate::store::{
    EmployeeRole, EntityKind, Flight, NewAirport, NewAssignment, NewBooking, NewEmployee,
    NewFlight, NewMeal, NewPassenger, NewService, RecordStore, StoreError, StoreResult,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

/// Days of service generated for every route
pub const DAYS_PER_ROUTE: i64 = 14;

const AIRPORTS: [(&str, &str, &str, &str, &str); 8] = [
    ("JFK", "John F. Kennedy International", "New York", "USA", "America/New_York"),
    ("LAX", "Los Angeles International", "Los Angeles", "USA", "America/Los_Angeles"),
    ("LHR", "Heathrow Airport", "London", "UK", "Europe/London"),
    ("CDG", "Charles de Gaulle Airport", "Paris", "France", "Europe/Paris"),
    ("DXB", "Dubai International", "Dubai", "UAE", "Asia/Dubai"),
    ("SIN", "Changi Airport", "Singapore", "Singapore", "Asia/Singapore"),
    ("HKG", "Hong Kong International", "Hong Kong", "China", "Asia/Hong_Kong"),
    ("SYD", "Sydney Airport", "Sydney", "Australia", "Australia/Sydney"),
];

const EMPLOYEES: [(&str, &str, &str, EmployeeRole, &str, &str); 8] = [
    ("PIL001", "John", "Smith", EmployeeRole::Pilot, "john.smith@skylogix.com", "+1-555-0101"),
    ("PIL002", "Sarah", "Johnson", EmployeeRole::Pilot, "sarah.j@skylogix.com", "+1-555-0102"),
    ("FA001", "Emma", "Davis", EmployeeRole::FlightAttendant, "emma.d@skylogix.com", "+1-555-0103"),
    ("FA002", "Michael", "Brown", EmployeeRole::FlightAttendant, "michael.b@skylogix.com", "+1-555-0104"),
    ("MECH001", "David", "Wilson", EmployeeRole::GroundStaff, "david.w@skylogix.com", "+1-555-0105"),
    ("MECH002", "Lisa", "Anderson", EmployeeRole::GroundStaff, "lisa.a@skylogix.com", "+1-555-0106"),
    ("ADMIN001", "Robert", "Taylor", EmployeeRole::Administrative, "robert.t@skylogix.com", "+1-555-0107"),
    ("ADMIN002", "Jennifer", "Martinez", EmployeeRole::Administrative, "jennifer.m@skylogix.com", "+1-555-0108"),
];

/// Indexes into `AIRPORTS`
const ROUTES: [(usize, usize); 15] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 4),
    (3, 5),
    (4, 6),
    (5, 7),
    (6, 0),
    (0, 3),
    (1, 4),
    (2, 5),
    (3, 6),
    (4, 7),
    (5, 0),
    (6, 1),
];

const AIRCRAFT: [&str; 4] = ["Boeing 737", "Boeing 777", "Airbus A320", "Airbus A350"];

const PASSENGERS: [(&str, &str, &str, &str, &str); 8] = [
    ("US123456", "Alice", "Cooper", "alice.c@email.com", "+1-555-0201"),
    ("UK789012", "Bob", "Wilson", "bob.w@email.com", "+44-555-0202"),
    ("FR345678", "Claire", "Dubois", "claire.d@email.com", "+33-555-0203"),
    ("AE901234", "Mohammed", "Al-Farsi", "m.al-farsi@email.com", "+971-555-0204"),
    ("SG567890", "Wei", "Chen", "wei.c@email.com", "+65-555-0205"),
    ("HK123789", "Yuki", "Tanaka", "y.tanaka@email.com", "+852-555-0206"),
    ("AU456123", "James", "Thompson", "j.thompson@email.com", "+61-555-0207"),
    ("CA789456", "Maria", "Garcia", "m.garcia@email.com", "+1-555-0208"),
];

const MEALS: [(&str, &str, &str, f64); 6] = [
    ("Vegetarian Pasta", "Fresh pasta with seasonal vegetables", "Vegetarian", 15.0),
    ("Chicken Curry", "Spiced chicken curry with rice", "Non-Vegetarian", 18.0),
    ("Salmon Fillet", "Grilled salmon with steamed vegetables", "Non-Vegetarian", 20.0),
    ("Vegan Buddha Bowl", "Quinoa bowl with roasted vegetables", "Vegan", 16.0),
    ("Beef Steak", "Grilled beef steak with mashed potatoes", "Non-Vegetarian", 25.0),
    ("Mediterranean Salad", "Fresh salad with feta cheese", "Vegetarian", 14.0),
];

const SERVICES: [(&str, &str, f64); 6] = [
    ("Priority Boarding", "Early boarding access", 25.0),
    ("Extra Baggage", "Additional 10kg baggage allowance", 50.0),
    ("Airport Transfer", "Luxury car transfer to/from airport", 75.0),
    ("Lounge Access", "Access to airport lounges", 40.0),
    ("Seat Selection", "Choose your preferred seat", 15.0),
    ("Travel Insurance", "Comprehensive travel insurance", 30.0),
];

const MEAL_PREFERENCES: [&str; 3] = ["Vegetarian", "Non-Vegetarian", "Vegan"];

/// Rows added per table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedSummary {
    pub airports: usize,
    pub employees: usize,
    pub flights: usize,
    pub assignments: usize,
    pub passengers: usize,
    pub bookings: usize,
    pub meals: usize,
    pub services: usize,
}

impl SeedSummary {
    pub fn rows(&self) -> Vec<(EntityKind, usize)> {
        vec![
            (EntityKind::Airport, self.airports),
            (EntityKind::Employee, self.employees),
            (EntityKind::Flight, self.flights),
            (EntityKind::FlightAssignment, self.assignments),
            (EntityKind::Passenger, self.passengers),
            (EntityKind::Booking, self.bookings),
            (EntityKind::Meal, self.meals),
            (EntityKind::Service, self.services),
        ]
    }
}

/// Clear the store and load the demo data set.
///
/// Flights start on `start` and run daily for `DAYS_PER_ROUTE` days.
pub fn populate<R: Rng>(
    store: &mut RecordStore,
    rng: &mut R,
    start: NaiveDate,
) -> StoreResult<SeedSummary> {
    tracing::info!("Clearing existing data");
    store.clear_all()?;

    let mut summary = SeedSummary::default();
    let start_of_day = start.and_hms_opt(0, 0, 0).unwrap_or_default();

    tracing::info!("Adding airports");
    for (code, name, city, country, timezone) in AIRPORTS {
        store.create_airport(&NewAirport {
            code: code.into(),
            name: name.into(),
            city: city.into(),
            country: country.into(),
            timezone: timezone.into(),
        })?;
        summary.airports += 1;
    }

    tracing::info!("Adding employees");
    for (employee_id, first, last, role, email, phone) in EMPLOYEES {
        let hired = Utc.from_utc_datetime(&start_of_day)
            - Duration::days(rng.random_range(30..=365));
        store.create_employee(&NewEmployee {
            employee_id: employee_id.into(),
            first_name: first.into(),
            last_name: last.into(),
            role,
            email: email.into(),
            phone: phone.into(),
            hire_date: Some(hired),
            is_active: true,
        })?;
        summary.employees += 1;
    }

    tracing::info!("Adding flights");
    let mut flights: Vec<Flight> = Vec::new();
    for (route, (from, to)) in ROUTES.iter().enumerate() {
        for day in 0..DAYS_PER_ROUTE {
            let departure = start_of_day
                + Duration::days(day)
                + Duration::hours(rng.random_range(6..=20));
            let arrival = departure + Duration::hours(rng.random_range(2..=12));
            let aircraft = AIRCRAFT.choose(rng).copied().unwrap_or(AIRCRAFT[0]);

            let flight = store.create_flight(&NewFlight {
                flight_number: format!("SK{:03}-{}", route + 1, day + 1),
                departure_airport: AIRPORTS[*from].0.into(),
                arrival_airport: AIRPORTS[*to].0.into(),
                departure_time: departure,
                arrival_time: arrival,
                aircraft_type: aircraft.into(),
                status: None,
                base_price: rng.random_range(300..=1500) as f64,
            })?;
            flights.push(flight);
            summary.flights += 1;
        }
    }

    tracing::info!("Assigning crew");
    let crew_for = |role: EmployeeRole| -> Vec<&str> {
        EMPLOYEES
            .iter()
            .filter(|e| e.3 == role)
            .map(|e| e.0)
            .collect()
    };
    let pilots = crew_for(EmployeeRole::Pilot);
    let attendants = crew_for(EmployeeRole::FlightAttendant);
    for flight in &flights {
        for pool in [&pilots, &attendants] {
            let Some(employee_id) = pool.choose(rng) else {
                continue;
            };
            store.create_assignment(&NewAssignment {
                flight_number: flight.flight_number.clone(),
                employee_id: employee_id.to_string(),
                assignment_date: Some(flight.departure_time.date()),
            })?;
            summary.assignments += 1;
        }
    }

    tracing::info!("Adding passengers");
    for (passport, first, last, email, phone) in PASSENGERS {
        store.create_passenger(&NewPassenger {
            passport_number: passport.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            phone: phone.into(),
            loyalty_points: 0,
        })?;
        summary.passengers += 1;
    }

    tracing::info!("Adding meals");
    for (name, description, category, price) in MEALS {
        store.create_meal(&NewMeal {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            price,
            is_available: true,
        })?;
        summary.meals += 1;
    }

    tracing::info!("Adding services");
    for (name, description, price) in SERVICES {
        store.create_service(&NewService {
            name: name.into(),
            description: description.into(),
            price,
            is_available: true,
        })?;
        summary.services += 1;
    }

    tracing::info!("Adding bookings");
    for flight in &flights {
        for _ in 0..rng.random_range(3..=8) {
            add_random_booking(store, rng, flight)?;
            summary.bookings += 1;
        }
    }

    tracing::info!(?summary, "Sample data loaded");
    Ok(summary)
}

fn add_random_booking<R: Rng>(
    store: &mut RecordStore,
    rng: &mut R,
    flight: &Flight,
) -> StoreResult<()> {
    let passenger = PASSENGERS.choose(rng).map(|p| p.0).unwrap_or(PASSENGERS[0].0);
    let seat = format!(
        "{}{}",
        rng.random_range(1..=30),
        ['A', 'B', 'C', 'D', 'E', 'F'][rng.random_range(0..6)]
    );
    let meal = MEAL_PREFERENCES.choose(rng).copied().unwrap_or("Vegetarian");
    let total_price = flight.base_price + rng.random_range(50..=200) as f64;

    loop {
        let reference = format!("BK{}", rng.random_range(100_000..1_000_000));
        let result = store.create_booking(&NewBooking {
            booking_reference: Some(reference),
            flight_number: flight.flight_number.clone(),
            passport_number: passenger.into(),
            booking_date: None,
            seat_number: seat.clone(),
            meal_preference: meal.into(),
            total_price,
        });
        match result {
            Ok(_) => return Ok(()),
            Err(StoreError::DuplicateKey {
                entity: EntityKind::Booking,
                ..
            }) => continue,
            Err(e) => return Err(e),
        }
    }
}
