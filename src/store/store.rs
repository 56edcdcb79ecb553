//! Airline record store

use super::error::{StoreError, StoreResult, map_unique_violation};
use super::models::{
    Airport, Booking, EntityKind, Employee, Flight, FlightAssignment, Meal, NewAirport,
    NewAssignment, NewBooking, NewEmployee, NewFlight, NewMeal, NewPassenger, NewService,
    Passenger, Service,
};
use super::schema::init_schema;
use super::validate;
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Params, Row};
use serde::Serialize;
use std::path::Path;

const AIRPORT_SELECT: &str = "SELECT id, code, name, city, country, timezone FROM airports";

const EMPLOYEE_SELECT: &str = "SELECT id, employee_id, first_name, last_name, role, email, phone, hire_date, is_active
     FROM employees";

const FLIGHT_SELECT: &str = "SELECT f.id, f.flight_number, f.departure_airport_id, d.code, f.arrival_airport_id, a.code,
            f.departure_time, f.arrival_time, f.aircraft_type, f.status, f.base_price
     FROM flights f
     JOIN airports d ON d.id = f.departure_airport_id
     JOIN airports a ON a.id = f.arrival_airport_id";

const ASSIGNMENT_SELECT: &str = "SELECT fa.id, fa.flight_id, f.flight_number, fa.employee_id, e.employee_id, fa.assignment_date
     FROM flight_assignments fa
     JOIN flights f ON f.id = fa.flight_id
     JOIN employees e ON e.id = fa.employee_id";

const PASSENGER_SELECT: &str =
    "SELECT id, passport_number, first_name, last_name, email, phone, loyalty_points FROM passengers";

const BOOKING_SELECT: &str = "SELECT b.id, b.booking_reference, b.flight_id, f.flight_number, b.passenger_id, p.passport_number,
            p.first_name || ' ' || p.last_name, b.booking_date, b.seat_number, b.meal_preference, b.total_price
     FROM bookings b
     JOIN flights f ON f.id = b.flight_id
     JOIN passengers p ON p.id = b.passenger_id";

const MEAL_SELECT: &str = "SELECT id, name, description, category, price, is_available FROM meals";

const SERVICE_SELECT: &str = "SELECT id, name, description, price, is_available FROM services";

/// Attempts at drawing an unused booking reference before giving up
const REFERENCE_ATTEMPTS: usize = 32;

/// Rows removed by `clear_all`, per table
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClearSummary {
    pub deleted: Vec<(EntityKind, usize)>,
}

impl ClearSummary {
    pub fn total(&self) -> usize {
        self.deleted.iter().map(|(_, n)| n).sum()
    }
}

/// Persistent storage for airline records
///
/// Every operation runs in its own transaction; an early return drops the
/// transaction and rolls back whatever it had written.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open or create a record database
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        init_schema(&conn)
            .with_context(|| format!("Failed to initialize schema in {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Opened record store");
        Ok(Self { conn })
    }

    /// Open a throwaway database that lives as long as the handle
    #[cfg(test)]
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        init_schema(&conn).context("Failed to initialize schema")?;
        Ok(Self { conn })
    }

    // --- airports -------------------------------------------------------

    pub fn create_airport(&mut self, new: &NewAirport) -> StoreResult<Airport> {
        let code = validate::airport_code("code", &new.code)?;
        let name = validate::required("name", &new.name)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO airports (code, name, city, country, timezone)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &code,
                &name,
                validate::optional(&new.city),
                validate::optional(&new.country),
                validate::optional(&new.timezone),
            ),
        )
        .map_err(|e| map_unique_violation(e, EntityKind::Airport, &[("airports.code", &code)]))?;

        let airport = fetch_by_id(&tx, AIRPORT_SELECT, "id", tx.last_insert_rowid(), row_to_airport)?;
        tx.commit()?;

        tracing::info!(code = %airport.code, id = airport.id, "Created airport");
        Ok(airport)
    }

    pub fn list_airports(&self) -> StoreResult<Vec<Airport>> {
        query_all(
            &self.conn,
            &format!("{AIRPORT_SELECT} ORDER BY id"),
            [],
            row_to_airport,
        )
    }

    /// Look up an airport by code (case-insensitive)
    pub fn find_airport(&self, code: &str) -> StoreResult<Option<Airport>> {
        query_one(
            &self.conn,
            &format!("{AIRPORT_SELECT} WHERE code = ?1"),
            [code.trim().to_uppercase()],
            row_to_airport,
        )
    }

    // --- employees ------------------------------------------------------

    pub fn create_employee(&mut self, new: &NewEmployee) -> StoreResult<Employee> {
        let employee_id = validate::natural_key("employee_id", &new.employee_id)?;
        let first_name = validate::required("first_name", &new.first_name)?;
        let last_name = validate::required("last_name", &new.last_name)?;
        let email = validate::email("email", &new.email)?;
        let hire_date = new.hire_date.unwrap_or_else(Utc::now);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO employees (employee_id, first_name, last_name, role, email, phone, hire_date, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                &employee_id,
                &first_name,
                &last_name,
                new.role,
                &email,
                validate::optional(&new.phone),
                hire_date,
                new.is_active,
            ),
        )
        .map_err(|e| {
            map_unique_violation(
                e,
                EntityKind::Employee,
                &[
                    ("employees.employee_id", &employee_id),
                    ("employees.email", &email),
                ],
            )
        })?;

        let employee = fetch_by_id(
            &tx,
            EMPLOYEE_SELECT,
            "id",
            tx.last_insert_rowid(),
            row_to_employee,
        )?;
        tx.commit()?;

        tracing::info!(employee_id = %employee.employee_id, role = %employee.role, "Created employee");
        Ok(employee)
    }

    pub fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        query_all(
            &self.conn,
            &format!("{EMPLOYEE_SELECT} ORDER BY id"),
            [],
            row_to_employee,
        )
    }

    pub fn find_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        query_one(
            &self.conn,
            &format!("{EMPLOYEE_SELECT} WHERE employee_id = ?1"),
            [employee_id.trim()],
            row_to_employee,
        )
    }

    // --- flights --------------------------------------------------------

    /// Create a flight between two existing airports
    pub fn create_flight(&mut self, new: &NewFlight) -> StoreResult<Flight> {
        let flight_number = validate::natural_key("flight_number", &new.flight_number)?;
        let departure = validate::airport_code("departure_airport", &new.departure_airport)?;
        let arrival = validate::airport_code("arrival_airport", &new.arrival_airport)?;
        if departure == arrival {
            return Err(StoreError::validation(
                "arrival_airport",
                "must differ from the departure airport",
            ));
        }
        if new.arrival_time <= new.departure_time {
            return Err(StoreError::validation(
                "arrival_time",
                "must be later than the departure time",
            ));
        }
        let aircraft_type = validate::required("aircraft_type", &new.aircraft_type)?;
        let base_price = validate::price("base_price", new.base_price)?;

        let tx = self.conn.transaction()?;
        let departure_id = resolve_id(
            &tx,
            EntityKind::Airport,
            "SELECT id FROM airports WHERE code = ?1",
            &departure,
        )?;
        let arrival_id = resolve_id(
            &tx,
            EntityKind::Airport,
            "SELECT id FROM airports WHERE code = ?1",
            &arrival,
        )?;

        tx.execute(
            "INSERT INTO flights (flight_number, departure_airport_id, arrival_airport_id, departure_time,
                                  arrival_time, aircraft_type, status, base_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                &flight_number,
                departure_id,
                arrival_id,
                new.departure_time,
                new.arrival_time,
                &aircraft_type,
                new.status.unwrap_or_default(),
                base_price,
            ),
        )
        .map_err(|e| {
            map_unique_violation(
                e,
                EntityKind::Flight,
                &[("flights.flight_number", &flight_number)],
            )
        })?;

        let flight = fetch_by_id(&tx, FLIGHT_SELECT, "f.id", tx.last_insert_rowid(), row_to_flight)?;
        tx.commit()?;

        tracing::info!(
            flight_number = %flight.flight_number,
            route = %flight.route(),
            "Created flight"
        );
        Ok(flight)
    }

    pub fn list_flights(&self) -> StoreResult<Vec<Flight>> {
        query_all(
            &self.conn,
            &format!("{FLIGHT_SELECT} ORDER BY f.id"),
            [],
            row_to_flight,
        )
    }

    pub fn find_flight(&self, flight_number: &str) -> StoreResult<Option<Flight>> {
        query_one(
            &self.conn,
            &format!("{FLIGHT_SELECT} WHERE f.flight_number = ?1"),
            [flight_number.trim()],
            row_to_flight,
        )
    }

    /// Flights leaving an airport, in insertion order
    pub fn departures_from(&self, code: &str) -> StoreResult<Vec<Flight>> {
        let code = code.trim().to_uppercase();
        let airport_id = resolve_id(
            &self.conn,
            EntityKind::Airport,
            "SELECT id FROM airports WHERE code = ?1",
            &code,
        )?;
        query_all(
            &self.conn,
            &format!("{FLIGHT_SELECT} WHERE f.departure_airport_id = ?1 ORDER BY f.id"),
            [airport_id],
            row_to_flight,
        )
    }

    /// Flights landing at an airport, in insertion order
    pub fn arrivals_to(&self, code: &str) -> StoreResult<Vec<Flight>> {
        let code = code.trim().to_uppercase();
        let airport_id = resolve_id(
            &self.conn,
            EntityKind::Airport,
            "SELECT id FROM airports WHERE code = ?1",
            &code,
        )?;
        query_all(
            &self.conn,
            &format!("{FLIGHT_SELECT} WHERE f.arrival_airport_id = ?1 ORDER BY f.id"),
            [airport_id],
            row_to_flight,
        )
    }

    // --- flight assignments ---------------------------------------------

    /// Put an employee on a flight for a given day
    pub fn create_assignment(&mut self, new: &NewAssignment) -> StoreResult<FlightAssignment> {
        let flight_number = validate::required("flight_number", &new.flight_number)?;
        let employee_id = validate::required("employee_id", &new.employee_id)?;
        let assignment_date = new
            .assignment_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let tx = self.conn.transaction()?;
        let flight_row = resolve_id(
            &tx,
            EntityKind::Flight,
            "SELECT id FROM flights WHERE flight_number = ?1",
            &flight_number,
        )?;
        let employee_row = resolve_id(
            &tx,
            EntityKind::Employee,
            "SELECT id FROM employees WHERE employee_id = ?1",
            &employee_id,
        )?;

        let key = format!("{flight_number}/{employee_id}/{assignment_date}");
        tx.execute(
            "INSERT INTO flight_assignments (flight_id, employee_id, assignment_date)
             VALUES (?1, ?2, ?3)",
            (flight_row, employee_row, assignment_date),
        )
        .map_err(|e| {
            map_unique_violation(
                e,
                EntityKind::FlightAssignment,
                &[("flight_assignments.flight_id", &key)],
            )
        })?;

        let assignment = fetch_by_id(
            &tx,
            ASSIGNMENT_SELECT,
            "fa.id",
            tx.last_insert_rowid(),
            row_to_assignment,
        )?;
        tx.commit()?;

        tracing::info!(
            flight_number = %assignment.flight_number,
            employee_id = %assignment.employee_id,
            date = %assignment.assignment_date,
            "Created flight assignment"
        );
        Ok(assignment)
    }

    pub fn list_assignments(&self) -> StoreResult<Vec<FlightAssignment>> {
        query_all(
            &self.conn,
            &format!("{ASSIGNMENT_SELECT} ORDER BY fa.id"),
            [],
            row_to_assignment,
        )
    }

    pub fn find_assignment(
        &self,
        flight_number: &str,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<FlightAssignment>> {
        query_one(
            &self.conn,
            &format!(
                "{ASSIGNMENT_SELECT} WHERE f.flight_number = ?1 AND e.employee_id = ?2 AND fa.assignment_date = ?3"
            ),
            (flight_number.trim(), employee_id.trim(), date),
            row_to_assignment,
        )
    }

    /// Crew assigned to a flight
    pub fn assignments_for_flight(&self, flight_number: &str) -> StoreResult<Vec<FlightAssignment>> {
        let flight_row = resolve_id(
            &self.conn,
            EntityKind::Flight,
            "SELECT id FROM flights WHERE flight_number = ?1",
            flight_number.trim(),
        )?;
        query_all(
            &self.conn,
            &format!("{ASSIGNMENT_SELECT} WHERE fa.flight_id = ?1 ORDER BY fa.id"),
            [flight_row],
            row_to_assignment,
        )
    }

    // --- passengers -----------------------------------------------------

    pub fn create_passenger(&mut self, new: &NewPassenger) -> StoreResult<Passenger> {
        let passport_number = validate::natural_key("passport_number", &new.passport_number)?;
        let first_name = validate::required("first_name", &new.first_name)?;
        let last_name = validate::required("last_name", &new.last_name)?;
        let email = validate::email("email", &new.email)?;
        let loyalty_points = validate::non_negative("loyalty_points", new.loyalty_points)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO passengers (passport_number, first_name, last_name, email, phone, loyalty_points)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &passport_number,
                &first_name,
                &last_name,
                &email,
                validate::optional(&new.phone),
                loyalty_points,
            ),
        )
        .map_err(|e| {
            map_unique_violation(
                e,
                EntityKind::Passenger,
                &[
                    ("passengers.passport_number", &passport_number),
                    ("passengers.email", &email),
                ],
            )
        })?;

        let passenger = fetch_by_id(
            &tx,
            PASSENGER_SELECT,
            "id",
            tx.last_insert_rowid(),
            row_to_passenger,
        )?;
        tx.commit()?;

        tracing::info!(passport_number = %passenger.passport_number, "Created passenger");
        Ok(passenger)
    }

    pub fn list_passengers(&self) -> StoreResult<Vec<Passenger>> {
        query_all(
            &self.conn,
            &format!("{PASSENGER_SELECT} ORDER BY id"),
            [],
            row_to_passenger,
        )
    }

    pub fn find_passenger(&self, passport_number: &str) -> StoreResult<Option<Passenger>> {
        query_one(
            &self.conn,
            &format!("{PASSENGER_SELECT} WHERE passport_number = ?1"),
            [passport_number.trim()],
            row_to_passenger,
        )
    }

    // --- bookings -------------------------------------------------------

    /// Book a passenger onto a flight, both resolved by natural key
    pub fn create_booking(&mut self, new: &NewBooking) -> StoreResult<Booking> {
        let flight_number = validate::required("flight_number", &new.flight_number)?;
        let passport_number = validate::required("passport_number", &new.passport_number)?;
        let seat_number = validate::natural_key("seat_number", &new.seat_number)?.to_uppercase();
        let total_price = validate::price("total_price", new.total_price)?;
        let requested_reference = new
            .booking_reference
            .as_deref()
            .map(|r| validate::natural_key("booking_reference", r))
            .transpose()?;
        let booking_date = new.booking_date.unwrap_or_else(Utc::now);

        let tx = self.conn.transaction()?;
        let flight_row = resolve_id(
            &tx,
            EntityKind::Flight,
            "SELECT id FROM flights WHERE flight_number = ?1",
            &flight_number,
        )?;
        let passenger_row = resolve_id(
            &tx,
            EntityKind::Passenger,
            "SELECT id FROM passengers WHERE passport_number = ?1",
            &passport_number,
        )?;

        let reference = match requested_reference {
            Some(reference) => reference,
            None => generate_reference(&tx)?,
        };

        tx.execute(
            "INSERT INTO bookings (booking_reference, flight_id, passenger_id, booking_date, seat_number,
                                   meal_preference, total_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &reference,
                flight_row,
                passenger_row,
                booking_date,
                &seat_number,
                validate::optional(&new.meal_preference),
                total_price,
            ),
        )
        .map_err(|e| {
            map_unique_violation(
                e,
                EntityKind::Booking,
                &[("bookings.booking_reference", &reference)],
            )
        })?;

        let booking = fetch_by_id(&tx, BOOKING_SELECT, "b.id", tx.last_insert_rowid(), row_to_booking)?;
        tx.commit()?;

        tracing::info!(
            reference = %booking.booking_reference,
            flight_number = %booking.flight_number,
            passport_number = %booking.passport_number,
            "Created booking"
        );
        Ok(booking)
    }

    pub fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        query_all(
            &self.conn,
            &format!("{BOOKING_SELECT} ORDER BY b.id"),
            [],
            row_to_booking,
        )
    }

    pub fn find_booking(&self, reference: &str) -> StoreResult<Option<Booking>> {
        query_one(
            &self.conn,
            &format!("{BOOKING_SELECT} WHERE b.booking_reference = ?1"),
            [reference.trim()],
            row_to_booking,
        )
    }

    pub fn bookings_for_flight(&self, flight_number: &str) -> StoreResult<Vec<Booking>> {
        let flight_row = resolve_id(
            &self.conn,
            EntityKind::Flight,
            "SELECT id FROM flights WHERE flight_number = ?1",
            flight_number.trim(),
        )?;
        query_all(
            &self.conn,
            &format!("{BOOKING_SELECT} WHERE b.flight_id = ?1 ORDER BY b.id"),
            [flight_row],
            row_to_booking,
        )
    }

    // --- meals and services ---------------------------------------------

    pub fn create_meal(&mut self, new: &NewMeal) -> StoreResult<Meal> {
        let name = validate::required("name", &new.name)?;
        let price = validate::price("price", new.price)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO meals (name, description, category, price, is_available)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &name,
                validate::optional(&new.description),
                validate::optional(&new.category),
                price,
                new.is_available,
            ),
        )?;
        let meal = fetch_by_id(&tx, MEAL_SELECT, "id", tx.last_insert_rowid(), row_to_meal)?;
        tx.commit()?;

        tracing::info!(name = %meal.name, id = meal.id, "Created meal");
        Ok(meal)
    }

    pub fn list_meals(&self) -> StoreResult<Vec<Meal>> {
        query_all(
            &self.conn,
            &format!("{MEAL_SELECT} ORDER BY id"),
            [],
            row_to_meal,
        )
    }

    pub fn create_service(&mut self, new: &NewService) -> StoreResult<Service> {
        let name = validate::required("name", &new.name)?;
        let price = validate::price("price", new.price)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO services (name, description, price, is_available)
             VALUES (?1, ?2, ?3, ?4)",
            (
                &name,
                validate::optional(&new.description),
                price,
                new.is_available,
            ),
        )?;
        let service = fetch_by_id(
            &tx,
            SERVICE_SELECT,
            "id",
            tx.last_insert_rowid(),
            row_to_service,
        )?;
        tx.commit()?;

        tracing::info!(name = %service.name, id = service.id, "Created service");
        Ok(service)
    }

    pub fn list_services(&self) -> StoreResult<Vec<Service>> {
        query_all(
            &self.conn,
            &format!("{SERVICE_SELECT} ORDER BY id"),
            [],
            row_to_service,
        )
    }

    // --- whole store ----------------------------------------------------

    /// Number of rows of one kind
    pub fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Delete every row of every table, dependents first, all or nothing
    pub fn clear_all(&mut self) -> StoreResult<ClearSummary> {
        let tx = self.conn.transaction()?;
        let mut summary = ClearSummary::default();

        for kind in EntityKind::DELETE_ORDER {
            let deleted = tx
                .execute(&format!("DELETE FROM {}", kind.table()), [])
                .map_err(|e| integrity_violation(e, kind))?;
            summary.deleted.push((kind, deleted));
        }

        tx.commit().map_err(|e| integrity_violation(e, EntityKind::Airport))?;

        tracing::info!(rows = summary.total(), "Cleared all records");
        Ok(summary)
    }
}

fn integrity_violation(err: rusqlite::Error, kind: EntityKind) -> StoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => StoreError::Integrity {
            message: format!("clearing {}: {}", kind.table(), err),
        },
        _ => StoreError::Database(err),
    }
}

/// Resolve a natural key to a row id, or fail naming the key
fn resolve_id(conn: &Connection, entity: EntityKind, sql: &str, key: &str) -> StoreResult<i64> {
    let id: Option<i64> = conn.query_row(sql, [key], |row| row.get(0)).optional()?;
    match id {
        Some(id) => {
            tracing::debug!(%entity, key, id, "Resolved natural key");
            Ok(id)
        }
        None => Err(StoreError::not_found(entity, key)),
    }
}

/// Draw `BK` + 6 digits until one is unused
fn generate_reference(conn: &Connection) -> StoreResult<String> {
    let mut rng = rand::rng();
    for _ in 0..REFERENCE_ATTEMPTS {
        let candidate = format!("BK{}", rng.random_range(100_000..1_000_000));
        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM bookings WHERE booking_reference = ?1",
                [&candidate],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_none() {
            return Ok(candidate);
        }
    }
    Err(StoreError::Integrity {
        message: format!("no free booking reference after {REFERENCE_ATTEMPTS} attempts"),
    })
}

fn query_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> StoreResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_one<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> StoreResult<Option<T>> {
    Ok(conn.query_row(sql, params, map).optional()?)
}

fn fetch_by_id<T>(
    conn: &Connection,
    select: &str,
    id_column: &str,
    id: i64,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> StoreResult<T> {
    Ok(conn.query_row(&format!("{select} WHERE {id_column} = ?1"), [id], map)?)
}

fn row_to_airport(row: &Row) -> rusqlite::Result<Airport> {
    Ok(Airport {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        city: row.get(3)?,
        country: row.get(4)?,
        timezone: row.get(5)?,
    })
}

fn row_to_employee(row: &Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        role: row.get(4)?,
        email: row.get(5)?,
        phone: row.get(6)?,
        hire_date: row.get(7)?,
        is_active: row.get(8)?,
    })
}

fn row_to_flight(row: &Row) -> rusqlite::Result<Flight> {
    Ok(Flight {
        id: row.get(0)?,
        flight_number: row.get(1)?,
        departure_airport_id: row.get(2)?,
        departure_code: row.get(3)?,
        arrival_airport_id: row.get(4)?,
        arrival_code: row.get(5)?,
        departure_time: row.get(6)?,
        arrival_time: row.get(7)?,
        aircraft_type: row.get(8)?,
        status: row.get(9)?,
        base_price: row.get(10)?,
    })
}

fn row_to_assignment(row: &Row) -> rusqlite::Result<FlightAssignment> {
    Ok(FlightAssignment {
        id: row.get(0)?,
        flight_id: row.get(1)?,
        flight_number: row.get(2)?,
        employee_row_id: row.get(3)?,
        employee_id: row.get(4)?,
        assignment_date: row.get(5)?,
    })
}

fn row_to_passenger(row: &Row) -> rusqlite::Result<Passenger> {
    Ok(Passenger {
        id: row.get(0)?,
        passport_number: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        loyalty_points: row.get(6)?,
    })
}

fn row_to_booking(row: &Row) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        booking_reference: row.get(1)?,
        flight_id: row.get(2)?,
        flight_number: row.get(3)?,
        passenger_id: row.get(4)?,
        passport_number: row.get(5)?,
        passenger_name: row.get(6)?,
        booking_date: row.get(7)?,
        seat_number: row.get(8)?,
        meal_preference: row.get(9)?,
        total_price: row.get(10)?,
    })
}

fn row_to_meal(row: &Row) -> rusqlite::Result<Meal> {
    Ok(Meal {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        price: row.get(4)?,
        is_available: row.get(5)?,
    })
}

fn row_to_service(row: &Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        is_available: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{EmployeeRole, FlightStatus};
    use chrono::NaiveDateTime;

    fn store() -> RecordStore {
        RecordStore::open_in_memory().unwrap()
    }

    fn airport(code: &str, city: &str) -> NewAirport {
        NewAirport {
            code: code.into(),
            name: format!("{city} International"),
            city: city.into(),
            country: "USA".into(),
            timezone: "America/New_York".into(),
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn flight(number: &str, from: &str, to: &str) -> NewFlight {
        NewFlight {
            flight_number: number.into(),
            departure_airport: from.into(),
            arrival_airport: to.into(),
            departure_time: at(1, 8),
            arrival_time: at(1, 14),
            aircraft_type: "Boeing 737".into(),
            status: None,
            base_price: 300.0,
        }
    }

    fn passenger(passport: &str, email: &str) -> NewPassenger {
        NewPassenger {
            passport_number: passport.into(),
            first_name: "Alice".into(),
            last_name: "Cooper".into(),
            email: email.into(),
            phone: "+1-555-0201".into(),
            loyalty_points: 0,
        }
    }

    fn employee(id: &str, role: EmployeeRole, email: &str) -> NewEmployee {
        NewEmployee {
            employee_id: id.into(),
            first_name: "John".into(),
            last_name: "Smith".into(),
            role,
            email: email.into(),
            phone: "+1-555-0101".into(),
            hire_date: None,
            is_active: true,
        }
    }

    /// JFK, LAX, one flight between them and one passenger
    fn store_with_route() -> RecordStore {
        let mut store = store();
        store.create_airport(&airport("JFK", "New York")).unwrap();
        store.create_airport(&airport("LAX", "Los Angeles")).unwrap();
        store
            .create_flight(&flight("SK001-1", "JFK", "LAX"))
            .unwrap();
        store
            .create_passenger(&passenger("US123456", "alice.c@email.com"))
            .unwrap();
        store
    }

    #[test]
    fn test_create_airport_uppercases_code() {
        let mut store = store();
        let created = store
            .create_airport(&NewAirport {
                code: "jfk".into(),
                name: "JFK".into(),
                city: "New York".into(),
                country: "USA".into(),
                timezone: "America/New_York".into(),
            })
            .unwrap();
        assert_eq!(created.code, "JFK");
        assert!(created.id > 0);

        let found = store.find_airport("jfk").unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn test_duplicate_airport_code_is_case_insensitive() {
        let mut store = store();
        store.create_airport(&airport("JFK", "New York")).unwrap();

        let err = store
            .create_airport(&airport("jfk", "New York"))
            .unwrap_err();
        match err {
            StoreError::DuplicateKey { entity, key } => {
                assert_eq!(entity, EntityKind::Airport);
                assert_eq!(key, "JFK");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.count(EntityKind::Airport).unwrap(), 1);
    }

    #[test]
    fn test_invalid_airport_code_rejected() {
        let mut store = store();
        let err = store.create_airport(&airport("JF", "New York")).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "code"));
    }

    #[test]
    fn test_flight_with_unknown_airport_fails() {
        let mut store = store();
        store.create_airport(&airport("LAX", "Los Angeles")).unwrap();
        let before = store.list_airports().unwrap();

        let err = store
            .create_flight(&flight("SK404", "ZZZ", "LAX"))
            .unwrap_err();
        match err {
            StoreError::NotFound { entity, key } => {
                assert_eq!(entity, EntityKind::Airport);
                assert_eq!(key, "ZZZ");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(store.list_airports().unwrap(), before);
        assert_eq!(store.count(EntityKind::Flight).unwrap(), 0);
    }

    #[test]
    fn test_flight_resolves_airports_case_insensitively() {
        let mut store = store();
        store.create_airport(&airport("JFK", "New York")).unwrap();
        store.create_airport(&airport("LAX", "Los Angeles")).unwrap();

        let created = store
            .create_flight(&flight("SK001-1", "jfk", "lax"))
            .unwrap();
        assert_eq!(created.departure_code, "JFK");
        assert_eq!(created.arrival_code, "LAX");
        assert_eq!(created.status, FlightStatus::Scheduled);
        assert_eq!(created.departure_time, at(1, 8));
        assert_eq!(store.find_flight("SK001-1").unwrap().unwrap(), created);
    }

    #[test]
    fn test_flight_same_airport_rejected() {
        let mut store = store();
        store.create_airport(&airport("JFK", "New York")).unwrap();
        let err = store
            .create_flight(&flight("SK001", "JFK", "jfk"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn test_flight_arriving_before_departure_rejected() {
        let mut store = store_with_route();
        let mut new = flight("SK002", "LAX", "JFK");
        new.departure_time = at(1, 14);
        new.arrival_time = at(1, 8);

        let err = store.create_flight(&new).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "arrival_time"));

        new.arrival_time = new.departure_time;
        assert!(store.create_flight(&new).is_err());
        assert_eq!(store.count(EntityKind::Flight).unwrap(), 1);
    }

    #[test]
    fn test_flight_negative_price_rejected() {
        let mut store = store_with_route();
        let mut new = flight("SK002", "LAX", "JFK");
        new.base_price = -5.0;
        let err = store.create_flight(&new).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "base_price"));
    }

    #[test]
    fn test_duplicate_flight_number() {
        let mut store = store_with_route();
        let err = store
            .create_flight(&flight("SK001-1", "LAX", "JFK"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateKey { entity: EntityKind::Flight, ref key } if key == "SK001-1"
        ));
    }

    #[test]
    fn test_create_booking_resolves_flight_and_passenger() {
        let mut store = store_with_route();
        let flight = store.find_flight("SK001-1").unwrap().unwrap();
        let passenger = store.find_passenger("US123456").unwrap().unwrap();

        let booking = store
            .create_booking(&NewBooking {
                flight_number: "SK001-1".into(),
                passport_number: "US123456".into(),
                seat_number: "12A".into(),
                meal_preference: "Vegetarian".into(),
                total_price: 450.0,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(booking.flight_id, flight.id);
        assert_eq!(booking.flight_number, flight.flight_number);
        assert_eq!(booking.passenger_id, passenger.id);
        assert_eq!(booking.passport_number, passenger.passport_number);
        assert_eq!(booking.passenger_name, "Alice Cooper");
        assert_eq!(booking.seat_number, "12A");
        assert_eq!(booking.meal_preference, "Vegetarian");
        assert_eq!(booking.total_price, 450.0);
        assert!(booking.booking_reference.starts_with("BK"));
        assert_eq!(booking.booking_reference.len(), 8);

        let found = store
            .find_booking(&booking.booking_reference)
            .unwrap()
            .unwrap();
        assert_eq!(found, booking);
    }

    #[test]
    fn test_booking_with_unknown_passenger_fails() {
        let mut store = store_with_route();
        let err = store
            .create_booking(&NewBooking {
                flight_number: "SK001-1".into(),
                passport_number: "XX000000".into(),
                seat_number: "1A".into(),
                total_price: 100.0,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { entity: EntityKind::Passenger, ref key } if key == "XX000000"
        ));
        assert_eq!(store.count(EntityKind::Booking).unwrap(), 0);
    }

    #[test]
    fn test_duplicate_booking_reference() {
        let mut store = store_with_route();
        let new = NewBooking {
            booking_reference: Some("BK000001".into()),
            flight_number: "SK001-1".into(),
            passport_number: "US123456".into(),
            seat_number: "1A".into(),
            total_price: 100.0,
            ..Default::default()
        };
        store.create_booking(&new).unwrap();
        let err = store.create_booking(&new).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateKey { entity: EntityKind::Booking, ref key } if key == "BK000001"
        ));
    }

    #[test]
    fn test_duplicate_passenger_email() {
        let mut store = store_with_route();
        let err = store
            .create_passenger(&passenger("UK789012", "alice.c@email.com"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateKey { entity: EntityKind::Passenger, ref key } if key == "alice.c@email.com"
        ));
    }

    #[test]
    fn test_passenger_email_is_case_insensitive() {
        let mut store = store_with_route();
        let err = store
            .create_passenger(&passenger("UK789012", "Alice.C@Email.com"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateKey { entity: EntityKind::Passenger, ref key } if key == "alice.c@email.com"
        ));
    }

    #[test]
    fn test_negative_loyalty_points_rejected() {
        let mut store = store();
        let mut new = passenger("US123456", "alice.c@email.com");
        new.loyalty_points = -10;
        assert!(matches!(
            store.create_passenger(&new).unwrap_err(),
            StoreError::Validation { .. }
        ));
    }

    #[test]
    fn test_employee_round_trip() {
        let mut store = store();
        let created = store
            .create_employee(&employee("PIL001", EmployeeRole::Pilot, "john.smith@skylogix.com"))
            .unwrap();
        assert_eq!(created.role, EmployeeRole::Pilot);
        assert!(created.is_active);

        let found = store.find_employee("PIL001").unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.full_name(), "John Smith");
    }

    #[test]
    fn test_duplicate_employee_email() {
        let mut store = store();
        store
            .create_employee(&employee("PIL001", EmployeeRole::Pilot, "crew@skylogix.com"))
            .unwrap();
        let err = store
            .create_employee(&employee("PIL002", EmployeeRole::Pilot, "crew@skylogix.com"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateKey { entity: EntityKind::Employee, ref key } if key == "crew@skylogix.com"
        ));
    }

    #[test]
    fn test_assignments() {
        let mut store = store_with_route();
        store
            .create_employee(&employee("PIL001", EmployeeRole::Pilot, "john.smith@skylogix.com"))
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let new = NewAssignment {
            flight_number: "SK001-1".into(),
            employee_id: "PIL001".into(),
            assignment_date: Some(day),
        };

        let created = store.create_assignment(&new).unwrap();
        assert_eq!(created.flight_number, "SK001-1");
        assert_eq!(created.employee_id, "PIL001");
        assert_eq!(created.assignment_date, day);

        let err = store.create_assignment(&new).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateKey { entity: EntityKind::FlightAssignment, .. }
        ));

        assert_eq!(
            store
                .find_assignment("SK001-1", "PIL001", day)
                .unwrap()
                .unwrap(),
            created
        );
        assert_eq!(store.assignments_for_flight("SK001-1").unwrap().len(), 1);

        let err = store
            .create_assignment(&NewAssignment {
                flight_number: "SK001-1".into(),
                employee_id: "NOPE01".into(),
                assignment_date: Some(day),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { entity: EntityKind::Employee, .. }
        ));
    }

    #[test]
    fn test_meals_and_services() {
        let mut store = store();
        let meal = store
            .create_meal(&NewMeal {
                name: "Vegetarian Pasta".into(),
                description: "Fresh pasta with seasonal vegetables".into(),
                category: "Vegetarian".into(),
                price: 15.0,
                is_available: true,
            })
            .unwrap();
        let service = store
            .create_service(&NewService {
                name: "Priority Boarding".into(),
                description: "Early boarding access".into(),
                price: 25.0,
                is_available: false,
            })
            .unwrap();

        assert_eq!(store.list_meals().unwrap(), vec![meal]);
        assert_eq!(store.list_services().unwrap(), vec![service.clone()]);
        assert!(!service.is_available);

        let err = store
            .create_meal(&NewMeal {
                name: "Free Lunch".into(),
                description: String::new(),
                category: String::new(),
                price: -1.0,
                is_available: true,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = store();
        for code in ["SYD", "AMS", "JFK"] {
            store.create_airport(&airport(code, code)).unwrap();
        }
        let codes: Vec<_> = store
            .list_airports()
            .unwrap()
            .into_iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(codes, vec!["SYD", "AMS", "JFK"]);
    }

    #[test]
    fn test_departures_and_arrivals() {
        let mut store = store_with_route();
        store
            .create_flight(&flight("SK002-1", "LAX", "JFK"))
            .unwrap();
        store
            .create_flight(&flight("SK003-1", "JFK", "LAX"))
            .unwrap();

        let departures: Vec<_> = store
            .departures_from("jfk")
            .unwrap()
            .into_iter()
            .map(|f| f.flight_number)
            .collect();
        assert_eq!(departures, vec!["SK001-1", "SK003-1"]);

        let arrivals = store.arrivals_to("JFK").unwrap();
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].flight_number, "SK002-1");

        assert!(matches!(
            store.departures_from("ZZZ").unwrap_err(),
            StoreError::NotFound { entity: EntityKind::Airport, .. }
        ));
    }

    #[test]
    fn test_clear_all_empties_every_table() {
        let mut store = store_with_route();
        store
            .create_employee(&employee("PIL001", EmployeeRole::Pilot, "john.smith@skylogix.com"))
            .unwrap();
        store
            .create_assignment(&NewAssignment {
                flight_number: "SK001-1".into(),
                employee_id: "PIL001".into(),
                assignment_date: None,
            })
            .unwrap();
        store
            .create_booking(&NewBooking {
                flight_number: "SK001-1".into(),
                passport_number: "US123456".into(),
                seat_number: "12A".into(),
                total_price: 450.0,
                ..Default::default()
            })
            .unwrap();

        let summary = store.clear_all().unwrap();
        assert_eq!(summary.total(), 7);

        assert!(store.list_airports().unwrap().is_empty());
        assert!(store.list_employees().unwrap().is_empty());
        assert!(store.list_flights().unwrap().is_empty());
        assert!(store.list_assignments().unwrap().is_empty());
        assert!(store.list_passengers().unwrap().is_empty());
        assert!(store.list_bookings().unwrap().is_empty());
        assert!(store.list_meals().unwrap().is_empty());
        assert!(store.list_services().unwrap().is_empty());
    }

    #[test]
    fn test_clear_all_rolls_back_on_foreign_reference() {
        let mut store = store_with_route();
        store
            .conn
            .execute_batch(
                "CREATE TABLE lounges (airport_id INTEGER NOT NULL REFERENCES airports(id));
                 INSERT INTO lounges (airport_id) SELECT id FROM airports LIMIT 1;",
            )
            .unwrap();

        let err = store.clear_all().unwrap_err();
        assert!(matches!(err, StoreError::Integrity { .. }), "got {err}");

        assert_eq!(store.count(EntityKind::Airport).unwrap(), 2);
        assert_eq!(store.count(EntityKind::Flight).unwrap(), 1);
        assert_eq!(store.count(EntityKind::Passenger).unwrap(), 1);
    }

    #[test]
    fn test_open_file_database_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("skylogix.db");

        {
            let mut store = RecordStore::open(&path).unwrap();
            store.create_airport(&airport("JFK", "New York")).unwrap();
        }

        let store = RecordStore::open(&path).unwrap();
        assert!(store.find_airport("JFK").unwrap().is_some());
    }
}
