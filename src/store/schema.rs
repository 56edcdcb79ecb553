//! Database schema for the airline records

use rusqlite::Connection;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS airports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE CHECK (length(code) = 3 AND code = upper(code)),
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            country TEXT NOT NULL,
            timezone TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            role TEXT NOT NULL
                CHECK (role IN ('pilot', 'flight_attendant', 'ground_staff', 'administrative')),
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            hire_date TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS flights (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            flight_number TEXT NOT NULL UNIQUE,
            departure_airport_id INTEGER NOT NULL REFERENCES airports(id),
            arrival_airport_id INTEGER NOT NULL REFERENCES airports(id),
            departure_time TEXT NOT NULL,
            arrival_time TEXT NOT NULL,
            aircraft_type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'scheduled'
                CHECK (status IN ('scheduled', 'delayed', 'cancelled', 'completed')),
            base_price REAL NOT NULL CHECK (base_price >= 0)
        );

        CREATE INDEX IF NOT EXISTS idx_flights_departure ON flights(departure_airport_id);
        CREATE INDEX IF NOT EXISTS idx_flights_arrival ON flights(arrival_airport_id);

        CREATE TABLE IF NOT EXISTS flight_assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            flight_id INTEGER NOT NULL REFERENCES flights(id),
            employee_id INTEGER NOT NULL REFERENCES employees(id),
            assignment_date TEXT NOT NULL,
            UNIQUE(flight_id, employee_id, assignment_date)
        );

        CREATE INDEX IF NOT EXISTS idx_assignments_employee ON flight_assignments(employee_id);

        CREATE TABLE IF NOT EXISTS passengers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            passport_number TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            loyalty_points INTEGER NOT NULL DEFAULT 0 CHECK (loyalty_points >= 0)
        );

        CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            booking_reference TEXT NOT NULL UNIQUE,
            flight_id INTEGER NOT NULL REFERENCES flights(id),
            passenger_id INTEGER NOT NULL REFERENCES passengers(id),
            booking_date TEXT NOT NULL,
            seat_number TEXT NOT NULL,
            meal_preference TEXT NOT NULL,
            total_price REAL NOT NULL CHECK (total_price >= 0)
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_flight ON bookings(flight_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_passenger ON bookings(passenger_id);

        CREATE TABLE IF NOT EXISTS meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            price REAL NOT NULL CHECK (price >= 0),
            is_available INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS services (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL NOT NULL CHECK (price >= 0),
            is_available INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )?;

    Ok(())
}
