use sqlx::SqlitePool;

/// Table definitions, in dependency order.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS cities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE,
        country TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS itineraries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
        city TEXT NOT NULL,
        days INTEGER NOT NULL,
        budget INTEGER NOT NULL,
        travel_style TEXT,
        accommodation TEXT,
        pace TEXT,
        transport_mode TEXT,
        interests TEXT,
        plan TEXT NOT NULL,
        source TEXT NOT NULL,
        created_at TEXT NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_itineraries_user ON itineraries(user_id)",
    r#"CREATE TABLE IF NOT EXISTS itinerary_days (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        itinerary_id INTEGER NOT NULL REFERENCES itineraries(id) ON DELETE CASCADE,
        day_number INTEGER NOT NULL,
        morning TEXT,
        afternoon TEXT,
        evening TEXT
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_itinerary_days_itinerary ON itinerary_days(itinerary_id)",
    r#"CREATE TABLE IF NOT EXISTS mechanic_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        business_name TEXT NOT NULL,
        phone TEXT,
        latitude REAL,
        longitude REAL,
        total_jobs INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS service_requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        mechanic_id INTEGER REFERENCES mechanic_profiles(id) ON DELETE SET NULL,
        vehicle_type TEXT NOT NULL,
        problem_description TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        address TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL,
        accepted_at TEXT,
        completed_at TEXT
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_service_requests_user ON service_requests(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_service_requests_status ON service_requests(status)",
];

/// Creates any missing tables. Safe to run on every start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    log::info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
