use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CityCreate {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    /// Case-insensitive substring of the city name.
    pub q: Option<String>,
}
