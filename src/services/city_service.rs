use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::models::city::{City, CityCreate};

/// All cities ordered by name, optionally narrowed to names containing `query`.
pub async fn get_cities(pool: &SqlitePool, query: Option<&str>) -> Result<Vec<City>, sqlx::Error> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            sqlx::query_as::<_, City>(
                "SELECT * FROM cities WHERE instr(lower(name), lower(?)) > 0 ORDER BY name",
            )
            .bind(q)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, City>("SELECT * FROM cities ORDER BY name")
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn get_city(pool: &SqlitePool, id: i64) -> Result<Option<City>, sqlx::Error> {
    sqlx::query_as::<_, City>("SELECT * FROM cities WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Exact lookup first, then a case-insensitive one so "jaipur" finds "Jaipur".
pub async fn get_city_by_name(pool: &SqlitePool, name: &str) -> Result<Option<City>, sqlx::Error> {
    let name = name.trim();
    if let Some(city) = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?
    {
        return Ok(Some(city));
    }

    sqlx::query_as::<_, City>(
        "SELECT * FROM cities WHERE lower(name) = lower(?) ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

pub async fn create_city(pool: &SqlitePool, input: CityCreate) -> Result<City, ApiError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("City name is required"));
    }

    let country = input
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    // The name column is unique ignoring case, so the insert is the duplicate check.
    sqlx::query_as::<_, City>("INSERT INTO cities (name, country) VALUES (?, ?) RETURNING *")
        .bind(name)
        .bind(country)
        .fetch_one(pool)
        .await
        .map_err(|e| ApiError::unique_violation_or(e, "City already exists"))
}

/// Inserts each name not already present. Returns how many were added.
pub async fn seed_cities(
    pool: &SqlitePool,
    names: &[&str],
    country: &str,
) -> Result<usize, sqlx::Error> {
    let mut added = 0;
    let mut tx = pool.begin().await?;

    for name in names {
        let result = sqlx::query("INSERT OR IGNORE INTO cities (name, country) VALUES (?, ?)")
            .bind(*name)
            .bind(country)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() > 0 {
            log::debug!("Added city {}", name);
            added += 1;
        }
    }

    tx.commit().await?;
    Ok(added)
}

pub const INDIAN_CITIES: &[&str] = &[
    "Agra", "Ahmedabad", "Ajmer", "Allahabad", "Amritsar", "Aurangabad", "Bengaluru",
    "Bhopal", "Bhubaneswar", "Chandigarh", "Chennai", "Coimbatore", "Darjeeling",
    "Dehradun", "Delhi", "Gangtok", "Goa", "Guwahati", "Gwalior", "Hampi", "Haridwar",
    "Hyderabad", "Indore", "Jaipur", "Jaisalmer", "Jodhpur", "Kanpur", "Kochi", "Kodaikanal",
    "Kolkata", "Leh", "Lucknow", "Madurai", "Manali", "Mangaluru", "Mumbai", "Munnar",
    "Mysuru", "Nagpur", "Nainital", "Ooty", "Patna", "Puducherry", "Pune", "Pushkar",
    "Rishikesh", "Shillong", "Shimla", "Srinagar", "Surat", "Thiruvananthapuram",
    "Udaipur", "Vadodara", "Varanasi", "Visakhapatnam",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{schema::init_schema, sqlite::create_pool};

    async fn pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    #[actix_rt::test]
    async fn test_seed_skips_existing_names() {
        let pool = pool().await;
        create_city(
            &pool,
            CityCreate {
                name: "Jaipur".to_string(),
                country: Some("India".to_string()),
            },
        )
        .await
        .unwrap();

        let added = seed_cities(&pool, &["Jaipur", "Goa", "Leh"], "India").await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(seed_cities(&pool, &["Goa"], "India").await.unwrap(), 0);
        assert_eq!(get_cities(&pool, None).await.unwrap().len(), 3);
    }

    #[actix_rt::test]
    async fn test_search_and_lookup_ignore_case() {
        let pool = pool().await;
        seed_cities(&pool, INDIAN_CITIES, "India").await.unwrap();

        let names: Vec<String> = get_cities(&pool, Some("PUR"))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Jaipur", "Jodhpur", "Kanpur", "Nagpur", "Udaipur"]);

        let city = get_city_by_name(&pool, " jaipur ").await.unwrap().unwrap();
        assert_eq!(city.name, "Jaipur");
        assert_eq!(city.country.as_deref(), Some("India"));
    }

    #[actix_rt::test]
    async fn test_create_rejects_blank_and_duplicate() {
        let pool = pool().await;
        let blank = create_city(&pool, CityCreate { name: "  ".to_string(), country: None }).await;
        assert!(matches!(blank, Err(ApiError::BadRequest(_))));

        create_city(&pool, CityCreate { name: "Goa".to_string(), country: None })
            .await
            .unwrap();
        for name in ["Goa", "goa", " GOA "] {
            let dup = create_city(
                &pool,
                CityCreate {
                    name: name.to_string(),
                    country: None,
                },
            )
            .await;
            match dup {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "City already exists"),
                other => panic!("expected duplicate error for {:?}, got {:?}", name, other),
            }
        }
        assert_eq!(get_cities(&pool, None).await.unwrap().len(), 1);
    }

    #[test]
    fn test_catalogue_has_no_duplicates() {
        let mut names = INDIAN_CITIES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), INDIAN_CITIES.len());
    }
}
