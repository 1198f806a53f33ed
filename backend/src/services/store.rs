//! Farmer and query persistence
//!
//! PostgreSQL is used when a database URL is configured. Otherwise an
//! in-memory store keeps everything for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Farmer, FarmerProfile, GpsCoordinates, QueryRecord};
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[async_trait]
pub trait FarmerStore: Send + Sync {
    /// Fails with `DuplicateEntry("username")` without writing anything
    async fn save_profile(&self, profile: &FarmerProfile) -> AppResult<Farmer>;

    async fn get_profile(&self, username: &str) -> AppResult<Farmer>;

    async fn get_farmer(&self, farmer_id: Uuid) -> AppResult<Farmer>;

    async fn update_delivery_token(&self, farmer_id: Uuid, token: Option<&str>) -> AppResult<()>;

    async fn save_query(&self, farmer_id: Uuid, query: &str, response: &str)
        -> AppResult<QueryRecord>;

    /// Newest first
    async fn list_recent_queries(&self, farmer_id: Uuid, limit: i64)
        -> AppResult<Vec<QueryRecord>>;

    /// Short name reported by the health check
    fn backend_name(&self) -> &'static str;
}

fn farmer_not_found() -> AppError {
    AppError::NotFound("Farmer".to_string())
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[derive(Clone)]
pub struct PgFarmerStore {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct FarmerRow {
    id: Uuid,
    username: String,
    name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    phone: Option<String>,
    delivery_token: Option<String>,
    location: Option<String>,
    location_ml: Option<String>,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    crop: Option<String>,
    soil: Option<String>,
    field_type: Option<String>,
    irrigation_type: Option<String>,
    farm_size_acres: Option<Decimal>,
    experience_years: Option<i32>,
    pest_history: Option<String>,
    yield_goals: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FarmerRow> for Farmer {
    fn from(row: FarmerRow) -> Self {
        let coordinates = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Some(GpsCoordinates::new(lat, lon)),
            _ => None,
        };

        Farmer {
            id: row.id,
            profile: FarmerProfile {
                username: row.username,
                name: row.name,
                age: row.age,
                gender: row.gender,
                phone: row.phone,
                delivery_token: row.delivery_token,
                location: row.location,
                location_ml: row.location_ml,
                coordinates,
                crop: row.crop,
                soil: row.soil,
                field_type: row.field_type,
                irrigation_type: row.irrigation_type,
                farm_size_acres: row.farm_size_acres,
                experience_years: row.experience_years,
                pest_history: row.pest_history,
                yield_goals: row.yield_goals,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QueryRow {
    id: Uuid,
    farmer_id: Uuid,
    query: String,
    response: String,
    created_at: DateTime<Utc>,
}

impl From<QueryRow> for QueryRecord {
    fn from(row: QueryRow) -> Self {
        QueryRecord {
            id: row.id,
            farmer_id: row.farmer_id,
            query: row.query,
            response: row.response,
            created_at: row.created_at,
        }
    }
}

const FARMER_COLUMNS: &str = "id, username, name, age, gender, phone, delivery_token, \
     location, location_ml, latitude, longitude, crop, soil, field_type, irrigation_type, \
     farm_size_acres, experience_years, pest_history, yield_goals, created_at";

impl PgFarmerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FarmerStore for PgFarmerStore {
    async fn save_profile(&self, profile: &FarmerProfile) -> AppResult<Farmer> {
        let sql = format!(
            r#"
            INSERT INTO farmers (
                id, username, name, age, gender, phone, delivery_token, location, location_ml,
                latitude, longitude, crop, soil, field_type, irrigation_type, farm_size_acres,
                experience_years, pest_history, yield_goals
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            ON CONFLICT (username) DO NOTHING
            RETURNING {}
            "#,
            FARMER_COLUMNS
        );

        let row = sqlx::query_as::<_, FarmerRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&profile.username)
            .bind(&profile.name)
            .bind(profile.age)
            .bind(&profile.gender)
            .bind(&profile.phone)
            .bind(&profile.delivery_token)
            .bind(&profile.location)
            .bind(&profile.location_ml)
            .bind(profile.coordinates.map(|c| c.latitude))
            .bind(profile.coordinates.map(|c| c.longitude))
            .bind(&profile.crop)
            .bind(&profile.soil)
            .bind(&profile.field_type)
            .bind(&profile.irrigation_type)
            .bind(profile.farm_size_acres)
            .bind(profile.experience_years)
            .bind(&profile.pest_history)
            .bind(&profile.yield_goals)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::DuplicateEntry("username".to_string()))?;

        Ok(row.into())
    }

    async fn get_profile(&self, username: &str) -> AppResult<Farmer> {
        let sql = format!("SELECT {} FROM farmers WHERE username = $1", FARMER_COLUMNS);
        sqlx::query_as::<_, FarmerRow>(&sql)
            .bind(username)
            .fetch_optional(&self.db)
            .await?
            .map(Farmer::from)
            .ok_or_else(farmer_not_found)
    }

    async fn get_farmer(&self, farmer_id: Uuid) -> AppResult<Farmer> {
        let sql = format!("SELECT {} FROM farmers WHERE id = $1", FARMER_COLUMNS);
        sqlx::query_as::<_, FarmerRow>(&sql)
            .bind(farmer_id)
            .fetch_optional(&self.db)
            .await?
            .map(Farmer::from)
            .ok_or_else(farmer_not_found)
    }

    async fn update_delivery_token(&self, farmer_id: Uuid, token: Option<&str>) -> AppResult<()> {
        let result = sqlx::query("UPDATE farmers SET delivery_token = $2 WHERE id = $1")
            .bind(farmer_id)
            .bind(token)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(farmer_not_found());
        }
        Ok(())
    }

    async fn save_query(
        &self,
        farmer_id: Uuid,
        query: &str,
        response: &str,
    ) -> AppResult<QueryRecord> {
        let row = sqlx::query_as::<_, QueryRow>(
            r#"
            INSERT INTO queries (id, farmer_id, query, response)
            VALUES ($1, $2, $3, $4)
            RETURNING id, farmer_id, query, response, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(farmer_id)
        .bind(query)
        .bind(response)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn list_recent_queries(
        &self,
        farmer_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<QueryRecord>> {
        let rows = sqlx::query_as::<_, QueryRow>(
            r#"
            SELECT id, farmer_id, query, response, created_at
            FROM queries
            WHERE farmer_id = $1
            ORDER BY created_at DESC, seq DESC
            LIMIT $2
            "#,
        )
        .bind(farmer_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(QueryRecord::from).collect())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Default)]
struct MemoryState {
    farmers: HashMap<Uuid, Farmer>,
    usernames: HashMap<String, Uuid>,
    /// Insertion order
    queries: Vec<QueryRecord>,
}

#[derive(Default)]
pub struct InMemoryFarmerStore {
    state: RwLock<MemoryState>,
}

impl InMemoryFarmerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FarmerStore for InMemoryFarmerStore {
    async fn save_profile(&self, profile: &FarmerProfile) -> AppResult<Farmer> {
        let mut state = self.state.write().await;
        if state.usernames.contains_key(&profile.username) {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let farmer = Farmer {
            id: Uuid::new_v4(),
            profile: profile.clone(),
            created_at: Utc::now(),
        };
        state.usernames.insert(profile.username.clone(), farmer.id);
        state.farmers.insert(farmer.id, farmer.clone());
        Ok(farmer)
    }

    async fn get_profile(&self, username: &str) -> AppResult<Farmer> {
        let state = self.state.read().await;
        state
            .usernames
            .get(username)
            .and_then(|id| state.farmers.get(id))
            .cloned()
            .ok_or_else(farmer_not_found)
    }

    async fn get_farmer(&self, farmer_id: Uuid) -> AppResult<Farmer> {
        let state = self.state.read().await;
        state
            .farmers
            .get(&farmer_id)
            .cloned()
            .ok_or_else(farmer_not_found)
    }

    async fn update_delivery_token(&self, farmer_id: Uuid, token: Option<&str>) -> AppResult<()> {
        let mut state = self.state.write().await;
        let farmer = state
            .farmers
            .get_mut(&farmer_id)
            .ok_or_else(farmer_not_found)?;
        farmer.profile.delivery_token = token.map(str::to_string);
        Ok(())
    }

    async fn save_query(
        &self,
        farmer_id: Uuid,
        query: &str,
        response: &str,
    ) -> AppResult<QueryRecord> {
        let mut state = self.state.write().await;
        if !state.farmers.contains_key(&farmer_id) {
            return Err(farmer_not_found());
        }

        let record = QueryRecord {
            id: Uuid::new_v4(),
            farmer_id,
            query: query.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        };
        state.queries.push(record.clone());
        Ok(record)
    }

    async fn list_recent_queries(
        &self,
        farmer_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<QueryRecord>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit.max(0)).unwrap_or(0);
        Ok(state
            .queries
            .iter()
            .rev()
            .filter(|q| q.farmer_id == farmer_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryFarmerStore::new();
        store.save_profile(&FarmerProfile::new("raman123")).await.unwrap();

        let err = store
            .save_profile(&FarmerProfile::new("raman123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEntry(ref f) if f == "username"));
    }

    #[tokio::test]
    async fn test_unknown_username_not_found() {
        let store = InMemoryFarmerStore::new();
        let err = store.get_profile("nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recent_queries_newest_first_and_limited() {
        let store = InMemoryFarmerStore::new();
        let farmer = store.save_profile(&FarmerProfile::new("devi_k")).await.unwrap();
        let other = store.save_profile(&FarmerProfile::new("other")).await.unwrap();

        for i in 0..7 {
            store
                .save_query(farmer.id, &format!("q{}", i), "a")
                .await
                .unwrap();
        }
        store.save_query(other.id, "not mine", "a").await.unwrap();

        let recent = store.list_recent_queries(farmer.id, 5).await.unwrap();
        let queries: Vec<&str> = recent.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["q6", "q5", "q4", "q3", "q2"]);
    }

    #[tokio::test]
    async fn test_update_delivery_token() {
        let store = InMemoryFarmerStore::new();
        let farmer = store.save_profile(&FarmerProfile::new("devi_k")).await.unwrap();

        store
            .update_delivery_token(farmer.id, Some("device-token"))
            .await
            .unwrap();
        let loaded = store.get_farmer(farmer.id).await.unwrap();
        assert_eq!(loaded.profile.delivery_token.as_deref(), Some("device-token"));

        let err = store
            .update_delivery_token(Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
