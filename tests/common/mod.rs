//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use matchmaker::models::{Gender, Profile};
use matchmaker::services::{MatchService, RecommendService};
use matchmaker::store::{MemoryStore, SqliteStore};

/// Both services wired over one shared in-memory store.
pub struct MemoryHarness {
    pub store: Arc<MemoryStore>,
    pub recommend: RecommendService,
    pub matches: MatchService,
}

pub fn memory_harness() -> MemoryHarness {
    let store = Arc::new(MemoryStore::new());
    let recommend = RecommendService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    let matches = MatchService::new(store.clone(), store.clone());
    MemoryHarness {
        store,
        recommend,
        matches,
    }
}

/// Both services wired over a migrated single-connection in-memory SQLite
/// database. One connection, because every pooled `:memory:` connection
/// would otherwise get its own database.
pub struct SqliteHarness {
    pub pool: SqlitePool,
    pub store: Arc<SqliteStore>,
    pub recommend: RecommendService,
    pub matches: MatchService,
}

pub async fn sqlite_harness() -> SqliteHarness {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    let store = Arc::new(SqliteStore::new(pool.clone()));
    store.migrate().await.expect("migrations");
    let recommend = RecommendService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    let matches = MatchService::new(store.clone(), store.clone());
    SqliteHarness {
        pool,
        store,
        recommend,
        matches,
    }
}

/// A birthday roughly `age_years` and a half years ago, keeping seeded
/// profiles clear of the age-window boundaries.
pub fn birthday_for_age(age_years: u32) -> NaiveDate {
    Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(age_years * 12 + 6))
        .expect("birthday in range")
}

pub fn profile(id: &str, gender: Gender, age_years: u32, coordinates: Option<&str>) -> Profile {
    Profile {
        id: id.to_string(),
        name: format!("User {id}"),
        gender,
        birthday: birthday_for_age(age_years),
        coordinates: coordinates.map(str::to_string),
        height: None,
        horoscope: None,
        hobby: None,
        language: None,
        education: None,
        home_town: None,
    }
}

pub async fn seed_profile(pool: &SqlitePool, profile: &Profile) {
    sqlx::query(
        "INSERT INTO profiles (id, name, gender, birthday, coordinates, height, horoscope, hobby, language, education, home_town) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(&profile.id)
    .bind(&profile.name)
    .bind(profile.gender)
    .bind(profile.birthday)
    .bind(&profile.coordinates)
    .bind(profile.height)
    .bind(&profile.horoscope)
    .bind(&profile.hobby)
    .bind(&profile.language)
    .bind(&profile.education)
    .bind(&profile.home_town)
    .execute(pool)
    .await
    .expect("seed profile");
}

pub async fn seed_question(pool: &SqlitePool, question_id: i64, content: &str, answers: &str) {
    sqlx::query("INSERT INTO questions (question_id, content, answers) VALUES (?1, ?2, ?3)")
        .bind(question_id)
        .bind(content)
        .bind(answers)
        .execute(pool)
        .await
        .expect("seed question");
}
