// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credential store)
//! - Exercise guides (reference catalog)
//! - Daily goal documents (one per user per date)
//! - Food logs (one per user)

use std::future::Future;
use std::time::Duration;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{DailyGoalDoc, Exercise, FoodLogDoc, User};

/// Upper bound on catalog reads; these back interactive screens and must not
/// hang on a slow store.
const CATALOG_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look a user up by email (unique across the collection).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Create or update a user record.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Exercise Catalog Operations ─────────────────────────────

    /// List the whole exercise catalog.
    pub async fn list_exercises(&self) -> Result<Vec<Exercise>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISE_GUIDES)
            .obj()
            .query();

        with_catalog_timeout(async move {
            query.await.map_err(|e| AppError::Database(e.to_string()))
        })
        .await
    }

    /// List catalog entries in one category.
    pub async fn list_exercises_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Exercise>, AppError> {
        let category = category.to_string();
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISE_GUIDES)
            .filter(move |q| q.field("category").eq(category.clone()))
            .obj()
            .query();

        with_catalog_timeout(async move {
            query.await.map_err(|e| AppError::Database(e.to_string()))
        })
        .await
    }

    /// Get one catalog entry by id.
    pub async fn get_exercise(&self, exercise_id: &str) -> Result<Option<Exercise>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EXERCISE_GUIDES)
            .obj()
            .one(exercise_id);

        with_catalog_timeout(async move {
            query.await.map_err(|e| AppError::Database(e.to_string()))
        })
        .await
    }

    /// Look a catalog entry up by exact name. Used to resolve exercise-goal
    /// references at creation time.
    pub async fn get_exercise_by_name(&self, name: &str) -> Result<Option<Exercise>, AppError> {
        let name = name.to_string();
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISE_GUIDES)
            .filter(move |q| q.field("name").eq(name.clone()))
            .limit(1)
            .obj()
            .query();

        let entries: Vec<Exercise> = with_catalog_timeout(async move {
            query.await.map_err(|e| AppError::Database(e.to_string()))
        })
        .await?;

        Ok(entries.into_iter().next())
    }

    /// Store a catalog entry.
    pub async fn insert_exercise(&self, exercise: &Exercise) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EXERCISE_GUIDES)
            .document_id(&exercise.id)
            .object(exercise)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a catalog entry. Returns false when no such entry existed.
    pub async fn delete_exercise(&self, exercise_id: &str) -> Result<bool, AppError> {
        // Firestore deletes don't report whether a document existed, so
        // check first. Catalog deletes are rare admin operations.
        if self.get_exercise(exercise_id).await?.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::EXERCISE_GUIDES)
            .document_id(exercise_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }

    // ─── Daily Goal Document Operations ──────────────────────────

    /// Get the goal document for one user/date.
    pub async fn get_daily_goals(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<DailyGoalDoc>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::DAILY_GOALS)
            .obj()
            .one(&DailyGoalDoc::doc_id(user_id, date))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write a goal document back (full replace of the embedded list).
    pub async fn set_daily_goals(&self, doc: &DailyGoalDoc) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::DAILY_GOALS)
            .document_id(DailyGoalDoc::doc_id(&doc.user_id, &doc.date))
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All goal documents belonging to one user, any date. Used for lookups
    /// keyed by goal id alone.
    pub async fn list_daily_goals_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<DailyGoalDoc>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::DAILY_GOALS)
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Food Log Operations ─────────────────────────────────────

    /// Get a user's food log document.
    pub async fn get_food_log(&self, user_id: &str) -> Result<Option<FoodLogDoc>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FOOD_LOGS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write a food log document back.
    pub async fn set_food_log(&self, doc: &FoodLogDoc) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FOOD_LOGS)
            .document_id(&doc.user_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Bound a catalog read by [`CATALOG_READ_TIMEOUT`].
async fn with_catalog_timeout<T, F>(fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(CATALOG_READ_TIMEOUT, fut)
        .await
        .map_err(|_| AppError::Database("Catalog read timed out".to_string()))?
}
