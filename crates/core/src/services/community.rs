//! Community service.

use rand::Rng;
use sea_orm::Set;
use serde::Deserialize;
use tangle_common::{AppError, AppResult, IdGenerator};
use tangle_db::{entities::community, repositories::CommunityRepository};
use tracing::info;
use validator::Validate;

/// Attempts at finding a free generated code before giving up.
const CODE_ATTEMPTS: usize = 5;

/// Input for creating a community.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    /// Explicit join code; generated from the name when absent or blank.
    #[validate(length(max = 32))]
    pub community_code: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub location: String,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(length(min = 1, max = 128))]
    pub state: String,

    #[validate(length(min = 1, max = 16))]
    pub pincode: String,
}

/// Community service for business logic.
#[derive(Clone)]
pub struct CommunityService {
    community_repo: CommunityRepository,
    id_gen: IdGenerator,
}

impl CommunityService {
    /// Create a new community service.
    #[must_use]
    pub const fn new(community_repo: CommunityRepository) -> Self {
        Self {
            community_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a community, generating a join code when none is given.
    pub async fn create(&self, input: CreateCommunityInput) -> AppResult<community::Model> {
        input.validate()?;

        let code = match requested_code(input.community_code.as_deref()) {
            Some(code) => {
                if self.community_repo.code_exists(code).await? {
                    return Err(AppError::Conflict(format!(
                        "Community code already in use: {code}"
                    )));
                }
                code.to_string()
            }
            None => self.generate_code(&input.name).await?,
        };

        let model = community::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            community_code: Set(code),
            location: Set(input.location),
            city: Set(input.city),
            state: Set(input.state),
            pincode: Set(input.pincode),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.community_repo.create(model).await?;
        info!(id = %created.id, code = %created.community_code, "Community created");
        Ok(created)
    }

    async fn generate_code(&self, name: &str) -> AppResult<String> {
        let base = code_base(name);

        for _ in 0..CODE_ATTEMPTS {
            let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
            let candidate = format!("{base}{suffix}");
            if !self.community_repo.code_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::Conflict(
            "Could not generate a unique community code".to_string(),
        ))
    }

    /// Get a community by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<community::Model> {
        self.community_repo.get_by_id(id).await
    }

    /// Get a community by its join code.
    pub async fn get_by_code(&self, code: &str) -> AppResult<community::Model> {
        self.community_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community not found: {code}")))
    }

    /// All communities, ordered by name.
    pub async fn list_all(&self) -> AppResult<Vec<community::Model>> {
        self.community_repo.find_all().await
    }

    /// Active communities whose name, city or location contain `query`.
    pub async fn search(&self, query: &str) -> AppResult<Vec<community::Model>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Search query must not be empty".to_string()));
        }
        self.community_repo.search(query).await
    }
}

/// Trimmed explicit code, or `None` when absent or blank.
fn requested_code(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|code| !code.is_empty())
}

/// Upper-cased alphanumerics of `name`, at most six, or `COMM`.
fn code_base(name: &str) -> String {
    let base: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(6)
        .collect::<String>()
        .to_uppercase();

    if base.is_empty() {
        "COMM".to_string()
    } else {
        base
    }
}
