//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tangle_common::{AppError, AppResult, IdGenerator};
use tangle_db::{
    entities::{
        community,
        user::{self, UserRole},
    },
    repositories::{CommunityRepository, UserRepository},
};
use tracing::{info, warn};
use validator::Validate;

use super::token::{Claims, TokenService};

/// Community every demo account is placed in.
const DEMO_COMMUNITY_CODE: &str = "ANNA001";

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 256))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 5, max = 32))]
    pub phone_number: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 512))]
    pub address: String,

    #[validate(length(min = 1, max = 256))]
    pub locality: String,

    #[validate(length(min = 1, max = 16))]
    pub pincode: String,

    #[validate(length(min = 1, max = 32))]
    pub community_code: String,

    /// Role tag such as `RESIDENT`; residents by default.
    #[serde(alias = "userRole")]
    pub role: Option<String>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 256))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, max = 512))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub locality: Option<String>,

    #[validate(length(min = 1, max = 16))]
    pub pincode: Option<String>,

    #[validate(length(max = 1024))]
    pub profile_picture: Option<String>,
}

/// Activity totals shown on a user's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_posts: u64,
    pub total_views: i64,
    pub total_comments: u64,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    community_repo: CommunityRepository,
    tokens: TokenService,
    demo_login: bool,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        community_repo: CommunityRepository,
        tokens: TokenService,
        demo_login: bool,
    ) -> Self {
        Self {
            user_repo,
            community_repo,
            tokens,
            demo_login,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user into the community named by its join code.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        let role = match input.role.as_deref() {
            Some(tag) => tag.parse::<UserRole>()?,
            None => UserRole::default(),
        };

        if self.user_repo.email_exists(&input.email).await? {
            return Err(AppError::Conflict(format!(
                "Email already registered: {}",
                input.email
            )));
        }

        if self.user_repo.phone_exists(&input.phone_number).await? {
            return Err(AppError::Conflict(format!(
                "Phone number already registered: {}",
                input.phone_number
            )));
        }

        let community = self
            .community_repo
            .find_by_code(&input.community_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Community not found: {}", input.community_code))
            })?;

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(input.full_name),
            email: Set(input.email),
            phone_number: Set(input.phone_number),
            password_hash: Set(password_hash),
            role: Set(role),
            address: Set(input.address),
            locality: Set(input.locality),
            pincode: Set(input.pincode),
            is_active: Set(true),
            is_verified: Set(false),
            profile_picture: Set(None),
            community_id: Set(Some(community.id)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, community = %input.community_code, "User registered");
        Ok(user)
    }

    /// Authenticate by email or phone number and issue an access token.
    ///
    /// With demo login enabled, unknown identifiers are provisioned as new
    /// residents of the demo community and passwords are not checked.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<(String, user::Model)> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::Validation("Identifier is required".to_string()));
        }

        let existing = self.user_repo.find_by_identifier(identifier).await?;

        let user = if self.demo_login {
            match existing {
                Some(user) => user,
                None => self.provision_demo_user(identifier, password).await?,
            }
        } else {
            let user = existing
                .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;
            if !verify_password(password, &user.password_hash)? {
                return Err(AppError::Unauthorized("Invalid credentials".to_string()));
            }
            if !user.is_active {
                return Err(AppError::Forbidden("Account is deactivated".to_string()));
            }
            user
        };

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "User logged in");
        Ok((token, user))
    }

    async fn provision_demo_user(&self, identifier: &str, password: &str) -> AppResult<user::Model> {
        let community = self.demo_community().await?;

        let (email, phone_number) = if identifier.contains('@') {
            (
                identifier.to_string(),
                format!("demo-{}", self.id_gen.generate()),
            )
        } else {
            (format!("{identifier}@demo.local"), identifier.to_string())
        };

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set("Demo User".to_string()),
            email: Set(email),
            phone_number: Set(phone_number),
            password_hash: Set(hash_password(password)?),
            role: Set(UserRole::Resident),
            address: Set(community.location.clone()),
            locality: Set(community.name.clone()),
            pincode: Set(community.pincode.clone()),
            is_active: Set(true),
            is_verified: Set(false),
            profile_picture: Set(None),
            community_id: Set(Some(community.id)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        warn!(user_id = %user.id, "Provisioned demo user on login");
        Ok(user)
    }

    async fn demo_community(&self) -> AppResult<community::Model> {
        if let Some(existing) = self.community_repo.find_by_code(DEMO_COMMUNITY_CODE).await? {
            return Ok(existing);
        }

        let model = community::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set("Anna Nagar".to_string()),
            community_code: Set(DEMO_COMMUNITY_CODE.to_string()),
            location: Set("Anna Nagar".to_string()),
            city: Set("Chennai".to_string()),
            state: Set("Tamil Nadu".to_string()),
            pincode: Set("600040".to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        let created = self.community_repo.create(model).await?;
        warn!(community_id = %created.id, "Provisioned demo community");
        Ok(created)
    }

    /// Resolve the user a verified token was issued to.
    pub async fn current_user(&self, claims: &Claims) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(&claims.sub).await?;
        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }
        Ok(user)
    }

    /// Apply the fields present in `input` to the user's profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(locality) = input.locality {
            active.locality = Set(locality);
        }
        if let Some(pincode) = input.pincode {
            active.pincode = Set(pincode);
        }
        if let Some(profile_picture) = input.profile_picture {
            active.profile_picture = Set(Some(profile_picture));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Post, view and comment totals for a user.
    pub async fn stats(&self, user_id: &str) -> AppResult<UserStats> {
        let totals = self.user_repo.aggregates(user_id).await?;
        Ok(UserStats {
            total_posts: totals.total_posts,
            total_views: totals.total_views,
            total_comments: totals.total_comments,
        })
    }

    /// Members of the given user's community.
    pub async fn community_members(&self, user: &user::Model) -> AppResult<Vec<user::Model>> {
        match &user.community_id {
            Some(community_id) => self.user_repo.find_by_community(community_id).await,
            None => Ok(vec![]),
        }
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        self.user_repo.count().await
    }

    /// Mark a user as verified.
    pub async fn verify(&self, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        if user.is_verified {
            return Ok(user);
        }

        let mut active: user::ActiveModel = user.into();
        active.is_verified = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.user_repo.update(active).await?;
        info!(user_id = %updated.id, "User verified");
        Ok(updated)
    }

    /// Deactivate a user account.
    pub async fn deactivate(&self, user_id: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;
        if !user.is_active {
            return Ok(user);
        }

        let mut active: user::ActiveModel = user.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.user_repo.update(active).await?;
        info!(user_id = %updated.id, "User deactivated");
        Ok(updated)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn count_row(n: i64) -> [std::collections::BTreeMap<&'static str, sea_orm::Value>; 1] {
        [maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }]
    }

    fn create_test_user(id: &str, email: &str, password_hash: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            full_name: "Priya Raman".to_string(),
            email: email.to_string(),
            phone_number: "9000000001".to_string(),
            password_hash: password_hash.to_string(),
            role: UserRole::Resident,
            address: "12 Second Avenue".to_string(),
            locality: "Anna Nagar".to_string(),
            pincode: "600040".to_string(),
            is_active: true,
            is_verified: false,
            profile_picture: None,
            community_id: Some("c1".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_community(code: &str) -> community::Model {
        community::Model {
            id: "c1".to_string(),
            name: "Anna Nagar".to_string(),
            community_code: code.to_string(),
            location: "Anna Nagar".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            pincode: "600040".to_string(),
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            full_name: "Priya Raman".to_string(),
            email: "priya@example.com".to_string(),
            phone_number: "9000000001".to_string(),
            password: "secret123".to_string(),
            address: "12 Second Avenue".to_string(),
            locality: "Anna Nagar".to_string(),
            pincode: "600040".to_string(),
            community_code: "ANNA001".to_string(),
            role: None,
        }
    }

    fn create_test_service(
        user_db: Arc<DatabaseConnection>,
        community_db: Arc<DatabaseConnection>,
        demo_login: bool,
    ) -> UserService {
        UserService::new(
            UserRepository::new(user_db),
            CommunityRepository::new(community_db),
            TokenService::with_secret("test-secret", 3600),
            demo_login,
        )
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_row(1)])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), true);
        let result = service.register(register_input()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_phone_conflicts() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_row(0)])
                .append_query_results([count_row(1)])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), true);
        let result = service.register(register_input()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_unknown_community_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_row(0)])
                .append_query_results([count_row(0)])
                .into_connection(),
        );
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<community::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, community_db, true);
        let result = service.register(register_input()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_register_binds_user_to_community() {
        let created = create_test_user("u1", "priya@example.com", "$argon2id$stub");
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_row(0)])
                .append_query_results([count_row(0)])
                .append_query_results([[created]])
                .into_connection(),
        );
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_community("ANNA001")]])
                .into_connection(),
        );

        let service = create_test_service(user_db, community_db, true);
        let user = service.register(register_input()).await.unwrap();

        assert_eq!(user.community_id.as_deref(), Some("c1"));
        assert!(user.is_active);
        assert!(!user.is_verified);
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let mut input = register_input();
        input.role = Some("LANDLORD".to_string());

        let service = create_test_service(empty_db(), empty_db(), true);
        let result = service.register(input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_register_body_accepts_user_role_key() {
        let input: RegisterInput = serde_json::from_value(serde_json::json!({
            "fullName": "Priya Raman",
            "email": "priya@example.com",
            "phoneNumber": "9876543210",
            "password": "secret123",
            "address": "12 Second Avenue",
            "locality": "Anna Nagar",
            "pincode": "600040",
            "communityCode": "ANNA001",
            "userRole": "BUSINESS_OWNER"
        }))
        .unwrap();

        assert_eq!(input.role.as_deref(), Some("BUSINESS_OWNER"));
        assert_eq!(
            input.role.unwrap().parse::<UserRole>().unwrap(),
            UserRole::BusinessOwner
        );
    }

    #[test]
    fn test_register_body_accepts_role_key() {
        let input: RegisterInput = serde_json::from_value(serde_json::json!({
            "fullName": "Priya Raman",
            "email": "priya@example.com",
            "phoneNumber": "9876543210",
            "password": "secret123",
            "address": "12 Second Avenue",
            "locality": "Anna Nagar",
            "pincode": "600040",
            "communityCode": "ANNA001",
            "role": "SERVICE_PROVIDER"
        }))
        .unwrap();

        assert_eq!(input.role.as_deref(), Some("SERVICE_PROVIDER"));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let mut input = register_input();
        input.password = "123".to_string();

        let service = create_test_service(empty_db(), empty_db(), true);
        assert!(matches!(
            service.register(input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_demo_login_provisions_unknown_identifier() {
        let mut provisioned = create_test_user("u-new", "new@x.com", "$argon2id$stub");
        provisioned.full_name = "Demo User".to_string();

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[provisioned]])
                .into_connection(),
        );
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_community("ANNA001")]])
                .into_connection(),
        );

        let service = create_test_service(user_db, community_db, true);
        let (token, user) = service.login("new@x.com", "whatever").await.unwrap();

        assert_eq!(user.email, "new@x.com");
        assert_eq!(user.role, UserRole::Resident);
        assert_eq!(service.tokens.decode(&token).unwrap().sub, "u-new");
    }

    #[tokio::test]
    async fn test_demo_login_creates_demo_community_when_missing() {
        let provisioned = create_test_user("u-new", "9123456789@demo.local", "$argon2id$stub");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[provisioned]])
                .into_connection(),
        );
        let community_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<community::Model>::new()])
                .append_query_results([[create_test_community("ANNA001")]])
                .into_connection(),
        );

        let service = create_test_service(user_db, community_db, true);
        let (_, user) = service.login("9123456789", "pw").await.unwrap();

        assert_eq!(user.community_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_demo_login_ignores_password_for_existing_user() {
        let hash = hash_password("right-password").unwrap();
        let existing = create_test_user("u1", "priya@example.com", &hash);

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), true);
        let (token, user) = service.login("priya@example.com", "wrong").await.unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(service.tokens.decode(&token).unwrap().sub, "u1");
    }

    #[tokio::test]
    async fn test_strict_login_rejects_wrong_password() {
        let hash = hash_password("right-password").unwrap();
        let existing = create_test_user("u1", "priya@example.com", &hash);

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), false);
        let result = service.login("priya@example.com", "wrong").await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_strict_login_rejects_unknown_identifier() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), false);
        let result = service.login("ghost@example.com", "pw").await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_strict_login_accepts_right_password() {
        let hash = hash_password("right-password").unwrap();
        let existing = create_test_user("u1", "priya@example.com", &hash);

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), false);
        let (_, user) = service
            .login("priya@example.com", "right-password")
            .await
            .unwrap();

        assert_eq!(user.id, "u1");
    }

    #[tokio::test]
    async fn test_update_profile_applies_only_present_fields() {
        let user = create_test_user("u1", "priya@example.com", "$argon2id$stub");
        let mut updated = user.clone();
        updated.locality = "X".to_string();

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .append_query_results([[updated]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), true);
        let input = UpdateProfileInput {
            locality: Some("X".to_string()),
            ..Default::default()
        };
        let result = service.update_profile("u1", input).await.unwrap();

        assert_eq!(result.locality, "X");
        assert_eq!(result.full_name, user.full_name);
        assert_eq!(result.address, user.address);
        assert_eq!(result.pincode, user.pincode);
    }

    #[tokio::test]
    async fn test_current_user_missing_is_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), true);
        let claims = Claims {
            sub: "gone".to_string(),
            email: "gone@example.com".to_string(),
            role: UserRole::Resident,
            iat: 0,
            exp: 0,
        };

        assert!(matches!(
            service.current_user(&claims).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_is_idempotent() {
        let mut user = create_test_user("u1", "priya@example.com", "$argon2id$stub");
        user.is_verified = true;

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), true);
        let result = service.verify("u1").await.unwrap();

        assert!(result.is_verified);
    }

    #[tokio::test]
    async fn test_stats() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_row(2)])
                .append_query_results([[maplit::btreemap! {
                    "total_views" => sea_orm::Value::BigInt(Some(15))
                }]])
                .append_query_results([count_row(4)])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db(), true);
        let stats = service.stats("u1").await.unwrap();

        assert_eq!(
            stats,
            UserStats {
                total_posts: 2,
                total_views: 15,
                total_comments: 4,
            }
        );
    }
}
