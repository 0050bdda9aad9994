use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::Utc;
use query_core::{
    count_by, count_where, execute, FieldErrors, Filter, Page, PageRequest, SortDir, SortFields,
    SortValue,
};
use tracing::{debug, info, instrument};

use crate::contract::model::{Role, User, UserInput, UserQuery, UserStats, UserStatus};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;
use crate::domain::validation::{validate_input, STATUS_MESSAGE};

const DEFAULT_SORT_FIELD: &str = "createdAt";
const DEFAULT_SORT_DIRECTION: &str = "desc";

/// Domain service with business rules for user accounts.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

fn sort_fields() -> SortFields<User> {
    SortFields::<User>::new()
        .field("id", |u| SortValue::Int(u.id))
        .field("username", |u| SortValue::text(&u.username))
        .field("email", |u| SortValue::text(&u.email))
        .field("firstName", |u| SortValue::text(&u.first_name))
        .field("lastName", |u| SortValue::text(&u.last_name))
        .field("role", |u| SortValue::text(u.role.as_str()))
        .field("status", |u| SortValue::text(u.status.as_str()))
        .field("createdAt", |u| SortValue::Time(u.created_at))
        .field("updatedAt", |u| SortValue::Time(u.updated_at))
}

fn user_filter(q: &UserQuery) -> Filter<User> {
    Filter::<User>::new()
        .contains_ci(q.username.as_deref(), |u| Some(u.username.as_str()))
        .contains_ci(q.email.as_deref(), |u| Some(u.email.as_str()))
        .contains_ci(q.first_name.as_deref(), |u| Some(u.first_name.as_str()))
        .contains_ci(q.last_name.as_deref(), |u| Some(u.last_name.as_str()))
        .text_eq(q.role.as_deref(), |u| Some(u.role.as_str()))
        .text_eq(q.status.as_deref(), |u| Some(u.status.as_str()))
        .equals(q.active, |u| u.active)
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    // --- reads ---

    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        debug!("Listing all users");
        Ok(self.repo.scan().await?)
    }

    #[instrument(name = "users.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        debug!("Getting user by id");
        Ok(self.repo.get(id).await?)
    }

    #[instrument(name = "users.service.get_user_by_email", skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::email_not_found(email))
    }

    /// Case-insensitive username substring over every stored user.
    #[instrument(name = "users.service.search_by_username", skip(self))]
    pub async fn search_by_username(&self, username: &str) -> Result<Vec<User>, DomainError> {
        let filter =
            Filter::<User>::new().contains_ci(Some(username), |u| Some(u.username.as_str()));
        let all = self.repo.scan().await?;
        Ok(all.into_iter().filter(|u| filter.matches(u)).collect())
    }

    #[instrument(name = "users.service.search", skip(self, query))]
    pub async fn search(&self, query: UserQuery) -> Result<Page<User>, DomainError> {
        info!("Searching users with {:?}", query);

        let dir = SortDir::parse(
            query
                .sort_direction
                .as_deref()
                .unwrap_or(DEFAULT_SORT_DIRECTION),
        );
        let field = query
            .sort_by
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SORT_FIELD);
        let order = sort_fields().resolve(field, dir)?;
        let request = PageRequest::new(
            query.page.unwrap_or(0),
            query
                .size
                .unwrap_or(i64::from(self.config.default_page_size)),
        )?
        .clamp_size(u64::from(self.config.max_page_size));

        let filter = user_filter(&query);
        let page = execute(self.repo.scan().await?, &filter, Some(&order), request);
        debug!(total = page.total_elements, "Search completed");
        Ok(page)
    }

    /// Distinct roles held by any stored user, sorted by name.
    #[instrument(name = "users.service.roles", skip(self))]
    pub async fn roles(&self) -> Result<Vec<String>, DomainError> {
        let all = self.repo.scan().await?;
        let set: BTreeSet<&'static str> = all.iter().map(|u| u.role.as_str()).collect();
        Ok(set.into_iter().map(str::to_string).collect())
    }

    #[instrument(name = "users.service.statistics", skip(self))]
    pub async fn statistics(&self) -> Result<UserStats, DomainError> {
        info!("Calculating user statistics");
        let all = self.repo.scan().await?;
        let active_users = count_where(&all, |u| u.active);
        let active: Vec<User> = all.iter().filter(|u| u.active).cloned().collect();

        Ok(UserStats {
            total_users: all.len() as u64,
            active_users,
            inactive_users: all.len() as u64 - active_users,
            users_by_role: count_by(&active, |u| Some(u.role.as_str().to_string())),
            users_by_status: count_by(&active, |u| Some(u.status.as_str().to_string())),
        })
    }

    /// `<first initial><last name>` in lower case, with a numeric suffix
    /// appended until no stored user has it.
    #[instrument(name = "users.service.generate_username", skip(self))]
    pub async fn generate_username(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<String, DomainError> {
        let mut errors = FieldErrors::new();
        errors.check(first_name.trim().is_empty(), "firstName", "First name is required");
        errors.check(last_name.trim().is_empty(), "lastName", "Last name is required");
        errors.into_result().map_err(DomainError::validation)?;

        let initial: String = first_name.trim().chars().take(1).collect();
        let base = format!("{initial}{}", last_name.trim()).to_lowercase();

        let taken: HashSet<String> = self
            .repo
            .scan()
            .await?
            .into_iter()
            .map(|u| u.username)
            .collect();
        let mut candidate = base.clone();
        let mut counter = 1u32;
        while taken.contains(&candidate) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        Ok(candidate)
    }

    // --- writes ---

    #[instrument(
        name = "users.service.create_user",
        skip(self, input),
        fields(username = %input.username)
    )]
    pub async fn create_user(&self, input: UserInput) -> Result<User, DomainError> {
        info!("Creating new user");
        validate_input(&input)
            .into_result()
            .map_err(DomainError::validation)?;
        self.ensure_unique(&input, None).await?;

        let user = self.repo.insert(new_user(input)).await?;
        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "users.service.update_user", skip(self, input), fields(user_id = id))]
    pub async fn update_user(
        &self,
        id: i64,
        input: UserInput,
        expected_version: Option<i64>,
    ) -> Result<User, DomainError> {
        info!("Updating user");
        validate_input(&input)
            .into_result()
            .map_err(DomainError::validation)?;

        let current = self.repo.get(id).await?;
        let expected = expected_version.unwrap_or(current.version);
        self.ensure_unique(&input, Some(id)).await?;

        let next = apply_input(current, input);
        let updated = self
            .repo
            .update_if_version_matches(id, next, expected)
            .await?;
        info!(version = updated.version, "Successfully updated user");
        Ok(updated)
    }

    #[instrument(name = "users.service.update_status", skip(self), fields(user_id = id))]
    pub async fn update_status(&self, id: i64, status: &str) -> Result<User, DomainError> {
        let parsed = UserStatus::parse(status).ok_or_else(|| {
            DomainError::validation(FieldErrors::single("status", STATUS_MESSAGE))
        })?;
        let mut next = self.repo.get(id).await?;
        let expected = next.version;
        next.status = parsed;
        next.updated_at = Utc::now();
        Ok(self
            .repo
            .update_if_version_matches(id, next, expected)
            .await?)
    }

    /// Soft delete: the account stays stored with `active = false`.
    #[instrument(name = "users.service.deactivate_user", skip(self), fields(user_id = id))]
    pub async fn deactivate_user(&self, id: i64) -> Result<(), DomainError> {
        info!("Soft deleting user");
        let current = self.repo.get(id).await?;
        self.repo
            .mark_inactive(id, current.version, Utc::now())
            .await?;
        Ok(())
    }

    #[instrument(name = "users.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting user");
        self.repo.delete(id).await?;
        Ok(())
    }

    #[instrument(
        name = "users.service.bulk_create",
        skip(self, inputs),
        fields(count = inputs.len())
    )]
    pub async fn bulk_create(&self, inputs: Vec<UserInput>) -> Result<Vec<User>, DomainError> {
        info!("Bulk creating users");
        if inputs.is_empty() {
            return Err(DomainError::validation(FieldErrors::single(
                "users",
                "At least one user is required",
            )));
        }

        let mut errors = FieldErrors::new();
        for (i, input) in inputs.iter().enumerate() {
            errors.merge_prefixed(&format!("users[{i}]."), validate_input(input));
        }
        errors.into_result().map_err(DomainError::validation)?;

        let mut usernames = HashSet::new();
        let mut emails = HashSet::new();
        for input in &inputs {
            if !usernames.insert(input.username.as_str()) {
                return Err(DomainError::username_already_exists(&input.username));
            }
            if !emails.insert(input.email.as_str()) {
                return Err(DomainError::email_already_exists(&input.email));
            }
            self.ensure_unique(input, None).await?;
        }

        let batch = inputs.into_iter().map(new_user).collect();
        let stored = self.repo.insert_all(batch).await?;
        info!("Bulk created {} users", stored.len());
        Ok(stored)
    }

    /// Username and email must not belong to another user.
    async fn ensure_unique(&self, input: &UserInput, owner: Option<i64>) -> Result<(), DomainError> {
        let foreign = |u: &User| Some(u.id) != owner;
        if self
            .repo
            .find_by_username(&input.username)
            .await?
            .is_some_and(|u| foreign(&u))
        {
            return Err(DomainError::username_already_exists(&input.username));
        }
        if self
            .repo
            .find_by_email(&input.email)
            .await?
            .is_some_and(|u| foreign(&u))
        {
            return Err(DomainError::email_already_exists(&input.email));
        }
        Ok(())
    }
}

fn parse_role(raw: Option<&str>) -> Option<Role> {
    raw.and_then(Role::parse)
}

fn parse_status(raw: Option<&str>) -> Option<UserStatus> {
    raw.and_then(UserStatus::parse)
}

fn new_user(input: UserInput) -> User {
    let now = Utc::now();
    let access = input.access.unwrap_or_default();
    User {
        id: 0,
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        phone: input.phone,
        role: parse_role(access.role.as_deref()).unwrap_or_default(),
        status: parse_status(access.status.as_deref()).unwrap_or_default(),
        active: access.active.unwrap_or(true),
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

fn apply_input(mut current: User, input: UserInput) -> User {
    current.username = input.username;
    current.email = input.email;
    current.first_name = input.first_name;
    current.last_name = input.last_name;
    current.phone = input.phone;
    if let Some(access) = input.access {
        if let Some(role) = parse_role(access.role.as_deref()) {
            current.role = role;
        }
        if let Some(status) = parse_status(access.status.as_deref()) {
            current.status = status;
        }
        if let Some(active) = access.active {
            current.active = active;
        }
    }
    current.updated_at = Utc::now();
    current
}
