use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Identity, ResultEngine,
    identity::Role,
    password::{hash_password, verify_password},
    users::{self, User},
};

use super::{Engine, normalize_optional_text};

impl Engine {
    /// Checks a username/password pair and returns the matching identity.
    ///
    /// Unknown users and wrong passwords both fail with
    /// [`EngineError::InvalidCredentials`].
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<Identity> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::InvalidCredentials("User not found".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(EngineError::InvalidCredentials(
                "Invalid password".to_string(),
            ));
        }

        let user = User::try_from(user)?;
        tracing::info!("{} logged in", user.username);
        Ok(Identity::new(user.id, user.username, user.role))
    }

    /// Creates a user on behalf of an admin. `role` defaults to staff.
    pub async fn create_user(
        &self,
        identity: &Identity,
        username: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> ResultEngine<User> {
        identity.require_admin("create users")?;
        let username = normalize_optional_text(username)
            .ok_or_else(|| EngineError::InvalidInput("Invalid username".to_string()))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| EngineError::InvalidInput("Invalid password".to_string()))?;
        let role = match normalize_optional_text(role) {
            Some(role) => Role::try_from(role.as_str())?,
            None => Role::default(),
        };

        let user = self.register_user(&username, password, role).await?;
        tracing::info!("{} created user {}", identity.username, user.username);
        Ok(user)
    }

    /// Stores a new user without any caller check.
    ///
    /// Used by `create_user` and by the admin CLI to bootstrap the first
    /// account.
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> ResultEngine<User> {
        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(
                "Username already exists".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role,
        };
        let active = users::ActiveModel {
            id: ActiveValue::Set(user.id.clone()),
            username: ActiveValue::Set(user.username.clone()),
            password_hash: ActiveValue::Set(hash_password(password)?),
            role: ActiveValue::Set(role.as_str().to_string()),
        };
        users::Entity::insert(active).exec(&self.database).await?;
        Ok(user)
    }

    pub async fn list_users(&self, identity: &Identity) -> ResultEngine<Vec<User>> {
        identity.require_admin("view users")?;
        let rows = users::Entity::find().all(&self.database).await?;
        rows.into_iter().map(User::try_from).collect()
    }

    /// Deletes a user. Deleting a missing id is not an error.
    pub async fn delete_user(&self, identity: &Identity, id: &str) -> ResultEngine<()> {
        identity.require_admin("delete users")?;
        users::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        tracing::info!("{} deleted user {id}", identity.username);
        Ok(())
    }
}
