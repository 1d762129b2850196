//! User repository.

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::Repo;
use crate::adapters::users_sea as users_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

/// User domain model
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

/// Fields to change; `None` keeps the stored value.
///
/// `phone_number: Some(None)` clears the phone number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<Option<String>>,
}

impl UserPatch {
    pub fn merge(self, current: User) -> User {
        User {
            first_name: self.first_name.unwrap_or(current.first_name),
            last_name: self.last_name.unwrap_or(current.last_name),
            phone_number: self.phone_number.unwrap_or(current.phone_number),
            ..current
        }
    }
}

pub struct UserRepo;

#[async_trait]
impl Repo for UserRepo {
    type Record = User;
    type NewRecord = NewUser;
    type Patch = UserPatch;

    fn not_found(id: i64) -> DomainError {
        DomainError::not_found(NotFoundKind::User, format!("User {id} not found"))
    }

    async fn all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<User>, DomainError> {
        let users = users_adapter::find_all(conn).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Option<User>, DomainError> {
        let user = users_adapter::find_by_id(conn, id).await?;
        Ok(user.map(User::from))
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        new: NewUser,
    ) -> Result<User, DomainError> {
        let dto = users_adapter::UserCreate {
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
        };
        let user = users_adapter::create_user(conn, dto).await?;
        Ok(User::from(user))
    }

    async fn merge_save<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
        patch: UserPatch,
    ) -> Result<User, DomainError> {
        let merged = patch.merge(Self::require(conn, id).await?);
        let dto = users_adapter::UserUpdate {
            id: merged.id,
            first_name: merged.first_name,
            last_name: merged.last_name,
            phone_number: merged.phone_number,
        };
        let user = users_adapter::update_user(conn, dto).await?;
        Ok(User::from(user))
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<(), DomainError> {
        match users_adapter::delete_user(conn, id).await? {
            0 => Err(Self::not_found(id)),
            _ => Ok(()),
        }
    }
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            phone_number: model.phone_number,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
