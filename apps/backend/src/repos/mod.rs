//! Repositories: domain records over the SeaORM adapters.
//!
//! Every repository is a unit struct implementing [`Repo`] (and, where a
//! relation can be expanded, [`RelatedRepo`]). Methods are generic over
//! `ConnectionTrait`, so they run against the pool or inside `with_txn`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::errors::domain::DomainError;

pub mod clients;
pub mod portfolio_clients;
pub mod portfolios;
pub mod users;

pub use clients::{Client, ClientPatch, ClientRepo, NewClient};
pub use portfolios::{NewPortfolio, Portfolio, PortfolioPatch, PortfolioRepo};
pub use users::{NewUser, User, UserPatch, UserRepo};

/// Standard CRUD capability set shared by every resource.
#[async_trait]
pub trait Repo {
    type Record: Send;
    type NewRecord: Send;
    type Patch: Send;

    /// Error returned when `id` does not exist.
    fn not_found(id: i64) -> DomainError;

    async fn all<C: ConnectionTrait + Send + Sync>(
        conn: &C,
    ) -> Result<Vec<Self::Record>, DomainError>;

    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Option<Self::Record>, DomainError>;

    /// Like `find_by_id`, but a missing row is an error.
    async fn require<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Self::Record, DomainError> {
        Self::find_by_id(conn, id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        new: Self::NewRecord,
    ) -> Result<Self::Record, DomainError>;

    /// Load, merge the provided fields, persist.
    async fn merge_save<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
        patch: Self::Patch,
    ) -> Result<Self::Record, DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64)
        -> Result<(), DomainError>;
}

/// Explicit, opt-in expansion of a many-to-many relation.
#[async_trait]
pub trait RelatedRepo: Repo {
    type Related: Send;

    /// JSON field the related records are rendered under.
    const RELATED_FIELD: &'static str;

    async fn find_with_related<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Option<WithRelated<Self::Record, Self::Related>>, DomainError>;

    async fn all_with_related<C: ConnectionTrait + Send + Sync>(
        conn: &C,
    ) -> Result<Vec<WithRelated<Self::Record, Self::Related>>, DomainError>;
}

/// A record plus one array of related records.
///
/// Serializes as the bare record with one extra field, e.g.
/// `{"id": 1, "clientName": "Acme", ..., "portfolios": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithRelated<R, T> {
    #[serde(flatten)]
    pub record: R,
    #[serde(flatten)]
    related: BTreeMap<&'static str, Vec<T>>,
}

impl<R, T> WithRelated<R, T> {
    pub fn new(record: R, field: &'static str, related: Vec<T>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field, related);
        Self {
            record,
            related: map,
        }
    }

    pub fn related(&self) -> &[T] {
        self.related
            .values()
            .next()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
