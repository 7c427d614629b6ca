//! Generic data access over sea-orm entities.
//!
//! [`Repository`] offers the same contract for every table: lookups return
//! `Option`/`Vec` instead of failing on "no match", partial updates merge only
//! the `Set` fields of a patch, and pagination always reports the full match
//! count. Entity-specific queries live in the sibling modules as inherent impls
//! on a concrete `Repository<'_, Entity>`.

use std::marker::PhantomData;

use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel, Iterable,
    Order, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Related,
    TransactionTrait,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, Func, LikeExpr, SelectStatement, SimpleExpr},
};
use uuid::Uuid;

use crate::error::AppResult;

pub mod cart_repository;
pub mod category_repository;
pub mod certificate_repository;
pub mod chapter_repository;
pub mod course_repository;
pub mod membership;
pub mod quiz_repository;
pub mod user_repository;
pub mod wishlist_repository;

pub use cart_repository::CartRepository;
pub use category_repository::CategoryRepository;
pub use certificate_repository::CertificateRepository;
pub use chapter_repository::ChapterRepository;
pub use course_repository::CourseRepository;
pub use quiz_repository::QuizRepository;
pub use user_repository::UserRepository;
pub use wishlist_repository::WishlistRepository;

/// One page of records plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Paginate an already-loaded collection with the same semantics as
/// [`Repository::paginate`].
pub fn paginate_slice<T: Clone>(items: &[T], page: u64, limit: u64) -> Page<T> {
    let start = page.saturating_sub(1).saturating_mul(limit);
    let data = items
        .iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Page {
        data,
        total: items.len() as u64,
    }
}

pub type Sort<C> = Option<(C, Order)>;

/// Timestamp for `created_at` / `updated_at` columns.
pub fn now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}

pub struct Repository<'db, E> {
    conn: &'db DatabaseConnection,
    entity: PhantomData<E>,
}

impl<'db, E> Repository<'db, E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    pub fn new(conn: &'db DatabaseConnection) -> Self {
        Self {
            conn,
            entity: PhantomData,
        }
    }

    pub fn conn(&self) -> &'db DatabaseConnection {
        self.conn
    }

    pub async fn create<A>(&self, model: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        Ok(model.insert(self.conn).await?)
    }

    /// Inserts every record or none of them.
    pub async fn create_many<A>(&self, models: Vec<A>) -> AppResult<Vec<E::Model>>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let txn = self.conn.begin().await?;
        let mut created = Vec::with_capacity(models.len());
        for model in models {
            created.push(model.insert(&txn).await?);
        }
        txn.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<E::Model>> {
        Ok(E::find_by_id(id).one(self.conn).await?)
    }

    pub async fn find_one(&self, filter: Condition) -> AppResult<Option<E::Model>> {
        Ok(E::find().filter(filter).one(self.conn).await?)
    }

    /// Fetch one record by id together with its related record.
    pub async fn find_one_with<R>(&self, id: Uuid) -> AppResult<Option<(E::Model, Option<R::Model>)>>
    where
        R: EntityTrait,
        E: Related<R>,
    {
        Ok(E::find_by_id(id)
            .find_also_related(R::default())
            .one(self.conn)
            .await?)
    }

    pub async fn find_all(&self, filter: Condition, sort: Sort<E::Column>) -> AppResult<Vec<E::Model>> {
        let mut finder = E::find().filter(filter);
        if let Some((column, order)) = sort {
            finder = finder.order_by(column, order);
        }
        Ok(finder.all(self.conn).await?)
    }

    /// Merge the `Set` fields of `patch` into the record with `id`.
    ///
    /// Returns `None` when no record matches; that case is logged, not
    /// reported as an error, since callers use it for idempotent updates.
    pub async fn update<A>(&self, id: Uuid, patch: A) -> AppResult<Option<E::Model>>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        match self.find_by_id(id).await? {
            Some(existing) => self.apply_patch(existing, patch).await.map(Some),
            None => {
                tracing::debug!(table = E::default().table_name(), %id, "update matched no record");
                Ok(None)
            }
        }
    }

    pub async fn update_one<A>(&self, filter: Condition, patch: A) -> AppResult<Option<E::Model>>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        match self.find_one(filter).await? {
            Some(existing) => self.apply_patch(existing, patch).await.map(Some),
            None => {
                tracing::debug!(table = E::default().table_name(), "update_one matched no record");
                Ok(None)
            }
        }
    }

    async fn apply_patch<A>(&self, existing: E::Model, patch: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let changed: Vec<_> = E::Column::iter()
            .filter_map(|column| match patch.get(column) {
                ActiveValue::Set(value) => Some((column, value)),
                _ => None,
            })
            .collect();
        if changed.is_empty() {
            return Ok(existing);
        }

        let mut active: A = existing.into_active_model();
        for (column, value) in changed {
            active.set(column, value);
        }
        Ok(active.update(self.conn).await?)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<Option<E::Model>> {
        let Some(existing) = self.find_by_id(id).await? else {
            tracing::debug!(table = E::default().table_name(), %id, "delete matched no record");
            return Ok(None);
        };
        E::delete_by_id(id).exec(self.conn).await?;
        Ok(Some(existing))
    }

    pub async fn delete_many(&self, filter: Condition) -> AppResult<u64> {
        let result = E::delete_many().filter(filter).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    /// `page` is 1-indexed; an out-of-range page yields empty `data` with
    /// the correct `total`.
    pub async fn paginate(
        &self,
        filter: Condition,
        page: u64,
        limit: u64,
        sort: Sort<E::Column>,
    ) -> AppResult<Page<E::Model>> {
        let mut finder = E::find().filter(filter);
        if let Some((column, order)) = sort {
            finder = finder.order_by(column, order);
        }

        let total = finder.clone().count(self.conn).await?;
        let data = finder
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.conn)
            .await?;

        Ok(Page { data, total })
    }

    /// Like [`Repository::paginate`], pairing each record with its related `R`.
    pub async fn paginate_with<R>(
        &self,
        filter: Condition,
        page: u64,
        limit: u64,
        sort: Sort<E::Column>,
    ) -> AppResult<Page<(E::Model, Option<R::Model>)>>
    where
        R: EntityTrait,
        R::Model: Send + Sync,
        E: Related<R>,
    {
        let mut finder = E::find().filter(filter).find_also_related(R::default());
        if let Some((column, order)) = sort {
            finder = finder.order_by(column, order);
        }

        let total = finder.clone().count(self.conn).await?;
        let data = finder
            .limit(limit)
            .offset(page.saturating_sub(1).saturating_mul(limit))
            .all(self.conn)
            .await?;

        Ok(Page { data, total })
    }

    /// Run an arbitrary select built with sea-query against this connection.
    pub async fn aggregate<T: FromQueryResult>(&self, query: &SelectStatement) -> AppResult<Vec<T>> {
        let stmt = self.conn.get_database_backend().build(query);
        Ok(T::find_by_statement(stmt).all(self.conn).await?)
    }

    pub async fn count(&self, filter: Condition) -> AppResult<u64> {
        Ok(E::find().filter(filter).count(self.conn).await?)
    }

    pub async fn exists(&self, filter: Condition) -> AppResult<bool> {
        Ok(self.count(filter).await? > 0)
    }
}

fn lower<C: ColumnTrait>(column: C) -> Expr {
    Expr::expr(Func::lower(Expr::col((C::EntityName::default(), column))))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Case-insensitive substring match.
pub fn contains_ci<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.trim().to_lowercase()));
    lower(column).like(LikeExpr::new(pattern).escape('\\'))
}

/// Filter shared by every list endpoint: an empty term matches everything,
/// otherwise a case-insensitive match on `text`, OR'd with equality on
/// `number` when the term parses as an integer.
pub fn search_condition<C: ColumnTrait>(search: &str, text: C, number: Option<C>) -> Condition {
    let term = search.trim();
    if term.is_empty() {
        return Condition::all();
    }

    let mut condition = Condition::any().add(contains_ci(text, term));
    if let (Some(column), Ok(value)) = (number, term.parse::<i64>()) {
        condition = condition.add(column.eq(value));
    }
    condition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slice_reports_full_total() {
        let items: Vec<u32> = (1..=15).collect();
        let page = paginate_slice(&items, 2, 10);
        assert_eq!(page.data, vec![11, 12, 13, 14, 15]);
        assert_eq!(page.total, 15);
    }

    #[test]
    fn paginate_slice_out_of_range_is_empty() {
        let items: Vec<u32> = (1..=3).collect();
        let page = paginate_slice(&items, 5, 10);
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn page_map_keeps_total() {
        let page = Page { data: vec![1, 2], total: 9 }.map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.total, 9);
    }
}
