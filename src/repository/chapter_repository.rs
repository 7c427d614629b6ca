use sea_orm::{ColumnTrait, Condition, Order};
use uuid::Uuid;

use crate::{
    entity::{
        Chapters,
        chapters::{Column, Model},
    },
    error::AppResult,
};

use super::{Page, Repository, search_condition};

pub type ChapterRepository<'db> = Repository<'db, Chapters>;

impl ChapterRepository<'_> {
    /// Every chapter of `course_id` except `exclude`; callers fold titles in
    /// Rust, since SQLite's `LOWER` is ASCII-only.
    pub async fn siblings(&self, course_id: Uuid, exclude: Option<Uuid>) -> AppResult<Vec<Model>> {
        let mut filter = Condition::all().add(Column::CourseId.eq(course_id));
        if let Some(id) = exclude {
            filter = filter.add(Column::Id.ne(id));
        }
        self.find_all(filter, None).await
    }

    pub async fn find_in_course(&self, course_id: Uuid, chapter_id: Uuid) -> AppResult<Option<Model>> {
        self.find_one(
            Condition::all()
                .add(Column::Id.eq(chapter_id))
                .add(Column::CourseId.eq(course_id)),
        )
        .await
    }

    pub async fn list_for_course(
        &self,
        course_id: Uuid,
        search: &str,
        page: u64,
        limit: u64,
    ) -> AppResult<Page<Model>> {
        let filter = Condition::all()
            .add(Column::CourseId.eq(course_id))
            .add(search_condition(search, Column::Title, Some(Column::ChapterNumber)));
        self.paginate(filter, page, limit, Some((Column::ChapterNumber, Order::Asc)))
            .await
    }

    pub async fn all_for_course(&self, course_id: Uuid) -> AppResult<Vec<Model>> {
        self.find_all(
            Condition::all().add(Column::CourseId.eq(course_id)),
            Some((Column::ChapterNumber, Order::Asc)),
        )
        .await
    }

    pub async fn count_for_course(&self, course_id: Uuid) -> AppResult<u64> {
        self.count(Condition::all().add(Column::CourseId.eq(course_id)))
            .await
    }
}
