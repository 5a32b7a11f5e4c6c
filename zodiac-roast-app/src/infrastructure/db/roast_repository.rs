use super::entities::{roast, Roast};
use crate::domain::{RoastRecord, RoastStatus, StoredBlob, ZodiacSign};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, PaginatorTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct RoastRepository {
    db: DatabaseConnection,
}

impl RoastRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, record: &RoastRecord) -> Result<(), DbErr> {
        let active = roast::ActiveModel {
            id: Set(record.id),
            name: Set(record.name.clone()),
            birthdate: Set(record.birthdate),
            hobbies: Set(record.hobbies.clone()),
            nationality: Set(record.nationality.clone()),
            zodiac_sign: Set(record.zodiac_sign.as_str().to_string()),
            roast_text: Set(record.roast_text.clone()),
            status: Set(record.status.as_str().to_string()),
            image_url: Set(record.image_url.clone()),
            image_storage_ref: Set(record.image_storage_ref.clone()),
            created_at: Set(record.created_at),
        };
        Roast::insert(active).exec_without_returning(&self.db).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RoastRecord>, DbErr> {
        Roast::find_by_id(id)
            .one(&self.db)
            .await?
            .map(RoastRecord::try_from)
            .transpose()
    }

    /// Newest first.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<RoastRecord>, DbErr> {
        Roast::find()
            .order_by_desc(roast::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(RoastRecord::try_from)
            .collect()
    }

    /// Number of roasts created at or after `since`, and the oldest such
    /// creation time.
    pub async fn window_stats(&self, since: i64) -> Result<(u64, Option<i64>), DbErr> {
        let row: Option<(i64, Option<i64>)> = Roast::find()
            .select_only()
            .column_as(Expr::col(roast::Column::Id).count(), "count")
            .column_as(Expr::col(roast::Column::CreatedAt).min(), "oldest")
            .filter(roast::Column::CreatedAt.gte(since))
            .into_tuple()
            .one(&self.db)
            .await?;

        let (count, oldest) = row.unwrap_or((0, None));
        Ok((count.max(0) as u64, oldest))
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Roast::find().count(&self.db).await
    }

    /// Overwrites the roast text and status. Unconditional: callers are
    /// responsible for issuing it once per record.
    pub async fn patch_content(
        &self,
        id: Uuid,
        roast_text: &str,
        status: RoastStatus,
    ) -> Result<(), DbErr> {
        let result = Roast::update_many()
            .col_expr(roast::Column::RoastText, Expr::value(roast_text))
            .col_expr(roast::Column::Status, Expr::value(status.as_str()))
            .filter(roast::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("roast {id}")));
        }
        Ok(())
    }

    /// Sets both image fields in one statement so they never diverge.
    pub async fn patch_image(&self, id: Uuid, blob: &StoredBlob) -> Result<(), DbErr> {
        let result = Roast::update_many()
            .col_expr(roast::Column::ImageUrl, Expr::value(blob.url.as_str()))
            .col_expr(
                roast::Column::ImageStorageRef,
                Expr::value(blob.storage_ref.as_str()),
            )
            .col_expr(
                roast::Column::Status,
                Expr::value(RoastStatus::ImageReady.as_str()),
            )
            .filter(roast::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("roast {id}")));
        }
        Ok(())
    }
}

impl TryFrom<roast::Model> for RoastRecord {
    type Error = DbErr;

    fn try_from(model: roast::Model) -> Result<Self, Self::Error> {
        let zodiac_sign: ZodiacSign = model
            .zodiac_sign
            .parse()
            .map_err(|e: zodiac_roast_errors::AppError| DbErr::Type(e.to_string()))?;
        let status = model.status.parse().unwrap_or_else(|_| {
            RoastStatus::infer(&model.roast_text, model.image_url.is_some())
        });

        Ok(Self {
            id: model.id,
            name: model.name,
            birthdate: model.birthdate,
            hobbies: model.hobbies,
            nationality: model.nationality,
            zodiac_sign,
            roast_text: model.roast_text,
            status,
            image_url: model.image_url,
            image_storage_ref: model.image_storage_ref,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ValidatedSubmission, FALLBACK_ROAST_TEXT, PLACEHOLDER_ROAST_TEXT};
    use crate::infrastructure::db::connect_in_memory;
    use chrono::NaiveDate;

    async fn repo() -> RoastRepository {
        RoastRepository::new(connect_in_memory().await.unwrap())
    }

    fn record(name: &str, created_at: i64) -> RoastRecord {
        RoastRecord::new_pending(
            ValidatedSubmission {
                name: name.to_string(),
                birthdate: NaiveDate::from_ymd_opt(1990, 7, 4).unwrap(),
                hobbies: "birdwatching".to_string(),
                nationality: "Canadian".to_string(),
            },
            created_at,
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let rec = record("Ada", 1_000);
        repo.create(&rec).await.unwrap();

        let found = repo.find_by_id(rec.id).await.unwrap().unwrap();
        assert_eq!(found, rec);
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first_and_bounded() {
        let repo = repo().await;
        for i in 0..5 {
            repo.create(&record(&format!("user{i}"), 1_000 + i)).await.unwrap();
        }

        let listed = repo.list_recent(3).await.unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["user4", "user3", "user2"]);
    }

    #[tokio::test]
    async fn test_window_stats() {
        let repo = repo().await;
        assert_eq!(repo.window_stats(0).await.unwrap(), (0, None));

        for ts in [100, 200, 300, 400] {
            repo.create(&record("x", ts)).await.unwrap();
        }

        assert_eq!(repo.window_stats(200).await.unwrap(), (3, Some(200)));
        assert_eq!(repo.window_stats(401).await.unwrap(), (0, None));
    }

    #[tokio::test]
    async fn test_patches_leave_identity_fields_alone() {
        let repo = repo().await;
        let rec = record("Grace", 5_000);
        repo.create(&rec).await.unwrap();

        repo.patch_content(rec.id, "You debug like you date.", RoastStatus::ContentReady)
            .await
            .unwrap();
        let blob = StoredBlob {
            storage_ref: "abc.png".to_string(),
            url: "http://localhost/images/abc.png".to_string(),
        };
        repo.patch_image(rec.id, &blob).await.unwrap();

        let found = repo.find_by_id(rec.id).await.unwrap().unwrap();
        assert_eq!(found.roast_text, "You debug like you date.");
        assert_ne!(found.roast_text, PLACEHOLDER_ROAST_TEXT);
        assert_eq!(found.status, RoastStatus::ImageReady);
        assert_eq!(found.image_url.as_deref(), Some(blob.url.as_str()));
        assert_eq!(found.image_storage_ref.as_deref(), Some("abc.png"));
        assert_eq!(found.zodiac_sign, rec.zodiac_sign);
        assert_eq!(found.created_at, rec.created_at);
    }

    #[tokio::test]
    async fn test_unknown_status_is_inferred_from_text() {
        let repo = repo().await;
        let rec = record("Linus", 7_000);
        repo.create(&rec).await.unwrap();
        Roast::update_many()
            .col_expr(roast::Column::Status, Expr::value(""))
            .col_expr(roast::Column::RoastText, Expr::value(FALLBACK_ROAST_TEXT))
            .filter(roast::Column::Id.eq(rec.id))
            .exec(&repo.db)
            .await
            .unwrap();

        let found = repo.find_by_id(rec.id).await.unwrap().unwrap();
        assert_eq!(found.status, RoastStatus::ContentFailed);
    }

    #[tokio::test]
    async fn test_patch_missing_record() {
        let repo = repo().await;
        let err = repo
            .patch_content(Uuid::new_v4(), FALLBACK_ROAST_TEXT, RoastStatus::ContentFailed)
            .await
            .unwrap_err();
        assert!(matches!(err, DbErr::RecordNotFound(_)));
    }
}
