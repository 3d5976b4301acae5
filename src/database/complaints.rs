use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use super::{MongoDB, COMPLAINTS_COLLECTION};
use crate::models::{Comment, Complaint, ComplaintStatus};
use crate::utils::AppResult;

/// Complaint store. Complaints are grouped by owning user; lookups by ID
/// are not scoped to an owner. Result ordering is unspecified.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Inserts the complaint, assigning an ID when it has none.
    async fn create(&self, complaint: &mut Complaint) -> AppResult<()>;

    async fn list_by_owner(&self, user_id: &str, status: Option<ComplaintStatus>) -> AppResult<Vec<Complaint>>;

    /// Every complaint, unpaginated.
    async fn list_all(&self, status: Option<ComplaintStatus>) -> AppResult<Vec<Complaint>>;

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Complaint>>;

    /// Sets the status and appends `comment` when given. A missing ID is not
    /// an error: it yields `Ok(None)` and nothing is written.
    async fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
        comment: Option<Comment>,
    ) -> AppResult<Option<Complaint>>;

    /// Adds `user_id` to the like set. `Ok(None)` when the complaint is missing.
    async fn like(&self, id: &str, user_id: &str) -> AppResult<Option<Complaint>>;

    /// Removes `user_id` from the like set. `Ok(None)` when the complaint is missing.
    async fn unlike(&self, id: &str, user_id: &str) -> AppResult<Option<Complaint>>;

    /// Removes the complaint. Returns whether anything was deleted.
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MongoComplaintStore {
    collection: Collection<Complaint>,
}

impl MongoComplaintStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<Complaint>(COMPLAINTS_COLLECTION),
        }
    }

    async fn find_many(&self, filter: Document) -> AppResult<Vec<Complaint>> {
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect::<Vec<Complaint>>().await?)
    }

    async fn modify(&self, id: &str, update: Document) -> AppResult<Option<Complaint>> {
        Ok(self
            .collection
            .find_one_and_update(doc! { "id": id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }
}

#[async_trait]
impl ComplaintStore for MongoComplaintStore {
    async fn create(&self, complaint: &mut Complaint) -> AppResult<()> {
        if complaint.id.is_empty() {
            complaint.id = uuid::Uuid::new_v4().to_string();
        }

        self.collection.insert_one(&*complaint).await?;
        Ok(())
    }

    async fn list_by_owner(&self, user_id: &str, status: Option<ComplaintStatus>) -> AppResult<Vec<Complaint>> {
        let mut filter = doc! { "userId": user_id };
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }

        let complaints = self.find_many(filter).await?;
        log::debug!("complaints retrieved for {}: {}", user_id, complaints.len());
        Ok(complaints)
    }

    async fn list_all(&self, status: Option<ComplaintStatus>) -> AppResult<Vec<Complaint>> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => doc! {},
        };

        let complaints = self.find_many(filter).await?;
        log::debug!("all complaints retrieved: {}", complaints.len());
        Ok(complaints)
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Complaint>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
        comment: Option<Comment>,
    ) -> AppResult<Option<Complaint>> {
        let mut update = doc! { "$set": { "status": status.as_str() } };
        if let Some(comment) = comment {
            update.insert("$push", doc! { "comments": to_bson(&comment)? });
        }

        let updated = self.modify(id, update).await?;
        if updated.is_none() {
            log::debug!("complaint not found for update: {}", id);
        }
        Ok(updated)
    }

    async fn like(&self, id: &str, user_id: &str) -> AppResult<Option<Complaint>> {
        self.modify(id, doc! { "$addToSet": { "likes": user_id } }).await
    }

    async fn unlike(&self, id: &str, user_id: &str) -> AppResult<Option<Complaint>> {
        self.modify(id, doc! { "$pull": { "likes": user_id } }).await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        if result.deleted_count > 0 {
            log::info!("🗑️ Complaint deleted: {}", id);
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> MongoComplaintStore {
        let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "complaintportal_test").await.unwrap();
        MongoComplaintStore::new(&db)
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_status_update_and_comment() {
        let store = store().await;
        let owner = uuid::Uuid::new_v4().to_string();

        let mut complaint = Complaint::new(&owner, "broken heater".into());
        store.create(&mut complaint).await.unwrap();

        let comment = Comment::new("admin-1", "technician booked".into());
        let updated = store
            .update_status(&complaint.id, ComplaintStatus::Approved, Some(comment))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ComplaintStatus::Approved);
        assert_eq!(updated.comments.len(), 1);

        let pending = store.list_by_owner(&owner, Some(ComplaintStatus::Pending)).await.unwrap();
        assert!(pending.is_empty());

        let missing = store.update_status("nope", ComplaintStatus::Rejected, None).await.unwrap();
        assert!(missing.is_none());
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_like_set_semantics() {
        let store = store().await;
        let mut complaint = Complaint::new("owner", "slow wifi".into());
        store.create(&mut complaint).await.unwrap();

        store.like(&complaint.id, "u1").await.unwrap();
        let liked = store.like(&complaint.id, "u1").await.unwrap().unwrap();
        assert_eq!(liked.likes, vec!["u1".to_string()]);

        let unliked = store.unlike(&complaint.id, "u1").await.unwrap().unwrap();
        assert!(unliked.likes.is_empty());
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_delete() {
        let store = store().await;
        let mut complaint = Complaint::new("owner", "mould in bathroom".into());
        store.create(&mut complaint).await.unwrap();

        assert!(store.delete(&complaint.id).await.unwrap());
        assert!(store.get_by_id(&complaint.id).await.unwrap().is_none());
        assert!(!store.delete(&complaint.id).await.unwrap());
    }
}
