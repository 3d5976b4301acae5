pub mod complaints;
pub mod users;

pub use complaints::{ComplaintStore, MongoComplaintStore};
pub use users::{MongoUserStore, UserStore};

use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use crate::utils::AppResult;

pub const USERS_COLLECTION: &str = "users";
pub const COMPLAINTS_COLLECTION: &str = "complaints";

pub(crate) const EMAIL_INDEX: &str = "users_email_unique";
pub(crate) const USERNAME_INDEX: &str = "users_username_unique";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, database: &str) -> AppResult<Self> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("complaint-portal".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(database);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes on users carry the email/username uniqueness rule;
    /// the rest serve the complaint lookups.
    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS_COLLECTION);
        users.create_index(unique_index(doc! { "id": 1 }, "users_id_unique")).await?;
        users.create_index(unique_index(doc! { "email": 1 }, EMAIL_INDEX)).await?;
        users.create_index(unique_index(doc! { "username": 1 }, USERNAME_INDEX)).await?;
        log::info!("   ✅ Indexes ready: users(id), users(email), users(username)");

        let complaints = self.collection::<Document>(COMPLAINTS_COLLECTION);
        complaints.create_index(unique_index(doc! { "id": 1 }, "complaints_id_unique")).await?;
        complaints
            .create_index(IndexModel::builder().keys(doc! { "userId": 1, "status": 1 }).build())
            .await?;
        complaints
            .create_index(IndexModel::builder().keys(doc! { "status": 1 }).build())
            .await?;
        log::info!("   ✅ Indexes ready: complaints(id), complaints(userId, status), complaints(status)");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

fn unique_index(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).name(name.to_string()).build())
        .build()
}
