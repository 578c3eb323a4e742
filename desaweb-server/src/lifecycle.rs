//! Blog lifecycle - couples blog rows with their image files
//!
//! Create: the image is written before the row is inserted, so a stored
//! `image` always names a file that existed at insert time. A failed insert
//! leaves the file behind.
//!
//! Delete:
//!
//! ```text
//! lookup image ──NotFound──> 404, filesystem untouched
//!      │
//!      └─found──> remove file (best-effort, if any) ──> delete row ──> ok | 500
//! ```
//!
//! The steps are not transactional. If the row delete fails the file is
//! already gone, and concurrent deletes of the same id may both reach the
//! file removal; the row delete decides which one reports success.

use async_trait::async_trait;

use crate::assets::{AssetClass, AssetStore, RemoveOutcome};
use crate::db::repos::{DbError, NewBlog};

/// Record-store operations the lifecycle needs
#[async_trait]
pub trait BlogRecords: Send + Sync {
    /// Insert a row and return its id.
    async fn insert(&self, blog: &NewBlog) -> Result<i64, DbError>;

    /// Image of an existing row, `NotFound` if there is no such row.
    async fn image_of(&self, id: i64) -> Result<Option<String>, DbError>;

    /// Delete a row, `NotFound` if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<(), DbError>;
}

#[async_trait]
impl<T: BlogRecords + ?Sized> BlogRecords for &T {
    async fn insert(&self, blog: &NewBlog) -> Result<i64, DbError> {
        (**self).insert(blog).await
    }

    async fn image_of(&self, id: i64) -> Result<Option<String>, DbError> {
        (**self).image_of(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        (**self).delete(id).await
    }
}

/// An uploaded image waiting to be stored
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Input for [`BlogLifecycle::create`]
#[derive(Debug, Clone)]
pub struct NewBlogUpload {
    pub title: String,
    pub description: String,
    pub image: Option<Upload>,
}

/// What happened during a successful delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReport {
    /// `None` when the row had no image and the filesystem was not touched
    pub asset: Option<RemoveOutcome>,
}

/// Create and delete blogs together with their image files
pub struct BlogLifecycle<'a, R> {
    records: R,
    assets: &'a AssetStore,
}

impl<'a, R: BlogRecords> BlogLifecycle<'a, R> {
    pub fn new(records: R, assets: &'a AssetStore) -> Self {
        Self { records, assets }
    }

    /// Store the image (if any), then insert the row. Returns the new id.
    ///
    /// A failed image write is logged and the blog is inserted without an
    /// image.
    pub async fn create(&self, upload: NewBlogUpload) -> Result<i64, DbError> {
        let image = match upload.image {
            Some(file) => match self
                .assets
                .store(AssetClass::Blogs, &file.original_name, &file.bytes)
                .await
            {
                Ok(name) => Some(name),
                Err(e) => {
                    tracing::warn!(
                        original_name = %file.original_name,
                        error = %e,
                        "Failed to store blog image, inserting without image"
                    );
                    None
                }
            },
            None => None,
        };

        let blog = NewBlog {
            title: upload.title,
            description: upload.description,
            image,
        };
        let id = self.records.insert(&blog).await?;

        tracing::info!(id, image = ?blog.image, "Blog created");
        Ok(id)
    }

    /// Delete a blog and, best-effort, its image file.
    pub async fn delete(&self, id: i64) -> Result<DeleteReport, DbError> {
        let image = self.records.image_of(id).await?;

        let asset = match image.as_deref() {
            Some(name) if !name.is_empty() => {
                Some(self.assets.remove(AssetClass::Blogs, name).await)
            }
            _ => None,
        };

        self.records.delete(id).await.inspect_err(|e| {
            if !e.is_not_found() && asset == Some(RemoveOutcome::Removed) {
                tracing::error!(id, "Blog row delete failed after its image was removed");
            }
        })?;

        tracing::info!(id, ?asset, "Blog deleted");
        Ok(DeleteReport { asset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory record store
    #[derive(Default)]
    struct MemoryBlogs {
        rows: Mutex<BTreeMap<i64, NewBlog>>,
        next_id: Mutex<i64>,
        /// Successful `image_of` lookups
        lookups: AtomicUsize,
        fail_insert: bool,
        fail_delete: bool,
    }

    impl MemoryBlogs {
        fn with_row(id: i64, image: Option<&str>) -> Self {
            let store = Self::default();
            store.rows.lock().unwrap().insert(
                id,
                NewBlog {
                    title: "t".into(),
                    description: "d".into(),
                    image: image.map(str::to_string),
                },
            );
            *store.next_id.lock().unwrap() = id;
            store
        }

        fn contains(&self, id: i64) -> bool {
            self.rows.lock().unwrap().contains_key(&id)
        }
    }

    fn infra_error() -> DbError {
        DbError::Sqlx(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl BlogRecords for MemoryBlogs {
        async fn insert(&self, blog: &NewBlog) -> Result<i64, DbError> {
            if self.fail_insert {
                return Err(infra_error());
            }
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            self.rows.lock().unwrap().insert(*next, blog.clone());
            Ok(*next)
        }

        async fn image_of(&self, id: i64) -> Result<Option<String>, DbError> {
            let image = self
                .rows
                .lock()
                .unwrap()
                .get(&id)
                .map(|b| b.image.clone())
                .ok_or_else(|| DbError::not_found("blog", id))?;
            self.lookups.fetch_add(1, Ordering::SeqCst);

            // Let a racing delete run its lookup before this one continues,
            // like a round trip to the database would.
            tokio::task::yield_now().await;
            Ok(image)
        }

        async fn delete(&self, id: i64) -> Result<(), DbError> {
            if self.fail_delete {
                return Err(infra_error());
            }
            self.rows
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| DbError::not_found("blog", id))
        }
    }

    fn upload(title: &str, image: Option<&[u8]>) -> NewBlogUpload {
        NewBlogUpload {
            title: title.to_string(),
            description: "d".to_string(),
            image: image.map(|bytes| Upload {
                original_name: "cover.png".to_string(),
                bytes: bytes.to_vec(),
            }),
        }
    }

    #[tokio::test]
    async fn create_without_image() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let records = MemoryBlogs::default();
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let id = lifecycle.create(upload("A", None)).await.unwrap();

        assert!(id > 0);
        let rows = records.rows.lock().unwrap();
        assert_eq!(rows[&id].title, "A");
        assert_eq!(rows[&id].image, None);
    }

    #[tokio::test]
    async fn create_stores_image_before_insert() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let records = MemoryBlogs::default();
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let id = lifecycle.create(upload("A", Some(b"img"))).await.unwrap();

        let image = records.rows.lock().unwrap()[&id].image.clone().unwrap();
        assert!(image.ends_with(".png"));
        assert_eq!(
            std::fs::read(assets.path_of(AssetClass::Blogs, &image)).unwrap(),
            b"img"
        );
    }

    #[tokio::test]
    async fn failed_insert_leaves_image_on_disk() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let records = MemoryBlogs {
            fail_insert: true,
            ..Default::default()
        };
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let err = lifecycle.create(upload("A", Some(b"img"))).await.unwrap_err();

        assert!(!err.is_not_found());
        let files = std::fs::read_dir(assets.class_dir(AssetClass::Blogs))
            .unwrap()
            .count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found_and_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let records = MemoryBlogs::default();
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let err = lifecycle.delete(42).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(!assets.class_dir(AssetClass::Blogs).exists());
    }

    #[tokio::test]
    async fn delete_removes_row_and_file() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let records = MemoryBlogs::default();
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let id = lifecycle.create(upload("A", Some(b"img"))).await.unwrap();
        let image = records.rows.lock().unwrap()[&id].image.clone().unwrap();

        let report = lifecycle.delete(id).await.unwrap();

        assert_eq!(report.asset, Some(RemoveOutcome::Removed));
        assert!(!records.contains(id));
        assert!(!assets.path_of(AssetClass::Blogs, &image).exists());

        // Second delete of the same id
        assert!(lifecycle.delete(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_without_image_skips_filesystem() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path().join("never-created"));
        let records = MemoryBlogs::with_row(7, None);
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let report = lifecycle.delete(7).await.unwrap();

        assert_eq!(report.asset, None);
        assert!(!records.contains(7));
        assert!(!assets.root().exists());
    }

    #[tokio::test]
    async fn missing_file_does_not_block_row_delete() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let records = MemoryBlogs::with_row(3, Some("1700000000000.png"));
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let report = lifecycle.delete(3).await.unwrap();

        assert_eq!(report.asset, Some(RemoveOutcome::Absent));
        assert!(!records.contains(3));
    }

    #[tokio::test]
    async fn failed_row_delete_happens_after_file_removal() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let name = assets
            .store(AssetClass::Blogs, "x.png", b"img")
            .await
            .unwrap();
        let mut records = MemoryBlogs::with_row(5, Some(&name));
        records.fail_delete = true;
        let lifecycle = BlogLifecycle::new(&records, &assets);

        let err = lifecycle.delete(5).await.unwrap_err();

        assert!(!err.is_not_found());
        assert!(records.contains(5));
        assert!(!assets.path_of(AssetClass::Blogs, &name).exists());
    }

    #[tokio::test]
    async fn concurrent_deletes_succeed_exactly_once() {
        let temp = TempDir::new().unwrap();
        let assets = AssetStore::new(temp.path());
        let records = MemoryBlogs::default();
        let lifecycle = BlogLifecycle::new(&records, &assets);
        let id = lifecycle.create(upload("A", Some(b"img"))).await.unwrap();

        let (first, second) = tokio::join!(lifecycle.delete(id), lifecycle.delete(id));

        // Both found the row before either deleted it
        assert_eq!(records.lookups.load(Ordering::SeqCst), 2);
        let outcomes = [first, second];
        let ok = outcomes.iter().filter(|r| r.is_ok()).count();
        let not_found = outcomes
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_not_found()))
            .count();
        assert_eq!((ok, not_found), (1, 1));
        assert!(!records.contains(id));
    }
}
