use async_trait::async_trait;
use lifeblood_api::{ApiError, DuplicateMatch, InspectionForm, SubmissionSummary};
use sqlx::Database;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::inspection::{business_key_hash, InspectionModel};
use crate::repository::{
    create::Create,
    find_by_id::FindById,
    find_duplicate::FindDuplicate,
    list_page::ListPage,
    load_audits::LoadAudits,
    pagination::{Page, PageRequest},
    summarize::Summarize,
    update_audited::UpdateAudited,
};

#[derive(Default)]
struct MemoryState {
    rows: BTreeMap<i64, InspectionModel>,
    history: Vec<InspectionModel>,
    next_id: i64,
}

/// Process-local repository for workflow and route tests.
///
/// Follows the same rules as the PostgreSQL repository: ids come from a
/// counter, every write appends to the history, updates are guarded by the
/// stored hash. Failures can be switched on to exercise error paths.
#[derive(Default)]
pub struct MemoryInspectionRepository {
    state: RwLock<MemoryState>,
    fail_lookups: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryInspectionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every duplicate lookup fail from now on
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Makes every create and update fail from now on
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.read().map(|state| state.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, Box<dyn Error + Send + Sync>> {
        self.state
            .read()
            .map_err(|_| "In-memory store lock poisoned".into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, Box<dyn Error + Send + Sync>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("Simulated write failure".into());
        }
        self.state
            .write()
            .map_err(|_| "In-memory store lock poisoned".into())
    }
}

fn paged<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let slice = items
        .iter()
        .skip(page.offset)
        .take(page.limit)
        .cloned()
        .collect();
    Page::new(slice, items.len(), page.limit, page.offset)
}

#[async_trait]
impl<DB: Database> Create<DB, InspectionModel> for MemoryInspectionRepository {
    async fn create(
        &self,
        mut item: InspectionModel,
    ) -> Result<InspectionModel, Box<dyn Error + Send + Sync>> {
        if !item.has_consistent_stamp() {
            return Err(ApiError::ValidationError("partial audit stamp".to_string()).into());
        }
        let mut state = self.write()?;
        state.next_id += 1;
        item.id = state.next_id;
        item.version = 0;
        item.antecedent_hash = 0;
        item.hash = item.compute_hash()?;
        state.rows.insert(item.id, item.clone());
        state.history.push(item.clone());
        Ok(item)
    }
}

#[async_trait]
impl<DB: Database> FindById<DB, InspectionModel> for MemoryInspectionRepository {
    async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<InspectionModel>, Box<dyn Error + Send + Sync>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }
}

#[async_trait]
impl<DB: Database> UpdateAudited<DB, InspectionModel> for MemoryInspectionRepository {
    async fn update(
        &self,
        mut item: InspectionModel,
    ) -> Result<InspectionModel, Box<dyn Error + Send + Sync>> {
        if item.audit_stamp().is_none() {
            return Err(ApiError::ValidationError(
                "update requires a complete audit stamp".to_string(),
            )
            .into());
        }
        let mut state = self.write()?;
        let stored = state
            .rows
            .get(&item.id)
            .ok_or_else(|| ApiError::NotFound(format!("inspection {}", item.id)))?;
        if stored.hash != item.hash {
            return Err(ApiError::ConcurrentUpdate(item.id).into());
        }

        item.user_email = stored.user_email.clone();
        item.submission_time = stored.submission_time;
        item.version = stored.version + 1;
        item.antecedent_hash = stored.hash;
        item.hash = item.compute_hash()?;

        state.rows.insert(item.id, item.clone());
        state.history.push(item.clone());
        Ok(item)
    }
}

#[async_trait]
impl<DB: Database> LoadAudits<DB, InspectionModel> for MemoryInspectionRepository {
    async fn load_audits(
        &self,
        id: i64,
        page: PageRequest,
    ) -> Result<Page<InspectionModel>, Box<dyn Error + Send + Sync>> {
        let state = self.read()?;
        let mut versions: Vec<InspectionModel> = state
            .history
            .iter()
            .filter(|v| v.id == id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(paged(&versions, page))
    }
}

#[async_trait]
impl<DB: Database> ListPage<DB, InspectionModel> for MemoryInspectionRepository {
    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<Page<InspectionModel>, Box<dyn Error + Send + Sync>> {
        let state = self.read()?;
        let mut rows: Vec<InspectionModel> = state.rows.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.submission_time
                .cmp(&a.submission_time)
                .then(b.id.cmp(&a.id))
        });
        Ok(paged(&rows, page))
    }
}

#[async_trait]
impl<DB: Database> FindDuplicate<DB> for MemoryInspectionRepository {
    async fn find_duplicate(
        &self,
        form: &InspectionForm,
    ) -> Result<Option<DuplicateMatch>, Box<dyn Error + Send + Sync>> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err("Simulated lookup failure".into());
        }
        let key = business_key_hash(form)?;
        let state = self.read()?;
        Ok(state
            .rows
            .values()
            .filter(|row| row.business_key_hash == key && row.matches_business_key(form))
            .max_by(|a, b| a.submission_time.cmp(&b.submission_time).then(a.id.cmp(&b.id)))
            .map(InspectionModel::to_duplicate_match))
    }
}

#[async_trait]
impl<DB: Database> Summarize<DB> for MemoryInspectionRepository {
    async fn summarize(&self) -> Result<SubmissionSummary, Box<dyn Error + Send + Sync>> {
        let state = self.read()?;
        let users: HashSet<&str> = state.rows.values().map(|r| r.user_email.as_str()).collect();
        Ok(SubmissionSummary {
            total_records: state.rows.len() as i64,
            modified_records: state
                .rows
                .values()
                .filter(|r| r.last_modified_time.is_some())
                .count() as i64,
            unique_users: users.len() as i64,
        })
    }
}
