use sqlx::Database;

use crate::models::inspection::InspectionModel;
use crate::repository::{
    create::Create, find_by_id::FindById, find_duplicate::FindDuplicate, list_page::ListPage,
    load_audits::LoadAudits, summarize::Summarize, update_audited::UpdateAudited,
};

/// Every operation the inspection workflows need from storage
pub trait InspectionRepository<DB: Database>:
    Create<DB, InspectionModel>
    + FindById<DB, InspectionModel>
    + UpdateAudited<DB, InspectionModel>
    + LoadAudits<DB, InspectionModel>
    + ListPage<DB, InspectionModel>
    + FindDuplicate<DB>
    + Summarize<DB>
{
}

impl<DB, R> InspectionRepository<DB> for R
where
    DB: Database,
    R: Create<DB, InspectionModel>
        + FindById<DB, InspectionModel>
        + UpdateAudited<DB, InspectionModel>
        + LoadAudits<DB, InspectionModel>
        + ListPage<DB, InspectionModel>
        + FindDuplicate<DB>
        + Summarize<DB>,
{
}
