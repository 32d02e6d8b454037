use tracing::info;

use super::repo::Job;
use crate::{
    resource::ResourceError,
    response::{Page, PageInfo, PageRequest},
    state::AppState,
};

pub async fn list(state: &AppState, req: PageRequest) -> Result<Page<Job>, ResourceError> {
    let (items, total) = state.jobs.list(req.limit, req.offset()).await?;
    Ok(Page {
        items,
        info: PageInfo::new(req, total),
    })
}

pub async fn get(state: &AppState, id: i32) -> Result<Job, ResourceError> {
    state.jobs.get(id).await?.ok_or(ResourceError::NotFound)
}

pub async fn create(state: &AppState, name: &str) -> Result<Job, ResourceError> {
    let job = state.jobs.create(name).await?;
    info!(job_id = job.id, "job created");
    Ok(job)
}

pub async fn update(state: &AppState, id: i32, name: &str) -> Result<Job, ResourceError> {
    let job = state.jobs.update(id, name).await?.ok_or(ResourceError::NotFound)?;
    info!(job_id = job.id, "job updated");
    Ok(job)
}

pub async fn delete(state: &AppState, id: i32) -> Result<(), ResourceError> {
    if !state.jobs.delete(id).await? {
        return Err(ResourceError::NotFound);
    }
    info!(job_id = id, "job deleted");
    Ok(())
}
