use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::CriterionFields,
    repo::{Criterion, CriterionDeletion},
};
use crate::{
    resource::ResourceError,
    response::{Page, PageInfo, PageRequest},
    state::AppState,
};

pub async fn list(state: &AppState, req: PageRequest) -> Result<Page<Criterion>, ResourceError> {
    let (items, total) = state.criteria.list(req.limit, req.offset()).await?;
    Ok(Page {
        items,
        info: PageInfo::new(req, total),
    })
}

pub async fn get(state: &AppState, id: Uuid) -> Result<Criterion, ResourceError> {
    state.criteria.get(id).await?.ok_or(ResourceError::NotFound)
}

pub async fn create(state: &AppState, fields: &CriterionFields) -> Result<Criterion, ResourceError> {
    let row = state.criteria.create(&fields.name, fields.weight).await?;
    info!(criterion_id = %row.id, weight = row.weight, "criterion created");
    Ok(row)
}

pub async fn update(
    state: &AppState,
    id: Uuid,
    fields: &CriterionFields,
) -> Result<Criterion, ResourceError> {
    let row = state
        .criteria
        .update(id, &fields.name, fields.weight)
        .await?
        .ok_or(ResourceError::NotFound)?;
    info!(criterion_id = %row.id, weight = row.weight, "criterion updated");
    Ok(row)
}

/// Refuses while any sub-criterion still points at the row.
pub async fn delete(state: &AppState, id: Uuid) -> Result<(), ResourceError> {
    match state.criteria.delete(id).await? {
        CriterionDeletion::Deleted => {
            info!(criterion_id = %id, "criterion deleted");
            Ok(())
        }
        CriterionDeletion::NotFound => Err(ResourceError::NotFound),
        CriterionDeletion::HasSubCriteria => {
            warn!(criterion_id = %id, "criterion still has sub-criteria");
            Err(ResourceError::DependentRecordsExist)
        }
    }
}
