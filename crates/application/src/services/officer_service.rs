//! 客服注册服务。

use std::sync::Arc;

use domain::Officer;

use crate::{clock::Clock, error::ApplicationError, repository::OfficerRepository};

#[derive(Debug, Clone)]
pub struct RegisterOfficerRequest {
    pub id: String,
}

pub struct OfficerServiceDependencies {
    pub officer_repository: Arc<dyn OfficerRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct OfficerService {
    deps: OfficerServiceDependencies,
}

impl OfficerService {
    pub fn new(deps: OfficerServiceDependencies) -> Self {
        Self { deps }
    }

    /// 注册客服。编号重复返回冲突，与原有对外契约一致。
    pub async fn register(
        &self,
        request: RegisterOfficerRequest,
    ) -> Result<Officer, ApplicationError> {
        let officer_id = domain::OfficerId::parse(request.id)?;

        if self
            .deps
            .officer_repository
            .find_by_id(&officer_id)
            .await?
            .is_some()
        {
            return Err(domain::DomainError::OfficerAlreadyExists.into());
        }

        let officer = Officer::new(officer_id, self.deps.clock.now());
        match self.deps.officer_repository.create(officer).await {
            Ok(created) => Ok(created),
            // 并发注册同一编号：唯一约束裁决，输家同样得到冲突。
            Err(domain::RepositoryError::Conflict) => {
                Err(domain::DomainError::OfficerAlreadyExists.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
