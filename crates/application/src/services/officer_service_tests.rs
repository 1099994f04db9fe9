//! 客服注册服务单元测试

use domain::DomainError;

use crate::error::ApplicationError;
use crate::services::test_support::harness;
use crate::services::RegisterOfficerRequest;

#[tokio::test]
async fn register_creates_officer() {
    let h = harness();
    let officer = h
        .officer_service
        .register(RegisterOfficerRequest { id: "o1".into() })
        .await
        .unwrap();
    assert_eq!(officer.id.as_str(), "o1");
    assert_eq!(officer.created_at, h.clock.current());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let h = harness();
    h.officer_service
        .register(RegisterOfficerRequest { id: "o1".into() })
        .await
        .unwrap();

    let err = h
        .officer_service
        .register(RegisterOfficerRequest { id: "o1".into() })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::OfficerAlreadyExists)
    ));
}

#[tokio::test]
async fn blank_officer_id_is_rejected() {
    let h = harness();
    let err = h
        .officer_service
        .register(RegisterOfficerRequest { id: "  ".into() })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidArgument { .. })
    ));
}
