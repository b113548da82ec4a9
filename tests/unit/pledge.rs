use chrono::{NaiveDate, Utc};
use pledgekit::db::enums::{PledgeStatus, ProjectStatus};
use pledgekit::db::models::project::{PledgeOption, Project};
use pledgekit::validation::pledge::{check_cancellable, check_pledge_admission};
use uuid::Uuid;
use tokio_test::{assert_err, assert_ok};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn project(status: ProjectStatus, end_date: NaiveDate) -> Project {
    Project {
        id: Uuid::new_v4(),
        company_id: Uuid::new_v4(),
        title: "Solar Kettle".to_string(),
        description: String::new(),
        goal: 500_000,
        amount_pledged: 0,
        end_date,
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn option_for(project: &Project, amount: i64) -> PledgeOption {
    PledgeOption {
        id: Uuid::new_v4(),
        project_id: project.id,
        title: "Backer".to_string(),
        amount,
        benefits: vec![],
        created_at: Utc::now(),
    }
}

#[test]
fn published_open_project_admits_pledges() {
    let open = project(ProjectStatus::Published, today());
    let option = option_for(&open, 2_500);

    assert_ok!(check_pledge_admission(&open, &option, 2_500, today()));
    assert_ok!(check_pledge_admission(&open, &option, 10_000, today()));
    assert_err!(check_pledge_admission(&open, &option, 2_499, today()));
}

#[test]
fn closed_projects_reject_pledges() {
    let end = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    for status in [
        ProjectStatus::Draft,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ] {
        let closed = project(status, end);
        let option = option_for(&closed, 100);
        assert_err!(check_pledge_admission(&closed, &option, 100, today()));
    }

    let expired = project(ProjectStatus::Published, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    let option = option_for(&expired, 100);
    assert_err!(check_pledge_admission(&expired, &option, 100, today()));
}

#[test]
fn option_must_belong_to_project() {
    let first = project(ProjectStatus::Published, today());
    let second = project(ProjectStatus::Published, today());
    let foreign = option_for(&second, 100);

    assert_err!(check_pledge_admission(&first, &foreign, 100, today()));
}

#[test]
fn only_pending_pledges_cancel() {
    assert_ok!(check_cancellable(PledgeStatus::Pending));
    for status in [
        PledgeStatus::Confirmed,
        PledgeStatus::Failed,
        PledgeStatus::Cancelled,
        PledgeStatus::Refunded,
    ] {
        assert_err!(check_cancellable(status));
    }
    assert!(PledgeStatus::Pending.counts_towards_total());
    assert!(!PledgeStatus::Cancelled.counts_towards_total());
}
