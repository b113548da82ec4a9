use chrono::NaiveDate;
use pledgekit::db::enums::ProjectStatus;
use pledgekit::db::models::project::{CreateProjectRequest, PledgeOptionInput};
use pledgekit::error::AppError;
use pledgekit::validation::project::{
    MAX_PLEDGE_OPTIONS, validate_create_project, validate_status_transition,
};
use tokio_test::{assert_err, assert_ok};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn option(title: &str, amount: i64) -> PledgeOptionInput {
    PledgeOptionInput {
        title: title.to_string(),
        amount,
        benefits: vec!["Sticker".to_string()],
    }
}

fn request() -> CreateProjectRequest {
    CreateProjectRequest {
        title: "Solar Kettle".to_string(),
        description: "Boils water with sunlight".to_string(),
        goal: 500_000,
        end_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        pledge_options: vec![option("Early bird", 2_500), option("Backer", 5_000)],
    }
}

#[test]
fn valid_project_passes() {
    assert_ok!(validate_create_project(&request(), today()));

    let mut no_options = request();
    no_options.pledge_options.clear();
    assert_ok!(validate_create_project(&no_options, today()));
}

#[test]
fn project_fields_are_checked() {
    let mut blank = request();
    blank.title = "   ".to_string();
    assert_err!(validate_create_project(&blank, today()));

    let mut no_goal = request();
    no_goal.goal = 0;
    assert_err!(validate_create_project(&no_goal, today()));

    let mut ends_today = request();
    ends_today.end_date = today();
    assert_err!(validate_create_project(&ends_today, today()));

    let mut free_option = request();
    free_option.pledge_options.push(option("Free", 0));
    assert_err!(validate_create_project(&free_option, today()));

    let mut untitled_option = request();
    untitled_option.pledge_options.push(option(" ", 100));
    assert_err!(validate_create_project(&untitled_option, today()));

    let mut crowded = request();
    crowded.pledge_options = (0..=MAX_PLEDGE_OPTIONS as i64)
        .map(|i| option("Tier", 100 + i))
        .collect();
    assert_err!(validate_create_project(&crowded, today()));
}

#[test]
fn status_transition_table() {
    use ProjectStatus::*;
    let all = [Draft, Published, Completed, Cancelled];
    let allowed = [
        (Draft, Published),
        (Draft, Cancelled),
        (Published, Completed),
        (Published, Cancelled),
    ];

    for from in all {
        for to in all {
            let result = validate_status_transition(from, to);
            if allowed.contains(&(from, to)) {
                assert!(result.is_ok(), "{:?} -> {:?} should be allowed", from, to);
            } else {
                assert!(
                    matches!(result, Err(AppError::Conflict { .. })),
                    "{:?} -> {:?} should be rejected",
                    from,
                    to
                );
            }
        }
    }

    assert!(Completed.is_terminal() && Cancelled.is_terminal());
    assert!(Published.is_public() && Completed.is_public());
    assert!(!Draft.is_public());
}
