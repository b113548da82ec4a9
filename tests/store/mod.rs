//! Concurrency checks against a migrated Postgres database (`DATABASE_URL`).

use chrono::{Duration, Utc};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use pledgekit::db::enums::{ProjectStatus, UserType};
use pledgekit::db::models::api::error_codes;
use pledgekit::db::models::auth::RegisterRequest;
use pledgekit::db::models::project::{CreateProjectRequest, PledgeOptionInput};
use pledgekit::error::AppError;
use pledgekit::services::{AuthService, ProjectsService, RequestContext};
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

type TestPool = Pool<ConnectionManager<PgConnection>>;

fn pool() -> TestPool {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/pledgekit_test".to_string());
    Pool::builder()
        .max_size(4)
        .build(ConnectionManager::new(url))
        .expect("database not reachable")
}

fn registration(email: &str, user_type: UserType, company: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        name: "Race Tester".to_string(),
        password: "Str0ngPassword!".to_string(),
        user_type,
        company_name: company.map(str::to_string),
    }
}

/// Runs `first` and `second` on separate connections, released together.
fn race<A, B, RA, RB>(pool: &TestPool, first: A, second: B) -> (RA, RB)
where
    A: FnOnce(&mut PgConnection) -> RA + Send + 'static,
    B: FnOnce(&mut PgConnection) -> RB + Send + 'static,
    RA: Send + 'static,
    RB: Send + 'static,
{
    let barrier = Arc::new(Barrier::new(2));
    let spawn_a = {
        let pool = pool.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            let mut conn = pool.get().unwrap();
            barrier.wait();
            first(&mut conn)
        })
    };
    let spawn_b = {
        let pool = pool.clone();
        thread::spawn(move || {
            let mut conn = pool.get().unwrap();
            barrier.wait();
            second(&mut conn)
        })
    };
    (spawn_a.join().unwrap(), spawn_b.join().unwrap())
}

#[test]
#[ignore = "requires migrated database"]
fn concurrent_registration_with_same_email_is_a_conflict() {
    let pool = pool();
    let email = format!("{}@example.com", Uuid::new_v4().simple());
    let (first_email, second_email) = (email.clone(), email);

    let (first, second) = race(
        &pool,
        move |conn| AuthService::register(conn, &registration(&first_email, UserType::User, None), 4),
        move |conn| AuthService::register(conn, &registration(&second_email, UserType::User, None), 4),
    );

    let outcomes = [first.map(|_| ()), second.map(|_| ())];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    for outcome in outcomes {
        if let Err(err) = outcome {
            assert!(
                matches!(err, AppError::Conflict { ref code, .. } if code.as_deref() == Some(error_codes::USER_EMAIL_EXISTS)),
                "unexpected error: {:?}",
                err
            );
        }
    }
}

#[test]
#[ignore = "requires migrated database"]
fn concurrent_transitions_never_revive_a_cancelled_project() {
    let pool = pool();
    let mut conn = pool.get().unwrap();
    let email = format!("{}@example.com", Uuid::new_v4().simple());
    let company_name = format!("Race Works {}", Uuid::new_v4().simple());
    let (user, _) = AuthService::register(
        &mut conn,
        &registration(&email, UserType::Company, Some(&company_name)),
        4,
    )
    .unwrap();
    let ctx = ctx_for(user.id);

    let today = Utc::now().date_naive();
    let created = ProjectsService::create(
        &mut conn,
        &ctx,
        &CreateProjectRequest {
            title: "Contested Kettle".to_string(),
            description: String::new(),
            goal: 100_000,
            end_date: today + Duration::days(30),
            pledge_options: vec![PledgeOptionInput {
                title: "Backer".to_string(),
                amount: 1_000,
                benefits: vec![],
            }],
        },
        today,
    )
    .unwrap();
    drop(conn);

    let project_id = created.project.id;
    let (cancel_ctx, publish_ctx) = (ctx.clone(), ctx);
    let (cancelled, published) = race(
        &pool,
        move |conn| ProjectsService::transition(conn, &cancel_ctx, project_id, ProjectStatus::Cancelled),
        move |conn| ProjectsService::transition(conn, &publish_ctx, project_id, ProjectStatus::Published),
    );

    // Either order ends cancelled: publish-then-cancel is legal, cancel-then-publish is refused.
    let cancelled = cancelled.unwrap();
    assert_eq!(cancelled.status, ProjectStatus::Cancelled);
    if let Err(err) = published {
        assert!(matches!(err, AppError::Conflict { .. }), "unexpected error: {:?}", err);
    }

    let mut conn = pool.get().unwrap();
    let (_, projects) = ProjectsService::list_for_company(&mut conn, &ctx_for(user.id)).unwrap();
    let stored = projects
        .iter()
        .find(|details| details.project.id == project_id)
        .unwrap();
    assert_eq!(stored.project.status, ProjectStatus::Cancelled);
}

fn ctx_for(user_id: Uuid) -> RequestContext {
    RequestContext {
        user_id,
        user_type: Some(UserType::Company),
    }
}
