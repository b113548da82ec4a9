// Unit tests focus on pure validation and DTO shaping

use pledgekit::db::enums::UserType;
use pledgekit::db::models::auth::RegisterRequest;
use pledgekit::validation::auth::{safe_redirect_target, slugify, validate_registration};
use pledgekit::validation::rules::{validate_password_strength, validate_slug};
use tokio_test::{assert_err, assert_ok};

fn registration(user_type: UserType, company_name: Option<&str>) -> RegisterRequest {
    RegisterRequest {
        email: "founder@example.com".to_string(),
        name: "Founder".to_string(),
        password: "Str0ngPass!".to_string(),
        user_type,
        company_name: company_name.map(str::to_string),
    }
}

#[test]
fn registration_rules_depend_on_user_type() {
    assert_ok!(validate_registration(&registration(UserType::Company, Some("Acme Robotics"))));
    assert_err!(validate_registration(&registration(UserType::Company, None)));
    assert_err!(validate_registration(&registration(UserType::Company, Some("!!!"))));
    assert_ok!(validate_registration(&registration(UserType::User, None)));
    assert_err!(validate_registration(&registration(UserType::User, Some("Acme"))));

    let mut weak = registration(UserType::User, None);
    weak.password = "alllowercase".to_string();
    assert_err!(validate_registration(&weak));
}

#[test]
fn password_strength_needs_three_classes() {
    assert_ok!(validate_password_strength("Str0ngPass"));
    assert_ok!(validate_password_strength("lower-and-symbol"));
    assert_err!(validate_password_strength("onlylowercase"));
}

#[test]
fn slugify_produces_valid_slugs() {
    assert_eq!(slugify("Acme Robotics"), "acme-robotics");
    assert_eq!(slugify("  Hello, World!! "), "hello-world");
    assert_eq!(slugify("Café 42"), "caf-42");
    assert_eq!(slugify("***"), "");

    assert_ok!(validate_slug(&slugify("Acme Robotics")));
    assert_err!(validate_slug(""));
    assert_err!(validate_slug("Upper"));
}

#[test]
fn redirect_targets_stay_on_site() {
    assert_eq!(safe_redirect_target(Some("/settings"), "/dashboard"), "/settings");
    assert_eq!(safe_redirect_target(None, "/dashboard"), "/dashboard");
    assert_eq!(safe_redirect_target(Some("//evil.com"), "/dashboard"), "/dashboard");
    assert_eq!(
        safe_redirect_target(Some("https://evil.com"), "/dashboard"),
        "/dashboard"
    );
    assert_eq!(safe_redirect_target(Some("/\\evil.com"), "/dashboard"), "/dashboard");
}

#[test]
fn redirect_targets_must_fit_a_location_header() {
    assert_eq!(safe_redirect_target(Some("/dash\nboard"), "/dashboard"), "/dashboard");
    assert_eq!(safe_redirect_target(Some("/\r\nSet-Cookie: x=1"), "/dashboard"), "/dashboard");
    assert_eq!(safe_redirect_target(Some("/tab\there"), "/dashboard"), "/dashboard");
    assert_eq!(safe_redirect_target(Some("/del\u{7f}"), "/dashboard"), "/dashboard");
    assert_eq!(
        safe_redirect_target(Some("/settings?tab=profile"), "/dashboard"),
        "/settings?tab=profile"
    );
}
