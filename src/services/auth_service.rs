use bcrypt::{hash, verify};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    auth::ConfirmationSigner,
    db::enums::UserType,
    db::models::api::error_codes,
    db::models::auth::{LoginRequest, NewUser, RegisterRequest, User, UserDetails},
    db::models::company::{Company, NewCompany},
    db::repositories::{CompaniesRepo, UsersRepo},
    error::AppError,
    services::context::RequestContext,
    validation::auth::{slugify, validate_registration},
};

/// Upper bound on `-2`, `-3`... suffixes tried for a taken company slug.
const MAX_SLUG_ATTEMPTS: u32 = 50;

pub struct AuthService;

impl AuthService {
    pub fn register(
        conn: &mut PgConnection,
        req: &RegisterRequest,
        bcrypt_cost: u32,
    ) -> Result<(User, Option<Company>), AppError> {
        validate_registration(req)?;

        let email = normalize_email(&req.email);
        if UsersRepo::exists_by_email(conn, &email)? {
            return Err(email_taken());
        }

        let password_hash = hash(&req.password, bcrypt_cost)?;

        conn.transaction::<_, AppError, _>(|conn| {
            let user = UsersRepo::insert(
                conn,
                &NewUser {
                    email,
                    name: req.name.trim().to_string(),
                    password_hash,
                    user_type: Some(req.user_type),
                },
            )
            .map_err(|e| AppError::unique_violation_or(e, email_taken))?;

            let company = match (req.user_type, req.company_name.as_deref()) {
                (UserType::Company, Some(company_name)) => {
                    let slug = unique_slug(conn, company_name)?;
                    Some(CompaniesRepo::insert(
                        conn,
                        &NewCompany {
                            owner_id: user.id,
                            name: company_name.trim().to_string(),
                            slug,
                        },
                    )
                    .map_err(|e| AppError::unique_violation_or(e, slug_taken))?)
                }
                _ => None,
            };

            Ok((user, company))
        })
    }

    /// Checks credentials; the caller starts the session.
    pub fn login(conn: &mut PgConnection, req: &LoginRequest) -> Result<User, AppError> {
        let user = UsersRepo::find_by_email(conn, &normalize_email(&req.email))?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify(&req.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_confirmed() {
            return Err(AppError::EmailNotConfirmed);
        }

        Ok(user)
    }

    /// Confirms the email behind a signed link. Confirming twice is a no-op.
    pub fn confirm_email(
        conn: &mut PgConnection,
        signer: &ConfirmationSigner,
        user_id: Uuid,
        token_hash: &str,
    ) -> Result<User, AppError> {
        let user = UsersRepo::find_by_id(conn, user_id)?
            .ok_or_else(|| AppError::validation("Invalid confirmation link"))?;

        if !signer.verify(user.id, &user.email, token_hash) {
            return Err(AppError::validation("Invalid confirmation link"));
        }

        if user.is_confirmed() {
            return Ok(user);
        }

        Ok(UsersRepo::mark_email_confirmed(conn, user.id)?)
    }

    pub fn user_details(
        conn: &mut PgConnection,
        ctx: &RequestContext,
    ) -> Result<UserDetails, AppError> {
        let user = UsersRepo::find_by_id(conn, ctx.user_id)?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        let company = match user.user_type {
            Some(UserType::Company) => {
                CompaniesRepo::find_by_owner(conn, user.id)?.map(|company| company.summary())
            }
            _ => None,
        };

        Ok(UserDetails {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            user_type: user.user_type,
            email_confirmed: user.is_confirmed(),
            company,
            created_at: user.created_at,
        })
    }

    pub fn update_name(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<User, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name must not be blank"));
        }

        if UsersRepo::find_by_id(conn, ctx.user_id)?.is_none() {
            return Err(AppError::unauthorized("Account no longer exists"));
        }

        Ok(UsersRepo::update_name(conn, ctx.user_id, name)?)
    }
}

fn email_taken() -> AppError {
    AppError::conflict_with_code(
        "Email already exists",
        Some("email".to_string()),
        error_codes::USER_EMAIL_EXISTS,
    )
}

fn slug_taken() -> AppError {
    AppError::conflict_with_code(
        "Company name is already taken",
        Some("company_name".to_string()),
        error_codes::COMPANY_SLUG_EXISTS,
    )
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn unique_slug(conn: &mut PgConnection, company_name: &str) -> Result<String, AppError> {
    let base = slugify(company_name);
    if !CompaniesRepo::slug_exists(conn, &base)? {
        return Ok(base);
    }

    for suffix in 2..=MAX_SLUG_ATTEMPTS {
        let candidate = format!("{}-{}", base, suffix);
        if !CompaniesRepo::slug_exists(conn, &candidate)? {
            return Ok(candidate);
        }
    }

    Err(slug_taken())
}
