use serde::Serialize;

use crate::db::enums::UserType;
use crate::db::models::auth::AuthUser;
use crate::routes::paths;

pub const PRODUCT_TITLE: &str = "PledgeKit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

impl NavItem {
    fn new(label: &str, href: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellAction {
    pub label: String,
    pub method: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellHeader {
    pub title: &'static str,
    pub user_name: String,
    pub user_email: String,
    pub user_type: Option<UserType>,
}

/// Chrome shared by every dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardShell {
    pub header: ShellHeader,
    pub sidebar: Vec<NavItem>,
    pub sign_out: ShellAction,
}

/// A dashboard response: the shell around page content.
#[derive(Debug, Serialize)]
pub struct DashboardPage<T> {
    pub shell: DashboardShell,
    pub content: T,
}

impl DashboardShell {
    pub fn compose(user: &AuthUser, company_slug: Option<&str>) -> Self {
        let sidebar = match user.user_type {
            Some(UserType::Company) => {
                let mut items = vec![NavItem::new("Overview", paths::DASHBOARD_COMPANY)];
                if let Some(slug) = company_slug {
                    items.push(NavItem::new("Public page", paths::company_page(slug)));
                }
                items.push(NavItem::new("Settings", paths::SETTINGS));
                items
            }
            Some(UserType::User) => vec![
                NavItem::new("My pledges", paths::DASHBOARD_USER),
                NavItem::new("Settings", paths::SETTINGS),
            ],
            None => vec![NavItem::new("Settings", paths::SETTINGS)],
        };

        Self {
            header: ShellHeader {
                title: PRODUCT_TITLE,
                user_name: user.name.clone(),
                user_email: user.email.clone(),
                user_type: user.user_type,
            },
            sidebar,
            sign_out: ShellAction {
                label: "Sign out".to_string(),
                method: "POST",
                href: paths::LOGOUT,
            },
        }
    }

    pub fn wrap<T>(self, content: T) -> DashboardPage<T> {
        DashboardPage {
            shell: self,
            content,
        }
    }
}
