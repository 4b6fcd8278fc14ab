// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::session::{AdminSession, UserSession};
use crate::{MealId, Role, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    FindMeal,
    ShareMeal,
    About,
    SignIn,
    MealDetails(MealId),
    Booking(MealId),
    CookProfile(UserId),
    CookDashboard,
    CreateMeal,
    Profile,
    Complaint,
    Messages,
    Settings,
    AdminLogin,
    AdminDashboard,
    AdminUsers,
    AdminSessions,
    AdminReports,
}

impl Route {
    /// Screens reachable by tab rotation in the terminal front-end.
    pub const TABS: [Self; 7] = [
        Self::FindMeal,
        Self::Messages,
        Self::CookDashboard,
        Self::AdminDashboard,
        Self::AdminUsers,
        Self::AdminSessions,
        Self::AdminReports,
    ];

    pub fn path(self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::FindMeal => "/find-meal".to_owned(),
            Self::ShareMeal => "/share-meal".to_owned(),
            Self::About => "/about".to_owned(),
            Self::SignIn => "/sign-in".to_owned(),
            Self::MealDetails(id) => format!("/meal/{id}"),
            Self::Booking(id) => format!("/booking/{id}"),
            Self::CookProfile(id) => format!("/cook/{id}"),
            Self::CookDashboard => "/cook-dashboard".to_owned(),
            Self::CreateMeal => "/create-meal".to_owned(),
            Self::Profile => "/profile".to_owned(),
            Self::Complaint => "/complaint".to_owned(),
            Self::Messages => "/messages".to_owned(),
            Self::Settings => "/settings".to_owned(),
            Self::AdminLogin => "/admin/login".to_owned(),
            Self::AdminDashboard => "/admin".to_owned(),
            Self::AdminUsers => "/admin/users".to_owned(),
            Self::AdminSessions => "/admin/sessions".to_owned(),
            Self::AdminReports => "/admin/reports".to_owned(),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        let fixed = match normalized {
            "/" => Some(Self::Home),
            "/find-meal" => Some(Self::FindMeal),
            "/share-meal" => Some(Self::ShareMeal),
            "/about" => Some(Self::About),
            "/sign-in" => Some(Self::SignIn),
            "/cook-dashboard" => Some(Self::CookDashboard),
            "/create-meal" => Some(Self::CreateMeal),
            "/profile" => Some(Self::Profile),
            "/complaint" => Some(Self::Complaint),
            "/messages" => Some(Self::Messages),
            "/settings" => Some(Self::Settings),
            "/admin/login" => Some(Self::AdminLogin),
            "/admin" => Some(Self::AdminDashboard),
            "/admin/users" => Some(Self::AdminUsers),
            "/admin/sessions" => Some(Self::AdminSessions),
            "/admin/reports" => Some(Self::AdminReports),
            _ => None,
        };
        if fixed.is_some() {
            return fixed;
        }

        let parse_id = |raw: &str| raw.parse::<i64>().ok();
        if let Some(raw) = normalized.strip_prefix("/meal/") {
            return parse_id(raw).map(|id| Self::MealDetails(MealId::new(id)));
        }
        if let Some(raw) = normalized.strip_prefix("/booking/") {
            return parse_id(raw).map(|id| Self::Booking(MealId::new(id)));
        }
        if let Some(raw) = normalized.strip_prefix("/cook/") {
            return parse_id(raw).map(|id| Self::CookProfile(UserId::new(id)));
        }
        None
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::FindMeal => "Find a meal",
            Self::ShareMeal => "Share a meal",
            Self::About => "About",
            Self::SignIn => "Sign in",
            Self::MealDetails(_) => "Meal",
            Self::Booking(_) => "Booking",
            Self::CookProfile(_) => "Cook",
            Self::CookDashboard => "Cook dashboard",
            Self::CreateMeal => "Create meal",
            Self::Profile => "Profile",
            Self::Complaint => "Complaint",
            Self::Messages => "Messages",
            Self::Settings => "Settings",
            Self::AdminLogin => "Admin login",
            Self::AdminDashboard => "Admin",
            Self::AdminUsers => "Users",
            Self::AdminSessions => "Sessions",
            Self::AdminReports => "Reports",
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(
            self,
            Self::AdminDashboard | Self::AdminUsers | Self::AdminSessions | Self::AdminReports
        )
    }

    /// `Err` carries the route to redirect to.
    pub fn guard(self, access: Access) -> Result<(), Route> {
        match self {
            route if route.is_admin() && !access.admin => Err(Self::AdminLogin),
            Self::AdminLogin if access.admin => Err(Self::AdminDashboard),
            Self::Messages | Self::Profile | Self::Settings if !access.authenticated => {
                Err(Self::SignIn)
            }
            Self::CookDashboard | Self::CreateMeal if !access.authenticated || !access.cook => {
                Err(Self::SignIn)
            }
            _ => Ok(()),
        }
    }

    /// Landing route after a successful sign-in.
    pub const fn after_sign_in(role: Role) -> Self {
        match role {
            Role::Cook => Self::CookDashboard,
            Role::Diner => Self::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    pub authenticated: bool,
    pub cook: bool,
    pub admin: bool,
}

impl Access {
    pub fn from_sessions(user: &UserSession, admin: &AdminSession) -> Self {
        Self {
            authenticated: user.is_authenticated(),
            cook: user.is_cook(),
            admin: admin.is_authenticated(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::FindMeal,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Route),
    NextTab,
    PrevTab,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RouteChanged(Route),
    Redirected { from: Route, to: Route },
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand, access: Access) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(route) => self.navigate(route, access),
            AppCommand::NextTab => self.rotate_tab(1, access),
            AppCommand::PrevTab => self.rotate_tab(-1, access),
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn navigate(&mut self, route: Route, access: Access) -> Vec<AppEvent> {
        match route.guard(access) {
            Ok(()) => {
                self.route = route;
                vec![AppEvent::RouteChanged(route)]
            }
            Err(target) => {
                // Redirect targets never redirect again.
                self.route = target;
                vec![
                    AppEvent::Redirected {
                        from: route,
                        to: target,
                    },
                    AppEvent::RouteChanged(target),
                ]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize, access: Access) -> Vec<AppEvent> {
        let tabs = Route::TABS;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.route)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.navigate(tabs[next], access)
    }

    fn set_status(&mut self, message: String) -> AppEvent {
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }

    /// The tab the current route belongs to, if any.
    pub fn active_tab(&self) -> Option<Route> {
        Route::TABS.into_iter().find(|tab| *tab == self.route)
    }
}
