use minijinja::context;

use crate::{
    models::{PageId, Session},
    routes::RouteParams,
    templates::{self, safe},
};

/// PageView
///
/// A rendered page body plus its document title. The caller decides whether it goes into
/// the dashboard shell or straight into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub title: &'static str,
    pub body: String,
}

/// document
///
/// Wraps a page (or a shell) into a complete HTML document. `inner` is trusted markup.
pub fn document(title: &str, inner: &str) -> Result<String, minijinja::Error> {
    templates::render(
        "document.html",
        context! { title => title, inner => safe(inner) },
    )
}

/// loading_view
///
/// Neutral placeholder shown while the session is still resolving. Says nothing about
/// the requested page.
pub fn loading_view() -> Result<PageView, minijinja::Error> {
    Ok(PageView {
        title: "Loading",
        body: templates::render("loading.html", context! {})?,
    })
}

fn page_template(page: PageId) -> (&'static str, &'static str) {
    match page {
        PageId::Home => ("Home", "pages/home.html"),
        PageId::Login => ("Log in", "pages/login.html"),
        PageId::Signup => ("Sign up", "pages/signup.html"),
        PageId::ForgotPassword => ("Forgot password", "pages/forgot_password.html"),
        PageId::ResetPassword => ("Choose a new password", "pages/reset_password.html"),
        PageId::Unauthorized => ("Access denied", "pages/unauthorized.html"),
        PageId::StudentDashboard => ("Dashboard", "pages/student_dashboard.html"),
        PageId::Alumni => ("Global Network", "pages/alumni.html"),
        PageId::MentorDashboard => ("Mentor Dashboard", "pages/mentor_dashboard.html"),
        PageId::MentorTasks => ("Tasks", "pages/mentor_tasks.html"),
        PageId::MentorTeams => ("Teams", "pages/mentor_teams.html"),
        PageId::NotFound => ("Not found", "pages/not_found.html"),
    }
}

/// render_page
///
/// Renders the body of `page`. `session` is display data only (greetings); whether the page
/// may be shown at all has already been decided by the guard. The reset page receives the
/// captured `token`.
pub fn render_page(
    page: PageId,
    params: &RouteParams,
    session: Option<&Session>,
) -> Result<PageView, minijinja::Error> {
    let (title, template) = page_template(page);
    let name = session
        .map(|session| session.name.as_str())
        .filter(|name| !name.is_empty());

    let body = templates::render(
        template,
        context! {
            token => params.get("token").unwrap_or_default(),
            name => name,
        },
    )?;

    Ok(PageView { title, body })
}
