use std::sync::LazyLock;

use minijinja::{Environment, Value};

/// Template sources, compiled into the binary. Names ending in `.html` are auto-escaped.
fn source(name: &str) -> Option<&'static str> {
    let source = match name {
        "document.html" => include_str!("../templates/document.html"),
        "shell.html" => include_str!("../templates/shell.html"),
        "loading.html" => include_str!("../templates/loading.html"),
        "pages/home.html" => include_str!("../templates/pages/home.html"),
        "pages/login.html" => include_str!("../templates/pages/login.html"),
        "pages/signup.html" => include_str!("../templates/pages/signup.html"),
        "pages/forgot_password.html" => include_str!("../templates/pages/forgot_password.html"),
        "pages/reset_password.html" => include_str!("../templates/pages/reset_password.html"),
        "pages/unauthorized.html" => include_str!("../templates/pages/unauthorized.html"),
        "pages/student_dashboard.html" => {
            include_str!("../templates/pages/student_dashboard.html")
        }
        "pages/alumni.html" => include_str!("../templates/pages/alumni.html"),
        "pages/mentor_dashboard.html" => include_str!("../templates/pages/mentor_dashboard.html"),
        "pages/mentor_tasks.html" => include_str!("../templates/pages/mentor_tasks.html"),
        "pages/mentor_teams.html" => include_str!("../templates/pages/mentor_teams.html"),
        "pages/not_found.html" => include_str!("../templates/pages/not_found.html"),
        _ => return None,
    };
    Some(source)
}

// Templates are compiled lazily on first use and cached by the environment.
static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_loader(|name| Ok(source(name).map(str::to_string)));
    env
});

/// render
///
/// Renders the named template. Values reach the markup HTML-escaped unless they were
/// wrapped with `safe`.
pub fn render(name: &str, context: Value) -> Result<String, minijinja::Error> {
    TEMPLATES.get_template(name)?.render(context)
}

/// Marks already-rendered markup so it is embedded verbatim.
pub fn safe(markup: &str) -> Value {
    Value::from_safe_string(markup.to_string())
}
