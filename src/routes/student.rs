use super::RouteDescriptor;
use crate::models::{PageId, Role};

/// Student Route Group
///
/// The student dashboard is also open to mentors and admins. The alumni network page is
/// open to every role.
pub fn student_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::gated(
            "/dashboard",
            PageId::StudentDashboard,
            [Role::Student, Role::Mentor, Role::Admin],
        ),
        RouteDescriptor::gated(
            "/alumni",
            PageId::Alumni,
            [Role::Student, Role::Mentor, Role::Admin, Role::Alumni],
        ),
    ]
}
