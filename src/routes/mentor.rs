use super::RouteDescriptor;
use crate::models::{PageId, Role};

const MENTOR_GROUP: [Role; 3] = [Role::Mentor, Role::Admin, Role::Alumni];

/// Mentor Route Group
///
/// Mentor tooling: dashboard, task board and team management. Students are excluded.
pub fn mentor_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::gated("/mentor/dashboard", PageId::MentorDashboard, MENTOR_GROUP),
        RouteDescriptor::gated("/mentor/tasks", PageId::MentorTasks, MENTOR_GROUP),
        RouteDescriptor::gated("/mentor/teams", PageId::MentorTeams, MENTOR_GROUP),
    ]
}
