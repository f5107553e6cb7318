use super::RouteDescriptor;
use crate::models::PageId;

/// Public Route Group
///
/// Reachable by anyone, signed in or not. None of these carry a capability set.
pub fn public_routes() -> Vec<RouteDescriptor> {
    vec![
        // Landing page.
        RouteDescriptor::public("/", PageId::Home),
        // Auth entry points. The guard redirects unauthenticated visitors to `/login`.
        RouteDescriptor::public("/login", PageId::Login),
        RouteDescriptor::public("/signup", PageId::Signup),
        RouteDescriptor::public("/forgot-password", PageId::ForgotPassword),
        // The emailed reset link; `token` is handed to the page.
        RouteDescriptor::public("/reset-password/:token", PageId::ResetPassword),
        // Where signed-in users without a matching role are sent.
        RouteDescriptor::public("/unauthorized", PageId::Unauthorized),
    ]
}
