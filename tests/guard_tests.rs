use alumni_portal::{
    errors::ApiError,
    guard::{self, AccessGuard, GuardDecision, GuardOutcome, RedirectReason},
    models::{Role, RoleSet, Session, SessionState},
};
use chrono::{Duration, Utc};

// --- Helpers ---

/// All 16 subsets of the four roles.
fn all_role_sets() -> Vec<RoleSet> {
    (0u8..16)
        .map(|bits| {
            Role::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| bits & (1u8 << *i) != 0)
                .map(|(_, role)| *role)
                .collect()
        })
        .collect()
}

fn non_empty_capability_sets() -> Vec<RoleSet> {
    all_role_sets().into_iter().filter(|set| !set.is_empty()).collect()
}

fn signed_in(roles: RoleSet) -> SessionState {
    SessionState::Authenticated(Session {
        user_id: "65f0c2a1b4e8d9f3a7c1e2b4".to_string(),
        name: "Test User".to_string(),
        roles,
        expires_at: Utc::now() + Duration::hours(1),
    })
}

// --- Properties ---

#[test]
fn test_all_role_sets_are_distinct() {
    let sets = all_role_sets();
    assert_eq!(sets.len(), 16);
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_empty_roles_never_render() {
    let session = signed_in(RoleSet::empty());
    for allowed in non_empty_capability_sets() {
        assert_eq!(
            guard::evaluate(&session, &allowed),
            GuardOutcome::RedirectToUnauthorized,
            "allowed = {allowed:?}"
        );
    }
}

#[test]
fn test_render_iff_roles_intersect() {
    for roles in all_role_sets() {
        let session = signed_in(roles);
        for allowed in non_empty_capability_sets() {
            let outcome = guard::evaluate(&session, &allowed);
            let shares_a_role = roles.iter().any(|role| allowed.contains(role));
            if shares_a_role {
                assert_eq!(outcome, GuardOutcome::Render, "{roles:?} vs {allowed:?}");
            } else {
                assert_eq!(
                    outcome,
                    GuardOutcome::RedirectToUnauthorized,
                    "{roles:?} vs {allowed:?}"
                );
            }
        }
    }
}

#[test]
fn test_unauthenticated_always_goes_to_login() {
    for allowed in non_empty_capability_sets() {
        assert_eq!(
            guard::evaluate(&SessionState::Unauthenticated, &allowed),
            GuardOutcome::RedirectToLogin
        );
    }
}

#[test]
fn test_loading_session_never_redirects() {
    for allowed in non_empty_capability_sets() {
        assert_eq!(
            guard::evaluate(&SessionState::Loading, &allowed),
            GuardOutcome::Pending
        );
    }
}

#[test]
fn test_empty_capability_set_grants_nothing() {
    let everyone = signed_in(RoleSet::all());
    assert_eq!(
        guard::evaluate(&everyone, &RoleSet::empty()),
        GuardOutcome::RedirectToUnauthorized
    );
}

// --- Decisions ---

#[test]
fn test_access_guard_destinations() {
    let guard = AccessGuard::default();
    let mentor_group = RoleSet::from([Role::Mentor, Role::Admin, Role::Alumni]);

    assert_eq!(
        guard.decide(&SessionState::Unauthenticated, &mentor_group),
        GuardDecision::Redirect {
            location: "/login".to_string(),
            reason: RedirectReason::LoginRequired,
        }
    );
    assert_eq!(
        guard.decide(&signed_in(RoleSet::from([Role::Student])), &mentor_group),
        GuardDecision::Redirect {
            location: "/unauthorized".to_string(),
            reason: RedirectReason::Unauthorized,
        }
    );
    assert_eq!(
        guard.decide(&signed_in(RoleSet::from([Role::Alumni])), &mentor_group),
        GuardDecision::Render
    );
    assert_eq!(
        guard.decide(&SessionState::Loading, &mentor_group),
        GuardDecision::Pending
    );
}

#[test]
fn test_custom_destinations() {
    let guard = AccessGuard {
        login_path: "/auth/sign-in".to_string(),
        unauthorized_path: "/".to_string(),
    };
    let admins = RoleSet::from([Role::Admin]);

    assert!(matches!(
        guard.decide(&SessionState::Unauthenticated, &admins),
        GuardDecision::Redirect { location, .. } if location == "/auth/sign-in"
    ));
    assert!(matches!(
        guard.decide(&signed_in(RoleSet::from([Role::Student])), &admins),
        GuardDecision::Redirect { location, .. } if location == "/"
    ));
}

// --- API Authorization ---

#[test]
fn test_authorize_maps_to_api_errors() {
    let admins = RoleSet::from([Role::Admin]);

    assert!(matches!(
        guard::authorize(&SessionState::Unauthenticated, &admins),
        Err(ApiError::Unauthenticated)
    ));
    assert!(matches!(
        guard::authorize(&SessionState::Loading, &admins),
        Err(ApiError::Unauthenticated)
    ));
    assert!(matches!(
        guard::authorize(&signed_in(RoleSet::from([Role::Student])), &admins),
        Err(ApiError::Forbidden)
    ));

    let admin = signed_in(RoleSet::from([Role::Admin, Role::Mentor]));
    let session = guard::authorize(&admin, &admins).expect("admin is allowed");
    assert!(session.roles.contains(Role::Admin));
}
