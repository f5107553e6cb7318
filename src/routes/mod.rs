/// Page Route Table
///
/// The page routes are declared in access-segregated groups, mirroring who may reach them.
/// Each group is a plain list of descriptors; `app_routes` assembles them into the single
/// immutable `RouteTable` the navigator consults.

/// Routing primitives: pattern parsing, matching, specificity tie-break.
pub mod table;

/// Pages reachable without a session (landing, auth entry points, the unauthorized notice).
pub mod public;

/// Pages for the student dashboard group.
pub mod student;

/// Pages for the mentor / admin / alumni group.
pub mod mentor;

use crate::models::PageId;
pub use table::{
    RouteDescriptor, RouteMatch, RouteParams, RouteResolution, RouteTable, RouteTableError,
    normalize_path,
};

/// app_routes
///
/// Builds the application's route table. Fails only if a group declares an invalid,
/// duplicated, or gated-with-no-roles entry.
pub fn app_routes() -> Result<RouteTable, RouteTableError> {
    RouteTable::builder()
        .routes(public::public_routes())
        .routes(student::student_routes())
        .routes(mentor::mentor_routes())
        .fallback(PageId::NotFound)
        .build()
}
