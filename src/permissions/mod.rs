//! Role-based permission evaluation
//!
//! Pure, synchronous queries over a user's roles. Roles carry flat
//! sets of permission strings; the wildcard [`perms::ALL`] short-cuts
//! every check. Malformed input (user with no roles, role names that
//! match nothing) yields conservative defaults: `false`, `0`, empty.

use crate::domain::{Role, User};

/// Permission string constants
pub mod perms {
    /// Wildcard: grants every permission
    pub const ALL: &str = "all";

    // Super Admin
    pub const MANAGE_USERS: &str = "manage_users";
    pub const ASSIGN_ROLES: &str = "assign_roles";
    pub const CREATE_CUSTOM_ROLES: &str = "create_custom_roles";
    pub const MANAGE_DROPZONES: &str = "manage_dropzones";
    pub const APPROVE_DROPZONES: &str = "approve_dropzones";
    pub const MAKE_CALENDAR_PUBLIC: &str = "make_calendar_public";

    // Admin
    pub const MANAGE_EVENTS: &str = "manage_events";
    pub const MANAGE_SHIFTS: &str = "manage_shifts";
    pub const VIEW_REPORTS: &str = "view_reports";
    pub const ASSIGN_WORKERS: &str = "assign_workers";
    pub const OVERSEE_OPERATIONS: &str = "oversee_operations";

    // Event Manager
    pub const CREATE_EVENTS: &str = "create_events";
    pub const EDIT_EVENTS: &str = "edit_events";
    pub const DELETE_EVENTS: &str = "delete_events";
    pub const VIEW_CALENDARS: &str = "view_calendars";

    // Work Administrator
    pub const MANAGE_WORK_CALENDAR: &str = "manage_work_calendar";
    pub const APPROVE_SHIFTS: &str = "approve_shifts";
    pub const DECLINE_SHIFTS: &str = "decline_shifts";

    // Worker
    pub const VIEW_MY_PAGE: &str = "view_my_page";
    pub const VIEW_SCHEDULES: &str = "view_schedules";
    pub const REQUEST_SHIFTS: &str = "request_shifts";
    pub const EDIT_MY_SHIFTS: &str = "edit_my_shifts";

    // Specialized workers
    pub const CONDUCT_TANDEM_JUMPS: &str = "conduct_tandem_jumps";
    pub const CONDUCT_AFF_TRAINING: &str = "conduct_aff_training";
    pub const CAPTURE_TANDEM_MEDIA: &str = "capture_tandem_media";
    pub const LEAD_GROUP_JUMPS: &str = "lead_group_jumps";
    pub const COORDINATE_FORMATIONS: &str = "coordinate_formations";
    pub const CUSTOMER_SERVICE: &str = "customer_service";
    pub const BOOKING_MANAGEMENT: &str = "booking_management";
    pub const MANIFEST_JUMPERS: &str = "manifest_jumpers";
    pub const COORDINATE_LOADS: &str = "coordinate_loads";
}

/// Every known permission, in catalog order
pub const PERMISSION_CATALOG: &[&str] = &[
    perms::ALL,
    perms::MANAGE_USERS,
    perms::ASSIGN_ROLES,
    perms::CREATE_CUSTOM_ROLES,
    perms::MANAGE_DROPZONES,
    perms::APPROVE_DROPZONES,
    perms::MAKE_CALENDAR_PUBLIC,
    perms::MANAGE_EVENTS,
    perms::MANAGE_SHIFTS,
    perms::VIEW_REPORTS,
    perms::ASSIGN_WORKERS,
    perms::OVERSEE_OPERATIONS,
    perms::CREATE_EVENTS,
    perms::EDIT_EVENTS,
    perms::DELETE_EVENTS,
    perms::VIEW_CALENDARS,
    perms::MANAGE_WORK_CALENDAR,
    perms::APPROVE_SHIFTS,
    perms::DECLINE_SHIFTS,
    perms::VIEW_MY_PAGE,
    perms::VIEW_SCHEDULES,
    perms::REQUEST_SHIFTS,
    perms::EDIT_MY_SHIFTS,
    perms::CONDUCT_TANDEM_JUMPS,
    perms::CONDUCT_AFF_TRAINING,
    perms::CAPTURE_TANDEM_MEDIA,
    perms::LEAD_GROUP_JUMPS,
    perms::COORDINATE_FORMATIONS,
    perms::CUSTOMER_SERVICE,
    perms::BOOKING_MANAGEMENT,
    perms::MANIFEST_JUMPERS,
    perms::COORDINATE_LOADS,
];

/// Authority level for a built-in role name; unknown names rank 0.
pub fn default_role_level(name: &str) -> i32 {
    match name {
        "Super Admin" => 10,
        "Admin" => 8,
        "Event Manager" => 6,
        "Work Administrator" => 5,
        "Tandem Instructor" | "AFF Instructor" | "Formation Leader" | "Group Jump Leader" => 4,
        "Manifest" | "Customer Service" => 3,
        "Worker" => 2,
        _ => 0,
    }
}

/// Default permission set for a built-in role name.
pub fn default_role_permissions(name: &str) -> &'static [&'static str] {
    match name {
        "Super Admin" => &[
            perms::ALL,
            perms::MANAGE_USERS,
            perms::ASSIGN_ROLES,
            perms::CREATE_CUSTOM_ROLES,
            perms::MANAGE_DROPZONES,
            perms::APPROVE_DROPZONES,
            perms::MAKE_CALENDAR_PUBLIC,
        ],
        "Admin" => &[
            perms::MANAGE_EVENTS,
            perms::MANAGE_SHIFTS,
            perms::VIEW_REPORTS,
            perms::ASSIGN_WORKERS,
            perms::OVERSEE_OPERATIONS,
            perms::VIEW_CALENDARS,
        ],
        "Event Manager" => &[
            perms::CREATE_EVENTS,
            perms::EDIT_EVENTS,
            perms::DELETE_EVENTS,
            perms::VIEW_CALENDARS,
        ],
        "Work Administrator" => &[
            perms::MANAGE_WORK_CALENDAR,
            perms::APPROVE_SHIFTS,
            perms::DECLINE_SHIFTS,
            perms::ASSIGN_WORKERS,
            perms::VIEW_SCHEDULES,
        ],
        "Tandem Instructor" => &[
            perms::VIEW_MY_PAGE,
            perms::VIEW_SCHEDULES,
            perms::REQUEST_SHIFTS,
            perms::EDIT_MY_SHIFTS,
            perms::CONDUCT_TANDEM_JUMPS,
            perms::CAPTURE_TANDEM_MEDIA,
        ],
        "AFF Instructor" => &[
            perms::VIEW_MY_PAGE,
            perms::VIEW_SCHEDULES,
            perms::REQUEST_SHIFTS,
            perms::EDIT_MY_SHIFTS,
            perms::CONDUCT_AFF_TRAINING,
        ],
        "Formation Leader" => &[
            perms::VIEW_MY_PAGE,
            perms::VIEW_SCHEDULES,
            perms::REQUEST_SHIFTS,
            perms::EDIT_MY_SHIFTS,
            perms::LEAD_GROUP_JUMPS,
            perms::COORDINATE_FORMATIONS,
        ],
        "Group Jump Leader" => &[
            perms::VIEW_MY_PAGE,
            perms::VIEW_SCHEDULES,
            perms::REQUEST_SHIFTS,
            perms::EDIT_MY_SHIFTS,
            perms::LEAD_GROUP_JUMPS,
        ],
        "Manifest" => &[
            perms::VIEW_MY_PAGE,
            perms::MANIFEST_JUMPERS,
            perms::COORDINATE_LOADS,
            perms::VIEW_SCHEDULES,
        ],
        "Customer Service" => &[
            perms::VIEW_MY_PAGE,
            perms::CUSTOMER_SERVICE,
            perms::BOOKING_MANAGEMENT,
        ],
        "Worker" => &[
            perms::VIEW_MY_PAGE,
            perms::VIEW_SCHEDULES,
            perms::REQUEST_SHIFTS,
            perms::EDIT_MY_SHIFTS,
        ],
        _ => &[],
    }
}

/// Roles from `all_roles` that the user holds, matched by name.
fn matched_roles<'a>(user: &'a User, all_roles: &'a [Role]) -> impl Iterator<Item = &'a Role> {
    all_roles
        .iter()
        .filter(move |role| user.roles.iter().any(|name| *name == role.name))
}

/// Whether the user holds `permission` through any of their roles.
/// A role carrying the wildcard permission passes every check.
pub fn has_permission(user: &User, permission: &str, all_roles: &[Role]) -> bool {
    matched_roles(user, all_roles)
        .any(|role| role.has_permission(perms::ALL) || role.has_permission(permission))
}

/// Whether the user holds at least one of `permissions`.
pub fn has_any_permission(user: &User, permissions: &[&str], all_roles: &[Role]) -> bool {
    permissions
        .iter()
        .any(|permission| has_permission(user, permission, all_roles))
}

/// Highest authority level among the user's matched roles, floor 0.
pub fn user_role_level(user: &User, all_roles: &[Role]) -> i32 {
    matched_roles(user, all_roles)
        .map(|role| role.level)
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Whether `manager` outranks `target` (strictly higher level), or
/// holds the wildcard permission.
pub fn can_manage_user(manager: &User, target: &User, all_roles: &[Role]) -> bool {
    user_role_level(manager, all_roles) > user_role_level(target, all_roles)
        || has_permission(manager, perms::ALL, all_roles)
}

/// Union of all permissions across the user's matched roles,
/// deduplicated, first-seen order preserved.
pub fn user_permissions(user: &User, all_roles: &[Role]) -> Vec<String> {
    let mut permissions: Vec<String> = Vec::new();
    for role in matched_roles(user, all_roles) {
        for permission in &role.permissions {
            if !permissions.contains(permission) {
                permissions.push(permission.clone());
            }
        }
    }
    permissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domain::UserStatus;

    fn role(id: i32, name: &str, level: i32, permissions: &[&str]) -> Role {
        Role {
            id,
            name: name.to_string(),
            display_name: name.to_string(),
            description: String::new(),
            level,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            is_system_role: true,
            user_count: 0,
            created_at: Utc::now(),
        }
    }

    fn user(id: i32, roles: &[&str]) -> User {
        User {
            id,
            first_name: "Test".into(),
            last_name: "User".into(),
            email: "test@example.com".into(),
            phone: String::new(),
            status: UserStatus::Active,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            drop_zones: vec!["Skydive North".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn fixture_roles() -> Vec<Role> {
        vec![
            role(1, "Super Admin", 10, default_role_permissions("Super Admin")),
            role(2, "Admin", 8, default_role_permissions("Admin")),
            role(3, "Worker", 2, default_role_permissions("Worker")),
            role(4, "Manifest", 3, default_role_permissions("Manifest")),
        ]
    }

    #[test]
    fn wildcard_passes_every_permission() {
        let roles = fixture_roles();
        let admin = user(1, &["Super Admin"]);

        for permission in PERMISSION_CATALOG {
            assert!(has_permission(&admin, permission, &roles));
        }
        // Even a permission string no role explicitly carries
        assert!(has_permission(&admin, "fly_the_plane", &roles));
    }

    #[test]
    fn exact_permission_match() {
        let roles = fixture_roles();
        let worker = user(2, &["Worker"]);

        assert!(has_permission(&worker, perms::VIEW_SCHEDULES, &roles));
        assert!(!has_permission(&worker, perms::MANAGE_USERS, &roles));
    }

    #[test]
    fn no_roles_means_no_permissions() {
        let roles = fixture_roles();
        let nobody = user(3, &[]);

        assert!(!has_permission(&nobody, perms::VIEW_MY_PAGE, &roles));
        assert_eq!(user_role_level(&nobody, &roles), 0);
        assert!(user_permissions(&nobody, &roles).is_empty());
    }

    #[test]
    fn unmatched_role_names_are_ignored() {
        let roles = fixture_roles();
        let ghost = user(4, &["Pilot"]);

        assert!(!has_permission(&ghost, perms::VIEW_SCHEDULES, &roles));
        assert_eq!(user_role_level(&ghost, &roles), 0);
    }

    #[test]
    fn any_permission_or_folds() {
        let roles = fixture_roles();
        let worker = user(5, &["Worker"]);

        assert!(has_any_permission(
            &worker,
            &[perms::MANAGE_USERS, perms::VIEW_SCHEDULES],
            &roles
        ));
        assert!(!has_any_permission(
            &worker,
            &[perms::MANAGE_USERS, perms::MANAGE_EVENTS],
            &roles
        ));
    }

    #[test]
    fn role_level_takes_max_across_roles() {
        let roles = fixture_roles();
        let multi = user(6, &["Worker", "Admin"]);

        assert_eq!(user_role_level(&multi, &roles), 8);
    }

    #[test]
    fn manager_needs_strictly_higher_level() {
        let roles = fixture_roles();
        let admin = user(7, &["Admin"]);
        let worker = user(8, &["Worker"]);
        let peer = user(9, &["Admin"]);

        assert!(can_manage_user(&admin, &worker, &roles));
        assert!(!can_manage_user(&worker, &admin, &roles));
        // Equal levels: neither manages the other without the wildcard
        assert!(!can_manage_user(&admin, &peer, &roles));
    }

    #[test]
    fn wildcard_manages_everyone() {
        let roles = fixture_roles();
        let super_admin = user(10, &["Super Admin"]);
        let other_super = user(11, &["Super Admin"]);

        assert!(can_manage_user(&super_admin, &other_super, &roles));
    }

    #[test]
    fn permissions_union_deduplicates() {
        let roles = fixture_roles();
        // Worker and Manifest both carry view_my_page and view_schedules
        let multi = user(12, &["Worker", "Manifest"]);

        let permissions = user_permissions(&multi, &roles);
        let unique: std::collections::HashSet<&String> = permissions.iter().collect();
        assert_eq!(unique.len(), permissions.len());
        assert!(permissions.contains(&perms::MANIFEST_JUMPERS.to_string()));
        assert!(permissions.contains(&perms::REQUEST_SHIFTS.to_string()));
    }

    #[test]
    fn default_tables_align_with_hierarchy() {
        assert_eq!(default_role_level("Super Admin"), 10);
        assert_eq!(default_role_level("Unknown Role"), 0);
        assert!(default_role_permissions("Super Admin").contains(&perms::ALL));
        assert!(default_role_permissions("Unknown Role").is_empty());
    }
}
