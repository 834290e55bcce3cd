use creative_print_api::{
    error::AppError,
    middleware::auth::{AuthUser, Role, ensure_partner_or_admin, ensure_role},
};
use uuid::Uuid;

fn user(role: Role) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role,
    }
}

#[test]
fn roles_parse_case_insensitively() {
    assert_eq!("Partner".parse::<Role>().unwrap(), Role::Partner);
    assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!("user".parse::<Role>().unwrap(), Role::Client);
    assert!(matches!("vendor".parse::<Role>(), Err(AppError::BadRequest(_))));
}

#[test]
fn partner_guards() {
    assert!(ensure_role(&user(Role::Partner), Role::Partner).is_ok());
    assert!(matches!(
        ensure_role(&user(Role::Admin), Role::Partner),
        Err(AppError::Forbidden)
    ));

    assert!(ensure_partner_or_admin(&user(Role::Admin)).is_ok());
    assert!(ensure_partner_or_admin(&user(Role::Partner)).is_ok());
    assert!(matches!(
        ensure_partner_or_admin(&user(Role::Client)),
        Err(AppError::Forbidden)
    ));
}
