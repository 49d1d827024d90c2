//! Demo data for local development.
//!
//! # Purpose
//! Loads a small role/element/rule grid and three demo accounts so a fresh
//! in-memory deployment is immediately explorable. Only runs when
//! `seed_demo_data` is enabled in config.
use super::{AccessStore, StoreError, StoreResult};
use crate::auth::password::hash_password;
use crate::model::{NewUser, PermissionFlags};

fn full_access() -> PermissionFlags {
    PermissionFlags {
        can_read: true,
        can_create: true,
        can_update: true,
        can_delete: true,
        can_read_all: true,
        can_update_all: true,
        can_delete_all: true,
    }
}

/// Populate roles, elements, rules, and demo users. Expects an empty store.
pub async fn seed_demo_data(store: &dyn AccessStore, bcrypt_cost: u32) -> StoreResult<()> {
    let admin_role = store.create_role("admin", "System administrator").await?;
    let user_role = store.create_role("user", "Regular user").await?;
    let manager_role = store.create_role("manager", "Manager").await?;

    let users = store.create_element("users", "System users").await?;
    let products = store.create_element("products", "Products").await?;
    let orders = store.create_element("orders", "Orders").await?;
    let access_rules = store.create_element("access_rules", "Access rules").await?;

    // Admins hold every flag on the elements they manage.
    store.upsert_rule(admin_role.id, users.id, full_access()).await?;
    store
        .upsert_rule(admin_role.id, products.id, full_access())
        .await?;
    store
        .upsert_rule(admin_role.id, access_rules.id, full_access())
        .await?;

    // Managers see everyone but can only write to the catalog, and even
    // there cannot delete.
    store
        .upsert_rule(
            manager_role.id,
            users.id,
            PermissionFlags {
                can_read: true,
                can_read_all: true,
                ..PermissionFlags::default()
            },
        )
        .await?;
    store
        .upsert_rule(
            manager_role.id,
            products.id,
            PermissionFlags {
                can_read: true,
                can_read_all: true,
                can_create: true,
                can_update: true,
                can_update_all: true,
                ..PermissionFlags::default()
            },
        )
        .await?;

    // Regular users browse the catalog and manage their own orders.
    store
        .upsert_rule(
            user_role.id,
            products.id,
            PermissionFlags {
                can_read: true,
                ..PermissionFlags::default()
            },
        )
        .await?;
    store
        .upsert_rule(
            user_role.id,
            orders.id,
            PermissionFlags {
                can_read: true,
                can_create: true,
                can_update: true,
                can_delete: true,
                ..PermissionFlags::default()
            },
        )
        .await?;

    let demo_accounts = [
        (
            "admin@example.com",
            "admin123",
            "Admin",
            true,
            true,
            admin_role.id,
        ),
        (
            "manager@example.com",
            "manager123",
            "Manager",
            false,
            false,
            manager_role.id,
        ),
        (
            "user@example.com",
            "user123",
            "Regular",
            false,
            false,
            user_role.id,
        ),
    ];
    for (email, password, first_name, is_staff, is_superuser, role_id) in demo_accounts {
        let password_hash = hash_password(password, bcrypt_cost)
            .map_err(|err| StoreError::Unexpected(anyhow::Error::new(err)))?;
        store
            .create_user(NewUser {
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: "User".to_string(),
                password_hash,
                is_staff,
                is_superuser,
                role_id: Some(role_id),
            })
            .await?;
    }
    Ok(())
}
