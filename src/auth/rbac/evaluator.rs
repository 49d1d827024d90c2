//! The permission decision algorithm.
//!
//! # Purpose
//! Answers "may this user perform this action on this element" from the
//! policy table. Every failure path denies: missing user, inactive account,
//! missing role, unknown element, missing rule, and any store fault.
//!
//! # Ordering
//! The superuser bypass runs before any lookup, so a superuser is allowed
//! even for element names that do not exist.
use crate::auth::rbac::Action;
use crate::model::User;
use crate::store::AccessStore;

/// Decide whether `user` may perform `action` on the element named
/// `element_name`. `None` means an unauthenticated caller and always
/// denies.
pub async fn authorize(
    store: &dyn AccessStore,
    user: Option<&User>,
    element_name: &str,
    action: Action,
) -> bool {
    let allowed = decide(store, user, element_name, action).await;
    let result = if allowed { "allow" } else { "deny" };
    metrics::counter!("authgate_authz_decisions_total", "result" => result).increment(1);
    if !allowed {
        tracing::debug!(
            element = element_name,
            action = action.as_str(),
            "authorization denied"
        );
    }
    allowed
}

async fn decide(
    store: &dyn AccessStore,
    user: Option<&User>,
    element_name: &str,
    action: Action,
) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !user.is_active {
        return false;
    }
    if user.is_superuser {
        return true;
    }
    let Some(role_id) = user.role_id else {
        return false;
    };
    let element = match store.find_element_by_name(element_name).await {
        Ok(Some(element)) => element,
        Ok(None) => return false,
        Err(err) => {
            tracing::warn!(error = %err, element = element_name, "element lookup failed, denying");
            return false;
        }
    };
    let rule = match store.get_rule(role_id, element.id).await {
        Ok(Some(rule)) => rule,
        Ok(None) => return false,
        Err(err) => {
            tracing::warn!(error = %err, element = element_name, "rule lookup failed, denying");
            return false;
        }
    };
    rule.flags.allows(action)
}
