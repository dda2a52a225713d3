//! Demo authentication.
//!
//! A login succeeds when the username is a key of the collection that matches
//! the role. The password is never checked; this must be replaced by real
//! credential verification before the portal serves real users.

use crate::database::Repository;
use crate::model::Role;

pub fn authenticate(store: &dyn Repository, role: Role, username: &str, _password: &str) -> bool {
    let ok = store.contains(role.collection(), username);
    if ok {
        log::info!("Demo login accepted for '{}' as {}", username, role);
    } else {
        log::warn!("Demo login rejected for '{}' as {}", username, role);
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    #[test]
    fn test_known_keys_pass_any_password() {
        let store = MemoryStore::default();
        for password in ["", "secret", "wrong", "🔑"] {
            assert!(authenticate(&store, Role::Student, "s1", password));
            assert!(authenticate(&store, Role::Mentor, "m2", password));
            assert!(authenticate(&store, Role::Floorwing, "fA", password));
            assert!(authenticate(&store, Role::Administrator, "admin", password));
        }
    }

    #[test]
    fn test_unknown_or_mismatched_keys_fail() {
        let store = MemoryStore::default();
        for password in ["", "secret"] {
            assert!(!authenticate(&store, Role::Student, "nope", password));
            assert!(!authenticate(&store, Role::Student, "m1", password));
            assert!(!authenticate(&store, Role::Administrator, "s1", password));
        }
    }
}
