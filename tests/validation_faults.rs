//! Fail-slow validation across a builder graph
//!
//! These tests verify that:
//! 1. One build() pass collects every fault in the graph before giving up
//! 2. Revalidation against the same tracker never duplicates faults
//! 3. Nothing is instantiated when validation fails
//! 4. A child's faults can aggregate under the parent's field key

use std::cell::Cell;
use std::rc::Rc;

use builder_core::{
    guards, BuildError, Builder, BuilderHandle, Failure, Failures, Visited,
};

#[derive(Clone, Debug)]
struct Profile {
    username: String,
    display_name: Option<String>,
    roles: Vec<String>,
}

#[derive(Default)]
struct ProfileBuilder {
    username: Option<String>,
    display_name: Option<String>,
    roles: Option<Vec<String>>,
    instantiated: Rc<Cell<usize>>,
}

impl Builder for ProfileBuilder {
    type Output = Profile;

    fn instantiate(&self) -> Profile {
        self.instantiated.set(self.instantiated.get() + 1);
        Profile {
            username: self.username.clone().unwrap_or_default(),
            display_name: self.display_name.clone(),
            roles: self.roles.clone().unwrap_or_default(),
        }
    }

    fn assemble(&mut self, _value: &mut Profile, _visited: &mut Visited) {}

    fn check(&mut self, _visited: &mut Visited, failures: &mut Failures) {
        guards::require_text(self.username.as_deref(), "username", failures, || {
            Failure::message("username is required")
        });
        guards::optional_text(self.display_name.as_deref(), "display_name", failures, || {
            Failure::message("display_name must not be blank when present")
        });
        guards::require_each(self.roles.as_deref(), "roles", failures, || {
            Failure::message("at least one non-blank role is required")
        });
    }
}

/// Parent that aggregates its profile's faults under one key.
#[derive(Clone, Debug)]
struct Account {
    email: String,
    profile: Profile,
}

struct AccountBuilder {
    email: Option<String>,
    profile: BuilderHandle<ProfileBuilder>,
}

impl Builder for AccountBuilder {
    type Output = Account;

    fn instantiate(&self) -> Account {
        Account {
            email: self.email.clone().unwrap_or_default(),
            profile: Profile {
                username: String::new(),
                display_name: None,
                roles: Vec::new(),
            },
        }
    }

    fn assemble(&mut self, value: &mut Account, visited: &mut Visited) {
        if let Ok(profile) = self.profile.build_with(visited).into_value() {
            value.profile = profile;
        }
    }

    fn check(&mut self, visited: &mut Visited, failures: &mut Failures) {
        guards::require_text(self.email.as_deref(), "email", failures, || {
            Failure::message("email is required")
        });

        let mut nested = Failures::new();
        self.profile.validate(visited, &mut nested);
        if !nested.is_empty() {
            failures.record("profile", nested);
        }
    }
}

fn valid_profile() -> ProfileBuilder {
    ProfileBuilder {
        username: Some("mmercer".to_string()),
        display_name: None,
        roles: Some(vec!["admin".to_string()]),
        instantiated: Rc::default(),
    }
}

// =============================================================================
// FAIL-SLOW ACCUMULATION
// =============================================================================

#[test]
fn test_all_faults_collected_in_one_pass() {
    // username unset, display_name blank, roles empty: three keys, one each
    let handle = BuilderHandle::new(ProfileBuilder {
        display_name: Some("   ".to_string()),
        roles: Some(Vec::new()),
        ..ProfileBuilder::default()
    });

    let outcome = handle.build();
    let failures = outcome.failures().unwrap();
    assert_eq!(failures.len(), 3);
    assert_eq!(failures.get("username").unwrap().len(), 1);
    assert_eq!(failures.get("display_name").unwrap().len(), 1);
    assert_eq!(failures.get("roles").unwrap().len(), 1);
}

#[test]
fn test_required_string_unset_is_exactly_one_fault() {
    let handle = BuilderHandle::new(ProfileBuilder {
        roles: Some(vec!["admin".to_string()]),
        ..ProfileBuilder::default()
    });

    let outcome = handle.build();
    let failures = outcome.failures().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures.get("username").unwrap().len(), 1);
}

#[test]
fn test_collection_of_blank_elements_is_exactly_one_fault() {
    let handle = BuilderHandle::new(ProfileBuilder {
        username: Some("mmercer".to_string()),
        roles: Some(vec!["".to_string(), "  ".to_string(), "ops".to_string()]),
        ..ProfileBuilder::default()
    });

    let failures = handle.build().into_result().unwrap_err();
    assert_eq!(failures.get("roles").unwrap().len(), 1);
}

#[test]
fn test_nothing_is_instantiated_when_validation_fails() {
    let instantiated = Rc::new(Cell::new(0));
    let handle = BuilderHandle::new(ProfileBuilder {
        instantiated: Rc::clone(&instantiated),
        ..ProfileBuilder::default()
    });

    assert!(handle.build().is_failure());
    assert_eq!(instantiated.get(), 0);
}

#[test]
fn test_build_success_bundles_every_fault() {
    let handle = BuilderHandle::new(ProfileBuilder::default());

    match handle.build_success() {
        Err(BuildError::Failed(failures)) => {
            assert!(failures.contains_key("username"));
            assert!(failures.contains_key("roles"));
        }
        other => panic!("expected Failed, got {:?}", other.map(|_| ())),
    }
}

// =============================================================================
// IDEMPOTENT REVALIDATION
// =============================================================================

#[test]
fn test_validate_twice_against_one_tracker_adds_nothing() {
    let handle = BuilderHandle::new(ProfileBuilder::default());
    let mut visited = Visited::new();
    let mut failures = Failures::new();

    handle.validate(&mut visited, &mut failures);
    let after_first = failures.total();

    handle.validate(&mut visited, &mut failures);
    assert_eq!(failures.total(), after_first);
}

#[test]
fn test_shared_child_is_validated_once() {
    let shared = BuilderHandle::new(ProfileBuilder::default());
    let first = BuilderHandle::new(AccountBuilder {
        email: Some("ops@example.com".to_string()),
        profile: shared.clone(),
    });
    let second = BuilderHandle::new(AccountBuilder {
        email: Some("audit@example.com".to_string()),
        profile: shared,
    });

    let mut visited = Visited::new();
    let mut failures = Failures::new();
    first.validate(&mut visited, &mut failures);
    second.validate(&mut visited, &mut failures);

    // the shared profile's faults land once, under the first reaching parent
    assert_eq!(failures.len(), 1);
    match &failures.get("profile").unwrap()[0] {
        Failure::Nested(nested) => assert!(nested.contains_key("username")),
        other => panic!("expected nested failure, got {other:?}"),
    }
}

// =============================================================================
// NESTED AGGREGATION
// =============================================================================

#[test]
fn test_child_faults_aggregate_under_parent_key() {
    let handle = BuilderHandle::new(AccountBuilder {
        email: None,
        profile: BuilderHandle::new(ProfileBuilder::default()),
    });

    let failures = handle.build().into_result().unwrap_err();
    assert!(failures.contains_key("email"));

    let report = failures.report();
    let paths: Vec<&str> = report.entries.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.contains(&"profile.username"));
    assert!(paths.contains(&"profile.roles"));
}

#[test]
fn test_valid_graph_builds() {
    let handle = BuilderHandle::new(AccountBuilder {
        email: Some("ops@example.com".to_string()),
        profile: BuilderHandle::new(valid_profile()),
    });

    let account = handle.build().success().unwrap();
    assert_eq!(account.email, "ops@example.com");
    assert_eq!(account.profile.username, "mmercer");
    assert_eq!(account.profile.roles, vec!["admin".to_string()]);
}
