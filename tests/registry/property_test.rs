/*!
 * Registry Property Tests
 * Leak-freedom, idempotence, isolation and global cleanup over random workloads
 */

use proptest::prelude::*;
use resource_lifecycle::{AbortHandle, ResourceRegistry};
use std::collections::HashMap;

const COMPONENTS: [&str; 4] = ["Search", "Map", "Chat", "Checkout"];

/// Registrations as (component index, number of resources)
fn workload() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..COMPONENTS.len(), 1usize..6), 1..12)
}

fn populate(
    registry: &ResourceRegistry,
    plan: &[(usize, usize)],
) -> HashMap<&'static str, Vec<AbortHandle>> {
    let mut handles: HashMap<&'static str, Vec<AbortHandle>> = HashMap::new();
    for (batch, (component, count)) in plan.iter().enumerate() {
        let name = COMPONENTS[*component];
        let scope = registry.scope(name);
        for n in 0..*count {
            let id = format!("{name}:{batch}:{n}");
            let handle = scope.create_abort_handle(id, "generated").unwrap();
            handles.entry(name).or_default().push(handle);
        }
    }
    handles
}

proptest! {
    #[test]
    fn prop_cleanup_leaves_nothing_for_component(plan in workload(), target in 0..COMPONENTS.len()) {
        let registry = ResourceRegistry::new();
        let handles = populate(&registry, &plan);
        let name = COMPONENTS[target];
        let expected = handles.get(name).map(Vec::len).unwrap_or(0);

        let scope = registry.scope(name);
        prop_assert_eq!(scope.cleanup_component(), expected);
        prop_assert_eq!(scope.cleanup_component(), 0);
        prop_assert_eq!(registry.stats().component_total(name), 0);
        prop_assert!(handles.get(name).into_iter().flatten().all(|h| h.is_aborted()));
    }

    #[test]
    fn prop_cleanup_isolated_between_components(plan in workload(), target in 0..COMPONENTS.len()) {
        let registry = ResourceRegistry::new();
        let handles = populate(&registry, &plan);
        let name = COMPONENTS[target];

        registry.dispose_component(name);

        for (component, list) in &handles {
            if *component != name {
                prop_assert_eq!(registry.list_by_component(component).len(), list.len());
                prop_assert!(list.iter().all(|h| !h.is_aborted()));
            }
        }
    }

    #[test]
    fn prop_dispose_all_is_complete(plan in workload()) {
        let registry = ResourceRegistry::new();
        populate(&registry, &plan);
        let total = registry.stats().total_resources;

        prop_assert_eq!(registry.dispose_all(), total);
        prop_assert_eq!(registry.stats().total_resources, 0);
        prop_assert_eq!(registry.dispose_all(), 0);
    }

    #[test]
    fn prop_dispose_one_true_then_false(plan in workload()) {
        let registry = ResourceRegistry::new();
        populate(&registry, &plan);

        for info in registry.active_resources() {
            prop_assert!(registry.dispose_one(&info.id));
            prop_assert!(!registry.dispose_one(&info.id));
        }
    }
}
