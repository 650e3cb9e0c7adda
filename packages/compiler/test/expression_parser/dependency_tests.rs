/**
 * Dependency Tests
 *
 * Extraction of `(role, property)` pairs from expression source
 */

#[cfg(test)]
mod tests {
    use trellis_compiler::expression_parser::{
        extract_dependencies, CompiledExpr, Dependency, Fragment, Role,
    };

    fn deps(source: &str) -> Vec<String> {
        extract_dependencies(source)
            .iter()
            .map(Dependency::to_string)
            .collect()
    }

    #[test]
    fn should_list_dependencies_in_first_occurrence_order() {
        assert_eq!(
            deps("self.b + parent.a + root.a + 10"),
            vec!["self.b", "parent.a", "root.a"]
        );
    }

    #[test]
    fn should_deduplicate() {
        assert_eq!(deps("self.a * self.a + self.b + self.a"), vec!["self.a", "self.b"]);
    }

    #[test]
    fn should_track_only_the_first_segment() {
        assert_eq!(deps("self.user.name.length"), vec!["self.user"]);
    }

    #[test]
    fn should_never_depend_on_this() {
        assert!(deps("this.value + 1").is_empty());
    }

    #[test]
    fn should_require_a_word_boundary() {
        assert!(deps("myself.a + rooted.b").is_empty());
    }

    #[test]
    fn should_attach_dependencies_to_compiled_bindings() {
        let expr = CompiledExpr::binding("parent.total - self.used").unwrap();
        assert_eq!(
            expr.dependencies.as_slice(),
            &[
                Dependency::new(Role::Parent, "total"),
                Dependency::new(Role::Current, "used"),
            ]
        );
    }

    #[test]
    fn should_merge_dependencies_across_interpolation_parts() {
        let expr = CompiledExpr::interpolation(
            "{self.a} and {self.b} and {self.a}",
            &[
                Fragment::Expression("self.a"),
                Fragment::Text(" and "),
                Fragment::Expression("self.b"),
                Fragment::Text(" and "),
                Fragment::Expression("self.a"),
            ],
        )
        .unwrap();
        assert_eq!(
            expr.dependencies.as_slice(),
            &[
                Dependency::new(Role::Current, "a"),
                Dependency::new(Role::Current, "b"),
            ]
        );
    }
}
