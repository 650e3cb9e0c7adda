/**
 * Perform Compile Tests
 *
 * Parallel compilation of declared templates
 */

#[cfg(test)]
mod tests {
    use trellis_cli::config::ProjectConfig;
    use trellis_cli::perform_compile::perform_compilation;

    fn project(components: &str) -> ProjectConfig {
        ProjectConfig::from_json(&format!(r#"{{"components": {}}}"#, components)).unwrap()
    }

    #[test]
    fn should_compile_in_declaration_order() {
        let names: Vec<String> = (0..16).map(|i| format!("C{}", i)).collect();
        let declarations: Vec<String> = names
            .iter()
            .map(|name| format!(r#"{{"name": "{0}", "template": "<{0}><p>{{self.n}}</p></{0}>"}}"#, name))
            .collect();
        let result = perform_compilation(&project(&format!("[{}]", declarations.join(","))));

        let compiled: Vec<&str> = result.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(compiled, names.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(!result.has_errors());
        assert_eq!(result.get("C3").unwrap().tag, "C3");
        assert_eq!(result.get("C3").unwrap().result.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn should_collect_failures_without_stopping() {
        let result = perform_compilation(&project(
            r#"[
                {"name": "Good", "template": "<Good><b>{self.x}</b></Good>"},
                {"name": "Bad", "template": "<Bad>{self.}</Bad>"}
            ]"#,
        ));

        assert!(result.has_errors());
        let failures: Vec<&str> = result.failures().map(|(name, _)| name).collect();
        assert_eq!(failures, vec!["Bad"]);
        assert!(result.get("Good").unwrap().is_ok());
    }

    #[test]
    fn should_print_trees_and_errors_as_json() {
        let result = perform_compilation(&project(
            r#"[
                {"name": "Good", "template": "<Good><b>hi</b></Good>"},
                {"name": "Bad", "template": "<Bad>{self.}</Bad>"}
            ]"#,
        ));
        let json = result.to_json();

        assert!(json["Good"].is_array());
        assert_eq!(json["Good"].as_array().unwrap().len(), 1);
        assert!(json["Bad"]["error"].is_string());
    }

    #[test]
    fn should_honour_whitespace_option() {
        let template = r#"[{"name": "W", "template": "<W><b>a</b> <i>b</i></W>"}]"#;
        let dropped = perform_compilation(&project(template));

        let mut preserving = project(template);
        preserving.compiler.preserve_whitespace = true;
        let kept = perform_compilation(&preserving);

        assert_eq!(dropped.get("W").unwrap().result.as_ref().unwrap().len(), 2);
        assert_eq!(kept.get("W").unwrap().result.as_ref().unwrap().len(), 3);
    }
}
