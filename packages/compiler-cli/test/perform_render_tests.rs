/**
 * Perform Render Tests
 *
 * Mounting declared components into a host page
 */

#[cfg(test)]
mod tests {
    use trellis_cli::config::ProjectConfig;
    use trellis_cli::perform_render::{perform_render, prepare_runtime};

    const PROJECT: &str = r#"{
        "components": [
            {
                "name": "Counter",
                "template": "<Counter><b>{self.start}</b></Counter>",
                "properties": { "start": 0 }
            }
        ]
    }"#;

    #[test]
    fn should_render_declared_components() {
        let project = ProjectConfig::from_json(PROJECT).unwrap();
        let output = perform_render(&project, "<main><counter start='7'></counter><p>static</p></main>").unwrap();

        assert_eq!(output.roots, 1);
        assert!(output.report.is_success());
        assert!(output.html.starts_with("<main><counter start=\"7\" id=\"Counter_"));
        assert!(output.html.ends_with("rd=\"1\"><b>7</b></counter><p>static</p></main>"));
    }

    #[test]
    fn should_render_builtin_filtered_list() {
        let project = ProjectConfig::from_json(PROJECT).unwrap();
        let output = perform_render(
            &project,
            r#"<filteredlist initial_items="{['Pear', 'Fig']}"></filteredlist>"#,
        )
        .unwrap();

        assert_eq!(output.roots, 1);
        assert!(output.html.contains("<li>Pear</li><li>Fig</li>"));
    }

    #[test]
    fn should_skip_builtins_when_disabled() {
        let mut project = ProjectConfig::from_json(PROJECT).unwrap();
        project.builtins = Some(false);
        let (runtime, report) = prepare_runtime(&project, "<main></main>").unwrap();

        assert!(!runtime.is_registered("FILTEREDLIST"));
        assert_eq!(report.compiled, vec!["Counter".to_string()]);
    }

    #[test]
    fn should_flush_deferred_insertions_before_serializing() {
        let mut project = ProjectConfig::from_json(PROJECT).unwrap();
        project.runtime.scheduling = trellis_cli::runtime::Scheduling::Deferred;
        let output = perform_render(&project, "<counter start='2'></counter>").unwrap();

        assert!(output.html.ends_with("<b>2</b></counter>"));
    }

    #[test]
    fn should_report_failed_classes() {
        let project = ProjectConfig::from_json(
            r#"{"components": [{"name": "Bad", "template": "<Bad>{self.}</Bad>"}]}"#,
        )
        .unwrap();
        let output = perform_render(&project, "<bad></bad>").unwrap();

        assert_eq!(output.roots, 0);
        assert!(!output.report.is_success());
        assert_eq!(output.report.failed[0].0, "Bad");
    }
}
