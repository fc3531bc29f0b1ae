use bt_core::{Blackboard, NodeConfig, NodeError, PortValue};

#[test]
fn literal_ports_are_parsed_on_read() {
    let config = NodeConfig::new("wait").with_literal("msec", 250);
    let bb = Blackboard::new();

    assert_eq!(config.port("msec"), Some(&PortValue::Literal("250".into())));
    assert_eq!(config.get_input::<i64>("msec", &bb), Ok(250));
}

#[test]
fn malformed_literal_is_a_config_error() {
    let config = NodeConfig::new("wait").with_literal("msec", "soon");
    let bb = Blackboard::new();

    let err = config.get_input::<i64>("msec", &bb).unwrap_err();
    assert!(matches!(
        err,
        NodeError::MalformedInput { ref node, ref port, .. } if node == "wait" && port == "msec"
    ));
}

#[test]
fn entry_ports_read_remapped_blackboard_keys() {
    let config = NodeConfig::new("wait").with_entry("msec", "wait_time");
    let mut bb = Blackboard::new();
    bb.set_entry("wait_time", 40i64);

    assert_eq!(config.get_input::<i64>("msec", &bb), Ok(40));
}

#[test]
fn string_entries_are_parsed_like_literals() {
    let config = NodeConfig::new("wait").with_entry("msec", "wait_time");
    let mut bb = Blackboard::new();
    bb.set_entry("wait_time", " 15 ".to_string());

    assert_eq!(config.get_input::<i64>("msec", &bb), Ok(15));
}

#[test]
fn unbound_port_falls_back_to_entry_of_same_name() {
    let config = NodeConfig::new("wait");
    let mut bb = Blackboard::new();

    assert_eq!(
        config.get_input::<i64>("msec", &bb),
        Err(NodeError::MissingInput {
            node: "wait".into(),
            port: "msec".into()
        })
    );
    assert_eq!(config.get_optional_input::<i64>("msec", &bb), Ok(None));

    bb.set_entry("msec", 3i64);
    assert_eq!(config.get_input::<i64>("msec", &bb), Ok(3));
}

#[test]
fn wrongly_typed_entry_is_reported() {
    let config = NodeConfig::new("wait");
    let mut bb = Blackboard::new();
    bb.set_entry("msec", 2.5f32);

    assert_eq!(
        config.get_input::<i64>("msec", &bb),
        Err(NodeError::TypeMismatch {
            node: "wait".into(),
            port: "msec".into()
        })
    );
}

#[test]
fn outputs_follow_port_bindings() {
    let config = NodeConfig::new("probe")
        .with_entry("result", "probe_result")
        .with_literal("fixed", 1);
    let mut bb = Blackboard::new();

    config.set_output("result", 9u32, &mut bb).unwrap();
    assert_eq!(bb.entry::<u32>("probe_result"), Ok(&9));

    config.set_output("plain", true, &mut bb).unwrap();
    assert_eq!(bb.entry::<bool>("plain"), Ok(&true));

    assert_eq!(
        config.set_output("fixed", 2u32, &mut bb),
        Err(NodeError::OutputNotWritable {
            node: "probe".into(),
            port: "fixed".into()
        })
    );
}
