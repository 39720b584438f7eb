//! Parser regression tests

use super::*;

fn first_selector(input: &str) -> Selector {
    let sheet = parse_mapcss(input).unwrap();
    sheet.rules[0].selectors[0].clone()
}

fn first_value(input: &str) -> Value {
    let sheet = parse_mapcss(input).unwrap();
    sheet.rules[0].declarations[0].value.clone()
}

#[test]
fn test_selector_types() {
    let cases = [
        ("node { color: red; }", "node"),
        ("way { color: blue; }", "way"),
        ("relation { color: green; }", "relation"),
        ("area { fill-color: yellow; }", "area"),
        ("line { width: 2; }", "line"),
        ("canvas { fill-color: white; }", "canvas"),
        ("* { opacity: 0.5; }", "*"),
    ];

    for (input, expected) in cases {
        let sheet = parse_mapcss(input).unwrap();
        assert_eq!(sheet.rules.len(), 1, "input {}", input);
        assert_eq!(sheet.rules[0].selectors[0].selector_type, expected);
    }
}

#[test]
fn test_conditions() {
    let cases = [
        ("way[highway=primary] {}", "highway", Operator::Eq, "primary"),
        ("way[highway!=motorway] {}", "highway", Operator::NotEq, "motorway"),
        ("way[name] {}", "name", Operator::Exists, ""),
        ("way[!name] {}", "name", Operator::NotExists, ""),
        ("way[highway=~/.*ary/] {}", "highway", Operator::Match, "/.*ary/"),
        ("way[name!~/^A/] {}", "name", Operator::NotMatch, "/^A/"),
        ("node[population<1000] {}", "population", Operator::Lt, "1000"),
        ("node[population>1000] {}", "population", Operator::Gt, "1000"),
        ("node[population<=1000] {}", "population", Operator::Le, "1000"),
        ("node[population>=1000000] {}", "population", Operator::Ge, "1000000"),
        ("way[@id=171784106] {}", "@id", Operator::Eq, "171784106"),
        (r#"way["highway"="primary"] {}"#, "highway", Operator::Eq, "primary"),
        ("way[name='Cafe'] {}", "name", Operator::Eq, "Cafe"),
        ("way[ name = x ] {}", "name", Operator::Eq, "x"),
    ];

    for (input, key, op, value) in cases {
        let sel = first_selector(input);
        assert_eq!(sel.conditions.len(), 1, "input {}", input);
        let cond = &sel.conditions[0];
        assert_eq!(cond.key, key, "input {}", input);
        assert_eq!(cond.operator, op, "input {}", input);
        assert_eq!(cond.value, value, "input {}", input);
    }
}

#[test]
fn test_regex_condition_is_compiled_without_delimiters() {
    let sel = first_selector("way[highway=~/.*ary/] {}");
    let regex = sel.conditions[0].regex.as_ref().unwrap();
    assert_eq!(regex.as_str(), ".*ary");
    assert!(regex.is_match("primary"));

    let sel = first_selector("way[name=~\"^Main\"] {}");
    assert!(sel.conditions[0].regex.as_ref().unwrap().is_match("Main Street"));

    let sel = first_selector("way[highway=primary] {}");
    assert!(sel.conditions[0].regex.is_none());
}

#[test]
fn test_invalid_regex_is_an_error() {
    let err = parse_mapcss("way[name=~/(unclosed/] {}").unwrap_err();
    assert!(err.message.starts_with("invalid regex"), "{}", err);
    assert_eq!(err.line, 1);
}

#[test]
fn test_multiple_conditions_and_modifiers() {
    let sel = first_selector("way[highway][name=~/x/]:closed.major:hover {}");
    assert_eq!(sel.conditions.len(), 2);
    assert_eq!(sel.pseudo_classes, vec!["closed", "hover"]);
    assert_eq!(sel.classes, vec!["major"]);
}

#[test]
fn test_selector_list() {
    let sheet =
        parse_mapcss("way[highway=primary], way[highway=secondary] { color: red; }").unwrap();
    assert_eq!(sheet.rules.len(), 1);

    let rule = &sheet.rules[0];
    assert_eq!(rule.selectors.len(), 2);
    for sel in &rule.selectors {
        assert_eq!(sel.conditions.len(), 1);
        assert_eq!(sel.conditions[0].operator, Operator::Eq);
    }
    assert_eq!(rule.selectors[1].conditions[0].value, "secondary");
}

#[test]
fn test_descendant_chain() {
    let sheet = parse_mapcss("relation[type=route] way[highway] { color: red; }").unwrap();
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selectors.len(), 1);

    let sel = &sheet.rules[0].selectors[0];
    assert_eq!(sel.selector_type, "way");
    let parent = sel.parent.as_ref().unwrap();
    assert_eq!(parent.selector_type, "relation");
    assert_eq!(parent.conditions[0].value, "route");
    assert!(parent.parent.is_none());
}

#[test]
fn test_three_level_chain_order() {
    let sel = first_selector("relation node way {}");
    let types: Vec<&str> = std::iter::once(&sel)
        .chain(sel.ancestors())
        .map(|s| s.selector_type.as_str())
        .collect();
    assert_eq!(types, vec!["way", "node", "relation"]);
    assert_eq!(sel.chain_len(), 3);
}

#[test]
fn test_layer_and_zoom() {
    let sel = first_selector("way::casing { width: 8; }");
    assert_eq!(sel.layer.as_deref(), Some("casing"));

    let cases = [
        ("way|z12 {}", 12, 12),
        ("way|z1-11 {}", 1, 11),
        ("way|z12- {}", 12, 0),
        ("node::label|z15-18 {}", 15, 18),
    ];
    for (input, min, max) in cases {
        let sel = first_selector(input);
        assert_eq!((sel.zoom_min, sel.zoom_max), (min, max), "input {}", input);
    }
}

#[test]
fn test_typeless_selectors() {
    let sel = first_selector("[building] { fill-color: gray; }");
    assert_eq!(sel.selector_type, "");
    assert_eq!(sel.conditions[0].key, "building");

    let sel = first_selector(".minor_road { width: 1; }");
    assert_eq!(sel.classes, vec!["minor_road"]);
}

#[test]
fn test_declaration_values() {
    let v = first_value("way { width: 5; }");
    assert_eq!(v.as_number(), Some(5.0));

    let v = first_value("node { icon-image: url('icons/maki/cafe-18.png'); }");
    assert_eq!(v.as_url(), Some("icons/maki/cafe-18.png"));

    let v = first_value("way { dashes: 5, 8; }");
    assert_eq!(v.as_dashes(), Some(&[5.0, 8.0][..]));

    let v = first_value("way { linecap: round; }");
    assert_eq!(v.value_type(), ValueType::Keyword);
    assert_eq!(v.raw, "round");

    let v = first_value(r#"node { opacity: eval("tag('population')/100000"); }"#);
    assert_eq!(v.as_eval(), Some("tag('population')/100000"));
}

#[test]
fn test_color_values() {
    let cases = [
        ("node { color: #ff0000; }", Color::new(1.0, 0.0, 0.0, 1.0)),
        ("node { color: #f00; }", Color::new(1.0, 0.0, 0.0, 1.0)),
        ("node { color: red; }", Color::new(1.0, 0.0, 0.0, 1.0)),
        ("node { color: BLUE; }", Color::new(0.0, 0.0, 1.0, 1.0)),
        ("node { color: rgb(1.0, 0.5, 0.0); }", Color::new(1.0, 0.5, 0.0, 1.0)),
        (
            "node { color: rgba(1.0, 0.0, 0.0, 0.5); }",
            Color::new(1.0, 0.0, 0.0, 0.5),
        ),
    ];
    for (input, expected) in cases {
        let v = first_value(input);
        assert_eq!(v.as_color(), Some(&expected), "input {}", input);
    }

    let v = first_value("node { color: #ff000080; }");
    let c = v.as_color().unwrap();
    assert!((c.a - 0.5).abs() < 0.01);
}

#[test]
fn test_color_errors() {
    let err = parse_mapcss("node { color: #12345; }").unwrap_err();
    assert!(err.message.contains("invalid hex color"));
    assert!(err.message.contains("12345"));

    let err = parse_mapcss("node { color: rgb(1, 0); }").unwrap_err();
    assert!(err.message.contains("rgb() requires 3 values"), "{}", err);

    let err = parse_mapcss("node { color: rgba(1, 0, 0); }").unwrap_err();
    assert!(err.message.contains("rgba() requires 4 values"), "{}", err);
}

#[test]
fn test_set_directive() {
    let sheet = parse_mapcss(
        "way[highway=footpath] { set .minor_road; }\n\
         way { set layer=5; }\n\
         way { set bridge; }\n\
         way { set name=\"Main St\" }",
    )
    .unwrap();

    let decls: Vec<(&str, &str)> = sheet
        .rules
        .iter()
        .map(|r| {
            let d = &r.declarations[0];
            (d.property.as_str(), d.value.raw.as_str())
        })
        .collect();
    assert_eq!(
        decls,
        vec![
            ("set-class", "minor_road"),
            ("set-tag:layer", "5"),
            ("set-tag:bridge", "yes"),
            ("set-tag:name", "Main St"),
        ]
    );
    assert_eq!(sheet.rules[0].declarations[0].value.value_type(), ValueType::String);
}

#[test]
fn test_set_prefix_property_is_not_a_directive() {
    let v = parse_mapcss("way { setback: 3; }").unwrap();
    assert_eq!(v.rules[0].declarations[0].property, "setback");
}

#[test]
fn test_comments_and_at_rules() {
    let input = r#"
        /* block comment */
        @import url("base.mapcss");
        // line comment
        meta { title: "Test"; }
        @media print { way { color: red; } }
        node { /* inner */ color: blue; }
    "#;
    let sheet = parse_mapcss(input).unwrap();
    assert_eq!(sheet.rules.len(), 2);
    assert_eq!(sheet.rules[0].selectors[0].selector_type, "meta");
    assert_eq!(sheet.rules[1].selectors[0].selector_type, "node");
}

#[test]
fn test_rule_count_and_order() {
    let sheet = parse_mapcss("node {} way {} relation { } area{}").unwrap();
    let types: Vec<&str> = sheet
        .rules
        .iter()
        .map(|r| r.selectors[0].selector_type.as_str())
        .collect();
    assert_eq!(types, vec!["node", "way", "relation", "area"]);
    assert!(sheet.rules.iter().all(|r| r.declarations.is_empty()));
}

#[test]
fn test_empty_input() {
    assert!(parse_mapcss("").unwrap().rules.is_empty());
    assert!(parse_mapcss("  // nothing\n").unwrap().rules.is_empty());
}

#[test]
fn test_stray_semicolons() {
    let sheet = parse_mapcss("way { ; color: red;; width: 2 }").unwrap();
    assert_eq!(sheet.rules[0].declarations.len(), 2);
}

#[test]
fn test_parse_errors() {
    let err = parse_mapcss("way { color: red;").unwrap_err();
    assert_eq!(err.message, "expected '}'");

    let err = parse_mapcss("way[highway { color: red; }").unwrap_err();
    assert_eq!(err.message, "expected ']'");
    assert_eq!((err.line, err.column), (1, 13));

    let err = parse_mapcss("way color: red; }").unwrap_err();
    assert_eq!(err.message, "expected '{'");

    let err = parse_mapcss("way {\n  color red;\n}").unwrap_err();
    assert_eq!(err.message, "expected ':'");
    assert_eq!(err.line, 2);

    let err = parse_mapcss("} way {}").unwrap_err();
    assert_eq!(err.message, "no selector parsed");

    let err = parse_mapcss("way { ? }").unwrap_err();
    assert_eq!(err.message, "expected property name");
}
