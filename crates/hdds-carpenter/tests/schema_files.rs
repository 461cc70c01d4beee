// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema and configuration files driven through a full fabrication.

use hdds_carpenter::{
    fabricate, CarpenterConfig, LocalRegistry, MetaCarpenter, PrimitiveKind, SchemaExtractor,
    SchemaLoader, TypeCache, TypeSchema, Value,
};
use std::io::Write;
use std::sync::Arc;

const TELEMETRY_YAML: &str = r#"
types:
  - name: telemetry.Named
    kind: interface
    fields:
      - { name: name, type: { primitive: string } }
  - name: telemetry.Severity
    kind: { enum: [INFO, WARN, ALARM] }
  - name: telemetry.Sample
    interfaces: [telemetry.Named]
    fields:
      - { name: name, type: { primitive: string } }
      - { name: values, type: { sequence: { primitive: f64 } } }
      - { name: severity, type: { named: telemetry.Severity }, nullable: true }
      - { name: previous, type: { named: telemetry.Sample }, nullable: true }
"#;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("tempfile");
    file.write_all(content.as_bytes()).expect("write");
    file
}

#[test]
fn test_yaml_schema_fabricates_usable_types() {
    let file = write_temp(".yaml", TELEMETRY_YAML);
    let wire = SchemaLoader::load_from_file(file.path()).expect("load");
    let local = LocalRegistry::new();

    let registry = fabricate(&wire, &local, &CarpenterConfig::default()).expect("fabricate");
    assert_eq!(
        registry.names(),
        vec!["telemetry.Named", "telemetry.Sample", "telemetry.Severity"]
    );

    let severity = registry.get("telemetry.Severity").expect("Severity");
    let sample = registry.get("telemetry.Sample").expect("Sample");
    assert_eq!(
        sample.accessor_names(),
        vec!["getName", "getValues", "getSeverity", "getPrevious"]
    );

    let first = sample
        .construct(vec![
            Value::from("t0"),
            Value::from(vec![0.5f64]),
            Value::Null,
            Value::Null,
        ])
        .expect("first");
    let second = sample
        .construct(vec![
            Value::from("t1"),
            Value::from(vec![1.0f64, 2.0]),
            severity.enum_constant("ALARM").expect("ALARM"),
            Value::from(first),
        ])
        .expect("second");

    assert_eq!(
        second.call_accessor("getSeverity").expect("severity").enum_constant(),
        Some("ALARM")
    );
    let previous = second.get_as::<Option<hdds_carpenter::Instance>>("previous").expect("previous");
    assert_eq!(previous.map(|p| p.get_as::<String>("name").expect("name")), Some("t0".into()));

    let named = second.as_interface("telemetry.Named").expect("Named");
    assert_eq!(named.get_as::<String>("name").expect("name"), "t1");
}

#[test]
fn test_json_schema_matches_yaml() {
    let json = r#"{
        "types": [
            { "name": "A", "interfaces": ["I"],
              "fields": [ { "name": "a", "type": { "primitive": "i32" } } ] },
            { "name": "I", "kind": "interface",
              "fields": [ { "name": "a", "type": { "primitive": "i32" } } ] }
        ]
    }"#;
    let yaml = r#"
types:
  - name: A
    interfaces: [I]
    fields: [ { name: a, type: { primitive: i32 } } ]
  - name: I
    kind: interface
    fields: [ { name: a, type: { primitive: i32 } } ]
"#;
    let from_json = SchemaLoader::load_from_file(write_temp(".json", json).path()).expect("json");
    let from_yaml = SchemaLoader::parse_yaml(yaml).expect("yaml");
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_config_file_drives_cache_and_classification() {
    let file = write_temp(
        ".yaml",
        "cache_capacity: 2\nstrict_known_types: false\nlog_passes: true\n",
    );
    let config = CarpenterConfig::load_from_file(file.path()).expect("config");
    assert_eq!(config.cache_capacity, 2);

    let local = LocalRegistry::new();
    local
        .define(&TypeSchema::class("K").field("k", PrimitiveKind::I32))
        .expect("K");
    let wire = hdds_carpenter::WireSchema::new(vec![
        TypeSchema::class("K").field("k", PrimitiveKind::I64),
        TypeSchema::class("A").field("k", hdds_carpenter::TypeRef::named("K")),
    ]);

    let cache = Arc::new(TypeCache::from_config(&config));
    let extractor = SchemaExtractor::new(&local).with_config(&config);
    let mut meta = MetaCarpenter::new(&local)
        .with_config(&config)
        .with_cache(Arc::clone(&cache));

    let first = meta.build(extractor.extract(&wire).expect("extract")).expect("first");
    let second = meta.build(extractor.extract(&wire).expect("extract")).expect("second");

    assert_eq!(first.names(), vec!["A"]);
    let (a1, a2) = (first.get("A").expect("A"), second.get("A").expect("A"));
    assert!(a1.same_type(a2));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(meta.carpenter().built_count(), 1);
}
