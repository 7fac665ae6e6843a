//! The bundled catalog and on-disk catalog trees.

use std::fs;
use std::path::Path;

use daqmx_metadata::loader::bundled_sources;
use daqmx_metadata::{
    Access, AttributeKind, ListSizing, MetadataError, MetadataStore, Rule, ScalarKind, Severity,
};

fn write_bundled(dir: &Path) {
    for source in bundled_sources() {
        let path = dir.join(&source.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source.contents).unwrap();
    }
}

/// Every façade class the runtime needs is declared and loads cleanly.
#[test]
fn test_bundled_catalog_loads() {
    let store = MetadataStore::bundled().unwrap();

    for class in [
        "System",
        "Device",
        "PhysicalChannel",
        "Task",
        "Channel",
        "AIChannel",
        "AOChannel",
        "CIChannel",
        "COChannel",
        "DIChannel",
        "DOChannel",
        "Timing",
        "StartTrigger",
        "ReferenceTrigger",
        "Scale",
        "PersistedTask",
        "PersistedChannel",
        "PersistedScale",
    ] {
        assert!(store.class(class).is_some(), "missing class {class}");
    }
    assert!(store.attribute_count() > 100);
}

/// Derived channel classes see the base channel attributes.
#[test]
fn test_channel_inheritance() {
    let store = MetadataStore::bundled().unwrap();

    let description = store.find_attribute("AIChannel", "description").unwrap();
    assert_eq!(description.owner_class, "Channel");
    assert_eq!(description.c_function_stem, "ChanAttribute");
    assert_eq!(description.access, Access::ReadWrite);
    assert!(description.resettable);

    let ancestors: Vec<&str> = store
        .ancestors("AIChannel")
        .into_iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(ancestors, ["Channel"]);
    assert!(store.find_attribute("AOChannel", "ai_max").is_none());
}

/// Attribute shapes drive marshaling.
#[test]
fn test_attribute_kinds() {
    let store = MetadataStore::bundled().unwrap();

    let ai_max = store.find_attribute("AIChannel", "ai_max").unwrap();
    assert_eq!(ai_max.kind(), Some(AttributeKind::Scalar(ScalarKind::Float64)));

    let meas = store.find_attribute("AIChannel", "ai_meas_type").unwrap();
    assert_eq!(meas.kind(), Some(AttributeKind::Enum("UsageTypeAI")));
    assert_eq!(meas.access, Access::Read);

    let names = store.find_attribute("Task", "channel_names").unwrap();
    assert!(matches!(
        names.kind(),
        Some(AttributeKind::List {
            sizing: ListSizing::Explicit,
            ..
        })
    ));

    let cjc = store.find_attribute("AIChannel", "ai_thrmcpl_cjc_chan").unwrap();
    match cjc.kind() {
        Some(AttributeKind::Object { class, forwarded }) => {
            assert_eq!(class, "Channel");
            assert_eq!(forwarded, ["task_handle"]);
        }
        other => panic!("expected an object attribute, got {other:?}"),
    }
}

/// Status codes split into errors and warnings by sign.
#[test]
fn test_error_codes() {
    let store = MetadataStore::bundled().unwrap();

    let running = store.error(-200_557).unwrap();
    assert_eq!(running.name, "ATTRIBUTE_NOT_SETTABLE_WHEN_TASK_RUNNING");
    assert_eq!(running.severity(), Severity::Error);

    let stopped = store.error_by_name("STOPPED_BEFORE_DONE").unwrap();
    assert_eq!(stopped.value, 200_010);
    assert_eq!(stopped.severity(), Severity::Warning);
}

/// Enum aliases give the public type name.
#[test]
fn test_enum_aliases() {
    let store = MetadataStore::bundled().unwrap();

    let edge = store.enum_descriptor("Edge1").unwrap();
    assert_eq!(edge.type_name(), "Edge");
    assert_eq!(edge.member("RISING").unwrap().value, 10280);

    let save = store.enum_descriptor("SaveOptions").unwrap();
    assert!(save.bitfield);
}

/// A copy of the bundled tree on disk loads to the same catalog.
#[test]
fn test_directory_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write_bundled(dir.path());

    let bundled = MetadataStore::bundled().unwrap();
    let on_disk = MetadataStore::from_dir(dir.path()).unwrap();
    assert_eq!(on_disk.attribute_count(), bundled.attribute_count());
    assert_eq!(on_disk.classes().count(), bundled.classes().count());
    assert_eq!(on_disk.errors().count(), bundled.errors().count());
}

/// A broken reference in one file is reported with its location.
#[test]
fn test_directory_catalog_with_bad_reference() {
    let dir = tempfile::tempdir().unwrap();
    write_bundled(dir.path());
    let path = dir.path().join("collections.toml");
    let text = fs::read_to_string(&path).unwrap();
    fs::write(
        &path,
        text.replace("ChannelType.ANALOG_INPUT", "ChannelType.ANALOG_INPUTS"),
    )
    .unwrap();

    let err = MetadataStore::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, MetadataError::Invalid(_)));
    let issue = err
        .issues()
        .iter()
        .find(|i| matches!(i.rule, Rule::UnknownEnumMember { .. }))
        .unwrap();
    assert!(issue.location.contains("collections.toml"));
}

/// A missing directory is an I/O error naming the path.
#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    match MetadataStore::from_dir(&missing) {
        Err(MetadataError::Io { path, .. }) => assert!(path.ends_with("nope")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

/// A handle override that drops the channel name no longer fits the
/// channel attribute functions.
#[test]
fn test_handle_override_checked_against_stem() {
    let dir = tempfile::tempdir().unwrap();
    write_bundled(dir.path());
    let path = dir.path().join("attributes/ai_channel.toml");
    let text = fs::read_to_string(&path).unwrap();
    fs::write(
        &path,
        text.replace(
            "name = \"ai_atten\"\n",
            "name = \"ai_atten\"\nhandle_parameters = [\"task_handle\"]\n",
        ),
    )
    .unwrap();

    let err = MetadataStore::from_dir(dir.path()).unwrap_err();
    let issue = err
        .issues()
        .iter()
        .find(|i| matches!(i.rule, Rule::HandleShapeMismatch { .. }))
        .unwrap();
    assert!(issue.location.contains("ai_atten"));
    assert_eq!(
        issue.rule.to_string(),
        "DAQmxGetChanAttribute takes [task, string], not [task]"
    );
}
