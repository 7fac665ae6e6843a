//! Generator behavior over the bundled catalog.

use std::fs;
use std::path::Path;

use daqmx_codegen::{CodegenConfig, CodegenError, Generator};
use daqmx_metadata::{CatalogSource, MetadataStore};

const CONFIG: &str = r#"
[[modules]]
output = "enums.rs"
template = "enums"

[[modules]]
output = "error_codes.rs"
template = "errors"

[[modules]]
output = "collections.rs"
template = "collections"

[[modules]]
output = "ai_channel.rs"
template = "class"
class = "AIChannel"

[[modules]]
output = "task.rs"
template = "class"
class = "Task"

[[modules]]
output = "device.rs"
template = "class"
class = "Device"

[[modules]]
output = "system.rs"
template = "class"
class = "System"
"#;

fn bundled() -> MetadataStore {
    MetadataStore::bundled().unwrap()
}

fn config() -> CodegenConfig {
    CodegenConfig::from_toml_str(CONFIG, ".").unwrap()
}

fn render(store: &MetadataStore, output: &str) -> String {
    let config = config();
    let files = Generator::new(store, &config).generate().unwrap();
    files[Path::new(output)].clone()
}

#[test]
fn test_output_is_deterministic() {
    let store = bundled();
    let config = config();
    let first = Generator::new(&store, &config).generate().unwrap();
    let second = Generator::new(&bundled(), &config).generate().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 7);
}

#[test]
fn test_every_file_starts_with_the_header() {
    let store = bundled();
    let config = config();
    for text in Generator::new(&store, &config).generate().unwrap().values() {
        assert!(text.starts_with(daqmx_codegen::config::DEFAULT_HEADER));
        assert!(!text.contains("\nuse "));
        assert!(!text.contains("//!"));
    }
}

#[test]
fn test_read_write_resettable_float_gets_all_three_accessors() {
    let text = render(&bundled(), "ai_channel.rs");
    assert!(text.contains("pub fn ai_atten(&self) -> crate::Result<f64> {"));
    assert!(text.contains("pub fn set_ai_atten(&self, value: f64) -> crate::Result<()> {"));
    assert!(text.contains("pub fn reset_ai_atten(&self) -> crate::Result<()> {"));
    assert!(text.contains(
        "let call = crate::interpreter::AttributeCall::new(\"ChanAttribute\", &handles, 6145);"
    ));
}

#[test]
fn test_read_only_attribute_gets_only_a_getter() {
    let text = render(&bundled(), "ai_channel.rs");
    assert!(text.contains(
        "pub fn ai_raw_samp_justification(&self) -> crate::Result<crate::enums::DataJustification> {"
    ));
    assert!(text.contains("crate::enums::DataJustification::try_from(value)"));
    assert!(!text.contains("fn set_ai_raw_samp_justification"));
    assert!(!text.contains("fn reset_ai_raw_samp_justification"));
}

#[test]
fn test_object_getter_forwards_the_task_handle() {
    let text = render(&bundled(), "ai_channel.rs");
    assert!(text.contains("pub fn ai_thrmcpl_cjc_chan(&self) -> crate::Result<crate::channel::Channel> {"));
    assert!(text.contains(
        "Ok(crate::channel::Channel::new(std::sync::Arc::clone(&self.interpreter), self.task_handle, name))"
    ));
    assert!(text.contains("pub fn set_ai_custom_scale(&self, value: &crate::scale::Scale) -> crate::Result<()> {"));
    assert!(text.contains("self.interpreter.set_string(&call, value.name())"));
}

#[test]
fn test_list_sizing_selects_the_dispatcher_method() {
    let text = render(&bundled(), "ai_channel.rs");
    assert!(text.contains("self.interpreter.get_list::<f64>(&call)"));
    assert!(text.contains("self.interpreter.get_list_sized::<f64>(&call, 4)"));
    assert!(text.contains("pub fn set_ai_bridge_poly_forward_coeff(&self, value: &[f64]) -> crate::Result<()> {"));
}

#[test]
fn test_subclasses_include_parent_attributes_in_id_order() {
    let text = render(&bundled(), "ai_channel.rs");
    let justification = text.find("fn ai_raw_samp_justification(").unwrap();
    let description = text.find("fn description(").unwrap();
    let atten = text.find("fn ai_atten(").unwrap();
    let chan_type = text.find("fn chan_type(").unwrap();
    assert!(justification < atten && atten < description && description < chan_type);
    assert!(text.contains("impl From<AIChannel> for crate::channel::Channel {"));
}

#[test]
fn test_hand_written_struct_gets_only_an_impl_block() {
    let text = render(&bundled(), "task.rs");
    assert!(!text.contains("pub struct Task"));
    assert!(!text.contains("pub fn new("));
    assert!(text.contains("impl Task {"));
    assert!(text.contains("pub fn channel_names(&self) -> crate::Result<Vec<String>> {"));
    assert!(text.contains("self.interpreter.get_string_list(&call)"));
}

#[test]
fn test_struct_without_handles_uses_a_typed_empty_array() {
    let text = render(&bundled(), "system.rs");
    assert!(text.contains("pub struct System {"));
    assert!(text.contains("pub fn new(interpreter: std::sync::Arc<crate::interpreter::Interpreter>) -> Self {"));
    assert!(text.contains("let handles: [crate::interpreter::HandleArg<'_>; 0] = [];"));
}

#[test]
fn test_string_handles_are_borrowed_and_exposed() {
    let text = render(&bundled(), "device.rs");
    assert!(text.contains("pub(crate) name: String,"));
    assert!(text.contains("pub fn name(&self) -> &str {"));
    assert!(text.contains("crate::interpreter::HandleArg::Name(&self.name),"));
    assert!(text.contains("pub fn ai_trig_usage(&self) -> crate::Result<Vec<crate::enums::TriggerUsage>> {"));
    assert!(text.contains("Ok(crate::enums::TriggerUsage::decompose(mask))"));
    assert!(text.contains("values.into_iter().map(crate::enums::UsageTypeAI::try_from).collect()"));
}

#[test]
fn test_enums_use_aliases_and_sorted_members() {
    let text = render(&bundled(), "enums.rs");
    assert!(text.contains("pub enum DataJustification {"));
    assert!(!text.contains("pub enum DataJustification1 {"));
    let left = text.find("Left = 10209,").unwrap();
    let right = text.find("Right = 10279,").unwrap();
    assert!(left < right);
    assert!(text.contains("10279 => Ok(Self::Right),"));
    assert!(text.contains(
        "_ => Err(crate::Error::UnknownEnumValue { enum_name: \"DataJustification\", value }),"
    ));
    assert!(text.contains("pub fn compose(members: &[Self]) -> i32 {"));
}

#[test]
fn test_error_codes_carry_names_and_descriptions() {
    let text = render(&bundled(), "error_codes.rs");
    assert!(text.contains("InvalidAttributeValue = -200077,"));
    assert!(text.contains("StoppedBeforeDone = 200010,"));
    assert!(text.contains("Self::InvalidAttributeValue => \"INVALID_ATTRIBUTE_VALUE\","));
    assert!(text.contains("-200077 => Some(Self::InvalidAttributeValue),"));
}

#[test]
fn test_collections_filter_and_attach_accessors() {
    let text = render(&bundled(), "collections.rs");
    assert!(text.contains("pub struct AIChannelCollection {"));
    assert!(text.contains(
        "if self.item(name.clone()).chan_type()? == crate::enums::ChannelType::AnalogInput {"
    ));
    assert!(text.contains("impl crate::task::Task {"));
    assert!(text.contains("pub fn ai_channels(&self) -> AIChannelCollection {"));
    assert!(text.contains("pub fn devices(&self) -> DeviceCollection {"));
}

#[test]
fn test_write_then_check_reports_no_drift() {
    let dir = tempfile::tempdir().unwrap();
    let store = bundled();
    let config = config();
    let generator = Generator::new(&store, &config);

    let written = generator.write_to(dir.path()).unwrap();
    assert_eq!(written.len(), 7);
    assert!(generator.check(dir.path()).unwrap().is_empty());
    assert!(generator.write_to(dir.path()).unwrap().is_empty());
}

#[test]
fn test_check_reports_a_unified_diff_for_edited_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = bundled();
    let config = config();
    let generator = Generator::new(&store, &config);
    generator.write_to(dir.path()).unwrap();

    let path = dir.path().join("error_codes.rs");
    let edited = fs::read_to_string(&path)
        .unwrap()
        .replace("InvalidAttributeValue = -200077,", "InvalidAttributeValue = -1,");
    fs::write(&path, edited).unwrap();
    fs::remove_file(dir.path().join("enums.rs")).unwrap();

    let drift = generator.check(dir.path()).unwrap();
    let paths: Vec<_> = drift.iter().map(|d| d.path.display().to_string()).collect();
    assert_eq!(paths, ["enums.rs", "error_codes.rs"]);
    let diff = &drift[1].diff;
    assert!(diff.contains("--- a/error_codes.rs"));
    assert!(diff.contains("-    InvalidAttributeValue = -1,"));
    assert!(diff.contains("+    InvalidAttributeValue = -200077,"));
}

#[test]
fn test_copy_entries_are_verbatim() {
    let src = tempfile::tempdir().unwrap();
    fs::create_dir(src.path().join("static")).unwrap();
    fs::write(src.path().join("static/extra.rs"), "pub const X: u8 = 1;\n").unwrap();
    let config = CodegenConfig::from_toml_str(
        "[[copy]]\nsource = \"static/extra.rs\"\noutput = \"extra.rs\"\n",
        src.path(),
    )
    .unwrap();

    let store = bundled();
    let files = Generator::new(&store, &config).generate().unwrap();
    assert_eq!(files[Path::new("extra.rs")], "pub const X: u8 = 1;\n");
}

#[test]
fn test_missing_copy_source_is_an_io_error() {
    let config = CodegenConfig::from_toml_str(
        "[[copy]]\nsource = \"nope.rs\"\noutput = \"nope.rs\"\n",
        "/definitely/not/here",
    )
    .unwrap();
    let store = bundled();
    let err = Generator::new(&store, &config).generate().unwrap_err();
    assert!(matches!(err, CodegenError::Io { .. }));
}

#[test]
fn test_unknown_class_aborts() {
    let config = CodegenConfig::from_toml_str(
        "[[modules]]\noutput = \"x.rs\"\ntemplate = \"class\"\nclass = \"Oscilloscope\"\n",
        ".",
    )
    .unwrap();
    let store = bundled();
    let err = Generator::new(&store, &config).generate().unwrap_err();
    assert!(matches!(err, CodegenError::UnknownClass { ref class, .. } if class == "Oscilloscope"));
}

#[test]
fn test_hand_written_name_collision_aborts() {
    let store = MetadataStore::from_sources([CatalogSource::new(
        "widget.toml",
        r#"
        [classes.Widget]
        module = "widget"
        c_function_stem = "WidgetAttribute"
        handle_parameters = [{ name = "name", c_name = "widget", kind = "string" }]
        hand_written = ["set_gain"]

        [[attributes]]
        id = 1
        owner_class = "Widget"
        name = "gain"
        access = "read-write"
        type = "float64"
        "#,
    )])
    .unwrap();
    let config = CodegenConfig::default();

    let err = Generator::new(&store, &config).generate().unwrap_err();
    match err {
        CodegenError::NameCollision { class, name, location } => {
            assert_eq!(class, "Widget");
            assert_eq!(name, "set_gain");
            assert_eq!(location, "widget.toml: Widget.gain (1)");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_handle_accessor_collision_aborts() {
    let store = MetadataStore::from_sources([CatalogSource::new(
        "widget.toml",
        r#"
        [classes.Widget]
        module = "widget"
        c_function_stem = "WidgetAttribute"
        handle_parameters = [{ name = "name", c_name = "widget", kind = "string" }]

        [[attributes]]
        id = 7
        owner_class = "Widget"
        name = "name"
        access = "read"
        type = "string"
        "#,
    )])
    .unwrap();
    let config = CodegenConfig::default();
    let err = Generator::new(&store, &config).generate().unwrap_err();
    assert!(matches!(err, CodegenError::NameCollision { ref name, .. } if name == "name"));
}
