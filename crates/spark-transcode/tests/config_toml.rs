//! `CoderConfig` 的 TOML 加载与应用。

use spark_transcode::codes;
use spark_transcode::prelude::*;
use spark_transcode::test_stubs::AsciiStub;

#[test]
fn defaults_report_both_categories() {
    let config = CoderConfig::from_toml_str("").expect("空文档使用缺省值");
    assert_eq!(config, CoderConfig::default());
    assert_eq!(config.malformed_input, CodingErrorAction::Report);
    assert!(config.replacement.is_none());
}

#[test]
fn parses_uppercase_actions_and_replacement() {
    let config = CoderConfig::from_toml_str(
        r#"
        malformed_input = "REPLACE"
        unmappable_character = "IGNORE"
        replacement = "?"
        "#,
    )
    .expect("合法配置");
    assert_eq!(config.malformed_input, CodingErrorAction::Replace);
    assert_eq!(config.unmappable_character, CodingErrorAction::Ignore);
    assert_eq!(config.replacement.as_deref(), Some("?"));
}

#[test]
fn rejects_unknown_fields_and_actions() {
    let err = CoderConfig::from_toml_str("on_error = \"REPLACE\"").expect_err("未知字段");
    assert_eq!(err.code(), codes::ILLEGAL_ARGUMENT);
    assert!(CoderConfig::from_toml_str("malformed_input = \"SKIP\"").is_err());
}

#[test]
fn serialised_config_round_trips() {
    let config = CoderConfig {
        replacement: Some("*".into()),
        ..CoderConfig::replacing()
    };
    let text = toml::to_string(&config).expect("可序列化");
    assert!(text.contains("malformed_input = \"REPLACE\""));
    assert_eq!(CoderConfig::from_toml_str(&text).expect("可解析"), config);
}

#[test]
fn configure_applies_to_decoder() {
    let config = CoderConfig::from_toml_str(
        r##"
        malformed_input = "REPLACE"
        replacement = "#"
        "##,
    )
    .expect("合法配置");

    let mut decoder = AsciiStub::new().new_decoder().expect("桩解码器");
    decoder.configure(&config).expect("配置合法");
    assert_eq!(decoder.malformed_input_action(), CodingErrorAction::Replace);
    assert_eq!(decoder.unmappable_character_action(), CodingErrorAction::Report);
    assert_eq!(decoder.decode_to_string(&[0x61, 0x80, 0x62]).expect("替换"), "a#b");
}

#[test]
fn configure_applies_to_encoder() {
    let mut encoder = AsciiStub::new().new_encoder().expect("桩编码器");
    let config = CoderConfig {
        replacement: Some("_".into()),
        ..CoderConfig::replacing()
    };
    encoder.configure(&config).expect("配置合法");
    assert_eq!(encoder.replacement(), b"_".to_vec());
    assert_eq!(encoder.encode_str("x\u{e9}y").expect("替换"), b"x_y");
}

#[test]
fn unencodable_replacement_leaves_encoder_untouched() {
    let mut encoder = AsciiStub::new().new_encoder().expect("桩编码器");
    let config = CoderConfig {
        replacement: Some("\u{e9}".into()),
        ..CoderConfig::replacing()
    };
    let err = encoder.configure(&config).expect_err("替换文本无法编码");
    assert_eq!(err.code(), codes::ILLEGAL_ARGUMENT);
    assert_eq!(encoder.replacement(), b"?".to_vec());
    assert_eq!(encoder.malformed_input_action(), CodingErrorAction::Report);
}
