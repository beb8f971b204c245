//! 命名注册表：名称校验、别名、冲突与实例独立性。

use std::sync::Arc;

use spark_transcode::prelude::*;
use spark_transcode::codes;
use spark_transcode_charsets::{CharsetRegistry, available, for_name, us_ascii, utf_8};

#[derive(Debug)]
struct Renamed(&'static str, &'static [&'static str]);

impl Charset for Renamed {
    fn name(&self) -> &str {
        self.0
    }

    fn aliases(&self) -> &[&'static str] {
        self.1
    }

    fn can_encode(&self) -> bool {
        false
    }

    fn new_decoder(self: Arc<Self>) -> Result<Decoder> {
        utf_8().new_decoder()
    }

    fn new_encoder(self: Arc<Self>) -> Result<Encoder> {
        Err(TranscodeError::UnsupportedOperation {
            reason: "decode only".into(),
        })
    }
}

#[test]
fn builtin_lookup_by_name_and_alias() {
    assert_eq!(for_name("utf-8").expect("已注册").name(), "UTF-8");
    assert_eq!(for_name("LATIN1").expect("别名").name(), "ISO-8859-1");
    assert_eq!(for_name("unicode").expect("别名").name(), "UTF-16");
    assert!(available().contains(&"US-ASCII"));
}

#[test]
fn illegal_and_unknown_names_are_distinguished() {
    let err = for_name("utf 8").expect_err("含空格");
    assert_eq!(err.code(), codes::ILLEGAL_CHARSET_NAME);
    let err = for_name("x-unknown").expect_err("未注册");
    assert_eq!(err.code(), codes::UNSUPPORTED_CHARSET);
    assert_eq!(
        err,
        TranscodeError::UnsupportedCharset {
            name: "x-unknown".into()
        }
    );
}

#[test]
fn conflicting_registration_is_rejected() {
    let mut registry = CharsetRegistry::with_builtin();
    let before = registry.available().len();

    let err = registry
        .register(Arc::new(Renamed("X-MINE", &["utf8"])))
        .expect_err("别名与 UTF-8 冲突");
    assert_eq!(err.code(), codes::ILLEGAL_ARGUMENT);
    assert!(registry.lookup("x-mine").is_none(), "冲突时不得部分注册");

    let err = registry
        .register(Arc::new(Renamed("bad name", &[])))
        .expect_err("非法名称");
    assert_eq!(err.code(), codes::ILLEGAL_CHARSET_NAME);

    registry
        .register(Arc::new(Renamed("X-MINE", &["mine"])))
        .expect("无冲突");
    assert_eq!(registry.available().len(), before + 1);
    assert_eq!(registry.for_name("MINE").expect("别名").name(), "X-MINE");
}

#[test]
fn decode_only_charset_refuses_encoders() {
    let mut registry = CharsetRegistry::new();
    registry
        .register(Arc::new(Renamed("X-READ-ONLY", &[])))
        .expect("注册成功");
    assert!(registry.decoder("x-read-only").is_ok());
    let err = registry.encoder("x-read-only").expect_err("不支持编码");
    assert_eq!(err.code(), codes::UNSUPPORTED_OPERATION);
}

#[test]
fn every_request_yields_an_independent_coder() {
    let registry = CharsetRegistry::with_builtin();
    let mut first = registry.decoder("US-ASCII").expect("解码器");
    let mut second = registry.decoder("us-ascii").expect("解码器");

    first.on_malformed_input(CodingErrorAction::Ignore);
    assert_eq!(second.malformed_input_action(), CodingErrorAction::Report);

    let input = [0x41u8, 0x42];
    let mut storage = [0u16; 2];
    let mut src = InputBuffer::new(&input);
    let mut dst = OutputBuffer::new(&mut storage);
    first.step(&mut src, &mut dst, false).expect("进入 Coding");
    assert_eq!(first.state(), CoderState::Coding);
    assert_eq!(second.state(), CoderState::Reset);
    assert_eq!(second.decode_to_string(b"ok").expect("独立实例"), "ok");
}

#[test]
fn free_helpers_replace_errors() {
    let ascii = us_ascii();
    assert_eq!(
        spark_transcode::charset::decode(&ascii, &[0x61, 0xC3, 0xA9]).expect("替换策略"),
        "a\u{FFFD}\u{FFFD}"
    );
    assert_eq!(
        spark_transcode::charset::encode(&ascii, "caf\u{e9}").expect("替换策略"),
        b"caf?"
    );
}
